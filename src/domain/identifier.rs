//! Enrollment identifier
//!
//! An enrollment identifier is the GUID naming one MDM enrollment. The task
//! scheduler folder, the registry subtree and the task storage folders for an
//! enrollment are all named after it.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Serialize, Serializer};

use crate::error::{MdmError, Result};

/// Hex digit counts of the five GUID groups (8-4-4-4-12)
const GROUPS: [usize; 5] = [8, 4, 4, 4, 12];

/// A GUID naming one MDM enrollment
///
/// Keeps the name exactly as it was found on the machine, because that is the
/// name every resource domain is keyed by, along with the normalized 32-digit
/// uppercase form used for comparisons.
#[derive(Debug, Clone)]
pub struct EnrollmentId {
    name: String,
    hex: String,
}

impl EnrollmentId {
    /// Parse a folder or key name as an enrollment identifier.
    ///
    /// Accepts 32 hex digits grouped 8-4-4-4-12 with optional hyphens between
    /// groups, optionally enclosed in a matching pair of braces or parentheses.
    /// Returns `None` for anything else.
    pub fn parse(name: &str) -> Option<Self> {
        let body = strip_enclosers(name)?;
        let hex = parse_groups(body)?;
        Some(Self {
            name: name.to_string(),
            hex,
        })
    }

    /// Like [`EnrollmentId::parse`], but reports a non-GUID as an error.
    pub fn try_from_name(name: &str) -> Result<Self> {
        Self::parse(name).ok_or_else(|| MdmError::InvalidIdentifier {
            value: name.to_string(),
        })
    }

    /// Name as found on the machine
    pub fn as_str(&self) -> &str {
        &self.name
    }

    /// Uppercase hyphenated form without enclosers
    pub fn canonical(&self) -> String {
        let mut out = String::with_capacity(36);
        let mut offset = 0;
        for (i, len) in GROUPS.iter().enumerate() {
            if i > 0 {
                out.push('-');
            }
            out.push_str(&self.hex[offset..offset + len]);
            offset += len;
        }
        out
    }

    /// Whether `text` (a task path, a key name) refers to this enrollment.
    ///
    /// Case-insensitive; matches either the name as found or the canonical form.
    pub fn matches(&self, text: &str) -> bool {
        let haystack = text.to_ascii_uppercase();
        haystack.contains(&self.name.to_ascii_uppercase()) || haystack.contains(&self.canonical())
    }
}

fn strip_enclosers(name: &str) -> Option<&str> {
    let pairs = [('{', '}'), ('(', ')')];
    for (open, close) in pairs {
        if let Some(rest) = name.strip_prefix(open) {
            return rest.strip_suffix(close);
        }
    }
    if name.ends_with('}') || name.ends_with(')') {
        return None;
    }
    Some(name)
}

fn parse_groups(body: &str) -> Option<String> {
    let mut chars = body.chars().peekable();
    let mut hex = String::with_capacity(32);

    for (i, len) in GROUPS.iter().enumerate() {
        if i > 0 && chars.peek() == Some(&'-') {
            chars.next();
        }
        for _ in 0..*len {
            match chars.next() {
                Some(c) if c.is_ascii_hexdigit() => hex.push(c.to_ascii_uppercase()),
                _ => return None,
            }
        }
    }

    if chars.next().is_some() {
        return None;
    }
    Some(hex)
}

impl PartialEq for EnrollmentId {
    fn eq(&self, other: &Self) -> bool {
        self.hex == other.hex
    }
}

impl Eq for EnrollmentId {}

impl Hash for EnrollmentId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.hex.hash(state);
    }
}

impl fmt::Display for EnrollmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl Serialize for EnrollmentId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.name)
    }
}
