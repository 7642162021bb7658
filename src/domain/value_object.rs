//! Identifier value objects with validating constructors.

use thiserror::Error;

/// Upper bound for client-supplied identifiers (group names, member ids,
/// display names).
pub const MAX_IDENTIFIER_LEN: usize = 64;

/// Group name used by legacy clients that omit the field.
const DEFAULT_GROUP: &str = "default";

/// Fallback shown for members that never supplied a display name.
const ANONYMOUS_DISPLAY_NAME: &str = "anonymous";

/// Validation errors for identifier value objects
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValueObjectError {
    /// Identifier was empty or whitespace-only
    #[error("identifier must not be empty")]
    Empty,

    /// Identifier exceeded [`MAX_IDENTIFIER_LEN`]
    #[error("identifier exceeds {MAX_IDENTIFIER_LEN} characters (got {0})")]
    TooLong(usize),
}

fn validate_identifier(value: &str) -> Result<(), ValueObjectError> {
    if value.trim().is_empty() {
        return Err(ValueObjectError::Empty);
    }
    let len = value.chars().count();
    if len > MAX_IDENTIFIER_LEN {
        return Err(ValueObjectError::TooLong(len));
    }
    Ok(())
}

/// Name of an isolation domain: members only ever see co-members of the same
/// group. Case-sensitive, client-supplied, not pre-registered.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupName(String);

impl GroupName {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        validate_identifier(&value)?;
        Ok(Self(value))
    }

    /// Resolve an optional wire field, falling back to the legacy default
    /// group name.
    pub fn new_or_default(value: Option<String>) -> Result<Self, ValueObjectError> {
        match value {
            Some(v) if !v.trim().is_empty() => Self::new(v),
            _ => Ok(Self(DEFAULT_GROUP.to_string())),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Identifier of a tracked member, unique within its group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MemberId(String);

impl MemberId {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        validate_identifier(&value)?;
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Human-readable member name. Never fails construction: absent or empty
/// input falls back to a fixed placeholder, over-long input is truncated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayName(String);

impl DisplayName {
    pub fn from_optional(value: Option<String>) -> Self {
        match value {
            Some(v) if !v.trim().is_empty() => {
                Self(v.chars().take(MAX_IDENTIFIER_LEN).collect())
            }
            _ => Self(ANONYMOUS_DISPLAY_NAME.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}
