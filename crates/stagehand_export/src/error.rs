use std::fmt;

/// A stage object could not be exported. Fatal for that object only.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("object '{object}': {kind}")]
pub struct SchemaViolation {
    pub object: String,
    pub kind: ViolationKind,
}

impl SchemaViolation {
    pub fn new(object: impl Into<String>, kind: ViolationKind) -> Self {
        Self {
            object: object.into(),
            kind,
        }
    }

    pub fn missing(object: &str, key: &'static str) -> Self {
        Self::new(object, ViolationKind::MissingProperty { key })
    }

    pub fn out_of_range(object: &str, key: &'static str, value: impl fmt::Display) -> Self {
        Self::new(
            object,
            ViolationKind::OutOfRange {
                key,
                value: value.to_string(),
            },
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViolationKind {
    MissingProperty {
        key: &'static str,
    },
    WrongKind {
        key: &'static str,
        expected: &'static str,
        found: &'static str,
    },
    OutOfRange {
        key: &'static str,
        value: String,
    },
    InvalidTiming {
        reason: &'static str,
    },
}

impl ViolationKind {
    /// Property the violation is about, if any.
    pub fn key(&self) -> Option<&'static str> {
        match self {
            Self::MissingProperty { key }
            | Self::WrongKind { key, .. }
            | Self::OutOfRange { key, .. } => Some(key),
            Self::InvalidTiming { .. } => None,
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingProperty { key } => write!(f, "missing required property '{key}'"),
            Self::WrongKind {
                key,
                expected,
                found,
            } => write!(f, "property '{key}' should be {expected}, found {found}"),
            Self::OutOfRange { key, value } => {
                write!(f, "property '{key}' has invalid value {value}")
            }
            Self::InvalidTiming { reason } => write!(f, "invalid scene timing: {reason}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AllocError {
    #[error("all {0} animation ids are in use")]
    ResourceExhausted(usize),
}
