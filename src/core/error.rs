use thiserror::Error;

/// Errors that can occur while assembling, keying or serializing a fiscal document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum NfeError {
    /// A section or one of its mandatory attributes was absent or empty.
    #[error("missing required field: {field}")]
    MissingField { field: String },

    /// A field failed a fixed-width, numeric or enumerated-value constraint.
    #[error("invalid {field}: {message}")]
    Format { field: String, message: String },

    /// A regulatory rule was violated (recipient required, bad GTIN, ...).
    #[error("business rule violated at {field}: {message}")]
    BusinessRule { field: String, message: String },

    /// Access-key inputs could not be coerced to their fixed widths.
    #[error("access key derivation failed: {0}")]
    Derivation(String),

    /// XML generation error.
    #[error("XML error: {0}")]
    Xml(String),

    /// Serialization was requested before a successful build.
    #[error("document has not been built yet")]
    NotBuilt,
}

impl NfeError {
    pub fn missing(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    pub fn format(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Format {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn business(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::BusinessRule {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Category of a single validation finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    MissingField,
    Format,
    BusinessRule,
}

/// A single validation error with field path and message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dot-separated path to the invalid field (e.g. "issuer.address.city_code").
    pub field: String,
    /// Human-readable error description.
    pub message: String,
    pub kind: ErrorKind,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl ValidationError {
    /// A required field is absent or blank.
    pub fn missing(field: impl Into<String>) -> Self {
        let field = field.into();
        Self {
            message: format!("{field} is required"),
            field,
            kind: ErrorKind::MissingField,
        }
    }

    /// A field has the wrong width, charset or enumerated value.
    pub fn format(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            kind: ErrorKind::Format,
        }
    }

    /// A field is well-formed but breaks a regulatory rule.
    pub fn business(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            kind: ErrorKind::BusinessRule,
        }
    }
}

impl From<ValidationError> for NfeError {
    fn from(e: ValidationError) -> Self {
        match e.kind {
            ErrorKind::MissingField => NfeError::MissingField { field: e.field },
            ErrorKind::Format => NfeError::Format {
                field: e.field,
                message: e.message,
            },
            ErrorKind::BusinessRule => NfeError::BusinessRule {
                field: e.field,
                message: e.message,
            },
        }
    }
}

/// Turn a validator's findings into a fail-fast result carrying the first one.
pub fn first_error(errors: Vec<ValidationError>) -> Result<(), NfeError> {
    match errors.into_iter().next() {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}
