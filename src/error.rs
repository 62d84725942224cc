use thiserror::Error;

/// Errors returned by the MyVR destination API
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("MyVR returned {status} for {path}: {body}")]
    Status {
        status: u16,
        path: String,
        body: String,
    },

    #[error("Network error calling {path}: {message}")]
    Transport { path: String, message: String },

    #[error("Could not decode response from {path}: {message}")]
    Decode { path: String, message: String },
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Status { status: 404, .. })
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Errors raised while validating an IELV source document
#[derive(Debug, Error, PartialEq)]
pub enum DocumentError {
    #[error("Malformed XML: {0}")]
    Xml(String),

    #[error("Missing required field `{0}`")]
    MissingField(&'static str),

    #[error("Field `{field}` must occur at most once, found {count}")]
    NotSingleton { field: &'static str, count: usize },

    #[error("Invalid value for `{field}`: {value:?}")]
    InvalidValue { field: &'static str, value: String },
}

/// Currency string could not be turned into cents
#[derive(Debug, Error, PartialEq)]
#[error("Unparseable price string {0:?}")]
pub struct ParseError(pub String);

/// Failures that abort a property synchronization
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Property upsert failed for {external_id}: {source}")]
    Property {
        external_id: String,
        #[source]
        source: ApiError,
    },
}
