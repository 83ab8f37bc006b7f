//! # Error Types
//!
//! Error types for per-filter configuration translation using `thiserror`.

/// Custom result type for filterbind operations
pub type Result<T> = std::result::Result<T, FilterBindError>;

/// Boxed error returned by caller-supplied extractors
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Main error type for per-filter configuration translation
#[derive(thiserror::Error, Debug)]
pub enum FilterBindError {
    /// A configuration message could not be packed into (or read back from) the
    /// `google.protobuf.Any` envelope
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// A stored payload could not be decoded into the requested message type
    #[error("Decode error: {context}")]
    Decode {
        #[source]
        source: prost::DecodeError,
        context: String,
    },

    /// The caller-supplied extractor failed for a destination
    #[error("Extractor failed for destination '{destination}': {source}")]
    Extractor {
        destination: String,
        #[source]
        source: BoxError,
    },

    /// The routing rule or output route is not something this subsystem can handle
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// The output route does not correspond to the routing rule's destinations
    #[error("Structural mismatch: {message}")]
    StructuralMismatch { message: String },

    /// A referenced resource does not exist
    #[error("Resource not found: {resource_type} '{id}'")]
    NotFound { resource_type: String, id: String },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// Validation errors
    #[error("Validation error: {message}")]
    Validation { message: String, field: Option<String> },
}

impl FilterBindError {
    /// Create a serialization error
    pub fn serialization<S: Into<String>>(message: S) -> Self {
        Self::Serialization { message: message.into() }
    }

    /// Create a decode error with context
    pub fn decode<S: Into<String>>(context: S, source: prost::DecodeError) -> Self {
        Self::Decode { source, context: context.into() }
    }

    /// Wrap an extractor failure with the destination it was evaluating
    pub fn extractor<D: Into<String>>(destination: D, source: BoxError) -> Self {
        Self::Extractor { destination: destination.into(), source }
    }

    /// Create an invalid input error
    pub fn invalid_input<S: Into<String>>(message: S) -> Self {
        Self::InvalidInput { message: message.into() }
    }

    /// Create a structural mismatch error
    pub fn mismatch<S: Into<String>>(message: S) -> Self {
        Self::StructuralMismatch { message: message.into() }
    }

    /// Create a not found error
    pub fn not_found<R: Into<String>, I: Into<String>>(resource_type: R, id: I) -> Self {
        Self::NotFound { resource_type: resource_type.into(), id: id.into() }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config { message: message.into(), source: None }
    }

    /// Create a configuration error with source
    pub fn config_with_source<S: Into<String>>(message: S, source: BoxError) -> Self {
        Self::Config { message: message.into(), source: Some(source) }
    }

    /// Create a validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation { message: message.into(), field: None }
    }

    /// Create a validation error with field information
    pub fn validation_field<S: Into<String>, F: Into<String>>(message: S, field: F) -> Self {
        Self::Validation { message: message.into(), field: Some(field.into()) }
    }

    /// Short label used for metrics and structured logs
    pub fn kind(&self) -> &'static str {
        match self {
            FilterBindError::Serialization { .. } => "serialization",
            FilterBindError::Decode { .. } => "decode",
            FilterBindError::Extractor { .. } => "extractor",
            FilterBindError::InvalidInput { .. } => "invalid_input",
            FilterBindError::StructuralMismatch { .. } => "structural_mismatch",
            FilterBindError::NotFound { .. } => "not_found",
            FilterBindError::Config { .. } => "config",
            FilterBindError::Validation { .. } => "validation",
        }
    }

    /// Whether the error must abort translation of the affected route.
    ///
    /// Everything raised while attaching or matching is fatal for the route;
    /// only configuration loading problems are not tied to a route.
    pub fn is_fatal_for_route(&self) -> bool {
        !matches!(self, FilterBindError::Config { .. } | FilterBindError::Validation { .. })
    }
}

impl From<prost::DecodeError> for FilterBindError {
    fn from(error: prost::DecodeError) -> Self {
        Self::decode("Failed to decode per-filter configuration", error)
    }
}

impl From<config::ConfigError> for FilterBindError {
    fn from(error: config::ConfigError) -> Self {
        Self::config_with_source("Configuration loading failed", Box::new(error))
    }
}

impl From<validator::ValidationErrors> for FilterBindError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let message = errors
            .field_errors()
            .iter()
            .map(|(field, field_errors)| {
                let error_messages: Vec<String> = field_errors
                    .iter()
                    .map(|e| e.message.as_ref().map_or("Invalid value".to_string(), |m| m.to_string()))
                    .collect();
                format!("{}: {}", field, error_messages.join(", "))
            })
            .collect::<Vec<_>>()
            .join("; ");

        Self::validation(format!("Validation failed: {}", message))
    }
}
