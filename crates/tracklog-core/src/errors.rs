use thiserror::Error;

/// Result type alias using TrackLogError
pub type Result<T> = std::result::Result<T, TrackLogError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Every failure surfaced by tracklog maps to one of these kinds, and every
/// kind maps to a stable error code that tests and the CLI can match on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Caller input
    InvalidArgument,
    InvalidGroupingProperty,
    InvalidSortingProperty,

    // Library source
    ProviderUnavailable,
    /// Provider output is malformed (bad export file, duplicate persistent IDs)
    InvalidLibrary,

    // Commit
    /// A failure inside the update transaction; the store was rolled back
    InconsistentState,
    /// The snapshot generation moved between read and commit
    Concurrency,

    // Integration/IO
    Io,
    Serialization,
    Persistence,
    InvalidConfig,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidArgument => "ERR_INVALID_ARGUMENT",
            ExErrorKind::InvalidGroupingProperty => "ERR_INVALID_GROUPING_PROPERTY",
            ExErrorKind::InvalidSortingProperty => "ERR_INVALID_SORTING_PROPERTY",
            ExErrorKind::ProviderUnavailable => "ERR_PROVIDER_UNAVAILABLE",
            ExErrorKind::InvalidLibrary => "ERR_INVALID_LIBRARY",
            ExErrorKind::InconsistentState => "ERR_INCONSISTENT_STATE",
            ExErrorKind::Concurrency => "ERR_CONCURRENCY",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::InvalidConfig => "ERR_INVALID_CONFIG",
        }
    }

    /// True for caller input errors, which are reported before any query runs
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            ExErrorKind::InvalidArgument
                | ExErrorKind::InvalidGroupingProperty
                | ExErrorKind::InvalidSortingProperty
        )
    }
}

/// Canonical structured error type
///
/// Carries the classification kind plus enough context (operation, track,
/// field, allowed values) for the CLI to print an actionable message.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    persistent_id: Option<String>,
    field: Option<String>,
    message: String,
    source: Option<Box<ExError>>,
    candidates: Option<Vec<String>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            persistent_id: None,
            field: None,
            message: String::new(),
            source: None,
            candidates: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add track context
    pub fn with_persistent_id(mut self, id: impl Into<String>) -> Self {
        self.persistent_id = Some(id.into());
        self
    }

    /// Add field or property context (e.g. the rejected group-by name)
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Add the set of values that would have been accepted
    pub fn with_candidates(mut self, candidates: Vec<String>) -> Self {
        self.candidates = Some(candidates);
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the track context, if any
    pub fn persistent_id(&self) -> Option<&str> {
        self.persistent_id.as_deref()
    }

    /// Get the field or property context, if any
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }

    /// Get the accepted values, if any
    pub fn candidates(&self) -> Option<&[String]> {
        self.candidates.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(field) = &self.field {
            write!(f, " (field: {})", field)?;
        }
        if let Some(id) = &self.persistent_id {
            write!(f, " (persistent_id: {})", id)?;
        }
        if let Some(candidates) = &self.candidates {
            write!(f, " (expected one of: {})", candidates.join(", "))?;
        }
        if let Some(source) = &self.source {
            write!(f, "; caused by {}", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Domain error taxonomy for tracklog validation and parsing
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TrackLogError {
    /// Group-by name outside the closed property set
    #[error("Invalid grouping property '{property}'")]
    InvalidGroupingProperty {
        property: String,
        allowed: Vec<String>,
    },

    /// Sort-by name outside the closed measure set
    #[error("Invalid sorting property '{property}'")]
    InvalidSortingProperty {
        property: String,
        allowed: Vec<String>,
    },

    /// Group-by list was empty
    #[error("At least one grouping property is required")]
    EmptyGrouping,

    /// A result limit that is not a positive integer
    #[error("Limit must be a positive integer, got {limit}")]
    InvalidLimit { limit: i64 },

    /// A window whose lower bound lies after its upper bound
    #[error("Invalid time window: from {from} is after to {to}")]
    InvalidWindow { from: i64, to: i64 },

    /// A trailing timeframe that is negative or not finite
    #[error("Timeframe must be a non-negative number of days, got {days}")]
    InvalidTimeframe { days: f64 },

    /// The library listed the same persistent ID twice
    #[error("Duplicate persistent ID in library: {persistent_id}")]
    DuplicateTrack { persistent_id: String },
}

/// Conversion from TrackLogError to ExError
impl From<TrackLogError> for ExError {
    fn from(err: TrackLogError) -> Self {
        let message = err.to_string();
        match err {
            TrackLogError::InvalidGroupingProperty { property, allowed } => {
                ExError::new(ExErrorKind::InvalidGroupingProperty)
                    .with_field(property)
                    .with_candidates(allowed)
                    .with_message(message)
            }
            TrackLogError::InvalidSortingProperty { property, allowed } => {
                ExError::new(ExErrorKind::InvalidSortingProperty)
                    .with_field(property)
                    .with_candidates(allowed)
                    .with_message(message)
            }
            TrackLogError::EmptyGrouping => ExError::new(ExErrorKind::InvalidArgument)
                .with_field("group_by")
                .with_message(message),
            TrackLogError::InvalidLimit { .. } => ExError::new(ExErrorKind::InvalidArgument)
                .with_field("limit")
                .with_message(message),
            TrackLogError::InvalidWindow { .. } => ExError::new(ExErrorKind::InvalidArgument)
                .with_field("window")
                .with_message(message),
            TrackLogError::InvalidTimeframe { .. } => ExError::new(ExErrorKind::InvalidArgument)
                .with_field("timeframe")
                .with_message(message),
            TrackLogError::DuplicateTrack { persistent_id } => {
                ExError::new(ExErrorKind::InvalidLibrary)
                    .with_persistent_id(persistent_id)
                    .with_message(message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_are_stable() {
        assert_eq!(
            ExErrorKind::ProviderUnavailable.code(),
            "ERR_PROVIDER_UNAVAILABLE"
        );
        assert_eq!(
            ExErrorKind::InconsistentState.code(),
            "ERR_INCONSISTENT_STATE"
        );
        assert_eq!(
            ExErrorKind::InvalidGroupingProperty.code(),
            "ERR_INVALID_GROUPING_PROPERTY"
        );
    }

    #[test]
    fn test_grouping_error_carries_value_and_allowed_set() {
        let err: ExError = TrackLogError::InvalidGroupingProperty {
            property: "Bogus".to_string(),
            allowed: vec!["Artist".to_string(), "Title".to_string()],
        }
        .into();

        assert_eq!(err.kind(), ExErrorKind::InvalidGroupingProperty);
        assert_eq!(err.field(), Some("Bogus"));
        assert_eq!(err.candidates().map(|c| c.len()), Some(2));
        assert!(err.to_string().contains("Bogus"));
        assert!(err.to_string().contains("Artist, Title"));
    }

    #[test]
    fn test_candidates_none_by_default() {
        let err = ExError::new(ExErrorKind::Persistence);
        assert!(err.candidates().is_none());
    }

    #[test]
    fn test_caller_errors() {
        assert!(ExErrorKind::InvalidArgument.is_caller_error());
        assert!(ExErrorKind::InvalidSortingProperty.is_caller_error());
        assert!(!ExErrorKind::InconsistentState.is_caller_error());
    }

    #[test]
    fn test_source_is_exposed() {
        use std::error::Error as _;

        let inner = ExError::new(ExErrorKind::Persistence).with_message("disk full");
        let outer = ExError::new(ExErrorKind::InconsistentState).with_source(inner);
        assert!(outer.source().is_some());
        assert!(outer.to_string().contains("disk full"));
    }
}
