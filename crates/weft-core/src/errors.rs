use thiserror::Error;
use weft_core_types::SnapshotId;

/// Result type alias using WeftError
pub type Result<T> = std::result::Result<T, WeftError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that hosts can use for programmatic
/// error handling, testing, and responses sent to remote viewers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Repository
    /// Snapshot id was never issued, or its history has been evicted
    SnapshotNotFound,

    // Diffing
    /// A record lacks a field its kind declares (entity builder bug)
    PreconditionViolation,

    // Patch replay
    /// Patch path does not address a location in the target value
    InvalidPatchPath,
    /// Patch operation does not fit the value found at its path
    PatchTargetMismatch,

    // Configuration
    InvalidConfig,

    // Integration/IO
    Io,
    Serialization,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::SnapshotNotFound => "ERR_SNAPSHOT_NOT_FOUND",
            ExErrorKind::PreconditionViolation => "ERR_PRECONDITION_VIOLATION",
            ExErrorKind::InvalidPatchPath => "ERR_INVALID_PATCH_PATH",
            ExErrorKind::PatchTargetMismatch => "ERR_PATCH_TARGET_MISMATCH",
            ExErrorKind::InvalidConfig => "ERR_INVALID_CONFIG",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
        }
    }
}

/// Canonical structured error type
///
/// Carries classification fields for programmatic handling and optional
/// context (operation, snapshot id, patch path) for debugging.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    snapshot_id: Option<SnapshotId>,
    path: Option<String>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            snapshot_id: None,
            path: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add snapshot id context
    pub fn with_snapshot_id(mut self, snapshot_id: SnapshotId) -> Self {
        self.snapshot_id = Some(snapshot_id);
        self
    }

    /// Add patch path context (JSON pointer form)
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
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

    /// Get the snapshot id context, if any
    pub fn snapshot_id(&self) -> Option<&SnapshotId> {
        self.snapshot_id.as_ref()
    }

    /// Get the patch path context, if any
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
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
        if let Some(snapshot_id) = &self.snapshot_id {
            write!(f, " (snapshot_id: {})", snapshot_id)?;
        }
        if let Some(path) = &self.path {
            write!(f, " (path: {})", path)?;
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

/// Error taxonomy for repository, diff, and replay operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WeftError {
    // ===== Repository Errors =====
    /// Snapshot id is unknown: never committed, disposed, or evicted
    #[error("No snapshot found for ID '{snapshot_id}'")]
    SnapshotNotFound { snapshot_id: SnapshotId },

    // ===== Diff Errors =====
    /// Record of the given kind is missing a field on one side of a diff
    #[error("Record of kind '{kind}' at '{path}' is missing declared field '{field}'")]
    MissingRecordField {
        kind: String,
        field: String,
        path: String,
    },

    // ===== Replay Errors =====
    /// Patch path does not resolve against the target value
    #[error("Invalid patch path '{path}': {reason}")]
    InvalidPatchPath { path: String, reason: String },

    /// Operation cannot be applied to the value found at its path
    #[error("Cannot apply '{op}' at '{path}': found {found}")]
    PatchTargetMismatch {
        op: String,
        path: String,
        found: String,
    },

    // ===== Configuration Errors =====
    #[error("Invalid repository configuration: {reason}")]
    InvalidConfig { reason: String },

    // ===== Generic Errors =====
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl From<WeftError> for ExError {
    fn from(err: WeftError) -> Self {
        match err {
            WeftError::SnapshotNotFound { snapshot_id } => {
                ExError::new(ExErrorKind::SnapshotNotFound)
                    .with_snapshot_id(snapshot_id)
                    .with_message("No snapshot found for ID")
            }

            WeftError::MissingRecordField { kind, field, path } => {
                ExError::new(ExErrorKind::PreconditionViolation)
                    .with_op("diff")
                    .with_path(path)
                    .with_message(format!(
                        "Record of kind '{}' is missing declared field '{}'",
                        kind, field
                    ))
            }

            WeftError::InvalidPatchPath { path, reason } => {
                ExError::new(ExErrorKind::InvalidPatchPath)
                    .with_op("apply_patch")
                    .with_path(path)
                    .with_message(reason)
            }

            WeftError::PatchTargetMismatch { op, path, found } => {
                ExError::new(ExErrorKind::PatchTargetMismatch)
                    .with_op("apply_patch")
                    .with_path(path)
                    .with_message(format!("Cannot apply '{}': found {}", op, found))
            }

            WeftError::InvalidConfig { reason } => ExError::new(ExErrorKind::InvalidConfig)
                .with_message(format!("Invalid repository configuration: {}", reason)),

            WeftError::Serialization { message } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }
        }
    }
}

/// Conversion from serde_json::Error to WeftError
impl From<serde_json::Error> for WeftError {
    fn from(err: serde_json::Error) -> Self {
        WeftError::Serialization {
            message: err.to_string(),
        }
    }
}
