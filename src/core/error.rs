//! Typed error handling for the selection engine
//!
//! Errors are split by the phase in which they occur:
//!
//! - [`QueryError`]: a field tree that breaks a construction invariant
//! - [`ExecutionError`]: a fatal condition met while walking data
//! - [`ConfigError`]: executor configuration that cannot be loaded
//!
//! [`SelectError`] wraps all of them for callers that do not care about
//! the phase.
//!
//! A filtered list element is not an error: it is reported through
//! [`Resolution::Filtered`](crate::core::accessor::Resolution) and never
//! surfaces here.
//!
//! # Example
//!
//! ```rust,ignore
//! match executor.execute(&query, &data) {
//!     Ok(response) => println!("{}", response),
//!     Err(ExecutionError::UnknownLink { link, path, .. }) => {
//!         eprintln!("'{}' does not exist at {}", link, path);
//!     }
//!     Err(e) => eprintln!("Other error: {}", e),
//! }
//! ```

use crate::core::path::FieldPath;
use thiserror::Error;

/// The main error type of the crate
#[derive(Debug, Error)]
pub enum SelectError {
    /// Field tree construction errors
    #[error(transparent)]
    Query(#[from] QueryError),

    /// Execution errors
    #[error(transparent)]
    Execution(#[from] ExecutionError),

    /// Configuration errors
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl SelectError {
    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            SelectError::Query(e) => e.error_code(),
            SelectError::Execution(e) => e.error_code(),
            SelectError::Config(e) => e.error_code(),
        }
    }
}

// =============================================================================
// Query Errors
// =============================================================================

/// A field tree that violates a construction invariant
///
/// These are caller bugs, not data conditions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// A field was given an empty name
    #[error("Field at {path} has an empty name")]
    EmptyName { path: FieldPath },

    /// A nameless field appears somewhere other than the root
    #[error("Nameless field at {path}: only the root field may omit its name")]
    NamelessField { path: FieldPath },

    /// The nameless root carries an alias
    #[error("The root field cannot have an alias (got '{alias}')")]
    AliasOnRoot { alias: String },

    /// The nameless root carries arguments
    #[error("The root field cannot have arguments (got {arguments:?})")]
    ArgumentsOnRoot { arguments: Vec<String> },

    /// A fragment was used as the root of a query
    #[error("A fragment cannot be the root of a query")]
    FragmentRoot,

    /// Two sibling fields produce the same response key
    #[error("Duplicate response key '{key}' in selection set at {path}")]
    DuplicateKey { key: String, path: FieldPath },
}

impl QueryError {
    pub fn error_code(&self) -> &'static str {
        match self {
            QueryError::EmptyName { .. } => "EMPTY_FIELD_NAME",
            QueryError::NamelessField { .. } => "NAMELESS_FIELD",
            QueryError::AliasOnRoot { .. } => "ALIAS_ON_ROOT",
            QueryError::ArgumentsOnRoot { .. } => "ARGUMENTS_ON_ROOT",
            QueryError::FragmentRoot => "FRAGMENT_ROOT",
            QueryError::DuplicateKey { .. } => "DUPLICATE_RESPONSE_KEY",
        }
    }
}

// =============================================================================
// Execution Errors
// =============================================================================

/// A fatal condition met while executing a query
///
/// Any of these aborts the whole execution; no partial response is returned.
#[derive(Debug, Error)]
pub enum ExecutionError {
    /// The link exists neither as a key nor as a member of the node
    #[error("Unknown link '{link}' on {node_type} at {path}")]
    UnknownLink {
        link: String,
        node_type: String,
        path: FieldPath,
    },

    /// An invocable link returned an error
    #[error("Resolver '{link}' failed at {path}: {source}")]
    Invocation {
        link: String,
        path: FieldPath,
        #[source]
        source: anyhow::Error,
    },

    /// A scalar field resolved to a record, which has no selection to render it
    #[error("Field at {path} resolved to a {type_name} record and needs a selection set")]
    LeafExpected { type_name: String, path: FieldPath },

    /// The query nests deeper than the configured limit
    #[error("Maximum depth of {max_depth} exceeded at {path}")]
    DepthLimitExceeded { max_depth: usize, path: FieldPath },
}

impl ExecutionError {
    pub fn error_code(&self) -> &'static str {
        match self {
            ExecutionError::UnknownLink { .. } => "UNKNOWN_LINK",
            ExecutionError::Invocation { .. } => "INVOCATION_FAILED",
            ExecutionError::LeafExpected { .. } => "LEAF_EXPECTED",
            ExecutionError::DepthLimitExceeded { .. } => "DEPTH_LIMIT_EXCEEDED",
        }
    }

    /// The path of the field being executed when the error occurred
    pub fn path(&self) -> &FieldPath {
        match self {
            ExecutionError::UnknownLink { path, .. }
            | ExecutionError::Invocation { path, .. }
            | ExecutionError::LeafExpected { path, .. }
            | ExecutionError::DepthLimitExceeded { path, .. } => path,
        }
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to executor configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error while reading a configuration file
    #[error("Failed to read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The configuration is not valid YAML for the expected shape
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// A value is out of its accepted range
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl ConfigError {
    pub fn error_code(&self) -> &'static str {
        match self {
            ConfigError::Io { .. } => "CONFIG_IO_ERROR",
            ConfigError::Parse(_) => "CONFIG_PARSE_ERROR",
            ConfigError::InvalidValue { .. } => "CONFIG_INVALID_VALUE",
        }
    }
}
