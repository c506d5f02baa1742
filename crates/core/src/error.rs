//! Error types for snapshot loading, translation and code generation.

use std::path::PathBuf;

use thiserror::Error;

/// Result alias used throughout the generator.
pub type Result<T> = std::result::Result<T, GenError>;

/// Errors that abort a generation run.
///
/// Every variant is fatal: the run stops and no output is produced.
#[derive(Error, Debug)]
pub enum GenError {
    // =========================================================================
    // Snapshot Errors
    // =========================================================================
    /// The snapshot file could not be read.
    #[error("Failed to read model snapshot '{}': {message}", path.display())]
    SnapshotRead {
        /// Snapshot file.
        path: PathBuf,
        /// Underlying I/O error.
        message: String,
    },

    /// The snapshot is not valid JSON or violates the descriptor model.
    #[error("Failed to parse model snapshot: {0}")]
    SnapshotParse(#[from] serde_json::Error),

    // =========================================================================
    // Translation Errors
    // =========================================================================
    /// A named reference to a type missing from the snapshot.
    #[error("{path}: reference to unknown type '{target}'")]
    DanglingReference {
        /// `Type.member` or `Controller.Action(param)` holding the reference.
        path: String,
        /// `namespace.name` of the missing type.
        target: String,
    },

    /// A builtin name or type shape the translator cannot map.
    #[error("{path}: unrecognized type shape '{name}'")]
    UnrecognizedType {
        /// Where the shape was found.
        path: String,
        /// The offending name.
        name: String,
    },

    /// A generic type instantiated with the wrong number of arguments.
    #[error("{path}: type '{target}' takes {expected} generic argument(s) but {found} were given")]
    GenericArity {
        /// Where the instantiation was found.
        path: String,
        /// `namespace.name` of the generic type.
        target: String,
        /// Declared generic parameters.
        expected: usize,
        /// Supplied generic arguments.
        found: usize,
    },

    /// An action that cannot be bound to a client method.
    #[error("{path}: {message}")]
    Action {
        /// `Controller.Action`, optionally with `(param)`.
        path: String,
        /// What is wrong with the action.
        message: String,
    },

    /// Two backend identities map to the same generated declaration.
    #[error("{first} and {second} both generate '{name}'")]
    NameCollision {
        /// Qualified client name, e.g. `Demo_Client.Person`.
        name: String,
        /// The identity placed first.
        first: String,
        /// The identity that collided with it.
        second: String,
    },

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid policy bits or options file.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl GenError {
    /// A [`GenError::Action`] for the action at `path`.
    pub fn action(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Action {
            path: path.into(),
            message: message.into(),
        }
    }
}
