use thiserror::Error;

/// Errors that abort a prediction run.
///
/// Wild-type residues without descriptor entries are not errors; those rows are
/// simply dropped by the descriptor join.
#[derive(Debug, Error)]
pub enum SimbaError {
    /// The structure file could not be retrieved or located.
    #[error("PDB {name} not available: {reason}")]
    ResourceUnavailable { name: String, reason: String },

    /// A residue type is missing from one of the reference tables.
    #[error("residue type {residue_type:?} not found in the {table} table")]
    LookupFailure {
        table: &'static str,
        residue_type: String,
    },

    /// The structure file could not be parsed.
    #[error("failed to read structure: {0}")]
    Structure(String),

    /// The descriptor table is malformed.
    #[error("invalid descriptor table: {0}")]
    Descriptor(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Polars(#[from] polars::error::PolarsError),

    #[error(transparent)]
    Download(#[from] reqwest::Error),
}

/// Result type of all fallible operations in this crate.
pub type Result<T> = std::result::Result<T, SimbaError>;
