use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeckForgeError {
    /// A master/user table row or a detail-map entry that must exist is
    /// missing. Always fatal: it signals inconsistent game data.
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration Error: {0}")]
    Config(String),

    /// No legal deck can be built from the candidate pool.
    #[error("Infeasible: {0}")]
    Infeasible(String),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Data Provider Error: {0}")]
    Provider(String),
}

pub type DfResult<T> = Result<T, DeckForgeError>;
