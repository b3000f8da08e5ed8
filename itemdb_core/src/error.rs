use std::path::PathBuf;

use crate::types::SuffixType;

/// Errors surfaced by the database builder.
///
/// None of these abort a batch: the orchestrator logs and skips the item
/// that produced them. They are fatal only for single-item entry points.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Identity fields (id, name) could not be located in the document.
    #[error("malformed document for item {id}: {reason}")]
    MalformedDocument { id: u32, reason: String },

    /// A cached document pair is missing for an item on the list.
    #[error("no cached document at {path}")]
    MissingDocument { path: PathBuf },

    /// Two catalog entries share a suffix type and bonus list.
    #[error("duplicate suffix definition: {id_a} and {id_b} are both {suffix_type:?}")]
    DuplicateSuffix {
        id_a: u32,
        id_b: u32,
        suffix_type: SuffixType,
    },

    /// An item name in a curated list matched nothing in the master list.
    #[error("unknown item name: {name}")]
    UnknownItem { name: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("worker pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T> = std::result::Result<T, Error>;
