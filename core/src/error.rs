use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Cache has no coins left")]
    EmptyCache,
    #[error("Player has no coins to deposit")]
    EmptyInventory,
    #[error("No visible cache at this cell")]
    CacheNotVisible,
    #[error("Cache memento could not be parsed")]
    MalformedMemento,
    #[error("Saved game record could not be parsed")]
    MalformedRecord,
    #[error("Could not write to storage")]
    Storage,
}

pub type Result<T> = core::result::Result<T, GameError>;
