use thiserror::Error;

#[derive(Error, Debug)]
pub enum LedgerlinkError {
    #[error("Config error: {0}")]
    Config(String),
    #[error("Data access error: {0}")]
    DataAccess(String),
    #[error("Internal invariant violated: {0}")]
    Invariant(String),
}

pub type Result<T> = std::result::Result<T, LedgerlinkError>;

// Helper conversions
impl From<rusqlite::Error> for LedgerlinkError {
    fn from(e: rusqlite::Error) -> Self { Self::DataAccess(e.to_string()) }
}
impl From<r2d2::Error> for LedgerlinkError {
    fn from(e: r2d2::Error) -> Self { Self::DataAccess(e.to_string()) }
}
impl From<config::ConfigError> for LedgerlinkError {
    fn from(e: config::ConfigError) -> Self { Self::Config(e.to_string()) }
}
