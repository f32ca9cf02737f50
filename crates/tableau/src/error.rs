//! Error types for Tableau operations.
//!
//! [`TableauError`] covers everything that aborts a run: bad parameters,
//! unusable assets in strict mode, inconsistent timelines and frame export
//! failures. Recoverable problems (a missing asset) are logged and never
//! surface here.

use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TableauError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Asset `{name}` is unusable: {reason}")]
    Asset { name: String, reason: String },

    #[error("Timeline error: {0}")]
    Timeline(String),

    #[error("Export error: {0}")]
    Export(Box<dyn std::error::Error + Send + Sync>),
}

impl From<crate::export::Error> for TableauError {
    fn from(error: crate::export::Error) -> Self {
        Self::Export(Box::new(error))
    }
}

impl TableauError {
    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub(crate) fn timeline(message: impl Into<String>) -> Self {
        Self::Timeline(message.into())
    }
}
