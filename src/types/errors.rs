use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Catalog unavailable: {0}")]
    CatalogUnavailable(String),
    #[error("Unresolved {category} reference: {name}")]
    UnresolvedReference { name: String, category: String },
    #[error("Unsupported composite shape: {0} components")]
    UnsupportedCompositeShape(usize),
    #[error("Merge failure: {0}")]
    MergeFailure(String),
    #[error("Config error: {0}")]
    Config(String),
}

impl ImportError {
    /// Whether the import can continue after this error (the reference is
    /// dropped and a warning logged) or must abort.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ImportError::UnresolvedReference { .. }
                | ImportError::UnsupportedCompositeShape(_)
                | ImportError::MergeFailure(_)
        )
    }
}

impl From<serde_json::Error> for ImportError {
    fn from(error: serde_json::Error) -> Self {
        ImportError::Config(error.to_string())
    }
}

impl Serialize for ImportError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.to_string().as_ref())
    }
}

pub type ImportResult<T> = Result<T, ImportError>;

#[cfg(test)]
#[path = "tests/errors_tests.rs"]
mod tests;
