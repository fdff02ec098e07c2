pub mod gomod;

use thiserror::Error;

pub use gomod::GoModParser;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("manifest is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),
    #[error("malformed dependency on line {line}: {content}")]
    Malformed { line: usize, content: String },
    #[error("invalid manifest pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Registry path plus service-name prefix identifying sibling services,
/// e.g. `github.com/northvolt` and `go-service`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestPattern {
    pub registry: String,
    pub service_prefix: String,
}

impl ManifestPattern {
    pub fn new(registry: impl Into<String>, service_prefix: impl Into<String>) -> Self {
        Self {
            registry: registry.into().trim_end_matches('/').to_string(),
            service_prefix: service_prefix.into(),
        }
    }

    /// Leading text that marks a line as a sibling dependency declaration.
    pub fn candidate_prefix(&self) -> String {
        format!("{}/{}-", self.registry, self.service_prefix)
    }
}

pub trait ManifestParser: Send + Sync {
    /// Referenced sibling services in order of appearance, duplicates kept.
    fn referenced_services(&self, content: &[u8]) -> Result<Vec<String>, ManifestError>;
}
