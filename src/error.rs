use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;
use crate::manifest::ManifestError;

#[derive(Debug, Error)]
pub enum SvcGraphError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("cannot read {path}: {source}")]
    Access {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("manifest of {service}: {source}")]
    Manifest {
        service: String,
        #[source]
        source: ManifestError,
    },
    #[error("manifest parser: {0}")]
    Parser(#[from] ManifestError),
    #[error("template error: {0}")]
    Template(#[from] tera::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, SvcGraphError>;
