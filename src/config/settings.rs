use std::collections::HashSet;

use serde::Deserialize;

use crate::manifest::ManifestPattern;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GraphConfig {
    #[serde(default)]
    pub scan: ScanSettings,
    #[serde(default)]
    pub manifest: ManifestSettings,
    #[serde(default)]
    pub render: RenderSettings,
    #[serde(default)]
    pub serve: ServeSettings,
}

impl GraphConfig {
    pub fn manifest_pattern(&self) -> ManifestPattern {
        ManifestPattern::new(&self.manifest.registry, &self.scan.service_prefix)
    }

    /// Names that never become nodes: the umbrella entry plus the configured exclusions.
    pub fn excluded_names(&self) -> HashSet<String> {
        let mut names: HashSet<String> = self.scan.exclude.iter().cloned().collect();
        let umbrella = self.scan.umbrella();
        if !umbrella.is_empty() {
            names.insert(umbrella.to_string());
        }
        names
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScanSettings {
    #[serde(default = "default_service_prefix")]
    pub service_prefix: String,
    /// Umbrella entry to skip; unset means the entry named exactly `service_prefix`.
    #[serde(default)]
    pub root_service: Option<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
    #[serde(default = "default_manifest_file")]
    pub manifest: String,
    #[serde(default)]
    pub jobs: Option<usize>,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            service_prefix: default_service_prefix(),
            root_service: None,
            exclude: Vec::new(),
            manifest: default_manifest_file(),
            jobs: None,
        }
    }
}

impl ScanSettings {
    pub fn umbrella(&self) -> &str {
        self.root_service.as_deref().unwrap_or(&self.service_prefix)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ManifestSettings {
    #[serde(default = "default_registry")]
    pub registry: String,
}

impl Default for ManifestSettings {
    fn default() -> Self {
        Self {
            registry: default_registry(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RenderSettings {
    #[serde(default)]
    pub template: Option<String>,
    #[serde(default = "default_output")]
    pub output: String,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            template: None,
            output: default_output(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServeSettings {
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServeSettings {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

fn default_service_prefix() -> String {
    "go-service".to_string()
}

fn default_manifest_file() -> String {
    "go.mod".to_string()
}

fn default_registry() -> String {
    "github.com/northvolt".to_string()
}

fn default_output() -> String {
    "graph.html".to_string()
}

fn default_port() -> u16 {
    5555
}
