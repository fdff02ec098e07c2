use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::config::ScanSettings;
use crate::core::service::{Service, ServiceId};
use crate::error::{Result, SvcGraphError};
use crate::manifest::ManifestParser;
use crate::util::parallel;

/// A service directory and the raw bytes of its manifest.
#[derive(Debug, Clone)]
pub struct DiscoveredManifest {
    pub name: String,
    pub content: Vec<u8>,
}

/// Directory names under `root` that count as services, sorted by name.
pub fn service_dirs(
    root: &Path,
    settings: &ScanSettings,
    excluded: &HashSet<String>,
) -> Result<Vec<String>> {
    let entries = fs::read_dir(root).map_err(|source| SvcGraphError::Access {
        path: root.to_path_buf(),
        source,
    })?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| SvcGraphError::Access {
            path: root.to_path_buf(),
            source,
        })?;
        if !entry.path().is_dir() {
            continue;
        }
        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            continue;
        };
        if !name.starts_with(&settings.service_prefix) || excluded.contains(&name) {
            continue;
        }
        names.push(name);
    }
    names.sort();
    Ok(names)
}

pub fn read_manifests(
    root: &Path,
    settings: &ScanSettings,
    excluded: &HashSet<String>,
) -> Result<Vec<DiscoveredManifest>> {
    let names = service_dirs(root, settings, excluded)?;
    let results = parallel::run_in_parallel(names, settings.jobs, |name| {
        read_manifest(root, &settings.manifest, name)
    });
    results.into_iter().collect()
}

fn read_manifest(root: &Path, manifest: &str, name: String) -> Result<DiscoveredManifest> {
    let path = root.join(&name).join(manifest);
    let content = fs::read(&path).map_err(|source| SvcGraphError::Access { path, source })?;
    Ok(DiscoveredManifest { name, content })
}

/// Parses every manifest; the first malformed one aborts the whole batch.
pub fn parse_services(
    manifests: Vec<DiscoveredManifest>,
    parser: &dyn ManifestParser,
) -> Result<Vec<Service>> {
    manifests
        .into_iter()
        .map(|manifest| -> Result<Service> {
            let deps = parser
                .referenced_services(&manifest.content)
                .map_err(|source| SvcGraphError::Manifest {
                    service: manifest.name.clone(),
                    source,
                })?;
            Ok(Service {
                id: ServiceId::new(manifest.name),
                dependencies: deps.into_iter().map(ServiceId::new).collect(),
            })
        })
        .collect()
}
