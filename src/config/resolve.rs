use std::env;
use std::path::{Path, PathBuf};

use crate::config::{ConfigError, GraphConfig};

pub const CONFIG_FILE_NAME: &str = ".svcgraph.toml";

/// Picks the config file for a scan root: explicit path, then `SVCGRAPH_CONFIG`, then
/// `<root>/.svcgraph.toml`. `None` means built-in defaults.
pub fn resolve_config_path(root: &Path, explicit: Option<PathBuf>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path);
    }

    if let Ok(path) = env::var("SVCGRAPH_CONFIG") {
        return Some(PathBuf::from(path));
    }

    let candidate = root.join(CONFIG_FILE_NAME);
    candidate.is_file().then_some(candidate)
}

pub fn load_config(root: &Path, explicit: Option<PathBuf>) -> Result<GraphConfig, ConfigError> {
    let mut config = match resolve_config_path(root, explicit) {
        Some(path) => load_config_file(&path)?,
        None => GraphConfig::default(),
    };
    apply_overrides(&mut config, |key| env::var(key).ok())?;
    Ok(config)
}

pub fn load_config_file(path: &Path) -> Result<GraphConfig, ConfigError> {
    if !path.is_file() {
        return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
    }

    let contents = std::fs::read_to_string(path)?;
    toml::from_str(&contents).map_err(|source| ConfigError::Toml {
        path: path.to_path_buf(),
        source,
    })
}

pub fn apply_overrides<F>(config: &mut GraphConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(prefix) = lookup("SVCGRAPH_SERVICE_PREFIX") {
        config.scan.service_prefix = prefix;
    }
    if let Some(registry) = lookup("SVCGRAPH_REGISTRY") {
        config.manifest.registry = registry;
    }
    if let Some(port) = lookup("SVCGRAPH_PORT") {
        config.serve.port = port.parse().map_err(|_| ConfigError::InvalidOverride {
            key: "SVCGRAPH_PORT".to_string(),
            value: port.clone(),
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::fs;
    use std::time::{SystemTime, UNIX_EPOCH};

    use crate::config::resolve::{apply_overrides, load_config_file, resolve_config_path};
    use crate::config::{ConfigError, GraphConfig};

    fn unique_temp_dir(prefix: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock before epoch")
            .as_nanos();
        let pid = std::process::id();
        std::env::temp_dir().join(format!("svcgraph-{prefix}-{pid}-{nanos}"))
    }

    #[test]
    fn explicit_path_wins() {
        let root = unique_temp_dir("config-explicit");
        let explicit = root.join("custom.toml");
        assert_eq!(
            resolve_config_path(&root, Some(explicit.clone())),
            Some(explicit)
        );
    }

    #[test]
    fn loads_file_and_reports_parse_errors() {
        let root = unique_temp_dir("config-load");
        fs::create_dir_all(&root).expect("create root");
        let good = root.join("good.toml");
        fs::write(&good, "[serve]\nport = 8080\n").expect("write good config");
        let config = load_config_file(&good).expect("load config");
        assert_eq!(config.serve.port, 8080);

        let bad = root.join("bad.toml");
        fs::write(&bad, "[serve]\nport = \"nope\"\n").expect("write bad config");
        assert!(matches!(
            load_config_file(&bad),
            Err(ConfigError::Toml { .. })
        ));

        assert!(matches!(
            load_config_file(&root.join("missing.toml")),
            Err(ConfigError::ConfigNotFound(_))
        ));

        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn overrides_replace_configured_values() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("SVCGRAPH_SERVICE_PREFIX", "svc"),
            ("SVCGRAPH_REGISTRY", "example.com/acme"),
            ("SVCGRAPH_PORT", "9000"),
        ]);
        let mut config = GraphConfig::default();
        apply_overrides(&mut config, |key| env.get(key).map(|v| v.to_string()))
            .expect("apply overrides");
        assert_eq!(config.scan.service_prefix, "svc");
        assert_eq!(config.manifest.registry, "example.com/acme");
        assert_eq!(config.serve.port, 9000);
    }

    #[test]
    fn invalid_port_override_is_rejected() {
        let mut config = GraphConfig::default();
        let result = apply_overrides(&mut config, |key| {
            (key == "SVCGRAPH_PORT").then(|| "not-a-port".to_string())
        });
        assert!(matches!(
            result,
            Err(ConfigError::InvalidOverride { .. })
        ));
    }
}
