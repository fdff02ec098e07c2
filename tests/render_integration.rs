use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

struct TestRepos {
    root: PathBuf,
}

impl TestRepos {
    fn new(prefix: &str) -> Self {
        let root = unique_temp_dir(prefix);
        fs::create_dir_all(&root).expect("create repos root");

        Self::write_service(
            &root,
            "go-service-a",
            &[("go-service-b", "1.0.0"), ("go-service-c", "2.1.0")],
        );
        Self::write_service(&root, "go-service-b", &[("go-service-c", "2.1.0")]);
        Self::write_service(&root, "go-service", &[("go-service-a", "0.1.0")]);
        fs::create_dir_all(root.join("unrelated")).expect("create unrelated dir");

        Self { root }
    }

    fn write_service(root: &Path, name: &str, deps: &[(&str, &str)]) {
        let dir = root.join(name);
        fs::create_dir_all(&dir).expect("create service dir");
        let requires = deps
            .iter()
            .map(|(dep, version)| format!("\tgithub.com/northvolt/{dep} v{version}"))
            .collect::<Vec<_>>()
            .join("\n");
        let body = format!(
            "module github.com/northvolt/{name}\n\ngo 1.21\n\nrequire (\n{requires}\n\tgithub.com/stretchr/testify v1.8.4\n)\n"
        );
        fs::write(dir.join("go.mod"), body).expect("write go.mod");
    }

    fn run(&self, args: &[&str]) -> Output {
        self.run_with_env(args, &[])
    }

    fn run_with_env(&self, args: &[&str], env: &[(&str, &str)]) -> Output {
        let mut cmd = Command::new(svcgraph_bin());
        cmd.current_dir(&self.root)
            .env_remove("SVCGRAPH_CONFIG")
            .env_remove("SVCGRAPH_SERVICE_PREFIX")
            .env_remove("SVCGRAPH_REGISTRY")
            .env_remove("SVCGRAPH_PORT")
            .args(args);
        for (key, value) in env {
            cmd.env(key, value);
        }
        cmd.output().expect("run svcgraph")
    }

    fn run_ok(&self, args: &[&str]) -> (String, String) {
        self.run_ok_with_env(args, &[])
    }

    fn run_ok_with_env(&self, args: &[&str], env: &[(&str, &str)]) -> (String, String) {
        let output = self.run_with_env(args, env);
        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        assert!(
            output.status.success(),
            "svcgraph {} failed\nstdout:\n{stdout}\nstderr:\n{stderr}",
            args.join(" ")
        );
        (stdout, stderr)
    }

    fn root_arg(&self) -> String {
        self.root.display().to_string()
    }
}

impl Drop for TestRepos {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.root);
    }
}

fn svcgraph_bin() -> PathBuf {
    if let Ok(path) = std::env::var("CARGO_BIN_EXE_svcgraph") {
        return PathBuf::from(path);
    }

    let current_exe = std::env::current_exe().expect("resolve current test binary path");
    let target_dir = current_exe
        .parent()
        .and_then(|path| path.parent())
        .expect("derive cargo target dir from test binary path");
    let bin_name = if cfg!(windows) {
        "svcgraph.exe"
    } else {
        "svcgraph"
    };
    let fallback = target_dir.join(bin_name);

    if fallback.is_file() {
        fallback
    } else {
        panic!(
            "CARGO_BIN_EXE_svcgraph is not set and fallback binary not found at {}",
            fallback.display()
        );
    }
}

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before unix epoch")
        .as_nanos();
    let pid = std::process::id();
    std::env::temp_dir().join(format!("svcgraph-{prefix}-{pid}-{nanos}"))
}

#[test]
fn scan_lists_services_and_logs_discovery() {
    let repos = TestRepos::new("scan");
    let root = repos.root_arg();
    let (stdout, stderr) = repos.run_ok(&["scan", &root, "-v"]);

    assert_eq!(stdout, "go-service-a (2 deps)\ngo-service-b (1 deps)\n");
    assert!(stderr.contains("discovered service: go-service-a (2 deps)"));
    assert!(stderr.contains("  0: go-service-b"));
    assert!(!stdout.contains("go-service ("));
}

#[test]
fn render_json_emits_node_link_document() {
    let repos = TestRepos::new("render-json");
    let root = repos.root_arg();
    let (stdout, _) = repos.run_ok(&["render", &root, "--format", "json", "--quiet"]);

    let value: serde_json::Value = serde_json::from_str(&stdout).expect("parse json output");
    let ids: Vec<&str> = value["nodes"]
        .as_array()
        .expect("nodes array")
        .iter()
        .map(|node| node["id"].as_str().expect("node id"))
        .collect();
    assert_eq!(ids, vec!["go-service-a", "go-service-b", "go-service-c"]);
    assert_eq!(value["links"].as_array().expect("links array").len(), 3);

    let (again, _) = repos.run_ok(&["render", &root, "--format", "json", "--quiet"]);
    assert_eq!(stdout, again);
}

#[test]
fn render_html_writes_matrix_page() {
    let repos = TestRepos::new("render-html");
    let root = repos.root_arg();
    repos.run_ok(&["render", &root]);

    let html = fs::read_to_string(repos.root.join("graph.html")).expect("read graph.html");
    assert!(html.contains(r#"["go-service-a","go-service-b"]"#));
    assert!(html.contains("[[0,1],[0,0]]"));
}

#[test]
fn deps_shows_directional_entry() {
    let repos = TestRepos::new("deps");
    let root = repos.root_arg();
    let (stdout, _) = repos.run_ok(&["deps", &root, "go-service-c", "--json", "-q"]);

    let value: serde_json::Value = serde_json::from_str(&stdout).expect("parse deps json");
    assert_eq!(value["id"], "go-service-c");
    assert_eq!(value["outbound"].as_array().expect("outbound").len(), 0);
    assert_eq!(value["inbound"].as_array().expect("inbound").len(), 2);
}

#[test]
fn malformed_manifest_aborts_without_output() {
    let repos = TestRepos::new("malformed");
    fs::write(
        repos.root.join("go-service-b").join("go.mod"),
        "module github.com/northvolt/go-service-b\n\nrequire github.com/northvolt/go-service-c vmain\n",
    )
    .expect("overwrite go.mod");
    let root = repos.root_arg();
    let output = repos.run(&["render", &root]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("go-service-b"), "{stderr}");
    assert!(!repos.root.join("graph.html").exists());
}

#[test]
fn config_file_exclusions_drop_services() {
    let repos = TestRepos::new("config");
    fs::write(
        repos.root.join(".svcgraph.toml"),
        "[scan]\nexclude = [\"go-service-b\"]\n",
    )
    .expect("write config");
    let root = repos.root_arg();
    let (stdout, _) = repos.run_ok(&["render", &root, "--format", "dot", "-q"]);

    assert!(stdout.contains("\"go-service-a\" -> \"go-service-c\";"));
    assert!(!stdout.contains("go-service-b"));
}

#[test]
fn prefix_override_also_moves_the_umbrella_exclusion() {
    let repos = TestRepos::new("prefix-umbrella");
    TestRepos::write_service(&repos.root, "svc", &[("svc-a", "1.0.0")]);
    TestRepos::write_service(&repos.root, "svc-a", &[]);
    let root = repos.root_arg();
    let (stdout, _) = repos.run_ok_with_env(
        &["render", &root, "--format", "json", "-q"],
        &[("SVCGRAPH_SERVICE_PREFIX", "svc")],
    );

    let value: serde_json::Value = serde_json::from_str(&stdout).expect("parse json output");
    let ids: Vec<&str> = value["nodes"]
        .as_array()
        .expect("nodes array")
        .iter()
        .map(|node| node["id"].as_str().expect("node id"))
        .collect();
    assert_eq!(ids, vec!["svc-a"]);
    assert!(value["links"].as_array().expect("links array").is_empty());
}
