use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use crate::config::resolve::load_config;
use crate::core::workspace::Workspace;
use crate::error::{Result, SvcGraphError};
use crate::graph::views::{adjacency_for, directional_adjacency, node_link, principal_matrix};
use crate::graph::viz;
use crate::util::output::{self, Verbosity};
use crate::util::serve;

#[derive(Parser, Debug)]
#[command(name = "svcgraph")]
#[command(about = "Dependency graph of sibling services declared in go.mod files", long_about = None)]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
    #[arg(short, long, global = true)]
    pub quiet: bool,
    #[arg(long, global = true)]
    pub no_color: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Scan(ScanArgs),
    Render(RenderArgs),
    Deps(DepsArgs),
    Serve(ServeArgs),
}

#[derive(Args, Debug)]
pub struct ScanArgs {
    pub root: PathBuf,
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct RenderArgs {
    pub root: PathBuf,
    #[arg(long, default_value = "html")]
    pub format: String,
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct DepsArgs {
    pub root: PathBuf,
    pub service: String,
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    pub root: PathBuf,
    #[arg(long)]
    pub port: Option<u16>,
}

pub fn run() {
    let cli = Cli::parse();
    if cli.no_color {
        output::disable_colors();
    }
    if let Err(err) = dispatch(cli) {
        output::error(&err.to_string());
        std::process::exit(1);
    }
}

fn dispatch(cli: Cli) -> Result<()> {
    let verbosity = Verbosity {
        quiet: cli.quiet,
        verbose: cli.verbose,
    };
    match cli.command {
        Commands::Scan(args) => handle_scan(args, cli.config, verbosity),
        Commands::Render(args) => handle_render(args, cli.config, verbosity),
        Commands::Deps(args) => handle_deps(args, cli.config, verbosity),
        Commands::Serve(args) => handle_serve(args, cli.config, verbosity),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum RenderFormat {
    Html,
    Json,
    Dot,
    List,
}

fn parse_render_format(input: &str) -> Result<RenderFormat> {
    match input.to_ascii_lowercase().as_str() {
        "html" => Ok(RenderFormat::Html),
        "json" => Ok(RenderFormat::Json),
        "dot" => Ok(RenderFormat::Dot),
        "list" => Ok(RenderFormat::List),
        _ => Err(SvcGraphError::Other(anyhow::anyhow!(
            "unknown render format '{}'",
            input
        ))),
    }
}

#[derive(Serialize)]
struct ScanJson {
    service: String,
    dependencies: Vec<String>,
}

fn handle_scan(args: ScanArgs, config_path: Option<PathBuf>, verbosity: Verbosity) -> Result<()> {
    let workspace = load_workspace(&args.root, config_path, verbosity)?;

    if args.json {
        let rows: Vec<ScanJson> = workspace
            .services
            .iter()
            .map(|service| ScanJson {
                service: service.id.to_string(),
                dependencies: service
                    .dependencies
                    .iter()
                    .map(ToString::to_string)
                    .collect(),
            })
            .collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&rows).map_err(anyhow::Error::new)?
        );
        return Ok(());
    }

    for service in &workspace.services {
        println!("{} ({} deps)", service.id, service.dependencies.len());
    }
    Ok(())
}

fn handle_render(
    args: RenderArgs,
    config_path: Option<PathBuf>,
    verbosity: Verbosity,
) -> Result<()> {
    let format = parse_render_format(&args.format)?;
    let workspace = load_workspace(&args.root, config_path, verbosity)?;

    let rendered = match format {
        RenderFormat::Html => {
            let path = args
                .output
                .unwrap_or_else(|| PathBuf::from(&workspace.config.render.output));
            write_html(&workspace, &path, verbosity)?;
            return Ok(());
        }
        RenderFormat::Json => viz::render_json(&node_link(&workspace.graph))?,
        RenderFormat::Dot => viz::render_dot(&workspace.graph),
        RenderFormat::List => viz::render_list(&directional_adjacency(&workspace.graph)),
    };

    match args.output {
        Some(path) => write_output(&path, &rendered),
        None => {
            print!("{rendered}");
            Ok(())
        }
    }
}

fn handle_deps(args: DepsArgs, config_path: Option<PathBuf>, verbosity: Verbosity) -> Result<()> {
    let workspace = load_workspace(&args.root, config_path, verbosity)?;
    let entry = adjacency_for(&workspace.graph, &args.service).ok_or_else(|| {
        SvcGraphError::Other(anyhow::anyhow!("unknown service {}", args.service))
    })?;

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&entry).map_err(anyhow::Error::new)?
        );
        return Ok(());
    }

    let mut out = String::new();
    viz::render_entry(&entry, &mut out);
    print!("{out}");
    Ok(())
}

fn handle_serve(args: ServeArgs, config_path: Option<PathBuf>, verbosity: Verbosity) -> Result<()> {
    let workspace = load_workspace(&args.root, config_path, verbosity)?;
    let path = PathBuf::from(&workspace.config.render.output);
    write_html(&workspace, &path, verbosity)?;
    let port = args.port.unwrap_or(workspace.config.serve.port);
    serve::serve_blocking(path, port)
}

fn load_workspace(
    root: &Path,
    config_path: Option<PathBuf>,
    verbosity: Verbosity,
) -> Result<Workspace> {
    let config = load_config(root, config_path)?;
    let workspace = Workspace::load(root, config)?;
    report_services(&workspace, verbosity);
    Ok(workspace)
}

fn report_services(workspace: &Workspace, verbosity: Verbosity) {
    if !verbosity.shows_info() {
        return;
    }
    for service in &workspace.services {
        output::info(&format!(
            "discovered service: {} ({} deps)",
            service.id,
            service.dependencies.len()
        ));
        if verbosity.shows_detail() {
            for (idx, dep) in service.dependencies.iter().enumerate() {
                output::info(&format!("  {idx}: {dep}"));
            }
        }
    }
    let principals = workspace.graph.principals().count();
    let dangling = workspace.graph.node_count() - principals;
    if dangling > 0 {
        output::warn(&format!(
            "{dangling} referenced service(s) were not discovered and are left out of the matrix"
        ));
    }
}

fn write_html(workspace: &Workspace, path: &Path, verbosity: Verbosity) -> Result<()> {
    let template = workspace.config.render.template.as_deref().map(Path::new);
    let html = viz::render_html(&principal_matrix(&workspace.graph), template)?;
    write_output(path, &html)?;
    if verbosity.shows_info() {
        output::status("wrote", &path.display().to_string());
    }
    Ok(())
}

fn write_output(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)?;
    Ok(())
}
