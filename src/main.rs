//! Lona Compiler CLI
//!
//! ```bash
//! # Convert a whole workspace
//! lonac workspace swift ./design ./generated
//!
//! # Convert one component to stdout
//! lonac component js ./design/Button.component --framework reactdom
//!
//! # Convert token files (stdin when no path is given)
//! cat colors.json | lonac colors xml
//! lonac textstyles js ./design/textStyles.json
//! ```

use anyhow::{ensure, Context, Result};
use clap::{Parser, Subcommand};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use lona_compiler::discovery::is_component_file;
use lona_compiler::tokens::ColorSet;
use lona_compiler::{
    convert_colors, convert_component, convert_text_styles, convert_workspace, resolve_context,
    Framework, Target, Workspace,
};

#[derive(Parser)]
#[command(name = "lonac")]
#[command(version)]
#[command(about = "Converts Lona design workspaces into platform source code")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log per-file progress (overridden by LONA_LOG)
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert every token, component and asset in a workspace
    Workspace {
        #[arg(value_enum)]
        target: Target,

        /// Workspace root (must contain colors.json)
        workspace: PathBuf,

        /// Output directory, created if missing
        output: PathBuf,

        #[arg(long, value_enum)]
        framework: Option<Framework>,
    },

    /// Convert a single component and print it
    Component {
        #[arg(value_enum)]
        target: Target,

        path: PathBuf,

        #[arg(long, value_enum)]
        framework: Option<Framework>,

        /// Workspace root (located from the component path if omitted)
        #[arg(long)]
        workspace: Option<PathBuf>,
    },

    /// Convert a color token file and print it
    Colors {
        #[arg(value_enum)]
        target: Target,

        /// Input file (reads stdin if not provided)
        path: Option<PathBuf>,
    },

    /// Convert a text style file and print it
    Textstyles {
        #[arg(value_enum)]
        target: Target,

        /// Input file (reads stdin if not provided)
        path: Option<PathBuf>,

        #[arg(long, value_enum)]
        framework: Option<Framework>,

        /// Workspace whose colors the styles refer to
        #[arg(long)]
        workspace: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_env("LONA_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Workspace {
            target,
            workspace,
            output,
            framework,
        } => {
            let workspace = Workspace::open(&workspace)?;
            let ctx = resolve_context(target, framework, Some(&workspace))?;
            let report = convert_workspace(&workspace, &ctx, &output)
                .with_context(|| format!("converting {}", workspace.root().display()))?;
            if report.has_failures() {
                tracing::warn!(
                    failed = report.failures.len(),
                    components = report.discovered(),
                    "some files were not converted"
                );
            }
        }
        Commands::Component {
            target,
            path,
            framework,
            workspace,
        } => {
            ensure!(
                is_component_file(&path),
                "{} is not a .component file",
                path.display()
            );
            let workspace = match workspace {
                Some(root) => Workspace::open(&root)?,
                None => Workspace::locate(&path)?,
            };
            let ctx = resolve_context(target, framework, Some(&workspace))?;
            let output = convert_component(&ctx, &path, Some(&workspace))
                .with_context(|| format!("converting {}", path.display()))?;
            print!("{output}");
        }
        Commands::Colors { target, path } => {
            let ctx = resolve_context(target, None, None)?;
            let raw = read_input(path.as_deref())?;
            print!("{}", convert_colors(&ctx, &raw)?);
        }
        Commands::Textstyles {
            target,
            path,
            framework,
            workspace,
        } => {
            let raw = read_input(path.as_deref())?;
            let workspace = match (workspace, &path) {
                (Some(root), _) => Workspace::open(&root)?,
                (None, Some(path)) => Workspace::locate(path)?,
                (None, None) => Workspace::locate(&std::env::current_dir()?)?,
            };
            let ctx = resolve_context(target, framework, Some(&workspace))?;
            let colors = ColorSet::parse(&workspace.read_colors()?)
                .with_context(|| format!("reading {}", workspace.colors_path().display()))?;
            print!("{}", convert_text_styles(&ctx, &colors, &raw)?);
        }
    }
    Ok(())
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display())),
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("reading standard input")?;
            Ok(buf)
        }
    }
}
