//! bindery code generator
//!
//! Compiles OpenAPI documents into axum server bindings and reqwest clients.

use std::path::PathBuf;

use clap::Parser;
use colored::Colorize;
use tracing::Level;

use bindery_gen::config::{TargetConfig, load_targets};
use bindery_gen::errors::GeneratorError;
use bindery_gen::output::generate_and_write;

/// bindery code generator - turns OpenAPI documents into typed Rust bindings
#[derive(Parser, Debug)]
#[command(name = "bindery-gen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// OpenAPI document (YAML or JSON)
    #[arg(short, long, required_unless_present = "config")]
    spec: Option<PathBuf>,

    /// Output directory, or output file with --bundle
    #[arg(short, long, required_unless_present = "config")]
    output: Option<PathBuf>,

    /// Prefix of the generated contract, controller and client names
    #[arg(short = 'p', long)]
    name_prefix: Option<String>,

    /// Module name of the generated code
    #[arg(short, long, default_value = "api")]
    name: String,

    /// Also generate an HTTP client
    #[arg(long)]
    client: bool,

    /// Write a single file with inline modules
    #[arg(long)]
    bundle: bool,

    /// Read targets from a bindery.toml file instead of flags
    #[arg(short, long, conflicts_with_all = ["spec", "output"])]
    config: Option<PathBuf>,

    /// Print generated code without writing files
    #[arg(long)]
    dry_run: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn targets(&self) -> Result<Vec<TargetConfig>, GeneratorError> {
        if let Some(config) = &self.config {
            return load_targets(config);
        }
        let (Some(spec), Some(output)) = (&self.spec, &self.output) else {
            return Err(GeneratorError::ConfigError(
                "either --config or both --spec and --output are required".to_string(),
            ));
        };
        let mut target = TargetConfig::new(&self.name, spec, output)
            .with_client(self.client)
            .with_bundle(self.bundle);
        if let Some(prefix) = &self.name_prefix {
            target = target.with_name_prefix(prefix);
        }
        Ok(vec![target])
    }
}

fn main() -> Result<(), GeneratorError> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let targets = cli.targets()?;
    if cli.dry_run {
        eprintln!("{}", "Dry run mode - no files will be written".yellow());
    }

    for target in &targets {
        match generate_and_write(target, cli.dry_run) {
            Ok(files) if !cli.dry_run => {
                eprintln!(
                    "{} {} ({} files) -> {}",
                    "generated".green().bold(),
                    target.name,
                    files.len(),
                    target.output.display()
                );
            }
            Ok(_) => {}
            Err(e) => {
                eprintln!("{} {}: {}", "failed".red().bold(), target.name, e);
                return Err(e);
            }
        }
    }

    Ok(())
}
