pub mod generator;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use generator::{Generator, Summary};
use hxcomp_core::TokenCodec;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "hxcomp", version, about = "hxcomp component tooling")]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Clone, Subcommand)]
pub enum CliCommand {
    /// Write `<stem>_hx.rs` companions for component sources.
    Generate {
        #[arg(default_value = ".")]
        paths: Vec<PathBuf>,
        /// Report what would change without writing.
        #[arg(long)]
        dry_run: bool,
    },
    /// Delete generated companions.
    Clean {
        #[arg(default_value = ".")]
        paths: Vec<PathBuf>,
        #[arg(long)]
        dry_run: bool,
    },
    /// Print a fresh random secret for `HXCOMP_SECRET`.
    Keygen,
    Version,
}

pub fn run_from_env() -> anyhow::Result<()> {
    run(Cli::parse())
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    init_tracing(cli.verbose);

    match cli.command {
        CliCommand::Generate { paths, dry_run } => {
            let summary = Generator::new()
                .dry_run(dry_run)
                .generate(&paths)
                .context("generation failed")?;
            print_generated(&summary, dry_run);
            Ok(())
        }
        CliCommand::Clean { paths, dry_run } => {
            let summary = Generator::new()
                .dry_run(dry_run)
                .clean(&paths)
                .context("clean failed")?;
            let verb = if dry_run { "would remove" } else { "removed" };
            for path in &summary.removed {
                println!("{verb} {}", path.display());
            }
            println!("{} file(s) {verb}", summary.removed.len());
            Ok(())
        }
        CliCommand::Keygen => {
            println!("{}", TokenCodec::generate_secret());
            Ok(())
        }
        CliCommand::Version => {
            println!("hxcomp {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn print_generated(summary: &Summary, dry_run: bool) {
    let verb = if dry_run { "would write" } else { "wrote" };
    for path in &summary.written {
        println!("{verb} {}", path.display());
    }
    println!(
        "Scanned: {}  Written: {}  Unchanged: {}",
        summary.scanned,
        summary.written.len(),
        summary.unchanged.len()
    );
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_defaults_to_current_dir() {
        let cli = Cli::try_parse_from(["hxcomp", "generate"]).unwrap();
        match cli.command {
            CliCommand::Generate { paths, dry_run } => {
                assert_eq!(paths, vec![PathBuf::from(".")]);
                assert!(!dry_run);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn clean_accepts_paths_and_dry_run() {
        let cli = Cli::try_parse_from(["hxcomp", "-v", "clean", "a", "b", "--dry-run"]).unwrap();
        assert_eq!(cli.verbose, 1);
        match cli.command {
            CliCommand::Clean { paths, dry_run } => {
                assert_eq!(paths, vec![PathBuf::from("a"), PathBuf::from("b")]);
                assert!(dry_run);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn unknown_command_is_rejected() {
        assert!(Cli::try_parse_from(["hxcomp", "serve"]).is_err());
    }

    #[test]
    fn generate_ignores_files_without_components() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("empty.rs");
        std::fs::write(&source, "pub struct Plain;\n").unwrap();
        let cli = Cli::try_parse_from([
            "hxcomp".into(),
            "generate".into(),
            dir.path().as_os_str().to_owned(),
        ])
        .unwrap();
        run(cli).unwrap();
        assert!(!dir.path().join("empty_hx.rs").exists());
    }
}
