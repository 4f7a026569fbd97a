//! Command-line interface for codebase-context.
//!
//! Flattens a directory, package or GitHub repository into a single text
//! file and keeps the filter settings in a TOML file for the next run.

use clap::Parser;
use codebase_context::{GenerateRequest, Generator, Outcome};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::exit;

/// codebase-context — flatten a codebase into one file
#[derive(Parser)]
#[command(name = "codebase-context", version, about, long_about = None)]
struct Cli {
    /// Directory, package name or GitHub repository URL
    module: String,

    /// Output file (default: <root>/<name>_codebase.txt)
    #[arg(long)]
    outfile: Option<PathBuf>,

    /// File endings to include, added to the stored ones
    #[arg(long, num_args = 0.., default_values_t = vec!["py".to_string()])]
    endings: Vec<String>,

    /// Settings file (default: <root>/generate_codebase.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Replace an existing output file without asking
    #[arg(long)]
    overwrite: bool,

    /// Subdirectories to walk instead of the whole root
    #[arg(long, num_args = 0..)]
    subdirs: Option<Vec<String>>,

    /// Include hidden files and directories
    #[arg(long, conflicts_with = "ignore_hidden")]
    hidden: bool,

    /// Exclude hidden files and directories
    #[arg(long)]
    ignore_hidden: bool,

    /// Do not write the merged settings back to the settings file
    #[arg(long)]
    no_save_config: bool,

    /// Emit each file once when subdirectories overlap
    #[arg(long)]
    dedupe: bool,
}

impl Cli {
    fn into_request(self) -> GenerateRequest {
        let ignore_hidden = match (self.hidden, self.ignore_hidden) {
            (true, _) => Some(false),
            (_, true) => Some(true),
            _ => None,
        };
        GenerateRequest {
            outfile: self.outfile,
            endings: self.endings,
            config_path: self.config,
            ignore_hidden,
            save_config: !self.no_save_config,
            overwrite: self.overwrite,
            subdirs: self.subdirs,
            dedupe_files: self.dedupe,
            ..GenerateRequest::new(self.module)
        }
    }
}

#[cfg(feature = "logging")]
fn init_logging() {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn confirm_overwrite(path: &Path) -> bool {
    println!("Output file {} already exists", path.display());
    print!("Do you want to replace it? (y/n): ");
    if io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    match io::stdin().lock().read_line(&mut answer) {
        Ok(_) => answer.trim().eq_ignore_ascii_case("y"),
        Err(_) => false,
    }
}

fn main() {
    #[cfg(feature = "logging")]
    init_logging();

    let request = Cli::parse().into_request();
    match Generator::new().run(&request, confirm_overwrite) {
        Ok(Outcome::Written { path, report }) => {
            for rel in &report.excluded {
                println!("excluding {}", rel);
            }
            println!(
                "Wrote {} files to {}",
                report.included.len(),
                path.display()
            );
        }
        Ok(Outcome::Declined { .. }) => {
            println!("Exiting...");
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            exit(1);
        }
    }
}
