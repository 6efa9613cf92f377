#![forbid(unsafe_code)]

//! Sigtuna CLI — XML canonicalization (C14N 1.0, Exclusive C14N 1.0).

use clap::{Parser, Subcommand};
use sha2::{Digest, Sha256};
use sigtuna_c14n::{parse_prefix_list, C14nMode};
use sigtuna_core::Error;
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(
    name = "sigtuna",
    about = "Sigtuna — Pure Rust XML Canonicalization (C14N)",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Canonicalize an XML document
    C14n {
        /// Input XML file
        file: PathBuf,

        /// Use Exclusive C14N 1.0 instead of Canonical XML 1.0
        #[arg(short = 'x', long)]
        exclusive: bool,

        /// Keep comment nodes in the output
        #[arg(short = 'c', long = "with-comments")]
        with_comments: bool,

        /// InclusiveNamespaces PrefixList (space-separated; exclusive mode only)
        #[arg(short = 'p', long = "prefix-list")]
        prefix_list: Option<String>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Canonicalize an XML document and print its SHA-256 digest
    Digest {
        /// Input XML file
        file: PathBuf,

        /// Use Exclusive C14N 1.0 instead of Canonical XML 1.0
        #[arg(short = 'x', long)]
        exclusive: bool,

        /// Keep comment nodes in the output
        #[arg(short = 'c', long = "with-comments")]
        with_comments: bool,

        /// InclusiveNamespaces PrefixList (space-separated; exclusive mode only)
        #[arg(short = 'p', long = "prefix-list")]
        prefix_list: Option<String>,
    },

    /// List supported canonicalization algorithms
    Info,
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::C14n {
            file,
            exclusive,
            with_comments,
            prefix_list,
            output,
        } => cmd_c14n(file, exclusive, with_comments, prefix_list, output),

        Commands::Digest {
            file,
            exclusive,
            with_comments,
            prefix_list,
        } => cmd_digest(file, exclusive, with_comments, prefix_list),

        Commands::Info => cmd_info(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn select_mode(exclusive: bool, with_comments: bool) -> C14nMode {
    match (exclusive, with_comments) {
        (false, false) => C14nMode::Inclusive,
        (false, true) => C14nMode::InclusiveWithComments,
        (true, false) => C14nMode::Exclusive,
        (true, true) => C14nMode::ExclusiveWithComments,
    }
}

fn canonicalize_file(
    file: &PathBuf,
    exclusive: bool,
    with_comments: bool,
    prefix_list: Option<String>,
) -> Result<Vec<u8>, Error> {
    let xml = read_file(file)?;
    let mode = select_mode(exclusive, with_comments);
    let prefixes = prefix_list
        .as_deref()
        .map(parse_prefix_list)
        .unwrap_or_default();
    sigtuna_c14n::canonicalize_xml(&xml, mode, &prefixes)
}

fn cmd_c14n(
    file: PathBuf,
    exclusive: bool,
    with_comments: bool,
    prefix_list: Option<String>,
    output: Option<PathBuf>,
) -> Result<(), Error> {
    let canonical = canonicalize_file(&file, exclusive, with_comments, prefix_list)?;
    write_output(output, &canonical)
}

fn cmd_digest(
    file: PathBuf,
    exclusive: bool,
    with_comments: bool,
    prefix_list: Option<String>,
) -> Result<(), Error> {
    let canonical = canonicalize_file(&file, exclusive, with_comments, prefix_list)?;
    let digest = Sha256::digest(&canonical);
    let hex: String = digest.iter().map(|b| format!("{b:02x}")).collect();
    println!("{hex}");
    Ok(())
}

fn cmd_info() -> Result<(), Error> {
    println!("Sigtuna — Pure Rust XML Canonicalization");
    println!();
    println!("Supported canonicalization algorithms:");
    for mode in [
        C14nMode::Inclusive,
        C14nMode::InclusiveWithComments,
        C14nMode::Exclusive,
        C14nMode::ExclusiveWithComments,
    ] {
        println!("  {}", mode.uri());
    }
    Ok(())
}

// ── Utility functions ────────────────────────────────────────────────

fn read_file(path: &PathBuf) -> Result<String, Error> {
    std::fs::read_to_string(path)
        .map_err(|e| Error::Canonicalization(format!("{}: {e}", path.display())))
}

fn write_output(path: Option<PathBuf>, data: &[u8]) -> Result<(), Error> {
    match path {
        Some(p) => std::fs::write(&p, data)
            .map_err(|e| Error::Canonicalization(format!("{}: {e}", p.display()))),
        None => {
            use std::io::Write;
            std::io::stdout()
                .write_all(data)
                .map_err(|e| Error::Canonicalization(format!("stdout: {e}")))
        }
    }
}
