//! yamlet CLI: tokenize, validate and round-trip YAML files.

use std::fs::File;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use yamlet::{dump, load_str, load_str_all, Scanner};

#[derive(Debug, Parser)]
#[command(name = "yamlet")]
#[command(about = "YAML 1.2 codec toolkit", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the token stream of a file, one `KIND value?` tuple per line
    Tokens(FileArg),
    /// Parse a file and report the first error, if any
    Check(FileArg),
    /// Parse, dump, reparse, and verify structural equality
    Roundtrip(FileArg),
}

#[derive(Debug, Parser)]
struct FileArg {
    /// Input path, or `-` for stdin
    input: PathBuf,
}

fn read_input(path: &PathBuf) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    if path.as_os_str() == "-" {
        io::stdin()
            .read_to_end(&mut bytes)
            .context("failed to read stdin")?;
    } else {
        File::open(path)
            .with_context(|| format!("failed to open {}", path.display()))?
            .read_to_end(&mut bytes)
            .with_context(|| format!("failed to read {}", path.display()))?;
    }
    Ok(bytes)
}

fn run_tokens(args: &FileArg) -> Result<()> {
    let bytes = read_input(&args.input)?;
    let mut scanner = Scanner::new(bytes.as_slice())?;
    while let Some(token) = scanner.next_token()? {
        println!("{}", token);
    }
    Ok(())
}

fn run_check(args: &FileArg) -> Result<()> {
    let bytes = read_input(&args.input)?;
    let text = String::from_utf8_lossy(&bytes);
    match load_str_all(&text) {
        Ok(docs) => {
            println!("ok: {} document(s)", docs.len());
            Ok(())
        }
        Err(err) => bail!("{}", err),
    }
}

fn run_roundtrip(args: &FileArg) -> Result<()> {
    let bytes = read_input(&args.input)?;
    let text = String::from_utf8_lossy(&bytes);
    let original = load_str(&text).context("initial parse failed")?;
    let dumped = dump(&original);
    let reparsed = load_str(&dumped).context("reparse of dumped text failed")?;
    if original != reparsed {
        bail!("round trip changed the document structure");
    }
    print!("{}", dumped);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match &cli.command {
        Command::Tokens(args) => run_tokens(args),
        Command::Check(args) => run_check(args),
        Command::Roundtrip(args) => run_roundtrip(args),
    }
}
