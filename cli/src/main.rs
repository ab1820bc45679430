mod check;
mod report;

use std::path::{Path, PathBuf};
use std::process;

use clap::{ArgAction, Parser, Subcommand};
use env_logger::Env;

use lingo::convert::{convert_all, discover};
use lingo::{Config, Converter, Error};

use crate::report::Reporter;

const SUBCOMMANDS: &[&str] = &["convert", "check", "list", "help"];

/// Global flags that consume the following argument.
const VALUE_FLAGS: &[&str] = &["-l", "--lang", "--ext", "-C", "--dir"];

#[derive(Parser)]
#[command(
    name = "lingo",
    version,
    about = "Extract code from literate Markdown, keeping source line numbers"
)]
struct Cli {
    /// Target language profile: go, rust, or one defined in lingo.toml
    #[arg(short, long, global = true)]
    lang: Option<String>,

    /// Extension of the documents to convert (default: md)
    #[arg(long, global = true)]
    ext: Option<String>,

    /// Directory holding the documents and lingo.toml
    #[arg(short = 'C', long = "dir", global = true, default_value = ".")]
    dir: PathBuf,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Log more (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Write `<document>.<ext>` for every document with matching code
    Convert(Documents),

    /// Report outputs that are missing, stale or orphaned
    Check(Documents),

    /// Print where each extracted block comes from
    List(Documents),
}

#[derive(clap::Args, Default)]
struct Documents {
    /// Documents to process (default: every document in the directory)
    files: Vec<PathBuf>,
}

fn main() {
    // `lingo file.md` works like `lingo convert file.md`.
    let mut args: Vec<String> = std::env::args().collect();
    if let Some(pos) = first_positional(&args) {
        if !SUBCOMMANDS.contains(&args[pos].as_str()) {
            args.insert(pos, "convert".to_string());
        }
    }

    let cli = Cli::parse_from(&args);

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or(level))
        .format_timestamp(None)
        .try_init();

    let reporter = Reporter::new(cli.no_color);
    let command = cli.command.unwrap_or(Command::Convert(Documents::default()));

    let exit_code = match run(command, &cli.dir, cli.lang, cli.ext, cli.no_color, &reporter) {
        Ok(code) => code,
        Err(error) => {
            reporter.error(&error);
            1
        }
    };
    process::exit(exit_code);
}

fn first_positional(args: &[String]) -> Option<usize> {
    let mut i = 1;
    while i < args.len() {
        let arg = args[i].as_str();
        if arg == "--" {
            return None;
        }
        if takes_value(arg) {
            i += 2;
            continue;
        }
        if !arg.starts_with('-') {
            return Some(i);
        }
        i += 1;
    }
    None
}

/// Whether `arg` consumes the argument after it. A short cluster such as
/// `-vC` does when its first value flag is its last character.
fn takes_value(arg: &str) -> bool {
    if VALUE_FLAGS.contains(&arg) {
        return true;
    }
    match arg.strip_prefix('-') {
        Some(cluster) if !cluster.starts_with('-') && !cluster.is_empty() => {
            cluster.find(['C', 'l']) == Some(cluster.len() - 1)
        }
        _ => false,
    }
}

/// File arguments are relative to `dir`, like the config file.
fn resolve(dir: &Path, files: Vec<PathBuf>) -> Vec<PathBuf> {
    if dir == Path::new(".") {
        return files;
    }
    files.into_iter().map(|file| dir.join(file)).collect()
}

fn run(
    command: Command,
    dir: &Path,
    lang: Option<String>,
    ext: Option<String>,
    no_color: bool,
    reporter: &Reporter,
) -> Result<i32, Error> {
    let mut config = Config::load_from_dir(dir)?;
    if let Some(lang) = lang {
        config.target = lang;
    }
    if let Some(ext) = ext {
        config.document_extension = ext.trim_start_matches('.').to_string();
    }
    let converter = Converter::new(config.resolve_target()?)?;
    log::info!(
        "target={} documents=*.{} dir={}",
        converter.target().tag,
        config.document_extension,
        dir.display()
    );

    let documents = |requested: Documents| -> Result<Vec<PathBuf>, Error> {
        if requested.files.is_empty() {
            discover(dir, &config.document_extension)
        } else {
            Ok(resolve(dir, requested.files))
        }
    };

    match command {
        Command::Convert(requested) => {
            let conversions = if requested.files.is_empty() {
                convert_all(&converter, dir, &config.document_extension)?
            } else {
                resolve(dir, requested.files)
                    .iter()
                    .map(|document| converter.convert(document))
                    .collect::<Result<Vec<_>, _>>()?
            };
            for conversion in &conversions {
                reporter.warnings(&conversion.document, &conversion.warnings);
            }
            Ok(0)
        }
        Command::Check(requested) => {
            let documents = documents(requested)?;
            check::run_check(&converter, &documents, no_color)
        }
        Command::List(requested) => {
            for document in documents(requested)? {
                let extraction = converter.read_and_extract(&document)?;
                let name = document.display();
                for block in &extraction.blocks {
                    let plural = if block.len == 1 { "" } else { "s" };
                    println!("{}:{} ({} line{})", name, block.line, block.len, plural);
                }
                reporter.warnings(&document, &extraction.warnings);
            }
            Ok(0)
        }
    }
}
