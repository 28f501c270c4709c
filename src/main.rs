/*!
Main binary for jsonpull.
*/

use anyhow::{Context, Result};
use clap::{ArgAction, CommandFactory, Parser, Subcommand};
use clap_verbosity_flag::Verbosity;
use colored::Colorize;
use memmap2::Mmap;
use std::fs::{self, File};
use std::io::{self, IsTerminal, Read, stdout};
use std::path::{Path, PathBuf};

use jsonpull::{DEFAULT_MAX_DEPTH, Value, commands, utils};

/// Parse a JSON document and report whether it is well formed.
#[derive(Parser)]
#[command(
    name = "jpull",
    version,
    about,
    long_about = None,
    disable_help_subcommand = true
)]
struct Args {
    /// Optional subcommands
    #[command(subcommand)]
    command: Option<Commands>,
    #[arg(value_name = "FILE")]
    /// Optional path to JSON file. If omitted, reads from STDIN
    input: Option<PathBuf>,
    /// Maximum nesting of arrays and objects
    #[arg(long, value_name = "N", default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,
    /// Display depth of the input document
    #[arg(long, action = ArgAction::SetTrue)]
    depth: bool,
    /// Display an outline of the parsed value tree
    #[arg(long, action = ArgAction::SetTrue)]
    tree: bool,
    /// Do not display the success line
    #[arg(short, long, action = ArgAction::SetTrue)]
    no_display: bool,
    /// Read FILE with a plain read instead of memory-mapping it
    #[arg(long, action = ArgAction::SetTrue)]
    no_mmap: bool,
    /// Disable colored output
    #[arg(long, action = ArgAction::SetTrue)]
    no_color: bool,
    #[command(flatten)]
    verbosity: Verbosity,
}

/// Available subcommands for `jpull`
#[derive(Subcommand)]
enum Commands {
    #[command(subcommand)]
    /// Generate additional documentation and/or completions
    Generate(GenerateCommand),
}

/// Generate shell completions and man page
#[derive(Subcommand)]
enum GenerateCommand {
    /// Generate shell completions for the given shell to stdout.
    Shell { shell: clap_complete::Shell },
    /// Generate a man page for jpull to output directory if specified, else
    /// the current directory.
    Man {
        /// The output directory to write the man pages.
        #[clap(short, long)]
        output_dir: Option<PathBuf>,
    },
}

/// Entry point for main binary.
///
/// Reads the document from FILE or piped STDIN, parses it and prints the
/// requested reports. Any read or parse failure exits with status 1.
fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(args.verbosity.log_level_filter())
        .parse_default_env()
        .init();

    if args.no_color {
        colored::control::set_override(false);
    }

    match &args.command {
        Some(Commands::Generate(cmd)) => match cmd {
            GenerateCommand::Shell { shell } => {
                let mut cmd = Args::command();
                commands::generate::generate_completions(
                    *shell,
                    &mut cmd,
                    &mut stdout().lock(),
                );
            }
            GenerateCommand::Man { output_dir } => {
                let written = commands::generate::generate_man_pages(
                    &Args::command(),
                    output_dir.clone(),
                )?;
                for path in written {
                    println!("Generated: {}", path.display());
                }
            }
        },
        None => {
            let value = match &args.input {
                Some(path) if args.no_mmap => {
                    let text = fs::read_to_string(path).with_context(|| {
                        format!("Failed to read file {}", path.display())
                    })?;
                    parse_text(&text, args.max_depth)?
                }
                Some(path) => parse_file(path, args.max_depth)?,
                None => {
                    if io::stdin().is_terminal() {
                        // No piped input and no file specified
                        let mut cmd = Args::command();
                        return Ok(cmd.print_help()?);
                    }
                    let mut buffer = String::new();
                    io::stdin()
                        .read_to_string(&mut buffer)
                        .context("Failed to read STDIN")?;
                    parse_text(&buffer, args.max_depth)?
                }
            };
            report(&args, &value)?;
        }
    }

    Ok(())
}

/// Map `path` into memory and parse it in place.
fn parse_file(path: &Path, max_depth: usize) -> Result<Value> {
    let file = File::open(path)
        .with_context(|| format!("Failed to read file {}", path.display()))?;
    let len = file
        .metadata()
        .with_context(|| format!("Failed to stat file {}", path.display()))?
        .len();
    if len == 0 {
        return parse_text("", max_depth);
    }

    // SAFETY: the map is read-only and dropped before this function returns.
    // Concurrent truncation of the file by another process is not guarded
    // against.
    let mmap = unsafe { Mmap::map(&file) }
        .with_context(|| format!("Failed to map file {}", path.display()))?;
    let text = std::str::from_utf8(&mmap).with_context(|| {
        format!("File {} is not valid UTF-8", path.display())
    })?;
    parse_text(text, max_depth)
}

fn parse_text(text: &str, max_depth: usize) -> Result<Value> {
    log::debug!("parsing {} byte(s) with max depth {max_depth}", text.len());
    jsonpull::Parser::with_max_depth(text, max_depth)
        .parse()
        .context("Failed to parse JSON")
}

/// Print the reports selected on the command line.
fn report(args: &Args, value: &Value) -> Result<()> {
    if !args.no_display {
        println!("{} {}", "valid".green().bold(), value.kind());
    }

    if args.depth {
        println!("Depth: {}", value.depth());
    }

    if args.tree {
        utils::write_outline(&mut stdout().lock(), value)?;
    }

    Ok(())
}
