//! `generate` subcommand.
use anyhow::{Context, Result};
use clap_complete::Shell;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Write shell completions for `cmd` to `writer`.
pub fn generate_completions<W: Write>(
    shell: Shell,
    cmd: &mut clap::Command,
    writer: &mut W,
) {
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, cmd, name, writer);
}

/// Write a man page for `cmd` and one per (nested) subcommand into
/// `output_dir`, or the current directory when none is given. Returns the
/// paths written.
///
/// # Errors
///
/// Returns an error if the directory or a page could not be created.
pub fn generate_man_pages(
    cmd: &clap::Command,
    output_dir: Option<PathBuf>,
) -> Result<Vec<PathBuf>> {
    let output_dir = match output_dir {
        Some(dir) => dir,
        None => std::env::current_dir().context("Opening current directory")?,
    };

    std::fs::create_dir_all(&output_dir)
        .context("create output Man directories")?;

    let mut written = Vec::new();
    render_page(cmd.clone(), &output_dir, &mut written)?;
    render_subcommand_pages(cmd, &output_dir, cmd.get_name(), &mut written)?;
    Ok(written)
}

/// Render a single page named after `cmd`.
fn render_page(
    cmd: clap::Command,
    output_dir: &Path,
    written: &mut Vec<PathBuf>,
) -> Result<()> {
    let path = output_dir.join(format!("{}.1", cmd.get_name()));
    let mut file = File::create(&path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    clap_mangen::Man::new(cmd)
        .render(&mut file)
        .with_context(|| format!("failed to render {}", path.display()))?;
    log::info!("generated {}", path.display());
    written.push(path);
    Ok(())
}

/// Render pages for subcommands, prefixing each name with its parents so
/// `jpull generate` becomes `jpull-generate.1`.
fn render_subcommand_pages(
    cmd: &clap::Command,
    output_dir: &Path,
    prefix: &str,
    written: &mut Vec<PathBuf>,
) -> Result<()> {
    for subcmd in cmd.get_subcommands() {
        let prefixed_name = format!("{prefix}-{}", subcmd.get_name());
        let renamed = subcmd
            .clone()
            .name(prefixed_name.clone())
            .disable_help_subcommand(true);
        render_page(renamed, output_dir, written)?;

        if subcmd.has_subcommands() {
            render_subcommand_pages(
                subcmd,
                output_dir,
                &prefixed_name,
                written,
            )?;
        }
    }
    Ok(())
}
