//! Miscellaneous utility functions.

use anyhow::Context as _;
use colored::Colorize;
use std::io::Write;
use std::io::{self, ErrorKind};

use crate::value::Value;

// ============================================================================
// Colorized Tree Outline
// ============================================================================

/// Write an indented outline of `value` to `writer`, one node per line with
/// its kind and, for scalars, its contents. Object members are listed in key
/// order. This is a diagnostic view, not JSON text.
///
/// Silently returns `Ok(())` on broken pipe so that piping to tools like
/// `less` or `head` exits cleanly.
///
/// # Errors
///
/// Returns an error if writing to `writer` fails.
pub fn write_outline<W: Write>(
    writer: &mut W,
    value: &Value,
) -> anyhow::Result<()> {
    match write_node(writer, None, value, 0) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == ErrorKind::BrokenPipe => Ok(()),
        Err(err) => Err(err).context("write value outline to stdout"),
    }
}

/// Recursively write one node of the outline and its children.
fn write_node<W: Write>(
    writer: &mut W,
    label: Option<&str>,
    value: &Value,
    indent: usize,
) -> io::Result<()> {
    let next_indent = indent + 2;

    write!(writer, "{:width$}", "", width = indent)?;
    if let Some(label) = label {
        write!(writer, "{label}: ")?;
    }

    match value {
        Value::Null => writeln!(writer, "{}", "null".red().dimmed()),
        Value::Bool(b) => {
            writeln!(writer, "boolean {}", b.to_string().yellow().bold())
        }
        Value::Number(n) => {
            writeln!(writer, "number {}", n.to_string().yellow())
        }
        Value::String(s) => {
            writeln!(writer, "string {}", format!("\"{s}\"").green())
        }
        Value::Array(arr) => {
            writeln!(writer, "{} ({})", "array".bold(), arr.len())?;
            for (i, item) in arr.iter().enumerate() {
                let label = format!("[{i}]").magenta().to_string();
                write_node(writer, Some(&label), item, next_indent)?;
            }
            Ok(())
        }
        Value::Object(map) => {
            writeln!(writer, "{} ({})", "object".bold(), map.len())?;
            let mut entries: Vec<_> = map.iter().collect();
            entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
            for (key, val) in entries {
                let label = format!("\"{key}\"").cyan().to_string();
                write_node(writer, Some(&label), val, next_indent)?;
            }
            Ok(())
        }
    }
}
