use colored::{ColoredString, Colorize};
use serde::Serialize;
use std::io::{self, BufRead, Write};

use crate::error::Result;
use crate::status::StatusTier;

/// Placeholder for missing values in tables
pub const NOT_AVAILABLE: &str = "N/A";

pub trait ResponseFormatter {
    /// Pretty-printed JSON
    fn format_json<T: Serialize + ?Sized>(&self, value: &T) -> Result<String> {
        Ok(serde_json::to_string_pretty(value)?)
    }

    /// Column-aligned table with a header row
    fn format_table(&self, title: &str, headers: &[&str], rows: &[Vec<String>]) -> String {
        let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
        for row in rows {
            for (i, cell) in row.iter().enumerate() {
                if let Some(w) = widths.get_mut(i) {
                    *w = (*w).max(cell.chars().count());
                }
            }
        }

        let render = |cells: Vec<&str>| -> String {
            cells
                .iter()
                .zip(&widths)
                .map(|(c, w)| format!("{:<width$}", c, width = *w))
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        };

        let mut out = format!("{}\n", title.bold());
        out.push_str(&render(headers.to_vec()));
        out.push('\n');
        out.push_str(
            &widths
                .iter()
                .map(|w| "-".repeat(*w))
                .collect::<Vec<_>>()
                .join("  "),
        );
        out.push('\n');
        for row in rows {
            out.push_str(&render(row.iter().map(String::as_str).collect()));
            out.push('\n');
        }
        out
    }

    /// Two-column field listing; empty labels render as spacer lines
    fn format_fields(&self, fields: &[(&str, String)]) -> String {
        let width = fields.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
        fields
            .iter()
            .map(|(k, v)| {
                if k.is_empty() && v.is_empty() {
                    String::new()
                } else {
                    format!("{:<width$}  {}", k.dimmed(), v, width = width)
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Title line framing a short message
    fn format_banner(&self, title: &str, message: &str) -> String {
        let rule = "=".repeat(title.len().max(message.len()) + 4);
        format!("{}\n  {}\n  {}\n{}", rule, title.bold(), message, rule)
    }
}

/// Colour for a status tier
pub fn color_tier(text: &str, tier: &StatusTier) -> ColoredString {
    match tier {
        StatusTier::Ok => text.green(),
        StatusTier::Degraded => text.yellow(),
        StatusTier::Error => text.red(),
        StatusTier::Unknown => text.normal(),
    }
}

pub fn or_na(value: Option<&str>) -> String {
    value.unwrap_or(NOT_AVAILABLE).to_string()
}

/// Print `prompt` and read one trimmed line from `input`
pub fn prompt_line(prompt: &str, mut input: impl BufRead) -> io::Result<String> {
    print!("{}", prompt);
    io::stdout().flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(answer.trim().to_string())
}

/// Ask a yes/no question on stdin. Anything but y/yes is a no.
pub fn confirm(prompt: &str) -> io::Result<bool> {
    let answer = prompt_line(&format!("{} [y/N]: ", prompt), io::stdin().lock())?;
    Ok(is_yes(&answer))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
