// Rendering helpers shared by all commands. Tables for humans, JSON for
// scripts, plain lines for grep.

use serde::Serialize;
use tabled::{Table, Tabled, settings::Style};

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};
use crate::error::CliError;

/// Render a list of records in the requested format.
pub fn render_list<T>(items: &[T], format: OutputFormat) -> Result<String, CliError>
where
    T: Tabled + Serialize,
{
    match format {
        OutputFormat::Table => {
            if items.is_empty() {
                return Ok("(no entries)".to_owned());
            }
            let mut table = Table::new(items);
            table.with(Style::rounded());
            Ok(table.to_string())
        }
        OutputFormat::Json => Ok(serde_json::to_string_pretty(items)?),
        OutputFormat::JsonCompact => Ok(serde_json::to_string(items)?),
        OutputFormat::Plain => {
            let lines: Vec<String> = items.iter().map(plain_line::<T>).collect();
            Ok(lines.join("\n"))
        }
    }
}

/// Render a single record. Tables pivot to field/value rows.
pub fn render_single<T>(item: &T, format: OutputFormat) -> Result<String, CliError>
where
    T: Tabled + Serialize,
{
    match format {
        OutputFormat::Table => {
            let fields = T::headers();
            let values = item.fields();
            let rows: Vec<DetailRow> = fields
                .iter()
                .zip(values.iter())
                .map(|(field, value)| DetailRow {
                    field: field.to_string(),
                    value: value.to_string(),
                })
                .collect();
            let mut table = Table::new(rows);
            table.with(Style::rounded());
            Ok(table.to_string())
        }
        OutputFormat::Json => Ok(serde_json::to_string_pretty(item)?),
        OutputFormat::JsonCompact => Ok(serde_json::to_string(item)?),
        OutputFormat::Plain => Ok(plain_line(item)),
    }
}

fn plain_line<T: Tabled>(item: &T) -> String {
    item.fields()
        .iter()
        .map(std::borrow::Cow::as_ref)
        .collect::<Vec<_>>()
        .join("\t")
}

#[derive(Tabled)]
struct DetailRow {
    #[tabled(rename = "Field")]
    field: String,
    #[tabled(rename = "Value")]
    value: String,
}

/// Print rendered output. `--quiet` suppresses confirmations elsewhere,
/// never data the user explicitly asked for.
pub fn print_output(rendered: &str, _global: &GlobalOpts) {
    println!("{rendered}");
}

/// Whether to colorize, honoring `--color` and the terminal.
pub fn should_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => {
            use std::io::IsTerminal;
            std::io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none()
        }
    }
}
