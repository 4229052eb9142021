// Output formatting for CLI commands: table, JSON or YAML.

use std::io::Write;

use anyhow::{Result, anyhow};
use clap::ValueEnum;
use serde::Serialize;

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[value(rename_all = "lower")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Yaml,
}

pub fn format_json<T: Serialize + ?Sized>(data: &T) -> Result<String> {
    serde_json::to_string_pretty(data).map_err(|e| anyhow!("JSON serialization failed: {}", e))
}

pub fn format_yaml<T: Serialize + ?Sized>(data: &T) -> Result<String> {
    serde_yaml::to_string(data).map_err(|e| anyhow!("YAML serialization failed: {}", e))
}

/// Write `data` to `writer` in `format`.
///
/// `table_printer` is only called for [`OutputFormat::Table`].
pub fn print_output<T, W, F>(
    writer: &mut W,
    data: &T,
    format: OutputFormat,
    table_printer: F,
) -> Result<()>
where
    T: Serialize + ?Sized,
    W: Write,
    F: FnOnce(&mut W, &T) -> Result<()>,
{
    match format {
        OutputFormat::Table => table_printer(writer, data),
        OutputFormat::Json => {
            writeln!(writer, "{}", format_json(data)?)?;
            Ok(())
        }
        OutputFormat::Yaml => {
            // serde_yaml output already ends with a newline.
            write!(writer, "{}", format_yaml(data)?)?;
            Ok(())
        }
    }
}
