use crate::arm::RawResponse;
use crate::cmd::error::CommandResult;
use crate::config::OutputFormat;
use owo_colors::OwoColorize;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::io::Write;
use tabled::{Table, Tabled, settings::Style};

/// Pretty JSON indented with tabs, followed by a newline.
pub fn write_json<W, T>(out: &mut W, value: &T) -> CommandResult<()>
where
    W: Write,
    T: Serialize + ?Sized,
{
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"\t"));
    value.serialize(&mut ser)?;

    out.write_all(&buf)?;
    writeln!(out)?;
    Ok(())
}

/// Renders `value` in the requested format. `rows` is only built for tables.
pub fn render<W, T, R, F>(out: &mut W, format: OutputFormat, value: &T, rows: F) -> CommandResult<()>
where
    W: Write,
    T: Serialize + ?Sized,
    R: Tabled,
    F: FnOnce() -> Vec<R>,
{
    match format {
        OutputFormat::Json => write_json(out, value),
        OutputFormat::Yaml => {
            write!(out, "{}", serde_yaml::to_string(value)?)?;
            Ok(())
        }
        OutputFormat::Table => {
            let table = Table::new(rows()).with(Style::psql()).to_string();
            writeln!(out, "{table}")?;
            Ok(())
        }
    }
}

/// Prints a raw response body, pretty-printing it when it is JSON.
pub fn write_raw<W: Write>(out: &mut W, response: &RawResponse) -> CommandResult<()> {
    let body = response.body.trim();
    if body.is_empty() {
        return Ok(());
    }

    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(value) => write_json(out, &value),
        Err(_) => {
            writeln!(out, "{body}")?;
            Ok(())
        }
    }
}

pub fn status_line<W: Write>(out: &mut W, message: &str, status: u16, color: bool) -> CommandResult<()> {
    if color {
        writeln!(out, "{} {}", message.green(), status.bold())?;
    } else {
        writeln!(out, "{message} {status}")?;
    }
    Ok(())
}

/// Table cell for optional fields.
pub fn cell(value: Option<&str>) -> String {
    value.unwrap_or("-").to_string()
}
