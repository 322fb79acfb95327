use crate::domain::models::JsonOut;
use serde::Serialize;
use std::io::Write;

pub fn print_out<T: Serialize>(
    json: bool,
    data: &[T],
    row: impl Fn(&T) -> String,
) -> anyhow::Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&JsonOut { ok: true, data })?
        );
    } else {
        for d in data {
            println!("{}", row(d));
        }
    }
    Ok(())
}

pub fn print_one<T: Serialize>(
    json: bool,
    data: T,
    row: impl Fn(&T) -> String,
) -> anyhow::Result<()> {
    write_one(&mut std::io::stdout().lock(), json, data, row)
}

/// Same envelope as `print_one`, for handlers that own their output channel.
pub fn write_one<T: Serialize>(
    out: &mut dyn Write,
    json: bool,
    data: T,
    row: impl Fn(&T) -> String,
) -> anyhow::Result<()> {
    if json {
        writeln!(
            out,
            "{}",
            serde_json::to_string_pretty(&JsonOut { ok: true, data })?
        )?;
    } else {
        writeln!(out, "{}", row(&data))?;
    }
    Ok(())
}
