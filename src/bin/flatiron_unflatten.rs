//! flatiron-unflatten: rebuild a nested JSON array from flat NDJSON rows
//!
//! Inverse of flatiron-flatten. Each input line is one flat row object;
//! a `__index` field, when present, restores source-document order
//! (lines without one keep their line position). Null cells are dropped
//! from the rebuilt objects.
//!
//! Usage:
//!   flatiron-flatten data.json | flatiron-unflatten
//!   flatiron-unflatten rows.jsonl -o data.json

// Use MiMalloc allocator for better performance (recommended by simd-json)
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use flatiron::{unflatten, Row};
use serde_json::Value;
use std::fs::File;
use std::io::{BufRead, BufReader, Read, Write};

const INDEX_FIELD: &str = "__index";

#[derive(Parser, Debug)]
#[command(name = "flatiron-unflatten")]
#[command(about = "Rebuild a nested JSON array from flat NDJSON rows", long_about = None)]
struct Args {
    /// Input file of NDJSON rows (use stdin if omitted)
    #[arg(value_name = "FILE")]
    input: Option<String>,

    /// Output file (stdout if omitted)
    #[arg(long, short = 'o')]
    output: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let reader: Box<dyn Read> = if let Some(path) = &args.input {
        Box::new(File::open(path).with_context(|| format!("Failed to open {}", path))?)
    } else {
        Box::new(std::io::stdin())
    };

    let mut rows = Vec::new();
    for (line_number, line) in BufReader::new(reader).lines().enumerate() {
        let line = line.context("Failed to read line")?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let value: Value = serde_json::from_str(line)
            .with_context(|| format!("Failed to parse JSON on line {}", line_number + 1))?;
        rows.push(parse_row(value, line_number)?);
    }

    rows.sort_by_key(|row| row.original_index);
    let values = unflatten(&rows)?;
    let text = serde_json::to_string_pretty(&Value::Array(values))?;

    match &args.output {
        Some(path) => {
            let mut file =
                File::create(path).with_context(|| format!("Failed to create {}", path))?;
            writeln!(file, "{}", text)?;
        }
        None => println!("{}", text),
    }

    Ok(())
}

/// Turn one NDJSON line into a row, pulling the source position out of
/// `__index` when present.
fn parse_row(value: Value, line_number: usize) -> Result<Row> {
    let mut cells = match value {
        Value::Object(map) => map,
        other => bail!(
            "line {} is not a flat row object: {}",
            line_number + 1,
            other
        ),
    };

    let original_index = match cells.remove(INDEX_FIELD) {
        Some(Value::Number(n)) => n
            .as_u64()
            .with_context(|| format!("line {}: {} is not a row index", line_number + 1, INDEX_FIELD))?
            as usize,
        Some(other) => bail!(
            "line {}: {} must be a number, found {}",
            line_number + 1,
            INDEX_FIELD,
            other
        ),
        None => line_number,
    };

    Ok(Row::new(original_index, cells))
}
