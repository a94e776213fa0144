//! flatiron-flatten: flatten a JSON array of objects into tabular rows
//!
//! Usage:
//!   # Read from file, rows to stdout as NDJSON
//!   flatiron-flatten data.json
//!
//!   # Read from stdin
//!   cat data.json | flatiron-flatten
//!
//!   # Print the column summary (key + inferred type) instead of rows
//!   flatiron-flatten --columns data.json
//!
//!   # Write rows to a file
//!   flatiron-flatten data.json -o rows.jsonl

// Use MiMalloc allocator for better performance (recommended by simd-json)
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use anyhow::{Context, Result};
use clap::Parser;
use flatiron::{flatten_document, ColumnInfo, Row};
use serde_json::Value;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};

/// Metadata field carrying each row's position in the source array.
const INDEX_FIELD: &str = "__index";

#[derive(Parser, Debug)]
#[command(name = "flatiron-flatten")]
#[command(about = "Flatten a JSON array of objects into tabular rows", long_about = None)]
struct Args {
    /// Input file (use stdin if omitted)
    #[arg(value_name = "FILE")]
    input: Option<String>,

    /// Print the column summary (key + inferred type) instead of rows
    #[arg(long)]
    columns: bool,

    /// Output file (stdout if omitted)
    #[arg(long, short = 'o')]
    output: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let document = read_document(args.input.as_deref())?;
    let (rows, columns) = flatten_document(document)?;

    let mut writer: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("Failed to create {}", path))?,
        )),
        None => Box::new(std::io::stdout().lock()),
    };

    if args.columns {
        write_columns(&mut writer, &columns)?;
    } else {
        write_rows(&mut writer, &rows)?;
    }
    writer.flush().context("Failed to flush output")?;

    Ok(())
}

/// Read and parse the whole input, trying SIMD-accelerated parsing first
/// and falling back to serde_json on failure.
fn read_document(input: Option<&str>) -> Result<Value> {
    let mut content = Vec::new();
    if let Some(path) = input {
        let file = File::open(path).with_context(|| format!("Failed to open {}", path))?;
        BufReader::new(file)
            .read_to_end(&mut content)
            .with_context(|| format!("Failed to read {}", path))?;
    } else {
        std::io::stdin()
            .read_to_end(&mut content)
            .context("Failed to read stdin")?;
    }

    // simd-json mutates its buffer, so parse a copy and keep the original
    // for the fallback path.
    let mut simd_buf = content.clone();
    match simd_json::to_owned_value(&mut simd_buf) {
        Ok(parsed) => {
            let json_str = simd_json::to_string(&parsed)?;
            Ok(serde_json::from_str(&json_str)?)
        }
        Err(_) => {
            serde_json::from_slice(&content).context("Failed to parse JSON")
        }
    }
}

/// Write rows as NDJSON, one rectangular object per line with the source
/// position under `__index`.
fn write_rows<W: Write>(writer: &mut W, rows: &[Row]) -> Result<()> {
    for row in rows {
        let mut output = row.cells.clone();
        output.insert(
            INDEX_FIELD.to_string(),
            Value::Number(row.original_index.into()),
        );
        let line = serde_json::to_string(&output)?;
        writeln!(writer, "{}", line)?;
    }
    Ok(())
}

fn write_columns<W: Write>(writer: &mut W, columns: &[ColumnInfo]) -> Result<()> {
    for column in columns {
        let line = serde_json::to_string(column)?;
        writeln!(writer, "{}", line)?;
    }
    Ok(())
}
