//! Output formatting for CLI commands.

use serde::{Deserialize, Serialize};

use crate::catalog::SegmentRecord;
use crate::cli::args::{OutputFormat, SegcatArgs};
use crate::error::Result;

/// Result structure for `inspect`.
#[derive(Debug, Serialize, Deserialize)]
pub struct CatalogSummary {
    pub path: String,
    pub encoding: String,
    pub version: i64,
    pub counter: i32,
    pub segment_count: usize,
    pub total_documents: i64,
    pub segments: Vec<SegmentRecord>,
}

/// Result structure for `version`.
#[derive(Debug, Serialize, Deserialize)]
pub struct VersionResult {
    pub path: String,
    pub version: i64,
}

/// Result structure for `commit`.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommitResult {
    pub path: String,
    pub previous_version: Option<i64>,
    pub version: i64,
    pub segment_count: usize,
}

/// Output a result in the format the user asked for.
pub fn output_result<T: Serialize>(message: &str, result: &T, args: &SegcatArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => output_human(message, result, args),
        OutputFormat::Json => output_json(result, args),
    }
}

/// Output in human-readable format.
fn output_human<T: Serialize>(message: &str, result: &T, args: &SegcatArgs) -> Result<()> {
    if args.verbosity() > 0 {
        println!("{message}");
        println!();
    }

    // Convert to JSON value for easier manipulation
    let value = serde_json::to_value(result)?;
    for line in render_human(&value) {
        println!("{line}");
    }
    Ok(())
}

/// Render a result as `key: value` lines, with segment lists as a table.
fn render_human(value: &serde_json::Value) -> Vec<String> {
    let mut lines = Vec::new();
    let Some(obj) = value.as_object() else {
        lines.push(value.to_string());
        return lines;
    };

    for (key, field) in obj {
        match field {
            serde_json::Value::Array(segments) if key == "segments" => {
                lines.push(format!("{key}:"));
                for (i, segment) in segments.iter().enumerate() {
                    let name = segment.get("name").and_then(|n| n.as_str()).unwrap_or("?");
                    let docs = segment
                        .get("doc_count")
                        .and_then(|d| d.as_i64())
                        .unwrap_or(0);
                    lines.push(format!("  {i:>4}  {name:<12} {docs:>10} docs"));
                }
            }
            serde_json::Value::String(s) => lines.push(format!("{key}: {s}")),
            serde_json::Value::Null => lines.push(format!("{key}: -")),
            other => lines.push(format!("{key}: {other}")),
        }
    }
    lines
}

/// Output in JSON format.
fn output_json<T: Serialize>(result: &T, args: &SegcatArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };
    println!("{json}");
    Ok(())
}
