//! Plain-text and CSV renderings of a query list.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Txt,
    Csv,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Txt => "txt",
            ExportFormat::Csv => "csv",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Txt => "text/plain",
            ExportFormat::Csv => "text/csv",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "txt" | "text" => Ok(ExportFormat::Txt),
            "csv" => Ok(ExportFormat::Csv),
            other => Err(format!("Unsupported export format: {}", other)),
        }
    }
}

/// Render queries as a file body.
///
/// `txt` is one query per line. `csv` is a single `query` column with every
/// value double-quoted and embedded quotes doubled.
pub fn export_queries(queries: &[String], format: ExportFormat) -> String {
    match format {
        ExportFormat::Txt => copy_all(queries),
        ExportFormat::Csv => {
            let mut out = String::from("query\n");
            let rows: Vec<String> = queries
                .iter()
                .map(|q| format!("\"{}\"", q.replace('"', "\"\"")))
                .collect();
            out.push_str(&rows.join("\n"));
            out
        }
    }
}

/// Clipboard text for "copy all"
pub fn copy_all(queries: &[String]) -> String {
    queries.join("\n")
}

/// `seeker_lens_<platform>_queries.<ext>`
pub fn export_file_name(platform: &str, format: ExportFormat) -> String {
    format!(
        "seeker_lens_{}_queries.{}",
        platform.to_lowercase(),
        format.extension()
    )
}
