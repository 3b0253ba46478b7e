use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Serialize;
use tracing::info;

use crate::util::{ensure_directory, now_utc_string, write_json_pretty};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Text(String),
    Int(i64),
    Float(Option<f64>),
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    fn to_csv_field(&self) -> String {
        match self {
            Self::Text(value) => escape_csv(value),
            Self::Int(value) => value.to_string(),
            Self::Float(Some(value)) => value.to_string(),
            Self::Float(None) => String::new(),
        }
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Self::Float(Some(value))
    }
}

impl From<Option<f64>> for Cell {
    fn from(value: Option<f64>) -> Self {
        Self::Float(value)
    }
}

impl From<usize> for Cell {
    fn from(value: usize) -> Self {
        Self::Int(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Sheet {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Sheet {
    pub fn new<I, S>(name: &str, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.to_string(),
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<Cell>) -> Result<()> {
        if row.len() != self.columns.len() {
            bail!(
                "sheet {} expects {} cells per row, got {}",
                self.name,
                self.columns.len(),
                row.len()
            );
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn to_csv(&self) -> String {
        let mut out = String::new();
        let header = self
            .columns
            .iter()
            .map(|column| escape_csv(column))
            .collect::<Vec<String>>();
        out.push_str(&header.join(","));
        out.push('\n');

        for row in &self.rows {
            let fields = row.iter().map(Cell::to_csv_field).collect::<Vec<String>>();
            out.push_str(&fields.join(","));
            out.push('\n');
        }
        out
    }
}

fn escape_csv(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

pub trait TabularSink {
    fn write_workbook(&self, workbook: &str, sheets: &[Sheet]) -> Result<Vec<PathBuf>>;
}

#[derive(Debug, Serialize)]
struct WorkbookDocument<'a> {
    workbook: &'a str,
    generated_at: String,
    sheets: &'a [Sheet],
}

#[derive(Debug, Clone)]
pub struct CsvWorkbookSink {
    out_dir: PathBuf,
}

impl CsvWorkbookSink {
    pub fn new(out_dir: &Path) -> Self {
        Self {
            out_dir: out_dir.to_path_buf(),
        }
    }
}

impl TabularSink for CsvWorkbookSink {
    fn write_workbook(&self, workbook: &str, sheets: &[Sheet]) -> Result<Vec<PathBuf>> {
        let workbook_dir = self.out_dir.join(workbook);
        ensure_directory(&workbook_dir)?;

        let mut written = Vec::with_capacity(sheets.len() + 1);
        for sheet in sheets {
            let path = workbook_dir.join(format!("{}.csv", sheet.name));
            fs::write(&path, sheet.to_csv())
                .with_context(|| format!("failed to write sheet: {}", path.display()))?;
            info!(path = %path.display(), rows = sheet.rows.len(), "wrote sheet");
            written.push(path);
        }

        let json_path = workbook_dir.join("workbook.json");
        write_json_pretty(
            &json_path,
            &WorkbookDocument {
                workbook,
                generated_at: now_utc_string(),
                sheets,
            },
        )?;
        written.push(json_path);

        Ok(written)
    }
}
