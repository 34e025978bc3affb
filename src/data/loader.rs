//! CSV Data Loader Module
//! Reads every simulation output file of an experiment directory using Polars.

use super::table::Table;
use polars::prelude::*;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Directory not found: {0}")]
    NotFound(PathBuf),
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to parse {path}: {reason}")]
    Parse { path: PathBuf, reason: String },
}

impl LoaderError {
    fn parse(path: &Path, reason: impl ToString) -> Self {
        LoaderError::Parse {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }
}

/// Loads simulation output tables from disk.
///
/// Stateless: every call goes back to the filesystem. Callers wanting to
/// avoid repeated reads hold a [`TableCache`](super::TableCache).
pub struct DataLoader;

impl DataLoader {
    /// Load every regular file of `directory` as a table, in directory listing order.
    ///
    /// Fails on the first file that cannot be parsed; no partial result is returned.
    pub fn load_tables(directory: impl AsRef<Path>) -> Result<Vec<Table>, LoaderError> {
        let directory = directory.as_ref();
        if !directory.is_dir() {
            return Err(LoaderError::NotFound(directory.to_path_buf()));
        }

        let io_err = |source| LoaderError::Io {
            path: directory.to_path_buf(),
            source,
        };

        let mut tables = Vec::new();
        for entry in fs::read_dir(directory).map_err(io_err)? {
            let entry = entry.map_err(io_err)?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            tables.push(Self::load_table(&path)?);
        }

        info!(
            directory = %directory.display(),
            count = tables.len(),
            "loaded simulation tables"
        );
        Ok(tables)
    }

    /// Load a single CSV file whose first column is the row index.
    pub fn load_table(path: impl AsRef<Path>) -> Result<Table, LoaderError> {
        let path = path.as_ref();
        debug!(file = %path.display(), "reading csv");

        // Polars pads short rows with nulls, so ragged files are rejected up front.
        let text = fs::read_to_string(path).map_err(|source| LoaderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        check_field_counts(&text).map_err(|reason| LoaderError::parse(path, reason))?;

        let df = LazyCsvReader::new(path)
            .with_has_header(true)
            .with_infer_schema_length(Some(10000))
            .finish()
            .and_then(|lazy| lazy.collect())
            .map_err(|e| LoaderError::parse(path, e))?;

        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        let table = Table::new(name, df).map_err(|e| LoaderError::parse(path, e))?;
        debug!(
            table = table.name(),
            rows = table.row_count(),
            columns = table.columns().len(),
            "parsed csv"
        );
        Ok(table)
    }
}

/// Every record must have as many fields as the header. Quoted fields may
/// hold commas and line breaks; blank lines are ignored.
fn check_field_counts(text: &str) -> Result<(), String> {
    let mut expected: Option<usize> = None;
    let mut line = 1;
    let mut record_line = 1;
    let mut fields = 1;
    let mut record_empty = true;
    let mut in_quotes = false;

    let mut finish = |fields: usize, record_line: usize| -> Result<(), String> {
        match expected {
            None => {
                expected = Some(fields);
                Ok(())
            }
            Some(n) if n == fields => Ok(()),
            Some(n) => Err(format!(
                "line {} has {} fields, header has {}",
                record_line, fields, n
            )),
        }
    };

    for c in text.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                record_empty = false;
            }
            ',' if !in_quotes => {
                fields += 1;
                record_empty = false;
            }
            '\n' if in_quotes => line += 1,
            '\n' => {
                if !record_empty {
                    finish(fields, record_line)?;
                }
                line += 1;
                record_line = line;
                fields = 1;
                record_empty = true;
            }
            '\r' => {}
            _ => record_empty = false,
        }
    }
    if !record_empty {
        finish(fields, record_line)?;
    }
    Ok(())
}
