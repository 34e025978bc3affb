//! Simulation Output Table
//! A polars DataFrame whose first column is the simulation time step.

use polars::prelude::*;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TableError {
    #[error("Table '{0}' has no columns")]
    EmptyTable(String),
    #[error("Index column '{column}' of table '{table}' has non-numeric or missing values")]
    InvalidIndex { table: String, column: String },
    #[error("Column '{column}' not found in table '{table}'")]
    ColumnNotFound { table: String, column: String },
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// One loaded simulation output file.
///
/// The first column is the row index (time step); every other column is a KPI.
#[derive(Debug, Clone)]
pub struct Table {
    name: String,
    frame: DataFrame,
}

impl Table {
    /// Wrap a DataFrame, checking that its first column can act as the row index.
    pub fn new(name: impl Into<String>, frame: DataFrame) -> Result<Self, TableError> {
        let name = name.into();
        let Some(index) = frame.get_columns().first() else {
            return Err(TableError::EmptyTable(name));
        };

        let invalid = || TableError::InvalidIndex {
            table: name.clone(),
            column: index.name().to_string(),
        };
        // A header-only file has no rows to infer a numeric type from.
        if frame.height() > 0 && !is_numeric(index.dtype()) {
            return Err(invalid());
        }
        let as_f64 = index.cast(&DataType::Float64)?;
        if as_f64.null_count() > 0 {
            return Err(invalid());
        }

        Ok(Self { name, frame })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the row index column.
    pub fn index_name(&self) -> String {
        self.frame.get_columns()[0].name().to_string()
    }

    pub fn row_count(&self) -> usize {
        self.frame.height()
    }

    /// KPI column names, in file order (index column excluded).
    pub fn columns(&self) -> Vec<String> {
        self.frame
            .get_column_names()
            .iter()
            .skip(1)
            .map(|s| s.to_string())
            .collect()
    }

    /// KPI columns holding numeric data.
    pub fn numeric_columns(&self) -> Vec<String> {
        self.frame
            .get_columns()
            .iter()
            .skip(1)
            .filter(|col| is_numeric(col.dtype()))
            .map(|col| col.name().to_string())
            .collect()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.frame
            .get_column_index(column)
            .is_some_and(|idx| idx > 0)
    }

    /// Row index values as f64.
    pub fn index_values(&self) -> Result<Vec<f64>, TableError> {
        Self::to_f64(&self.frame.get_columns()[0])
    }

    /// Values of one KPI column; missing or non-numeric cells become NaN.
    pub fn column_values(&self, column: &str) -> Result<Vec<f64>, TableError> {
        if !self.has_column(column) {
            return Err(self.column_not_found(column));
        }
        Self::to_f64(self.frame.column(column)?)
    }

    pub(crate) fn column_not_found(&self, column: &str) -> TableError {
        TableError::ColumnNotFound {
            table: self.name.clone(),
            column: column.to_string(),
        }
    }

    fn to_f64(column: &Column) -> Result<Vec<f64>, TableError> {
        let as_f64 = column.cast(&DataType::Float64)?;
        Ok(as_f64
            .f64()?
            .into_iter()
            .map(|v| v.unwrap_or(f64::NAN))
            .collect())
    }
}

fn is_numeric(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Float32
            | DataType::Float64
            | DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
    )
}
