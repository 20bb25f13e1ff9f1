//! Player spreadsheet loading and schema validation (CSV or Parquet)

use anyhow::{Context, Result};
use polars::prelude::*;
use std::path::Path;

use super::error::PipelineError;
use super::player::{AgeGroup, Attribute, PlayerRecord, ATTRIBUTE_COUNT};

pub const NAME_COLUMN: &str = "Name";
pub const GENDER_COLUMN: &str = "Gender";
pub const AGE_COLUMN: &str = "Age";

/// Every column the player schema requires, in spreadsheet order
pub fn required_columns() -> Vec<&'static str> {
    let mut columns = vec![NAME_COLUMN, GENDER_COLUMN, AGE_COLUMN];
    columns.extend(Attribute::ALL.iter().map(|a| a.column_name()));
    columns
}

fn file_extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

/// Load a dataset from a file (CSV or Parquet based on extension)
pub fn load_dataset(path: &Path, infer_schema_length: usize) -> Result<DataFrame> {
    if !path.exists() {
        anyhow::bail!("Input file not found: {}", path.display());
    }

    let extension = file_extension(path);
    let lf = match extension.as_str() {
        "csv" => {
            // 0 means scan the full file when inferring column types
            let infer = if infer_schema_length == 0 {
                None
            } else {
                Some(infer_schema_length)
            };
            LazyCsvReader::new(path)
                .with_infer_schema_length(infer)
                .finish()
                .with_context(|| format!("Failed to load CSV file: {}", path.display()))?
        }
        "parquet" => LazyFrame::scan_parquet(path, Default::default())
            .with_context(|| format!("Failed to load Parquet file: {}", path.display()))?,
        _ => anyhow::bail!(
            "Unsupported file format: {}. Supported formats: csv, parquet",
            extension
        ),
    };

    lf.collect()
        .with_context(|| format!("Failed to read dataset: {}", path.display()))
}

/// Check that every required column is present.
///
/// Reports all missing columns at once, not only the first.
pub fn validate_schema(df: &DataFrame) -> Result<(), PipelineError> {
    let present: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();
    let missing: Vec<&str> = required_columns()
        .into_iter()
        .filter(|c| !present.iter().any(|p| p == c))
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(PipelineError::Schema {
            column: missing.join(", "),
            reason: format!("required column(s) missing. Available columns: {:?}", present),
        })
    }
}

fn schema_error(column: &str, reason: impl Into<String>) -> PipelineError {
    PipelineError::Schema {
        column: column.to_string(),
        reason: reason.into(),
    }
}

/// Text column with no nulls
fn text_column(df: &DataFrame, name: &str) -> Result<Vec<String>, PipelineError> {
    let column = df
        .column(name)
        .map_err(|_| schema_error(name, "column not found"))?;
    let cast = column
        .cast(&DataType::String)
        .map_err(|e| schema_error(name, format!("cannot read as text: {}", e)))?;
    let ca = cast
        .str()
        .map_err(|e| schema_error(name, format!("cannot read as text: {}", e)))?;

    ca.iter()
        .enumerate()
        .map(|(row, v)| match v {
            Some(s) if !s.trim().is_empty() => Ok(s.trim().to_string()),
            _ => Err(schema_error(name, format!("empty value in row {}", row + 1))),
        })
        .collect()
}

/// Numeric column with finite, non-null values
fn numeric_column(df: &DataFrame, name: &str) -> Result<Vec<f64>, PipelineError> {
    let column = df
        .column(name)
        .map_err(|_| schema_error(name, "column not found"))?;
    if !column.dtype().is_primitive_numeric() {
        return Err(schema_error(
            name,
            format!("must be numeric, found {}", column.dtype()),
        ));
    }
    let cast = column
        .cast(&DataType::Float64)
        .map_err(|e| schema_error(name, format!("cannot cast to Float64: {}", e)))?;
    let ca = cast
        .f64()
        .map_err(|e| schema_error(name, format!("cannot read as Float64: {}", e)))?;

    ca.iter()
        .enumerate()
        .map(|(row, v)| match v {
            Some(x) if x.is_finite() => Ok(x),
            Some(x) => Err(schema_error(name, format!("non-finite value {} in row {}", x, row + 1))),
            None => Err(schema_error(name, format!("missing value in row {}", row + 1))),
        })
        .collect()
}

/// Convert a validated DataFrame into typed player records.
///
/// Ages must be whole numbers inside a known age bucket, [0, 100).
pub fn records_from_dataframe(df: &DataFrame) -> Result<Vec<PlayerRecord>, PipelineError> {
    validate_schema(df)?;

    let names = text_column(df, NAME_COLUMN)?;
    let genders = text_column(df, GENDER_COLUMN)?;
    let ages = numeric_column(df, AGE_COLUMN)?;

    let mut attribute_columns: Vec<Vec<f64>> = Vec::with_capacity(ATTRIBUTE_COUNT);
    for attr in Attribute::ALL {
        attribute_columns.push(numeric_column(df, attr.column_name())?);
    }

    let mut records = Vec::with_capacity(df.height());
    for row in 0..df.height() {
        let age = ages[row];
        if age.fract() != 0.0 {
            return Err(schema_error(
                AGE_COLUMN,
                format!("age {} in row {} is not a whole number", age, row + 1),
            ));
        }
        let age = age as i64;
        if AgeGroup::from_age(age).is_none() {
            return Err(schema_error(
                AGE_COLUMN,
                format!("age {} in row {} is outside [0, 100)", age, row + 1),
            ));
        }

        let mut attributes = [0.0; ATTRIBUTE_COUNT];
        for (slot, column) in attributes.iter_mut().zip(attribute_columns.iter()) {
            *slot = column[row];
        }

        records.push(PlayerRecord {
            name: names[row].clone(),
            gender: genders[row].clone(),
            age,
            attributes,
        });
    }

    Ok(records)
}

/// Load and validate the player spreadsheet
pub fn load_players(path: &Path, infer_schema_length: usize) -> Result<Vec<PlayerRecord>> {
    let df = load_dataset(path, infer_schema_length)?;
    let records = records_from_dataframe(&df)
        .with_context(|| format!("Invalid player spreadsheet: {}", path.display()))?;
    if records.is_empty() {
        anyhow::bail!("Player spreadsheet {} contains no rows", path.display());
    }
    Ok(records)
}
