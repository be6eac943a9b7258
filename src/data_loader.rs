use polars::prelude::*;
use std::fs::File;
use std::path::{Path, PathBuf};
use ndarray::Array1;
use tracing::debug;

use crate::error::{ErrorKind, PipelineError, Result};

/// DataLoader reads one delimited table with a header row.
pub struct DataLoader {
    path: PathBuf,
}

impl DataLoader {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Column types are inferred from every row, so a decimal anywhere in an
    /// otherwise integral column still yields `Float64`.
    pub fn load(&self) -> Result<DataFrame> {
        debug!(path = %self.path.display(), "Reading CSV");
        let file = File::open(&self.path)?;
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(None)
            .into_reader_with_file_handle(file)
            .finish()?;
        debug!(shape = ?df.shape(), "CSV loaded");
        Ok(df)
    }
}

fn missing_column(column: &str, table: &str) -> PipelineError {
    PipelineError::new(ErrorKind::MissingColumn {
        column: column.to_string(),
        table: table.to_string(),
    })
}

pub fn column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Series> {
    df.column(name)
        .map(|c| c.as_materialized_series())
        .map_err(|_| missing_column(name, "frame"))
}

/// Fails with `MissingColumn` naming `table` for the first absent column.
pub fn require_columns<'a, I>(df: &DataFrame, columns: I, table: &str) -> Result<()>
where
    I: IntoIterator<Item = &'a String>,
{
    match columns.into_iter().find(|c| df.column(c.as_str()).is_err()) {
        Some(absent) => Err(missing_column(absent, table)),
        None => Ok(()),
    }
}

/// Column values as floats; nulls stay `None`.
pub fn numeric_values(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let series = column(df, name)?.cast(&DataType::Float64)?;
    let values = series.f64()?.into_iter().collect();
    Ok(values)
}

/// Column values as strings; nulls stay `None`.
pub fn categorical_values(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let series = column(df, name)?.cast(&DataType::String)?;
    let values = series
        .str()?
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect();
    Ok(values)
}

/// Splits `df` into the feature view (every column but `target`) and the
/// target values. Null targets become NaN.
pub fn split_target(df: &DataFrame, target: &str, table: &str) -> Result<(DataFrame, Array1<f64>)> {
    if df.column(target).is_err() {
        return Err(missing_column(target, table));
    }
    let y: Array1<f64> = numeric_values(df, target)?
        .into_iter()
        .map(|v| v.unwrap_or(f64::NAN))
        .collect();
    let features = df.drop(target)?;
    Ok((features, y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn create_test_csv() -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "gender,lunch,reading score,math score").unwrap();
        writeln!(file, "female,standard,72,71").unwrap();
        writeln!(file, "male,,90,").unwrap();
        writeln!(file, "female,free/reduced,,57").unwrap();
        file
    }

    #[test]
    fn test_load_csv() {
        let file = create_test_csv();
        let df = DataLoader::new(file.path()).load().unwrap();
        assert_eq!(df.height(), 3);
        assert_eq!(df.width(), 4);
    }

    #[test]
    fn test_load_missing_file() {
        let err = DataLoader::new("no/such/train.csv").load().unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::Io(_)));
    }

    #[test]
    fn test_values_keep_nulls() {
        let file = create_test_csv();
        let df = DataLoader::new(file.path()).load().unwrap();

        let reading = numeric_values(&df, "reading score").unwrap();
        assert_eq!(reading, vec![Some(72.0), Some(90.0), None]);

        let lunch = categorical_values(&df, "lunch").unwrap();
        assert_eq!(lunch[0].as_deref(), Some("standard"));
        assert_eq!(lunch[1], None);
    }

    #[test]
    fn test_late_decimal_widens_column() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "reading score").unwrap();
        for i in 0..150 {
            if i == 120 {
                writeln!(file, "72.5").unwrap();
            } else {
                writeln!(file, "{}", 40 + i % 50).unwrap();
            }
        }
        let df = DataLoader::new(file.path()).load().unwrap();
        assert_eq!(df.column("reading score").unwrap().dtype(), &DataType::Float64);
        assert_eq!(numeric_values(&df, "reading score").unwrap()[120], Some(72.5));
    }

    #[test]
    fn test_require_columns_names_table() {
        let df = df!("gender" => &["female"], "reading score" => &[1.0]).unwrap();
        let wanted = vec!["gender".to_string(), "lunch".to_string()];
        let err = require_columns(&df, &wanted, "test").unwrap_err();
        assert!(matches!(
            err.kind(),
            ErrorKind::MissingColumn { column, table } if column == "lunch" && table == "test"
        ));
        assert!(require_columns(&df, &wanted[..1], "train").is_ok());
    }

    #[test]
    fn test_split_target() {
        let file = create_test_csv();
        let df = DataLoader::new(file.path()).load().unwrap();
        let (features, y) = split_target(&df, "math score", "train").unwrap();

        assert_eq!(features.width(), 3);
        assert!(features.column("math score").is_err());
        assert_eq!(y.len(), 3);
        assert_eq!(y[0], 71.0);
        assert!(y[1].is_nan());
    }

    #[test]
    fn test_split_missing_target() {
        let df = df!("gender" => &["female", "male"]).unwrap();
        let err = split_target(&df, "math score", "test").unwrap_err();
        match err.kind() {
            ErrorKind::MissingColumn { column, table } => {
                assert_eq!(column, "math score");
                assert_eq!(table, "test");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
