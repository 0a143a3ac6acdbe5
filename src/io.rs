//! JSON persistence for records and model definitions
//!
//! Records are validated again on load, so a file that was edited by hand
//! cannot produce a record with inconsistent arrays.

use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use crate::data::freq::FrequencySeriesRecord;
use crate::data::time::TimeSeriesRecord;
use crate::model::class::{ModelClass, ModelDefinition};
use crate::model::error::ModelError;

/// Loads a time series record from a JSON file.
///
/// # Errors
///
/// - [`IOError::FileNotFound`] if the file cannot be opened
/// - [`IOError::JsonParseError`] if the contents are not a valid record
pub fn load_time_series(path: impl Into<PathBuf>) -> Result<TimeSeriesRecord, IOError> {
    load_json(path)
}

pub fn save_time_series(path: impl Into<PathBuf>, record: &TimeSeriesRecord) -> Result<(), IOError> {
    save_json(path, record)
}

pub fn load_frequency_series(path: impl Into<PathBuf>) -> Result<FrequencySeriesRecord, IOError> {
    load_json(path)
}

pub fn save_frequency_series(
    path: impl Into<PathBuf>,
    record: &FrequencySeriesRecord,
) -> Result<(), IOError> {
    save_json(path, record)
}

/// Loads a model definition from JSON and defines the class.
///
/// # Errors
///
/// Besides the file and parsing errors, returns [`IOError::Model`] if the
/// definition is rejected by [`ModelClass::define`].
pub fn load_model(path: impl Into<PathBuf>) -> Result<ModelClass, IOError> {
    let definition: ModelDefinition = load_json(path)?;
    Ok(ModelClass::define(definition)?)
}

/// Saves the definition of a class so it can be loaded again with [`load_model`]
pub fn save_model(path: impl Into<PathBuf>, class: &ModelClass) -> Result<(), IOError> {
    save_json(path, &class.to_definition())
}

fn load_json<T: DeserializeOwned>(path: impl Into<PathBuf>) -> Result<T, IOError> {
    let path = path.into();
    let file = std::fs::File::open(&path).map_err(IOError::FileNotFound)?;
    log::debug!("Reading {}", path.display());
    serde_json::from_reader(std::io::BufReader::new(file)).map_err(IOError::JsonParseError)
}

fn save_json<T: Serialize>(path: impl Into<PathBuf>, value: &T) -> Result<(), IOError> {
    let path = path.into();
    let file = std::fs::File::create(&path).map_err(IOError::FileNotFound)?;
    log::debug!("Writing {}", path.display());
    serde_json::to_writer_pretty(file, value).map_err(IOError::JsonParseError)
}

#[derive(Error, Debug)]
pub enum IOError {
    #[error("File not found: {0}")]
    FileNotFound(#[from] std::io::Error),

    /// Invalid JSON, or JSON describing an inconsistent record
    #[error("Failed to parse JSON: {0}")]
    JsonParseError(#[from] serde_json::Error),

    #[error(transparent)]
    Model(#[from] ModelError),
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::catalog::lookup;
    use crate::model::values::ParameterValues;

    #[test]
    fn test_record_survives_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("record.json");
        let record = TimeSeriesRecord::new(&[0.0, 1.0], &[2.0, 3.0], &[0.1, 0.2]).unwrap();

        save_time_series(&path, &record).unwrap();
        let loaded = load_time_series(&path).unwrap();

        assert_eq!(loaded, record);
    }

    #[test]
    fn test_inconsistent_file_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"time": [1.0, 0.0], "strain": [0.0, 1.0]}}"#).unwrap();

        let result = load_time_series(file.path());

        assert!(matches!(result, Err(IOError::JsonParseError(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = load_frequency_series("does/not/exist.json");
        assert!(matches!(result, Err(IOError::FileNotFound(_))));
    }

    #[test]
    fn test_model_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        let maxwell = lookup("maxwell").unwrap();

        save_model(&path, maxwell).unwrap();
        let loaded = load_model(&path).unwrap();

        assert_eq!(&loaded, maxwell);
    }

    #[test]
    fn test_frozen_model_file_keeps_lineage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("constant.json");
        let constant = lookup("maxwell")
            .unwrap()
            .freeze(&ParameterValues::from([("eta", 2.0), ("k", 1.0)]))
            .unwrap();

        save_model(&path, &constant).unwrap();
        let loaded = load_model(&path).unwrap();

        assert_eq!(loaded, constant);
        assert!(loaded.parameters().is_empty());
        assert_eq!(loaded.lineage()[0].parent, "maxwell");
        assert!(loaded.bind(&ParameterValues::new()).is_ok());
    }
}
