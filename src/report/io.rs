use std::{
    fs,
    path::{Path, PathBuf},
};

use polars::{
    frame::DataFrame,
    prelude::{CsvWriter, JsonFormat, JsonWriter, SchemaRef, SerWriter},
};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::error::{DataError, GymResult, IoError};

// ================================================================================================
// Traits
// ================================================================================================

/// Defines a common interface for all report types (Journal, Summary).
pub trait Report {
    /// Materializes the report as a DataFrame with the canonical schema.
    fn as_df(&self) -> GymResult<DataFrame>;
}

pub trait ReportName {
    fn base_name(&self) -> String;

    fn filename(&self, ext: FileExtension) -> String {
        format!("{}.{}", self.base_name(), ext)
    }
}

pub trait ToSchema {
    /// Returns the canonical schema for this report type.
    fn to_schema() -> SchemaRef;
}

pub trait ToJson {
    /// Serializes the report to a `Value::Array` of row objects.
    fn to_json(&self) -> GymResult<serde_json::Value>;
}

pub trait ToCsv {
    /// Writes the report to `<dir>/<base_name>.csv` and returns the file path.
    ///
    /// # Arguments
    /// - `dir`: Target directory. Created if it doesn't exist.
    /// - `separator`: Field delimiter, `,` when `None`.
    ///
    /// # Side Effects
    /// - Creates the directory if missing.
    /// - Overwrites the file if it exists.
    fn to_csv(&self, dir: impl AsRef<Path>, separator: Option<u8>) -> GymResult<PathBuf>;
}

// ================================================================================================
// Blanket Implementations
// ================================================================================================

impl<T> ToJson for T
where
    T: Report,
{
    fn to_json(&self) -> GymResult<serde_json::Value> {
        let mut df = self.as_df()?;
        let mut buf = Vec::new();
        JsonWriter::new(&mut buf)
            .with_json_format(JsonFormat::Json)
            .finish(&mut df)
            .map_err(|e| DataError::DataFrame(format!("Failed to encode JSON: {e}")))?;
        serde_json::from_slice(&buf).map_err(|e| IoError::Json(e).into())
    }
}

impl<T> ToCsv for T
where
    T: Report + ReportName,
{
    fn to_csv(&self, dir: impl AsRef<Path>, separator: Option<u8>) -> GymResult<PathBuf> {
        let dir = dir.as_ref();
        let file_path = dir.join(self.filename(FileExtension::Csv));

        if !dir.exists() {
            fs::create_dir_all(dir).map_err(|e| {
                IoError::FileSystem(format!(
                    "Failed to create directory {}: {}",
                    dir.display(),
                    e
                ))
            })?;
        }

        let mut df = self.as_df()?;
        let mut file = fs::File::create(&file_path).map_err(IoError::Io)?;
        CsvWriter::new(&mut file)
            .include_header(true)
            .with_separator(separator.unwrap_or(b','))
            .finish(&mut df)
            .map_err(|e| {
                DataError::DataFrame(format!(
                    "Failed to write CSV to '{}': {e}",
                    file_path.display()
                ))
            })?;

        tracing::info!(path = %file_path.display(), rows = df.height(), "Report written");
        Ok(file_path)
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    EnumIter,
    IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
pub enum FileExtension {
    Csv,
}
