//! Load and save plants.in files on disk.
//!
//! Errors here are [`error_stack::Report`]s so the path that failed travels with the
//! underlying [`FormatError`] or I/O error.
use std::fmt::Display;
use std::path::Path;

use error_stack::ResultExt;
use tracing::{info, warn};

use crate::de::{self, ReadSettings};
use crate::format_error::FormatError;
use crate::model::PlantsInRecord;
use crate::ser;

/// File read when no input path is given
pub const DEFAULT_INPUT: &str = "plants.in";
/// File written when no output path is given, so the input is never overwritten by default
pub const DEFAULT_OUTPUT: &str = "plants_mod.in";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileError {
    Read,
    Write,
    Format,
}

impl Display for FileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileError::Read => write!(f, "Could not read plants.in file"),
            FileError::Write => write!(f, "Could not write plants.in file"),
            FileError::Format => write!(f, "Invalid plants.in content"),
        }
    }
}

impl std::error::Error for FileError {}

pub type FileResult<T> = error_stack::Result<T, FileError>;

/// Read and parse the file at `path` with the default (strict) settings.
pub fn load<P: AsRef<Path>>(path: P) -> FileResult<PlantsInRecord> {
    load_custom(path, ReadSettings::default())
}

/// Read and parse the file at `path` with custom settings.
pub fn load_custom<P: AsRef<Path>>(path: P, settings: ReadSettings) -> FileResult<PlantsInRecord> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .change_context(FileError::Read)
        .attach_printable_lazy(|| format!("path: {}", path.display()))?;

    let record = de::from_str_custom(&text, settings)
        .change_context(FileError::Format)
        .attach_printable_lazy(|| format!("path: {}", path.display()))?;

    info!(path = %path.display(), plant_types = record.num_plant_types(), "loaded plants.in");
    Ok(record)
}

/// Like [`load_custom`], but a missing file gives [`PlantsInRecord::default`].
///
/// Any other failure, including a file that exists but does not parse, is still an error.
pub fn load_or_default<P: AsRef<Path>>(path: P, settings: ReadSettings) -> FileResult<PlantsInRecord> {
    let path = path.as_ref();
    if !path.exists() {
        warn!(path = %path.display(), "file not found, using a default record");
        return Ok(PlantsInRecord::default());
    }
    load_custom(path, settings)
}

/// Serialize `record` and write it to `path`, replacing any existing file.
///
/// The record is fully serialized first, so an invalid record leaves `path` untouched.
pub fn save<P: AsRef<Path>>(record: &PlantsInRecord, path: P) -> FileResult<()> {
    let path = path.as_ref();
    let text = ser::to_string(record)
        .change_context(FileError::Format)
        .attach_printable_lazy(|| format!("path: {}", path.display()))?;

    std::fs::write(path, text)
        .map_err(FormatError::WriteError)
        .change_context(FileError::Write)
        .attach_printable_lazy(|| format!("path: {}", path.display()))?;

    info!(path = %path.display(), "wrote plants.in");
    Ok(())
}
