//! Structural errors in reading or writing a plants.in file
use std::error::Error;
use std::fmt::Display;
use std::string::FromUtf8Error;

use crate::value_error::VError;

/// A type alias for `Result` with [`FormatError`] as the error type.
pub type FResult<T> = Result<T, FormatError>;

/// Errors that violate the positional layout of a plants.in file.
///
/// All `line` values are 1-based line numbers, as an editor would show them.
#[derive(Debug)]
pub enum FormatError {
    /// Indicates that the input ended before a required line.
    MissingLine{line: usize, field: &'static str},
    /// Indicates that a line had fewer whitespace-separated values than its field needs.
    TooFewTokens{line: usize, field: &'static str, expected: usize, found: usize},
    /// Indicates that a value could not be parsed as the type its field requires.
    InvalidValue{line: usize, field: &'static str, source: VError},
    /// Indicates that a 1-based choice index (unit, interception model, Kc method) was outside its range.
    IndexOutOfRange{line: usize, field: &'static str, index: i64, max: usize},
    /// Indicates that the number of plant types is zero.
    NoPlantTypes,
    /// Indicates a data line before the first table marker of a plant type.
    DataBeforeTable{line: usize},
    /// Indicates that a table had fewer data lines than its declared row count.
    TableEndedEarly{line: usize, table: usize, expected: usize, found: usize},
    /// Indicates that a table row did not have a value for every column.
    TableCellMissing{line: usize, table: usize, col: usize},
    /// Indicates that the input ended before all 17 tables of a plant type were found.
    MissingTables{plant_type: usize, found: usize},
    /// Indicates that a record to write has a table whose length differs from its declared row count.
    RowCountMismatch{plant_type: usize, table: usize, declared: usize, actual: usize},
    /// Indicates that a record to write holds a value that would read back differently. `plant_type` is 1-based.
    UnwritableValue{plant_type: Option<usize>, field: &'static str, value: String, reason: &'static str},
    /// Indicates an error reading the input
    ReadError(std::io::Error),
    /// Indicates an error writing the output
    WriteError(std::io::Error),
    /// Indicates that the buffered bytes could not be converted to a UTF8 string
    UnicodeError(FromUtf8Error),
}

impl Display for FormatError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingLine { line, field } => write!(f, "Input ended before line {line}, which should hold the {field}"),
            Self::TooFewTokens { line, field, expected, found } => {
                write!(f, "Line {line} should start with {expected} value(s) for the {field}, but only {found} were found")
            },
            Self::InvalidValue { line, field, source } => write!(f, "Invalid value for the {field} on line {line}: {source}"),
            Self::IndexOutOfRange { line, field, index, max } => {
                write!(f, "The {field} on line {line} must be between 1 and {max}, got {index}")
            },
            Self::NoPlantTypes => write!(f, "The number of plant types must be at least 1"),
            Self::DataBeforeTable { line } => write!(f, "Line {line} holds table data before the first table marker"),
            Self::TableEndedEarly { line, table, expected, found } => {
                write!(f, "Table {table} ended at line {line} with {found} row(s), but {expected} were declared")
            },
            Self::TableCellMissing { line, table, col } => write!(f, "Line {line} of table {table} has no value for column {col}"),
            Self::MissingTables { plant_type, found } => {
                write!(f, "Plant type {plant_type} has only {found} of 17 tables")
            },
            Self::RowCountMismatch { plant_type, table, declared, actual } => {
                write!(f, "Table {table} of plant type {plant_type} has {actual} row(s), but its row count says {declared}")
            },
            Self::UnwritableValue { plant_type: Some(n), field, value, reason } => {
                write!(f, "Cannot write the {field} '{value}' of plant type {n}: {reason}")
            },
            Self::UnwritableValue { plant_type: None, field, value, reason } => {
                write!(f, "Cannot write the {field} '{value}': {reason}")
            },
            Self::ReadError(e) => write!(f, "Error reading data: {e}"),
            Self::WriteError(e) => write!(f, "Error writing data: {e}"),
            Self::UnicodeError(e) => write!(f, "Serialized data includes invalid unicode: {e}"),
        }
    }
}

impl Error for FormatError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidValue { source, .. } => Some(source),
            Self::ReadError(e) | Self::WriteError(e) => Some(e),
            Self::UnicodeError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<FromUtf8Error> for FormatError {
    fn from(value: FromUtf8Error) -> Self {
        Self::UnicodeError(value)
    }
}

impl FormatError {
    /// The 1-based line number the error refers to, if it refers to a single line.
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::MissingLine { line, .. }
            | Self::TooFewTokens { line, .. }
            | Self::InvalidValue { line, .. }
            | Self::IndexOutOfRange { line, .. }
            | Self::DataBeforeTable { line }
            | Self::TableEndedEarly { line, .. }
            | Self::TableCellMissing { line, .. } => Some(*line),
            _ => None,
        }
    }
}
