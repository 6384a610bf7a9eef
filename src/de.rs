//! Read a plants.in file into a [`PlantsInRecord`]
//!
//! # Basic usage
//!
//! The file is positional: every header value and every crop parameter sits on a fixed
//! line, and only the leading token(s) of each line are data. Everything after them
//! (units, descriptions, the `(EXU_FACT)` style tags) is ignored:
//!
//! ```
//! use plantsin::de::from_str;
//! use plantsin::model::{Param, SoilCo2Unit};
//! # let text = plantsin::ser::to_string(&plantsin::model::PlantsInRecord::default()).unwrap();
//! # let text = text.replacen("\n1  unit in SOILCO2", "\n2  unit in SOILCO2", 1);
//!
//! let record = from_str(&text).unwrap();
//! assert_eq!(record.soil_co2_unit, SoilCo2Unit::Cm);
//! assert_eq!(record.plant_types[0].params[Param::ExuFact], 0.0);
//! ```
//!
//! The 17 data tables of each plant type follow its parameter block. Each table starts
//! at a line beginning with `#`; the next non-blank lines are its rows, as many as the
//! plant type's row count line declares.
//!
//! # Adjusting read settings
//!
//! By default a table with fewer rows than declared, or a row missing its second
//! column, is an error. Older editors silently accepted both. To read such files,
//! relax the checks with [`ReadSettings`] and [`from_str_custom`]:
//!
//! ```
//! use plantsin::de::{from_str_custom, ReadSettings};
//!
//! let settings = ReadSettings::default()
//!     .strict_tables(false)
//!     .strict_cells(false);
//! # let text = plantsin::ser::to_string(&plantsin::model::PlantsInRecord::default()).unwrap();
//! let record = from_str_custom(&text, settings).unwrap();
//! ```
//!
//! Our convention is that reading functions that accept settings end in `_custom`,
//! and the non-custom version uses `ReadSettings::default()`.
use std::io::Read;
use std::str::FromStr;

use tracing::{debug, warn};

use crate::format_error::{FResult, FormatError};
use crate::layout::{self, LineSpec};
use crate::model::{AgronomicParams, DataTable, DiskIndexed, FlagSet, InterceptionModel, KcMethod, PlantType, PlantsInRecord, SoilCo2Unit, StartDate, NUM_PARAMS, NUM_TABLES};
use crate::parsing;
use crate::value_error::VResult;

/// Settings for reading plants.in data
///
/// To use, instantiate the default version with `ReadSettings::default()` and
/// modify the desired settings with the public methods:
///
/// ```
/// # use plantsin::de::ReadSettings;
///
/// let settings = ReadSettings::default().strict_tables(false);
/// ```
#[derive(Debug, Clone)]
pub struct ReadSettings {
    strict_tables: bool,
    strict_cells: bool,
}

impl ReadSettings {
    /// Set whether a table with fewer rows than declared is an error.
    ///
    /// Default is `true`. When `false`, the short table is kept and its row count is
    /// lowered to the number of rows actually present.
    pub fn strict_tables(mut self, strict_tables: bool) -> Self {
        self.strict_tables = strict_tables;
        self
    }

    /// Set whether a table row with only one value is an error.
    ///
    /// Default is `true`. When `false`, the missing second value is read as `"0"`.
    pub fn strict_cells(mut self, strict_cells: bool) -> Self {
        self.strict_cells = strict_cells;
        self
    }
}

impl Default for ReadSettings {
    fn default() -> Self {
        Self { strict_tables: true, strict_cells: true }
    }
}


/// Read a record from the full text of a plants.in file.
pub fn from_str(s: &str) -> FResult<PlantsInRecord> {
    from_str_custom(s, ReadSettings::default())
}

/// Read a record from the full text of a plants.in file with customized settings.
pub fn from_str_custom(s: &str, settings: ReadSettings) -> FResult<PlantsInRecord> {
    Reader::new(s, settings).read_record()
}

/// Read a record from any reader, e.g. an open file.
pub fn from_reader<R: Read>(reader: R) -> FResult<PlantsInRecord> {
    from_reader_custom(reader, ReadSettings::default())
}

/// Read a record from any reader with customized settings.
pub fn from_reader_custom<R: Read>(mut reader: R, settings: ReadSettings) -> FResult<PlantsInRecord> {
    let mut text = String::new();
    reader.read_to_string(&mut text).map_err(FormatError::ReadError)?;
    from_str_custom(&text, settings)
}

/// Positional reader over the lines of one file
struct Reader<'de> {
    lines: Vec<&'de str>,
    settings: ReadSettings,
}

impl<'de> Reader<'de> {
    fn new(input: &'de str, settings: ReadSettings) -> Self {
        Self { lines: input.lines().collect(), settings }
    }

    fn line(&self, idx: usize, field: &'static str) -> FResult<&'de str> {
        self.lines.get(idx)
            .copied()
            .ok_or(FormatError::MissingLine { line: idx + 1, field })
    }

    /// The first `spec.arity` tokens of the line at `base + spec.offset`
    fn tokens(&self, base: usize, spec: &LineSpec) -> FResult<Vec<&'de str>> {
        let idx = base + spec.offset;
        let tokens: Vec<&str> = self.line(idx, spec.field)?
            .split_whitespace()
            .take(spec.arity)
            .collect();

        if tokens.len() < spec.arity {
            return Err(FormatError::TooFewTokens { line: idx + 1, field: spec.field, expected: spec.arity, found: tokens.len() })
        }
        Ok(tokens)
    }

    fn convert<T>(&self, idx: usize, field: &'static str, token: &str, conv: fn(&str) -> VResult<T>) -> FResult<T> {
        conv(token).map_err(|source| FormatError::InvalidValue { line: idx + 1, field, source })
    }

    fn value<T>(&self, base: usize, spec: &LineSpec, conv: fn(&str) -> VResult<T>) -> FResult<T> {
        let tokens = self.tokens(base, spec)?;
        self.convert(base + spec.offset, spec.field, tokens[0], conv)
    }

    fn values<T, const N: usize>(&self, base: usize, spec: &LineSpec, conv: fn(&str) -> VResult<T>) -> FResult<[T; N]> {
        debug_assert_eq!(spec.arity, N, "layout arity for {} does not match its field", spec.field);
        let idx = base + spec.offset;
        let values = self.tokens(base, spec)?
            .into_iter()
            .take(N)
            .map(|t| self.convert(idx, spec.field, t, conv))
            .collect::<FResult<Vec<T>>>()?;

        values.try_into()
            .map_err(|v: Vec<T>| FormatError::TooFewTokens { line: idx + 1, field: spec.field, expected: N, found: v.len() })
    }

    fn integer<T>(&self, base: usize, spec: &LineSpec) -> FResult<T>
    where T: FromStr,
          T::Err: std::fmt::Display
    {
        self.value(base, spec, parsing::parse_integer::<T>)
    }

    fn choice<T: DiskIndexed>(&self, base: usize, spec: &LineSpec) -> FResult<T> {
        let index: i64 = self.integer(base, spec)?;
        T::from_disk_index(index)
            .ok_or(FormatError::IndexOutOfRange { line: base + spec.offset + 1, field: spec.field, index, max: T::VARIANTS.len() })
    }

    fn whole_line(&self, base: usize, spec: &LineSpec) -> FResult<String> {
        self.line(base + spec.offset, spec.field)
            .map(|l| l.trim().to_owned())
    }

    fn read_record(&self) -> FResult<PlantsInRecord> {
        self.line(0, "file header")?;
        let version = self.tokens(0, &layout::VERSION)?[0].to_owned();
        let flags: [bool; 8] = self.values(0, &layout::FLAGS, parsing::parse_logical)?;
        let daily_timestep: bool = self.value(0, &layout::DAILY_TIMESTEP, parsing::parse_logical)?;

        let date_tokens = self.tokens(0, &layout::START_DATE)?;
        let date_idx = layout::START_DATE.offset;
        let start_date = StartDate::new(
            self.convert(date_idx, "start year", date_tokens[0], parsing::parse_integer::<i32>)?,
            self.convert(date_idx, "start month", date_tokens[1], parsing::parse_integer::<u32>)?,
            self.convert(date_idx, "start day", date_tokens[2], parsing::parse_integer::<u32>)?,
        );

        let num_plant_types: usize = self.integer(0, &layout::NUM_PLANT_TYPES)?;
        if num_plant_types == 0 {
            return Err(FormatError::NoPlantTypes);
        }
        let soil_co2_unit: SoilCo2Unit = self.choice(0, &layout::SOIL_CO2_UNIT)?;
        let interception_model: InterceptionModel = self.choice(0, &layout::INTERCEPTION_MODEL)?;
        let latitude: f64 = self.value(0, &layout::LATITUDE, parsing::parse_real)?;

        let mut plant_types = Vec::with_capacity(num_plant_types);
        let mut base = layout::FIRST_PLANT_BLOCK;
        for n in 1..=num_plant_types {
            if n > 1 {
                base = self.next_content_line(base, layout::PLANT_MARKER.field)?;
            }
            let (plant, next) = self.read_plant_type(base, n)?;
            debug!(plant_type = n, name = %plant.name, first_line = base + 1, "read plant type");
            plant_types.push(plant);
            base = next;
        }

        if let Some(extra) = (base..self.lines.len()).find(|&i| !self.lines[i].trim().is_empty()) {
            debug!(line = extra + 1, "ignoring content after the last plant type");
        }

        Ok(PlantsInRecord {
            version,
            flags: FlagSet::from_array(flags),
            daily_timestep,
            start_date,
            soil_co2_unit,
            interception_model,
            latitude,
            plant_types,
        })
    }

    /// Read the plant type whose marker is on line `base`, returning it and the index of
    /// the first line after its last table.
    fn read_plant_type(&self, base: usize, plant_type: usize) -> FResult<(PlantType, usize)> {
        let marker = self.line(base, layout::PLANT_MARKER.field)?;
        if !marker.trim_start().starts_with('#') {
            warn!(line = base + 1, plant_type, "expected a '# plant type' marker line, found '{}'", marker.trim());
        }

        let name = self.whole_line(base, &layout::PLANT_NAME)?;
        let mut table_row_counts: [usize; NUM_TABLES] = self.values(base, &layout::ROW_COUNTS, parsing::parse_integer::<usize>)?;
        let num_planting_harvest_dates: u32 = self.integer(base, &layout::PLANTING_DATES)?;
        let num_parameters: u32 = self.integer(base, &layout::NUM_PARAMETERS)?;
        let kc_method: KcMethod = self.choice(base, &layout::KC_METHOD)?;
        let senescence: [u32; 2] = self.values(base, &layout::SENESCENCE, parsing::parse_integer::<u32>)?;
        let p_values: [f64; 5] = self.values(base, &layout::P_VALUES, parsing::parse_real)?;
        let ceres_temperatures: [f64; 13] = self.values(base, &layout::CERES_TEMPERATURES, parsing::parse_real)?;
        let ceres_photoperiod: [f64; 3] = self.values(base, &layout::CERES_PHOTOPERIOD, parsing::parse_real)?;
        let ceres_max_dev_rate: [f64; 3] = self.values(base, &layout::CERES_MAX_DEV_RATE, parsing::parse_real)?;

        let mut params = [0.0; NUM_PARAMS];
        for (value, spec) in params.iter_mut().zip(layout::PARAM_LINES.iter()) {
            *value = self.value(base, spec, parsing::parse_real)?;
        }
        let params = AgronomicParams::from_array(params);

        self.check_emergence_marker(base)?;
        let emergence_harvest_dates = self.whole_line(base, &layout::EMERGENCE_DATES)?;

        let (tables, next) = self.read_tables(base + layout::TABLES_OFFSET, plant_type, &mut table_row_counts)?;

        let plant = PlantType {
            name,
            table_row_counts,
            num_planting_harvest_dates,
            num_parameters,
            kc_method,
            senescence_start_doy: senescence[0],
            senescence_end_doy: senescence[1],
            p_values,
            ceres_temperatures,
            ceres_photoperiod,
            ceres_max_dev_rate,
            params,
            emergence_harvest_dates,
            tables,
        };
        Ok((plant, next))
    }

    fn check_emergence_marker(&self, base: usize) -> FResult<()> {
        let idx = base + layout::EMERGENCE_MARKER.offset;
        let marker = self.line(idx, layout::EMERGENCE_MARKER.field)?.trim();
        if marker.contains(layout::EMERGENCE_MARKER_VARIANT) {
            warn!(
                line = idx + 1,
                "found the marker spelling '{}'; it will be written back as '{}'. Check that the simulator accepts files from both spellings",
                marker, layout::EMERGENCE_MARKER_TEXT
            );
        } else if !marker.starts_with('#') {
            warn!(line = idx + 1, "expected '{}', found '{}'", layout::EMERGENCE_MARKER_TEXT, marker);
        }
        Ok(())
    }

    /// Scan the 17 tables starting at line `start`.
    ///
    /// A line starting with `#` closes the current table and opens the next one. Other
    /// non-blank lines fill the current table up to its declared row count. Scanning
    /// stops as soon as the last table is full, or at the first `#` line after it.
    fn read_tables(&self, start: usize, plant_type: usize, counts: &mut [usize; NUM_TABLES]) -> FResult<([DataTable; NUM_TABLES], usize)> {
        let mut tables: [DataTable; NUM_TABLES] = Default::default();
        let mut active: Option<usize> = None;
        let mut idx = start;

        while idx < self.lines.len() {
            if active == Some(NUM_TABLES - 1) && tables[NUM_TABLES - 1].len() >= counts[NUM_TABLES - 1] {
                break;
            }

            let trimmed = self.lines[idx].trim();
            if trimmed.starts_with('#') {
                if let Some(t) = active {
                    self.close_table(idx, t, &tables[t], counts)?;
                    // Past the last table; this line belongs to whatever follows
                    if t == NUM_TABLES - 1 {
                        break;
                    }
                }
                active = Some(active.map_or(0, |t| t + 1));
            } else if !trimmed.is_empty() {
                let t = active.ok_or(FormatError::DataBeforeTable { line: idx + 1 })?;
                if tables[t].len() < counts[t] {
                    let row = self.read_row(idx, t, trimmed)?;
                    tables[t].rows.push(row);
                } else {
                    warn!(line = idx + 1, table = t + 1, "table already has its {} declared row(s); ignoring extra line", counts[t]);
                }
            }
            idx += 1;
        }

        match active {
            Some(t) if t == NUM_TABLES - 1 => {
                self.close_table(idx, t, &tables[t], counts)?;
                Ok((tables, idx))
            },
            Some(t) => {
                self.close_table(idx, t, &tables[t], counts)?;
                Err(FormatError::MissingTables { plant_type, found: t + 1 })
            },
            None => Err(FormatError::MissingTables { plant_type, found: 0 }),
        }
    }

    /// Check that table `t` got all its rows before line `idx`
    fn close_table(&self, idx: usize, t: usize, table: &DataTable, counts: &mut [usize; NUM_TABLES]) -> FResult<()> {
        if table.len() >= counts[t] {
            return Ok(());
        }

        if self.settings.strict_tables {
            Err(FormatError::TableEndedEarly { line: idx + 1, table: t + 1, expected: counts[t], found: table.len() })
        } else {
            warn!(line = idx + 1, table = t + 1, expected = counts[t], found = table.len(), "table ended early; lowering its row count");
            counts[t] = table.len();
            Ok(())
        }
    }

    fn read_row(&self, idx: usize, t: usize, line: &str) -> FResult<(String, String)> {
        let mut tokens = line.split_whitespace();
        let first = tokens.next().unwrap_or_default();
        let second = match tokens.next() {
            Some(v) => v,
            None if self.settings.strict_cells => {
                return Err(FormatError::TableCellMissing { line: idx + 1, table: t + 1, col: 2 })
            },
            None => {
                warn!(line = idx + 1, table = t + 1, "row has only one value; reading the second as 0");
                "0"
            }
        };

        for cell in [first, second] {
            self.convert(idx, "table value", cell, parsing::parse_real)?;
        }
        Ok((first.to_owned(), second.to_owned()))
    }

    fn next_content_line(&self, from: usize, field: &'static str) -> FResult<usize> {
        (from..self.lines.len())
            .find(|&i| !self.lines[i].trim().is_empty())
            .ok_or(FormatError::MissingLine { line: self.lines.len() + 1, field })
    }
}
