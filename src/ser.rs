//! Write a [`PlantsInRecord`] in the plants.in layout
//!
//! Every value is written at its fixed line, followed by the fixed description the
//! simulator's own files carry, so the output can be diffed against a hand-edited file.
//! Floats use Rust's shortest round-trip formatting (`0.5`, `45.2`, `0`), so reading the
//! output back gives exactly the record that was written.
use std::fmt::Display;
use std::io::Write;

use itertools::Itertools;

use crate::format_error::{FResult, FormatError};
use crate::layout::{self, LineSpec};
use crate::parsing;
use crate::model::{DiskIndexed, Param, PlantType, PlantsInRecord};

/// Serialize a record to a `String`.
///
/// Fails if the record cannot be written so that it reads back unchanged (see
/// [`check_structure`]). Nothing is written in that case.
pub fn to_string(record: &PlantsInRecord) -> FResult<String> {
    let bytes = to_bytes(record)?;
    Ok(String::from_utf8(bytes)?)
}

/// Serialize a record to bytes.
pub fn to_bytes(record: &PlantsInRecord) -> FResult<Vec<u8>> {
    let mut buf = vec![];
    to_writer(record, &mut buf)?;
    Ok(buf)
}

/// Serialize a record to any writer.
///
/// The record is checked before the first byte is written.
pub fn to_writer<W: Write>(record: &PlantsInRecord, writer: W) -> FResult<()> {
    check_structure(record)?;
    let mut serializer = Serializer::new(writer);
    serializer.write_record(record)
        .map_err(FormatError::WriteError)
}

/// Check that `record` can be written and read back as the same record.
///
/// Rejects a record with no plant types, a table whose length differs from its
/// declared row count, a version that is not one token, non-finite numbers, names or
/// date lines that would be trimmed or split, and table cells that are not single
/// numbers. Blank cells are allowed and are written as `0`.
pub fn check_structure(record: &PlantsInRecord) -> FResult<()> {
    if record.plant_types.is_empty() {
        return Err(FormatError::NoPlantTypes);
    }

    check_token(layout::VERSION.field, &record.version)?;
    check_finite(None, layout::LATITUDE.field, record.latitude)?;

    for (p, plant) in record.plant_types.iter().enumerate() {
        let n = Some(p + 1);
        check_whole_line(n, layout::PLANT_NAME.field, &plant.name)?;
        check_whole_line(n, layout::EMERGENCE_DATES.field, &plant.emergence_harvest_dates)?;

        let groups: [(&'static str, &[f64]); 4] = [
            (layout::P_VALUES.field, &plant.p_values),
            (layout::CERES_TEMPERATURES.field, &plant.ceres_temperatures),
            (layout::CERES_PHOTOPERIOD.field, &plant.ceres_photoperiod),
            (layout::CERES_MAX_DEV_RATE.field, &plant.ceres_max_dev_rate),
        ];
        for (field, values) in groups {
            for &v in values {
                check_finite(n, field, v)?;
            }
        }
        for (param, v) in plant.params.iter() {
            check_finite(n, param.name(), v)?;
        }

        for (t, (table, &declared)) in plant.tables.iter().zip(plant.table_row_counts.iter()).enumerate() {
            if table.len() != declared {
                return Err(FormatError::RowCountMismatch { plant_type: p + 1, table: t + 1, declared, actual: table.len() });
            }
            for (a, b) in table.rows.iter() {
                check_cell(n, a)?;
                check_cell(n, b)?;
            }
        }
    }
    Ok(())
}

fn unwritable(plant_type: Option<usize>, field: &'static str, value: &str, reason: &'static str) -> FormatError {
    FormatError::UnwritableValue { plant_type, field, value: value.to_owned(), reason }
}

fn check_token(field: &'static str, value: &str) -> FResult<()> {
    if value.is_empty() {
        Err(unwritable(None, field, value, "must not be empty"))
    } else if value.chars().any(char::is_whitespace) {
        Err(unwritable(None, field, value, "must be a single token without whitespace"))
    } else {
        Ok(())
    }
}

fn check_finite(plant_type: Option<usize>, field: &'static str, value: f64) -> FResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(unwritable(plant_type, field, &value.to_string(), "only finite numbers can be written"))
    }
}

fn check_whole_line(plant_type: Option<usize>, field: &'static str, value: &str) -> FResult<()> {
    if value.contains(['\n', '\r']) {
        Err(unwritable(plant_type, field, value, "must fit on one line"))
    } else if value.trim() != value {
        Err(unwritable(plant_type, field, value, "leading or trailing whitespace is dropped on read"))
    } else {
        Ok(())
    }
}

fn check_cell(plant_type: Option<usize>, value: &str) -> FResult<()> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(());
    }
    if trimmed.contains(char::is_whitespace) {
        return Err(unwritable(plant_type, "table value", value, "must be a single number"));
    }
    parsing::parse_real(trimmed)
        .map(|_| ())
        .map_err(|_| unwritable(plant_type, "table value", value, "must be a number"))
}

fn logical(b: bool) -> &'static str {
    if b { "T" } else { "F" }
}

/// An empty cell is written as a zero so that the row keeps two columns
fn cell(s: &str) -> &str {
    let s = s.trim();
    if s.is_empty() { "0" } else { s }
}

/// Serializer for plants.in writers
struct Serializer<W: Write> {
    buf: W,
}

impl<W: Write> Serializer<W> {
    fn new(writer: W) -> Self {
        Self { buf: writer }
    }

    fn literal(&mut self, text: &str) -> std::io::Result<()> {
        writeln!(self.buf, "{text}")
    }

    fn line<V: Display>(&mut self, value: V, spec: &LineSpec) -> std::io::Result<()> {
        writeln!(self.buf, "{value}{}", spec.comment)
    }

    fn write_record(&mut self, record: &PlantsInRecord) -> std::io::Result<()> {
        self.literal(layout::FILE_HEADER)?;
        self.line(&record.version, &layout::VERSION)?;
        self.literal(layout::FLAG_LABELS)?;
        let flags = record.flags.to_array().into_iter().map(logical).join(layout::FLAG_INDENT);
        self.line(format!("{}{flags}", layout::FLAG_INDENT), &layout::FLAGS)?;
        self.line(logical(record.daily_timestep), &layout::DAILY_TIMESTEP)?;
        self.line(record.start_date, &layout::START_DATE)?;
        self.line(record.num_plant_types(), &layout::NUM_PLANT_TYPES)?;
        self.line(record.soil_co2_unit.disk_index(), &layout::SOIL_CO2_UNIT)?;
        self.line(record.interception_model.disk_index(), &layout::INTERCEPTION_MODEL)?;
        self.line(record.latitude, &layout::LATITUDE)?;

        for (i, plant) in record.plant_types.iter().enumerate() {
            self.write_plant_type(i + 1, plant)?;
        }
        self.buf.flush()
    }

    fn write_plant_type(&mut self, n: usize, plant: &PlantType) -> std::io::Result<()> {
        let counts = plant.table_row_counts.iter().join(" ");

        self.literal(&layout::plant_marker(n))?;
        self.literal(&plant.name)?;
        self.line(&counts, &layout::ROW_COUNTS)?;
        self.line(plant.num_planting_harvest_dates, &layout::PLANTING_DATES)?;
        self.line(plant.num_parameters, &layout::NUM_PARAMETERS)?;
        self.line(plant.kc_method.disk_index(), &layout::KC_METHOD)?;
        self.line(format!("{} {}", plant.senescence_start_doy, plant.senescence_end_doy), &layout::SENESCENCE)?;
        self.line(plant.p_values.iter().join(" "), &layout::P_VALUES)?;
        self.line(plant.ceres_temperatures.iter().join(" "), &layout::CERES_TEMPERATURES)?;
        self.line(plant.ceres_photoperiod.iter().join(" "), &layout::CERES_PHOTOPERIOD)?;
        self.line(plant.ceres_max_dev_rate.iter().join(" "), &layout::CERES_MAX_DEV_RATE)?;

        for (param, spec) in Param::ALL.iter().zip(layout::PARAM_LINES.iter()) {
            self.line(plant.params[*param], spec)?;
        }

        self.literal(layout::EMERGENCE_MARKER_TEXT)?;
        self.literal(&plant.emergence_harvest_dates)?;
        self.line(&counts, &layout::ROW_COUNTS_ECHO)?;

        for (i, table) in plant.tables.iter().enumerate() {
            self.literal(&layout::table_marker(i + 1))?;
            for (a, b) in table.rows.iter() {
                writeln!(self.buf, "{}{}{}{}", layout::ROW_INDENT, cell(a), layout::CELL_SEPARATOR, cell(b))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::de::from_str;
    use crate::model::{DataTable, FlagSet, InterceptionModel, KcMethod, SoilCo2Unit, StartDate, NUM_TABLES};
    use crate::test_utils::{sample_text, SAMPLE_COUNTS};

    fn nth_line(s: &str, n: usize) -> &str {
        s.lines().nth(n).unwrap_or_default()
    }

    #[test]
    fn test_ser_header() -> FResult<()> {
        let mut record = from_str(&sample_text(&SAMPLE_COUNTS))?;
        record.flags = FlagSet::from_array([true, false, false, true, false, false, true, false]);
        let s = to_string(&record)?;

        assert_eq!(nth_line(&s, 0), "soilco2 plant input");
        assert_eq!(nth_line(&s, 1), "3  version number");
        assert_eq!(nth_line(&s, 2), layout::FLAG_LABELS);
        assert_eq!(nth_line(&s, 3), "     T     F     F     T     F     F     T     F");
        assert_eq!(nth_line(&s, 4), "T daily timestep (T = daily, F = hourly)");
        assert_eq!(nth_line(&s, 5), "2015 01 01  start date of the simulation ( yyyy mm dd )");
        assert_eq!(nth_line(&s, 6), "1  no of plant types");
        assert_eq!(nth_line(&s, 7), "2  unit in SOILCO2 1=mm 2=cm 3=dm 4=m 5=km");
        assert_eq!(nth_line(&s, 8), "2  interception 1=Bormann, 2=Hoyningen-Huene");
        assert_eq!(nth_line(&s, 9), "50.87  latitude of the site                                                 (LATITUDE)");
        Ok(())
    }

    #[test]
    fn test_ser_plant_block() -> FResult<()> {
        let record = from_str(&sample_text(&SAMPLE_COUNTS))?;
        let s = to_string(&record)?;

        assert_eq!(nth_line(&s, 10), "# plant type 1 **************************************************");
        assert_eq!(nth_line(&s, 11), "winter wheat");
        assert_eq!(nth_line(&s, 12), "4 3 2 2 3 1 1 1 2 2 3 2 1 1 1 1 1   number of rows in the 17 tables");
        assert_eq!(nth_line(&s, 14), "25 no of parameters");
        assert_eq!(nth_line(&s, 16), "170 210   tstart, tend for senescence (day of year, i.e. Julian Date)");
        assert_eq!(nth_line(&s, 17), "-1 -25 -400 -600 -8000  p0, p1, p2h, p2l, p3 (mm)");
        assert_eq!(nth_line(&s, 20), "0.035 0.025 0  CERES: maximum development rate (h(-1))                          (RMAX)");
        assert_eq!(nth_line(&s, 24), "45.2      + exudation factor                                                    (EXU_FACT)");
        assert_eq!(nth_line(&s, 31), "40 \t  + potential CO2-assimilation rate of a unit leaf area for light saturation (kg CO2/ha leaf/h) (AMX)");
        assert_eq!(nth_line(&s, 46), "# emergence and harvest date(s)");
        assert_eq!(nth_line(&s, 47), "2015 10 15   2016 07 30");
        assert_eq!(nth_line(&s, 48), nth_line(&s, 12), "row counts should be repeated before the tables");
        assert_eq!(
            nth_line(&s, 49),
            "# (Tab.1) [for crop 1 2 3 5] #    Temperature sum against reduction factor of the maximal light assimilation rate"
        );
        assert_eq!(nth_line(&s, 50), "    0.0        0.10");
        assert!(s.ends_with("    0.0        0.10\n"), "output should end with the last row of table 17");
        Ok(())
    }

    #[test]
    fn test_ser_und_marker_normalized() -> FResult<()> {
        let text = sample_text(&SAMPLE_COUNTS).replacen("# emergence and harvest", "# emergence und harvest", 1);
        let s = to_string(&from_str(&text)?)?;
        assert_eq!(nth_line(&s, 46), "# emergence and harvest date(s)");
        Ok(())
    }

    #[test]
    fn test_empty_cells_written_as_zero() -> FResult<()> {
        let mut record = PlantsInRecord::default();
        record.plant_types[0].tables[3] = DataTable::from_rows([("", "1.5"), ("2", " ")]);
        record.plant_types[0].sync_row_counts();
        let s = to_string(&record)?;
        assert!(s.contains("\n    0        1.5\n    2        0\n"), "empty cells were not replaced:\n{s}");
        Ok(())
    }

    #[test]
    fn test_row_count_mismatch() {
        let mut record = PlantsInRecord::default();
        record.plant_types[0].tables[2].rows.push(("1".to_owned(), "2".to_owned()));
        let err = to_string(&record).unwrap_err();
        assert!(
            matches!(err, FormatError::RowCountMismatch { plant_type: 1, table: 3, declared: 0, actual: 1 }),
            "Wrong error: {err:?}"
        );

        let mut buf = vec![];
        assert!(to_writer(&record, &mut buf).is_err());
        assert!(buf.is_empty(), "nothing should be written for an invalid record");
    }

    #[test]
    fn test_no_plant_types() {
        let mut record = PlantsInRecord::default();
        record.plant_types.clear();
        assert!(matches!(to_string(&record), Err(FormatError::NoPlantTypes)));
    }

    #[test]
    fn test_enum_indices() -> FResult<()> {
        let text = sample_text(&SAMPLE_COUNTS);
        let mut record = from_str(&text)?;
        for unit in SoilCo2Unit::VARIANTS {
            record.soil_co2_unit = *unit;
            let s = to_string(&record)?;
            assert!(nth_line(&s, 7).starts_with(&format!("{}  unit", unit.disk_index())));
            assert_eq!(from_str(&s)?.soil_co2_unit, *unit);
        }

        for model in InterceptionModel::VARIANTS {
            record.interception_model = *model;
            let s = to_string(&record)?;
            assert_eq!(from_str(&s)?.interception_model, *model);
        }

        record.soil_co2_unit = SoilCo2Unit::Cm;
        assert!(nth_line(&to_string(&record)?, 7).starts_with("2 "));
        Ok(())
    }

    #[test]
    fn test_round_trip() -> FResult<()> {
        let mut record = from_str(&sample_text(&SAMPLE_COUNTS))?;
        let plant = &mut record.plant_types[0];
        plant.kc_method = KcMethod::Lai;
        plant.params[Param::Eff] = 0.000123;
        plant.params[Param::TempStart] = -1.5e-7;
        plant.push_row(1, ("1e3", "2.5d-1"));
        plant.resize_table(16, 0);
        record.start_date = StartDate::new(1999, 12, 31);
        record.latitude = -33.9;
        record.daily_timestep = false;

        let s = to_string(&record)?;
        let back = from_str(&s)?;
        assert_eq!(back, record);
        assert_eq!(to_string(&back)?, s, "writing the re-read record should give the same text");
        Ok(())
    }

    #[test]
    fn test_multiple_plant_types() -> FResult<()> {
        let mut record = from_str(&sample_text(&SAMPLE_COUNTS))?;
        let mut second = record.plant_types[0].clone();
        second.name = "sugar beet".to_owned();
        second.set_row_counts([2; NUM_TABLES]);
        second.params[Param::Nsl] = 11.0;
        record.plant_types.push(second);

        let s = to_string(&record)?;
        assert!(s.contains("\n# plant type 2 ****"), "second marker missing");
        let back = from_str(&s)?;
        assert_eq!(back.num_plant_types(), 2);
        assert_eq!(back, record);
        Ok(())
    }

    #[test]
    fn test_all_zero_end_to_end() -> FResult<()> {
        let text = sample_text(&[0; NUM_TABLES]);
        let zeroed: String = text.lines().enumerate().map(|(i, l)| {
            if (21..=45).contains(&i) {
                let comment = l.split_once(' ').map(|(_, c)| c).unwrap_or_default();
                format!("0 {comment}\n")
            } else {
                format!("{l}\n")
            }
        }).collect();

        let first = from_str(&zeroed)?;
        assert!(first.plant_types[0].params.iter().all(|(_, v)| v == 0.0));
        assert!(first.plant_types[0].tables.iter().all(|t| t.is_empty()));

        let second = from_str(&to_string(&first)?)?;
        assert_eq!(first, second);
        Ok(())
    }

    #[test]
    fn test_default_record_serializes() -> FResult<()> {
        let s = to_string(&PlantsInRecord::default())?;
        assert_eq!(s.lines().count(), 49 + NUM_TABLES);
        assert_eq!(nth_line(&s, 1), "1  version number");
        assert_eq!(nth_line(&s, 5), "0000 00 00  start date of the simulation ( yyyy mm dd )");
        assert_eq!(from_str(&s)?, PlantsInRecord::default());
        Ok(())
    }

    #[test]
    fn test_version_must_be_one_token() -> FResult<()> {
        let mut record = from_str(&sample_text(&SAMPLE_COUNTS))?;
        for bad in ["", "1 b"] {
            record.version = bad.to_owned();
            let err = to_string(&record).unwrap_err();
            assert!(
                matches!(&err, FormatError::UnwritableValue { plant_type: None, field: "version", value, .. } if value == bad),
                "Wrong error for version '{bad}': {err:?}"
            );
        }
        Ok(())
    }

    #[test]
    fn test_cells_must_be_single_numbers() -> FResult<()> {
        let mut record = from_str(&sample_text(&SAMPLE_COUNTS))?;
        record.plant_types[0].push_row(2, ("1 2", "3"));
        let err = to_string(&record).unwrap_err();
        assert!(
            matches!(&err, FormatError::UnwritableValue { plant_type: Some(1), field: "table value", value, .. } if value == "1 2"),
            "Wrong error: {err:?}"
        );

        record.plant_types[0].pop_row(2);
        record.plant_types[0].push_row(2, ("1", "abc"));
        assert!(matches!(to_string(&record), Err(FormatError::UnwritableValue { .. })));

        record.plant_types[0].pop_row(2);
        record.plant_types[0].push_row(2, ("1", "2.5d0"));
        assert_eq!(from_str(&to_string(&record)?)?, record);
        Ok(())
    }

    #[test]
    fn test_non_finite_numbers() -> FResult<()> {
        let sample = from_str(&sample_text(&SAMPLE_COUNTS))?;

        let mut record = sample.clone();
        record.latitude = f64::NAN;
        let err = to_string(&record).unwrap_err();
        assert!(matches!(err, FormatError::UnwritableValue { plant_type: None, field: "latitude", .. }), "Wrong error: {err:?}");

        let mut record = sample.clone();
        record.plant_types[0].params[Param::Sla] = f64::INFINITY;
        let err = to_string(&record).unwrap_err();
        assert!(matches!(err, FormatError::UnwritableValue { plant_type: Some(1), field: "SLA", .. }), "Wrong error: {err:?}");

        let mut record = sample;
        record.plant_types[0].ceres_photoperiod[2] = f64::NEG_INFINITY;
        let err = to_string(&record).unwrap_err();
        assert!(matches!(err, FormatError::UnwritableValue { field: "CERES photoperiod", .. }), "Wrong error: {err:?}");
        Ok(())
    }

    #[test]
    fn test_whole_lines_are_not_trimmed_or_split() -> FResult<()> {
        let sample = from_str(&sample_text(&SAMPLE_COUNTS))?;

        let mut record = sample.clone();
        record.plant_types[0].name = "winter wheat ".to_owned();
        let err = to_string(&record).unwrap_err();
        assert!(matches!(err, FormatError::UnwritableValue { field: "plant type name", .. }), "Wrong error: {err:?}");

        let mut record = sample;
        record.plant_types[0].emergence_harvest_dates = "2015 10 15\n2016 07 30".to_owned();
        let err = to_string(&record).unwrap_err();
        assert!(matches!(err, FormatError::UnwritableValue { field: "emergence and harvest dates", .. }), "Wrong error: {err:?}");
        Ok(())
    }
}
