//! Plausibility checks on a parsed record.
//!
//! A record can be perfectly well-formed and still be something the simulator will
//! reject or silently misuse, e.g. a latitude of 120 or a positive `RNA_MAX`. These
//! checks are advisory: nothing in [`crate::ser`] calls them.
use std::fmt::Display;

use crate::model::{Param, PlantsInRecord};

/// One problem found by [`validate`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    /// The field, prefixed with the plant type for per-plant fields, e.g. `"plant type 1: RNA_MAX"`
    pub field: String,
    pub message: String,
}

impl Issue {
    fn new<F: Into<String>, M: Into<String>>(field: F, message: M) -> Self {
        Self { field: field.into(), message: message.into() }
    }
}

impl Display for Issue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        2 if (year % 4 == 0 && year % 100 != 0) || year % 400 == 0 => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// Check `record` and return every issue found, in file order. An empty `Vec` means
/// nothing looked wrong.
pub fn validate(record: &PlantsInRecord) -> Vec<Issue> {
    let mut issues = vec![];

    if record.version.is_empty() || !record.version.chars().all(|c| c.is_ascii_digit()) {
        issues.push(Issue::new("version", format!("must be an unsigned integer, got '{}'", record.version)));
    }

    let date = record.start_date;
    if !(1..=12).contains(&date.month) {
        issues.push(Issue::new("start date", format!("month must be 1 to 12, got {}", date.month)));
    } else if !(1..=days_in_month(date.year, date.month)).contains(&date.day) {
        issues.push(Issue::new("start date", format!("{date} is not a valid date")));
    }

    if !(-90.0..=90.0).contains(&record.latitude) {
        issues.push(Issue::new("latitude", format!("must be between -90 and 90, got {}", record.latitude)));
    }

    if record.plant_types.is_empty() {
        issues.push(Issue::new("number of plant types", "at least one plant type is required"));
    }

    for (i, plant) in record.plant_types.iter().enumerate() {
        let prefix = format!("plant type {}", i + 1);

        for (name, doy) in [("senescence start", plant.senescence_start_doy), ("senescence end", plant.senescence_end_doy)] {
            if !(1..=366).contains(&doy) {
                issues.push(Issue::new(format!("{prefix}: {name}"), format!("day of year must be 1 to 366, got {doy}")));
            }
        }

        let ceres_flag = plant.ceres_temperatures[0];
        if ceres_flag != 0.0 && ceres_flag != 1.0 {
            issues.push(Issue::new(
                format!("{prefix}: CERES temperatures"),
                format!("first value selects the model and must be 0 or 1, got {ceres_flag}")
            ));
        }

        let rna_max = plant.params[Param::RnaMax];
        if rna_max > 0.0 {
            issues.push(Issue::new(format!("{prefix}: {}", Param::RnaMax), format!("should be zero or negative, got {rna_max}")));
        }
    }

    issues
}
