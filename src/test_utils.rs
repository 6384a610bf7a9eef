//! A realistic plants.in file for tests, written the way users' files look
//! (lowercase flags, uneven spacing, the long flag label line).
use crate::layout::{self, PARAM_LINES};
use crate::model::NUM_TABLES;

pub(crate) const SAMPLE_COUNTS: [usize; NUM_TABLES] = [4, 3, 2, 2, 3, 1, 1, 1, 2, 2, 3, 2, 1, 1, 1, 1, 1];

const PARAM_VALUES: [&str; 25] = [
    "-10", "1500", "10", "45.2", "0.5", "250", "0.0082", "0.0", "0.0022", "0.0", "40.0",
    "0.45", "0.6", "0.2", "0.01", "1.41", "120", "0.3", "0.75", "4.0", "0.0", "0.0",
    "0.00025", "1000", "0.1",
];

/// Build the sample file with the given table row counts.
///
/// Row `j` of every table is `j.0` against `0.(10 + j)`.
pub(crate) fn sample_text(counts: &[usize; NUM_TABLES]) -> String {
    let counts_line = counts.iter().map(|c| c.to_string()).collect::<Vec<_>>().join(" ");
    let mut lines = vec![
        "soilco2 plant input".to_owned(),
        "3  version number".to_owned(),
        "CO2_fluxes   respiration   maint_growth (output files)   waterstress   rootExudation   rootDeath   harvestresidues   farquhar".to_owned(),
        "     f     f     f     t     f     f     t     f".to_owned(),
        "T daily timestep (T = daily, F = hourly)".to_owned(),
        "2015 01 01  start date of the simulation ( yyyy mm dd )".to_owned(),
        "1  no of plant types".to_owned(),
        "2  unit in SOILCO2 1=mm 2=cm 3=dm 4=m 5=km".to_owned(),
        "2  interception 1=Bormann, 2=Hoyningen-Huene".to_owned(),
        "50.87  latitude of the site                                                 (LATITUDE)".to_owned(),
        layout::plant_marker(1),
        "winter wheat".to_owned(),
        format!("{counts_line}   number of rows in the 17 tables"),
        "2  no of dates for planting/emergence and harvests".to_owned(),
        "25 no of parameters".to_owned(),
        "1  Kc calculation 1=dvs  2=time 3=computed from LAI                             (AKCTYPE)".to_owned(),
        format!("170 210{}", layout::SENESCENCE.comment),
        "-1. -25. -400. -600. -8000.  p0, p1, p2h, p2l, p3 (mm)".to_owned(),
        "1 0 26 34 0 7 21 30 0 10 25 30 34  CERES: temperatures (C) (first number: flag for 1=new or 0=old Model)".to_owned(),
        "20 8 0.5  CERES: photoperiod: Popt, Pcrit (h), omega (h(-1))".to_owned(),
        "0.035 0.025 0.0  CERES: maximum development rate (h(-1))                          (RMAX)".to_owned(),
    ];

    for (value, spec) in PARAM_VALUES.iter().zip(PARAM_LINES.iter()) {
        lines.push(format!("{value}{}", spec.comment));
    }

    lines.push("# emergence and harvest date(s)".to_owned());
    lines.push("2015 10 15   2016 07 30".to_owned());
    lines.push(format!("{counts_line}   number of rows in the 17 tables"));

    for (i, &n) in counts.iter().enumerate() {
        lines.push(layout::table_marker(i + 1));
        for j in 0..n {
            lines.push(format!("    {j}.0        0.{}", 10 + j));
        }
    }

    let mut text = lines.join("\n");
    text.push('\n');
    text
}
