//! The typed contents of a plants.in file.
//!
//! A [`PlantsInRecord`] is a plain value: parse one from a file with
//! [`de::from_str`](crate::de::from_str), edit its public fields, and hand it to
//! [`ser::to_string`](crate::ser::to_string) to get the file back. Nothing here
//! knows about line positions; that lives in the reader and writer.
use std::fmt::Display;
use std::ops::{Index, IndexMut};

/// Number of data tables each plant type carries.
pub const NUM_TABLES: usize = 17;

/// Number of named scalar crop parameters (RNA_MAX through SLAID_OFF).
pub const NUM_PARAMS: usize = 25;

/// The fixed description of each data table, in file order.
///
/// These are only written into the table marker comments; the reader does not check them.
pub const TABLE_HEADERS: [&str; NUM_TABLES] = [
    "Temperature sum against reduction factor of the maximal light assimilation rate",
    "Effective temperature against reduction factor of the maximal light assimilation rate",
    "Effective temperature against reduction factor of the development rate, if DVS < 1",
    "Effective temperature against reduction factor of the development rate, if DVS > 1",
    "DVS against fraction of dry matter allocated to the shoot",
    "Temperature sum against fraction of dry matter allocated to the leaves",
    "Temperature sum against fraction of dry matter allocated to the stem",
    "Temperature sum against fraction of dry matter allocated to the cob/root",
    "DVS against death rate of leaves reduction function",
    "Effective temperature against death rate of the leaves",
    "DVS or time against akc",
    "Relative root depth against root density",
    "DVS against N content leaves",
    "DVS against N content stems",
    "DVS against N content roots",
    "DVS against N content storage organs",
    "DVS against N content crowns",
];

/// A choice stored in the file as a 1-based index into a fixed list.
pub trait DiskIndexed: Copy + PartialEq + 'static {
    /// All variants, in the order of their on-disk index.
    const VARIANTS: &'static [Self];

    /// The 1-based index written to the file.
    fn disk_index(self) -> usize {
        Self::VARIANTS.iter()
            .position(|v| *v == self)
            .map_or(0, |i| i + 1)
    }

    /// The variant for a 1-based index read from the file, or `None` if out of range.
    fn from_disk_index(index: i64) -> Option<Self> {
        let i = usize::try_from(index).ok()?.checked_sub(1)?;
        Self::VARIANTS.get(i).copied()
    }
}

/// Length unit used by SOILCO2 for this file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SoilCo2Unit {
    #[default]
    Mm,
    Cm,
    Dm,
    M,
    Km,
}

impl DiskIndexed for SoilCo2Unit {
    const VARIANTS: &'static [Self] = &[Self::Mm, Self::Cm, Self::Dm, Self::M, Self::Km];
}

impl Display for SoilCo2Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SoilCo2Unit::Mm => "mm",
            SoilCo2Unit::Cm => "cm",
            SoilCo2Unit::Dm => "dm",
            SoilCo2Unit::M => "m",
            SoilCo2Unit::Km => "km",
        };

        write!(f, "{s}")
    }
}

/// Canopy interception model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InterceptionModel {
    #[default]
    Bormann,
    HoyningenHuene,
}

impl DiskIndexed for InterceptionModel {
    const VARIANTS: &'static [Self] = &[Self::Bormann, Self::HoyningenHuene];
}

impl Display for InterceptionModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            InterceptionModel::Bormann => "Bormann",
            InterceptionModel::HoyningenHuene => "Hoyningen-Huene",
        };

        write!(f, "{s}")
    }
}

/// How the crop coefficient Kc is computed (AKCTYPE).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum KcMethod {
    /// From the development stage (table 11 is DVS against Kc)
    #[default]
    Dvs,
    /// From time (table 11 is time against Kc)
    Time,
    /// Computed from the leaf area index
    Lai,
}

impl DiskIndexed for KcMethod {
    const VARIANTS: &'static [Self] = &[Self::Dvs, Self::Time, Self::Lai];
}

impl Display for KcMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            KcMethod::Dvs => "dvs",
            KcMethod::Time => "time",
            KcMethod::Lai => "computed from LAI",
        };

        write!(f, "{s}")
    }
}

/// The eight output/process switches on the third line of the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FlagSet {
    pub co2_fluxes: bool,
    pub respiration: bool,
    pub maint_growth: bool,
    pub water_stress: bool,
    pub root_exudation: bool,
    pub root_death: bool,
    pub harvest_residues: bool,
    pub farquhar: bool,
}

impl FlagSet {
    /// The flags in file order
    pub fn to_array(&self) -> [bool; 8] {
        [
            self.co2_fluxes,
            self.respiration,
            self.maint_growth,
            self.water_stress,
            self.root_exudation,
            self.root_death,
            self.harvest_residues,
            self.farquhar,
        ]
    }

    pub fn from_array(flags: [bool; 8]) -> Self {
        let [co2_fluxes, respiration, maint_growth, water_stress, root_exudation, root_death, harvest_residues, farquhar] = flags;
        Self { co2_fluxes, respiration, maint_growth, water_stress, root_exudation, root_death, harvest_residues, farquhar }
    }
}

/// Simulation start date. Not checked for calendar validity; see [`crate::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StartDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl StartDate {
    pub fn new(year: i32, month: u32, day: u32) -> Self {
        Self { year, month, day }
    }
}

impl Display for StartDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04} {:02} {:02}", self.year, self.month, self.day)
    }
}

/// The named scalar crop parameters, in file order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Param {
    RnaMax,
    RootMax,
    RootInit,
    ExuFact,
    DeathFacMax,
    Nsl,
    Rgr,
    TempBase,
    Sla,
    Rsla,
    Amx,
    Eff,
    Rkdf,
    Scp,
    RMainSo,
    AsrqSo,
    TempStart,
    DebrFac,
    Ls,
    RlaiCr,
    Eai,
    RMatr,
    Ssl,
    Srw,
    SlaidOff,
}

impl Param {
    pub const ALL: [Param; NUM_PARAMS] = [
        Param::RnaMax, Param::RootMax, Param::RootInit, Param::ExuFact, Param::DeathFacMax,
        Param::Nsl, Param::Rgr, Param::TempBase, Param::Sla, Param::Rsla,
        Param::Amx, Param::Eff, Param::Rkdf, Param::Scp, Param::RMainSo,
        Param::AsrqSo, Param::TempStart, Param::DebrFac, Param::Ls, Param::RlaiCr,
        Param::Eai, Param::RMatr, Param::Ssl, Param::Srw, Param::SlaidOff,
    ];

    /// The parameter's name as the simulator spells it, e.g. `"EXU_FACT"`.
    pub fn name(&self) -> &'static str {
        match self {
            Param::RnaMax => "RNA_MAX",
            Param::RootMax => "ROOT_MAX",
            Param::RootInit => "ROOT_INIT",
            Param::ExuFact => "EXU_FACT",
            Param::DeathFacMax => "DEATHFACMAX",
            Param::Nsl => "NSL",
            Param::Rgr => "RGR",
            Param::TempBase => "TEMPBASE",
            Param::Sla => "SLA",
            Param::Rsla => "RSLA",
            Param::Amx => "AMX",
            Param::Eff => "EFF",
            Param::Rkdf => "RKDF",
            Param::Scp => "SCP",
            Param::RMainSo => "RMAINSO",
            Param::AsrqSo => "ASRQSO",
            Param::TempStart => "TEMPSTART",
            Param::DebrFac => "DEBR_FAC",
            Param::Ls => "LS",
            Param::RlaiCr => "RLAICR",
            Param::Eai => "EAI",
            Param::RMatr => "RMATR",
            Param::Ssl => "SSL",
            Param::Srw => "SRW",
            Param::SlaidOff => "SLAID_OFF",
        }
    }

    /// Look up a parameter by its simulator name (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|p| p.name().eq_ignore_ascii_case(name))
    }
}

impl Display for Param {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Values of all [`Param`]s for one plant type, indexable by `Param`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgronomicParams([f64; NUM_PARAMS]);

impl AgronomicParams {
    pub fn from_array(values: [f64; NUM_PARAMS]) -> Self {
        Self(values)
    }

    pub fn to_array(&self) -> [f64; NUM_PARAMS] {
        self.0
    }

    /// Iterate over `(parameter, value)` pairs in file order
    pub fn iter(&self) -> impl Iterator<Item = (Param, f64)> + '_ {
        Param::ALL.iter().copied().zip(self.0.iter().copied())
    }
}

impl Index<Param> for AgronomicParams {
    type Output = f64;

    fn index(&self, index: Param) -> &Self::Output {
        &self.0[index as usize]
    }
}

impl IndexMut<Param> for AgronomicParams {
    fn index_mut(&mut self, index: Param) -> &mut Self::Output {
        &mut self.0[index as usize]
    }
}

/// One two-column data table. Cells keep the text they were read with.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DataTable {
    pub rows: Vec<(String, String)>,
}

impl DataTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rows<I, A, B>(rows: I) -> Self
    where I: IntoIterator<Item = (A, B)>,
          A: Into<String>,
          B: Into<String>
    {
        Self { rows: rows.into_iter().map(|(a, b)| (a.into(), b.into())).collect() }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Grow with `("0", "0")` rows or drop rows from the end until there are `n` rows.
    pub fn resize(&mut self, n: usize) {
        self.rows.resize_with(n, || ("0".to_owned(), "0".to_owned()));
    }
}

/// The parameter block and tables of one crop.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlantType {
    pub name: String,
    /// Declared number of rows for each table. Kept equal to the table lengths by the
    /// table editing methods; the writer refuses a record where they differ.
    pub table_row_counts: [usize; NUM_TABLES],
    pub num_planting_harvest_dates: u32,
    pub num_parameters: u32,
    pub kc_method: KcMethod,
    /// Day of year senescence starts
    pub senescence_start_doy: u32,
    /// Day of year senescence ends
    pub senescence_end_doy: u32,
    /// p0, p1, p2h, p2l, p3 (mm)
    pub p_values: [f64; 5],
    /// CERES temperatures (C). The first value is a model flag: 1 = new, 0 = old.
    pub ceres_temperatures: [f64; 13],
    /// CERES photoperiod: Popt, Pcrit (h), omega (1/h)
    pub ceres_photoperiod: [f64; 3],
    /// CERES maximum development rate, RMAX (1/h)
    pub ceres_max_dev_rate: [f64; 3],
    pub params: AgronomicParams,
    /// Emergence and harvest dates, kept as written
    pub emergence_harvest_dates: String,
    pub tables: [DataTable; NUM_TABLES],
}

impl PlantType {
    /// Set table `table` (0-based) to `rows` rows, padding with zeros.
    ///
    /// # Panics
    /// Panics if `table >= NUM_TABLES`.
    pub fn resize_table(&mut self, table: usize, rows: usize) {
        self.tables[table].resize(rows);
        self.table_row_counts[table] = rows;
    }

    /// Append a row to table `table` (0-based).
    ///
    /// # Panics
    /// Panics if `table >= NUM_TABLES`.
    pub fn push_row<A: Into<String>, B: Into<String>>(&mut self, table: usize, row: (A, B)) {
        self.tables[table].rows.push((row.0.into(), row.1.into()));
        self.table_row_counts[table] = self.tables[table].len();
    }

    /// Remove and return the last row of table `table` (0-based).
    ///
    /// # Panics
    /// Panics if `table >= NUM_TABLES`.
    pub fn pop_row(&mut self, table: usize) -> Option<(String, String)> {
        let row = self.tables[table].rows.pop();
        self.table_row_counts[table] = self.tables[table].len();
        row
    }

    /// Resize every table to the given row counts.
    pub fn set_row_counts(&mut self, counts: [usize; NUM_TABLES]) {
        for (i, n) in counts.into_iter().enumerate() {
            self.resize_table(i, n);
        }
    }

    /// Make the declared row counts match the current table lengths.
    pub fn sync_row_counts(&mut self) {
        for (count, table) in self.table_row_counts.iter_mut().zip(self.tables.iter()) {
            *count = table.len();
        }
    }
}

/// Everything in one plants.in file.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlantsInRecord {
    pub version: String,
    pub flags: FlagSet,
    /// `true` for a daily time step, `false` for hourly
    pub daily_timestep: bool,
    pub start_date: StartDate,
    pub soil_co2_unit: SoilCo2Unit,
    pub interception_model: InterceptionModel,
    /// Site latitude in degrees, -90 to 90
    pub latitude: f64,
    /// One entry per plant type; the file's "no of plant types" is this length.
    pub plant_types: Vec<PlantType>,
}

impl PlantsInRecord {
    pub fn num_plant_types(&self) -> usize {
        self.plant_types.len()
    }

    /// The plant type numbered `n` in the file, counting from 1 like the `# plant type N` markers.
    pub fn plant_type_mut(&mut self, n: usize) -> Option<&mut PlantType> {
        n.checked_sub(1).and_then(|i| self.plant_types.get_mut(i))
    }
}

impl Default for PlantsInRecord {
    /// A blank record with a single empty plant type, used when no file exists.
    fn default() -> Self {
        Self {
            version: "1".to_owned(),
            flags: FlagSet::default(),
            daily_timestep: false,
            start_date: StartDate::default(),
            soil_co2_unit: SoilCo2Unit::default(),
            interception_model: InterceptionModel::default(),
            latitude: 0.0,
            plant_types: vec![PlantType::default()],
        }
    }
}
