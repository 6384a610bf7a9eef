//! Line positions and fixed comments of the plants.in layout.
//!
//! Header lines have absolute (0-based) offsets. Plant type lines have offsets
//! relative to that plant type's `# plant type N` marker, which for the first plant
//! type is line [`FIRST_PLANT_BLOCK`]. The reader takes the first `arity` tokens of
//! each line; the writer emits the values joined by single spaces followed by `comment`.
use crate::model::{NUM_PARAMS, TABLE_HEADERS};

/// One positional line of the file
#[derive(Debug, Clone, Copy)]
pub(crate) struct LineSpec {
    pub offset: usize,
    pub field: &'static str,
    pub arity: usize,
    pub comment: &'static str,
}

const fn line(offset: usize, field: &'static str, arity: usize, comment: &'static str) -> LineSpec {
    LineSpec { offset, field, arity, comment }
}

pub(crate) const FILE_HEADER: &str = "soilco2 plant input";
pub(crate) const FLAG_LABELS: &str = "CO2_fluxes   respiration   maint_growth   waterstress   rootExudation   rootDeath   harvestresidues   farquhar";
pub(crate) const FLAG_INDENT: &str = "     ";

pub(crate) const VERSION: LineSpec = line(1, "version", 1, "  version number");
// Line 2 holds FLAG_LABELS, the values are underneath
pub(crate) const FLAGS: LineSpec = line(3, "flags", 8, "");
pub(crate) const DAILY_TIMESTEP: LineSpec = line(4, "daily timestep flag", 1, " daily timestep (T = daily, F = hourly)");
pub(crate) const START_DATE: LineSpec = line(5, "start date", 3, "  start date of the simulation ( yyyy mm dd )");
pub(crate) const NUM_PLANT_TYPES: LineSpec = line(6, "number of plant types", 1, "  no of plant types");
pub(crate) const SOIL_CO2_UNIT: LineSpec = line(7, "SOILCO2 unit", 1, "  unit in SOILCO2 1=mm 2=cm 3=dm 4=m 5=km");
pub(crate) const INTERCEPTION_MODEL: LineSpec = line(8, "interception model", 1, "  interception 1=Bormann, 2=Hoyningen-Huene");
pub(crate) const LATITUDE: LineSpec = line(9, "latitude", 1, "  latitude of the site                                                 (LATITUDE)");

pub(crate) const FIRST_PLANT_BLOCK: usize = 10;

pub(crate) const PLANT_MARKER: LineSpec = line(0, "plant type marker", 0, "");
pub(crate) const PLANT_NAME: LineSpec = line(1, "plant type name", 0, "");
pub(crate) const ROW_COUNTS: LineSpec = line(2, "table row counts", 17, "   number of rows in the 17 tables");
pub(crate) const PLANTING_DATES: LineSpec = line(3, "number of planting/harvest dates", 1, "  no of dates for planting/emergence and harvests");
pub(crate) const NUM_PARAMETERS: LineSpec = line(4, "number of parameters", 1, " no of parameters");
pub(crate) const KC_METHOD: LineSpec = line(5, "Kc calculation method", 1, "  Kc calculation 1=dvs  2=time 3=computed from LAI                             (AKCTYPE)");
pub(crate) const SENESCENCE: LineSpec = line(6, "senescence days", 2, "   tstart, tend for senescence (day of year, i.e. Julian Date)");
pub(crate) const P_VALUES: LineSpec = line(7, "p values", 5, "  p0, p1, p2h, p2l, p3 (mm)");
pub(crate) const CERES_TEMPERATURES: LineSpec = line(8, "CERES temperatures", 13, "  CERES: temperatures (C) (first number: flag for 1=new or 0=old Model)");
pub(crate) const CERES_PHOTOPERIOD: LineSpec = line(9, "CERES photoperiod", 3, "  CERES: photoperiod: Popt, Pcrit (h), omega (h(-1))");
pub(crate) const CERES_MAX_DEV_RATE: LineSpec = line(10, "CERES maximum development rate", 3, "  CERES: maximum development rate (h(-1))                          (RMAX)");

/// One line per [`Param`](crate::model::Param), in `Param::ALL` order.
pub(crate) const PARAM_LINES: [LineSpec; NUM_PARAMS] = [
    line(11, "RNA_MAX", 1, "     + max depth above there is no root water uptake (mm)                  (RNA_MAX)"),
    line(12, "ROOT_MAX", 1, "      + max rooting depth (mm)                                    (ROOT_MAX)"),
    line(13, "ROOT_INIT", 1, "     + initial rooting depth (mm)                                          (ROOT_INIT)"),
    line(14, "EXU_FACT", 1, "      + exudation factor                                                    (EXU_FACT)"),
    line(15, "DEATHFACMAX", 1, "    + max factor used for deathfac                                        (DEATHFACMAX)"),
    line(16, "NSL", 1, "       + number of seedlings per m2                                          (NSL)"),
    line(17, "RGR", 1, "     + relative growth rate during exponential leaf area growth (ha/ha/C/d) (RGR)"),
    line(18, "TEMPBASE", 1, "       + base temperature for juvenile leaf area growth (C)                  (TEMPBASE)"),
    line(19, "SLA", 1, "    + specific leaf area of new leaves (ha leaf/kg DM)                    (SLA)"),
    line(20, "RSLA", 1, " + change of specific leaf area per unit thermal time (ha leaf/kg DM/C/d) (RSLA)"),
    line(21, "AMX", 1, " \t  + potential CO2-assimilation rate of a unit leaf area for light saturation (kg CO2/ha leaf/h) (AMX)"),
    line(22, "EFF", 1, "      + initial light use efficiency ((kg CO2/ha leaf/h)/(J/m2/s))          (EFF) (is changed from ha to L2 in plants.f90)"),
    line(23, "RKDF", 1, "      + extinction coefficient for diffuse PAR flux                         (RKDF)"),
    line(24, "SCP", 1, "       + scattering coefficient of leaves for PAR                            (SCP)"),
    line(25, "RMAINSO", 1, "      + maintenance demand rate for storage organs per unit dry matter (kg CH2O/kg DM/d) (RMAINSO)"),
    line(26, "ASRQSO", 1, "      + conversion efficiency coefficient (assimilation requirement of DM for storage organs) (kg CH2O/kg DM) (ASRQSO)"),
    line(27, "TEMPSTART", 1, "       + start temperature for plant growth (C*day) (crop 1: temp_sum from emergence till 31.Dec + tempstart for spring growth) (TEMPSTART)"),
    line(28, "DEBR_FAC", 1, "      + dead LAI debris factor                                              (DEBR_FAC)"),
    line(29, "LS", 1, "      + LAI as switch from temperature to radiation-limited LAI expansion (ha/ha) (LS)"),
    line(30, "RLAICR", 1, "       + critical LAI for leaf death due to self shading (ha/ha)             (RLAICR)"),
    line(31, "EAI", 1, "         + initial value of the ear area index (2sided) (crop 1-3,5)           (EAI)"),
    line(32, "RMATR", 1, "       + initial value of the maturity class (crop 4)                        (RMATR)"),
    line(33, "SSL", 1, "    + leaf area of one seedling (m2 leaf/seedling)                        (SSL)"),
    line(34, "SRW", 1, "    + specific root weight (m/g)                                          (SRW)"),
    line(35, "SLAID_OFF", 1, "       + dead leaf area for outside the season (ha/ha)                       (SLAID_OFF)"),
];

pub(crate) const EMERGENCE_MARKER: LineSpec = line(36, "emergence and harvest marker", 0, "");
pub(crate) const EMERGENCE_DATES: LineSpec = line(37, "emergence and harvest dates", 0, "");
// Repeats the row counts; only written, never read
pub(crate) const ROW_COUNTS_ECHO: LineSpec = line(38, "table row counts", 17, ROW_COUNTS.comment);
pub(crate) const TABLES_OFFSET: usize = 39;

/// Canonical spelling of the emergence marker line.
pub(crate) const EMERGENCE_MARKER_TEXT: &str = "# emergence and harvest date(s)";
/// Spelling written by some older editors; read, but flagged.
pub(crate) const EMERGENCE_MARKER_VARIANT: &str = "emergence und harvest";

pub(crate) const ROW_INDENT: &str = "    ";
pub(crate) const CELL_SEPARATOR: &str = "        ";

pub(crate) fn plant_marker(plant_type: usize) -> String {
    format!("# plant type {plant_type} {}", "*".repeat(50))
}

/// Marker line for table `table` (1-based)
pub(crate) fn table_marker(table: usize) -> String {
    let header = TABLE_HEADERS.get(table - 1).copied().unwrap_or_default();
    format!("# (Tab.{table}) [for crop 1 2 3 5] #    {header}")
}
