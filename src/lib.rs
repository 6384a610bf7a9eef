//! Read, edit and write the `plants.in` parameter file of the SOILCO2/AgroC simulator.
//!
//! The file is a fixed positional layout: a handful of header scalars, one block of
//! crop parameters per plant type, and 17 two-column data tables per plant type. Parse it
//! into a [`model::PlantsInRecord`] with [`de::from_str`], change what you need, and write
//! it back with [`ser::to_string`]:
//!
//! ```no_run
//! use plantsin::model::Param;
//!
//! let mut record = plantsin::files::load("plants.in").unwrap();
//! record.plant_types[0].params[Param::ExuFact] = 45.2;
//! plantsin::files::save(&record, "plants_mod.in").unwrap();
//! ```
extern crate pest;
#[macro_use]
extern crate pest_derive;
pub mod value_error;
pub mod format_error;
pub mod model;
pub(crate) mod layout;
pub(crate) mod parsing;
pub mod de;
pub mod ser;
pub mod files;
pub mod validate;
#[cfg(test)]
pub(crate) mod test_utils;
