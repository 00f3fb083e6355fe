//! cg-report: turning oracle reports into numbers.
//!
//! Contains:
//! - validate (accept/reject policy on the raw text)
//! - number (CEA compact number notation)
//! - layout (per-unit-system report grammars)
//! - parse (tagged `ParsedReport` + overlap rows for channel checks)

pub mod layout;
pub mod number;
pub mod parse;
pub mod validate;

pub use layout::{LabelRule, ReportLayout};
pub use parse::{LayoutError, ParsedReport, ReportOverlap, ThermoStations, parse_overlap, parse_report};
pub use validate::{Validation, inspect, is_valid};
