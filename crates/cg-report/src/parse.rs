//! Report parsing into typed station values.

use crate::layout::{LabelRule, ReportLayout, columns_after};
use crate::number::parse_values;
use crate::validate::{Validation, inspect};
use cg_oracle::StationTriple;
use thiserror::Error;
use tracing::trace;

/// Ways a report can disagree with its layout grammar.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    #[error("Station header not found (layout {layout})")]
    MissingHeader { layout: &'static str },

    #[error("Label '{label}' not found after the station header")]
    MissingLabel { label: &'static str },

    #[error("Label '{label}': expected {expected} values, found {found}")]
    TokenCount {
        label: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("Label '{label}': cannot parse '{token}'")]
    BadNumber { label: &'static str, token: String },
}

/// Thermodynamic values read from the report text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThermoStations {
    /// Throat pressure [bar]
    pub pressure_throat: f64,
    /// Exit pressure [bar]
    pub pressure_exit: f64,
    /// [K]
    pub temperature: StationTriple<f64>,
    /// [kg/kmol]
    pub molar_mass: StationTriple<f64>,
    pub adiabatic_index: StationTriple<f64>,
}

impl ThermoStations {
    pub fn is_finite(&self) -> bool {
        self.pressure_throat.is_finite()
            && self.pressure_exit.is_finite()
            && self.temperature.is_finite()
            && self.molar_mass.is_finite()
            && self.adiabatic_index.is_finite()
    }
}

/// Result of parsing one report.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedReport {
    Success(ThermoStations),
    /// Solver stopped before the exit station.
    MissingStation,
    /// Report carries non-finite values.
    NonFinite,
    /// Report passed validation but did not match the layout.
    UnrecognizedLayout(LayoutError),
}

impl ParsedReport {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Rejection category for logging.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Success(_) => "success",
            Self::MissingStation => "missing_station",
            Self::NonFinite => "non_finite",
            Self::UnrecognizedLayout(_) => "unrecognized_layout",
        }
    }
}

/// Values the report renders that the direct accessors also return.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReportOverlap {
    /// [kg/m³]
    pub density: StationTriple<f64>,
    pub mach_exit: f64,
}

/// Lines following the station header.
fn station_block<'a>(report: &'a str, layout: &ReportLayout) -> Result<Vec<&'a str>, LayoutError> {
    let mut lines = report.lines();
    lines
        .by_ref()
        .find(|line| layout.is_station_header(line))
        .ok_or(LayoutError::MissingHeader {
            layout: layout.name,
        })?;
    Ok(lines.collect())
}

/// Chamber/throat/exit values of the first row matching `rule`, scaled.
fn read_row(block: &[&str], rule: &LabelRule) -> Result<StationTriple<f64>, LayoutError> {
    let (label, columns) = rule
        .labels
        .iter()
        .find_map(|label| {
            block
                .iter()
                .find_map(|line| columns_after(line, label))
                .map(|columns| (*label, columns))
        })
        .ok_or(LayoutError::MissingLabel {
            label: rule.primary(),
        })?;

    let values = parse_values(columns).map_err(|token| LayoutError::BadNumber { label, token })?;
    if values.len() != 3 {
        return Err(LayoutError::TokenCount {
            label,
            expected: 3,
            found: values.len(),
        });
    }
    trace!(label, ?values, "Parsed report row");
    Ok(StationTriple::new(values[0], values[1], values[2]).map(|v| v * rule.scale))
}

fn parse_stations(report: &str, layout: &ReportLayout) -> Result<ThermoStations, LayoutError> {
    let block = station_block(report, layout)?;
    let pressure = read_row(&block, &layout.pressure)?;
    Ok(ThermoStations {
        pressure_throat: pressure.throat,
        pressure_exit: pressure.exit,
        temperature: read_row(&block, &layout.temperature)?,
        molar_mass: read_row(&block, &layout.molar_mass)?,
        adiabatic_index: read_row(&block, &layout.adiabatic_index)?,
    })
}

/// Validate and parse a report against `layout`.
pub fn parse_report(report: &str, layout: &ReportLayout) -> ParsedReport {
    match inspect(report) {
        Validation::NonFinite => return ParsedReport::NonFinite,
        Validation::MissingStation => return ParsedReport::MissingStation,
        Validation::Valid => {}
    }
    match parse_stations(report, layout) {
        Ok(stations) => ParsedReport::Success(stations),
        Err(err) => ParsedReport::UnrecognizedLayout(err),
    }
}

/// Density and exit Mach number as rendered in the report.
pub fn parse_overlap(report: &str, layout: &ReportLayout) -> Result<ReportOverlap, LayoutError> {
    let block = station_block(report, layout)?;
    let density = read_row(&block, &layout.density)?;
    let mach = read_row(&block, &layout.mach)?;
    Ok(ReportOverlap {
        density,
        mach_exit: mach.exit,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHORT_SI: &str = "
 O/F=    3.00000  %FUEL= 25.000000

                 CHAMBER   THROAT     EXIT
 Pinf/P            1.0000   1.7468   106.02
 P, BAR            20.000   11.450  0.18864
 T, K             3320.06  3127.37  1936.46
 RHO, KG/CU M    1.5994 0 9.8212-1 2.5123-2
 H, KJ/KG         -1234.5  -1754.4  -4790.2

 M, (1/n)          22.074   22.277   22.539
 MW, MOL WT        20.312   20.400   20.515
 GAMMAs            1.1433   1.1375   1.2047
 MACH NUMBER        0.000    1.000    3.522
";

    #[test]
    fn parses_equilibrium_labels() {
        let parsed = parse_report(SHORT_SI, &ReportLayout::CEA2_SI);
        let ParsedReport::Success(st) = &parsed else {
            panic!("expected success, got {parsed:?}");
        };
        assert_eq!(st.pressure_throat, 11.45);
        assert_eq!(st.pressure_exit, 0.18864);
        assert_eq!(st.temperature, StationTriple::new(3320.06, 3127.37, 1936.46));
        assert_eq!(st.molar_mass, StationTriple::new(22.074, 22.277, 22.539));
        assert_eq!(st.adiabatic_index.exit, 1.2047);
    }

    #[test]
    fn molar_mass_falls_back_to_frozen_label() {
        let frozen = SHORT_SI.replace(" M, (1/n)          22.074   22.277   22.539\n", "");
        let ParsedReport::Success(st) = parse_report(&frozen, &ReportLayout::CEA2_SI) else {
            panic!("expected success");
        };
        assert_eq!(st.molar_mass.chamber, 20.312);
    }

    #[test]
    fn overlap_reads_compact_density() {
        let overlap = parse_overlap(SHORT_SI, &ReportLayout::CEA2_SI).unwrap();
        assert_eq!(overlap.density.chamber, 1.5994);
        assert_eq!(overlap.density.throat, 0.98212);
        assert_eq!(overlap.mach_exit, 3.522);
    }

    #[test]
    fn wrong_layout_is_unrecognized() {
        let parsed = parse_report(SHORT_SI, &ReportLayout::CEA2_ATM);
        assert_eq!(
            parsed,
            ParsedReport::UnrecognizedLayout(LayoutError::MissingLabel { label: "P, ATM" })
        );
    }

    #[test]
    fn token_count_and_bad_number() {
        let short_row = SHORT_SI.replace("3320.06  3127.37  1936.46", "3320.06  3127.37");
        assert_eq!(
            parse_report(&short_row, &ReportLayout::CEA2_SI),
            ParsedReport::UnrecognizedLayout(LayoutError::TokenCount {
                label: "T, K",
                expected: 3,
                found: 2
            })
        );
        let garbled = SHORT_SI.replace("1.1375", "1.13**");
        assert!(matches!(
            parse_report(&garbled, &ReportLayout::CEA2_SI),
            ParsedReport::UnrecognizedLayout(LayoutError::BadNumber { label: "GAMMAs", .. })
        ));
    }

    #[test]
    fn missing_header() {
        let text = SHORT_SI.replace("CHAMBER   THROAT     EXIT", "EXIT");
        assert_eq!(
            parse_report(&text, &ReportLayout::CEA2_SI),
            ParsedReport::UnrecognizedLayout(LayoutError::MissingHeader { layout: "cea2-si" })
        );
    }

    #[test]
    fn validation_short_circuits() {
        let nan = SHORT_SI.replace("1936.46", "NaN");
        assert_eq!(parse_report(&nan, &ReportLayout::CEA2_SI), ParsedReport::NonFinite);
        let stopped = " CHAMBER\n P, BAR  20.0\n";
        assert_eq!(
            parse_report(stopped, &ReportLayout::CEA2_SI),
            ParsedReport::MissingStation
        );
        assert_eq!(ParsedReport::MissingStation.category(), "missing_station");
    }
}
