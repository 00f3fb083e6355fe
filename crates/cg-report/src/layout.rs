//! Per-layout report grammars.
//!
//! A layout names the station header and, for every extracted quantity, the
//! row labels to look for and the factor that brings the row into the
//! dataset's units.

use cg_core::units::ATM_IN_BAR;
use cg_oracle::{ReportOptions, UnitSystem};

/// Row rule: first matching label wins, values are multiplied by `scale`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelRule {
    /// Candidate labels in priority order
    pub labels: &'static [&'static str],
    pub scale: f64,
}

impl LabelRule {
    const fn new(labels: &'static [&'static str], scale: f64) -> Self {
        Self { labels, scale }
    }

    /// Primary label, used in error messages.
    pub fn primary(&self) -> &'static str {
        self.labels.first().copied().unwrap_or("")
    }
}

/// Grammar of one report flavour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReportLayout {
    pub name: &'static str,
    /// Unit system the oracle must be asked for to produce this layout
    pub unit_system: UnitSystem,
    /// Leading tokens of the station header line
    pub station_header: [&'static str; 3],
    /// Converted to bar
    pub pressure: LabelRule,
    pub temperature: LabelRule,
    pub molar_mass: LabelRule,
    pub adiabatic_index: LabelRule,
    /// Converted to kg/m³
    pub density: LabelRule,
    pub mach: LabelRule,
}

const STATIONS: [&str; 3] = ["CHAMBER", "THROAT", "EXIT"];
const TEMPERATURE: LabelRule = LabelRule::new(&["T, K"], 1.0);
// Equilibrium reports print M, (1/n); frozen reports print MW, MOL WT.
const MOLAR_MASS: LabelRule = LabelRule::new(&["M, (1/n)", "MW, MOL WT"], 1.0);
const GAMMA: LabelRule = LabelRule::new(&["GAMMAs"], 1.0);
const MACH: LabelRule = LabelRule::new(&["MACH NUMBER"], 1.0);

impl ReportLayout {
    /// CEA2 output with `siunits`.
    pub const CEA2_SI: ReportLayout = ReportLayout {
        name: "cea2-si",
        unit_system: UnitSystem::Si,
        station_header: STATIONS,
        pressure: LabelRule::new(&["P, BAR"], 1.0),
        temperature: TEMPERATURE,
        molar_mass: MOLAR_MASS,
        adiabatic_index: GAMMA,
        density: LabelRule::new(&["RHO, KG/CU M"], 1.0),
        mach: MACH,
    };

    /// CEA2 output in legacy units.
    pub const CEA2_ATM: ReportLayout = ReportLayout {
        name: "cea2-atm",
        unit_system: UnitSystem::Atmospheres,
        station_header: STATIONS,
        pressure: LabelRule::new(&["P, ATM"], ATM_IN_BAR),
        temperature: TEMPERATURE,
        molar_mass: MOLAR_MASS,
        adiabatic_index: GAMMA,
        density: LabelRule::new(&["RHO, G/CC"], 1000.0),
        mach: MACH,
    };

    /// Layout matching the unit system requested from the oracle.
    pub fn for_options(options: &ReportOptions) -> &'static ReportLayout {
        match options.unit_system {
            UnitSystem::Si => &Self::CEA2_SI,
            UnitSystem::Atmospheres => &Self::CEA2_ATM,
        }
    }

    /// True if `line` is this layout's station header.
    pub fn is_station_header(&self, line: &str) -> bool {
        let mut tokens = line.split_whitespace();
        self.station_header
            .iter()
            .all(|expected| tokens.next() == Some(*expected))
    }
}

/// Column text after `label` if the trimmed line starts with it.
///
/// The label must be followed by whitespace so `P, BAR` never matches a
/// longer label sharing its prefix.
pub fn columns_after<'a>(line: &'a str, label: &str) -> Option<&'a str> {
    let rest = line.trim_start().strip_prefix(label)?;
    match rest.chars().next() {
        Some(c) if c.is_whitespace() => Some(rest),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_follows_unit_system() {
        let si = ReportLayout::for_options(&ReportOptions::default());
        assert_eq!(si.name, "cea2-si");
        assert_eq!(si.pressure.primary(), "P, BAR");

        let atm = ReportLayout::for_options(
            &ReportOptions::default().with_unit_system(UnitSystem::Atmospheres),
        );
        assert_eq!(atm.pressure.primary(), "P, ATM");
        assert_eq!(atm.pressure.scale, 1.01325);
    }

    #[test]
    fn station_header_detection() {
        let layout = &ReportLayout::CEA2_SI;
        assert!(layout.is_station_header("                 CHAMBER   THROAT     EXIT"));
        assert!(layout.is_station_header(" CHAMBER THROAT EXIT EXIT"));
        assert!(!layout.is_station_header("                 CHAMBER"));
        assert!(!layout.is_station_header(" CHAMBER   COMB END   THROAT"));
    }

    #[test]
    fn label_needs_trailing_whitespace() {
        assert_eq!(columns_after(" T, K   3000.0", "T, K"), Some("   3000.0"));
        assert_eq!(columns_after(" MW, MOL WT  22.1", "M, (1/n)"), None);
        assert_eq!(columns_after(" P, BARX 1.0", "P, BAR"), None);
        assert_eq!(columns_after(" P, BAR", "P, BAR"), None);
    }
}
