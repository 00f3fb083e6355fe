//! Propellant identifiers and the built-in catalog.
//!
//! Identifiers are the short names used on the command line and in dataset
//! rows (`CH4`, `LOX`, `Aerozine-50`, ...). Each catalog entry carries the
//! reactant cards a CEA input deck needs and a coarse energetic fingerprint
//! used by the analytic oracle.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropellantRole {
    Fuel,
    Oxidizer,
}

impl fmt::Display for PropellantRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fuel => write!(f, "fuel"),
            Self::Oxidizer => write!(f, "oxid"),
        }
    }
}

/// One reactant line of a CEA `react` dataset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReactantCard {
    /// Species name as listed in the CEA thermo library
    pub species: &'static str,
    /// Weight percent within its role
    pub wt_pct: f64,
    /// Reactant temperature [K]
    pub temp_k: f64,
}

/// Coarse energetics used by the analytic oracle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Energetics {
    /// Relative combustion energy (LOX/CH4 = 1.0)
    pub energy: f64,
    /// Fuel: stoichiometric O/F against LOX. Oxidizer: oxidizing strength relative to LOX.
    pub stoich: f64,
    /// Mean molar mass of the products on this side of stoichiometric [kg/kmol]
    pub product_molar_mass: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PropellantEntry {
    pub canonical_id: &'static str,
    pub display_name: &'static str,
    pub role: PropellantRole,
    pub aliases: &'static [&'static str],
    pub cards: &'static [ReactantCard],
    pub energetics: Energetics,
}

impl PropellantEntry {
    pub fn matches(&self, name: &str) -> bool {
        let name = name.trim();
        self.canonical_id.eq_ignore_ascii_case(name)
            || self.aliases.iter().any(|alias| alias.eq_ignore_ascii_case(name))
    }

    pub fn matches_query(&self, query: &str) -> bool {
        let query = query.trim().to_ascii_lowercase();
        if query.is_empty() {
            return true;
        }

        self.canonical_id.to_ascii_lowercase().contains(&query)
            || self.display_name.to_ascii_lowercase().contains(&query)
            || self
                .aliases
                .iter()
                .any(|alias| alias.to_ascii_lowercase().contains(&query))
    }
}

const fn card(species: &'static str, wt_pct: f64, temp_k: f64) -> ReactantCard {
    ReactantCard {
        species,
        wt_pct,
        temp_k,
    }
}

const fn energetics(energy: f64, stoich: f64, product_molar_mass: f64) -> Energetics {
    Energetics {
        energy,
        stoich,
        product_molar_mass,
    }
}

const CATALOG: [PropellantEntry; 14] = [
    PropellantEntry {
        canonical_id: "CH4",
        display_name: "Liquid methane",
        role: PropellantRole::Fuel,
        aliases: &["methane", "LCH4"],
        cards: &[card("CH4(L)", 100.0, 111.643)],
        energetics: energetics(1.0, 4.0, 16.0),
    },
    PropellantEntry {
        canonical_id: "RP-1",
        display_name: "Kerosene (RP-1)",
        role: PropellantRole::Fuel,
        aliases: &["RP1", "kerosene"],
        cards: &[card("RP-1", 100.0, 298.15)],
        energetics: energetics(1.0, 3.4, 19.0),
    },
    PropellantEntry {
        canonical_id: "MeOH",
        display_name: "Methanol",
        role: PropellantRole::Fuel,
        aliases: &["methanol", "CH3OH"],
        cards: &[card("CH3OH(L)", 100.0, 298.15)],
        energetics: energetics(0.85, 1.5, 17.0),
    },
    PropellantEntry {
        canonical_id: "EtOH",
        display_name: "Ethanol",
        role: PropellantRole::Fuel,
        aliases: &["ethanol", "C2H5OH"],
        cards: &[card("C2H5OH(L)", 100.0, 298.15)],
        energetics: energetics(0.9, 2.1, 18.0),
    },
    PropellantEntry {
        canonical_id: "LH2",
        display_name: "Liquid hydrogen",
        role: PropellantRole::Fuel,
        aliases: &["hydrogen", "H2"],
        cards: &[card("H2(L)", 100.0, 20.27)],
        energetics: energetics(0.95, 8.0, 3.0),
    },
    PropellantEntry {
        canonical_id: "N2H4",
        display_name: "Hydrazine",
        role: PropellantRole::Fuel,
        aliases: &["hydrazine"],
        cards: &[card("N2H4(L)", 100.0, 298.15)],
        energetics: energetics(0.92, 1.0, 13.0),
    },
    PropellantEntry {
        canonical_id: "MMH",
        display_name: "Monomethylhydrazine",
        role: PropellantRole::Fuel,
        aliases: &["monomethylhydrazine", "CH6N2"],
        cards: &[card("CH6N2(L)", 100.0, 298.15)],
        energetics: energetics(0.95, 1.74, 14.0),
    },
    PropellantEntry {
        canonical_id: "UDMH",
        display_name: "Unsymmetrical dimethylhydrazine",
        role: PropellantRole::Fuel,
        aliases: &["C2H8N2"],
        cards: &[card("C2H8N2(L),UDMH", 100.0, 298.15)],
        energetics: energetics(0.95, 2.13, 15.0),
    },
    PropellantEntry {
        canonical_id: "Aerozine-50",
        display_name: "Aerozine 50 (50% N2H4 / 50% UDMH)",
        role: PropellantRole::Fuel,
        aliases: &["A-50", "A50", "Aerozine50"],
        cards: &[
            card("N2H4(L)", 50.0, 298.15),
            card("C2H8N2(L),UDMH", 50.0, 298.15),
        ],
        energetics: energetics(0.94, 1.5, 14.0),
    },
    PropellantEntry {
        canonical_id: "LOX",
        display_name: "Liquid oxygen",
        role: PropellantRole::Oxidizer,
        aliases: &["oxygen", "O2"],
        cards: &[card("O2(L)", 100.0, 90.17)],
        energetics: energetics(1.0, 1.0, 32.0),
    },
    PropellantEntry {
        canonical_id: "N2O4",
        display_name: "Nitrogen tetroxide",
        role: PropellantRole::Oxidizer,
        aliases: &["NTO"],
        cards: &[card("N2O4(L)", 100.0, 298.15)],
        energetics: energetics(0.85, 0.7, 30.0),
    },
    PropellantEntry {
        canonical_id: "HNO3",
        display_name: "Nitric acid",
        role: PropellantRole::Oxidizer,
        aliases: &["WFNA", "nitric acid"],
        cards: &[card("HNO3(L)", 100.0, 298.15)],
        energetics: energetics(0.8, 0.63, 29.0),
    },
    PropellantEntry {
        canonical_id: "RFNA",
        display_name: "Red fuming nitric acid",
        role: PropellantRole::Oxidizer,
        aliases: &["IRFNA"],
        cards: &[
            card("HNO3(L)", 83.5, 298.15),
            card("N2O4(L)", 14.0, 298.15),
            card("H2O(L)", 2.5, 298.15),
        ],
        energetics: energetics(0.8, 0.6, 29.0),
    },
    PropellantEntry {
        canonical_id: "H2O2",
        display_name: "Hydrogen peroxide",
        role: PropellantRole::Oxidizer,
        aliases: &["peroxide", "HTP"],
        cards: &[card("H2O2(L)", 100.0, 298.15)],
        energetics: energetics(0.7, 0.47, 24.0),
    },
];

/// All built-in propellants.
pub fn catalog() -> &'static [PropellantEntry] {
    &CATALOG
}

/// Look up a propellant by canonical id or alias (case-insensitive).
pub fn lookup(name: &str, role: PropellantRole) -> Option<&'static PropellantEntry> {
    CATALOG
        .iter()
        .find(|entry| entry.role == role && entry.matches(name))
}

/// Catalog entries whose id, name or aliases contain `query`.
pub fn search(query: &str) -> Vec<&'static PropellantEntry> {
    CATALOG
        .iter()
        .filter(|entry| entry.matches_query(query))
        .collect()
}

/// Fuels of the default batch grid, in order.
pub const DEFAULT_FUELS: [&str; 9] = [
    "CH4",
    "RP-1",
    "MeOH",
    "EtOH",
    "LH2",
    "N2H4",
    "MMH",
    "UDMH",
    "Aerozine-50",
];

/// Oxidizers of the default batch grid, in order.
pub const DEFAULT_OXIDIZERS: [&str; 5] = ["LOX", "N2O4", "HNO3", "RFNA", "H2O2"];

/// A (fuel, oxidizer) pair. Identifiers are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PropellantPair {
    pub fuel: String,
    pub oxidizer: String,
}

impl PropellantPair {
    pub fn new(fuel: impl Into<String>, oxidizer: impl Into<String>) -> Self {
        Self {
            fuel: fuel.into(),
            oxidizer: oxidizer.into(),
        }
    }

    pub fn fuel_entry(&self) -> Option<&'static PropellantEntry> {
        lookup(&self.fuel, PropellantRole::Fuel)
    }

    pub fn oxidizer_entry(&self) -> Option<&'static PropellantEntry> {
        lookup(&self.oxidizer, PropellantRole::Oxidizer)
    }

    /// File-name friendly `<fuel>_<oxidizer>` stem.
    pub fn file_stem(&self) -> String {
        format!("{}_{}", sanitize(&self.fuel), sanitize(&self.oxidizer))
    }
}

impl fmt::Display for PropellantPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.fuel, self.oxidizer)
    }
}

fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_grid_is_fully_cataloged() {
        for fuel in DEFAULT_FUELS {
            assert!(lookup(fuel, PropellantRole::Fuel).is_some(), "{fuel}");
        }
        for ox in DEFAULT_OXIDIZERS {
            assert!(lookup(ox, PropellantRole::Oxidizer).is_some(), "{ox}");
        }
    }

    #[test]
    fn lookup_respects_role_and_aliases() {
        assert_eq!(
            lookup("methane", PropellantRole::Fuel).map(|e| e.canonical_id),
            Some("CH4")
        );
        assert_eq!(
            lookup("nto", PropellantRole::Oxidizer).map(|e| e.canonical_id),
            Some("N2O4")
        );
        assert!(lookup("LOX", PropellantRole::Fuel).is_none());
    }

    #[test]
    fn blend_cards_sum_to_one_hundred() {
        for entry in catalog() {
            let total: f64 = entry.cards.iter().map(|c| c.wt_pct).sum();
            assert!((total - 100.0).abs() < 1e-9, "{}", entry.canonical_id);
        }
    }

    #[test]
    fn search_matches_display_name() {
        let hits = search("hydrazine");
        assert!(hits.iter().any(|e| e.canonical_id == "N2H4"));
        assert!(hits.iter().any(|e| e.canonical_id == "MMH"));
    }

    #[test]
    fn file_stem_is_filesystem_safe() {
        let pair = PropellantPair::new("Aerozine-50", "H2O2");
        assert_eq!(pair.file_stem(), "Aerozine-50_H2O2");
        let odd = PropellantPair::new("C2H8N2(L),UDMH", "O2(L)");
        assert_eq!(odd.file_stem(), "C2H8N2_L__UDMH_O2_L_");
    }
}
