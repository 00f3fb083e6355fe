//! Dataset rows and the fixed column schema.

use cg_oracle::{DirectProperties, PropellantPair, SampleTriple};
use cg_report::ThermoStations;

/// Export column order.
pub const COLUMNS: [&str; 32] = [
    "fuel",
    "oxidizer",
    "pressure",
    "mixture",
    "area_ratio",
    "pressure_throat",
    "pressure_exit",
    "molar_mass_chamber",
    "molar_mass_throat",
    "molar_mass_exit",
    "adiabat_chamber",
    "adiabat_throat",
    "adiabat_exit",
    "temperature_chamber",
    "temperature_throat",
    "temperature_exit",
    "rho_chamber",
    "rho_throat",
    "rho_exit",
    "spec_heat_chamber",
    "spec_heat_throat",
    "spec_heat_exit",
    "visc_chamber",
    "visc_throat",
    "visc_exit",
    "cond_chamber",
    "cond_throat",
    "cond_exit",
    "prandtl_chamber",
    "prandtl_throat",
    "prandtl_exit",
    "mach_exit",
];

/// Number of numeric columns (everything after fuel and oxidizer).
pub const NUMERIC_COLUMNS: usize = COLUMNS.len() - 2;

/// Report-parsed and accessor values for one accepted sample. Every field is finite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StationRecord {
    thermo: ThermoStations,
    direct: DirectProperties,
}

impl StationRecord {
    /// `None` if any value is non-finite.
    pub fn new(thermo: ThermoStations, direct: DirectProperties) -> Option<Self> {
        (thermo.is_finite() && direct.is_finite()).then_some(Self { thermo, direct })
    }

    pub fn thermo(&self) -> &ThermoStations {
        &self.thermo
    }

    pub fn direct(&self) -> &DirectProperties {
        &self.direct
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DatasetRow {
    pub fuel: String,
    pub oxidizer: String,
    pub sample: SampleTriple,
    pub record: StationRecord,
}

impl DatasetRow {
    pub fn new(pair: &PropellantPair, sample: SampleTriple, record: StationRecord) -> Self {
        Self {
            fuel: pair.fuel.clone(),
            oxidizer: pair.oxidizer.clone(),
            sample,
            record,
        }
    }

    /// Numeric values in [`COLUMNS`] order, starting at `pressure`.
    pub fn values(&self) -> [f64; NUMERIC_COLUMNS] {
        let t = &self.record.thermo;
        let d = &self.record.direct;
        let tr = &d.transport;
        [
            self.sample.pressure_bar,
            self.sample.mixture_ratio,
            self.sample.area_ratio,
            t.pressure_throat,
            t.pressure_exit,
            t.molar_mass.chamber,
            t.molar_mass.throat,
            t.molar_mass.exit,
            t.adiabatic_index.chamber,
            t.adiabatic_index.throat,
            t.adiabatic_index.exit,
            t.temperature.chamber,
            t.temperature.throat,
            t.temperature.exit,
            d.density.chamber,
            d.density.throat,
            d.density.exit,
            tr.chamber.specific_heat,
            tr.throat.specific_heat,
            tr.exit.specific_heat,
            tr.chamber.viscosity,
            tr.throat.viscosity,
            tr.exit.viscosity,
            tr.chamber.conductivity,
            tr.throat.conductivity,
            tr.exit.conductivity,
            tr.chamber.prandtl,
            tr.throat.prandtl,
            tr.exit.prandtl,
            d.mach_exit,
        ]
    }

    /// Value of a numeric column by name.
    pub fn get(&self, column: &str) -> Option<f64> {
        let idx = COLUMNS.iter().position(|c| *c == column)?;
        idx.checked_sub(2).map(|i| self.values()[i])
    }
}

/// Accepted rows for one propellant pair, in acceptance order.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pair: PropellantPair,
    rows: Vec<DatasetRow>,
}

impl Dataset {
    pub fn new(pair: PropellantPair) -> Self {
        Self {
            pair,
            rows: Vec::new(),
        }
    }

    pub fn pair(&self) -> &PropellantPair {
        &self.pair
    }

    pub fn rows(&self) -> &[DatasetRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub(crate) fn push(&mut self, row: DatasetRow) {
        self.rows.push(row);
    }

    /// All values of one numeric column.
    pub fn column(&self, name: &str) -> Option<Vec<f64>> {
        let idx = COLUMNS.iter().position(|c| *c == name)?.checked_sub(2)?;
        Some(self.rows.iter().map(|row| row.values()[idx]).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cg_oracle::{StationTriple, TransportQuad};

    fn record(exit_t: f64) -> Option<StationRecord> {
        let thermo = ThermoStations {
            pressure_throat: 11.0,
            pressure_exit: 0.2,
            temperature: StationTriple::new(3300.0, 3100.0, exit_t),
            molar_mass: StationTriple::new(22.0, 22.1, 22.2),
            adiabatic_index: StationTriple::new(1.14, 1.15, 1.2),
        };
        let quad = TransportQuad {
            specific_heat: 2.0,
            viscosity: 1.0,
            conductivity: 4.0,
            prandtl: 0.5,
        };
        let direct = DirectProperties {
            density: StationTriple::new(1.6, 1.0, 0.03),
            mach_exit: 3.5,
            transport: StationTriple::new(quad, quad, quad),
        };
        StationRecord::new(thermo, direct)
    }

    #[test]
    fn non_finite_record_is_refused() {
        assert!(record(1900.0).is_some());
        assert!(record(f64::NAN).is_none());
        assert!(record(f64::INFINITY).is_none());
    }

    #[test]
    fn values_follow_column_order() {
        let pair = PropellantPair::new("CH4", "LOX");
        let row = DatasetRow::new(&pair, SampleTriple::new(20.0, 3.0, 10.0), record(1900.0).unwrap());
        assert_eq!(row.get("pressure"), Some(20.0));
        assert_eq!(row.get("area_ratio"), Some(10.0));
        assert_eq!(row.get("pressure_exit"), Some(0.2));
        assert_eq!(row.get("temperature_exit"), Some(1900.0));
        assert_eq!(row.get("rho_throat"), Some(1.0));
        assert_eq!(row.get("prandtl_exit"), Some(0.5));
        assert_eq!(row.get("mach_exit"), Some(3.5));
        assert_eq!(row.get("fuel"), None);
        assert_eq!(row.get("nope"), None);
    }

    #[test]
    fn dataset_columns() {
        let pair = PropellantPair::new("CH4", "LOX");
        let mut ds = Dataset::new(pair.clone());
        assert!(ds.is_empty());
        ds.push(DatasetRow::new(&pair, SampleTriple::new(20.0, 3.0, 10.0), record(1900.0).unwrap()));
        ds.push(DatasetRow::new(&pair, SampleTriple::new(30.0, 2.0, 5.0), record(1800.0).unwrap()));
        assert_eq!(ds.column("temperature_exit"), Some(vec![1900.0, 1800.0]));
        assert_eq!(ds.column("oxidizer"), None);
    }
}
