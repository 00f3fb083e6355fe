//! Analytic ideal-rocket oracle.
//!
//! An in-process stand-in for the equilibrium solver. Chamber conditions come
//! from a smooth per-pair profile (temperature peaks near the optimum mixture
//! ratio, molar mass moves from the fuel-side to the oxidizer-side products),
//! and the nozzle is expanded isentropically with frozen composition:
//!
//! ```text
//! T*/Tc = 2/(γ+1)            p*/pc = (2/(γ+1))^(γ/(γ-1))
//! Ae/A* = (1/M)·[(2/(γ+1))(1 + (γ-1)/2·M²)]^((γ+1)/(2(γ-1)))
//! ```
//!
//! Reports use the CEA2 rocket-problem layout, so the report parser treats
//! this backend and a real CEA install identically. Mixture ratios outside
//! the pair's feasible window produce a report that stops after the chamber,
//! and exit states colder than the gas-phase limit are rendered as `NaN`,
//! matching how the real solver flags those samples.

use crate::error::{OracleError, OracleResult};
use crate::model::{DirectProperties, EquilibriumOracle, RawReport, StationTriple, TransportQuad};
use crate::propellant::{PropellantEntry, PropellantPair};
use crate::request::{ReportOptions, UnitSystem};
use crate::sample::SampleTriple;
use cg_core::ensure_finite;
use cg_core::units::constants::R_UNIVERSAL;
use cg_core::units::{ATM_IN_BAR, bar, in_pa};
use std::fmt::Write as _;

/// Exit states below this temperature [K] leave the gas-phase model.
const GAS_PHASE_MIN_T_K: f64 = 250.0;
const MACH_SOLVE_MAX: f64 = 60.0;
const MACH_SOLVE_ITER: usize = 200;
const KJ_PER_KCAL: f64 = 4.184;
const FT_PER_M: f64 = 3.280_84;

/// Smooth chamber-condition profile for one propellant pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairProfile {
    /// Mixture ratio of peak chamber temperature
    pub mr_opt: f64,
    /// Peak chamber temperature [K]
    pub t_peak: f64,
    /// Asymptotic chamber temperature far from the optimum [K]
    pub t_floor: f64,
    /// Width of the temperature peak in ln(O/F)
    pub width: f64,
    /// Product molar mass in the fuel-rich limit [kg/kmol]
    pub m_fuel_side: f64,
    /// Product molar mass in the oxidizer-rich limit [kg/kmol]
    pub m_ox_side: f64,
    /// Ratio of specific heats at peak temperature
    pub gamma_hot: f64,
    /// Ratio of specific heats at the floor temperature
    pub gamma_cold: f64,
    /// Mixture ratios the solver converges for
    pub feasible_mr: (f64, f64),
}

impl PairProfile {
    pub fn from_entries(fuel: &PropellantEntry, oxidizer: &PropellantEntry) -> Self {
        let f = fuel.energetics;
        let o = oxidizer.energetics;
        let mr_opt = 0.8 * f.stoich / o.stoich;
        Self {
            mr_opt,
            t_peak: 2900.0 + 700.0 * f.energy * o.energy,
            t_floor: 900.0,
            width: 0.9,
            m_fuel_side: f.product_molar_mass,
            m_ox_side: o.product_molar_mass,
            gamma_hot: 1.14,
            gamma_cold: 1.32,
            feasible_mr: (mr_opt / 40.0, mr_opt * 6.0),
        }
    }

    pub fn is_feasible(&self, mixture_ratio: f64) -> bool {
        mixture_ratio >= self.feasible_mr.0 && mixture_ratio <= self.feasible_mr.1
    }

    fn chamber_temperature(&self, pressure_bar: f64, mixture_ratio: f64) -> f64 {
        let x = (mixture_ratio / self.mr_opt).ln();
        let bell = (-(x * x) / (2.0 * self.width * self.width)).exp();
        let base = self.t_floor + (self.t_peak - self.t_floor) * bell;
        // Dissociation is suppressed at higher pressure.
        base * (pressure_bar / 68.9).powf(0.012)
    }

    fn chamber_molar_mass(&self, mixture_ratio: f64) -> f64 {
        let w = mixture_ratio / (mixture_ratio + self.mr_opt);
        self.m_fuel_side + (self.m_ox_side - self.m_fuel_side) * w
    }

    fn chamber_gamma(&self, t_chamber: f64) -> f64 {
        let span = (self.t_peak - self.t_floor).max(1.0);
        let hotness = ((t_chamber - self.t_floor) / span).clamp(0.0, 1.0);
        self.gamma_cold - (self.gamma_cold - self.gamma_hot) * hotness
    }
}

/// Thermodynamic and transport state at one station.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Station {
    p_bar: f64,
    t_k: f64,
    molar_mass: f64,
    gamma: f64,
    rho: f64,
    cp: f64,
    visc: f64,
    cond: f64,
    prandtl: f64,
    son_vel: f64,
    mach: f64,
}

impl Station {
    fn nan() -> Self {
        Self {
            p_bar: f64::NAN,
            t_k: f64::NAN,
            molar_mass: f64::NAN,
            gamma: f64::NAN,
            rho: f64::NAN,
            cp: f64::NAN,
            visc: f64::NAN,
            cond: f64::NAN,
            prandtl: f64::NAN,
            son_vel: f64::NAN,
            mach: f64::NAN,
        }
    }

    /// Frozen-composition state at temperature `t_k` on the isentrope from the chamber.
    fn on_isentrope(chamber: &Chamber, p_bar: f64, t_k: f64, mach: f64) -> Self {
        let cooling = 1.0 - t_k / chamber.t_k;
        let gamma = chamber.gamma * (1.0 + 0.04 * cooling);
        let molar_mass = chamber.molar_mass * (1.0 + 0.01 * cooling);
        let r_specific = R_UNIVERSAL / molar_mass;
        let rho = in_pa(bar(p_bar)) / (r_specific * t_k);
        let cp_j = gamma / (gamma - 1.0) * r_specific;
        let visc = 0.95 * (t_k / 3000.0).powf(0.7) * (molar_mass / 22.0).sqrt();
        // Eucken
        let prandtl = 4.0 * gamma / (9.0 * gamma - 5.0);
        // millipoise -> Pa·s, W/(m·K) -> mW/(cm·K)
        let cond = cp_j * (visc * 1e-4) / prandtl * 10.0;
        Self {
            p_bar,
            t_k,
            molar_mass,
            gamma,
            rho,
            cp: cp_j / 1000.0,
            visc,
            cond,
            prandtl,
            son_vel: (gamma * r_specific * t_k).sqrt(),
            mach,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Chamber {
    p_bar: f64,
    t_k: f64,
    molar_mass: f64,
    gamma: f64,
}

#[derive(Debug, Clone, Copy)]
struct Performance {
    cstar: f64,
    cf: StationTriple<f64>,
    ivac: StationTriple<f64>,
    isp: StationTriple<f64>,
}

#[derive(Debug, Clone)]
enum Solution {
    Infeasible { chamber: Chamber },
    Solved {
        stations: StationTriple<Station>,
        perf: Performance,
    },
}

/// Area ratio of isentropic flow at Mach `m`.
pub fn area_ratio_at_mach(m: f64, gamma: f64) -> f64 {
    let g1 = gamma - 1.0;
    let term = (2.0 / (gamma + 1.0)) * (1.0 + 0.5 * g1 * m * m);
    term.powf((gamma + 1.0) / (2.0 * g1)) / m
}

/// Supersonic Mach number for area ratio `eps` (bisection).
pub fn supersonic_mach(eps: f64, gamma: f64) -> f64 {
    if eps <= 1.0 {
        return 1.0;
    }
    let mut lo = 1.0;
    let mut hi = MACH_SOLVE_MAX;
    for _ in 0..MACH_SOLVE_ITER {
        let mid = 0.5 * (lo + hi);
        if area_ratio_at_mach(mid, gamma) < eps {
            lo = mid;
        } else {
            hi = mid;
        }
        if hi - lo < 1e-13 * mid {
            break;
        }
    }
    0.5 * (lo + hi)
}

/// Analytic oracle bound to one propellant pair.
#[derive(Debug, Clone)]
pub struct AnalyticOracle {
    pair: PropellantPair,
    fuel: &'static PropellantEntry,
    oxidizer: &'static PropellantEntry,
    profile: PairProfile,
}

impl AnalyticOracle {
    pub const NAME: &'static str = "analytic";

    /// Build an oracle for a cataloged pair.
    pub fn new(pair: PropellantPair) -> OracleResult<Self> {
        let fuel = pair
            .fuel_entry()
            .ok_or_else(|| OracleError::UnknownPropellant {
                name: pair.fuel.clone(),
                backend: Self::NAME,
            })?;
        let oxidizer = pair
            .oxidizer_entry()
            .ok_or_else(|| OracleError::UnknownPropellant {
                name: pair.oxidizer.clone(),
                backend: Self::NAME,
            })?;
        Ok(Self {
            pair,
            fuel,
            oxidizer,
            profile: PairProfile::from_entries(fuel, oxidizer),
        })
    }

    /// Override the pair profile (tests use this to force convergence behavior).
    pub fn with_profile(mut self, profile: PairProfile) -> Self {
        self.profile = profile;
        self
    }

    pub fn profile(&self) -> &PairProfile {
        &self.profile
    }

    fn check_sample(sample: &SampleTriple) -> OracleResult<()> {
        if ensure_finite(sample.pressure_bar, "chamber pressure")? <= 0.0 {
            return Err(OracleError::InvalidArg {
                what: "chamber pressure must be positive",
            });
        }
        if ensure_finite(sample.mixture_ratio, "mixture ratio")? <= 0.0 {
            return Err(OracleError::InvalidArg {
                what: "mixture ratio must be positive",
            });
        }
        if ensure_finite(sample.area_ratio, "area ratio")? < 1.0 {
            return Err(OracleError::InvalidArg {
                what: "area ratio must be >= 1",
            });
        }
        Ok(())
    }

    fn solve(&self, sample: &SampleTriple) -> Solution {
        let t_c = self
            .profile
            .chamber_temperature(sample.pressure_bar, sample.mixture_ratio);
        let chamber = Chamber {
            p_bar: sample.pressure_bar,
            t_k: t_c,
            molar_mass: self.profile.chamber_molar_mass(sample.mixture_ratio),
            gamma: self.profile.chamber_gamma(t_c),
        };

        if !self.profile.is_feasible(sample.mixture_ratio) {
            return Solution::Infeasible { chamber };
        }

        let g = chamber.gamma;
        let expo = g / (g - 1.0);

        let t_t = chamber.t_k * 2.0 / (g + 1.0);
        let p_t = chamber.p_bar * (2.0 / (g + 1.0)).powf(expo);

        let m_e = supersonic_mach(sample.area_ratio, g);
        let t_e = chamber.t_k / (1.0 + 0.5 * (g - 1.0) * m_e * m_e);
        let p_e = chamber.p_bar * (t_e / chamber.t_k).powf(expo);

        let c = Station::on_isentrope(&chamber, chamber.p_bar, chamber.t_k, 0.0);
        let t = Station::on_isentrope(&chamber, p_t, t_t, 1.0);
        let e = if t_e < GAS_PHASE_MIN_T_K {
            Station::nan()
        } else {
            Station::on_isentrope(&chamber, p_e, t_e, m_e)
        };

        let r_c = R_UNIVERSAL / chamber.molar_mass;
        let cstar = (g * r_c * chamber.t_k).sqrt()
            / (g * (2.0 / (g + 1.0)).powf((g + 1.0) / (2.0 * (g - 1.0))));
        let u_t = t.son_vel;
        let u_e = e.mach * e.son_vel;
        let p_c_pa = in_pa(bar(chamber.p_bar));
        let ivac_t = u_t + in_pa(bar(p_t)) * cstar / p_c_pa;
        let ivac_e = u_e + in_pa(bar(p_e)) * sample.area_ratio * cstar / p_c_pa;

        Solution::Solved {
            stations: StationTriple::new(c, t, e),
            perf: Performance {
                cstar,
                cf: StationTriple::new(f64::NAN, u_t / cstar, u_e / cstar),
                ivac: StationTriple::new(f64::NAN, ivac_t, ivac_e),
                isp: StationTriple::new(f64::NAN, u_t, u_e),
            },
        }
    }

    fn render(&self, sample: &SampleTriple, options: &ReportOptions, solution: &Solution) -> String {
        let mut out = String::new();
        let si = options.unit_system == UnitSystem::Si;

        out.push_str("\n *******************************************************************************\n\n");
        out.push_str("          ANALYTIC IDEAL-ROCKET MODEL, CEA2-COMPATIBLE REPORT LAYOUT\n\n");
        out.push_str(" *******************************************************************************\n\n");
        out.push_str("           THEORETICAL ROCKET PERFORMANCE ASSUMING FROZEN COMPOSITION\n\n");
        let _ = writeln!(
            out,
            " Pin = {:>9.3} {}",
            if si { sample.pressure_bar } else { sample.pressure_bar / ATM_IN_BAR },
            if si { "BAR" } else { "ATM" }
        );
        out.push_str(" CASE = \n\n");
        out.push_str("             REACTANT                    WT FRACTION      TEMP\n");
        for (entry, role) in [(self.fuel, "FUEL"), (self.oxidizer, "OXIDANT")] {
            for card in entry.cards {
                let _ = writeln!(
                    out,
                    " {:<11} {:<29} {:>9.7} {:>10.3}",
                    role,
                    card.species,
                    card.wt_pct / 100.0,
                    card.temp_k
                );
            }
        }
        let _ = writeln!(
            out,
            "\n O/F= {:>10.5}  %FUEL= {:>10.6}\n",
            sample.mixture_ratio,
            100.0 / (1.0 + sample.mixture_ratio)
        );

        match solution {
            Solution::Infeasible { chamber } => {
                out.push_str("                 CHAMBER\n");
                push_row(&mut out, if si { "P, BAR" } else { "P, ATM" }, &[pressure(chamber.p_bar, si)]);
                push_row(&mut out, "T, K", &[fmt_fixed(chamber.t_k, 2)]);
                let _ = writeln!(
                    out,
                    "\n WARNING!!  NO CONVERGENCE FOR O/F = {:.5} (FEASIBLE RANGE {:.5} TO {:.5})",
                    sample.mixture_ratio, self.profile.feasible_mr.0, self.profile.feasible_mr.1
                );
                out.push_str(" CALCULATIONS STOPPED AFTER POINT  1 (ROCKET)\n");
            }
            Solution::Solved { stations, perf } => {
                let st = stations.as_array();
                out.push_str("                 CHAMBER   THROAT     EXIT\n");
                if options.verbose {
                    push_row(&mut out, "Pinf/P", &st.map(|s| fmt_sig(stations.chamber.p_bar / s.p_bar)));
                }
                push_row(&mut out, if si { "P, BAR" } else { "P, ATM" }, &st.map(|s| pressure(s.p_bar, si)));
                push_row(&mut out, "T, K", &st.map(|s| fmt_fixed(s.t_k, 2)));
                if si {
                    push_row(&mut out, "RHO, KG/CU M", &st.map(|s| fmt_cea_exp(s.rho)));
                } else {
                    push_row(&mut out, "RHO, G/CC", &st.map(|s| fmt_cea_exp(s.rho / 1000.0)));
                }
                out.push('\n');
                push_row(&mut out, "MW, MOL WT", &st.map(|s| fmt_fixed(s.molar_mass, 3)));
                if options.verbose {
                    push_row(&mut out, "(dLV/dLP)t", &st.map(|_| fmt_fixed(-1.0, 5)));
                    push_row(&mut out, "(dLV/dLT)p", &st.map(|_| fmt_fixed(1.0, 4)));
                }
                push_row(&mut out, if si { "Cp, KJ/(KG)(K)" } else { "Cp, CAL/(G)(K)" }, &st.map(|s| fmt_fixed(cp_units(s.cp, si), 4)));
                push_row(&mut out, "GAMMAs", &st.map(|s| fmt_fixed(s.gamma, 4)));
                if si {
                    push_row(&mut out, "SON VEL,M/SEC", &st.map(|s| fmt_fixed(s.son_vel, 1)));
                } else {
                    push_row(&mut out, "SON VEL,FT/SEC", &st.map(|s| fmt_fixed(s.son_vel * FT_PER_M, 1)));
                }
                push_row(&mut out, "MACH NUMBER", &st.map(|s| fmt_fixed(s.mach, 3)));

                if options.transport {
                    out.push_str("\n TRANSPORT PROPERTIES (GASES ONLY)\n");
                    if si {
                        out.push_str("   CONDUCTIVITY IN UNITS OF MILLIWATTS/(CM)(K)\n\n");
                    } else {
                        out.push_str("   CONDUCTIVITY IN UNITS OF MILLICALORIES/(CM)(K)(SEC)\n\n");
                    }
                    push_row(&mut out, "VISC,MILLIPOISE", &st.map(|s| fmt_sig(s.visc)));
                    out.push_str("\n  WITH FROZEN REACTIONS\n\n");
                    push_row(&mut out, if si { "Cp, KJ/(KG)(K)" } else { "Cp, CAL/(G)(K)" }, &st.map(|s| fmt_fixed(cp_units(s.cp, si), 4)));
                    push_row(&mut out, "CONDUCTIVITY", &st.map(|s| fmt_fixed(cp_units(s.cond, si), 4)));
                    push_row(&mut out, "PRANDTL NUMBER", &st.map(|s| fmt_fixed(s.prandtl, 4)));
                }

                let vel = |v: f64| if si { v } else { v * FT_PER_M };
                out.push_str("\n PERFORMANCE PARAMETERS\n\n");
                let perf_rows: [(&str, [String; 2]); 5] = [
                    ("Ae/At", [fmt_fixed(1.0, 4), fmt_sig(sample.area_ratio)]),
                    (
                        if si { "CSTAR, M/SEC" } else { "CSTAR, FT/SEC" },
                        [fmt_fixed(vel(perf.cstar), 1), fmt_fixed(vel(perf.cstar), 1)],
                    ),
                    ("CF", [fmt_fixed(perf.cf.throat, 4), fmt_fixed(perf.cf.exit, 4)]),
                    (
                        if si { "Ivac, M/SEC" } else { "Ivac, LB-SEC/LB" },
                        [fmt_fixed(isp_units(perf.ivac.throat, si), 1), fmt_fixed(isp_units(perf.ivac.exit, si), 1)],
                    ),
                    (
                        if si { "Isp, M/SEC" } else { "Isp, LB-SEC/LB" },
                        [fmt_fixed(isp_units(perf.isp.throat, si), 1), fmt_fixed(isp_units(perf.isp.exit, si), 1)],
                    ),
                ];
                for (label, values) in perf_rows {
                    let _ = writeln!(out, " {:<25}{:>10}{:>10}", label, values[0], values[1]);
                }
            }
        }
        out
    }
}

impl EquilibriumOracle for AnalyticOracle {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn propellants(&self) -> &PropellantPair {
        &self.pair
    }

    fn full_report(
        &self,
        sample: &SampleTriple,
        options: &ReportOptions,
    ) -> OracleResult<RawReport> {
        Self::check_sample(sample)?;
        let solution = self.solve(sample);
        Ok(RawReport::new(self.render(sample, options, &solution)))
    }

    fn direct_properties(&self, sample: &SampleTriple) -> OracleResult<DirectProperties> {
        Self::check_sample(sample)?;
        let stations = match self.solve(sample) {
            Solution::Solved { stations, .. } => stations,
            Solution::Infeasible { .. } => {
                StationTriple::new(Station::nan(), Station::nan(), Station::nan())
            }
        };
        Ok(DirectProperties {
            density: stations.map(|s| s.rho),
            mach_exit: stations.exit.mach,
            transport: stations.map(|s| TransportQuad {
                specific_heat: s.cp,
                viscosity: s.visc,
                conductivity: s.cond,
                prandtl: s.prandtl,
            }),
        })
    }
}

fn cp_units(v_si: f64, si: bool) -> f64 {
    if si { v_si } else { v_si / KJ_PER_KCAL }
}

fn isp_units(v_m_s: f64, si: bool) -> f64 {
    if si {
        v_m_s
    } else {
        v_m_s / cg_core::units::constants::G0_MPS2
    }
}

fn pressure(p_bar: f64, si: bool) -> String {
    let v = if si { p_bar } else { p_bar / ATM_IN_BAR };
    if v.abs() < 1e-3 {
        fmt_cea_exp(v)
    } else {
        fmt_sig(v)
    }
}

fn push_row(out: &mut String, label: &str, values: &[String]) {
    let _ = write!(out, " {:<15}", label);
    for v in values {
        let _ = write!(out, "{:>10}", v);
    }
    out.push('\n');
}

fn fmt_fixed(v: f64, decimals: usize) -> String {
    format!("{:.*}", decimals, v)
}

/// Five significant digits in fixed notation.
fn fmt_sig(v: f64) -> String {
    if !v.is_finite() || v == 0.0 {
        return format!("{:.4}", v);
    }
    let magnitude = v.abs().log10().floor() as i32 + 1;
    let decimals = (5 - magnitude).clamp(0, 6) as usize;
    format!("{:.*}", decimals, v)
}

/// CEA compact exponent notation: `9.8212-1`, `1.5994 0`, `2.1000 1`.
pub fn fmt_cea_exp(v: f64) -> String {
    if !v.is_finite() {
        return format!("{v}");
    }
    if v == 0.0 {
        return "0.0000 0".to_string();
    }
    let mut exp = v.abs().log10().floor() as i32;
    let mut mantissa = v / 10f64.powi(exp);
    // Rounding to four decimals can carry into the next decade.
    if (mantissa.abs() * 1e4).round() >= 1e5 {
        exp += 1;
        mantissa = v / 10f64.powi(exp);
    }
    if exp < 0 {
        format!("{:.4}{}", mantissa, exp)
    } else {
        format!("{:.4} {}", mantissa, exp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ch4_lox() -> AnalyticOracle {
        AnalyticOracle::new(PropellantPair::new("CH4", "LOX")).unwrap()
    }

    #[test]
    fn unknown_propellant_is_rejected() {
        let err = AnalyticOracle::new(PropellantPair::new("Unobtainium", "LOX")).unwrap_err();
        assert!(matches!(err, OracleError::UnknownPropellant { .. }));
    }

    proptest! {
        #[test]
        fn area_mach_relation_inverts(eps in 1.01f64..200.0, gamma in 1.1f64..1.4) {
            let m = supersonic_mach(eps, gamma);
            prop_assert!(m > 1.0);
            let back = area_ratio_at_mach(m, gamma);
            prop_assert!((back - eps).abs() / eps < 1e-9, "eps={} back={}", eps, back);
        }
    }

    #[test]
    fn sonic_area_ratio_is_mach_one() {
        assert_eq!(supersonic_mach(1.0, 1.2), 1.0);
    }

    #[test]
    fn compact_exponent_format() {
        assert_eq!(fmt_cea_exp(0.98212), "9.8212-1");
        assert_eq!(fmt_cea_exp(1.5994), "1.5994 0");
        assert_eq!(fmt_cea_exp(21.0), "2.1000 1");
        assert_eq!(fmt_cea_exp(0.025123), "2.5123-2");
        assert_eq!(fmt_cea_exp(0.999996), "1.0000 0");
    }

    #[test]
    fn feasible_report_has_all_stations() {
        let oracle = ch4_lox();
        let sample = SampleTriple::new(20.0, 3.0, 10.0);
        let report = oracle.full_report(&sample, &ReportOptions::default()).unwrap();
        let text = report.text();
        assert!(text.contains("CHAMBER   THROAT     EXIT"));
        assert!(text.contains("P, BAR"));
        assert!(!text.contains("NaN"));
    }

    #[test]
    fn atm_report_uses_atm_labels() {
        let oracle = ch4_lox();
        let sample = SampleTriple::new(20.0, 3.0, 10.0);
        let options = ReportOptions::default().with_unit_system(UnitSystem::Atmospheres);
        let text = oracle.full_report(&sample, &options).unwrap().into_string();
        assert!(text.contains("P, ATM"));
        assert!(text.contains("RHO, G/CC"));
        assert!(!text.contains("P, BAR"));
    }

    #[test]
    fn infeasible_mixture_stops_after_chamber() {
        let oracle = ch4_lox();
        let sample = SampleTriple::new(20.0, 49.0, 10.0);
        let text = oracle
            .full_report(&sample, &ReportOptions::default())
            .unwrap()
            .into_string();
        assert!(!text.contains("EXIT"));
        assert!(text.contains("WARNING!!"));

        let props = oracle.direct_properties(&sample).unwrap();
        assert!(!props.is_finite());
    }

    #[test]
    fn cold_exit_is_flagged_as_nan() {
        let profile = PairProfile {
            t_peak: 500.0,
            t_floor: 450.0,
            ..*ch4_lox().profile()
        };
        let oracle = ch4_lox().with_profile(profile);
        let sample = SampleTriple::new(20.0, oracle.profile().mr_opt, 199.0);
        let text = oracle
            .full_report(&sample, &ReportOptions::default())
            .unwrap()
            .into_string();
        assert!(text.contains("EXIT"));
        assert!(text.contains("NaN"));
    }

    #[test]
    fn station_temperatures_drop_through_nozzle() {
        let oracle = ch4_lox();
        let sample = SampleTriple::new(50.0, 3.2, 40.0);
        match oracle.solve(&sample) {
            Solution::Solved { stations, .. } => {
                assert!(stations.chamber.t_k > stations.throat.t_k);
                assert!(stations.throat.t_k > stations.exit.t_k);
                assert!(stations.chamber.p_bar > stations.throat.p_bar);
                assert!(stations.throat.p_bar > stations.exit.p_bar);
                assert!((stations.throat.mach - 1.0).abs() < 1e-12);
                assert!(stations.exit.mach > 1.0);
            }
            Solution::Infeasible { .. } => panic!("expected a converged solution"),
        }
    }

    #[test]
    fn invalid_samples_are_errors() {
        let oracle = ch4_lox();
        let bad = SampleTriple::new(-1.0, 3.0, 10.0);
        assert!(oracle.full_report(&bad, &ReportOptions::default()).is_err());
        let bad = SampleTriple::new(10.0, 3.0, 0.5);
        assert!(oracle.direct_properties(&bad).is_err());
    }
}
