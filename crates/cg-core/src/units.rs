// cg-core/src/units.rs

use uom::si::f64::Pressure as UomPressure;

pub type Pressure = UomPressure;

/// Bar per standard atmosphere.
pub const ATM_IN_BAR: f64 = 1.01325;

#[inline]
pub fn pa(v: f64) -> Pressure {
    use uom::si::pressure::pascal;
    Pressure::new::<pascal>(v)
}

#[inline]
pub fn bar(v: f64) -> Pressure {
    use uom::si::pressure::bar;
    Pressure::new::<bar>(v)
}

#[inline]
pub fn atm(v: f64) -> Pressure {
    use uom::si::pressure::atmosphere;
    Pressure::new::<atmosphere>(v)
}

#[inline]
pub fn in_bar(p: Pressure) -> f64 {
    p.get::<uom::si::pressure::bar>()
}

#[inline]
pub fn in_atm(p: Pressure) -> f64 {
    p.get::<uom::si::pressure::atmosphere>()
}

#[inline]
pub fn in_pa(p: Pressure) -> f64 {
    p.get::<uom::si::pressure::pascal>()
}

/// Atmospheres to bar, using the fixed factor CEA reports are scaled by.
#[inline]
pub fn atm_to_bar(v_atm: f64) -> f64 {
    v_atm * ATM_IN_BAR
}

#[inline]
pub fn bar_to_atm(v_bar: f64) -> f64 {
    v_bar / ATM_IN_BAR
}

pub mod constants {
    /// Universal gas constant [J/(kmol·K)]
    pub const R_UNIVERSAL: f64 = 8314.462_618;

    /// Standard gravity [m/s²]
    pub const G0_MPS2: f64 = 9.806_65;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::relative_deviation;

    fn close(a: f64, b: f64) -> bool {
        relative_deviation(a, b) < 1e-12
    }

    #[test]
    fn atm_and_bar_agree_with_uom() {
        assert!(close(in_bar(atm(1.0)), ATM_IN_BAR));
        assert!(close(atm_to_bar(10.0), in_bar(atm(10.0))));
        assert!(close(bar_to_atm(atm_to_bar(3.7)), 3.7));
        assert!(close(in_pa(bar(1.0)), 1e5));
        assert!(close(in_atm(pa(101_325.0)), 1.0));
    }
}
