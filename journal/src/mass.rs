//! Mass quantities with unit auto-scaling.
//!
//! Doses arrive as strings like `"100mg"` or `"0.5g"`. [`Mass`] normalizes
//! every quantity to a fixed reference unit (milligrams) so repeated
//! accumulation never compounds rounding error from re-scaling, and derives
//! a display unit from the magnitude of the base value after every change.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// `<number><unit letters>`, e.g. `100mg`, `0.5g`, `200µg`.
static MASS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+\.?\d*)([a-zA-Zµ]+)$").unwrap());

#[derive(Debug, thiserror::Error)]
pub enum MassError {
    /// The string did not match `<number><unit>`.
    #[error("invalid mass format, expected a number followed by units (e.g. \"100mg\"), got: {0}")]
    InvalidFormat(String),
}

/// A mass quantity.
///
/// Invariants: `base` is the quantity in milligrams and is monotonically
/// non-decreasing under [`add`](Mass::add); `base == adjusted * multiplier`
/// holds at all times, where `adjusted` is the quantity expressed in the
/// current display `unit`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mass {
    /// Quantity in milligrams.
    pub base: f64,
    /// Scale of `unit` relative to milligrams.
    pub multiplier: f64,
    /// Quantity expressed in `unit`.
    pub adjusted: f64,
    /// Auto-selected display unit.
    pub unit: String,
}

/// Milligrams per unit for a recognized prefix. Unmatched prefixes fall
/// back to milligrams. The `mc` check has to precede the bare `m` check.
fn multiplier_from_unit(unit: &str) -> f64 {
    let unit = unit.to_lowercase();
    if unit.starts_with('µ') || unit.starts_with("mc") || unit.starts_with('u') {
        0.001
    } else if unit.starts_with('m') {
        1.0
    } else if unit.starts_with('g') {
        1000.0
    } else if unit.starts_with('k') {
        1_000_000.0
    } else {
        1.0
    }
}

impl Mass {
    /// Parse a mass string like `"100mg"`.
    pub fn parse(mass_str: &str) -> Result<Self, MassError> {
        let captures = MASS_RE
            .captures(mass_str)
            .ok_or_else(|| MassError::InvalidFormat(mass_str.to_string()))?;
        let number: f64 = captures[1]
            .parse()
            .map_err(|_| MassError::InvalidFormat(mass_str.to_string()))?;
        let base = number * multiplier_from_unit(&captures[2]);

        let mut mass = Self {
            base,
            multiplier: 1.0,
            adjusted: base,
            unit: "mg".to_string(),
        };
        mass.rescale();
        Ok(mass)
    }

    /// The `0mg` accumulation seed.
    pub fn zero() -> Self {
        Self {
            base: 0.0,
            multiplier: 1.0,
            adjusted: 0.0,
            unit: "mg".to_string(),
        }
    }

    /// Parse another mass string and fold it into this quantity.
    ///
    /// Unit mismatch is not an error: everything normalizes through the
    /// milligram base. Returns the new base value.
    pub fn add(&mut self, mass_str: &str) -> Result<f64, MassError> {
        let other = Self::parse(mass_str)?;
        self.base += other.base;
        self.rescale();
        Ok(self.base)
    }

    /// The base quantity re-expressed in a desired unit.
    pub fn mass_number(&self, desired_unit: &str) -> f64 {
        self.base / multiplier_from_unit(desired_unit)
    }

    /// The base quantity formatted in a desired unit, e.g. `"0.5g"`.
    pub fn mass_string(&self, desired_unit: &str) -> String {
        format!("{}{}", self.mass_number(desired_unit), desired_unit)
    }

    /// Re-derive the display unit from the magnitude of `base`.
    fn rescale(&mut self) {
        let (unit, divisor) = if self.base >= 1_000_000.0 {
            ("kg", 1_000_000.0)
        } else if self.base >= 1000.0 {
            ("g", 1000.0)
        } else if self.base >= 1.0 {
            ("mg", 1.0)
        } else {
            ("mcg", 0.001)
        };
        self.unit = unit.to_string();
        self.adjusted = self.base / divisor;
        self.multiplier = divisor;
    }
}

impl fmt::Display for Mass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.adjusted, self.unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_parse_normalizes_to_milligrams() {
        assert!(approx(Mass::parse("100mg").unwrap().base, 100.0));
        assert!(approx(Mass::parse("0.5g").unwrap().base, 500.0));
        assert!(approx(Mass::parse("200ug").unwrap().base, 0.2));
        assert!(approx(Mass::parse("200µg").unwrap().base, 0.2));
        assert!(approx(Mass::parse("150mcg").unwrap().base, 0.15));
        assert!(approx(Mass::parse("2kg").unwrap().base, 2_000_000.0));
    }

    #[test]
    fn test_parse_rejects_malformed_strings() {
        for bad in ["", "mg", "100", "12 mg", "abc100mg", "-5mg"] {
            assert!(
                matches!(Mass::parse(bad), Err(MassError::InvalidFormat(_))),
                "expected InvalidFormat for {bad:?}"
            );
        }
    }

    #[test]
    fn test_display_unit_auto_scales() {
        let grams = Mass::parse("1000mg").unwrap();
        assert_eq!(grams.unit, "g");
        assert!(approx(grams.adjusted, 1.0));

        let micro = Mass::parse("0.2mg").unwrap();
        assert_eq!(micro.unit, "mcg");
        assert!(approx(micro.adjusted, 200.0));

        let kilo = Mass::parse("1500g").unwrap();
        assert_eq!(kilo.unit, "kg");
        assert!(approx(kilo.adjusted, 1.5));
    }

    #[test]
    fn test_base_equals_adjusted_times_multiplier() {
        for s in ["15mg", "750ug", "3.2g", "9kg"] {
            let mass = Mass::parse(s).unwrap();
            assert!(
                approx(mass.base, mass.adjusted * mass.multiplier),
                "invariant broken for {s}"
            );
        }
    }

    #[test]
    fn test_add_is_order_independent() {
        let mut a = Mass::parse("500mg").unwrap();
        a.add("0.5g").unwrap();
        let mut b = Mass::parse("0.5g").unwrap();
        b.add("500mg").unwrap();

        assert!(approx(a.base, 1000.0));
        assert!(approx(a.base, b.base));
        assert_eq!(a.unit, "g");
    }

    #[test]
    fn test_five_microgram_additions_reach_one_milligram() {
        let mut total = Mass::zero();
        for _ in 0..5 {
            total.add("200ug").unwrap();
        }
        assert!(approx(total.base, 1.0));
        assert_eq!(total.unit, "mg");
        assert!(approx(total.adjusted, 1.0));
    }

    #[test]
    fn test_add_rejects_malformed_and_leaves_value_intact() {
        let mut mass = Mass::parse("100mg").unwrap();
        assert!(mass.add("garbage").is_err());
        assert!(approx(mass.base, 100.0));
    }

    #[test]
    fn test_desired_unit_conversions() {
        let mass = Mass::parse("1500mg").unwrap();
        assert!(approx(mass.mass_number("g"), 1.5));
        assert!(approx(mass.mass_number("ug"), 1_500_000.0));
        assert_eq!(mass.mass_string("g"), "1.5g");
        assert_eq!(mass.to_string(), "1.5g");
    }

    #[test]
    fn test_display_of_tiny_values_reparses() {
        // f64 Display always renders plain decimal digits, so even
        // sub-microgram quantities survive the render-and-add cycle the
        // accumulators use.
        let tiny = Mass::parse("0.0000001mg").unwrap();
        assert_eq!(tiny.to_string(), "0.0001mcg");

        let mut total = Mass::zero();
        total.add(&tiny.to_string()).unwrap();
        assert!(approx(total.base, 1e-7));
    }

    #[test]
    fn test_serde_round_trip() {
        let mass = Mass::parse("250mg").unwrap();
        let json = serde_json::to_string(&mass).unwrap();
        let back: Mass = serde_json::from_str(&json).unwrap();
        assert_eq!(mass, back);
    }
}
