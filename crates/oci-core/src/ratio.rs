//! Display-unit ratios and the pure per-value conversion.
//!
//! Raw emissions are kg CO2 eq. per barrel. The alternate ratios divide by a
//! per-field energy or price constant and rescale grams-to-kilograms by 1000.

use std::str::FromStr;

/// Unit basis for a displayed emissions value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ratio {
    /// kg CO2 eq. per barrel (raw values, identity conversion).
    PerBarrel,
    /// g CO2 eq. per megajoule of processed oil and gas.
    PerMj,
    /// g CO2 eq. per dollar of blended product revenue (price-book driven).
    PerDollar,
    /// g CO2 eq. per dollar of crude at the current price.
    PerCurrent,
    /// g CO2 eq. per dollar of crude at the historic price.
    PerHistoric,
}

impl Ratio {
    pub const ALL: [Ratio; 5] = [
        Ratio::PerBarrel,
        Ratio::PerMj,
        Ratio::PerDollar,
        Ratio::PerCurrent,
        Ratio::PerHistoric,
    ];

    /// Parse a ratio key from UI state or a shared URL. Unknown keys yield
    /// `None`; callers fall back to identity rather than failing.
    pub fn from_key(key: &str) -> Option<Ratio> {
        match key {
            "perBarrel" => Some(Ratio::PerBarrel),
            "perMJ" => Some(Ratio::PerMj),
            "perDollar" => Some(Ratio::PerDollar),
            "perCurrent" => Some(Ratio::PerCurrent),
            "perHistoric" => Some(Ratio::PerHistoric),
            _ => None,
        }
    }

    pub fn as_key(&self) -> &'static str {
        match self {
            Ratio::PerBarrel => "perBarrel",
            Ratio::PerMj => "perMJ",
            Ratio::PerDollar => "perDollar",
            Ratio::PerCurrent => "perCurrent",
            Ratio::PerHistoric => "perHistoric",
        }
    }
}

impl FromStr for Ratio {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ratio::from_key(s).ok_or_else(|| format!("unknown ratio `{s}`"))
    }
}

/// Per-field constants needed by the converter, resolved by the caller from
/// the baseline field record and the current price book.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FieldConstants {
    /// MJ of processed oil and gas per barrel equivalent.
    pub heating_value: f64,
    /// Blended product revenue per barrel equivalent, from the price book.
    pub revenue_per_boe: f64,
    /// Per-$ crude oil constant, current price.
    pub current_price: f64,
    /// Per-$ crude oil constant, historic price.
    pub historic_price: f64,
}

/// Convert a raw per-barrel value into the requested ratio's units.
///
/// Pure and total: never fails. Conversions other than `PerBarrel` are
/// `value * (1/constant) * 1000` (the 1000 normalizes grams to kilograms).
pub fn convert(value: f64, ratio: Ratio, constants: &FieldConstants) -> f64 {
    match ratio {
        Ratio::PerBarrel => value,
        Ratio::PerMj => value * (1.0 / constants.heating_value) * 1000.0,
        Ratio::PerDollar => value * (1.0 / constants.revenue_per_boe) * 1000.0,
        Ratio::PerCurrent => value * (1.0 / constants.current_price) * 1000.0,
        Ratio::PerHistoric => value * (1.0 / constants.historic_price) * 1000.0,
    }
}
