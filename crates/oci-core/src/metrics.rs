//! Chart metric catalog.
//!
//! Maps each programmatic metric key to the column name it carries in the
//! baseline dataset, a display name, and units. Unknown keys surface directly
//! in UI labels, so lookups degrade to a diagnostic placeholder instead of
//! failing.

const KG_PER_BOE: &str = "kg CO\u{2082} eq./barrel oil equivalent oil and gas";

/// Placeholder returned for unknown metric keys.
pub const KEY_ERROR: &str = "KEY ERROR";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricKey {
    GhgPerMj,
    GhgTotal,
    Upstream,
    Midstream,
    Downstream,
    MethaneFv,
    Co2Fv,
    Leakage,
    HeatingValue,
    Years,
    Depth,
    Wells,
    GasRatio,
    FlaringRatio,
    SteamRatio,
    ApiGravity,
    SulfurContent,
    Production,
    TotalProcessed,
    Gasoline,
    JetFuel,
    Diesel,
    FuelOil,
    Petcoke,
    HeavyEnds,
    NaturalGasLiquids,
    Lpg,
    Feedstocks,
    IndustryGhg,
    ConsumerGhg,
    MethaneCo2,
    FlaringCo2,
    CarbonFee,
    ProductionVolume,
    EmissionRate,
}

impl MetricKey {
    /// Parse a programmatic key; `None` for anything unrecognized.
    pub fn parse(key: &str) -> Option<MetricKey> {
        use MetricKey::*;
        Some(match key {
            "ghgPerMJ" => GhgPerMj,
            "ghgTotal" => GhgTotal,
            "upstream" => Upstream,
            "midstream" => Midstream,
            "downstream" => Downstream,
            "methaneFV" => MethaneFv,
            "co2FV" => Co2Fv,
            "leakage" => Leakage,
            "heatingValue" => HeatingValue,
            "years" => Years,
            "depth" => Depth,
            "wells" => Wells,
            "gasRatio" => GasRatio,
            "flaringRatio" => FlaringRatio,
            "steamRatio" => SteamRatio,
            "apiGravity" => ApiGravity,
            "sulfurContent" => SulfurContent,
            "production" => Production,
            "totalProcessed" => TotalProcessed,
            "gasoline" => Gasoline,
            "jetFuel" => JetFuel,
            "diesel" => Diesel,
            "fuelOil" => FuelOil,
            "petcoke" => Petcoke,
            "heavyEnds" => HeavyEnds,
            "naturalGas" => NaturalGasLiquids,
            "LPG" => Lpg,
            "feedstocks" => Feedstocks,
            "industryGHG" => IndustryGhg,
            "consumerGHG" => ConsumerGhg,
            "methaneco2" => MethaneCo2,
            "flaringco2" => FlaringCo2,
            "carbonFee" => CarbonFee,
            "productionVolume" => ProductionVolume,
            "emissionRate" => EmissionRate,
            _ => return None,
        })
    }

    /// Column name in the baseline dataset.
    pub fn dataset_key(&self) -> &'static str {
        use MetricKey::*;
        match self {
            GhgPerMj => "Total Emissions (MJ)",
            GhgTotal => "Total Emissions",
            Upstream => "Upstream Emissions",
            Midstream => "Midstream Emissions",
            Downstream => "Downstream Emissions",
            MethaneFv => "Methane Fugitives + Venting tonnes methane per day",
            Co2Fv => "CO2 Fugitives + Venting tonnes CO2e per day",
            Leakage => "Methane Leakage Rate tonnes methane per tonnes wellbore gas",
            HeatingValue => "Heating Value Processed Oil and Gas",
            Years => "Years in Production",
            Depth => "Depth",
            Wells => "Number of Producing Wells",
            GasRatio => "Gas-to-Oil Ratio",
            FlaringRatio => "Flaring-to-Oil Ratio",
            SteamRatio => "Steam-to-Oil Ratio",
            ApiGravity => "API Gravity",
            SulfurContent => "Sulfur Content Weight Percent",
            Production => "2017 Crude Production Volume",
            TotalProcessed => "Estimated Total Processed Oil, NGLs, and Gas",
            Gasoline => "Gasoline Volume",
            JetFuel => "Jet Fuel Volume",
            Diesel => "Diesel Volume",
            FuelOil => "Fuel Oil Volume",
            Petcoke => "Petroleum Coke Volume",
            HeavyEnds => "Liquid Heavy Ends Volume",
            NaturalGasLiquids => "Natural Gas Liquids Volume",
            Lpg => "Liquefied Petroleum Gases Volume",
            Feedstocks => "Petrochemical Feedstocks Volume",
            IndustryGhg => "Industry GHG Responsibility",
            ConsumerGhg => "Consumer GHG Responsibility",
            MethaneCo2 => "Methane Fugitives + Venting kg CO2e per BOE",
            FlaringCo2 => "Flaring kg CO2e per BOE",
            CarbonFee => "Carbon Fee on Total GHG Emissions",
            ProductionVolume => "2017 Total Oil and Gas Production Volume ",
            EmissionRate => "",
        }
    }

    pub fn display_name(&self) -> &'static str {
        use MetricKey::*;
        match self {
            GhgPerMj => "Total Emissions (MJ)",
            GhgTotal => "Total Emissions",
            Upstream => "Upstream Emissions",
            Midstream => "Midstream Emissions",
            Downstream => "Downstream Emissions",
            MethaneFv => "Methane Fugitives + Venting",
            Co2Fv => "CO2 Fugitives + Venting",
            Leakage => "Methane Leakage Rate",
            HeatingValue => "Heating Value Processed Oil and Gas",
            Years => "Years in Production",
            Depth => "Depth",
            Wells => "Number of Producing Wells",
            GasRatio => "Gas-to-Oil Ratio",
            FlaringRatio => "Flaring-to-Oil Ratio",
            SteamRatio => "Steam-to-Oil Ratio",
            ApiGravity => "API Gravity",
            SulfurContent => "Sulfur Content Weight Percent",
            Production => "2017 Crude Production Volume",
            TotalProcessed => "Estimated Total Processed Oil, NGLs, and Gas",
            Gasoline => "Gasoline Volume",
            JetFuel => "Jet Fuel Volume",
            Diesel => "Diesel Volume",
            FuelOil => "Fuel Oil Volume",
            Petcoke => "Petroleum Coke Volume",
            HeavyEnds => "Liquid Heavy Ends Volume",
            NaturalGasLiquids => "Natural Gas Liquids Volume",
            Lpg => "Liquefied Petroleum Gases Volume",
            Feedstocks => "Petrochemical Feedstocks Volume",
            IndustryGhg => "Industry GHG Responsibility",
            ConsumerGhg => "Consumer GHG Responsibility",
            MethaneCo2 => "Methane Fugitives + Venting",
            FlaringCo2 => "Flaring",
            CarbonFee => "Carbon Fee on Total GHG Emissions",
            ProductionVolume => "2017 Total Oil and Gas Production Volume",
            EmissionRate => "Emission Rate",
        }
    }

    pub fn units(&self) -> &'static str {
        use MetricKey::*;
        match self {
            GhgPerMj => "kg CO\u{2082} eq./MJ",
            GhgTotal | Upstream | Midstream | Downstream => KG_PER_BOE,
            MethaneFv => "tonnes methane per day",
            Co2Fv => "tonnes CO\u{2082} eq. per day",
            Leakage => "tonnes methane per tonnes wellbore gas",
            Years => "years",
            Depth => "feet",
            ApiGravity => "Deg API",
            SulfurContent => "%",
            MethaneCo2 | FlaringCo2 => "kg CO\u{2082} eq. per BOE",
            CarbonFee => "$/kg CO\u{2082}",
            ProductionVolume => "barrel oil equivalent oil and gas",
            EmissionRate => "barrel oil equivalent per day",
            _ => "",
        }
    }
}

/// Dataset column for a raw key, with the diagnostic placeholder fallback.
pub fn dataset_key_for(key: &str) -> &'static str {
    match MetricKey::parse(key) {
        Some(m) => m.dataset_key(),
        None => {
            tracing::warn!(key, "unknown metric key");
            KEY_ERROR
        }
    }
}

/// Display name for a raw key, with the diagnostic placeholder fallback.
pub fn display_name_for(key: &str) -> &'static str {
    MetricKey::parse(key).map_or(KEY_ERROR, |m| m.display_name())
}

/// Units for a raw key, with the diagnostic placeholder fallback.
pub fn units_for(key: &str) -> &'static str {
    MetricKey::parse(key).map_or(KEY_ERROR, |m| m.units())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_keys_resolve() {
        assert_eq!(dataset_key_for("upstream"), "Upstream Emissions");
        assert_eq!(units_for("ghgPerMJ"), "kg CO\u{2082} eq./MJ");
        assert_eq!(display_name_for("methaneFV"), "Methane Fugitives + Venting");
    }

    #[test]
    fn unknown_keys_degrade_to_placeholder() {
        assert_eq!(dataset_key_for("nope"), KEY_ERROR);
        assert_eq!(display_name_for(""), KEY_ERROR);
        assert_eq!(units_for("nope"), KEY_ERROR);
    }
}
