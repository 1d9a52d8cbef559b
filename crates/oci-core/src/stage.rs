//! Emissions stages and extent query vocabulary.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supply-chain stage of an emissions estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Upstream,
    Midstream,
    Downstream,
}

impl Stage {
    pub const ALL: [Stage; 3] = [Stage::Upstream, Stage::Midstream, Stage::Downstream];

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Upstream => "upstream",
            Stage::Midstream => "midstream",
            Stage::Downstream => "downstream",
        }
    }
}

impl FromStr for Stage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "upstream" => Ok(Stage::Upstream),
            "midstream" => Ok(Stage::Midstream),
            "downstream" => Ok(Stage::Downstream),
            other => Err(format!("unknown stage `{other}`")),
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Per-field emissions for one run, in kg CO2 eq. per BOE.
///
/// Serialized field names match the persisted run artifact format
/// (`{"Upstream": n, "Midstream": n, "Downstream": n}`).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StageTriple {
    #[serde(rename = "Upstream")]
    pub upstream: f64,
    #[serde(rename = "Midstream")]
    pub midstream: f64,
    #[serde(rename = "Downstream")]
    pub downstream: f64,
}

impl StageTriple {
    pub fn get(&self, stage: Stage) -> f64 {
        match stage {
            Stage::Upstream => self.upstream,
            Stage::Midstream => self.midstream,
            Stage::Downstream => self.downstream,
        }
    }

    pub fn total(&self) -> f64 {
        self.upstream + self.midstream + self.downstream
    }
}

/// Component of an extent query: one stage, or the three-stage total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Component {
    Total,
    Stage(Stage),
}

impl Component {
    pub const ALL: [Component; 4] = [
        Component::Total,
        Component::Stage(Stage::Upstream),
        Component::Stage(Stage::Midstream),
        Component::Stage(Stage::Downstream),
    ];

    /// Parse a component key. `ghgTotal` is accepted as an alias of `total`;
    /// anything unrecognized degrades to `Total` rather than failing, since
    /// these keys arrive from UI state.
    pub fn from_key(key: &str) -> Component {
        match key {
            "upstream" => Component::Stage(Stage::Upstream),
            "midstream" => Component::Stage(Stage::Midstream),
            "downstream" => Component::Stage(Stage::Downstream),
            _ => Component::Total,
        }
    }

    /// Key used in the global-extents artifact.
    pub fn as_key(&self) -> &'static str {
        match self {
            Component::Total => "total",
            Component::Stage(s) => s.as_str(),
        }
    }

    /// Extract this component's scalar from a stage triple.
    pub fn select(&self, triple: &StageTriple) -> f64 {
        match self {
            Component::Total => triple.total(),
            Component::Stage(s) => triple.get(*s),
        }
    }
}

/// Aggregation direction for an extent query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Min,
    Max,
}

impl Direction {
    pub const ALL: [Direction; 2] = [Direction::Min, Direction::Max];

    pub fn as_key(&self) -> &'static str {
        match self {
            Direction::Min => "min",
            Direction::Max => "max",
        }
    }

    /// True if `candidate` is more extreme than `current` in this direction.
    pub fn improves(&self, candidate: f64, current: f64) -> bool {
        match self {
            Direction::Min => candidate < current,
            Direction::Max => candidate > current,
        }
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "min" => Ok(Direction::Min),
            "max" => Ok(Direction::Max),
            other => Err(format!("unknown direction `{other}`, expected min or max")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triple_total_and_select() {
        let t = StageTriple {
            upstream: 1.0,
            midstream: 2.0,
            downstream: 4.0,
        };
        assert_eq!(t.total(), 7.0);
        assert_eq!(Component::Total.select(&t), 7.0);
        assert_eq!(Component::Stage(Stage::Midstream).select(&t), 2.0);
    }

    #[test]
    fn ghg_total_aliases_total() {
        assert_eq!(Component::from_key("ghgTotal"), Component::Total);
        assert_eq!(Component::from_key("total"), Component::Total);
        assert_eq!(
            Component::from_key("upstream"),
            Component::Stage(Stage::Upstream)
        );
        // unknown keys degrade to total, never fail
        assert_eq!(Component::from_key("sideways"), Component::Total);
    }

    #[test]
    fn direction_improves() {
        assert!(Direction::Max.improves(2.0, 1.0));
        assert!(!Direction::Max.improves(1.0, 2.0));
        assert!(Direction::Min.improves(1.0, 2.0));
    }

    #[test]
    fn stage_parses_case_insensitive() {
        assert_eq!("Upstream".parse::<Stage>().unwrap(), Stage::Upstream);
        assert!("sideways".parse::<Stage>().is_err());
    }
}
