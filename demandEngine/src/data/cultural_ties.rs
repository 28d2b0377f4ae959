use serde::{Deserialize, Serialize};
use crate::utils::errors::{DemandError, DemandResult};

/// A named set of countries sharing a tie, with the multiplier applied to
/// any pair of distinct members.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TieGroup {
    pub name: String,
    pub multiplier: f64,
    pub countries: Vec<String>,
}

/// A migration or business corridor. Stored with a direction, but looked up
/// in both directions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BilateralTie {
    pub from: String,
    pub to: String,
    pub multiplier: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CulturalTies {
    pub language_groups: Vec<TieGroup>,
    pub historical_ties: Vec<TieGroup>,
    pub trade_blocs: Vec<TieGroup>,
    pub bilateral: Vec<BilateralTie>,
}

impl CulturalTies {
    pub fn from_json_str(contents: &str) -> DemandResult<Self> {
        let ties: CulturalTies = serde_json::from_str(contents)?;
        ties.validate()?;
        Ok(ties)
    }

    fn validate(&self) -> DemandResult<()> {
        let groups = self
            .language_groups
            .iter()
            .chain(self.historical_ties.iter())
            .chain(self.trade_blocs.iter());

        for group in groups {
            if !(group.multiplier.is_finite() && group.multiplier > 0.0) {
                return Err(DemandError::InvalidData(format!(
                    "tie group {} has invalid multiplier {}",
                    group.name, group.multiplier
                )));
            }
        }
        for tie in &self.bilateral {
            if !(tie.multiplier.is_finite() && tie.multiplier > 0.0) {
                return Err(DemandError::InvalidData(format!(
                    "bilateral tie {}->{} has invalid multiplier {}",
                    tie.from, tie.to, tie.multiplier
                )));
            }
        }
        Ok(())
    }
}
