//! The ordered rank rule table.
//!
//! Rules are stored easiest first (index 0 is the entry tier) and evaluated
//! hardest first. Tier ordering everywhere in the engine is table position,
//! never the tier string.

use canopy_types::{Amount, TierId};
use serde::{Deserialize, Serialize};

use crate::RankError;

/// "At least `count` directs must hold `tier` or higher."
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StructuralRequirement {
    pub count: u32,
    pub tier: TierId,
}

/// One rank tier's requirements and payouts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RankRule {
    pub tier: TierId,
    pub min_team_volume: Amount,
    pub min_directs: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structural: Option<StructuralRequirement>,
    /// Percentage of a direct's daily yield paid to the rank holder.
    pub commission_rate_pct: f64,
    /// Bonus cap = holder's active stake principal × this multiplier.
    pub cap_multiplier: f64,
}

/// The validated, ordered rule table.
#[derive(Clone, Debug)]
pub struct RankRuleTable {
    rules: Vec<RankRule>,
}

impl RankRuleTable {
    /// Validate and build a table from rules ordered easiest first.
    pub fn new(rules: Vec<RankRule>) -> Result<Self, RankError> {
        if rules.is_empty() {
            return Err(RankError::InvalidRuleTable("table is empty".into()));
        }
        let entry = &rules[0];
        if entry.min_team_volume != Amount::ZERO
            || entry.min_directs != 0
            || entry.structural.is_some()
        {
            return Err(RankError::InvalidRuleTable(
                "entry tier must have zero requirements".into(),
            ));
        }
        for (i, rule) in rules.iter().enumerate() {
            if rules[..i].iter().any(|r| r.tier == rule.tier) {
                return Err(RankError::InvalidRuleTable(format!(
                    "duplicate tier {}",
                    rule.tier
                )));
            }
            if let Some(req) = &rule.structural {
                if !rules.iter().any(|r| r.tier == req.tier) {
                    return Err(RankError::InvalidRuleTable(format!(
                        "tier {} requires unknown tier {}",
                        rule.tier, req.tier
                    )));
                }
            }
        }
        Ok(Self { rules })
    }

    /// Table position of a tier: higher index = harder tier.
    pub fn index_of(&self, tier: &TierId) -> Option<usize> {
        self.rules.iter().position(|r| &r.tier == tier)
    }

    pub fn rule_for(&self, tier: &TierId) -> Option<&RankRule> {
        self.rules.iter().find(|r| &r.tier == tier)
    }

    /// The entry tier — what every account starts at and falls back to.
    pub fn lowest(&self) -> &RankRule {
        &self.rules[0]
    }

    /// Rules from hardest to easiest, the evaluation order.
    pub fn iter_hardest_first(&self) -> impl Iterator<Item = &RankRule> {
        self.rules.iter().rev()
    }

    /// Whether `tier` is at or above `floor` in table order. Tiers missing
    /// from the table never qualify.
    pub fn at_least(&self, tier: &TierId, floor: &TierId) -> bool {
        match (self.index_of(tier), self.index_of(floor)) {
            (Some(t), Some(f)) => t >= f,
            _ => false,
        }
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// The production B0..B9 table.
    pub fn default_table() -> Self {
        fn rule(
            tier: &str,
            volume: f64,
            directs: u32,
            structural: Option<(u32, &str)>,
            rate: f64,
            cap: f64,
        ) -> RankRule {
            RankRule {
                tier: TierId::new(tier),
                min_team_volume: Amount::new(volume),
                min_directs: directs,
                structural: structural.map(|(count, t)| StructuralRequirement {
                    count,
                    tier: TierId::new(t),
                }),
                commission_rate_pct: rate,
                cap_multiplier: cap,
            }
        }
        Self::new(vec![
            rule("B0", 0.0, 0, None, 0.0, 0.0),
            rule("B1", 1_000.0, 2, None, 5.0, 1.5),
            rule("B2", 5_000.0, 3, Some((2, "B1")), 6.0, 1.6),
            rule("B3", 15_000.0, 4, Some((2, "B2")), 7.0, 1.7),
            rule("B4", 40_000.0, 5, Some((2, "B3")), 8.0, 1.8),
            rule("B5", 100_000.0, 6, Some((2, "B4")), 9.0, 1.9),
            rule("B6", 250_000.0, 7, Some((3, "B5")), 10.0, 2.0),
            rule("B7", 600_000.0, 8, Some((3, "B6")), 11.0, 2.2),
            rule("B8", 1_500_000.0, 9, Some((3, "B7")), 12.0, 2.5),
            rule("B9", 4_000_000.0, 10, Some((3, "B8")), 15.0, 3.0),
        ])
        .expect("default table is valid")
    }
}
