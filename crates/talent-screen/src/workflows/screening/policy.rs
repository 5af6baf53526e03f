use serde::{Deserialize, Serialize};

/// Thresholds behind the advisory warnings and authoring defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreeningPolicy {
    pub max_recommended_questions: usize,
    pub max_recommended_knockouts: usize,
    pub target_weight_total: u32,
    pub weight_tolerance: u32,
    /// Weight for new scored questions and for knockouts turned back into scored ones.
    pub default_scored_weight: u8,
}

impl Default for ScreeningPolicy {
    fn default() -> Self {
        Self {
            max_recommended_questions: 8,
            max_recommended_knockouts: 3,
            target_weight_total: 100,
            weight_tolerance: 5,
            default_scored_weight: 10,
        }
    }
}
