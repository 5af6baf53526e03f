use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::EvaluationResult;

/// Identifier wrapper for a candidate's submission.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CandidateId(pub String);

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One row of a ranked review queue. `rank` starts at 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCandidate {
    pub rank: usize,
    pub candidate_id: CandidateId,
    pub result: EvaluationResult,
}

pub(super) fn order(mut evaluated: Vec<(CandidateId, EvaluationResult)>) -> Vec<RankedCandidate> {
    // Stable sort keeps submission order for ties.
    evaluated.sort_by(|(_, left), (_, right)| {
        left.is_knocked_out
            .cmp(&right.is_knocked_out)
            .then_with(|| {
                right
                    .weighted_score
                    .partial_cmp(&left.weighted_score)
                    .unwrap_or(Ordering::Equal)
            })
    });

    evaluated
        .into_iter()
        .enumerate()
        .map(|(index, (candidate_id, result))| RankedCandidate {
            rank: index + 1,
            candidate_id,
            result,
        })
        .collect()
}
