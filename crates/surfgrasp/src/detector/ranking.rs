use super::scoring::ScoredCandidate;

/// Sort by utility, highest first. Equal utilities keep their incoming order.
pub fn rank_by_utility(scored: Vec<ScoredCandidate>) -> Vec<ScoredCandidate> {
    let mut scored = scored;
    scored.sort_by(|a, b| b.utility.total_cmp(&a.utility));
    scored
}
