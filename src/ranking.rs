use crate::scoring::ScoredCombination;

pub fn rank(
    scored: &[ScoredCombination],
    min_velocity: i32,
    top_n: usize,
) -> Vec<ScoredCombination> {
    let mut kept: Vec<&ScoredCombination> = scored
        .iter()
        .filter(|r| r.velocity >= min_velocity)
        .collect();
    // sort_by is stable.
    kept.sort_by(|a, b| b.rank_key().total_cmp(&a.rank_key()));
    kept.into_iter().take(top_n).cloned().collect()
}
