//! Deterministic ranking of aggregated totals.

use std::collections::HashMap;

use super::aggregate::Totals;

/// One entity's position in the standings.
#[derive(Debug, Clone, serde::Serialize)]
pub struct RankedEntry {
    /// 1-based position after sorting
    pub rank: u32,

    /// Entity key (team code or chest number)
    pub key: String,

    #[serde(flatten)]
    pub totals: Totals,
}

/// Sort totals into standings.
///
/// Order is points descending, ties broken by wins descending, then by
/// key ascending so equal entries always come out in the same order.
pub fn rank_totals(totals: HashMap<String, Totals>) -> Vec<RankedEntry> {
    let mut entries: Vec<(String, Totals)> = totals.into_iter().collect();
    entries.sort_by(|a, b| {
        b.1.points
            .total_cmp(&a.1.points)
            .then_with(|| b.1.wins.cmp(&a.1.wins))
            .then_with(|| a.0.cmp(&b.0))
    });

    entries
        .into_iter()
        .enumerate()
        .map(|(i, (key, totals))| RankedEntry {
            rank: (i + 1) as u32,
            key,
            totals,
        })
        .collect()
}
