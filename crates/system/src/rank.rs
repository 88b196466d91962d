use eco_core::{ProcessRecord, RankedView, Snapshot};

/// Top `n` processes of `snapshot` by CPU usage, highest first.
///
/// The sort is stable, so processes with equal CPU keep their enumeration
/// order and repeated calls on the same snapshot give the same view.
/// Fewer than `n` records yields all of them.
pub fn rank(snapshot: &Snapshot, n: usize) -> RankedView {
    let mut ordered: Vec<&ProcessRecord> = snapshot.records().iter().collect();
    ordered.sort_by(|a, b| b.cpu_percent.total_cmp(&a.cpu_percent));

    RankedView::from_ranked(ordered.into_iter().take(n).cloned().collect())
}
