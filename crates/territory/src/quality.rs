//! Partition quality via the silhouette coefficient.
//!
//! Degenerate inputs map to fixed sentinel scores that downstream dashboards
//! rely on:
//! - an empty zone, or fewer than two labels after dropping unassigned nodes → 1.0;
//! - fewer than three nodes with finite coordinates → 0.0;
//! - any non-finite intermediate → 0.0.
//!
//! Otherwise the score is the mean over nodes of `(b − a) / max(a, b)` with
//! Euclidean distances on raw coordinates (`a` = mean distance within the own
//! zone, `b` = smallest mean distance to another zone; singleton zones score 0).

use std::collections::BTreeMap;
use std::fmt;

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::graph::Graph;
use crate::partition::Partition;

/// Coarse reading of a silhouette score.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityLabel {
    Excellent,
    Good,
    Acceptable,
    Weak,
    Invalid,
}

impl QualityLabel {
    /// `≥ 0.7` excellent, `≥ 0.5` good, `≥ 0.25` acceptable, `≥ -1` weak;
    /// non-finite or out-of-range scores are invalid.
    pub fn from_score(score: f64) -> Self {
        if !score.is_finite() || !(-1.0..=1.0).contains(&score) {
            QualityLabel::Invalid
        } else if score >= 0.7 {
            QualityLabel::Excellent
        } else if score >= 0.5 {
            QualityLabel::Good
        } else if score >= 0.25 {
            QualityLabel::Acceptable
        } else {
            QualityLabel::Weak
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QualityLabel::Excellent => "excellent",
            QualityLabel::Good => "good",
            QualityLabel::Acceptable => "acceptable",
            QualityLabel::Weak => "weak",
            QualityLabel::Invalid => "invalid",
        }
    }
}

impl fmt::Display for QualityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Silhouette score plus its label.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct QualityScore {
    pub score: f64,
    pub label: QualityLabel,
}

impl QualityScore {
    pub fn new(score: f64) -> Self {
        Self {
            score,
            label: QualityLabel::from_score(score),
        }
    }
}

/// Score `partition` over the graph's node coordinates.
pub fn evaluate(graph: &Graph, partition: &Partition) -> QualityScore {
    if partition.zone1.is_empty() || partition.zone2.is_empty() {
        return QualityScore::new(1.0);
    }
    let labels = partition.labels(graph.node_count());
    QualityScore::new(silhouette_score(&graph.positions(), &labels))
}

/// Silhouette score with the degenerate-case policy above.
///
/// `labels[i] < 0` marks node `i` as unassigned.
pub fn silhouette_score(points: &[Vector2<f64>], labels: &[i32]) -> f64 {
    let assigned: Vec<(Vector2<f64>, i32)> = points
        .iter()
        .zip(labels)
        .filter(|(_, &l)| l >= 0)
        .map(|(p, &l)| (*p, l))
        .collect();
    let distinct = |items: &[(Vector2<f64>, i32)]| {
        let mut ls: Vec<i32> = items.iter().map(|(_, l)| *l).collect();
        ls.sort_unstable();
        ls.dedup();
        ls.len()
    };
    if distinct(&assigned) < 2 {
        return 1.0;
    }
    let valid: Vec<(Vector2<f64>, i32)> = assigned
        .into_iter()
        .filter(|(p, _)| p.x.is_finite() && p.y.is_finite())
        .collect();
    if valid.len() < 3 || distinct(&valid) < 2 {
        return 0.0;
    }
    let s = mean_silhouette(&valid);
    if s.is_finite() {
        s.clamp(-1.0, 1.0)
    } else {
        0.0
    }
}

fn mean_silhouette(items: &[(Vector2<f64>, i32)]) -> f64 {
    let mut sizes: BTreeMap<i32, usize> = BTreeMap::new();
    for (_, l) in items {
        *sizes.entry(*l).or_default() += 1;
    }
    let mut total = 0.0;
    for (i, (p, li)) in items.iter().enumerate() {
        if sizes[li] < 2 {
            continue;
        }
        let mut sums: BTreeMap<i32, f64> = BTreeMap::new();
        for (j, (q, lj)) in items.iter().enumerate() {
            if i != j {
                *sums.entry(*lj).or_default() += (p - q).norm();
            }
        }
        let a = sums.get(li).copied().unwrap_or(0.0) / (sizes[li] - 1) as f64;
        let b = sums
            .iter()
            .filter(|(l, _)| *l != li)
            .map(|(l, s)| s / sizes[l] as f64)
            .fold(f64::INFINITY, f64::min);
        let denom = a.max(b);
        if denom > 0.0 && denom.is_finite() {
            total += (b - a) / denom;
        }
    }
    total / items.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::special;
    use proptest::prelude::*;

    fn pts(raw: &[(f64, f64)]) -> Vec<Vector2<f64>> {
        raw.iter().map(|&(x, y)| Vector2::new(x, y)).collect()
    }

    #[test]
    fn hand_computed_score() {
        // Two pairs on a line: {0, 1} and {10, 11}.
        let p = pts(&[(0.0, 0.0), (1.0, 0.0), (10.0, 0.0), (11.0, 0.0)]);
        let s = silhouette_score(&p, &[0, 0, 1, 1]);
        // point 0: a=1, b=10.5 → 0.90476; point 1: a=1, b=9.5 → 0.89474 (mirrored)
        let expected = ((9.5 / 10.5) + (8.5 / 9.5)) / 2.0;
        assert!((s - expected).abs() < 1e-12, "{s} vs {expected}");
    }

    #[test]
    fn single_zone_scores_one() {
        let p = pts(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)]);
        assert_eq!(silhouette_score(&p, &[0, 0, 0]), 1.0);
        assert_eq!(silhouette_score(&p, &[0, -1, -1]), 1.0);
        let g = special::grid(2, 2, 1.0).unwrap();
        let q = evaluate(&g, &Partition::single(4));
        assert_eq!(q.score, 1.0);
        assert_eq!(q.label, QualityLabel::Excellent);
    }

    #[test]
    fn too_few_points_scores_zero() {
        let p = pts(&[(0.0, 0.0), (1.0, 0.0)]);
        assert_eq!(silhouette_score(&p, &[0, 1]), 0.0);
        let q = pts(&[(0.0, 0.0), (f64::NAN, 0.0), (5.0, 0.0)]);
        assert_eq!(silhouette_score(&q, &[0, 0, 1]), 0.0);
    }

    #[test]
    fn coincident_points_do_not_produce_nan() {
        let p = pts(&[(1.0, 1.0); 4]);
        let s = silhouette_score(&p, &[0, 0, 1, 1]);
        assert_eq!(s, 0.0);
    }

    #[test]
    fn bad_split_is_negative() {
        let p = pts(&[(0.0, 0.0), (10.0, 0.0), (1.0, 0.0), (11.0, 0.0)]);
        let s = silhouette_score(&p, &[0, 0, 1, 1]);
        assert!(s < 0.0 && s >= -1.0);
        assert_eq!(QualityLabel::from_score(s), QualityLabel::Weak);
    }

    #[test]
    fn labels_follow_thresholds() {
        assert_eq!(QualityLabel::from_score(0.7), QualityLabel::Excellent);
        assert_eq!(QualityLabel::from_score(0.55), QualityLabel::Good);
        assert_eq!(QualityLabel::from_score(0.25), QualityLabel::Acceptable);
        assert_eq!(QualityLabel::from_score(-0.4), QualityLabel::Weak);
        assert_eq!(QualityLabel::from_score(1.5), QualityLabel::Invalid);
        assert_eq!(QualityLabel::from_score(f64::NAN), QualityLabel::Invalid);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_score_within_bounds(
            raw in prop::collection::vec((-1e3f64..1e3, -1e3f64..1e3, 0i32..2), 3..40)
        ) {
            let p: Vec<Vector2<f64>> = raw.iter().map(|&(x, y, _)| Vector2::new(x, y)).collect();
            let labels: Vec<i32> = raw.iter().map(|&(_, _, l)| l).collect();
            let s = silhouette_score(&p, &labels);
            prop_assert!(s.is_finite());
            prop_assert!((-1.0..=1.0).contains(&s));
        }
    }
}
