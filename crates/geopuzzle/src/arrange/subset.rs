use itertools::Itertools;

use super::triangle::Triangle;

/// Outcome of [`subset_angle_sum`].
#[derive(Clone, Debug, PartialEq)]
pub enum SubsetSum {
    /// `members` have a smallest-angle sum of `sum <= budget`.
    Fit { sum: f64, members: Vec<Triangle> },
    /// Even the single smallest angle exceeds the budget.
    NoneFits,
}

impl SubsetSum {
    pub fn members(&self) -> &[Triangle] {
        match self {
            SubsetSum::Fit { members, .. } => members,
            SubsetSum::NoneFits => &[],
        }
    }

    pub fn sum(&self) -> Option<f64> {
        match self {
            SubsetSum::Fit { sum, .. } => Some(*sum),
            SubsetSum::NoneFits => None,
        }
    }

    /// Unused part of `budget`; zero when nothing fits.
    pub fn slack(&self, budget: f64) -> f64 {
        self.sum().map_or(0.0, |s| budget - s)
    }
}

/// Subset of `triangles` whose smallest angles sum as close to `budget` as
/// possible without exceeding it.
///
/// Subsets are enumerated by size and then lexicographically; a later subset
/// replaces the current best only with a strictly larger sum, and enumeration
/// stops as soon as the slack drops to `tolerance` or below. Sizes outside
/// `[floor(budget / max_angle), ceil(budget / min_angle)]` are skipped.
pub fn subset_angle_sum(triangles: &[Triangle], budget: f64, tolerance: f64) -> SubsetSum {
    if budget == 0.0 || triangles.is_empty() {
        return SubsetSum::Fit {
            sum: 0.0,
            members: Vec::new(),
        };
    }
    let total: f64 = triangles.iter().map(|t| t.shortest_angle).sum();
    if total < budget {
        return SubsetSum::Fit {
            sum: total,
            members: triangles.to_vec(),
        };
    }
    let smallest = triangles
        .iter()
        .map(|t| t.shortest_angle)
        .fold(f64::INFINITY, f64::min);
    if smallest > budget {
        return SubsetSum::NoneFits;
    }
    let greatest = triangles
        .iter()
        .map(|t| t.shortest_angle)
        .fold(f64::NEG_INFINITY, f64::max);

    let n = triangles.len();
    // Float-to-int casts saturate, which covers zero angles.
    let min_count = ((budget / greatest).floor() as usize).max(1);
    let max_count = if smallest == 0.0 {
        n
    } else {
        n.min((budget / smallest).ceil() as usize)
    }
    .max(min_count);

    let mut best: Option<(f64, Vec<Triangle>)> = None;
    for k in min_count..=max_count {
        for combo in triangles.iter().combinations(k) {
            let sum: f64 = combo.iter().map(|t| t.shortest_angle).sum();
            if sum > budget || best.as_ref().is_some_and(|(b, _)| sum <= *b) {
                continue;
            }
            let members: Vec<Triangle> = combo.into_iter().copied().collect();
            if budget - sum <= tolerance {
                return SubsetSum::Fit { sum, members };
            }
            best = Some((sum, members));
        }
    }
    match best {
        Some((sum, members)) => SubsetSum::Fit { sum, members },
        None => SubsetSum::NoneFits,
    }
}
