use super::triangle::Triangle;

/// A proposed split into base triangles and the rest.
#[derive(Clone, Debug, PartialEq)]
pub struct BaseCandidate {
    pub bases: Vec<Triangle>,
    pub rest: Vec<Triangle>,
    /// Sum of the shortest sides of all bases but the last: the horizontal
    /// distance the bases cover, and a lower bound on any arrangement using them.
    pub distance: f64,
}

/// One sort order walked prefix by prefix.
#[derive(Clone, Debug)]
struct Cursor {
    order: Vec<Triangle>,
    count: usize,
    distance: f64,
    /// Angle the current bases leave free at their far corners.
    available: f64,
    /// Smallest angles still to be placed.
    remaining: f64,
}

impl Cursor {
    fn new(order: Vec<Triangle>, angle_sum: f64) -> Option<Self> {
        let first = *order.first()?;
        Some(Self {
            available: (180.0 - first.longest_angle) + (180.0 - first.middle_angle),
            remaining: angle_sum - first.shortest_angle,
            order,
            count: 1,
            distance: 0.0,
        })
    }

    fn candidate(&self) -> BaseCandidate {
        BaseCandidate {
            bases: self.order[..self.count].to_vec(),
            rest: self.order[self.count..].to_vec(),
            distance: self.distance,
        }
    }

    fn advance(&mut self) {
        if self.count >= self.order.len() {
            self.distance = f64::INFINITY;
            return;
        }
        self.distance += self.order[self.count - 1].shortest;
        let next = self.order[self.count];
        self.remaining -= next.shortest_angle;
        self.available += 180.0 - next.middle_angle - next.longest_angle;
        self.count += 1;
    }
}

/// Lazy stream of base candidates in non-decreasing `distance`.
///
/// Three orders are walked in parallel (shortest side ascending, longest side
/// ascending, smallest angle descending); the cursor with the least distance
/// advances next. A prefix is emitted when the angle still to place fits the
/// room its bases open up (scaled by `factor`) and its distance is strictly
/// larger than the last emitted one.
#[derive(Clone, Debug)]
pub struct BaseCandidates {
    cursors: Vec<Cursor>,
    last: f64,
    factor: f64,
}

pub fn base_candidates(triangles: &[Triangle], angle_sum: f64, factor: f64) -> BaseCandidates {
    let mut by_short = triangles.to_vec();
    by_short.sort_by(|a, b| a.shortest.total_cmp(&b.shortest));
    let mut by_long = triangles.to_vec();
    by_long.sort_by(|a, b| a.longest.total_cmp(&b.longest));
    let mut by_angle = triangles.to_vec();
    by_angle.sort_by(|a, b| b.shortest_angle.total_cmp(&a.shortest_angle));

    let cursors = [by_short, by_long, by_angle]
        .into_iter()
        .filter_map(|order| Cursor::new(order, angle_sum))
        .collect();
    BaseCandidates {
        cursors,
        last: -1.0,
        factor,
    }
}

impl Iterator for BaseCandidates {
    type Item = BaseCandidate;

    fn next(&mut self) -> Option<BaseCandidate> {
        loop {
            let idx = self
                .cursors
                .iter()
                .enumerate()
                .fold(None::<(usize, f64)>, |best, (i, c)| match best {
                    Some((_, d)) if d <= c.distance => best,
                    _ => Some((i, c.distance)),
                })?
                .0;
            let cursor = &mut self.cursors[idx];
            if cursor.distance == f64::INFINITY {
                return None;
            }
            let emit = cursor.remaining < cursor.available * self.factor
                && cursor.distance > self.last;
            let out = emit.then(|| cursor.candidate());
            if emit {
                self.last = cursor.distance;
            }
            cursor.advance();
            if out.is_some() {
                return out;
            }
        }
    }
}
