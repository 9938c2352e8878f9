//! Greedy arrangement search over base candidates.
//!
//! Every arrangement builder returns the best layout it found as an
//! [`Incumbent`]; `search_arrangement` folds those into one value and prunes a
//! base candidate as soon as its distance alone reaches the incumbent's span.

use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use super::base::base_candidates;
use super::group::{insert_remaining, Direction, TriangleGroup};
use super::place::{place_groups, Arrangement};
use super::subset::subset_angle_sum;
use super::triangle::{Placement, Triangle};
use crate::error::NoRoom;

/// A reserved small triangle is given back when the filler leaves more than this (degrees).
const RESERVE_SLACK: f64 = 1.0;

/// Search configuration.
#[derive(Clone, Debug)]
pub struct ArrangeCfg {
    /// Subset search stops once the slack is at most this many degrees.
    pub subset_tolerance: f64,
    /// Base candidates need `remaining angle < available angle * factor`.
    pub base_angle_factor: f64,
    /// Height difference under which an edge counts as horizontal in the placer.
    pub flat_edge_tolerance: f64,
    /// Stop trying further base candidates after this long, once any layout exists.
    pub time_limit: Option<Duration>,
}

impl Default for ArrangeCfg {
    fn default() -> Self {
        Self {
            subset_tolerance: 0.2,
            base_angle_factor: 1.2,
            flat_edge_tolerance: 0.1,
            time_limit: None,
        }
    }
}

/// Best arrangement seen so far.
#[derive(Clone, Debug, Default)]
pub struct Incumbent {
    best: Option<Arrangement>,
}

impl Incumbent {
    /// Span to beat; infinite while empty.
    pub fn span(&self) -> f64 {
        self.best.as_ref().map_or(f64::INFINITY, |a| a.span)
    }

    /// Keep `candidate` if it is strictly narrower.
    pub fn offer(self, candidate: Arrangement) -> Self {
        if candidate.span < self.span() {
            Self {
                best: Some(candidate),
            }
        } else {
            self
        }
    }

    pub fn merge(self, other: Incumbent) -> Self {
        match other.best {
            Some(a) => self.offer(a),
            None => self,
        }
    }

    pub fn get(&self) -> Option<&Arrangement> {
        self.best.as_ref()
    }

    pub fn into_inner(self) -> Option<Arrangement> {
        self.best
    }
}

fn without(pool: &[Triangle], taken: &[Triangle]) -> Vec<Triangle> {
    pool.iter()
        .filter(|t| !taken.iter().any(|u| u.id == t.id))
        .copied()
        .collect()
}

fn remove_one(pool: &mut Vec<Triangle>, t: &Triangle) {
    if let Some(i) = pool.iter().position(|u| u.id == t.id) {
        pool.remove(i);
    }
}

fn remove_all(pool: &mut Vec<Triangle>, taken: &[Triangle]) {
    for t in taken {
        remove_one(pool, t);
    }
}

/// Two groups sharing one origin: a clockwise one with about half the angle
/// sum and a counter-clockwise one with the rest. Only viable when the whole
/// angle sum is at most 360°.
pub fn arrange_two_groups(
    triangles: &[Triangle],
    angle_sum: f64,
    cfg: &ArrangeCfg,
) -> Result<Arrangement, NoRoom> {
    let half = subset_angle_sum(triangles, angle_sum / 2.0, cfg.subset_tolerance);
    let mut left = TriangleGroup::new(None, Direction::Clockwise);
    left.extend(half.members().iter().copied())?;
    let mut right = TriangleGroup::new(None, Direction::CounterClockwise);
    right.extend(without(triangles, half.members()))?;
    place_groups(vec![left, right], cfg)
}

/// First base choices: every base with its shortest side on the baseline.
fn first_choices(bases: &[Triangle]) -> impl Iterator<Item = (Triangle, Placement)> + '_ {
    bases
        .iter()
        .flat_map(|&t| [Placement::ShortMiddle, Placement::ShortLong].map(move |p| (t, p)))
}

/// A next base together with the triangles chosen to fill the room before it.
struct BaseChoice {
    slack: f64,
    base: Triangle,
    placement: Placement,
    fill: Vec<Triangle>,
    reserved: Option<Triangle>,
}

/// Pick the remaining base (and its placement) whose filler wastes least angle.
fn next_base(
    bases: &[Triangle],
    pool: &[Triangle],
    last_outer: f64,
    tolerance: f64,
) -> Option<BaseChoice> {
    let mut best: Option<BaseChoice> = None;
    for &base in bases {
        for placement in [Placement::ShortLong, Placement::ShortMiddle] {
            let space = 180.0 - last_outer - placement.origin_angle(&base);
            let fill = subset_angle_sum(pool, space, tolerance);
            let slack = fill.slack(space);
            if best.as_ref().is_none_or(|b| slack < b.slack) {
                best = Some(BaseChoice {
                    slack,
                    base,
                    placement,
                    fill: fill.members().to_vec(),
                    reserved: None,
                });
            }
        }
    }
    best
}

/// Like [`next_base`], but first sets aside one reserved small triangle if it fits.
fn next_base_with_reserve(
    bases: &[Triangle],
    pool: &[Triangle],
    reserve: &[Triangle],
    last_outer: f64,
    tolerance: f64,
) -> Option<BaseChoice> {
    let mut best: Option<BaseChoice> = None;
    for &base in bases {
        for placement in [Placement::ShortLong, Placement::ShortMiddle] {
            let mut space = 180.0 - last_outer - placement.origin_angle(&base);
            let mut reserved = pick_reserved(reserve, space);
            if let Some(r) = reserved {
                space -= r.shortest_angle;
            }
            let mut fill = subset_angle_sum(pool, space, tolerance);
            if let Some(r) = reserved {
                if fill.slack(space) > RESERVE_SLACK {
                    space += r.shortest_angle;
                    reserved = None;
                    fill = subset_angle_sum(pool, space, tolerance);
                }
            }
            let slack = fill.slack(space);
            if best.as_ref().is_none_or(|b| slack < b.slack) {
                best = Some(BaseChoice {
                    slack,
                    base,
                    placement,
                    fill: fill.members().to_vec(),
                    reserved,
                });
            }
        }
    }
    best
}

fn pick_reserved(reserve: &[Triangle], room: f64) -> Option<Triangle> {
    reserve.iter().find(|t| t.shortest_angle <= room).copied()
}

/// Close an arrangement: one base-less group for what fits behind the last
/// base, leftovers spread into existing room, then placement.
fn finish(
    mut groups: Vec<TriangleGroup>,
    mut pool: Vec<Triangle>,
    last_outer: f64,
    cfg: &ArrangeCfg,
) -> Result<Arrangement, NoRoom> {
    if !pool.is_empty() {
        let fill = subset_angle_sum(&pool, 180.0 - last_outer, cfg.subset_tolerance);
        let mut tail = TriangleGroup::new(None, Direction::CounterClockwise);
        tail.extend(fill.members().iter().copied())?;
        remove_all(&mut pool, fill.members());
        groups.push(tail);
    }
    let groups = if pool.is_empty() {
        groups
    } else {
        insert_remaining(groups, pool)?
    };
    place_groups(groups, cfg)
}

fn build_with_bases(
    first: Triangle,
    placement: Placement,
    bases: &[Triangle],
    rest: &[Triangle],
    cfg: &ArrangeCfg,
) -> Result<Arrangement, NoRoom> {
    let tol = cfg.subset_tolerance;
    let mut pool = rest.to_vec();
    let mut open = bases.to_vec();
    remove_one(&mut open, &first);

    let mut head = TriangleGroup::with_base(first, placement);
    let fill = subset_angle_sum(&pool, head.free_angle(), tol);
    head.extend(fill.members().iter().copied())?;
    remove_all(&mut pool, fill.members());
    let mut last_outer = head.base_outer_angle().unwrap_or(0.0);
    let mut groups = vec![head];

    while let Some(choice) = next_base(&open, &pool, last_outer, tol) {
        let mut g = TriangleGroup::with_base(choice.base, choice.placement);
        g.extend(choice.fill.iter().copied())?;
        last_outer = g.base_outer_angle().unwrap_or(0.0);
        remove_all(&mut pool, &choice.fill);
        remove_one(&mut open, &choice.base);
        groups.push(g);
    }
    finish(groups, pool, last_outer, cfg)
}

fn build_with_reserve(
    first: Triangle,
    placement: Placement,
    bases: &[Triangle],
    pool: &[Triangle],
    reserve: &[Triangle],
    cfg: &ArrangeCfg,
) -> Result<Arrangement, NoRoom> {
    let tol = cfg.subset_tolerance;
    let mut pool = pool.to_vec();
    let mut reserve = reserve.to_vec();
    let mut open = bases.to_vec();
    remove_one(&mut open, &first);

    let mut head = TriangleGroup::with_base(first, placement);
    let room = head.free_angle();
    let fill = match pick_reserved(&reserve, room) {
        Some(r) => {
            let fill = subset_angle_sum(&pool, room - r.shortest_angle, tol);
            remove_one(&mut reserve, &r);
            head.append(r)?;
            fill
        }
        None => {
            let fill = subset_angle_sum(&pool, room, tol);
            if !reserve.is_empty() {
                pool.push(reserve.remove(0));
            }
            fill
        }
    };
    head.extend(fill.members().iter().copied())?;
    remove_all(&mut pool, fill.members());
    let mut last_outer = head.base_outer_angle().unwrap_or(0.0);
    let mut groups = vec![head];

    while let Some(choice) = next_base_with_reserve(&open, &pool, &reserve, last_outer, tol) {
        let mut g = TriangleGroup::with_base(choice.base, choice.placement);
        g.extend(choice.fill.iter().copied())?;
        match choice.reserved {
            Some(r) => {
                g.append(r)?;
                remove_one(&mut reserve, &r);
            }
            None if !reserve.is_empty() => pool.push(reserve.remove(0)),
            None => {}
        }
        last_outer = g.base_outer_angle().unwrap_or(0.0);
        remove_all(&mut pool, &choice.fill);
        remove_one(&mut open, &choice.base);
        groups.push(g);
    }
    pool.extend(reserve);
    finish(groups, pool, last_outer, cfg)
}

/// Best layout for a fixed set of bases, trying every first base both ways.
pub fn arrange_with_bases(bases: &[Triangle], rest: &[Triangle], cfg: &ArrangeCfg) -> Incumbent {
    first_choices(bases)
        .filter_map(|(first, p)| {
            build_with_bases(first, p, bases, rest, cfg)
                .map_err(|e| debug!(first = first.id, placement = p.code(), %e, "candidate infeasible"))
                .ok()
        })
        .fold(Incumbent::default(), Incumbent::offer)
}

/// Variant that holds back the `bases + 1` triangles with the shortest middle
/// sides and hands one to each group to plug the gap left by the filler.
pub fn arrange_with_reserve(bases: &[Triangle], rest: &[Triangle], cfg: &ArrangeCfg) -> Incumbent {
    let mut by_middle = rest.to_vec();
    by_middle.sort_by(|a, b| a.middle.total_cmp(&b.middle));
    let mut reserve: Vec<Triangle> = by_middle.into_iter().take(bases.len() + 1).collect();
    reserve.sort_by(|a, b| b.shortest_angle.total_cmp(&a.shortest_angle));
    let pool = without(rest, &reserve);

    first_choices(bases)
        .filter_map(|(first, p)| {
            build_with_reserve(first, p, bases, &pool, &reserve, cfg)
                .map_err(|e| debug!(first = first.id, placement = p.code(), %e, "candidate infeasible"))
                .ok()
        })
        .fold(Incumbent::default(), Incumbent::offer)
}

/// Search for the arrangement with the smallest span.
///
/// Returns `None` only if every candidate was infeasible.
pub fn search_arrangement(triangles: &[Triangle], cfg: &ArrangeCfg) -> Option<Arrangement> {
    let started = Instant::now();
    let angle_sum: f64 = triangles.iter().map(|t| t.shortest_angle).sum();
    debug!(triangles = triangles.len(), angle_sum, "arrangement search");

    let mut best = Incumbent::default();
    if angle_sum <= 360.0 {
        match arrange_two_groups(triangles, angle_sum, cfg) {
            Ok(a) => {
                info!(span = a.span, "two-group arrangement");
                best = best.offer(a);
            }
            Err(e) => debug!(%e, "two-group arrangement infeasible"),
        }
    }

    for (round, cand) in base_candidates(triangles, angle_sum, cfg.base_angle_factor).enumerate() {
        if cand.distance >= best.span() {
            debug!(round, distance = cand.distance, "base distance reaches best span");
            break;
        }
        if best.get().is_some() && cfg.time_limit.is_some_and(|limit| started.elapsed() >= limit) {
            warn!(round, "time limit reached; keeping best so far");
            break;
        }
        let plain = arrange_with_bases(&cand.bases, &cand.rest, cfg);
        let reserved = if plain.span() == cand.distance {
            Incumbent::default()
        } else {
            arrange_with_reserve(&cand.bases, &cand.rest, cfg)
        };
        debug!(
            round,
            bases = cand.bases.len(),
            distance = cand.distance,
            plain = plain.span(),
            reserved = reserved.span(),
            "base candidate"
        );
        let before = best.span();
        best = best.merge(reserved).merge(plain);
        if best.span() < before {
            info!(round, span = best.span(), bases = cand.bases.len(), "new best");
        }
    }
    best.into_inner()
}
