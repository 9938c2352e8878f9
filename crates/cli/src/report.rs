//! Console reports and JSON result documents.

use anyhow::{ensure, Context, Result};
use geopuzzle::api::{Arrangement, Direction, PlacedTriangle, Placement, Route, Triangle};
use geopuzzle::Vec2;
use serde::Serialize;
use std::fmt::Write as _;

/// Wall-clock anchor: search times are seconds relative to `start`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Clock {
    /// Seconds after midnight.
    pub start: i64,
}

impl Default for Clock {
    fn default() -> Self {
        Self {
            start: 7 * 3600 + 30 * 60,
        }
    }
}

impl Clock {
    /// Parse `HH:MM` or `HH:MM:SS`.
    pub fn parse(s: &str) -> Result<Self> {
        let parts = s
            .split(':')
            .map(|p| p.parse::<i64>().with_context(|| format!("bad clock time {s:?}")))
            .collect::<Result<Vec<_>>>()?;
        ensure!(
            (2..=3).contains(&parts.len())
                && (0..24).contains(&parts[0])
                && parts[1..].iter().all(|v| (0..60).contains(v)),
            "bad clock time {s:?} (expected HH:MM[:SS])"
        );
        let secs = parts.get(2).copied().unwrap_or(0);
        Ok(Self {
            start: parts[0] * 3600 + parts[1] * 60 + secs,
        })
    }

    /// `H:MM:SS` of `offset` seconds after the anchor, floored to whole seconds.
    pub fn at(&self, offset: f64) -> String {
        let t = (self.start + offset.floor() as i64).rem_euclid(86_400);
        format!("{}:{:02}:{:02}", t / 3600, t / 60 % 60, t % 60)
    }
}

fn minutes_seconds(secs: f64) -> String {
    let s = secs.max(0.0).floor() as i64;
    format!("{} min {} s", s / 60, s % 60)
}

#[derive(Debug, Serialize)]
pub struct StopRecord {
    pub x: f64,
    pub y: f64,
    /// Latest time at this stop, seconds relative to the clock anchor.
    pub time: f64,
    /// 1-based obstacle number, absent for the start and the goal.
    pub polygon: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct RouteRecord {
    pub departure: f64,
    pub arrival: f64,
    pub duration: f64,
    pub length: f64,
    pub stops: Vec<StopRecord>,
}

impl From<&Route> for RouteRecord {
    fn from(r: &Route) -> Self {
        Self {
            departure: r.departure(),
            arrival: r.arrival(),
            duration: r.duration(),
            length: r.length(),
            stops: r
                .stops
                .iter()
                .map(|s| StopRecord {
                    x: s.pos.x,
                    y: s.pos.y,
                    time: s.time,
                    polygon: s.polygon.map(|p| p.0 + 1),
                })
                .collect(),
        }
    }
}

pub fn route_text(route: Option<&Route>, clock: Clock) -> String {
    let Some(route) = route else {
        return "no route found\n".to_string();
    };
    let mut out = String::new();
    let goal = route.goal().unwrap_or(Vec2::zeros());
    let _ = writeln!(out, "departure: {} (floored)", clock.at(route.departure()));
    let _ = writeln!(out, "arrival:   {} (floored)", clock.at(route.arrival()));
    let _ = writeln!(out, "goal y:    {:.0}", goal.y);
    let _ = writeln!(out, "duration:  {} (floored)", minutes_seconds(route.duration()));
    let _ = writeln!(out, "length:    {:.0} m", route.length());
    let _ = writeln!(out, "route:");
    let last = route.stops.len().saturating_sub(1);
    for (i, stop) in route.stops.iter().enumerate() {
        let at = format!("({:3.0}|{:3.0})", stop.pos.x, stop.pos.y);
        let tag = match stop.polygon {
            Some(p) => format!("P{}", p.0 + 1),
            None if i == 0 => "start".to_string(),
            None if i == last => "goal".to_string(),
            None => "free".to_string(),
        };
        let verb = if i == 0 { "start at" } else { "go to" };
        let _ = writeln!(out, "  {verb} {at} [{tag}]");
    }
    out
}

#[derive(Debug, Serialize)]
pub struct TriangleRecord {
    pub id: usize,
    pub placement: &'static str,
    pub origin: [f64; 2],
    pub upper: [f64; 2],
    pub lower: [f64; 2],
}

#[derive(Debug, Serialize)]
pub struct GroupRecord {
    pub origin: f64,
    pub direction: &'static str,
    pub angle: f64,
    pub triangles: Vec<TriangleRecord>,
}

#[derive(Debug, Serialize)]
pub struct ArrangementRecord {
    pub span: f64,
    pub groups: Vec<GroupRecord>,
}

fn xy(p: Vec2<f64>) -> [f64; 2] {
    [p.x, p.y]
}

fn direction_name(d: Direction) -> &'static str {
    match d {
        Direction::CounterClockwise => "counter-clockwise",
        Direction::Clockwise => "clockwise",
    }
}

impl From<&Arrangement> for ArrangementRecord {
    fn from(a: &Arrangement) -> Self {
        let groups = a
            .groups
            .iter()
            .map(|g| GroupRecord {
                origin: g.origin.x,
                direction: direction_name(g.group.direction),
                angle: g.group.angle(),
                triangles: g
                    .triangles
                    .iter()
                    .map(|t| TriangleRecord {
                        id: t.triangle.id,
                        placement: t.placement.code(),
                        origin: xy(t.origin),
                        upper: xy(t.upper.end),
                        lower: xy(t.lower.end),
                    })
                    .collect(),
            })
            .collect();
        Self {
            span: a.span,
            groups,
        }
    }
}

/// Triangle listing before the search.
pub fn triangles_text(triangles: &[Triangle]) -> String {
    let mut out = String::new();
    for t in triangles {
        let _ = writeln!(
            out,
            "  ID{:>2} shortest {:5.1} longest {:5.1} smallest angle {:4.1}",
            t.id, t.shortest, t.longest, t.shortest_angle
        );
    }
    out
}

/// Span and per-triangle coordinates, rounded to whole units.
///
/// Counter-clockwise groups are listed from their last triangle so that the
/// listing runs left to right along the baseline.
pub fn arrangement_text(arrangement: Option<&Arrangement>) -> String {
    let Some(a) = arrangement else {
        return "no arrangement found\n".to_string();
    };
    let mut out = String::new();
    let _ = writeln!(out, "span: {:.0} m", a.span);
    let _ = writeln!(out, "triangles:");
    for g in &a.groups {
        let order: Box<dyn Iterator<Item = &PlacedTriangle>> = match g.group.direction {
            Direction::CounterClockwise => Box::new(g.triangles.iter().rev()),
            Direction::Clockwise => Box::new(g.triangles.iter()),
        };
        for t in order {
            let _ = writeln!(
                out,
                "D{:>2} ({:4.0}|{:4.0}) ({:4.0}|{:4.0}) ({:4.0}|{:4.0})",
                t.triangle.id,
                t.origin.x,
                t.origin.y,
                t.upper.end.x,
                t.upper.end.y,
                t.lower.end.x,
                t.lower.end.y
            );
        }
    }
    out
}

/// Placement codes in table order, for `report`.
pub fn placement_table() -> String {
    let mut out = String::new();
    for p in Placement::ALL {
        let (lower, upper) = p.arms();
        let _ = writeln!(
            out,
            "{:<12} {} lower={lower:?} upper={upper:?} far={:?}",
            format!("{p:?}"),
            p.code(),
            p.far_side()
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use geopuzzle::api::{search_arrangement, ArrangeCfg, NodeId, PolygonId, Stop};

    fn stop(x: f64, y: f64, time: f64, polygon: Option<usize>) -> Stop {
        Stop {
            node: NodeId(0),
            pos: Vec2::new(x, y),
            time,
            polygon: polygon.map(PolygonId),
        }
    }

    #[test]
    fn clock_floors_and_wraps() {
        let c = Clock::default();
        assert_eq!(c.at(0.0), "7:30:00");
        assert_eq!(c.at(61.9), "7:31:01");
        assert_eq!(c.at(-0.5), "7:29:59");
        assert_eq!(Clock::parse("23:59").unwrap().at(120.0), "0:01:00");
    }

    #[test]
    fn clock_parse_rejects_garbage() {
        assert_eq!(Clock::parse("07:30").unwrap(), Clock::default());
        assert!(Clock::parse("7").is_err());
        assert!(Clock::parse("25:00").is_err());
        assert!(Clock::parse("7:xx").is_err());
    }

    #[test]
    fn route_text_lists_stops() {
        let route = Route {
            stops: vec![
                stop(10.0, 0.0, -100.0, None),
                stop(5.0, 5.0, -50.0, Some(2)),
                stop(0.0, 20.0, 4.0, None),
            ],
        };
        let text = route_text(Some(&route), Clock::default());
        assert!(text.contains("departure: 7:28:20"));
        assert!(text.contains("duration:  1 min 44 s"));
        assert!(text.contains("[P3]"));
        assert!(text.contains("[start]"));
        assert!(text.contains("[goal]"));
        let record = RouteRecord::from(&route);
        assert_eq!(record.stops[1].polygon, Some(3));
        assert_eq!(record.stops.len(), 3);
    }

    #[test]
    fn missing_results_are_reported() {
        assert_eq!(route_text(None, Clock::default()), "no route found\n");
        assert_eq!(arrangement_text(None), "no arrangement found\n");
    }

    #[test]
    fn arrangement_listing_has_every_triangle() {
        let ts: Vec<_> = (1..=3)
            .map(|id| Triangle::new(3.0, 4.0, 5.0, id).unwrap())
            .collect();
        let a = search_arrangement(&ts, &ArrangeCfg::default()).unwrap();
        let text = arrangement_text(Some(&a));
        for id in 1..=3 {
            assert!(text.contains(&format!("D{id:>2} ")), "{text}");
        }
        let record = ArrangementRecord::from(&a);
        let n: usize = record.groups.iter().map(|g| g.triangles.len()).sum();
        assert_eq!(n, 3);
    }

    #[test]
    fn placement_table_has_six_rows() {
        assert_eq!(placement_table().lines().count(), 6);
    }
}
