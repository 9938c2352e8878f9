use nalgebra::Vector2;

use crate::error::SceneError;
use crate::geom2::{distance, Segment};

/// Index into `Graph::nodes`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// Index into `Graph::polygons` (and `Scene::obstacles`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PolygonId(pub usize);

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NodeKind {
    Start,
    Vertex,
    /// Goal candidate with its fixed arrival time (seconds).
    Goal { arrival: f64 },
}

#[derive(Clone, Debug)]
pub struct Node {
    pub pos: Vector2<f64>,
    pub kind: NodeKind,
    pub polygon: Option<PolygonId>,
    /// Previous and next vertex along the owning ring.
    pub ring: Option<(NodeId, NodeId)>,
    pub adj: Vec<NodeId>,
}

impl Node {
    pub(crate) fn free(pos: Vector2<f64>, kind: NodeKind) -> Self {
        Self {
            pos,
            kind,
            polygon: None,
            ring: None,
            adj: Vec::new(),
        }
    }

    #[inline]
    pub fn is_goal(&self) -> bool {
        matches!(self.kind, NodeKind::Goal { .. })
    }

    /// True iff `other` is this vertex's ring neighbour.
    #[inline]
    pub fn ring_adjacent(&self, other: NodeId) -> bool {
        self.ring.is_some_and(|(prev, next)| prev == other || next == other)
    }
}

#[derive(Clone, Debug)]
pub struct Polygon {
    pub id: PolygonId,
    /// Vertex nodes in ring order (after inflation).
    pub ring: Vec<NodeId>,
    /// Outline as given, before inflation.
    pub outline: Vec<Vector2<f64>>,
}

/// Visibility graph with arena indices (read-only once built).
#[derive(Clone, Debug)]
pub struct Graph {
    pub nodes: Vec<Node>,
    pub polygons: Vec<Polygon>,
    pub start: NodeId,
    /// Runner speed (distance units per second).
    pub speed: f64,
}

impl Graph {
    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Positions of a polygon's (possibly inflated) ring.
    pub fn ring_points(&self, id: PolygonId) -> Vec<Vector2<f64>> {
        self.polygons[id.0]
            .ring
            .iter()
            .map(|n| self.node(*n).pos)
            .collect()
    }

    /// Goal nodes with their arrival times.
    pub fn goals(&self) -> impl Iterator<Item = (NodeId, f64)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(i, n)| match n.kind {
                NodeKind::Goal { arrival } => Some((NodeId(i), arrival)),
                _ => None,
            })
    }

    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(|n| n.adj.len()).sum::<usize>() / 2
    }

    #[inline]
    pub fn travel_time(&self, u: NodeId, v: NodeId) -> f64 {
        distance(self.node(u).pos, self.node(v).pos) / self.speed
    }
}

/// Where the route ends and when the goal is reached there.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Goal {
    /// Any point on the horizontal line `y`, reached at a fixed time.
    Line { y: f64, arrival: f64 },
    /// A vehicle leaves `(0, 0)` at time 0 and drives up the y-axis at `speed`.
    /// Each node aims at the earliest meeting point it could make it to.
    Pursuit { speed: f64 },
}

impl Goal {
    /// Goal position and arrival time for a runner at `from` moving at `runner`.
    ///
    /// For `Pursuit` the meeting point lies on the y-axis where the runner's
    /// straight line makes the angle `asin(runner / vehicle)` with the
    /// horizontal; it is clamped to `y >= 0`.
    pub fn candidate(&self, from: Vector2<f64>, runner: f64) -> (Vector2<f64>, f64) {
        match *self {
            Goal::Line { y, arrival } => (Vector2::new(from.x, y), arrival),
            Goal::Pursuit { speed } => {
                let rise = (runner / speed).asin().tan();
                let y = (from.y + from.x.abs() * rise).max(0.0);
                (Vector2::new(0.0, y), y / speed)
            }
        }
    }
}

/// Everything the path search needs.
#[derive(Clone, Debug)]
pub struct Scene {
    pub start: Vector2<f64>,
    pub goal: Goal,
    pub obstacles: Vec<Vec<Vector2<f64>>>,
    /// Runner speed (distance units per second).
    pub speed: f64,
    /// Actor footprint as offsets from its reference point; obstacles grow by it.
    pub actor: Option<Vec<Vector2<f64>>>,
}

impl Scene {
    pub fn new(start: Vector2<f64>, goal: Goal, obstacles: Vec<Vec<Vector2<f64>>>, speed: f64) -> Self {
        Self {
            start,
            goal,
            obstacles,
            speed,
            actor: None,
        }
    }

    /// Axis-aligned square actor of the given width, centred on its reference point.
    pub fn with_square_actor(mut self, width: f64) -> Self {
        let h = width / 2.0;
        self.actor = Some(vec![
            Vector2::new(h, h),
            Vector2::new(-h, h),
            Vector2::new(h, -h),
            Vector2::new(-h, -h),
        ]);
        self
    }

    pub fn validate(&self) -> Result<(), SceneError> {
        if !(self.speed.is_finite() && self.speed > 0.0) {
            return Err(SceneError::Speed(self.speed));
        }
        if let Some((index, ring)) = self.obstacles.iter().enumerate().find(|(_, r)| r.len() < 3) {
            return Err(SceneError::Degenerate {
                index,
                len: ring.len(),
            });
        }
        if let Goal::Pursuit { speed } = self.goal {
            if speed.is_nan() || speed <= self.speed {
                return Err(SceneError::Uncatchable {
                    vehicle: speed,
                    runner: self.speed,
                });
            }
        }
        Ok(())
    }
}

/// One node on a route with the latest time the runner may be there.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stop {
    pub node: NodeId,
    pub pos: Vector2<f64>,
    pub time: f64,
    pub polygon: Option<PolygonId>,
}

/// Start-to-goal route in travel order.
#[derive(Clone, Debug)]
pub struct Route {
    pub stops: Vec<Stop>,
}

impl Route {
    pub fn departure(&self) -> f64 {
        self.stops.first().map_or(f64::NEG_INFINITY, |s| s.time)
    }

    pub fn arrival(&self) -> f64 {
        self.stops.last().map_or(f64::NEG_INFINITY, |s| s.time)
    }

    pub fn duration(&self) -> f64 {
        self.arrival() - self.departure()
    }

    pub fn length(&self) -> f64 {
        self.legs().map(|s| s.length()).sum()
    }

    pub fn legs(&self) -> impl Iterator<Item = Segment> + '_ {
        self.stops.windows(2).map(|w| Segment::new(w[0].pos, w[1].pos))
    }

    /// Where the route meets the goal.
    pub fn goal(&self) -> Option<Vector2<f64>> {
        self.stops.last().map(|s| s.pos)
    }
}
