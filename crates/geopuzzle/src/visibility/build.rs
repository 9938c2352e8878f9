use nalgebra::Vector2;
use tracing::debug;

use super::types::{Graph, Node, NodeId, NodeKind, Polygon, PolygonId, Scene};
use crate::error::SceneError;
use crate::geom2::{inflate, intersect, point_in_polygon, ring_edges, GeomCfg, Segment};

/// Build the visibility graph for a scene.
///
/// Nodes are the start, every obstacle vertex (after growing obstacles by the
/// actor footprint, if any) and one goal candidate per non-goal node. A goal
/// candidate is linked only to the node that produced it, and only when that
/// straight line is unobstructed.
pub fn build_graph(scene: &Scene, cfg: GeomCfg) -> Result<Graph, SceneError> {
    scene.validate()?;

    let mut nodes = vec![Node::free(scene.start, NodeKind::Start)];
    let mut polygons = Vec::with_capacity(scene.obstacles.len());
    for (k, outline) in scene.obstacles.iter().enumerate() {
        let id = PolygonId(k);
        let ring = obstacle_ring(outline, scene.actor.as_deref(), cfg);
        let first = nodes.len();
        let m = ring.len();
        for (i, pos) in ring.into_iter().enumerate() {
            nodes.push(Node {
                pos,
                kind: NodeKind::Vertex,
                polygon: Some(id),
                ring: Some((NodeId(first + (i + m - 1) % m), NodeId(first + (i + 1) % m))),
                adj: Vec::new(),
            });
        }
        polygons.push(Polygon {
            id,
            ring: (first..first + m).map(NodeId).collect(),
            outline: outline.clone(),
        });
    }

    let mut graph = Graph {
        nodes,
        polygons,
        start: NodeId(0),
        speed: scene.speed,
    };
    let walls = Walls::new(&graph);

    let base = graph.nodes.len();
    for i in 0..base {
        for j in (i + 1)..base {
            if walls.visible(&graph, NodeId(i), NodeId(j), cfg) {
                link(&mut graph, NodeId(i), NodeId(j));
            }
        }
    }
    for i in 0..base {
        let from = NodeId(i);
        let (pos, arrival) = scene.goal.candidate(graph.node(from).pos, scene.speed);
        if walls.reaches(&graph, from, pos, cfg) {
            let goal = NodeId(graph.nodes.len());
            graph.nodes.push(Node::free(pos, NodeKind::Goal { arrival }));
            link(&mut graph, from, goal);
        }
    }
    debug!(
        nodes = graph.nodes.len(),
        edges = graph.edge_count(),
        polygons = graph.polygons.len(),
        "visibility graph built"
    );
    Ok(graph)
}

fn obstacle_ring(
    outline: &[Vector2<f64>],
    actor: Option<&[Vector2<f64>]>,
    cfg: GeomCfg,
) -> Vec<Vector2<f64>> {
    match actor {
        Some(offsets) if !offsets.is_empty() => {
            let grown = inflate(outline, offsets, cfg);
            if grown.len() >= 3 {
                grown
            } else {
                outline.to_vec()
            }
        }
        _ => outline.to_vec(),
    }
}

fn link(graph: &mut Graph, u: NodeId, v: NodeId) {
    graph.nodes[u.0].adj.push(v);
    graph.nodes[v.0].adj.push(u);
}

/// Obstacle edges and rings, flattened once for the pairwise tests.
struct Walls {
    edges: Vec<Segment>,
    rings: Vec<Vec<Vector2<f64>>>,
}

impl Walls {
    fn new(graph: &Graph) -> Self {
        let rings: Vec<_> = graph.polygons.iter().map(|p| graph.ring_points(p.id)).collect();
        let edges = rings.iter().flat_map(|r| ring_edges(r)).collect();
        Self { edges, rings }
    }

    fn crosses(&self, seg: &Segment) -> bool {
        self.edges.iter().any(|e| intersect(seg, e).is_some())
    }

    /// The segment leaves `node` through the interior of its own polygon.
    ///
    /// Only meaningful once `crosses` is false: the segment is then entirely
    /// inside or entirely outside that polygon and the midpoint decides.
    fn enters_own(&self, node: &Node, toward: Option<NodeId>, seg: &Segment, cfg: GeomCfg) -> bool {
        match node.polygon {
            Some(p) if !toward.is_some_and(|t| node.ring_adjacent(t)) => {
                point_in_polygon(seg.midpoint(), &self.rings[p.0], cfg)
            }
            _ => false,
        }
    }

    fn visible(&self, graph: &Graph, u: NodeId, v: NodeId, cfg: GeomCfg) -> bool {
        let (a, b) = (graph.node(u), graph.node(v));
        let seg = Segment::new(a.pos, b.pos);
        !self.crosses(&seg)
            && !self.enters_own(a, Some(v), &seg, cfg)
            && !self.enters_own(b, Some(u), &seg, cfg)
    }

    fn reaches(&self, graph: &Graph, from: NodeId, target: Vector2<f64>, cfg: GeomCfg) -> bool {
        let a = graph.node(from);
        let seg = Segment::new(a.pos, target);
        !self.crosses(&seg) && !self.enters_own(a, None, &seg, cfg)
    }
}
