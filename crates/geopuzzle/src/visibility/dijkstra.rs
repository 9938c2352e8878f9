use std::cmp::Ordering;
use std::collections::BinaryHeap;

use tracing::{info, warn};

use super::build::build_graph;
use super::types::{Graph, NodeId, Route, Scene, Stop};
use crate::error::SceneError;
use crate::geom2::GeomCfg;

/// Heap entry ordered by label so that `BinaryHeap` pops the latest time first.
#[derive(Clone, Copy, Debug)]
struct Entry {
    time: f64,
    node: NodeId,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.time
            .total_cmp(&other.time)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Per-node search results, kept apart from the read-only graph.
#[derive(Clone, Debug)]
pub struct Labels {
    /// Latest time the runner may be at each node and still make a goal.
    /// `-inf` for nodes from which no goal is reachable (or never settled).
    pub latest: Vec<f64>,
    /// Next hop toward the goal on the best route.
    pub next: Vec<Option<NodeId>>,
}

impl Labels {
    #[inline]
    pub fn reachable(&self, id: NodeId) -> bool {
        self.latest[id.0] > f64::NEG_INFINITY
    }
}

/// Backwards Dijkstra from the goals maximising the departure time.
///
/// Goals are seeded with their arrival times. Relaxing `v → u` offers
/// `latest[v] - dist(u, v) / speed`; labels only ever improve upward, and
/// goal nodes are never relaxed into. Stops as soon as the start is settled.
pub fn latest_departure(graph: &Graph) -> Labels {
    let n = graph.nodes.len();
    let mut latest = vec![f64::NEG_INFINITY; n];
    let mut next = vec![None; n];
    let mut settled = vec![false; n];
    let mut heap = BinaryHeap::new();

    for (id, arrival) in graph.goals() {
        latest[id.0] = arrival;
        heap.push(Entry { time: arrival, node: id });
    }

    while let Some(Entry { time, node }) = heap.pop() {
        if settled[node.0] || time < latest[node.0] {
            continue;
        }
        settled[node.0] = true;
        if node == graph.start {
            break;
        }
        for &u in &graph.node(node).adj {
            if settled[u.0] || graph.node(u).is_goal() {
                continue;
            }
            let cand = time - graph.travel_time(u, node);
            if cand > latest[u.0] {
                latest[u.0] = cand;
                next[u.0] = Some(node);
                heap.push(Entry { time: cand, node: u });
            }
        }
    }
    Labels { latest, next }
}

/// Follow the next-hop labels from the start. `None` if no goal is reachable.
pub fn extract_route(graph: &Graph, labels: &Labels) -> Option<Route> {
    if !labels.reachable(graph.start) {
        return None;
    }
    let mut stops = Vec::new();
    let mut cur = Some(graph.start);
    while let Some(id) = cur {
        let node = graph.node(id);
        stops.push(Stop {
            node: id,
            pos: node.pos,
            time: labels.latest[id.0],
            polygon: node.polygon,
        });
        cur = labels.next[id.0];
    }
    Some(Route { stops })
}

/// Latest-departure route on a built graph.
pub fn search(graph: &Graph) -> Option<Route> {
    extract_route(graph, &latest_departure(graph))
}

/// Build the graph for `scene` and search it.
pub fn solve(scene: &Scene, cfg: GeomCfg) -> Result<Option<Route>, SceneError> {
    let graph = build_graph(scene, cfg)?;
    let route = search(&graph);
    match &route {
        Some(r) => info!(
            departure = r.departure(),
            arrival = r.arrival(),
            length = r.length(),
            stops = r.stops.len(),
            "route found"
        ),
        None => warn!("no goal reachable from start"),
    }
    Ok(route)
}
