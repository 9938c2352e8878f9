//! SVG pictures of courses, routes and arrangements.
//!
//! Coordinates are flipped so that +y points up; a margin is added on all sides.

use anyhow::{Context, Result};
use geopuzzle::api::{Arrangement, Route};
use geopuzzle::Vec2;
use svg::node::element::{Circle, Line, Polygon, Polyline, Text};
use svg::Document;
use svg::Node;

const MARGIN: f64 = 10.0;
const FILL: &str = "#6b6b6b";
const STROKE: &str = "#212121";

struct Frame {
    min: Vec2<f64>,
    max: Vec2<f64>,
}

impl Frame {
    fn around<'a, I: IntoIterator<Item = &'a Vec2<f64>>>(points: I) -> Self {
        let mut min = Vec2::new(f64::INFINITY, f64::INFINITY);
        let mut max = Vec2::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
        for p in points {
            min = min.inf(p);
            max = max.sup(p);
        }
        if !min.x.is_finite() {
            min = Vec2::zeros();
            max = Vec2::zeros();
        }
        Self { min, max }
    }

    fn map(&self, p: Vec2<f64>) -> (f64, f64) {
        (p.x - self.min.x + MARGIN, self.max.y - p.y + MARGIN)
    }

    fn points(&self, ps: &[Vec2<f64>]) -> String {
        ps.iter()
            .map(|p| {
                let (x, y) = self.map(*p);
                format!("{x:.2},{y:.2}")
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn document(&self) -> Document {
        let w = self.max.x - self.min.x + 2.0 * MARGIN;
        let h = self.max.y - self.min.y + 2.0 * MARGIN;
        Document::new()
            .set("viewBox", (0.0, 0.0, w, h))
            .set("width", w.ceil())
            .set("height", h.ceil())
    }

    fn line(&self, a: Vec2<f64>, b: Vec2<f64>) -> Line {
        let (x1, y1) = self.map(a);
        let (x2, y2) = self.map(b);
        Line::new()
            .set("x1", x1)
            .set("y1", y1)
            .set("x2", x2)
            .set("y2", y2)
    }
}

/// Obstacles, the y-axis, the start and (if any) the route as a polyline.
pub fn course_svg(obstacles: &[Vec<Vec2<f64>>], start: Vec2<f64>, route: Option<&Route>) -> Document {
    let mut all: Vec<Vec2<f64>> = obstacles.iter().flatten().copied().collect();
    all.push(start);
    all.push(Vec2::new(0.0, start.y));
    if let Some(r) = route {
        all.extend(r.stops.iter().map(|s| s.pos));
    }
    let frame = Frame::around(&all);

    let mut doc = frame.document().add(
        frame
            .line(Vec2::new(0.0, frame.min.y), Vec2::new(0.0, frame.max.y))
            .set("stroke", "#999999")
            .set("stroke-width", 2),
    );
    for (k, poly) in obstacles.iter().enumerate() {
        doc.append(
            Polygon::new()
                .set("id", format!("P{}", k + 1))
                .set("points", frame.points(poly))
                .set("fill", FILL)
                .set("stroke", STROKE)
                .set("stroke-width", 1),
        );
    }
    let (sx, sy) = frame.map(start);
    doc.append(
        Circle::new()
            .set("id", "L")
            .set("cx", sx)
            .set("cy", sy)
            .set("r", 5)
            .set("fill", "#ff0000"),
    );
    if let Some(r) = route {
        let pts: Vec<_> = r.stops.iter().map(|s| s.pos).collect();
        doc.append(
            Polyline::new()
                .set("id", "R")
                .set("points", frame.points(&pts))
                .set("fill", "none")
                .set("stroke", "#000080")
                .set("stroke-width", 4),
        );
    }
    doc
}

/// Each triangle as a polygon, optionally labelled with its id, plus the baseline.
pub fn arrangement_svg(arrangement: &Arrangement, labels: bool) -> Document {
    let all: Vec<Vec2<f64>> = arrangement
        .triangles()
        .flat_map(|t| t.vertices())
        .collect();
    let frame = Frame::around(&all);

    let mut doc = frame.document().add(
        frame
            .line(Vec2::new(frame.min.x, 0.0), Vec2::new(frame.max.x, 0.0))
            .set("stroke", STROKE)
            .set("stroke-width", 2),
    );
    for t in arrangement.triangles() {
        doc.append(
            Polygon::new()
                .set("id", format!("D{}", t.triangle.id))
                .set("points", frame.points(&t.vertices()))
                .set("fill", FILL)
                .set("stroke", STROKE)
                .set("stroke-width", 1),
        );
        if labels {
            let (cx, cy) = frame.map(t.centroid());
            doc.append(
                Text::new(format!("D{}", t.triangle.id))
                    .set("x", cx)
                    .set("y", cy)
                    .set("font-size", 12)
                    .set("text-anchor", "middle")
                    .set("fill", "#ffffff"),
            );
        }
    }
    doc
}

pub fn to_bytes(doc: &Document) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    svg::write(&mut out, doc).context("serializing svg")?;
    Ok(out)
}
