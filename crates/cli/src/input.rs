//! Text input formats for both pipelines.
//!
//! Obstacle course:
//! ```text
//! n
//! k x1 y1 ... xk yk      (n polygon lines)
//! x y                    (start)
//! ```
//! Triangles, either as corner coordinates (first line is the count):
//! ```text
//! n
//! 3 x1 y1 x2 y2 x3 y3
//! ```
//! or as side lengths:
//! ```text
//! type=lengths
//! a b c
//! ```
//! Triangle ids follow line order starting at 1. Blank lines are ignored.

use anyhow::{bail, ensure, Context, Result};
use geopuzzle::api::Triangle;
use geopuzzle::Vec2;
use std::fs;
use std::path::Path;

/// Obstacle polygons and the runner's start, as read from a course file.
#[derive(Clone, Debug, PartialEq)]
pub struct Course {
    pub obstacles: Vec<Vec<Vec2<f64>>>,
    pub start: Vec2<f64>,
}

fn numbers(line: &str, lineno: usize) -> Result<Vec<f64>> {
    line.split_whitespace()
        .map(|tok| {
            tok.parse::<f64>()
                .with_context(|| format!("line {lineno}: not a number: {tok:?}"))
        })
        .collect()
}

fn content_lines(text: &str) -> impl Iterator<Item = (usize, &str)> + '_ {
    text.lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim()))
        .filter(|(_, l)| !l.is_empty())
}

fn points(coords: &[f64]) -> Vec<Vec2<f64>> {
    coords
        .chunks_exact(2)
        .map(|c| Vec2::new(c[0], c[1]))
        .collect()
}

pub fn parse_course(text: &str) -> Result<Course> {
    let mut lines = content_lines(text);
    let Some((lineno, head)) = lines.next() else {
        bail!("empty course file");
    };
    let count: usize = head
        .parse()
        .with_context(|| format!("line {lineno}: expected polygon count, got {head:?}"))?;

    let mut obstacles = Vec::with_capacity(count);
    for _ in 0..count {
        let Some((lineno, line)) = lines.next() else {
            bail!("expected {count} polygons, found {}", obstacles.len());
        };
        let nums = numbers(line, lineno)?;
        let k = nums.first().copied().unwrap_or(0.0);
        ensure!(
            k >= 3.0 && k.fract() == 0.0 && nums.len() == 1 + 2 * k as usize,
            "line {lineno}: expected `k x1 y1 ... xk yk` with k >= 3"
        );
        obstacles.push(points(&nums[1..]));
    }

    let Some((lineno, line)) = lines.next() else {
        bail!("missing start position after {count} polygons");
    };
    let nums = numbers(line, lineno)?;
    ensure!(nums.len() == 2, "line {lineno}: expected `x y` start position");
    if let Some((lineno, _)) = lines.next() {
        bail!("line {lineno}: unexpected trailing content");
    }
    Ok(Course {
        obstacles,
        start: Vec2::new(nums[0], nums[1]),
    })
}

pub fn parse_triangles(text: &str) -> Result<Vec<Triangle>> {
    let mut lines = content_lines(text);
    let Some((lineno, head)) = lines.next() else {
        bail!("empty triangle file");
    };

    if head == "type=lengths" {
        return lines
            .enumerate()
            .map(|(k, (lineno, line))| {
                let nums = numbers(line, lineno)?;
                ensure!(nums.len() == 3, "line {lineno}: expected `a b c`");
                Triangle::new(nums[0], nums[1], nums[2], k + 1)
                    .with_context(|| format!("line {lineno}"))
            })
            .collect();
    }

    let count: usize = head
        .parse()
        .with_context(|| format!("line {lineno}: expected triangle count, got {head:?}"))?;
    let triangles = lines
        .enumerate()
        .map(|(k, (lineno, line))| {
            let nums = numbers(line, lineno)?;
            ensure!(
                nums.len() == 7 && nums[0] == 3.0,
                "line {lineno}: expected `3 x1 y1 x2 y2 x3 y3`"
            );
            let p = points(&nums[1..]);
            Triangle::from_points(p[0], p[1], p[2], k + 1).with_context(|| format!("line {lineno}"))
        })
        .collect::<Result<Vec<_>>>()?;
    ensure!(
        triangles.len() == count,
        "header announces {count} triangles, found {}",
        triangles.len()
    );
    Ok(triangles)
}

pub fn read_course(path: &Path) -> Result<Course> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    parse_course(&text).with_context(|| format!("parsing {}", path.display()))
}

pub fn read_triangles(path: &Path) -> Result<Vec<Triangle>> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    parse_triangles(&text).with_context(|| format!("parsing {}", path.display()))
}

/// Serialize triangles in the `type=lengths` format.
pub fn lengths_text(triangles: &[Triangle]) -> String {
    let mut out = String::from("type=lengths");
    for t in triangles {
        out.push_str(&format!("\n{} {} {}", t.shortest, t.middle, t.longest));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn course_two_polygons() {
        let text = "2\n3 0 0 2 0 1 2\n4 5 5 6 5 6 6 5 6\n\n10 3\n";
        let c = parse_course(text).unwrap();
        assert_eq!(c.obstacles.len(), 2);
        assert_eq!(c.obstacles[0].len(), 3);
        assert_eq!(c.obstacles[1][2], Vec2::new(6.0, 6.0));
        assert_eq!(c.start, Vec2::new(10.0, 3.0));
    }

    #[test]
    fn course_rejects_bad_vertex_count() {
        let err = parse_course("1\n4 0 0 1 0 1 1\n5 5").unwrap_err();
        assert!(format!("{err:#}").contains("line 2"));
    }

    #[test]
    fn course_rejects_missing_start() {
        assert!(parse_course("1\n3 0 0 1 0 1 1\n").is_err());
        assert!(parse_course("").is_err());
    }

    #[test]
    fn triangles_from_points() {
        let text = "2\n3 0 0 3 0 0 4\n3 0 0 1 0 0 1\n";
        let ts = parse_triangles(text).unwrap();
        assert_eq!(ts.len(), 2);
        assert_eq!(ts[0].id, 1);
        assert_eq!(ts[1].id, 2);
        assert_eq!((ts[0].shortest, ts[0].middle, ts[0].longest), (3.0, 4.0, 5.0));
        assert!((ts[1].longest_angle - 90.0).abs() < 1e-9);
    }

    #[test]
    fn triangles_count_mismatch() {
        let err = parse_triangles("3\n3 0 0 3 0 0 4\n").unwrap_err();
        assert!(err.to_string().contains("announces 3"));
    }

    #[test]
    fn triangles_from_lengths() {
        let ts = parse_triangles("type=lengths\n5 3 4\n2 2 2\n").unwrap();
        assert_eq!(ts.len(), 2);
        assert_eq!(ts[0].shortest, 3.0);
        assert_eq!(ts[1].id, 2);
        assert!((ts[1].shortest_angle - 60.0).abs() < 1e-9);
    }

    #[test]
    fn lengths_text_reparses() {
        let ts = parse_triangles("type=lengths\n5 3 4\n").unwrap();
        let again = parse_triangles(&lengths_text(&ts)).unwrap();
        assert_eq!(ts, again);
    }

    #[test]
    fn impossible_triangle_reports_line() {
        let err = parse_triangles("type=lengths\n1 1 5\n").unwrap_err();
        assert!(format!("{err:#}").contains("line 2"));
    }
}
