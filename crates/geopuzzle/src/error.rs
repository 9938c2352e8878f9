use thiserror::Error;

/// Top-level error type for the geopuzzle core.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Triangle(#[from] TriangleError),

    #[error(transparent)]
    Scene(#[from] SceneError),
}

/// Invalid side lengths handed to the triangle model.
#[derive(Debug, Error, PartialEq)]
pub enum TriangleError {
    #[error("side length {0} is not a positive finite number")]
    Side(f64),

    #[error("sides {shortest}, {middle}, {longest} violate the triangle inequality")]
    Inequality {
        shortest: f64,
        middle: f64,
        longest: f64,
    },
}

/// Inconsistent path-search input.
#[derive(Debug, Error, PartialEq)]
pub enum SceneError {
    #[error("runner speed must be positive and finite, got {0}")]
    Speed(f64),

    #[error("obstacle {index} has {len} vertices, need at least 3")]
    Degenerate { index: usize, len: usize },

    #[error("vehicle speed {vehicle} must exceed runner speed {runner}")]
    Uncatchable { vehicle: f64, runner: f64 },
}

/// A group cannot take another triangle without exceeding 180° at its origin.
///
/// Marks an arrangement candidate as infeasible; the search skips it.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
#[error("no room for {needed:.2}° next to {used:.2}° (limit 180°)")]
pub struct NoRoom {
    pub used: f64,
    pub needed: f64,
}

/// Convenience type alias for results using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
