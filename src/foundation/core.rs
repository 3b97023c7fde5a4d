use std::{fmt, str::FromStr};

use crate::foundation::error::{MazeError, MazeResult};

pub use kurbo::{Point, Vec2};

/// Smallest ring count accepted by the public entry points.
pub const MIN_RINGS: usize = 3;
/// Largest ring count accepted by the public entry points.
pub const MAX_RINGS: usize = 20;

/// Stable identifier of a cell: ring index (0 = centre) and angular position in that ring.
///
/// Serialized as the string `"ring:position"`, e.g. `"2:7"`.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(into = "String", try_from = "String")]
pub struct CellId {
    /// Ring index, `0..ring_count`.
    pub ring: usize,
    /// Angular position, `0..cell_count(ring)`, growing clockwise.
    pub position: usize,
}

impl CellId {
    /// The single cell of ring 0.
    pub const ENTRANCE: CellId = CellId {
        ring: 0,
        position: 0,
    };

    /// Build a cell id.
    pub fn new(ring: usize, position: usize) -> Self {
        Self { ring, position }
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.ring, self.position)
    }
}

impl FromStr for CellId {
    type Err = MazeError;

    fn from_str(s: &str) -> MazeResult<Self> {
        let (ring, position) = s.split_once(':').ok_or_else(|| {
            MazeError::invalid_input(format!("cell id '{s}' must be 'ring:position'"))
        })?;
        let ring = ring
            .trim()
            .parse::<usize>()
            .map_err(|e| MazeError::invalid_input(format!("cell id '{s}': bad ring: {e}")))?;
        let position = position
            .trim()
            .parse::<usize>()
            .map_err(|e| MazeError::invalid_input(format!("cell id '{s}': bad position: {e}")))?;
        Ok(Self { ring, position })
    }
}

impl From<CellId> for String {
    fn from(id: CellId) -> Self {
        id.to_string()
    }
}

impl TryFrom<String> for CellId {
    type Error = MazeError;

    fn try_from(s: String) -> MazeResult<Self> {
        s.parse()
    }
}

/// Validated ring count in `[MIN_RINGS, MAX_RINGS]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RingCount(usize);

impl RingCount {
    /// Validate a caller-provided ring count.
    ///
    /// Negative values and values outside `[MIN_RINGS, MAX_RINGS]` fail with
    /// [`MazeError::InvalidInput`].
    pub fn new(rings: i64) -> MazeResult<Self> {
        if rings < MIN_RINGS as i64 || rings > MAX_RINGS as i64 {
            return Err(MazeError::invalid_input(format!(
                "ring count must be in [{MIN_RINGS}, {MAX_RINGS}], got {rings}"
            )));
        }
        Ok(Self(rings as usize))
    }

    /// Number of rings.
    pub fn get(self) -> usize {
        self.0
    }
}

impl FromStr for RingCount {
    type Err = MazeError;

    fn from_str(s: &str) -> MazeResult<Self> {
        let rings = s
            .trim()
            .parse::<i64>()
            .map_err(|_| MazeError::invalid_input(format!("ring count '{s}' is not an integer")))?;
        Self::new(rings)
    }
}

impl fmt::Display for RingCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
