//! Circle-maze generates perfect mazes laid out on concentric rings.
//!
//! One generation call runs the whole pipeline synchronously:
//!
//! - build the ring adjacency table ([`RingTopology`])
//! - carve a random spanning tree over it ([`MazeCarver`])
//! - solve entrance to exit ([`solve`])
//! - render an SVG drawing ([`render_svg`]) and/or a JSON document ([`serialize`])
//!
//! [`generate_maze_svg`] and [`generate_maze_json`] are the two outer entry points. For
//! reproducible output use [`generate_with_seed`].
#![forbid(unsafe_code)]

mod foundation;

pub(crate) mod carve;
/// Generation and drawing options.
pub mod config;
pub(crate) mod maze;
pub(crate) mod pipeline;
pub(crate) mod render;
pub(crate) mod serialize;
pub(crate) mod solve;
pub(crate) mod topology;

pub use crate::foundation::core::{CellId, MAX_RINGS, MIN_RINGS, Point, RingCount, Vec2};
pub use crate::foundation::error::{MazeError, MazeResult};

pub use crate::carve::carver::{ExitPolicy, MazeCarver, carve};
pub use crate::config::{GenerateOpts, RenderOpts};
pub use crate::maze::model::{Maze, WallState};
pub use crate::pipeline::{
    GeneratedMaze, generate_batch, generate_maze_json, generate_maze_svg, generate_with_seed,
    load_maze_svg, load_maze_svg_with,
};
pub use crate::render::svg::{MARKERS_ID, SOLUTION_PATH_ID, WALLS_ID, render_svg};
pub use crate::serialize::document::{
    CellDoc, DOCUMENT_VERSION, MazeDocument, RingDoc, WallSlot, WallsDoc, serialize,
    to_json_string,
};
pub use crate::solve::solver::{SolutionPath, distances_from, solve};
pub use crate::topology::ring::{
    BASE_CELLS, CellLinks, Link, LinkId, LinkKind, RingTopology, cell_count_for_ring,
};
