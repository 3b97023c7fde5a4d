use rand::{SeedableRng, rngs::StdRng};
use rayon::prelude::*;

use crate::{
    carve::carver::MazeCarver,
    config::{GenerateOpts, RenderOpts},
    foundation::{
        core::RingCount,
        error::{MazeError, MazeResult},
    },
    maze::model::Maze,
    render::svg::render_svg,
    serialize::document::{MazeDocument, to_json_string},
    solve::solver::{SolutionPath, solve},
    topology::ring::RingTopology,
};

/// A carved maze together with its solution, computed once per generation call so the drawing
/// and the document always describe the same path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedMaze {
    pub maze: Maze,
    pub solution: SolutionPath,
}

impl GeneratedMaze {
    /// Render as an SVG document.
    pub fn to_svg(&self, opts: &RenderOpts) -> MazeResult<String> {
        render_svg(&self.maze, Some(&self.solution), opts)
    }

    /// Serialize as a JSON document.
    pub fn to_json(&self) -> MazeResult<String> {
        to_json_string(&self.maze, &self.solution)
    }
}

/// Generate a maze with `ring_count` rings from a fixed seed.
///
/// The same arguments always produce the same maze, path and documents.
#[tracing::instrument(skip(opts))]
pub fn generate_with_seed(
    ring_count: i64,
    seed: u64,
    opts: &GenerateOpts,
) -> MazeResult<GeneratedMaze> {
    let rings = RingCount::new(ring_count)?;
    opts.validate()?;

    let topology = RingTopology::build(rings.get())?;
    let mut rng = StdRng::seed_from_u64(seed);
    let mut maze = MazeCarver::new(opts.exit).carve(topology, &mut rng)?;
    maze.set_seed(Some(seed));
    let solution = solve(&maze)?;

    tracing::debug!(
        cells = maze.topology().total_cells(),
        exit = %maze.exit(),
        path_len = solution.len(),
        fingerprint = maze.fingerprint(),
        "generated maze"
    );
    Ok(GeneratedMaze { maze, solution })
}

fn generate_fresh(ring_count: i64) -> MazeResult<GeneratedMaze> {
    generate_with_seed(ring_count, rand::random(), &GenerateOpts::default())
}

/// Generate a fresh random maze and return it as an SVG document.
///
/// The document carries the solution as an element with id `solution-path`. Ring counts
/// outside `[3, 20]` fail with [`MazeError::InvalidInput`].
#[tracing::instrument]
pub fn generate_maze_svg(ring_count: i64) -> MazeResult<String> {
    generate_fresh(ring_count)?.to_svg(&RenderOpts::default())
}

/// Generate a fresh random maze and return it as a JSON document.
///
/// Same input rules as [`generate_maze_svg`].
#[tracing::instrument]
pub fn generate_maze_json(ring_count: i64) -> MazeResult<String> {
    generate_fresh(ring_count)?.to_json()
}

/// Rebuild a maze from a JSON document and render it as SVG.
#[tracing::instrument(skip(json), fields(bytes = json.len()))]
pub fn load_maze_svg(json: &str) -> MazeResult<String> {
    load_maze_svg_with(json, &RenderOpts::default())
}

/// [`load_maze_svg`] with explicit drawing options.
pub fn load_maze_svg_with(json: &str, opts: &RenderOpts) -> MazeResult<String> {
    let (maze, solution) = MazeDocument::from_json_str(json)?.into_solved()?;
    render_svg(&maze, Some(&solution), opts)
}

/// Generate one maze per seed on a dedicated thread pool.
///
/// Every worker carves with its own random source, so the output equals calling
/// [`generate_with_seed`] for each seed in order.
#[tracing::instrument(skip(seeds, opts), fields(count = seeds.len()))]
pub fn generate_batch(
    ring_count: i64,
    seeds: &[u64],
    opts: &GenerateOpts,
    threads: Option<usize>,
) -> MazeResult<Vec<GeneratedMaze>> {
    RingCount::new(ring_count)?;
    opts.validate()?;

    let pool = build_thread_pool(threads)?;
    pool.install(|| {
        seeds
            .par_iter()
            .map(|&seed| generate_with_seed(ring_count, seed, opts))
            .collect()
    })
}

fn build_thread_pool(threads: Option<usize>) -> MazeResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(MazeError::invalid_input(
            "batch 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| MazeError::from(anyhow::anyhow!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../tests/unit/pipeline.rs"]
mod tests;
