use rand::Rng;
use smallvec::SmallVec;

use crate::{
    foundation::{
        core::CellId,
        error::{MazeError, MazeResult},
    },
    maze::model::Maze,
    solve::solver::distances_from,
    topology::ring::{LinkId, RingTopology},
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// How the exit cell on the outermost ring is chosen after carving.
pub enum ExitPolicy {
    /// The outermost cell farthest (in tree steps) from the entrance; lowest position on ties.
    #[default]
    Farthest,
    /// A position drawn from the carving random source.
    Random,
    /// A fixed position on the outermost ring.
    Fixed(usize),
}

#[derive(Clone, Copy, Debug, Default)]
/// Randomized depth-first spanning-tree construction over a [`RingTopology`].
pub struct MazeCarver {
    exit: ExitPolicy,
}

impl MazeCarver {
    /// Carver using `exit` to designate the exit cell.
    pub fn new(exit: ExitPolicy) -> Self {
        Self { exit }
    }

    /// Carve a perfect maze over `topology`, drawing every random choice from `rng`.
    ///
    /// The same topology and the same random sequence always open the same walls in the same
    /// order and pick the same exit.
    #[tracing::instrument(skip(self, topology, rng), fields(rings = topology.ring_count()))]
    pub fn carve<R: Rng + ?Sized>(&self, topology: RingTopology, rng: &mut R) -> MazeResult<Maze> {
        let total = topology.total_cells();
        if total == 0 {
            return Err(MazeError::invalid_input("cannot carve a topology with no cells"));
        }

        let mut maze = Maze::closed(topology);
        let mut visited = vec![false; total];
        visited[0] = true;

        let mut stack = vec![CellId::ENTRANCE];
        let mut frontier = SmallVec::<[(LinkId, CellId); 8]>::new();
        while let Some(&cell) = stack.last() {
            frontier.clear();
            let topo = maze.topology();
            for (link, next) in topo.neighbors(cell) {
                let idx = topo.index_of(next).ok_or_else(|| {
                    MazeError::inconsistent(format!("neighbour {next} of {cell} is not a cell"))
                })?;
                if !visited[idx] {
                    frontier.push((link, next));
                }
            }

            if frontier.is_empty() {
                stack.pop();
                continue;
            }

            let (link, next) = frontier[rng.random_range(0..frontier.len())];
            if let Some(idx) = maze.topology().index_of(next) {
                visited[idx] = true;
            }
            maze.open_wall(link);
            stack.push(next);
        }

        let exit = self.pick_exit(&maze, rng)?;
        maze.designate_exit(exit)?;
        maze.verify()?;

        tracing::debug!(
            cells = total,
            opened = maze.open_wall_count(),
            exit = %exit,
            fingerprint = maze.fingerprint(),
            "carved maze"
        );
        Ok(maze)
    }

    fn pick_exit<R: Rng + ?Sized>(&self, maze: &Maze, rng: &mut R) -> MazeResult<CellId> {
        let topo = maze.topology();
        let ring = topo.outermost_ring();
        let n = topo.cell_count(ring);

        match self.exit {
            ExitPolicy::Fixed(position) => {
                if position >= n {
                    return Err(MazeError::invalid_input(format!(
                        "fixed exit position {position} is outside ring {ring} ({n} cells)"
                    )));
                }
                Ok(CellId::new(ring, position))
            }
            ExitPolicy::Random => Ok(CellId::new(ring, rng.random_range(0..n))),
            ExitPolicy::Farthest => {
                let dist = distances_from(maze, maze.entrance())?;
                let mut best: Option<(usize, CellId)> = None;
                for position in 0..n {
                    let cell = CellId::new(ring, position);
                    let d = topo.index_of(cell).and_then(|idx| dist[idx]).ok_or_else(|| {
                        MazeError::inconsistent(format!("{cell} is unreachable after carving"))
                    })?;
                    if best.is_none_or(|(bd, _)| d > bd) {
                        best = Some((d, cell));
                    }
                }
                best.map(|(_, cell)| cell)
                    .ok_or_else(|| MazeError::inconsistent(format!("ring {ring} has no cells")))
            }
        }
    }
}

/// Carve with the default exit policy.
pub fn carve<R: Rng + ?Sized>(topology: RingTopology, rng: &mut R) -> MazeResult<Maze> {
    MazeCarver::default().carve(topology, rng)
}

#[cfg(test)]
#[path = "../../tests/unit/carve/carver.rs"]
mod tests;
