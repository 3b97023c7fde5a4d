use std::collections::VecDeque;

use crate::{
    foundation::{
        core::CellId,
        error::{MazeError, MazeResult},
    },
    maze::model::Maze,
};

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(transparent)]
/// Ordered cells from the entrance to the exit; consecutive cells share an open wall.
pub struct SolutionPath {
    cells: Vec<CellId>,
}

impl SolutionPath {
    /// Cells in walking order.
    pub fn cells(&self) -> &[CellId] {
        &self.cells
    }

    /// Number of cells on the path (tree distance + 1).
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Return `true` if the path has no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// First cell (the entrance).
    pub fn first(&self) -> Option<CellId> {
        self.cells.first().copied()
    }

    /// Last cell (the exit).
    pub fn last(&self) -> Option<CellId> {
        self.cells.last().copied()
    }

    /// Consecutive `(from, to)` pairs.
    pub fn steps(&self) -> impl Iterator<Item = (CellId, CellId)> + '_ {
        self.cells.windows(2).map(|w| (w[0], w[1]))
    }
}

/// Breadth-first distances (in steps through open walls) from `start` to every cell, indexed
/// by the topology's dense cell index. Unreachable cells are `None`.
pub fn distances_from(maze: &Maze, start: CellId) -> MazeResult<Vec<Option<usize>>> {
    let (dist, _) = bfs(maze, start)?;
    Ok(dist)
}

fn bfs(maze: &Maze, start: CellId) -> MazeResult<(Vec<Option<usize>>, Vec<Option<usize>>)> {
    let topo = maze.topology();
    let start_idx = topo
        .index_of(start)
        .ok_or_else(|| MazeError::invalid_input(format!("{start} is not a cell of this maze")))?;

    let mut dist = vec![None; topo.total_cells()];
    let mut parent = vec![None; topo.total_cells()];
    dist[start_idx] = Some(0);

    let mut queue = VecDeque::from([start]);
    while let Some(cell) = queue.pop_front() {
        let cell_idx = topo
            .index_of(cell)
            .ok_or_else(|| MazeError::inconsistent(format!("{cell} escaped the topology")))?;
        let d = dist[cell_idx].unwrap_or(0);
        for next in maze.open_neighbors(cell) {
            let next_idx = topo
                .index_of(next)
                .ok_or_else(|| MazeError::inconsistent(format!("{next} escaped the topology")))?;
            if dist[next_idx].is_none() {
                dist[next_idx] = Some(d + 1);
                parent[next_idx] = Some(cell_idx);
                queue.push_back(next);
            }
        }
    }
    Ok((dist, parent))
}

/// Find the path from the entrance to the recorded exit, following open walls only.
///
/// Fails with [`MazeError::InconsistentMaze`] when the exit cannot be reached.
#[tracing::instrument(skip(maze), fields(rings = maze.ring_count()))]
pub fn solve(maze: &Maze) -> MazeResult<SolutionPath> {
    let topo = maze.topology();
    let (dist, parent) = bfs(maze, maze.entrance())?;

    let exit = maze.exit();
    let exit_idx = topo
        .index_of(exit)
        .ok_or_else(|| MazeError::inconsistent(format!("exit {exit} is not a cell")))?;
    let Some(len) = dist[exit_idx] else {
        return Err(MazeError::inconsistent(format!(
            "exit {exit} is not reachable from the entrance"
        )));
    };

    let mut cells = Vec::with_capacity(len + 1);
    let mut cur = Some(exit_idx);
    while let Some(idx) = cur {
        let cell = topo
            .cell_at(idx)
            .ok_or_else(|| MazeError::inconsistent(format!("cell index {idx} out of range")))?;
        cells.push(cell);
        if cells.len() > len + 1 {
            return Err(MazeError::inconsistent("parent chain does not terminate"));
        }
        cur = parent[idx];
    }
    cells.reverse();

    if cells.first() != Some(&maze.entrance()) {
        return Err(MazeError::inconsistent("path does not start at the entrance"));
    }

    tracing::debug!(cells = cells.len(), exit = %exit, "solved maze");
    Ok(SolutionPath { cells })
}

#[cfg(test)]
#[path = "../../tests/unit/solve/solver.rs"]
mod tests;
