use std::collections::VecDeque;

use crate::{
    foundation::{
        core::CellId,
        error::{MazeError, MazeResult},
        math::Fnv1a64,
    },
    topology::ring::{LinkId, RingTopology},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
/// Passability of a wall.
pub enum WallState {
    /// Passable.
    Open,
    /// Blocking.
    Closed,
}

impl WallState {
    fn from_open(open: bool) -> Self {
        if open { Self::Open } else { Self::Closed }
    }

    /// Return `true` for [`WallState::Open`].
    pub fn is_open(self) -> bool {
        self == Self::Open
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// One generated maze: its topology, the state of every internal wall, and the exit.
///
/// Wall state is stored once per link of the topology, so both cells bordering a wall always
/// observe the same state. The exterior wall is open only at [`Maze::exit`].
pub struct Maze {
    topology: RingTopology,
    open: Vec<bool>,
    exit: CellId,
    carve_order: Vec<LinkId>,
    seed: Option<u64>,
}

impl Maze {
    /// A maze over `topology` with every wall closed and a provisional exit at position 0 of
    /// the outermost ring.
    pub(crate) fn closed(topology: RingTopology) -> Self {
        let open = vec![false; topology.links().len()];
        let exit = CellId::new(topology.outermost_ring(), 0);
        Self {
            topology,
            open,
            exit,
            carve_order: Vec::new(),
            seed: None,
        }
    }

    /// Rebuild a maze from stored wall states, one flag per link. The carve log stays empty.
    pub(crate) fn from_walls(
        topology: RingTopology,
        open: Vec<bool>,
        exit: CellId,
        seed: Option<u64>,
    ) -> MazeResult<Self> {
        if open.len() != topology.links().len() {
            return Err(MazeError::invalid_input(format!(
                "{} wall states for {} links",
                open.len(),
                topology.links().len()
            )));
        }
        let mut maze = Self::closed(topology);
        maze.open = open;
        maze.designate_exit(exit)?;
        maze.seed = seed;
        maze.verify()?;
        Ok(maze)
    }

    pub(crate) fn open_wall(&mut self, link: LinkId) {
        if !self.open[link] {
            self.open[link] = true;
            self.carve_order.push(link);
        }
    }

    pub(crate) fn designate_exit(&mut self, cell: CellId) -> MazeResult<()> {
        if cell.ring != self.topology.outermost_ring() || self.topology.index_of(cell).is_none() {
            return Err(MazeError::invalid_input(format!(
                "exit {cell} is not a cell of the outermost ring"
            )));
        }
        self.exit = cell;
        Ok(())
    }

    pub(crate) fn set_seed(&mut self, seed: Option<u64>) {
        self.seed = seed;
    }

    /// Adjacency table the maze was carved over.
    pub fn topology(&self) -> &RingTopology {
        &self.topology
    }

    /// Number of rings.
    pub fn ring_count(&self) -> usize {
        self.topology.ring_count()
    }

    /// The single ring-0 cell.
    pub fn entrance(&self) -> CellId {
        CellId::ENTRANCE
    }

    /// The outermost-ring cell whose exterior wall is open.
    pub fn exit(&self) -> CellId {
        self.exit
    }

    /// Seed of the random source the maze was carved with, when known.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Links in the order carving opened them; empty for a maze loaded from a document.
    pub fn carve_order(&self) -> &[LinkId] {
        &self.carve_order
    }

    /// Return `true` if the wall on `link` is open.
    pub fn is_open(&self, link: LinkId) -> bool {
        self.open.get(link).copied().unwrap_or(false)
    }

    /// State of `link`'s wall.
    pub fn wall(&self, link: LinkId) -> WallState {
        WallState::from_open(self.is_open(link))
    }

    /// State of the wall between adjacent cells `a` and `b`; `None` if they are not adjacent.
    pub fn wall_towards(&self, a: CellId, b: CellId) -> Option<WallState> {
        self.topology.link_between(a, b).map(|id| self.wall(id))
    }

    /// State of the wall between `cell` and the outside; `None` off the outermost ring.
    pub fn exterior_wall(&self, cell: CellId) -> Option<WallState> {
        if cell.ring != self.topology.outermost_ring() || self.topology.index_of(cell).is_none() {
            return None;
        }
        Some(WallState::from_open(cell == self.exit))
    }

    /// Number of open internal walls.
    pub fn open_wall_count(&self) -> usize {
        self.open.iter().filter(|&&o| o).count()
    }

    /// Cells reachable from `cell` through one open wall, in slot order.
    pub fn open_neighbors(&self, cell: CellId) -> impl Iterator<Item = CellId> + '_ {
        self.topology
            .neighbors(cell)
            .filter(|&(id, _)| self.open[id])
            .map(|(_, n)| n)
    }

    /// Stable 64-bit hash of ring count, wall states and exit.
    pub fn fingerprint(&self) -> u64 {
        let mut h = Fnv1a64::new_default();
        h.write_u64(self.ring_count() as u64);
        for &o in &self.open {
            h.write_u8(u8::from(o));
        }
        h.write_u64(self.exit.ring as u64);
        h.write_u64(self.exit.position as u64);
        h.finish()
    }

    /// Check the perfect-maze invariants: `N - 1` open walls, every cell reachable from the
    /// entrance, and the exit on the outermost ring.
    pub fn verify(&self) -> MazeResult<()> {
        let total = self.topology.total_cells();
        if total == 0 {
            return Err(MazeError::invalid_input("maze has no cells"));
        }
        self.topology.verify_symmetry()?;
        if self.exit.ring != self.topology.outermost_ring()
            || self.topology.index_of(self.exit).is_none()
        {
            return Err(MazeError::inconsistent(format!(
                "exit {} is not on the outermost ring",
                self.exit
            )));
        }

        let open = self.open_wall_count();
        if open != total - 1 {
            return Err(MazeError::inconsistent(format!(
                "{open} open walls for {total} cells, expected {}",
                total - 1
            )));
        }

        let mut seen = vec![false; total];
        let mut queue = VecDeque::from([self.entrance()]);
        seen[0] = true;
        let mut reached = 1usize;
        while let Some(cell) = queue.pop_front() {
            for next in self.open_neighbors(cell) {
                let Some(idx) = self.topology.index_of(next) else {
                    continue;
                };
                if !seen[idx] {
                    seen[idx] = true;
                    reached += 1;
                    queue.push_back(next);
                }
            }
        }
        if reached != total {
            return Err(MazeError::inconsistent(format!(
                "only {reached} of {total} cells are reachable from the entrance"
            )));
        }
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn force_wall(&mut self, link: LinkId, open: bool) {
        self.open[link] = open;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/maze/model.rs"]
mod tests;
