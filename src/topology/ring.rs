use smallvec::SmallVec;

use crate::foundation::{
    core::CellId,
    error::{MazeError, MazeResult},
};

/// Cells in ring 1. Each spans 60°, the first whole divisor of the full turn whose arc at
/// the ring's radius is longer than the radius itself.
pub const BASE_CELLS: usize = 6;

/// Index into [`RingTopology::links`].
pub type LinkId = usize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
/// Orientation of a link between two adjacent cells.
pub enum LinkKind {
    /// Same ring; `b` is the clockwise neighbour of `a`.
    Angular,
    /// Neighbouring rings; `a` is the inner cell, `b` the outer one.
    Radial,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Undirected adjacency between two cells. Every potential internal wall is one link.
pub struct Link {
    /// First endpoint (counter-clockwise side, or inner side).
    pub a: CellId,
    /// Second endpoint (clockwise side, or outer side).
    pub b: CellId,
    /// Orientation.
    pub kind: LinkKind,
}

impl Link {
    /// The endpoint opposite `cell`, if `cell` is an endpoint.
    pub fn other(&self, cell: CellId) -> Option<CellId> {
        if self.a == cell {
            Some(self.b)
        } else if self.b == cell {
            Some(self.a)
        } else {
            None
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
/// The wall slots a cell owns, as links into the shared table.
pub struct CellLinks {
    /// Link to the next cell clockwise in the same ring.
    pub clockwise: Option<LinkId>,
    /// Link to the next cell counter-clockwise in the same ring.
    pub counter_clockwise: Option<LinkId>,
    /// Link to the enclosing cell of the ring inside (absent for ring 0).
    pub inward: Option<LinkId>,
    /// Links to the cells of the ring outside, in angular order (empty on the outermost ring).
    pub outward: SmallVec<[LinkId; 2]>,
}

impl CellLinks {
    /// All links in slot order: clockwise, counter-clockwise, inward, outward.
    pub fn iter(&self) -> impl Iterator<Item = LinkId> + '_ {
        self.clockwise
            .into_iter()
            .chain(self.counter_clockwise)
            .chain(self.inward)
            .chain(self.outward.iter().copied())
    }
}

/// Number of cells in `ring`.
///
/// Ring 0 is the single central cell and ring 1 holds [`BASE_CELLS`]. From there the count
/// doubles whenever a ring's inner radius reaches twice the radius of the last split (rings
/// 2, 4, 8, 16, ...), so `cell_count(r) = BASE_CELLS * 2^floor(log2 r)` for `r >= 1`.
pub fn cell_count_for_ring(ring: usize) -> usize {
    if ring == 0 {
        return 1;
    }
    let mut count = BASE_CELLS;
    let mut last_split = 1;
    for r in 2..=ring {
        if r >= 2 * last_split {
            count *= 2;
            last_split = r;
        }
    }
    count
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Immutable ring-and-cell adjacency table.
///
/// Cells are addressed either by [`CellId`] or by a dense index (ring-major, then position).
/// Each link appears once in [`RingTopology::links`] and is referenced from the slots of both
/// endpoints, so wall state keyed by [`LinkId`] is shared by construction.
pub struct RingTopology {
    ring_count: usize,
    cell_counts: Vec<usize>,
    offsets: Vec<usize>,
    links: Vec<Link>,
    cell_links: Vec<CellLinks>,
}

impl RingTopology {
    /// Build the adjacency table for `ring_count` rings.
    pub fn build(ring_count: usize) -> MazeResult<Self> {
        if ring_count < 1 {
            return Err(MazeError::invalid_input("topology needs at least one ring"));
        }

        let cell_counts: Vec<usize> = (0..ring_count).map(cell_count_for_ring).collect();
        Self::from_cell_counts(cell_counts)
    }

    fn from_cell_counts(cell_counts: Vec<usize>) -> MazeResult<Self> {
        let ring_count = cell_counts.len();
        if cell_counts.first() != Some(&1) {
            return Err(MazeError::inconsistent("ring 0 must hold exactly one cell"));
        }

        let mut offsets = Vec::with_capacity(ring_count);
        let mut total = 0usize;
        for &n in &cell_counts {
            offsets.push(total);
            total += n;
        }

        let mut topo = Self {
            ring_count,
            cell_counts,
            offsets,
            links: Vec::new(),
            cell_links: vec![CellLinks::default(); total],
        };

        for ring in 0..ring_count {
            let n = topo.cell_counts[ring];
            if n < 3 {
                // A single cell has no same-ring neighbour; two cells never occur.
                continue;
            }
            for p in 0..n {
                let a = CellId::new(ring, p);
                let b = CellId::new(ring, (p + 1) % n);
                let id = topo.push_link(a, b, LinkKind::Angular);
                topo.slots_mut(a).clockwise = Some(id);
                topo.slots_mut(b).counter_clockwise = Some(id);
            }
        }

        for ring in 0..ring_count.saturating_sub(1) {
            let inner = topo.cell_counts[ring];
            let outer = topo.cell_counts[ring + 1];
            if outer < inner {
                return Err(MazeError::inconsistent(format!(
                    "ring {} has fewer cells ({outer}) than ring {ring} ({inner})",
                    ring + 1
                )));
            }
            for p in 0..inner {
                let lo = p * outer / inner;
                let hi = (p + 1) * outer / inner;
                for q in lo..hi {
                    let a = CellId::new(ring, p);
                    let b = CellId::new(ring + 1, q);
                    let id = topo.push_link(a, b, LinkKind::Radial);
                    topo.slots_mut(a).outward.push(id);
                    topo.slots_mut(b).inward = Some(id);
                }
            }
        }

        topo.verify_symmetry()?;
        Ok(topo)
    }

    fn push_link(&mut self, a: CellId, b: CellId, kind: LinkKind) -> LinkId {
        self.links.push(Link { a, b, kind });
        self.links.len() - 1
    }

    fn slots_mut(&mut self, cell: CellId) -> &mut CellLinks {
        let idx = self.offsets[cell.ring] + cell.position;
        &mut self.cell_links[idx]
    }

    /// Number of rings.
    pub fn ring_count(&self) -> usize {
        self.ring_count
    }

    /// Index of the outermost ring.
    pub fn outermost_ring(&self) -> usize {
        self.ring_count - 1
    }

    /// Number of cells in `ring` (0 for rings outside the topology).
    pub fn cell_count(&self, ring: usize) -> usize {
        self.cell_counts.get(ring).copied().unwrap_or(0)
    }

    /// Per-ring cell counts, innermost first.
    pub fn cell_counts(&self) -> &[usize] {
        &self.cell_counts
    }

    /// Total number of cells.
    pub fn total_cells(&self) -> usize {
        self.cell_links.len()
    }

    /// Dense index of `cell`, or `None` if it is not part of this topology.
    pub fn index_of(&self, cell: CellId) -> Option<usize> {
        if cell.ring >= self.ring_count || cell.position >= self.cell_counts[cell.ring] {
            return None;
        }
        Some(self.offsets[cell.ring] + cell.position)
    }

    /// Cell at dense index `idx`.
    pub fn cell_at(&self, idx: usize) -> Option<CellId> {
        if idx >= self.total_cells() {
            return None;
        }
        let ring = self.offsets.partition_point(|&off| off <= idx) - 1;
        Some(CellId::new(ring, idx - self.offsets[ring]))
    }

    /// All cells, ring-major.
    pub fn cells(&self) -> impl Iterator<Item = CellId> + '_ {
        self.cell_counts
            .iter()
            .enumerate()
            .flat_map(|(ring, &n)| (0..n).map(move |p| CellId::new(ring, p)))
    }

    /// The shared link table.
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// Wall slots of `cell`.
    pub fn slots(&self, cell: CellId) -> Option<&CellLinks> {
        self.index_of(cell).map(|idx| &self.cell_links[idx])
    }

    /// Neighbours of `cell` with the link joining them, in slot order.
    pub fn neighbors(&self, cell: CellId) -> impl Iterator<Item = (LinkId, CellId)> + '_ {
        self.slots(cell)
            .into_iter()
            .flat_map(|slots| slots.iter())
            .filter_map(move |id| self.links[id].other(cell).map(|n| (id, n)))
    }

    /// Link joining `a` and `b`, if they are adjacent.
    pub fn link_between(&self, a: CellId, b: CellId) -> Option<LinkId> {
        self.neighbors(a).find(|&(_, n)| n == b).map(|(id, _)| id)
    }

    /// Angular span of `cell` as `[start, end)` in turns, clockwise from +x.
    pub fn span_turns(&self, cell: CellId) -> (f64, f64) {
        let n = self.cell_count(cell.ring).max(1) as f64;
        (cell.position as f64 / n, (cell.position + 1) as f64 / n)
    }

    /// Angle of the middle of `cell` in turns.
    pub fn center_turns(&self, cell: CellId) -> f64 {
        let n = self.cell_count(cell.ring).max(1) as f64;
        (2 * cell.position + 1) as f64 / (2.0 * n)
    }

    /// Check that every link is referenced by the matching slot on both of its endpoints.
    pub fn verify_symmetry(&self) -> MazeResult<()> {
        for (id, link) in self.links.iter().enumerate() {
            let (Some(a), Some(b)) = (self.slots(link.a), self.slots(link.b)) else {
                return Err(MazeError::inconsistent(format!(
                    "link {id} references a cell outside the topology"
                )));
            };
            let ok = match link.kind {
                LinkKind::Angular => a.clockwise == Some(id) && b.counter_clockwise == Some(id),
                LinkKind::Radial => a.outward.contains(&id) && b.inward == Some(id),
            };
            if !ok {
                return Err(MazeError::inconsistent(format!(
                    "link {id} between {} and {} is not recorded on both sides",
                    link.a, link.b
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/topology/ring.rs"]
mod tests;
