use crate::{
    foundation::{
        core::{CellId, MAX_RINGS, MIN_RINGS},
        error::{MazeError, MazeResult},
    },
    maze::model::{Maze, WallState},
    solve::solver::{SolutionPath, solve},
    topology::ring::{CellLinks, LinkId, RingTopology},
};

/// Current document layout version.
pub const DOCUMENT_VERSION: u32 = 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
/// State of one wall slot in the document.
pub enum WallSlot {
    /// Passable.
    Open,
    /// Blocking.
    Closed,
    /// The cell has no neighbour in this direction.
    #[serde(rename = "none")]
    Absent,
}

impl From<WallState> for WallSlot {
    fn from(state: WallState) -> Self {
        match state {
            WallState::Open => Self::Open,
            WallState::Closed => Self::Closed,
        }
    }
}

impl WallSlot {
    fn state(self) -> Option<WallState> {
        match self {
            Self::Open => Some(WallState::Open),
            Self::Closed => Some(WallState::Closed),
            Self::Absent => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
/// The four wall slots of a cell.
pub struct WallsDoc {
    pub clockwise: WallSlot,
    pub counter_clockwise: WallSlot,
    pub inward: WallSlot,
    /// One entry per outward neighbour in angular order; on the outermost ring, the single
    /// exterior wall.
    pub outward: Vec<WallSlot>,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CellDoc {
    pub id: CellId,
    pub walls: WallsDoc,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RingDoc {
    pub index: usize,
    pub cell_count: usize,
    pub cells: Vec<CellDoc>,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
/// Structured description of one maze and its solution.
///
/// Identical mazes always produce identical documents: rings, cells and slots are emitted in
/// topology order.
pub struct MazeDocument {
    pub version: u32,
    pub ring_count: usize,
    /// Written as a decimal string; every `u64` survives readers that parse numbers as `f64`.
    #[serde(default, with = "seed_text")]
    pub seed: Option<u64>,
    pub exit: CellId,
    pub rings: Vec<RingDoc>,
    pub solution: Vec<CellId>,
}

mod seed_text {
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub(super) fn serialize<S>(seed: &Option<u64>, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match seed {
            Some(seed) => s.serialize_some(&seed.to_string()),
            None => s.serialize_none(),
        }
    }

    pub(super) fn deserialize<'de, D>(d: D) -> Result<Option<u64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<String>::deserialize(d)?
            .map(|text| {
                text.parse::<u64>()
                    .map_err(|e| D::Error::custom(format!("seed '{text}' is not a u64: {e}")))
            })
            .transpose()
    }
}

fn slot(maze: &Maze, link: Option<LinkId>) -> WallSlot {
    link.map_or(WallSlot::Absent, |id| maze.wall(id).into())
}

/// Describe `maze` and `path` as a [`MazeDocument`].
pub fn serialize(maze: &Maze, path: &SolutionPath) -> MazeDocument {
    let topo = maze.topology();
    let outermost = topo.outermost_ring();
    let empty = CellLinks::default();

    let rings = (0..topo.ring_count())
        .map(|ring| {
            let cells = (0..topo.cell_count(ring))
                .map(|position| {
                    let id = CellId::new(ring, position);
                    let links = topo.slots(id).unwrap_or(&empty);
                    let outward = if ring == outermost {
                        maze.exterior_wall(id)
                            .map(WallSlot::from)
                            .into_iter()
                            .collect()
                    } else {
                        links.outward.iter().map(|&l| slot(maze, Some(l))).collect()
                    };
                    CellDoc {
                        id,
                        walls: WallsDoc {
                            clockwise: slot(maze, links.clockwise),
                            counter_clockwise: slot(maze, links.counter_clockwise),
                            inward: slot(maze, links.inward),
                            outward,
                        },
                    }
                })
                .collect();
            RingDoc {
                index: ring,
                cell_count: topo.cell_count(ring),
                cells,
            }
        })
        .collect();

    MazeDocument {
        version: DOCUMENT_VERSION,
        ring_count: topo.ring_count(),
        seed: maze.seed(),
        exit: maze.exit(),
        rings,
        solution: path.cells().to_vec(),
    }
}

/// Serialize `maze` and `path` as pretty-printed JSON.
pub fn to_json_string(maze: &Maze, path: &SolutionPath) -> MazeResult<String> {
    serde_json::to_string_pretty(&serialize(maze, path))
        .map_err(|e| MazeError::serde(format!("failed to encode maze document: {e}")))
}

/// Records the state of each link as it is met from either side.
struct LinkStates {
    states: Vec<Option<WallState>>,
}

impl LinkStates {
    fn record(
        &mut self,
        cell: CellId,
        direction: &str,
        link: Option<LinkId>,
        found: WallSlot,
    ) -> MazeResult<()> {
        match (link, found.state()) {
            (None, None) => Ok(()),
            (None, Some(_)) => Err(MazeError::inconsistent(format!(
                "{cell} has a {direction} wall but no {direction} neighbour"
            ))),
            (Some(_), None) => Err(MazeError::inconsistent(format!(
                "{cell} is missing its {direction} wall"
            ))),
            (Some(id), Some(state)) => match self.states[id] {
                Some(seen) if seen != state => Err(MazeError::inconsistent(format!(
                    "{cell} sees its {direction} wall as {state:?} but its neighbour sees {seen:?}"
                ))),
                _ => {
                    self.states[id] = Some(state);
                    Ok(())
                }
            },
        }
    }
}

impl MazeDocument {
    /// Parse a document from JSON text.
    pub fn from_json_str(s: &str) -> MazeResult<Self> {
        serde_json::from_str(s)
            .map_err(|e| MazeError::serde(format!("failed to decode maze document: {e}")))
    }

    /// Rebuild the maze this document describes.
    ///
    /// The topology is re-derived from `ring_count`; every ring, cell and slot must line up
    /// with it, both sides of each wall must agree, and the stored solution must equal the one
    /// recomputed from the walls.
    pub fn into_maze(self) -> MazeResult<Maze> {
        self.into_solved().map(|(maze, _)| maze)
    }

    /// [`MazeDocument::into_maze`], also handing back the checked solution.
    pub fn into_solved(self) -> MazeResult<(Maze, SolutionPath)> {
        if self.version != DOCUMENT_VERSION {
            return Err(MazeError::invalid_input(format!(
                "unsupported document version {}",
                self.version
            )));
        }
        if !(MIN_RINGS..=MAX_RINGS).contains(&self.ring_count) {
            return Err(MazeError::invalid_input(format!(
                "ring count {} is outside [{MIN_RINGS}, {MAX_RINGS}]",
                self.ring_count
            )));
        }
        let topo = RingTopology::build(self.ring_count)?;
        if self.rings.len() != topo.ring_count() {
            return Err(MazeError::invalid_input(format!(
                "document lists {} rings but declares {}",
                self.rings.len(),
                topo.ring_count()
            )));
        }

        let outermost = topo.outermost_ring();
        let mut links = LinkStates {
            states: vec![None; topo.links().len()],
        };
        let mut open_exits = Vec::new();

        for (ring, ring_doc) in self.rings.iter().enumerate() {
            let expected = topo.cell_count(ring);
            if ring_doc.index != ring
                || ring_doc.cell_count != expected
                || ring_doc.cells.len() != expected
            {
                return Err(MazeError::invalid_input(format!(
                    "ring {ring} must have index {ring} and {expected} cells"
                )));
            }

            for (position, cell_doc) in ring_doc.cells.iter().enumerate() {
                let id = CellId::new(ring, position);
                if cell_doc.id != id {
                    return Err(MazeError::invalid_input(format!(
                        "expected cell {id}, found {}",
                        cell_doc.id
                    )));
                }
                let slots = topo
                    .slots(id)
                    .ok_or_else(|| MazeError::inconsistent(format!("{id} has no slots")))?;
                let walls = &cell_doc.walls;
                links.record(id, "clockwise", slots.clockwise, walls.clockwise)?;
                links.record(
                    id,
                    "counter-clockwise",
                    slots.counter_clockwise,
                    walls.counter_clockwise,
                )?;
                links.record(id, "inward", slots.inward, walls.inward)?;

                if ring == outermost {
                    match walls.outward.as_slice() {
                        [WallSlot::Open] => open_exits.push(id),
                        [WallSlot::Closed] => {}
                        _ => {
                            return Err(MazeError::inconsistent(format!(
                                "{id} must have exactly one exterior wall"
                            )));
                        }
                    }
                } else {
                    if walls.outward.len() != slots.outward.len() {
                        return Err(MazeError::inconsistent(format!(
                            "{id} lists {} outward walls, expected {}",
                            walls.outward.len(),
                            slots.outward.len()
                        )));
                    }
                    for (&link, &found) in slots.outward.iter().zip(&walls.outward) {
                        links.record(id, "outward", Some(link), found)?;
                    }
                }
            }
        }

        match open_exits.as_slice() {
            [exit] if *exit == self.exit => {}
            _ => {
                return Err(MazeError::inconsistent(format!(
                    "exit {} must be the only open exterior wall",
                    self.exit
                )));
            }
        }

        let open = links
            .states
            .iter()
            .map(|s| s.is_some_and(WallState::is_open))
            .collect();
        let maze = Maze::from_walls(topo, open, self.exit, self.seed)?;

        let path = solve(&maze)?;
        if path.cells() != self.solution.as_slice() {
            return Err(MazeError::inconsistent(
                "stored solution differs from the path through the walls",
            ));
        }
        Ok((maze, path))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/serialize/document.rs"]
mod tests;
