//! Vector-drawing output.
//!
//! Closed walls are stroked and open walls are left as gaps:
//!
//! - closed same-ring walls are radial `<line>` segments on the boundary angle between the two
//!   cells, merged across consecutive rings;
//! - closed inward/outward walls are `<path>` arcs along the ring boundary, merged along the
//!   circle (a fully closed circle becomes a `<circle>`);
//! - the outermost ring's exterior walls are arcs on the rim, broken at the exit.
//!
//! The solution overlay is a single `<path id="solution-path">` through the cell centres. It is
//! always emitted; showing or hiding it is up to whoever displays the document.

use std::fmt::Write as _;

use crate::{
    config::RenderOpts,
    foundation::{
        core::{CellId, Point},
        error::{MazeError, MazeResult},
        math::{polar_point, snap},
    },
    maze::model::Maze,
    solve::solver::{SolutionPath, solve},
    topology::ring::{LinkKind, RingTopology},
};

/// Element id of the solution overlay.
pub const SOLUTION_PATH_ID: &str = "solution-path";
/// Element id of the wall group.
pub const WALLS_ID: &str = "walls";
/// Element id of the entrance/exit marker group.
pub const MARKERS_ID: &str = "start-finish-markers";

/// Radii of the ring bands for one maze.
#[derive(Clone, Copy, Debug)]
struct Bands {
    thickness: f64,
    base: f64,
}

impl Bands {
    fn inner(self, ring: usize) -> f64 {
        self.base + ring as f64 * self.thickness
    }

    fn outer(self, ring: usize) -> f64 {
        self.inner(ring + 1)
    }

    fn centre(self, ring: usize) -> f64 {
        if ring == 0 && self.base == 0.0 {
            0.0
        } else {
            self.base + (ring as f64 + 0.5) * self.thickness
        }
    }
}

fn pt(p: Point) -> String {
    format!("{},{}", snap(p.x), snap(p.y))
}

fn arc_to(d: &mut String, radius: f64, to: Point, large: bool, clockwise: bool) {
    let r = snap(radius);
    let _ = write!(
        d,
        " A {r},{r} 0 {} {} {}",
        u8::from(large),
        u8::from(clockwise),
        pt(to)
    );
}

fn line_to(d: &mut String, to: Point) {
    let _ = write!(d, " L {}", pt(to));
}

/// `true` when the centres of `a` and `b` lie on the same angle.
fn same_angle(topo: &RingTopology, a: CellId, b: CellId) -> bool {
    (2 * a.position + 1) * topo.cell_count(b.ring) == (2 * b.position + 1) * topo.cell_count(a.ring)
}

/// Sweep flag for the shorter arc from `from` to `to` (both in turns).
fn sweeps_forward(from: f64, to: f64) -> bool {
    (to - from).rem_euclid(1.0) < 0.5
}

/// Render `maze` as a standalone SVG document.
///
/// When `path` is `None` the solution is computed here, so the overlay is always present. A
/// supplied path must start at the entrance, end at the exit and only cross open walls.
#[tracing::instrument(skip(maze, path, opts), fields(rings = maze.ring_count()))]
pub fn render_svg(
    maze: &Maze,
    path: Option<&SolutionPath>,
    opts: &RenderOpts,
) -> MazeResult<String> {
    opts.validate()?;

    let solved;
    let path = match path {
        Some(p) => p,
        None => {
            solved = solve(maze)?;
            &solved
        }
    };
    check_path(maze, path)?;

    let bands = Bands {
        thickness: opts.ring_thickness,
        base: opts.base_radius,
    };
    let rim = bands.outer(maze.topology().outermost_ring());
    let extent = snap(rim + opts.padding);

    let mut out = String::new();
    let _ = writeln!(out, r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="{} {} {} {}" width="100%" height="100%" preserveAspectRatio="xMidYMid meet" shape-rendering="geometricPrecision" data-rings="{}" data-exit="{}">"#,
        -extent,
        -extent,
        snap(2.0 * extent),
        snap(2.0 * extent),
        maze.ring_count(),
        maze.exit(),
    );

    write_walls(&mut out, maze, bands, opts);
    write_solution(&mut out, maze.topology(), path, bands, opts);
    write_markers(&mut out, maze, path, bands, opts);

    out.push_str("</svg>\n");
    Ok(out)
}

fn check_path(maze: &Maze, path: &SolutionPath) -> MazeResult<()> {
    if path.first() != Some(maze.entrance()) || path.last() != Some(maze.exit()) {
        return Err(MazeError::inconsistent(
            "solution path does not join the entrance to the exit",
        ));
    }
    for (a, b) in path.steps() {
        if !maze.wall_towards(a, b).is_some_and(|w| w.is_open()) {
            return Err(MazeError::inconsistent(format!(
                "solution path crosses a closed or missing wall between {a} and {b}"
            )));
        }
    }
    Ok(())
}

/// Merged runs of closed walls along one circle.
#[derive(Clone, Debug, PartialEq, Eq)]
enum Runs {
    /// Every segment is closed.
    Full,
    /// Maximal closed runs as `(first segment, length)`, wrapping past the last segment.
    Partial(Vec<(usize, usize)>),
}

/// Group the closed entries of a cyclic sequence into maximal runs.
fn cyclic_runs(closed: &[bool]) -> Runs {
    let n = closed.len();
    let Some(open) = closed.iter().position(|&c| !c) else {
        return if n == 0 {
            Runs::Partial(Vec::new())
        } else {
            Runs::Full
        };
    };

    let mut runs = Vec::new();
    let mut run: Option<(usize, usize)> = None;
    for step in 1..=n {
        let i = (open + step) % n;
        if closed[i] {
            match run.as_mut() {
                Some((_, len)) => *len += 1,
                None => run = Some((i, 1)),
            }
        } else if let Some(r) = run.take() {
            runs.push(r);
        }
    }
    Runs::Partial(runs)
}

/// Group ascending ring indices into `(first, last)` runs of consecutive rings.
fn linear_runs(rings: &[usize]) -> Vec<(usize, usize)> {
    let mut runs: Vec<(usize, usize)> = Vec::new();
    for &r in rings {
        match runs.last_mut() {
            Some((_, last)) if *last + 1 == r => *last = r,
            _ => runs.push((r, r)),
        }
    }
    runs
}

/// Closed walls merged into as few strokes as possible.
///
/// Walls on the same circle join into one arc (or a full `<circle>`); same-ring walls on the
/// same angle in consecutive rings join into one `<line>`. Gaps stay exactly where walls are
/// open.
fn write_walls(out: &mut String, maze: &Maze, bands: Bands, opts: &RenderOpts) {
    let topo = maze.topology();
    let rings = topo.ring_count();
    let outermost = topo.outermost_ring();
    let _ = writeln!(
        out,
        r#"<g id="{WALLS_ID}" fill="none" stroke="black" stroke-width="{}" stroke-linecap="round">"#,
        snap(opts.wall_width)
    );

    // Circle `k` is the inner edge of ring `k`; circle `rings` is the rim. Segments follow the
    // cells just outside the circle (the outermost ring's cells for the rim).
    let mut circles: Vec<Vec<bool>> = (1..=rings)
        .map(|k| vec![false; topo.cell_count(k.min(outermost))])
        .collect();
    // Spokes are indexed by angle in units of the outermost ring's cells; every ring's count
    // divides it.
    let spoke_count = topo.cell_count(outermost);
    let mut spokes: Vec<Vec<usize>> = vec![Vec::new(); spoke_count];

    for (id, link) in topo.links().iter().enumerate() {
        if maze.is_open(id) {
            continue;
        }
        match link.kind {
            LinkKind::Angular => {
                let n = topo.cell_count(link.a.ring);
                let spoke = (link.a.position + 1) % n * (spoke_count / n);
                spokes[spoke].push(link.a.ring);
            }
            LinkKind::Radial => circles[link.b.ring - 1][link.b.position] = true,
        }
    }
    for (position, closed) in circles[rings - 1].iter_mut().enumerate() {
        let cell = CellId::new(outermost, position);
        *closed = maze.exterior_wall(cell).is_some_and(|w| !w.is_open());
    }

    for (k, closed) in circles.iter().enumerate() {
        let radius = bands.inner(k + 1);
        let n = closed.len() as f64;
        match cyclic_runs(closed) {
            Runs::Full => {
                let _ = writeln!(out, r#"  <circle cx="0" cy="0" r="{}"/>"#, snap(radius));
            }
            Runs::Partial(runs) => {
                for (first, len) in runs {
                    let start = first as f64 / n;
                    let end = (first + len) as f64 / n;
                    let mut d = format!("M {}", pt(polar_point(radius, start)));
                    arc_to(&mut d, radius, polar_point(radius, end), end - start > 0.5, true);
                    let _ = writeln!(out, r#"  <path d="{d}"/>"#);
                }
            }
        }
    }

    if bands.base > 0.0 {
        let _ = writeln!(out, r#"  <circle cx="0" cy="0" r="{}"/>"#, snap(bands.base));
    }

    for (spoke, ring_list) in spokes.iter().enumerate() {
        let turns = spoke as f64 / spoke_count as f64;
        for (first, last) in linear_runs(ring_list) {
            let from = polar_point(bands.inner(first), turns);
            let to = polar_point(bands.outer(last), turns);
            let _ = writeln!(
                out,
                r#"  <line x1="{}" y1="{}" x2="{}" y2="{}"/>"#,
                snap(from.x),
                snap(from.y),
                snap(to.x),
                snap(to.y)
            );
        }
    }

    out.push_str("</g>\n");
}

fn write_solution(
    out: &mut String,
    topo: &RingTopology,
    path: &SolutionPath,
    bands: Bands,
    opts: &RenderOpts,
) {
    let Some(start) = path.first() else {
        return;
    };
    let mut turns = topo.center_turns(start);
    let mut d = format!("M {}", pt(polar_point(bands.centre(start.ring), turns)));

    for (a, b) in path.steps() {
        let target = topo.center_turns(b);
        if a.ring == b.ring {
            let r = bands.centre(a.ring);
            let clockwise = b.position == (a.position + 1) % topo.cell_count(a.ring);
            arc_to(&mut d, r, polar_point(r, target), false, clockwise);
        } else if b.ring > a.ring {
            // Bend inside the inner cell onto the outer cell's centre angle, then go out.
            let r = bands.centre(a.ring);
            if r > 0.0 && !same_angle(topo, a, b) {
                arc_to(&mut d, r, polar_point(r, target), false, sweeps_forward(turns, target));
            }
            line_to(&mut d, polar_point(bands.centre(b.ring), target));
        } else {
            // Come in along the outer cell's angle, then bend to the inner cell's centre.
            let r = bands.centre(b.ring);
            line_to(&mut d, polar_point(r, turns));
            if r > 0.0 && !same_angle(topo, a, b) {
                arc_to(&mut d, r, polar_point(r, target), false, sweeps_forward(turns, target));
            }
        }
        turns = target;
    }

    let _ = writeln!(
        out,
        r#"<path id="{SOLUTION_PATH_ID}" class="{SOLUTION_PATH_ID}" fill="none" stroke="purple" stroke-width="{}" stroke-linecap="round" stroke-linejoin="round" d="{d}"/>"#,
        snap(opts.path_width)
    );
}

fn write_markers(
    out: &mut String,
    maze: &Maze,
    path: &SolutionPath,
    bands: Bands,
    opts: &RenderOpts,
) {
    let topo = maze.topology();
    let _ = writeln!(out, r#"<g id="{MARKERS_ID}" fill="red">"#);
    for cell in [path.first(), path.last()].into_iter().flatten() {
        let p = polar_point(bands.centre(cell.ring), topo.center_turns(cell));
        let _ = writeln!(
            out,
            r#"  <circle cx="{}" cy="{}" r="{}"/>"#,
            snap(p.x),
            snap(p.y),
            snap(opts.marker_radius)
        );
    }
    out.push_str("</g>\n");
}

#[cfg(test)]
#[path = "../../tests/unit/render/svg.rs"]
mod tests;
