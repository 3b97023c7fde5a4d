use rand::{SeedableRng, rngs::StdRng};

use super::*;
use crate::{carve::carver::carve, maze::model::WallState};

fn carved(rings: usize, seed: u64) -> Maze {
    let mut rng = StdRng::seed_from_u64(seed);
    carve(RingTopology::build(rings).unwrap(), &mut rng).unwrap()
}

fn closed_interior_walls(maze: &Maze) -> usize {
    (0..maze.topology().links().len())
        .filter(|&l| !maze.is_open(l))
        .count()
}

fn closed_exterior_walls(maze: &Maze) -> usize {
    let ring = maze.topology().outermost_ring();
    (0..maze.topology().cell_count(ring))
        .filter(|&p| maze.exterior_wall(CellId::new(ring, p)) == Some(WallState::Closed))
        .count()
}

fn walls_group(svg: &str) -> &str {
    let start = svg.find(r#"<g id="walls""#).unwrap();
    let end = start + svg[start..].find("</g>").unwrap();
    &svg[start..end]
}

#[test]
fn document_has_exactly_one_solution_overlay() {
    let maze = carved(5, 3);
    let svg = render_svg(&maze, None, &RenderOpts::default()).unwrap();
    assert!(svg.starts_with("<?xml"));
    assert!(svg.trim_end().ends_with("</svg>"));
    assert_eq!(svg.matches(r#"id="solution-path""#).count(), 1);
    assert_eq!(svg.matches(r#"id="walls""#).count(), 1);
    assert_eq!(svg.matches(r#"id="start-finish-markers""#).count(), 1);
}

fn closed_angular_walls(maze: &Maze) -> usize {
    maze.topology()
        .links()
        .iter()
        .enumerate()
        .filter(|(id, l)| l.kind == LinkKind::Angular && !maze.is_open(*id))
        .count()
}

#[test]
fn closed_walls_are_merged_into_fewer_strokes() {
    let maze = carved(6, 12);
    let svg = render_svg(&maze, None, &RenderOpts::default()).unwrap();
    let walls = walls_group(&svg);

    let lines = walls.matches("<line").count();
    let strokes = lines + walls.matches("<path").count() + walls.matches("<circle").count();
    assert!(lines <= closed_angular_walls(&maze));
    assert!(strokes < closed_interior_walls(&maze) + closed_exterior_walls(&maze));
    assert_eq!(closed_exterior_walls(&maze), maze.topology().cell_count(5) - 1);
}

#[test]
fn rim_is_one_arc_broken_at_the_exit() {
    let maze = carved(5, 2);
    let svg = render_svg(&maze, None, &RenderOpts::default()).unwrap();
    let rim_arcs = walls_group(&svg)
        .lines()
        .filter(|l| l.contains("<path") && l.contains(" A 50,50 "))
        .collect::<Vec<_>>();
    assert_eq!(rim_arcs.len(), 1, "{rim_arcs:?}");
    // Every exterior wall but one is closed, so the arc takes the long way round.
    assert!(rim_arcs[0].contains(" A 50,50 0 1 1 "), "{}", rim_arcs[0]);
}

#[test]
fn cyclic_runs_join_across_the_seam() {
    assert_eq!(cyclic_runs(&[true; 6]), Runs::Full);
    assert_eq!(cyclic_runs(&[false; 6]), Runs::Partial(vec![]));
    assert_eq!(
        cyclic_runs(&[true, false, true, true, false, true]),
        Runs::Partial(vec![(2, 2), (5, 2)])
    );
    assert_eq!(
        cyclic_runs(&[false, true, true, true, true, true]),
        Runs::Partial(vec![(1, 5)])
    );
}

#[test]
fn linear_runs_split_on_missing_rings() {
    assert_eq!(linear_runs(&[]), Vec::<(usize, usize)>::new());
    assert_eq!(linear_runs(&[1, 2, 3, 5, 7, 8]), vec![(1, 3), (5, 5), (7, 8)]);
}

/// One drawn segment of the overlay.
enum Segment {
    Line(Point, Point),
    /// Start, end, radius, and whether it sweeps clockwise.
    Arc(Point, Point, f64, bool),
}

fn point(token: &str) -> Point {
    let (x, y) = token.split_once(',').unwrap();
    Point::new(x.parse().unwrap(), y.parse().unwrap())
}

fn overlay_segments(svg: &str) -> Vec<Segment> {
    let start = svg.find(r#"<path id="solution-path""#).unwrap();
    let d = svg[start..].split(r#" d=""#).nth(1).unwrap();
    let d = &d[..d.find('"').unwrap()];

    let mut tokens = d.split_whitespace();
    let mut at = Point::ORIGIN;
    let mut segments = Vec::new();
    while let Some(cmd) = tokens.next() {
        match cmd {
            "M" => at = point(tokens.next().unwrap()),
            "L" => {
                let to = point(tokens.next().unwrap());
                segments.push(Segment::Line(at, to));
                at = to;
            }
            "A" => {
                let radius = point(tokens.next().unwrap()).x;
                assert_eq!(tokens.next(), Some("0"));
                assert_eq!(tokens.next(), Some("0"), "overlay arcs are small arcs: {d}");
                let clockwise = tokens.next() == Some("1");
                let to = point(tokens.next().unwrap());
                segments.push(Segment::Arc(at, to, radius, clockwise));
                at = to;
            }
            other => panic!("unexpected path command {other:?} in {d}"),
        }
    }
    segments
}

/// Points strictly inside each segment, in drawing order.
fn overlay_samples(segments: &[Segment]) -> Vec<Point> {
    use std::f64::consts::{PI, TAU};
    const PER_SEGMENT: usize = 16;

    let mut samples = Vec::new();
    for segment in segments {
        for k in 0..PER_SEGMENT {
            let t = (k as f64 + 0.5) / PER_SEGMENT as f64;
            let p = match *segment {
                Segment::Line(a, b) => a.lerp(b, t),
                Segment::Arc(a, b, radius, clockwise) => {
                    assert!((a.to_vec2().hypot() - radius).abs() < 1e-3);
                    assert!((b.to_vec2().hypot() - radius).abs() < 1e-3);
                    let (from, to) = (a.to_vec2().atan2(), b.to_vec2().atan2());
                    let delta = if clockwise {
                        (to - from).rem_euclid(TAU)
                    } else {
                        -(from - to).rem_euclid(TAU)
                    };
                    assert!(delta.abs() <= PI + 1e-6, "arc sweeps the long way round");
                    let angle = from + delta * t;
                    Point::new(radius * angle.cos(), radius * angle.sin())
                }
            };
            samples.push(p);
        }
    }
    samples
}

fn cell_under(maze: &Maze, p: Point, opts: &RenderOpts) -> CellId {
    let rho = p.to_vec2().hypot();
    assert!(rho >= opts.base_radius - 1e-6, "overlay dips into the centre: {p:?}");
    let ring = ((rho - opts.base_radius) / opts.ring_thickness).floor() as usize;
    assert!(ring < maze.ring_count(), "overlay leaves the maze: {p:?}");
    let n = maze.topology().cell_count(ring);
    let turns = (p.y.atan2(p.x) / std::f64::consts::TAU).rem_euclid(1.0);
    CellId::new(ring, (turns * n as f64).floor() as usize % n)
}

#[test]
fn overlay_geometry_follows_the_solution_through_open_walls() {
    for base_radius in [0.0, 5.0] {
        let opts = RenderOpts {
            base_radius,
            ..RenderOpts::default()
        };
        for (rings, seed) in [(3, 0), (4, 6), (7, 21), (12, 5), (20, 9)] {
            let maze = carved(rings, seed);
            let solution = solve(&maze).unwrap();
            let svg = render_svg(&maze, Some(&solution), &opts).unwrap();

            let mut visited: Vec<CellId> = Vec::new();
            for p in overlay_samples(&overlay_segments(&svg)) {
                let cell = cell_under(&maze, p, &opts);
                if visited.last() != Some(&cell) {
                    visited.push(cell);
                }
            }

            assert_eq!(
                visited.as_slice(),
                solution.cells(),
                "rings={rings} seed={seed} base={base_radius}"
            );
            for pair in visited.windows(2) {
                assert_eq!(maze.wall_towards(pair[0], pair[1]), Some(WallState::Open));
            }
        }
    }
}

#[test]
fn view_box_is_centred_and_padded() {
    let maze = carved(3, 0);
    let svg = render_svg(&maze, None, &RenderOpts::default()).unwrap();
    assert!(svg.contains(r#"viewBox="-40 -40 80 80""#), "{svg}");
    assert!(svg.contains(r#"data-rings="3""#));
    assert!(svg.contains(&format!(r#"data-exit="{}""#, maze.exit())));
}

#[test]
fn base_radius_adds_a_centre_circle_and_widens_the_view() {
    let maze = carved(3, 0);
    let opts = RenderOpts {
        base_radius: 5.0,
        ..RenderOpts::default()
    };
    let svg = render_svg(&maze, None, &opts).unwrap();
    assert!(svg.contains(r#"viewBox="-45 -45 90 90""#));
    assert!(walls_group(&svg).contains(r#"<circle cx="0" cy="0" r="5"/>"#));
}

#[test]
fn overlay_starts_at_the_centre() {
    let maze = carved(4, 9);
    let svg = render_svg(&maze, None, &RenderOpts::default()).unwrap();
    let start = svg.find(r#"<path id="solution-path""#).unwrap();
    let overlay = &svg[start..];
    let d = overlay.split(r#" d=""#).nth(1).unwrap();
    assert!(d.starts_with("M 0,0"), "{d}");
}

#[test]
fn supplied_path_is_checked_against_the_maze() {
    let maze = carved(4, 4);
    let other = carved(4, 5);
    let foreign = solve(&other).unwrap();
    if foreign != solve(&maze).unwrap() {
        let err = render_svg(&maze, Some(&foreign), &RenderOpts::default()).unwrap_err();
        assert!(err.is_inconsistent(), "{err}");
    }

    let own = solve(&maze).unwrap();
    let a = render_svg(&maze, Some(&own), &RenderOpts::default()).unwrap();
    let b = render_svg(&maze, None, &RenderOpts::default()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn invalid_render_options_are_rejected() {
    let maze = carved(3, 1);
    let opts = RenderOpts {
        ring_thickness: 0.0,
        ..RenderOpts::default()
    };
    assert!(render_svg(&maze, None, &opts).unwrap_err().is_invalid_input());
}

#[test]
fn same_maze_renders_identically() {
    let a = render_svg(&carved(9, 77), None, &RenderOpts::default()).unwrap();
    let b = render_svg(&carved(9, 77), None, &RenderOpts::default()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn sweep_picks_the_short_way_round() {
    assert!(sweeps_forward(0.1, 0.2));
    assert!(!sweeps_forward(0.2, 0.1));
    assert!(sweeps_forward(0.95, 0.05));
    assert!(!sweeps_forward(0.05, 0.95));
}
