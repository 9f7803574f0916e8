use itertools::Itertools;

use crate::{
    line_tracer::BresenhamIter,
    occupancy::OccupancyField,
    point::{FloatPoint, GridPoint},
    roadmap::Roadmap,
    search_iter::Path,
};

pub const BLOCKED: char = '#';
pub const FREE: char = '.';
pub const EDGE: char = '+';
pub const VERTEX: char = 'o';
pub const ROUTE: char = '*';
pub const START: char = 'S';
pub const GOAL: char = 'G';

/// Draws the field, the roadmap and the path as text, scaled down to at most
/// `columns` x `rows` characters. The first line is the top of the map. A
/// character is blocked if any cell it covers is blocked; edges never cover
/// a blocked character.
pub fn render(
    field: &OccupancyField,
    roadmap: &Roadmap,
    path: Option<&Path>,
    columns: u64,
    rows: u64,
) -> String {
    let canvas_w = columns.clamp(1, field.width());
    let canvas_h = rows.clamp(1, field.height());
    let mut canvas = (0..canvas_h)
        .map(|cy| {
            let (y0, y1) = span(cy, canvas_h, field.height());
            (0..canvas_w)
                .map(|cx| {
                    let (x0, x1) = span(cx, canvas_w, field.width());
                    let blocked = (y0..y1)
                        .cartesian_product(x0..x1)
                        .any(|(y, x)| !field.is_cell_free(GridPoint::new([x, y])));
                    if blocked { BLOCKED } else { FREE }
                })
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();

    let to_canvas = |p: FloatPoint| {
        let cx = (p.x().max(0.0) * canvas_w as f64 / field.width() as f64) as u64;
        let cy = (p.y().max(0.0) * canvas_h as f64 / field.height() as f64) as u64;
        GridPoint::new([cx.min(canvas_w - 1), cy.min(canvas_h - 1)])
    };
    let mut mark = |cell: GridPoint, c: char| {
        let slot = &mut canvas[cell.y() as usize][cell.x() as usize];
        if c != EDGE || *slot != BLOCKED {
            *slot = c;
        }
    };

    for (a, b) in roadmap.edges() {
        let (pa, pb) = (roadmap.vertices()[a], roadmap.vertices()[b]);
        for cell in BresenhamIter::new(to_canvas(pa), to_canvas(pb)) {
            mark(cell, EDGE);
        }
    }
    for p in roadmap.vertices() {
        mark(to_canvas(*p), VERTEX);
    }
    if let Some(path) = path {
        for (a, b) in path.points().iter().tuple_windows() {
            for cell in BresenhamIter::new(to_canvas(*a), to_canvas(*b)) {
                mark(cell, ROUTE);
            }
        }
    }
    if let Some(start) = roadmap.vertices().first() {
        mark(to_canvas(*start), START);
    }
    if let Some(goal) = roadmap.vertices().last() {
        mark(to_canvas(*goal), GOAL);
    }

    canvas
        .iter()
        .rev()
        .map(|row| row.iter().collect::<String>())
        .join("\n")
}

/// Grid cells `[lo, hi)` covered by canvas index `i` of `n`, never empty.
fn span(i: u64, n: u64, size: u64) -> (u64, u64) {
    let lo = i * size / n;
    let hi = ((i + 1) * size / n).max(lo + 1);
    (lo, hi)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search_iter::search;

    #[test]
    fn test_full_scale() {
        let field: OccupancyField = "....\n.##.\n....".parse().unwrap();
        let mut roadmap = Roadmap::new(
            [[0.5, 0.5], [3.5, 0.5], [3.5, 2.5]]
                .map(FloatPoint::new)
                .to_vec(),
        );
        roadmap.add_edge(0, 1);
        roadmap.add_edge(1, 2);
        let path = search(&roadmap, 0, 2).unwrap();
        let picture = render(&field, &roadmap, Some(&path), 80, 40);
        assert_eq!(picture, "...G\n.##*\nS***");
    }

    #[test]
    fn test_edges_drawn_without_path() {
        let field: OccupancyField = "....\n.#..\n....".parse().unwrap();
        let mut roadmap = Roadmap::new(
            [[0.5, 0.5], [3.5, 0.5], [3.5, 2.5]]
                .map(FloatPoint::new)
                .to_vec(),
        );
        roadmap.add_edge(0, 1);
        roadmap.add_edge(1, 2);
        let picture = render(&field, &roadmap, None, 80, 40);
        assert_eq!(picture, "...G\n.#.+\nS++o");
    }

    #[test]
    fn test_edges_leave_obstacles_visible() {
        let field: OccupancyField = "....\n.#..\n....".parse().unwrap();
        let mut roadmap = Roadmap::new(
            [[0.5, 0.5], [3.5, 2.5]]
                .map(FloatPoint::new)
                .to_vec(),
        );
        roadmap.add_edge(0, 1);
        let picture = render(&field, &roadmap, None, 80, 40);
        assert_eq!(picture, "...G\n.#+.\nS...");
    }

    #[test]
    fn test_downscaled_keeps_obstacles() {
        let field: OccupancyField = "\
........
........
......#.
........"
            .parse()
            .unwrap();
        let roadmap = Roadmap::new(vec![FloatPoint::new([0.5, 0.5]), FloatPoint::new([0.5, 3.5])]);
        let picture = render(&field, &roadmap, None, 4, 2);
        assert_eq!(picture, "G..#\nS...");
    }
}
