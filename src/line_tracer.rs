//! Line-of-sight checks over an [`OccupancyField`].
//!
//! Segments are rasterized with Bresenham's integer line algorithm between
//! the cells that contain the two endpoints.

use crate::{
    occupancy::OccupancyField,
    point::{FloatPoint, GridPoint},
};

/// Cells of the Bresenham line from `start` to `end`, both included.
#[derive(Clone, Debug)]
pub struct BresenhamIter {
    x: i64,
    y: i64,
    end_x: i64,
    end_y: i64,
    dx: i64,
    dy: i64,
    step_x: i64,
    step_y: i64,
    err: i64,
    done: bool,
}

impl BresenhamIter {
    pub fn new(start: GridPoint, end: GridPoint) -> Self {
        let (x, y) = (start.x() as i64, start.y() as i64);
        let (end_x, end_y) = (end.x() as i64, end.y() as i64);
        let dx = (end_x - x).abs();
        let dy = -(end_y - y).abs();
        Self {
            x,
            y,
            end_x,
            end_y,
            dx,
            dy,
            step_x: if x < end_x { 1 } else { -1 },
            step_y: if y < end_y { 1 } else { -1 },
            err: dx + dy,
            done: false,
        }
    }
}

impl Iterator for BresenhamIter {
    type Item = GridPoint;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        // Never leaves the bounding box of two non-negative endpoints.
        let cell = GridPoint::new([self.x as u64, self.y as u64]);
        if self.x == self.end_x && self.y == self.end_y {
            self.done = true;
        } else {
            let e2 = 2 * self.err;
            if e2 >= self.dy {
                self.err += self.dy;
                self.x += self.step_x;
            }
            if e2 <= self.dx {
                self.err += self.dx;
                self.y += self.step_y;
            }
        }
        Some(cell)
    }
}

#[derive(Copy, Clone, Debug)]
pub struct LineTracer<'a> {
    field: &'a OccupancyField,
}

impl<'a> LineTracer<'a> {
    pub fn new(field: &'a OccupancyField) -> Self {
        Self { field }
    }

    /// Cells visited by the segment, starting from the lexicographically
    /// smaller endpoint cell so both directions give the same sequence.
    /// `None` when either endpoint lies outside the grid.
    pub fn cells(&self, p1: FloatPoint, p2: FloatPoint) -> Option<BresenhamIter> {
        let a = self.field.cell_of(p1)?;
        let b = self.field.cell_of(p2)?;
        Some(if a <= b {
            BresenhamIter::new(a, b)
        } else {
            BresenhamIter::new(b, a)
        })
    }

    pub fn is_blocked(&self, p1: FloatPoint, p2: FloatPoint) -> bool {
        match self.cells(p1, p2) {
            Some(mut cells) => cells.any(|c| !self.field.is_cell_free(c)),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn line(a: (u64, u64), b: (u64, u64)) -> Vec<(u64, u64)> {
        BresenhamIter::new(GridPoint::new([a.0, a.1]), GridPoint::new([b.0, b.1]))
            .map(|c| (c.x(), c.y()))
            .collect()
    }

    #[test]
    fn test_axis_aligned_and_diagonal() {
        assert_eq!(line((0, 0), (3, 0)), vec![(0, 0), (1, 0), (2, 0), (3, 0)]);
        assert_eq!(line((2, 3), (2, 0)), vec![(2, 3), (2, 2), (2, 1), (2, 0)]);
        assert_eq!(line((0, 0), (2, 2)), vec![(0, 0), (1, 1), (2, 2)]);
        assert_eq!(line((3, 0), (0, 3)), vec![(3, 0), (2, 1), (1, 2), (0, 3)]);
        assert_eq!(line((1, 1), (1, 1)), vec![(1, 1)]);
    }

    #[test]
    fn test_shallow_slope() {
        assert_eq!(
            line((0, 0), (4, 1)),
            vec![(0, 0), (1, 0), (2, 1), (3, 1), (4, 1)]
        );
    }

    #[test]
    fn test_wall_blocks() {
        let field: OccupancyField = "\
.....
..#..
..#..
..#..
....."
            .parse()
            .unwrap();
        let tracer = LineTracer::new(&field);
        let left = FloatPoint::new([0.5, 2.5]);
        let right = FloatPoint::new([4.5, 2.5]);
        assert!(tracer.is_blocked(left, right));
        assert!(tracer.is_blocked(right, left));
        let below = FloatPoint::new([4.5, 0.5]);
        assert!(!tracer.is_blocked(FloatPoint::new([0.5, 0.5]), below));
        assert!(!tracer.is_blocked(left, FloatPoint::new([1.5, 4.5])));
    }

    #[test]
    fn test_out_of_bounds_is_blocked() {
        let field: OccupancyField = "..\n..".parse().unwrap();
        let tracer = LineTracer::new(&field);
        assert!(tracer.is_blocked(FloatPoint::new([0.5, 0.5]), FloatPoint::new([2.5, 0.5])));
        assert!(tracer.cells(FloatPoint::new([-1.0, 0.0]), FloatPoint::new([1.0, 1.0])).is_none());
    }

    proptest! {
        #[test]
        fn bresenham_is_connected(x0 in 0u64..40, y0 in 0u64..40, x1 in 0u64..40, y1 in 0u64..40) {
            let cells = line((x0, y0), (x1, y1));
            prop_assert_eq!(cells.first().copied(), Some((x0, y0)));
            prop_assert_eq!(cells.last().copied(), Some((x1, y1)));
            prop_assert_eq!(cells.len() as u64, x0.abs_diff(x1).max(y0.abs_diff(y1)) + 1);
            for pair in cells.windows(2) {
                prop_assert!(pair[0].0.abs_diff(pair[1].0) <= 1);
                prop_assert!(pair[0].1.abs_diff(pair[1].1) <= 1);
            }
        }

        #[test]
        fn blocked_check_is_symmetric(
            ax in 0.0f64..8.0, ay in 0.0f64..8.0, bx in 0.0f64..8.0, by in 0.0f64..8.0
        ) {
            let field: OccupancyField = "\
........
..#.....
..#..#..
.....#..
...###..
........
.#......
........"
                .parse()
                .unwrap();
            let tracer = LineTracer::new(&field);
            let (a, b) = (FloatPoint::new([ax, ay]), FloatPoint::new([bx, by]));
            prop_assert_eq!(tracer.is_blocked(a, b), tracer.is_blocked(b, a));
        }
    }
}
