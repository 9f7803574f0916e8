use std::{str::FromStr, sync::Arc};

use crate::{
    error::{PlanError, Result},
    point::{FloatPoint, GridPoint},
};

pub const DEFAULT_THRESHOLD: u8 = 200;
pub const FREE_VALUE: u8 = u8::MAX;
pub const BLOCKED_VALUE: u8 = 0;

/// Read-only occupancy grid. Cells are stored row-major with `y = 0` as the
/// bottom row; a cell is free when its value is strictly above the threshold.
/// Clones share the cell buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OccupancyField {
    width: u64,
    height: u64,
    cells: Arc<[u8]>,
    threshold: u8,
}

impl OccupancyField {
    pub fn new(width: u64, height: u64, cells: Vec<u8>, threshold: u8) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(PlanError::InvalidInput(format!(
                "grid dimensions must be positive, got {width}x{height}"
            )));
        }
        if width.checked_mul(height) != Some(cells.len() as u64) {
            return Err(PlanError::InvalidInput(format!(
                "{width}x{height} grid needs {} cells, got {}",
                width.saturating_mul(height),
                cells.len()
            )));
        }
        Ok(Self {
            width,
            height,
            cells: cells.into(),
            threshold,
        })
    }

    /// The same grid read with another threshold, without copying cells.
    pub fn with_threshold(&self, threshold: u8) -> Self {
        Self {
            cells: Arc::clone(&self.cells),
            threshold,
            ..*self
        }
    }

    pub fn width(&self) -> u64 {
        self.width
    }

    pub fn height(&self) -> u64 {
        self.height
    }

    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    /// The cell holding `p`, or `None` outside `[0, width) x [0, height)`.
    pub fn cell_of(&self, p: FloatPoint) -> Option<GridPoint> {
        p.cell().filter(|c| self.in_bounds(*c))
    }

    pub fn contains(&self, p: FloatPoint) -> bool {
        self.cell_of(p).is_some()
    }

    pub fn value(&self, cell: GridPoint) -> Option<u8> {
        if self.in_bounds(cell) {
            Some(self.cells[(cell.y() * self.width + cell.x()) as usize])
        } else {
            None
        }
    }

    pub fn is_cell_free(&self, cell: GridPoint) -> bool {
        self.value(cell).is_some_and(|v| v > self.threshold)
    }

    /// Out-of-bounds points are never free; callers are expected to stay
    /// inside the grid.
    pub fn is_free(&self, p: FloatPoint) -> bool {
        self.cell_of(p).is_some_and(|c| self.is_cell_free(c))
    }

    pub fn free_cell_count(&self) -> usize {
        self.cells.iter().filter(|v| **v > self.threshold).count()
    }

    fn in_bounds(&self, cell: GridPoint) -> bool {
        cell.x() < self.width && cell.y() < self.height
    }
}

/// ASCII grid: `.` is free, `#` is blocked, line `i` is row `y = i`.
impl FromStr for OccupancyField {
    type Err = PlanError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let lines = s
            .lines()
            .map(str::trim_end)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>();
        let width = lines.first().map_or(0, |line| line.chars().count());
        let mut cells = Vec::with_capacity(width * lines.len());
        for (y, line) in lines.iter().enumerate() {
            if line.chars().count() != width {
                return Err(PlanError::InvalidInput(format!(
                    "row {y} has {} cells, expected {width}",
                    line.chars().count()
                )));
            }
            for c in line.chars() {
                cells.push(match c {
                    '.' => FREE_VALUE,
                    '#' => BLOCKED_VALUE,
                    other => {
                        return Err(PlanError::InvalidInput(format!(
                            "unexpected map character {other:?} in row {y}"
                        )));
                    }
                });
            }
        }
        Self::new(width as u64, lines.len() as u64, cells, DEFAULT_THRESHOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_free_and_blocked() {
        let field: OccupancyField = "..#\n...\n".parse().unwrap();
        assert_eq!((field.width(), field.height()), (3, 2));
        assert!(field.is_free(FloatPoint::new([0.5, 0.5])));
        assert!(!field.is_free(FloatPoint::new([2.99, 0.0])));
        assert!(field.is_free(FloatPoint::new([2.5, 1.5])));
        assert_eq!(field.free_cell_count(), 5);
    }

    #[test]
    fn test_threshold_is_strict() {
        let field = OccupancyField::new(3, 1, vec![200, 201, 255], DEFAULT_THRESHOLD).unwrap();
        assert!(!field.is_cell_free(GridPoint::new([0, 0])));
        assert!(field.is_cell_free(GridPoint::new([1, 0])));
        assert!(field.is_cell_free(GridPoint::new([2, 0])));
        let strict = field.with_threshold(250);
        assert_eq!(strict.free_cell_count(), 1);
        assert_eq!(field.free_cell_count(), 2);
    }

    #[test]
    fn test_threshold_override_shares_cells() {
        let field: OccupancyField = "..#\n#..".parse().unwrap();
        let view = field.with_threshold(0);
        assert!(Arc::ptr_eq(&field.cells, &view.cells));
        assert_eq!(view.threshold(), 0);
        assert_eq!(field.threshold(), DEFAULT_THRESHOLD);
    }

    #[test]
    fn test_out_of_bounds_is_not_free() {
        let field: OccupancyField = "..\n..".parse().unwrap();
        for p in [[-0.1, 0.0], [2.0, 0.0], [0.0, 2.0], [f64::INFINITY, 1.0]] {
            assert!(!field.is_free(FloatPoint::new(p)));
            assert!(!field.contains(FloatPoint::new(p)));
        }
        assert_eq!(field.value(GridPoint::new([2, 1])), None);
    }

    #[test]
    fn test_invalid_grids() {
        assert!(OccupancyField::new(0, 3, vec![], DEFAULT_THRESHOLD).is_err());
        assert!(OccupancyField::new(2, 2, vec![255; 3], DEFAULT_THRESHOLD).is_err());
        assert!("".parse::<OccupancyField>().is_err());
        assert!("..\n.".parse::<OccupancyField>().is_err());
        assert!("..\n.x".parse::<OccupancyField>().is_err());
    }
}
