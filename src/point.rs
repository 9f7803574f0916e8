use std::{fmt::Display, ops::Index, str::FromStr};

use itertools::Itertools;
use num_traits::{Num, cast::ToPrimitive};
use trait_set::trait_set;

use crate::error::PlanError;

trait_set! {
    pub trait NumType = Display + ToPrimitive + Default + Num + Copy + PartialOrd;
}

pub type GridPoint = Point<u64, 2>;
pub type FloatPoint = Point<f64, 2>;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct Point<N: NumType, const S: usize> {
    coords: [N; S],
}

impl<N: NumType, const S: usize> Display for Point<N, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({})", self.coords.iter().join(","))
    }
}

impl<N: NumType, const S: usize> Point<N, S> {
    pub fn new(coords: [N; S]) -> Self {
        Self { coords }
    }

    pub fn euclidean_distance(&self, other: Point<N, S>) -> f64 {
        (0..S)
            .map(|i| {
                let (a, b) = (self[i].to_f64(), other[i].to_f64());
                a.zip(b).map_or(f64::INFINITY, |(a, b)| (a - b).powf(2.0))
            })
            .sum::<f64>()
            .sqrt()
    }
}

impl<N: NumType> Point<N, 2> {
    pub fn x(&self) -> N {
        self[0]
    }

    pub fn y(&self) -> N {
        self[1]
    }
}

impl FloatPoint {
    /// Truncates to the containing grid cell. Negative or non-finite
    /// coordinates have no cell.
    pub fn cell(&self) -> Option<GridPoint> {
        if self.coords.iter().all(|c| c.is_finite() && *c >= 0.0) {
            Some(GridPoint::new(self.coords.map(|c| c as u64)))
        } else {
            None
        }
    }
}

impl GridPoint {
    /// Center of the cell in continuous coordinates.
    pub fn center(&self) -> FloatPoint {
        FloatPoint::new(self.coords.map(|c| c as f64 + 0.5))
    }
}

/// Parses `x,y` (parentheses optional), the form `Display` produces.
impl FromStr for FloatPoint {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_start_matches('(').trim_end_matches(')');
        let parts = trimmed
            .split(',')
            .map(|part| part.trim().parse::<f64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| PlanError::InvalidInput(format!("point {s}: {e}")))?;
        match parts.as_slice() {
            [x, y] => Ok(FloatPoint::new([*x, *y])),
            _ => Err(PlanError::InvalidInput(format!(
                "point {s}: expected two coordinates"
            ))),
        }
    }
}

impl<N: NumType, const S: usize> Index<usize> for Point<N, S> {
    type Output = N;

    fn index(&self, index: usize) -> &Self::Output {
        &self.coords[index]
    }
}

impl<N: NumType, const S: usize> Default for Point<N, S> {
    fn default() -> Self {
        Self {
            coords: [N::default(); S],
        }
    }
}
