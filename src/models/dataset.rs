//! Dense two-dimensional integer grid

use std::fmt;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::{IoCompareError, Result};

/// Grid dimensions, rows first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Shape {
    pub rows: usize,
    pub cols: usize,
}

impl Shape {
    pub const fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    /// Number of cells
    pub fn len(&self) -> usize {
        self.rows * self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Dimensions as the array the storage libraries expect
    pub fn dims(&self) -> [usize; 2] {
        [self.rows, self.cols]
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} x {}", self.rows, self.cols)
    }
}

/// Row-major grid of `i32` cells.
///
/// The shape is fixed at construction; no operation resizes a dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    data: Array2<i32>,
}

impl Dataset {
    /// All-zero dataset, used as the destination of a read.
    pub fn zeros(shape: Shape) -> Self {
        Self {
            data: Array2::zeros((shape.rows, shape.cols)),
        }
    }

    /// Build a dataset from row-major cells.
    pub fn from_vec(shape: Shape, cells: Vec<i32>) -> Result<Self> {
        if cells.len() != shape.len() {
            return Err(IoCompareError::ShapeMismatch {
                backend: "dataset".to_string(),
                expected: format!("{} ({} cells)", shape, shape.len()),
                found: format!("{} cells", cells.len()),
            });
        }

        let data = Array2::from_shape_vec((shape.rows, shape.cols), cells)
            .map_err(|e| IoCompareError::ShapeMismatch {
                backend: "dataset".to_string(),
                expected: shape.to_string(),
                found: e.to_string(),
            })?;

        Ok(Self { data })
    }

    /// Build a dataset by evaluating `f(row, col)` for every cell.
    pub fn from_fn<F>(shape: Shape, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> i32,
    {
        Self {
            data: Array2::from_shape_fn((shape.rows, shape.cols), |(r, c)| f(r, c)),
        }
    }

    pub fn shape(&self) -> Shape {
        let (rows, cols) = self.data.dim();
        Shape::new(rows, cols)
    }

    pub fn get(&self, row: usize, col: usize) -> Option<i32> {
        self.data.get((row, col)).copied()
    }

    /// Cells in row-major order.
    pub fn as_slice(&self) -> &[i32] {
        // Array2 built by the constructors above is always standard layout.
        self.data
            .as_slice()
            .expect("dataset is stored contiguously in row-major order")
    }

    /// Mutable cells in row-major order, for filling a read destination.
    pub fn as_mut_slice(&mut self) -> &mut [i32] {
        self.data
            .as_slice_mut()
            .expect("dataset is stored contiguously in row-major order")
    }

    pub fn into_vec(self) -> Vec<i32> {
        let (cells, _offset) = self.data.into_raw_vec_and_offset();
        cells
    }

    pub fn iter(&self) -> impl Iterator<Item = &i32> {
        self.data.iter()
    }

    /// Size of the cells in bytes
    pub fn byte_len(&self) -> u64 {
        (self.data.len() * std::mem::size_of::<i32>()) as u64
    }

    /// First row-major index where `self` and `other` differ, with both values.
    ///
    /// Returns `None` when the datasets are equal. A shape difference is
    /// reported at index 0 only if the overlapping cells are equal.
    pub fn first_difference(&self, other: &Dataset) -> Option<(usize, i32, i32)> {
        let diff = self
            .as_slice()
            .iter()
            .zip(other.as_slice())
            .enumerate()
            .find(|(_, (a, b))| a != b)
            .map(|(i, (a, b))| (i, *a, *b));

        match diff {
            Some(d) => Some(d),
            None if self.shape() != other.shape() => Some((0, 0, 0)),
            None => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_display_and_len() {
        let shape = Shape::new(1000, 1000);
        assert_eq!(shape.to_string(), "1000 x 1000");
        assert_eq!(shape.len(), 1_000_000);
        assert_eq!(shape.dims(), [1000, 1000]);
        assert!(Shape::new(0, 3).is_empty());
    }

    #[test]
    fn test_from_vec_row_major() {
        let ds = Dataset::from_vec(Shape::new(2, 2), vec![1, 2, 3, 4]).unwrap();
        assert_eq!(ds.get(0, 1), Some(2));
        assert_eq!(ds.get(1, 0), Some(3));
        assert_eq!(ds.get(2, 0), None);
        assert_eq!(ds.as_slice(), &[1, 2, 3, 4]);
        assert_eq!(ds.byte_len(), 16);
    }

    #[test]
    fn test_from_vec_rejects_wrong_length() {
        let err = Dataset::from_vec(Shape::new(2, 3), vec![1, 2, 3]).unwrap_err();
        assert!(matches!(err, IoCompareError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_from_fn_and_into_vec() {
        let ds = Dataset::from_fn(Shape::new(2, 3), |r, c| (r * 10 + c) as i32);
        assert_eq!(ds.shape(), Shape::new(2, 3));
        assert_eq!(ds.into_vec(), vec![0, 1, 2, 10, 11, 12]);
    }

    #[test]
    fn test_first_difference() {
        let a = Dataset::from_vec(Shape::new(2, 2), vec![1, 2, 3, 4]).unwrap();
        let mut b = a.clone();
        assert_eq!(a.first_difference(&b), None);

        b.as_mut_slice()[2] = 7;
        assert_eq!(a.first_difference(&b), Some((2, 3, 7)));

        let c = Dataset::from_vec(Shape::new(1, 4), vec![1, 2, 3, 4]).unwrap();
        assert!(a.first_difference(&c).is_some());
    }
}
