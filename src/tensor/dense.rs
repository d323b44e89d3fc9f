//! Bridge between rank-2 `f64` tensors and dense faer matrices.

use faer::Mat;

use super::Tensor;
use crate::algebra::Standard;
use crate::error::{Error, Result};

impl Tensor<Standard<f64>> {
    /// Dense copy as a faer matrix.
    pub fn to_faer(&self) -> Result<Mat<f64>> {
        if self.rank() != 2 {
            return Err(Error::InvalidArgument {
                arg: "tensor",
                reason: format!("expected rank 2, got rank {}", self.rank()),
            });
        }
        let mut m = Mat::zeros(self.structure[0], self.structure[1]);
        for (index, value) in self.entries() {
            m[(index[0], index[1])] = *value;
        }
        Ok(m)
    }

    /// Sparse copy of a faer matrix, storing only non-zero entries.
    pub fn from_faer(m: &Mat<f64>) -> Result<Self> {
        let (rows, cols) = (m.nrows(), m.ncols());
        let data: Vec<f64> = (0..rows)
            .flat_map(|i| (0..cols).map(move |j| (i, j)))
            .map(|(i, j)| m[(i, j)])
            .collect();
        Self::from_flat(&[rows, cols], &data)
    }
}
