// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use crate::problem::err::{
    CorrelationShapeError, EmptyProblemError, EvaluateError, ProblemError, SolutionShapeError,
};
use crate::problem::objective::{Objective, ObjectiveFn};
use crate::solution::err::PermutationUnsetError;
use crate::solution::sol::Solution;
use ndarray::{Array2, Array3};

/// Binds a fixed correlation tensor and an objective choice to the
/// permutation semantics.
///
/// The tensor is square with side `n_modes * n_channels`; row/column index
/// `channel * n_modes + mode` identifies one (channel, mode) pair. The
/// objective is resolved to its kernel once, here.
#[derive(Debug, Clone)]
pub struct Problem {
    correlation: Array2<f64>,
    n_modes: usize,
    n_channels: usize,
    objective: Objective,
    objective_fn: ObjectiveFn,
    reindexer: Vec<usize>,
}

impl Problem {
    pub fn new(
        correlation: Array2<f64>,
        n_modes: usize,
        n_channels: usize,
        objective: Objective,
    ) -> Result<Self, ProblemError> {
        if n_modes == 0 || n_channels == 0 {
            return Err(ProblemError::from(EmptyProblemError::new(
                n_modes, n_channels,
            )));
        }
        let side = n_modes * n_channels;
        let (rows, cols) = correlation.dim();
        if rows != side || cols != side {
            return Err(ProblemError::from(CorrelationShapeError::new(
                side, rows, cols,
            )));
        }
        let reindexer = (0..n_channels).map(|c| c * n_modes).collect();
        Ok(Self {
            correlation,
            n_modes,
            n_channels,
            objective,
            objective_fn: objective.func(),
            reindexer,
        })
    }

    /// Builds a problem from an objective selector name (`"sum"`,
    /// `"abs_sum"`).
    pub fn from_name(
        correlation: Array2<f64>,
        n_modes: usize,
        n_channels: usize,
        objective: &str,
    ) -> Result<Self, ProblemError> {
        let objective = objective.parse::<Objective>()?;
        Self::new(correlation, n_modes, n_channels, objective)
    }

    #[inline]
    pub fn correlation(&self) -> &Array2<f64> {
        &self.correlation
    }

    #[inline]
    pub fn n_modes(&self) -> usize {
        self.n_modes
    }

    #[inline]
    pub fn n_channels(&self) -> usize {
        self.n_channels
    }

    #[inline]
    pub fn n_metamodes(&self) -> usize {
        self.n_modes
    }

    #[inline]
    pub fn objective(&self) -> Objective {
        self.objective
    }

    /// Maps the solution's working table to tensor-global indices by adding
    /// each channel's `c * n_modes` offset.
    fn global_modes(&self, solution: &Solution) -> Result<Array2<usize>, EvaluateError> {
        if solution.n_modes() != self.n_modes || solution.n_channels() != self.n_channels {
            return Err(EvaluateError::from(SolutionShapeError::new(
                self.n_modes,
                self.n_channels,
                solution.n_modes(),
                solution.n_channels(),
            )));
        }
        let permuted = solution
            .permuted_modes()
            .ok_or(EvaluateError::PermutationUnset(PermutationUnsetError))?;
        Ok(Array2::from_shape_fn(
            (self.n_channels, self.n_modes),
            |(c, m)| permuted[[c, m]] + self.reindexer[c],
        ))
    }

    /// Scores the solution's working permutation with the resolved
    /// objective kernel. No side effects.
    pub fn evaluate(&self, solution: &Solution) -> Result<f64, EvaluateError> {
        let global = self.global_modes(solution)?;
        Ok((self.objective_fn)(
            &self.correlation,
            &global,
            self.n_modes,
            self.n_channels,
        ))
    }

    /// Materializes the aligned cross-channel correlation sub-matrices, one
    /// `(n_channels, n_channels)` block per metamode slot, stacked as
    /// `(n_modes, n_channels, n_channels)`.
    pub fn generate(&self, solution: &Solution) -> Result<Array3<f64>, EvaluateError> {
        let global = self.global_modes(solution)?;
        let mut stack = Array3::zeros((self.n_modes, self.n_channels, self.n_channels));
        for slot in 0..self.n_modes {
            let idx = global.column(slot);
            for a in 0..self.n_channels {
                for b in 0..self.n_channels {
                    stack[[slot, a, b]] = self.correlation[[idx[a], idx[b]]];
                }
            }
        }
        Ok(stack)
    }
}

impl std::fmt::Display for Problem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Problem(n_modes: {}, n_channels: {}, objective: {})",
            self.n_modes, self.n_channels, self.objective
        )
    }
}
