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

use crate::problem::err::UnknownObjectiveError;
use ndarray::Array2;
use std::str::FromStr;

/// Scoring kernel signature: `(correlation tensor, global index table,
/// n_modes, n_channels) -> score`. Row `c` of the index table holds the
/// tensor-global indices of channel `c`, one per metamode slot.
pub type ObjectiveFn = fn(&Array2<f64>, &Array2<usize>, usize, usize) -> f64;

/// The closed set of scoring strategies. Resolved to a kernel once at
/// problem construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Objective {
    Sum,
    AbsSum,
}

impl Objective {
    pub const ALL: [Objective; 2] = [Objective::Sum, Objective::AbsSum];

    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Objective::Sum => "sum",
            Objective::AbsSum => "abs_sum",
        }
    }

    /// Resolves this variant to its scoring kernel.
    #[inline]
    pub fn func(&self) -> ObjectiveFn {
        match self {
            Objective::Sum => sum_perms,
            Objective::AbsSum => abs_sum_perms,
        }
    }
}

impl FromStr for Objective {
    type Err = UnknownObjectiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sum" => Ok(Objective::Sum),
            "abs_sum" => Ok(Objective::AbsSum),
            other => Err(UnknownObjectiveError::new(other)),
        }
    }
}

impl std::fmt::Display for Objective {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Sums, for every metamode slot, the cross-channel sub-matrix of the
/// correlation tensor selected by that slot's global indices on both axes,
/// then subtracts the `n_modes * n_channels` diagonal self-correlation
/// contribution.
pub fn sum_perms(
    big_corr: &Array2<f64>,
    global_modes: &Array2<usize>,
    n_modes: usize,
    n_channels: usize,
) -> f64 {
    let mut total = 0.0;
    for slot in 0..n_modes {
        let idx = global_modes.column(slot);
        let mut acc = 0.0;
        for a in 0..n_channels {
            let row = big_corr.row(idx[a]);
            for b in 0..n_channels {
                acc += row[idx[b]];
            }
        }
        total += acc;
    }
    total - (n_modes * n_channels) as f64
}

/// Like [`sum_perms`], but accumulates the magnitude of each slot's
/// sub-matrix sum before the same offset subtraction.
pub fn abs_sum_perms(
    big_corr: &Array2<f64>,
    global_modes: &Array2<usize>,
    n_modes: usize,
    n_channels: usize,
) -> f64 {
    let mut total = 0.0;
    for slot in 0..n_modes {
        let idx = global_modes.column(slot);
        let mut acc = 0.0;
        for a in 0..n_channels {
            let row = big_corr.row(idx[a]);
            for b in 0..n_channels {
                acc += row[idx[b]];
            }
        }
        total += acc.abs();
    }
    total - (n_modes * n_channels) as f64
}
