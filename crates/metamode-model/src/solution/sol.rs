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

use crate::solution::err::{ChannelOutOfBoundsError, PermutationUnsetError};
use ndarray::Array2;
use rand::Rng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

/// A per-channel permutation of mode indices.
///
/// Two views coexist: `unpermuted_modes` is the baseline table fixed at
/// construction, `permuted_modes` is the current working permutation and
/// stays unset until a mutation operator has run. Every row of the working
/// table is a permutation of `0..n_modes`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    n_modes: usize,
    n_channels: usize,
    unpermuted_modes: Array2<usize>,
    permuted_modes: Option<Array2<usize>>,
}

impl Solution {
    /// Creates a solution whose baseline is the identity ordering
    /// `0..n_modes` for every channel.
    pub fn new(n_modes: usize, n_channels: usize) -> Self {
        let unpermuted_modes = Array2::from_shape_fn((n_channels, n_modes), |(_, mode)| mode);
        Self {
            n_modes,
            n_channels,
            unpermuted_modes,
            permuted_modes: None,
        }
    }

    /// Creates a solution from a supplied baseline table, taken verbatim.
    /// Row `c` holds the mode ordering of channel `c`.
    pub fn from_baseline(baseline: Array2<usize>) -> Self {
        let (n_channels, n_modes) = baseline.dim();
        Self {
            n_modes,
            n_channels,
            unpermuted_modes: baseline,
            permuted_modes: None,
        }
    }

    #[inline]
    pub fn n_modes(&self) -> usize {
        self.n_modes
    }

    #[inline]
    pub fn n_channels(&self) -> usize {
        self.n_channels
    }

    /// Number of cross-channel groupings; one per mode slot.
    #[inline]
    pub fn n_metamodes(&self) -> usize {
        self.n_modes
    }

    #[inline]
    pub fn unpermuted_modes(&self) -> &Array2<usize> {
        &self.unpermuted_modes
    }

    #[inline]
    pub fn permuted_modes(&self) -> Option<&Array2<usize>> {
        self.permuted_modes.as_ref()
    }

    #[inline]
    pub fn has_permutation(&self) -> bool {
        self.permuted_modes.is_some()
    }

    /// Adopts the baseline table as the working permutation. Chainable.
    pub fn reset_to_baseline(&mut self) -> &mut Self {
        self.permuted_modes = Some(self.unpermuted_modes.clone());
        self
    }

    /// Shuffles every baseline row independently and uniformly at random
    /// into the working table. Chainable.
    pub fn random_permutation(&mut self, rng: &mut ChaCha8Rng) -> &mut Self {
        let mut permuted = self.unpermuted_modes.clone();
        for mut row in permuted.outer_iter_mut() {
            let mut scratch: Vec<usize> = row.iter().copied().collect();
            scratch.shuffle(rng);
            for (dst, src) in row.iter_mut().zip(scratch) {
                *dst = src;
            }
        }
        self.permuted_modes = Some(permuted);
        self
    }

    /// Resets the working table to the baseline and replaces row `channel`
    /// with a fresh uniform permutation of `0..n_modes`.
    pub fn permute_one_channel(
        &mut self,
        channel: usize,
        rng: &mut ChaCha8Rng,
    ) -> Result<&mut Self, ChannelOutOfBoundsError> {
        if channel >= self.n_channels {
            return Err(ChannelOutOfBoundsError::new(channel, self.n_channels));
        }
        let mut permuted = self.unpermuted_modes.clone();
        let mut fresh: Vec<usize> = (0..self.n_modes).collect();
        fresh.shuffle(rng);
        for (dst, src) in permuted.row_mut(channel).iter_mut().zip(fresh) {
            *dst = src;
        }
        self.permuted_modes = Some(permuted);
        Ok(self)
    }

    /// The proposal operator used by the search loop: re-permute one
    /// uniformly drawn channel.
    pub fn step(&mut self, rng: &mut ChaCha8Rng) -> &mut Self {
        let channel = rng.random_range(0..self.n_channels);
        self.permute_one_channel(channel, rng)
            .expect("drawn channel is in range");
        self
    }

    /// Spawns an independent candidate whose baseline is this solution's
    /// current working permutation. The accepted state thereby becomes the
    /// mutation baseline for every candidate forked from it.
    pub fn fork(&self) -> Result<Self, PermutationUnsetError> {
        let permuted = self.permuted_modes.as_ref().ok_or(PermutationUnsetError)?;
        Ok(Self {
            n_modes: self.n_modes,
            n_channels: self.n_channels,
            unpermuted_modes: permuted.clone(),
            permuted_modes: Some(permuted.clone()),
        })
    }
}

impl std::fmt::Display for Solution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Solution(n_modes: {}, n_channels: {}, permuted: {})",
            self.n_modes,
            self.n_channels,
            self.has_permutation()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use rand::SeedableRng;

    fn rng(seed: u64) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(seed)
    }

    fn is_permutation(row: &[usize], n: usize) -> bool {
        let mut sorted = row.to_vec();
        sorted.sort_unstable();
        sorted == (0..n).collect::<Vec<_>>()
    }

    #[test]
    fn identity_baseline_rows() {
        let sol = Solution::new(5, 3);
        assert_eq!(sol.n_modes(), 5);
        assert_eq!(sol.n_channels(), 3);
        assert_eq!(sol.n_metamodes(), 5);
        assert!(!sol.has_permutation());
        for row in sol.unpermuted_modes().outer_iter() {
            assert_eq!(row.to_vec(), vec![0, 1, 2, 3, 4]);
        }
    }

    #[test]
    fn baseline_taken_verbatim() {
        let baseline = array![[2usize, 0, 1], [1, 2, 0]];
        let sol = Solution::from_baseline(baseline.clone());
        assert_eq!(sol.n_channels(), 2);
        assert_eq!(sol.n_modes(), 3);
        assert_eq!(sol.unpermuted_modes(), &baseline);
        assert!(sol.permuted_modes().is_none());
    }

    #[test]
    fn random_permutation_rows_are_permutations() {
        let mut r = rng(7);
        for trial in 0..100 {
            let mut sol = Solution::new(6, 4);
            sol.random_permutation(&mut r);
            let permuted = sol.permuted_modes().expect("set after shuffle");
            for row in permuted.outer_iter() {
                assert!(
                    is_permutation(row.as_slice().unwrap(), 6),
                    "trial {} produced a non-permutation row {:?}",
                    trial,
                    row
                );
            }
        }
    }

    #[test]
    fn permute_one_channel_rows_are_permutations() {
        let mut r = rng(13);
        for _ in 0..100 {
            let mut sol = Solution::new(5, 3);
            sol.permute_one_channel(1, &mut r).expect("in range");
            let permuted = sol.permuted_modes().unwrap();
            for row in permuted.outer_iter() {
                assert!(is_permutation(row.as_slice().unwrap(), 5));
            }
        }
    }

    #[test]
    fn permute_one_channel_leaves_other_rows_at_baseline() {
        let mut r = rng(3);
        let mut sol = Solution::new(4, 3);
        sol.permute_one_channel(2, &mut r).expect("in range");
        let permuted = sol.permuted_modes().unwrap();
        assert_eq!(permuted.row(0), sol.unpermuted_modes().row(0));
        assert_eq!(permuted.row(1), sol.unpermuted_modes().row(1));
    }

    #[test]
    fn permute_one_channel_out_of_bounds() {
        let mut r = rng(0);
        let mut sol = Solution::new(4, 2);
        let err = sol.permute_one_channel(2, &mut r).unwrap_err();
        assert_eq!(err.channel(), 2);
        assert_eq!(err.n_channels(), 2);
        assert!(!sol.has_permutation());
    }

    #[test]
    fn step_sets_a_working_permutation() {
        let mut r = rng(42);
        let mut sol = Solution::new(5, 4);
        sol.step(&mut r);
        let permuted = sol.permuted_modes().unwrap();
        for row in permuted.outer_iter() {
            assert!(is_permutation(row.as_slice().unwrap(), 5));
        }
    }

    #[test]
    fn fork_rebases_baseline_on_working_permutation() {
        let mut r = rng(11);
        let mut sol = Solution::new(4, 2);
        sol.random_permutation(&mut r);
        let parent_permuted = sol.permuted_modes().unwrap().clone();

        let child = sol.fork().expect("parent has a permutation");
        assert_eq!(child.unpermuted_modes(), &parent_permuted);
        assert_eq!(child.permuted_modes().unwrap(), &parent_permuted);
    }

    #[test]
    fn fork_is_independent_of_parent() {
        let mut r = rng(23);
        let mut sol = Solution::new(4, 2);
        sol.random_permutation(&mut r);
        let parent_permuted = sol.permuted_modes().unwrap().clone();

        let mut child = sol.fork().expect("parent has a permutation");
        child.step(&mut r);
        assert_eq!(sol.permuted_modes().unwrap(), &parent_permuted);
    }

    #[test]
    fn reset_to_baseline_adopts_the_baseline_table() {
        let baseline = array![[2usize, 0, 1], [1, 2, 0]];
        let mut sol = Solution::from_baseline(baseline.clone());
        sol.reset_to_baseline();
        assert_eq!(sol.permuted_modes().unwrap(), &baseline);
    }

    #[test]
    fn fork_without_permutation_fails() {
        let sol = Solution::new(3, 2);
        assert_eq!(sol.fork().unwrap_err(), PermutationUnsetError);
    }

    #[test]
    fn display_reports_state() {
        let mut r = rng(1);
        let mut sol = Solution::new(3, 2);
        assert_eq!(
            format!("{}", sol),
            "Solution(n_modes: 3, n_channels: 2, permuted: false)"
        );
        sol.random_permutation(&mut r);
        assert_eq!(
            format!("{}", sol),
            "Solution(n_modes: 3, n_channels: 2, permuted: true)"
        );
    }
}
