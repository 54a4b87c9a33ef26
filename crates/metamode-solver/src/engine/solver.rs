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

use crate::engine::err::SolverBuildError;
use crate::monitor::observer::{NullObserver, SearchObserver};
use metamode_model::prelude::{Objective, Problem, Solution};
use ndarray::{Array2, Array3};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

/// One accepted improvement: the iteration it happened at and the incumbent
/// value after acceptance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Improvement {
    pub iteration: usize,
    pub value: f64,
}

impl std::fmt::Display for Improvement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Improvement(iteration: {}, value: {})",
            self.iteration, self.value
        )
    }
}

/// Greedy hill-climbing search over per-channel mode permutations.
///
/// Each step forks the incumbent, re-permutes one random channel and keeps
/// the candidate only on a strict improvement. There is no temperature
/// schedule and no acceptance of worse states; the search cannot leave a
/// local optimum except through the one-channel neighborhood.
#[derive(Debug, Clone)]
pub struct Solver {
    problem: Problem,
    best_solution: Solution,
    best_value: f64,
    iteration: usize,
    record: Vec<Improvement>,
    steps: Vec<Array3<f64>>,
    rng: ChaCha8Rng,
}

impl Solver {
    /// Builds the problem, draws a random initial permutation and evaluates
    /// it as the starting incumbent. The seed fully determines the run.
    pub fn new(
        correlation: Array2<f64>,
        n_modes: usize,
        n_channels: usize,
        objective: Objective,
        seed: u64,
    ) -> Result<Self, SolverBuildError> {
        let problem = Problem::new(correlation, n_modes, n_channels, objective)?;
        Self::with_rng(problem, ChaCha8Rng::seed_from_u64(seed))
    }

    /// Construction from an existing problem and an explicit random source,
    /// for callers running several independent searches.
    pub fn with_rng(problem: Problem, mut rng: ChaCha8Rng) -> Result<Self, SolverBuildError> {
        let mut solution = Solution::new(problem.n_modes(), problem.n_channels());
        solution.random_permutation(&mut rng);
        let best_value = problem.evaluate(&solution)?;
        Ok(Self {
            problem,
            best_solution: solution,
            best_value,
            iteration: 0,
            record: Vec::new(),
            steps: Vec::new(),
            rng,
        })
    }

    /// One proposal: fork the incumbent, re-permute a random channel,
    /// evaluate. Returns whether the candidate was accepted. Ties lose.
    pub fn step(&mut self) -> bool {
        let mut candidate = self
            .best_solution
            .fork()
            .expect("incumbent always carries a permutation");
        candidate.step(&mut self.rng);
        let value = self
            .problem
            .evaluate(&candidate)
            .expect("candidate dimensions match the problem");
        if value > self.best_value {
            self.best_solution = candidate;
            self.best_value = value;
            return true;
        }
        false
    }

    /// Runs exactly `n_steps` sequential steps, recording every accepted
    /// improvement together with its aligned correlation snapshot.
    pub fn solve(&mut self, n_steps: usize) {
        self.solve_observed(n_steps, &mut NullObserver);
    }

    /// Like [`solve`](Self::solve), with lifecycle and per-iteration events
    /// forwarded to `observer`. Observers are purely observational; nothing
    /// they do feeds back into the search.
    pub fn solve_observed(&mut self, n_steps: usize, observer: &mut dyn SearchObserver) {
        observer.on_search_start();
        for _ in 0..n_steps {
            let accepted = self.step();
            if accepted {
                tracing::debug!(
                    iteration = self.iteration,
                    value = self.best_value,
                    "accepted new incumbent"
                );
                self.record.push(Improvement {
                    iteration: self.iteration,
                    value: self.best_value,
                });
                let aligned = self
                    .problem
                    .generate(&self.best_solution)
                    .expect("incumbent always carries a permutation");
                self.steps.push(aligned);
                observer.on_new_incumbent(self.iteration, self.best_value);
            }
            observer.on_iteration(self.iteration, accepted);
            self.iteration += 1;
        }
        observer.on_search_end();
    }

    #[inline]
    pub fn problem(&self) -> &Problem {
        &self.problem
    }

    #[inline]
    pub fn best_solution(&self) -> &Solution {
        &self.best_solution
    }

    #[inline]
    pub fn best_value(&self) -> f64 {
        self.best_value
    }

    /// Iterations driven so far by [`solve`](Self::solve) /
    /// [`solve_observed`](Self::solve_observed).
    #[inline]
    pub fn iteration(&self) -> usize {
        self.iteration
    }

    /// Accepted improvements, in acceptance order.
    #[inline]
    pub fn record(&self) -> &[Improvement] {
        &self.record
    }

    /// Aligned correlation snapshots, one per accepted improvement.
    #[inline]
    pub fn steps(&self) -> &[Array3<f64>] {
        &self.steps
    }

    /// Aligned correlation sub-matrices of the current incumbent, stacked
    /// `(n_modes, n_channels, n_channels)`.
    pub fn generate(&self) -> Array3<f64> {
        self.problem
            .generate(&self.best_solution)
            .expect("incumbent always carries a permutation")
    }
}

impl std::fmt::Display for Solver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Solver(iteration: {}, best_value: {}, improvements: {})",
            self.iteration,
            self.best_value,
            self.record.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    fn diagonal_tensor(side: usize) -> Array2<f64> {
        Array2::from_shape_fn((side, side), |(i, j)| if i == j { 1.0 } else { 0.0 })
    }

    /// Unit diagonal, cross-channel correlation `k` wherever two channels
    /// carry the same mode, zero otherwise. Symmetric.
    fn matched_mode_tensor(n_modes: usize, n_channels: usize, k: f64) -> Array2<f64> {
        let side = n_modes * n_channels;
        Array2::from_shape_fn((side, side), |(i, j)| {
            if i == j {
                1.0
            } else if i % n_modes == j % n_modes && i / n_modes != j / n_modes {
                k
            } else {
                0.0
            }
        })
    }

    #[test]
    fn construction_propagates_problem_errors() {
        let err = Solver::new(diagonal_tensor(5), 3, 2, Objective::Sum, 0).unwrap_err();
        assert!(matches!(err, SolverBuildError::Problem(_)));
    }

    #[test]
    fn construction_establishes_an_incumbent() {
        let solver = Solver::new(matched_mode_tensor(3, 2, 0.5), 3, 2, Objective::Sum, 1).unwrap();
        assert!(solver.best_solution().has_permutation());
        assert_eq!(solver.iteration(), 0);
        assert!(solver.record().is_empty());
        assert!(solver.steps().is_empty());
    }

    #[test]
    fn step_never_decreases_best_value() {
        let mut solver =
            Solver::new(matched_mode_tensor(4, 3, 0.3), 4, 3, Objective::Sum, 7).unwrap();
        let mut last = solver.best_value();
        for _ in 0..500 {
            solver.step();
            assert!(solver.best_value() >= last);
            last = solver.best_value();
        }
    }

    #[test]
    fn step_alone_does_not_touch_history() {
        let mut solver =
            Solver::new(matched_mode_tensor(3, 2, 0.5), 3, 2, Objective::Sum, 3).unwrap();
        for _ in 0..50 {
            solver.step();
        }
        assert_eq!(solver.iteration(), 0);
        assert!(solver.record().is_empty());
        assert!(solver.steps().is_empty());
    }

    #[test]
    fn solve_advances_iteration_and_keeps_history_consistent() {
        let mut solver =
            Solver::new(matched_mode_tensor(4, 3, 0.3), 4, 3, Objective::Sum, 11).unwrap();
        solver.solve(200);

        assert_eq!(solver.iteration(), 200);
        assert_eq!(solver.record().len(), solver.steps().len());

        for pair in solver.record().windows(2) {
            assert!(pair[0].iteration < pair[1].iteration);
            assert!(pair[0].value < pair[1].value);
        }
        if let Some(last) = solver.record().last() {
            assert_eq!(last.value, solver.best_value());
        }
    }

    #[test]
    fn solve_is_deterministic_for_a_seed() {
        let tensor = matched_mode_tensor(4, 3, 0.3);
        let mut a = Solver::new(tensor.clone(), 4, 3, Objective::Sum, 42).unwrap();
        let mut b = Solver::new(tensor, 4, 3, Objective::Sum, 42).unwrap();
        a.solve(300);
        b.solve(300);
        assert_eq!(a.best_value(), b.best_value());
        assert_eq!(a.record(), b.record());
        assert_eq!(
            a.best_solution().permuted_modes(),
            b.best_solution().permuted_modes()
        );
    }

    #[test]
    fn converges_to_the_aligned_maximum() {
        let (n_modes, n_channels, k) = (3, 2, 0.5);
        let mut solver = Solver::new(
            matched_mode_tensor(n_modes, n_channels, k),
            n_modes,
            n_channels,
            Objective::Sum,
            1234,
        )
        .unwrap();
        solver.solve(200);

        // Theoretical maximum: every slot aligned contributes 2k on top of
        // the diagonal, the offset cancels the diagonal exactly.
        let expected = k * (n_modes as f64) * 2.0;
        assert!(
            (solver.best_value() - expected).abs() < 1e-12,
            "best_value {} did not reach {}",
            solver.best_value(),
            expected
        );

        let permuted = solver.best_solution().permuted_modes().unwrap();
        assert_eq!(permuted.row(0), permuted.row(1), "channels are not aligned");
    }

    #[test]
    fn generate_matches_incumbent_shape() {
        let mut solver =
            Solver::new(matched_mode_tensor(3, 2, 0.5), 3, 2, Objective::Sum, 5).unwrap();
        solver.solve(50);
        let stack = solver.generate();
        assert_eq!(stack.dim(), (3, 2, 2));
    }

    #[test]
    fn solve_observed_reports_every_iteration() {
        #[derive(Default)]
        struct CountingObserver {
            started: u32,
            ended: u32,
            iterations: Vec<usize>,
            incumbents: u32,
        }

        impl SearchObserver for CountingObserver {
            fn on_search_start(&mut self) {
                self.started += 1;
            }
            fn on_search_end(&mut self) {
                self.ended += 1;
            }
            fn on_iteration(&mut self, iteration: usize, _accepted: bool) {
                self.iterations.push(iteration);
            }
            fn on_new_incumbent(&mut self, _iteration: usize, _value: f64) {
                self.incumbents += 1;
            }
        }

        let mut solver =
            Solver::new(matched_mode_tensor(3, 2, 0.5), 3, 2, Objective::Sum, 21).unwrap();
        let mut observer = CountingObserver::default();
        solver.solve_observed(100, &mut observer);

        assert_eq!(observer.started, 1);
        assert_eq!(observer.ended, 1);
        assert_eq!(observer.iterations, (0..100).collect::<Vec<_>>());
        assert_eq!(observer.incumbents as usize, solver.record().len());
    }

    #[test]
    fn improvement_serializes_to_json() {
        let improvement = Improvement {
            iteration: 17,
            value: 2.5,
        };
        let json = serde_json::to_string(&improvement).unwrap();
        assert_eq!(json, r#"{"iteration":17,"value":2.5}"#);
    }
}
