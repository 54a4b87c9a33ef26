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

use criterion::{Criterion, criterion_group, criterion_main};
use metamode_model::prelude::{Objective, Problem, Solution};
use metamode_solver::prelude::Solver;
use ndarray::Array2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::hint::black_box;

/// Symmetric tensor with unit diagonal and uniform off-diagonal noise.
fn noisy_tensor(n_modes: usize, n_channels: usize, seed: u64) -> Array2<f64> {
    let side = n_modes * n_channels;
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut tensor = Array2::zeros((side, side));
    for i in 0..side {
        tensor[[i, i]] = 1.0;
        for j in (i + 1)..side {
            let v = rng.random_range(-1.0..1.0);
            tensor[[i, j]] = v;
            tensor[[j, i]] = v;
        }
    }
    tensor
}

fn bench_evaluate(c: &mut Criterion) {
    let (n_modes, n_channels) = (16, 8);
    let problem = Problem::new(
        noisy_tensor(n_modes, n_channels, 0xBEEF),
        n_modes,
        n_channels,
        Objective::Sum,
    )
    .expect("problem ok");

    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let mut solution = Solution::new(n_modes, n_channels);
    solution.random_permutation(&mut rng);

    c.bench_function("evaluate/16x8", |b| {
        b.iter(|| black_box(problem.evaluate(black_box(&solution)).expect("evaluates")))
    });
}

fn bench_solve(c: &mut Criterion) {
    let (n_modes, n_channels) = (8, 4);
    let tensor = noisy_tensor(n_modes, n_channels, 0xF00D);

    c.bench_function("solve/8x4/500-steps", |b| {
        b.iter(|| {
            let mut solver = Solver::new(
                black_box(tensor.clone()),
                n_modes,
                n_channels,
                Objective::Sum,
                7,
            )
            .expect("solver ok");
            solver.solve(500);
            black_box(solver.best_value())
        })
    });
}

criterion_group!(benches, bench_evaluate, bench_solve);
criterion_main!(benches);
