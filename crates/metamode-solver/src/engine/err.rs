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

use metamode_model::prelude::{EvaluateError, ProblemError};

#[derive(Debug, Clone, PartialEq)]
pub enum SolverBuildError {
    Problem(ProblemError),
    Evaluate(EvaluateError),
}

impl std::fmt::Display for SolverBuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolverBuildError::Problem(err) => write!(f, "{}", err),
            SolverBuildError::Evaluate(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for SolverBuildError {}

impl From<ProblemError> for SolverBuildError {
    fn from(err: ProblemError) -> Self {
        SolverBuildError::Problem(err)
    }
}

impl From<EvaluateError> for SolverBuildError {
    fn from(err: EvaluateError) -> Self {
        SolverBuildError::Evaluate(err)
    }
}
