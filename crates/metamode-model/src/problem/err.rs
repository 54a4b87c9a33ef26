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

use crate::problem::objective::Objective;
use crate::solution::err::PermutationUnsetError;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UnknownObjectiveError {
    name: String,
}

impl UnknownObjectiveError {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Display for UnknownObjectiveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let valid: Vec<&str> = Objective::ALL.iter().map(|o| o.name()).collect();
        write!(
            f,
            "Objective '{}' not recognised. Choose from: {}",
            self.name,
            valid.join(", ")
        )
    }
}

impl std::error::Error for UnknownObjectiveError {}

/// The correlation tensor must be square with side `n_modes * n_channels`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CorrelationShapeError {
    expected: usize,
    rows: usize,
    cols: usize,
}

impl CorrelationShapeError {
    pub fn new(expected: usize, rows: usize, cols: usize) -> Self {
        Self {
            expected,
            rows,
            cols,
        }
    }

    pub fn expected(&self) -> usize {
        self.expected
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }
}

impl std::fmt::Display for CorrelationShapeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Correlation tensor has shape {}x{}, expected {}x{}",
            self.rows, self.cols, self.expected, self.expected
        )
    }
}

impl std::error::Error for CorrelationShapeError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EmptyProblemError {
    n_modes: usize,
    n_channels: usize,
}

impl EmptyProblemError {
    pub fn new(n_modes: usize, n_channels: usize) -> Self {
        Self {
            n_modes,
            n_channels,
        }
    }

    pub fn n_modes(&self) -> usize {
        self.n_modes
    }

    pub fn n_channels(&self) -> usize {
        self.n_channels
    }
}

impl std::fmt::Display for EmptyProblemError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Problem must have at least one mode and one channel, got {} modes and {} channels",
            self.n_modes, self.n_channels
        )
    }
}

impl std::error::Error for EmptyProblemError {}

/// A solution's dimensions disagree with the problem's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SolutionShapeError {
    expected_modes: usize,
    expected_channels: usize,
    actual_modes: usize,
    actual_channels: usize,
}

impl SolutionShapeError {
    pub fn new(
        expected_modes: usize,
        expected_channels: usize,
        actual_modes: usize,
        actual_channels: usize,
    ) -> Self {
        Self {
            expected_modes,
            expected_channels,
            actual_modes,
            actual_channels,
        }
    }

    pub fn expected_modes(&self) -> usize {
        self.expected_modes
    }

    pub fn expected_channels(&self) -> usize {
        self.expected_channels
    }

    pub fn actual_modes(&self) -> usize {
        self.actual_modes
    }

    pub fn actual_channels(&self) -> usize {
        self.actual_channels
    }
}

impl std::fmt::Display for SolutionShapeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Solution has {} modes and {} channels, problem expects {} modes and {} channels",
            self.actual_modes, self.actual_channels, self.expected_modes, self.expected_channels
        )
    }
}

impl std::error::Error for SolutionShapeError {}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ProblemError {
    UnknownObjective(UnknownObjectiveError),
    CorrelationShape(CorrelationShapeError),
    Empty(EmptyProblemError),
}

impl std::fmt::Display for ProblemError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProblemError::UnknownObjective(err) => write!(f, "{}", err),
            ProblemError::CorrelationShape(err) => write!(f, "{}", err),
            ProblemError::Empty(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for ProblemError {}

impl From<UnknownObjectiveError> for ProblemError {
    fn from(err: UnknownObjectiveError) -> Self {
        ProblemError::UnknownObjective(err)
    }
}

impl From<CorrelationShapeError> for ProblemError {
    fn from(err: CorrelationShapeError) -> Self {
        ProblemError::CorrelationShape(err)
    }
}

impl From<EmptyProblemError> for ProblemError {
    fn from(err: EmptyProblemError) -> Self {
        ProblemError::Empty(err)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EvaluateError {
    PermutationUnset(PermutationUnsetError),
    SolutionShape(SolutionShapeError),
}

impl std::fmt::Display for EvaluateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EvaluateError::PermutationUnset(err) => write!(f, "{}", err),
            EvaluateError::SolutionShape(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for EvaluateError {}

impl From<PermutationUnsetError> for EvaluateError {
    fn from(err: PermutationUnsetError) -> Self {
        EvaluateError::PermutationUnset(err)
    }
}

impl From<SolutionShapeError> for EvaluateError {
    fn from(err: SolutionShapeError) -> Self {
        EvaluateError::SolutionShape(err)
    }
}
