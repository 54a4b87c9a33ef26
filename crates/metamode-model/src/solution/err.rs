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

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChannelOutOfBoundsError {
    channel: usize,
    n_channels: usize,
}

impl ChannelOutOfBoundsError {
    pub fn new(channel: usize, n_channels: usize) -> Self {
        Self {
            channel,
            n_channels,
        }
    }

    pub fn channel(&self) -> usize {
        self.channel
    }

    pub fn n_channels(&self) -> usize {
        self.n_channels
    }
}

impl std::fmt::Display for ChannelOutOfBoundsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Channel {} is out of bounds for a solution with {} channels",
            self.channel, self.n_channels
        )
    }
}

impl std::error::Error for ChannelOutOfBoundsError {}

/// The solution has no working permutation yet; call `random_permutation`,
/// `permute_one_channel` or `step` first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PermutationUnsetError;

impl std::fmt::Display for PermutationUnsetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "No permutation has been generated for this solution")
    }
}

impl std::error::Error for PermutationUnsetError {}
