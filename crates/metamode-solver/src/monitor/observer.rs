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

use std::fmt;

/// Observer for high-level search lifecycle events.
/// All methods have default no-op implementations.
pub trait SearchObserver {
    /// A short identifier for logging and diagnostics.
    fn name(&self) -> &str {
        "SearchObserver"
    }

    fn on_search_start(&mut self) {}
    fn on_search_end(&mut self) {}

    /// Called once per iteration of `solve`, after the step ran.
    fn on_iteration(&mut self, _iteration: usize, _accepted: bool) {}

    /// Called when a candidate replaced the incumbent.
    fn on_new_incumbent(&mut self, _iteration: usize, _value: f64) {}
}

/// A no-op observer useful as default.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl SearchObserver for NullObserver {
    fn name(&self) -> &str {
        "NullObserver"
    }
}

/// An observer that forwards events to a list of boxed observers.
/// Useful to combine independent observers.
#[derive(Default)]
pub struct CompositeSearchObserver {
    observers: Vec<Box<dyn SearchObserver>>,
}

impl CompositeSearchObserver {
    #[inline]
    pub fn new() -> Self {
        Self {
            observers: Vec::new(),
        }
    }

    /// Chain-builder: add an observer and return self.
    #[inline]
    pub fn with<O: SearchObserver + 'static>(mut self, o: O) -> Self {
        self.observers.push(Box::new(o));
        self
    }

    /// Push an observer into the composite.
    #[inline]
    pub fn push<O: SearchObserver + 'static>(&mut self, o: O) {
        self.observers.push(Box::new(o));
    }

    /// Returns the number of inner observers.
    #[inline]
    pub fn len(&self) -> usize {
        self.observers.len()
    }

    /// Returns true when there are no inner observers.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl SearchObserver for CompositeSearchObserver {
    fn name(&self) -> &str {
        "CompositeSearchObserver"
    }

    fn on_search_start(&mut self) {
        for o in &mut self.observers {
            o.on_search_start();
        }
    }
    fn on_search_end(&mut self) {
        for o in &mut self.observers {
            o.on_search_end();
        }
    }
    fn on_iteration(&mut self, iteration: usize, accepted: bool) {
        for o in &mut self.observers {
            o.on_iteration(iteration, accepted);
        }
    }
    fn on_new_incumbent(&mut self, iteration: usize, value: f64) {
        for o in &mut self.observers {
            o.on_new_incumbent(iteration, value);
        }
    }
}

impl fmt::Debug for CompositeSearchObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeSearchObserver")
            .field("len", &self.observers.len())
            .finish()
    }
}

/// Logs incumbents as they are found and a heartbeat line every `every`
/// iterations, via `tracing`.
#[derive(Debug, Clone)]
pub struct ProgressLogObserver {
    every: usize,
    accepted: usize,
}

impl ProgressLogObserver {
    pub fn new(every: usize) -> Self {
        Self {
            every: every.max(1),
            accepted: 0,
        }
    }

    #[inline]
    pub fn every(&self) -> usize {
        self.every
    }
}

impl Default for ProgressLogObserver {
    fn default() -> Self {
        Self::new(1000)
    }
}

impl SearchObserver for ProgressLogObserver {
    fn name(&self) -> &str {
        "ProgressLogObserver"
    }

    fn on_search_start(&mut self) {
        self.accepted = 0;
        tracing::info!("search started");
    }

    fn on_search_end(&mut self) {
        tracing::info!(improvements = self.accepted, "search finished");
    }

    fn on_iteration(&mut self, iteration: usize, _accepted: bool) {
        if iteration % self.every == 0 {
            tracing::info!(iteration, improvements = self.accepted, "progress");
        }
    }

    fn on_new_incumbent(&mut self, iteration: usize, value: f64) {
        self.accepted += 1;
        tracing::info!(iteration, value, "improved incumbent");
    }
}

/// Implement pretty printing for trait objects with any lifetime.
/// This avoids requiring concrete types at call sites for logging/diagnostics.
impl<'a> fmt::Debug for dyn SearchObserver + 'a {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SearchObserver({})", self.name())
    }
}

impl<'a> fmt::Display for dyn SearchObserver + 'a {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SearchObserver({})", self.name())
    }
}
