//! Mock Sequences
//!
//! A [`MockSequence`] orders setups across methods and mocks. Only the setup
//! the cursor points at can answer a call; each answer advances the cursor.
//!
//! ```rust,ignore
//! let seq = MockSequence::cyclic();
//! mock.in_sequence(&seq).setup("next").returns(1);
//! mock.in_sequence(&seq).setup("next").returns(2);
//! // next() -> 1, 2, 1, 2, ...
//! ```

use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Default)]
struct SequenceState {
    cursor: usize,
    /// One flag per registered step; `true` once its setup was removed
    retired: Vec<bool>,
    cyclic: bool,
}

impl SequenceState {
    fn steps(&self) -> usize {
        self.retired.len()
    }

    fn live(&self) -> usize {
        self.retired.iter().filter(|r| !**r).count()
    }

    /// Move the cursor off retired steps, wrapping if cyclic
    fn settle(&mut self) {
        for _ in 0..=self.steps() {
            if self.cursor >= self.steps() {
                if self.cyclic && self.live() > 0 {
                    self.cursor = 0;
                } else {
                    return;
                }
            }
            if !self.retired[self.cursor] {
                return;
            }
            self.cursor += 1;
        }
    }
}

/// Ordering constraint across setups, optionally cyclic.
///
/// Cloning yields another handle to the same cursor.
#[derive(Debug, Clone, Default)]
pub struct MockSequence {
    state: Rc<RefCell<SequenceState>>,
}

impl MockSequence {
    /// Non-cyclic sequence: exhausted after the last step
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cyclic sequence: wraps to the first step after the last
    #[must_use]
    pub fn cyclic() -> Self {
        Self::new().with_cyclic(true)
    }

    /// Set whether the sequence wraps
    #[must_use]
    pub fn with_cyclic(self, cyclic: bool) -> Self {
        self.state.borrow_mut().cyclic = cyclic;
        self
    }

    /// Whether the sequence wraps
    #[must_use]
    pub fn is_cyclic(&self) -> bool {
        self.state.borrow().cyclic
    }

    /// Number of live steps (registered and not removed by `Mock::reset`)
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.borrow().live()
    }

    /// True if no setup joined the sequence yet
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Index of the step that answers the next call
    #[must_use]
    pub fn position(&self) -> usize {
        self.state.borrow().cursor
    }

    /// True once a non-cyclic sequence consumed every step
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        let state = self.state.borrow();
        !state.cyclic && state.cursor >= state.steps()
    }

    /// Move the cursor back to the first live step
    pub fn rewind(&self) {
        let mut state = self.state.borrow_mut();
        state.cursor = 0;
        state.settle();
    }

    pub(crate) fn register_step(&self) -> usize {
        let mut state = self.state.borrow_mut();
        let step = state.steps();
        state.retired.push(false);
        state.settle();
        step
    }

    /// Drop a step whose setup no longer exists; the cursor skips it
    pub(crate) fn retire_step(&self, step: usize) {
        let mut state = self.state.borrow_mut();
        if let Some(flag) = state.retired.get_mut(step) {
            *flag = true;
        }
        state.settle();
    }

    pub(crate) fn same_as(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }

    pub(crate) fn is_current(&self, step: usize) -> bool {
        self.state.borrow().cursor == step
    }

    pub(crate) fn advance(&self) {
        let mut state = self.state.borrow_mut();
        state.cursor += 1;
        state.settle();
    }
}
