//! Mock Objects and Dispatch
//!
//! A [`Mock`] holds the setups configured for one mocked object and answers
//! invocations with them.
//!
//! ## Resolution
//!
//! On each invocation the setups for the method are evaluated in declaration
//! order. The first one that is not exhausted, whose sequence (if any) points
//! at it, and whose matchers accept the arguments answers the call. With no
//! such setup a [`MockBehavior::Strict`] mock fails with
//! [`MockError::UnconfiguredInvocation`]; a [`MockBehavior::Loose`] mock
//! returns `Default::default()`.
//!
//! ## Example
//!
//! ```rust,ignore
//! let mock = Mock::named("Target", MockBehavior::Strict);
//! mock.setup("parameterized_method")
//!     .with(It::in_range(1, 5, RangeKind::Inclusive))
//!     .returns(1);
//!
//! let hit: i32 = mock.invoke("parameterized_method", (3,))?;
//! assert_eq!(hit, 1);
//! assert!(mock.invoke::<_, i32>("parameterized_method", (11,)).is_err());
//! ```

use crate::config::MockConfig;
use crate::invocation::Invocation;
use crate::matcher::{ArgMatchers, ErasedMatcher};
use crate::result::{MockError, MockResult};
use crate::sequence::MockSequence;
use crate::setup::{
    CallSite, Plan, Response, Selected, SequenceSetupHandle, SetupEntry, SetupHandle, SetupId,
};
use crate::verify::{self, Times, VerifyScope};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt::{self, Debug};
use std::rc::Rc;
use tracing::{debug, trace, warn};

/// What a mock does with a call no setup matches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MockBehavior {
    /// Fail with [`MockError::UnconfiguredInvocation`]
    Strict,
    /// Return `Default::default()`
    #[default]
    Loose,
}

impl fmt::Display for MockBehavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Strict => write!(f, "strict"),
            Self::Loose => write!(f, "loose"),
        }
    }
}

/// Registry and invocation log of one mock
pub(crate) struct MockState {
    pub(crate) name: String,
    pub(crate) behavior: MockBehavior,
    pub(crate) setups: Vec<SetupEntry>,
    pub(crate) invocations: VecDeque<Invocation>,
    max_recorded: usize,
    next_id: usize,
}

impl MockState {
    fn new(name: String, config: &MockConfig) -> Self {
        Self {
            name,
            behavior: config.behavior,
            setups: Vec::new(),
            invocations: VecDeque::new(),
            max_recorded: config.max_recorded_invocations,
            next_id: 0,
        }
    }

    fn register(&mut self, method: &str, plan: Plan) -> &mut SetupEntry {
        let id = SetupId(self.next_id);
        self.next_id += 1;
        debug!(mock = %self.name, method, setup = %id, "registered setup");
        self.setups.push(SetupEntry::new(id, method, plan));
        let last = self.setups.len() - 1;
        &mut self.setups[last]
    }

    pub(crate) fn setup(&self, id: SetupId) -> Option<&SetupEntry> {
        self.setups.iter().find(|s| s.id == id)
    }

    pub(crate) fn setup_mut(&mut self, id: SetupId) -> Option<&mut SetupEntry> {
        self.setups.iter_mut().find(|s| s.id == id)
    }

    fn select(&mut self, method: &str, args: &dyn Any) -> Option<Selected> {
        let mut chosen = None;
        for (idx, setup) in self.setups.iter().enumerate() {
            match setup.accepts(method, args) {
                Some(true) => {
                    chosen = Some(idx);
                    break;
                }
                Some(false) => {}
                None => warn!(
                    mock = %self.name,
                    method,
                    setup = %setup.id,
                    declared = setup.matcher.description(),
                    "argument types differ from the setup's matchers; skipping"
                ),
            }
        }
        chosen.map(|idx| self.setups[idx].consume())
    }

    /// Distinct sequences the setups take part in
    fn sequences(&self) -> Vec<MockSequence> {
        let mut found: Vec<MockSequence> = Vec::new();
        for (sequence, _) in self.setups.iter().filter_map(|s| s.sequence.as_ref()) {
            if !found.iter().any(|f| f.same_as(sequence)) {
                found.push(sequence.clone());
            }
        }
        found
    }

    fn record(&mut self, invocation: Invocation) {
        if self.max_recorded == 0 {
            return;
        }
        while self.invocations.len() >= self.max_recorded {
            self.invocations.pop_front();
        }
        self.invocations.push_back(invocation);
    }
}

/// A mocked object: its setups, behavior mode and invocation log.
///
/// Cloning yields another handle to the same mock.
#[derive(Clone)]
pub struct Mock {
    state: Rc<RefCell<MockState>>,
}

impl Debug for Mock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("Mock")
            .field("name", &state.name)
            .field("behavior", &state.behavior)
            .field("setups", &state.setups.len())
            .field("invocations", &state.invocations.len())
            .finish()
    }
}

impl Default for Mock {
    fn default() -> Self {
        Self::new(MockBehavior::default())
    }
}

impl Mock {
    /// Create an anonymous mock
    #[must_use]
    pub fn new(behavior: MockBehavior) -> Self {
        Self::named("mock", behavior)
    }

    /// Create a mock whose name appears in error messages
    #[must_use]
    pub fn named(name: impl Into<String>, behavior: MockBehavior) -> Self {
        Self::with_config(name, &MockConfig::new().with_behavior(behavior))
    }

    /// Create a mock from a configuration
    #[must_use]
    pub fn with_config(name: impl Into<String>, config: &MockConfig) -> Self {
        Self {
            state: Rc::new(RefCell::new(MockState::new(name.into(), config))),
        }
    }

    /// Mock name
    #[must_use]
    pub fn name(&self) -> String {
        self.state.borrow().name.clone()
    }

    /// Behavior for unmatched calls
    #[must_use]
    pub fn behavior(&self) -> MockBehavior {
        self.state.borrow().behavior
    }

    /// Register a setup for `method`.
    ///
    /// The setup is live immediately: without further configuration it
    /// accepts any arguments and answers with the default value.
    pub fn setup(&self, method: &str) -> SetupHandle<()> {
        let id = self
            .state
            .borrow_mut()
            .register(method, Plan::Single(Response::Default))
            .id;
        SetupHandle::new(Rc::clone(&self.state), id)
    }

    /// Register a setup answering successive calls with successive responses
    pub fn setup_sequence(&self, method: &str) -> SequenceSetupHandle<()> {
        let id = self
            .state
            .borrow_mut()
            .register(
                method,
                Plan::Steps {
                    responses: Vec::new(),
                    next: 0,
                },
            )
            .id;
        SequenceSetupHandle::new(Rc::clone(&self.state), id)
    }

    /// Register setups as the next steps of `sequence`
    #[must_use]
    pub fn in_sequence<'a>(&'a self, sequence: &MockSequence) -> InSequence<'a> {
        InSequence {
            mock: self,
            sequence: sequence.clone(),
        }
    }

    /// Dispatch a call.
    ///
    /// `args` is the argument tuple (`()` for none, `(x,)` for one).
    ///
    /// # Errors
    ///
    /// - [`MockError::UnconfiguredInvocation`] for a strict mock with no
    ///   matching setup
    /// - [`MockError::Raised`] when the matching setup was configured with
    ///   `fails_with`
    /// - [`MockError::ReturnTypeMismatch`] / [`MockError::ArgumentTypeMismatch`]
    ///   when the setup was configured for other types
    pub fn invoke<A, R>(&self, method: &str, args: A) -> MockResult<R>
    where
        A: Debug + 'static,
        R: Default + 'static,
    {
        let arguments = format!("{args:?}");
        let args: Rc<dyn Any> = Rc::new(args);

        let (selected, name, behavior) = {
            let mut state = self.state.borrow_mut();
            let selected = state.select(method, &*args);
            let invocation = Invocation::new(
                method,
                arguments.clone(),
                Rc::clone(&args),
                selected.as_ref().map(|s| s.setup),
            );
            state.record(invocation);
            (selected, state.name.clone(), state.behavior)
        };

        let site = CallSite {
            mock: &name,
            method,
        };
        match selected {
            Some(selected) => {
                trace!(mock = %name, method, setup = %selected.setup, %arguments, "dispatching");
                let outcome = selected
                    .callbacks
                    .iter()
                    .try_for_each(|callback| callback.run(&site, &*args))
                    .and_then(|()| selected.response.produce(&site, &*args));
                // Type mismatches are misuse, not answers
                if !outcome.as_ref().is_err_and(MockError::is_type_mismatch) {
                    if let Some(setup) = self.state.borrow_mut().setup_mut(selected.setup) {
                        setup.record_answer();
                    }
                }
                outcome
            }
            None => match behavior {
                MockBehavior::Strict => {
                    warn!(mock = %name, method, %arguments, "unconfigured invocation on strict mock");
                    Err(MockError::UnconfiguredInvocation {
                        mock: name,
                        method: method.to_string(),
                        arguments,
                    })
                }
                MockBehavior::Loose => {
                    debug!(mock = %name, method, %arguments, "no setup matched; returning default");
                    Ok(R::default())
                }
            },
        }
    }

    /// Check that every setup marked verifiable answered at least one call.
    ///
    /// Setups registered through a sequence are exempt.
    ///
    /// # Errors
    ///
    /// [`MockError::VerificationFailed`] listing each unmet setup.
    pub fn verify(&self) -> MockResult<()> {
        self.verify_scope(VerifyScope::Verifiable)
    }

    /// Check that every setup answered at least one call, verifiable or not.
    ///
    /// Setups registered through a sequence are exempt.
    ///
    /// # Errors
    ///
    /// [`MockError::VerificationFailed`] listing each unmet setup.
    pub fn verify_all(&self) -> MockResult<()> {
        self.verify_scope(VerifyScope::All)
    }

    fn verify_scope(&self, scope: VerifyScope) -> MockResult<()> {
        let state = self.state.borrow();
        verify::into_result(&state.name, verify::unmet_setups(&state.setups, scope))
    }

    /// Check how often `method` was called with arguments `matchers` accept
    ///
    /// # Errors
    ///
    /// [`MockError::VerificationFailed`] when the count violates `times`.
    pub fn verify_call<M: ArgMatchers>(
        &self,
        method: &str,
        matchers: M,
        times: Times,
    ) -> MockResult<()> {
        self.verify_count(method, &ErasedMatcher::from_matchers(matchers), times)
    }

    /// Check how often `method` was called, whatever the arguments
    ///
    /// # Errors
    ///
    /// [`MockError::VerificationFailed`] when the count violates `times`.
    pub fn verify_called(&self, method: &str, times: Times) -> MockResult<()> {
        self.verify_count(method, &ErasedMatcher::any(), times)
    }

    fn verify_count(&self, method: &str, matcher: &ErasedMatcher, times: Times) -> MockResult<()> {
        let state = self.state.borrow();
        let count = state
            .invocations
            .iter()
            .filter(|i| i.method() == method && matcher.accepts(i.erased_args()) == Some(true))
            .count();
        let failure = verify::check_count(method, matcher, times, count);
        verify::into_result(&state.name, failure.into_iter().collect())
    }

    /// Every recorded call, oldest first
    #[must_use]
    pub fn invocations(&self) -> Vec<Invocation> {
        self.state.borrow().invocations.iter().cloned().collect()
    }

    /// Recorded calls of `method`
    #[must_use]
    pub fn invocation_count(&self, method: &str) -> usize {
        self.state
            .borrow()
            .invocations
            .iter()
            .filter(|i| i.method() == method)
            .count()
    }

    /// Number of registered setups
    #[must_use]
    pub fn setup_count(&self) -> usize {
        self.state.borrow().setups.len()
    }

    /// Clear the invocation log and every setup's counters.
    ///
    /// `setup_sequence` setups start over, and every [`MockSequence`] the
    /// setups take part in is rewound. A sequence shared with other mocks is
    /// rewound for them too.
    pub fn reset_invocations(&self) {
        let sequences = {
            let mut state = self.state.borrow_mut();
            state.invocations.clear();
            for setup in &mut state.setups {
                setup.reset_counters();
            }
            state.sequences()
        };
        for sequence in &sequences {
            sequence.rewind();
        }
    }

    /// Remove every setup and clear the invocation log.
    ///
    /// Steps the removed setups held in a [`MockSequence`] are retired, and
    /// the sequence is rewound, so steps registered later can answer.
    pub fn reset(&self) {
        let (steps, sequences) = {
            let mut state = self.state.borrow_mut();
            let sequences = state.sequences();
            let steps: Vec<(MockSequence, usize)> = state
                .setups
                .drain(..)
                .filter_map(|s| s.sequence)
                .collect();
            state.invocations.clear();
            (steps, sequences)
        };
        for (sequence, step) in &steps {
            sequence.retire_step(*step);
        }
        for sequence in &sequences {
            sequence.rewind();
        }
    }
}

/// Registers setups as steps of a [`MockSequence`]
#[derive(Debug)]
pub struct InSequence<'a> {
    mock: &'a Mock,
    sequence: MockSequence,
}

impl InSequence<'_> {
    /// Register a setup for `method` as the next step of the sequence
    pub fn setup(&self, method: &str) -> SetupHandle<()> {
        let step = self.sequence.register_step();
        let id = {
            let mut state = self.mock.state.borrow_mut();
            let entry = state.register(method, Plan::Single(Response::Default));
            entry.sequence = Some((self.sequence.clone(), step));
            entry.id
        };
        SetupHandle::new(Rc::clone(&self.mock.state), id)
    }
}

/// A generated mock type wrapping a [`Mock`].
///
/// Implemented by `#[mockable]` for the `Mock<Trait>` types it generates.
pub trait Mockable: Sized {
    /// Name of the mocked trait
    const TARGET: &'static str;

    /// Wrap an existing mock
    fn from_mock(mock: Mock) -> Self;

    /// The wrapped mock
    fn mock(&self) -> &Mock;
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::matcher::{It, Matcher, RangeKind};
    use std::cell::Cell;

    fn strict() -> Mock {
        Mock::named("Target", MockBehavior::Strict)
    }

    mod dispatch_tests {
        use super::*;

        #[test]
        fn test_returns_configured_value() {
            let mock = strict();
            mock.setup("nonvoid_return_method").returns(1);
            let value: i32 = mock.invoke("nonvoid_return_method", ()).unwrap();
            assert_eq!(value, 1);
        }

        #[test]
        fn test_setup_without_value_returns_default() {
            let mock = strict();
            mock.setup("void_return_method");
            mock.invoke::<_, ()>("void_return_method", ()).unwrap();
            let n: u64 = mock.invoke("void_return_method", ()).unwrap();
            assert_eq!(n, 0);
        }

        #[test]
        fn test_first_matching_setup_wins() {
            let mock = strict();
            mock.setup("parameterized_method")
                .with(It::in_range(1, 5, RangeKind::Inclusive))
                .returns(1);
            mock.setup("parameterized_method")
                .with(It::in_range(6, 10, RangeKind::Inclusive))
                .returns(2);
            mock.setup("parameterized_method")
                .with(It::any::<i32>())
                .returns(3);

            assert_eq!(mock.invoke::<_, i32>("parameterized_method", (1,)).unwrap(), 1);
            assert_eq!(mock.invoke::<_, i32>("parameterized_method", (6,)).unwrap(), 2);
            assert_eq!(mock.invoke::<_, i32>("parameterized_method", (11,)).unwrap(), 3);
        }

        #[test]
        fn test_other_method_is_not_matched() {
            let mock = strict();
            mock.setup("a").returns(1);
            let err = mock.invoke::<_, i32>("b", ()).unwrap_err();
            assert!(err.is_unconfigured());
        }

        #[test]
        fn test_times_consumes_setup() {
            let mock = strict();
            mock.setup("next").returns(1).times(2);
            mock.setup("next").returns(9);
            let got: Vec<i32> = (0..3).map(|_| mock.invoke("next", ()).unwrap()).collect();
            assert_eq!(got, vec![1, 1, 9]);
        }

        #[test]
        fn test_returns_with_arguments() {
            let mock = strict();
            mock.setup("add")
                .with((It::any::<i32>(), It::any::<i32>()))
                .returns_with(|(a, b): &(i32, i32)| a + b);
            assert_eq!(mock.invoke::<_, i32>("add", (2, 40)).unwrap(), 42);
        }

        #[test]
        fn test_custom_matcher() {
            let is_greater = |bound: i32| Matcher::new(format!("> {bound}"), move |v: &i32| *v > bound);
            let mock = strict();
            mock.setup("parameterized_method")
                .with(is_greater(5))
                .returns(2);
            assert_eq!(mock.invoke::<_, i32>("parameterized_method", (6,)).unwrap(), 2);
            assert!(mock.invoke::<_, i32>("parameterized_method", (5,)).is_err());
        }

        #[test]
        fn test_fails_with() {
            let mock = strict();
            mock.setup("save").fails_with("disk full");
            let err = mock.invoke::<_, ()>("save", ()).unwrap_err();
            assert!(matches!(err, MockError::Raised { ref message, .. } if message == "disk full"));
        }

        #[test]
        fn test_return_type_mismatch() {
            let mock = strict();
            mock.setup("count").returns("three");
            let err = mock.invoke::<_, i32>("count", ()).unwrap_err();
            assert!(matches!(err, MockError::ReturnTypeMismatch { .. }));
        }

        #[test]
        fn test_argument_type_mismatch_skips_setup() {
            let mock = strict();
            mock.setup("f").with(It::any::<u8>()).returns(1);
            let err = mock.invoke::<_, i32>("f", (1_i64,)).unwrap_err();
            assert!(err.is_unconfigured());
        }
    }

    mod behavior_tests {
        use super::*;

        #[test]
        fn test_strict_unconfigured_fails() {
            let mock = strict();
            let err = mock.invoke::<_, ()>("void_return_method", ()).unwrap_err();
            assert_eq!(
                err.to_string(),
                "Target.void_return_method() was invoked but no setup matched (strict mode)"
            );
        }

        #[test]
        fn test_loose_returns_default() {
            let mock = Mock::new(MockBehavior::Loose);
            let value: i32 = mock.invoke("nonvoid_return_method", ()).unwrap();
            assert_eq!(value, 0);
            let text: String = mock.invoke("name", (1,)).unwrap();
            assert!(text.is_empty());
        }

        #[test]
        fn test_default_behavior_is_loose() {
            assert_eq!(Mock::default().behavior(), MockBehavior::Loose);
            assert_eq!(MockBehavior::Strict.to_string(), "strict");
        }
    }

    mod callback_tests {
        use super::*;

        #[test]
        fn test_callback_runs() {
            let called = Rc::new(Cell::new(false));
            let flag = Rc::clone(&called);
            let mock = strict();
            mock.setup("void_return_method")
                .callback(move || flag.set(true));
            mock.invoke::<_, ()>("void_return_method", ()).unwrap();
            assert!(called.get());
        }

        #[test]
        fn test_callback_with_arguments() {
            let seen = Rc::new(RefCell::new(Vec::new()));
            let sink = Rc::clone(&seen);
            let mock = strict();
            mock.setup("push")
                .with(It::any::<i32>())
                .callback_with(move |(v,): &(i32,)| sink.borrow_mut().push(*v));
            mock.invoke::<_, ()>("push", (1,)).unwrap();
            mock.invoke::<_, ()>("push", (2,)).unwrap();
            assert_eq!(*seen.borrow(), vec![1, 2]);
        }

        #[test]
        fn test_callback_may_reenter_mock() {
            let mock = strict();
            mock.setup("inner").returns(5);
            let handle = mock.clone();
            mock.setup("outer").callback(move || {
                let _: i32 = handle.invoke("inner", ()).unwrap();
            });
            mock.invoke::<_, ()>("outer", ()).unwrap();
            assert_eq!(mock.invocation_count("inner"), 1);
        }

        #[test]
        fn test_callback_argument_mismatch() {
            let mock = strict();
            let handle = mock.setup("f").callback_with(|_: &()| {});
            let err = mock.invoke::<_, ()>("f", (1,)).unwrap_err();
            assert!(matches!(err, MockError::ArgumentTypeMismatch { .. }));
            assert_eq!(handle.invocation_count(), 0);
            assert!(mock.verify_all().is_err());
        }

        #[test]
        fn test_return_type_mismatch_is_not_counted() {
            let mock = strict();
            let handle = mock.setup("count").returns("three");
            assert!(mock.invoke::<_, i32>("count", ()).is_err());
            assert_eq!(handle.invocation_count(), 0);
        }

        #[test]
        fn test_configured_failure_is_counted() {
            let mock = strict();
            let handle = mock.setup("save").fails_with("disk full").verifiable();
            assert!(mock.invoke::<_, ()>("save", ()).is_err());
            assert_eq!(handle.invocation_count(), 1);
            mock.verify().unwrap();
        }
    }

    mod sequence_tests {
        use super::*;

        #[test]
        fn test_setup_sequence() {
            let mock = strict();
            mock.setup_sequence("next").returns(1).returns(2).returns(3);
            let got: Vec<i32> = (0..3).map(|_| mock.invoke("next", ()).unwrap()).collect();
            assert_eq!(got, vec![1, 2, 3]);
            assert!(mock.invoke::<_, i32>("next", ()).unwrap_err().is_unconfigured());
        }

        #[test]
        fn test_setup_sequence_steps() {
            let mock = Mock::new(MockBehavior::Loose);
            let handle = mock
                .setup_sequence("read")
                .returns(7_u8)
                .fails_with("eof")
                .pass();
            assert_eq!(handle.remaining(), 3);
            assert_eq!(mock.invoke::<_, u8>("read", ()).unwrap(), 7);
            assert!(mock.invoke::<_, u8>("read", ()).is_err());
            assert_eq!(mock.invoke::<_, u8>("read", ()).unwrap(), 0);
            assert_eq!(handle.remaining(), 0);
        }

        #[test]
        fn test_cyclic_mock_sequence() {
            let mock = strict();
            let seq = MockSequence::cyclic();
            mock.in_sequence(&seq).setup("nonvoid_return_method").returns(1);
            mock.in_sequence(&seq).setup("nonvoid_return_method").returns(2);
            let got: Vec<i32> = (0..3)
                .map(|_| mock.invoke("nonvoid_return_method", ()).unwrap())
                .collect();
            assert_eq!(got, vec![1, 2, 1]);
        }

        #[test]
        fn test_loose_non_cyclic_sequence_falls_back_to_default() {
            let mock = Mock::new(MockBehavior::Loose);
            let seq = MockSequence::new();
            mock.in_sequence(&seq).setup("next").returns(1);
            mock.in_sequence(&seq).setup("next").returns(2);
            let got: Vec<i32> = (0..3).map(|_| mock.invoke("next", ()).unwrap()).collect();
            assert_eq!(got, vec![1, 2, 0]);
        }

        #[test]
        fn test_non_cyclic_sequence_falls_through() {
            let mock = strict();
            let seq = MockSequence::new();
            mock.in_sequence(&seq).setup("next").returns(1);
            mock.in_sequence(&seq).setup("next").returns(2);
            assert_eq!(mock.invoke::<_, i32>("next", ()).unwrap(), 1);
            assert_eq!(mock.invoke::<_, i32>("next", ()).unwrap(), 2);
            assert!(mock.invoke::<_, i32>("next", ()).unwrap_err().is_unconfigured());

            // A plain setup declared later catches what the sequence no longer does
            mock.setup("next").returns(99);
            assert_eq!(mock.invoke::<_, i32>("next", ()).unwrap(), 99);
        }

        #[test]
        fn test_sequence_across_methods_enforces_order() {
            let mock = strict();
            let seq = MockSequence::new();
            mock.in_sequence(&seq).setup("open");
            mock.in_sequence(&seq).setup("close");
            assert!(mock.invoke::<_, ()>("close", ()).is_err());
            mock.invoke::<_, ()>("open", ()).unwrap();
            mock.invoke::<_, ()>("close", ()).unwrap();
        }

        #[test]
        fn test_sequence_across_mocks() {
            let first = Mock::named("First", MockBehavior::Strict);
            let second = Mock::named("Second", MockBehavior::Strict);
            let seq = MockSequence::new();
            first.in_sequence(&seq).setup("step").returns(1);
            second.in_sequence(&seq).setup("step").returns(2);
            assert!(second.invoke::<_, i32>("step", ()).is_err());
            assert_eq!(first.invoke::<_, i32>("step", ()).unwrap(), 1);
            assert_eq!(second.invoke::<_, i32>("step", ()).unwrap(), 2);
        }
    }

    mod log_tests {
        use super::*;

        #[test]
        fn test_invocations_recorded_in_order() {
            let mock = Mock::new(MockBehavior::Loose);
            let id = mock.setup("a").id();
            mock.invoke::<_, ()>("a", ()).unwrap();
            mock.invoke::<_, ()>("b", (1, "x")).unwrap();

            let log = mock.invocations();
            assert_eq!(log.len(), 2);
            assert_eq!(log[0].method(), "a");
            assert_eq!(log[0].matched_setup(), Some(id));
            assert_eq!(log[1].arguments(), "(1, \"x\")");
            assert!(!log[1].was_matched());
            assert_eq!(log[1].args::<(i32, &str)>(), Some(&(1, "x")));
        }

        #[test]
        fn test_log_cap_drops_oldest() {
            let config = MockConfig::new().with_max_recorded_invocations(2);
            let mock = Mock::with_config("Capped", &config);
            for i in 0..5 {
                mock.invoke::<_, ()>("f", (i,)).unwrap();
            }
            let log = mock.invocations();
            assert_eq!(log.len(), 2);
            assert_eq!(log[0].args::<(i32,)>(), Some(&(3,)));
        }

        #[test]
        fn test_reset_invocations_keeps_setups() {
            let mock = strict();
            let handle = mock.setup("f").returns(1);
            mock.invoke::<_, i32>("f", ()).unwrap();
            assert_eq!(handle.invocation_count(), 1);
            mock.reset_invocations();
            assert_eq!(handle.invocation_count(), 0);
            assert!(mock.invocations().is_empty());
            assert_eq!(mock.setup_count(), 1);
        }

        #[test]
        fn test_reset_invocations_restarts_both_sequence_kinds() {
            let mock = strict();
            let seq = MockSequence::new();
            mock.in_sequence(&seq).setup("next").returns(1);
            mock.in_sequence(&seq).setup("next").returns(2);
            mock.setup_sequence("other").returns(7);
            assert_eq!(mock.invoke::<_, i32>("next", ()).unwrap(), 1);
            assert_eq!(mock.invoke::<_, i32>("next", ()).unwrap(), 2);
            assert_eq!(mock.invoke::<_, i32>("other", ()).unwrap(), 7);
            assert!(mock.invoke::<_, i32>("next", ()).is_err());
            assert!(mock.invoke::<_, i32>("other", ()).is_err());

            mock.reset_invocations();

            assert_eq!(seq.position(), 0);
            assert_eq!(mock.invoke::<_, i32>("next", ()).unwrap(), 1);
            assert_eq!(mock.invoke::<_, i32>("next", ()).unwrap(), 2);
            assert_eq!(mock.invoke::<_, i32>("other", ()).unwrap(), 7);
        }

        #[test]
        fn test_reset_retires_sequence_steps() {
            let mock = strict();
            let seq = MockSequence::new();
            mock.in_sequence(&seq).setup("next").returns(1);
            mock.reset();
            assert!(seq.is_empty());

            mock.in_sequence(&seq).setup("next").returns(5);
            assert_eq!(mock.invoke::<_, i32>("next", ()).unwrap(), 5);
        }

        #[test]
        fn test_reset_keeps_steps_of_other_mocks() {
            let first = Mock::named("First", MockBehavior::Strict);
            let second = Mock::named("Second", MockBehavior::Strict);
            let seq = MockSequence::new();
            first.in_sequence(&seq).setup("step").returns(1);
            second.in_sequence(&seq).setup("step").returns(2);
            first.in_sequence(&seq).setup("step").returns(3);

            first.reset();

            assert_eq!(seq.len(), 1);
            assert_eq!(second.invoke::<_, i32>("step", ()).unwrap(), 2);
            assert!(seq.is_exhausted());
        }

        #[test]
        fn test_reset_removes_setups() {
            let mock = strict();
            let handle = mock.setup("f").returns(1);
            mock.reset();
            assert_eq!(mock.setup_count(), 0);
            assert!(handle.is_exhausted());
            assert!(mock.invoke::<_, i32>("f", ()).is_err());
        }
    }
}
