//! Setup Registry
//!
//! A setup maps an expected call (method name plus argument matchers) to a
//! behavior. Setups are registered on the mock the moment `setup` is called;
//! the returned handle only refines the registered entry.

use crate::matcher::{ArgMatchers, ErasedMatcher};
use crate::mock::MockState;
use crate::result::{MockError, MockResult};
use crate::sequence::MockSequence;
use std::any::{type_name, Any};
use std::cell::RefCell;
use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;

/// Identifier of a setup within its mock, in declaration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SetupId(pub(crate) usize);

impl SetupId {
    /// Position in declaration order
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for SetupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Where a call is being answered, for error messages
pub(crate) struct CallSite<'a> {
    pub(crate) mock: &'a str,
    pub(crate) method: &'a str,
}

impl CallSite<'_> {
    fn raised(&self, message: &str) -> MockError {
        MockError::Raised {
            mock: self.mock.to_string(),
            method: self.method.to_string(),
            message: message.to_string(),
        }
    }

    fn argument_mismatch(&self, expected: &'static str) -> MockError {
        MockError::ArgumentTypeMismatch {
            mock: self.mock.to_string(),
            method: self.method.to_string(),
            expected,
        }
    }

    fn return_mismatch(&self, expected: &'static str) -> MockError {
        MockError::ReturnTypeMismatch {
            mock: self.mock.to_string(),
            method: self.method.to_string(),
            expected,
        }
    }
}

type ValueFactory = Rc<dyn Fn() -> Box<dyn Any>>;
type ComputeFn = Rc<dyn Fn(&dyn Any) -> Option<Box<dyn Any>>>;

/// What a setup answers with
#[derive(Clone)]
pub(crate) enum Response {
    /// `Default::default()` of the invoked return type
    Default,
    /// A configured value, cloned per call
    Value(ValueFactory),
    /// A value computed from the arguments
    Computed {
        produce: ComputeFn,
        expects: &'static str,
    },
    /// A configured failure
    Fail(String),
}

impl Response {
    fn value<R: Clone + 'static>(value: R) -> Self {
        Self::Value(Rc::new(move || Box::new(value.clone())))
    }

    fn computed<A, R, F>(f: F) -> Self
    where
        A: 'static,
        R: 'static,
        F: Fn(&A) -> R + 'static,
    {
        Self::Computed {
            produce: Rc::new(move |args: &dyn Any| {
                args.downcast_ref::<A>()
                    .map(|args| Box::new(f(args)) as Box<dyn Any>)
            }),
            expects: type_name::<A>(),
        }
    }

    pub(crate) fn produce<R>(&self, site: &CallSite<'_>, args: &dyn Any) -> MockResult<R>
    where
        R: Default + 'static,
    {
        let boxed = match self {
            Self::Default => return Ok(R::default()),
            Self::Fail(message) => return Err(site.raised(message)),
            Self::Value(make) => make(),
            Self::Computed { produce, expects } => {
                produce(args).ok_or_else(|| site.argument_mismatch(expects))?
            }
        };
        boxed
            .downcast::<R>()
            .map(|value| *value)
            .map_err(|_| site.return_mismatch(type_name::<R>()))
    }
}

/// Side effect run before the response is produced
#[derive(Clone)]
pub(crate) struct Callback {
    run: Rc<dyn Fn(&dyn Any) -> bool>,
    expects: &'static str,
}

impl Callback {
    fn plain<F: Fn() + 'static>(f: F) -> Self {
        Self {
            run: Rc::new(move |_| {
                f();
                true
            }),
            expects: "()",
        }
    }

    fn with_args<A: 'static, F: Fn(&A) + 'static>(f: F) -> Self {
        Self {
            run: Rc::new(move |args: &dyn Any| match args.downcast_ref::<A>() {
                Some(args) => {
                    f(args);
                    true
                }
                None => false,
            }),
            expects: type_name::<A>(),
        }
    }

    pub(crate) fn run(&self, site: &CallSite<'_>, args: &dyn Any) -> MockResult<()> {
        if (self.run)(args) {
            Ok(())
        } else {
            Err(site.argument_mismatch(self.expects))
        }
    }
}

/// Single response, or successive responses for `setup_sequence`
#[derive(Clone)]
pub(crate) enum Plan {
    Single(Response),
    Steps { responses: Vec<Response>, next: usize },
}

/// A registered setup
pub(crate) struct SetupEntry {
    pub(crate) id: SetupId,
    pub(crate) method: String,
    pub(crate) matcher: ErasedMatcher,
    pub(crate) plan: Plan,
    pub(crate) callbacks: Vec<Callback>,
    pub(crate) invocations: usize,
    pub(crate) limit: Option<usize>,
    pub(crate) verifiable: bool,
    pub(crate) sequence: Option<(MockSequence, usize)>,
}

/// The setup chosen to answer one call
pub(crate) struct Selected {
    pub(crate) setup: SetupId,
    pub(crate) response: Response,
    pub(crate) callbacks: Vec<Callback>,
}

impl SetupEntry {
    pub(crate) fn new(id: SetupId, method: &str, plan: Plan) -> Self {
        Self {
            id,
            method: method.to_string(),
            matcher: ErasedMatcher::any(),
            plan,
            callbacks: Vec::new(),
            invocations: 0,
            limit: None,
            verifiable: false,
            sequence: None,
        }
    }

    /// Registered through a sequence mechanism; exempt from verification
    pub(crate) fn is_sequenced(&self) -> bool {
        self.sequence.is_some() || matches!(self.plan, Plan::Steps { .. })
    }

    pub(crate) fn is_exhausted(&self) -> bool {
        if self.limit.is_some_and(|max| self.invocations >= max) {
            return true;
        }
        match &self.plan {
            Plan::Single(_) => false,
            Plan::Steps { responses, next } => *next >= responses.len(),
        }
    }

    /// `None` when the arguments are not of the type the setup was declared for
    pub(crate) fn accepts(&self, method: &str, args: &dyn Any) -> Option<bool> {
        if self.method != method || self.is_exhausted() {
            return Some(false);
        }
        if let Some((sequence, step)) = &self.sequence {
            if !sequence.is_current(*step) {
                return Some(false);
            }
        }
        self.matcher.accepts(args)
    }

    /// Advance the plan and sequence and hand out what answers the call.
    ///
    /// The call is counted separately by [`record_answer`](Self::record_answer)
    /// once it was answered.
    pub(crate) fn consume(&mut self) -> Selected {
        let response = match &mut self.plan {
            Plan::Single(response) => response.clone(),
            Plan::Steps { responses, next } => {
                let response = responses.get(*next).cloned().unwrap_or(Response::Default);
                *next += 1;
                response
            }
        };
        if let Some((sequence, _)) = &self.sequence {
            sequence.advance();
        }
        Selected {
            setup: self.id,
            response,
            callbacks: self.callbacks.clone(),
        }
    }

    pub(crate) fn record_answer(&mut self) {
        self.invocations += 1;
    }

    pub(crate) fn describe(&self) -> String {
        format!("{}{}", self.method, self.matcher.description())
    }

    pub(crate) fn reset_counters(&mut self) {
        self.invocations = 0;
        if let Plan::Steps { next, .. } = &mut self.plan {
            *next = 0;
        }
    }
}

/// Shared access to one registered entry
struct EntryRef {
    state: Rc<RefCell<MockState>>,
    id: SetupId,
}

impl EntryRef {
    /// No-op once the mock was reset and the entry is gone
    fn update(&self, f: impl FnOnce(&mut SetupEntry)) {
        if let Some(entry) = self.state.borrow_mut().setup_mut(self.id) {
            f(entry);
        }
    }

    fn read<T>(&self, f: impl FnOnce(&SetupEntry) -> T) -> Option<T> {
        self.state.borrow().setup(self.id).map(f)
    }
}

/// Handle refining a registered setup.
///
/// `A` is the argument tuple the setup was declared for with [`with`]; it is
/// `()` until then, and a setup without matchers accepts any arguments.
///
/// [`with`]: SetupHandle::with
pub struct SetupHandle<A = ()> {
    entry: EntryRef,
    _args: PhantomData<fn(&A)>,
}

impl<A> fmt::Debug for SetupHandle<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SetupHandle")
            .field("id", &self.entry.id)
            .finish()
    }
}

impl<A: 'static> SetupHandle<A> {
    pub(crate) fn new(state: Rc<RefCell<MockState>>, id: SetupId) -> Self {
        Self {
            entry: EntryRef { state, id },
            _args: PhantomData,
        }
    }

    /// Restrict the setup to calls whose arguments match
    pub fn with<M: ArgMatchers>(self, matchers: M) -> SetupHandle<M::Args> {
        self.entry
            .update(|e| e.matcher = ErasedMatcher::from_matchers(matchers));
        SetupHandle {
            entry: self.entry,
            _args: PhantomData,
        }
    }

    /// Answer with a clone of `value`
    pub fn returns<R: Clone + 'static>(self, value: R) -> Self {
        self.entry
            .update(|e| e.plan = Plan::Single(Response::value(value)));
        self
    }

    /// Answer with a value computed from the arguments
    pub fn returns_with<R, F>(self, f: F) -> Self
    where
        R: 'static,
        F: Fn(&A) -> R + 'static,
    {
        self.entry
            .update(|e| e.plan = Plan::Single(Response::computed(f)));
        self
    }

    /// Answer with [`MockError::Raised`]
    pub fn fails_with(self, message: impl Into<String>) -> Self {
        let message = message.into();
        self.entry
            .update(|e| e.plan = Plan::Single(Response::Fail(message)));
        self
    }

    /// Run `f` each time the setup answers, before its value is produced
    pub fn callback<F: Fn() + 'static>(self, f: F) -> Self {
        self.entry.update(|e| e.callbacks.push(Callback::plain(f)));
        self
    }

    /// Like [`callback`](Self::callback), receiving the arguments
    pub fn callback_with<F: Fn(&A) + 'static>(self, f: F) -> Self {
        self.entry
            .update(|e| e.callbacks.push(Callback::with_args(f)));
        self
    }

    /// Include the setup in [`Mock::verify`](crate::Mock::verify)
    pub fn verifiable(self) -> Self {
        self.entry.update(|e| e.verifiable = true);
        self
    }

    /// Stop matching after `n` answers
    pub fn times(self, n: usize) -> Self {
        self.entry.update(|e| e.limit = Some(n));
        self
    }

    /// Identifier of the setup
    #[must_use]
    pub fn id(&self) -> SetupId {
        self.entry.id
    }

    /// How many calls this setup answered
    #[must_use]
    pub fn invocation_count(&self) -> usize {
        self.entry.read(|e| e.invocations).unwrap_or(0)
    }

    /// True once the setup can no longer answer
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.entry.read(SetupEntry::is_exhausted).unwrap_or(true)
    }
}

/// Handle building a setup that answers successive calls with successive
/// responses.
///
/// ```rust,ignore
/// mock.setup_sequence("next").returns(1).returns(2).returns(3);
/// ```
pub struct SequenceSetupHandle<A = ()> {
    entry: EntryRef,
    _args: PhantomData<fn(&A)>,
}

impl<A> fmt::Debug for SequenceSetupHandle<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SequenceSetupHandle")
            .field("id", &self.entry.id)
            .finish()
    }
}

impl<A: 'static> SequenceSetupHandle<A> {
    pub(crate) fn new(state: Rc<RefCell<MockState>>, id: SetupId) -> Self {
        Self {
            entry: EntryRef { state, id },
            _args: PhantomData,
        }
    }

    fn push(&self, response: Response) {
        self.entry.update(|e| {
            if let Plan::Steps { responses, .. } = &mut e.plan {
                responses.push(response);
            }
        });
    }

    /// Restrict the setup to calls whose arguments match
    pub fn with<M: ArgMatchers>(self, matchers: M) -> SequenceSetupHandle<M::Args> {
        self.entry
            .update(|e| e.matcher = ErasedMatcher::from_matchers(matchers));
        SequenceSetupHandle {
            entry: self.entry,
            _args: PhantomData,
        }
    }

    /// Next call answers with a clone of `value`
    pub fn returns<R: Clone + 'static>(self, value: R) -> Self {
        self.push(Response::value(value));
        self
    }

    /// Next call answers with a value computed from the arguments
    pub fn returns_with<R, F>(self, f: F) -> Self
    where
        R: 'static,
        F: Fn(&A) -> R + 'static,
    {
        self.push(Response::computed(f));
        self
    }

    /// Next call answers with [`MockError::Raised`]
    pub fn fails_with(self, message: impl Into<String>) -> Self {
        self.push(Response::Fail(message.into()));
        self
    }

    /// Next call answers with the default value
    pub fn pass(self) -> Self {
        self.push(Response::Default);
        self
    }

    /// Run `f` on every answered call
    pub fn callback<F: Fn() + 'static>(self, f: F) -> Self {
        self.entry.update(|e| e.callbacks.push(Callback::plain(f)));
        self
    }

    /// Identifier of the setup
    #[must_use]
    pub fn id(&self) -> SetupId {
        self.entry.id
    }

    /// Responses not yet consumed
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.entry
            .read(|e| match &e.plan {
                Plan::Steps { responses, next } => responses.len().saturating_sub(*next),
                Plan::Single(_) => 0,
            })
            .unwrap_or(0)
    }
}
