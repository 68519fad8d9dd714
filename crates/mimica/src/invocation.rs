//! Recorded invocations.

use crate::setup::SetupId;
use std::any::Any;
use std::fmt;
use std::rc::Rc;

/// One call made on a mock, matched or not
#[derive(Clone)]
pub struct Invocation {
    method: String,
    arguments: String,
    args: Rc<dyn Any>,
    matched_setup: Option<SetupId>,
}

impl fmt::Debug for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Invocation")
            .field("method", &self.method)
            .field("arguments", &self.arguments)
            .field("matched_setup", &self.matched_setup)
            .finish()
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.method, self.arguments)
    }
}

impl Invocation {
    pub(crate) fn new(
        method: &str,
        arguments: String,
        args: Rc<dyn Any>,
        matched_setup: Option<SetupId>,
    ) -> Self {
        Self {
            method: method.to_string(),
            arguments,
            args,
            matched_setup,
        }
    }

    /// Invoked method
    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Argument tuple rendered with `Debug`
    #[must_use]
    pub fn arguments(&self) -> &str {
        &self.arguments
    }

    /// The argument tuple, if it is an `A`
    #[must_use]
    pub fn args<A: 'static>(&self) -> Option<&A> {
        self.args.downcast_ref::<A>()
    }

    /// Setup that answered the call
    #[must_use]
    pub const fn matched_setup(&self) -> Option<SetupId> {
        self.matched_setup
    }

    /// Whether a setup answered the call
    #[must_use]
    pub const fn was_matched(&self) -> bool {
        self.matched_setup.is_some()
    }

    pub(crate) fn erased_args(&self) -> &dyn Any {
        &*self.args
    }
}
