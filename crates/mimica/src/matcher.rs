//! Argument Matchers
//!
//! Decide whether a configured argument pattern accepts the arguments of an
//! actual call.
//!
//! ## Example
//!
//! ```rust,ignore
//! use mimica::{It, RangeKind};
//!
//! mock.setup("parameterized_method")
//!     .with(It::in_range(1, 5, RangeKind::Inclusive))
//!     .returns(1);
//! mock.setup("lookup")
//!     .with((It::eq("users".to_string()), It::any::<u32>()))
//!     .returns(Some(42));
//! ```

use crate::result::{MockError, MockResult};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt::{self, Debug};
use std::ops::RangeBounds;
use std::rc::Rc;

/// Whether the bounds of a range matcher are part of the range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RangeKind {
    /// `lo <= value <= hi`
    #[default]
    Inclusive,
    /// `lo < value < hi`
    Exclusive,
}

impl RangeKind {
    /// Check a value against `lo` and `hi` under this kind
    #[must_use]
    pub fn contains<T: PartialOrd>(self, lo: &T, hi: &T, value: &T) -> bool {
        match self {
            Self::Inclusive => lo <= value && value <= hi,
            Self::Exclusive => lo < value && value < hi,
        }
    }
}

/// A predicate over one argument, with a description for failure messages
pub struct Matcher<T> {
    predicate: Rc<dyn Fn(&T) -> bool>,
    description: String,
}

impl<T> Clone for Matcher<T> {
    fn clone(&self) -> Self {
        Self {
            predicate: Rc::clone(&self.predicate),
            description: self.description.clone(),
        }
    }
}

impl<T> Debug for Matcher<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Matcher")
            .field("description", &self.description)
            .finish()
    }
}

impl<T> fmt::Display for Matcher<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description)
    }
}

impl<T: 'static> Matcher<T> {
    /// Build a named matcher from a predicate.
    ///
    /// This is the way to write reusable custom matchers:
    ///
    /// ```rust,ignore
    /// fn is_greater(bound: i32) -> Matcher<i32> {
    ///     Matcher::new(format!("> {bound}"), move |v| *v > bound)
    /// }
    /// ```
    pub fn new<F>(description: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&T) -> bool + 'static,
    {
        Self {
            predicate: Rc::new(predicate),
            description: description.into(),
        }
    }

    /// Check a value
    #[must_use]
    pub fn matches(&self, value: &T) -> bool {
        (self.predicate)(value)
    }

    /// Human-readable description
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Accept values both matchers accept
    #[must_use]
    pub fn and(self, other: Self) -> Self {
        let description = format!("({} and {})", self.description, other.description);
        Self::new(description, move |v| self.matches(v) && other.matches(v))
    }

    /// Accept values either matcher accepts
    #[must_use]
    pub fn or(self, other: Self) -> Self {
        let description = format!("({} or {})", self.description, other.description);
        Self::new(description, move |v| self.matches(v) || other.matches(v))
    }

    /// Accept exactly the values this matcher rejects
    #[must_use]
    pub fn negate(self) -> Self {
        let description = format!("not {}", self.description);
        Self::new(description, move |v| !self.matches(v))
    }
}

/// Matcher constructors
#[derive(Debug, Clone, Copy)]
pub struct It;

impl It {
    /// Any value of type `T`
    #[must_use]
    pub fn any<T: 'static>() -> Matcher<T> {
        Matcher::new("any", |_| true)
    }

    /// A value equal to `expected`
    #[must_use]
    pub fn eq<T>(expected: T) -> Matcher<T>
    where
        T: PartialEq + Debug + 'static,
    {
        Matcher::new(format!("{expected:?}"), move |v| *v == expected)
    }

    /// A value accepted by an arbitrary predicate
    #[must_use]
    pub fn is<T, F>(predicate: F) -> Matcher<T>
    where
        T: 'static,
        F: Fn(&T) -> bool + 'static,
    {
        Matcher::new("custom predicate", predicate)
    }

    /// A value between `lo` and `hi`
    #[must_use]
    pub fn in_range<T>(lo: T, hi: T, kind: RangeKind) -> Matcher<T>
    where
        T: PartialOrd + Debug + 'static,
    {
        let description = match kind {
            RangeKind::Inclusive => format!("in [{lo:?}, {hi:?}]"),
            RangeKind::Exclusive => format!("in ({lo:?}, {hi:?})"),
        };
        Matcher::new(description, move |v| kind.contains(&lo, &hi, v))
    }

    /// A value inside a Rust range expression such as `4..=6` or `..10`
    #[must_use]
    pub fn within<T, R>(range: R) -> Matcher<T>
    where
        T: PartialOrd + 'static,
        R: RangeBounds<T> + Debug + 'static,
    {
        Matcher::new(format!("in {range:?}"), move |v| range.contains(v))
    }

    /// A value equal to one of `values`
    #[must_use]
    pub fn is_in<T, I>(values: I) -> Matcher<T>
    where
        T: PartialEq + Debug + 'static,
        I: IntoIterator<Item = T>,
    {
        let values: Vec<T> = values.into_iter().collect();
        Matcher::new(format!("one of {values:?}"), move |v| values.contains(v))
    }

    /// A value equal to none of `values`
    #[must_use]
    pub fn is_not_in<T, I>(values: I) -> Matcher<T>
    where
        T: PartialEq + Debug + 'static,
        I: IntoIterator<Item = T>,
    {
        let values: Vec<T> = values.into_iter().collect();
        Matcher::new(format!("none of {values:?}"), move |v| !values.contains(v))
    }

    /// A string-like value matching a regular expression
    ///
    /// # Errors
    ///
    /// Returns [`MockError::InvalidMatcher`] if the pattern does not compile.
    pub fn is_regex<T>(pattern: &str) -> MockResult<Matcher<T>>
    where
        T: AsRef<str> + 'static,
    {
        let regex = Regex::new(pattern).map_err(|e| MockError::InvalidMatcher {
            message: format!("regex {pattern:?}: {e}"),
        })?;
        Ok(Matcher::new(format!("matches /{pattern}/"), move |v: &T| {
            regex.is_match(v.as_ref())
        }))
    }

    /// An `Option` holding a value
    #[must_use]
    pub fn is_some<T: 'static>() -> Matcher<Option<T>> {
        Matcher::new("Some(_)", Option::is_some)
    }

    /// An empty `Option`
    #[must_use]
    pub fn is_none<T: 'static>() -> Matcher<Option<T>> {
        Matcher::new("None", Option::is_none)
    }
}

/// Matchers for a whole argument list.
///
/// Implemented for `()` (no arguments), for a single [`Matcher`] (one
/// argument) and for tuples of matchers up to eight arguments.
pub trait ArgMatchers: 'static {
    /// Argument tuple this matcher list accepts
    type Args: 'static;

    /// Check an argument tuple
    fn matches(&self, args: &Self::Args) -> bool;

    /// Human-readable description, rendered like an argument list
    fn describe(&self) -> String;
}

impl ArgMatchers for () {
    type Args = ();

    fn matches(&self, _args: &()) -> bool {
        true
    }

    fn describe(&self) -> String {
        "()".to_string()
    }
}

impl<T: 'static> ArgMatchers for Matcher<T> {
    type Args = (T,);

    fn matches(&self, args: &(T,)) -> bool {
        Matcher::matches(self, &args.0)
    }

    fn describe(&self) -> String {
        format!("({})", self.description)
    }
}

macro_rules! tuple_arg_matchers {
    ($($idx:tt => $T:ident),+) => {
        impl<$($T: 'static),+> ArgMatchers for ($(Matcher<$T>,)+) {
            type Args = ($($T,)+);

            fn matches(&self, args: &Self::Args) -> bool {
                $(self.$idx.matches(&args.$idx))&&+
            }

            fn describe(&self) -> String {
                let parts: Vec<&str> = vec![$(self.$idx.description()),+];
                format!("({})", parts.join(", "))
            }
        }
    };
}

tuple_arg_matchers!(0 => A);
tuple_arg_matchers!(0 => A, 1 => B);
tuple_arg_matchers!(0 => A, 1 => B, 2 => C);
tuple_arg_matchers!(0 => A, 1 => B, 2 => C, 3 => D);
tuple_arg_matchers!(0 => A, 1 => B, 2 => C, 3 => D, 4 => E);
tuple_arg_matchers!(0 => A, 1 => B, 2 => C, 3 => D, 4 => E, 5 => F);
tuple_arg_matchers!(0 => A, 1 => B, 2 => C, 3 => D, 4 => E, 5 => F, 6 => G);
tuple_arg_matchers!(0 => A, 1 => B, 2 => C, 3 => D, 4 => E, 5 => F, 6 => G, 7 => H);

/// Type-erased argument matcher stored on a setup.
///
/// `accepts` yields `None` when the invoked arguments are not of the type the
/// matcher was declared for.
#[derive(Clone)]
pub(crate) struct ErasedMatcher {
    predicate: Rc<dyn Fn(&dyn Any) -> Option<bool>>,
    description: String,
}

impl Debug for ErasedMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description)
    }
}

impl ErasedMatcher {
    /// Accepts any arguments of any type
    pub(crate) fn any() -> Self {
        Self {
            predicate: Rc::new(|_| Some(true)),
            description: "(..)".to_string(),
        }
    }

    pub(crate) fn from_matchers<M: ArgMatchers>(matchers: M) -> Self {
        let description = matchers.describe();
        Self {
            predicate: Rc::new(move |args: &dyn Any| {
                args.downcast_ref::<M::Args>()
                    .map(|args| matchers.matches(args))
            }),
            description,
        }
    }

    pub(crate) fn accepts(&self, args: &dyn Any) -> Option<bool> {
        (self.predicate)(args)
    }

    pub(crate) fn description(&self) -> &str {
        &self.description
    }
}
