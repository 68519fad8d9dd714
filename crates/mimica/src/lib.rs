//! Mimica: Mock Objects for Rust Tests
//!
//! Stub method returns, match arguments, order calls in sequences, pick
//! strict or loose behavior for unconfigured calls, and verify afterwards
//! that the expected calls happened.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      MIMICA Architecture                         │
//! ├─────────────────────────────────────────────────────────────────┤
//! │   ┌────────────┐    ┌────────────┐    ┌────────────┐            │
//! │   │ #[mockable]│    │ Dispatcher │    │ Verifier   │            │
//! │   │ trait impl │───►│ (Mock)     │───►│            │            │
//! │   └────────────┘    └─────┬──────┘    └────────────┘            │
//! │                           │                                      │
//! │          ┌────────────────┼────────────────┐                     │
//! │          ▼                ▼                ▼                     │
//! │   ┌────────────┐   ┌────────────┐   ┌────────────┐              │
//! │   │ Setup      │   │ Sequence   │   │ Invocation │              │
//! │   │ Registry   │   │ Controller │   │ Log        │              │
//! │   └─────┬──────┘   └────────────┘   └────────────┘              │
//! │         ▼                                                        │
//! │   ┌────────────┐                                                 │
//! │   │ Matchers   │                                                 │
//! │   └────────────┘                                                 │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use mimica::prelude::*;
//!
//! #[mockable]
//! trait Target {
//!     fn parameterized_method(&self, value: i32) -> i32;
//! }
//!
//! let repo = MockRepository::new(MockBehavior::Strict);
//! let target: MockTarget = repo.create_mock();
//! target
//!     .setup("parameterized_method")
//!     .with(It::in_range(1, 5, RangeKind::Inclusive))
//!     .returns(1)
//!     .verifiable();
//!
//! assert_eq!(target.parameterized_method(3), 1);
//! repo.verify()?;
//! ```

#![warn(missing_docs)]

mod config;
mod invocation;
mod matcher;
mod mock;
mod repository;
mod result;
mod sequence;
mod setup;
mod verify;

/// Test logging setup via `tracing-subscriber`
pub mod logging;

pub use config::{MockConfig, VerifyOnDrop};
pub use invocation::Invocation;
pub use matcher::{ArgMatchers, It, Matcher, RangeKind};
pub use mock::{InSequence, Mock, MockBehavior, Mockable};
pub use repository::MockRepository;
pub use result::{MockError, MockResult};
pub use sequence::MockSequence;
pub use setup::{SequenceSetupHandle, SetupHandle, SetupId};
pub use verify::Times;

/// Generate a mock type for a trait
#[cfg(feature = "derive")]
pub use mimica_derive::mockable;

/// Everything needed to write mock-based tests
pub mod prelude {
    pub use super::config::{MockConfig, VerifyOnDrop};
    pub use super::invocation::Invocation;
    pub use super::matcher::{ArgMatchers, It, Matcher, RangeKind};
    pub use super::mock::{Mock, MockBehavior, Mockable};
    pub use super::repository::MockRepository;
    pub use super::result::{MockError, MockResult};
    pub use super::sequence::MockSequence;
    pub use super::verify::Times;

    #[cfg(feature = "derive")]
    pub use mimica_derive::mockable;
}
