//! Mock Repository
//!
//! Creates mocks that share a default behavior and verifies them together.
//!
//! ```rust,ignore
//! let repo = MockRepository::new(MockBehavior::Strict);
//! let strict = repo.create_mock::<MockTarget>();
//! let loose = repo.create_mock_with::<MockTarget>(MockBehavior::Loose);
//! // ...
//! repo.verify_all()?;
//! ```

use crate::config::{MockConfig, VerifyOnDrop};
use crate::mock::{Mock, MockBehavior, Mockable};
use crate::result::{MockError, MockResult};
use std::cell::RefCell;
use tracing::debug;

/// Factory of mocks sharing a configuration
#[derive(Debug)]
pub struct MockRepository {
    config: MockConfig,
    mocks: RefCell<Vec<Mock>>,
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::with_config(MockConfig::default())
    }
}

impl MockRepository {
    /// Repository whose mocks default to `behavior`
    #[must_use]
    pub fn new(behavior: MockBehavior) -> Self {
        Self::with_config(MockConfig::new().with_behavior(behavior))
    }

    /// Repository built from a configuration
    #[must_use]
    pub fn with_config(config: MockConfig) -> Self {
        Self {
            config,
            mocks: RefCell::new(Vec::new()),
        }
    }

    /// Default behavior of created mocks
    #[must_use]
    pub const fn behavior(&self) -> MockBehavior {
        self.config.behavior
    }

    /// The repository configuration
    #[must_use]
    pub const fn config(&self) -> &MockConfig {
        &self.config
    }

    /// Create an anonymous mock with the repository behavior
    pub fn create(&self) -> Mock {
        self.create_named("mock", self.config.behavior)
    }

    /// Create an anonymous mock overriding the repository behavior
    pub fn create_with(&self, behavior: MockBehavior) -> Mock {
        self.create_named("mock", behavior)
    }

    /// Create a named mock
    pub fn create_named(&self, name: impl Into<String>, behavior: MockBehavior) -> Mock {
        let config = self.config.clone().with_behavior(behavior);
        let mock = Mock::with_config(name, &config);
        debug!(mock = %mock.name(), %behavior, "created mock");
        self.mocks.borrow_mut().push(mock.clone());
        mock
    }

    /// Create a generated mock with the repository behavior
    pub fn create_mock<M: Mockable>(&self) -> M {
        self.create_mock_with(self.config.behavior)
    }

    /// Create a generated mock overriding the repository behavior
    pub fn create_mock_with<M: Mockable>(&self, behavior: MockBehavior) -> M {
        M::from_mock(self.create_named(M::TARGET, behavior))
    }

    /// Number of mocks created
    #[must_use]
    pub fn mock_count(&self) -> usize {
        self.mocks.borrow().len()
    }

    /// [`Mock::verify`] on every created mock
    ///
    /// # Errors
    ///
    /// [`MockError::VerificationFailed`] collecting the failures of all mocks.
    pub fn verify(&self) -> MockResult<()> {
        self.verify_each(Mock::verify)
    }

    /// [`Mock::verify_all`] on every created mock
    ///
    /// # Errors
    ///
    /// [`MockError::VerificationFailed`] collecting the failures of all mocks.
    pub fn verify_all(&self) -> MockResult<()> {
        self.verify_each(Mock::verify_all)
    }

    fn verify_each(&self, check: impl Fn(&Mock) -> MockResult<()>) -> MockResult<()> {
        let mut failures = Vec::new();
        for mock in self.mocks.borrow().iter() {
            match check(mock) {
                Ok(()) => {}
                Err(MockError::VerificationFailed {
                    mock: name,
                    failures: unmet,
                }) => failures.extend(unmet.into_iter().map(|f| format!("{name}: {f}"))),
                Err(other) => return Err(other),
            }
        }
        if failures.is_empty() {
            Ok(())
        } else {
            Err(MockError::VerificationFailed {
                mock: "repository".to_string(),
                failures,
            })
        }
    }
}

impl Drop for MockRepository {
    fn drop(&mut self) {
        if std::thread::panicking() {
            return;
        }
        let outcome = match self.config.verify_on_drop {
            VerifyOnDrop::Off => return,
            VerifyOnDrop::Verifiable => self.verify(),
            VerifyOnDrop::All => self.verify_all(),
        };
        if let Err(e) = outcome {
            panic!("{e}");
        }
    }
}
