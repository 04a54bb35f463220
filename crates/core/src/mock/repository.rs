use crate::errors::{AutoMockError, Result, VerificationFailure};
use crate::mock::handle::checkpoint;
use crate::mock::{Mock, MockBehavior, Mockable, SharedMock};
use std::cell::RefCell;
use std::marker::PhantomData;

/// Creates mocks and verifies them as a group
pub trait MockFactory {
    /// Create a mock of `I` under `behavior`, retaining it for verification
    fn create<I: Mockable + ?Sized>(&mut self, behavior: MockBehavior) -> Mock<I>;

    /// Check every expectation of every mock created so far
    fn verify(&self) -> Result<()>;
}

/// A created mock with its concrete type erased
trait Retained {
    fn mock_type(&self) -> &'static str;
    fn is_loose(&self) -> bool;
    fn checkpoint(&self) -> Option<VerificationFailure>;
}

struct RetainedMock<I: Mockable + ?Sized> {
    shared: SharedMock<I::Mock>,
    behavior: MockBehavior,
    marker: PhantomData<fn(&I)>,
}

impl<I: Mockable + ?Sized> Retained for RetainedMock<I> {
    fn mock_type(&self) -> &'static str {
        std::any::type_name::<I::Mock>()
    }

    fn is_loose(&self) -> bool {
        self.behavior.is_loose()
    }

    fn checkpoint(&self) -> Option<VerificationFailure> {
        checkpoint::<I>(&self.shared)
    }
}

/// Default mock factory: keeps every mock it hands out.
///
/// Verification runs each strict mock's `checkpoint`. Failures are kept, so
/// verifying again reports them again even though `mockall` has consumed the
/// expectations.
#[derive(Default)]
pub struct MockRepository {
    behavior: MockBehavior,
    mocks: Vec<Box<dyn Retained>>,
    failures: RefCell<Vec<VerificationFailure>>,
}

impl MockRepository {
    /// Create a repository whose `Default` mocks take `behavior`
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            mocks: Vec::new(),
            failures: RefCell::new(Vec::new()),
        }
    }

    pub fn behavior(&self) -> MockBehavior {
        self.behavior
    }

    /// Number of mocks created by this repository
    pub fn mock_count(&self) -> usize {
        self.mocks.len()
    }
}

impl MockFactory for MockRepository {
    fn create<I: Mockable + ?Sized>(&mut self, behavior: MockBehavior) -> Mock<I> {
        let effective = behavior.resolve(self.behavior);
        let mock = Mock::<I>::new(effective);
        tracing::debug!(
            mock = std::any::type_name::<I::Mock>(),
            behavior = %effective,
            "created mock"
        );

        self.mocks.push(Box::new(RetainedMock::<I> {
            shared: mock.shared().clone(),
            behavior: effective,
            marker: PhantomData,
        }));
        mock
    }

    fn verify(&self) -> Result<()> {
        let mut failures = self.failures.borrow_mut();
        for mock in self.mocks.iter().filter(|mock| !mock.is_loose()) {
            if let Some(failure) = mock.checkpoint() {
                failures.push(failure);
            }
        }

        match AutoMockError::verification(failures.clone()) {
            Some(error) => {
                tracing::info!(mocks = self.mocks.len(), "mock verification failed");
                Err(error)
            }
            None => {
                tracing::info!(mocks = self.mocks.len(), "mock verification passed");
                Ok(())
            }
        }
    }
}

impl Drop for MockRepository {
    fn drop(&mut self) {
        if std::thread::panicking() {
            return;
        }

        // Expectations left unchecked would otherwise panic when mockall drops them
        for mock in &self.mocks {
            if let Some(failure) = mock.checkpoint() {
                tracing::debug!(mock = mock.mock_type(), %failure, "discarded unchecked expectations");
            }
        }
    }
}

impl std::fmt::Debug for MockRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mocks: Vec<_> = self.mocks.iter().map(|mock| mock.mock_type()).collect();
        f.debug_struct("MockRepository")
            .field("behavior", &self.behavior)
            .field("mocks", &mocks)
            .field("failures", &self.failures.borrow().len())
            .finish()
    }
}
