use crate::errors::{AutoMockError, Result, VerificationFailure};
use crate::mock::{MockBehavior, MockGuard, SharedMock};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// Trait objects that can be substituted by a `mockall` mock.
///
/// Implemented for `dyn Trait` next to the `#[automock]`-generated mock:
///
/// ```ignore
/// #[automock]
/// trait Clock: Send + Sync {
///     fn now(&self) -> u64;
/// }
///
/// impl Clock for SharedMock<MockClock> {
///     fn now(&self) -> u64 {
///         self.call().now()
///     }
/// }
///
/// impl Mockable for dyn Clock {
///     type Mock = MockClock;
///
///     fn proxy(mock: SharedMock<MockClock>) -> Arc<Self> {
///         Arc::new(mock)
///     }
///
///     fn checkpoint(mock: &mut MockClock) {
///         mock.checkpoint();
///     }
///
///     fn loosen(mock: &mut MockClock) {
///         mock.expect_now().return_const(0u64);
///     }
/// }
/// ```
pub trait Mockable: 'static {
    /// The generated mock type
    type Mock: Default + Send + 'static;

    /// Build the proxy object injected in place of the real implementation
    fn proxy(mock: SharedMock<Self::Mock>) -> Arc<Self>;

    /// Check the mock's expectations, panicking on the first unmet one
    fn checkpoint(mock: &mut Self::Mock);

    /// Default-returning expectations for loose mocks.
    ///
    /// Installed right before the first call through the proxy, after any
    /// expectations configured so far.
    fn loosen(_mock: &mut Self::Mock) {}
}

/// Handle to a mock: configures expectations and exposes the proxy object
pub struct Mock<I: Mockable + ?Sized> {
    shared: SharedMock<I::Mock>,
    object: Arc<I>,
    behavior: MockBehavior,
}

impl<I: Mockable + ?Sized> Mock<I> {
    /// Create a mock with a fresh generated mock behind it.
    ///
    /// `MockBehavior::Default` is treated as strict here; factories resolve it
    /// against their own configuration before calling this.
    pub fn new(behavior: MockBehavior) -> Self {
        let behavior = behavior.resolve(MockBehavior::Strict);
        let shared = if behavior.is_loose() {
            SharedMock::with_defaults(I::Mock::default(), I::loosen)
        } else {
            SharedMock::new(I::Mock::default())
        };
        let object = I::proxy(shared.clone());

        Self {
            shared,
            object,
            behavior,
        }
    }

    /// The proxy object. Every call returns the same allocation.
    pub fn object(&self) -> Arc<I> {
        Arc::clone(&self.object)
    }

    /// Lock the generated mock to configure expectations on it
    pub fn lock(&self) -> MockGuard<'_, I::Mock> {
        self.shared.lock()
    }

    /// Either strict or loose
    pub fn behavior(&self) -> MockBehavior {
        self.behavior
    }

    /// Check only this mock's expectations.
    ///
    /// Checked expectations are consumed, as with `checkpoint` in `mockall`.
    pub fn verify(&self) -> Result<()> {
        if self.behavior.is_loose() {
            return Ok(());
        }

        match checkpoint::<I>(&self.shared) {
            Some(failure) => Err(AutoMockError::VerificationFailed {
                failures: vec![failure],
            }),
            None => Ok(()),
        }
    }

    pub(crate) fn shared(&self) -> &SharedMock<I::Mock> {
        &self.shared
    }
}

impl<I: Mockable + ?Sized> Clone for Mock<I> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
            object: Arc::clone(&self.object),
            behavior: self.behavior,
        }
    }
}

impl<I: Mockable + ?Sized> std::fmt::Debug for Mock<I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mock")
            .field("mock", &std::any::type_name::<I::Mock>())
            .field("behavior", &self.behavior)
            .finish()
    }
}

/// Run the mock's checkpoint, turning its panic into a failure
pub(crate) fn checkpoint<I: Mockable + ?Sized>(
    shared: &SharedMock<I::Mock>,
) -> Option<VerificationFailure> {
    let mut guard = shared.lock();
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| I::checkpoint(&mut *guard)));

    outcome.err().map(|payload| VerificationFailure {
        mock: std::any::type_name::<I::Mock>(),
        message: panic_message(payload.as_ref()),
    })
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "expectations not satisfied".to_string()
    }
}
