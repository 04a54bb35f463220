use std::ops::{Deref, DerefMut};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

struct Slot<M> {
    mock: M,
    defaults: Option<fn(&mut M)>,
}

/// A generated mock shared between its [`Mock`](crate::Mock) handle and the
/// proxy object injected into the type under test.
///
/// The mocked trait is implemented for `SharedMock<MockX>` by forwarding each
/// method through [`SharedMock::call`]:
///
/// ```ignore
/// impl Clock for SharedMock<MockClock> {
///     fn now(&self) -> u64 {
///         self.call().now()
///     }
/// }
/// ```
pub struct SharedMock<M> {
    slot: Arc<Mutex<Slot<M>>>,
}

impl<M> SharedMock<M> {
    pub fn new(mock: M) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Slot {
                mock,
                defaults: None,
            })),
        }
    }

    /// Share `mock`, running `defaults` on it right before the first call
    /// made through [`SharedMock::call`]
    pub fn with_defaults(mock: M, defaults: fn(&mut M)) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Slot {
                mock,
                defaults: Some(defaults),
            })),
        }
    }

    /// Lock the mock to configure or check expectations.
    ///
    /// Calling the proxy object while the guard is held deadlocks.
    pub fn lock(&self) -> MockGuard<'_, M> {
        MockGuard(self.slot.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// Lock the mock to dispatch a call from the proxy object
    pub fn call(&self) -> MockGuard<'_, M> {
        let mut guard = self.lock();
        if let Some(install) = guard.0.defaults.take() {
            install(&mut guard.0.mock);
        }
        guard
    }
}

impl<M> Clone for SharedMock<M> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
        }
    }
}

impl<M> std::fmt::Debug for SharedMock<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedMock")
            .field("mock", &std::any::type_name::<M>())
            .field("handles", &Arc::strong_count(&self.slot))
            .finish()
    }
}

/// Exclusive access to a shared mock
pub struct MockGuard<'a, M>(MutexGuard<'a, Slot<M>>);

impl<M> Deref for MockGuard<'_, M> {
    type Target = M;

    fn deref(&self) -> &M {
        &self.0.mock
    }
}

impl<M> DerefMut for MockGuard<'_, M> {
    fn deref_mut(&mut self) -> &mut M {
        &mut self.0.mock
    }
}
