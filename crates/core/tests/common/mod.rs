//! Shared fixtures for the integration tests: two `mockall` service traits
//! and a handful of types under test with different constructor shapes.

#![allow(dead_code)]

use automock_core::{Constructor, Injectable, Mockable, SharedMock};
use mockall::automock;
use std::sync::{Arc, Once};

static TRACING: Once = Once::new();

/// Route `tracing` output through the test harness
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

#[automock]
pub trait Clock: Send + Sync {
    fn now(&self) -> u64;
}

impl Clock for SharedMock<MockClock> {
    fn now(&self) -> u64 {
        self.call().now()
    }
}

impl Mockable for dyn Clock {
    type Mock = MockClock;

    fn proxy(mock: SharedMock<MockClock>) -> Arc<Self> {
        Arc::new(mock)
    }

    fn checkpoint(mock: &mut MockClock) {
        mock.checkpoint();
    }

    fn loosen(mock: &mut MockClock) {
        mock.expect_now().return_const(0u64);
    }
}

#[automock]
pub trait Mailer: Send + Sync {
    fn send(&self, to: &str, body: &str) -> bool;
}

impl Mailer for SharedMock<MockMailer> {
    fn send(&self, to: &str, body: &str) -> bool {
        self.call().send(to, body)
    }
}

impl Mockable for dyn Mailer {
    type Mock = MockMailer;

    fn proxy(mock: SharedMock<MockMailer>) -> Arc<Self> {
        Arc::new(mock)
    }

    fn checkpoint(mock: &mut MockMailer) {
        mock.checkpoint();
    }

    fn loosen(mock: &mut MockMailer) {
        mock.expect_send().return_const(false);
    }
}

/// A fixed clock for registering as a real dependency
pub struct FrozenClock(pub u64);

impl Clock for FrozenClock {
    fn now(&self) -> u64 {
        self.0
    }
}

/// One constructor: `new(clock, retries)`
pub struct Widget {
    pub clock: Option<Arc<dyn Clock>>,
    pub retries: u32,
}

impl Injectable for Widget {
    fn constructors() -> Vec<Constructor<Self>> {
        vec![Constructor::new("new")
            .param::<Arc<dyn Clock>>()
            .value::<u32>()
            .build(|args| {
                Ok(Widget {
                    clock: args.next()?,
                    retries: args.value()?,
                })
            })]
    }
}

/// Records which constructor built it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Built {
    Empty,
    WithClock,
    WithMailer,
    WithBoth,
}

/// `new()`, `with_clock(clock)`, `with_mailer(mailer)`
pub struct Notifier {
    pub built: Built,
    pub clock: Option<Arc<dyn Clock>>,
    pub mailer: Option<Arc<dyn Mailer>>,
}

impl Injectable for Notifier {
    fn constructors() -> Vec<Constructor<Self>> {
        vec![
            Constructor::new("new").build(|_| {
                Ok(Notifier {
                    built: Built::Empty,
                    clock: None,
                    mailer: None,
                })
            }),
            Constructor::new("with_clock")
                .param::<Arc<dyn Clock>>()
                .build(|args| {
                    Ok(Notifier {
                        built: Built::WithClock,
                        clock: args.next()?,
                        mailer: None,
                    })
                }),
            Constructor::new("with_mailer")
                .param::<Arc<dyn Mailer>>()
                .build(|args| {
                    Ok(Notifier {
                        built: Built::WithMailer,
                        clock: None,
                        mailer: args.next()?,
                    })
                }),
        ]
    }
}

/// `with_clock(clock)` and `with_both(clock, mailer)`
pub struct Dispatcher {
    pub built: Built,
}

impl Injectable for Dispatcher {
    fn constructors() -> Vec<Constructor<Self>> {
        vec![
            Constructor::new("with_clock")
                .param::<Arc<dyn Clock>>()
                .build(|_| Ok(Dispatcher { built: Built::WithClock })),
            Constructor::new("with_both")
                .param::<Arc<dyn Clock>>()
                .param::<Arc<dyn Mailer>>()
                .build(|_| Ok(Dispatcher { built: Built::WithBoth })),
        ]
    }
}

/// Requires its mailer and sends a greeting on construction
pub struct Greeter {
    pub mailer: Arc<dyn Mailer>,
    pub delivered: bool,
}

impl Injectable for Greeter {
    fn constructors() -> Vec<Constructor<Self>> {
        vec![Constructor::new("new")
            .param::<Arc<dyn Mailer>>()
            .build(|args| {
                let mailer: Arc<dyn Mailer> = args.required()?;
                let delivered = mailer.send("new-user@example.com", "welcome");
                Ok(Greeter { mailer, delivered })
            })]
    }
}

/// A type with a fallible constructor
pub struct Session {
    pub token: String,
}

#[derive(Debug, thiserror::Error)]
#[error("token must not be empty")]
pub struct EmptyToken;

impl Injectable for Session {
    fn constructors() -> Vec<Constructor<Self>> {
        vec![Constructor::new("new")
            .value::<String>()
            .build(|args| {
                let token: String = args.value()?;
                if token.is_empty() {
                    return Err(automock_core::AutoMockError::invocation(EmptyToken));
                }
                Ok(Session { token })
            })]
    }
}
