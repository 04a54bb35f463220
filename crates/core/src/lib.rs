//! # automock-core
//!
//! An auto-mocking dependency-injection container for unit tests.
//!
//! The container keeps a registry of bindings from a requested type to a
//! producer of that type. Asking it for a type under test picks that type's
//! best constructor, fills each parameter from the registry (or with a
//! default), and builds the instance. Mocks created through the container are
//! verified once the container goes out of scope.
//!
//! Mocks are generated by `mockall`; a mocked trait opts in by implementing
//! [`Mockable`] for its trait object.
//!
//! ```ignore
//! let mut container = AutoMockContainer::new();
//! let clock = container.mock::<dyn Clock>();
//! clock.lock().expect_now().times(1).return_const(1_700_000_000u64);
//!
//! let widget = container.get::<Widget>()?;
//! widget.tick();
//! // verification runs when `container` is dropped
//! ```

pub mod config;
pub mod container;
pub mod errors;
pub mod mock;

pub use config::{ConfigError, ConfigSource, ContainerOptions};
pub use container::{
    Arguments, AutoMockContainer, BindingRegistry, Constructor, ConstructorScore, Injectable,
    ParameterInfo, TypeKey,
};
pub use errors::{AutoMockError, Result, VerificationFailure};
pub use mock::{Mock, MockBehavior, MockFactory, MockGuard, MockRepository, Mockable, SharedMock};

pub use mockall;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get crate version
pub fn version() -> &'static str {
    VERSION
}
