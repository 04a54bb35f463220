pub mod core;

pub use self::core::{AutoMockError, Result, VerificationFailure};
