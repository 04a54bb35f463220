pub mod behavior;
pub mod handle;
pub mod repository;
pub mod shared;

pub use behavior::MockBehavior;
pub use handle::{Mock, Mockable};
pub use repository::{MockFactory, MockRepository};
pub use shared::{MockGuard, SharedMock};
