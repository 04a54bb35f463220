pub mod autowiring;
#[allow(clippy::module_inception)]
pub mod container;
pub mod descriptor;
pub mod registry;
pub mod resolver;

pub use autowiring::{Arguments, Constructor, ConstructorBuilder, Injectable, ParameterInfo, ParameterKind};
pub use container::AutoMockContainer;
pub use descriptor::TypeKey;
pub use registry::{BindingRegistry, Producer, SharedValue};
pub use resolver::{ConstructorResolver, ConstructorScore};
