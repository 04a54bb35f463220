use crate::config::ContainerOptions;
use crate::container::autowiring::{Arguments, Injectable};
use crate::container::registry::BindingRegistry;
use crate::container::resolver::{ConstructorResolver, ConstructorScore};
use crate::errors::{AutoMockError, Result};
use crate::mock::{Mock, MockBehavior, MockFactory, MockRepository, Mockable};
use std::any::TypeId;
use std::sync::Arc;
use uuid::Uuid;

/// Auto-mocking container for unit tests.
///
/// Builds the type under test through its best constructor, feeding it mocks
/// and registered fixtures, and verifies every mock it created once the
/// container goes out of scope.
pub struct AutoMockContainer<F: MockFactory = MockRepository> {
    id: Uuid,
    factory: F,
    bindings: BindingRegistry,
    verify_on_drop: bool,
    disposed: bool,
}

impl AutoMockContainer<MockRepository> {
    /// Create a container whose mocks use the default behavior
    pub fn new() -> Self {
        Self::with_behavior(MockBehavior::Default)
    }

    /// Create a container whose `Default` mocks take `behavior`
    pub fn with_behavior(behavior: MockBehavior) -> Self {
        Self::with_options(ContainerOptions::new().with_default_behavior(behavior))
    }

    /// Create a container from explicit options
    pub fn with_options(options: ContainerOptions) -> Self {
        let mut container = Self::with_factory(MockRepository::new(options.default_behavior));
        container.verify_on_drop = options.verify_on_drop;
        container
    }

    /// Create a container configured from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self::with_options(ContainerOptions::from_env()?))
    }
}

impl Default for AutoMockContainer<MockRepository> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: MockFactory> AutoMockContainer<F> {
    /// Create a container around an externally supplied mock factory
    pub fn with_factory(factory: F) -> Self {
        let id = Uuid::new_v4();
        tracing::debug!(container = %id, "created auto-mock container");

        Self {
            id,
            factory,
            bindings: BindingRegistry::new(),
            verify_on_drop: true,
            disposed: false,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Create a mock of `I` with the default behavior and bind `Arc<I>` to it
    pub fn mock<I: Mockable + ?Sized>(&mut self) -> Mock<I> {
        self.mock_with(MockBehavior::Default)
    }

    /// Create a mock of `I` with `behavior` and bind `Arc<I>` to its proxy.
    ///
    /// Every later resolution of `Arc<I>` yields the same proxy object.
    pub fn mock_with<I: Mockable + ?Sized>(&mut self, behavior: MockBehavior) -> Mock<I> {
        let mock = self.factory.create::<I>(behavior);
        self.bindings.bind_constant::<Arc<I>>(mock.object());
        mock
    }

    /// Create a loose mock of `I`, which never fails verification
    pub fn stub<I: Mockable + ?Sized>(&mut self) -> Mock<I> {
        self.mock_with(MockBehavior::Loose)
    }

    /// Bind `T` to a builder invoked on every resolution
    pub fn register<T, B>(&mut self, builder: B) -> &mut Self
    where
        T: 'static,
        B: Fn() -> T + 'static,
    {
        self.bindings.bind_dynamic(builder);
        self
    }

    /// Bind `T` to a fixed value; each resolution gets a clone
    pub fn register_instance<T: Clone + 'static>(&mut self, value: T) -> &mut Self {
        self.bindings.bind_constant(value);
        self
    }

    /// Build a `T` through its highest scoring constructor.
    ///
    /// Bound parameters are resolved from the registry, unbound value
    /// parameters get their default and unbound reference parameters are
    /// passed as absent.
    pub fn get<T: Injectable>(&self) -> Result<T> {
        let type_name = std::any::type_name::<T>();
        let constructors = T::constructors();
        let resolver = ConstructorResolver::new(&self.bindings);

        let index = resolver
            .select(&constructors)
            .ok_or_else(|| AutoMockError::no_constructor_found(type_name))?;
        let constructor = &constructors[index];
        tracing::debug!(
            container = %self.id,
            target_type = type_name,
            constructor = constructor.name(),
            score = resolver.score(constructor),
            "selected constructor"
        );

        let slots = constructor
            .parameters()
            .iter()
            .map(|parameter| {
                let value = match self.bindings.resolve(parameter.key.type_id) {
                    Some(value) => {
                        tracing::trace!(parameter = parameter.key.type_name, "resolved from binding");
                        Some(value)
                    }
                    None => {
                        tracing::trace!(parameter = parameter.key.type_name, "no binding");
                        parameter.fallback()
                    }
                };
                (parameter.key, value)
            })
            .collect();

        constructor.invoke(Arguments::new(slots))
    }

    /// Scores of `T`'s constructors against the current bindings
    pub fn explain<T: Injectable>(&self) -> Vec<ConstructorScore> {
        ConstructorResolver::new(&self.bindings).explain(&T::constructors())
    }

    /// Check if a type is bound
    pub fn is_bound<T: 'static + ?Sized>(&self) -> bool {
        self.bindings.contains(TypeId::of::<T>())
    }

    /// Get the number of bound types
    pub fn binding_count(&self) -> usize {
        self.bindings.len()
    }

    /// Verify every mock created by this container.
    ///
    /// Repeated calls report earlier failures again.
    pub fn verify(&self) -> Result<()> {
        self.factory.verify()
    }

    /// Run the one-time scope-end verification now.
    ///
    /// Later calls, and the eventual drop, do nothing.
    pub fn dispose(&mut self) -> Result<()> {
        if self.disposed {
            return Ok(());
        }
        self.disposed = true;
        tracing::debug!(container = %self.id, "disposing container");
        self.factory.verify()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    pub fn factory_mut(&mut self) -> &mut F {
        &mut self.factory
    }
}

impl<F: MockFactory> Drop for AutoMockContainer<F> {
    fn drop(&mut self) {
        if self.disposed || !self.verify_on_drop {
            return;
        }
        self.disposed = true;

        if let Err(error) = self.factory.verify() {
            if std::thread::panicking() {
                tracing::error!(container = %self.id, %error, "mock verification failed during unwind");
            } else {
                panic!("{}", error);
            }
        }
    }
}

impl<F: MockFactory> std::fmt::Debug for AutoMockContainer<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AutoMockContainer")
            .field("id", &self.id)
            .field("binding_count", &self.bindings.len())
            .field("verify_on_drop", &self.verify_on_drop)
            .field("disposed", &self.disposed)
            .finish()
    }
}
