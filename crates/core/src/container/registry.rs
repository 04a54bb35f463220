use crate::container::descriptor::TypeKey;
use std::any::{Any, TypeId};
use std::collections::HashMap;

/// A precomputed value handed out again on every resolution
pub trait SharedValue {
    /// A copy of the value. For `Arc`s this shares the allocation.
    fn share(&self) -> Box<dyn Any>;
}

impl<T: Clone + 'static> SharedValue for T {
    fn share(&self) -> Box<dyn Any> {
        Box::new(self.clone())
    }
}

/// How a bound type is produced
pub enum Producer {
    /// Same value on every resolution
    Constant(Box<dyn SharedValue>),
    /// Builder invoked on every resolution
    Dynamic(Box<dyn Fn() -> Box<dyn Any>>),
}

impl Producer {
    /// Produce one value
    pub fn resolve(&self) -> Box<dyn Any> {
        match self {
            Producer::Constant(value) => (**value).share(),
            Producer::Dynamic(builder) => builder(),
        }
    }

    pub fn is_constant(&self) -> bool {
        matches!(self, Producer::Constant(_))
    }
}

impl std::fmt::Debug for Producer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Producer::Constant(_) => f.debug_tuple("Constant").field(&"<value>").finish(),
            Producer::Dynamic(_) => f.debug_tuple("Dynamic").field(&"<builder>").finish(),
        }
    }
}

/// Registry from a requested type to its producer.
///
/// Holds at most one producer per type; binding again replaces the previous one.
#[derive(Debug, Default)]
pub struct BindingRegistry {
    bindings: HashMap<TypeId, (TypeKey, Producer)>,
}

impl BindingRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `T` to a constant value
    pub fn bind_constant<T: Clone + 'static>(&mut self, value: T) {
        self.bind(TypeKey::of::<T>(), Producer::Constant(Box::new(value)));
    }

    /// Bind `T` to a builder run on every resolution
    pub fn bind_dynamic<T, F>(&mut self, builder: F)
    where
        T: 'static,
        F: Fn() -> T + 'static,
    {
        let builder: Box<dyn Fn() -> Box<dyn Any>> =
            Box::new(move || Box::new(builder()) as Box<dyn Any>);
        self.bind(TypeKey::of::<T>(), Producer::Dynamic(builder));
    }

    /// Bind a producer under `key`, replacing any earlier binding
    pub fn bind(&mut self, key: TypeKey, producer: Producer) {
        let kind = if producer.is_constant() { "constant" } else { "dynamic" };
        match self.bindings.insert(key.type_id, (key, producer)) {
            Some(_) => tracing::debug!(binding = key.type_name, kind, "replaced binding"),
            None => tracing::debug!(binding = key.type_name, kind, "added binding"),
        }
    }

    /// Produce a value for `type_id`, if bound
    pub fn resolve(&self, type_id: TypeId) -> Option<Box<dyn Any>> {
        self.bindings
            .get(&type_id)
            .map(|(_, producer)| producer.resolve())
    }

    /// Check if a type is bound
    pub fn contains(&self, type_id: TypeId) -> bool {
        self.bindings.contains_key(&type_id)
    }

    /// Get the number of bindings
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Keys of every bound type
    pub fn keys(&self) -> Vec<TypeKey> {
        self.bindings.values().map(|(key, _)| *key).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;
    use std::sync::Arc;

    #[test]
    fn test_constant_binding_shares_allocation() {
        let mut registry = BindingRegistry::new();
        let value = Arc::new(String::from("fixture"));
        registry.bind_constant(Arc::clone(&value));

        let first = registry.resolve(TypeId::of::<Arc<String>>()).unwrap();
        let second = registry.resolve(TypeId::of::<Arc<String>>()).unwrap();

        let first = first.downcast::<Arc<String>>().unwrap();
        let second = second.downcast::<Arc<String>>().unwrap();
        assert!(Arc::ptr_eq(&first, &value));
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_dynamic_binding_runs_builder_each_time() {
        let mut registry = BindingRegistry::new();
        let counter = Rc::new(Cell::new(0u32));
        let seen = Rc::clone(&counter);
        registry.bind_dynamic(move || {
            seen.set(seen.get() + 1);
            seen.get()
        });

        let first = *registry.resolve(TypeId::of::<u32>()).unwrap().downcast::<u32>().unwrap();
        let second = *registry.resolve(TypeId::of::<u32>()).unwrap().downcast::<u32>().unwrap();

        assert_eq!((first, second), (1, 2));
        assert_eq!(counter.get(), 2);
    }

    #[test]
    fn test_last_binding_wins() {
        let mut registry = BindingRegistry::new();
        registry.bind_constant(1u8);
        registry.bind_dynamic(|| 2u8);

        assert_eq!(registry.len(), 1);
        let value = registry.resolve(TypeId::of::<u8>()).unwrap();
        assert_eq!(*value.downcast::<u8>().unwrap(), 2);
    }

    #[test]
    fn test_unbound_type_resolves_to_none() {
        let registry = BindingRegistry::new();

        assert!(registry.is_empty());
        assert!(!registry.contains(TypeId::of::<u8>()));
        assert!(registry.resolve(TypeId::of::<u8>()).is_none());
    }
}
