use crate::container::descriptor::TypeKey;
use crate::errors::{AutoMockError, Result};
use std::any::Any;

/// Types the container can build by constructor injection.
///
/// Rust has no runtime view of constructors, so a type publishes them
/// explicitly, in declaration order. That order decides ties between
/// equally scored constructors.
pub trait Injectable: Sized + 'static {
    /// Every constructor the container may choose from
    fn constructors() -> Vec<Constructor<Self>>;
}

/// How an unbound parameter is filled in
#[derive(Debug, Clone, Copy)]
pub enum ParameterKind {
    /// Left absent (`None`) when nothing is bound
    Reference,
    /// Filled with the type's default value when nothing is bound
    Value(fn() -> Box<dyn Any>),
}

/// Metadata about a constructor parameter
#[derive(Debug, Clone, Copy)]
pub struct ParameterInfo {
    /// The type the parameter requests
    pub key: TypeKey,
    pub kind: ParameterKind,
}

impl ParameterInfo {
    /// A parameter that is absent unless bound
    pub fn reference<T: 'static>() -> Self {
        Self {
            key: TypeKey::of::<T>(),
            kind: ParameterKind::Reference,
        }
    }

    /// A parameter that falls back to `T::default()`
    pub fn value<T: Default + 'static>() -> Self {
        Self {
            key: TypeKey::of::<T>(),
            kind: ParameterKind::Value(default_boxed::<T>),
        }
    }

    /// The value used when the parameter is not bound
    pub fn fallback(&self) -> Option<Box<dyn Any>> {
        match self.kind {
            ParameterKind::Reference => None,
            ParameterKind::Value(default) => Some(default()),
        }
    }

    pub fn is_value(&self) -> bool {
        matches!(self.kind, ParameterKind::Value(_))
    }
}

fn default_boxed<T: Default + 'static>() -> Box<dyn Any> {
    Box::new(T::default())
}

type ConstructorBody<T> = Box<dyn Fn(&mut Arguments) -> Result<T>>;

/// One way of building a `T` from positional arguments
pub struct Constructor<T> {
    name: &'static str,
    parameters: Vec<ParameterInfo>,
    body: ConstructorBody<T>,
}

impl Constructor<()> {
    /// Start describing a constructor called `name`
    pub fn new(name: &'static str) -> ConstructorBuilder {
        ConstructorBuilder {
            name,
            parameters: Vec::new(),
        }
    }
}

impl<T> Constructor<T> {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn parameters(&self) -> &[ParameterInfo] {
        &self.parameters
    }

    pub fn parameter_count(&self) -> usize {
        self.parameters.len()
    }

    /// Run the constructor body
    pub fn invoke(&self, mut arguments: Arguments) -> Result<T> {
        (self.body)(&mut arguments)
    }
}

impl<T> std::fmt::Debug for Constructor<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Constructor")
            .field("name", &self.name)
            .field("parameters", &self.parameters)
            .finish()
    }
}

/// Builder for a [`Constructor`]'s parameter list
#[derive(Debug)]
pub struct ConstructorBuilder {
    name: &'static str,
    parameters: Vec<ParameterInfo>,
}

impl ConstructorBuilder {
    /// Append a parameter that is absent unless bound
    pub fn param<P: 'static>(mut self) -> Self {
        self.parameters.push(ParameterInfo::reference::<P>());
        self
    }

    /// Append a parameter that defaults to `P::default()` unless bound
    pub fn value<P: Default + 'static>(mut self) -> Self {
        self.parameters.push(ParameterInfo::value::<P>());
        self
    }

    /// Finish with the body that consumes the arguments in order
    pub fn build<T, F>(self, body: F) -> Constructor<T>
    where
        F: Fn(&mut Arguments) -> Result<T> + 'static,
    {
        Constructor {
            name: self.name,
            parameters: self.parameters,
            body: Box::new(body),
        }
    }
}

/// Positional constructor arguments, read front to back
pub struct Arguments {
    slots: Vec<(TypeKey, Option<Box<dyn Any>>)>,
    cursor: usize,
}

impl Arguments {
    pub fn new(slots: Vec<(TypeKey, Option<Box<dyn Any>>)>) -> Self {
        Self { slots, cursor: 0 }
    }

    /// Take the next argument, `None` if it is absent
    pub fn next<T: 'static>(&mut self) -> Result<Option<T>> {
        let index = self.cursor;
        let (key, slot) = self
            .slots
            .get_mut(index)
            .ok_or(AutoMockError::MissingArgument {
                index,
                type_name: std::any::type_name::<T>(),
            })?;

        if !key.is::<T>() {
            return Err(AutoMockError::TypeMismatch {
                index,
                expected: std::any::type_name::<T>(),
                actual: key.type_name,
            });
        }

        self.cursor += 1;
        match slot.take() {
            Some(value) => value
                .downcast::<T>()
                .map(|value| Some(*value))
                .map_err(|_| AutoMockError::TypeMismatch {
                    index,
                    expected: std::any::type_name::<T>(),
                    actual: key.type_name,
                }),
            None => Ok(None),
        }
    }

    /// Take the next argument, failing if it is absent
    pub fn required<T: 'static>(&mut self) -> Result<T> {
        let index = self.cursor;
        self.next::<T>()?.ok_or(AutoMockError::MissingArgument {
            index,
            type_name: std::any::type_name::<T>(),
        })
    }

    /// Take the next value parameter
    pub fn value<T: 'static>(&mut self) -> Result<T> {
        self.required()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Arguments not yet taken
    pub fn remaining(&self) -> usize {
        self.slots.len() - self.cursor
    }
}

impl std::fmt::Debug for Arguments {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let slots: Vec<String> = self
            .slots
            .iter()
            .map(|(key, slot)| match slot {
                Some(_) => key.type_name.to_string(),
                None => format!("{} (absent)", key.type_name),
            })
            .collect();
        f.debug_struct("Arguments")
            .field("slots", &slots)
            .field("cursor", &self.cursor)
            .finish()
    }
}
