use std::any::TypeId;

/// Registry key: the identity of a requested type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeKey {
    pub type_id: TypeId,
    pub type_name: &'static str,
}

impl TypeKey {
    /// Create a key for a type
    pub fn of<T: 'static + ?Sized>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
        }
    }

    /// Check if this key identifies `T`
    pub fn is<T: 'static + ?Sized>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    /// Get the type name as a string
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl std::fmt::Display for TypeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.type_name)
    }
}
