//! Cache Key Module
//!
//! Builds the lookup key of a memoizable call from the identity of the
//! operation and the values of its arguments.

use std::any::Any;
use std::fmt;
use std::hash::{Hash, Hasher};

// == Operation Identity ==
/// Stable identifier of one operation of a wrapped target.
///
/// Two calls of the same operation must use equal identifiers; the
/// [`op_id!`](crate::op_id) macro qualifies a name with the calling module so
/// identifiers from different adapters do not collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OperationId(&'static str);

impl OperationId {
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub const fn name(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Builds a module-qualified [`OperationId`].
///
/// ```
/// use memoizer::op_id;
///
/// let op = op_id!(hash);
/// assert!(op.name().ends_with("::hash"));
/// ```
#[macro_export]
macro_rules! op_id {
    ($name:ident) => {
        $crate::OperationId::new(concat!(module_path!(), "::", stringify!($name)))
    };
    ($name:literal) => {
        $crate::OperationId::new(concat!(module_path!(), "::", $name))
    };
}

// == Arguments ==
/// Argument values of a call, compared and hashed by value.
///
/// Implemented for every `Hash + Eq` type; multi-argument operations pass a
/// tuple, which keeps the comparison order-sensitive.
pub trait Arguments: Any + Send + Sync + fmt::Debug {
    /// Value equality against arguments of any type. Different types are
    /// never equal.
    fn dyn_eq(&self, other: &dyn Arguments) -> bool;

    /// Feeds the argument values into `state`.
    fn dyn_hash(&self, state: &mut dyn Hasher);

    fn as_any(&self) -> &dyn Any;
}

impl<T> Arguments for T
where
    T: Hash + Eq + Send + Sync + fmt::Debug + 'static,
{
    fn dyn_eq(&self, other: &dyn Arguments) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .is_some_and(|other| self == other)
    }

    fn dyn_hash(&self, mut state: &mut dyn Hasher) {
        self.hash(&mut state);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// == Cache Key ==
/// Identifies one memoizable call: an operation plus its argument values.
pub struct CacheKey {
    operation: OperationId,
    arguments: Box<dyn Arguments>,
}

impl CacheKey {
    // == Constructor ==
    pub fn new<A: Arguments>(operation: OperationId, arguments: A) -> Self {
        Self {
            operation,
            arguments: Box::new(arguments),
        }
    }

    pub fn operation(&self) -> OperationId {
        self.operation
    }

    pub fn arguments(&self) -> &dyn Arguments {
        self.arguments.as_ref()
    }
}

impl PartialEq for CacheKey {
    fn eq(&self, other: &Self) -> bool {
        self.operation == other.operation && self.arguments.dyn_eq(other.arguments())
    }
}

impl Eq for CacheKey {}

impl Hash for CacheKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.operation.hash(state);
        self.arguments.dyn_hash(state);
    }
}

impl fmt::Debug for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheKey")
            .field("operation", &self.operation.name())
            .field("arguments", &self.arguments)
            .finish()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;
    use std::collections::HashMap;

    const SQUARE: OperationId = OperationId::new("square");
    const CUBE: OperationId = OperationId::new("cube");

    fn hash_of(key: &CacheKey) -> u64 {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_equal_arguments_give_equal_keys() {
        let a = CacheKey::new(SQUARE, (1u32, "x".to_string()));
        let b = CacheKey::new(SQUARE, (1u32, "x".to_string()));

        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn test_argument_order_matters() {
        let a = CacheKey::new(SQUARE, (1u32, 2u32));
        let b = CacheKey::new(SQUARE, (2u32, 1u32));
        assert_ne!(a, b);
    }

    #[test]
    fn test_argument_length_matters() {
        let a = CacheKey::new(SQUARE, vec![1u32, 2]);
        let b = CacheKey::new(SQUARE, vec![1u32, 2, 3]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_different_operations_give_different_keys() {
        let a = CacheKey::new(SQUARE, 3u64);
        let b = CacheKey::new(CUBE, 3u64);
        assert_ne!(a, b);
    }

    #[test]
    fn test_different_argument_types_never_equal() {
        let a = CacheKey::new(SQUARE, 3u64);
        let b = CacheKey::new(SQUARE, 3u32);
        assert_ne!(a, b);
    }

    #[test]
    fn test_unit_arguments() {
        assert_eq!(CacheKey::new(SQUARE, ()), CacheKey::new(SQUARE, ()));
    }

    #[test]
    fn test_key_as_map_key() {
        let mut map = HashMap::new();
        map.insert(CacheKey::new(SQUARE, "abc".to_string()), 1);

        assert_eq!(map.get(&CacheKey::new(SQUARE, "abc".to_string())), Some(&1));
        assert_eq!(map.get(&CacheKey::new(SQUARE, "abd".to_string())), None);
    }

    #[test]
    fn test_op_id_macro_is_module_qualified() {
        let by_ident = crate::op_id!(hash);
        let by_literal = crate::op_id!("hash");

        assert_eq!(by_ident, by_literal);
        assert_eq!(by_ident.name(), concat!(module_path!(), "::hash"));
    }

    #[test]
    fn test_debug_output() {
        let key = CacheKey::new(SQUARE, 7u8);
        assert_eq!(
            format!("{:?}", key),
            r#"CacheKey { operation: "square", arguments: 7 }"#
        );
    }
}
