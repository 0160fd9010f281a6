//! Utility traits for working with type-erased values.

use std::any::Any;

/// Extension trait to allow downcasting trait objects to concrete types.
pub trait AsAny {
    /// Get a reference to self as Any.
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Value equality across trait objects.
///
/// Two values are equal only when they share a concrete type and that type's
/// `PartialEq` says so.
pub trait DynEq {
    /// Compare against another type-erased value.
    fn dyn_eq(&self, other: &dyn Any) -> bool;
}

impl<T: PartialEq + Any> DynEq for T {
    fn dyn_eq(&self, other: &dyn Any) -> bool {
        other.downcast_ref::<T>().map_or(false, |other| self == other)
    }
}

/// Short type name for log and error messages (`alloc::string::String` -> `String`).
pub(crate) fn short_type_name(full: &str) -> &str {
    let head = full.split('<').next().unwrap_or(full);
    match head.rfind("::") {
        Some(pos) => &full[pos + 2..],
        None => full,
    }
}
