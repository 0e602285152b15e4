//! Name derivation from a value's type.

/// Returns a registry name for `value`, derived from its type path.
///
/// Deterministic and pure; never fails. The rendered path is a convenience,
/// not an identity guarantee: it is not promised to be unique across
/// distinct types that happen to render alike, nor stable across compiler
/// releases. Callers that need strict uniqueness should pass explicit names
/// to the registry instead.
pub fn name_of<T: ?Sized>(_value: &T) -> &'static str {
    core::any::type_name::<T>()
}
