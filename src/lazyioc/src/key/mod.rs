mod typed;

use std::any::{self, TypeId};
use std::fmt::{Debug, Display, Formatter, Result as FmtResult};
use std::hash::{Hash, Hasher};

use crate::container::Managed;

pub use typed::TypedKey;

/// The type-erased identity of a bound type.
///
/// Two keys are equal if and only if they identify exactly the same type.
/// There is no notion of supertypes or qualifiers, so two structurally
/// identical but distinct types are always distinct keys.
#[derive(Clone, Copy)]
pub struct Key {
    target: TypeId,
    type_name: &'static str,
}

impl Key {
    pub(crate) fn new<T: Managed>() -> Self {
        Self {
            target: TypeId::of::<T>(),
            type_name: any::type_name::<T>(),
        }
    }

    /// Returns the [`TypeId`] of the identified type.
    pub fn target(&self) -> TypeId {
        self.target
    }

    /// Returns the name of the identified type, for diagnostics only.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        self.target == other.target
    }
}

impl Eq for Key {}

impl Hash for Key {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.target.hash(state);
    }
}

impl Debug for Key {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Display::fmt(self, f)
    }
}

impl Display for Key {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.type_name)
    }
}

impl<T: Managed> From<TypedKey<T>> for Key {
    fn from(key: TypedKey<T>) -> Self {
        key.erase()
    }
}

/// Returns the key identifying `T`.
pub fn of<T>() -> TypedKey<T>
where
    T: Managed,
{
    TypedKey::new()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    struct Meters;

    struct Seconds;

    #[test]
    fn key_eq_succeeds_when_types_are_identical() {
        assert_eq!(Key::new::<i32>(), Key::new::<i32>());
        assert_eq!(of::<String>().erase(), Key::new::<String>());
    }

    #[test]
    fn key_eq_fails_when_types_are_structurally_identical() {
        assert_ne!(Key::new::<Meters>(), Key::new::<Seconds>());
        assert_ne!(Key::new::<i32>(), Key::new::<u32>());
    }

    #[test]
    fn key_hash_succeeds() {
        let keys = HashSet::from([
            Key::new::<Meters>(),
            Key::new::<Seconds>(),
            Key::new::<Meters>(),
        ]);
        assert_eq!(keys.len(), 2);
    }

    #[test]
    fn key_display_succeeds() {
        assert_eq!(Key::new::<i32>().to_string(), "i32");
        assert!(Key::new::<Meters>().to_string().ends_with("Meters"));
    }
}
