use std::fmt::{Debug, Display, Formatter, Result as FmtResult};
use std::marker::PhantomData;

use crate::container::Managed;
use crate::key::Key;

/// A [`Key`] which still knows the type it identifies at compile time.
pub struct TypedKey<T>
where
    T: Managed,
{
    _marker: PhantomData<fn() -> T>,
}

impl<T> TypedKey<T>
where
    T: Managed,
{
    pub(crate) fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }

    /// Forgets the target type and returns the type-erased [`Key`].
    pub fn erase(self) -> Key {
        Key::new::<T>()
    }
}

impl<T> Clone for TypedKey<T>
where
    T: Managed,
{
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for TypedKey<T> where T: Managed {}

impl<T> Debug for TypedKey<T>
where
    T: Managed,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Display::fmt(self, f)
    }
}

impl<T> Display for TypedKey<T>
where
    T: Managed,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Display::fmt(&self.erase(), f)
    }
}
