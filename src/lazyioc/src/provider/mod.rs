//! Construction recipes, one per bound type.
//!
//! Whatever way a type is bound, the container ends up holding a
//! [`Factory`] for it and sees it only through the type-erased [`Provider`]
//! trait.

pub mod component;
mod factory;
mod inject;

use std::error::Error;
use std::fmt::Debug;

use crate::container::injector::{Injector, InjectorError};
use crate::container::SharedObject;
use crate::key::Key;

pub use factory::Factory;
pub use inject::Inject;

/// The error a factory reports when it fails on its own, after all of its
/// dependencies were resolved.
pub type BoxError = Box<dyn Error + Send + Sync>;

/// A factory with its output type erased.
pub trait Provider: Debug + Send + Sync + 'static {
    /// Builds a new object for `key`, asking `injector` for dependencies.
    ///
    /// # Errors
    ///
    /// Returns the error of a dependency unchanged, or
    /// [`InjectorError::ObjectConstruction`] naming `key` if the factory
    /// itself fails.
    fn provide(&self, injector: &dyn Injector, key: &Key) -> Result<SharedObject, InjectorError>;

    /// How the factory was bound, for diagnostics.
    fn origin(&self) -> &'static str;
}
