pub mod injector;
pub(crate) mod registry;

mod core;
mod handle;

use std::any::Any;
use std::sync::Arc;

pub use handle::Container;

/// Types that a [`Container`] can construct and share between threads.
pub trait Managed: Any + Send + Sync {}

impl<T> Managed for T where T: Any + Send + Sync {}

/// A constructed object with its type erased, as cached by a [`Container`].
pub type SharedObject = Arc<dyn Any + Send + Sync>;
