#![allow(clippy::new_without_default)]

pub mod container;
pub mod key;
pub mod module;
pub mod provider;

pub use lazyioc_derive::component;

pub mod prelude {
    pub use crate::component;
    pub use crate::container::injector::{Injector, InjectorError, TypedInjector};
    pub use crate::container::Container;
    pub use crate::key;
    pub use crate::module::{bind, Module};
    pub use crate::provider::component::Component;
}
