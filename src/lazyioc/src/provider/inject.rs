use crate::container::injector::{Dependency, Injector, InjectorError};
use crate::container::Managed;
use crate::provider::BoxError;

/// A closure whose arguments the injector can supply.
///
/// `Args` is the tuple of the closure's argument types, each of them a
/// [`Dependency`] such as `Arc<D>`. Closures of up to 12 arguments returning
/// `Result<T, E>` implement this trait.
pub trait Inject<Args>: Send + Sync + 'static {
    type Output: Managed;

    type Error: Into<BoxError>;

    /// Resolves every argument from `injector` in order, then calls the
    /// closure.
    ///
    /// # Errors
    ///
    /// Returns the first error met while resolving the arguments. The
    /// closure's own error comes back inside the outer [`Ok`].
    fn inject(
        &self,
        injector: &dyn Injector,
    ) -> Result<Result<Self::Output, Self::Error>, InjectorError>;
}

macro_rules! impl_inject {
    ($($arg:ident),*) => {
        impl<F, T, E, $($arg,)*> Inject<($($arg,)*)> for F
        where
            F: Fn($($arg),*) -> Result<T, E> + Send + Sync + 'static,
            T: Managed,
            E: Into<BoxError>,
            $($arg: Dependency,)*
        {
            type Output = T;

            type Error = E;

            #[allow(unused_variables)]
            fn inject(&self, injector: &dyn Injector) -> Result<Result<T, E>, InjectorError> {
                Ok(self($(<$arg as Dependency>::resolve(injector)?),*))
            }
        }
    };
}

macro_rules! impl_inject_down_to_zero {
    () => {
        impl_inject!();
    };
    ($head:ident $(, $tail:ident)*) => {
        impl_inject!($head $(, $tail)*);
        impl_inject_down_to_zero!($($tail),*);
    };
}

impl_inject_down_to_zero!(A1, A2, A3, A4, A5, A6, A7, A8, A9, A10, A11, A12);
