//! Canonical call shapes.
//!
//! A delegate is declared with a canonical shape `fn(A1, ..., An) -> R`. That
//! function pointer type is never called directly: it is only used as a
//! compile-time description from which [`Signature`] derives
//!
//! - the tuple of argument types, used to pack arguments while they travel
//!   through generic strategy code,
//! - the output type, and
//! - the thunk type `unsafe fn(*const (), A1, ..., An) -> R` that is stored
//!   next to the untyped target pointer.
//!
//! Because Rust has no variadic generics, everything arity-dependent is
//! generated by [`signature_impls!`] for arities 0 through 12. Strategy code in
//! [`dispatch`](crate::dispatch) only ever sees the packed tuple and stays
//! arity-agnostic through [`Invoke`] and [`InvokeOn`].
//!
//! # Borrowed arguments
//!
//! `fn(&str) -> usize` written in a type position is higher-ranked
//! (`for<'x> fn(&'x str) -> usize`) and does not match these implementations.
//! Name the lifetime instead: `fn(&'a str) -> usize`.

use crate::dispatch::Dispatch;

/// Seals [`Signature`].
mod sealed {
    /// Restricts [`Signature`](super::Signature) to the implementations in
    /// this module.
    pub trait Sealed {}
}

/// A canonical call shape `fn(A1, ..., An) -> R`.
///
/// This trait is sealed. It is implemented for function pointer types with up
/// to 12 arguments.
pub trait Signature: Copy + sealed::Sealed {
    /// The arguments packed as a tuple, `(A1, ..., An)`.
    type Args;

    /// The return type `R`.
    type Output;

    /// The erased dispatch function, `unsafe fn(*const (), A1, ..., An) -> R`.
    type Thunk: Copy;

    /// Returns the thunk that dispatches through the strategy `D`.
    ///
    /// The returned function pointer is a monomorphization keyed by `D` and
    /// this shape. Within one crate, every request for the same `D` resolves
    /// to the same instance and therefore the same address. Different crates
    /// may each instantiate their own copy (optimized builds do not share
    /// generic instances), so thunks obtained in two crates for the same `D`
    /// can have different addresses.
    fn thunk<D>() -> Self::Thunk
    where
        D: Dispatch<Self::Args, Output = Self::Output>;

    /// Returns the address of a thunk, used for identity comparison and
    /// hashing.
    fn thunk_address(thunk: Self::Thunk) -> usize;

    /// Calls `thunk` with `target` and the unpacked arguments.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. `thunk` and `target` come from the same binding, i.e. calling the
    ///    thunk with this target upholds the contract of the strategy the
    ///    thunk was created for.
    unsafe fn call(thunk: Self::Thunk, target: *const (), args: Self::Args) -> Self::Output;
}

/// A callable invoked with its arguments packed in a tuple.
///
/// Implemented for every `F: Fn(A1, ..., An) -> R` with `Args = (A1, ...,
/// An)`, for up to 12 arguments.
pub trait Invoke<Args> {
    /// The callable's return type.
    type Output;

    /// Unpacks `args` and calls `self` with them.
    fn invoke(&self, args: Args) -> Self::Output;
}

/// A method-like callable invoked on a receiver with its remaining arguments
/// packed in a tuple.
///
/// Implemented for every `M: Fn(&T, A1, ..., An) -> R` with `Args = (A1, ...,
/// An)`, for up to 12 arguments. Method paths such as `Counter::increment`
/// are the typical implementors.
pub trait InvokeOn<T: ?Sized, Args> {
    /// The method's return type.
    type Output;

    /// Unpacks `args` and calls `self` with `receiver` prepended.
    fn invoke_on(&self, receiver: &T, args: Args) -> Self::Output;
}

/// A callable invoked through a unique reference with its arguments packed in
/// a tuple.
///
/// Implemented for every `F: FnMut(A1, ..., An) -> R` with `Args = (A1, ...,
/// An)`, for up to 12 arguments.
pub trait InvokeMut<Args> {
    /// The callable's return type.
    type Output;

    /// Unpacks `args` and calls `self` with them.
    fn invoke_mut(&mut self, args: Args) -> Self::Output;
}

/// A method-like callable invoked on a uniquely borrowed receiver with its
/// remaining arguments packed in a tuple.
///
/// Implemented for every `M: Fn(&mut T, A1, ..., An) -> R` with `Args = (A1,
/// ..., An)`, for up to 12 arguments. `Vec::push` is a typical implementor.
pub trait InvokeOnMut<T: ?Sized, Args> {
    /// The method's return type.
    type Output;

    /// Unpacks `args` and calls `self` with `receiver` prepended.
    fn invoke_on_mut(&self, receiver: &mut T, args: Args) -> Self::Output;
}

/// Generates [`Signature`], [`Invoke`], [`InvokeOn`], [`InvokeMut`] and
/// [`InvokeOnMut`] for one arity.
macro_rules! signature_impls {
    ($($arg:ident: $ty:ident),*) => {
        impl<R, $($ty,)*> sealed::Sealed for fn($($ty),*) -> R {}

        impl<R, $($ty,)*> Signature for fn($($ty),*) -> R {
            type Args = ($($ty,)*);
            type Output = R;
            type Thunk = unsafe fn(*const () $(, $ty)*) -> R;

            #[inline]
            fn thunk<D>() -> Self::Thunk
            where
                D: Dispatch<Self::Args, Output = Self::Output>,
            {
                /// Packs the arguments and hands them to the strategy `D`.
                ///
                /// # Safety
                ///
                /// The caller must ensure:
                ///
                /// 1. `target` upholds the contract of `D::dispatch`.
                unsafe fn thunk<D, R, $($ty,)*>(target: *const () $(, $arg: $ty)*) -> R
                where
                    D: Dispatch<($($ty,)*), Output = R>,
                {
                    // SAFETY:
                    // 1. Guaranteed by the caller
                    unsafe { D::dispatch(target, ($($arg,)*)) }
                }

                thunk::<D, R, $($ty,)*>
            }

            #[inline]
            fn thunk_address(thunk: Self::Thunk) -> usize {
                thunk as *const () as usize
            }

            #[inline]
            unsafe fn call(thunk: Self::Thunk, target: *const (), args: Self::Args) -> R {
                let ($($arg,)*) = args;
                // SAFETY:
                // 1. Guaranteed by the caller
                unsafe { thunk(target $(, $arg)*) }
            }
        }

        impl<F, R, $($ty,)*> Invoke<($($ty,)*)> for F
        where
            F: ?Sized + Fn($($ty),*) -> R,
        {
            type Output = R;

            #[inline]
            fn invoke(&self, ($($arg,)*): ($($ty,)*)) -> R {
                self($($arg),*)
            }
        }

        impl<M, T, R, $($ty,)*> InvokeOn<T, ($($ty,)*)> for M
        where
            M: ?Sized + Fn(&T $(, $ty)*) -> R,
            T: ?Sized,
        {
            type Output = R;

            #[inline]
            fn invoke_on(&self, receiver: &T, ($($arg,)*): ($($ty,)*)) -> R {
                self(receiver $(, $arg)*)
            }
        }

        impl<F, R, $($ty,)*> InvokeMut<($($ty,)*)> for F
        where
            F: ?Sized + FnMut($($ty),*) -> R,
        {
            type Output = R;

            #[inline]
            fn invoke_mut(&mut self, ($($arg,)*): ($($ty,)*)) -> R {
                self($($arg),*)
            }
        }

        impl<M, T, R, $($ty,)*> InvokeOnMut<T, ($($ty,)*)> for M
        where
            M: ?Sized + Fn(&mut T $(, $ty)*) -> R,
            T: ?Sized,
        {
            type Output = R;

            #[inline]
            fn invoke_on_mut(&self, receiver: &mut T, ($($arg,)*): ($($ty,)*)) -> R {
                self(receiver $(, $arg)*)
            }
        }
    };
}

signature_impls!();
signature_impls!(a1: A1);
signature_impls!(a1: A1, a2: A2);
signature_impls!(a1: A1, a2: A2, a3: A3);
signature_impls!(a1: A1, a2: A2, a3: A3, a4: A4);
signature_impls!(a1: A1, a2: A2, a3: A3, a4: A4, a5: A5);
signature_impls!(a1: A1, a2: A2, a3: A3, a4: A4, a5: A5, a6: A6);
signature_impls!(a1: A1, a2: A2, a3: A3, a4: A4, a5: A5, a6: A6, a7: A7);
signature_impls!(a1: A1, a2: A2, a3: A3, a4: A4, a5: A5, a6: A6, a7: A7, a8: A8);
signature_impls!(a1: A1, a2: A2, a3: A3, a4: A4, a5: A5, a6: A6, a7: A7, a8: A8, a9: A9);
signature_impls!(a1: A1, a2: A2, a3: A3, a4: A4, a5: A5, a6: A6, a7: A7, a8: A8, a9: A9, a10: A10);
signature_impls!(
    a1: A1, a2: A2, a3: A3, a4: A4, a5: A5, a6: A6, a7: A7, a8: A8, a9: A9, a10: A10, a11: A11
);
signature_impls!(
    a1: A1, a2: A2, a3: A3, a4: A4, a5: A5, a6: A6, a7: A7, a8: A8, a9: A9, a10: A10, a11: A11,
    a12: A12
);
