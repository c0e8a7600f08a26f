//! Normalization of function-like types into a canonical call shape.
//!
//! A [`Delegate`] is always declared with a canonical [`Signature`]
//! `fn(A1, ..., An) -> R`. The [`Shape`] trait derives that canonical form
//! from other function-like types, so that generic code can name "a delegate
//! that fits this function" without spelling the arguments out again:
//!
//! | shape | canonical form |
//! |---|---|
//! | `fn(A..) -> R` | `fn(A..) -> R` |
//! | `unsafe fn(A..) -> R` | `fn(A..) -> R` |
//! | `extern "C" fn(A..) -> R` | `fn(A..) -> R` |
//! | `unsafe extern "C" fn(A..) -> R` | `fn(A..) -> R` |
//! | `Method<fn(&T, A..) -> R>` (any of the qualifiers above) | `fn(A..) -> R` |
//! | `Method<fn(&mut T, A..) -> R>` (any of the qualifiers above) | `fn(A..) -> R` |
//! | `Delegate<'_, S, _>` | `S` |
//!
//! Shapes with up to 12 arguments (not counting the receiver) are supported.
//! `Method<fn(&mut T, ..)>` describes the delegates produced by
//! [`Binding::method_mut`](crate::Binding::method_mut).
//! Any other ABI or qualifier fails to satisfy the trait bound.
//!
//! # Examples
//!
//! ```
//! use delegate::{DelegateFor, Method, ShapeOf, prelude::*};
//!
//! struct Counter {
//!     count: core::sync::atomic::AtomicU32,
//! }
//!
//! impl Counter {
//!     fn add(&self, by: u32) -> u32 {
//!         self.count.fetch_add(by, core::sync::atomic::Ordering::Relaxed) + by
//!     }
//! }
//!
//! static_assertions::assert_type_eq_all!(ShapeOf<unsafe extern "C" fn(u32) -> u32>, fn(u32) -> u32);
//! static_assertions::assert_type_eq_all!(ShapeOf<Method<fn(&Counter, u32) -> u32>>, fn(u32) -> u32);
//!
//! let counter = Counter { count: 0.into() };
//! let delegate: DelegateFor<'_, Method<fn(&Counter, u32) -> u32>> =
//!     bind!(counter, Counter::add).into();
//! assert_eq!(delegate.call(3), 3);
//! ```
//!
//! [`Delegate`]: crate::Delegate
//! [`Signature`]: delegate_internals::Signature

use core::marker::PhantomData;

use delegate_internals::Signature;

use crate::{Delegate, markers::SendSync};

/// A function-like type that normalizes to a canonical [`Signature`].
///
/// See the [module-level documentation](self) for the supported shapes.
pub trait Shape {
    /// The canonical `fn(A1, ..., An) -> R` form of this shape.
    type Canonical: Signature;
}

/// The canonical signature of the shape `X`.
pub type ShapeOf<X> = <X as Shape>::Canonical;

/// The delegate type that fits the shape `X`.
pub type DelegateFor<'a, X, T = SendSync> = Delegate<'a, ShapeOf<X>, T>;

/// Describes a method: a function-like type whose first parameter is the
/// receiver and is not part of the canonical shape.
///
/// This type is only used at the type level and cannot be constructed.
pub struct Method<F>(PhantomData<F>, core::convert::Infallible);

mod sealed_fn_pointer {
    pub trait Sealed: Copy + 'static {}
}

/// Safe function pointer types that can be stored directly in a delegate with
/// [`Binding::pointer`](crate::Binding::pointer).
///
/// Implemented for safe Rust-ABI function pointers `fn(A..) -> R` with up to 12
/// arguments, the ones that implement the `Fn` traits. Bind any other
/// function pointer through a closure that calls it.
///
/// This trait is sealed and cannot be implemented outside of this crate.
pub trait FnPointer: sealed_fn_pointer::Sealed {}

/// Generates [`Shape`] and [`FnPointer`] for one arity.
macro_rules! shape_impls {
    (@qualified [$($qualifier:tt)*] $($ty:ident),*) => {
        impl<R, $($ty,)*> Shape for $($qualifier)* fn($($ty),*) -> R {
            type Canonical = fn($($ty),*) -> R;
        }

        impl<Receiver: ?Sized, R, $($ty,)*> Shape
            for Method<$($qualifier)* fn(&Receiver $(, $ty)*) -> R>
        {
            type Canonical = fn($($ty),*) -> R;
        }

        impl<Receiver: ?Sized, R, $($ty,)*> Shape
            for Method<$($qualifier)* fn(&mut Receiver $(, $ty)*) -> R>
        {
            type Canonical = fn($($ty),*) -> R;
        }
    };
    ($($ty:ident),*) => {
        shape_impls!(@qualified [] $($ty),*);
        shape_impls!(@qualified [unsafe] $($ty),*);
        shape_impls!(@qualified [extern "C"] $($ty),*);
        shape_impls!(@qualified [unsafe extern "C"] $($ty),*);

        impl<R: 'static, $($ty: 'static,)*> sealed_fn_pointer::Sealed for fn($($ty),*) -> R {}
        impl<R: 'static, $($ty: 'static,)*> FnPointer for fn($($ty),*) -> R {}
    };
}

shape_impls!();
shape_impls!(A1);
shape_impls!(A1, A2);
shape_impls!(A1, A2, A3);
shape_impls!(A1, A2, A3, A4);
shape_impls!(A1, A2, A3, A4, A5);
shape_impls!(A1, A2, A3, A4, A5, A6);
shape_impls!(A1, A2, A3, A4, A5, A6, A7);
shape_impls!(A1, A2, A3, A4, A5, A6, A7, A8);
shape_impls!(A1, A2, A3, A4, A5, A6, A7, A8, A9);
shape_impls!(A1, A2, A3, A4, A5, A6, A7, A8, A9, A10);
shape_impls!(A1, A2, A3, A4, A5, A6, A7, A8, A9, A10, A11);
shape_impls!(A1, A2, A3, A4, A5, A6, A7, A8, A9, A10, A11, A12);

impl<'a, S: Signature, T> Shape for Delegate<'a, S, T> {
    type Canonical = S;
}
