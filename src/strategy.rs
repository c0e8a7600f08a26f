//! The binding strategy types.
//!
//! These types only appear as the type parameter of a
//! [`Binding`](crate::Binding), and are never constructed. They are exported
//! so that functions returning bindings can name them:
//!
//! ```
//! use delegate::{Binding, Delegate, strategy::ByRef};
//!
//! fn by_reference<F: Fn(u8) -> u8>(callable: &F) -> Binding<'_, ByRef<F>> {
//!     Binding::callable(callable)
//! }
//!
//! let step = 1;
//! let add_step = |x: u8| x + step;
//! let delegate: Delegate<'_, fn(u8) -> u8> = by_reference(&add_step).into();
//! assert_eq!(delegate.call(1), 2);
//! ```

pub use delegate_internals::{
    ByMut, ByRef, Discard, Dispatch, Fixed, FixedMethod, Hooked, OnMethod, OnMethodMut, Pointer,
};
