//! Commonly used items for convenient importing.
//!
//! The prelude module re-exports the most frequently used types, traits, and
//! macros from the delegate library. This allows you to import everything you
//! need with a single use statement.
//!
//! # Usage
//!
//! ```rust
//! use delegate::prelude::*;
//!
//! fn apply_all(values: &mut [i32], step: Delegate<'_, fn(i32) -> i32>) {
//!     for value in values {
//!         *value = step.call(*value);
//!     }
//! }
//!
//! let mut values = [1, 2, 3];
//! apply_all(&mut values, bind_const!(|x: i32| x * 10).into());
//! assert_eq!(values, [10, 20, 30]);
//! ```
//!
//! # What's Included
//!
//! - **[`Delegate`]**: The two-word callable reference
//! - **[`Binding`]**: The capture step that produces delegates
//! - **[`bind!`]** and **[`bind_const!`]**: Macros for creating bindings
//! - **[`DelegateFor`]** and **[`Shape`]**: Naming delegates after function
//!   types
//! - **[`EmptyDelegateError`]**: The error of [`Delegate::try_call`]
//! - **[`markers`]**: Thread-safety markers

pub use crate::{
    Binding, Delegate, DelegateFor, EmptyDelegateError, Shape, bind, bind_const, markers,
};
