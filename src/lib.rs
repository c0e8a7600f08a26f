#![cfg_attr(not(doc), no_std)]
#![deny(
    missing_docs,
    clippy::alloc_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::std_instead_of_core,
    clippy::missing_safety_doc,
    clippy::undocumented_unsafe_blocks,
    clippy::multiple_unsafe_ops_per_block,
    clippy::as_ptr_cast_mut,
    clippy::ptr_as_ptr,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::broken_intra_doc_links,
    missing_copy_implementations,
    unused_doc_comments
)]
// Extra checks on nightly
#![cfg_attr(nightly_extra_checks, feature(rustdoc_missing_doc_code_examples))]
#![cfg_attr(nightly_extra_checks, forbid(rustdoc::missing_doc_code_examples))]
// Make docs.rs generate better docs
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Non-owning, type-erased, two-word references to callables.
//!
//! ## Overview
//!
//! A [`Delegate`] is a handle to "a way to call something that already
//! exists": a closure, a function, an object with a method you pick. It does
//! not own, copy, or extend the life of what it is bound to. It is two machine
//! words, `Copy`, never allocates, and is compared and hashed by the identity
//! of its target.
//!
//! This makes it the opposite design point to `Box<dyn Fn>`: you pass a
//! uniform, cheap handle across an API boundary while the caller keeps
//! ownership, and the borrow checker makes sure the handle does not outlive
//! the target.
//!
//! ## Quick Example
//!
//! ```
//! use core::sync::atomic::{AtomicU32, Ordering};
//!
//! use delegate::prelude::*;
//!
//! struct Counter {
//!     count: AtomicU32,
//! }
//!
//! impl Counter {
//!     fn increment(&self) {
//!         self.count.fetch_add(1, Ordering::Relaxed);
//!     }
//! }
//!
//! fn run_twice(callback: Delegate<'_, fn()>) {
//!     callback.call();
//!     callback.call();
//! }
//!
//! let counter = Counter { count: AtomicU32::new(0) };
//! run_twice(bind!(counter, Counter::increment).into());
//! assert_eq!(counter.count.load(Ordering::Relaxed), 2);
//! ```
//!
//! ## Binding Strategies
//!
//! A delegate is created in two steps. First a [`Binding`] captures *what* to
//! call and *how*; then the binding is materialized into a delegate of a
//! concrete shape with `.into()` (or [`Binding::into_delegate`]). One binding
//! can produce delegates of several shapes, as long as the target can be
//! called with each of them.
//!
//! | strategy | constructor | macro | must stay alive |
//! |---|---|---|---|
//! | callable object | [`Binding::callable`] | `bind!(object)` | the object |
//! | method of an object | [`Binding::method`] | `bind!(object, Type::method)` | the object |
//! | callable object, uniquely borrowed | [`Binding::callable_mut`] (`unsafe`) | | the object |
//! | `&mut self` method of an object | [`Binding::method_mut`] (`unsafe`) | | the object |
//! | function pointer | [`Binding::pointer`] | | nothing |
//! | compile-time-fixed callable | [`Binding::function`] | `bind_const!(function)` | nothing |
//! | method of a constant | [`Binding::constant_method`] | `bind_const!(value, Type::method)` | nothing |
//!
//! Two adapters can be layered over any strategy:
//! [`discard_output`](Binding::discard_output) lets a target with a return
//! value back a delegate returning `()`, and [`hooked`](Binding::hooked)
//! routes every call through an [`InvocationHook`](hooks::InvocationHook).
//!
//! Methods and compile-time-fixed callables must be zero-sized (function
//! items, method paths, non-capturing closures): their type is their identity,
//! and the thunk recreates them on every call. Generic functions act like
//! overload sets, resolved by the shape of the delegate:
//!
//! ```
//! use delegate::prelude::*;
//!
//! let bytes: Delegate<'static, fn(u8, u8) -> u8> = bind_const!(core::cmp::max).into();
//! let words: Delegate<'static, fn(u64, u64) -> u64> = bind_const!(core::cmp::max).into();
//! assert_eq!(bytes.call(3, 7), 7);
//! assert_eq!(words.call(3, 7), 7);
//! ```
//!
//! ## Calling
//!
//! - [`call`](Delegate::call) panics on an empty delegate, like indexing out
//!   of bounds.
//! - [`try_call`](Delegate::try_call) returns [`EmptyDelegateError`] instead.
//! - [`call_unchecked`](Delegate::call_unchecked) is `unsafe` and does no
//!   check at all outside of a debug assertion.
//! - [`invoke`](Delegate::invoke) and its variants take the arguments packed
//!   in a tuple, for generic code.
//!
//! ## Shapes
//!
//! The shape of a delegate is always written `fn(A1, ..., An) -> R`, with up
//! to 12 arguments. Arguments that borrow need a named lifetime
//! (`fn(&'a str)`), since `fn(&str)` is a higher-ranked type. The [`Shape`]
//! trait maps other function-like types, such as `unsafe extern "C" fn`
//! pointers or [`Method`] descriptors, to that canonical form.
//!
//! ## Thread Safety
//!
//! [`Delegate<'a, S, T>`](Delegate) carries a [thread-safety
//! marker](markers) `T`. The default, [`SendSync`](markers::SendSync), makes
//! the delegate `Send + Sync` and requires the bound target to be `Sync`;
//! [`Local`](markers::Local) accepts any target.
//!
//! ## Mutation
//!
//! A delegate is `Copy`, so the safe constructors only ever borrow their
//! target shared. Targets that need to change state use interior mutability:
//! atomics or locks for `SendSync` delegates, `Cell` or `RefCell` for `Local`
//! ones.
//!
//! [`Binding::callable_mut`] and [`Binding::method_mut`] bind through a
//! unique reference instead (an `FnMut` closure, or a method such as
//! `Vec::push`). They produce `Local` delegates only, and are `unsafe`
//! because the caller has to rule out overlapping calls, such as a target
//! that calls itself back through its own delegate.
//!
//! Targets are told apart by address, so they must not be zero-sized. Bind
//! non-capturing closures and unit structs with `bind_const!`.
//!
//! ## Ecosystem
//!
//! - `delegate-tracing`: an [`InvocationHook`](hooks::InvocationHook) that
//!   records every call as a `tracing` span.

#[cfg(test)]
extern crate alloc;
#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

pub mod hooks;
pub mod markers;
pub mod prelude;
pub mod shape;
pub mod strategy;

mod binding;
mod delegate;
mod error;

pub use delegate_internals::Signature;

pub use self::{
    binding::Binding,
    delegate::Delegate,
    error::EmptyDelegateError,
    shape::{DelegateFor, FnPointer, Method, Shape, ShapeOf},
};
