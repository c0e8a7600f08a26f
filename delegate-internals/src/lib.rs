#![no_std]
#![forbid(
    missing_docs,
    clippy::alloc_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::std_instead_of_core,
    clippy::missing_safety_doc,
    clippy::missing_docs_in_private_items,
    clippy::undocumented_unsafe_blocks,
    clippy::multiple_unsafe_ops_per_block,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::broken_intra_doc_links,
    missing_copy_implementations,
    unused_doc_comments
)]
#![allow(rustdoc::private_intra_doc_links)]
//! Internal implementation crate for the `delegate` crate.
//!
//! # Overview
//!
//! This crate contains the low-level, type-erased representation and the
//! unsafe dispatch machinery that power the `delegate` library. A delegate
//! is two machine words: an untyped pointer to the bound target and a pointer
//! to a monomorphized thunk that knows how to turn that untyped pointer back
//! into the concrete target and call it.
//!
//! **This crate is an implementation detail.** No semantic versioning guarantees
//! are provided. Users should depend on the `delegate` crate, not this one.
//!
//! # Architecture
//!
//! - **[`signature`]**: Canonical call shapes
//!   - [`Signature`]: Implemented for `fn(A1, ..., An) -> R`, it names the
//!     argument tuple, the output, and the thunk pointer type of a shape
//!   - [`Invoke`]/[`InvokeOn`]: Call a callable with its arguments packed in a
//!     tuple, optionally with a separate receiver
//!   - [`InvokeMut`]/[`InvokeOnMut`]: The same through a unique reference
//!
//! - **[`dispatch`]**: Binding strategies at the type level
//!   - [`Dispatch`]: How a thunk recovers its target from the untyped pointer
//!   - [`ByRef`], [`OnMethod`], [`ByMut`], [`OnMethodMut`], [`Pointer`],
//!     [`Fixed`], [`FixedMethod`]: One strategy per way of binding a target
//!   - [`Discard`], [`Hooked`]: Adapters layered over another strategy
//!
//! - **[`raw`]**: The erased value itself
//!   - [`RawDelegate`]: `{target, thunk}`, `Copy`, compared and hashed by
//!     address
//!
//! # Safety Strategy
//!
//! Type erasure is sound as long as every thunk is only ever paired with a
//! target pointer of the type its strategy expects. This crate maintains that
//! through:
//!
//! - **Module-based encapsulation**: The fields of [`RawDelegate`] are private
//!   to [`raw`], and the only way to pair a target with a thunk is the unsafe
//!   [`RawDelegate::new`] constructor, so the pairing invariant is checked in
//!   exactly one place
//! - **Monomorphized thunks**: A thunk is generated per strategy type, so the
//!   strategy (and with it the concrete target type) is fixed at compile time
//! - **Documented dispatch contracts**: Each [`Dispatch::dispatch`]
//!   implementation states exactly which pointer it expects
//!
//! [`Signature`]: signature::Signature
//! [`Invoke`]: signature::Invoke
//! [`InvokeOn`]: signature::InvokeOn
//! [`InvokeMut`]: signature::InvokeMut
//! [`InvokeOnMut`]: signature::InvokeOnMut
//! [`Dispatch`]: dispatch::Dispatch
//! [`Dispatch::dispatch`]: dispatch::Dispatch::dispatch
//! [`ByRef`]: dispatch::ByRef
//! [`OnMethod`]: dispatch::OnMethod
//! [`ByMut`]: dispatch::ByMut
//! [`OnMethodMut`]: dispatch::OnMethodMut
//! [`Pointer`]: dispatch::Pointer
//! [`Fixed`]: dispatch::Fixed
//! [`FixedMethod`]: dispatch::FixedMethod
//! [`Discard`]: dispatch::Discard
//! [`Hooked`]: dispatch::Hooked
//! [`RawDelegate`]: raw::RawDelegate
//! [`RawDelegate::new`]: raw::RawDelegate::new

#[cfg(test)]
extern crate alloc;

pub mod dispatch;
pub mod raw;
pub mod signature;
#[doc(hidden)]
pub mod util;

pub use dispatch::{
    ByMut, ByRef, Discard, Dispatch, Fixed, FixedMethod, Hooked, InvocationHook, OnMethod,
    OnMethodMut, Pointer,
};
pub use raw::RawDelegate;
pub use signature::{Invoke, InvokeMut, InvokeOn, InvokeOnMut, Signature};
