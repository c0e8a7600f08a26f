//! Marker types and traits for thread-safety semantics.
//!
//! A [`Delegate<'a, S, T>`](crate::Delegate) carries a thread-safety marker
//! `T` as its third type parameter:
//!
//! - [`SendSync`] (the default): the delegate is `Send + Sync`. It can only be
//!   created from a binding whose target may be shared between threads.
//! - [`Local`]: the delegate may reference anything, including `Cell`s and
//!   `Rc`s, and cannot cross thread boundaries.
//!
//! # Design Philosophy
//!
//! The constraint is enforced when a binding is materialized into a delegate.
//! It is impossible to construct a `Delegate<_, _, SendSync>` around a target
//! that is not `Sync`, so a `SendSync` delegate truly can be called from any
//! thread.
//!
//! # Examples
//!
//! ```
//! use core::cell::Cell;
//! use core::sync::atomic::{AtomicU32, Ordering};
//!
//! use delegate::prelude::*;
//!
//! let hits = AtomicU32::new(0);
//! let bump = |by: u32| hits.fetch_add(by, Ordering::Relaxed);
//! let shared: Delegate<'_, fn(u32) -> u32> = bind!(bump).into();
//! std::thread::scope(|scope| {
//!     scope.spawn(|| shared.call(1));
//!     scope.spawn(|| shared.call(2));
//! });
//! assert_eq!(hits.load(Ordering::Relaxed), 3);
//!
//! // A `Cell` is not `Sync`, so this delegate must be `Local`
//! let local_hits = Cell::new(0);
//! let local_bump = |by: u32| {
//!     local_hits.set(local_hits.get() + by);
//!     local_hits.get()
//! };
//! let local: Delegate<'_, fn(u32) -> u32, markers::Local> = bind!(local_bump).into();
//! assert_eq!(local.call(4), 4);
//! ```

/// Marker type indicating that a delegate is `Send + Sync`.
///
/// This is the default thread-safety marker. Binding a target that is not
/// `Sync` into a `SendSync` delegate fails to compile:
///
/// ```compile_fail
/// use core::cell::Cell;
///
/// use delegate::prelude::*;
///
/// let hits = Cell::new(0);
/// let bump = || hits.set(hits.get() + 1);
/// let delegate: Delegate<'_, fn()> = bind!(bump).into();
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Hash)]
pub struct SendSync;

/// Marker type indicating that a delegate is not `Send` or `Sync`.
///
/// Any binding can be materialized into a `Local` delegate, and a `SendSync`
/// delegate can be downgraded with
/// [`into_local`](crate::Delegate::into_local).
///
/// # Examples
///
/// ```
/// use std::rc::Rc;
///
/// use delegate::prelude::*;
///
/// let shared = Rc::new(String::from("local"));
/// let describe = || shared.len();
/// let local: Delegate<'_, fn() -> usize, markers::Local> = bind!(describe).into();
/// assert_eq!(local.call(), 5);
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Hash)]
pub struct Local;

mod sealed_thread_safety_marker {
    use super::*;

    pub trait Sealed: 'static {}

    impl Sealed for SendSync {}
    impl Sealed for Local {}
}

/// Marker trait combining [`SendSync`] and [`Local`].
///
/// This trait is sealed and cannot be implemented outside of this crate.
pub trait ThreadSafetyMarker: sealed_thread_safety_marker::Sealed {}

impl ThreadSafetyMarker for SendSync {}
impl ThreadSafetyMarker for Local {}

/// Marker trait for binding strategies that are valid for the thread-safety
/// marker `T`.
///
/// A strategy type (such as [`ByRef<F>`](crate::strategy::ByRef)) carries the
/// types it erases in a `PhantomData`, so it is `Sync` exactly when sharing
/// the bound target between threads is sound.
///
/// - For `T = Local`: Implemented for every strategy.
/// - For `T = SendSync`: Implemented only for strategies that are `Sync`.
pub trait TargetMarkerFor<T: ThreadSafetyMarker> {}

impl<D: ?Sized> TargetMarkerFor<Local> for D {}

impl<D: ?Sized + Sync> TargetMarkerFor<SendSync> for D {}
