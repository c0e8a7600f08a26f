//! The two-word erased delegate.
//!
//! This module encapsulates the fields of [`RawDelegate`], ensuring they are
//! only visible within this module. This visibility restriction guarantees the
//! safety invariant: **the thunk is always paired with a target pointer that
//! satisfies the contract of the strategy the thunk was generated for**.
//!
//! # Safety Invariant
//!
//! The fields can only be set by [`RawDelegate::new`] (unsafe, the caller
//! vouches for the pairing), [`RawDelegate::from_pointer`] (which pairs the
//! pointer with the thunk of the matching [`Pointer`] strategy itself) and
//! [`RawDelegate::empty`]. They cannot be modified afterwards.
//!
//! What the pairing invariant cannot express is *liveness*: a `RawDelegate`
//! has no lifetime, so whether the target is still alive is the concern of
//! whoever wraps it.

use core::hash::{Hash, Hasher};

use crate::{
    dispatch::{Dispatch, Pointer},
    signature::{Invoke, Signature},
};

/// A type-erased, non-owning reference to something callable with the shape
/// `S`.
///
/// This is either empty (both fields unset) or holds a target pointer and a
/// thunk that knows how to call it.
pub struct RawDelegate<S: Signature> {
    /// Untyped pointer to the bound target, or null.
    ///
    /// # Safety
    ///
    /// The following safety invariants are guaranteed to be upheld as long as
    /// this struct exists:
    ///
    /// 1. If `thunk` is `None`, this pointer is null.
    /// 2. If `thunk` is `Some`, this pointer satisfies the contract of the
    ///    strategy the thunk was generated for, provided that the bound target
    ///    is still live.
    target: *const (),
    /// The dispatch function, or `None` for an empty delegate.
    thunk: Option<S::Thunk>,
}

impl<S: Signature> RawDelegate<S> {
    /// Creates an empty [`RawDelegate`].
    #[inline]
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            target: core::ptr::null(),
            thunk: None,
        }
    }

    /// Creates a [`RawDelegate`] that dispatches through the strategy `D`.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. `target` is exactly the pointer that `D` expects (see the
    ///    documentation of the strategy type).
    #[inline]
    #[must_use]
    pub unsafe fn new<D>(target: *const ()) -> Self
    where
        D: Dispatch<S::Args, Output = S::Output>,
    {
        // SAFETY: We must uphold the safety invariants of the `target` field:
        // 1. `thunk` is `Some`
        // 2. Guaranteed by the caller
        Self {
            target,
            thunk: Some(S::thunk::<D>()),
        }
    }

    /// Creates a [`RawDelegate`] that stores `function` in its target slot and
    /// calls it through the [`Pointer`] strategy.
    ///
    /// Fails to compile if `F` is not exactly pointer-sized.
    #[inline]
    #[must_use]
    pub fn from_pointer<F>(function: F) -> Self
    where
        F: Invoke<S::Args, Output = S::Output> + Copy,
    {
        let target = Pointer::erase(function);
        // SAFETY:
        // 1. `target` was produced by `Pointer::<F>::erase`, which is what the
        //    `Pointer<F>` strategy expects. Function pointers are always live.
        unsafe { Self::new::<Pointer<F>>(target) }
    }

    /// Returns `true` if this delegate has nothing bound.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.thunk.is_none()
    }

    /// Calls the bound target, or returns `None` if this delegate is empty.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. The bound target is still live.
    /// 2. If the target is bound by unique reference, no other reference to it
    ///    is used until this call returns.
    #[inline]
    pub unsafe fn try_call(&self, args: S::Args) -> Option<S::Output> {
        let thunk = self.thunk?;
        // SAFETY:
        // 1. The thunk and the target come from the same binding, guaranteed by
        //    the invariants of this type. Liveness and exclusive access are
        //    guaranteed by the caller.
        Some(unsafe { S::call(thunk, self.target, args) })
    }

    /// Calls the bound target without checking for emptiness.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. This delegate is not empty.
    /// 2. The bound target is still live.
    /// 3. If the target is bound by unique reference, no other reference to it
    ///    is used until this call returns.
    #[inline]
    pub unsafe fn call_unchecked(&self, args: S::Args) -> S::Output {
        debug_assert!(!self.is_empty(), "called an empty delegate");
        // SAFETY:
        // 1. Guaranteed by the caller
        let thunk = unsafe { self.thunk.unwrap_unchecked() };
        // SAFETY:
        // 1. The thunk and the target come from the same binding, guaranteed by
        //    the invariants of this type. Exclusive access is guaranteed by the
        //    caller.
        unsafe { S::call(thunk, self.target, args) }
    }

    /// Returns the address of the target slot, used for identity.
    #[inline]
    fn target_address(&self) -> usize {
        self.target.addr()
    }

    /// Returns the address of the thunk, or `0` if empty, used for identity.
    #[inline]
    fn thunk_address(&self) -> usize {
        self.thunk.map_or(0, S::thunk_address)
    }
}

impl<S: Signature> Clone for RawDelegate<S> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: Signature> Copy for RawDelegate<S> {}

impl<S: Signature> Default for RawDelegate<S> {
    #[inline]
    fn default() -> Self {
        Self::empty()
    }
}

/// Compares target and thunk addresses.
///
/// Thunks are instantiated per crate, so the same strategy bound in two crates
/// can produce two unequal raw delegates.
impl<S: Signature> PartialEq for RawDelegate<S> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.target_address() == other.target_address()
            && self.thunk_address() == other.thunk_address()
    }
}

impl<S: Signature> Eq for RawDelegate<S> {}

impl<S: Signature> Hash for RawDelegate<S> {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.target_address());
        state.write_usize(self.thunk_address());
    }
}

impl<S: Signature> core::fmt::Debug for RawDelegate<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RawDelegate")
            .field("target", &self.target)
            .field("thunk", &core::ptr::without_provenance::<()>(self.thunk_address()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use core::cell::Cell;

    use super::*;
    use crate::dispatch::{ByRef, Fixed};

    type Unary = fn(u32) -> u32;

    fn bind_ref<F: Fn(u32) -> u32>(callable: &F) -> RawDelegate<Unary> {
        let target = core::ptr::from_ref(callable).cast::<()>();
        // SAFETY: `ByRef<F>` expects a `&F`.
        unsafe { RawDelegate::new::<ByRef<F>>(target) }
    }

    fn bind_fixed<F: Copy + Fn(u32) -> u32>(_callable: F) -> RawDelegate<Unary> {
        // SAFETY: `Fixed<F>` ignores its target, and the callable was observed.
        unsafe { RawDelegate::new::<Fixed<F>>(core::ptr::null()) }
    }

    #[test]
    fn test_raw_delegate_size() {
        assert_eq!(
            core::mem::size_of::<RawDelegate<Unary>>(),
            2 * core::mem::size_of::<usize>()
        );
        assert_eq!(
            core::mem::size_of::<RawDelegate<fn()>>(),
            2 * core::mem::size_of::<usize>()
        );
        assert_eq!(
            core::mem::size_of::<RawDelegate<fn(u8, u16, u32, u64, u128) -> i8>>(),
            2 * core::mem::size_of::<usize>()
        );
    }

    #[test]
    fn test_raw_delegate_traits() {
        static_assertions::assert_impl_all!(RawDelegate<Unary>: Copy, Clone, Eq, core::hash::Hash, Default);
        static_assertions::assert_not_impl_any!(RawDelegate<Unary>: Send, Sync);
    }

    #[test]
    fn test_empty() {
        let empty = RawDelegate::<Unary>::empty();
        assert!(empty.is_empty());
        assert_eq!(empty, RawDelegate::default());
        // SAFETY: Nothing is bound, so nothing has to be live.
        assert_eq!(unsafe { empty.try_call((1,)) }, None);
    }

    #[test]
    fn test_call_by_ref() {
        let hits = Cell::new(0);
        let counter = |x: u32| {
            hits.set(hits.get() + 1);
            x + 1
        };
        let raw = bind_ref(&counter);
        assert!(!raw.is_empty());
        // SAFETY: `counter` is live.
        assert_eq!(unsafe { raw.try_call((1,)) }, Some(2));
        // SAFETY: `counter` is live and `raw` is not empty.
        assert_eq!(unsafe { raw.call_unchecked((2,)) }, 3);
        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn test_identity() {
        let one = 1;
        let add_one = |x: u32| x + one;
        let add_one_again = |x: u32| x + one;

        assert_eq!(bind_ref(&add_one), bind_ref(&add_one));
        assert_ne!(bind_ref(&add_one), bind_ref(&add_one_again));
        assert_ne!(bind_ref(&add_one), RawDelegate::empty());
    }

    #[test]
    fn test_fixed_has_null_target() {
        fn halve(x: u32) -> u32 {
            x / 2
        }
        let raw = bind_fixed(halve);
        assert!(!raw.is_empty());
        assert_eq!(raw.target_address(), 0);
        // SAFETY: `Fixed` has no target to keep alive.
        assert_eq!(unsafe { raw.call_unchecked((10,)) }, 5);
    }

    #[test]
    fn test_from_pointer() {
        fn negate(x: i64) -> i64 {
            -x
        }
        let function: fn(i64) -> i64 = negate;
        let raw = RawDelegate::<fn(i64) -> i64>::from_pointer(function);
        assert_eq!(raw, RawDelegate::from_pointer(function));
        assert_eq!(raw.target_address(), function as *const () as usize);
        // SAFETY: Function pointers are always live.
        assert_eq!(unsafe { raw.call_unchecked((5,)) }, -5);
    }
}
