use core::hash::{Hash, Hasher};

use delegate_internals::{RawDelegate, Signature};
use rustc_hash::FxHasher;

use crate::{
    EmptyDelegateError,
    markers::{Local, SendSync},
};

mod limit_field_access {
    use core::marker::PhantomData;

    use delegate_internals::{RawDelegate, Signature};

    use crate::markers::SendSync;

    /// A non-owning, type-erased reference to something callable with the
    /// shape `S`.
    ///
    /// A [`Delegate`] is two machine words: an untyped pointer to the bound
    /// target and a pointer to a thunk that knows how to call it. It is
    /// `Copy`, never allocates, has no destructor, and does not keep the
    /// target alive. The lifetime `'a` is the borrow of the target, so the
    /// borrow checker rejects a delegate that outlives what it references.
    ///
    /// The shape `S` is a canonical function pointer type `fn(A1, ..., An) ->
    /// R` with up to 12 arguments. Arguments that borrow must name their
    /// lifetime: `Delegate<'a, fn(&'a str) -> usize>`.
    ///
    /// Delegates are created from a [`Binding`](crate::Binding), usually
    /// through the [`bind!`](crate::bind) and [`bind_const!`](crate::bind_const)
    /// macros, or empty with [`Delegate::empty`]. They compare and hash by the
    /// identity of what they are bound to.
    ///
    /// # Identity
    ///
    /// Two delegates are equal when they reference the same target through
    /// the same thunk. Binding the same target with the same strategy and
    /// shape yields equal delegates as long as both are materialized in the
    /// same crate. Each crate instantiates its own thunks, so a delegate
    /// materialized in a library and one materialized in the application
    /// from the same target may compare unequal; keep registration and
    /// removal on the same side of such a boundary.
    ///
    /// # Examples
    ///
    /// ```
    /// use core::sync::atomic::{AtomicU32, Ordering};
    ///
    /// use delegate::prelude::*;
    ///
    /// struct Counter {
    ///     count: AtomicU32,
    /// }
    ///
    /// impl Counter {
    ///     fn increment(&self) {
    ///         self.count.fetch_add(1, Ordering::Relaxed);
    ///     }
    /// }
    ///
    /// let counter = Counter { count: AtomicU32::new(0) };
    /// let other = Counter { count: AtomicU32::new(0) };
    ///
    /// let delegate: Delegate<'_, fn()> = bind!(counter, Counter::increment).into();
    /// delegate.call();
    /// delegate.call();
    /// assert_eq!(counter.count.load(Ordering::Relaxed), 2);
    ///
    /// let again: Delegate<'_, fn()> = bind!(counter, Counter::increment).into();
    /// let elsewhere: Delegate<'_, fn()> = bind!(other, Counter::increment).into();
    /// assert_eq!(delegate, again);
    /// assert_ne!(delegate, elsewhere);
    /// ```
    ///
    /// A delegate cannot outlive its target:
    ///
    /// ```compile_fail
    /// use delegate::prelude::*;
    ///
    /// let delegate: Delegate<'_, fn() -> u8> = {
    ///     let value = 42u8;
    ///     let answer = move || value;
    ///     bind!(answer).into()
    /// };
    /// delegate.call();
    /// ```
    pub struct Delegate<'a, S: Signature, T = SendSync> {
        /// # Safety
        ///
        /// The following safety invariants are guaranteed to be upheld as long
        /// as this struct exists:
        ///
        /// 1. `T` must either be `SendSync` or `Local`.
        /// 2. If the delegate is not empty, the bound target is live for `'a`.
        /// 3. If `T = SendSync`: The bound target is `Sync`.
        /// 4. If the target is bound by unique reference, no call through this
        ///    delegate or a copy of it starts while another one is running.
        raw: RawDelegate<S>,
        _lifetime: PhantomData<&'a ()>,
        _thread_safety: PhantomData<T>,
    }

    impl<'a, S: Signature, T> Delegate<'a, S, T> {
        /// Creates a new delegate from a raw delegate.
        ///
        /// # Safety
        ///
        /// The caller must ensure:
        ///
        /// 1. `T` must either be `SendSync` or `Local`.
        /// 2. If `raw` is not empty, the bound target is live for `'a`.
        /// 3. If `T = SendSync`: The bound target is `Sync`.
        /// 4. If the target is bound by unique reference, no call through the
        ///    delegate or a copy of it starts while another one is running.
        #[must_use]
        pub(crate) const unsafe fn from_raw(raw: RawDelegate<S>) -> Self {
            // SAFETY: We must uphold the safety invariants of the raw field:
            // 1. Guaranteed by the caller
            // 2. Guaranteed by the caller
            // 3. Guaranteed by the caller
            // 4. Guaranteed by the caller
            Self {
                raw,
                _lifetime: PhantomData,
                _thread_safety: PhantomData,
            }
        }

        /// Returns the underlying raw delegate.
        #[must_use]
        pub(crate) fn as_raw(&self) -> &RawDelegate<S> {
            &self.raw
        }
    }

    // SAFETY: We must uphold the safety invariants of the raw field for both the
    // original and the copy:
    // 1. This remains true for both the original and the copy
    // 2. This remains true for both the original and the copy
    // 3. This remains true for both the original and the copy
    // 4. The guarantee already covers copies
    impl<'a, S: Signature, T> Copy for Delegate<'a, S, T> {}
}
pub use limit_field_access::Delegate;

impl<'a, S: Signature, T> Clone for Delegate<'a, S, T> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: Signature, T> Delegate<'static, S, T> {
    /// Creates a delegate with nothing bound.
    ///
    /// # Examples
    ///
    /// ```
    /// use delegate::Delegate;
    ///
    /// const NOOP: Delegate<'static, fn(u32)> = Delegate::empty();
    /// assert!(NOOP.is_empty());
    /// assert!(!NOOP.is_valid());
    /// ```
    #[inline]
    #[must_use]
    pub const fn empty() -> Self {
        // SAFETY:
        // 1. `T` is either `SendSync` or `Local`: an empty delegate
        //    references nothing, so it upholds the invariants of either
        // 2. The delegate is empty
        // 3. The delegate is empty
        // 4. The delegate is empty
        unsafe { Self::from_raw(RawDelegate::empty()) }
    }
}

impl<'a, S: Signature, T> Delegate<'a, S, T> {
    /// Returns `true` if this delegate has nothing bound.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.as_raw().is_empty()
    }

    /// Returns `true` if this delegate is bound to something.
    ///
    /// # Examples
    ///
    /// ```
    /// use delegate::{Delegate, bind_const};
    ///
    /// let bound: Delegate<'static, fn(u8) -> bool> = bind_const!(|x: u8| x.is_power_of_two()).into();
    /// assert!(bound.is_valid());
    /// assert!(!Delegate::<'static, fn(u8) -> bool>::default().is_valid());
    /// ```
    #[inline]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.is_empty()
    }

    /// Calls the bound target with arguments packed in a tuple.
    ///
    /// This is the arity-independent form of `call`, for generic code.
    ///
    /// # Panics
    ///
    /// Panics if the delegate is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use delegate::{Delegate, Signature, bind_const};
    ///
    /// fn twice<S: Signature>(delegate: Delegate<'_, S>, args: S::Args) -> S::Output
    /// where
    ///     S::Args: Copy,
    /// {
    ///     delegate.invoke(args);
    ///     delegate.invoke(args)
    /// }
    ///
    /// let add: Delegate<'static, fn(u8, u8) -> u8> = bind_const!(|a: u8, b: u8| a + b).into();
    /// assert_eq!(twice(add, (2, 3)), 5);
    /// ```
    #[inline]
    #[track_caller]
    pub fn invoke(&self, args: S::Args) -> S::Output {
        match self.try_invoke(args) {
            Ok(output) => output,
            Err(EmptyDelegateError) => empty_delegate_called(),
        }
    }

    /// Calls the bound target with arguments packed in a tuple, or returns
    /// [`EmptyDelegateError`] if the delegate is empty.
    #[inline]
    pub fn try_invoke(&self, args: S::Args) -> Result<S::Output, EmptyDelegateError> {
        // SAFETY:
        // 1. The target is live for `'a`, guaranteed by the invariants of
        //    `Delegate`
        // 2. Calls never overlap, guaranteed by the invariants of `Delegate`
        unsafe { self.as_raw().try_call(args) }.ok_or(EmptyDelegateError)
    }

    /// Calls the bound target with arguments packed in a tuple, without
    /// checking for emptiness.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. This delegate is not empty.
    #[inline]
    pub unsafe fn invoke_unchecked(&self, args: S::Args) -> S::Output {
        // SAFETY:
        // 1. Guaranteed by the caller
        // 2. The target is live for `'a`, guaranteed by the invariants of
        //    `Delegate`
        // 3. Calls never overlap, guaranteed by the invariants of `Delegate`
        unsafe { self.as_raw().call_unchecked(args) }
    }

    /// Returns a 64-bit hash of this delegate's identity.
    ///
    /// Equal delegates have equal fingerprints. The value is stable for the
    /// lifetime of the process only.
    ///
    /// # Examples
    ///
    /// ```
    /// use delegate::{Delegate, bind};
    ///
    /// let offset = 3;
    /// let shift = |x: i32| x + offset;
    /// let first: Delegate<'_, fn(i32) -> i32> = bind!(shift).into();
    /// let second: Delegate<'_, fn(i32) -> i32> = bind!(shift).into();
    /// assert_eq!(first.fingerprint(), second.fingerprint());
    /// ```
    #[inline]
    #[must_use]
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = FxHasher::default();
        self.hash(&mut hasher);
        hasher.finish()
    }
}

impl<'a, S: Signature> Delegate<'a, S, SendSync> {
    /// Drops the promise that this delegate can be shared between threads.
    ///
    /// # Examples
    ///
    /// ```
    /// use delegate::{Delegate, bind_const, markers::Local};
    ///
    /// let shared: Delegate<'static, fn() -> u8> = bind_const!(|| 7).into();
    /// let local: Delegate<'static, fn() -> u8, Local> = shared.into_local();
    /// assert_eq!(local.call(), 7);
    /// ```
    #[inline]
    #[must_use]
    pub fn into_local(self) -> Delegate<'a, S, Local> {
        // SAFETY:
        // 1. `T = Local`
        // 2. Unchanged from `self`
        // 3. `T = Local`
        // 4. Unchanged from `self`
        unsafe { Delegate::from_raw(*self.as_raw()) }
    }
}

/// Panics with the message for calling an empty delegate.
#[cold]
#[inline(never)]
#[track_caller]
fn empty_delegate_called() -> ! {
    panic!("called an empty delegate")
}

/// Generates `call`, `try_call` and `call_unchecked` for one arity.
macro_rules! call_impls {
    ($($arg:ident: $ty:ident),*) => {
        impl<'a, R, $($ty,)* T> Delegate<'a, fn($($ty),*) -> R, T> {
            /// Calls the bound target.
            ///
            /// # Panics
            ///
            /// Panics if the delegate is empty.
            #[inline]
            #[track_caller]
            pub fn call(&self $(, $arg: $ty)*) -> R {
                self.invoke(($($arg,)*))
            }

            /// Calls the bound target, or returns [`EmptyDelegateError`] if
            /// the delegate is empty.
            #[inline]
            pub fn try_call(&self $(, $arg: $ty)*) -> Result<R, EmptyDelegateError> {
                self.try_invoke(($($arg,)*))
            }

            /// Calls the bound target without checking for emptiness.
            ///
            /// Calling an empty delegate trips a debug assertion in debug
            /// builds.
            ///
            /// # Safety
            ///
            /// The caller must ensure:
            ///
            /// 1. This delegate is not empty.
            #[inline]
            pub unsafe fn call_unchecked(&self $(, $arg: $ty)*) -> R {
                // SAFETY:
                // 1. Guaranteed by the caller
                unsafe { self.invoke_unchecked(($($arg,)*)) }
            }
        }
    };
}

call_impls!();
call_impls!(a1: A1);
call_impls!(a1: A1, a2: A2);
call_impls!(a1: A1, a2: A2, a3: A3);
call_impls!(a1: A1, a2: A2, a3: A3, a4: A4);
call_impls!(a1: A1, a2: A2, a3: A3, a4: A4, a5: A5);
call_impls!(a1: A1, a2: A2, a3: A3, a4: A4, a5: A5, a6: A6);
call_impls!(a1: A1, a2: A2, a3: A3, a4: A4, a5: A5, a6: A6, a7: A7);
call_impls!(a1: A1, a2: A2, a3: A3, a4: A4, a5: A5, a6: A6, a7: A7, a8: A8);
call_impls!(a1: A1, a2: A2, a3: A3, a4: A4, a5: A5, a6: A6, a7: A7, a8: A8, a9: A9);
call_impls!(a1: A1, a2: A2, a3: A3, a4: A4, a5: A5, a6: A6, a7: A7, a8: A8, a9: A9, a10: A10);
call_impls!(
    a1: A1, a2: A2, a3: A3, a4: A4, a5: A5, a6: A6, a7: A7, a8: A8, a9: A9, a10: A10, a11: A11
);
call_impls!(
    a1: A1, a2: A2, a3: A3, a4: A4, a5: A5, a6: A6, a7: A7, a8: A8, a9: A9, a10: A10, a11: A11,
    a12: A12
);

impl<S: Signature, T> Default for Delegate<'static, S, T> {
    #[inline]
    fn default() -> Self {
        Self::empty()
    }
}

/// Identity comparison: same target address and same thunk address.
///
/// See [the type-level documentation](Delegate#identity) for when re-binding
/// is guaranteed to compare equal.
impl<'a, S: Signature, T> PartialEq for Delegate<'a, S, T> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.as_raw() == other.as_raw()
    }
}

impl<'a, S: Signature, T> Eq for Delegate<'a, S, T> {}

/// Hashes the same two addresses that [`PartialEq`] compares.
impl<'a, S: Signature, T> Hash for Delegate<'a, S, T> {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_raw().hash(state);
    }
}

impl<'a, S: Signature, T> core::fmt::Debug for Delegate<'a, S, T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Delegate")
            .field("signature", &core::any::type_name::<S>())
            .field("bound", &self.is_valid())
            .finish()
    }
}

// SAFETY: The `SendSync` marker indicates that the bound target is `Sync`, so
// calling it through a shared reference from any thread is sound. Therefore it
// is safe to implement `Send` for the delegate itself.
unsafe impl<'a, S: Signature> Send for Delegate<'a, S, SendSync> {}

// SAFETY: The `SendSync` marker indicates that the bound target is `Sync`, so
// calling it through a shared reference from any thread is sound. Therefore it
// is safe to implement `Sync` for the delegate itself.
unsafe impl<'a, S: Signature> Sync for Delegate<'a, S, SendSync> {}
