//! Hooks that observe delegate invocations.
//!
//! A hook is a type implementing [`InvocationHook`]. Adding one to a binding
//! with [`Binding::hooked`](crate::Binding::hooked) makes every call through
//! the resulting delegates run inside the hook:
//!
//! ```text
//! delegate.call(args)
//!   └─ thunk
//!        └─ H::invoke(strategy_name, || /* the real call */)
//! ```
//!
//! Hooks are selected at compile time, carry no state of their own, and do
//! not change the size of a delegate. Delegates that were bound without a hook
//! never pay for one.
//!
//! `()` is the hook that does nothing, and a pair `(A, B)` runs `A` around
//! `B`. The `delegate-tracing` crate provides a hook that emits `tracing`
//! spans.
//!
//! # Examples
//!
//! ```
//! use core::sync::atomic::{AtomicUsize, Ordering};
//!
//! use delegate::{hooks::InvocationHook, prelude::*};
//!
//! static CALLS: AtomicUsize = AtomicUsize::new(0);
//!
//! struct CountCalls;
//!
//! impl InvocationHook for CountCalls {
//!     fn invoke<R>(_strategy: &'static str, call: impl FnOnce() -> R) -> R {
//!         CALLS.fetch_add(1, Ordering::Relaxed);
//!         call()
//!     }
//! }
//!
//! let offset = 0;
//! let square = |x: u64| x * x + offset;
//! let delegate: Delegate<'_, fn(u64) -> u64> = bind!(square).hooked::<CountCalls>().into();
//! assert_eq!(delegate.call(4), 16);
//! assert_eq!(delegate.call(5), 25);
//! assert_eq!(CALLS.load(Ordering::Relaxed), 2);
//! ```

pub use delegate_internals::InvocationHook;
