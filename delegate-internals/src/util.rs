//! Internal utility functions.
//!
//! The size assertions are also used by the `delegate` crate's binding
//! constructors.

use core::ptr::NonNull;

/// Fails compilation (after monomorphization) if `F` is not zero-sized.
///
/// Strategies that embed a callable in the thunk rather than in the target
/// slot have nowhere to store it, so the callable's type has to be its whole
/// identity.
#[doc(hidden)]
#[inline(always)]
pub const fn assert_zero_sized<F>() {
    const {
        assert!(
            size_of::<F>() == 0,
            "only zero-sized callables (fn items, method paths, non-capturing closures) can be bound without a target"
        );
    }
}

/// Fails compilation (after monomorphization) if `T` is zero-sized.
///
/// Distinct zero-sized objects can share an address, so a delegate that
/// references one could not be told apart from a delegate referencing
/// another.
#[doc(hidden)]
#[inline(always)]
pub const fn assert_not_zero_sized<T>() {
    const {
        assert!(
            size_of::<T>() != 0,
            "zero-sized targets have no address of their own; bind them with `bind_const!` instead"
        );
    }
}

/// Fails compilation (after monomorphization) if `F` does not fit the
/// untyped target slot bit for bit.
#[inline(always)]
pub(crate) const fn assert_pointer_sized<F>() {
    const {
        assert!(
            size_of::<F>() == size_of::<*const ()>() && align_of::<F>() <= align_of::<*const ()>(),
            "function pointers cannot be stored in the target slot on this platform"
        );
    }
}

/// Produces a value of the zero-sized type `F` out of thin air.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. A value of type `F` was observed by the binding that produced the thunk
///    calling this function, and it was not dropped (it is `Copy`, so it has
///    no drop glue, and duplicating it is allowed).
/// 2. Every lifetime mentioned in `F` is still live.
#[inline(always)]
pub(crate) unsafe fn conjure<F: Copy>() -> F {
    assert_zero_sized::<F>();
    // SAFETY: `F` is zero-sized, so any well-aligned non-null pointer is valid
    // for reads of it. The caller guarantees that a value of `F` existed and is
    // still usable, and `F: Copy` allows duplicating it.
    unsafe { NonNull::<F>::dangling().read() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conjure_fn_item() {
        fn seven() -> u32 {
            7
        }

        fn witness<F: Copy>(_value: F) -> F {
            // SAFETY: The value was passed in, and `seven` is a plain fn item.
            unsafe { conjure::<F>() }
        }

        let conjured = witness(seven);
        assert_eq!(conjured(), 7);
    }

    #[test]
    fn test_conjure_closure() {
        fn witness<F: Copy>(_value: F) -> F {
            // SAFETY: The value was passed in, and the closure captures nothing.
            unsafe { conjure::<F>() }
        }

        let conjured = witness(|x: u32| x * 2);
        assert_eq!(conjured(21), 42);
    }
}
