//! Binding strategies as type-level dispatchers.
//!
//! Every way of binding a target is a zero-sized marker type implementing
//! [`Dispatch`]. A marker is never instantiated: it only exists so that
//! [`Signature::thunk`] can generate one thunk per strategy, and so that the
//! strategy's auto traits (`Send`/`Sync`, via `PhantomData`) reflect those of
//! whatever it erases.
//!
//! | strategy | target pointer | callable |
//! |---|---|---|
//! | [`ByRef<F>`] | `&F` | the target itself |
//! | [`OnMethod<T, M>`] | `&T` | the zero-sized method `M` |
//! | [`ByMut<F>`] | `&mut F` | the target itself |
//! | [`OnMethodMut<T, M>`] | `&mut T` | the zero-sized method `M` |
//! | [`Pointer<F>`] | the function pointer `F`, bit for bit | the target itself |
//! | [`Fixed<F>`] | ignored | the zero-sized callable `F` |
//! | [`FixedMethod<V, T, M>`] | ignored | `M` applied to the `&'static T` produced by `V` |
//!
//! [`Discard<D>`] and [`Hooked<D, H>`] wrap another strategy and pass the
//! target through unchanged.
//!
//! The two unique-reference strategies are `!Sync`, so they can only back
//! thread-local delegates.
//!
//! [`Signature::thunk`]: crate::signature::Signature::thunk

use core::marker::PhantomData;

use crate::{
    signature::{Invoke, InvokeMut, InvokeOn, InvokeOnMut},
    util,
};

/// Recovers a bound target from an untyped pointer and calls it.
pub trait Dispatch<Args> {
    /// The value produced by the call.
    type Output;

    /// Calls the target erased behind `target` with `args`.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. `target` is the pointer produced by the binding that selected this
    ///    strategy (see the documentation of the implementing type), and
    ///    whatever it refers to is still live.
    /// 2. If the strategy takes its target by unique reference, no other
    ///    reference to the target is used until this call returns.
    unsafe fn dispatch(target: *const (), args: Args) -> Self::Output;
}

/// Intercepts every call made through a [`Hooked`] strategy.
///
/// The hook is a type, not a value, so it costs nothing to carry. Delegates
/// that were not bound with a hook never call one.
pub trait InvocationHook {
    /// Runs `call`, which performs the actual dispatch, and returns its
    /// result.
    ///
    /// `strategy` is the type name of the wrapped strategy.
    fn invoke<R>(strategy: &'static str, call: impl FnOnce() -> R) -> R;
}

/// The hook that does nothing but make the call.
impl InvocationHook for () {
    #[inline]
    fn invoke<R>(_strategy: &'static str, call: impl FnOnce() -> R) -> R {
        call()
    }
}

/// Runs `A` around `B` around the call.
impl<A: InvocationHook, B: InvocationHook> InvocationHook for (A, B) {
    #[inline]
    fn invoke<R>(strategy: &'static str, call: impl FnOnce() -> R) -> R {
        A::invoke(strategy, || B::invoke(strategy, call))
    }
}

/// Calls an object that is itself callable.
///
/// Target pointer: a `&F` cast to `*const ()`.
pub struct ByRef<F>(PhantomData<F>);

impl<F, Args> Dispatch<Args> for ByRef<F>
where
    F: Invoke<Args>,
{
    type Output = F::Output;

    #[inline]
    unsafe fn dispatch(target: *const (), args: Args) -> Self::Output {
        // SAFETY: The caller guarantees that `target` came from a live `&F`.
        let callable: &F = unsafe { &*target.cast::<F>() };
        callable.invoke(args)
    }
}

/// Calls the zero-sized method `M` with a bound receiver.
///
/// Target pointer: a `&T` cast to `*const ()`. The method is not stored
/// anywhere: its type is its identity, and the thunk conjures it.
pub struct OnMethod<T: ?Sized, M>(PhantomData<(PhantomData<T>, M)>);

impl<T, M, Args> Dispatch<Args> for OnMethod<T, M>
where
    M: InvokeOn<T, Args> + Copy,
{
    type Output = M::Output;

    #[inline]
    unsafe fn dispatch(target: *const (), args: Args) -> Self::Output {
        // SAFETY: The caller guarantees that `target` came from a live `&T`.
        let receiver: &T = unsafe { &*target.cast::<T>() };
        // SAFETY: The binding that selected this strategy observed a value of
        // `M`, and the caller guarantees that the lifetimes it was bound with
        // are still live.
        let method: M = unsafe { util::conjure::<M>() };
        method.invoke_on(receiver, args)
    }
}

/// Calls an object that is itself callable through a unique reference, such
/// as an `FnMut` closure.
///
/// Target pointer: a `&mut F` cast to `*const ()`.
pub struct ByMut<F>(PhantomData<*mut F>);

impl<F, Args> Dispatch<Args> for ByMut<F>
where
    F: InvokeMut<Args>,
{
    type Output = F::Output;

    #[inline]
    unsafe fn dispatch(target: *const (), args: Args) -> Self::Output {
        // SAFETY: The caller guarantees that `target` came from a live
        // `&mut F` and that nothing else uses it until this call returns.
        let callable: &mut F = unsafe { &mut *target.cast_mut().cast::<F>() };
        callable.invoke_mut(args)
    }
}

/// Calls the zero-sized method `M` with a uniquely borrowed receiver.
///
/// Target pointer: a `&mut T` cast to `*const ()`.
pub struct OnMethodMut<T: ?Sized, M>(PhantomData<(*mut T, M)>);

impl<T, M, Args> Dispatch<Args> for OnMethodMut<T, M>
where
    M: InvokeOnMut<T, Args> + Copy,
{
    type Output = M::Output;

    #[inline]
    unsafe fn dispatch(target: *const (), args: Args) -> Self::Output {
        // SAFETY: The caller guarantees that `target` came from a live
        // `&mut T` and that nothing else uses it until this call returns.
        let receiver: &mut T = unsafe { &mut *target.cast_mut().cast::<T>() };
        // SAFETY: The binding that selected this strategy observed a value of
        // `M`, and the caller guarantees that its lifetimes are still live.
        let method: M = unsafe { util::conjure::<M>() };
        method.invoke_on_mut(receiver, args)
    }
}

/// Calls a function pointer that was stored in the target slot itself.
///
/// Target pointer: the bits of `F`, which must be exactly pointer-sized. See
/// [`Pointer::erase`].
pub struct Pointer<F>(PhantomData<F>);

impl<F: Copy> Pointer<F> {
    /// Stores `function` in an untyped pointer.
    ///
    /// Fails to compile if `F` is not exactly pointer-sized.
    #[inline]
    pub fn erase(function: F) -> *const () {
        util::assert_pointer_sized::<F>();
        // SAFETY: `F` and `*const ()` have the same size, checked above, and
        // the alignment of `F` is no stricter than that of `*const ()`.
        unsafe { core::mem::transmute_copy::<F, *const ()>(&function) }
    }
}

impl<F, Args> Dispatch<Args> for Pointer<F>
where
    F: Invoke<Args> + Copy,
{
    type Output = F::Output;

    #[inline]
    unsafe fn dispatch(target: *const (), args: Args) -> Self::Output {
        util::assert_pointer_sized::<F>();
        // SAFETY: The caller guarantees that `target` was produced by
        // `Pointer::<F>::erase`, so its bits are a valid `F`.
        let function: F = unsafe { core::mem::transmute_copy::<*const (), F>(&target) };
        function.invoke(args)
    }
}

/// Calls the zero-sized callable `F`, ignoring the target pointer.
///
/// This is the compile-time-fixed strategy: the callable's type is its whole
/// identity, so nothing has to stay alive after binding.
pub struct Fixed<F>(PhantomData<F>);

impl<F, Args> Dispatch<Args> for Fixed<F>
where
    F: Invoke<Args> + Copy,
{
    type Output = F::Output;

    #[inline]
    unsafe fn dispatch(_target: *const (), args: Args) -> Self::Output {
        // SAFETY: The binding that selected this strategy observed a value of
        // `F`, and the caller guarantees that its lifetimes are still live.
        let callable: F = unsafe { util::conjure::<F>() };
        callable.invoke(args)
    }
}

/// Calls the zero-sized method `M` on the `'static` receiver produced by the
/// zero-sized accessor `V`, ignoring the target pointer.
pub struct FixedMethod<V, T: ?Sized, M>(PhantomData<(V, PhantomData<T>, M)>);

impl<V, T, M, Args> Dispatch<Args> for FixedMethod<V, T, M>
where
    V: Copy + Fn() -> &'static T,
    T: ?Sized + 'static,
    M: InvokeOn<T, Args> + Copy,
{
    type Output = M::Output;

    #[inline]
    unsafe fn dispatch(_target: *const (), args: Args) -> Self::Output {
        // SAFETY: The binding that selected this strategy observed a value of
        // `V`, which only borrows `'static` data.
        let accessor: V = unsafe { util::conjure::<V>() };
        // SAFETY: The binding that selected this strategy observed a value of
        // `M`, and the caller guarantees that its lifetimes are still live.
        let method: M = unsafe { util::conjure::<M>() };
        method.invoke_on(accessor(), args)
    }
}

/// Drops the output of the wrapped strategy.
///
/// Lets a target with a meaningful return value back a delegate that returns
/// `()`.
pub struct Discard<D>(PhantomData<D>);

impl<D, Args> Dispatch<Args> for Discard<D>
where
    D: Dispatch<Args>,
{
    type Output = ();

    #[inline]
    unsafe fn dispatch(target: *const (), args: Args) {
        // SAFETY: `Discard` passes the target through unchanged, so the
        // caller's guarantee for `Discard<D>` is a guarantee for `D`.
        let output = unsafe { D::dispatch(target, args) };
        core::mem::drop(output);
    }
}

/// Routes every call of the wrapped strategy through the hook `H`.
pub struct Hooked<D, H>(PhantomData<(D, H)>);

impl<D, H, Args> Dispatch<Args> for Hooked<D, H>
where
    D: Dispatch<Args>,
    H: InvocationHook,
{
    type Output = D::Output;

    #[inline]
    unsafe fn dispatch(target: *const (), args: Args) -> Self::Output {
        H::invoke(core::any::type_name::<D>(), move || {
            // SAFETY: `Hooked` passes the target through unchanged, so the
            // caller's guarantee for `Hooked<D, H>` is a guarantee for `D`.
            unsafe { D::dispatch(target, args) }
        })
    }
}

#[cfg(test)]
mod tests {
    use core::{
        cell::Cell,
        sync::atomic::{AtomicUsize, Ordering},
    };

    use super::*;

    struct Gauge {
        level: Cell<i32>,
    }

    impl Gauge {
        fn raise(&self, by: i32) -> i32 {
            self.level.set(self.level.get() + by);
            self.level.get()
        }
    }

    fn erase_ref<T>(target: &T) -> *const () {
        core::ptr::from_ref(target).cast::<()>()
    }

    fn method_witness<T, M: Copy>(_method: M) -> PhantomData<OnMethod<T, M>> {
        PhantomData
    }

    #[test]
    fn test_by_ref_dispatch() {
        let offset = 10;
        let add = |x: i32| x + offset;
        fn run<F: Fn(i32) -> i32>(callable: &F) -> i32 {
            // SAFETY: The target is a live `&F`.
            unsafe { ByRef::<F>::dispatch(erase_ref(callable), (5,)) }
        }
        assert_eq!(run(&add), 15);
    }

    #[test]
    fn test_on_method_dispatch() {
        fn run<M>(gauge: &Gauge, _witness: PhantomData<OnMethod<Gauge, M>>) -> i32
        where
            M: Copy + Fn(&Gauge, i32) -> i32,
        {
            // SAFETY: The target is a live `&Gauge`, and the method was
            // witnessed by the caller.
            unsafe { OnMethod::<Gauge, M>::dispatch(erase_ref(gauge), (3,)) }
        }

        let gauge = Gauge {
            level: Cell::new(1),
        };
        let witness = method_witness::<Gauge, _>(Gauge::raise);
        assert_eq!(run(&gauge, witness), 4);
        assert_eq!(run(&gauge, witness), 7);
        assert_eq!(gauge.level.get(), 7);
    }

    #[test]
    fn test_unique_reference_dispatch() {
        fn run_mut<F: FnMut(u32) -> u32>(callable: &mut F, x: u32) -> u32 {
            let target = core::ptr::from_mut(callable).cast::<()>().cast_const();
            // SAFETY: The target is a live `&mut F` that is not used elsewhere
            // during the call.
            unsafe { ByMut::<F>::dispatch(target, (x,)) }
        }

        fn push<M: Copy + Fn(&mut Gauge, i32) -> i32>(gauge: &mut Gauge, _method: M) -> i32 {
            let target = core::ptr::from_mut(gauge).cast::<()>().cast_const();
            // SAFETY: The target is a live `&mut Gauge` that is not used
            // elsewhere during the call, and the method was witnessed.
            unsafe { OnMethodMut::<Gauge, M>::dispatch(target, (5,)) }
        }

        let mut total = 0;
        let mut add = |x: u32| {
            total += x;
            total
        };
        assert_eq!(run_mut(&mut add, 2), 2);
        assert_eq!(run_mut(&mut add, 3), 5);

        let mut gauge = Gauge {
            level: Cell::new(0),
        };
        let set = |gauge: &mut Gauge, by: i32| {
            *gauge.level.get_mut() += by;
            gauge.level.get()
        };
        assert_eq!(push(&mut gauge, set), 5);
        assert_eq!(push(&mut gauge, set), 10);
    }

    #[test]
    fn test_unique_reference_strategies_are_not_sync() {
        static_assertions::assert_not_impl_any!(ByMut<fn()>: Sync);
        static_assertions::assert_not_impl_any!(OnMethodMut<u8, fn(&mut u8)>: Sync);
        static_assertions::assert_impl_all!(ByRef<fn()>: Sync);
    }

    #[test]
    fn test_pointer_dispatch() {
        fn triple(x: u64) -> u64 {
            x * 3
        }
        let function: fn(u64) -> u64 = triple;
        let target = Pointer::erase(function);
        // SAFETY: The target was produced by `Pointer::erase` for this type.
        let result = unsafe { Pointer::<fn(u64) -> u64>::dispatch(target, (14,)) };
        assert_eq!(result, 42);
    }

    #[test]
    fn test_fixed_dispatch_ignores_target() {
        fn answer() -> u8 {
            42
        }
        fn run<F: Copy + Fn() -> u8>(_witness: F) -> u8 {
            // SAFETY: The callable was witnessed by the caller.
            unsafe { Fixed::<F>::dispatch(core::ptr::null(), ()) }
        }
        assert_eq!(run(answer), 42);
    }

    #[test]
    fn test_fixed_method_dispatch() {
        struct Table {
            rows: [u16; 3],
        }

        impl Table {
            fn row(&self, index: usize) -> u16 {
                self.rows[index]
            }
        }

        fn run<V, M>(_accessor: V, _method: M, index: usize) -> u16
        where
            V: Copy + Fn() -> &'static Table,
            M: Copy + Fn(&Table, usize) -> u16,
        {
            // SAFETY: Both the accessor and the method were witnessed by the
            // caller.
            unsafe { FixedMethod::<V, Table, M>::dispatch(core::ptr::null(), (index,)) }
        }

        let accessor = || -> &'static Table { &Table { rows: [4, 8, 15] } };
        assert_eq!(run(accessor, Table::row, 2), 15);
    }

    #[test]
    fn test_discard_drops_output() {
        let produce = |x: u32| x + 1;
        fn run<F: Fn(u32) -> u32>(callable: &F) {
            // SAFETY: `Discard` forwards the target to `ByRef<F>`, and the
            // target is a live `&F`.
            unsafe { Discard::<ByRef<F>>::dispatch(erase_ref(callable), (1,)) }
        }
        run(&produce);
    }

    #[test]
    fn test_hooked_runs_hook_around_dispatch() {
        static CALLS: AtomicUsize = AtomicUsize::new(0);

        struct CountingHook;
        impl InvocationHook for CountingHook {
            fn invoke<R>(strategy: &'static str, call: impl FnOnce() -> R) -> R {
                assert!(strategy.contains("ByRef"));
                CALLS.fetch_add(1, Ordering::Relaxed);
                call()
            }
        }

        let square = |x: u32| x * x;
        fn run<F: Fn(u32) -> u32>(callable: &F, x: u32) -> u32 {
            // SAFETY: `Hooked` forwards the target to `ByRef<F>`, and the
            // target is a live `&F`.
            unsafe { Hooked::<ByRef<F>, CountingHook>::dispatch(erase_ref(callable), (x,)) }
        }

        assert_eq!(run(&square, 3), 9);
        assert_eq!(run(&square, 4), 16);
        assert_eq!(CALLS.load(Ordering::Relaxed), 2);
    }
}
