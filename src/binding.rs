use delegate_internals::{
    ByMut, ByRef, Discard, Dispatch, Fixed, FixedMethod, Hooked, InvocationHook, OnMethod,
    OnMethodMut, Pointer, RawDelegate, Signature,
    util::{assert_not_zero_sized, assert_zero_sized},
};

use crate::{
    Delegate,
    markers::{TargetMarkerFor, ThreadSafetyMarker},
    shape::FnPointer,
};

mod limit_field_access {
    use core::marker::PhantomData;

    /// The captured intent to bind a target with the strategy `D`.
    ///
    /// A [`Binding`] is produced by one of the strategy constructors (or the
    /// [`bind!`](crate::bind) and [`bind_const!`](crate::bind_const) macros)
    /// and is then materialized into any delegate whose shape the strategy
    /// can serve, with [`into_delegate`](Binding::into_delegate) or `Into`.
    /// The same binding can be materialized into several differently-shaped
    /// delegates.
    ///
    /// A binding leaves no runtime trace: the strategy lives in the type, and
    /// the only field is the untyped target pointer.
    ///
    /// # Examples
    ///
    /// ```
    /// use delegate::{Binding, Delegate};
    ///
    /// let factor = 2.5;
    /// let scale = |x: f64| x * factor;
    /// let binding = Binding::callable(&scale);
    ///
    /// let delegate: Delegate<'_, fn(f64) -> f64> = binding.into_delegate();
    /// let discarding: Delegate<'_, fn(f64)> = binding.discard_output().into();
    ///
    /// assert_eq!(delegate.call(2.0), 5.0);
    /// discarding.call(2.0);
    /// ```
    pub struct Binding<'a, D> {
        /// # Safety
        ///
        /// The following safety invariants are guaranteed to be upheld as long
        /// as this struct exists:
        ///
        /// 1. This pointer is exactly the pointer that the strategy `D`
        ///    expects.
        /// 2. Whatever it points to is live for `'a`.
        /// 3. If `D` takes its target by unique reference, no call through a
        ///    delegate made from this binding starts while another one is
        ///    running.
        target: *const (),
        _strategy: PhantomData<(&'a (), fn() -> D)>,
    }

    impl<'a, D> Binding<'a, D> {
        /// Creates a new binding.
        ///
        /// # Safety
        ///
        /// The caller must ensure:
        ///
        /// 1. `target` is exactly the pointer that the strategy `D` expects.
        /// 2. Whatever `target` points to is live for `'a`.
        /// 3. If `D` takes its target by unique reference, no call through a
        ///    delegate made from this binding starts while another one is
        ///    running.
        #[must_use]
        pub(crate) unsafe fn from_raw(target: *const ()) -> Self {
            // SAFETY: We must uphold the safety invariants of the target field:
            // 1. Guaranteed by the caller
            // 2. Guaranteed by the caller
            // 3. Guaranteed by the caller
            Self {
                target,
                _strategy: PhantomData,
            }
        }

        /// Returns the target pointer.
        #[must_use]
        pub(crate) fn as_raw(self) -> *const () {
            // SAFETY: We are destroying `self`, so we no longer need to uphold
            // any safety invariants.
            self.target
        }
    }

    // SAFETY: We must uphold the safety invariants of the target field for both
    // the original and the copy:
    // 1. This remains true for both the original and the copy
    // 2. This remains true for both the original and the copy
    // 3. The guarantee covers every delegate made from either of them
    impl<'a, D> Copy for Binding<'a, D> {}
}
pub use limit_field_access::Binding;

impl<'a, D> Clone for Binding<'a, D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, F> Binding<'a, ByRef<F>> {
    /// Binds an object that is itself callable, such as a closure.
    ///
    /// The delegate calls `callable` through the reference, so it sees every
    /// change to the object's state. Mutation goes through interior
    /// mutability, since the object is only borrowed shared.
    ///
    /// # Examples
    ///
    /// ```
    /// use core::cell::Cell;
    ///
    /// use delegate::{Binding, Delegate, markers::Local};
    ///
    /// let seen = Cell::new(0);
    /// let observe = |value: i32| seen.set(value);
    /// let delegate: Delegate<'_, fn(i32), Local> = Binding::callable(&observe).into();
    ///
    /// delegate.call(7);
    /// assert_eq!(seen.get(), 7);
    /// ```
    ///
    /// The object must have an address of its own, so zero-sized objects such
    /// as non-capturing closures are rejected. Bind those with
    /// [`Binding::function`] instead:
    ///
    /// ```compile_fail
    /// use delegate::{Binding, Delegate};
    ///
    /// let add_one = |x: u8| x + 1;
    /// let delegate: Delegate<'_, fn(u8) -> u8> = Binding::callable(&add_one).into();
    /// ```
    ///
    /// A temporary has no place to live, so it cannot be bound either:
    ///
    /// ```compile_fail
    /// use delegate::{Delegate, bind};
    ///
    /// let offset = 1u8;
    /// let delegate: Delegate<'_, fn(u8) -> u8> = bind!(move |x: u8| x + offset).into();
    /// delegate.call(1);
    /// ```
    #[inline]
    #[must_use]
    pub fn callable(callable: &'a F) -> Self {
        assert_not_zero_sized::<F>();
        let target = core::ptr::from_ref(callable).cast::<()>();
        // SAFETY:
        // 1. `ByRef<F>` expects a `&F`
        // 2. `callable` is borrowed for `'a`
        // 3. `ByRef<F>` takes its target by shared reference
        unsafe { Self::from_raw(target) }
    }
}

impl<'a, T, M: Copy> Binding<'a, OnMethod<T, M>> {
    /// Binds the method `method` of the object `receiver`.
    ///
    /// `method` must be zero-sized: a method path such as `Counter::add` or
    /// `<Counter as Trait>::add`, or a non-capturing closure taking the
    /// receiver first. `receiver` must not be zero-sized, since it is told
    /// apart from other receivers by its address. Anything else fails to
    /// compile.
    ///
    /// # Examples
    ///
    /// ```
    /// use core::sync::atomic::{AtomicU32, Ordering};
    ///
    /// use delegate::{Binding, Delegate};
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
    /// let delegate: Delegate<'_, fn()> = Binding::method(&counter, Counter::increment).into();
    /// delegate.call();
    /// delegate.call();
    /// assert_eq!(counter.count.load(Ordering::Relaxed), 2);
    /// ```
    ///
    /// A capturing closure cannot be used as the method:
    ///
    /// ```compile_fail
    /// use delegate::{Binding, Delegate};
    ///
    /// let offset = 1;
    /// let receiver = 41;
    /// let delegate: Delegate<'_, fn() -> i32> =
    ///     Binding::method(&receiver, move |value: &i32| *value + offset).into();
    /// ```
    ///
    /// Neither can a zero-sized receiver, which
    /// [`bind_const!`](crate::bind_const) handles instead:
    ///
    /// ```compile_fail
    /// use delegate::{Binding, Delegate};
    ///
    /// struct Beacon;
    ///
    /// impl Beacon {
    ///     fn ping(&self) -> u8 {
    ///         1
    ///     }
    /// }
    ///
    /// let beacon = Beacon;
    /// let delegate: Delegate<'_, fn() -> u8> = Binding::method(&beacon, Beacon::ping).into();
    /// ```
    #[inline]
    #[must_use]
    pub fn method(receiver: &'a T, method: M) -> Self
    where
        M: 'a,
    {
        assert_zero_sized::<M>();
        assert_not_zero_sized::<T>();
        let target = core::ptr::from_ref(receiver).cast::<()>();
        // SAFETY:
        // 1. `OnMethod<T, M>` expects a `&T`
        // 2. `receiver` is borrowed for `'a`, and so is every lifetime in `M`
        // 3. `OnMethod<T, M>` takes its target by shared reference
        unsafe { Self::from_raw(target) }
    }
}

impl<'a, F> Binding<'a, ByMut<F>> {
    /// Binds an object that is callable through a unique reference, such as
    /// an `FnMut` closure.
    ///
    /// The object stays mutably borrowed for `'a`, so nothing but the
    /// resulting delegates can reach it. Those delegates are always
    /// [`Local`](crate::markers::Local). Zero-sized objects are rejected, as
    /// with [`Binding::callable`].
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. No call through a delegate made from this binding starts while
    ///    another one is still running. In particular, the object must not
    ///    call itself back through one of these delegates.
    ///
    /// # Examples
    ///
    /// ```
    /// use delegate::{Binding, Delegate, markers::Local};
    ///
    /// let mut total = 0;
    /// let mut add = |value: u32| {
    ///     total += value;
    ///     total
    /// };
    /// // SAFETY: `add` does not call back into the delegate.
    /// let delegate: Delegate<'_, fn(u32) -> u32, Local> =
    ///     unsafe { Binding::callable_mut(&mut add) }.into();
    /// delegate.call(2);
    /// assert_eq!(delegate.call(3), 5);
    /// ```
    ///
    /// Such a delegate cannot be shared between threads:
    ///
    /// ```compile_fail
    /// use delegate::{Binding, Delegate};
    ///
    /// let mut total = 0;
    /// let mut add = |value: u32| total += value;
    /// let delegate: Delegate<'_, fn(u32)> = unsafe { Binding::callable_mut(&mut add) }.into();
    /// ```
    #[inline]
    #[must_use]
    pub unsafe fn callable_mut(callable: &'a mut F) -> Self {
        assert_not_zero_sized::<F>();
        let target = core::ptr::from_mut(callable).cast::<()>().cast_const();
        // SAFETY:
        // 1. `ByMut<F>` expects a `&mut F`
        // 2. `callable` is borrowed for `'a`
        // 3. Guaranteed by the caller
        unsafe { Self::from_raw(target) }
    }
}

impl<'a, T, M: Copy> Binding<'a, OnMethodMut<T, M>> {
    /// Binds a method that takes its receiver by unique reference, such as
    /// `Vec::push`.
    ///
    /// The receiver stays mutably borrowed for `'a`, and the resulting
    /// delegates are always [`Local`](crate::markers::Local). The size rules
    /// of [`Binding::method`] apply.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. No call through a delegate made from this binding starts while
    ///    another one is still running. In particular, the method must not
    ///    call itself back through one of these delegates.
    ///
    /// # Examples
    ///
    /// ```
    /// use delegate::{Binding, DelegateFor, Method, markers::Local};
    ///
    /// let mut log: Vec<u16> = Vec::new();
    /// {
    ///     // SAFETY: `Vec::push` does not call back into the delegate.
    ///     let record: DelegateFor<'_, Method<fn(&mut Vec<u16>, u16)>, Local> =
    ///         unsafe { Binding::method_mut(&mut log, Vec::<u16>::push) }.into();
    ///     record.call(404);
    ///     record.call(200);
    /// }
    /// assert_eq!(log, [404, 200]);
    /// ```
    #[inline]
    #[must_use]
    pub unsafe fn method_mut(receiver: &'a mut T, method: M) -> Self
    where
        M: 'a,
    {
        assert_zero_sized::<M>();
        assert_not_zero_sized::<T>();
        let target = core::ptr::from_mut(receiver).cast::<()>().cast_const();
        // SAFETY:
        // 1. `OnMethodMut<T, M>` expects a `&mut T`
        // 2. `receiver` is borrowed for `'a`, and so is every lifetime in `M`
        // 3. Guaranteed by the caller
        unsafe { Self::from_raw(target) }
    }
}

impl<F: FnPointer> Binding<'static, Pointer<F>> {
    /// Binds a function pointer, storing it in the delegate itself.
    ///
    /// Nothing has to stay alive after binding.
    ///
    /// # Examples
    ///
    /// ```
    /// use delegate::{Binding, Delegate};
    ///
    /// fn double(x: u32) -> u32 {
    ///     x * 2
    /// }
    ///
    /// let table: [fn(u32) -> u32; 2] = [double, u32::reverse_bits];
    /// let delegate: Delegate<'static, fn(u32) -> u32> = Binding::pointer(table[0]).into();
    /// let same: Delegate<'static, fn(u32) -> u32> = Binding::pointer(table[0]).into();
    /// assert_eq!(delegate.call(21), 42);
    /// assert_eq!(delegate, same);
    /// ```
    #[inline]
    #[must_use]
    pub fn pointer(function: F) -> Self {
        let target = Pointer::erase(function);
        // SAFETY:
        // 1. `Pointer<F>` expects the output of `Pointer::<F>::erase`
        // 2. Function pointers are always live
        // 3. `Pointer<F>` has no target to share
        unsafe { Self::from_raw(target) }
    }
}

impl<'a, F: Copy + 'a> Binding<'a, Fixed<F>> {
    /// Binds a zero-sized callable whose type is its identity: a function item
    /// or a non-capturing closure.
    ///
    /// The delegate does not reference anything, so it can outlive the scope
    /// that created it. A generic function behaves like an overload set: its
    /// type parameters are resolved by the shape of the delegate it is
    /// materialized into.
    ///
    /// # Examples
    ///
    /// ```
    /// use delegate::{Binding, Delegate};
    ///
    /// let larger: Delegate<'static, fn(i32, i32) -> i32> = Binding::function(core::cmp::max).into();
    /// let longer: Delegate<'static, fn(usize, usize) -> usize> =
    ///     Binding::function(core::cmp::max).into();
    /// assert_eq!(larger.call(-3, 2), 2);
    /// assert_eq!(longer.call(8, 5), 8);
    /// ```
    ///
    /// A capturing closure is rejected:
    ///
    /// ```compile_fail
    /// use delegate::{Binding, Delegate};
    ///
    /// let offset = 1;
    /// let delegate: Delegate<'_, fn(i32) -> i32> =
    ///     Binding::function(move |x: i32| x + offset).into();
    /// ```
    #[inline]
    #[must_use]
    pub fn function(function: F) -> Self {
        assert_zero_sized::<F>();
        // SAFETY:
        // 1. `Fixed<F>` ignores its target
        // 2. Nothing is referenced, and every lifetime in `F` outlives `'a`
        // 3. `Fixed<F>` has no target to share
        unsafe { Self::from_raw(core::ptr::null()) }
    }
}

impl<'a, V, T, M> Binding<'a, FixedMethod<V, T, M>>
where
    V: Copy + Fn() -> &'static T,
    T: ?Sized + 'static,
    M: Copy + 'a,
{
    /// Binds the method `method` of the `'static` value returned by
    /// `accessor`.
    ///
    /// Both `accessor` and `method` must be zero-sized. This is what
    /// [`bind_const!`](crate::bind_const) expands to when given a value and a
    /// method: the value is promoted to a constant, so the delegate does not
    /// depend on the scope that created it.
    ///
    /// # Examples
    ///
    /// ```
    /// use delegate::{Binding, Delegate};
    ///
    /// struct Limits {
    ///     max: u16,
    /// }
    ///
    /// impl Limits {
    ///     fn clamp(&self, value: u16) -> u16 {
    ///         value.min(self.max)
    ///     }
    /// }
    ///
    /// static LIMITS: Limits = Limits { max: 100 };
    ///
    /// let delegate: Delegate<'static, fn(u16) -> u16> =
    ///     Binding::constant_method(|| &LIMITS, Limits::clamp).into();
    /// assert_eq!(delegate.call(250), 100);
    /// ```
    #[inline]
    #[must_use]
    pub fn constant_method(accessor: V, method: M) -> Self {
        assert_zero_sized::<V>();
        assert_zero_sized::<M>();
        // SAFETY:
        // 1. `FixedMethod<V, T, M>` ignores its target
        // 2. Nothing is referenced, and every lifetime in `M` outlives `'a`
        // 3. `FixedMethod<V, T, M>` has no target to share
        unsafe { Self::from_raw(core::ptr::null()) }
    }
}

impl<'a, D> Binding<'a, D> {
    /// Drops whatever the bound target returns, so that it can back a
    /// delegate that returns `()`.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::collections::BTreeSet;
    /// use std::sync::Mutex;
    ///
    /// use delegate::{Delegate, bind};
    ///
    /// let seen = Mutex::new(BTreeSet::new());
    /// let insert = |value: u8| seen.lock().map(|mut set| set.insert(value)).unwrap_or(false);
    /// let delegate: Delegate<'_, fn(u8)> = bind!(insert).discard_output().into();
    ///
    /// delegate.call(3);
    /// delegate.call(3);
    /// assert_eq!(seen.lock().unwrap().len(), 1);
    /// ```
    #[inline]
    #[must_use]
    pub fn discard_output(self) -> Binding<'a, Discard<D>> {
        // SAFETY:
        // 1. `Discard<D>` expects the same pointer as `D`
        // 2. Unchanged from `self`
        // 3. Unchanged from `self`
        unsafe { Binding::from_raw(self.as_raw()) }
    }

    /// Routes every call made through the resulting delegates through the
    /// hook `H`.
    ///
    /// See [`hooks`](crate::hooks) for details.
    #[inline]
    #[must_use]
    pub fn hooked<H: InvocationHook>(self) -> Binding<'a, Hooked<D, H>> {
        // SAFETY:
        // 1. `Hooked<D, H>` expects the same pointer as `D`
        // 2. Unchanged from `self`
        // 3. Unchanged from `self`
        unsafe { Binding::from_raw(self.as_raw()) }
    }

    /// Materializes this binding into a delegate of shape `S` with the
    /// thread-safety marker `T`.
    ///
    /// Fails to compile if the strategy cannot serve the shape `S`, or if `T`
    /// is [`SendSync`](crate::markers::SendSync) and the bound target is not
    /// `Sync`.
    ///
    /// # Examples
    ///
    /// ```
    /// use delegate::{Binding, Delegate, markers::Local};
    ///
    /// let mask = 0b1111;
    /// let describe = |x: u8| (x & mask).count_ones();
    /// let binding = Binding::callable(&describe);
    /// let shared = binding.into_delegate::<fn(u8) -> u32, delegate::markers::SendSync>();
    /// let local = binding.into_delegate::<fn(u8) -> u32, Local>();
    /// assert_eq!(shared.call(7), local.call(7));
    /// ```
    ///
    /// A mismatched shape is rejected:
    ///
    /// ```compile_fail
    /// use delegate::{Delegate, bind};
    ///
    /// let mask = 0b1111;
    /// let describe = |x: u8| (x & mask).count_ones();
    /// let delegate: Delegate<'_, fn(u8) -> u8> = bind!(describe).into();
    /// ```
    #[inline]
    #[must_use]
    pub fn into_delegate<S, T>(self) -> Delegate<'a, S, T>
    where
        S: Signature,
        T: ThreadSafetyMarker,
        D: Dispatch<S::Args, Output = S::Output> + TargetMarkerFor<T> + 'a,
    {
        // SAFETY:
        // 1. The binding's target is exactly what `D` expects
        let raw = unsafe { RawDelegate::<S>::new::<D>(self.as_raw()) };
        // SAFETY:
        // 1. `T` is either `SendSync` or `Local`, enforced by `ThreadSafetyMarker`
        // 2. The target is live for `'a`, guaranteed by the binding
        // 3. If `T = SendSync`, `D: Sync`, so the bound target is `Sync`
        // 4. Guaranteed by the binding
        unsafe { Delegate::from_raw(raw) }
    }
}

impl<'a, D, S, T> From<Binding<'a, D>> for Delegate<'a, S, T>
where
    S: Signature,
    T: ThreadSafetyMarker,
    D: Dispatch<S::Args, Output = S::Output> + TargetMarkerFor<T> + 'a,
{
    #[inline]
    fn from(binding: Binding<'a, D>) -> Self {
        binding.into_delegate()
    }
}

impl<'a, D> core::fmt::Debug for Binding<'a, D> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Binding")
            .field("strategy", &core::any::type_name::<D>())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use core::{
        cell::Cell,
        sync::atomic::{AtomicI32, Ordering},
    };

    use super::*;
    use crate::markers::Local;

    struct Thermostat {
        setpoint: AtomicI32,
    }

    impl Thermostat {
        fn adjust(&self, delta: i32) -> i32 {
            self.setpoint.fetch_add(delta, Ordering::Relaxed) + delta
        }

        fn read(&self) -> i32 {
            self.setpoint.load(Ordering::Relaxed)
        }
    }

    static OFFICE: Thermostat = Thermostat {
        setpoint: AtomicI32::new(20),
    };

    #[test]
    fn test_binding_traits() {
        static_assertions::assert_impl_all!(Binding<'static, ByRef<fn()>>: Copy, Clone, core::fmt::Debug);
        static_assertions::assert_eq_size!(Binding<'static, ByRef<fn()>>, *const ());
    }

    #[test]
    fn test_one_binding_many_shapes() {
        let thermostat = Thermostat {
            setpoint: AtomicI32::new(18),
        };
        let binding = Binding::method(&thermostat, Thermostat::adjust);

        let adjust: Delegate<'_, fn(i32) -> i32> = binding.into();
        let nudge: Delegate<'_, fn(i32)> = binding.discard_output().into();
        let local: Delegate<'_, fn(i32) -> i32, Local> = binding.into();

        assert_eq!(adjust.call(2), 20);
        nudge.call(1);
        assert_eq!(local.call(-3), 18);
        assert_eq!(thermostat.read(), 18);
    }

    #[test]
    fn test_constant_method_outlives_scope() {
        fn make() -> Delegate<'static, fn() -> i32> {
            Binding::constant_method(|| &OFFICE, Thermostat::read).into()
        }

        let delegate = make();
        assert_eq!(delegate.call(), OFFICE.read());
    }

    #[test]
    fn test_callable_with_interior_mutability() {
        let total = Cell::new(0u64);
        let accumulate = |value: u64| {
            total.set(total.get() + value);
            total.get()
        };
        let delegate: Delegate<'_, fn(u64) -> u64, Local> = Binding::callable(&accumulate).into();

        assert_eq!(delegate.call(5), 5);
        assert_eq!(delegate.call(6), 11);
        assert_eq!(total.get(), 11);
    }

    #[test]
    fn test_pointer_wraps_extern_fn() {
        extern "C" fn triple(value: i64) -> i64 {
            value * 3
        }

        let delegate: Delegate<'static, fn(i64) -> i64> =
            Binding::function(|value: i64| triple(value)).into();
        assert_eq!(delegate.call(14), 42);

        let pointer: Delegate<'static, fn(i64) -> i64> =
            Binding::pointer((|value: i64| triple(value)) as fn(i64) -> i64).into();
        assert_eq!(pointer.call(-1), -3);
    }

    #[test]
    fn test_debug_names_strategy() {
        let binding = Binding::function(|x: u8| x);
        let debug = alloc::format!("{binding:?}");
        assert!(debug.starts_with("Binding"));
        assert!(debug.contains("Fixed"));
    }

    #[test]
    fn test_copies_of_a_callable_are_distinct_targets() {
        let offset = 3u32;
        let shift = move |x: u32| x + offset;
        let copy = shift;

        let original: Delegate<'_, fn(u32) -> u32> = Binding::callable(&shift).into();
        let again: Delegate<'_, fn(u32) -> u32> = Binding::callable(&shift).into();
        let copied: Delegate<'_, fn(u32) -> u32> = Binding::callable(&copy).into();

        assert_eq!(original, again);
        assert_ne!(original, copied);
        assert_eq!(original.call(1), copied.call(1));
    }

    #[test]
    fn test_distinct_receivers_with_equal_state_are_unequal() {
        let first = Thermostat {
            setpoint: AtomicI32::new(21),
        };
        let second = Thermostat {
            setpoint: AtomicI32::new(21),
        };
        let on_first: Delegate<'_, fn() -> i32> = Binding::method(&first, Thermostat::read).into();
        let on_second: Delegate<'_, fn() -> i32> =
            Binding::method(&second, Thermostat::read).into();
        assert_ne!(on_first, on_second);
    }

    #[test]
    fn test_method_mut_appends() {
        let mut readings: alloc::vec::Vec<i32> = alloc::vec::Vec::new();
        {
            // SAFETY: `Vec::push` never calls back into the delegate.
            let record: crate::DelegateFor<
                '_,
                crate::Method<fn(&mut alloc::vec::Vec<i32>, i32)>,
                Local,
            > = unsafe { Binding::method_mut(&mut readings, alloc::vec::Vec::<i32>::push) }.into();
            let copy = record;
            record.call(18);
            copy.call(19);
        }
        assert_eq!(readings, [18, 19]);
    }

    #[test]
    fn test_callable_mut_accumulates() {
        let mut history = [0i64; 4];
        let mut cursor = 0;
        let mut push = |value: i64| {
            history[cursor] = value;
            cursor += 1;
            cursor
        };
        {
            // SAFETY: `push` never calls back into the delegate.
            let binding = unsafe { Binding::callable_mut(&mut push) };
            let counted: Delegate<'_, fn(i64) -> usize, Local> = binding.into();
            let silent: Delegate<'_, fn(i64), Local> = binding.discard_output().into();
            assert_eq!(counted.call(5), 1);
            silent.call(6);
            assert_eq!(counted.call(7), 3);
        }
        assert_eq!(history, [5, 6, 7, 0]);
    }

    #[test]
    fn test_unique_reference_bindings_are_local_only() {
        static_assertions::assert_not_impl_any!(ByMut<fn(u8)>: TargetMarkerFor<crate::markers::SendSync>);
        static_assertions::assert_not_impl_any!(
            OnMethodMut<u8, fn(&mut u8)>: TargetMarkerFor<crate::markers::SendSync>
        );
        static_assertions::assert_impl_all!(ByMut<fn(u8)>: TargetMarkerFor<Local>);
    }
}
