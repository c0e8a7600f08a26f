/// Binds an object by reference.
///
/// This macro can be invoked in two different ways.
///
/// ## Binding a callable object
///
/// `bind!(object)` binds an object that is itself callable, such as a closure.
/// It is equivalent to [`Binding::callable(&object)`](crate::Binding::callable).
///
/// ## Binding a method
///
/// `bind!(object, Type::method)` binds a method of the object. The method can
/// be any zero-sized callable taking `&Type` first: a method path, a
/// qualified trait method path, or a non-capturing closure. It is equivalent to
/// [`Binding::method(&object, Type::method)`](crate::Binding::method).
///
/// In both cases `object` is borrowed, so pass the object itself, not a
/// reference to it. It must not be zero-sized: non-capturing closures and
/// unit structs go through [`bind_const!`](crate::bind_const) instead. The result is a [`Binding`](crate::Binding) that is turned
/// into a [`Delegate`](crate::Delegate) with `.into()`.
///
/// # Examples
///
/// ```
/// use core::sync::atomic::{AtomicI64, Ordering};
///
/// use delegate::prelude::*;
///
/// trait Account {
///     fn deposit(&self, amount: i64) -> i64;
/// }
///
/// struct Wallet {
///     balance: AtomicI64,
/// }
///
/// impl Account for Wallet {
///     fn deposit(&self, amount: i64) -> i64 {
///         self.balance.fetch_add(amount, Ordering::Relaxed) + amount
///     }
/// }
///
/// let wallet = Wallet { balance: AtomicI64::new(10) };
/// let deposit: Delegate<'_, fn(i64) -> i64> = bind!(wallet, <Wallet as Account>::deposit).into();
/// assert_eq!(deposit.call(5), 15);
///
/// let floor = 0;
/// let audit = |amount: i64| amount >= floor;
/// let check: Delegate<'_, fn(i64) -> bool> = bind!(audit).into();
/// assert!(check.call(5));
/// ```
#[macro_export]
macro_rules! bind {
    ($receiver:expr, $method:expr $(,)?) => {
        $crate::Binding::method(&$receiver, $method)
    };
    ($callable:expr $(,)?) => {
        $crate::Binding::callable(&$callable)
    };
}

/// Binds something fixed at compile time, producing delegates that do not
/// reference anything.
///
/// This macro can be invoked in two different ways.
///
/// ## Binding a function
///
/// `bind_const!(function)` binds a zero-sized callable: a function item, a
/// method path, or a non-capturing closure. It is equivalent to
/// [`Binding::function(function)`](crate::Binding::function). Closures need
/// annotated argument types.
///
/// ## Binding a method of a constant
///
/// `bind_const!(value, Type::method)` binds a method of a value that can be
/// promoted to a `'static` constant (a literal, a constant expression, or a
/// `static`). It expands to
/// [`Binding::constant_method`](crate::Binding::constant_method) with an
/// accessor closure returning `&value`.
///
/// # Examples
///
/// ```
/// use delegate::prelude::*;
///
/// fn make() -> Delegate<'static, fn() -> usize> {
///     bind_const!([1, 2, 3, 4], |items: &[i32; 4]| items.len()).into()
/// }
///
/// let length = make();
/// assert_eq!(length.call(), 4);
///
/// let is_even: Delegate<'static, fn(u32) -> bool> = bind_const!(|x: u32| x % 2 == 0).into();
/// assert!(is_even.call(10));
/// ```
///
/// A value that borrows from the current scope is rejected:
///
/// ```compile_fail
/// use delegate::prelude::*;
///
/// let items = vec![1, 2, 3];
/// let length: Delegate<'static, fn() -> usize> = bind_const!(items, Vec::<i32>::len).into();
/// ```
#[macro_export]
macro_rules! bind_const {
    ($value:expr, $method:expr $(,)?) => {
        $crate::Binding::constant_method(|| -> &'static _ { &$value }, $method)
    };
    ($function:expr $(,)?) => {
        $crate::Binding::function($function)
    };
}
