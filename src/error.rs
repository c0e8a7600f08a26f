/// The error returned when calling a delegate that has nothing bound.
///
/// Returned by [`Delegate::try_call`](crate::Delegate::try_call) and
/// [`Delegate::try_invoke`](crate::Delegate::try_invoke).
///
/// # Examples
///
/// ```
/// use delegate::{Delegate, EmptyDelegateError};
///
/// let delegate: Delegate<'_, fn(u8) -> u8> = Delegate::empty();
/// assert_eq!(delegate.try_call(1), Err(EmptyDelegateError));
/// assert_eq!(EmptyDelegateError.to_string(), "called an empty delegate");
/// ```
#[derive(Copy, Clone, PartialEq, Eq, Default, Hash)]
pub struct EmptyDelegateError;

impl core::fmt::Debug for EmptyDelegateError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EmptyDelegateError").finish()
    }
}

impl core::fmt::Display for EmptyDelegateError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "called an empty delegate")
    }
}

impl core::error::Error for EmptyDelegateError {}
