#![deny(
    missing_docs,
    unsafe_code,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::broken_intra_doc_links,
    missing_copy_implementations,
    unused_doc_comments
)]

//! Tracing spans for delegate invocations.
//!
//! This crate provides [`TraceInvocations`], an
//! [`InvocationHook`](delegate::hooks::InvocationHook) that wraps every call
//! made through a delegate in a `tracing` span and emits one event per call.
//!
//! # How It Works
//!
//! Hooks are attached per binding, so only the delegates you opt in are
//! traced. Everything is recorded at `TRACE` level under the target
//! `delegate`, so it can be filtered like any other target:
//!
//! - span `delegate.call`, with the field `strategy` naming how the target was
//!   bound (e.g. `OnMethod<Counter, increment>`)
//! - event `delegate invoked` inside that span, once per call
//!
//! # Quick Start
//!
//! ```
//! use core::sync::atomic::{AtomicU32, Ordering};
//!
//! use delegate::prelude::*;
//! use delegate_tracing::BindingExt;
//!
//! struct Counter {
//!     count: AtomicU32,
//! }
//!
//! impl Counter {
//!     fn increment(&self) {
//!         self.count.fetch_add(1, Ordering::Relaxed);
//!     }
//! }
//!
//! let counter = Counter { count: AtomicU32::new(0) };
//! let delegate: Delegate<'_, fn()> = bind!(counter, Counter::increment).traced().into();
//! delegate.call();
//! assert_eq!(counter.count.load(Ordering::Relaxed), 1);
//! ```
//!
//! # Environment Variables
//!
//! - `DELEGATE_TRACING` - Comma-separated options:
//!   - `full` - Record strategies with their full type names, including
//!     module paths

use std::{fmt, sync::OnceLock};

use delegate::{Binding, hooks::InvocationHook, strategy::Hooked};

/// Invocation hook that records delegate calls with `tracing`.
///
/// Usually attached with [`BindingExt::traced`], which is shorthand for
/// `binding.hooked::<TraceInvocations>()`.
///
/// # Examples
///
/// ```
/// use delegate::prelude::*;
/// use delegate_tracing::TraceInvocations;
///
/// let seed = 0;
/// let checksum = |data: &'static [u8]| data.iter().map(|&byte| u32::from(byte)).sum::<u32>() + seed;
/// let delegate: Delegate<'_, fn(&'static [u8]) -> u32> =
///     bind!(checksum).hooked::<TraceInvocations>().into();
/// assert_eq!(delegate.call(b"abc"), 294);
/// ```
#[derive(Copy, Clone, Debug, Default)]
pub struct TraceInvocations;

impl InvocationHook for TraceInvocations {
    fn invoke<R>(strategy: &'static str, call: impl FnOnce() -> R) -> R {
        let options = DelegateTracingEnvOptions::get();
        let strategy = StrategyName {
            name: strategy,
            full: options.full_names,
        };
        let span = tracing::trace_span!(target: "delegate", "delegate.call", strategy = %strategy);
        let _entered = span.enter();
        tracing::trace!(target: "delegate", "delegate invoked");
        call()
    }
}

#[derive(Debug)]
struct DelegateTracingEnvOptions {
    full_names: bool,
}

impl DelegateTracingEnvOptions {
    fn get() -> &'static Self {
        static DELEGATE_TRACING_FLAGS: OnceLock<DelegateTracingEnvOptions> = OnceLock::new();

        DELEGATE_TRACING_FLAGS.get_or_init(|| {
            let mut full_names = false;

            if let Some(var) = std::env::var_os("DELEGATE_TRACING") {
                for v in var.to_string_lossy().split(',') {
                    if v.trim().eq_ignore_ascii_case("full") {
                        full_names = true;
                    }
                }
            }

            DelegateTracingEnvOptions { full_names }
        })
    }
}

/// A strategy's type name, displayed with or without module paths.
#[derive(Copy, Clone)]
struct StrategyName {
    name: &'static str,
    full: bool,
}

impl fmt::Display for StrategyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.full {
            return f.write_str(self.name);
        }

        let mut path_start = 0;
        for (index, ch) in self.name.char_indices() {
            if matches!(ch, '<' | '>' | ',' | ' ' | '(' | ')' | '[' | ']' | ';' | '&' | '*') {
                f.write_str(last_segment(&self.name[path_start..index]))?;
                write!(f, "{ch}")?;
                path_start = index + ch.len_utf8();
            }
        }
        f.write_str(last_segment(&self.name[path_start..]))
    }
}

/// Returns the last `::`-separated segment of a path.
fn last_segment(path: &str) -> &str {
    path.rsplit("::").next().unwrap_or(path)
}

/// Extension trait for tracing the delegates made from a binding.
///
/// # Examples
///
/// ```
/// use delegate::prelude::*;
/// use delegate_tracing::BindingExt;
///
/// let parse: Delegate<'static, fn(&'static str) -> Option<u16>> =
///     bind_const!(|text: &'static str| text.parse::<u16>().ok()).traced().into();
/// assert_eq!(parse.call("443"), Some(443));
/// ```
pub trait BindingExt<'a, D> {
    /// Routes every call made through the resulting delegates through
    /// [`TraceInvocations`].
    fn traced(self) -> Binding<'a, Hooked<D, TraceInvocations>>;
}

impl<'a, D> BindingExt<'a, D> for Binding<'a, D> {
    fn traced(self) -> Binding<'a, Hooked<D, TraceInvocations>> {
        self.hooked::<TraceInvocations>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn short(name: &'static str) -> String {
        StrategyName { name, full: false }.to_string()
    }

    #[test]
    fn test_short_names_drop_module_paths() {
        assert_eq!(
            short("delegate_internals::dispatch::OnMethod<app::Counter, app::Counter::increment>"),
            "OnMethod<Counter, increment>"
        );
        assert_eq!(
            short("delegate_internals::dispatch::Pointer<fn(u8) -> u8>"),
            "Pointer<fn(u8) -> u8>"
        );
        assert_eq!(
            short("delegate_internals::dispatch::ByRef<app::main::{{closure}}>"),
            "ByRef<{{closure}}>"
        );
        assert_eq!(short("Plain"), "Plain");
    }

    #[test]
    fn test_full_names_are_untouched() {
        let name = "delegate_internals::dispatch::Fixed<core::cmp::max<u8>>";
        assert_eq!(StrategyName { name, full: true }.to_string(), name);
    }

    #[test]
    fn test_last_segment() {
        assert_eq!(last_segment("a::b::c"), "c");
        assert_eq!(last_segment("c"), "c");
        assert_eq!(last_segment(""), "");
    }
}
