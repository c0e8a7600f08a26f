//! Integration tests for the delegate-tracing crate.
//!
//! Each test installs a thread-local subscriber made of a [`Registry`] and a
//! counting layer, and checks what the traced delegates recorded:
//!
//! - `test_one_event_per_call`: Every call emits exactly one event inside one
//!   span
//! - `test_untraced_delegates_are_silent`: Delegates bound without the hook
//!   record nothing
//! - `test_strategy_field_names_the_binding`: The span's `strategy` field
//!   names how the target was bound
//! - `test_traced_result_is_unchanged`: The hook does not alter results

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicU32, AtomicUsize, Ordering},
};

use delegate::prelude::*;
use delegate_tracing::{BindingExt, TraceInvocations};
use tracing::{
    Event, Subscriber,
    field::{Field, Visit},
    span::{Attributes, Id},
};
use tracing_subscriber::{
    Registry,
    layer::{Context, Layer, SubscriberExt},
    registry::LookupSpan,
};

#[derive(Clone, Default)]
struct Recorded {
    spans: Arc<AtomicUsize>,
    events: Arc<AtomicUsize>,
    strategies: Arc<Mutex<Vec<String>>>,
}

struct CountingLayer {
    recorded: Recorded,
}

struct StrategyVisitor<'a> {
    strategies: &'a Mutex<Vec<String>>,
}

impl<'a> Visit for StrategyVisitor<'a> {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "strategy" {
            if let Ok(mut strategies) = self.strategies.lock() {
                strategies.push(format!("{value:?}"));
            }
        }
    }
}

impl<S> Layer<S> for CountingLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(&self, attrs: &Attributes<'_>, _id: &Id, _ctx: Context<'_, S>) {
        if attrs.metadata().target() == "delegate" {
            self.recorded.spans.fetch_add(1, Ordering::SeqCst);
            attrs.record(&mut StrategyVisitor {
                strategies: &self.recorded.strategies,
            });
        }
    }

    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        if event.metadata().target() == "delegate" {
            assert!(ctx.event_span(event).is_some(), "event outside of its span");
            self.recorded.events.fetch_add(1, Ordering::SeqCst);
        }
    }
}

fn with_recording(test: impl FnOnce()) -> Recorded {
    let recorded = Recorded::default();
    let subscriber = Registry::default().with(CountingLayer {
        recorded: recorded.clone(),
    });
    tracing::subscriber::with_default(subscriber, test);
    recorded
}

struct Counter {
    count: AtomicU32,
}

impl Counter {
    fn increment(&self) {
        self.count.fetch_add(1, Ordering::Relaxed);
    }
}

#[test]
fn test_one_event_per_call() {
    let counter = Counter {
        count: AtomicU32::new(0),
    };
    let recorded = with_recording(|| {
        let delegate: Delegate<'_, fn()> = bind!(counter, Counter::increment).traced().into();
        for _ in 0..3 {
            delegate.call();
        }
    });

    assert_eq!(counter.count.load(Ordering::Relaxed), 3);
    assert_eq!(recorded.spans.load(Ordering::SeqCst), 3);
    assert_eq!(recorded.events.load(Ordering::SeqCst), 3);
}

#[test]
fn test_untraced_delegates_are_silent() {
    let recorded = with_recording(|| {
        let delegate: Delegate<'static, fn(u8) -> u8> = bind_const!(|x: u8| x / 2).into();
        assert_eq!(delegate.call(8), 4);
    });

    assert_eq!(recorded.spans.load(Ordering::SeqCst), 0);
    assert_eq!(recorded.events.load(Ordering::SeqCst), 0);
}

#[test]
fn test_strategy_field_names_the_binding() {
    let counter = Counter {
        count: AtomicU32::new(0),
    };
    let recorded = with_recording(|| {
        let method: Delegate<'_, fn()> = bind!(counter, Counter::increment).traced().into();
        let pointer: Delegate<'static, fn(u8) -> u8> =
            Binding::pointer(u8::reverse_bits as fn(u8) -> u8)
                .hooked::<TraceInvocations>()
                .into();
        method.call();
        pointer.call(1);
    });

    let strategies = recorded
        .strategies
        .lock()
        .map(|strategies| strategies.clone())
        .unwrap_or_default();
    assert_eq!(strategies.len(), 2);
    assert!(strategies[0].starts_with("OnMethod<Counter"), "{}", strategies[0]);
    assert_eq!(strategies[1], "Pointer<fn(u8) -> u8>");
}

#[test]
fn test_traced_result_is_unchanged() {
    let recorded = with_recording(|| {
        let offset = 100;
        let shift = |x: i32| x + offset;
        let traced: Delegate<'_, fn(i32) -> i32> = bind!(shift).traced().into();
        let plain: Delegate<'_, fn(i32) -> i32> = bind!(shift).into();
        for value in [-5, 0, 5] {
            assert_eq!(traced.call(value), plain.call(value));
        }
        let discarded: Delegate<'_, fn(i32)> = bind!(shift).discard_output().traced().into();
        discarded.call(1);
    });

    assert_eq!(recorded.events.load(Ordering::SeqCst), 4);
}
