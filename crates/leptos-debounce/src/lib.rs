//! Leptos Debounce Utilities
//!
//! Delays a callback until input has been quiet for a fixed period.
//! Each new call supersedes the pending one via a generation counter.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;

/// Generation counter deciding which scheduled call is still current
#[derive(Debug, Default)]
pub struct DebounceGate {
    generation: AtomicU64,
}

impl DebounceGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new quiet period, superseding every earlier ticket
    pub fn arm(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// True while no newer `arm` happened since `ticket` was issued
    pub fn is_current(&self, ticket: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket
    }

    /// Run `f` only if `ticket` is still current; returns whether it ran
    pub fn run_if_current<F: FnOnce()>(&self, ticket: u64, f: F) -> bool {
        let current = self.is_current(ticket);
        if current {
            f();
        }
        current
    }

    /// Drop any pending call without scheduling a new one
    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }
}

/// Timer-backed debouncer for the browser event loop
#[derive(Clone)]
pub struct Debouncer {
    gate: Arc<DebounceGate>,
    delay_ms: u32,
}

impl Debouncer {
    pub fn new(delay_ms: u32) -> Self {
        Self {
            gate: Arc::new(DebounceGate::new()),
            delay_ms,
        }
    }

    pub fn delay_ms(&self) -> u32 {
        self.delay_ms
    }

    /// Run `f` once `delay_ms` passes without another `call`
    pub fn call<F>(&self, f: F)
    where
        F: FnOnce() + 'static,
    {
        let ticket = self.gate.arm();
        let gate = self.gate.clone();
        let delay = self.delay_ms;
        wasm_bindgen_futures::spawn_local(async move {
            TimeoutFuture::new(delay).await;
            gate.run_if_current(ticket, f);
        });
    }

    pub fn cancel(&self) {
        self.gate.cancel();
    }
}

/// Create an input handler that forwards the field value after the quiet period
///
/// `on_input` runs immediately with the raw value (for echoing it back into the field),
/// `on_settle` runs only with the last value once typing pauses.
pub fn make_on_debounced_input<I, S>(
    debouncer: Debouncer,
    on_input: I,
    on_settle: S,
) -> impl Fn(web_sys::Event) + 'static
where
    I: Fn(String) + 'static,
    S: Fn(String) + Clone + 'static,
{
    move |ev: web_sys::Event| {
        let value = event_target_value(&ev);
        on_input(value.clone());
        let on_settle = on_settle.clone();
        debouncer.call(move || on_settle(value));
    }
}
