//! Test doubles for pins and delays
//!
//! Pins and delays append to one shared trace so tests can check the
//! exact interleaving of writes and waits.

use core::cell::RefCell;

use embedded_hal::digital::{self, ErrorType, OutputPin};
use embedded_hal_async::delay::DelayNs;
use heapless::Vec;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entry {
    Write(&'static str, bool),
    DelayMs(u32),
}

pub type Trace = RefCell<Vec<Entry, 256>>;

pub fn new_trace() -> Trace {
    RefCell::new(Vec::new())
}

pub fn record(trace: &Trace, entry: Entry) {
    trace.borrow_mut().push(entry).expect("trace full");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinFault;

impl digital::Error for PinFault {
    fn kind(&self) -> digital::ErrorKind {
        digital::ErrorKind::Other
    }
}

pub struct MockPin<'a> {
    name: &'static str,
    trace: &'a Trace,
    pub high: bool,
    pub fail: bool,
}

impl<'a> MockPin<'a> {
    pub fn new(name: &'static str, trace: &'a Trace) -> Self {
        Self {
            name,
            trace,
            high: false,
            fail: false,
        }
    }

    pub fn failing(name: &'static str, trace: &'a Trace) -> Self {
        Self {
            fail: true,
            ..Self::new(name, trace)
        }
    }

    fn write(&mut self, high: bool) -> Result<(), PinFault> {
        if self.fail {
            return Err(PinFault);
        }
        self.high = high;
        record(self.trace, Entry::Write(self.name, high));
        Ok(())
    }
}

impl ErrorType for MockPin<'_> {
    type Error = PinFault;
}

impl OutputPin for MockPin<'_> {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.write(false)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.write(true)
    }
}

/// Delay that returns immediately after recording itself
///
/// With `yielding` set it also yields once, so joined futures interleave.
/// `hook` runs after the first recorded delay.
pub struct MockDelay<'a> {
    trace: &'a Trace,
    yielding: bool,
    hook: Option<&'a dyn Fn()>,
}

impl<'a> MockDelay<'a> {
    pub fn new(trace: &'a Trace) -> Self {
        Self {
            trace,
            yielding: false,
            hook: None,
        }
    }

    pub fn yielding(trace: &'a Trace) -> Self {
        Self {
            yielding: true,
            ..Self::new(trace)
        }
    }

    pub fn with_hook(trace: &'a Trace, hook: &'a dyn Fn()) -> Self {
        Self {
            hook: Some(hook),
            ..Self::new(trace)
        }
    }
}

impl DelayNs for MockDelay<'_> {
    async fn delay_ns(&mut self, ns: u32) {
        self.delay_ms(ns / 1_000_000).await;
    }

    async fn delay_ms(&mut self, ms: u32) {
        record(self.trace, Entry::DelayMs(ms));
        if let Some(hook) = self.hook.take() {
            hook();
        }
        if self.yielding {
            embassy_futures::yield_now().await;
        }
    }
}

/// Pin writes only, in order
pub fn writes(trace: &Trace) -> Vec<(&'static str, bool), 256> {
    trace
        .borrow()
        .iter()
        .filter_map(|e| match e {
            Entry::Write(name, level) => Some((*name, *level)),
            Entry::DelayMs(_) => None,
        })
        .collect()
}
