//! Per-thread log capture for tests.

use std::cell::RefCell;
use std::sync::Once;

use log::{Level, LevelFilter, Log, Metadata, Record};

struct Capture;

static LOGGER: Capture = Capture;
static INIT: Once = Once::new();

thread_local! {
    static RECORDS: RefCell<Vec<(Level, String)>> = const { RefCell::new(Vec::new()) };
}

impl Log for Capture {
    fn enabled(&self, _: &Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &Record<'_>) {
        RECORDS.with(|r| r.borrow_mut().push((record.level(), record.args().to_string())));
    }

    fn flush(&self) {}
}

/// Install the capturing logger (once) and clear this thread's records.
pub fn reset() {
    INIT.call_once(|| {
        log::set_logger(&LOGGER).expect("no other logger in tests");
        log::set_max_level(LevelFilter::Trace);
    });
    RECORDS.with(|r| r.borrow_mut().clear());
}

pub fn records() -> Vec<(Level, String)> {
    RECORDS.with(|r| r.borrow().clone())
}
