//! Shared helpers for the contract suite.

use std::sync::{Arc, Mutex};
use tallydb::prelude::*;

/// Fresh empty ledger with test logging wired up.
pub fn db() -> Tally {
    init_tracing();
    Tally::in_memory()
}

/// Install the tracing subscriber once for the whole test binary.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// Subscribe a collector and return the shared buffer of delivered events.
pub fn collect_events(db: &Tally) -> Arc<Mutex<Vec<ContractEvent>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    db.subscribe(move |event| sink.lock().unwrap().push(event.clone()));
    seen
}
