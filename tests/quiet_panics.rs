//! Panic hook handling during a run
//!
//! The panic hook is process-global, so this binary holds a single test.

use std::panic;
use std::sync::atomic::{AtomicUsize, Ordering};

use rfsnap::harness::{ConsoleReporter, RunConfig, Suite, TestStatus};

static HOOK_CALLS: AtomicUsize = AtomicUsize::new(0);

#[test]
fn caught_panics_skip_the_hook_and_the_hook_is_restored() {
    panic::set_hook(Box::new(|_| {
        HOOK_CALLS.fetch_add(1, Ordering::SeqCst);
    }));

    let mut suite = Suite::new();
    suite.describe("Noisy", |g| {
        g.it("panics", || panic!("boom"));
        g.it("passes", || Ok(()));
    });

    let mut reporter = ConsoleReporter::new(Vec::new());
    let summary = suite.run(&RunConfig::default(), &mut reporter).unwrap();
    assert_eq!(summary.cases[0].status, TestStatus::Errored);
    assert_eq!(summary.cases[0].message.as_deref(), Some("panicked: boom"));
    assert_eq!(summary.passed, 1);
    assert_eq!(HOOK_CALLS.load(Ordering::SeqCst), 0);

    // outside the run the caller's hook sees panics again
    let caught = panic::catch_unwind(|| {
        panic!("after the run");
    });
    assert!(caught.is_err());
    assert_eq!(HOOK_CALLS.load(Ordering::SeqCst), 1);

    let _ = panic::take_hook();
}
