use std::cell::Cell;
use std::time::{Duration, Instant};

/// Counters captured around a single tree operation.
///
/// `begin` resets the comparison count and takes a start timestamp, `end`
/// records the elapsed wall-clock time. Readouts always describe the most
/// recently completed call only; nothing accumulates across calls.
///
/// `Cell` keeps query operations usable through a shared reference. The tree
/// is single-threaded by contract, so this is plain interior mutability, not
/// synchronization.
#[derive(Debug)]
pub struct OpStats {
    comparisons: Cell<u64>,
    started: Cell<Option<Instant>>,
    elapsed: Cell<Duration>,
}

impl OpStats {
    pub fn new() -> Self {
        Self {
            comparisons: Cell::new(0),
            started: Cell::new(None),
            elapsed: Cell::new(Duration::ZERO),
        }
    }

    pub fn begin(&self) {
        self.comparisons.set(0);
        self.started.set(Some(Instant::now()));
    }

    pub fn end(&self) {
        if let Some(started) = self.started.get() {
            self.elapsed.set(started.elapsed());
        }
    }

    #[inline]
    pub fn bump(&self) {
        self.comparisons.set(self.comparisons.get() + 1);
    }

    pub fn comparisons(&self) -> u64 {
        self.comparisons.get()
    }

    pub fn elapsed_millis(&self) -> f64 {
        self.elapsed.get().as_secs_f64() * 1_000.0
    }
}

impl Default for OpStats {
    fn default() -> Self {
        Self::new()
    }
}
