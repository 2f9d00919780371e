use crate::process::Tick;

/// Per-run counters.
/// Single-threaded: plain integers, one instance per policy run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunStats {
    // Time accounting
    pub busy_ticks: Tick,
    pub idle_ticks: Tick,

    // Dispatch
    pub dispatches: u64,       // number of dispatch decisions (one per executed slice request)
    pub context_switches: u64, // dispatches that changed the running process

    // Multilevel bookkeeping
    pub demotions: u64,
    pub aging_sweeps: u64,
    pub aged_processes: u64, // processes moved back to the top queue by aging
}

impl RunStats {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn record_busy(&mut self, ticks: Tick) {
        self.busy_ticks += ticks;
    }

    #[inline]
    pub fn record_idle(&mut self, ticks: Tick) {
        self.idle_ticks += ticks;
    }

    #[inline]
    pub fn record_dispatch(&mut self, switched: bool) {
        self.dispatches += 1;
        if switched {
            self.context_switches += 1;
        }
    }

    #[inline]
    pub fn record_demotion(&mut self) {
        self.demotions += 1;
    }

    /// Call once per aging sweep with the number of processes it promoted.
    #[inline]
    pub fn record_aging_sweep(&mut self, promoted: usize) {
        self.aging_sweeps += 1;
        self.aged_processes += promoted as u64;
    }

    /// Sweeps that fell inside an idle stretch, when every queue was empty.
    #[inline]
    pub fn record_empty_sweeps(&mut self, sweeps: u64) {
        self.aging_sweeps += sweeps;
    }

    /// Total simulated ticks from time 0 to the last completion.
    pub fn makespan(&self) -> Tick {
        self.busy_ticks + self.idle_ticks
    }

    /// Fraction of the makespan the CPU was busy, `None` for an empty run.
    pub fn utilization(&self) -> Option<f64> {
        let total = self.makespan();
        if total == 0 {
            return None;
        }
        Some(self.busy_ticks as f64 / total as f64)
    }
}
