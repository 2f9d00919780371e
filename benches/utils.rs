use cpusched::{PriorityClass, Process, Workload};
use rand::Rng;
use std::time::Duration;

// ============================================================================
// Workload Generation
// ============================================================================

#[derive(Clone, Copy)]
pub struct WorkloadSpec {
    pub processes: u32,
    /// Arrivals are spread uniformly over [0, arrival_window)
    pub arrival_window: u64,
    pub max_burst: u64,
}

/// Random workload with a uniform mix of priority classes.
pub fn generate_workload(rng: &mut impl Rng, spec: WorkloadSpec) -> Workload {
    let processes = (1..=spec.processes)
        .map(|id| {
            let class = match rng.gen_range(0..3) {
                0 => PriorityClass::System,
                1 => PriorityClass::Interactive,
                _ => PriorityClass::Batch,
            };
            Process::new(
                id,
                rng.gen_range(0..spec.arrival_window.max(1)),
                rng.gen_range(1..=spec.max_burst),
            )
            .with_priority(class)
        })
        .collect();
    Workload::new(processes).expect("generated ids are unique and bursts positive")
}

// ============================================================================
// Latency Statistics
// ============================================================================

#[derive(Debug, Clone)]
pub struct Metrics {
    iters: Vec<Duration>,
}

impl Metrics {
    pub fn new() -> Self {
        Self { iters: Vec::new() }
    }
    pub fn record(&mut self, lat: Duration) {
        self.iters.push(lat);
    }
    pub fn quantile(&self, q: f64) -> Duration {
        if self.iters.is_empty() {
            return Duration::ZERO;
        }
        let mut iters = self.iters.clone();
        iters.sort();
        let idx = ((q / 100.0) * (iters.len() - 1) as f64).round() as usize;
        iters[idx.min(iters.len() - 1)]
    }
    pub fn mean(&self) -> Duration {
        if self.iters.is_empty() {
            return Duration::ZERO;
        }
        self.iters.iter().sum::<Duration>() / self.iters.len() as u32
    }
}
