//! Simulation cost of each policy on seeded random workloads.
//!
//! Run with: cargo bench --bench policies

use cpusched::{Fcfs, Mlfq, MlfqConfig, Mlq, MlqConfig, Policy, RoundRobin, Srtf, Workload};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Instant;
use tabled::Table;

use utils::{Metrics, WorkloadSpec};

mod utils;

// ============================================================================
// Configuration
// ============================================================================

const WARMUP_ITERS: usize = 3;
const BENCH_ITERS: usize = 20;

const SPECS: &[WorkloadSpec] = &[
    WorkloadSpec {
        processes: 10,
        arrival_window: 50,
        max_burst: 20,
    },
    WorkloadSpec {
        processes: 100,
        arrival_window: 500,
        max_burst: 50,
    },
    WorkloadSpec {
        processes: 1_000,
        arrival_window: 5_000,
        max_burst: 100,
    },
];

fn policies() -> Vec<Box<dyn Policy>> {
    vec![
        Box::new(Fcfs::new()),
        Box::new(Srtf::new()),
        Box::new(RoundRobin::new(4).expect("valid quantum")),
        Box::new(Mlq::new(MlqConfig::default()).expect("valid config")),
        Box::new(Mlfq::new(MlfqConfig::default()).expect("valid config")),
    ]
}

fn measure(policy: &dyn Policy, workload: &Workload) -> Metrics {
    for _ in 0..WARMUP_ITERS {
        std::hint::black_box(policy.run(workload));
    }
    let mut metrics = Metrics::new();
    for _ in 0..BENCH_ITERS {
        let start = Instant::now();
        std::hint::black_box(policy.run(workload));
        metrics.record(start.elapsed());
    }
    metrics
}

fn main() {
    #[derive(tabled::Tabled)]
    struct ResultTable {
        policy: &'static str,
        processes: u32,
        makespan: u64,
        p50_us: String,
        p99_us: String,
        mean_us: String,
    }

    let mut rows = Vec::new();
    for spec in SPECS {
        let mut rng = StdRng::seed_from_u64(0xC0FFEE);
        let workload = utils::generate_workload(&mut rng, *spec);
        for policy in policies() {
            let metrics = measure(policy.as_ref(), &workload);
            let makespan = policy.run(&workload).stats().makespan();
            let us = |d: std::time::Duration| format!("{:.1}", d.as_secs_f64() * 1e6);
            rows.push(ResultTable {
                policy: policy.name(),
                processes: spec.processes,
                makespan,
                p50_us: us(metrics.quantile(50.0)),
                p99_us: us(metrics.quantile(99.0)),
                mean_us: us(metrics.mean()),
            });
        }
    }
    println!("\nResults (us per run):\n{}", Table::new(rows));
}
