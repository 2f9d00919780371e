//! Discrete-time CPU scheduling simulator.
//!
//! A [`Workload`] is a validated batch of processes. Each [`Policy`] runs over
//! its own fresh copy of the workload and produces a [`Schedule`]: per-process
//! completion, turnaround and waiting times, the dispatch timeline and run
//! counters. [`Report`] renders a schedule as a table.
//!
//! ```
//! use cpusched::{Policy, Process, Report, RoundRobin, Workload};
//!
//! let workload = Workload::new(vec![Process::new(1, 0, 5), Process::new(2, 1, 3)]).unwrap();
//! let schedule = RoundRobin::new(2).unwrap().run(&workload);
//! assert_eq!(schedule.completion_of(2).unwrap().completion, 7);
//! println!("{}", Report::new(&schedule));
//! ```

mod clock;
mod error;
mod process;
mod queue;
mod report;
pub mod scheduler;
mod stats;

pub use clock::Slice;
pub use error::Error;
pub use process::{Completion, Pid, PriorityClass, Process, ProcessRecord, Tick, Workload};
pub use report::{summary, timeline, Averages, Report, Row};
pub use scheduler::{Fcfs, Mlfq, MlfqConfig, Mlq, MlqConfig, Policy, RoundRobin, Schedule, Srtf};
pub use stats::RunStats;

/// Round robin quantum used when none is given.
pub const DEFAULT_RR_QUANTUM: Tick = 4;

static_assertions::assert_impl_all!(Workload: Send, Sync, Clone);
static_assertions::assert_impl_all!(Schedule: Send, Sync, Clone);
