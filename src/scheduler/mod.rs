mod fcfs;
mod mlfq;
mod mlq;
mod round_robin;
mod srtf;
pub use fcfs::Fcfs;
pub use mlfq::{Mlfq, MlfqConfig};
pub use mlq::{Mlq, MlqConfig};
pub use round_robin::RoundRobin;
pub use srtf::Srtf;

use crate::clock::{Cpu, Slice};
use crate::process::{Completion, Pid, ProcessRecord, Workload};
use crate::stats::RunStats;

/// A scheduling policy: turns a workload into a complete schedule.
///
/// Implementations are stateless between runs; every call to `run` starts
/// from a fresh working copy of the workload, so repeated runs are identical.
pub trait Policy {
    /// Display name used in reports.
    fn name(&self) -> &'static str;
    /// Whether reports show the priority column. True for the multilevel policies.
    fn is_priority_aware(&self) -> bool {
        false
    }
    fn run(&self, workload: &Workload) -> Schedule;
}

/// Outcome of one policy run.
#[derive(Clone, Debug)]
pub struct Schedule {
    policy: &'static str,
    priority_aware: bool,
    records: Vec<ProcessRecord>,
    timeline: Vec<Slice>,
    stats: RunStats,
}

impl Schedule {
    pub(crate) fn new<P: Policy + ?Sized>(policy: &P, records: Vec<ProcessRecord>, cpu: Cpu) -> Self {
        let (timeline, stats) = cpu.finish();
        debug_assert!(records.iter().all(|r| r.completion().is_some()));
        log::debug!(
            "{}: {} processes finished at t={} ({} context switches)",
            policy.name(),
            records.len(),
            stats.makespan(),
            stats.context_switches
        );
        Self {
            policy: policy.name(),
            priority_aware: policy.is_priority_aware(),
            records,
            timeline,
            stats,
        }
    }

    pub fn policy(&self) -> &'static str {
        self.policy
    }
    pub fn is_priority_aware(&self) -> bool {
        self.priority_aware
    }
    /// Finished records in the policy's working order.
    pub fn records(&self) -> &[ProcessRecord] {
        &self.records
    }
    /// `(id, completion)` pairs sorted by id.
    pub fn completions(&self) -> Vec<(Pid, Completion)> {
        let mut out = self
            .records
            .iter()
            .filter_map(|r| r.completion().map(|c| (r.id(), c)))
            .collect::<Vec<_>>();
        out.sort_by_key(|(id, _)| *id);
        out
    }
    pub fn completion_of(&self, id: Pid) -> Option<Completion> {
        self.records
            .iter()
            .find(|r| r.id() == id)
            .and_then(|r| r.completion())
    }
    pub fn timeline(&self) -> &[Slice] {
        &self.timeline
    }
    pub fn stats(&self) -> &RunStats {
        &self.stats
    }
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
