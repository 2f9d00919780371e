use crate::clock::Cpu;
use crate::process::Workload;
use crate::scheduler::{Policy, Schedule};
use log::debug;

/// First come, first served. Non-preemptive, bulk-stepped.
#[derive(Clone, Copy, Debug, Default)]
pub struct Fcfs;

impl Fcfs {
    pub fn new() -> Self {
        Self
    }
}

impl Policy for Fcfs {
    fn name(&self) -> &'static str {
        "First Come First Served (FCFS)"
    }

    fn run(&self, workload: &Workload) -> Schedule {
        debug!("{}: scheduling {} processes", self.name(), workload.len());
        let mut records = workload.records_by_arrival();
        let mut cpu = Cpu::new();
        for record in records.iter_mut() {
            cpu.idle_until(record.arrival());
            let burst = record.remaining();
            cpu.execute(record, burst, None);
        }
        Schedule::new(self, records, cpu)
    }
}
