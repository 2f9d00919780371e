use crate::clock::Cpu;
use crate::process::{ProcessRecord, Tick, Workload};
use crate::queue::{next_arrival, Slot};
use crate::scheduler::{Policy, Schedule};
use log::{debug, trace};

/// Preemptive shortest remaining time first, re-evaluated every tick.
#[derive(Clone, Copy, Debug, Default)]
pub struct Srtf;

impl Srtf {
    pub fn new() -> Self {
        Self
    }
}

/// Among processes ready at `now`, the one with the least remaining time.
/// Ties go to the lowest slot (input order), so the choice is stable.
fn shortest_ready(records: &[ProcessRecord], now: Tick) -> Option<Slot> {
    records
        .iter()
        .enumerate()
        .filter(|(_, r)| r.is_ready(now))
        .min_by_key(|(slot, r)| (r.remaining(), *slot))
        .map(|(slot, _)| slot)
}

impl Policy for Srtf {
    fn name(&self) -> &'static str {
        "Preemptive Shortest Job First (SJF/SRTF)"
    }

    fn run(&self, workload: &Workload) -> Schedule {
        debug!("{}: scheduling {} processes", self.name(), workload.len());
        // input order, unsorted: ties are broken by it
        let mut records = workload.records();
        let mut cpu = Cpu::new();
        let mut completed = 0;
        while completed < records.len() {
            let Some(slot) = shortest_ready(&records, cpu.now()) else {
                // nothing ready, so something unfinished has yet to arrive
                let Some(at) = next_arrival(&records, cpu.now()) else {
                    break;
                };
                cpu.idle_until(at);
                continue;
            };
            trace!("t={}: dispatch {}", cpu.now(), records[slot].id());
            cpu.execute(&mut records[slot], 1, None);
            if records[slot].is_finished() {
                completed += 1;
            }
        }
        Schedule::new(self, records, cpu)
    }
}
