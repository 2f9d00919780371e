use crate::clock::Cpu;
use crate::error::Error;
use crate::process::{ProcessRecord, Tick, Workload};
use crate::queue::{Arrivals, Levels};
use crate::scheduler::{Policy, Schedule};
use crate::stats::RunStats;
use log::{debug, trace};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MlfqConfig {
    /// Quantum of level 0, where every process enters.
    pub top_quantum: Tick,
    /// Quantum of level 1. Level 2 has none.
    pub middle_quantum: Tick,
    /// Every `aging_period` ticks all processes in levels 1 and 2 move back to level 0.
    pub aging_period: Tick,
}

impl Default for MlfqConfig {
    fn default() -> Self {
        Self {
            top_quantum: 8,
            middle_quantum: 16,
            aging_period: 50,
        }
    }
}

/// Multilevel feedback queue with quantum-based demotion and periodic aging.
///
/// The dispatched process is taken off its level, run for one tick and put
/// back at the tail, so processes sharing a level interleave tick by tick
/// while each accumulates its own quantum usage. Reaching the level's quantum
/// demotes it to the tail of the next level.
#[derive(Clone, Copy, Debug)]
pub struct Mlfq {
    config: MlfqConfig,
}

impl Mlfq {
    pub const NAME: &'static str = "Multilevel Feedback Queue (MLFQ)";

    pub fn new(config: MlfqConfig) -> Result<Self, Error> {
        for (level, quantum) in [config.top_quantum, config.middle_quantum]
            .into_iter()
            .enumerate()
        {
            if quantum == 0 {
                return Err(Error::ZeroQuantum {
                    policy: Self::NAME,
                    level: Some(level),
                });
            }
        }
        if config.aging_period == 0 {
            return Err(Error::ZeroAgingPeriod);
        }
        Ok(Self { config })
    }

    pub fn config(&self) -> &MlfqConfig {
        &self.config
    }

    #[inline]
    fn is_aging_tick(&self, now: Tick) -> bool {
        now > 0 && now % self.config.aging_period == 0
    }

    /// Aging ticks strictly between `from` and `to`.
    fn aging_ticks_between(&self, from: Tick, to: Tick) -> u64 {
        if to <= from {
            return 0;
        }
        let period = self.config.aging_period;
        (to - 1) / period - from / period
    }
}

/// Move every process in levels below the top back to level 0, level 1
/// first, preserving queue order, and reset their quantum usage.
fn age(levels: &mut Levels, used: &mut [Tick], stats: &mut RunStats, now: Tick) {
    let mut promoted = Vec::new();
    for level in 1..levels.len() {
        promoted.extend(levels.take(level));
    }
    for slot in promoted.iter() {
        levels.push(0, *slot);
        used[*slot] = 0;
    }
    trace!(
        "t={}: aging moved {} processes to level 0 ({} queued there)",
        now,
        promoted.len(),
        levels.level_len(0)
    );
    stats.record_aging_sweep(promoted.len());
}

impl Policy for Mlfq {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn is_priority_aware(&self) -> bool {
        true
    }

    fn run(&self, workload: &Workload) -> Schedule {
        debug!(
            "{}: scheduling {} processes, {:?}",
            self.name(),
            workload.len(),
            self.config
        );
        let mut records: Vec<ProcessRecord> = workload.records_by_arrival();
        let mut levels = Levels::new(&[
            Some(self.config.top_quantum),
            Some(self.config.middle_quantum),
            None,
        ]);
        let mut used: Vec<Tick> = vec![0; records.len()];
        let mut arrivals = Arrivals::new();
        let mut cpu = Cpu::new();
        let mut completed = 0;

        while completed < records.len() {
            while let Some(slot) = arrivals.next_arrived(&records, cpu.now()) {
                levels.push(0, slot);
            }
            if self.is_aging_tick(cpu.now()) {
                let now = cpu.now();
                age(&mut levels, &mut used, cpu.stats_mut(), now);
            }

            let Some(level) = levels.first_runnable() else {
                let Some(at) = arrivals.peek(&records) else {
                    break;
                };
                // every queue is empty: the sweeps skipped over promote nothing
                let skipped = self.aging_ticks_between(cpu.now(), at);
                cpu.stats_mut().record_empty_sweeps(skipped);
                cpu.idle_until(at);
                continue;
            };
            let Some(slot) = levels.pop(level) else {
                continue;
            };
            cpu.execute(&mut records[slot], 1, Some(level));
            used[slot] += 1;

            if records[slot].is_finished() {
                completed += 1;
                continue;
            }
            match levels.quantum(level) {
                Some(quantum) if used[slot] >= quantum && level + 1 < levels.len() => {
                    trace!(
                        "t={}: process {} demoted to level {}",
                        cpu.now(),
                        records[slot].id(),
                        level + 1
                    );
                    used[slot] = 0;
                    levels.push(level + 1, slot);
                    cpu.stats_mut().record_demotion();
                }
                _ => levels.push(level, slot),
            }
        }
        Schedule::new(self, records, cpu)
    }
}
