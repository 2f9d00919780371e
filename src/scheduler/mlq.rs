use crate::clock::Cpu;
use crate::error::Error;
use crate::process::{PriorityClass, Tick, Workload};
use crate::queue::{Arrivals, Levels};
use crate::scheduler::{Policy, Schedule};
use log::{debug, trace};

/// Quanta of the two round-robin levels of `Mlq`. The batch level is FCFS.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MlqConfig {
    pub system_quantum: Tick,
    pub interactive_quantum: Tick,
}

impl Default for MlqConfig {
    fn default() -> Self {
        Self {
            system_quantum: 4,
            interactive_quantum: 8,
        }
    }
}

/// Fixed three-level queue. A process stays in the level of its priority
/// class for its whole life; levels are served in strict priority order,
/// one tick at a time.
///
/// Processes without a priority class are treated as `Batch`.
#[derive(Clone, Copy, Debug)]
pub struct Mlq {
    config: MlqConfig,
}

impl Mlq {
    pub const NAME: &'static str = "Multilevel Queue (MLQ)";

    pub fn new(config: MlqConfig) -> Result<Self, Error> {
        for (level, quantum) in [config.system_quantum, config.interactive_quantum]
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
        Ok(Self { config })
    }

    pub fn config(&self) -> &MlqConfig {
        &self.config
    }
}

impl Policy for Mlq {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn is_priority_aware(&self) -> bool {
        true
    }

    fn run(&self, workload: &Workload) -> Schedule {
        debug!(
            "{}: scheduling {} processes, quanta {:?}",
            self.name(),
            workload.len(),
            self.config
        );
        let mut records = workload.records_by_arrival();
        let mut levels = Levels::new(&[
            Some(self.config.system_quantum),
            Some(self.config.interactive_quantum),
            None,
        ]);
        // ticks used of the current quantum, per slot; local to the process's own level
        let mut used: Vec<Tick> = vec![0; records.len()];
        let mut arrivals = Arrivals::new();
        let mut cpu = Cpu::new();
        let mut completed = 0;

        while completed < records.len() {
            while let Some(slot) = arrivals.next_arrived(&records, cpu.now()) {
                let class = records[slot]
                    .process()
                    .priority
                    .unwrap_or(PriorityClass::Batch);
                levels.push(class.level(), slot);
            }

            let Some((level, mut slot)) = levels.first_front() else {
                let Some(at) = arrivals.peek(&records) else {
                    break;
                };
                cpu.idle_until(at);
                continue;
            };
            // quantum expiry is settled lazily, on the next dispatch from this level
            if levels.quantum(level) == Some(used[slot]) {
                used[slot] = 0;
                if let Some(next) = levels.rotate(level) {
                    slot = next;
                }
                trace!(
                    "t={}: quantum expired on level {}, rotating to {}",
                    cpu.now(),
                    level,
                    records[slot].id()
                );
            }

            cpu.execute(&mut records[slot], 1, Some(level));
            used[slot] += 1;
            if records[slot].is_finished() {
                levels.pop(level);
                completed += 1;
            }
        }
        Schedule::new(self, records, cpu)
    }
}
