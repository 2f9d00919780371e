use crate::clock::Cpu;
use crate::error::Error;
use crate::process::{ProcessRecord, Tick, Workload};
use crate::queue::{next_arrival, ReadyQueue};
use crate::scheduler::{Policy, Schedule};
use log::{debug, trace};

/// Round robin over a single FIFO ready queue.
#[derive(Clone, Copy, Debug)]
pub struct RoundRobin {
    quantum: Tick,
}

impl RoundRobin {
    pub const NAME: &'static str = "Round Robin (RR)";

    pub fn new(quantum: Tick) -> Result<Self, Error> {
        if quantum == 0 {
            return Err(Error::ZeroQuantum {
                policy: Self::NAME,
                level: None,
            });
        }
        Ok(Self { quantum })
    }

    pub fn quantum(&self) -> Tick {
        self.quantum
    }
}

/// Enqueue every arrived, unfinished process not already queued, in slot order.
fn admit(records: &[ProcessRecord], queued: &mut [bool], queue: &mut ReadyQueue, now: Tick) {
    for (slot, record) in records.iter().enumerate() {
        if record.is_ready(now) && !queued[slot] {
            queue.push(slot);
            queued[slot] = true;
        }
    }
}

impl Policy for RoundRobin {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn run(&self, workload: &Workload) -> Schedule {
        debug!(
            "{}: scheduling {} processes, quantum {}",
            self.name(),
            workload.len(),
            self.quantum
        );
        let mut records = workload.records_by_arrival();
        let mut queued = vec![false; records.len()];
        let mut queue = ReadyQueue::new();
        let mut cpu = Cpu::new();
        let mut completed = 0;

        while completed < records.len() {
            admit(&records, &mut queued, &mut queue, cpu.now());
            let Some(slot) = queue.pop() else {
                let Some(at) = next_arrival(&records, cpu.now()) else {
                    break;
                };
                cpu.idle_until(at);
                continue;
            };
            trace!("t={}: dispatch {}", cpu.now(), records[slot].id());
            cpu.execute(&mut records[slot], self.quantum, None);

            // arrivals during the slice go ahead of the process that just ran
            admit(&records, &mut queued, &mut queue, cpu.now());
            if records[slot].is_finished() {
                completed += 1;
                queued[slot] = false;
            } else {
                queue.push(slot);
            }
        }
        Schedule::new(self, records, cpu)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::Slice;
    use crate::process::Process;

    fn slice(pid: u32, start: Tick, end: Tick) -> Slice {
        Slice {
            pid,
            start,
            end,
            level: None,
        }
    }

    #[test]
    fn test_rr_rejects_zero_quantum() {
        assert_eq!(
            RoundRobin::new(0).unwrap_err(),
            Error::ZeroQuantum {
                policy: RoundRobin::NAME,
                level: None
            }
        );
        assert_eq!(RoundRobin::new(3).unwrap().quantum(), 3);
    }

    #[test]
    fn test_rr_new_arrivals_go_before_returning_process() {
        let w = Workload::new(vec![Process::new(1, 0, 4), Process::new(2, 1, 2)]).unwrap();
        let s = RoundRobin::new(2).unwrap().run(&w);
        // process 2 arrived while 1 was running, so it is queued ahead of 1
        assert_eq!(s.timeline(), &[slice(1, 0, 2), slice(2, 2, 4), slice(1, 4, 6)]);
        assert_eq!(s.completion_of(1).unwrap().completion, 6);
        assert_eq!(s.completion_of(2).unwrap().completion, 4);
    }

    #[test]
    fn test_rr_rotation() {
        let w = Workload::new(vec![
            Process::new(1, 0, 5),
            Process::new(2, 1, 3),
            Process::new(3, 2, 1),
        ])
        .unwrap();
        let s = RoundRobin::new(2).unwrap().run(&w);
        assert_eq!(
            s.timeline(),
            &[
                slice(1, 0, 2),
                slice(2, 2, 4),
                slice(3, 4, 5),
                slice(1, 5, 7),
                slice(2, 7, 8),
                slice(1, 8, 9),
            ]
        );
        let waiting = s
            .completions()
            .iter()
            .map(|(_, c)| c.waiting)
            .collect::<Vec<_>>();
        assert_eq!(waiting, vec![4, 4, 2]);
        assert_eq!(s.stats().context_switches, 5);
    }

    #[test]
    fn test_rr_idles_when_queue_empty() {
        let w = Workload::new(vec![Process::new(1, 0, 1), Process::new(2, 4, 3)]).unwrap();
        let s = RoundRobin::new(2).unwrap().run(&w);
        assert_eq!(s.timeline(), &[slice(1, 0, 1), slice(2, 4, 7)]);
        assert_eq!(s.stats().idle_ticks, 3);
    }
}
