use crate::process::{Pid, ProcessRecord, Tick};
use crate::stats::RunStats;
use log::trace;

/// A contiguous stretch of CPU time given to one process.
/// `level` is the queue the process was dispatched from, `None` for
/// single-queue policies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Slice {
    pub pid: Pid,
    pub start: Tick,
    pub end: Tick,
    pub level: Option<usize>,
}

impl Slice {
    pub fn len(&self) -> Tick {
        self.end - self.start
    }
}

/// The simulation clock. Owns the time cursor, the dispatch timeline and the
/// run counters; every policy moves time forward only through it.
pub(crate) struct Cpu {
    now: Tick,
    last: Option<Pid>,
    timeline: Vec<Slice>,
    stats: RunStats,
}

impl Cpu {
    pub fn new() -> Self {
        Self {
            now: 0,
            last: None,
            timeline: Vec::new(),
            stats: RunStats::new(),
        }
    }

    #[inline]
    pub fn now(&self) -> Tick {
        self.now
    }

    pub fn stats_mut(&mut self) -> &mut RunStats {
        &mut self.stats
    }

    /// Jump the clock forward to `at`. No-op if `at` is not in the future.
    pub fn idle_until(&mut self, at: Tick) {
        if at > self.now {
            self.stats.record_idle(at - self.now);
            self.now = at;
        }
    }

    /// Run `record` for up to `ticks`, stamping its completion if it finishes.
    /// Returns the ticks actually consumed.
    pub fn execute(&mut self, record: &mut ProcessRecord, ticks: Tick, level: Option<usize>) -> Tick {
        let pid = record.id();
        let ran = record.serve(ticks);
        if ran == 0 {
            return 0;
        }
        self.stats
            .record_dispatch(self.last.is_some_and(|last| last != pid));
        self.last = Some(pid);

        match self.timeline.last_mut() {
            Some(slice) if slice.pid == pid && slice.level == level && slice.end == self.now => {
                slice.end += ran;
            }
            _ => self.timeline.push(Slice {
                pid,
                start: self.now,
                end: self.now + ran,
                level,
            }),
        }
        self.now += ran;
        self.stats.record_busy(ran);

        if record.is_finished() {
            record.complete(self.now);
            trace!("t={}: process {} completed", self.now, pid);
        }
        ran
    }

    pub fn finish(self) -> (Vec<Slice>, RunStats) {
        (self.timeline, self.stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::Process;

    #[test]
    fn test_cpu_coalesces_slices() {
        let mut cpu = Cpu::new();
        let mut a = ProcessRecord::new(Process::new(1, 0, 3));
        let mut b = ProcessRecord::new(Process::new(2, 0, 1));

        assert_eq!(cpu.execute(&mut a, 1, None), 1);
        assert_eq!(cpu.execute(&mut a, 1, None), 1);
        cpu.execute(&mut b, 1, None);
        cpu.idle_until(4);
        // clamps to remaining service
        assert_eq!(cpu.execute(&mut a, 5, None), 1);
        assert_eq!(cpu.now(), 5);

        let (timeline, stats) = cpu.finish();
        assert_eq!(
            timeline,
            vec![
                Slice { pid: 1, start: 0, end: 2, level: None },
                Slice { pid: 2, start: 2, end: 3, level: None },
                Slice { pid: 1, start: 4, end: 5, level: None },
            ]
        );
        assert_eq!(stats.busy_ticks, 4);
        assert_eq!(stats.idle_ticks, 1);
        assert_eq!(stats.context_switches, 2);
        assert_eq!(a.completion().unwrap().completion, 5);
        assert_eq!(b.completion().unwrap().completion, 3);
    }

    #[test]
    fn test_level_change_splits_slice() {
        let mut cpu = Cpu::new();
        let mut a = ProcessRecord::new(Process::new(1, 0, 2));
        cpu.execute(&mut a, 1, Some(0));
        cpu.execute(&mut a, 1, Some(1));
        let (timeline, stats) = cpu.finish();
        assert_eq!(timeline.len(), 2);
        assert_eq!(stats.context_switches, 0);
    }

    #[test]
    fn test_idle_until_never_rewinds() {
        let mut cpu = Cpu::new();
        cpu.idle_until(4);
        cpu.idle_until(2);
        assert_eq!(cpu.now(), 4);
        assert_eq!(cpu.finish().1.idle_ticks, 4);
    }
}
