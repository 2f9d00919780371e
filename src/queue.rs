use crate::process::{ProcessRecord, Tick};
use std::collections::VecDeque;

/// Index of a process in a policy's working copy.
pub type Slot = usize;

/// FIFO ready queue of slots.
#[derive(Debug, Default)]
pub struct ReadyQueue {
    q: VecDeque<Slot>,
}

impl ReadyQueue {
    pub fn new() -> Self {
        Self { q: VecDeque::new() }
    }
    #[inline]
    pub fn push(&mut self, slot: Slot) {
        self.q.push_back(slot);
    }
    #[inline]
    pub fn pop(&mut self) -> Option<Slot> {
        self.q.pop_front()
    }
    #[inline]
    pub fn front(&self) -> Option<Slot> {
        self.q.front().copied()
    }
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.q.is_empty()
    }
    pub fn len(&self) -> usize {
        self.q.len()
    }
    /// Move the head to the back. Returns the new head.
    pub fn rotate(&mut self) -> Option<Slot> {
        if let Some(head) = self.q.pop_front() {
            self.q.push_back(head);
        }
        self.front()
    }
    pub fn drain(&mut self) -> impl Iterator<Item = Slot> + '_ {
        self.q.drain(..)
    }
}

/// One priority level: a ready queue plus its quantum (`None` = run to completion).
#[derive(Debug)]
pub struct Level {
    quantum: Option<Tick>,
    queue: ReadyQueue,
}

impl Level {
    pub fn new(quantum: Option<Tick>) -> Self {
        Self {
            quantum,
            queue: ReadyQueue::new(),
        }
    }
    pub fn quantum(&self) -> Option<Tick> {
        self.quantum
    }
}

/// Strict-priority stack of levels; level 0 is served first.
pub struct Levels {
    // bitmask denoting if ith level has any ready process
    present: u32,
    levels: Vec<Level>,
}

impl Levels {
    pub fn new(quanta: &[Option<Tick>]) -> Self {
        debug_assert!(quanta.len() <= 32);
        Self {
            present: 0,
            levels: quanta.iter().map(|q| Level::new(*q)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn quantum(&self, level: usize) -> Option<Tick> {
        self.levels[level].quantum()
    }

    pub fn push(&mut self, level: usize, slot: Slot) {
        self.levels[level].queue.push(slot);
        self.present |= 1 << level;
    }

    pub fn pop(&mut self, level: usize) -> Option<Slot> {
        let q = &mut self.levels[level].queue;
        let ret = q.pop();
        if q.is_empty() {
            self.present &= !(1 << level);
        }
        ret
    }

    pub fn front(&self, level: usize) -> Option<Slot> {
        self.levels[level].queue.front()
    }

    pub fn rotate(&mut self, level: usize) -> Option<Slot> {
        self.levels[level].queue.rotate()
    }

    /// Highest-priority level with a ready process.
    #[inline]
    pub fn first_runnable(&self) -> Option<usize> {
        if self.present == 0 {
            None
        } else {
            Some(self.present.trailing_zeros() as usize)
        }
    }

    /// Head of the highest-priority non-empty level, with that level.
    pub fn first_front(&self) -> Option<(usize, Slot)> {
        let level = self.first_runnable()?;
        self.front(level).map(|slot| (level, slot))
    }

    pub fn level_len(&self, level: usize) -> usize {
        self.levels[level].queue.len()
    }

    /// Empty `level`, returning its slots in queue order.
    pub fn take(&mut self, level: usize) -> Vec<Slot> {
        self.present &= !(1 << level);
        self.levels[level].queue.drain().collect()
    }
}

/// Cursor over an arrival-sorted working copy that admits each process once.
#[derive(Debug, Default)]
pub struct Arrivals {
    next: Slot,
}

impl Arrivals {
    pub fn new() -> Self {
        Self { next: 0 }
    }

    /// Arrival time of the next process not yet admitted.
    pub fn peek(&self, records: &[ProcessRecord]) -> Option<Tick> {
        records.get(self.next).map(|r| r.arrival())
    }

    /// Next slot whose arrival time has been reached by `now`, in order.
    pub fn next_arrived(&mut self, records: &[ProcessRecord], now: Tick) -> Option<Slot> {
        let record = records.get(self.next)?;
        if record.arrival() > now {
            return None;
        }
        self.next += 1;
        Some(self.next - 1)
    }
}

/// Earliest arrival after `now` among unfinished processes, in any order.
pub fn next_arrival(records: &[ProcessRecord], now: Tick) -> Option<Tick> {
    records
        .iter()
        .filter(|r| !r.is_finished() && r.arrival() > now)
        .map(|r| r.arrival())
        .min()
}
