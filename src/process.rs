use crate::error::Error;
use ahash::AHashSet;

pub type Pid = u32;
pub type Tick = u64;

/// Queue class a process belongs to under the multilevel policies.
/// Lower value means higher priority.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PriorityClass {
    System = 1,
    Interactive = 2,
    Batch = 3,
}

impl PriorityClass {
    /// Zero-based level index used by the multilevel queues.
    pub fn level(self) -> usize {
        self as usize - 1
    }
    pub fn value(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for PriorityClass {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(PriorityClass::System),
            2 => Ok(PriorityClass::Interactive),
            3 => Ok(PriorityClass::Batch),
            other => Err(other),
        }
    }
}

/// Static description of one unit of work.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Process {
    pub id: Pid,
    pub arrival: Tick,
    pub burst: Tick,
    pub priority: Option<PriorityClass>,
}

impl Process {
    pub fn new(id: Pid, arrival: Tick, burst: Tick) -> Self {
        Self {
            id,
            arrival,
            burst,
            priority: None,
        }
    }

    pub fn with_priority(mut self, priority: PriorityClass) -> Self {
        self.priority = Some(priority);
        self
    }
}

/// Derived timings of a finished process.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Completion {
    pub completion: Tick,
    pub turnaround: Tick,
    pub waiting: Tick,
}

impl Completion {
    fn new(process: &Process, at: Tick) -> Self {
        debug_assert!(at >= process.arrival + process.burst);
        let turnaround = at - process.arrival;
        Self {
            completion: at,
            turnaround,
            waiting: turnaround - process.burst,
        }
    }
}

/// A policy's private working copy of one process.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProcessRecord {
    process: Process,
    remaining: Tick,
    completion: Option<Completion>,
}

impl ProcessRecord {
    pub fn new(process: Process) -> Self {
        Self {
            process,
            remaining: process.burst,
            completion: None,
        }
    }
    pub fn process(&self) -> &Process {
        &self.process
    }
    pub fn id(&self) -> Pid {
        self.process.id
    }
    pub fn arrival(&self) -> Tick {
        self.process.arrival
    }
    pub fn remaining(&self) -> Tick {
        self.remaining
    }
    pub fn completion(&self) -> Option<Completion> {
        self.completion
    }
    #[inline]
    pub fn is_finished(&self) -> bool {
        self.remaining == 0
    }
    /// Ready to be dispatched at `now`.
    #[inline]
    pub fn is_ready(&self, now: Tick) -> bool {
        self.process.arrival <= now && !self.is_finished()
    }

    /// Charge `ticks` of service. Returns the ticks actually consumed.
    pub(crate) fn serve(&mut self, ticks: Tick) -> Tick {
        let ticks = ticks.min(self.remaining);
        self.remaining -= ticks;
        ticks
    }

    /// Record that the process finished at `at`. Written exactly once.
    pub(crate) fn complete(&mut self, at: Tick) {
        debug_assert!(self.is_finished());
        debug_assert!(self.completion.is_none());
        self.completion = Some(Completion::new(&self.process, at));
    }
}

/// A validated, immutable batch of processes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Workload {
    processes: Vec<Process>,
}

impl Workload {
    pub fn new(processes: Vec<Process>) -> Result<Self, Error> {
        let mut seen = AHashSet::with_capacity(processes.len());
        // the clock never passes the latest arrival plus all the work
        let mut latest: Tick = 0;
        let mut work: Tick = 0;
        for p in processes.iter() {
            if p.id == 0 {
                return Err(Error::ZeroId);
            }
            if p.burst == 0 {
                return Err(Error::ZeroBurst { id: p.id });
            }
            if !seen.insert(p.id) {
                return Err(Error::DuplicateId { id: p.id });
            }
            latest = latest.max(p.arrival);
            work = work
                .checked_add(p.burst)
                .filter(|work| latest.checked_add(*work).is_some())
                .ok_or(Error::TimeOverflow { id: p.id })?;
        }
        Ok(Self { processes })
    }

    /// Parse the line format `id arrival burst [priority]`.
    /// Blank lines and lines starting with '#' are skipped.
    pub fn parse(input: &str) -> Result<Self, Error> {
        let mut processes = Vec::new();
        for (idx, line) in input.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            processes.push(parse_line(idx + 1, line)?);
        }
        Self::new(processes)
    }

    /// The reference scenario: a long system process ahead of two short batch jobs.
    pub fn reference() -> Self {
        Self {
            processes: vec![
                Process::new(1, 0, 20).with_priority(PriorityClass::System),
                Process::new(2, 1, 2).with_priority(PriorityClass::Batch),
                Process::new(3, 2, 2).with_priority(PriorityClass::Batch),
            ],
        }
    }

    pub fn processes(&self) -> &[Process] {
        &self.processes
    }
    pub fn len(&self) -> usize {
        self.processes.len()
    }
    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }

    /// Fresh working copy, `remaining` reset to `burst`, in input order.
    pub fn records(&self) -> Vec<ProcessRecord> {
        self.processes.iter().copied().map(ProcessRecord::new).collect()
    }

    /// Working copy stably sorted by arrival time.
    pub(crate) fn records_by_arrival(&self) -> Vec<ProcessRecord> {
        let mut records = self.records();
        records.sort_by_key(|r| r.arrival());
        records
    }
}

fn parse_line(line: usize, text: &str) -> Result<Process, Error> {
    let fields = text.split_whitespace().collect::<Vec<_>>();
    if fields.len() < 3 || fields.len() > 4 {
        return Err(Error::Parse {
            line,
            reason: format!("expected 3 or 4 fields, found {}", fields.len()),
        });
    }
    let number = |name: &str, s: &str| -> Result<u64, Error> {
        s.parse::<u64>().map_err(|e| Error::Parse {
            line,
            reason: format!("invalid {} '{}': {}", name, s, e),
        })
    };
    let id = number("id", fields[0])?;
    let id = Pid::try_from(id).map_err(|_| Error::Parse {
        line,
        reason: format!("id {} out of range", id),
    })?;
    let mut process = Process::new(id, number("arrival", fields[1])?, number("burst", fields[2])?);
    if let Some(&prio) = fields.get(3) {
        let value = number("priority", prio)?;
        let class = u8::try_from(value)
            .ok()
            .and_then(|v| PriorityClass::try_from(v).ok())
            .ok_or(Error::InvalidPriority { id, value })?;
        process = process.with_priority(class);
    }
    Ok(process)
}
