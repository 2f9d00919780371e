use crate::process::Pid;
use std::fmt;

/// Configuration and input errors. Every one of them is detected before any
/// simulation starts, except `NoData` which the report returns for an empty run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    ZeroQuantum {
        policy: &'static str,
        level: Option<usize>,
    },
    ZeroAgingPeriod,
    ZeroBurst {
        id: Pid,
    },
    ZeroId,
    DuplicateId {
        id: Pid,
    },
    TimeOverflow {
        id: Pid,
    },
    InvalidPriority {
        id: Pid,
        value: u64,
    },
    Parse {
        line: usize,
        reason: String,
    },
    NoData,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ZeroQuantum {
                policy,
                level: Some(level),
            } => write!(f, "{}: quantum of queue {} must be > 0", policy, level),
            Error::ZeroQuantum {
                policy,
                level: None,
            } => write!(f, "{}: quantum must be > 0", policy),
            Error::ZeroAgingPeriod => write!(f, "aging period must be > 0"),
            Error::ZeroBurst { id } => write!(f, "process {}: burst time must be > 0", id),
            Error::ZeroId => write!(f, "process ids must be positive"),
            Error::DuplicateId { id } => write!(f, "duplicate process id {}", id),
            Error::TimeOverflow { id } => write!(
                f,
                "process {}: arrival and burst times exceed the simulation clock",
                id
            ),
            Error::InvalidPriority { id, value } => {
                write!(f, "process {}: priority {} not in 1..=3", id, value)
            }
            Error::Parse { line, reason } => write!(f, "line {}: {}", line, reason),
            Error::NoData => write!(f, "no data: empty process set"),
        }
    }
}

impl std::error::Error for Error {}
