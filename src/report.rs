use crate::error::Error;
use crate::process::{Pid, Tick};
use crate::scheduler::Schedule;
use std::fmt;
use tabled::{Table, Tabled};

/// One finished process as shown in a report.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Row {
    pub id: Pid,
    pub arrival: Tick,
    pub burst: Tick,
    pub priority: Option<u8>,
    pub completion: Tick,
    pub turnaround: Tick,
    pub waiting: Tick,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Averages {
    pub turnaround: f64,
    pub waiting: f64,
}

/// Read-only projection of a schedule: rows sorted by id plus the means.
#[derive(Clone, Debug)]
pub struct Report {
    policy: &'static str,
    show_priority: bool,
    rows: Vec<Row>,
}

impl Report {
    pub fn new(schedule: &Schedule) -> Self {
        let mut rows = schedule
            .records()
            .iter()
            .filter_map(|r| {
                let c = r.completion()?;
                let p = r.process();
                Some(Row {
                    id: p.id,
                    arrival: p.arrival,
                    burst: p.burst,
                    priority: p.priority.map(|class| class.value()),
                    completion: c.completion,
                    turnaround: c.turnaround,
                    waiting: c.waiting,
                })
            })
            .collect::<Vec<_>>();
        rows.sort_by_key(|r| r.id);
        Self {
            policy: schedule.policy(),
            show_priority: schedule.is_priority_aware(),
            rows,
        }
    }

    pub fn policy(&self) -> &'static str {
        self.policy
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Mean turnaround and waiting time. An empty run has no mean.
    pub fn averages(&self) -> Result<Averages, Error> {
        if self.rows.is_empty() {
            return Err(Error::NoData);
        }
        let n = self.rows.len() as f64;
        // summed as floats: per-process times fit a Tick, their total may not
        let turnaround = self.rows.iter().map(|r| r.turnaround as f64).sum::<f64>();
        let waiting = self.rows.iter().map(|r| r.waiting as f64).sum::<f64>();
        Ok(Averages {
            turnaround: turnaround / n,
            waiting: waiting / n,
        })
    }
}

#[derive(Tabled)]
struct ReportTable {
    #[tabled(rename = "PID")]
    pid: Pid,
    #[tabled(rename = "Arrival")]
    arrival: Tick,
    #[tabled(rename = "Burst")]
    burst: Tick,
    #[tabled(rename = "Priority")]
    priority: String,
    #[tabled(rename = "Completion")]
    completion: Tick,
    #[tabled(rename = "Turnaround")]
    turnaround: Tick,
    #[tabled(rename = "Waiting")]
    waiting: Tick,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- {} ---", self.policy)?;
        let averages = match self.averages() {
            Ok(averages) => averages,
            Err(e) => return writeln!(f, "{}", e),
        };
        let rows = self.rows.iter().map(|r| ReportTable {
            pid: r.id,
            arrival: r.arrival,
            burst: r.burst,
            priority: match r.priority {
                Some(p) if self.show_priority => p.to_string(),
                _ => "-".to_string(),
            },
            completion: r.completion,
            turnaround: r.turnaround,
            waiting: r.waiting,
        });
        writeln!(f, "{}", Table::new(rows))?;
        writeln!(f, "Average Turnaround Time: {:.2}", averages.turnaround)?;
        write!(f, "Average Waiting Time: {:.2}", averages.waiting)
    }
}

/// Side-by-side comparison of several runs over the same workload.
pub fn summary(schedules: &[Schedule]) -> String {
    #[derive(Tabled)]
    struct SummaryTable {
        policy: &'static str,
        avg_turnaround: String,
        avg_waiting: String,
        makespan: Tick,
        utilization: String,
        context_switches: u64,
    }

    let rows = schedules.iter().map(|s| {
        let (avg_turnaround, avg_waiting) = match Report::new(s).averages() {
            Ok(a) => (format!("{:.2}", a.turnaround), format!("{:.2}", a.waiting)),
            Err(_) => ("-".to_string(), "-".to_string()),
        };
        SummaryTable {
            policy: s.policy(),
            avg_turnaround,
            avg_waiting,
            makespan: s.stats().makespan(),
            utilization: s
                .stats()
                .utilization()
                .map_or("-".to_string(), |u| format!("{:.1}%", u * 100.0)),
            context_switches: s.stats().context_switches,
        }
    });
    Table::new(rows).to_string()
}

/// Dispatch timeline of one run, one row per slice.
pub fn timeline(schedule: &Schedule) -> String {
    #[derive(Tabled)]
    struct SliceTable {
        pid: Pid,
        start: Tick,
        end: Tick,
        ticks: Tick,
        level: String,
    }

    let rows = schedule.timeline().iter().map(|s| SliceTable {
        pid: s.pid,
        start: s.start,
        end: s.end,
        ticks: s.len(),
        level: s.level.map_or("-".to_string(), |l| l.to_string()),
    });
    Table::new(rows).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::{PriorityClass, Process, Workload};
    use crate::scheduler::{Fcfs, Mlfq, MlfqConfig, Mlq, MlqConfig, Policy, RoundRobin};

    fn workload() -> Workload {
        Workload::new(vec![
            Process::new(3, 2, 2).with_priority(PriorityClass::Batch),
            Process::new(1, 0, 20).with_priority(PriorityClass::System),
            Process::new(2, 1, 2).with_priority(PriorityClass::Batch),
        ])
        .unwrap()
    }

    #[test]
    fn test_rows_sorted_by_id() {
        let report = Report::new(&Fcfs::new().run(&workload()));
        let ids = report.rows().iter().map(|r| r.id).collect::<Vec<_>>();
        assert_eq!(ids, vec![1, 2, 3]);
        // completions 20, 22, 24
        let averages = report.averages().unwrap();
        assert_eq!(averages.turnaround, (20.0 + 21.0 + 22.0) / 3.0);
        assert_eq!(averages.waiting, (0.0 + 19.0 + 20.0) / 3.0);
    }

    #[test]
    fn test_empty_report_has_no_data() {
        let report = Report::new(&Fcfs::new().run(&Workload::default()));
        assert_eq!(report.averages(), Err(Error::NoData));
        let text = report.to_string();
        assert!(text.contains("no data"), "{}", text);
        assert!(!text.contains("NaN"));
    }

    #[test]
    fn test_averages_of_times_near_the_clock_limit() {
        let half = Tick::MAX / 2;
        let w = Workload::new(vec![Process::new(1, 0, half), Process::new(2, 0, half)]).unwrap();
        let averages = Report::new(&Fcfs::new().run(&w)).averages().unwrap();
        // turnarounds half and 2 * half
        assert_eq!(averages.turnaround, (half as f64 + (2 * half) as f64) / 2.0);
        assert_eq!(averages.waiting, half as f64 / 2.0);
    }

    // cells of the Priority column, top to bottom
    fn priority_cells(text: &str) -> Vec<String> {
        text.lines()
            .filter(|l| l.starts_with("| ") && !l.contains("PID"))
            .map(|l| l.split('|').nth(4).unwrap_or_default().trim().to_string())
            .collect()
    }

    #[test]
    fn test_priority_column_only_for_multilevel_policies() {
        let fcfs = Report::new(&Fcfs::new().run(&workload())).to_string();
        let rr = Report::new(&RoundRobin::new(4).unwrap().run(&workload())).to_string();
        let mlq = Report::new(&Mlq::new(MlqConfig::default()).unwrap().run(&workload())).to_string();
        let mlfq = Report::new(&Mlfq::new(MlfqConfig::default()).unwrap().run(&workload())).to_string();
        assert!(fcfs.starts_with("--- First Come First Served (FCFS) ---"));
        assert!(fcfs.contains("Average Waiting Time: 13.00"));
        assert_eq!(priority_cells(&fcfs), vec!["-", "-", "-"]);
        assert_eq!(priority_cells(&rr), vec!["-", "-", "-"]);
        assert_eq!(priority_cells(&mlq), vec!["1", "3", "3"]);
        assert_eq!(priority_cells(&mlfq), vec!["1", "3", "3"]);
    }

    #[test]
    fn test_summary_and_timeline() {
        let schedules = vec![
            Fcfs::new().run(&workload()),
            Fcfs::new().run(&Workload::default()),
        ];
        let text = summary(&schedules);
        assert!(text.contains("avg_turnaround"));
        assert!(text.contains("21.00"));
        assert!(text.contains("100.0%"));

        let text = timeline(&schedules[0]);
        assert!(text.contains("ticks"));
        assert_eq!(text.lines().filter(|l| l.starts_with("| ")).count(), 4);
    }
}
