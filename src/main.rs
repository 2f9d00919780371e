use clap::{Arg, ArgMatches, Command};
use cpusched::{
    summary, timeline, Fcfs, Mlfq, MlfqConfig, Mlq, MlqConfig, Policy, Report, RoundRobin,
    Schedule, Srtf, Workload, DEFAULT_RR_QUANTUM,
};
use std::error::Error;

mod logger;

const POLICIES: [&str; 5] = ["fcfs", "srtf", "rr", "mlq", "mlfq"];

fn parse_args() -> ArgMatches {
    let rr_quantum = DEFAULT_RR_QUANTUM.to_string();
    let mlq = MlqConfig::default();
    let mlfq = MlfqConfig::default();
    let (mlq_system, mlq_interactive) = (
        mlq.system_quantum.to_string(),
        mlq.interactive_quantum.to_string(),
    );
    let (mlfq_top, mlfq_middle, aging) = (
        mlfq.top_quantum.to_string(),
        mlfq.middle_quantum.to_string(),
        mlfq.aging_period.to_string(),
    );

    Command::new("cpusched")
        .about("Discrete-time CPU scheduling simulator")
        .arg(
            Arg::new("inputfile")
                .help("Workload file, one `id arrival burst [priority]` per line")
                .index(1),
        )
        .arg(
            Arg::new("policy")
                .short('p')
                .long("policy")
                .takes_value(true)
                .possible_values(POLICIES)
                .help("Run only this policy"),
        )
        .arg(
            Arg::new("quantum")
                .short('q')
                .long("quantum")
                .takes_value(true)
                .default_value(&rr_quantum)
                .help("Round robin quantum"),
        )
        .arg(
            Arg::new("mlq_system")
                .long("mlq-system")
                .takes_value(true)
                .default_value(&mlq_system)
                .help("MLQ system queue quantum"),
        )
        .arg(
            Arg::new("mlq_interactive")
                .long("mlq-interactive")
                .takes_value(true)
                .default_value(&mlq_interactive)
                .help("MLQ interactive queue quantum"),
        )
        .arg(
            Arg::new("mlfq_top")
                .long("mlfq-top")
                .takes_value(true)
                .default_value(&mlfq_top)
                .help("MLFQ level 0 quantum"),
        )
        .arg(
            Arg::new("mlfq_middle")
                .long("mlfq-middle")
                .takes_value(true)
                .default_value(&mlfq_middle)
                .help("MLFQ level 1 quantum"),
        )
        .arg(
            Arg::new("aging")
                .long("aging")
                .takes_value(true)
                .default_value(&aging)
                .help("MLFQ aging period in ticks"),
        )
        .arg(
            Arg::new("timeline")
                .short('t')
                .long("timeline")
                .help("Print the dispatch timeline of each run"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .multiple_occurrences(true)
                .help("Log scheduling decisions (-v debug, -vv trace)"),
        )
        .get_matches()
}

/// Build the selected policies, rejecting bad configuration before anything runs.
fn build_policies(matches: &ArgMatches) -> Result<Vec<Box<dyn Policy>>, Box<dyn Error>> {
    let selected = matches
        .value_of("policy")
        .map_or(POLICIES.to_vec(), |p| vec![p]);

    let mut policies: Vec<Box<dyn Policy>> = Vec::new();
    for name in selected {
        let policy: Box<dyn Policy> = match name {
            "fcfs" => Box::new(Fcfs::new()),
            "srtf" => Box::new(Srtf::new()),
            "rr" => Box::new(RoundRobin::new(matches.value_of_t("quantum")?)?),
            "mlq" => Box::new(Mlq::new(MlqConfig {
                system_quantum: matches.value_of_t("mlq_system")?,
                interactive_quantum: matches.value_of_t("mlq_interactive")?,
            })?),
            "mlfq" => Box::new(Mlfq::new(MlfqConfig {
                top_quantum: matches.value_of_t("mlfq_top")?,
                middle_quantum: matches.value_of_t("mlfq_middle")?,
                aging_period: matches.value_of_t("aging")?,
            })?),
            other => unreachable!("clap restricts policy names, got {}", other),
        };
        policies.push(policy);
    }
    Ok(policies)
}

fn actual_main(matches: &ArgMatches) -> Result<(), Box<dyn Error>> {
    let workload = match matches.value_of("inputfile") {
        Some(path) => {
            let contents = std::fs::read_to_string(path)
                .map_err(|e| format!("failed to read {}: {}", path, e))?;
            Workload::parse(&contents)?
        }
        None => Workload::reference(),
    };
    log::debug!("loaded {} processes", workload.len());
    let policies = build_policies(matches)?;

    let schedules = policies
        .iter()
        .map(|p| p.run(&workload))
        .collect::<Vec<Schedule>>();
    for schedule in schedules.iter() {
        println!("\n{}", Report::new(schedule));
        if matches.is_present("timeline") {
            println!("{}", timeline(schedule));
        }
    }
    if schedules.len() > 1 {
        println!("\nSummary:\n{}", summary(&schedules));
    }
    Ok(())
}

fn main() {
    let matches = parse_args();
    if let Err(e) = logger::init(matches.occurrences_of("verbose")) {
        eprintln!("failed to install logger: {}", e);
    }
    if let Err(e) = actual_main(&matches) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
