use std::error::Error;
use std::fs::File;
use std::path::PathBuf;
use std::process;

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use env_logger::Env;
use log::{error, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use multiprocessor::constants::{Generator, DEFAULT_JOBS, DEFAULT_STEP, DEFAULT_UNITS};
use multiprocessor::generator::generate;
use multiprocessor::io::read_job_file;
use multiprocessor::report::{render_timeline, write_csv, MissStatistics, RunSummary};
use multiprocessor::scheduler::{Policy, SimulationConfig, Simulator};
use multiprocessor::{JobSet, SchedulingCode, SchedulingError, TimeStep};

pub fn build_cli_command() -> Command {
    Command::new("multiprocessor-dispatch")
    .version("0.1.0")
    .about("Simulates EDF, SJF, LST and FCFS dispatching of real-time jobs on identical processors")

    .arg(Arg::new("job_file")
        .value_parser(value_parser!(PathBuf))
        .help("Job file, one 'release execution deadline' triple per line (.csv for comma separated). Jobs are generated when omitted"))

    .arg(Arg::new("units")
        .short('m')
        .long("units")
        .help("Number of processors")
        .value_parser(value_parser!(usize))
        .default_value("3"))

    .arg(Arg::new("policy")
        .short('p')
        .long("policy")
        .help("Dispatch policy to simulate")
        .value_parser(["edf", "sjf", "lst", "fcfs", "all"])
        .default_value("all"))

    .arg(Arg::new("step")
        .short('s')
        .long("step")
        .help("Duration of one simulation step")
        .value_parser(value_parser!(f64))
        .default_value("1"))

    .arg(Arg::new("jobs")
        .short('n')
        .long("jobs")
        .help("Number of jobs per generated set")
        .value_parser(value_parser!(usize))
        .default_value("20"))

    .arg(Arg::new("runs")
        .short('r')
        .long("runs")
        .help("Number of runs, each over a fresh generated set")
        .value_parser(value_parser!(usize))
        .default_value("1"))

    .arg(Arg::new("generator")
        .short('g')
        .long("generator")
        .help("Job generation strategy")
        .value_parser(["semi", "random"])
        .default_value("semi"))

    .arg(Arg::new("seed")
        .long("seed")
        .help("Seed of the job generator")
        .value_parser(value_parser!(u64)))

    .arg(Arg::new("record_idle_gaps")
        .long("record-idle-gaps")
        .help("Record idle slots on steps where no released job is left to run")
        .action(ArgAction::SetTrue))

    .arg(Arg::new("output")
        .short('o')
        .long("output")
        .help("Write per-run results to this csv file")
        .value_parser(value_parser!(PathBuf)))

    .arg(Arg::new("quiet")
        .short('q')
        .long("quiet")
        .help("Do not print timelines")
        .action(ArgAction::SetTrue))
}

/// Settings of one invocation.
#[derive(Debug)]
pub struct Options {
    job_file: Option<PathBuf>,
    config: SimulationConfig,
    policies: Vec<Policy>,
    jobs: usize,
    runs: usize,
    generator: Generator,
    seed: Option<u64>,
    output: Option<PathBuf>,
    quiet: bool,
}

impl Options {
    pub fn from_matches(matches: &ArgMatches) -> Result<Self, Box<dyn Error>> {
        let units = matches.get_one::<usize>("units").copied().unwrap_or(DEFAULT_UNITS);
        let step = matches.get_one::<TimeStep>("step").copied().unwrap_or(DEFAULT_STEP);
        let config = SimulationConfig::new(units, step)
            .with_starvation_recording(matches.get_flag("record_idle_gaps"));
        config.validate()?;

        let policies = match matches.get_one::<String>("policy").map(String::as_str) {
            Some("all") | None => Policy::ALL.to_vec(),
            Some(name) => vec![name.parse::<Policy>()?],
        };
        let generator = match matches.get_one::<String>("generator") {
            Some(name) => name.parse::<Generator>()?,
            None => Generator::SemiRandom,
        };

        Ok(Self {
            job_file: matches.get_one::<PathBuf>("job_file").cloned(),
            config,
            policies,
            jobs: matches.get_one::<usize>("jobs").copied().unwrap_or(DEFAULT_JOBS),
            runs: matches.get_one::<usize>("runs").copied().unwrap_or(1).max(1),
            generator,
            seed: matches.get_one::<u64>("seed").copied(),
            output: matches.get_one::<PathBuf>("output").cloned(),
            quiet: matches.get_flag("quiet"),
        })
    }
}

/// Runs every requested policy over every job set and reports the outcome.
pub fn simulate(options: &Options) -> Result<SchedulingCode, Box<dyn Error>> {
    let loaded = match &options.job_file {
        Some(path) => Some(read_job_file(path)?),
        None => None,
    };
    let mut rng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let mut code = SchedulingCode::AllDeadlinesMet;
    let mut stats = MissStatistics::new();
    let mut summaries = Vec::new();

    for run in 1..=options.runs {
        let job_set: JobSet = match &loaded {
            Some(job_set) => job_set.clone(),
            None => generate(options.generator, &mut rng, options.jobs, options.config.units, options.config.step),
        };
        if options.runs > 1 {
            println!("Run {run}");
        }
        info!("Jobs: [{}]", job_set.iter().map(ToString::to_string).collect::<Vec<_>>().join(", "));

        let mut simulator = Simulator::new(job_set, options.config)?;
        for &policy in &options.policies {
            let report = match simulator.run(policy) {
                Ok(report) => report,
                Err(SchedulingError::EmptyJobSet) => {
                    warn!("Run {run} has no jobs to schedule");
                    code = code.worst(SchedulingCode::NothingToSchedule);
                    break;
                }
                Err(e @ SchedulingError::InfeasibleJob { .. }) => {
                    error!("Run {run} rejected: {e}");
                    code = code.worst(SchedulingCode::Rejected);
                    break;
                }
                Err(e) => return Err(e.into()),
            };

            if !options.quiet {
                println!("{policy} RESULTS");
                print!("{}", render_timeline(&report));
            }
            println!("{policy}: {} missed deadline(s)", report.missed_count());

            code = code.worst(if report.all_deadlines_met() {
                SchedulingCode::AllDeadlinesMet
            } else {
                SchedulingCode::DeadlinesMissed
            });
            stats.record(policy, report.missed_count());
            summaries.push(RunSummary::new(run, &report));
            simulator.reset_state();
        }
    }

    for (policy, average) in stats.averages() {
        println!("AVG {policy} MISSES: {average}");
    }

    if let Some(path) = &options.output {
        write_csv(File::create(path)?, &summaries)?;
        info!("Results written to {}", path.display());
    }

    Ok(code)
}

fn main() {
    // cargo run -- [job_file] [-m <units>] [-p edf|sjf|lst|fcfs|all] [-s <step>] [-r <runs>] [-n <jobs>]
    // example : cargo run -- jobs.txt -m 2 -p lst
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let matches: ArgMatches = build_cli_command().get_matches();

    let options = match Options::from_matches(&matches) {
        Ok(options) => options,
        Err(e) => {
            error!("Invalid arguments: {e}");
            process::exit(SchedulingCode::InvalidInput as i32);
        }
    };

    let code = match simulate(&options) {
        Ok(code) => code,
        Err(e) => {
            error!("{e}");
            SchedulingCode::InvalidInput
        }
    };

    process::exit(code as i32);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options_from(args: &[&str]) -> Options {
        let matches = build_cli_command()
            .try_get_matches_from(args)
            .expect("valid arguments");
        Options::from_matches(&matches).expect("valid options")
    }

    fn write_job_file(name: &str, content: &str) -> PathBuf {
        let file_path = std::env::temp_dir().join(name);
        std::fs::write(&file_path, content).expect("Unable to write test file");
        file_path
    }

    #[test]
    fn test_command_line_arguments() {
        let matches = build_cli_command().try_get_matches_from(vec![
            "multiprocessor-dispatch",
            "jobs.txt",
            "-m",
            "4",
            "-p",
            "lst",
            "-s",
            "0.5",
        ]);

        assert!(matches.is_ok());
        let matches = matches.unwrap();

        assert_eq!(matches.get_one::<PathBuf>("job_file").unwrap(), &PathBuf::from("jobs.txt"));
        assert_eq!(*matches.get_one::<usize>("units").unwrap(), 4);
        assert_eq!(matches.get_one::<String>("policy").unwrap(), "lst");
        assert_eq!(*matches.get_one::<f64>("step").unwrap(), 0.5);
        assert_eq!(matches.get_one::<String>("generator").unwrap(), "semi");
    }

    #[test]
    fn test_unknown_policy_is_rejected() {
        let matches = build_cli_command().try_get_matches_from(vec!["multiprocessor-dispatch", "-p", "rr"]);
        assert!(matches.is_err());
    }

    #[test]
    fn test_options_defaults() {
        let options = options_from(&["multiprocessor-dispatch"]);

        assert_eq!(options.job_file, None);
        assert_eq!(options.config, SimulationConfig::new(3, 1.0));
        assert_eq!(options.policies, Policy::ALL.to_vec());
        assert_eq!(options.jobs, 20);
        assert_eq!(options.runs, 1);
        assert_eq!(options.generator, Generator::SemiRandom);
        assert!(!options.quiet);
    }

    #[test]
    fn test_options_reject_zero_units() {
        let matches = build_cli_command()
            .try_get_matches_from(vec!["multiprocessor-dispatch", "-m", "0"])
            .unwrap();
        assert!(Options::from_matches(&matches).is_err());
    }

    #[test]
    fn test_simulate_job_file() {
        let file_path = write_job_file("multiprocessor_dispatch_main_ok.txt", "0 2 5\n0 2 5\n1 1 5\n");
        let output = std::env::temp_dir().join("multiprocessor_dispatch_main_ok.csv");
        let options = options_from(&[
            "multiprocessor-dispatch",
            file_path.to_str().unwrap(),
            "-m",
            "2",
            "-q",
            "-o",
            output.to_str().unwrap(),
        ]);

        assert_eq!(simulate(&options).unwrap(), SchedulingCode::AllDeadlinesMet);
        let written = std::fs::read_to_string(&output).unwrap();
        assert_eq!(written.lines().count(), 1 + Policy::ALL.len());

        std::fs::remove_file(&file_path).expect("Failed to clean up test file");
        std::fs::remove_file(&output).expect("Failed to clean up test file");
    }

    #[test]
    fn test_simulate_reports_misses() {
        let file_path = write_job_file("multiprocessor_dispatch_main_miss.txt", "0 3 3\n0 3 3\n");
        let options = options_from(&["multiprocessor-dispatch", file_path.to_str().unwrap(), "-m", "1", "-p", "edf", "-q"]);

        assert_eq!(simulate(&options).unwrap(), SchedulingCode::DeadlinesMissed);

        std::fs::remove_file(&file_path).expect("Failed to clean up test file");
    }

    #[test]
    fn test_simulate_rejects_infeasible_set() {
        let file_path = write_job_file("multiprocessor_dispatch_main_infeasible.txt", "0 1 5\n4 3 6\n");
        let options = options_from(&["multiprocessor-dispatch", file_path.to_str().unwrap(), "-q"]);

        assert_eq!(simulate(&options).unwrap(), SchedulingCode::Rejected);

        std::fs::remove_file(&file_path).expect("Failed to clean up test file");
    }

    #[test]
    fn test_simulate_empty_file_has_nothing_to_schedule() {
        let file_path = write_job_file("multiprocessor_dispatch_main_empty.txt", "\n\n");
        let options = options_from(&["multiprocessor-dispatch", file_path.to_str().unwrap(), "-q"]);

        assert_eq!(simulate(&options).unwrap(), SchedulingCode::NothingToSchedule);

        std::fs::remove_file(&file_path).expect("Failed to clean up test file");
    }

    #[test]
    fn test_simulate_generated_runs() {
        let options = options_from(&["multiprocessor-dispatch", "-r", "3", "-n", "8", "--seed", "11", "-q"]);

        let code = simulate(&options).unwrap();
        assert!(code <= SchedulingCode::DeadlinesMissed);
    }
}
