use std::{num::NonZeroUsize, path::PathBuf};

use clap::{
    crate_description, crate_name, crate_version, value_parser, Arg, ArgAction, Command,
};

use utils::{init_log, names::CovMatcher, LogLevel};

use crate::{config::Config, sample::find_samples};

/// Set up definition of command options for clap
fn cli_model() -> Command {
    Command::new(crate_name!())
        .about(crate_description!())
        .version(crate_version!())
        .arg(
            Arg::new("timestamp")
                .short('X')
                .long("timestamp")
                .value_parser(value_parser!(stderrlog::Timestamp))
                .value_name("GRANULARITY")
                .default_value("none")
                .help("Prepend log entries with a timestamp"),
        )
        .arg(
            Arg::new("loglevel")
                .short('l')
                .long("loglevel")
                .value_name("LOGLEVEL")
                .value_parser(value_parser!(LogLevel))
                .ignore_case(true)
                .default_value("warn")
                .help("Set log level"),
        )
        .arg(
            Arg::new("quiet")
                .action(ArgAction::SetTrue)
                .long("quiet")
                .conflicts_with("loglevel")
                .help("Silence all output"),
        )
        .arg(
            Arg::new("threads")
                .short('t')
                .long("threads")
                .value_parser(value_parser!(NonZeroUsize))
                .value_name("INT")
                .help("Set number of estimation threads [default: available cores]"),
        )
        .arg(
            Arg::new("pattern")
                .short('p')
                .long("pattern")
                .value_parser(value_parser!(String))
                .value_name("STRING")
                .help("Only use coverage files whose name contains this text"),
        )
        .arg(
            Arg::new("dir")
                .short('d')
                .long("dir")
                .value_parser(value_parser!(PathBuf))
                .value_name("PATH")
                .default_value(".")
                .help("Directory with coverage files under tmp/; profiles are written here"),
        )
}

/// Handle command line options.  Set up Config structure
pub fn handle_cli() -> anyhow::Result<Config> {
    // Get matches from command line
    let m = cli_model().get_matches();

    // Setup logging
    init_log(&m);

    debug!("Processing command line options");

    // Set up threads
    let nt = m
        .get_one::<NonZeroUsize>("threads")
        .map(|x| usize::from(*x))
        .unwrap_or_else(num_cpus::get);

    let out_dir = m
        .get_one::<PathBuf>("dir")
        .expect("Missing default directory")
        .clone();
    let cov_dir = out_dir.join("tmp");
    if !cov_dir.is_dir() {
        return Err(anyhow!(
            "Coverage directory {} not found",
            cov_dir.display()
        ));
    }

    // Find coverage files, grouped by sample
    let matcher = CovMatcher::new(m.get_one::<String>("pattern").map(|s| s.as_str()))?;
    let samples = find_samples(&cov_dir, &matcher)?;

    Ok(Config::new(out_dir, cov_dir, samples, nt))
}
