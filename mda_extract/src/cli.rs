use std::{fs, num::NonZeroUsize, path::PathBuf};

use clap::{
    crate_description, crate_name, crate_version, value_parser, Arg, ArgAction, Command,
};

use anyhow::Context;
use compress_io::compress::CompressIo;

use utils::{error::QcError, init_log, next_fields, LogLevel};

use crate::{builds::chroms_from_build, config::Config, mask::Mask};

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
                .help("Set number of extraction threads [default: available cores]"),
        )
        .arg(
            Arg::new("build")
                .short('b')
                .long("build")
                .value_parser(value_parser!(String))
                .value_name("BUILD")
                .default_value("grch37")
                .help("Set genome build"),
        )
        .arg(
            Arg::new("mapq")
                .short('q')
                .long("mapq")
                .value_parser(value_parser!(u8))
                .value_name("INT")
                .default_value("30")
                .help("Set mapping quality threshold"),
        )
        .arg(
            Arg::new("mask")
                .short('m')
                .long("mask")
                .value_parser(value_parser!(PathBuf))
                .value_name("BED_FILE")
                .required(true)
                .help("BED file with uniquely mappable regions for the build"),
        )
        .arg(
            Arg::new("keep_duplicates")
                .short('k')
                .long("keep-duplicates")
                .action(ArgAction::SetTrue)
                .help("Keep duplicate flagged reads"),
        )
        .arg(
            Arg::new("out_dir")
                .short('o')
                .long("out-dir")
                .value_parser(value_parser!(PathBuf))
                .value_name("PATH")
                .default_value(".")
                .help("Set output directory (coverage files go to <out_dir>/tmp)"),
        )
        .arg(
            Arg::new("file_list")
                .short('f')
                .long("file-list")
                .value_parser(value_parser!(PathBuf))
                .value_name("PATH")
                .help("File with list of alignment file paths, used instead of INPUT"),
        )
        .arg(
            Arg::new("input")
                .value_parser(value_parser!(PathBuf))
                .value_name("INPUT")
                .num_args(0..)
                .help("Input alignment file(s) (SAM/BAM/CRAM)"),
        )
}

/// Read a newline delimited list of alignment file paths
fn read_file_list(fname: &PathBuf) -> anyhow::Result<Vec<PathBuf>> {
    debug!("Reading input file list from {}", fname.display());
    let mut rdr = CompressIo::new()
        .path(fname)
        .bufreader()
        .with_context(|| format!("Could not open file list {}", fname.display()))?;

    let mut buf = String::new();
    let mut line = 0;
    let mut files = Vec::new();
    while let Some(fields) = next_fields(&mut rdr, &mut buf)
        .with_context(|| format!("Error after reading {} lines from {}", line, fname.display()))?
    {
        line += 1;
        if !fields.is_empty() && !fields[0].is_empty() {
            files.push(PathBuf::from(fields[0]))
        }
    }
    Ok(files)
}

/// Handle command line options.  Set up Config structure
pub fn handle_cli() -> anyhow::Result<Config> {
    // Get matches from command line
    let m = cli_model().get_matches();

    // Setup logging
    init_log(&m);

    debug!("Processing command line options");

    // Resolve build before anything else so an unknown build fails early
    let build = m.get_one::<String>("build").expect("Missing default build");
    let chroms = chroms_from_build(build)?;

    // Set up threads
    let nt = m
        .get_one::<NonZeroUsize>("threads")
        .map(|x| usize::from(*x))
        .unwrap_or_else(num_cpus::get);

    let min_mapq = *m.get_one::<u8>("mapq").expect("Missing default mapq");
    let keep_duplicates = m.get_flag("keep_duplicates");

    // Collect input files from the manifest or the positional arguments
    let input_files = if let Some(p) = m.get_one::<PathBuf>("file_list") {
        read_file_list(p)?
    } else {
        m.get_many::<PathBuf>("input")
            .map(|v| v.cloned().collect())
            .unwrap_or_default()
    };
    if input_files.is_empty() {
        return Err(anyhow!("No input alignment files given"));
    }
    debug!("{} input alignment files", input_files.len());

    // Read in mappability mask
    let mask = Mask::from_bed_file(m.get_one::<PathBuf>("mask").expect("Missing mask"), &chroms)?;

    // Create coverage file directory under the output directory
    let out_dir = m
        .get_one::<PathBuf>("out_dir")
        .expect("Missing default output dir");
    let tmp_dir = out_dir.join("tmp");
    fs::create_dir_all(&tmp_dir).map_err(|e| QcError::OutputWrite {
        path: tmp_dir.clone(),
        reason: e.to_string(),
    })?;

    Ok(Config::new(
        input_files,
        chroms,
        mask,
        tmp_dir,
        min_mapq,
        keep_duplicates,
        nt,
    ))
}
