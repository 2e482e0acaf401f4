#[macro_use]
extern crate log;
#[macro_use]
extern crate anyhow;

pub mod cov;
pub mod error;
pub mod names;
pub mod tasks;

use std::{fmt, io::BufRead, str::FromStr};

use clap::ArgMatches;

const LEVEL_STR: [&str; 6] = ["error", "warn", "info", "debug", "trace", "none"];

/// LogLevel
///
/// Represents minimum level of messages that will be logged
///
#[derive(Debug, Clone, Copy)]
pub struct LogLevel {
    level: usize,
}

impl FromStr for LogLevel {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.to_lowercase();
        LEVEL_STR
            .iter()
            .position(|x| *x == s)
            .map(|level| LogLevel { level })
            .ok_or("no match")
    }
}

impl LogLevel {
    pub fn is_none(&self) -> bool {
        self.level > 4
    }

    pub fn get_level(&self) -> usize {
        if self.level > 4 {
            0
        } else {
            self.level
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.level < 6 {
            write!(f, "{}", LEVEL_STR[self.level])
        } else {
            write!(f, "unknown")
        }
    }
}

impl Default for LogLevel {
    /// warn, matching the command line default
    fn default() -> Self {
        Self { level: 1 }
    }
}

/// Initialize logging from command line arguments
pub fn init_log(m: &ArgMatches) {
    let level = m.get_one::<LogLevel>("loglevel").copied().unwrap_or_default();
    let ts = m
        .get_one::<stderrlog::Timestamp>("timestamp")
        .copied()
        .unwrap_or(stderrlog::Timestamp::Off);

    stderrlog::new()
        .quiet(level.is_none() || m.get_flag("quiet"))
        .verbosity(level.get_level())
        .timestamp(ts)
        .init()
        .expect("Failed to initialize logging");
}

/// Read the next line, trimmed and split on tabs.  Returns None at end of
/// input.
pub fn next_fields<'a, R: BufRead>(
    rdr: &mut R,
    buf: &'a mut String,
) -> anyhow::Result<Option<Vec<&'a str>>> {
    buf.clear();
    match rdr.read_line(buf)? {
        0 => Ok(None),
        _ => Ok(Some(buf.trim().split('\t').collect())),
    }
}
