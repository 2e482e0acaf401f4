use std::path::{Path, PathBuf};

use crate::sample::SampleFiles;

/// Config
///
/// Configuration info for the program
/// This is generated from the command line arguments
/// Once set it is read only
///
/// out_dir - directory where spectral profiles are written
/// cov_dir - directory scanned for coverage files (<out_dir>/tmp)
/// samples - samples found in cov_dir with their coverage files
/// threads - number of estimation threads
///
pub struct Config {
    out_dir: PathBuf,
    cov_dir: PathBuf,
    samples: Vec<SampleFiles>,
    threads: usize,
}

impl Config {
    pub fn new(
        out_dir: PathBuf,
        cov_dir: PathBuf,
        samples: Vec<SampleFiles>,
        threads: usize,
    ) -> Self {
        Self {
            out_dir,
            cov_dir,
            samples,
            threads,
        }
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    pub fn cov_dir(&self) -> &Path {
        &self.cov_dir
    }

    pub fn samples(&self) -> &[SampleFiles] {
        &self.samples
    }

    pub fn threads(&self) -> usize {
        self.threads
    }
}
