use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::mask::Mask;

/// Config
///
/// Configuration info for the program
/// This is generated from the command line arguments
/// Once set it is read only
///
/// input_files - alignment files to extract coverage from
/// chroms - ordered chromosome list for the selected build
/// mask - mappability mask for the selected build
/// tmp_dir - directory for the per chromosome coverage files
/// min_mapq - mapping quality threshold
/// keep_duplicates - keep duplicate flagged reads
/// threads - number of extraction threads
///
pub struct Config {
    input_files: Vec<PathBuf>,
    chroms: Vec<Arc<str>>,
    mask: Mask,
    tmp_dir: PathBuf,
    min_mapq: u8,
    keep_duplicates: bool,
    threads: usize,
}

impl Config {
    pub fn new(
        input_files: Vec<PathBuf>,
        chroms: Vec<Arc<str>>,
        mask: Mask,
        tmp_dir: PathBuf,
        min_mapq: u8,
        keep_duplicates: bool,
        threads: usize,
    ) -> Self {
        Self {
            input_files,
            chroms,
            mask,
            tmp_dir,
            min_mapq,
            keep_duplicates,
            threads,
        }
    }

    pub fn input_files(&self) -> &[PathBuf] {
        &self.input_files
    }

    pub fn chroms(&self) -> &[Arc<str>] {
        &self.chroms
    }

    pub fn mask(&self) -> &Mask {
        &self.mask
    }

    pub fn tmp_dir(&self) -> &Path {
        &self.tmp_dir
    }

    pub fn min_mapq(&self) -> u8 {
        self.min_mapq
    }

    pub fn keep_duplicates(&self) -> bool {
        self.keep_duplicates
    }

    pub fn threads(&self) -> usize {
        self.threads
    }
}
