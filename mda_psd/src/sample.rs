use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use anyhow::Context;

use utils::names::CovMatcher;

/// Coverage files found for one sample, keyed by chromosome
pub struct SampleFiles {
    name: String,
    files: Vec<(String, PathBuf)>,
}

impl SampleFiles {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn files(&self) -> &[(String, PathBuf)] {
        &self.files
    }
}

/// Scan a directory for coverage files and group them by sample.  Samples
/// and their files come back sorted by name so batch order is
/// deterministic.
pub fn find_samples(dir: &Path, matcher: &CovMatcher) -> anyhow::Result<Vec<SampleFiles>> {
    debug!("Scanning {} for coverage files", dir.display());

    let mut bt: BTreeMap<String, Vec<(String, PathBuf)>> = BTreeMap::new();
    for f in dir
        .read_dir()
        .with_context(|| format!("Error reading coverage directory {}", dir.display()))?
    {
        let entry = f
            .with_context(|| format!("Could not get directory entry from {}", dir.display()))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let fname = entry.file_name();
        let fname = fname.to_string_lossy();
        if let Some((sample, ctg)) = matcher.split(&fname) {
            trace!("Adding file {} for sample {}", path.display(), sample);
            bt.entry(sample.to_owned())
                .or_default()
                .push((ctg.to_owned(), path));
        }
    }

    let samples: Vec<_> = bt
        .into_iter()
        .map(|(name, mut files)| {
            files.sort();
            SampleFiles { name, files }
        })
        .collect();

    debug!(
        "Found {} samples with {} coverage files",
        samples.len(),
        samples.iter().map(|s| s.files.len()).sum::<usize>()
    );
    Ok(samples)
}
