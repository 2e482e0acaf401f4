use std::path::Path;

use regex::Regex;

/// File naming conventions shared by the extraction and spectral stages.
///
/// Coverage files are named `<sample>.<chromosome>.cov`.  The sample part
/// is everything up to the final dot-free component before the fixed
/// `.cov` suffix, so sample names may themselves contain dots while
/// chromosome names may not.  Spectral profiles are named
/// `<sample>.chroms.spec`.

const COV_SUFFIX: &str = ".cov";

pub fn cov_file_name(sample: &str, ctg: &str) -> String {
    format!("{}.{}{}", sample, ctg, COV_SUFFIX)
}

pub fn spec_file_name(sample: &str) -> String {
    format!("{}.chroms.spec", sample)
}

/// Sample name for an alignment file (base name with the extension removed)
pub fn sample_from_path(path: &Path) -> String {
    path.file_stem()
        .or_else(|| path.file_name())
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// CovMatcher
///
/// Matcher for coverage file names.  The structural pattern is fixed; an
/// optional user supplied filter is applied as a literal substring test on
/// the name minus the `.cov` suffix, so filter text can never change the
/// shape of the match.
pub struct CovMatcher {
    re: Regex,
    filter: Option<String>,
}

impl CovMatcher {
    pub fn new(filter: Option<&str>) -> anyhow::Result<Self> {
        let re = Regex::new(r"^(.+)\.([^.]+)\.cov$")?;
        Ok(Self {
            re,
            filter: filter.map(|s| s.to_owned()),
        })
    }

    /// Split a coverage file name into its (sample, chromosome) parts.
    /// Returns None if the name does not follow the naming convention or
    /// does not contain the filter substring.
    pub fn split<'a>(&self, name: &'a str) -> Option<(&'a str, &'a str)> {
        let c = self.re.captures(name)?;
        if let Some(f) = self.filter.as_deref() {
            let stem = &name[..name.len() - COV_SUFFIX.len()];
            if !stem.contains(f) {
                return None;
            }
        }
        Some((c.get(1).unwrap().as_str(), c.get(2).unwrap().as_str()))
    }
}
