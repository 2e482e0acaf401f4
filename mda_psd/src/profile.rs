use std::{
    collections::BTreeMap,
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::Context;
use compress_io::compress::CompressIo;

use utils::{cov::read_coverage, error::QcError, next_fields};

use crate::psd::{welch_psd, SpectralEstimate};

/// SamplePsd
///
/// Spectral profile for one sample: one estimate per chromosome with a
/// coverage file, keyed by chromosome name.  The map is ordered so that
/// serialization is deterministic.  Never mutated after construction.
#[derive(Debug)]
pub struct SamplePsd {
    sample: String,
    chroms: BTreeMap<String, SpectralEstimate>,
}

impl SamplePsd {
    /// Build a profile from the sample's coverage files.  Chromosomes
    /// without a coverage file are absent from the result; a sample with
    /// no coverage files at all is an error, never an empty profile.
    pub fn build(sample: &str, files: &[(String, PathBuf)]) -> anyhow::Result<Self> {
        if files.is_empty() {
            return Err(QcError::NoCoverageData(sample.to_owned()).into());
        }
        let mut chroms = BTreeMap::new();
        for (ctg, path) in files {
            let signal = read_coverage(path)?;
            debug!(
                "{}: estimating PSD for {} from {} sites",
                sample,
                ctg,
                signal.len()
            );
            chroms.insert(ctg.clone(), welch_psd(&signal)?);
        }
        Ok(Self {
            sample: sample.to_owned(),
            chroms,
        })
    }

    pub fn sample(&self) -> &str {
        &self.sample
    }

    pub fn chroms(&self) -> &BTreeMap<String, SpectralEstimate> {
        &self.chroms
    }

    /// Serialize the profile to a single self describing file: a sample
    /// header line then one (chromosome, frequency, power) row per bin
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        trace!("Writing spectral profile {}", path.display());
        let write_err = |e: std::io::Error| QcError::OutputWrite {
            path: path.to_owned(),
            reason: e.to_string(),
        };

        let mut wrt = CompressIo::new()
            .path(path)
            .bufwriter()
            .map_err(|e| QcError::OutputWrite {
                path: path.to_owned(),
                reason: e.to_string(),
            })?;
        writeln!(wrt, "#sample\t{}", self.sample).map_err(write_err)?;
        writeln!(wrt, "#chrom\tfrequency\tpower").map_err(write_err)?;
        for (ctg, est) in self.chroms.iter() {
            for (f, p) in est.freq().iter().zip(est.power()) {
                writeln!(wrt, "{}\t{:e}\t{:e}", ctg, f, p).map_err(write_err)?;
            }
        }
        Ok(())
    }

    /// Reload a profile written by save.  Chromosomes whose estimates had
    /// no bins (empty signals) have no rows and so are absent after a
    /// reload.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        trace!("Reading spectral profile {}", path.display());
        let mut rdr = CompressIo::new()
            .path(path)
            .bufreader()
            .with_context(|| format!("Could not open spectral profile {}", path.display()))?;

        let mut buf = String::new();
        let mut line = 0;
        let mut sample: Option<String> = None;
        let mut raw: BTreeMap<String, (Vec<f64>, Vec<f64>)> = BTreeMap::new();

        while let Some(fields) = next_fields(&mut rdr, &mut buf).with_context(|| {
            format!("Error after reading {} lines from {}", line, path.display())
        })? {
            line += 1;
            if fields.len() == 1 && fields[0].is_empty() {
                continue;
            }
            if fields[0] == "#sample" {
                if fields.len() < 2 {
                    return Err(anyhow!("{}:{} sample line has no id", path.display(), line));
                }
                sample = Some(fields[1].to_owned());
                continue;
            }
            if fields[0].starts_with('#') {
                continue;
            }
            if fields.len() < 3 {
                return Err(anyhow!(
                    "{}:{} expected chrom, frequency, power",
                    path.display(),
                    line
                ));
            }
            let f = fields[1]
                .parse::<f64>()
                .with_context(|| format!("{}:{} bad frequency", path.display(), line))?;
            let p = fields[2]
                .parse::<f64>()
                .with_context(|| format!("{}:{} bad power", path.display(), line))?;
            let e = raw.entry(fields[0].to_owned()).or_default();
            e.0.push(f);
            e.1.push(p);
        }

        let sample = sample
            .ok_or_else(|| anyhow!("{} has no #sample header line", path.display()))?;
        let chroms = raw
            .into_iter()
            .map(|(ctg, (f, p))| (ctg, SpectralEstimate::from_parts(f, p)))
            .collect();
        Ok(Self { sample, chroms })
    }
}
