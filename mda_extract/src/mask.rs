use std::{collections::HashMap, path::Path, sync::Arc};

use anyhow::Context;
use compress_io::compress::CompressIo;

use utils::next_fields;

/// Mappability mask for one chromosome: a sorted, merged list of half open
/// intervals of uniquely mappable positions, plus cumulative offsets so a
/// genomic position maps to its index in the coverage signal.
pub struct CtgMask {
    intervals: Vec<(u32, u32)>,
    offset: Vec<usize>,
    n_sites: usize,
}

impl CtgMask {
    pub(crate) fn from_intervals(mut v: Vec<(u32, u32)>) -> Self {
        v.sort_unstable();
        let mut intervals: Vec<(u32, u32)> = Vec::with_capacity(v.len());
        for (s, e) in v.drain(..) {
            if e <= s {
                continue;
            }
            match intervals.last_mut() {
                // Merge overlapping or adjacent intervals
                Some(last) if s <= last.1 => last.1 = last.1.max(e),
                _ => intervals.push((s, e)),
            }
        }
        let mut offset = Vec::with_capacity(intervals.len());
        let mut n_sites = 0;
        for (s, e) in intervals.iter() {
            offset.push(n_sites);
            n_sites += (e - s) as usize;
        }
        Self {
            intervals,
            offset,
            n_sites,
        }
    }

    pub fn n_sites(&self) -> usize {
        self.n_sites
    }

    /// Signal index of a genomic position, or None if the position is not
    /// uniquely mappable
    pub fn index_of(&self, pos: u32) -> Option<usize> {
        let i = self.intervals.partition_point(|(s, _)| *s <= pos);
        if i == 0 {
            return None;
        }
        let (s, e) = self.intervals[i - 1];
        if pos < e {
            Some(self.offset[i - 1] + (pos - s) as usize)
        } else {
            None
        }
    }

    /// Apply f to the signal index of every mappable position in [start, end)
    pub fn for_each_site<F: FnMut(usize)>(&self, start: u32, end: u32, mut f: F) {
        let i0 = self.intervals.partition_point(|(_, e)| *e <= start);
        for (ix, (s, e)) in self.intervals[i0..].iter().enumerate() {
            if *s >= end {
                break;
            }
            let a = start.max(*s);
            let b = end.min(*e);
            let off = self.offset[i0 + ix] + (a - s) as usize;
            for k in 0..(b - a) as usize {
                f(off + k)
            }
        }
    }

    /// Genomic positions of the mask in signal order
    pub fn positions(&self) -> impl Iterator<Item = usize> + '_ {
        self.intervals
            .iter()
            .flat_map(|(s, e)| (*s as usize)..(*e as usize))
    }
}

/// Mappability mask for a genome build, read once per extraction run and
/// shared read only across worker threads
pub struct Mask {
    ctgs: HashMap<Arc<str>, CtgMask>,
}

impl Mask {
    /// Read a mask from a BED file (chrom, start, end; half open, 0 based).
    /// Only chromosomes present in the build's catalog are kept.
    pub fn from_bed_file<P: AsRef<Path>>(fname: P, chroms: &[Arc<str>]) -> anyhow::Result<Self> {
        let fname = fname.as_ref();
        debug!("Reading mappability mask from {}", fname.display());

        let mut rdr = CompressIo::new()
            .path(fname)
            .bufreader()
            .with_context(|| format!("Could not open mask file {}", fname.display()))?;

        let ctg_hash: HashMap<&str, &Arc<str>> =
            chroms.iter().map(|c| (c.as_ref(), c)).collect();
        let mut raw: HashMap<Arc<str>, Vec<(u32, u32)>> = HashMap::new();

        let mut buf = String::new();
        let mut line = 0;
        let mut skipped = 0;
        while let Some(fields) = next_fields(&mut rdr, &mut buf).with_context(|| {
            format!("Error after reading {} lines from {}", line, fname.display())
        })? {
            line += 1;
            if fields.is_empty() || fields[0].is_empty() || fields[0].starts_with('#') {
                continue;
            }
            if fields.len() < 3 {
                return Err(anyhow!(
                    "{}:{} short mask line (expected chrom, start, end)",
                    fname.display(),
                    line
                ));
            }
            let ctg = match ctg_hash.get(fields[0]) {
                Some(c) => Arc::clone(c),
                None => {
                    skipped += 1;
                    continue;
                }
            };
            let start = fields[1]
                .parse::<u32>()
                .with_context(|| format!("{}:{} bad interval start", fname.display(), line))?;
            let end = fields[2]
                .parse::<u32>()
                .with_context(|| format!("{}:{} bad interval end", fname.display(), line))?;
            raw.entry(ctg).or_default().push((start, end));
        }

        let ctgs: HashMap<_, _> = raw
            .into_iter()
            .map(|(ctg, v)| (ctg, CtgMask::from_intervals(v)))
            .collect();

        debug!(
            "Mask covers {} chromosomes, {} sites total ({} off catalog lines skipped)",
            ctgs.len(),
            ctgs.values().map(|c| c.n_sites()).sum::<usize>(),
            skipped
        );
        Ok(Self { ctgs })
    }

    pub fn ctg(&self, name: &str) -> Option<&CtgMask> {
        self.ctgs.get(name)
    }
}
