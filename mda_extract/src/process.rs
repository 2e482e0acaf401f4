use std::{collections::HashMap, path::Path};

use rust_htslib::bam::{self, Read};

use utils::{
    cov::write_coverage,
    error::QcError,
    names::{cov_file_name, sample_from_path},
    tasks::run_stage,
};

use crate::{
    config::Config,
    coverage::{CovAccum, ReadFilter},
    mask::CtgMask,
};

/// Fan the input alignment files out to the extraction pool, one task per
/// file.  Tasks share only the read only config (chromosome list + mask)
/// and write disjoint sets of output files, so a failing file never
/// disturbs its siblings.
pub fn process_files(cfg: &Config) -> anyhow::Result<()> {
    let jobs: Vec<_> = cfg
        .input_files()
        .iter()
        .map(|p| (sample_from_path(p), p.clone()))
        .collect();

    run_stage("extract", cfg.threads(), jobs, |sample, path| {
        extract_file(cfg, sample, &path)
    })
}

/// Extract the coverage signal of every catalog chromosome from one
/// alignment file in a single sequential pass
fn extract_file(cfg: &Config, sample: &str, path: &Path) -> anyhow::Result<()> {
    info!("Extracting coverage from {}", path.display());

    let input_err = |e: rust_htslib::errors::Error| QcError::InputRead {
        path: path.to_owned(),
        reason: e.to_string(),
    };

    let mut rdr = bam::Reader::from_path(path).map_err(input_err)?;

    // One accumulator per catalog chromosome, sized to its mask
    let mut accs: Vec<Option<(&CtgMask, CovAccum)>> = cfg
        .chroms()
        .iter()
        .map(|ctg| {
            cfg.mask()
                .ctg(ctg)
                .map(|m| (m, CovAccum::new(m.n_sites())))
        })
        .collect();

    // Map header target ids to catalog indexes
    let chrom_ix: HashMap<&str, usize> = cfg
        .chroms()
        .iter()
        .enumerate()
        .map(|(ix, ctg)| (ctg.as_ref(), ix))
        .collect();
    let tid_map: Vec<Option<usize>> = {
        let header = rdr.header();
        (0..header.target_count())
            .map(|tid| {
                std::str::from_utf8(header.tid2name(tid))
                    .ok()
                    .and_then(|name| chrom_ix.get(name).copied())
            })
            .collect()
    };

    let filter = ReadFilter::new(cfg.min_mapq(), cfg.keep_duplicates());
    let mut rec = bam::Record::new();
    let (mut n_reads, mut n_filtered, mut n_off) = (0u64, 0u64, 0u64);

    while let Some(r) = rdr.read(&mut rec) {
        r.map_err(input_err)?;
        n_reads += 1;
        if !filter.passes(&rec) {
            n_filtered += 1;
            continue;
        }
        let tid = rec.tid();
        let slot = if tid >= 0 {
            tid_map.get(tid as usize).copied().flatten()
        } else {
            None
        };
        match slot {
            Some(ix) => {
                // Chromosomes in the catalog but absent from the mask have
                // no accumulator; their reads count as off mask
                if let Some((cmask, acc)) = accs[ix].as_mut() {
                    acc.add_read(&rec, cmask)
                } else {
                    n_off += 1
                }
            }
            None => n_off += 1,
        }
    }
    debug!(
        "{}: {} reads, {} filtered, {} outside catalog or mask",
        sample, n_reads, n_filtered, n_off
    );

    // Every catalog chromosome gets a coverage file, even an all zero one
    for (ix, ctg) in cfg.chroms().iter().enumerate() {
        let opath = cfg.tmp_dir().join(cov_file_name(sample, ctg));
        match accs[ix].as_ref() {
            Some((cmask, acc)) => write_coverage(
                &opath,
                ctg,
                cmask.positions().zip(acc.depths().iter().copied()),
            )?,
            None => write_coverage(&opath, ctg, std::iter::empty())?,
        }
        trace!("{}: wrote {}", sample, opath.display());
    }
    Ok(())
}
