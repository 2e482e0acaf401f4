use rust_htslib::bam::record::{Cigar, Record};

use crate::mask::CtgMask;

/// Filter for aligned reads contributing to the depth signal.
///
/// Unmapped, secondary, supplementary and QC-fail reads are always
/// discarded; duplicate flagged reads are discarded unless keep_duplicates
/// is set.  Reads with mapping quality strictly below min_mapq are
/// discarded; a missing mapping quality (255) always passes.
#[derive(Debug)]
pub struct ReadFilter {
    min_mapq: u8,
    keep_duplicates: bool,
}

impl ReadFilter {
    pub fn new(min_mapq: u8, keep_duplicates: bool) -> Self {
        Self {
            min_mapq,
            keep_duplicates,
        }
    }

    pub fn passes(&self, rec: &Record) -> bool {
        if rec.is_unmapped()
            || rec.is_secondary()
            || rec.is_supplementary()
            || rec.is_quality_check_failed()
        {
            return false;
        }
        if rec.is_duplicate() && !self.keep_duplicates {
            return false;
        }
        rec.mapq() >= self.min_mapq
    }
}

/// Depth accumulator for one chromosome, one slot per uniquely mappable
/// position in mask order
pub struct CovAccum {
    depth: Vec<u32>,
}

impl CovAccum {
    pub fn new(n_sites: usize) -> Self {
        Self {
            depth: vec![0; n_sites],
        }
    }

    /// Walk the CIGAR of a retained read, incrementing depth at every
    /// mappable position under an M, = or X operation.  D and N advance
    /// the reference without adding depth; I, S, H and P advance only the
    /// query.
    pub fn add_read(&mut self, rec: &Record, mask: &CtgMask) {
        let mut x = rec.pos().max(0) as u32;
        for op in rec.cigar().iter() {
            match *op {
                Cigar::Match(l) | Cigar::Equal(l) | Cigar::Diff(l) => {
                    mask.for_each_site(x, x + l, |ix| self.depth[ix] += 1);
                    x += l;
                }
                Cigar::Del(l) | Cigar::RefSkip(l) => x += l,
                _ => (),
            }
        }
    }

    pub fn depths(&self) -> &[u32] {
        &self.depth
    }
}
