use std::sync::Arc;

use utils::error::QcError;

/// Chromosomes used for mappability QC: the autosomes plus X.  Y and the
/// mitochondrial genome are excluded as their mappable fraction is too
/// small to give a usable spectrum.
const HUMAN_CHROMS: [&str; 23] = [
    "chr1", "chr2", "chr3", "chr4", "chr5", "chr6", "chr7", "chr8", "chr9", "chr10", "chr11",
    "chr12", "chr13", "chr14", "chr15", "chr16", "chr17", "chr18", "chr19", "chr20", "chr21",
    "chr22", "chrX",
];

/// Resolve a genome build identifier to its ordered chromosome list.
/// Pure lookup; the same build always gives the same list.
pub fn chroms_from_build(build: &str) -> Result<Vec<Arc<str>>, QcError> {
    match build.to_ascii_lowercase().as_str() {
        "grch37" | "hg19" | "grch38" | "hg38" => {
            Ok(HUMAN_CHROMS.iter().map(|s| Arc::from(*s)).collect())
        }
        _ => Err(QcError::UnknownBuild(build.to_owned())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookups_are_deterministic() {
        let a = chroms_from_build("grch37").unwrap();
        let b = chroms_from_build("grch37").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 23);
        assert_eq!(a[0].as_ref(), "chr1");
        assert_eq!(a[22].as_ref(), "chrX");
    }

    #[test]
    fn build_names_are_case_insensitive() {
        assert_eq!(
            chroms_from_build("GRCh37").unwrap(),
            chroms_from_build("hg19").unwrap()
        );
    }

    #[test]
    fn unknown_build_is_an_error() {
        assert!(matches!(
            chroms_from_build("mm10"),
            Err(QcError::UnknownBuild(_))
        ));
    }
}
