use std::{fs, path::Path, process::Command};

use rust_htslib::bam::{
    self,
    header::{Header, HeaderRecord},
    record::{Cigar, CigarString},
};
use tempfile::TempDir;

const CHROMS: [&str; 23] = [
    "chr1", "chr2", "chr3", "chr4", "chr5", "chr6", "chr7", "chr8", "chr9", "chr10", "chr11",
    "chr12", "chr13", "chr14", "chr15", "chr16", "chr17", "chr18", "chr19", "chr20", "chr21",
    "chr22", "chrX",
];

fn add_read(
    wrt: &mut bam::Writer,
    name: &[u8],
    tid: i32,
    pos: i64,
    len: u32,
    mapq: u8,
    duplicate: bool,
) {
    let mut r = bam::Record::new();
    let cigar = CigarString(vec![Cigar::Match(len)]);
    let seq = vec![b'A'; len as usize];
    let qual = vec![40u8; len as usize];
    r.set(name, Some(&cigar), &seq, &qual);
    r.set_tid(tid);
    r.set_pos(pos);
    r.set_mapq(mapq);
    if duplicate {
        r.set_duplicate();
    }
    wrt.write(&r).unwrap();
}

/// BAM with reads on chr1 only: two passing reads, one below the mapping
/// quality threshold and one duplicate flagged
fn make_bam(path: &Path) {
    let mut hdr = Header::new();
    for ctg in ["chr1", "chr2"] {
        let mut rec = HeaderRecord::new(b"SQ");
        rec.push_tag(b"SN", &ctg);
        rec.push_tag(b"LN", &"100000");
        hdr.push_record(&rec);
    }
    let mut wrt = bam::Writer::from_path(path, &hdr, bam::Format::Bam).unwrap();
    add_read(&mut wrt, b"r1", 0, 100, 10, 60, false);
    add_read(&mut wrt, b"r2", 0, 105, 10, 60, false);
    add_read(&mut wrt, b"r3", 0, 100, 10, 10, false);
    add_read(&mut wrt, b"r4", 0, 100, 10, 60, true);
}

fn run_extract(bam: &Path, mask: &Path, out: &Path) {
    let status = Command::new(env!("CARGO_BIN_EXE_mda_extract"))
        .arg("-m")
        .arg(mask)
        .arg("-o")
        .arg(out)
        .arg("-t")
        .arg("2")
        .arg(bam)
        .status()
        .unwrap();
    assert!(status.success());
}

#[test]
fn extraction_end_to_end() {
    let dir = TempDir::new().unwrap();
    let bam_path = dir.path().join("s1.bam");
    make_bam(&bam_path);

    // Mask on chr1 only; every other catalog chromosome has no sites
    let mask_path = dir.path().join("mask.bed");
    fs::write(&mask_path, "chr1\t100\t110\nchr1\t150\t155\n").unwrap();

    let out = dir.path().join("out");
    run_extract(&bam_path, &mask_path, &out);

    // One coverage file per catalog chromosome, even all zero ones
    let tmp = out.join("tmp");
    for ctg in CHROMS {
        let p = tmp.join(format!("s1.{}.cov", ctg));
        assert!(p.exists(), "missing coverage file for {}", ctg);
    }

    // chr1: r1 covers 100..110, r2 covers 105..110 of the mask; the low
    // mapq and duplicate reads contribute nothing
    let chr1 = fs::read_to_string(tmp.join("s1.chr1.cov")).unwrap();
    let depths: Vec<(usize, u32)> = chr1
        .lines()
        .map(|l| {
            let f: Vec<_> = l.split('\t').collect();
            assert_eq!(f[0], "chr1");
            (f[1].parse().unwrap(), f[2].parse().unwrap())
        })
        .collect();
    assert_eq!(depths.len(), 15);
    for (i, (pos, d)) in depths[..10].iter().enumerate() {
        assert_eq!(*pos, 100 + i);
        assert_eq!(*d, if i < 5 { 1 } else { 2 });
    }
    for (i, (pos, d)) in depths[10..].iter().enumerate() {
        assert_eq!(*pos, 150 + i);
        assert_eq!(*d, 0);
    }

    // chr2 is in the catalog but has no masked sites
    assert_eq!(fs::read(tmp.join("s1.chr2.cov")).unwrap(), b"");
}

#[test]
fn extraction_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let bam_path = dir.path().join("s1.bam");
    make_bam(&bam_path);
    let mask_path = dir.path().join("mask.bed");
    fs::write(&mask_path, "chr1\t100\t110\n").unwrap();

    let out = dir.path().join("out");
    run_extract(&bam_path, &mask_path, &out);
    let first = fs::read(out.join("tmp").join("s1.chr1.cov")).unwrap();
    run_extract(&bam_path, &mask_path, &out);
    let second = fs::read(out.join("tmp").join("s1.chr1.cov")).unwrap();
    assert_eq!(first, second);
}

#[test]
fn unknown_build_fails() {
    let dir = TempDir::new().unwrap();
    let bam_path = dir.path().join("s1.bam");
    make_bam(&bam_path);
    let mask_path = dir.path().join("mask.bed");
    fs::write(&mask_path, "chr1\t100\t110\n").unwrap();

    let status = Command::new(env!("CARGO_BIN_EXE_mda_extract"))
        .arg("-m")
        .arg(&mask_path)
        .arg("-o")
        .arg(dir.path().join("out"))
        .arg("-b")
        .arg("mm10")
        .arg(&bam_path)
        .status()
        .unwrap();
    assert!(!status.success());
}

#[test]
fn missing_input_file_fails() {
    let dir = TempDir::new().unwrap();
    let mask_path = dir.path().join("mask.bed");
    fs::write(&mask_path, "chr1\t100\t110\n").unwrap();

    let status = Command::new(env!("CARGO_BIN_EXE_mda_extract"))
        .arg("-m")
        .arg(&mask_path)
        .arg("-o")
        .arg(dir.path().join("out"))
        .arg(dir.path().join("no_such.bam"))
        .status()
        .unwrap();
    assert!(!status.success());
}
