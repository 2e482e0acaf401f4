use std::{collections::BTreeMap, fs, path::Path, process::Command};

use tempfile::TempDir;

/// Coverage file with a mildly periodic depth signal
fn write_cov(dir: &Path, sample: &str, ctg: &str, n: usize) {
    let mut s = String::new();
    for i in 0..n {
        let depth = 5 + ((i % 16) as i32 - 8).unsigned_abs() % 6;
        s.push_str(&format!("{}\t{}\t{}\n", ctg, i, depth));
    }
    fs::write(dir.join(format!("{}.{}.cov", sample, ctg)), s).unwrap();
}

fn run_psd(dir: &Path, extra: &[&str]) -> bool {
    Command::new(env!("CARGO_BIN_EXE_mda_psd"))
        .arg("-d")
        .arg(dir)
        .arg("-t")
        .arg("2")
        .args(extra)
        .status()
        .unwrap()
        .success()
}

/// Parse a profile: sample id plus per chromosome (frequency, power) rows
fn read_spec(path: &Path) -> (String, BTreeMap<String, Vec<(f64, f64)>>) {
    let text = fs::read_to_string(path).unwrap();
    let mut sample = String::new();
    let mut chroms: BTreeMap<String, Vec<(f64, f64)>> = BTreeMap::new();
    for l in text.lines() {
        let f: Vec<_> = l.split('\t').collect();
        if f[0] == "#sample" {
            sample = f[1].to_owned();
        } else if !f[0].starts_with('#') {
            chroms
                .entry(f[0].to_owned())
                .or_default()
                .push((f[1].parse().unwrap(), f[2].parse().unwrap()));
        }
    }
    (sample, chroms)
}

#[test]
fn profiles_are_built_per_sample() {
    let dir = TempDir::new().unwrap();
    let tmp = dir.path().join("tmp");
    fs::create_dir(&tmp).unwrap();
    write_cov(&tmp, "A", "chr1", 600);
    write_cov(&tmp, "A", "chr2", 400);
    write_cov(&tmp, "B", "chr1", 600);

    assert!(run_psd(dir.path(), &[]));

    // One profile per sample, at the top level rather than under tmp/
    let a_spec = dir.path().join("A.chroms.spec");
    let b_spec = dir.path().join("B.chroms.spec");
    assert!(a_spec.exists());
    assert!(b_spec.exists());
    assert!(!dir.path().join("tmp").join("A.chroms.spec").exists());

    // Sample A sees exactly its own chromosomes, not B's files
    let (sample, chroms) = read_spec(&a_spec);
    assert_eq!(sample, "A");
    let names: Vec<_> = chroms.keys().cloned().collect();
    assert_eq!(names, vec!["chr1", "chr2"]);

    for rows in chroms.values() {
        assert!(!rows.is_empty());
        assert!(rows.iter().all(|(f, p)| *f >= 0.0 && *p >= 0.0));
    }

    let (sample, chroms) = read_spec(&b_spec);
    assert_eq!(sample, "B");
    assert_eq!(chroms.len(), 1);
}

#[test]
fn building_is_deterministic() {
    let dir = TempDir::new().unwrap();
    let tmp = dir.path().join("tmp");
    fs::create_dir(&tmp).unwrap();
    write_cov(&tmp, "A", "chr1", 500);

    assert!(run_psd(dir.path(), &[]));
    let first = fs::read(dir.path().join("A.chroms.spec")).unwrap();
    assert!(run_psd(dir.path(), &[]));
    let second = fs::read(dir.path().join("A.chroms.spec")).unwrap();
    assert_eq!(first, second);
}

#[test]
fn pattern_filter_selects_samples() {
    let dir = TempDir::new().unwrap();
    let tmp = dir.path().join("tmp");
    fs::create_dir(&tmp).unwrap();
    write_cov(&tmp, "A", "chr1", 300);
    write_cov(&tmp, "B", "chr1", 300);

    assert!(run_psd(dir.path(), &["-p", "A."]));
    assert!(dir.path().join("A.chroms.spec").exists());
    assert!(!dir.path().join("B.chroms.spec").exists());
}

#[test]
fn malformed_coverage_file_fails_only_that_sample() {
    let dir = TempDir::new().unwrap();
    let tmp = dir.path().join("tmp");
    fs::create_dir(&tmp).unwrap();
    write_cov(&tmp, "A", "chr1", 300);
    fs::write(tmp.join("B.chr1.cov"), "chr1\t0\tbroken\n").unwrap();

    // The batch reports failure but the good sample's profile is written
    assert!(!run_psd(dir.path(), &[]));
    assert!(dir.path().join("A.chroms.spec").exists());
    assert!(!dir.path().join("B.chroms.spec").exists());
}

#[test]
fn missing_coverage_directory_fails() {
    let dir = TempDir::new().unwrap();
    assert!(!run_psd(dir.path(), &[]));
}
