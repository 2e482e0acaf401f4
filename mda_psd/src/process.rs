use utils::{names::spec_file_name, tasks::run_stage};

use crate::{config::Config, profile::SamplePsd, sample::SampleFiles};

/// Fan the discovered samples out to the estimation pool, one task per
/// sample.  Each task reads only its own sample's coverage files and
/// writes only its own profile, so a failing sample never disturbs its
/// siblings.
pub fn process_samples(cfg: &Config) -> anyhow::Result<()> {
    if cfg.samples().is_empty() {
        warn!(
            "No coverage files found in {}; nothing to do",
            cfg.cov_dir().display()
        );
        return Ok(());
    }

    let jobs: Vec<_> = cfg
        .samples()
        .iter()
        .map(|s| (s.name().to_owned(), s))
        .collect();

    run_stage("psd", cfg.threads(), jobs, |name, s| {
        build_sample(cfg, name, s)
    })
}

fn build_sample(cfg: &Config, name: &str, s: &SampleFiles) -> anyhow::Result<()> {
    info!(
        "Estimating spectral profile for {} ({} chromosomes)",
        name,
        s.files().len()
    );
    let psd = SamplePsd::build(name, s.files())?;

    let opath = cfg.out_dir().join(spec_file_name(name));
    psd.save(&opath)?;
    info!("Wrote spectral profile {}", opath.display());
    Ok(())
}
