use std::f64::consts::PI;

use realfft::RealFftPlanner;

// Welch estimator settings.  Fixed so that identical signals always give
// identical estimates; the segment length is clamped to the signal length
// for short signals.
const SEG_LEN: usize = 1024;

/// Power spectral density estimate for one coverage signal: frequency bins
/// and the matching non negative power values, equal length
#[derive(Debug, Clone, PartialEq)]
pub struct SpectralEstimate {
    freq: Vec<f64>,
    power: Vec<f64>,
}

impl SpectralEstimate {
    pub(crate) fn from_parts(freq: Vec<f64>, power: Vec<f64>) -> Self {
        assert_eq!(freq.len(), power.len());
        Self { freq, power }
    }

    pub fn empty() -> Self {
        Self {
            freq: Vec::new(),
            power: Vec::new(),
        }
    }

    pub fn freq(&self) -> &[f64] {
        &self.freq
    }

    pub fn power(&self) -> &[f64] {
        &self.power
    }

    pub fn len(&self) -> usize {
        self.freq.len()
    }

    pub fn is_empty(&self) -> bool {
        self.freq.is_empty()
    }
}

/// Estimate the PSD of a coverage signal with Welch's method: split the
/// signal into half overlapping segments, remove each segment's mean,
/// apply a Hann taper and average the one sided periodograms.  Sample
/// spacing is one mappable position, so frequencies run from 0 to 0.5
/// cycles per position.
///
/// Signals shorter than two positions carry no frequency content and give
/// an empty estimate.
pub fn welch_psd(signal: &[f64]) -> anyhow::Result<SpectralEstimate> {
    let nseg = SEG_LEN.min(signal.len());
    if nseg < 2 {
        return Ok(SpectralEstimate::empty());
    }
    let step = nseg / 2;

    // Periodic Hann taper and its power for density scaling
    let win: Vec<f64> = (0..nseg)
        .map(|i| 0.5 * (1.0 - (2.0 * PI * i as f64 / nseg as f64).cos()))
        .collect();
    let win_pwr: f64 = win.iter().map(|w| w * w).sum();

    let mut planner = RealFftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(nseg);
    let mut input = fft.make_input_vec();
    let mut output = fft.make_output_vec();

    let n_bins = output.len();
    let mut power = vec![0.0; n_bins];
    let mut n_segments = 0usize;

    let mut start = 0;
    while start + nseg <= signal.len() {
        let seg = &signal[start..start + nseg];
        let mean = seg.iter().sum::<f64>() / nseg as f64;
        for (x, (s, w)) in input.iter_mut().zip(seg.iter().zip(win.iter())) {
            *x = (s - mean) * w;
        }
        fft.process(&mut input, &mut output)
            .map_err(|e| anyhow!("FFT failed on {} point segment: {}", nseg, e))?;
        for (p, z) in power.iter_mut().zip(output.iter()) {
            *p += z.norm_sqr();
        }
        n_segments += 1;
        start += step;
    }

    // One sided density scaling; interior bins carry both halves of the
    // spectrum.  The last bin is the Nyquist bin only for even segment
    // lengths.
    let scale = 1.0 / (win_pwr * n_segments as f64);
    for (k, p) in power.iter_mut().enumerate() {
        *p *= scale;
        if k > 0 && !(nseg % 2 == 0 && k == n_bins - 1) {
            *p *= 2.0;
        }
    }

    let freq = (0..n_bins).map(|k| k as f64 / nseg as f64).collect();
    Ok(SpectralEstimate { freq, power })
}
