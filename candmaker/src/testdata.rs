//! Synthetic filterbank fixtures for driver tests.

use candcore::processing::engine::DISPERSION_CONSTANT;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::io::Write;
use std::path::Path;

/// Parameters of a generated dispersed-pulse filterbank.
#[derive(Debug, Clone)]
pub struct SyntheticFil {
    pub nchans: usize,
    pub nbits: u32,
    pub tsamp: f64,
    pub tstart: f64,
    pub fch1: f64,
    pub foff: f64,
    pub nsamples: usize,
    /// Dispersion measure of the injected pulse.
    pub dm: f64,
    /// Pulse arrival time at the highest frequency, seconds.
    pub pulse_time: f64,
    pub pulse_amp: f32,
    pub pulse_width: usize,
    pub baseline: f32,
    pub noise: f32,
    pub seed: u64,
}

impl Default for SyntheticFil {
    fn default() -> Self {
        Self {
            nchans: 64,
            nbits: 8,
            tsamp: 256e-6,
            tstart: 55000.0,
            fch1: 1500.0,
            foff: -4.0,
            nsamples: 1024,
            dm: 0.0,
            pulse_time: 0.0,
            pulse_amp: 0.0,
            pulse_width: 4,
            baseline: 128.0,
            noise: 5.0,
            seed: 7,
        }
    }
}

fn put_keyword(buf: &mut Vec<u8>, keyword: &str) {
    buf.extend_from_slice(&(keyword.len() as u32).to_le_bytes());
    buf.extend_from_slice(keyword.as_bytes());
}

fn put_int(buf: &mut Vec<u8>, keyword: &str, value: i32) {
    put_keyword(buf, keyword);
    buf.extend_from_slice(&value.to_le_bytes());
}

fn put_double(buf: &mut Vec<u8>, keyword: &str, value: f64) {
    put_keyword(buf, keyword);
    buf.extend_from_slice(&value.to_le_bytes());
}

/// Write a sigproc filterbank with gaussian-ish noise and, when
/// `pulse_amp > 0`, one pulse dispersed across the band.
pub fn write_fil(path: &Path, params: &SyntheticFil) -> std::io::Result<()> {
    let mut header = Vec::new();
    put_keyword(&mut header, "HEADER_START");
    put_int(&mut header, "machine_id", 0);
    put_int(&mut header, "telescope_id", 0);
    put_keyword(&mut header, "source_name");
    put_keyword(&mut header, "synthetic");
    put_int(&mut header, "data_type", 1);
    put_int(&mut header, "nchans", params.nchans as i32);
    put_int(&mut header, "nbits", params.nbits as i32);
    put_int(&mut header, "nifs", 1);
    put_double(&mut header, "tsamp", params.tsamp);
    put_double(&mut header, "tstart", params.tstart);
    put_double(&mut header, "fch1", params.fch1);
    put_double(&mut header, "foff", params.foff);
    put_keyword(&mut header, "HEADER_END");

    // Per-channel arrival sample of the injected pulse.
    let f_max = (0..params.nchans)
        .map(|c| params.fch1 + c as f64 * params.foff)
        .fold(f64::MIN, f64::max);
    let pulse_samples: Vec<usize> = (0..params.nchans)
        .map(|c| {
            let freq = params.fch1 + c as f64 * params.foff;
            let delay = DISPERSION_CONSTANT * params.dm * (freq.powi(-2) - f_max.powi(-2));
            ((params.pulse_time + delay) / params.tsamp).round() as usize
        })
        .collect();

    let mut rng = StdRng::seed_from_u64(params.seed);
    let mut data = Vec::with_capacity(params.nsamples * params.nchans * (params.nbits as usize / 8));
    for t in 0..params.nsamples {
        for c in 0..params.nchans {
            let mut value = params.baseline + rng.gen_range(-params.noise..=params.noise);
            let arrival = pulse_samples[c];
            if params.pulse_amp > 0.0 && t >= arrival && t < arrival + params.pulse_width {
                value += params.pulse_amp;
            }
            match params.nbits {
                8 => data.push(value.clamp(0.0, 255.0).round() as u8),
                16 => data
                    .extend_from_slice(&(value.clamp(0.0, 65535.0).round() as u16).to_le_bytes()),
                _ => data.extend_from_slice(&value.to_le_bytes()),
            }
        }
    }

    let mut file = std::fs::File::create(path)?;
    file.write_all(&header)?;
    file.write_all(&data)?;
    Ok(())
}
