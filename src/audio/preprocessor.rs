use crate::audio::resampler::resample_audio;
use crate::audio::AudioSample;
use crate::Result;
use tracing::debug;

/// Sample rate expected by the recognizer
pub const RECOGNIZER_SAMPLE_RATE: u32 = 16000;

/// Normalize audio to a peak amplitude of 0.95
pub fn normalize_audio(samples: &[f32]) -> Vec<f32> {
    let peak = samples.iter().map(|s| s.abs()).fold(0.0f32, f32::max);

    if peak == 0.0 || peak.is_nan() {
        return samples.to_vec();
    }

    let gain = 0.95 / peak;
    samples.iter().map(|&s| s * gain).collect()
}

/// Subtract the mean to remove DC offset
pub fn remove_dc_offset(samples: &[f32]) -> Vec<f32> {
    if samples.is_empty() {
        return Vec::new();
    }

    let mean: f32 = samples.iter().sum::<f32>() / samples.len() as f32;
    samples.iter().map(|&s| s - mean).collect()
}

/// Prepare a captured utterance for recognition: DC removal, 16 kHz, peak normalize
pub fn preprocess_for_recognition(sample: &AudioSample) -> Result<Vec<f32>> {
    debug!(
        "Preprocessing {} samples at {} Hz",
        sample.samples.len(),
        sample.sample_rate
    );

    let no_dc = remove_dc_offset(&sample.samples);
    let resampled = resample_audio(&no_dc, sample.sample_rate, RECOGNIZER_SAMPLE_RATE)?;
    Ok(normalize_audio(&resampled))
}
