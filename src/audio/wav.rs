use crate::{EiraError, Result};
use hound::{SampleFormat, WavSpec, WavWriter};
use std::path::Path;
use tracing::debug;

/// Write mono f32 samples (range -1.0 to 1.0) as a 16-bit PCM WAV file
pub fn write_wav<P: AsRef<Path>>(path: P, samples: &[f32], sample_rate: u32) -> Result<()> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut writer = WavWriter::create(path.as_ref(), spec)
        .map_err(|e| EiraError::IOError(format!("Failed to create WAV writer: {}", e)))?;

    for &sample in samples {
        let sample_i16 = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
        writer
            .write_sample(sample_i16)
            .map_err(|e| EiraError::IOError(format!("Failed to write sample: {}", e)))?;
    }

    writer
        .finalize()
        .map_err(|e| EiraError::IOError(format!("Failed to finalize WAV file: {}", e)))?;

    debug!("Wrote {} samples to {:?}", samples.len(), path.as_ref());
    Ok(())
}
