use crate::{EiraError, Result};
use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};
use tracing::debug;

/// Frames fed to rubato per call
const CHUNK_FRAMES: usize = 1024;

/// Mono sinc resampler for converting microphone audio to model rates
pub struct AudioResampler {
    resampler: SincFixedIn<f32>,
    input_rate: u32,
    output_rate: u32,
}

impl AudioResampler {
    pub fn new(input_rate: u32, output_rate: u32) -> Result<Self> {
        if input_rate == 0 || output_rate == 0 {
            return Err(EiraError::ConfigError(
                "Sample rates must be greater than 0".into(),
            ));
        }

        let params = SincInterpolationParameters {
            sinc_len: 256,
            f_cutoff: 0.95,
            interpolation: SincInterpolationType::Linear,
            oversampling_factor: 256,
            window: WindowFunction::BlackmanHarris2,
        };

        let resampler = SincFixedIn::<f32>::new(
            output_rate as f64 / input_rate as f64,
            2.0,
            params,
            CHUNK_FRAMES,
            1,
        )
        .map_err(|e| {
            EiraError::AudioProcessingError(format!("Failed to create resampler: {}", e))
        })?;

        debug!("Created resampler: {} Hz -> {} Hz", input_rate, output_rate);

        Ok(Self {
            resampler,
            input_rate,
            output_rate,
        })
    }

    /// Resample a complete mono buffer
    pub fn resample(&mut self, input: &[f32]) -> Result<Vec<f32>> {
        if input.is_empty() {
            return Ok(Vec::new());
        }

        let ratio = self.output_rate as f64 / self.input_rate as f64;
        let mut output = Vec::with_capacity((input.len() as f64 * ratio * 1.1) as usize);

        // SincFixedIn wants exactly CHUNK_FRAMES per call; the tail is zero-padded
        // and only its proportional share of output is kept.
        for chunk in input.chunks(CHUNK_FRAMES) {
            let mut planar = vec![vec![0.0f32; CHUNK_FRAMES]];
            planar[0][..chunk.len()].copy_from_slice(chunk);

            let processed = self
                .resampler
                .process(&planar, None)
                .map_err(|e| EiraError::AudioProcessingError(format!("Resampling failed: {}", e)))?;

            let produced = processed[0].len();
            let keep = if chunk.len() < CHUNK_FRAMES {
                ((chunk.len() as f64) * ratio).ceil() as usize
            } else {
                produced
            };
            output.extend_from_slice(&processed[0][..keep.min(produced)]);
        }

        Ok(output)
    }
}

/// Resample mono audio in one step
pub fn resample_audio(input: &[f32], input_rate: u32, output_rate: u32) -> Result<Vec<f32>> {
    if input_rate == output_rate {
        return Ok(input.to_vec());
    }

    AudioResampler::new(input_rate, output_rate)?.resample(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_rates() {
        assert!(AudioResampler::new(0, 16000).is_err());
        assert!(AudioResampler::new(48000, 0).is_err());
    }

    #[test]
    fn test_downsampling_shrinks_buffer() {
        let input: Vec<f32> = (0..4800).map(|i| (i as f32 * 0.01).sin()).collect();
        let output = resample_audio(&input, 48000, 16000).unwrap();
        assert!(!output.is_empty());
        assert!(output.len() < input.len());
    }

    #[test]
    fn test_same_rate_is_passthrough() {
        let input = vec![0.1, 0.2, 0.3];
        assert_eq!(resample_audio(&input, 16000, 16000).unwrap(), input);
    }

    #[test]
    fn test_empty_input() {
        let mut resampler = AudioResampler::new(44100, 16000).unwrap();
        assert!(resampler.resample(&[]).unwrap().is_empty());
    }
}
