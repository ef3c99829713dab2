use crate::audio::{Microphone, MicrophoneStream};
use crate::{EiraError, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::Stream;
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError};
use std::time::Duration;
use tracing::{debug, error, info};

/// Default system microphone via cpal
#[derive(Debug, Default)]
pub struct CpalMicrophone;

impl CpalMicrophone {
    pub fn new() -> Self {
        Self
    }
}

impl Microphone for CpalMicrophone {
    fn open(&self) -> Result<Box<dyn MicrophoneStream>> {
        let host = cpal::default_host();

        let device = host
            .default_input_device()
            .ok_or_else(|| EiraError::AudioDeviceError("No input device available".into()))?;

        info!(
            "Using input device: {}",
            device.name().unwrap_or_else(|_| "Unknown".to_string())
        );

        let supported = device.default_input_config().map_err(|e| {
            EiraError::AudioDeviceError(format!("Failed to get input config: {}", e))
        })?;
        if supported.sample_format() != cpal::SampleFormat::F32 {
            return Err(EiraError::AudioDeviceError(format!(
                "Unsupported input sample format: {:?}",
                supported.sample_format()
            )));
        }
        let config: cpal::StreamConfig = supported.into();

        let channels = config.channels as usize;
        let sample_rate = config.sample_rate.0;
        let (chunk_tx, chunk_rx) = bounded(256);

        let err_fn = |err| {
            error!("Audio input stream error: {}", err);
        };

        let stream = device
            .build_input_stream(
                &config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    let mono = if channels == 1 {
                        data.to_vec()
                    } else {
                        data.chunks(channels)
                            .map(|frame| frame.iter().sum::<f32>() / channels as f32)
                            .collect()
                    };

                    if let Err(e) = chunk_tx.try_send(mono) {
                        debug!("Dropped input chunk: {}", e);
                    }
                },
                err_fn,
                None,
            )
            .map_err(|e| {
                EiraError::AudioDeviceError(format!("Failed to build input stream: {}", e))
            })?;

        stream.play().map_err(|e| {
            EiraError::AudioDeviceError(format!("Failed to start input stream: {}", e))
        })?;

        debug!("Microphone opened at {} Hz, {} channels", sample_rate, channels);

        Ok(Box::new(CpalStream {
            _stream: stream,
            chunk_rx,
            sample_rate,
        }))
    }
}

/// Live input stream; dropping it closes the device
struct CpalStream {
    _stream: Stream,
    chunk_rx: Receiver<Vec<f32>>,
    sample_rate: u32,
}

impl MicrophoneStream for CpalStream {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn read(&mut self, timeout: Duration) -> Result<Option<Vec<f32>>> {
        match self.chunk_rx.recv_timeout(timeout) {
            Ok(chunk) => Ok(Some(chunk)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(EiraError::AudioDeviceError(
                "Input stream closed".into(),
            )),
        }
    }
}

impl Drop for CpalStream {
    fn drop(&mut self) {
        debug!("Microphone released");
    }
}
