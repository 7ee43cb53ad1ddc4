//! CPAL audio output

use alloc::string::{String, ToString};
use alloc::sync::Arc;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::SampleFormat;
use tracing::{debug, error};

use crate::config::AudioConfig;
use crate::error::{Error, Result};
use crate::node::AudioNode;
use crate::nodes::Redistributor;

/// Plays a root [`Redistributor`] on the default output device.
///
/// The root has the device's channel count and sample rate, so anything
/// attached to it is converted to whatever the device wants. The cpal stream
/// calls the root's `read` directly from its callback; there is no extra ring
/// buffer in between.
pub struct CpalOutput {
    root: Arc<Redistributor>,
    stream: cpal::Stream,
    name: String,
    sample_rate: u32,
    channels: usize,
}

impl CpalOutput {
    /// Open the default output device with the default block size.
    pub fn open_default() -> Result<Self> {
        Self::open_default_with(AudioConfig::default())
    }

    /// Open the default output device.
    ///
    /// The sample rate in `config` is replaced by the device's; only the read
    /// block size is used.
    pub fn open_default_with(config: AudioConfig) -> Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| Error::Device("no default output device".into()))?;
        let name = device.name().unwrap_or_else(|_| "Unknown".into());

        let supported = device
            .default_output_config()
            .map_err(|e| Error::Device(e.to_string()))?;
        if supported.sample_format() != SampleFormat::F32 {
            return Err(Error::UnsupportedSampleFormat(format!(
                "{:?}",
                supported.sample_format()
            )));
        }

        let stream_config = supported.config();
        let channels = stream_config.channels as usize;
        let sample_rate = stream_config.sample_rate.0;
        let root = Arc::new(Redistributor::new(
            channels,
            &config.with_sample_rate(sample_rate),
        )?);

        let callback_root = Arc::clone(&root);
        let stream = device
            .build_output_stream(
                &stream_config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    let frames = data.len() / channels;
                    let got = callback_root.read(data, frames);
                    // exhausted input: pad the rest of the period
                    data[got * channels..].fill(0.0);
                },
                |err| error!("output stream error: {err}"),
                None,
            )
            .map_err(|e| Error::Device(e.to_string()))?;
        stream.play().map_err(|e| Error::Device(e.to_string()))?;

        debug!(device = %name, channels, sample_rate, "output started");

        Ok(Self {
            root,
            stream,
            name,
            sample_rate,
            channels,
        })
    }

    /// The redistributor feeding the device. Attach sources here.
    pub fn root(&self) -> &Arc<Redistributor> {
        &self.root
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Stop pulling from the root until [`play`](Self::play) is called.
    pub fn pause(&self) -> Result<()> {
        self.stream.pause().map_err(|e| Error::Device(e.to_string()))
    }

    pub fn play(&self) -> Result<()> {
        self.stream.play().map_err(|e| Error::Device(e.to_string()))
    }
}
