//! CPAL output stream driving a [`MixerRenderer`].

use crate::mixer::MixerRenderer;
use crate::{Error, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, SizedSample};
use tracing::{error, info};

/// Wrapper to hold `cpal::Stream` in a `Send` context.
///
/// # Safety
/// `cpal::Stream` is `!Send` due to platform internals. It is only reached
/// through the `Mutex` in `AudioSystem` and never moves off the output
/// device that owns it.
struct StreamHandle(#[allow(dead_code)] cpal::Stream);

unsafe impl Send for StreamHandle {}

/// An output device and, once started, the stream playing the mixer.
pub(crate) struct OutputDevice {
    device_index: Option<usize>,
    name: String,
    sample_rate: f64,
    channels: usize,
    stream: Option<StreamHandle>,
}

impl OutputDevice {
    /// Query the device without starting a stream.
    pub(crate) fn open(device_index: Option<usize>) -> Result<Self> {
        let device = find_device(device_index)?;
        let config = device.default_output_config()?;

        Ok(Self {
            device_index,
            name: device.name()?,
            sample_rate: config.sample_rate().0 as f64,
            channels: config.channels() as usize,
            stream: None,
        })
    }

    /// Hand `renderer` to the audio callback and start playing.
    pub(crate) fn start(&mut self, mut renderer: MixerRenderer) -> Result<()> {
        if self.stream.is_some() {
            return Ok(());
        }

        let device = find_device(self.device_index)?;
        let supported = device.default_output_config()?;
        let format = supported.sample_format();
        let config: cpal::StreamConfig = supported.into();

        renderer.set_sample_rate(config.sample_rate.0 as f64);
        let callback = MixCallback::new(renderer, config.channels as usize);

        let stream = match format {
            cpal::SampleFormat::F32 => open_stream::<f32>(&device, &config, callback)?,
            cpal::SampleFormat::I16 => open_stream::<i16>(&device, &config, callback)?,
            cpal::SampleFormat::U16 => open_stream::<u16>(&device, &config, callback)?,
            other => {
                return Err(Error::InvalidConfig(format!(
                    "Unsupported sample format: {other:?}"
                )));
            }
        };
        stream.play()?;
        self.stream = Some(StreamHandle(stream));

        info!(
            "Output started on {}: {} Hz, {} channel(s), {format:?}",
            self.name, self.sample_rate, self.channels
        );
        Ok(())
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    pub(crate) fn channels(&self) -> usize {
        self.channels
    }

    pub(crate) fn is_running(&self) -> bool {
        self.stream.is_some()
    }

    /// Output devices of the default host, as `"index: name"`.
    pub(crate) fn list() -> Result<Vec<String>> {
        cpal::default_host()
            .output_devices()?
            .enumerate()
            .map(|(i, device)| Ok(format!("{i}: {}", device.name()?)))
            .collect()
    }
}

fn find_device(index: Option<usize>) -> Result<cpal::Device> {
    let host = cpal::default_host();
    let Some(index) = index else {
        return host
            .default_output_device()
            .ok_or_else(|| Error::InvalidDevice("No output device available".into()));
    };

    let mut available = 0;
    for (i, device) in host.output_devices()?.enumerate() {
        if i == index {
            return Ok(device);
        }
        available += 1;
    }
    Err(Error::InvalidDevice(format!(
        "Device index {index} out of range ({available} available)"
    )))
}

fn open_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    mut callback: MixCallback,
) -> Result<cpal::Stream>
where
    T: SizedSample + FromSample<f32>,
{
    let stream = device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| callback.fill(data),
        |err| error!("Output stream error: {err}"),
        None,
    )?;
    Ok(stream)
}

/// State owned by the audio callback.
struct MixCallback {
    renderer: MixerRenderer,
    device_channels: usize,
    /// Interleaved stereo mix; grows on the first callback, then stable.
    stereo: Vec<f32>,
}

impl MixCallback {
    fn new(renderer: MixerRenderer, device_channels: usize) -> Self {
        Self {
            renderer,
            device_channels: device_channels.max(1),
            stereo: Vec::new(),
        }
    }

    /// Mix one device buffer. A panic while mixing leaves the buffer silent.
    fn fill<T: SizedSample + FromSample<f32>>(&mut self, data: &mut [T]) {
        let mixed = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let frames = data.len() / self.device_channels;
            self.stereo.resize(frames * 2, 0.0);
            self.renderer.process(&mut self.stereo);
        }));

        if mixed.is_err() {
            data.fill(T::from_sample(0.0f32));
            return;
        }

        // Mono devices get the left side; channels past the second stay silent
        for (out, mix) in data
            .chunks_exact_mut(self.device_channels)
            .zip(self.stereo.chunks_exact(2))
        {
            for (ch, sample) in out.iter_mut().enumerate() {
                let value = mix.get(ch).copied().unwrap_or(0.0);
                *sample = T::from_sample(value);
            }
        }
    }
}
