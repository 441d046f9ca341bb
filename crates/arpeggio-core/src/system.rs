//! Audio system: the voice mixer wired to a CPAL output stream.

use crate::config::MixerConfig;
use crate::mixer::{channel_pool, Mixer};
use crate::output::OutputDevice;
use crate::Result;
use parking_lot::Mutex;

/// Voice mixer playing through an output device.
pub struct AudioSystem {
    output: Mutex<OutputDevice>,
    mixer: Mixer,
    sample_rate: f64,
}

impl AudioSystem {
    pub fn builder() -> AudioSystemBuilder {
        AudioSystemBuilder::default()
    }

    /// Device sample rate.
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    pub fn is_running(&self) -> bool {
        self.output.lock().is_running()
    }

    /// Number of device output channels (not mixer channels).
    pub fn output_channels(&self) -> usize {
        self.output.lock().channels()
    }

    pub fn list_output_devices() -> Result<Vec<String>> {
        OutputDevice::list()
    }

    pub fn current_output_device_name(&self) -> String {
        self.output.lock().name().to_string()
    }

    pub fn mixer(&self) -> &Mixer {
        &self.mixer
    }
}

/// Builder for AudioSystem.
#[derive(Default)]
pub struct AudioSystemBuilder {
    config: MixerConfig,
}

impl AudioSystemBuilder {
    /// Replace the whole mixer configuration.
    pub fn config(mut self, config: MixerConfig) -> Self {
        self.config = config;
        self
    }

    /// Set number of mixer channels (default: 512).
    pub fn channels(mut self, count: usize) -> Self {
        self.config.channels = count;
        self
    }

    /// Set output device index (default: host default device).
    pub fn output_device(mut self, index: usize) -> Self {
        self.config.output_device = Some(index);
        self
    }

    /// Open the device and start the stream.
    pub fn build(self) -> Result<AudioSystem> {
        let mut output = OutputDevice::open(self.config.output_device)?;
        let sample_rate = output.sample_rate();

        let config = MixerConfig {
            sample_rate,
            ..self.config
        };
        let (mixer, renderer) = channel_pool(&config)?;

        output.start(renderer)?;

        Ok(AudioSystem {
            output: Mutex::new(output),
            mixer,
            sample_rate,
        })
    }
}
