use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::AudioError;

pub const DEFAULT_FRAMES_PER_SECOND: u32 = 60;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CaptureConfig {
    /// Capture periods per second; one callback per period.
    pub frames_per_second: u32,
    /// Input device name. `None` picks the host default.
    pub device: Option<String>,
    /// Overrides the device's default sample rate.
    pub sample_rate: Option<u32>,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            frames_per_second: DEFAULT_FRAMES_PER_SECOND,
            device: None,
            sample_rate: None,
        }
    }
}

impl CaptureConfig {
    pub fn validate(&self) -> Result<(), AudioError> {
        if self.frames_per_second == 0 {
            return Err(AudioError::invalid_config(
                "frames_per_second must be greater than 0",
            ));
        }
        if self.sample_rate == Some(0) {
            return Err(AudioError::invalid_config(
                "sample_rate must be greater than 0",
            ));
        }
        Ok(())
    }

    pub fn period(&self) -> Duration {
        Duration::from_secs(1) / self.frames_per_second.max(1)
    }

    /// Frames in one capture period at `sample_rate`.
    pub fn period_frames(&self, sample_rate: u32) -> u32 {
        (sample_rate / self.frames_per_second.max(1)).max(1)
    }
}

/// Invoked once per capture period with unsigned 8-bit PCM samples.
pub type PeriodCallback = Box<dyn FnMut(&[u8]) + Send + 'static>;

pub trait CaptureStream {
    fn start(&mut self) -> Result<(), AudioError>;
    /// After `stop` returns no further periods are delivered.
    fn stop(&mut self) -> Result<(), AudioError>;
}

pub trait CaptureBackend: Send + Sync {
    fn open_capture(
        &self,
        config: &CaptureConfig,
        on_period: PeriodCallback,
    ) -> Result<Box<dyn CaptureStream>, AudioError>;
}

/// Delivers a fixed list of periods synchronously from `start`.
#[derive(Debug, Clone, Default)]
pub struct ScriptedBackend {
    periods: Vec<Vec<u8>>,
}

impl ScriptedBackend {
    pub fn new(periods: Vec<Vec<u8>>) -> Self {
        Self { periods }
    }
}

impl CaptureBackend for ScriptedBackend {
    fn open_capture(
        &self,
        config: &CaptureConfig,
        on_period: PeriodCallback,
    ) -> Result<Box<dyn CaptureStream>, AudioError> {
        config.validate()?;
        debug!(?config, periods = self.periods.len(), "opening scripted capture");
        Ok(Box::new(ScriptedStream {
            periods: self.periods.clone(),
            on_period,
            stopped: false,
        }))
    }
}

struct ScriptedStream {
    periods: Vec<Vec<u8>>,
    on_period: PeriodCallback,
    stopped: bool,
}

impl CaptureStream for ScriptedStream {
    fn start(&mut self) -> Result<(), AudioError> {
        if self.stopped {
            return Ok(());
        }
        for period in self.periods.drain(..) {
            (self.on_period)(&period);
        }
        Ok(())
    }

    fn stop(&mut self) -> Result<(), AudioError> {
        self.stopped = true;
        self.periods.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    #[test]
    fn period_length_follows_frame_rate() {
        let config = CaptureConfig::default();
        assert_eq!(config.period(), Duration::from_nanos(16_666_666));
        assert_eq!(config.period_frames(48_000), 800);
        assert_eq!(config.period_frames(44_100), 735);
    }

    #[test]
    fn zero_frame_rate_is_rejected() {
        let config = CaptureConfig {
            frames_per_second: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
        assert!(ScriptedBackend::default()
            .open_capture(&config, Box::new(|_| {}))
            .is_err());
    }

    #[test]
    fn config_from_partial_yaml() {
        let config: CaptureConfig = serde_yaml::from_str("device: USB Mic\n").unwrap();
        assert_eq!(config.device.as_deref(), Some("USB Mic"));
        assert_eq!(config.frames_per_second, DEFAULT_FRAMES_PER_SECOND);
    }

    #[test]
    fn scripted_backend_delivers_periods_in_order() {
        let received = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&received);
        let backend = ScriptedBackend::new(vec![vec![128, 130], vec![240], vec![0, 1, 2]]);
        let mut stream = backend
            .open_capture(
                &CaptureConfig::default(),
                Box::new(move |samples| sink.lock().unwrap().push(samples.to_vec())),
            )
            .unwrap();

        stream.start().unwrap();
        assert_eq!(
            *received.lock().unwrap(),
            vec![vec![128, 130], vec![240], vec![0, 1, 2]]
        );
    }

    #[test]
    fn stopped_stream_delivers_nothing() {
        let received = Arc::new(Mutex::new(0usize));
        let sink = Arc::clone(&received);
        let backend = ScriptedBackend::new(vec![vec![128]; 4]);
        let mut stream = backend
            .open_capture(
                &CaptureConfig::default(),
                Box::new(move |_| *sink.lock().unwrap() += 1),
            )
            .unwrap();

        stream.stop().unwrap();
        stream.start().unwrap();
        assert_eq!(*received.lock().unwrap(), 0);
    }
}
