use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{BufferSize, SampleFormat, SupportedBufferSize};
use tracing::{debug, info, instrument, warn};

use crate::backend::{CaptureBackend, CaptureConfig, CaptureStream, PeriodCallback};
use crate::dsp::{PeriodChunker, ToU8Sample};
use crate::AudioError;

/// Captures from a system input device through cpal.
#[derive(Debug, Default, Clone, Copy)]
pub struct CpalBackend;

impl CaptureBackend for CpalBackend {
    #[instrument(skip(self, on_period))]
    fn open_capture(
        &self,
        config: &CaptureConfig,
        on_period: PeriodCallback,
    ) -> Result<Box<dyn CaptureStream>, AudioError> {
        config.validate()?;
        let device = match config.device.as_deref() {
            Some(name) => find_input_device(name)?,
            None => cpal::default_host()
                .default_input_device()
                .ok_or(AudioError::NoInputDevice)?,
        };
        let device_name = device.name().unwrap_or_else(|_| "Unknown".into());

        let supported = device.default_input_config()?;
        let sample_format = supported.sample_format();
        let mut stream_config = supported.config();
        if let Some(rate) = config.sample_rate {
            stream_config.sample_rate = cpal::SampleRate(rate);
        }
        let period_frames = config.period_frames(stream_config.sample_rate.0);
        stream_config.buffer_size = match supported.buffer_size() {
            SupportedBufferSize::Range { min, max } if (*min..=*max).contains(&period_frames) => {
                BufferSize::Fixed(period_frames)
            }
            _ => {
                debug!(period_frames, "device rejects the period size, regrouping its buffers");
                BufferSize::Default
            }
        };

        info!(
            device = %device_name,
            ?sample_format,
            sample_rate = stream_config.sample_rate.0,
            channels = stream_config.channels,
            period_frames,
            "opening capture stream"
        );

        let capacity = period_frames as usize * stream_config.channels as usize;
        let stream = match sample_format {
            SampleFormat::U8 => build_stream::<u8>(&device, &stream_config, capacity, on_period),
            SampleFormat::I8 => build_stream::<i8>(&device, &stream_config, capacity, on_period),
            SampleFormat::U16 => build_stream::<u16>(&device, &stream_config, capacity, on_period),
            SampleFormat::I16 => build_stream::<i16>(&device, &stream_config, capacity, on_period),
            SampleFormat::I32 => build_stream::<i32>(&device, &stream_config, capacity, on_period),
            SampleFormat::F32 => build_stream::<f32>(&device, &stream_config, capacity, on_period),
            SampleFormat::F64 => build_stream::<f64>(&device, &stream_config, capacity, on_period),
            other => return Err(AudioError::UnsupportedFormat(other)),
        }?;

        // Some hosts begin delivering as soon as the stream is built.
        if let Err(err) = stream.pause() {
            debug!(%err, "could not hold capture stream before start");
        }

        Ok(Box::new(CpalStream {
            stream,
            device_name,
        }))
    }
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    capacity: usize,
    mut on_period: PeriodCallback,
) -> Result<cpal::Stream, AudioError>
where
    T: cpal::SizedSample + ToU8Sample,
{
    // Host buffers need not match the period, so periods are regrouped here.
    let mut chunker = PeriodChunker::new(capacity);
    let stream = device.build_input_stream(
        config,
        move |data: &[T], _: &cpal::InputCallbackInfo| {
            chunker.push(data, &mut on_period);
        },
        |err| warn!(%err, "capture stream error"),
        None,
    )?;
    Ok(stream)
}

struct CpalStream {
    stream: cpal::Stream,
    device_name: String,
}

impl CaptureStream for CpalStream {
    fn start(&mut self) -> Result<(), AudioError> {
        self.stream.play()?;
        info!(device = %self.device_name, "capture started");
        Ok(())
    }

    fn stop(&mut self) -> Result<(), AudioError> {
        self.stream.pause()?;
        info!(device = %self.device_name, "capture stopped");
        Ok(())
    }
}

/// Names of every input device on every available host.
pub fn list_input_devices() -> Result<Vec<String>, AudioError> {
    let mut names = Vec::new();
    for host_id in cpal::available_hosts() {
        let host = match cpal::host_from_id(host_id) {
            Ok(host) => host,
            Err(err) => {
                debug!(?host_id, %err, "audio host unavailable");
                continue;
            }
        };
        for device in host.input_devices()? {
            if let Ok(name) = device.name() {
                names.push(name);
            }
        }
    }
    Ok(names)
}

fn find_input_device(target: &str) -> Result<cpal::Device, AudioError> {
    for host_id in cpal::available_hosts() {
        let Ok(host) = cpal::host_from_id(host_id) else {
            continue;
        };
        let Ok(devices) = host.input_devices() else {
            continue;
        };
        for device in devices {
            if device.name().map(|name| name == target).unwrap_or(false) {
                return Ok(device);
            }
        }
    }
    Err(AudioError::DeviceNotFound(target.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_device_is_reported_by_name() {
        let err = find_input_device("audmon-test-device-that-does-not-exist").err().unwrap();
        assert!(matches!(err, AudioError::DeviceNotFound(ref name) if name.contains("audmon-test")));
    }
}
