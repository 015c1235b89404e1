use rodio::{
    Device, DeviceTrait, OutputStream, OutputStreamBuilder, Sink,
    cpal::{
        BufferSize, SampleFormat, SampleRate, StreamConfig, default_host, traits::HostTrait,
    },
};

use crate::audio::error::AudioError;

pub fn setup_device_config() -> Result<(Device, StreamConfig, SampleFormat), AudioError> {
    let host = default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| AudioError::DeviceError("no default output device".to_string()))?;

    let best = device
        .supported_output_configs()
        .ok()
        .and_then(|configs| configs.max_by_key(|cfg| cfg.max_sample_rate().0));

    let (config, sample_format) = match best {
        Some(default_config) => (
            StreamConfig {
                channels: default_config.channels(),
                sample_rate: default_config.max_sample_rate(),
                buffer_size: BufferSize::Fixed(4096),
            },
            default_config.sample_format(),
        ),
        None => (
            StreamConfig {
                channels: 2,
                sample_rate: SampleRate(48000),
                buffer_size: BufferSize::Fixed(4096),
            },
            SampleFormat::F32,
        ),
    };

    Ok((device, config, sample_format))
}

pub fn construct_sink(
    device: Device,
    config: &StreamConfig,
    sample_format: SampleFormat,
) -> Result<(OutputStream, Sink), AudioError> {
    let stream = OutputStreamBuilder::default()
        .with_buffer_size(config.buffer_size)
        .with_sample_rate(config.sample_rate.0)
        .with_device(device)
        .with_sample_format(sample_format)
        .open_stream_or_fallback()
        .map_err(|e| AudioError::DeviceError(e.to_string()))?;
    let mixer = stream.mixer();
    let sink = Sink::connect_new(mixer);

    Ok((stream, sink))
}
