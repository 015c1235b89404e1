use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum AudioError {
    #[error("Audio output device error: {0}")]
    DeviceError(String),

    #[error("Stream error: {0}")]
    StreamError(String),

    #[error("Decoding error: {0}")]
    DecodingError(String),

    #[error("Seek error: {0}")]
    SeekError(String),

    #[error("Network error: {0}")]
    NetworkError(String),
}

impl From<reqwest::Error> for AudioError {
    fn from(e: reqwest::Error) -> Self {
        AudioError::NetworkError(e.to_string())
    }
}

impl From<rodio::decoder::DecoderError> for AudioError {
    fn from(e: rodio::decoder::DecoderError) -> Self {
        AudioError::DecodingError(e.to_string())
    }
}
