use thiserror::Error;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("unable to open serial port {device}: {source}")]
    Unavailable {
        device: String,
        source: serialport::Error,
    },
    #[error("unable to send to serial port {device}: {source}")]
    Send {
        device: String,
        source: std::io::Error,
    },
}
