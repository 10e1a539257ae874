use std::io::Write;
use std::time::Duration;

use serde::Deserialize;
use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};

use crate::notify::{frame, NotificationSink, SinkError};
use crate::proximity::ProximityState;

const WRITE_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SerialSettings {
    pub device: String,
    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,
}

fn default_baud_rate() -> u32 {
    9600
}

impl SerialSettings {
    pub fn new(device: impl Into<String>) -> Self {
        Self {
            device: device.into(),
            baud_rate: default_baud_rate(),
        }
    }
}

/// LED controller attached over a serial line.
///
/// A sink without a port is unconfigured: sends succeed without doing
/// anything, so the poll loop runs the same with or without hardware.
pub struct LedSink<W: Write = Box<dyn SerialPort>> {
    device: String,
    port: Option<W>,
}

impl LedSink {
    pub fn open(settings: &SerialSettings) -> Result<Self, SinkError> {
        let port = serialport::new(&settings.device, settings.baud_rate)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(WRITE_TIMEOUT)
            .open()
            .map_err(|source| SinkError::Unavailable {
                device: settings.device.clone(),
                source,
            })?;

        log::info!(
            "Opened serial port {} at {} baud",
            settings.device,
            settings.baud_rate
        );
        Ok(Self::from_writer(settings.device.clone(), port))
    }

    pub fn disabled() -> Self {
        Self {
            device: String::new(),
            port: None,
        }
    }
}

impl<W: Write> LedSink<W> {
    pub fn from_writer(device: impl Into<String>, writer: W) -> Self {
        Self {
            device: device.into(),
            port: Some(writer),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.port.is_some()
    }

    pub fn device(&self) -> &str {
        &self.device
    }
}

impl<W: Write> NotificationSink for LedSink<W> {
    fn send(&mut self, state: ProximityState) -> Result<(), SinkError> {
        let Some(port) = self.port.as_mut() else {
            return Ok(());
        };

        port.write_all(&frame(state))
            .and_then(|_| port.flush())
            .map_err(|source| SinkError::Send {
                device: self.device.clone(),
                source,
            })?;

        log::debug!("Sent {} to {}", state, self.device);
        Ok(())
    }

    fn close(&mut self) {
        if let Some(mut port) = self.port.take() {
            if let Err(e) = port.flush() {
                log::error!("Unable to close serial port {}: {}", self.device, e);
            }
            log::info!("Closed serial port {}", self.device);
        }
    }
}

impl<W: Write> Drop for LedSink<W> {
    fn drop(&mut self) {
        self.close();
    }
}
