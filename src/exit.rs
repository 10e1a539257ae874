use std::process::ExitCode;

use clap::error::ErrorKind;

use crate::config::ConfigError;
use crate::predict::FetchError;

/// Process exit statuses, one per kind of failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Exit {
    Success = 0,
    BadOption = 1,
    NotNumeric = 2,
    MissingLocation = 3,
    Latitude = 4,
    Longitude = 5,
    Altitude = 6,
    Passes = 7,
    Connection = 8,
    Unknown = 9,
    ConfigFile = 10,
    SerialUnavailable = 11,
}

impl From<Exit> for ExitCode {
    fn from(exit: Exit) -> Self {
        ExitCode::from(exit as u8)
    }
}

impl From<&clap::Error> for Exit {
    fn from(err: &clap::Error) -> Self {
        match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => Exit::Success,
            ErrorKind::ValueValidation | ErrorKind::InvalidValue => Exit::NotNumeric,
            _ => Exit::BadOption,
        }
    }
}

impl From<&ConfigError> for Exit {
    fn from(err: &ConfigError) -> Self {
        match err {
            ConfigError::Io(_) | ConfigError::Yaml(_) | ConfigError::Thresholds(_) => {
                Exit::ConfigFile
            }
            ConfigError::MissingLocation => Exit::MissingLocation,
            ConfigError::Latitude(_) => Exit::Latitude,
            ConfigError::Longitude(_) => Exit::Longitude,
            ConfigError::Altitude(_) => Exit::Altitude,
            ConfigError::Passes(_) => Exit::Passes,
        }
    }
}

impl From<&FetchError> for Exit {
    fn from(err: &FetchError) -> Self {
        match err {
            FetchError::Connection(_) => Exit::Connection,
            FetchError::Protocol(_) | FetchError::Unknown(_) => Exit::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proximity::ThresholdError;

    #[test]
    fn config_errors_have_distinct_codes() {
        let codes = [
            Exit::from(&ConfigError::MissingLocation),
            Exit::from(&ConfigError::Latitude(90.0)),
            Exit::from(&ConfigError::Longitude(200.0)),
            Exit::from(&ConfigError::Altitude(-1)),
            Exit::from(&ConfigError::Passes(101)),
        ];
        let raw: Vec<u8> = codes.iter().map(|c| *c as u8).collect();
        assert_eq!(raw, vec![3, 4, 5, 6, 7]);
        assert_eq!(
            Exit::from(&ConfigError::Thresholds(ThresholdError::Empty)),
            Exit::ConfigFile
        );
    }

    #[test]
    fn fetch_errors_map_to_connection_or_unknown() {
        assert_eq!(
            Exit::from(&FetchError::Connection("refused".into())) as u8,
            8
        );
        assert_eq!(Exit::from(&FetchError::Unknown("?".into())) as u8, 9);
        assert_eq!(Exit::from(&FetchError::Protocol("html".into())) as u8, 9);
    }
}
