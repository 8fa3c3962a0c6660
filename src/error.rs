use std::path::PathBuf;

use thiserror::Error;

pub(crate) type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub(crate) enum Error {
    #[error("Failed to read configuration from {path}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No value for {0}")]
    MissingField(&'static str),

    #[error("Failed to send request to {url}")]
    Transport {
        url: String,
        #[source]
        source: attohttpc::Error,
    },

    #[error("{status} from {url}")]
    Status {
        url: String,
        status: attohttpc::StatusCode,
    },

    #[error("Failed to read response from {url}")]
    Decode {
        url: String,
        #[source]
        source: attohttpc::Error,
    },

    #[error("{command} was rejected: {message}")]
    Provider {
        command: &'static str,
        message: String,
    },

    #[error("Failed to open log file {path}")]
    LogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to initialize logging")]
    Logging(#[from] log::SetLoggerError),
}

impl Error {
    /// Process exit status for this failure. `0` and `2` are taken by a
    /// finished run and a missing config file.
    pub(crate) fn exit_code(&self) -> i32 {
        match self {
            Error::ConfigIo { .. } | Error::MissingField(_) => 3,
            Error::Transport { .. }
            | Error::Status { .. }
            | Error::Decode { .. }
            | Error::Provider { .. } => 4,
            Error::LogFile { .. } | Error::Logging(_) => 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_and_network_failures_exit_differently() {
        let missing = Error::MissingField("API_KEY");
        let rejected = Error::Provider {
            command: "dns-list_records",
            message: "invalid_api_key".to_string(),
        };

        assert_eq!(missing.exit_code(), 3);
        assert_eq!(rejected.exit_code(), 4);
        assert_eq!(missing.to_string(), "No value for API_KEY");
        assert_eq!(
            rejected.to_string(),
            "dns-list_records was rejected: invalid_api_key"
        );
    }
}
