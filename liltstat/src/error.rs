use std::net::AddrParseError;

use snafu::Snafu;

/// CLI error types.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum CliError {
    #[snafu(display("Invalid server address"))]
    InvalidServerAddress { source: AddrParseError },
    #[snafu(display("IO error"))]
    Io { source: std::io::Error },
    #[snafu(display("Beacon request failed"))]
    BeaconRequest { source: reqwest::Error },
}

pub type Result<T, E = CliError> = std::result::Result<T, E>;
