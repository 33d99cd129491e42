use chatbridge_host::Error as HostError;

/// Errors specific to the Discord bridge plugin.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("discord gateway: {0}")]
    Gateway(String),

    #[error("discord send: {0}")]
    Send(String),
}

impl From<Error> for HostError {
    fn from(err: Error) -> Self {
        match err {
            Error::Gateway(msg) => HostError::unavailable(msg),
            Error::Send(msg) => HostError::external("Discord send", std::io::Error::other(msg)),
        }
    }
}
