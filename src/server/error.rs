use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("environment '{0}' does not exist")]
    EnvironmentNotFound(String),

    #[error("no free ports available at or above {start}")]
    NoFreePorts { start: u16 },

    #[error("failed to bind 127.0.0.1:{port}: {source}")]
    BindFailed {
        port: u16,
        #[source]
        source: std::io::Error,
    },
}
