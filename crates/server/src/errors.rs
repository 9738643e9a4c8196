use std::net::SocketAddr;

use thiserror::Error;

/// Failures that stop the server from starting or keep it from serving.
/// All of them are fatal for the process.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to listen on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}
