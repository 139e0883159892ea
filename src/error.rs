use std::io;
use thiserror::Error;

/// Reasons a serial port could not be opened.
#[derive(Debug, Error)]
pub enum ConnectError {
    #[error("no serial port selected")]
    NoPortSelected,

    #[error("already connected to {0}")]
    AlreadyConnected(String),

    #[error("{0}")]
    Serial(#[from] serialport::Error),

    #[error("unable to start the reader thread: {0}")]
    Reader(io::Error),
}

#[derive(Debug, Error)]
pub enum SendError {
    #[error("Not connected!")]
    NotConnected,

    #[error("{0}")]
    Io(#[from] io::Error),

    #[error("serial link poisoned")]
    Poisoned,
}

/// Failure observed by the reader loop; always fatal to the loop.
#[derive(Debug, Error)]
pub enum ReadFault {
    #[error("{0}")]
    Io(#[from] io::Error),

    #[error("serial link poisoned")]
    Poisoned,
}
