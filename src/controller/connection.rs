use super::reader::{Reader, SharedLink};
use super::rfid::Command;
use super::serial::{Connector, LineSettings};
use super::sink::LogSink;
use crate::error::{ConnectError, SendError};
use crate::model::{ConnectionState, NO_PORTS};
use std::io::Write;
use std::sync::{Arc, Mutex};

/// An open port together with the reader draining it.
pub struct Connection {
    port: String,
    link: SharedLink,
    reader: Reader,
}

impl Connection {
    pub fn port(self: &Self) -> &str {
        &self.port
    }

    pub fn is_reading(self: &Self) -> bool {
        self.reader.is_running()
    }

    fn write(self: &Self, byte: u8) -> Result<(), SendError> {
        let mut link = self.link.lock().map_err(|_| SendError::Poisoned)?;
        link.write_all(&[byte])?;
        link.flush()?;
        Ok(())
    }

    fn close(mut self: Self) {
        // The reader must be gone before the port handle is released
        self.reader.stop();
        if Arc::strong_count(&self.link) > 1 {
            log::warn!("Serial link to {} still shared on close", self.port);
        }
    }
}

/// Owns the single serial connection and reports every outcome to the operator log.
pub struct ConnectionManager {
    connector: Box<dyn Connector>,
    settings: LineSettings,
    sink: LogSink,
    state: ConnectionState,
    connection: Option<Connection>,
}

impl ConnectionManager {
    pub fn new(connector: Box<dyn Connector>, settings: LineSettings, sink: LogSink) -> Self {
        ConnectionManager {
            connector,
            settings,
            sink,
            state: ConnectionState::Disconnected,
            connection: None,
        }
    }

    pub fn state(self: &Self) -> &ConnectionState {
        &self.state
    }

    pub fn is_connected(self: &Self) -> bool {
        self.connection.is_some()
    }

    pub fn available_ports(self: &Self) -> Vec<String> {
        self.connector.available_ports()
    }

    pub fn connect(self: &mut Self, port: &str) -> Result<&Connection, ConnectError> {
        if let Some(connection) = &self.connection {
            let error = ConnectError::AlreadyConnected(connection.port.clone());
            self.sink.log(format!("Error: {}", error));
            return Err(error);
        }
        if port.is_empty() || port == NO_PORTS {
            return Err(self.fail(ConnectError::NoPortSelected));
        }

        self.state = ConnectionState::Connecting(port.to_owned());
        let link: SharedLink = match self.connector.open(port, &self.settings) {
            Ok(link) => Arc::new(Mutex::new(link)),
            Err(e) => return Err(self.fail(e)),
        };

        log::info!("Connected to {} at {} baud", port, self.settings.baud_rate);
        self.sink.log(format!("Connected to {}", port));

        let reader = match Reader::spawn(Arc::clone(&link), self.sink.clone()) {
            Ok(reader) => reader,
            Err(e) => return Err(self.fail(ConnectError::Reader(e))),
        };

        self.state = ConnectionState::Connected(port.to_owned());
        Ok(&*self.connection.insert(Connection {
            port: port.to_owned(),
            link,
            reader,
        }))
    }

    pub fn disconnect(self: &mut Self) {
        match self.connection.take() {
            Some(connection) => {
                self.state = ConnectionState::Disconnecting(connection.port.clone());
                log::info!("Disconnecting from {}", connection.port);
                connection.close();
                self.state = ConnectionState::Disconnected;
                self.sink.log("Disconnected.");
            }
            None => self.sink.log("Already disconnected."),
        }
    }

    pub fn send(self: &mut Self, command: Command) -> Result<(), SendError> {
        let result = match &self.connection {
            Some(connection) => connection.write(command.byte()),
            None => Err(SendError::NotConnected),
        };

        match &result {
            Ok(()) => self.sink.log(format!("Sent Command: {}", command.code())),
            Err(SendError::NotConnected) => self.sink.log(SendError::NotConnected.to_string()),
            Err(e) => {
                log::warn!("Write of {:?} failed: {:?}", command, e);
                self.sink.log(format!("Send Error: {}", e));
            }
        }

        result
    }

    fn fail(self: &mut Self, error: ConnectError) -> ConnectError {
        log::warn!("Port connection error: {:?}", error);
        self.state = ConnectionState::Disconnected;
        self.sink.log(format!("Error: {}", error));
        error
    }
}

impl Drop for ConnectionManager {
    fn drop(&mut self) {
        if let Some(connection) = self.connection.take() {
            connection.close();
        }
    }
}
