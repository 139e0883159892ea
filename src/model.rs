use std::fmt;
use std::time::SystemTime;
use time::macros::format_description;
use time::OffsetDateTime;

/// Shown in the port selector when enumeration finds nothing.
pub const NO_PORTS: &str = "No Ports Found";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting(String),
    Connected(String),
    Disconnecting(String),
}

#[derive(Clone, Debug)]
pub struct LogEntry {
    pub at: OffsetDateTime,
    pub text: String,
}

impl LogEntry {
    pub fn new(text: String) -> Self {
        LogEntry {
            at: OffsetDateTime::from(SystemTime::now()),
            text,
        }
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let timestamp = self
            .at
            .format(format_description!("[hour]:[minute]:[second]"))
            .map_err(|_| fmt::Error)?;
        write!(f, "[{}] {}", timestamp, self.text)
    }
}

#[derive(Clone)]
pub struct Model {
    pub ports: Vec<String>,
    pub selected_port: String,
    pub connection: ConnectionState,
    pub messages: Vec<LogEntry>,
}

impl Default for Model {
    fn default() -> Self {
        Model {
            ports: Vec::new(),
            selected_port: String::from(NO_PORTS),
            connection: ConnectionState::Disconnected,
            messages: Vec::new(),
        }
    }
}

impl Model {
    pub fn is_connected(self: &Self) -> bool {
        matches!(self.connection, ConnectionState::Connected(_))
    }

    /// Replaces the port list and selects its last entry, which is usually the board.
    pub fn set_ports(self: &mut Self, ports: Vec<String>) {
        self.selected_port = match ports.last() {
            Some(port) => port.clone(),
            None => String::from(NO_PORTS),
        };
        self.ports = ports;
    }

    pub fn message(self: &mut Self, msg: String) {
        self.messages.push(LogEntry::new(msg));
    }
}
