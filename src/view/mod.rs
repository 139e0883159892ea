pub mod app;

use crate::controller::rfid::Command;

#[derive(Debug)]
pub enum Message {
    RefreshPorts,
    SelectPort(String),
    ConnectToPort(String),
    Disconnect,
    Send(Command),
}
