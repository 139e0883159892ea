use crate::error::ConnectError;
use serialport::{available_ports, SerialPort};
use std::io;
use std::time::Duration;
use std::vec::Vec;

pub const BAUD_RATE: u32 = 115_200;
pub const READ_TIMEOUT: Duration = Duration::from_secs(1);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LineSettings {
    pub baud_rate: u32,
    pub timeout: Duration,
}

impl Default for LineSettings {
    fn default() -> Self {
        LineSettings {
            baud_rate: BAUD_RATE,
            timeout: READ_TIMEOUT,
        }
    }
}

/// An open byte link to the reader board.
pub trait Link: io::Read + io::Write + Send {
    fn bytes_to_read(&self) -> io::Result<u32>;
}

impl Link for Box<dyn SerialPort> {
    fn bytes_to_read(&self) -> io::Result<u32> {
        SerialPort::bytes_to_read(self.as_ref()).map_err(io::Error::from)
    }
}

/// Source of links: lists the ports it knows and opens them.
pub trait Connector: Send {
    fn available_ports(&self) -> Vec<String>;

    fn open(&self, port: &str, settings: &LineSettings) -> Result<Box<dyn Link>, ConnectError>;
}

pub struct SerialConnector;

impl Connector for SerialConnector {
    fn available_ports(&self) -> Vec<String> {
        get_serial_ports()
    }

    fn open(&self, port: &str, settings: &LineSettings) -> Result<Box<dyn Link>, ConnectError> {
        let opened_port = serialport::new(port, settings.baud_rate)
            .timeout(settings.timeout)
            .stop_bits(serialport::StopBits::One)
            .data_bits(serialport::DataBits::Eight)
            .open()?;
        Ok(Box::new(opened_port))
    }
}

pub fn get_serial_ports() -> Vec<String> {
    let mut result: Vec<String> = Vec::new();
    match available_ports() {
        Ok(ports) => {
            for p in ports {
                result.push(p.port_name);
            }
        }
        Err(e) => {
            log::error!("Error listing serial ports: {:?}", e);
        }
    }

    return result;
}
