// Software stand-in for the reader board, for running the console without hardware.
// Mirrors the firmware: banner on start, every received digit echoed back, anything else ignored.

use super::serial::{Connector, LineSettings, Link};
use crate::error::ConnectError;
use std::collections::VecDeque;
use std::io::{self, Read, Write};

pub const SIMULATED_PORT: &str = "SIM";
pub const BANNER: &[u8] = b"--- RFID Controller Active ---\r\n";

pub struct SimulatedBoard;

impl Connector for SimulatedBoard {
    fn available_ports(&self) -> Vec<String> {
        vec![String::from(SIMULATED_PORT)]
    }

    fn open(&self, port: &str, settings: &LineSettings) -> Result<Box<dyn Link>, ConnectError> {
        if port != SIMULATED_PORT {
            return Err(serialport::Error::new(
                serialport::ErrorKind::NoDevice,
                format!("{} is not a simulated port", port),
            )
            .into());
        }

        log::info!("Simulated board opened at {} baud", settings.baud_rate);
        Ok(Box::new(SimulatedLink {
            pending: BANNER.iter().copied().collect(),
        }))
    }
}

struct SimulatedLink {
    pending: VecDeque<u8>,
}

impl Read for SimulatedLink {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut count = 0;
        while count < buf.len() {
            match self.pending.pop_front() {
                Some(byte) => {
                    buf[count] = byte;
                    count += 1;
                }
                None => break,
            }
        }

        if count == 0 && !buf.is_empty() {
            return Err(io::Error::new(io::ErrorKind::TimedOut, "Operation timed out"));
        }
        Ok(count)
    }
}

impl Write for SimulatedLink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pending
            .extend(buf.iter().copied().filter(u8::is_ascii_digit));
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Link for SimulatedLink {
    fn bytes_to_read(&self) -> io::Result<u32> {
        Ok(self.pending.len() as u32)
    }
}
