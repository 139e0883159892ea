// In-memory stand-ins for the serial hardware, shared by the controller tests.

use super::serial::{Connector, LineSettings, Link};
use super::Event;
use crate::error::ConnectError;
use std::collections::VecDeque;
use std::io::{self, Read, Write};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::time::{Duration, Instant};

/// Both ends of the fake cable, shared between the test and every link it opens.
#[derive(Clone, Default)]
pub struct Wire {
    inbound: Arc<Mutex<VecDeque<u8>>>,
    written: Arc<Mutex<Vec<u8>>>,
    fail_reads: Arc<AtomicBool>,
    fail_writes: Arc<AtomicBool>,
    open_links: Arc<AtomicUsize>,
}

impl Wire {
    pub fn push(&self, bytes: &[u8]) {
        self.inbound.lock().unwrap().extend(bytes);
    }

    pub fn written(&self) -> Vec<u8> {
        self.written.lock().unwrap().clone()
    }

    pub fn fail_reads(&self) {
        self.fail_reads.store(true, Ordering::SeqCst);
    }

    pub fn fail_writes(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
    }

    pub fn open_links(&self) -> usize {
        self.open_links.load(Ordering::SeqCst)
    }

    pub fn link(&self) -> Box<dyn Link> {
        self.open_links.fetch_add(1, Ordering::SeqCst);
        Box::new(FakeLink { wire: self.clone() })
    }
}

struct FakeLink {
    wire: Wire,
}

impl Drop for FakeLink {
    fn drop(&mut self) {
        self.wire.open_links.fetch_sub(1, Ordering::SeqCst);
    }
}

impl Read for FakeLink {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.wire.fail_reads.load(Ordering::SeqCst) {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "device unplugged"));
        }
        match self.wire.inbound.lock().unwrap().pop_front() {
            Some(byte) if !buf.is_empty() => {
                buf[0] = byte;
                Ok(1)
            }
            _ => Err(io::Error::new(io::ErrorKind::TimedOut, "timed out")),
        }
    }
}

impl Write for FakeLink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.wire.fail_writes.load(Ordering::SeqCst) {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "write failed"));
        }
        self.wire.written.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Link for FakeLink {
    fn bytes_to_read(&self) -> io::Result<u32> {
        if self.wire.fail_reads.load(Ordering::SeqCst) {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "device unplugged"));
        }
        Ok(self.wire.inbound.lock().unwrap().len() as u32)
    }
}

pub struct FakeConnector {
    pub wire: Wire,
    pub ports: Vec<String>,
    pub busy: Option<String>,
}

impl FakeConnector {
    pub fn with_ports(ports: &[&str]) -> Self {
        FakeConnector {
            wire: Wire::default(),
            ports: ports.iter().map(|p| p.to_string()).collect(),
            busy: None,
        }
    }
}

impl Connector for FakeConnector {
    fn available_ports(&self) -> Vec<String> {
        self.ports.clone()
    }

    fn open(&self, port: &str, _settings: &LineSettings) -> Result<Box<dyn Link>, ConnectError> {
        if let Some(reason) = &self.busy {
            return Err(serialport::Error::new(serialport::ErrorKind::NoDevice, reason.as_str()).into());
        }
        if !self.ports.iter().any(|p| p == port) {
            return Err(serialport::Error::new(serialport::ErrorKind::NoDevice, "no such port").into());
        }
        Ok(self.wire.link())
    }
}

/// Waits for the next log line queued on the controller channel.
pub fn next_line(rx: &mpsc::Receiver<Event>) -> String {
    loop {
        match rx.recv_timeout(Duration::from_secs(2)) {
            Ok(Event::Log(line)) => return line,
            Ok(_) => continue,
            Err(e) => panic!("expected a log line: {:?}", e),
        }
    }
}

pub fn pending_lines(rx: &mpsc::Receiver<Event>) -> Vec<String> {
    rx.try_iter()
        .filter_map(|event| match event {
            Event::Log(line) => Some(line),
            _ => None,
        })
        .collect()
}

pub fn wait_until(mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(2);
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    condition()
}
