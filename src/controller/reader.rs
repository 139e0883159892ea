use super::serial::Link;
use super::sink::LogSink;
use crate::error::ReadFault;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

pub type SharedLink = Arc<Mutex<Box<dyn Link>>>;

pub const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Background thread relaying every byte the board sends to the operator log.
///
/// The thread only reads from the link and stops cooperatively: `stop` raises
/// the flag and joins, so once it returns the thread no longer holds the link.
pub struct Reader {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl Reader {
    pub fn spawn(link: SharedLink, sink: LogSink) -> io::Result<Self> {
        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);
        let handle = thread::Builder::new()
            .name("serial-reader".into())
            .spawn(move || task(link, flag, sink))?;

        Ok(Reader {
            stop,
            handle: Some(handle),
        })
    }

    pub fn is_running(self: &Self) -> bool {
        self.handle.as_ref().map_or(false, |h| !h.is_finished())
    }

    pub fn stop(self: &mut Self) {
        self.stop.store(true, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("Serial reader thread panicked");
            }
        }
    }
}

impl Drop for Reader {
    fn drop(&mut self) {
        self.stop();
    }
}

fn task(link: SharedLink, stop: Arc<AtomicBool>, sink: LogSink) {
    log::debug!("Serial reader started");

    while !stop.load(Ordering::Acquire) {
        match poll(&link) {
            Ok(Some(byte)) => {
                // A lone byte that is not valid text is dropped, not reported
                if let Ok(text) = std::str::from_utf8(&[byte]) {
                    sink.log(format!("Zybo Echo: {}", text));
                }
            }
            Ok(None) => thread::sleep(POLL_INTERVAL),
            Err(fault) => {
                log::warn!("Serial read error: {:?}", fault);
                sink.log(format!("Read Error: {}", fault));
                break;
            }
        }
    }

    log::debug!("Serial reader stopped");
}

fn poll(link: &SharedLink) -> Result<Option<u8>, ReadFault> {
    let mut link = link.lock().map_err(|_| ReadFault::Poisoned)?;
    if link.bytes_to_read()? == 0 {
        return Ok(None);
    }

    let mut buffer = [0u8; 1];
    match link.read(&mut buffer) {
        Ok(1) => Ok(Some(buffer[0])),
        Ok(_) => Ok(None),
        Err(e) if e.kind() == io::ErrorKind::TimedOut => Ok(None),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::testing::{next_line, pending_lines, wait_until, Wire};
    use crate::controller::Event;
    use std::sync::mpsc;

    fn start(wire: &Wire) -> (Reader, mpsc::Receiver<Event>) {
        let (tx, rx) = mpsc::channel();
        let link: SharedLink = Arc::new(Mutex::new(wire.link()));
        let reader = Reader::spawn(link, LogSink::new(tx)).unwrap();
        (reader, rx)
    }

    #[test]
    fn echoes_arrive_in_order() {
        let wire = Wire::default();
        let (mut reader, rx) = start(&wire);
        wire.push(b"AB");

        assert_eq!(next_line(&rx), "Zybo Echo: A");
        assert_eq!(next_line(&rx), "Zybo Echo: B");

        reader.stop();
        assert!(!reader.is_running());
    }

    #[test]
    fn undecodable_bytes_are_skipped() {
        let wire = Wire::default();
        wire.push(&[0xFF, b'0']);
        let (mut reader, rx) = start(&wire);

        assert_eq!(next_line(&rx), "Zybo Echo: 0");
        reader.stop();
        assert!(pending_lines(&rx).is_empty());
    }

    #[test]
    fn stop_releases_the_link() {
        let wire = Wire::default();
        let (mut reader, _rx) = start(&wire);
        assert!(reader.is_running());

        reader.stop();
        assert!(!reader.is_running());
        assert_eq!(wire.open_links(), 0);
    }

    #[test]
    fn read_fault_ends_the_loop_with_one_line() {
        let wire = Wire::default();
        let (reader, rx) = start(&wire);
        wire.fail_reads();

        assert_eq!(next_line(&rx), "Read Error: device unplugged");
        assert!(wait_until(|| !reader.is_running()));
        assert!(pending_lines(&rx).is_empty());
    }

    #[test]
    fn dropping_the_reader_joins_the_thread() {
        let wire = Wire::default();
        let (reader, _rx) = start(&wire);
        drop(reader);
        assert_eq!(wire.open_links(), 0);
    }
}
