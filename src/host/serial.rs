//! Serial link over the process's standard streams.
//!
//! A reader thread assembles stdin bytes into lines and hands them over a
//! channel, so the control loop polls without ever blocking on input.

use std::io::{self, BufRead, Read, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use tracing::{debug, info};

use crate::hal::SerialLink;
use crate::protocol::LineAssembler;

/// Stdin as RX, stdout as TX.
#[derive(Debug)]
pub struct StdioSerial {
    rx: Receiver<io::Result<Vec<u8>>>,
    closed: Arc<AtomicBool>,
}

impl StdioSerial {
    /// Starts the stdin reader thread.
    pub fn spawn() -> Self {
        Self::from_reader(io::stdin())
    }

    /// Starts a reader thread over any byte source.
    pub fn from_reader<R: Read + Send + 'static>(source: R) -> Self {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let mut reader = io::BufReader::new(source);
            let mut assembler = LineAssembler::new();
            loop {
                let chunk = match reader.fill_buf() {
                    Ok([]) => break,
                    Ok(chunk) => chunk,
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                    Err(e) => {
                        let _ = tx.send(Err(e));
                        return;
                    }
                };
                let lines = assembler.feed(chunk);
                let consumed = chunk.len();
                reader.consume(consumed);
                for line in lines {
                    if tx.send(Ok(line)).is_err() {
                        return;
                    }
                }
            }
            debug!("serial input reached end of stream");
        });
        Self {
            rx,
            closed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// True once the input stream has ended and every line was consumed.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Relaxed)
    }

    /// Shared view of [`is_closed`](Self::is_closed) that outlives a move
    /// of the link into the node.
    pub fn closed_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.closed)
    }
}

impl SerialLink for StdioSerial {
    fn read_line(&mut self) -> io::Result<Option<Vec<u8>>> {
        match self.rx.try_recv() {
            Ok(Ok(line)) => Ok(Some(line)),
            Ok(Err(e)) => Err(e),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => {
                if !self.closed.swap(true, Ordering::Relaxed) {
                    info!("serial input closed");
                }
                Ok(None)
            }
        }
    }

    fn write_line(&mut self, line: &str) -> io::Result<()> {
        let mut out = io::stdout().lock();
        writeln!(out, "{line}")?;
        out.flush()
    }
}
