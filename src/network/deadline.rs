//! Deadline-bounded socket I/O
//!
//! `std::net::TcpStream` only knows per-syscall timeouts. A request, however,
//! is bounded by one absolute deadline covering every write and read it
//! performs, so the remaining time is recomputed before each syscall.

use std::io::{self, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpStream};
use std::time::{Duration, Instant};

/// A TCP stream whose I/O fails with `TimedOut` once the deadline passes
#[derive(Debug)]
pub struct DeadlineStream {
    stream: TcpStream,

    /// Absolute cutoff for the current operation, if any
    deadline: Option<Instant>,

    /// Whether socket timeouts are currently installed
    timeouts_set: bool,
}

impl DeadlineStream {
    pub fn new(stream: TcpStream) -> Self {
        Self {
            stream,
            deadline: None,
            timeouts_set: false,
        }
    }

    /// Start a new deadline `timeout` from now.
    ///
    /// Zero clears the deadline so I/O blocks indefinitely.
    pub fn arm(&mut self, timeout: Duration) -> io::Result<()> {
        if timeout.is_zero() {
            self.deadline = None;
            if self.timeouts_set {
                self.stream.set_read_timeout(None)?;
                self.stream.set_write_timeout(None)?;
                self.timeouts_set = false;
            }
        } else {
            self.deadline = Some(Instant::now() + timeout);
        }
        Ok(())
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn get_ref(&self) -> &TcpStream {
        &self.stream
    }

    pub fn peer_addr(&self) -> io::Result<SocketAddr> {
        self.stream.peer_addr()
    }

    pub fn shutdown(&self) -> io::Result<()> {
        self.stream.shutdown(Shutdown::Both)
    }

    /// Time left before the deadline, or `TimedOut` if it has passed
    fn remaining(&self) -> io::Result<Option<Duration>> {
        match self.deadline {
            None => Ok(None),
            Some(deadline) => {
                let now = Instant::now();
                if now >= deadline {
                    Err(io::Error::new(io::ErrorKind::TimedOut, "deadline exceeded"))
                } else {
                    Ok(Some(deadline - now))
                }
            }
        }
    }

    /// Unix reports an expired socket timeout as `WouldBlock`
    fn normalize(&self, err: io::Error) -> io::Error {
        if self.deadline.is_some() && err.kind() == io::ErrorKind::WouldBlock {
            io::Error::new(io::ErrorKind::TimedOut, "deadline exceeded")
        } else {
            err
        }
    }
}

impl Read for DeadlineStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if let Some(left) = self.remaining()? {
            self.stream.set_read_timeout(Some(left))?;
            self.timeouts_set = true;
        }
        self.stream.read(buf).map_err(|e| self.normalize(e))
    }
}

impl Write for DeadlineStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if let Some(left) = self.remaining()? {
            self.stream.set_write_timeout(Some(left))?;
            self.timeouts_set = true;
        }
        self.stream.write(buf).map_err(|e| self.normalize(e))
    }

    fn flush(&mut self) -> io::Result<()> {
        self.stream.flush()
    }
}
