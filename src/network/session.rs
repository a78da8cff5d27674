//! Client Session
//!
//! Owns one TCP connection and issues one request at a time on it.
//!
//! Every public operation takes `&mut self`, so a `Session` cannot be used by
//! two callers at once without external synchronization. Give each worker
//! its own session instead.

use std::io::{BufReader, BufWriter};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};

use super::DeadlineStream;
use crate::config::Config;
use crate::error::{ClientError, ErrorCode, Result};
use crate::protocol::{read_status_as_error, read_value, CountingWriter, Magic, Request};

/// A connection to a Tokyo Tyrant server
///
/// No operation retries or reconnects. After any transport error
/// (see [`ClientError::is_transport`]) the stream may hold a partial request
/// or reply; call [`reset`](Session::reset) before issuing more requests.
#[derive(Debug)]
pub struct Session {
    /// Live connection, `None` after `close()`
    conn: Option<DeadlineStream>,

    /// Immutable connection settings
    config: Config,
}

impl Session {
    /// Dial `config.addr` and return a ready session
    pub fn connect(config: Config) -> Result<Self> {
        let mut session = Self { conn: None, config };
        session.reset()?;
        Ok(session)
    }

    /// Close any existing connection and dial a fresh one
    pub fn reset(&mut self) -> Result<()> {
        self.close();
        let stream = establish(&self.config)?;
        self.conn = Some(DeadlineStream::new(stream));
        Ok(())
    }

    /// Close the connection. Calling this on a closed session is a no-op.
    pub fn close(&mut self) {
        if let Some(conn) = self.conn.take() {
            tracing::debug!("Closing connection to {}", self.config.addr);
            if let Err(e) = conn.shutdown() {
                // The peer may already have gone away
                if e.kind() != std::io::ErrorKind::NotConnected {
                    tracing::warn!("Error closing connection to {}: {}", self.config.addr, e);
                }
            }
        }
    }

    pub fn is_connected(&self) -> bool {
        self.conn.is_some()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Address of the connected server
    pub fn peer_addr(&self) -> Option<SocketAddr> {
        self.conn.as_ref().and_then(|conn| conn.peer_addr().ok())
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Store a value, overwriting any existing one
    pub fn put(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        let conn = self.send(&Request::key_value(Magic::Put, key, value)?)?;
        read_status_as_error(conn, ErrorCode::Misc)
    }

    /// `put` for string keys and values
    pub fn put_str(&mut self, key: &str, value: &str) -> Result<()> {
        self.put(key.as_bytes(), value.as_bytes())
    }

    /// Store a value only if the key is absent.
    ///
    /// Fails with an `Exist` status error when the key is already present.
    pub fn put_keep(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        let conn = self.send(&Request::key_value(Magic::PutKeep, key, value)?)?;
        read_status_as_error(conn, ErrorCode::Exist)
    }

    /// Store a value without waiting for the server.
    ///
    /// Returns once the request is written; only write failures are reported.
    pub fn put_nr(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        self.send(&Request::key_value(Magic::PutNr, key, value)?)?;
        Ok(())
    }

    /// Fetch a value.
    ///
    /// Fails with a `NotExist` status error when the key is absent.
    pub fn get(&mut self, key: &[u8]) -> Result<Vec<u8>> {
        let conn = self.send(&Request::key_only(Magic::Get, key)?)?;
        let mut reader = BufReader::new(conn);
        read_status_as_error(&mut reader, ErrorCode::NotExist)?;
        read_value(&mut reader)
    }

    /// Delete a key.
    ///
    /// Fails with a `NotExist` status error when the key is absent.
    pub fn out(&mut self, key: &[u8]) -> Result<()> {
        let conn = self.send(&Request::key_only(Magic::Out, key)?)?;
        read_status_as_error(conn, ErrorCode::NotExist)
    }

    /// Alias for [`out`](Session::out)
    pub fn delete(&mut self, key: &[u8]) -> Result<()> {
        self.out(key)
    }

    /// Arm the deadline and write a prebuilt request.
    ///
    /// Nothing is read back; the caller owns decoding of any reply.
    /// Returns the number of bytes handed to the socket.
    pub fn send_request(&mut self, req: &Request<'_>) -> Result<u64> {
        self.write_request(req).map(|(_, flushed)| flushed)
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Re-arm the deadline, write `req`, and hand back the stream for the reply
    fn send(&mut self, req: &Request<'_>) -> Result<&mut DeadlineStream> {
        self.write_request(req).map(|(conn, _)| conn)
    }

    /// Write `req` and count the bytes the socket accepted.
    ///
    /// The counter sits below the buffer, so the count only includes bytes
    /// that actually left through the stream.
    fn write_request(&mut self, req: &Request<'_>) -> Result<(&mut DeadlineStream, u64)> {
        let timeout = self.config.timeout;
        let conn = self.conn.as_mut().ok_or(ClientError::NotConnected)?;
        conn.arm(timeout)?;

        let mut out = BufWriter::new(CountingWriter::new(&mut *conn));
        let result = req.write_to(&mut out);
        // into_parts skips the flush-on-drop of a half-written request
        let (counter, _) = out.into_parts();
        let flushed = counter.count();

        match result {
            Ok(_) => {
                tracing::trace!(
                    "Sent {} request ({} bytes) to {}",
                    req.magic().name(),
                    flushed,
                    self.config.addr
                );
                Ok((conn, flushed))
            }
            Err(e) => {
                tracing::debug!(
                    "Failed {} request to {} after {} of {} bytes: {}",
                    req.magic().name(),
                    self.config.addr,
                    flushed,
                    req.encoded_len(),
                    e
                );
                Err(e)
            }
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.close();
    }
}

/// Resolve `config.addr` and dial the first address that accepts
fn establish(config: &Config) -> Result<TcpStream> {
    let addrs: Vec<SocketAddr> = config
        .addr
        .to_socket_addrs()
        .map_err(|source| ClientError::Resolve {
            addr: config.addr.clone(),
            source,
        })?
        .collect();

    let mut last_err = None;
    for addr in &addrs {
        let attempt = match config.connect_timeout {
            Some(timeout) => TcpStream::connect_timeout(addr, timeout),
            None => TcpStream::connect(addr),
        };
        match attempt {
            Ok(stream) => {
                stream.set_nodelay(config.nodelay)?;
                tracing::debug!("Connected to {} ({})", config.addr, addr);
                return Ok(stream);
            }
            Err(e) => {
                tracing::debug!("Dial {} ({}) failed: {}", config.addr, addr, e);
                last_err = Some(e);
            }
        }
    }

    let source = last_err.unwrap_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::NotFound, "no addresses resolved")
    });
    Err(ClientError::Connect {
        addr: config.addr.clone(),
        source,
    })
}
