//! SCPI over TCP communication.
//!
//! This module provides a blocking SCPI transport for talking to the
//! instrument's socket server. Commands are ASCII text; the transport appends
//! the newline terminator on writes and strips it on reads. Every query is a
//! write immediately followed by a blocking read of one terminated line,
//! bounded only by the configured read timeout.
//!
//! [`MockTransport`] is a scripted stand-in for tests without hardware.

use crate::error::{Result, VnaError};
use log::debug;
use std::collections::HashMap;
use std::io::{BufRead, BufReader, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

/// Response line terminator used by the instrument. Reads time out without it.
const TERMINATOR: char = '\n';

/// Timeout for opening the socket itself, distinct from the read timeout.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// A blocking command/query channel to a SCPI instrument.
pub trait ScpiTransport {
    /// Sends a command that produces no response.
    fn send(&mut self, command: &str) -> Result<()>;

    /// Sends a query and blocks until one terminated response line arrives.
    /// Returns the response with surrounding whitespace trimmed.
    fn query(&mut self, command: &str) -> Result<String>;
}

/// Blocking TCP transport to the instrument's SCPI socket server.
pub struct TcpTransport {
    stream: BufReader<TcpStream>,
    peer: String,
}

impl TcpTransport {
    /// Opens a socket to `host:port` and configures it for SCPI exchanges.
    ///
    /// Fails hard if the instrument is unreachable; a session is never built
    /// on top of a dead handle. `timeout` bounds every subsequent blocking
    /// read and should be generous enough to cover a full slow sweep.
    pub fn connect(host: &str, port: u16, timeout: Duration) -> Result<Self> {
        let peer = format!("{host}:{port}");
        let addr = (host, port)
            .to_socket_addrs()
            .map_err(|e| VnaError::Connection(format!("cannot resolve {peer}: {e}")))?
            .next()
            .ok_or_else(|| VnaError::Connection(format!("no address found for {peer}")))?;

        let stream = TcpStream::connect_timeout(&addr, CONNECT_TIMEOUT).map_err(|e| {
            VnaError::Connection(format!(
                "failed to connect to VNA at {peer}: {e}; check the instrument's \
                 network remote control settings (socket server must be ON)"
            ))
        })?;

        // Low latency for short command/response round-trips.
        stream.set_nodelay(true)?;
        stream.set_read_timeout(Some(timeout))?;

        log::info!("Connected to VNA at {peer}");

        Ok(Self {
            stream: BufReader::new(stream),
            peer,
        })
    }

    /// Adjusts the read timeout on the open socket.
    pub fn set_timeout(&mut self, timeout: Duration) -> Result<()> {
        self.stream.get_ref().set_read_timeout(Some(timeout))?;
        Ok(())
    }

    fn write_line(&mut self, command: &str) -> Result<()> {
        debug!("[{}] -> {}", self.peer, command);
        let stream = self.stream.get_mut();
        stream.write_all(command.as_bytes())?;
        stream.write_all(&[TERMINATOR as u8])?;
        stream.flush()?;
        Ok(())
    }
}

impl ScpiTransport for TcpTransport {
    fn send(&mut self, command: &str) -> Result<()> {
        self.write_line(command)
    }

    fn query(&mut self, command: &str) -> Result<String> {
        self.write_line(command)?;

        let mut response = String::new();
        let n = self.stream.read_line(&mut response)?;
        if n == 0 {
            return Err(VnaError::ConnectionClosed);
        }

        let trimmed = response.trim().to_string();
        debug!("[{}] <- {} bytes", self.peer, n);
        Ok(trimmed)
    }
}

/// Scripted SCPI transport for testing without hardware.
///
/// Write-only commands are recorded; queries are answered from a canned
/// response table and recorded as well. An unscripted query is an error,
/// which keeps tests honest about the exact exchanges a session performs.
#[derive(Debug, Default)]
pub struct MockTransport {
    responses: HashMap<String, String>,
    transcript: Vec<String>,
}

impl MockTransport {
    /// Creates an empty mock with no scripted responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts a canned response for a query.
    pub fn expect(&mut self, query: &str, response: &str) {
        self.responses
            .insert(query.to_string(), response.to_string());
    }

    /// Every command and query sent so far, in order.
    pub fn transcript(&self) -> &[String] {
        &self.transcript
    }
}

impl ScpiTransport for MockTransport {
    fn send(&mut self, command: &str) -> Result<()> {
        self.transcript.push(command.to_string());
        Ok(())
    }

    fn query(&mut self, command: &str) -> Result<String> {
        self.transcript.push(command.to_string());
        self.responses
            .get(command)
            .cloned()
            .ok_or_else(|| VnaError::Instrument(format!("unscripted query: {command}")))
    }
}
