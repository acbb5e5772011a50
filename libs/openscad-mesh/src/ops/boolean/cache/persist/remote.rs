//! Remote key/value cache backend.
//!
//! A minimal line protocol against a shared cache server: `SET`/`GET`/
//! `EXISTS`/`AUTH`/`FLUSHALL`/`PING`. Keys are namespaced with
//! [`config::constants::REMOTE_CACHE_PREFIX_EXACT`] or
//! [`config::constants::REMOTE_CACHE_PREFIX_GEOMETRY`] so exact and
//! approximate entries never collide on a shared server.
//!
//! Every public call here is fallible only in the sense that it returns
//! `None`/`false` on any network or protocol error — a caller treats an
//! unreachable remote exactly like a cache miss and falls through to
//! recomputation, never propagating the failure as a hard error.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpStream;
use std::time::Duration;

/// Connection parameters for a remote cache server.
#[derive(Debug, Clone)]
pub struct RemoteCacheConfig {
    pub host: String,
    pub port: u16,
    pub auth_token: Option<String>,
    pub timeout: Duration,
}

impl RemoteCacheConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            auth_token: None,
            timeout: Duration::from_secs(5),
        }
    }

    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }
}

/// A single connection to a remote cache server. Non-fatal by design:
/// every operation swallows I/O failures into a `None`/`false` result
/// rather than an `Err`, since the caller always has the in-memory and
/// local-disk caches to fall back on.
pub struct RemoteCacheClient {
    config: RemoteCacheConfig,
}

impl RemoteCacheClient {
    pub fn new(config: RemoteCacheConfig) -> Self {
        Self { config }
    }

    fn connect(&self) -> Option<BufReader<TcpStream>> {
        let stream =
            TcpStream::connect((self.config.host.as_str(), self.config.port)).ok()?;
        stream.set_read_timeout(Some(self.config.timeout)).ok()?;
        stream.set_write_timeout(Some(self.config.timeout)).ok()?;

        if let Some(token) = &self.config.auth_token {
            let mut writer = stream.try_clone().ok()?;
            writeln!(writer, "AUTH {token}").ok()?;
            let mut reader = BufReader::new(stream.try_clone().ok()?);
            let mut line = String::new();
            reader.read_line(&mut line).ok()?;
            if line.trim() != "OK" {
                return None;
            }
        }

        Some(BufReader::new(stream))
    }

    /// `PING` — returns true if the server is reachable and responds.
    pub fn ping(&self) -> bool {
        let Some(mut reader) = self.connect() else { return false };
        let Some(mut writer) = reader.get_ref().try_clone().ok() else { return false };
        if writeln!(writer, "PING").is_err() {
            return false;
        }
        let mut line = String::new();
        reader.read_line(&mut line).is_ok() && line.trim() == "PONG"
    }

    /// `EXISTS <key>` — returns true if the server has an entry for `key`.
    pub fn exists(&self, key: &str) -> bool {
        let Some(mut reader) = self.connect() else { return false };
        let Some(mut writer) = reader.get_ref().try_clone().ok() else { return false };
        if writeln!(writer, "EXISTS {key}").is_err() {
            return false;
        }
        let mut line = String::new();
        reader.read_line(&mut line).is_ok() && line.trim() == "1"
    }

    /// `GET <key>` — returns the stored bytes, `None` on miss or error.
    ///
    /// The wire reply is `<byte-length>\n<raw bytes>` on hit, or a bare
    /// `MISS\n` line otherwise.
    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        let mut reader = self.connect()?;
        let mut writer = reader.get_ref().try_clone().ok()?;
        writeln!(writer, "GET {key}").ok()?;

        let mut header = String::new();
        reader.read_line(&mut header).ok()?;
        let header = header.trim();
        if header == "MISS" {
            return None;
        }
        let len: usize = header.parse().ok()?;
        let mut buf = vec![0u8; len];
        reader.read_exact(&mut buf).ok()?;
        Some(buf)
    }

    /// `SET <key> <byte-length>\n<raw bytes>` — returns true on
    /// acknowledged success.
    pub fn set(&self, key: &str, value: &[u8]) -> bool {
        let Some(mut reader) = self.connect() else { return false };
        let Some(mut writer) = reader.get_ref().try_clone().ok() else { return false };
        if writeln!(writer, "SET {key} {}", value.len()).is_err() {
            return false;
        }
        if writer.write_all(value).is_err() {
            return false;
        }
        let mut line = String::new();
        reader.read_line(&mut line).is_ok() && line.trim() == "OK"
    }

    /// `FLUSHALL` — clears every entry on the server. Used by test
    /// harnesses and explicit cache-reset commands, never on a normal
    /// evaluation path.
    pub fn flush_all(&self) -> bool {
        let Some(mut reader) = self.connect() else { return false };
        let Some(mut writer) = reader.get_ref().try_clone().ok() else { return false };
        if writeln!(writer, "FLUSHALL").is_err() {
            return false;
        }
        let mut line = String::new();
        reader.read_line(&mut line).is_ok() && line.trim() == "OK"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unreachable_server_is_a_clean_miss() {
        let config = RemoteCacheConfig::new("127.0.0.1", 1)
            .with_auth_token("unused");
        let client = RemoteCacheClient::new(config);
        assert!(!client.ping());
        assert_eq!(client.get("anything"), None);
        assert!(!client.set("anything", b"x"));
        assert!(!client.exists("anything"));
    }

    #[test]
    fn config_builder_sets_auth_token() {
        let config = RemoteCacheConfig::new("cache.example", 6379).with_auth_token("secret");
        assert_eq!(config.auth_token.as_deref(), Some("secret"));
    }
}
