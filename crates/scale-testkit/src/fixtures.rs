//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::io;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;

use scale_core::{DigestToken, Salt, WireEndian, RESULT_LEN, SALT_HEX_LEN, TOKEN_ERR, TOKEN_OK};
use scale_store::MemoryCredentials;

/// Users known to every fixture store.
pub const TEST_USERS: &[(&str, &str)] = &[
    ("alice", "wonderland"),
    ("bob", "builder"),
    ("carol", "pass:with:colons"),
];

/// In-memory store holding [`TEST_USERS`].
pub fn test_credentials() -> MemoryCredentials {
    TEST_USERS.iter().copied().collect()
}

/// Write [`TEST_USERS`] as a credential file under `dir`.
pub fn credential_file(dir: &Path) -> io::Result<PathBuf> {
    let path = dir.join("scale.conf");
    let text: String = TEST_USERS
        .iter()
        .map(|(identifier, secret)| format!("{}:{}\n", identifier, secret))
        .collect();
    std::fs::write(&path, text)?;
    Ok(path)
}

/// Client side of the protocol, for driving a server in tests.
pub struct ProtocolClient<S = TcpStream> {
    stream: S,
    endian: WireEndian,
}

impl ProtocolClient<TcpStream> {
    /// Connect to a server.
    pub async fn connect(addr: SocketAddr) -> io::Result<Self> {
        let stream = TcpStream::connect(addr).await?;
        stream.set_nodelay(true)?;
        Ok(Self::new(stream))
    }
}

impl<S: AsyncRead + AsyncWrite + Unpin> ProtocolClient<S> {
    /// Wrap a connected stream. Numbers are little-endian.
    pub fn new(stream: S) -> Self {
        Self {
            stream,
            endian: WireEndian::Little,
        }
    }

    /// Use a different byte order for counts, elements and results.
    pub fn with_endian(mut self, endian: WireEndian) -> Self {
        self.endian = endian;
        self
    }

    /// Send an identifier. Returns the salt, or `None` if the server said `ERR`.
    pub async fn identify(&mut self, identifier: &str) -> io::Result<Option<Salt>> {
        self.send_raw(identifier.as_bytes()).await?;

        // "ERR" can never prefix a salt: 'R' is not a hex digit.
        let mut reply = [0u8; SALT_HEX_LEN];
        self.stream.read_exact(&mut reply[..TOKEN_ERR.len()]).await?;
        if &reply[..TOKEN_ERR.len()] == TOKEN_ERR {
            return Ok(None);
        }
        self.stream
            .read_exact(&mut reply[TOKEN_ERR.len()..])
            .await?;

        let hex = std::str::from_utf8(&reply).map_err(invalid_data)?;
        Salt::from_hex(hex).map(Some).map_err(invalid_data)
    }

    /// Send a digest. Returns whether the server answered `OK`.
    pub async fn respond(&mut self, digest: &str) -> io::Result<bool> {
        self.send_raw(digest.as_bytes()).await?;

        let mut reply = [0u8; 3];
        self.stream.read_exact(&mut reply[..TOKEN_OK.len()]).await?;
        if &reply[..TOKEN_OK.len()] == TOKEN_OK {
            return Ok(true);
        }
        self.stream.read_exact(&mut reply[TOKEN_OK.len()..]).await?;
        if reply == TOKEN_ERR {
            Ok(false)
        } else {
            Err(invalid_data(format!("unexpected reply {:?}", reply)))
        }
    }

    /// Run the whole handshake with the given credentials.
    pub async fn authenticate(&mut self, identifier: &str, secret: &str) -> io::Result<bool> {
        match self.identify(identifier).await? {
            Some(salt) => {
                let digest = DigestToken::compute(&salt, secret);
                self.respond(&digest.to_hex()).await
            }
            None => Ok(false),
        }
    }

    /// Submit vectors and collect one result per vector.
    pub async fn submit(&mut self, vectors: &[Vec<i16>]) -> io::Result<Vec<i16>> {
        let count = self.endian.encode_u32(vectors.len() as u32);
        self.send_raw(&count).await?;

        let mut results = Vec::with_capacity(vectors.len());
        for vector in vectors {
            let mut frame = self.endian.encode_u32(vector.len() as u32).to_vec();
            frame.extend_from_slice(&self.endian.encode_elements(vector));
            self.send_raw(&frame).await?;

            let mut result = [0u8; RESULT_LEN];
            self.stream.read_exact(&mut result).await?;
            results.push(self.endian.decode_i16(result));
        }
        Ok(results)
    }

    /// Write raw bytes.
    pub async fn send_raw(&mut self, data: &[u8]) -> io::Result<()> {
        self.stream.write_all(data).await?;
        self.stream.flush().await
    }

    /// Read until the server closes the connection.
    pub async fn read_to_end(&mut self) -> io::Result<Vec<u8>> {
        let mut rest = Vec::new();
        self.stream.read_to_end(&mut rest).await?;
        Ok(rest)
    }
}

fn invalid_data<E: Into<Box<dyn std::error::Error + Send + Sync>>>(err: E) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, err)
}
