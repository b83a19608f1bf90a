//! Vector exchange for authenticated connections.
//!
//! The peer announces how many vectors it will send, then alternates
//! strictly: one length-prefixed vector in, one `i16` result out. The next
//! length is not read until the previous result has been written.
//!
//! Element data is read in chunks of at most [`CHUNK_ELEMENTS`] and folded
//! into the sum as it arrives, so a declared length never turns into an
//! allocation of that size.

use scale_core::{SquareSum, COUNT_LEN, ELEMENT_LEN};
use scale_store::EventSink;

use crate::error::{ProtocolError, Result};
use crate::session::ProtocolConfig;
use crate::transport::Transport;

/// Elements read per chunk (64 KiB of data).
pub const CHUNK_ELEMENTS: usize = 32 * 1024;

/// Outcome of one vector exchange.
#[derive(Debug, Default)]
pub struct ExchangeReport {
    /// Vector count announced by the peer, once it was read.
    pub vectors_declared: Option<u32>,
    /// Number of vectors whose result was sent.
    pub vectors_processed: u32,
    /// What ended the exchange early, if anything.
    pub error: Option<ProtocolError>,
}

impl ExchangeReport {
    /// Whether every announced vector got its result.
    pub fn is_complete(&self) -> bool {
        self.error.is_none() && self.vectors_declared == Some(self.vectors_processed)
    }
}

/// Runs the vector phase for one connection.
pub struct VectorExchange<'a> {
    journal: &'a dyn EventSink,
    config: &'a ProtocolConfig,
}

impl<'a> VectorExchange<'a> {
    /// Create an exchange recording into `journal`.
    pub fn new(journal: &'a dyn EventSink, config: &'a ProtocolConfig) -> Self {
        Self { journal, config }
    }

    /// Process vectors until all announced ones are answered or the
    /// connection fails.
    pub async fn run<T: Transport + ?Sized>(&self, transport: &mut T) -> ExchangeReport {
        let mut report = ExchangeReport::default();
        if let Err(e) = self.exchange(transport, &mut report).await {
            tracing::debug!(
                "vector exchange with {} ended after {} vectors: {}",
                transport.peer(),
                report.vectors_processed,
                e
            );
            report.error = Some(e);
        }
        report
    }

    async fn exchange<T: Transport + ?Sized>(
        &self,
        transport: &mut T,
        report: &mut ExchangeReport,
    ) -> Result<()> {
        let count = self
            .read_count(transport)
            .await
            .map_err(|e| self.fail("Failed to read number of vectors", e))?;
        report.vectors_declared = Some(count);
        tracing::debug!("{} announced {} vectors", transport.peer(), count);

        for index in 1..=count {
            let (len, result) = self.read_vector(transport).await?;
            tracing::debug!(
                "vector {}/{} from {}: {} elements, result {}",
                index,
                count,
                transport.peer(),
                len,
                result
            );

            transport
                .send(&self.config.endian.encode_i16(result))
                .await
                .map_err(|e| self.fail(&format!("Failed to send result for vector {}", index), e))?;
            report.vectors_processed = index;
        }

        Ok(())
    }

    /// Read one length-prefixed vector, returning its length and result.
    async fn read_vector<T: Transport + ?Sized>(&self, transport: &mut T) -> Result<(u32, i16)> {
        let len = self
            .read_count(transport)
            .await
            .map_err(|e| self.fail("Failed to read vector size", e))?;

        if len > self.config.max_vector_len {
            return Err(self.fail(
                &format!(
                    "Vector size {} exceeds limit {}",
                    len, self.config.max_vector_len
                ),
                ProtocolError::VectorTooLarge {
                    len,
                    max: self.config.max_vector_len,
                },
            ));
        }

        let mut acc = SquareSum::new();
        let mut remaining = len as usize;
        while remaining > 0 {
            let take = remaining.min(CHUNK_ELEMENTS);
            let data = transport
                .recv_exact(take * ELEMENT_LEN)
                .await
                .map_err(|e| self.fail("Failed to read vector data", e))?;
            acc.extend_from_slice(&self.config.endian.decode_elements(&data)?);
            remaining -= take;
        }

        Ok((len, acc.finish()))
    }

    async fn read_count<T: Transport + ?Sized>(&self, transport: &mut T) -> Result<u32> {
        let raw = transport.recv_exact(COUNT_LEN).await?;
        let mut bytes = [0u8; COUNT_LEN];
        bytes.copy_from_slice(&raw);
        Ok(self.config.endian.decode_u32(bytes))
    }

    fn fail(&self, message: &str, err: ProtocolError) -> ProtocolError {
        self.journal.non_critical(message);
        err
    }
}
