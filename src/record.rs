//! Record-layer writer interface and a stream-backed implementation.
//!
//! The alert dispatcher never touches the transport directly. It hands
//! [`RecordTemplate`]s to a [`RecordLayer`] and reacts to whether the write
//! completed. Incomplete writes are reported as `Err` (typically
//! [`io::ErrorKind::WouldBlock`]); the record layer keeps the unsent bytes
//! and pushes them out on [`RecordLayer::retry_pending_write`].

use std::fmt;
use std::io::{self, Write};

use nom::bytes::complete::take;
use nom::number::complete::be_u16;
use nom::IResult;

use crate::types::{ContentType, ProtocolVersion};

/// Largest plaintext fragment a single record may carry (2^14).
pub const MAX_FRAGMENT_LEN: usize = 16_384;

/// A record to be written: type, on-wire version and payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordTemplate<'a> {
    pub content_type: ContentType,
    pub version: ProtocolVersion,
    pub payload: &'a [u8],
}

/// A record whose write did not complete, kept for the retry path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingWrite {
    pub content_type: ContentType,
    pub payload: [u8; 2],
}

/// The writer half of the record layer.
pub trait RecordLayer {
    /// Whether bytes from an earlier write are still waiting to go out.
    fn has_pending_write(&self) -> bool;

    /// Frame and write records. `Ok(())` means every byte was accepted.
    fn write_records(&mut self, records: &[RecordTemplate<'_>]) -> io::Result<()>;

    /// Continue the previous incomplete write. No new payload is taken.
    fn retry_pending_write(&mut self) -> io::Result<()>;

    /// Flush the underlying transport.
    fn flush(&mut self) -> io::Result<()>;
}

/// TLS record header: type (1), version (2), length (2).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordHeader {
    pub content_type: ContentType,
    pub version: ProtocolVersion,
    pub length: u16,
}

impl RecordHeader {
    pub const LEN: usize = 5;

    pub fn parse(input: &[u8]) -> IResult<&[u8], RecordHeader> {
        let (input, content_type) = ContentType::parse(input)?;
        let (input, version) = ProtocolVersion::parse(input)?;
        let (input, length) = be_u16(input)?;
        Ok((
            input,
            RecordHeader {
                content_type,
                version,
                length,
            },
        ))
    }

    /// Parse a header and its fragment.
    pub fn parse_record(input: &[u8]) -> IResult<&[u8], (RecordHeader, &[u8])> {
        let (input, header) = Self::parse(input)?;
        let (input, fragment) = take(header.length as usize)(input)?;
        Ok((input, (header, fragment)))
    }

    pub fn serialize(&self, output: &mut Vec<u8>) {
        output.push(self.content_type.as_u8());
        self.version.serialize(output);
        output.extend_from_slice(&self.length.to_be_bytes());
    }
}

/// Record layer writing plaintext TLS records to a byte stream.
///
/// Records are framed into an internal buffer and written out as far as the
/// stream allows. A stream returning `WouldBlock` (or accepting only part of
/// the buffer) leaves the remainder pending until the next retry.
pub struct StreamRecordLayer<W> {
    inner: W,
    /// Framed bytes not yet accepted by `inner`, starting at `written`.
    out: Vec<u8>,
    written: usize,
}

impl<W: Write> StreamRecordLayer<W> {
    pub fn new(inner: W) -> Self {
        StreamRecordLayer {
            inner,
            out: Vec::new(),
            written: 0,
        }
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    pub fn get_mut(&mut self) -> &mut W {
        &mut self.inner
    }

    pub fn into_inner(self) -> W {
        self.inner
    }

    /// Number of framed bytes still waiting for the stream.
    pub fn pending_len(&self) -> usize {
        self.out.len() - self.written
    }

    fn write_out(&mut self) -> io::Result<()> {
        while self.written < self.out.len() {
            match self.inner.write(&self.out[self.written..]) {
                Ok(0) => {
                    return Err(io::Error::new(
                        io::ErrorKind::WriteZero,
                        "transport accepted no bytes",
                    ))
                }
                Ok(n) => {
                    trace!("Wrote {} of {} record bytes", n, self.pending_len());
                    self.written += n;
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }

        self.out.clear();
        self.written = 0;
        Ok(())
    }
}

impl<W: Write> RecordLayer for StreamRecordLayer<W> {
    fn has_pending_write(&self) -> bool {
        self.written < self.out.len()
    }

    fn write_records(&mut self, records: &[RecordTemplate<'_>]) -> io::Result<()> {
        if let Some(r) = records.iter().find(|r| r.payload.len() > MAX_FRAGMENT_LEN) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("record fragment too long: {}", r.payload.len()),
            ));
        }

        for record in records {
            let header = RecordHeader {
                content_type: record.content_type,
                version: record.version,
                length: record.payload.len() as u16,
            };
            header.serialize(&mut self.out);
            self.out.extend_from_slice(record.payload);
        }

        self.write_out()
    }

    fn retry_pending_write(&mut self) -> io::Result<()> {
        self.write_out()
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

impl<W> fmt::Debug for StreamRecordLayer<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamRecordLayer")
            .field("out", &self.out.len())
            .field("written", &self.written)
            .finish()
    }
}
