//! Broadcast payloads produced by the load generator.
//!
//! A [`Payload`] is built once per tick and shared by `Arc` with every
//! recipient mailbox. The encoded frame is stored as [`Utf8Bytes`], so
//! handing it to a socket is a reference-count bump, not a copy.

use axum::extract::ws::Utf8Bytes;
use chrono::{DateTime, SecondsFormat, Utc};

/// Byte used for the synthetic filler block.
pub const FILLER_BYTE: char = 'a';

/// Pre-built filler block appended to every payload.
///
/// Allocated once at startup and reused for every tick.
#[derive(Debug, Clone)]
pub struct Filler(String);

impl Filler {
    /// Creates a filler block of exactly `size` bytes.
    #[must_use]
    pub fn new(size: usize) -> Self {
        Self(std::iter::repeat_n(FILLER_BYTE, size).collect())
    }

    /// Size of the block in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` for a zero-length block.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn as_str(&self) -> &str {
        &self.0
    }
}

/// One immutable broadcast unit: header line followed by the filler block.
///
/// Wire layout:
///
/// ```text
/// <RFC3339 timestamp> | Connected clients: <count> | Payload size: <bytes> bytes\n<filler>
/// ```
#[derive(Debug, Clone)]
pub struct Payload {
    generated_at: DateTime<Utc>,
    live_count: usize,
    filler_size: usize,
    frame: Utf8Bytes,
}

impl Payload {
    /// Encodes a payload for the given generation time and live count.
    #[must_use]
    pub fn build(generated_at: DateTime<Utc>, live_count: usize, filler: &Filler) -> Self {
        let header = format_header(generated_at, live_count, filler.len());
        let mut text = String::with_capacity(header.len() + filler.len());
        text.push_str(&header);
        text.push_str(filler.as_str());

        Self {
            generated_at,
            live_count,
            filler_size: filler.len(),
            frame: Utf8Bytes::from(text),
        }
    }

    /// Time the payload was generated.
    #[must_use]
    pub const fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }

    /// Live-connection count captured at generation time.
    #[must_use]
    pub const fn live_count(&self) -> usize {
        self.live_count
    }

    /// Size of the filler block in bytes.
    #[must_use]
    pub const fn filler_size(&self) -> usize {
        self.filler_size
    }

    /// The encoded text frame. Cloning it does not copy the bytes.
    #[must_use]
    pub const fn frame(&self) -> &Utf8Bytes {
        &self.frame
    }

    /// The header line, including its trailing newline.
    #[must_use]
    pub fn header(&self) -> &str {
        let text = self.frame.as_str();
        text.find('\n')
            .and_then(|idx| text.get(..=idx))
            .unwrap_or(text)
    }

    /// Total encoded length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.frame.as_str().len()
    }

    /// Always `false`: the header line is never empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frame.as_str().is_empty()
    }
}

/// Formats the header line that prefixes every payload.
#[must_use]
pub fn format_header(generated_at: DateTime<Utc>, live_count: usize, filler_size: usize) -> String {
    format!(
        "{} | Connected clients: {live_count} | Payload size: {filler_size} bytes\n",
        generated_at.to_rfc3339_opts(SecondsFormat::Secs, true)
    )
}
