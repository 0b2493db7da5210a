//! The line sink collaborator consumed by [`crate::Advertiser`].
//!
//! The advertiser is polymorphic over the capability set `{write_line, end}`
//! rather than over a concrete writer, so that the bundled packet-line framed
//! sink and a plain LF-separated sink (or a host's own framing) are
//! interchangeable at the call site.

use std::io;

/// Accepts one already-formatted advertisement line at a time.
pub trait LineSink {
    /// Writes `line`, which always ends with `\n` and is never empty.
    fn write_line(&mut self, line: &[u8]) -> io::Result<()>;
    /// Emits the final framing marker for the stream.
    fn end(&mut self) -> io::Result<()>;
}

/// A sink that writes each line LF-separated with no additional framing.
///
/// Suitable for embedding the encoder where the host already frames lines
/// itself (or wants a plain text transcript, e.g. for tests or debugging).
pub struct PlainSink<W> {
    inner: W,
}

impl<W: io::Write> PlainSink<W> {
    /// Wraps `inner`, writing each advertised line to it verbatim.
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    /// Returns the wrapped writer, consuming the sink.
    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: io::Write> LineSink for PlainSink<W> {
    fn write_line(&mut self, line: &[u8]) -> io::Result<()> {
        self.inner.write_all(line)
    }

    fn end(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(feature = "blocking-io")]
mod packetline {
    use super::LineSink;
    use std::io;

    /// A sink that wraps a packet-line framed stream, prefixing each line
    /// with its 4-hex-digit length and terminating the stream with a flush
    /// packet, mirroring how `gix_receive_pack::protocol::advertise::Advertiser`
    /// frames its own output.
    pub struct PacketLineSink<W: io::Write> {
        out: gix_packetline_blocking::Writer<W>,
    }

    impl<W: io::Write> PacketLineSink<W> {
        /// Wraps `inner` in text-mode pkt-line framing.
        pub fn new(inner: W) -> Self {
            let mut out = gix_packetline_blocking::Writer::new(inner);
            out.enable_text_mode();
            Self { out }
        }
    }

    impl<W: io::Write> LineSink for PacketLineSink<W> {
        fn write_line(&mut self, line: &[u8]) -> io::Result<()> {
            self.out.write_all(line)
        }

        fn end(&mut self) -> io::Result<()> {
            gix_packetline_blocking::encode::flush_to_write(self.out.inner_mut())?;
            self.out.flush()
        }
    }
}

#[cfg(feature = "blocking-io")]
pub use packetline::PacketLineSink;
