//! Byte sink encoder and the `Encode` capability
//!
//! Every wire type implements `Encode`, writing itself into an `Encoder`.
//! Fixed-width integers are little-endian, strings and sequences carry a
//! varint length prefix, and nothing is padded or aligned.
//!
//! `RollingEncoder` threads a `Result` through a chain of encodes so the
//! caller checks for failure once, at the end of the chain.

use std::io::Write;

use crate::error::{CodecError, Result};

use super::varint::encode_uvarint;

/// A value that can write its canonical bytes into an encoder
pub trait Encode {
    fn encode(&self, enc: &mut Encoder<'_>) -> Result<()>;
}

/// Wraps an output sink and counts what has been written to it
pub struct Encoder<'w> {
    writer: &'w mut dyn Write,
    written: usize,
}

impl<'w> Encoder<'w> {
    pub fn new(writer: &'w mut dyn Write) -> Self {
        Self { writer, written: 0 }
    }

    /// Total bytes written through this encoder
    pub fn bytes_written(&self) -> usize {
        self.written
    }

    /// Write bytes as-is, with no length prefix
    pub fn write_raw(&mut self, bytes: &[u8]) -> Result<()> {
        self.writer.write_all(bytes)?;
        self.written += bytes.len();
        Ok(())
    }

    pub fn encode_uvarint(&mut self, value: u64) -> Result<()> {
        self.written += encode_uvarint(&mut *self.writer, value)?;
        Ok(())
    }

    /// Varint length followed by the raw bytes
    pub fn encode_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.encode_uvarint(bytes.len() as u64)?;
        self.write_raw(bytes)
    }

    pub fn encode<T: Encode + ?Sized>(&mut self, value: &T) -> Result<()> {
        value.encode(self)
    }
}

/// Encode a value into a freshly allocated byte vector
pub fn to_bytes<T: Encode + ?Sized>(value: &T) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let mut enc = Encoder::new(&mut out);
    value.encode(&mut enc)?;
    Ok(out)
}

// =============================================================================
// Rolling Encoder
// =============================================================================

/// Chains encodes against one encoder, skipping everything after the first
/// failure
///
/// ```
/// use graphene_codec::encoding::{Encoder, RollingEncoder};
///
/// let mut out = Vec::new();
/// let mut enc = Encoder::new(&mut out);
/// RollingEncoder::new(&mut enc)
///     .encode(&1u16)
///     .encode("hi")
///     .encode_uvarint(0)
///     .finish()
///     .unwrap();
/// assert_eq!(out, vec![0x01, 0x00, 0x02, b'h', b'i', 0x00]);
/// ```
pub struct RollingEncoder<'e, 'w> {
    state: std::result::Result<&'e mut Encoder<'w>, CodecError>,
}

impl<'e, 'w> RollingEncoder<'e, 'w> {
    pub fn new(enc: &'e mut Encoder<'w>) -> Self {
        Self { state: Ok(enc) }
    }

    pub fn encode<T: Encode + ?Sized>(self, value: &T) -> Self {
        self.step(|enc| value.encode(enc))
    }

    pub fn encode_uvarint(self, value: u64) -> Self {
        self.step(|enc| enc.encode_uvarint(value))
    }

    /// Encode every item of `items` in iteration order
    pub fn encode_each<'a, T, I>(self, items: I) -> Self
    where
        T: Encode + ?Sized + 'a,
        I: IntoIterator<Item = &'a T>,
    {
        items.into_iter().fold(self, |rolling, item| rolling.encode(item))
    }

    /// The first error recorded so far, if any
    pub fn err(&self) -> Option<&CodecError> {
        self.state.as_ref().err()
    }

    /// End the chain, yielding the first error encountered
    pub fn finish(self) -> Result<()> {
        self.state.map(|_| ())
    }

    fn step<F>(self, f: F) -> Self
    where
        F: FnOnce(&mut Encoder<'w>) -> Result<()>,
    {
        let state = match self.state {
            Ok(enc) => f(&mut *enc).map(|()| enc),
            Err(err) => Err(err),
        };
        Self { state }
    }
}

// =============================================================================
// Encode impls for primitives
// =============================================================================

macro_rules! impl_encode_le {
    ($($ty:ty),*) => {
        $(
            impl Encode for $ty {
                fn encode(&self, enc: &mut Encoder<'_>) -> Result<()> {
                    enc.write_raw(&self.to_le_bytes())
                }
            }
        )*
    };
}

impl_encode_le!(u8, u16, u32, u64, i8, i16, i32, i64);

impl Encode for bool {
    fn encode(&self, enc: &mut Encoder<'_>) -> Result<()> {
        enc.write_raw(&[u8::from(*self)])
    }
}

impl Encode for str {
    fn encode(&self, enc: &mut Encoder<'_>) -> Result<()> {
        enc.encode_bytes(self.as_bytes())
    }
}

impl Encode for String {
    fn encode(&self, enc: &mut Encoder<'_>) -> Result<()> {
        self.as_str().encode(enc)
    }
}

impl<T: Encode> Encode for [T] {
    fn encode(&self, enc: &mut Encoder<'_>) -> Result<()> {
        RollingEncoder::new(enc)
            .encode_uvarint(self.len() as u64)
            .encode_each(self)
            .finish()
    }
}

impl<T: Encode> Encode for Vec<T> {
    fn encode(&self, enc: &mut Encoder<'_>) -> Result<()> {
        self.as_slice().encode(enc)
    }
}

impl<T: Encode> Encode for Option<T> {
    fn encode(&self, enc: &mut Encoder<'_>) -> Result<()> {
        match self {
            Some(value) => {
                enc.write_raw(&[1])?;
                value.encode(enc)
            }
            None => enc.write_raw(&[0]),
        }
    }
}

impl<T: Encode + ?Sized> Encode for &T {
    fn encode(&self, enc: &mut Encoder<'_>) -> Result<()> {
        (**self).encode(enc)
    }
}

impl<T: Encode + ?Sized> Encode for Box<T> {
    fn encode(&self, enc: &mut Encoder<'_>) -> Result<()> {
        (**self).encode(enc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    /// Sink that accepts a fixed number of bytes and then fails
    struct LimitedSink {
        data: Vec<u8>,
        capacity: usize,
    }

    impl Write for LimitedSink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.data.len() + buf.len() > self.capacity {
                return Err(io::Error::new(io::ErrorKind::WriteZero, "sink full"));
            }
            self.data.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Counts how many times it was asked to encode itself
    struct Counted<'a>(&'a std::cell::Cell<usize>);

    impl Encode for Counted<'_> {
        fn encode(&self, enc: &mut Encoder<'_>) -> Result<()> {
            self.0.set(self.0.get() + 1);
            enc.write_raw(&[0xaa])
        }
    }

    #[test]
    fn test_integers_little_endian() {
        assert_eq!(to_bytes(&0x1234u16).unwrap(), vec![0x34, 0x12]);
        assert_eq!(to_bytes(&0x01020304u32).unwrap(), vec![4, 3, 2, 1]);
        assert_eq!(to_bytes(&-1i64).unwrap(), vec![0xff; 8]);
        assert_eq!(to_bytes(&true).unwrap(), vec![1]);
    }

    #[test]
    fn test_strings_length_prefixed() {
        assert_eq!(to_bytes("abc").unwrap(), vec![3, b'a', b'b', b'c']);
        assert_eq!(to_bytes(&String::new()).unwrap(), vec![0]);
    }

    #[test]
    fn test_sequences_and_options() {
        assert_eq!(to_bytes(&vec![1u16, 2u16]).unwrap(), vec![2, 1, 0, 2, 0]);
        assert_eq!(to_bytes(&Some(7u8)).unwrap(), vec![1, 7]);
        assert_eq!(to_bytes(&None::<u8>).unwrap(), vec![0]);
    }

    #[test]
    fn test_bytes_written() {
        let mut out = Vec::new();
        let mut enc = Encoder::new(&mut out);
        enc.encode(&1u32).unwrap();
        enc.encode_bytes(&[1, 2, 3]).unwrap();
        assert_eq!(enc.bytes_written(), 8);
    }

    #[test]
    fn test_rolling_encoder_single_check() {
        let mut out = Vec::new();
        let mut enc = Encoder::new(&mut out);
        let rolling = RollingEncoder::new(&mut enc)
            .encode(&1u8)
            .encode("x")
            .encode_uvarint(300);
        assert!(rolling.err().is_none());
        rolling.finish().unwrap();
        assert_eq!(out, vec![1, 1, b'x', 0xac, 0x02]);
    }

    #[test]
    fn test_rolling_encoder_skips_after_failure() {
        let calls = std::cell::Cell::new(0);
        let mut sink = LimitedSink {
            data: Vec::new(),
            capacity: 2,
        };
        let mut enc = Encoder::new(&mut sink);

        let rolling = RollingEncoder::new(&mut enc)
            .encode(&Counted(&calls))
            .encode(&0xffffu32)
            .encode(&Counted(&calls))
            .encode(&Counted(&calls));

        assert!(matches!(rolling.err(), Some(CodecError::SinkWrite(_))));
        assert!(matches!(rolling.finish(), Err(CodecError::SinkWrite(_))));
        assert_eq!(calls.get(), 1);
        assert_eq!(sink.data, vec![0xaa]);
    }
}
