//! Processors built from `std::io::Read` implementations.

use std::io::{self, Read};

use crate::domain::{Closable, Processor};

/// A blocking reader used as a processor, without cleanup.
///
/// Decoders from the `std::io::Read` ecosystem (decompressors, framers,
/// decrypting readers) fit here directly.
///
/// # Examples
///
/// ```ignore
/// use stepio::{ReadProcessor, StepAdapter};
///
/// let adapter = StepAdapter::new(|source| {
///     Ok(ReadProcessor::new(flate2::read::ZlibDecoder::new(source)))
/// });
/// ```
#[derive(Debug)]
pub struct ReadProcessor<R> {
    inner: R,
}

impl<R> ReadProcessor<R> {
    /// Wrap a reader.
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    /// Get a reference to the inner reader.
    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    /// Get a mutable reference to the inner reader.
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    /// Consume the wrapper and return the inner reader.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> Processor for ReadProcessor<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

/// A blocking reader with a cleanup capability.
///
/// The worker calls [`Closable::close`] on the inner reader exactly once,
/// after it finished, failed, or the adapter was closed.
#[derive(Debug)]
pub struct ClosingProcessor<R> {
    inner: R,
}

impl<R> ClosingProcessor<R> {
    /// Wrap a closable reader.
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    /// Get a reference to the inner reader.
    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    /// Consume the wrapper and return the inner reader.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read + Closable> Processor for ClosingProcessor<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }

    fn closable(&mut self) -> Option<&mut dyn Closable> {
        Some(&mut self.inner)
    }
}
