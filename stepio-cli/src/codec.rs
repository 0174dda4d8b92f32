//! Processors selectable from the command line

use clap::ValueEnum;
use flate2::read::{DeflateDecoder, GzDecoder, ZlibDecoder};
use stepio::{StepAdapter, StepConfig};

/// The processor run behind the step adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Codec {
    /// Pass input through unchanged
    Identity,
    /// zlib-wrapped deflate (RFC 1950)
    Zlib,
    /// gzip member (RFC 1952)
    Gzip,
    /// Raw deflate (RFC 1951)
    Deflate,
}

impl Codec {
    /// Start a step adapter running this codec.
    pub fn adapter(self, config: StepConfig) -> StepAdapter {
        match self {
            Codec::Identity => StepAdapter::from_reader_with_config(config, Ok),
            Codec::Zlib => {
                StepAdapter::from_reader_with_config(config, |source| Ok(ZlibDecoder::new(source)))
            }
            Codec::Gzip => {
                StepAdapter::from_reader_with_config(config, |source| Ok(GzDecoder::new(source)))
            }
            Codec::Deflate => StepAdapter::from_reader_with_config(config, |source| {
                Ok(DeflateDecoder::new(source))
            }),
        }
    }
}
