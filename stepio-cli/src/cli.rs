//! Command-line interface for stepping a stream through a processor

use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;
use log::{debug, info, warn};
use stepio::{DEFAULT_CHUNK_SIZE, DEFAULT_OUTPUT_LIMIT, StepAdapter, StepConfig, StepError};

use crate::codec::Codec;

/// Default number of input bytes offered per step
pub const DEFAULT_FEED_SIZE: usize = 4096;

#[derive(Parser, Debug)]
#[command(name = "stepio")]
#[command(about = "Feed a stream through a blocking decoder one step at a time", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Input file ("-" or omitted for stdin)
    pub input: Option<PathBuf>,

    /// Processor to run
    ///
    /// Input that ends before a compressed stream is complete is not an
    /// error: the decoder is closed and its output so far is kept. A
    /// warning is logged when that happens.
    #[arg(short, long, value_enum, default_value_t = Codec::Zlib)]
    pub codec: Codec,

    /// Write output to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Input bytes offered per step
    #[arg(long, default_value_t = DEFAULT_FEED_SIZE)]
    pub feed_size: usize,

    /// Bytes requested from the processor per read
    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
    pub chunk_size: usize,

    /// Maximum output a single step may produce
    #[arg(long, default_value_t = DEFAULT_OUTPUT_LIMIT)]
    pub output_limit: usize,

    /// Print one line per step to stderr
    #[arg(long)]
    pub trace: bool,
}

/// Byte counts for a completed run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Summary {
    pub consumed: u64,
    pub produced: u64,
    pub steps: u64,
    /// The input ran out while the processor was still waiting for more
    pub closed_early: bool,
}

pub fn run(cli: Cli) -> Result<()> {
    if cli.feed_size == 0 {
        bail!("--feed-size must be greater than zero");
    }
    let config =
        StepConfig::new(cli.chunk_size, cli.output_limit).context("Invalid step configuration")?;

    let mut input = open_input(cli.input.as_deref())?;
    let mut output = open_output(cli.output.as_deref())?;

    debug!("running {:?} with {:?}", cli.codec, config);
    let mut adapter = cli.codec.adapter(config);

    let mut stderr = io::stderr();
    let trace: Option<&mut dyn Write> = if cli.trace { Some(&mut stderr) } else { None };

    let summary = pump(&mut adapter, &mut input, &mut output, cli.feed_size, trace)?;
    if summary.closed_early && cli.codec != Codec::Identity {
        warn!(
            "input ended before the {:?} stream was complete; output may be truncated",
            cli.codec
        );
    }
    info!(
        "{} steps, {} bytes in, {} bytes out",
        summary.steps, summary.consumed, summary.produced
    );
    Ok(())
}

fn open_input(path: Option<&Path>) -> Result<Box<dyn Read>> {
    match path {
        None => Ok(Box::new(io::stdin().lock())),
        Some(p) if p.as_os_str() == "-" => Ok(Box::new(io::stdin().lock())),
        Some(p) => {
            let file = File::open(p)
                .with_context(|| format!("Failed to open input file: {}", p.display()))?;
            Ok(Box::new(file))
        }
    }
}

fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    match path {
        None => Ok(Box::new(BufWriter::new(io::stdout().lock()))),
        Some(p) => {
            let file = File::create(p)
                .with_context(|| format!("Failed to create output file: {}", p.display()))?;
            Ok(Box::new(BufWriter::new(file)))
        }
    }
}

/// Step all of `input` through `adapter`, then close it and drain what the
/// processor produced while winding down.
///
/// Fails unless the adapter ended with a clean end of input.
pub fn pump(
    adapter: &mut StepAdapter,
    input: &mut dyn Read,
    output: &mut dyn Write,
    feed_size: usize,
    mut trace: Option<&mut dyn Write>,
) -> Result<Summary> {
    let mut buf = vec![0u8; feed_size];
    let mut summary = Summary::default();

    let mut end = None;
    while end.is_none() {
        let n = match input.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e).context("Failed to read input"),
        };
        let start = summary.consumed;
        summary.consumed += n as u64;
        end = step_once(adapter, &buf[..n], start, output, &mut summary, trace.as_deref_mut())?;
    }

    let end = match end {
        Some(err) => {
            if !err.is_eof() {
                warn!("processor failed after {} input bytes", summary.consumed);
            } else {
                info!("processor finished before the input was exhausted");
            }
            err
        }
        None => {
            summary.closed_early = !adapter.is_finished();
            if let Err(err) = adapter.close() {
                debug!("close reported: {}", err);
            }
            loop {
                let at = summary.consumed;
                if let Some(err) =
                    step_once(adapter, &[], at, output, &mut summary, trace.as_deref_mut())?
                {
                    break err;
                }
            }
        }
    };

    output.flush().context("Failed to flush output")?;

    if !end.is_eof() {
        return Err(anyhow::Error::new(end).context("Stream did not end cleanly"));
    }
    Ok(summary)
}

/// Run one step, write its output, and return the terminal condition if any.
fn step_once(
    adapter: &mut StepAdapter,
    data: &[u8],
    start: u64,
    output: &mut dyn Write,
    summary: &mut Summary,
    trace: Option<&mut (dyn Write + '_)>,
) -> Result<Option<StepError>> {
    let end = start + data.len() as u64;
    summary.steps += 1;

    match adapter.step(data) {
        Ok(out) => {
            if let Some(t) = trace {
                writeln!(t, "{}:{} => {} bytes", start, end, out.len())?;
            }
            output.write_all(out).context("Failed to write output")?;
            summary.produced += out.len() as u64;
            Ok(None)
        }
        Err(err) => {
            if let Some(t) = trace {
                writeln!(t, "{}:{} => 0 bytes, {}", start, end, err)?;
            }
            Ok(Some(err))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::ZlibEncoder;
    use std::io::Cursor;

    fn zlib(data: &[u8]) -> Vec<u8> {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    fn cli_for(input: &Path, output: &Path, codec: Codec) -> Cli {
        Cli {
            input: Some(input.to_path_buf()),
            codec,
            output: Some(output.to_path_buf()),
            feed_size: 7,
            chunk_size: DEFAULT_CHUNK_SIZE,
            output_limit: DEFAULT_OUTPUT_LIMIT,
            trace: false,
        }
    }

    #[test]
    fn test_parse_args() {
        let cli = Cli::try_parse_from([
            "stepio",
            "--codec",
            "gzip",
            "--feed-size",
            "128",
            "--trace",
            "data.gz",
        ])
        .unwrap();

        assert_eq!(cli.codec, Codec::Gzip);
        assert_eq!(cli.feed_size, 128);
        assert_eq!(cli.chunk_size, DEFAULT_CHUNK_SIZE);
        assert_eq!(cli.output_limit, DEFAULT_OUTPUT_LIMIT);
        assert!(cli.trace);
        assert_eq!(cli.input, Some(PathBuf::from("data.gz")));
        assert!(cli.output.is_none());
    }

    #[test]
    fn test_parse_rejects_unknown_codec() {
        assert!(Cli::try_parse_from(["stepio", "--codec", "brotli"]).is_err());
    }

    #[test]
    fn test_pump_identity_trace() {
        let mut adapter = Codec::Identity.adapter(StepConfig::default());
        let mut input = Cursor::new(b"hello world".to_vec());
        let mut output = Vec::new();
        let mut trace = Vec::new();

        let summary = pump(&mut adapter, &mut input, &mut output, 4, Some(&mut trace)).unwrap();

        assert_eq!(output, b"hello world");
        assert_eq!(summary.consumed, 11);
        assert_eq!(summary.produced, 11);
        assert_eq!(summary.steps, 4);
        assert_eq!(
            String::from_utf8(trace).unwrap(),
            "0:4 => 4 bytes\n4:8 => 4 bytes\n8:11 => 3 bytes\n11:11 => 0 bytes, EOF\n"
        );
    }

    #[test]
    fn test_pump_flags_truncated_stream() {
        let mut seed: u32 = 7;
        let plain: Vec<u8> = (0..4000)
            .map(|_| {
                seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
                b"abcdefgh \n"[(seed >> 16) as usize % 10]
            })
            .collect();
        let compressed = zlib(&plain);

        let mut adapter = Codec::Zlib.adapter(StepConfig::default());
        let mut input = Cursor::new(compressed[..compressed.len() / 2].to_vec());
        let mut output = Vec::new();
        let summary = pump(&mut adapter, &mut input, &mut output, 16, None).unwrap();
        assert!(summary.closed_early);
        assert!(output.len() < plain.len());

        let mut adapter = Codec::Zlib.adapter(StepConfig::default());
        let mut input = Cursor::new(compressed);
        let mut output = Vec::new();
        let summary = pump(&mut adapter, &mut input, &mut output, 16, None).unwrap();
        assert!(!summary.closed_early);
        assert_eq!(output, plain);
    }

    #[test]
    fn test_pump_reports_processor_error() {
        let mut adapter = Codec::Zlib.adapter(StepConfig::default());
        let mut input = Cursor::new(b"this is not compressed".to_vec());
        let mut output = Vec::new();

        let err = pump(&mut adapter, &mut input, &mut output, 64, None).unwrap_err();
        assert!(err.to_string().contains("did not end cleanly"));
        assert!(err.downcast_ref::<StepError>().is_some());
    }

    #[test]
    fn test_run_zlib_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("input.z");
        let output = dir.path().join("output.txt");

        let plain: Vec<u8> = b"stepping through a file\n".repeat(500);
        std::fs::write(&input, zlib(&plain)).unwrap();

        run(cli_for(&input, &output, Codec::Zlib)).unwrap();

        assert_eq!(std::fs::read(&output).unwrap(), plain);
    }

    #[test]
    fn test_run_overflow_fails() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("zeros.z");
        let output = dir.path().join("zeros.bin");
        std::fs::write(&input, zlib(&vec![0u8; 256 * 1024])).unwrap();

        let mut cli = cli_for(&input, &output, Codec::Zlib);
        cli.feed_size = 64 * 1024;
        cli.chunk_size = 1024;
        cli.output_limit = 4096;

        let err = run(cli).unwrap_err();
        let step_err = err.downcast_ref::<StepError>().unwrap();
        assert!(step_err.is_overflow());
    }

    #[test]
    fn test_run_rejects_zero_sizes() {
        let input = tempfile::NamedTempFile::new().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out");

        let mut cli = cli_for(input.path(), &output, Codec::Identity);
        cli.feed_size = 0;
        assert!(run(cli).is_err());

        let mut cli = cli_for(input.path(), &output, Codec::Identity);
        cli.chunk_size = 0;
        assert!(run(cli).is_err());
    }

    #[test]
    fn test_run_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let cli = cli_for(&dir.path().join("absent"), &dir.path().join("out"), Codec::Zlib);

        let err = run(cli).unwrap_err();
        assert!(err.to_string().contains("Failed to open input file"));
    }
}
