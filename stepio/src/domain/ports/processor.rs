//! Processor port - the opaque blocking transformer driven by the worker.

use std::io;

/// A blocking, pull-based byte transformer.
///
/// A processor is built once by the factory handed to
/// [`StepAdapter::new`](crate::StepAdapter::new), receiving a
/// [`PullSource`](crate::PullSource) to pull its input from. From then on
/// the worker thread calls [`read`](Processor::read) in a loop; the processor
/// pulls from the source as often as it likes and returns whatever it
/// produced.
///
/// # Contract
///
/// - `Ok(n)` with `n > 0`: `n` bytes of output were written to `buf`
/// - `Ok(0)`: ordinary completion (end of output)
/// - `Err(e)` with kind `Interrupted`: retried by the worker
/// - any other `Err(e)`: the processor failed, the adapter terminates
///
/// Processors are created and used on the worker thread only, so they need
/// not be `Send`.
///
/// # Examples
///
/// ```ignore
/// struct Upper<R>(R);
///
/// impl<R: std::io::Read> Processor for Upper<R> {
///     fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
///         let n = self.0.read(buf)?;
///         buf[..n].make_ascii_uppercase();
///         Ok(n)
///     }
/// }
/// ```
pub trait Processor {
    /// Pull input as needed and produce output into `buf`.
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// The processor's cleanup capability, if it has one.
    ///
    /// When this returns `Some`, the worker calls [`Closable::close`] exactly
    /// once, after the processor finished or failed, or after the adapter
    /// was closed. The default is no cleanup.
    fn closable(&mut self) -> Option<&mut dyn Closable> {
        None
    }
}

/// Cleanup capability of a processor.
pub trait Closable {
    /// Release whatever the processor holds.
    ///
    /// # Errors
    ///
    /// A cleanup error becomes the adapter's terminal error only if no other
    /// error was recorded first.
    fn close(&mut self) -> io::Result<()>;
}

impl<P: Processor + ?Sized> Processor for Box<P> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        (**self).read(buf)
    }

    fn closable(&mut self) -> Option<&mut dyn Closable> {
        (**self).closable()
    }
}
