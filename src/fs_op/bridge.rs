//! Blocking byte pipelines.
//!
//! [`pipe`] drives a reader into a writer until the reader is exhausted or
//! either side fails. Codecs that only offer one direction (the tar builder
//! pushes into a `Write`, the tar unpacker pulls from a `Read`) are run on a
//! scoped worker thread connected through a bounded channel, see
//! [`run_producer`] and [`run_consumer`]. Both join the worker before
//! returning, so every call completes before control goes back to the caller.

use std::io::{self, Read, Write};
use std::thread;

use crossbeam_channel::{bounded, Receiver, Sender};

use crate::fs_op::error::{FsOpError, Result, StreamSide};

/// Default chunk size for stream copies.
pub const DEFAULT_BUFFER_SIZE: usize = 64 * 1024;

// Chunks in flight between the worker and the calling thread.
const CHANNEL_DEPTH: usize = 8;

/// Copy everything from `source` into `sink` with a 64 KiB buffer.
pub fn pipe<R: Read, W: Write>(source: R, sink: W) -> Result<u64> {
    pipe_with_capacity(source, sink, DEFAULT_BUFFER_SIZE)
}

/// Copy everything from `source` into `sink`, then flush `sink`.
///
/// A read error ends the pipe and drops the sink; a write error ends it and
/// drops the source. The returned error names the side that failed.
pub fn pipe_with_capacity<R: Read, W: Write>(mut source: R, mut sink: W, capacity: usize) -> Result<u64> {
    let mut buf = vec![0u8; capacity.max(1)];
    let mut total = 0u64;
    loop {
        let n = match source.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(source) => {
                return Err(FsOpError::Stream {
                    side: StreamSide::Source,
                    source,
                })
            }
        };
        sink.write_all(&buf[..n]).map_err(|source| FsOpError::Stream {
            side: StreamSide::Sink,
            source,
        })?;
        total += n as u64;
    }
    sink.flush().map_err(|source| FsOpError::Stream {
        side: StreamSide::Sink,
        source,
    })?;
    tracing::trace!(bytes = total, "pipe finished");
    Ok(total)
}

/// `Write` half of a worker channel. Writes fail with `BrokenPipe` once the
/// reading side has gone away.
pub struct ChannelWriter {
    tx: Sender<Vec<u8>>,
}

impl Write for ChannelWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        self.tx
            .send(buf.to_vec())
            .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "stream reader closed"))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// `Read` half of a worker channel. Reports end of stream once every
/// writer has been dropped.
pub struct ChannelReader {
    rx: Receiver<Vec<u8>>,
    chunk: Vec<u8>,
    pos: usize,
}

impl Read for ChannelReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        while self.pos >= self.chunk.len() {
            match self.rx.recv() {
                Ok(next) => {
                    self.chunk = next;
                    self.pos = 0;
                }
                Err(_) => return Ok(0),
            }
        }
        let n = buf.len().min(self.chunk.len() - self.pos);
        buf[..n].copy_from_slice(&self.chunk[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

/// A connected writer/reader pair.
pub fn channel() -> (ChannelWriter, ChannelReader) {
    let (tx, rx) = bounded(CHANNEL_DEPTH);
    (
        ChannelWriter { tx },
        ChannelReader {
            rx,
            chunk: Vec::new(),
            pos: 0,
        },
    )
}

/// Run a push-based encoder on a worker and stream its output into `sink`.
///
/// `produce` writes the encoded stream into the supplied [`ChannelWriter`];
/// the calling thread pipes it into `sink`. If `produce` fails the sink
/// receives a truncated stream and the producer's error is returned. If the
/// sink fails the channel is closed, the producer's next write fails and the
/// sink error is returned.
pub fn run_producer<F, W>(produce: F, sink: W) -> Result<u64>
where
    F: FnOnce(ChannelWriter) -> io::Result<()> + Send,
    W: Write,
{
    let (writer, reader) = channel();
    thread::scope(|s| {
        let worker = s.spawn(move || produce(writer));
        let piped = pipe(reader, sink);
        let produced = join(worker)?;

        match (produced, piped) {
            (Err(source), Ok(_)) => Err(FsOpError::Stream {
                side: StreamSide::Source,
                source,
            }),
            (_, Err(e)) => Err(e),
            (Ok(()), Ok(n)) => Ok(n),
        }
    })
}

/// Stream `source` into a pull-based decoder running on a worker.
///
/// `consume` reads the stream from the supplied [`ChannelReader`]. Whatever
/// it leaves unread after succeeding is drained, so trailing padding never
/// looks like a failure. A source error closes the channel (the decoder sees
/// end of stream) and is returned. A decoder error closes the channel from
/// the other end; the decoder's own error is returned rather than the
/// resulting broken pipe.
pub fn run_consumer<R, F>(source: R, consume: F) -> Result<u64>
where
    R: Read,
    F: FnOnce(&mut ChannelReader) -> io::Result<()> + Send,
{
    let (writer, mut reader) = channel();
    thread::scope(|s| {
        let worker = s.spawn(move || {
            consume(&mut reader)?;
            io::copy(&mut reader, &mut io::sink()).map(|_| ())
        });
        let piped = pipe(source, writer);
        let consumed = join(worker)?;

        match (piped, consumed) {
            (Err(e @ FsOpError::Stream { side: StreamSide::Source, .. }), _) => Err(e),
            (_, Err(source)) => Err(FsOpError::Stream {
                side: StreamSide::Sink,
                source,
            }),
            (Err(e), Ok(())) => Err(e),
            (Ok(n), Ok(())) => Ok(n),
        }
    })
}

fn join<T>(handle: thread::ScopedJoinHandle<'_, T>) -> Result<T> {
    handle.join().map_err(|panic| {
        let msg = panic
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| panic.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "worker panicked".to_string());
        FsOpError::Worker(msg)
    })
}
