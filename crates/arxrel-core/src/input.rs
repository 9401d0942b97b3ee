//! Local input streaming: plain or gzip-compressed JSON lines with byte counting.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use flate2::read::MultiGzDecoder;

/// Buffer size for the line reader (256KB)
const READ_BUF_SIZE: usize = 256 * 1024;

/// Shared counter of raw (compressed, if gzip) bytes read from disk
pub type ByteCounter = Arc<AtomicU64>;

/// Line reader over the input file, decompressing when needed
pub type InputReader = Box<dyn BufRead>;

/// `Read` adapter that counts bytes pulled from the underlying file.
pub struct CountingReader<R> {
    inner: R,
    counter: ByteCounter,
}

impl<R: Read> Read for CountingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.counter.fetch_add(n as u64, Ordering::Relaxed);
        Ok(n)
    }
}

/// Whether the path names a gzip file (by extension).
pub fn is_gzip(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "gz")
}

/// Open `path` for line-by-line reading.
///
/// Returns (reader, byte_counter, file_size). The counter tracks bytes read
/// from disk, so it is comparable to `file_size` for progress bars even when
/// the file is gzip-compressed.
pub fn open_input(path: &Path) -> io::Result<(InputReader, ByteCounter, Option<u64>)> {
    let file = File::open(path)?;
    let size = file.metadata().ok().map(|m| m.len());
    let counter = ByteCounter::default();
    let counting = CountingReader {
        inner: file,
        counter: counter.clone(),
    };

    let reader: InputReader = if is_gzip(path) {
        Box::new(BufReader::with_capacity(
            READ_BUF_SIZE,
            MultiGzDecoder::new(counting),
        ))
    } else {
        Box::new(BufReader::with_capacity(READ_BUF_SIZE, counting))
    };
    Ok((reader, counter, size))
}
