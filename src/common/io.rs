use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

use crate::error::Error;

/// Readable end of an invocation: standard input or an opened file.
pub enum Source {
    Stdin(io::StdinLock<'static>),
    File(File),
}

impl Read for Source {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Source::Stdin(s) => s.read(buf),
            Source::File(f) => f.read(buf),
        }
    }
}

/// Writable end of an invocation: standard output or a created file.
pub enum Sink {
    Stdout(io::StdoutLock<'static>),
    File(File),
}

impl Write for Sink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Sink::Stdout(s) => s.write(buf),
            Sink::File(f) => f.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Sink::Stdout(s) => s.flush(),
            Sink::File(f) => f.flush(),
        }
    }
}

/// A missing path, a blank path, and the conventional "-" all mean stdio.
fn is_stdio(path: &str) -> bool {
    let p = path.trim();
    p.is_empty() || p == "-"
}

/// Bind the input stream: the named file, or standard input when `path`
/// is absent, blank, or "-". A missing file is reported as `NotFound`
/// with the path.
pub fn open_source(path: Option<&str>) -> Result<Source, Error> {
    match path {
        Some(p) if !is_stdio(p) => match File::open(Path::new(p)) {
            Ok(f) => Ok(Source::File(f)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(Error::NotFound(p.to_string()))
            }
            Err(e) => Err(Error::Io(e)),
        },
        _ => Ok(Source::Stdin(io::stdin().lock())),
    }
}

/// Bind the output stream: create-or-truncate the named file, or standard
/// output when `path` is absent, blank, or "-".
pub fn open_sink(path: Option<&str>) -> Result<Sink, Error> {
    match path {
        Some(p) if !is_stdio(p) => Ok(Sink::File(File::create(Path::new(p))?)),
        _ => Ok(Sink::Stdout(io::stdout().lock())),
    }
}

/// Read as many bytes as possible into buf, retrying on partial reads.
/// Keeps read chunks full-sized on pipes and slow devices so the codec
/// sees the chunk geometry it was tuned for.
/// Fast path: regular file reads usually return the full buffer on the
/// first call.
#[inline]
pub fn read_full(reader: &mut impl Read, buf: &mut [u8]) -> io::Result<usize> {
    let n = reader.read(buf)?;
    if n == buf.len() || n == 0 {
        return Ok(n);
    }
    let mut total = n;
    while total < buf.len() {
        match reader.read(&mut buf[total..]) {
            Ok(0) => break,
            Ok(n) => total += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(total)
}
