use std::io::{self, Read, Write};

use crate::common::io::read_full;
use crate::error::{Error, FormatError};

/// RFC 4648 standard alphabet.
const ALPHABET: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

const PAD: u8 = b'=';

/// Line terminator inserted when wrapping. Fixed to LF so encoded output
/// is byte-identical across platforms.
const LINE_BREAK: u8 = b'\n';

/// Encode-side read chunk: 96KB rounded down to a whole number of 3-byte
/// groups, thousands of quanta per read.
const ENCODE_CHUNK: usize = 96 * 1024 - (96 * 1024 % 3);

/// Decode-side read chunk: a multiple of the 4-character quantum.
const DECODE_CHUNK: usize = 128 * 1024;

/// Streaming encoder.
///
/// Carries the 0-2 input bytes that do not yet form a full 3-byte group,
/// plus the current output column, across `feed` calls, so the output is
/// byte-identical no matter how the input is chunked. A padded quantum is
/// only ever produced by `finish`.
pub struct Encoder {
    break_col: usize,
    col: usize,
    carry: [u8; 2],
    carry_len: usize,
    scratch: Vec<u8>,
}

impl Encoder {
    /// `break_col` is the wrap column; 0 disables line wrapping.
    pub fn new(break_col: usize) -> Self {
        Self {
            break_col,
            col: 0,
            carry: [0; 2],
            carry_len: 0,
            scratch: Vec::new(),
        }
    }

    /// Encode every full 3-byte group in `chunk`, prepending bytes carried
    /// from earlier feeds and holding back the 0-2 leftover bytes. Output
    /// for the whole chunk is batched into one `write_all`.
    pub fn feed(&mut self, chunk: &[u8], out: &mut impl Write) -> io::Result<()> {
        let mut rest = chunk;
        self.scratch.clear();
        let mut col = self.col;

        // Top up a partial carry to a full group before bulk processing.
        if self.carry_len > 0 {
            let need = 3 - self.carry_len;
            if rest.len() < need {
                self.carry[self.carry_len..self.carry_len + rest.len()].copy_from_slice(rest);
                self.carry_len += rest.len();
                return Ok(());
            }
            let mut group = [0u8; 3];
            group[..self.carry_len].copy_from_slice(&self.carry[..self.carry_len]);
            group[self.carry_len..].copy_from_slice(&rest[..need]);
            rest = &rest[need..];
            self.carry_len = 0;
            col = push_wrapped(&mut self.scratch, &encode_group(&group), col, self.break_col);
        }

        let mut groups = rest.chunks_exact(3);
        for group in &mut groups {
            col = push_wrapped(&mut self.scratch, &encode_group(group), col, self.break_col);
        }

        let tail = groups.remainder();
        self.carry[..tail.len()].copy_from_slice(tail);
        self.carry_len = tail.len();

        self.col = col;
        if !self.scratch.is_empty() {
            out.write_all(&self.scratch)?;
        }
        Ok(())
    }

    /// Pad and emit the final 1- or 2-byte group, if any.
    pub fn finish(&mut self, out: &mut impl Write) -> io::Result<()> {
        if self.carry_len == 0 {
            return Ok(());
        }
        let quantum = encode_final(&self.carry[..self.carry_len]);
        self.carry_len = 0;
        self.scratch.clear();
        self.col = push_wrapped(&mut self.scratch, &quantum, self.col, self.break_col);
        out.write_all(&self.scratch)
    }
}

/// 3 input bytes -> 4 alphabet characters.
#[inline]
fn encode_group(group: &[u8]) -> [u8; 4] {
    let buf = ((group[0] as u32) << 16) | ((group[1] as u32) << 8) | group[2] as u32;
    [
        ALPHABET[(buf >> 18) as usize & 0x3f],
        ALPHABET[(buf >> 12) as usize & 0x3f],
        ALPHABET[(buf >> 6) as usize & 0x3f],
        ALPHABET[buf as usize & 0x3f],
    ]
}

/// Encode the final 1- or 2-byte group with standard padding.
fn encode_final(tail: &[u8]) -> [u8; 4] {
    let mut buf = (tail[0] as u32) << 16;
    if tail.len() > 1 {
        buf |= (tail[1] as u32) << 8;
    }
    [
        ALPHABET[(buf >> 18) as usize & 0x3f],
        ALPHABET[(buf >> 12) as usize & 0x3f],
        if tail.len() > 1 {
            ALPHABET[(buf >> 6) as usize & 0x3f]
        } else {
            PAD
        },
        PAD,
    ]
}

/// Append encoded characters to `buf`, inserting a line break whenever the
/// column counter reaches `break_col`. Returns the updated column.
///
/// The break is written before the next character rather than after the
/// one that filled the line, so wraps land mid-quantum when the column
/// dictates and the output never ends with a dangling newline.
#[inline]
fn push_wrapped(buf: &mut Vec<u8>, chars: &[u8], mut col: usize, break_col: usize) -> usize {
    if break_col == 0 {
        buf.extend_from_slice(chars);
        return col;
    }
    for &ch in chars {
        if col == break_col {
            buf.push(LINE_BREAK);
            col = 0;
        }
        buf.push(ch);
        col += 1;
    }
    col
}

/// Streaming decoder.
///
/// Separator bytes (ASCII whitespace) are skipped anywhere; the remaining
/// meaningful characters accumulate into 4-character quanta carried across
/// `feed` calls. A quantum containing padding is decoded as the final one,
/// and any meaningful character after it is rejected.
pub struct Decoder {
    quad: [u8; 4],
    quad_len: usize,
    finished: bool,
    clean: Vec<u8>,
    scratch: Vec<u8>,
}

impl Decoder {
    pub fn new() -> Self {
        Self {
            quad: [0; 4],
            quad_len: 0,
            finished: false,
            clean: Vec::new(),
            scratch: Vec::new(),
        }
    }

    /// Decode every complete quantum available once `chunk`'s meaningful
    /// characters are appended to the carried partial quantum. Decoded
    /// bytes for the whole chunk are batched into one `write_all`.
    pub fn feed(&mut self, chunk: &[u8], out: &mut impl Write) -> Result<(), Error> {
        let has_separator = memchr::memchr(b'\n', chunk).is_some()
            || chunk.iter().any(|&b| is_separator(b));
        let clean: &[u8] = if has_separator {
            strip_separators(chunk, &mut self.clean);
            &self.clean
        } else {
            chunk
        };

        if clean.is_empty() {
            return Ok(());
        }
        if self.finished {
            return Err(FormatError::TrailingData.into());
        }

        self.scratch.clear();
        let mut rest = clean;

        // Top up the carried partial quantum first.
        if self.quad_len > 0 {
            let take = (4 - self.quad_len).min(rest.len());
            self.quad[self.quad_len..self.quad_len + take].copy_from_slice(&rest[..take]);
            self.quad_len += take;
            rest = &rest[take..];
            if self.quad_len < 4 {
                return Ok(());
            }
            self.quad_len = 0;
            let quad = self.quad;
            self.finished = decode_quad(&quad, &mut self.scratch)?;
        }

        let mut quads = rest.chunks_exact(4);
        for quad in &mut quads {
            if self.finished {
                return Err(FormatError::TrailingData.into());
            }
            self.finished = decode_quad(quad, &mut self.scratch)?;
        }

        let tail = quads.remainder();
        if !tail.is_empty() {
            if self.finished {
                return Err(FormatError::TrailingData.into());
            }
            self.quad[..tail.len()].copy_from_slice(tail);
            self.quad_len = tail.len();
        }

        if !self.scratch.is_empty() {
            out.write_all(&self.scratch)?;
        }
        Ok(())
    }

    /// Reject input whose meaningful character count was not a multiple
    /// of 4. Empty (or whitespace-only) input is fine: zero quanta.
    pub fn finish(&self) -> Result<(), Error> {
        if self.quad_len != 0 {
            return Err(FormatError::Truncated.into());
        }
        Ok(())
    }
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode one 4-character quantum into `out`. Returns true if the quantum
/// was padded, meaning it must have been the last one in the stream.
fn decode_quad(quad: &[u8], out: &mut Vec<u8>) -> Result<bool, FormatError> {
    // Padding may only occupy the last one or two positions.
    let data_len = match quad.iter().position(|&b| b == PAD) {
        None => 4,
        Some(pos) if pos >= 2 && quad[pos..].iter().all(|&b| b == PAD) => pos,
        Some(_) => return Err(FormatError::MisplacedPadding),
    };

    let mut buf = 0u32;
    for &ch in &quad[..data_len] {
        buf = (buf << 6) | decode_char(ch)? as u32;
    }
    buf <<= 6 * (4 - data_len);

    out.push((buf >> 16) as u8);
    if data_len > 2 {
        out.push((buf >> 8) as u8);
    }
    if data_len > 3 {
        out.push(buf as u8);
    }
    Ok(data_len < 4)
}

/// Map an alphabet character to its 6-bit value.
#[inline]
fn decode_char(ch: u8) -> Result<u8, FormatError> {
    match ch {
        b'A'..=b'Z' => Ok(ch - b'A'),
        b'a'..=b'z' => Ok(ch - b'a' + 26),
        b'0'..=b'9' => Ok(ch - b'0' + 52),
        b'+' => Ok(62),
        b'/' => Ok(63),
        _ => Err(FormatError::InvalidByte(ch)),
    }
}

/// ASCII whitespace the decoder skips: the line breaks our own wrapping
/// inserts, plus whatever a text pipeline may have added (\r\n, tabs).
#[inline]
fn is_separator(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | 0x0b | 0x0c)
}

/// Copy `data` into `clean` with separators removed. Newlines are by far
/// the most common separator, so they are stripped in bulk with memchr;
/// the rarer whitespace bytes only cost a second pass when present.
fn strip_separators(data: &[u8], clean: &mut Vec<u8>) {
    clean.clear();
    clean.reserve(data.len());
    let mut last = 0;
    for pos in memchr::memchr_iter(b'\n', data) {
        if pos > last {
            clean.extend_from_slice(&data[last..pos]);
        }
        last = pos + 1;
    }
    if last < data.len() {
        clean.extend_from_slice(&data[last..]);
    }
    if clean.iter().any(|&b| is_separator(b)) {
        clean.retain(|&b| !is_separator(b));
    }
}

/// Encode `reader` to `writer` in bounded memory, wrapping at `break_col`
/// characters (0 disables wrapping).
pub fn encode_stream(
    reader: &mut impl Read,
    writer: &mut impl Write,
    break_col: usize,
) -> Result<(), Error> {
    let mut encoder = Encoder::new(break_col);
    let mut buf = vec![0u8; ENCODE_CHUNK];
    loop {
        let n = read_full(reader, &mut buf)?;
        if n == 0 {
            break;
        }
        encoder.feed(&buf[..n], writer)?;
    }
    encoder.finish(writer)?;
    Ok(())
}

/// Decode `reader` to `writer` in bounded memory.
pub fn decode_stream(reader: &mut impl Read, writer: &mut impl Write) -> Result<(), Error> {
    let mut decoder = Decoder::new();
    let mut buf = vec![0u8; DECODE_CHUNK];
    loop {
        let n = read_full(reader, &mut buf)?;
        if n == 0 {
            break;
        }
        decoder.feed(&buf[..n], writer)?;
    }
    decoder.finish()
}
