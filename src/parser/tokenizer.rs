//! Logical line reader for metadata files.
//!
//! Physical lines are joined and stripped according to three rules:
//!
//! - `#` starts a comment running to the end of the physical line
//! - `\#` is a literal `#`
//! - `\` immediately before a line delimiter joins the next physical line
//!
//! Any other backslash is kept together with the character it precedes, so
//! shell escapes inside flag values survive until the shell splitter sees
//! them.

use std::io::{self, BufRead};

/// C `isspace` semantics: space, `\t`, `\n`, `\v`, `\f`, `\r`.
#[must_use]
pub const fn is_space(c: u8) -> bool {
    matches!(c, b' ' | b'\t' | b'\n' | 0x0b | 0x0c | b'\r')
}

/// Strip leading and trailing ASCII whitespace.
#[must_use]
pub fn trim(s: &str) -> &str {
    s.trim_matches(|c: char| c.is_ascii() && is_space(c as u8))
}

fn next_byte<R: BufRead>(reader: &mut R) -> io::Result<Option<u8>> {
    let byte = peek_byte(reader)?;
    if byte.is_some() {
        reader.consume(1);
    }
    Ok(byte)
}

fn peek_byte<R: BufRead>(reader: &mut R) -> io::Result<Option<u8>> {
    loop {
        match reader.fill_buf() {
            Ok(buf) => return Ok(buf.first().copied()),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
}

/// Consume the second half of a `\r\n` or `\n\r` delimiter pair.
fn skip_paired_delimiter<R: BufRead>(reader: &mut R, first: u8) -> io::Result<()> {
    let partner = if first == b'\n' {
        b'\r'
    } else {
        b'\n'
    };

    if peek_byte(reader)? == Some(partner) {
        reader.consume(1);
    }
    Ok(())
}

/// Read one logical line.
///
/// Returns `Ok(None)` only when the stream was already exhausted; a stream
/// ending in an empty line still yields `Some("")` for that line.
///
/// # Errors
///
/// Returns any I/O error raised by the underlying reader.
pub fn read_logical_line<R: BufRead>(reader: &mut R) -> io::Result<Option<String>> {
    let mut line = Vec::new();
    let mut quoted = false;
    let mut comment = false;
    let mut n_read = 0usize;

    while let Some(c) = next_byte(reader)? {
        n_read += 1;

        if quoted {
            quoted = false;
            match c {
                b'#' => line.push(b'#'),
                b'\n' | b'\r' => skip_paired_delimiter(reader, c)?,
                _ => {
                    line.push(b'\\');
                    line.push(c);
                }
            }
            continue;
        }

        match c {
            b'#' => comment = true,
            b'\\' if !comment => quoted = true,
            b'\n' | b'\r' => {
                skip_paired_delimiter(reader, c)?;
                break;
            }
            _ if !comment => line.push(c),
            _ => {}
        }
    }

    // A backslash as the final character of the stream is kept alone.
    if quoted {
        line.push(b'\\');
    }

    if n_read == 0 {
        return Ok(None);
    }

    Ok(Some(String::from_utf8_lossy(&line).into_owned()))
}
