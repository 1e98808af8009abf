// src/csv.rs
use std::io::{self, Write};
use std::mem::take;

/* ---------------- Parsing ---------------- */

/// Read CSV text back into rows: quoted cells, doubled quotes, LF or CRLF
/// line ends. Blank lines are skipped.
///
/// The library itself only writes CSV; this reads artifacts back in tests
/// and ad-hoc tooling.
pub fn parse_rows(text: &str, sep: char) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut rest = text;
    while !rest.is_empty() {
        let (record, tail) = split_record(rest, sep);
        rest = tail;
        if !(record.len() == 1 && record[0].is_empty()) {
            rows.push(record);
        }
    }
    rows
}

/// Take one record off the front of `text`; returns it and whatever follows
/// its line break. An unterminated quote runs to the end of the input.
fn split_record(text: &str, sep: char) -> (Vec<String>, &str) {
    let mut record = Vec::new();
    let mut cell = s!();
    let mut quoted = false;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if quoted {
            match c {
                '"' => {
                    if chars.next_if(|&(_, n)| n == '"').is_some() {
                        cell.push('"');
                    } else {
                        quoted = false;
                    }
                }
                _ => cell.push(c),
            }
            continue;
        }
        match c {
            '"' => quoted = true,
            '\r' | '\n' => {
                record.push(cell);
                let mut end = i + 1;
                if c == '\r' && text[end..].starts_with('\n') {
                    end += 1;
                }
                return (record, &text[end..]);
            }
            c if c == sep => record.push(take(&mut cell)),
            _ => cell.push(c),
        }
    }
    record.push(cell);
    (record, "")
}

/* ---------------- Writing ---------------- */

fn needs_quotes(field: &str, sep: char) -> bool {
    field.contains(sep) || field.contains('"') || field.contains('\n') || field.contains('\r')
}

/// Write one row. Fields holding the separator, a quote or a line break are
/// quoted with inner quotes doubled.
pub fn write_row<W: Write, S: AsRef<str>>(mut w: W, row: &[S], sep: char) -> io::Result<()> {
    let mut first = true;
    for cell in row {
        let cell = cell.as_ref();
        if !first { write!(w, "{}", sep)?; } else { first = false; }
        if needs_quotes(cell, sep) {
            write!(w, "\"{}\"", cell.replace('"', "\"\""))?;
        } else {
            write!(w, "{}", cell)?;
        }
    }
    writeln!(w)
}

/// Header (if any) plus rows as one string.
pub fn rows_to_string(headers: Option<&[String]>, rows: &[Vec<String>], sep: char) -> String {
    let mut buf: Vec<u8> = Vec::new();

    // Writes into a Vec<u8> cannot fail.
    if let Some(h) = headers {
        let _ = write_row(&mut buf, h, sep);
    }
    for r in rows {
        let _ = write_row(&mut buf, r, sep);
    }

    match String::from_utf8(buf) {
        Ok(s) => s,
        Err(e) => String::from_utf8_lossy(&e.into_bytes()).into_owned(),
    }
}
