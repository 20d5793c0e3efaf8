//! Delimited text reader producing one record at a time.
//!
//! Quoting rules:
//! - A field starting with `"` is quoted; it ends at the next lone `"`.
//! - Inside a quoted field `""` is a literal quote, and separators and line
//!   breaks are kept as text, so a record may span several lines.
//! - A `"` anywhere in an unquoted field is an error.
//!
//! `\r\n` is treated like `\n`, blank lines are skipped, and bytes that are
//! not valid UTF-8 are replaced rather than rejected.

use std::borrow::Cow;
use std::io::BufRead;

use tracing::warn;

use crate::error::{DelimiterError, ReadError};

/// Default field separator.
pub const DEFAULT_DELIMITER: char = ';';

/// Fields of one record, tagged with the line it started on (1-based).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub line: usize,
    pub fields: Vec<String>,
}

/// Streaming record reader over any buffered source.
pub struct RowReader<R> {
    reader: R,
    delimiter: char,
    line: usize,
    buf: Vec<u8>,
    done: bool,
}

impl<R: BufRead> RowReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            delimiter: DEFAULT_DELIMITER,
            line: 0,
            buf: Vec::new(),
            done: false,
        }
    }

    /// Use `delimiter` as the field separator.
    pub fn with_delimiter(mut self, delimiter: char) -> Result<Self, DelimiterError> {
        if matches!(delimiter, '"' | '\r' | '\n') {
            return Err(DelimiterError(delimiter));
        }
        self.delimiter = delimiter;
        Ok(self)
    }

    /// Number of physical lines consumed so far.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Read one physical line, normalising `\r\n` to `\n`.
    fn read_line(&mut self) -> std::io::Result<Option<String>> {
        self.buf.clear();
        if self.reader.read_until(b'\n', &mut self.buf)? == 0 {
            return Ok(None);
        }
        self.line += 1;

        if self.buf.ends_with(b"\r\n") {
            let len = self.buf.len();
            self.buf.truncate(len - 2);
            self.buf.push(b'\n');
        }

        match String::from_utf8_lossy(&self.buf) {
            Cow::Borrowed(text) => Ok(Some(text.to_string())),
            Cow::Owned(text) => {
                warn!(line = self.line, "Replaced invalid UTF-8 in input");
                Ok(Some(text))
            }
        }
    }

    /// Read the next record. `Ok(None)` means the input is exhausted.
    pub fn read_record(&mut self) -> Result<Option<Record>, ReadError> {
        if self.done {
            return Ok(None);
        }

        let mut line = loop {
            match self.read_line() {
                Ok(Some(text)) if text == "\n" => continue,
                Ok(Some(text)) => break text,
                Ok(None) => {
                    self.done = true;
                    return Ok(None);
                }
                Err(e) => {
                    self.done = true;
                    return Err(e.into());
                }
            }
        };

        let start_line = self.line;
        let delim_len = self.delimiter.len_utf8();
        let mut fields = Vec::new();
        let mut pos = 0;

        'fields: loop {
            let rest = &line[pos..];

            if !rest.starts_with('"') {
                let content = rest.strip_suffix('\n').unwrap_or(rest);
                let (field, next) = match content.find(self.delimiter) {
                    Some(i) => (&content[..i], Some(pos + i + delim_len)),
                    None => (content, None),
                };
                if let Some(q) = field.find('"') {
                    return Err(ReadError::BareQuote {
                        line: self.line,
                        column: column(&line, pos + q),
                    });
                }
                fields.push(field.to_string());
                match next {
                    Some(next) => pos = next,
                    None => break 'fields,
                }
                continue;
            }

            // Quoted field.
            pos += 1;
            let mut field = String::new();
            loop {
                let rest = &line[pos..];
                if let Some(i) = rest.find('"') {
                    field.push_str(&rest[..i]);
                    pos += i + 1;
                    let after = &line[pos..];
                    if after.starts_with('"') {
                        field.push('"');
                        pos += 1;
                    } else if after.starts_with(self.delimiter) {
                        pos += delim_len;
                        fields.push(field);
                        continue 'fields;
                    } else if after.is_empty() || after == "\n" {
                        fields.push(field);
                        break 'fields;
                    } else {
                        return Err(ReadError::ExtraneousQuote {
                            line: self.line,
                            column: column(&line, pos),
                        });
                    }
                } else if !rest.is_empty() {
                    field.push_str(rest);
                    match self.read_line() {
                        Ok(Some(text)) => {
                            line = text;
                            pos = 0;
                        }
                        Ok(None) => {
                            self.done = true;
                            return Err(ReadError::UnterminatedQuote { line: start_line });
                        }
                        Err(e) => {
                            self.done = true;
                            return Err(e.into());
                        }
                    }
                } else {
                    self.done = true;
                    return Err(ReadError::UnterminatedQuote { line: start_line });
                }
            }
        }

        Ok(Some(Record {
            line: start_line,
            fields,
        }))
    }
}

impl<R: BufRead> Iterator for RowReader<R> {
    type Item = Result<Record, ReadError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_record().transpose()
    }
}

/// 1-based character column of a byte offset within a line.
fn column(line: &str, byte_pos: usize) -> usize {
    line[..byte_pos].chars().count() + 1
}
