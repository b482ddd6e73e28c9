//! JSON-lines dump reader
//!
//! Streams a Wiktextract dump one line at a time, optionally through a bzip2
//! decoder. Lines are handed out as raw bytes so that invalid UTF-8 surfaces
//! as a per-record parse failure instead of an I/O error.

use super::source::{DumpFormat, DumpLine, DumpSource, ImportError};
use bzip2::read::BzDecoder;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

const READ_BUFFER: usize = 1024 * 1024;

/// JSON-lines dump source
pub struct JsonlSource {
    name: String,
    reader: Box<dyn BufRead>,
    bytes_read: u64,
    line_number: u64,
}

impl JsonlSource {
    /// Open a `.jsonl` or `.jsonl.bz2` dump, detecting compression from the name
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ImportError> {
        let path = path.as_ref();
        let format = DumpFormat::detect(path).unwrap_or(DumpFormat::JsonLines);
        Self::open_as(path, format)
    }

    /// Open a dump with an explicit format
    pub fn open_as(path: impl AsRef<Path>, format: DumpFormat) -> Result<Self, ImportError> {
        let path: PathBuf = path.as_ref().to_path_buf();
        let file = File::open(&path)?;

        let reader: Box<dyn BufRead> = match format {
            DumpFormat::JsonLinesBz2 => {
                Box::new(BufReader::with_capacity(READ_BUFFER, BzDecoder::new(file)))
            }
            DumpFormat::JsonLines => Box::new(BufReader::with_capacity(READ_BUFFER, file)),
        };

        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("jsonl dump")
            .to_string();

        Ok(Self::with_reader(name, reader))
    }

    /// Wrap an already-open reader
    pub fn from_reader(name: impl Into<String>, reader: impl Read + 'static) -> Self {
        Self::with_reader(name.into(), Box::new(BufReader::new(reader)))
    }

    fn with_reader(name: String, reader: Box<dyn BufRead>) -> Self {
        Self {
            name,
            reader,
            bytes_read: 0,
            line_number: 0,
        }
    }

    /// Read the next non-blank line, or None at end of input
    fn next_line(&mut self) -> Result<Option<DumpLine>, ImportError> {
        loop {
            let mut buf = Vec::new();
            let n = self.reader.read_until(b'\n', &mut buf)?;
            if n == 0 {
                return Ok(None);
            }
            self.bytes_read += n as u64;
            self.line_number += 1;

            while matches!(buf.last(), Some(b'\n' | b'\r')) {
                buf.pop();
            }
            if buf.iter().all(|b| b.is_ascii_whitespace()) {
                continue;
            }

            return Ok(Some(DumpLine {
                number: self.line_number,
                bytes: buf,
            }));
        }
    }
}

impl DumpSource for JsonlSource {
    fn iter_lines(&mut self) -> Box<dyn Iterator<Item = Result<DumpLine, ImportError>> + '_> {
        Box::new(JsonlIterator { source: self })
    }

    fn byte_position(&self) -> u64 {
        self.bytes_read
    }

    fn source_name(&self) -> &str {
        &self.name
    }
}

/// Iterator over lines of a JSON-lines dump
struct JsonlIterator<'a> {
    source: &'a mut JsonlSource,
}

impl<'a> Iterator for JsonlIterator<'a> {
    type Item = Result<DumpLine, ImportError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.source.next_line().transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bzip2::write::BzEncoder;
    use bzip2::Compression;
    use std::io::{Cursor, Write};

    const SAMPLE: &str = "{\"word\": \"dog\", \"lang_code\": \"en\"}\n\n   \n{\"word\": \"Hund\"}\r\nnot json\n";

    #[test]
    fn test_skips_blank_lines_but_counts_them() {
        let mut source = JsonlSource::from_reader("sample", Cursor::new(SAMPLE.as_bytes().to_vec()));
        let lines: Vec<DumpLine> = source.iter_lines().map(|l| l.unwrap()).collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].number, 1);
        assert_eq!(lines[1].number, 4);
        assert_eq!(lines[1].bytes, b"{\"word\": \"Hund\"}");
        assert_eq!(lines[2].number, 5);
        assert_eq!(source.byte_position(), SAMPLE.len() as u64);
    }

    #[test]
    fn test_open_plain_file() {
        let mut temp_file = tempfile::Builder::new().suffix(".jsonl").tempfile().unwrap();
        temp_file.write_all(SAMPLE.as_bytes()).unwrap();

        let mut source = JsonlSource::open(temp_file.path()).unwrap();
        assert_eq!(source.iter_lines().count(), 3);
    }

    #[test]
    fn test_open_bzip2_file() {
        let mut temp_file = tempfile::Builder::new().suffix(".jsonl.bz2").tempfile().unwrap();
        {
            let mut encoder = BzEncoder::new(&mut temp_file, Compression::fast());
            encoder.write_all(SAMPLE.as_bytes()).unwrap();
            encoder.finish().unwrap();
        }

        let mut source = JsonlSource::open(temp_file.path()).unwrap();
        let lines: Vec<DumpLine> = source.iter_lines().map(|l| l.unwrap()).collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[2].bytes, b"not json");
    }

    #[test]
    fn test_invalid_utf8_is_not_an_io_error() {
        let bytes = vec![b'{', 0xff, 0xfe, b'}', b'\n'];
        let mut source = JsonlSource::from_reader("bad", Cursor::new(bytes));
        let lines: Vec<_> = source.iter_lines().collect();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].is_ok());
    }
}
