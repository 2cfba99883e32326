//! Structured file I/O for the catalog's binary layout.
//!
//! Integers are written big-endian, two's complement. Strings carry a 4-byte
//! signed length prefix followed by their UTF-8 bytes. A read that runs past
//! the end of the stream is reported as [`SegcatError::CorruptFormat`] rather
//! than as a bare I/O error, because for a catalog it always means the file
//! was cut short.

use std::io::{self, Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

use crate::error::{Result, SegcatError};
use crate::storage::{StorageInput, StorageOutput};

/// A structured writer for binary data.
pub struct StructWriter<W: Write> {
    writer: W,
    position: u64,
}

impl<W: Write> StructWriter<W> {
    /// Create a new structured writer.
    pub fn new(writer: W) -> Self {
        StructWriter {
            writer,
            position: 0,
        }
    }

    /// Write an i32 value (big-endian).
    pub fn write_i32(&mut self, value: i32) -> Result<()> {
        self.writer.write_i32::<BigEndian>(value)?;
        self.position += 4;
        Ok(())
    }

    /// Write an i64 value (big-endian).
    pub fn write_i64(&mut self, value: i64) -> Result<()> {
        self.writer.write_i64::<BigEndian>(value)?;
        self.position += 8;
        Ok(())
    }

    /// Write a string with a 4-byte length prefix.
    pub fn write_string(&mut self, value: &str) -> Result<()> {
        let bytes = value.as_bytes();
        let length = i32::try_from(bytes.len()).map_err(|_| {
            SegcatError::invalid_argument(format!("string of {} bytes is too long", bytes.len()))
        })?;
        self.write_i32(length)?;
        self.writer.write_all(bytes)?;
        self.position += bytes.len() as u64;
        Ok(())
    }

    /// Get current position.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Flush and return the underlying writer.
    pub fn into_inner(mut self) -> Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

impl<W: StorageOutput> StructWriter<W> {
    /// Close the underlying output, which flushes and syncs it once.
    pub fn close(mut self) -> Result<()> {
        self.writer.close()
    }
}

/// A structured reader for binary data.
pub struct StructReader<R: StorageInput> {
    reader: R,
    position: u64,
    file_size: u64,
}

impl<R: StorageInput> StructReader<R> {
    /// Create a new structured reader.
    pub fn new(reader: R) -> Result<Self> {
        let file_size = reader.size()?;
        Ok(StructReader {
            reader,
            position: 0,
            file_size,
        })
    }

    /// Read an i32 value (big-endian).
    pub fn read_i32(&mut self) -> Result<i32> {
        let value = self
            .reader
            .read_i32::<BigEndian>()
            .map_err(|e| self.short_read(e, "int32"))?;
        self.position += 4;
        Ok(value)
    }

    /// Read an i64 value (big-endian).
    pub fn read_i64(&mut self) -> Result<i64> {
        let value = self
            .reader
            .read_i64::<BigEndian>()
            .map_err(|e| self.short_read(e, "int64"))?;
        self.position += 8;
        Ok(value)
    }

    /// Read a string with a 4-byte length prefix.
    pub fn read_string(&mut self) -> Result<String> {
        let length = self.read_i32()?;
        if length < 0 {
            return Err(SegcatError::corrupt_format(format!(
                "negative string length {length} at offset {}",
                self.position - 4
            )));
        }

        let length = length as u64;
        if length > self.remaining() {
            return Err(SegcatError::corrupt_format(format!(
                "string of {length} bytes at offset {} runs past end of file ({} bytes)",
                self.position, self.file_size
            )));
        }

        let mut bytes = vec![0u8; length as usize];
        self.reader
            .read_exact(&mut bytes)
            .map_err(|e| self.short_read(e, "string"))?;
        self.position += length;

        String::from_utf8(bytes)
            .map_err(|e| SegcatError::corrupt_format(format!("invalid UTF-8 in string: {e}")))
    }

    /// Get current position.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Get file size.
    pub fn size(&self) -> u64 {
        self.file_size
    }

    /// Bytes left between the current position and the end of the file.
    pub fn remaining(&self) -> u64 {
        self.file_size.saturating_sub(self.position)
    }

    /// Check if we're at end of file.
    pub fn is_eof(&self) -> bool {
        self.position >= self.file_size
    }

    /// Close the reader.
    pub fn close(mut self) -> Result<()> {
        self.reader.close()
    }

    fn short_read(&self, e: io::Error, what: &str) -> SegcatError {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            SegcatError::corrupt_format(format!(
                "unexpected end of file reading {what} at offset {} ({} bytes total)",
                self.position, self.file_size
            ))
        } else {
            e.into()
        }
    }
}
