//! In-memory storage implementation for testing and tooling.

use std::collections::HashMap;
use std::io::{Cursor, Read, Seek, SeekFrom, Write};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::Result;
use crate::storage::traits::{Storage, StorageConfig, StorageError, StorageInput, StorageOutput};

type FileMap = Arc<Mutex<HashMap<String, Box<[u8]>>>>;

/// An in-memory storage implementation.
///
/// Files become visible when their output is closed (or dropped). A rename
/// is a single update under the map lock, so readers observe either the old
/// or the new contents of the destination.
#[derive(Debug)]
pub struct MemoryStorage {
    /// The files stored in memory.
    files: FileMap,
    /// Storage configuration.
    #[allow(dead_code)]
    config: StorageConfig,
    /// Whether the storage is closed.
    closed: bool,
}

impl MemoryStorage {
    /// Create a new memory storage.
    pub fn new(config: StorageConfig) -> Self {
        MemoryStorage {
            files: Arc::new(Mutex::new(HashMap::new())),
            config,
            closed: false,
        }
    }

    /// Create a new memory storage with default configuration.
    pub fn new_default() -> Self {
        Self::new(StorageConfig::default())
    }

    /// Check if the storage is closed.
    fn check_closed(&self) -> Result<()> {
        if self.closed {
            Err(StorageError::StorageClosed.into())
        } else {
            Ok(())
        }
    }

    /// Get the number of files stored.
    pub fn file_count(&self) -> usize {
        self.files.lock().len()
    }

    /// Copy out the full contents of a file.
    pub fn read_all(&self, name: &str) -> Result<Vec<u8>> {
        self.check_closed()?;

        let files = self.files.lock();
        let data = files
            .get(name)
            .ok_or_else(|| StorageError::FileNotFound(name.to_string()))?;
        Ok(data.to_vec())
    }

    /// Store a file in one step, replacing any existing contents.
    pub fn write_all(&self, name: &str, data: &[u8]) -> Result<()> {
        self.check_closed()?;

        self.files.lock().insert(name.to_string(), data.into());
        Ok(())
    }
}

impl Storage for MemoryStorage {
    fn open_input(&self, name: &str) -> Result<Box<dyn StorageInput>> {
        self.check_closed()?;

        let files = self.files.lock();
        let data = files
            .get(name)
            .ok_or_else(|| StorageError::FileNotFound(name.to_string()))?;

        Ok(Box::new(MemoryInput::new(data.to_vec())))
    }

    fn create_output(&self, name: &str) -> Result<Box<dyn StorageOutput>> {
        self.check_closed()?;

        Ok(Box::new(MemoryOutput::new(
            name.to_string(),
            Arc::clone(&self.files),
        )))
    }

    fn file_exists(&self, name: &str) -> bool {
        if self.closed {
            return false;
        }

        self.files.lock().contains_key(name)
    }

    fn delete_file(&self, name: &str) -> Result<()> {
        self.check_closed()?;

        self.files.lock().remove(name);
        Ok(())
    }

    fn list_files(&self) -> Result<Vec<String>> {
        self.check_closed()?;

        let mut file_names: Vec<String> = self.files.lock().keys().cloned().collect();
        file_names.sort();
        Ok(file_names)
    }

    fn file_size(&self, name: &str) -> Result<u64> {
        self.check_closed()?;

        let files = self.files.lock();
        let data = files
            .get(name)
            .ok_or_else(|| StorageError::FileNotFound(name.to_string()))?;

        Ok(data.len() as u64)
    }

    fn rename_file(&self, old_name: &str, new_name: &str) -> Result<()> {
        self.check_closed()?;

        let mut files = self.files.lock();
        let data = files
            .remove(old_name)
            .ok_or_else(|| StorageError::FileNotFound(old_name.to_string()))?;

        files.insert(new_name.to_string(), data);
        Ok(())
    }

    fn sync(&self) -> Result<()> {
        self.check_closed()?;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.closed = true;
        Ok(())
    }
}

/// A memory-based input implementation.
#[derive(Debug)]
pub struct MemoryInput {
    cursor: Cursor<Vec<u8>>,
    size: u64,
}

impl MemoryInput {
    /// Wrap a byte buffer as a storage input.
    pub fn new(data: Vec<u8>) -> Self {
        let size = data.len() as u64;
        MemoryInput {
            cursor: Cursor::new(data),
            size,
        }
    }
}

impl Read for MemoryInput {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.cursor.read(buf)
    }
}

impl Seek for MemoryInput {
    fn seek(&mut self, pos: SeekFrom) -> std::io::Result<u64> {
        self.cursor.seek(pos)
    }
}

impl StorageInput for MemoryInput {
    fn size(&self) -> Result<u64> {
        Ok(self.size)
    }

    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

/// A memory-based output implementation.
#[derive(Debug)]
pub struct MemoryOutput {
    name: String,
    buffer: Vec<u8>,
    files: FileMap,
    closed: bool,
}

impl MemoryOutput {
    fn new(name: String, files: FileMap) -> Self {
        MemoryOutput {
            name,
            buffer: Vec::new(),
            files,
            closed: false,
        }
    }
}

impl Write for MemoryOutput {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        if self.closed {
            return Err(std::io::Error::other("Output is closed"));
        }

        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl StorageOutput for MemoryOutput {
    fn flush_and_sync(&mut self) -> Result<()> {
        Ok(())
    }

    fn position(&self) -> Result<u64> {
        Ok(self.buffer.len() as u64)
    }

    fn close(&mut self) -> Result<()> {
        if !self.closed {
            let data = std::mem::take(&mut self.buffer).into_boxed_slice();
            self.files.lock().insert(self.name.clone(), data);
            self.closed = true;
        }
        Ok(())
    }
}

impl Drop for MemoryOutput {
    fn drop(&mut self) {
        // Ensure the file is stored when the output is dropped
        let _ = self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage_roundtrip() {
        let storage = MemoryStorage::new_default();

        let mut output = storage.create_output("segments").unwrap();
        output.write_all(b"Hello, Memory!").unwrap();
        assert_eq!(output.position().unwrap(), 14);
        output.close().unwrap();

        let mut input = storage.open_input("segments").unwrap();
        let mut buffer = Vec::new();
        input.read_to_end(&mut buffer).unwrap();

        assert_eq!(buffer, b"Hello, Memory!");
        assert_eq!(input.size().unwrap(), 14);
        assert_eq!(storage.file_count(), 1);
    }

    #[test]
    fn test_output_invisible_until_closed() {
        let storage = MemoryStorage::new_default();

        let mut output = storage.create_output("segments.new").unwrap();
        output.write_all(b"partial").unwrap();
        assert!(!storage.file_exists("segments.new"));

        output.close().unwrap();
        assert!(storage.file_exists("segments.new"));
        assert!(output.write_all(b"more").is_err());
    }

    #[test]
    fn test_dropped_output_is_stored() {
        let storage = MemoryStorage::new_default();
        {
            let mut output = storage.create_output("segments.new").unwrap();
            output.write_all(b"abc").unwrap();
        }
        assert_eq!(storage.read_all("segments.new").unwrap(), b"abc");
    }

    #[test]
    fn test_rename_replaces_destination() {
        let storage = MemoryStorage::new_default();
        storage.write_all("segments", b"old").unwrap();
        storage.write_all("segments.new", b"new").unwrap();

        storage.rename_file("segments.new", "segments").unwrap();

        assert_eq!(storage.read_all("segments").unwrap(), b"new");
        assert_eq!(storage.list_files().unwrap(), vec!["segments"]);
    }

    #[test]
    fn test_missing_files() {
        let storage = MemoryStorage::new_default();

        assert!(storage.open_input("segments").unwrap_err().is_not_found());
        assert!(storage.file_size("segments").unwrap_err().is_not_found());
        assert!(
            storage
                .rename_file("segments.new", "segments")
                .unwrap_err()
                .is_not_found()
        );
        storage.delete_file("segments").unwrap();
    }

    #[test]
    fn test_closed_storage() {
        let mut storage = MemoryStorage::new_default();
        storage.write_all("segments", b"x").unwrap();
        storage.close().unwrap();

        assert!(!storage.file_exists("segments"));
        assert!(storage.open_input("segments").is_err());
        assert!(storage.list_files().is_err());
    }
}
