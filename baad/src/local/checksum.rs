//! CRC-32 checksum calculation for file verification.
//!
//! Upstream catalogs publish CRC-32 digests for most records; this is
//! the digest checked after a download completes and, optionally, when
//! auditing already-present files.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use crc32fast::Hasher;

/// Buffer size for reading files during checksum calculation (64KB).
const BUFFER_SIZE: usize = 64 * 1024;

/// Calculate the CRC-32 digest of a file by streaming its contents.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn file_crc32(path: &Path) -> io::Result<u32> {
    let mut file = File::open(path)?;
    let mut hasher = Hasher::new();
    let mut buffer = vec![0u8; BUFFER_SIZE];

    loop {
        let bytes_read = file.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(hasher.finalize())
}
