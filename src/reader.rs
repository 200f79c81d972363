//! Incremental reads of the tailed file.

use crate::error::Result;
use std::io::SeekFrom;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tracing::{debug, warn};

/// Read the bytes appended to `file_path` since `previous_length` and advance
/// the cursor past them.
///
/// The file is opened for plain shared reading on every call and closed again
/// before returning, so a concurrent writer is never locked out. The length is
/// captured once right after opening and the read is bounded to it; anything
/// appended while the read is in flight is left for the next call.
///
/// A multibyte character cut off at the end of the read stays behind the
/// cursor so it is decoded whole once the rest of it is written.
///
/// If the file is now shorter than the cursor it was truncated or replaced, and
/// the cursor restarts from zero. On error the cursor is left untouched.
pub(crate) async fn read_increment(file_path: &Path, previous_length: &mut u64) -> Result<String> {
    let mut file = File::open(file_path).await?;
    let observed_length = file.metadata().await?.len();

    if detect_file_truncation(observed_length, *previous_length) {
        warn!(
            path = %file_path.display(),
            previous_length = *previous_length,
            observed_length,
            "file shrank, reading again from the start"
        );
        *previous_length = 0;
    }

    let bytes_to_read = match calculate_bytes_to_read(observed_length, *previous_length) {
        Some(bytes) => bytes,
        None => return Ok(String::new()),
    };

    file.seek(SeekFrom::Start(*previous_length)).await?;

    let mut buf = Vec::new();
    let read = file.take(bytes_to_read).read_to_end(&mut buf).await?;
    buf.truncate(read - incomplete_tail_len(&buf));

    *previous_length += buf.len() as u64;
    debug!(bytes = read, cursor = *previous_length, "read increment");

    Ok(decode_text(buf))
}

/// Decode raw bytes as UTF-8, replacing invalid sequences.
fn decode_text(buf: Vec<u8>) -> String {
    match String::from_utf8(buf) {
        Ok(text) => text,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    }
}

/// Number of trailing bytes that start a UTF-8 character but do not finish it.
fn incomplete_tail_len(buf: &[u8]) -> usize {
    let window = buf.len().saturating_sub(3);
    let Some(start) = (window..buf.len()).rev().find(|&i| buf[i] & 0xC0 != 0x80) else {
        return 0;
    };
    match std::str::from_utf8(&buf[start..]) {
        Err(e) if e.valid_up_to() == 0 && e.error_len().is_none() => buf.len() - start,
        _ => 0,
    }
}

fn detect_file_truncation(current_size: u64, last_position: u64) -> bool {
    current_size < last_position
}

fn calculate_bytes_to_read(current_size: u64, last_position: u64) -> Option<u64> {
    if current_size <= last_position {
        None
    } else {
        Some(current_size - last_position)
    }
}
