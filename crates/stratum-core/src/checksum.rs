//! CRC-32 content checksum for change detection.
//!
//! The checksum is insensitive to how lines are wrapped: a leading
//! byte-order mark is stripped and every newline removed before
//! hashing, so re-flowing a file without touching its text keeps the
//! checksum stable. Everything else - including carriage returns and
//! trailing whitespace - is significant.

/// Compute the signed CRC-32 checksum of migration file content.
pub fn content_checksum(content: &str) -> i32 {
    let stripped = content.strip_prefix('\u{feff}').unwrap_or(content);
    let joined: String = stripped.chars().filter(|c| *c != '\n').collect();
    crc32fast::hash(joined.as_bytes()) as i32
}

#[cfg(test)]
#[path = "checksum_test.rs"]
mod tests;
