#![allow(dead_code)]

use std::io::Write;

use nspkit::DataOrigin;
use tempfile::NamedTempFile;

/// Build a PFS0 image with entries packed back to back after the string
/// table. Offsets are written relative to `origin`.
pub fn build(files: &[(&str, &[u8])], origin: DataOrigin) -> Vec<u8> {
    let mut strings = Vec::new();
    let mut name_offsets = Vec::new();
    for (name, _) in files {
        name_offsets.push(strings.len() as u32);
        strings.extend_from_slice(name.as_bytes());
        strings.push(0);
    }

    let mut out = Vec::new();
    out.extend_from_slice(b"PFS0");
    out.extend_from_slice(&(files.len() as u32).to_le_bytes());
    out.extend_from_slice(&(strings.len() as u32).to_le_bytes());
    out.extend_from_slice(&[0u8; 4]);

    let mut offset = match origin {
        DataOrigin::AfterEntryTable => strings.len() as u64,
        DataOrigin::AfterStringTable => 0,
    };
    for ((_, data), name_offset) in files.iter().zip(&name_offsets) {
        out.extend_from_slice(&offset.to_le_bytes());
        out.extend_from_slice(&(data.len() as u64).to_le_bytes());
        out.extend_from_slice(&name_offset.to_le_bytes());
        out.extend_from_slice(&[0u8; 4]);
        offset += data.len() as u64;
    }

    out.extend_from_slice(&strings);
    for (_, data) in files {
        out.extend_from_slice(data);
    }
    out
}

pub fn image(files: &[(&str, &[u8])]) -> Vec<u8> {
    build(files, DataOrigin::AfterEntryTable)
}

pub fn write_temp(bytes: &[u8]) -> NamedTempFile {
    let mut f = NamedTempFile::new().unwrap();
    f.write_all(bytes).unwrap();
    f.flush().unwrap();
    f
}

/// Deterministic filler so neighbouring entries never look alike.
pub fn pattern(len: usize, seed: u8) -> Vec<u8> {
    (0..len)
        .map(|i| (i as u8).wrapping_mul(31).wrapping_add(seed))
        .collect()
}
