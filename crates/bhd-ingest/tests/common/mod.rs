//! Shared fixtures for the ingest integration tests
#![allow(dead_code)]

use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;

pub const FILE_ID: &str = "1HeLmEtDaTaSeT_id";

/// Share link in the layout Drive hands out
pub fn share_link(file_id: &str) -> String {
    format!("https://drive.google.com/file/d/{}/view?usp=sharing", file_id)
}

/// Build a zip archive in memory; names ending in `/` become directories
pub fn zip_bytes(entries: &[(&str, &str)]) -> Vec<u8> {
    let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();

    for (name, contents) in entries {
        if name.ends_with('/') {
            zip.add_directory(*name, options).unwrap();
        } else {
            zip.start_file(*name, options).unwrap();
            zip.write_all(contents.as_bytes()).unwrap();
        }
    }

    zip.finish().unwrap().into_inner()
}

/// A small helmet dataset laid out like the real one
pub fn helmet_dataset() -> Vec<u8> {
    zip_bytes(&[
        ("train/", ""),
        ("train/images/bike_001.jpg", "jpeg"),
        ("train/labels/bike_001.txt", "0 0.41 0.22 0.10 0.12"),
        ("valid/", ""),
        ("valid/images/bike_101.jpg", "jpeg"),
        ("data.yaml", "nc: 2\nnames: ['With Helmet', 'Without Helmet']\n"),
    ])
}

/// Restores the process working directory when dropped
pub struct CwdGuard {
    previous: PathBuf,
}

impl CwdGuard {
    pub fn enter(dir: &Path) -> Self {
        let previous = std::env::current_dir().unwrap();
        std::env::set_current_dir(dir).unwrap();
        Self { previous }
    }
}

impl Drop for CwdGuard {
    fn drop(&mut self) {
        let _ = std::env::set_current_dir(&self.previous);
    }
}
