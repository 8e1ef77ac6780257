#![allow(dead_code)]

use image::{ImageFormat, Rgb, RgbImage};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A gradient with some noise-like structure so encoders have work to do.
pub fn sample_image(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([
            (x * 255 / width.max(1)) as u8,
            (y * 255 / height.max(1)) as u8,
            ((x ^ y) & 0xFF) as u8,
        ])
    })
}

pub fn write_image(path: &Path, format: ImageFormat) -> PathBuf {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    sample_image(64, 48).save_with_format(path, format).unwrap();
    path.to_path_buf()
}

pub fn write_png(path: &Path) -> PathBuf {
    write_image(path, ImageFormat::Png)
}

pub fn write_jpeg(path: &Path) -> PathBuf {
    write_image(path, ImageFormat::Jpeg)
}

pub fn write_file(path: &Path, contents: &[u8]) -> PathBuf {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
    path.to_path_buf()
}

/// A workspace with `input/` populated by `populate` and an empty `output/` path.
pub struct Workspace {
    pub dir: TempDir,
    pub input: PathBuf,
    pub output: PathBuf,
}

impl Workspace {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("input");
        let output = dir.path().join("output");
        fs::create_dir_all(&input).unwrap();
        Self { dir, input, output }
    }

    /// `input/a.png`, `input/sub/b.jpg` and `input/notes.txt`.
    pub fn with_basic_tree() -> Self {
        let ws = Self::new();
        write_png(&ws.input.join("a.png"));
        write_jpeg(&ws.input.join("sub/b.jpg"));
        write_file(&ws.input.join("notes.txt"), b"not an image");
        ws
    }
}

/// Relative paths of every file under `root`, sorted.
pub fn list_files(root: &Path) -> Vec<String> {
    let mut files: Vec<String> = walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            e.path()
                .strip_prefix(root)
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect();
    files.sort();
    files
}
