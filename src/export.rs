//! PNG export of the current canvas.
//!
//! Encoding runs on a worker thread with its own copy of the pixels, so the
//! frame loop never waits on disk.

use anyhow::Context;
use image::RgbaImage;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;

/// Upper bound on numbered files per stem.
const MAX_INDEX: u32 = 10_000;

/// Messages from the export thread to the UI.
#[derive(Debug, Clone, PartialEq)]
pub enum ExportMessage {
    Completed(PathBuf),
    Error(String),
}

/// First `<dir>/<stem>-NNN.png` that does not exist yet.
pub fn next_available_path(dir: &Path, stem: &str) -> anyhow::Result<PathBuf> {
    (1..=MAX_INDEX)
        .map(|i| dir.join(format!("{stem}-{i:03}.png")))
        .find(|p| !p.exists())
        .with_context(|| format!("no free file name for {stem} in {}", dir.display()))
}

/// Encode an RGBA8 frame as PNG at `path`.
pub fn write_png(path: &Path, width: u32, height: u32, rgba: Vec<u8>) -> anyhow::Result<()> {
    let img = RgbaImage::from_raw(width, height, rgba)
        .with_context(|| format!("frame buffer does not match {width}x{height}"))?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    img.save(path)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

/// Pick a file name under `dir` and write `rgba` there on a background
/// thread. The outcome arrives on `tx`.
pub fn spawn_png_export(
    dir: PathBuf,
    stem: String,
    width: u32,
    height: u32,
    rgba: Vec<u8>,
    tx: Sender<ExportMessage>,
) {
    std::thread::spawn(move || {
        let result = next_available_path(&dir, &stem)
            .and_then(|path| write_png(&path, width, height, rgba).map(|()| path));
        let msg = match result {
            Ok(path) => ExportMessage::Completed(path),
            Err(e) => ExportMessage::Error(format!("{e:#}")),
        };
        let _ = tx.send(msg);
    });
}
