use anyhow::{Context, Result};
use review_batch_common::photo::decode_data_url;
use std::fs;
use std::path::{Path, PathBuf};

/// サムネイルの最大サイズ
pub const THUMB_SIZE: (u32, u32) = (240, 180);

pub fn read_data_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("read {}", path.display()))
}

pub fn write_data_file(path: &Path, data: &str) -> Result<()> {
    fs::write(path, data).with_context(|| format!("write {}", path.display()))
}

pub fn default_data_path(dir: Option<&Path>) -> PathBuf {
    dir.unwrap_or_else(|| Path::new(".")).join("reviews.json")
}

/// data URL の写真からサムネイル画素 (RGBA) を作る
pub fn thumbnail_pixels(data_url: &str) -> Result<([usize; 2], Vec<u8>)> {
    let bytes = decode_data_url(data_url).context("photo data URL")?;
    let image = image::load_from_memory(&bytes).context("decode photo")?;
    let thumb = image.thumbnail(THUMB_SIZE.0, THUMB_SIZE.1);
    let size = [thumb.width() as usize, thumb.height() as usize];
    Ok((size, thumb.to_rgba8().into_raw()))
}
