use crate::error::{ReviewBatchError, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoFile {
    pub path: PathBuf,
    pub file_name: String,
}

impl PhotoFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        Self { path, file_name }
    }
}

/// 画像として扱う拡張子か
fn is_image_extension(ext: &str) -> bool {
    image::ImageFormat::from_extension(ext).is_some()
}

/// フォルダ直下の画像をファイル名順に列挙
///
/// 段落との対応は位置で決まるので、並び順はファイル名で固定する。
pub fn scan_folder(folder: &Path) -> Result<Vec<PhotoFile>> {
    if !folder.is_dir() {
        return Err(ReviewBatchError::FolderNotFound(folder.display().to_string()));
    }

    let mut photos: Vec<PhotoFile> = WalkDir::new(folder)
        .max_depth(1)  // 直下のみ（再帰しない）
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_file())
        .filter(|e| {
            e.path()
                .extension()
                .map(|ext| is_image_extension(&ext.to_string_lossy()))
                .unwrap_or(false)
        })
        .map(|e| PhotoFile::new(e.path()))
        .collect();

    photos.sort_by(|a, b| a.file_name.cmp(&b.file_name));

    Ok(photos)
}

/// 明示指定の写真とフォルダの写真をまとめる
///
/// 明示指定は指定順のまま先頭に並ぶ。存在しないファイルもここでは
/// 落とさない（読み込み失敗として写真なし扱いになる）。
pub fn collect_photos(files: &[PathBuf], folder: Option<&Path>) -> Result<Vec<PhotoFile>> {
    let mut photos: Vec<PhotoFile> = files.iter().map(PhotoFile::new).collect();
    if let Some(folder) = folder {
        photos.extend(scan_folder(folder)?);
    }
    Ok(photos)
}
