//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// スナップショットの形式不正（インポート時）
    #[error("Invalid data format: {0}")]
    InvalidData(String),

    /// 写真読み込み中のバッチがある
    #[error("Photos from a previous batch are still loading")]
    Busy,

    #[error("No review with index {0}")]
    UnknownItem(usize),

    #[error("Photo slot {slot} is out of range (batch has {total} photos)")]
    InvalidSlot { slot: usize, total: usize },

    #[error("Image error: {0}")]
    Image(String),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
