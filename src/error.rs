use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReviewBatchError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("フォルダが見つかりません: {0}")]
    FolderNotFound(String),

    #[error("レビュー本文が空です: {0}")]
    NoReviews(String),

    #[error("写真の読み込みが完了しませんでした ({finished}/{total})")]
    PhotosIncomplete { finished: usize, total: usize },

    #[error("クリップボードエラー: {0}")]
    Clipboard(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] review_batch_common::Error),
}

pub type Result<T> = std::result::Result<T, ReviewBatchError>;
