use review_batch_common::ReviewBoard;
use std::path::PathBuf;

/// 入力フォームと作業セット
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub board: ReviewBoard,
    pub reviews_input: String,
    pub link_input: String,
    pub photo_paths: Vec<PathBuf>,
    /// 書き出し/読み込み用のデータ欄
    pub data_text: String,
    /// 作業セットを置き換えるたびに進める（古いサムネイルを捨てる）
    pub epoch: u64,
}

impl AppState {
    pub fn photo_summary(&self) -> String {
        match self.photo_paths.len() {
            0 => "No photos".to_string(),
            1 => "1 photo".to_string(),
            n => format!("{n} photos"),
        }
    }
}
