//! クリップボード書き込み

use crate::error::{ReviewBatchError, Result};
use review_batch_common::{COPY_FAILURE_MESSAGE, COPY_SUCCESS_MESSAGE};
use tracing::warn;

/// テキストの書き込み先
pub trait ClipboardSink {
    fn write_text(&mut self, text: &str) -> Result<()>;
}

/// OSのクリップボード
#[derive(Default)]
pub struct SystemClipboard;

impl ClipboardSink for SystemClipboard {
    fn write_text(&mut self, text: &str) -> Result<()> {
        let mut clipboard =
            arboard::Clipboard::new().map_err(|e| ReviewBatchError::Clipboard(e.to_string()))?;
        clipboard
            .set_text(text.to_string())
            .map_err(|e| ReviewBatchError::Clipboard(e.to_string()))
    }
}

/// 書き込んで結果を通知する
///
/// 失敗しても処理は続ける（通知のみ）。成功したかを返す。
pub fn copy_and_notify(sink: &mut dyn ClipboardSink, text: &str) -> bool {
    match sink.write_text(text) {
        Ok(()) => {
            println!("{}", COPY_SUCCESS_MESSAGE);
            true
        }
        Err(e) => {
            warn!(error = %e, "clipboard write failed");
            eprintln!("{}", COPY_FAILURE_MESSAGE);
            false
        }
    }
}
