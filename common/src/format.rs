//! クリップボード用テキストの整形

use crate::types::ReviewItem;

/// コピー成功時の通知
pub const COPY_SUCCESS_MESSAGE: &str = "Copied to clipboard!";
/// コピー失敗時の通知
pub const COPY_FAILURE_MESSAGE: &str = "Failed to copy!";
/// インポート失敗時の通知
pub const INVALID_DATA_MESSAGE: &str = "Invalid data format";

/// リンク行の表示
pub fn link_line(link: &str) -> String {
    format!("Click: {}", link)
}

/// 1件分のコピー用テキスト
///
/// リンク行、空行、本文。写真があれば空行と画像参照を続ける。
pub fn clipboard_text(item: &ReviewItem) -> String {
    let mut text = format!("{}\n\n{}", link_line(&item.link), item.text);
    if let Some(photo) = &item.photo {
        text.push_str(&format!("\n\n![image]({})", photo));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clipboard_text_without_photo() {
        let item = ReviewItem::new(0, "http://x", "Great product!");
        assert_eq!(clipboard_text(&item), "Click: http://x\n\nGreat product!");
    }

    #[test]
    fn test_clipboard_text_with_photo() {
        let item = ReviewItem::new(0, "http://x", "Works well")
            .with_photo(Some("data:image/jpeg;base64,AAAA".to_string()));
        assert_eq!(
            clipboard_text(&item),
            "Click: http://x\n\nWorks well\n\n![image](data:image/jpeg;base64,AAAA)"
        );
    }
}
