//! スナップショット（作業セットの書き出し/読み込み形式）
//!
//! `[{"l": link, "r": text, "p": photo|null, "d": done}, ...]`
//! キー名は短縮形のまま。既存の書き出しデータをそのまま読める。

use crate::error::{Error, Result};
use crate::types::{Partition, ReviewItem};
use serde::{Deserialize, Serialize};

/// スナップショットの1レコード
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotRecord {
    #[serde(rename = "l")]
    pub link: String,

    #[serde(rename = "r")]
    pub text: String,

    #[serde(rename = "p", default)]
    pub photo: Option<String>,

    #[serde(rename = "d", default)]
    pub done: bool,
}

impl SnapshotRecord {
    pub fn from_item(item: &ReviewItem) -> Self {
        Self {
            link: item.link.clone(),
            text: item.text.clone(),
            photo: item.photo.clone(),
            done: item.is_done(),
        }
    }

    /// レコードの位置を index としてレビューに戻す
    pub fn into_item(self, index: usize) -> ReviewItem {
        ReviewItem {
            index,
            link: self.link,
            text: self.text,
            photo: self.photo,
            status: Partition::from_done(self.done),
        }
    }
}

/// スナップショット文字列をパース
///
/// 失敗時は `Error::InvalidData`。
pub fn parse_snapshot(data: &str) -> Result<Vec<SnapshotRecord>> {
    serde_json::from_str(data.trim()).map_err(|e| Error::InvalidData(e.to_string()))
}

/// レコード列をスナップショット文字列へ
pub fn to_snapshot_string(records: &[SnapshotRecord]) -> Result<String> {
    Ok(serde_json::to_string(records)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_uses_short_keys() {
        let record = SnapshotRecord {
            link: "http://x".to_string(),
            text: "Great".to_string(),
            photo: None,
            done: true,
        };
        let json = to_snapshot_string(&[record]).unwrap();
        assert_eq!(json, r#"[{"l":"http://x","r":"Great","p":null,"d":true}]"#);
    }

    #[test]
    fn test_parse_defaults_missing_photo_and_flag() {
        let records = parse_snapshot(r#"[{"l":"http://x","r":"text"}]"#).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].photo, None);
        assert!(!records[0].done);
    }

    #[test]
    fn test_parse_with_photo() {
        let data = r#"[{"l":"u","r":"t","p":"data:image/jpeg;base64,AAAA","d":false}]"#;
        let records = parse_snapshot(data).unwrap();
        assert_eq!(records[0].photo.as_deref(), Some("data:image/jpeg;base64,AAAA"));
    }

    #[test]
    fn test_parse_malformed() {
        assert!(matches!(parse_snapshot("not json"), Err(Error::InvalidData(_))));
        assert!(matches!(parse_snapshot(r#"{"l":"u"}"#), Err(Error::InvalidData(_))));
        assert!(matches!(parse_snapshot(r#"[{"r":"no link"}]"#), Err(Error::InvalidData(_))));
        assert!(matches!(parse_snapshot(""), Err(Error::InvalidData(_))));
    }

    #[test]
    fn test_parse_empty_array() {
        assert!(parse_snapshot("[]").unwrap().is_empty());
    }

    #[test]
    fn test_into_item_keeps_partition() {
        let record = SnapshotRecord {
            link: "u".to_string(),
            text: "t".to_string(),
            photo: None,
            done: true,
        };
        let item = record.into_item(7);
        assert_eq!(item.index, 7);
        assert_eq!(item.status, Partition::Done);
    }
}
