//! レビュー項目の型定義
//!
//! CLIとデスクトップで共有される型:
//! - ReviewItem: 1件のレビュー（本文 + リンク + 任意の写真）
//! - Partition: 完了/未完了の区分
//! - Stats: 集計値

use serde::{Deserialize, Serialize};

/// 完了/未完了の区分
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Partition {
    #[default]
    Undone,
    Done,
}

impl Partition {
    pub fn is_done(self) -> bool {
        matches!(self, Partition::Done)
    }

    pub fn from_done(done: bool) -> Self {
        if done {
            Partition::Done
        } else {
            Partition::Undone
        }
    }

    /// 反対側の区分
    pub fn flipped(self) -> Self {
        match self {
            Partition::Undone => Partition::Done,
            Partition::Done => Partition::Undone,
        }
    }

    /// 切り替えボタンのラベル
    pub fn toggle_label(self) -> &'static str {
        match self {
            Partition::Undone => "Mark as Done",
            Partition::Done => "Mark as Undone",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Partition::Undone => "undone",
            Partition::Done => "done",
        }
    }
}

impl std::str::FromStr for Partition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "undone" | "todo" | "u" => Ok(Partition::Undone),
            "done" | "d" => Ok(Partition::Done),
            _ => Err(format!("Unknown tab: {}. Use done or undone", s)),
        }
    }
}

impl std::fmt::Display for Partition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// レビュー1件
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewItem {
    /// 作業セット内で一意な番号（切り替えで変わらない）
    pub index: usize,

    /// 共有リンク（バッチ内で共通）
    pub link: String,

    /// レビュー本文
    pub text: String,

    /// 写真（data URL）
    #[serde(default)]
    pub photo: Option<String>,

    #[serde(default)]
    pub status: Partition,
}

impl ReviewItem {
    pub fn new(index: usize, link: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            index,
            link: link.into(),
            text: text.into(),
            photo: None,
            status: Partition::Undone,
        }
    }

    pub fn with_photo(mut self, photo: Option<String>) -> Self {
        self.photo = photo;
        self
    }

    pub fn is_done(&self) -> bool {
        self.status.is_done()
    }
}

/// 集計値
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub total: usize,
    pub done: usize,
    pub undone: usize,
}

impl Stats {
    pub fn count<'a>(items: impl IntoIterator<Item = &'a ReviewItem>) -> Self {
        let mut total = 0;
        let mut done = 0;
        for item in items {
            total += 1;
            if item.is_done() {
                done += 1;
            }
        }
        Self {
            total,
            done,
            undone: total - done,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition_default_is_undone() {
        assert_eq!(Partition::default(), Partition::Undone);
        assert!(!Partition::default().is_done());
    }

    #[test]
    fn test_partition_flip() {
        assert_eq!(Partition::Undone.flipped(), Partition::Done);
        assert_eq!(Partition::Done.flipped().flipped(), Partition::Done);
    }

    #[test]
    fn test_toggle_label() {
        assert_eq!(Partition::Undone.toggle_label(), "Mark as Done");
        assert_eq!(Partition::Done.toggle_label(), "Mark as Undone");
    }

    #[test]
    fn test_partition_from_str() {
        assert_eq!("done".parse::<Partition>().unwrap(), Partition::Done);
        assert_eq!("UNDONE".parse::<Partition>().unwrap(), Partition::Undone);
        assert!("later".parse::<Partition>().is_err());
    }

    #[test]
    fn test_review_item_serialize() {
        let item = ReviewItem::new(3, "http://x", "Nice");
        let json = serde_json::to_string(&item).expect("シリアライズ失敗");
        assert!(json.contains("\"index\":3"));
        assert!(json.contains("\"status\":\"undone\""));
        assert!(json.contains("\"photo\":null"));
    }

    #[test]
    fn test_stats_count() {
        let mut items = vec![
            ReviewItem::new(0, "l", "a"),
            ReviewItem::new(1, "l", "b"),
            ReviewItem::new(2, "l", "c"),
        ];
        items[1].status = Partition::Done;

        let stats = Stats::count(&items);
        assert_eq!(stats, Stats { total: 3, done: 1, undone: 2 });
    }
}
