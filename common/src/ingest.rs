//! 入力テキストの分割と写真の待ち合わせ
//!
//! - 空行区切りで段落に分割し、1段落 = 1レビュー
//! - 段落 i には写真 i を位置で対応させる
//! - 写真の読み込みは非同期で完了順不定。全件の完了数がそろうまで
//!   どの項目も生成しない（件数ベースのバリア）

use crate::error::{Error, Result};
use crate::types::ReviewItem;

/// 段落の区切り（空行）
pub const PARAGRAPH_DELIMITER: &str = "\n\n";

/// 入力テキストを段落に分割
///
/// CRLFはLFに揃え、各段落の前後の改行を取り除く。
/// 空白だけの段落は捨てる。捨てた段落は写真の位置にも数えないので、
/// 写真 i は残った段落の i 番目に付く。
///
/// # Examples
/// ```
/// use review_batch_common::split_paragraphs;
///
/// let paragraphs = split_paragraphs("Great product!\n\nWorks well");
/// assert_eq!(paragraphs, vec!["Great product!", "Works well"]);
/// ```
pub fn split_paragraphs(raw: &str) -> Vec<String> {
    let normalized = raw.replace("\r\n", "\n");
    normalized
        .split(PARAGRAPH_DELIMITER)
        .map(|p| p.trim_matches('\n'))
        .filter(|p| !p.trim().is_empty())
        .map(str::to_string)
        .collect()
}

/// 段落と写真を位置で対応させてレビューを生成
///
/// 写真が段落より多い場合は余りを捨て、少ない場合は写真なしになる。
pub fn build_items(paragraphs: &[String], link: &str, photos: &[Option<String>]) -> Vec<ReviewItem> {
    paragraphs
        .iter()
        .enumerate()
        .map(|(index, text)| {
            let photo = photos.get(index).cloned().flatten();
            ReviewItem::new(index, link, text.as_str()).with_photo(photo)
        })
        .collect()
}

/// バリアの進捗
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BarrierStatus {
    /// まだ待っている
    Waiting { finished: usize, total: usize },
    /// 全件そろった（スロット順の写真）
    Complete(Vec<Option<String>>),
}

/// 写真読み込みのバリア
///
/// 完了した件数だけを数える。失敗したスロットも `None` として完了扱い。
#[derive(Debug, Clone)]
pub struct PhotoBarrier {
    slots: Vec<Option<String>>,
    finished: Vec<bool>,
    finished_count: usize,
}

impl PhotoBarrier {
    pub fn new(total: usize) -> Self {
        Self {
            slots: vec![None; total],
            finished: vec![false; total],
            finished_count: 0,
        }
    }

    pub fn total(&self) -> usize {
        self.slots.len()
    }

    pub fn finished(&self) -> usize {
        self.finished_count
    }

    pub fn is_complete(&self) -> bool {
        self.finished_count == self.slots.len()
    }

    /// スロットの完了を記録
    ///
    /// 同じスロットの2回目以降の報告は数えない。
    pub fn record(&mut self, slot: usize, photo: Option<String>) -> Result<BarrierStatus> {
        let total = self.slots.len();
        if slot >= total {
            return Err(Error::InvalidSlot { slot, total });
        }

        if !self.finished[slot] {
            self.finished[slot] = true;
            self.slots[slot] = photo;
            self.finished_count += 1;
        }

        if self.is_complete() {
            Ok(BarrierStatus::Complete(std::mem::take(&mut self.slots)))
        } else {
            Ok(BarrierStatus::Waiting {
                finished: self.finished_count,
                total,
            })
        }
    }
}
