//! 作業セット（レビュー一覧）の状態管理
//!
//! 完了/未完了は各項目の `status` で持ち、区分ごとの一覧は
//! 1本の順序付きコレクションから絞り込んで作る。
//! 写真待ちのバッチは世代番号で識別し、古い世代の完了通知は捨てる。

use crate::error::{Error, Result};
use crate::ingest::{build_items, split_paragraphs, BarrierStatus, PhotoBarrier};
use crate::snapshot::{parse_snapshot, to_snapshot_string, SnapshotRecord};
use crate::types::{Partition, ReviewItem, Stats};
use tracing::debug;

/// バッチ開始の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchStart {
    /// 写真なし: 即座に作業セットを置き換えた
    Rendered(Stats),
    /// 写真の読み込み待ち
    Pending { generation: u64, photos: usize },
}

/// 写真1件の完了を反映した結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchProgress {
    Waiting { finished: usize, total: usize },
    Rendered(Stats),
    /// 古い世代（または待ちバッチなし）の通知を捨てた
    Stale,
}

/// 写真待ちのバッチ
#[derive(Debug, Clone)]
struct PendingBatch {
    generation: u64,
    link: String,
    paragraphs: Vec<String>,
    barrier: PhotoBarrier,
}

/// レビュー一覧
#[derive(Debug, Clone, Default)]
pub struct ReviewBoard {
    items: Vec<ReviewItem>,
    visible: Partition,
    generation: u64,
    pending: Option<PendingBatch>,
}

impl ReviewBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// 保存済みの項目から復元
    pub fn from_items(items: Vec<ReviewItem>, visible: Partition) -> Self {
        Self {
            items,
            visible,
            ..Default::default()
        }
    }

    pub fn items(&self) -> &[ReviewItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ReviewItem> {
        self.items.iter().find(|item| item.index == index)
    }

    /// 表示中の区分
    pub fn visible(&self) -> Partition {
        self.visible
    }

    /// タブ切り替え（非表示側の状態はそのまま）
    pub fn show(&mut self, partition: Partition) {
        self.visible = partition;
    }

    /// 区分ごとの一覧
    pub fn view(&self, partition: Partition) -> impl Iterator<Item = &ReviewItem> + '_ {
        self.items.iter().filter(move |item| item.status == partition)
    }

    pub fn visible_items(&self) -> impl Iterator<Item = &ReviewItem> + '_ {
        self.view(self.visible)
    }

    pub fn stats(&self) -> Stats {
        Stats::count(&self.items)
    }

    /// 写真待ちのバッチがあるか
    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    /// 写真待ちバッチの進捗 (完了数, 総数)
    pub fn pending_progress(&self) -> Option<(usize, usize)> {
        self.pending
            .as_ref()
            .map(|batch| (batch.barrier.finished(), batch.barrier.total()))
    }

    /// 入力テキストから新しいバッチを開始
    ///
    /// 写真がなければその場で作業セットを置き換える。写真があれば
    /// `photo_decoded` で全件そろうまで何も描画しない。
    pub fn start_batch(&mut self, raw: &str, link: &str, photo_count: usize) -> Result<BatchStart> {
        if self.is_busy() {
            return Err(Error::Busy);
        }

        let paragraphs = split_paragraphs(raw);
        self.generation += 1;

        if photo_count == 0 {
            let items = build_items(&paragraphs, link, &[]);
            return Ok(BatchStart::Rendered(self.replace_items(items)));
        }

        debug!(
            generation = self.generation,
            paragraphs = paragraphs.len(),
            photos = photo_count,
            "batch waiting for photos"
        );
        self.pending = Some(PendingBatch {
            generation: self.generation,
            link: link.to_string(),
            paragraphs,
            barrier: PhotoBarrier::new(photo_count),
        });

        Ok(BatchStart::Pending {
            generation: self.generation,
            photos: photo_count,
        })
    }

    /// 写真1件の読み込み完了（失敗時は `None`）
    pub fn photo_decoded(
        &mut self,
        generation: u64,
        slot: usize,
        photo: Option<String>,
    ) -> Result<BatchProgress> {
        let Some(batch) = self.pending.as_mut() else {
            debug!(generation, slot, "no pending batch, dropping photo");
            return Ok(BatchProgress::Stale);
        };
        if batch.generation != generation {
            debug!(generation, current = batch.generation, slot, "stale photo dropped");
            return Ok(BatchProgress::Stale);
        }

        match batch.barrier.record(slot, photo)? {
            BarrierStatus::Waiting { finished, total } => Ok(BatchProgress::Waiting { finished, total }),
            BarrierStatus::Complete(photos) => {
                let Some(batch) = self.pending.take() else {
                    return Ok(BatchProgress::Stale);
                };
                let items = build_items(&batch.paragraphs, &batch.link, &photos);
                Ok(BatchProgress::Rendered(self.replace_items(items)))
            }
        }
    }

    /// 写真待ちのバッチを破棄（以後の完了通知は Stale）
    pub fn abandon_batch(&mut self) {
        if let Some(batch) = self.pending.take() {
            debug!(generation = batch.generation, "batch abandoned");
        }
    }

    /// 完了/未完了を切り替え
    ///
    /// 項目は新しい区分の末尾へ移る。index と内容は変わらない。
    pub fn toggle(&mut self, index: usize) -> Result<Partition> {
        let position = self
            .items
            .iter()
            .position(|item| item.index == index)
            .ok_or(Error::UnknownItem(index))?;

        let mut item = self.items.remove(position);
        item.status = item.status.flipped();
        let status = item.status;
        self.items.push(item);

        debug!(index, status = %status, "review toggled");
        Ok(status)
    }

    /// 書き出し用レコード（未完了 → 完了の順）
    pub fn export_records(&self) -> Vec<SnapshotRecord> {
        self.view(Partition::Undone)
            .chain(self.view(Partition::Done))
            .map(SnapshotRecord::from_item)
            .collect()
    }

    /// スナップショット文字列を書き出し
    pub fn export_snapshot(&self) -> Result<String> {
        to_snapshot_string(&self.export_records())
    }

    /// スナップショット文字列を読み込み
    ///
    /// パースに失敗した場合は作業セットを変更しない。
    pub fn import_snapshot(&mut self, data: &str) -> Result<Stats> {
        if self.is_busy() {
            return Err(Error::Busy);
        }
        let records = parse_snapshot(data)?;
        Ok(self.import_records(records))
    }

    /// レコード列で作業セットを置き換え（index = レコード位置）
    pub fn import_records(&mut self, records: Vec<SnapshotRecord>) -> Stats {
        let items = records
            .into_iter()
            .enumerate()
            .map(|(index, record)| record.into_item(index))
            .collect();
        self.replace_items(items)
    }

    fn replace_items(&mut self, items: Vec<ReviewItem>) -> Stats {
        self.items = items;
        let stats = self.stats();
        debug!(total = stats.total, done = stats.done, undone = stats.undone, "working set replaced");
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn photo(name: &str) -> Option<String> {
        Some(format!("data:image/jpeg;base64,{}", name))
    }

    #[test]
    fn test_generate_without_photos() {
        let mut board = ReviewBoard::new();
        let start = board
            .start_batch("Great product!\n\nWorks well", "http://x", 0)
            .unwrap();

        assert_eq!(start, BatchStart::Rendered(Stats { total: 2, done: 0, undone: 2 }));
        assert!(board.items().iter().all(|i| i.photo.is_none() && !i.is_done()));
        assert_eq!(board.visible_items().count(), 2);
    }

    #[test]
    fn test_nothing_rendered_until_all_photos_arrive() {
        let mut board = ReviewBoard::new();
        let start = board.start_batch("a\n\nb\n\nc", "http://x", 2).unwrap();
        let BatchStart::Pending { generation, photos } = start else {
            panic!("写真待ちになるはず");
        };
        assert_eq!(photos, 2);

        // 完了順は逆
        let progress = board.photo_decoded(generation, 1, photo("one")).unwrap();
        assert_eq!(progress, BatchProgress::Waiting { finished: 1, total: 2 });
        assert!(board.is_empty());
        assert_eq!(board.pending_progress(), Some((1, 2)));

        let progress = board.photo_decoded(generation, 0, photo("zero")).unwrap();
        assert_eq!(progress, BatchProgress::Rendered(Stats { total: 3, done: 0, undone: 3 }));
        assert!(!board.is_busy());

        assert_eq!(board.get(0).unwrap().photo, photo("zero"));
        assert_eq!(board.get(1).unwrap().photo, photo("one"));
        assert_eq!(board.get(2).unwrap().photo, None);
    }

    #[test]
    fn test_failed_photo_counts_toward_barrier() {
        let mut board = ReviewBoard::new();
        let BatchStart::Pending { generation, .. } = board.start_batch("a\n\nb", "l", 2).unwrap() else {
            panic!("写真待ちになるはず");
        };
        board.photo_decoded(generation, 0, None).unwrap();
        let progress = board.photo_decoded(generation, 1, photo("b")).unwrap();
        assert!(matches!(progress, BatchProgress::Rendered(_)));
        assert_eq!(board.get(0).unwrap().photo, None);
        assert_eq!(board.get(1).unwrap().photo, photo("b"));
    }

    #[test]
    fn test_second_batch_rejected_while_pending() {
        let mut board = ReviewBoard::new();
        board.start_batch("a", "l", 1).unwrap();
        assert!(matches!(board.start_batch("b", "l", 0), Err(Error::Busy)));
        assert!(matches!(board.import_snapshot("[]"), Err(Error::Busy)));
    }

    #[test]
    fn test_stale_generation_is_dropped() {
        let mut board = ReviewBoard::new();
        let BatchStart::Pending { generation: old, .. } = board.start_batch("a", "l", 1).unwrap() else {
            panic!("写真待ちになるはず");
        };
        board.abandon_batch();

        let BatchStart::Pending { generation: new, .. } = board.start_batch("b", "l", 1).unwrap() else {
            panic!("写真待ちになるはず");
        };
        assert_ne!(old, new);

        assert_eq!(board.photo_decoded(old, 0, photo("old")).unwrap(), BatchProgress::Stale);
        assert!(board.is_busy());

        board.photo_decoded(new, 0, photo("new")).unwrap();
        assert_eq!(board.items().len(), 1);
        assert_eq!(board.get(0).unwrap().text, "b");
        assert_eq!(board.get(0).unwrap().photo, photo("new"));
    }

    #[test]
    fn test_generate_replaces_both_partitions() {
        let mut board = ReviewBoard::new();
        board.start_batch("a\n\nb", "l", 0).unwrap();
        board.toggle(0).unwrap();

        board.start_batch("c", "l2", 0).unwrap();
        assert_eq!(board.stats(), Stats { total: 1, done: 0, undone: 1 });
        assert_eq!(board.get(0).unwrap().text, "c");
    }

    #[test]
    fn test_toggle_twice_restores() {
        let mut board = ReviewBoard::new();
        board.start_batch("a\n\nb\n\nc", "l", 0).unwrap();
        let before = board.get(1).unwrap().clone();

        assert_eq!(board.toggle(1).unwrap(), Partition::Done);
        assert_eq!(board.stats(), Stats { total: 3, done: 1, undone: 2 });
        assert_eq!(board.view(Partition::Done).count(), 1);

        assert_eq!(board.toggle(1).unwrap(), Partition::Undone);
        assert_eq!(board.get(1).unwrap(), &before);
        assert_eq!(board.stats(), Stats { total: 3, done: 0, undone: 3 });
    }

    #[test]
    fn test_toggle_moves_item_to_end_of_partition() {
        let mut board = ReviewBoard::new();
        board.start_batch("a\n\nb\n\nc", "l", 0).unwrap();
        board.toggle(0).unwrap();
        board.toggle(0).unwrap();

        let order: Vec<usize> = board.view(Partition::Undone).map(|i| i.index).collect();
        assert_eq!(order, vec![1, 2, 0]);
    }

    #[test]
    fn test_toggle_unknown_index() {
        let mut board = ReviewBoard::new();
        assert!(matches!(board.toggle(9), Err(Error::UnknownItem(9))));
    }

    #[test]
    fn test_stats_invariant_after_mutations() {
        let mut board = ReviewBoard::new();
        board.start_batch("a\n\nb\n\nc\n\nd", "l", 0).unwrap();
        for index in [0, 2, 3, 2] {
            board.toggle(index).unwrap();
            let stats = board.stats();
            assert_eq!(stats.total, stats.done + stats.undone);
        }
        assert_eq!(board.stats().done, 2);
    }

    #[test]
    fn test_show_keeps_hidden_partition() {
        let mut board = ReviewBoard::new();
        board.start_batch("a\n\nb", "l", 0).unwrap();
        board.toggle(1).unwrap();

        board.show(Partition::Done);
        assert_eq!(board.visible_items().map(|i| i.index).collect::<Vec<_>>(), vec![1]);
        board.show(Partition::Undone);
        assert_eq!(board.visible_items().map(|i| i.index).collect::<Vec<_>>(), vec![0]);
        assert_eq!(board.items().len(), 2);
    }

    #[test]
    fn test_export_order_undone_first() {
        let mut board = ReviewBoard::new();
        board.start_batch("a\n\nb\n\nc", "l", 0).unwrap();
        board.toggle(0).unwrap();

        let texts: Vec<String> = board.export_records().into_iter().map(|r| r.text).collect();
        assert_eq!(texts, vec!["b", "c", "a"]);
    }

    #[test]
    fn test_export_import_round_trip() {
        let mut board = ReviewBoard::new();
        let BatchStart::Pending { generation, .. } = board.start_batch("a\n\nb", "http://x", 1).unwrap() else {
            panic!("写真待ちになるはず");
        };
        board.photo_decoded(generation, 0, photo("AAAA")).unwrap();
        board.toggle(1).unwrap();

        let data = board.export_snapshot().unwrap();
        let mut restored = ReviewBoard::new();
        let stats = restored.import_snapshot(&data).unwrap();

        assert_eq!(stats, board.stats());
        assert_eq!(restored.export_records(), board.export_records());
        assert_eq!(restored.export_snapshot().unwrap(), data);
    }

    #[test]
    fn test_import_failure_leaves_state() {
        let mut board = ReviewBoard::new();
        board.start_batch("a\n\nb", "l", 0).unwrap();
        board.toggle(0).unwrap();
        let before = board.items().to_vec();

        let err = board.import_snapshot("this is not a snapshot").unwrap_err();
        assert!(matches!(err, Error::InvalidData(_)));
        assert_eq!(board.items(), before.as_slice());
    }

    #[test]
    fn test_import_assigns_position_index() {
        let mut board = ReviewBoard::new();
        board
            .import_snapshot(r#"[{"l":"u","r":"x","d":true},{"l":"u","r":"y","p":null,"d":false}]"#)
            .unwrap();

        assert_eq!(board.get(0).unwrap().status, Partition::Done);
        assert_eq!(board.get(1).unwrap().status, Partition::Undone);
        assert_eq!(board.stats(), Stats { total: 2, done: 1, undone: 1 });
    }
}
