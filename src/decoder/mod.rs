//! 写真の非同期読み込み
//!
//! 1枚ごとにブロッキングタスクで読み込み・縮小し、完了順に
//! 作業セットのバリアへ渡す。失敗したスロットは写真なしとして完了扱い。

use crate::error::{ReviewBatchError, Result};
use crate::scanner::PhotoFile;
use indicatif::{ProgressBar, ProgressStyle};
use review_batch_common::{photo, BatchProgress, NormalizeOptions, ReviewBoard, Stats};
use tokio::task::JoinSet;
use tracing::{debug, warn};

/// 1枚読み込み。失敗時は None
pub fn decode_photo(file: &PhotoFile, options: Option<&NormalizeOptions>) -> Option<String> {
    match photo::load_photo(&file.path, options) {
        Ok(data_url) => {
            debug!(file = %file.file_name, bytes = data_url.len(), "photo decoded");
            Some(data_url)
        }
        Err(e) => {
            warn!(file = %file.path.display(), error = %e, "photo decode failed, using no photo");
            None
        }
    }
}

/// 全写真をスロット番号付きで並行に読み込み、完了順に `on_done` へ渡す
///
/// タスクが異常終了してもスロット番号は必ず返る。
pub async fn decode_all<F>(
    files: &[PhotoFile],
    options: Option<NormalizeOptions>,
    mut on_done: F,
) -> Result<()>
where
    F: FnMut(usize, Option<String>) -> Result<()>,
{
    let mut tasks = JoinSet::new();

    for (slot, file) in files.iter().cloned().enumerate() {
        tasks.spawn(async move {
            let decoded = tokio::task::spawn_blocking(move || decode_photo(&file, options.as_ref())).await;
            match decoded {
                Ok(photo) => (slot, photo),
                Err(e) => {
                    warn!(slot, error = %e, "photo task failed, using no photo");
                    (slot, None)
                }
            }
        });
    }

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((slot, photo)) => on_done(slot, photo)?,
            // 外側のタスクは panic しない
            Err(e) => warn!(error = %e, "photo task join failed"),
        }
    }

    Ok(())
}

/// 写真待ちバッチを読み込み完了まで進める
///
/// 全スロットがそろった時点の集計値を返す。そろわなかった場合は
/// バッチを破棄してエラーにする（作業セットは変わらない）。
pub async fn run_batch(
    board: &mut ReviewBoard,
    generation: u64,
    files: &[PhotoFile],
    options: Option<NormalizeOptions>,
    show_progress: bool,
) -> Result<Stats> {
    let progress = if show_progress {
        let bar = ProgressBar::new(files.len() as u64);
        bar.set_style(
            ProgressStyle::with_template("  {bar:30} {pos}/{len} 写真")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        bar
    } else {
        ProgressBar::hidden()
    };

    let mut rendered = None;
    decode_all(files, options, |slot, photo| {
        progress.inc(1);
        match board.photo_decoded(generation, slot, photo)? {
            BatchProgress::Rendered(stats) => rendered = Some(stats),
            BatchProgress::Waiting { finished, total } => debug!(finished, total, "waiting for photos"),
            BatchProgress::Stale => debug!(generation, slot, "stale photo ignored"),
        }
        Ok(())
    })
    .await?;

    progress.finish_and_clear();
    match rendered {
        Some(stats) => Ok(stats),
        None => {
            let (finished, total) = board.pending_progress().unwrap_or((0, files.len()));
            board.abandon_batch();
            Err(ReviewBatchError::PhotosIncomplete { finished, total })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use review_batch_common::BatchStart;
    use std::path::PathBuf;

    #[test]
    fn test_decode_missing_file_is_none() {
        let file = PhotoFile::new(PathBuf::from("/nonexistent/photo.jpg"));
        assert!(decode_photo(&file, None).is_none());
    }

    #[tokio::test]
    async fn test_decode_all_reports_every_slot() {
        let files = vec![
            PhotoFile::new("/nonexistent/a.jpg"),
            PhotoFile::new("/nonexistent/b.jpg"),
            PhotoFile::new("/nonexistent/c.jpg"),
        ];
        let mut slots = Vec::new();
        decode_all(&files, None, |slot, photo| {
            assert!(photo.is_none());
            slots.push(slot);
            Ok(())
        })
        .await
        .unwrap();

        slots.sort();
        assert_eq!(slots, vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn test_run_batch_fails_when_barrier_never_completes() {
        let mut board = ReviewBoard::new();
        board.start_batch("old", "l", 0).unwrap();
        let BatchStart::Pending { generation, .. } = board.start_batch("a\n\nb", "l", 2).unwrap() else {
            panic!("写真待ちになるはず");
        };

        // 別の世代で報告すると全件 Stale になりバリアは閉じない
        let files = vec![PhotoFile::new("/nonexistent/a.jpg"), PhotoFile::new("/nonexistent/b.jpg")];
        let result = run_batch(&mut board, generation + 1, &files, None, false).await;

        assert!(matches!(
            result,
            Err(ReviewBatchError::PhotosIncomplete { finished: 0, total: 2 })
        ));
        assert!(!board.is_busy());
        assert_eq!(board.items().len(), 1);
        assert_eq!(board.get(0).unwrap().text, "old");
    }
}
