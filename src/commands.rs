//! コマンドの本体
//!
//! main.rs から呼ばれる。作業セットの読み書きは呼び出し側で行う。

use crate::clipboard::{copy_and_notify, ClipboardSink};
use crate::decoder;
use crate::error::{ReviewBatchError, Result};
use crate::scanner::PhotoFile;
use review_batch_common::{
    clipboard_text, format::link_line, BatchStart, Error as CommonError, NormalizeOptions,
    Partition, ReviewBoard, ReviewItem, Stats,
};
use std::path::Path;
use tracing::info;

/// 集計行
pub fn stats_line(stats: &Stats) -> String {
    format!(
        "合計: {}  完了: {}  未完了: {}",
        stats.total, stats.done, stats.undone
    )
}

/// 新しいバッチで作業セットを作り直す
///
/// 写真がある場合は全件の読み込みが終わるまで作業セットは変わらない。
pub async fn generate(
    board: &mut ReviewBoard,
    raw: &str,
    link: &str,
    photos: &[PhotoFile],
    options: Option<NormalizeOptions>,
    show_progress: bool,
) -> Result<Stats> {
    if review_batch_common::split_paragraphs(raw).is_empty() {
        return Err(ReviewBatchError::NoReviews("空行区切りの本文を入力してください".into()));
    }

    match board.start_batch(raw, link, photos.len())? {
        BatchStart::Rendered(stats) => Ok(stats),
        BatchStart::Pending { generation, photos: count } => {
            info!(generation, photos = count, "decoding photos");
            decoder::run_batch(board, generation, photos, options, show_progress).await
        }
    }
}

/// 1項目の表示
pub fn render_item(item: &ReviewItem) -> String {
    let mut lines = vec![
        format!("#{}", item.index),
        link_line(&item.link),
        item.text.clone(),
    ];
    if let Some(photo) = &item.photo {
        let mime = review_batch_common::photo::split_data_url(photo)
            .map(|(mime, _)| mime)
            .unwrap_or("image");
        lines.push(format!("[写真: {}, {} bytes]", mime, photo.len()));
    }
    lines.push(format!("[Copy] [{}]", item.status.toggle_label()));
    lines.join("\n")
}

/// タブの一覧表示
pub fn list(board: &ReviewBoard, tab: Option<Partition>) -> String {
    let tab = tab.unwrap_or_else(|| board.visible());
    let blocks: Vec<String> = board.view(tab).map(render_item).collect();
    let header = format!("[{}] {}", tab, stats_line(&board.stats()));
    if blocks.is_empty() {
        format!("{}\n(項目なし)", header)
    } else {
        format!("{}\n\n{}", header, blocks.join("\n\n"))
    }
}

/// 1項目をクリップボードへ
pub fn copy(board: &ReviewBoard, index: usize, sink: &mut dyn ClipboardSink) -> Result<bool> {
    let item = board.get(index).ok_or(CommonError::UnknownItem(index))?;
    Ok(copy_and_notify(sink, &clipboard_text(item)))
}

/// 書き出し: ファイル（指定時）とクリップボードへ。データ文字列を返す
pub fn export(
    board: &ReviewBoard,
    output: Option<&Path>,
    sink: Option<&mut dyn ClipboardSink>,
) -> Result<String> {
    let data = board.export_snapshot()?;
    if let Some(path) = output {
        std::fs::write(path, &data)?;
        info!(path = %path.display(), "snapshot written");
    }
    if let Some(sink) = sink {
        copy_and_notify(sink, &data);
    }
    Ok(data)
}

/// 読み込み。形式不正なら作業セットは変えずにエラーを返す
///
/// エラーの表示は呼び出し側で1回だけ行う。
pub fn import(board: &mut ReviewBoard, data: &str) -> Result<Stats> {
    Ok(board.import_snapshot(data)?)
}

/// ファイルから読み込み
pub fn import_file(board: &mut ReviewBoard, path: &Path) -> Result<Stats> {
    if !path.is_file() {
        return Err(ReviewBatchError::FileNotFound(path.display().to_string()));
    }
    let data = std::fs::read_to_string(path)?;
    import(board, &data)
}
