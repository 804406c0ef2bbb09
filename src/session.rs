//! 作業セットの保存ファイル
//!
//! CLIは呼び出しごとにプロセスが終わるため、作業セット（項目・状態・
//! 表示中のタブ）をJSONファイルに残して次の呼び出しで復元する。

use crate::error::Result;
use review_batch_common::{Partition, ReviewBoard, ReviewItem};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

/// 保存ファイルの構造
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionFile {
    /// バージョン（互換性チェック用）
    version: u32,
    /// 表示中のタブ
    #[serde(default)]
    visible: Partition,
    /// 作業セット（表示順）
    #[serde(default)]
    items: Vec<ReviewItem>,
}

impl SessionFile {
    const CURRENT_VERSION: u32 = 1;

    /// 読み込み。存在しない・壊れている場合は空
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "session file unreadable, starting empty");
                return Self::default();
            }
        };

        let reader = BufReader::new(file);
        match serde_json::from_reader::<_, SessionFile>(reader) {
            Ok(session) => {
                if session.version != Self::CURRENT_VERSION {
                    warn!(found = session.version, "session version mismatch, starting empty");
                    return Self::default();
                }
                session
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "session file corrupted, starting empty");
                Self::default()
            }
        }
    }

    /// 保存
    ///
    /// 同じフォルダの一時ファイルに書き切ってから置き換えるので、
    /// 途中で止まっても前回の内容は残る。
    pub fn save(&self, path: &Path) -> Result<()> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir)?;

        let mut temp = NamedTempFile::new_in(dir)?;
        {
            let mut writer = BufWriter::new(temp.as_file_mut());
            serde_json::to_writer(&mut writer, self)?;
            writer.flush()?;
        }
        temp.as_file().sync_all()?;
        temp.persist(path).map_err(|e| e.error)?;
        debug!(path = %path.display(), items = self.items.len(), "session saved");
        Ok(())
    }

    pub fn from_board(board: &ReviewBoard) -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            visible: board.visible(),
            items: board.items().to_vec(),
        }
    }

    pub fn into_board(self) -> ReviewBoard {
        ReviewBoard::from_items(self.items, self.visible)
    }
}

impl Default for SessionFile {
    fn default() -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            visible: Partition::Undone,
            items: Vec::new(),
        }
    }
}

/// 作業セットを読み込んで board にする
pub fn load_board(path: &Path) -> ReviewBoard {
    SessionFile::load(path).into_board()
}

/// board を保存
pub fn save_board(path: &Path, board: &ReviewBoard) -> Result<()> {
    SessionFile::from_board(board).save(path)
}
