use clap::{Parser, Subcommand};
use review_batch_common::Partition;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "review-batch")]
#[command(about = "レビュー下書きの一括作成・進捗管理ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// 作業セットファイル（省略時は設定・環境変数・カレントの順）
    #[arg(long, global = true)]
    pub workspace: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// レビュー本文と写真から作業セットを作り直す
    Generate {
        /// 共有リンク
        #[arg(short, long, required = true)]
        link: String,

        /// レビュー本文ファイル（空行区切り）
        #[arg(short, long, conflicts_with = "text")]
        input: Option<PathBuf>,

        /// レビュー本文を直接指定（省略時は標準入力）
        #[arg(short, long)]
        text: Option<String>,

        /// 写真ファイル（段落と同じ順に対応）
        #[arg(short, long, num_args = 1..)]
        photos: Vec<PathBuf>,

        /// 写真フォルダ（ファイル名順に対応）
        #[arg(long)]
        photo_dir: Option<PathBuf>,

        /// 写真を縮小せずに埋め込む
        #[arg(long)]
        no_normalize: bool,
    },

    /// 表示中（または指定）のタブの項目を一覧
    List {
        /// タブ (done/undone)
        #[arg(long)]
        tab: Option<Partition>,
    },

    /// 表示するタブを切り替え
    Tab {
        /// タブ (done/undone)
        tab: Partition,
    },

    /// 完了/未完了を切り替え
    Toggle {
        /// 項目番号
        index: usize,
    },

    /// 項目をクリップボードへコピー
    Copy {
        /// 項目番号
        index: usize,

        /// クリップボードではなく標準出力へ
        #[arg(long)]
        stdout: bool,
    },

    /// 件数を表示
    Stats,

    /// 作業セットを書き出し
    Export {
        /// 出力ファイル（省略時は標準出力のみ）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// クリップボードへコピーしない
        #[arg(long)]
        no_clipboard: bool,
    },

    /// 書き出したデータを読み込み
    Import {
        /// データファイル
        #[arg(short, long, conflicts_with = "data")]
        file: Option<PathBuf>,

        /// データを直接指定（省略時は標準入力）
        #[arg(short, long)]
        data: Option<String>,
    },

    /// 設定を表示/編集
    Config {
        /// 設定を表示
        #[arg(long)]
        show: bool,

        /// 最大幅(px)
        #[arg(long)]
        max_width: Option<u32>,

        /// 最大高さ(px)
        #[arg(long)]
        max_height: Option<u32>,

        /// JPEG品質 (1-100)
        #[arg(long)]
        quality: Option<u8>,

        /// 写真を縮小するか (true/false)
        #[arg(long)]
        normalize: Option<bool>,
    },
}
