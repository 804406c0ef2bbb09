//! review-batch: レビュー下書きの一括作成・進捗管理
//!
//! 作業セットの状態管理は review_batch_common、ここはCLI側
//! （設定、作業セットファイル、写真の非同期読み込み、クリップボード）。

pub mod cli;
pub mod clipboard;
pub mod commands;
pub mod config;
pub mod decoder;
pub mod error;
pub mod scanner;
pub mod session;
