use clap::Parser;
use review_batch::clipboard::{ClipboardSink, SystemClipboard};
use review_batch::{cli, commands, config, error, scanner, session};
use cli::{Cli, Commands};
use config::Config;
use error::Result;
use std::io::Read;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "review_batch=debug,review_batch_common=debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn read_stdin() -> Result<String> {
    let mut buffer = String::new();
    std::io::stdin().read_to_string(&mut buffer)?;
    Ok(buffer)
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;
    let workspace = config.workspace_path(cli.workspace.as_ref());

    match cli.command {
        Commands::Generate { link, input, text, photos, photo_dir, no_normalize } => {
            println!("📝 review-batch - 作業セット作成\n");

            let raw = match (input, text) {
                (Some(path), _) => {
                    if !path.is_file() {
                        return Err(error::ReviewBatchError::FileNotFound(path.display().to_string()));
                    }
                    std::fs::read_to_string(&path)?
                }
                (None, Some(text)) => text,
                (None, None) => read_stdin()?,
            };

            let photos = scanner::collect_photos(&photos, photo_dir.as_deref())?;
            let options = if no_normalize { None } else { config.normalize_options() };
            if !photos.is_empty() {
                println!("[1/2] 写真を読み込み中... ({}枚)", photos.len());
            }

            let mut board = session::load_board(&workspace);
            let stats = commands::generate(&mut board, &raw, &link, &photos, options, !cli.verbose).await?;
            session::save_board(&workspace, &board)?;

            println!("✔ {}", commands::stats_line(&stats));
            println!("✔ 作業セットを保存: {}", workspace.display());
        }

        Commands::List { tab } => {
            let board = session::load_board(&workspace);
            println!("{}", commands::list(&board, tab));
        }

        Commands::Tab { tab } => {
            let mut board = session::load_board(&workspace);
            board.show(tab);
            session::save_board(&workspace, &board)?;
            println!("✔ 表示タブ: {}", tab);
            println!("{}", commands::list(&board, None));
        }

        Commands::Toggle { index } => {
            let mut board = session::load_board(&workspace);
            let status = board.toggle(index)?;
            session::save_board(&workspace, &board)?;
            println!("✔ #{} → {}", index, status);
            println!("{}", commands::stats_line(&board.stats()));
        }

        Commands::Copy { index, stdout } => {
            let board = session::load_board(&workspace);
            if stdout {
                let item = board
                    .get(index)
                    .ok_or(review_batch_common::Error::UnknownItem(index))?;
                println!("{}", review_batch_common::clipboard_text(item));
            } else {
                commands::copy(&board, index, &mut SystemClipboard)?;
            }
        }

        Commands::Stats => {
            let board = session::load_board(&workspace);
            println!("{}", commands::stats_line(&board.stats()));
        }

        Commands::Export { output, no_clipboard } => {
            let board = session::load_board(&workspace);
            let mut clipboard = SystemClipboard;
            let sink: Option<&mut dyn ClipboardSink> =
                if no_clipboard { None } else { Some(&mut clipboard) };
            let data = commands::export(&board, output.as_deref(), sink)?;
            match output {
                Some(path) => println!("✔ 書き出し: {} ({}件)", path.display(), board.items().len()),
                None => println!("{}", data),
            }
        }

        Commands::Import { file, data } => {
            let mut board = session::load_board(&workspace);
            let stats = match (file, data) {
                (Some(path), _) => commands::import_file(&mut board, &path)?,
                (None, Some(data)) => commands::import(&mut board, &data)?,
                (None, None) => commands::import(&mut board, &read_stdin()?)?,
            };
            session::save_board(&workspace, &board)?;
            println!("✔ 読み込み完了");
            println!("{}", commands::stats_line(&stats));
        }

        Commands::Config { show, max_width, max_height, quality, normalize } => {
            let mut config = config;
            let changed = max_width.is_some() || max_height.is_some() || quality.is_some() || normalize.is_some();

            if let Some(width) = max_width {
                config.max_width = width;
            }
            if let Some(height) = max_height {
                config.max_height = height;
            }
            if let Some(quality) = quality {
                config.quality = quality;
            }
            if let Some(normalize) = normalize {
                config.normalize_photos = normalize;
            }

            if changed {
                config.validate()?;
                config.save()?;
                println!("✔ 設定を保存しました");
            }

            if show || !changed {
                println!("設定:");
                println!("  写真の縮小: {}", if config.normalize_photos { "有効" } else { "無効" });
                println!("  最大サイズ: {}x{}px", config.max_width, config.max_height);
                println!("  JPEG品質: {}", config.quality);
                println!("  作業セット: {}", workspace.display());
            }
        }
    }

    Ok(())
}
