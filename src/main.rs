use clap::Parser;
use fod_inspect::{cli, config, detector, error, pipeline, report, scanner, session};
use cli::{Cli, Commands};
use config::Config;
use error::{InspectError, Result};
use fod_inspect_common::{BatchMeta, ChangeNotifier, InspectionStore, ProjectRef, SessionStore};
use indicatif::{ProgressBar, ProgressStyle};
use session::FileStorage;
use std::io::Read;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load()?;
    let session_name = config.session_name(cli.session.as_deref());
    let session_root = FileStorage::default_root();

    let open_store = || {
        SessionStore::new(
            FileStorage::open(&session_root, &session_name),
            ChangeNotifier::default(),
        )
    };

    match cli.command {
        Commands::Inspect { paths, project_id, project_name, specs } => {
            println!("🔍 fod-inspect - 異物検査\n");

            // 1. 画像スキャン
            println!("[1/3] 画像をスキャン中...");
            let images = scanner::scan_paths(&paths)?;
            println!("✔ {}枚の画像を検出\n", images.len());

            if images.is_empty() {
                return Err(InspectError::NoImagesFound(
                    paths.iter().map(|p| p.display().to_string()).collect::<Vec<_>>().join(", "),
                ));
            }

            // 2. 検出サービス呼び出し（1枚ずつ順番に）
            let api_url = config.api_url();
            println!("[2/3] AI検査中... ({})", api_url);
            let detector = detector::HttpDetector::new(&api_url, Duration::from_secs(config.timeout_seconds))?;

            let progress = ProgressBar::new(images.len() as u64);
            if let Ok(style) = ProgressStyle::with_template("  {bar:40} {pos}/{len} {percent}%") {
                progress.set_style(style);
            }

            let design_specs = if specs.is_empty() { config.design_specs.clone() } else { specs };
            let project = if project_id.is_some() || project_name.is_some() {
                Some(ProjectRef { id: project_id, name: project_name })
            } else {
                None
            };
            let meta = BatchMeta { project, design_specs };

            let mut store = open_store();
            let mut updates = store.subscribe();
            let (id, run) = pipeline::inspect_and_save(&mut store, &detector, &images, meta, |done, _total| {
                progress.set_position(done as u64);
            })
            .await?;
            progress.finish_and_clear();

            if run.fallback_count > 0 {
                println!("⚠ {}枚は検出サービスに接続できず、オフライン結果を使用", run.fallback_count);
            }
            println!("✔ 検査完了\n");

            // 3. 結果表示
            println!("[3/3] 結果を保存中...");
            if updates.try_recv().is_ok() {
                tracing::debug!(session = %session_name, "inspection store updated");
            }
            let record = store.get(&id).ok_or_else(|| InspectError::NotFound(id.clone()))?;
            println!("{}", report::format_record_detail(&record));
            println!("\n✅ 保存しました: {}", id);
        }

        Commands::Parse { file } => {
            let text = match file {
                Some(path) => {
                    if !path.exists() {
                        return Err(InspectError::FileNotFound(path.display().to_string()));
                    }
                    std::fs::read_to_string(&path)?
                }
                None => {
                    let mut buf = String::new();
                    std::io::stdin().read_to_string(&mut buf)?;
                    buf
                }
            };

            let parsed = report::ParseReport::from_text(&text);
            println!("{}", serde_json::to_string_pretty(&parsed)?);
        }

        Commands::List { json } => {
            let store = open_store();
            let records = store.list();

            if json {
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else if records.is_empty() {
                println!("検査記録はありません（セッション: {}）", session_name);
            } else {
                for record in &records {
                    println!("{}", report::format_record_line(record));
                }
            }
        }

        Commands::Show { id, json } => {
            let store = open_store();
            let record = store.get(&id).ok_or_else(|| InspectError::NotFound(id.clone()))?;

            if json {
                println!("{}", serde_json::to_string_pretty(&record)?);
            } else {
                println!("{}", report::format_record_detail(&record));
            }
        }

        Commands::Remove { id } => {
            let mut store = open_store();
            if store.remove(&id) {
                println!("✔ 削除しました: {}", id);
            } else {
                return Err(InspectError::NotFound(id));
            }
        }

        Commands::Session { clear, info } => {
            let path = FileStorage::session_path(&session_root, &session_name);

            if info || !clear {
                // デフォルトまたは--info: 情報表示
                println!("セッション情報:");
                println!("  名前: {}", session_name);
                println!("  パス: {}", path.display());
                if path.exists() {
                    println!("  件数: {}", open_store().len());
                    if let Ok(meta) = std::fs::metadata(&path) {
                        println!("  サイズ: {} bytes", meta.len());
                    }
                } else {
                    println!("  セッションファイルはまだありません");
                }
            }

            if clear {
                if !path.exists() {
                    println!("セッションファイルが存在しません");
                } else {
                    let mut store = open_store();
                    let mut updates = store.subscribe();
                    store.clear();
                    if updates.try_recv().is_ok() {
                        tracing::debug!(session = %session_name, "inspection store cleared");
                    }
                    if path.exists() {
                        println!("セッション削除エラー: {}", path.display());
                    } else {
                        println!("✔ セッションを終了しました: {}", path.display());
                    }
                }
            }
        }

        Commands::Config { set_api_url, show } => {
            let mut config = config;

            if let Some(url) = set_api_url {
                config.set_api_url(url)?;
                println!("✔ 検出サービスのURLを設定しました");
            }

            if show {
                println!("設定:");
                println!("  検出サービス: {}", config.api_url());
                println!("  タイムアウト: {}秒", config.timeout_seconds);
                println!("  セッション: {}", session_name);
                if config.design_specs.is_empty() {
                    println!("  設計仕様: 未設定");
                } else {
                    println!("  設計仕様: {}", config.design_specs.join(", "));
                }
            }
        }
    }

    Ok(())
}
