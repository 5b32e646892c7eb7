use anyhow::{Context, Result};
use caption_review::backend::MockBackend;
use caption_review::caption::Captioner;
use caption_review::cli::{Cli, Commands};
use caption_review::config::SystemConfig;
use caption_review::dashboard::{self, Dashboard};
use caption_review::gemini::{GeminiClient, HttpTransport};
use caption_review::ingest::{self, IngestCaptioner, IngestSummary};
use caption_review::judge::{JudgeClient, Scoreboard};
use caption_review::ollama::{HttpOllama, OllamaClient};
use caption_review::review::{prompt_session_action, ReviewAction, SessionAction};
use caption_review::scanner;
use caption_review::store::mock::{generate_mock_items, DEFAULT_MOCK_COUNT};
use caption_review::store::{ItemStore, StatusFilter};
use caption_review_common::prompts::DEFAULT_CAPTION_PROMPT;
use caption_review_common::{AggregateStats, BenchmarkCategory, ItemStatus, PipelineItem};
use clap::Parser;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli).await {
        error!(error = %err, "command failed");
        for cause in err.chain().skip(1) {
            error!(cause = %cause, "caused by");
        }
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let config = SystemConfig::load()?;

    match cli.command {
        Commands::Queue { status, folder, json } => {
            let store = load_store(folder.as_deref(), &config).await?;
            let filter = status
                .map(|s| StatusFilter::Only(s.into()))
                .unwrap_or_default();
            let items = store.filter(filter);

            if json {
                println!("{}", serde_json::to_string_pretty(&items)?);
            } else {
                println!("📋 審査キュー ({}件)\n", items.len());
                for item in &items {
                    print_item(item, config.auto_approve_confidence);
                }
            }
        }

        Commands::Stats { folder } => {
            let store = load_store(folder.as_deref(), &config).await?;
            let backend = MockBackend::new(store);
            print_stats(&backend.get_stats().await);
        }

        Commands::Review { folder } => {
            let store = load_store(folder.as_deref(), &config).await?;
            run_review_session(store, &config).await?;
        }

        Commands::Ingest { folder, output } => {
            let folder = folder.unwrap_or_else(|| config.watch_path.clone());
            let output = output.unwrap_or_else(|| config.output_path.clone());

            let mut items = scanner::scan_folder(&folder)?;
            println!("📷 {}件の画像を取り込みます: {}\n", items.len(), folder.display());

            let summary = caption_scanned(&mut items, &config).await?;
            for item in items.iter().filter(|i| i.status == ItemStatus::Pending) {
                let dir = ingest::write_artifacts(item, &config.model, &output)?;
                println!("  ✔ {} ({}) → {}", item.file_name, item.source, dir.display());
            }
            for item in items.iter().filter(|i| i.status == ItemStatus::Failed) {
                println!("  ✖ {}", item.file_name);
            }
            print_ingest_summary(&summary);
        }

        Commands::Watch { folder, interval, ticks } => {
            let store = load_store(folder.as_deref(), &config).await?;
            let mut dash = Dashboard::new(Arc::new(MockBackend::new(store)));
            let interval = Duration::from_secs(interval.max(1));

            println!("👀 {}秒ごとに更新します (Ctrl+Cで終了)\n", interval.as_secs());
            dashboard::poll(&mut dash, interval, ticks, |d| {
                println!("--- {} ---", chrono::Local::now().format("%H:%M:%S"));
                print_stats(d.stats());
            })
            .await;
        }

        Commands::Challenge { category } => {
            let category: BenchmarkCategory = category.into();
            let judge = judge_client(&config)?;

            println!("🧪 {} の問題を生成中...\n", category.info().label);
            let challenge = judge.request_challenge_or_fallback(category).await?;
            println!("{}", challenge);
        }

        Commands::Evaluate { category, prompt, output, image, scoreboard, model_name } => {
            let category: BenchmarkCategory = category.into();
            let judge = judge_client(&config)?;

            let image_bytes = match &image {
                Some(path) => Some(
                    std::fs::read(path)
                        .with_context(|| format!("画像を読み込めません: {}", path.display()))?,
                ),
                None => None,
            };
            if image_bytes.is_some() && !category.is_vision() {
                println!("⚠ {} は画像を使わないため、画像は送信しません", category.info().label);
            }

            println!("⚖ 採点中... ({})\n", category.info().label);
            let verdict = judge
                .evaluate(category, &prompt, &output, image_bytes.as_deref())
                .await?;

            println!("スコア: {:.1} / 5", verdict.score);
            println!("理由: {}", verdict.reasoning);
            for (metric, score) in &verdict.breakdown {
                println!("  {}: {}", metric, score);
            }

            let mut board = Scoreboard::load(&scoreboard);
            if let Some(name) = model_name {
                board.model_name = name;
            }
            board.record(category, verdict);
            board.save(&scoreboard)?;
            println!("\n✔ スコアボードに記録: {}", scoreboard.display());
        }

        Commands::Scoreboard { path } => {
            let board = Scoreboard::load(&path);
            println!("🏆 {} のスコアボード\n", board.model_name);
            for point in board.radar_points() {
                let stars = "★".repeat(point.score.round() as usize);
                println!("  {:<14} {:>3.1} {}", point.subject, point.score, stars);
            }
            println!("\n総合: {:.1}", board.average_score());
        }

        Commands::Config { set_api_key, fallback, show } => {
            let mut config = config;

            if let Some(key) = set_api_key {
                config.set_api_key(key)?;
                println!("✔ APIキーを設定しました");
            }

            if let Some(enabled) = fallback {
                config.use_gemini_fallback = enabled;
                config.save()?;
                println!("✔ Gemini備援: {}", if enabled { "有効" } else { "無効" });
            }

            if show {
                println!("設定:");
                println!("  Ollama URL: {}", config.ollama_url);
                println!("  モデル: {}", config.model);
                println!(
                    "  再試行: {}回 (初回待ち {}ms, タイムアウト {}秒)",
                    config.ollama_retries, config.retry_delay_ms, config.ollama_timeout_secs
                );
                println!("  Judgeモデル: {}", config.judge_model);
                println!("  Gemini備援: {}", if config.use_gemini_fallback { "有効" } else { "無効" });
                println!("  APIキー: {}", if config.get_api_key().is_ok() { "設定済み" } else { "未設定" });
                println!("  高信頼しきい値: {}", config.auto_approve_confidence);
                println!("  入力フォルダ: {}", config.watch_path.display());
                println!("  出力フォルダ: {}", config.output_path.display());
            }
        }
    }

    Ok(())
}

/// フォルダ指定（なければ watch_path）があれば取り込んで説明文を生成、なければモック
async fn load_store(folder: Option<&Path>, config: &SystemConfig) -> Result<ItemStore> {
    let folder = match folder {
        Some(folder) => Some(folder),
        None if config.watch_path.is_dir() => Some(config.watch_path.as_path()),
        None => None,
    };

    let items = match folder {
        Some(folder) => {
            let mut items = scanner::scan_folder(folder)?;
            let summary = caption_scanned(&mut items, config).await?;
            info!(
                folder = %folder.display(),
                local = summary.local,
                fallback = summary.fallback,
                failed = summary.failed,
                "folder ingested"
            );
            items
        }
        None => generate_mock_items(DEFAULT_MOCK_COUNT),
    };
    Ok(ItemStore::new(items))
}

async fn caption_scanned(items: &mut [PipelineItem], config: &SystemConfig) -> Result<IngestSummary> {
    let local = OllamaClient::new(
        HttpOllama::new(config.ollama_url.clone(), config.ollama_timeout())?,
        config.model.clone(),
        config.retry_policy(),
    );
    let fallback = if config.use_gemini_fallback {
        match config.get_api_key() {
            Ok(key) => Some(GeminiClient::new(HttpTransport::new(), key, config.judge_model.clone())),
            Err(e) => {
                warn!(error = %e, "Gemini備援は有効ですがAPIキーがありません");
                None
            }
        }
    } else {
        None
    };

    let captioner = IngestCaptioner::new(local, fallback, DEFAULT_CAPTION_PROMPT);
    Ok(captioner.caption_items(items).await)
}

fn print_ingest_summary(summary: &IngestSummary) {
    println!(
        "  生成: ローカル {}件 / Gemini備援 {}件 / 失敗 {}件\n",
        summary.local, summary.fallback, summary.failed
    );
}

fn judge_client(config: &SystemConfig) -> Result<JudgeClient<HttpTransport>> {
    let api_key = config.get_api_key()?;
    Ok(JudgeClient::new(GeminiClient::new(
        HttpTransport::new(),
        api_key,
        config.judge_model.clone(),
    )))
}

fn print_item(item: &PipelineItem, threshold: f64) {
    let marker = if item.is_high_confidence(threshold) { " ★" } else { "" };
    println!(
        "  [{:<10}] {}  {}  ({}){}",
        item.status, item.id, item.file_name, item.source, marker
    );
}

fn print_stats(stats: &AggregateStats) {
    println!("  合計: {}", stats.total);
    for status in ItemStatus::ALL {
        println!("  {:<10}: {}", status, stats.count(status));
    }
    println!("  承認率: {:.1}%", stats.approval_rate * 100.0);
    println!("  平均処理時間: {:.0}ms", stats.avg_processing_time_ms);
    println!("  稼働時間: {}", stats.uptime);
}

async fn run_review_session(store: ItemStore, config: &SystemConfig) -> Result<()> {
    let mut dash = Dashboard::new(Arc::new(MockBackend::new(store)));
    dash.refresh().await;

    let captioner = config.get_api_key().ok().map(|key| {
        Captioner::new(
            GeminiClient::new(HttpTransport::new(), key, config.judge_model.clone()),
            config.use_gemini_fallback,
        )
    });
    let can_regenerate = config.use_gemini_fallback && captioner.is_some();

    let pending: Vec<PipelineItem> = dash
        .filtered(StatusFilter::Only(ItemStatus::Pending))
        .into_iter()
        .cloned()
        .collect();

    if pending.is_empty() {
        println!("✓ 審査待ちのアイテムはありません");
        return Ok(());
    }

    println!("📝 審査待ち: {}件\n", pending.len());

    'items: for (count, item) in pending.iter().enumerate() {
        println!("[{}/{}] {} ({})", count + 1, pending.len(), item.file_name, item.id);
        let mut description: Option<String> = None;

        loop {
            println!("  説明: {}", description.as_deref().unwrap_or(&item.description));

            let outcome = match prompt_session_action(item, can_regenerate)? {
                SessionAction::Approve => {
                    dash.review(&item.id, ReviewAction::Approve, description.as_deref()).await
                }
                SessionAction::Reject => {
                    dash.review(&item.id, ReviewAction::Reject, description.as_deref()).await
                }
                SessionAction::EditAndApprove(edited) => {
                    dash.review(&item.id, ReviewAction::Approve, Some(edited.as_str())).await
                }
                SessionAction::Regenerate => {
                    if let Some(captioner) = &captioner {
                        let image = std::fs::read(&item.file_path).ok();
                        match captioner.regenerate(image.as_deref(), DEFAULT_CAPTION_PROMPT).await {
                            Ok(text) => description = Some(text),
                            Err(e) => println!("  ⚠ 生成失敗、後でもう一度お試しください: {}", e),
                        }
                    }
                    continue;
                }
                SessionAction::Skip => {
                    println!("  → スキップ\n");
                    continue 'items;
                }
                SessionAction::Quit => break 'items,
            };

            match outcome {
                Ok(updated) => println!("  → {} ({})\n", updated.status, updated.source),
                Err(e) => println!("  ⚠ {}\n", e),
            }
            continue 'items;
        }
    }

    println!("\n集計:");
    print_stats(dash.stats());
    Ok(())
}
