use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use swimbench::config::Command;
use swimbench::core::report::{render_json, render_markdown};
use swimbench::core::{ReferenceSource, ReportSink};
use swimbench::domain::event::{Course, Event};
use swimbench::utils::error::ErrorSeverity;
use swimbench::utils::{logger, validation::Validate};
use swimbench::{BenchmarkEngine, CliConfig, LocalStorage, StandardsStore, SwimBenchError, TomlConfig};

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    // 載入配置
    let settings = match cli.load_settings() {
        Ok(settings) => settings,
        Err(e) => exit_with(&e),
    };

    // 初始化日誌
    if cli.json_logs || settings.json_logs() {
        logger::init_json_logger(settings.log_level());
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    tracing::debug!("CLI config: {:?}", cli);

    // 驗證配置
    if let Err(e) = settings.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        exit_with(&e);
    }

    if let Err(e) = run(cli.command, &settings).await {
        tracing::error!(
            "❌ swimbench failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        exit_with(&e);
    }
}

async fn run(command: Command, settings: &TomlConfig) -> swimbench::Result<()> {
    match command {
        Command::Events { course } => list_events(course.as_deref()),
        Command::Check { watch } => {
            let (store, source) = load_store(settings).await?;
            print_summary(&store);
            if watch {
                watch_refreshes(settings, store, source).await?;
            }
            Ok(())
        }
        Command::Analyze(args) => {
            let output = args.output_path()?;
            let swim = args
                .to_query()
                .into_result(settings.default_gender()?, settings.default_course()?)?;
            let (store, _) = load_store(settings).await?;
            let engine = BenchmarkEngine::new(
                store,
                Arc::new(settings.percentile_curve()?),
                settings.focus_table(),
            );
            let analysis = engine.analyze(&swim)?;

            let rendered = if args.json {
                render_json(&analysis)?
            } else {
                render_markdown(&analysis)
            };
            println!("{}", rendered);

            if let Some(output) = output {
                LocalStorage::new(".").write_file(output, rendered.as_bytes()).await?;
                tracing::info!("📁 Report saved to: {}", output);
            }
            Ok(())
        }
    }
}

async fn load_store(settings: &TomlConfig) -> swimbench::Result<(Arc<StandardsStore>, Arc<dyn ReferenceSource>)> {
    let source = settings.build_source()?;
    let store = StandardsStore::load(source.as_ref(), &settings.reference_tables()).await?;
    Ok((Arc::new(store), source))
}

fn print_summary(store: &StandardsStore) {
    let summary = store.snapshot().summary();
    println!("✅ Reference data v{} loaded at {}", summary.version, summary.loaded_at);
    println!(
        "📊 {} motivational rows across {} ladders",
        summary.motivational_rows, summary.motivational_keys
    );
    println!(
        "🎓 {} recruiting rows across {} events",
        summary.recruiting_rows, summary.recruiting_keys
    );
    println!("🏊 Events: {}", summary.events.into_iter().collect::<Vec<_>>().join(", "));
}

/// Keeps the store refreshing and prints each new version until Ctrl-C.
async fn watch_refreshes(
    settings: &TomlConfig,
    store: Arc<StandardsStore>,
    source: Arc<dyn ReferenceSource>,
) -> swimbench::Result<()> {
    let handle = settings.start_refresh(Arc::clone(&store), source)?;
    println!("👀 Watching for reference updates (Ctrl-C to stop)");

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);
    let mut seen = store.version();
    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            _ = ticker.tick() => {
                let live = store.version();
                if live != seen {
                    seen = live;
                    print_summary(&store);
                }
            }
        }
    }

    handle.abort();
    Ok(())
}

fn list_events(course: Option<&str>) -> swimbench::Result<()> {
    let courses = match course {
        Some(c) => vec![c.parse::<Course>()?],
        None => Course::ALL.to_vec(),
    };

    for course in courses {
        let names: Vec<String> = Event::catalog(course).iter().map(Event::to_string).collect();
        println!("{}: {}", course, names.join(", "));
    }
    Ok(())
}

fn exit_with(e: &SwimBenchError) -> ! {
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    // 根據錯誤嚴重程度決定退出碼
    let exit_code = match e.severity() {
        ErrorSeverity::High => 1,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}
