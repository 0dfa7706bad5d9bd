use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use swimbench::core::report::{render_json, render_markdown};
use swimbench::core::{ReferenceSource, ReportSink, SwimQuery};
use swimbench::domain::event::{Course, Gender};
use swimbench::domain::model::{AbilityLevel, Bracket, Division, Level};
use swimbench::utils::error::ErrorSeverity;
use swimbench::utils::validation::Validate;
use swimbench::{
    AnchorCurve, BenchmarkEngine, LocalStorage, ReferenceTables, StandardsStore, SwimBenchError, TomlConfig,
    TrainingFocusTable,
};
use tempfile::TempDir;

const MOTIVATIONAL: &str = "\
event,age_group,gender,course,level,time
100 Free,15-16,F,SCY,B,1:02.19
100 Free,15-16,F,SCY,BB,59.99
100 Free,15-16,F,SCY,A,57.79
100 Free,15-16,F,SCY,AA,56.29
100 Free,15-16,F,SCY,AAA,55.00
100 Free,15-16,F,SCY,AAAA,53.09
100 Back,15-16,F,SCY,B,1:08.59
100 Back,15-16,F,SCY,AAAA,57.49
";

const RECRUITING: &str = "\
division,event,gender,course,time
D1_ELITE,100 Free,F,SCY,52.00
D1_MID_MAJOR,100 Free,F,SCY,54.50
D1_LOW_MAJOR,100 Free,F,SCY,55.50
D2,100 Free,F,SCY,56.00
D3,100 Free,F,SCY,58.00
";

async fn write_tables(dir: &Path, motivational: &str, recruiting: &str) -> Result<LocalStorage> {
    let storage = LocalStorage::new(dir);
    let tables = ReferenceTables::default();
    storage
        .write_file(&tables.motivational, motivational.as_bytes())
        .await?;
    storage.write_file(&tables.recruiting, recruiting.as_bytes()).await?;
    Ok(storage)
}

async fn engine_over(dir: &Path) -> Result<BenchmarkEngine> {
    let storage = write_tables(dir, MOTIVATIONAL, RECRUITING).await?;
    let store = StandardsStore::load(&storage, &ReferenceTables::default()).await?;
    Ok(BenchmarkEngine::new(
        Arc::new(store),
        Arc::new(AnchorCurve::default()),
        TrainingFocusTable::default(),
    ))
}

fn query(time: &str, age: u8) -> SwimQuery {
    SwimQuery {
        event: "100 Free".to_string(),
        course: Some("SCY".to_string()),
        age,
        gender: Some("F".to_string()),
        time: time.to_string(),
    }
}

fn analyze(engine: &BenchmarkEngine, q: SwimQuery) -> swimbench::Result<swimbench::core::AnalysisResult> {
    let swim = q.into_result(Gender::Male, Course::Scy)?;
    engine.analyze(&swim)
}

#[tokio::test]
async fn test_end_to_end_analysis_from_csv() -> Result<()> {
    let dir = TempDir::new()?;
    let engine = engine_over(dir.path()).await?;

    let result = analyze(&engine, query("54.21", 15))?;

    assert_eq!(result.matched_level, Bracket::Level(Level::AAA));
    assert_eq!(result.next_level, Some(Level::AAAA));
    assert_eq!(result.next_level_time.map(|t| t.to_string()), Some("53.09".to_string()));
    assert_eq!(result.time_drop_needed.to_string(), "1.12");
    assert_eq!(result.ability_level, AbilityLevel::Advanced);
    assert!(result.percentile_estimate > 95.0 && result.percentile_estimate < 98.0);

    assert!(!result.recruiting_qualifications[&Division::D1Elite]);
    assert!(result.recruiting_qualifications[&Division::D1MidMajor]);
    assert!(result.recruiting_qualifications[&Division::D1LowMajor]);
    assert!(result.recruiting_qualifications[&Division::D2]);
    assert!(result.recruiting_qualifications[&Division::D3]);
    assert_eq!(result.standards_version, 1);

    let markdown = render_markdown(&result);
    assert!(markdown.contains("## 🏊 Swim Performance Analysis"));
    assert!(markdown.contains("AAA"));
    assert!(markdown.contains("D1 Elite Programs: Not Qualified"));

    let json: serde_json::Value = serde_json::from_str(&render_json(&result)?)?;
    assert_eq!(json["time_drop_needed"], serde_json::json!(1.12));
    Ok(())
}

#[tokio::test]
async fn test_threshold_is_inclusive() -> Result<()> {
    let dir = TempDir::new()?;
    let engine = engine_over(dir.path()).await?;

    let result = analyze(&engine, query("55.00", 16))?;
    assert_eq!(result.matched_level, Bracket::Level(Level::AAA));
    assert_eq!(result.percentile_estimate, 95.0);
    Ok(())
}

#[tokio::test]
async fn test_slower_than_every_level_is_below_minimum() -> Result<()> {
    let dir = TempDir::new()?;
    let engine = engine_over(dir.path()).await?;

    let result = analyze(&engine, query("1:05.00", 15))?;
    assert_eq!(result.matched_level, Bracket::BelowMinimum);
    assert_eq!(result.ability_level, AbilityLevel::Beginner);
    assert_eq!(result.next_level, Some(Level::B));
    assert_eq!(result.time_drop_needed.to_string(), "2.81");
    assert!(result.percentile_estimate < 50.0);
    assert!(result.recruiting_qualifications.values().all(|q| !q));
    Ok(())
}

#[tokio::test]
async fn test_faster_than_fastest_level() -> Result<()> {
    let dir = TempDir::new()?;
    let engine = engine_over(dir.path()).await?;

    let result = analyze(&engine, query("51.50", 15))?;
    assert_eq!(result.matched_level, Bracket::Level(Level::AAAA));
    assert_eq!(result.ability_level, AbilityLevel::Elite);
    assert_eq!(result.next_level, None);
    assert_eq!(result.next_level_time, None);
    assert!(result.time_drop_needed.is_zero());
    assert!(result.percentile_estimate >= 98.0);
    assert!(result.recruiting_qualifications.values().all(|q| *q));
    Ok(())
}

#[tokio::test]
async fn test_missing_reference_rows_are_not_found() -> Result<()> {
    let dir = TempDir::new()?;
    let engine = engine_over(dir.path()).await?;

    // no 11-12 ladder
    let err = analyze(&engine, query("1:00.00", 12)).unwrap_err();
    assert!(matches!(err, SwimBenchError::NotFoundError { .. }));
    assert_eq!(err.severity(), ErrorSeverity::High);

    // motivational ladder exists but no recruiting cutoffs
    let mut back = query("1:00.00", 15);
    back.event = "100 Back".to_string();
    let err = analyze(&engine, back).unwrap_err();
    assert!(matches!(err, SwimBenchError::NotFoundError { .. }));
    Ok(())
}

#[tokio::test]
async fn test_invalid_query_is_validation_error() -> Result<()> {
    let dir = TempDir::new()?;
    let engine = engine_over(dir.path()).await?;

    for bad in [query("0.00", 15), query("-54.21", 15), query("fast", 15), query("54.21", 19)] {
        let err = analyze(&engine, bad).unwrap_err();
        assert!(matches!(err, SwimBenchError::ValidationError { .. }), "{:?}", err);
    }

    // 1000 Free is not swum long course
    let mut lcm = query("10:00.00", 15);
    lcm.event = "1000 Free".to_string();
    lcm.course = Some("LCM".to_string());
    assert!(analyze(&engine, lcm).is_err());
    Ok(())
}

#[tokio::test]
async fn test_query_defaults_apply() -> Result<()> {
    let swim = SwimQuery {
        event: "200 IM".to_string(),
        course: None,
        age: 14,
        gender: None,
        time: "2:10.45".to_string(),
    }
    .into_result(Gender::Male, Course::Scy)?;

    assert_eq!(swim.gender, Gender::Male);
    assert_eq!(swim.course, Course::Scy);
    Ok(())
}

#[tokio::test]
async fn test_bad_reference_row_fails_load() -> Result<()> {
    let dir = TempDir::new()?;
    let bad = format!("{}100 Free,15-16,F,SCY,AAAA,abc\n", MOTIVATIONAL.replace("100 Free,15-16,F,SCY,AAAA,53.09\n", ""));
    let storage = write_tables(dir.path(), &bad, RECRUITING).await?;

    let err = StandardsStore::load(&storage, &ReferenceTables::default())
        .await
        .err()
        .ok_or_else(|| anyhow::anyhow!("load should fail"))?;
    assert!(matches!(err, SwimBenchError::ReferenceDataError { .. }));
    assert_eq!(err.severity(), ErrorSeverity::Critical);
    Ok(())
}

#[tokio::test]
async fn test_non_monotonic_ladder_fails_load() -> Result<()> {
    let dir = TempDir::new()?;
    let swapped = MOTIVATIONAL.replace("AAA,55.00", "AAA,56.50");
    let storage = write_tables(dir.path(), &swapped, RECRUITING).await?;

    let err = StandardsStore::load(&storage, &ReferenceTables::default())
        .await
        .err()
        .ok_or_else(|| anyhow::anyhow!("load should fail"))?;
    assert!(matches!(err, SwimBenchError::AmbiguousDataError { .. }));
    Ok(())
}

#[tokio::test]
async fn test_report_written_through_sink() -> Result<()> {
    let dir = TempDir::new()?;
    let engine = engine_over(dir.path()).await?;
    let result = analyze(&engine, query("54.21", 15))?;

    let reports = LocalStorage::new(dir.path().join("reports"));
    reports
        .write_file("2024/analysis.md", render_markdown(&result).as_bytes())
        .await?;

    let written = reports.read_file("2024/analysis.md").await?;
    assert!(String::from_utf8(written)?.contains("### 🎯 Next Goals"));
    Ok(())
}

#[tokio::test]
async fn test_shipped_configuration_and_data() -> Result<()> {
    let root = Path::new(env!("CARGO_MANIFEST_DIR"));
    let mut settings = TomlConfig::from_file(root.join("swimbench.toml"))?;
    settings.reference.base_path = root.join("data").display().to_string();
    settings.validate()?;

    let source = settings.build_source()?;
    let store = Arc::new(StandardsStore::load(source.as_ref(), &settings.reference_tables()).await?);
    let summary = store.snapshot().summary();
    assert!(summary.events.contains("100 Free SCY"));
    assert!(summary.recruiting_rows > 0);

    let engine = BenchmarkEngine::new(store, Arc::new(settings.percentile_curve()?), settings.focus_table());
    let swim = query("54.21", 15).into_result(settings.default_gender()?, settings.default_course()?)?;
    let result = engine.analyze(&swim)?;
    assert_eq!(result.matched_level, Bracket::Level(Level::AAA));
    assert_eq!(result.time_drop_needed.to_string(), "1.12");
    Ok(())
}

#[tokio::test]
async fn test_configured_refresh_interval_picks_up_new_tables() -> Result<()> {
    let dir = TempDir::new()?;
    let storage = write_tables(dir.path(), MOTIVATIONAL, RECRUITING).await?;

    let mut settings = TomlConfig::default();
    settings.reference.base_path = dir.path().display().to_string();
    settings.reference.refresh_interval_seconds = Some(1);
    settings.validate()?;

    let source = settings.build_source()?;
    let store = Arc::new(StandardsStore::load(source.as_ref(), &settings.reference_tables()).await?);
    let engine = BenchmarkEngine::new(store.clone(), Arc::new(AnchorCurve::default()), TrainingFocusTable::default());
    assert_eq!(analyze(&engine, query("54.95", 15))?.matched_level, Bracket::Level(Level::AAA));

    let handle = settings.start_refresh(store.clone(), source)?;
    storage
        .write_file(
            &settings.reference.motivational,
            MOTIVATIONAL.replace("AAA,55.00", "AAA,54.89").as_bytes(),
        )
        .await?;

    let mut waited = Duration::ZERO;
    while store.version() < 2 && waited < Duration::from_secs(10) {
        tokio::time::sleep(Duration::from_millis(100)).await;
        waited += Duration::from_millis(100);
    }
    handle.abort();

    assert!(store.version() >= 2);
    assert_eq!(analyze(&engine, query("54.95", 15))?.matched_level, Bracket::Level(Level::AA));
    Ok(())
}

#[tokio::test]
async fn test_refresh_without_interval_is_config_error() -> Result<()> {
    let dir = TempDir::new()?;
    let storage = Arc::new(write_tables(dir.path(), MOTIVATIONAL, RECRUITING).await?);
    let store = Arc::new(StandardsStore::load(storage.as_ref(), &ReferenceTables::default()).await?);

    let err = TomlConfig::default()
        .start_refresh(store, storage)
        .err()
        .ok_or_else(|| anyhow::anyhow!("refresh should need an interval"))?;
    assert!(matches!(err, SwimBenchError::MissingConfigError { .. }));
    Ok(())
}
