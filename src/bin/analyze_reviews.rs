use anyhow::{bail, Context};
use revai_lib::models::{AnalysisReport, CategoryVerdict, FakeVerdict, ReviewBatch, SentimentVerdict};
use revai_lib::services::config_store::ConfigStore;
use revai_lib::services::review_source::{collect_reviews, extract_asin, RapidApiReviewSource};
use revai_lib::services::text_processor::preview;
use revai_lib::services::analysis::{JitterSource, SeededJitter};
use revai_lib::services::{AppConfig, ModelGate, ReviewAnalyzer};
use serde::Serialize;
use std::sync::Arc;

fn parse_arg_value(args: &[String], key: &str) -> Option<String> {
    args.iter()
        .position(|a| a == key)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

fn has_flag(args: &[String], key: &str) -> bool {
    args.iter().any(|a| a == key)
}

fn load_config() -> AppConfig {
    match ConfigStore::open_default().map(|store| store.load()) {
        Some(Ok(config)) => config,
        Some(Err(e)) => {
            tracing::warn!("[CLI] config unreadable, using defaults: {}", e);
            AppConfig::default()
        }
        None => AppConfig::default(),
    }
}

async fn gather_reviews(
    file: Option<&str>,
    url: Option<&str>,
    config: &AppConfig,
) -> anyhow::Result<ReviewBatch> {
    let manual = match file {
        Some(path) => {
            let content = std::fs::read_to_string(path).with_context(|| format!("read {} failed", path))?;
            Some(content.lines().map(str::to_string).collect::<Vec<_>>())
        }
        None => None,
    };

    let fetched = match url {
        Some(url) => {
            let asin = extract_asin(url)?;
            let source = RapidApiReviewSource::from_env(&config.review_source)?;
            Some(source.fetch_reviews(&asin, config.review_source.max_pages).await)
        }
        None => None,
    };

    Ok(collect_reviews(fetched, manual.as_deref()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 || has_flag(&args, "--help") {
        eprintln!(
            "Usage:\n  analyze_reviews [<reviews.txt>] [--url <amazon product url>] [--quick] [--seed <n>] [--show <n>] [--out <json_path>]\n\nNotes:\n  - One review per line in <reviews.txt>.\n  - --url needs RAPIDAPI_KEY (or an `apiKeys.rapidapi` entry in the config file).\n  - --seed makes the heuristic fake score reproducible."
        );
        return Ok(());
    }

    revai_lib::init_logging();

    let file = args.get(1).filter(|a| !a.starts_with("--")).cloned();
    let url = parse_arg_value(&args, "--url");
    let quick = has_flag(&args, "--quick");
    let show_n: usize = parse_arg_value(&args, "--show")
        .and_then(|s| s.parse().ok())
        .unwrap_or(10);
    let seed: Option<u64> = match parse_arg_value(&args, "--seed") {
        Some(s) => Some(s.parse().with_context(|| format!("invalid --seed value: {}", s))?),
        None => None,
    };
    let out_path = parse_arg_value(&args, "--out");

    if file.is_none() && url.is_none() {
        bail!("nothing to analyze: pass a reviews file and/or --url");
    }

    let config = load_config();
    let batch = gather_reviews(file.as_deref(), url.as_deref(), &config).await?;

    let jitter: Arc<dyn JitterSource> = match seed {
        Some(seed) => Arc::new(SeededJitter::new(seed)),
        None => config.analysis.jitter_source(),
    };
    let analyzer = ReviewAnalyzer::new(Arc::new(ModelGate::heuristic_only()), jitter)
        .with_settings(config.analysis.analyzer_settings());

    println!("Source: {:?}", batch.source);
    println!("Reviews collected: {}", batch.total_reviews);
    println!("Models loaded: {}", if analyzer.gate().is_ready() { "yes" } else { "no (heuristics)" });
    println!();

    if quick {
        let summary = analyzer.quick_summary(&batch.reviews);
        println!("Analyzed: {}", summary.total_analyzed);
        println!("Fake: {:.2}%", summary.fake_percentage);
        println!("Overall sentiment: {}", summary.overall_sentiment);

        if let Some(out_path) = out_path {
            let json = serde_json::to_string_pretty(&summary)?;
            std::fs::write(&out_path, json).with_context(|| format!("write {} failed", out_path))?;
            println!();
            println!("Wrote JSON: {}", out_path);
        }
        return Ok(());
    }

    let report = analyzer.analyze_capped(&batch.reviews);
    if report.is_empty() {
        println!("No analyzable reviews.");
    }

    println!("Analyzed: {}", report.total_reviews);
    println!(
        "Fake: {} / Real: {} ({:.2}% fake)",
        report.fake_count, report.real_count, report.fake_percentage
    );
    println!("Overall sentiment: {}", report.overall_sentiment);
    for s in SentimentVerdict::ALL {
        println!("  {:<9} {}", s.as_str(), report.sentiment_distribution.get(s));
    }
    for c in CategoryVerdict::ALL {
        println!("  {:<9} {}", c.as_str(), report.category_distribution.get(c));
    }
    println!();

    for (i, r) in report.detailed_results.iter().take(show_n).enumerate() {
        println!(
            "[R{:03}] {} conf={:.2} {} ({:.2}) {}  {}",
            i,
            if r.is_fake == FakeVerdict::Fake { "FAKE" } else { "real" },
            r.confidence_score,
            r.sentiment,
            r.sentiment_score,
            r.category,
            preview(&r.review_text, 100)
        );
    }
    if report.detailed_results.len() > show_n {
        println!("... ({} more reviews)", report.detailed_results.len() - show_n);
    }

    if let Some(out_path) = out_path {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Output<'a> {
            source: &'a ReviewBatch,
            report: &'a AnalysisReport,
        }

        let json = serde_json::to_string_pretty(&Output {
            source: &batch,
            report: &report,
        })?;
        std::fs::write(&out_path, json).with_context(|| format!("write {} failed", out_path))?;
        println!();
        println!("Wrote JSON: {}", out_path);
    }

    Ok(())
}
