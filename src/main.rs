use std::fs;
use std::path::PathBuf;

use animator_config::OptionsPatch;
use animator_core::{Capabilities, PlanRecorder, RecordingScrollLink, TextAnimator};
use animator_dom::HtmlDocument;
use anyhow::{Context, Result};
use clap::Parser;

/// Segment marked text in an HTML page and write out the animation plan.
#[derive(Debug, Parser)]
#[command(name = "text-animator", version)]
struct Cli {
    /// HTML file to process
    input: PathBuf,

    /// Options file (defaults to ./animator.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Where to write the processed HTML (stdout when omitted)
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Where to write the animation plan as JSON
    #[arg(long)]
    plan: Option<PathBuf>,

    /// Enable verbose tracing
    #[arg(long)]
    debug: bool,

    /// Animate unconditionally instead of on scroll
    #[arg(long)]
    no_scroll_trigger: bool,

    /// Skip injecting the unit stylesheet
    #[arg(long)]
    no_styles: bool,

    /// Run one refresh pass after construction
    #[arg(long)]
    refresh: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut logger = env_logger::Builder::from_default_env();
    if cli.debug {
        logger.filter_level(log::LevelFilter::Debug);
    }
    let _ = logger.try_init();

    let mut patch = match &cli.config {
        Some(path) => OptionsPatch::load_from_file(path)
            .with_context(|| format!("failed to load options from '{}'", path.display()))?,
        None => OptionsPatch::load_or_default(),
    };
    patch.merge_with_env();
    patch.extend(&flag_overrides(&cli));

    let html = fs::read_to_string(&cli.input)
        .with_context(|| format!("failed to read HTML file '{}'", cli.input.display()))?;
    let document = HtmlDocument::parse(&html);

    let recorder = PlanRecorder::new();
    let capabilities = Capabilities::new()
        .with_dom(document)
        .with_engine(recorder.clone())
        .with_scroll_link(RecordingScrollLink::new());
    let mut animator =
        TextAnimator::new(capabilities, &patch).context("failed to start text animator")?;
    // A parsed file is complete; run any deferred pass anyway.
    animator.handle_content_loaded();

    if cli.refresh {
        let report = animator.refresh().context("refresh failed")?;
        log::info!(
            "refreshed {} elements into {} units",
            report.segmented,
            report.units
        );
    }

    let processed = animator.dom().to_html();
    match &cli.output {
        Some(path) => fs::write(path, &processed)
            .with_context(|| format!("failed to write '{}'", path.display()))?,
        None => println!("{processed}"),
    }

    if let Some(path) = &cli.plan {
        let plan = recorder.plan(animator.dom());
        let json = serde_json::to_string_pretty(&plan).context("failed to encode plan")?;
        fs::write(path, json).with_context(|| format!("failed to write '{}'", path.display()))?;
        log::info!(
            "wrote {} tweens ({:.2}s total) to {}",
            plan.tweens.len(),
            plan.total_duration(),
            path.display()
        );
    }
    Ok(())
}

fn flag_overrides(cli: &Cli) -> OptionsPatch {
    OptionsPatch {
        debug: cli.debug.then_some(true),
        use_scroll_trigger: cli.no_scroll_trigger.then_some(false),
        auto_inject_styles: cli.no_styles.then_some(false),
        ..OptionsPatch::default()
    }
}
