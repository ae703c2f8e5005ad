use crate::{
    config::Config,
    gateway::{Gateway, GeminiGateway},
    pipeline::Pipeline,
    questions::QuestionSet,
    report::ReportWriter,
    source,
    util::ensure_dir,
};
use anyhow::{Context, Result, anyhow};
use clap::Parser;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "paper-grill")]
#[command(about = "Batch PDF question-extraction orchestrator (Gemini + retry + resume)")]
pub struct Args {
    /// Path to config TOML. If omitted, uses ./paper-grill.toml if present.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override log level (trace/debug/info/warn/error).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Override the PDF input directory from the config.
    #[arg(long)]
    pub pdf_dir: Option<PathBuf>,

    /// Override the output markdown path from the config.
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Skip the pre-run confirmation prompt.
    #[arg(long, short = 'y')]
    pub yes: bool,

    /// Re-query documents even if their section already exists in the report.
    #[arg(long)]
    pub no_resume: bool,
}

pub fn dispatch(args: Args) -> Result<()> {
    let cfg_path = resolve_config_path(args.config.as_deref());
    let mut cfg = Config::load(&cfg_path)?;

    if let Some(dir) = &args.pdf_dir {
        cfg.paths.pdf_dir = dir.display().to_string();
    }
    if let Some(out) = &args.output {
        cfg.paths.output_file = out.display().to_string();
    }
    if args.no_resume {
        cfg.options.resume = false;
    }

    let _guard = init_logging(&args, &cfg)?;
    run(&args, &cfg)
}

fn resolve_config_path(user: Option<&Path>) -> PathBuf {
    if let Some(p) = user {
        return p.to_path_buf();
    }
    let default = PathBuf::from("paper-grill.toml");
    if default.exists() {
        default
    } else {
        PathBuf::from("paper-grill.example.toml")
    }
}

fn init_logging(args: &Args, cfg: &Config) -> Result<Option<WorkerGuard>> {
    let level = args
        .log_level
        .as_deref()
        .unwrap_or(cfg.logging.level.as_str());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let stdout_layer = if cfg.logging.json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer().with_target(true).boxed()
    };

    let (file_layer, guard) = if cfg.logging.write_to_file && !cfg.logging.file_path.is_empty() {
        let path = PathBuf::from(&cfg.logging.file_path);
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        ensure_dir(parent)?;
        let file = std::fs::File::create(&path)
            .with_context(|| format!("create log file: {}", path.display()))?;
        let (non_blocking, guard) = tracing_appender::non_blocking(file);
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_target(true)
            .boxed();
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow!("failed to init logging: {e}"))?;

    Ok(guard)
}

fn run(args: &Args, cfg: &Config) -> Result<()> {
    let questions = QuestionSet::load(Path::new(&cfg.paths.questions_file))?;
    info!(
        "loaded {} question(s) from {}",
        questions.len(),
        cfg.paths.questions_file
    );

    let documents = source::list_documents(Path::new(&cfg.paths.pdf_dir))?;
    info!(
        "found {} PDF file(s) in {}",
        documents.len(),
        cfg.paths.pdf_dir
    );

    let api_key = cfg.resolve_api_key()?;

    if cfg.options.confirm_before_processing && !args.yes && !confirm(documents.len())? {
        println!("Cancelled");
        return Ok(());
    }

    let gateway = GeminiGateway::new(cfg, api_key)?;
    info!("gateway ready model={}", gateway.model_id());

    let output = PathBuf::from(&cfg.paths.output_file);
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_dir(parent)?;
    }
    let mut writer = ReportWriter::open(&output, gateway.model_id(), documents.len())?;

    let pipeline = Pipeline::new(cfg, gateway);
    let summary = pipeline.run(&documents, &questions, &mut writer)?;
    writer.finalize(&summary)?;

    println!(
        "{}",
        serde_json::to_string_pretty(&serde_json::json!({
            "status": "ok",
            "output": output,
            "documents_succeeded": summary.documents_succeeded,
            "documents_skipped": summary.documents_skipped,
            "documents_failed": summary.documents_failed,
            "questions_failed": summary.questions_failed,
            "elapsed": crate::util::format_duration(summary.elapsed),
        }))?
    );
    Ok(())
}

fn confirm(count: usize) -> Result<bool> {
    print!("Process {count} PDF file(s)? This may take a while. (y/N): ");
    std::io::stdout().flush().ok();
    let mut line = String::new();
    std::io::stdin()
        .read_line(&mut line)
        .with_context(|| "reading confirmation")?;
    Ok(line.trim().eq_ignore_ascii_case("y"))
}
