//! CLI: читает выгрузку API и сохраняет XLSX-отчёт за период.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use service_sales_report::{
    ExportConfig, LogNotifier, RawReport, ReportKind, ReportLayout, ReportRequest, export_report,
    parse_date,
};

/// Выгрузка отчёта о продажах в XLSX.
#[derive(Parser, Debug)]
#[command(name = "service-sales-report", version, about)]
struct Cli {
    /// Вид отчёта: customer, staff, promotion, refund.
    #[arg(short, long)]
    kind: String,
    /// Начало периода (YYYY-MM-DD или DD/MM/YYYY).
    #[arg(long)]
    from: String,
    /// Конец периода (YYYY-MM-DD или DD/MM/YYYY).
    #[arg(long)]
    to: String,
    /// JSON-ответ API или каталог со страницами ответа.
    #[arg(short, long)]
    input: PathBuf,
    /// Файл настроек TOML.
    #[arg(short, long, env = "SERVICE_REPORT_CONFIG")]
    config: Option<PathBuf>,
    /// Каталог для готового файла (перекрывает настройки).
    #[arg(short, long)]
    output_dir: Option<PathBuf>,
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let kind: ReportKind = cli.kind.parse()?;
    let request = ReportRequest::new(kind, parse_date(&cli.from)?, parse_date(&cli.to)?);

    let mut config = match &cli.config {
        Some(path) => ExportConfig::load(path)?,
        None => ExportConfig::default(),
    };
    if let Some(dir) = cli.output_dir {
        config.output_dir = dir;
    }

    let raw = RawReport::from_path(&cli.input)?;
    let outcome = export_report(&raw, request, &config, &LogNotifier)?;

    println!("Báo cáo {kind}: {} nhóm", outcome.groups);
    let layout = ReportLayout::for_kind(kind);
    for (col, total) in layout.value_columns().into_iter().zip(&outcome.grand_total) {
        println!("  {}: {}", layout.columns[usize::from(col)].header, total);
    }
    println!("Tệp: {} ({} bytes)", outcome.path.display(), outcome.size);
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}
