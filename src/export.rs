//! Полный цикл выгрузки: построение, сериализация, запись файла, уведомление.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::config::ExportConfig;
use crate::emitter::{DocumentEmitter, disk_file_name, report_file_name};
use crate::error::ReportError;
use crate::notify::{Notifier, Severity};
use crate::raw::RawReport;
use crate::report::{Report, ReportBuilder};
use crate::types::{Money, ReportRequest};

/// Результат успешной выгрузки.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOutcome {
    /// Имя файла отчёта (с датами через `/`).
    pub file_name: String,
    /// Путь записанного файла.
    pub path: PathBuf,
    /// Размер файла в байтах.
    pub size: usize,
    /// Число групп в отчёте.
    pub groups: usize,
    /// Значения строки общего итога.
    pub grand_total: Vec<Money>,
}

/// Строит отчёт, сериализует его и сохраняет в `config.output_dir`.
///
/// Пустой период и ограниченные суммы сообщаются отдельно (`Info`, `Warning`).
/// Любая ошибка передаётся в `notifier` и возвращается вызывающему;
/// при ошибке файл не создаётся.
pub fn export_report(
    raw: &RawReport,
    request: ReportRequest,
    config: &ExportConfig,
    notifier: &dyn Notifier,
) -> Result<ExportOutcome, ReportError> {
    let result = config.date_formatter().and_then(|dates| {
        let report = ReportBuilder::new(raw, request).dates(dates).build();
        notify_build(notifier, &report);
        let buffer = DocumentEmitter::new(config).render(&report, &dates.now())?;
        deliver(&report, &buffer, &config.output_dir)
    });
    notify_outcome(notifier, &result);
    result
}

/// Асинхронный вариант [`export_report`]: сериализация идёт в пуле блокирующих задач.
#[cfg(feature = "async")]
pub async fn export_report_async(
    raw: &RawReport,
    request: ReportRequest,
    config: &ExportConfig,
    notifier: &dyn Notifier,
) -> Result<ExportOutcome, ReportError> {
    let result: Result<ExportOutcome, ReportError> = async {
        let dates = config.date_formatter()?;
        let report = ReportBuilder::new(raw, request).dates(dates).build();
        notify_build(notifier, &report);
        let emitter_config = config.clone();
        let printed_at = dates.now();
        let (report, buffer) = tokio::task::spawn_blocking(move || {
            let buffer = DocumentEmitter::new(&emitter_config).render(&report, &printed_at);
            (report, buffer)
        })
        .await
        .map_err(|err| ReportError::Task(err.to_string()))?;
        deliver(&report, &buffer?, &config.output_dir)
    }
    .await;
    notify_outcome(notifier, &result);
    result
}

fn deliver(report: &Report, buffer: &[u8], dir: &Path) -> Result<ExportOutcome, ReportError> {
    let file_name = report_file_name(&report.request);
    let path = dir.join(disk_file_name(&file_name));
    // Запись через временный файл в том же каталоге.
    let mut staged = NamedTempFile::new_in(dir)?;
    staged.write_all(buffer)?;
    staged.as_file().sync_all()?;
    staged.persist(&path).map_err(|err| err.error)?;
    log::info!("Report exported to: {}", path.display());
    Ok(ExportOutcome {
        file_name,
        path,
        size: buffer.len(),
        groups: report.group_count,
        grand_total: report.grand_total().to_vec(),
    })
}

fn notify_build(notifier: &dyn Notifier, report: &Report) {
    if report.group_count == 0 {
        notifier.notify(Severity::Info, "Không có dữ liệu trong khoảng thời gian đã chọn");
    }
    if report.saturated > 0 {
        notifier.notify(
            Severity::Warning,
            &format!(
                "Có {} tổng vượt giới hạn và đã bị giới hạn giá trị",
                report.saturated
            ),
        );
    }
}

fn notify_outcome(notifier: &dyn Notifier, result: &Result<ExportOutcome, ReportError>) {
    match result {
        Ok(outcome) => notifier.notify(
            Severity::Success,
            &format!("Xuất báo cáo thành công: {}", outcome.file_name),
        ),
        Err(err) => notifier.notify(Severity::Error, &format!("Xuất báo cáo thất bại: {err}")),
    }
}
