//! Построение модели листа: строки, итоги и объединения за один проход.

use rust_decimal::Decimal;

use crate::layout::ReportLayout;
use crate::merge::MergePlanner;
use crate::raw::RawReport;
use crate::types::{MergeRange, Money, ReportRequest, RowKind, SheetRow};
use crate::utils::DateFormatter;

/// Итоговая модель одного отчёта перед записью в XLSX.
#[derive(Debug, Clone)]
pub struct Report {
    /// Параметры выгрузки.
    pub request: ReportRequest,
    /// Раскладка вида отчёта.
    pub layout: &'static ReportLayout,
    /// Строки тела таблицы; последняя всегда общий итог.
    pub rows: Vec<SheetRow>,
    /// Вертикальные объединения идентифицирующих столбцов.
    pub merges: Vec<MergeRange>,
    /// Число групп (последний выданный порядковый номер).
    pub group_count: usize,
    /// Сколько сумм упёрлось в предел `Decimal` и было ограничено.
    pub saturated: usize,
}

impl Report {
    /// Строит модель листа с форматировщиком дат по умолчанию (UTC).
    #[inline]
    pub fn build(raw: &RawReport, request: ReportRequest) -> Self {
        ReportBuilder::new(raw, request).build()
    }

    /// Значения строки общего итога.
    pub fn grand_total(&self) -> &[Money] {
        match self.rows.last() {
            Some(row) if row.kind == RowKind::GrandTotal => &row.values,
            _ => &[],
        }
    }

    /// Строки заданного типа.
    pub fn rows_of(&self, kind: RowKind) -> impl Iterator<Item = &SheetRow> {
        self.rows.iter().filter(move |row| row.kind == kind)
    }
}

/// Builder для построения `Report` с выбором часового пояса дат.
pub struct ReportBuilder<'a> {
    raw: &'a RawReport,
    request: ReportRequest,
    dates: DateFormatter,
}

impl<'a> ReportBuilder<'a> {
    /// Создаёт builder для исходных данных и запроса.
    ///
    /// # Пример
    ///
    /// ```
    /// # use service_sales_report::{RawReport, ReportBuilder, ReportKind, ReportRequest};
    /// # use chrono::NaiveDate;
    /// let raw = RawReport::from_str(r#"{"data": []}"#).unwrap();
    /// let day = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
    /// let report = ReportBuilder::new(&raw, ReportRequest::new(ReportKind::Customer, day, day)).build();
    /// assert_eq!(report.rows.len(), 1);
    /// ```
    #[inline]
    pub fn new(raw: &'a RawReport, request: ReportRequest) -> Self {
        Self {
            raw,
            request,
            dates: DateFormatter::default(),
        }
    }

    /// Задаёт форматировщик дат (часовой пояс магазина).
    #[inline]
    pub const fn dates(mut self, dates: DateFormatter) -> Self {
        self.dates = dates;
        self
    }

    /// Выполняет построение строк, итогов и объединений.
    pub fn build(self) -> Report {
        let layout = ReportLayout::for_kind(self.request.kind);
        let width = layout.value_columns().len();
        let mut planner = MergePlanner::new(layout.merge_columns());
        let mut rows = Vec::new();
        let mut grand_total = vec![Decimal::ZERO; width];
        let mut serial = 1;
        let mut saturated = 0;

        for group in self.raw.groups() {
            let identity = layout.identity(group, &self.dates);
            let mut subtotal = vec![Decimal::ZERO; width];
            let first_row = rows.len();

            for item in &group.items {
                let values = layout.values(item);
                saturated += accumulate(&mut subtotal, &values);
                rows.push(SheetRow::data(
                    serial,
                    identity.clone(),
                    item.service_name.clone(),
                    values,
                ));
            }

            planner.record_group(first_row, group.items.len());
            saturated += accumulate(&mut grand_total, &subtotal);
            rows.push(SheetRow::group_total(subtotal));
            serial += 1;
        }

        rows.push(SheetRow::grand_total(grand_total));
        let group_count = serial - 1;
        if saturated > 0 {
            log::warn!("{saturated} totals exceeded the decimal range and were clamped");
        }
        log::debug!(
            "Built {} report: {} groups, {} rows",
            layout.kind,
            group_count,
            rows.len()
        );

        Report {
            request: self.request,
            layout,
            rows,
            merges: planner.finish(),
            group_count,
            saturated,
        }
    }
}

/// Поэлементно прибавляет `values` к `totals` с насыщением.
///
/// Возвращает число сумм, ограниченных пределом `Decimal`.
fn accumulate(totals: &mut [Money], values: &[Money]) -> usize {
    let mut saturated = 0;
    for (total, &value) in totals.iter_mut().zip(values) {
        let current = *total;
        *total = current.checked_add(value).unwrap_or_else(|| {
            saturated += 1;
            current.saturating_add(value)
        });
    }
    saturated
}
