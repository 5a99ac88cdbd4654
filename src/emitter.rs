//! Запись модели листа в XLSX: шапка магазина, таблица, объединения.

use chrono::{DateTime, FixedOffset};
use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::{ColNum, Format, FormatAlign, RowNum, Workbook, Worksheet, XlsxError};

use crate::config::ExportConfig;
use crate::error::ReportError;
use crate::layout::{GRAND_TOTAL_LABEL, GROUP_TOTAL_LABEL, ReportLayout};
use crate::report::Report;
use crate::style::StyleRow;
use crate::types::{ColumnRole, Money, ReportRequest, RowKind, SheetRow};
use crate::utils::{format_date, format_timestamp};

const STORE_ROW: RowNum = 0;
const ADDRESS_ROW: RowNum = 1;
const PRINTED_ROW: RowNum = 2;
const TITLE_ROW: RowNum = 4;
const PERIOD_ROW: RowNum = 5;
/// Строка листа с заголовками таблицы.
pub const TABLE_HEADER_ROW: RowNum = 7;
/// Первая строка листа с телом таблицы.
pub const FIRST_BODY_ROW: RowNum = TABLE_HEADER_ROW + 1;

/// Имя файла отчёта: `{Префикс}_{DD/MM/YYYY}-{DD/MM/YYYY}.xlsx`.
pub fn report_file_name(request: &ReportRequest) -> String {
    let layout = ReportLayout::for_kind(request.kind);
    format!(
        "{}_{}-{}.xlsx",
        layout.file_prefix,
        format_date(request.from_date),
        format_date(request.to_date)
    )
}

/// Имя файла для записи на диск: разделители пути заменяются точкой.
pub fn disk_file_name(file_name: &str) -> String {
    file_name
        .chars()
        .map(|ch| match ch {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '.',
            other => other,
        })
        .collect()
}

/// Строка листа для строки тела таблицы с индексом `index`.
#[inline]
pub fn body_row(index: usize) -> RowNum {
    FIRST_BODY_ROW + index as RowNum
}

/// Назначение столбца относительно данных `SheetRow`.
#[derive(Debug, Clone, Copy)]
enum Slot {
    Serial,
    Identity(usize),
    Service,
    Value(usize),
}

fn slots(layout: &ReportLayout) -> Vec<Slot> {
    let mut identity = 0;
    let mut value = 0;
    layout
        .columns
        .iter()
        .map(|column| match column.role {
            ColumnRole::Serial => Slot::Serial,
            ColumnRole::Identity => {
                identity += 1;
                Slot::Identity(identity - 1)
            }
            ColumnRole::Service => Slot::Service,
            ColumnRole::Currency | ColumnRole::Count => {
                value += 1;
                Slot::Value(value - 1)
            }
        })
        .collect()
}

/// Готовые форматы тела таблицы по столбцам для каждого типа строки.
struct BodyFormats {
    data: Vec<Format>,
    group_total: Vec<Format>,
    grand_total: Vec<Format>,
}

impl BodyFormats {
    fn new(layout: &ReportLayout) -> Self {
        let build = |kind: RowKind| -> Vec<Format> {
            (0..layout.column_count())
                .map(|col| layout.style_for_cell(col, StyleRow::Body(kind)).to_format())
                .collect()
        };
        Self {
            data: build(RowKind::Data),
            group_total: build(RowKind::GroupTotal),
            grand_total: build(RowKind::GrandTotal),
        }
    }

    fn get(&self, kind: RowKind, col: ColNum) -> &Format {
        let formats = match kind {
            RowKind::Data => &self.data,
            RowKind::GroupTotal => &self.group_total,
            RowKind::GrandTotal => &self.grand_total,
        };
        &formats[usize::from(col)]
    }
}

/// Формирует XLSX-документ отчёта.
#[derive(Debug, Clone, Copy)]
pub struct DocumentEmitter<'a> {
    config: &'a ExportConfig,
}

impl<'a> DocumentEmitter<'a> {
    /// Создаёт эмиттер с реквизитами магазина из настроек.
    #[inline]
    pub const fn new(config: &'a ExportConfig) -> Self {
        Self { config }
    }

    /// Сериализует отчёт в буфер XLSX.
    ///
    /// При ошибке буфер не возвращается.
    pub fn render(
        &self,
        report: &Report,
        printed_at: &DateTime<FixedOffset>,
    ) -> Result<Vec<u8>, ReportError> {
        let mut workbook = Workbook::new();
        self.write_sheet(&mut workbook, report, printed_at)?;
        let buffer = workbook.save_to_buffer()?;
        log::debug!(
            "Serialized {} report into {} bytes",
            report.layout.kind,
            buffer.len()
        );
        Ok(buffer)
    }

    fn write_sheet(
        &self,
        workbook: &mut Workbook,
        report: &Report,
        printed_at: &DateTime<FixedOffset>,
    ) -> Result<(), XlsxError> {
        let layout = report.layout;
        let sheet = workbook.add_worksheet();
        sheet.set_name(self.config.sheet_name.as_deref().unwrap_or(layout.sheet_name))?;
        sheet.set_screen_gridlines(false);
        for (col, column) in layout.columns.iter().enumerate() {
            sheet.set_column_width(col as ColNum, column.width)?;
        }

        self.write_info_block(sheet, report, printed_at)?;

        for (col, column) in layout.columns.iter().enumerate() {
            let col = col as ColNum;
            let format = layout.style_for_cell(col, StyleRow::Header).to_format();
            sheet.write_string_with_format(TABLE_HEADER_ROW, col, column.header, &format)?;
        }

        let slots = slots(layout);
        let formats = BodyFormats::new(layout);
        for (idx, row) in report.rows.iter().enumerate() {
            write_body_row(sheet, layout, &slots, &formats, body_row(idx), row)?;
        }

        // Вырожденные диапазоны из одной строки не объединяем.
        for merge in report.merges.iter().filter(|merge| merge.span() > 1) {
            let Some(row) = report.rows.get(merge.first_row) else {
                continue;
            };
            let first = body_row(merge.first_row);
            let format = formats.get(RowKind::Data, merge.column);
            let last = body_row(merge.last_row);
            sheet.merge_range(first, merge.column, last, merge.column, "", format)?;
            write_cell(sheet, &slots, first, merge.column, row, format)?;
        }

        Ok(())
    }

    fn write_info_block(
        &self,
        sheet: &mut Worksheet,
        report: &Report,
        printed_at: &DateTime<FixedOffset>,
    ) -> Result<(), XlsxError> {
        let last_col = report.layout.column_count().saturating_sub(1);
        let store_format = Format::new().set_bold().set_align(FormatAlign::Left);
        let plain_format = Format::new().set_align(FormatAlign::Left);
        let title_format = Format::new()
            .set_bold()
            .set_font_size(16)
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter);
        let period_format = Format::new().set_italic().set_align(FormatAlign::Center);

        let request = &report.request;
        let lines = [
            (STORE_ROW, self.config.store_name.clone(), &store_format),
            (ADDRESS_ROW, self.config.store_address.clone(), &plain_format),
            (
                PRINTED_ROW,
                format!("Ngày in: {}", format_timestamp(printed_at)),
                &plain_format,
            ),
            (TITLE_ROW, report.layout.title.to_string(), &title_format),
            (
                PERIOD_ROW,
                format!(
                    "Từ ngày {} đến ngày {}",
                    format_date(request.from_date),
                    format_date(request.to_date)
                ),
                &period_format,
            ),
        ];
        for (row, text, format) in lines {
            sheet.merge_range(row, 0, row, last_col, &text, format)?;
        }
        sheet.set_row_height(TITLE_ROW, 24)?;
        Ok(())
    }
}

fn write_body_row(
    sheet: &mut Worksheet,
    layout: &ReportLayout,
    slots: &[Slot],
    formats: &BodyFormats,
    sheet_row: RowNum,
    row: &SheetRow,
) -> Result<(), XlsxError> {
    if row.kind == RowKind::GrandTotal {
        let label_end = layout.service_column();
        sheet.merge_range(
            sheet_row,
            0,
            sheet_row,
            label_end,
            GRAND_TOTAL_LABEL,
            formats.get(RowKind::GrandTotal, 0),
        )?;
        for col in (label_end + 1)..layout.column_count() {
            write_cell(sheet, slots, sheet_row, col, row, formats.get(row.kind, col))?;
        }
        return Ok(());
    }

    for col in 0..layout.column_count() {
        write_cell(sheet, slots, sheet_row, col, row, formats.get(row.kind, col))?;
    }
    Ok(())
}

fn write_cell(
    sheet: &mut Worksheet,
    slots: &[Slot],
    sheet_row: RowNum,
    col: ColNum,
    row: &SheetRow,
    format: &Format,
) -> Result<(), XlsxError> {
    let slot = slots.get(usize::from(col)).copied();
    match (row.kind, slot) {
        (_, Some(Slot::Value(idx))) => {
            let value = row.values.get(idx).copied().unwrap_or_default();
            sheet.write_number_with_format(sheet_row, col, money_to_f64(value), format)?;
        }
        (RowKind::Data, Some(Slot::Serial)) => {
            let serial = row.serial.unwrap_or_default();
            sheet.write_number_with_format(sheet_row, col, serial as f64, format)?;
        }
        (RowKind::Data, Some(Slot::Identity(idx))) => {
            let text = row.identity.get(idx).map_or("", String::as_str);
            sheet.write_string_with_format(sheet_row, col, text, format)?;
        }
        (RowKind::Data, Some(Slot::Service)) => {
            sheet.write_string_with_format(sheet_row, col, &row.service_name, format)?;
        }
        (RowKind::GroupTotal, Some(Slot::Service)) => {
            sheet.write_string_with_format(sheet_row, col, GROUP_TOTAL_LABEL, format)?;
        }
        _ => {
            sheet.write_blank(sheet_row, col, format)?;
        }
    }
    Ok(())
}

#[inline]
fn money_to_f64(value: Money) -> f64 {
    value.to_f64().unwrap_or_default()
}
