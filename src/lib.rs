#![warn(missing_docs)]
//! Библиотека построения XLSX-отчётов о продажах сервиса обслуживания автомобилей:
//! группировка, промежуточные и общие итоги, объединение ячеек и оформление.

mod config;
mod emitter;
mod error;
mod export;
mod layout;
mod merge;
mod notify;
mod raw;
mod report;
mod style;
mod types;
mod utils;

pub use crate::config::{DEFAULT_UTC_OFFSET_HOURS, ExportConfig};
pub use crate::emitter::{
    DocumentEmitter, FIRST_BODY_ROW, TABLE_HEADER_ROW, body_row, disk_file_name, report_file_name,
};
pub use crate::error::ReportError;
#[cfg(feature = "async")]
pub use crate::export::export_report_async;
pub use crate::export::{ExportOutcome, export_report};
pub use crate::layout::{GRAND_TOTAL_LABEL, GROUP_TOTAL_LABEL, ReportLayout};
pub use crate::merge::MergePlanner;
pub use crate::notify::{LogNotifier, Notifier, Severity};
pub use crate::raw::{Batch, Group, LineItem, RawReport};
pub use crate::report::{Report, ReportBuilder};
pub use crate::style::{
    COUNT_FORMAT, CURRENCY_FORMAT, HEADER_FILL, HorizontalAlign, StyleDescriptor, StyleRow,
    VerticalAlign, style_for,
};
pub use crate::types::*;
pub use crate::utils::{
    DISPLAY_DATE_FORMAT, DateFormatter, format_date, format_timestamp, money_from_value,
    parse_date, text_from_value,
};
