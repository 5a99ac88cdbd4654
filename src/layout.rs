//! Раскладки отчётов: столбцы, идентифицирующие поля и извлечение сумм.
//!
//! Все четыре вида отчёта проходят через один построитель; различия
//! описываются статической [`ReportLayout`].

use std::fmt;

use rust_decimal::Decimal;

use crate::raw::{Group, LineItem};
use crate::types::{ColumnDef, ColumnRole, Money, ReportKind};
use crate::utils::DateFormatter;

/// Подпись строки промежуточного итога.
pub const GROUP_TOTAL_LABEL: &str = "Tổng";
/// Подпись строки общего итога.
pub const GRAND_TOTAL_LABEL: &str = "Tổng cộng";

/// Описание отчёта одного вида.
///
/// Порядок столбцов всегда: номер, идентифицирующие, услуга, суммы.
pub struct ReportLayout {
    /// Вид отчёта.
    pub kind: ReportKind,
    /// Заголовок отчёта в шапке листа.
    pub title: &'static str,
    /// Префикс имени файла.
    pub file_prefix: &'static str,
    /// Имя листа по умолчанию.
    pub sheet_name: &'static str,
    /// Столбцы таблицы.
    pub columns: &'static [ColumnDef],
    identity: fn(&Group, &DateFormatter) -> Vec<String>,
    values: fn(&LineItem) -> Vec<Money>,
}

const SALES_VALUE_COLUMNS: [ColumnDef; 3] = [
    ColumnDef::new("Doanh Số Trước CK", ColumnRole::Currency, 18.0),
    ColumnDef::new("Chiết Khấu", ColumnRole::Currency, 16.0),
    ColumnDef::new("Doanh Số Sau CK", ColumnRole::Currency, 18.0),
];

static CUSTOMER: ReportLayout = ReportLayout {
    kind: ReportKind::Customer,
    title: "BÁO CÁO DOANH SỐ THEO KHÁCH HÀNG",
    file_prefix: "BaoCaoDoanhSoKhachHang",
    sheet_name: "KhachHang",
    columns: &[
        ColumnDef::new("STT", ColumnRole::Serial, 6.0),
        ColumnDef::new("Mã KH", ColumnRole::Identity, 14.0),
        ColumnDef::new("Tên Khách Hàng", ColumnRole::Identity, 28.0),
        ColumnDef::new("Dịch vụ", ColumnRole::Service, 32.0),
        SALES_VALUE_COLUMNS[0],
        SALES_VALUE_COLUMNS[1],
        SALES_VALUE_COLUMNS[2],
    ],
    identity: code_and_name,
    values: sales_values,
};

static STAFF: ReportLayout = ReportLayout {
    kind: ReportKind::Staff,
    title: "BÁO CÁO DOANH SỐ THEO NHÂN VIÊN",
    file_prefix: "BaoCaoDoanhSoNhanVien",
    sheet_name: "NhanVien",
    columns: &[
        ColumnDef::new("STT", ColumnRole::Serial, 6.0),
        ColumnDef::new("Mã NV", ColumnRole::Identity, 14.0),
        ColumnDef::new("Tên Nhân Viên", ColumnRole::Identity, 28.0),
        ColumnDef::new("Dịch vụ", ColumnRole::Service, 32.0),
        SALES_VALUE_COLUMNS[0],
        SALES_VALUE_COLUMNS[1],
        SALES_VALUE_COLUMNS[2],
    ],
    identity: code_and_name,
    values: sales_values,
};

static PROMOTION: ReportLayout = ReportLayout {
    kind: ReportKind::Promotion,
    title: "BÁO CÁO KHUYẾN MÃI",
    file_prefix: "BaoCaoKhuyenMai",
    sheet_name: "KhuyenMai",
    columns: &[
        ColumnDef::new("STT", ColumnRole::Serial, 6.0),
        ColumnDef::new("Mã KM", ColumnRole::Identity, 14.0),
        ColumnDef::new("Tên Khuyến Mãi", ColumnRole::Identity, 28.0),
        ColumnDef::new("Từ Ngày", ColumnRole::Identity, 13.0),
        ColumnDef::new("Đến Ngày", ColumnRole::Identity, 13.0),
        ColumnDef::new("Dịch vụ", ColumnRole::Service, 32.0),
        ColumnDef::new("Số Lần Áp Dụng", ColumnRole::Count, 16.0),
        ColumnDef::new("Giá Trị Áp Dụng", ColumnRole::Currency, 18.0),
    ],
    identity: promotion_identity,
    values: promotion_values,
};

static REFUND: ReportLayout = ReportLayout {
    kind: ReportKind::Refund,
    title: "BÁO CÁO TRẢ HÀNG",
    file_prefix: "BaoCaoTraHang",
    sheet_name: "TraHang",
    columns: &[
        ColumnDef::new("STT", ColumnRole::Serial, 6.0),
        ColumnDef::new("Mã HĐ Bán", ColumnRole::Identity, 16.0),
        ColumnDef::new("Mã HĐ Trả", ColumnRole::Identity, 16.0),
        ColumnDef::new("Ngày Trả", ColumnRole::Identity, 13.0),
        ColumnDef::new("Dịch vụ", ColumnRole::Service, 32.0),
        ColumnDef::new("Tiền Bán", ColumnRole::Currency, 18.0),
        ColumnDef::new("Tiền Trả", ColumnRole::Currency, 18.0),
    ],
    identity: refund_identity,
    values: refund_values,
};

impl fmt::Debug for ReportLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReportLayout")
            .field("kind", &self.kind)
            .field("title", &self.title)
            .field("file_prefix", &self.file_prefix)
            .field("columns", &self.columns.len())
            .finish_non_exhaustive()
    }
}

impl ReportLayout {
    /// Раскладка для вида отчёта.
    #[inline]
    pub const fn for_kind(kind: ReportKind) -> &'static Self {
        match kind {
            ReportKind::Customer => &CUSTOMER,
            ReportKind::Staff => &STAFF,
            ReportKind::Promotion => &PROMOTION,
            ReportKind::Refund => &REFUND,
        }
    }

    /// Число столбцов таблицы.
    #[inline]
    pub const fn column_count(&self) -> u16 {
        self.columns.len() as u16
    }

    /// Индексы столбцов, объединяемых по строкам группы (номер и идентификаторы).
    pub fn merge_columns(&self) -> Vec<u16> {
        self.columns_with(|role| matches!(role, ColumnRole::Serial | ColumnRole::Identity))
    }

    /// Индекс столбца услуги.
    pub fn service_column(&self) -> u16 {
        self.columns_with(|role| role == ColumnRole::Service)
            .first()
            .copied()
            .unwrap_or_default()
    }

    /// Индексы числовых столбцов в порядке значений строки.
    pub fn value_columns(&self) -> Vec<u16> {
        self.columns_with(ColumnRole::is_numeric)
    }

    /// Значения идентифицирующих столбцов группы (без номера).
    #[inline]
    pub fn identity(&self, group: &Group, dates: &DateFormatter) -> Vec<String> {
        (self.identity)(group, dates)
    }

    /// Суммы позиции в порядке числовых столбцов.
    #[inline]
    pub fn values(&self, item: &LineItem) -> Vec<Money> {
        (self.values)(item)
    }

    fn columns_with(&self, predicate: impl Fn(ColumnRole) -> bool) -> Vec<u16> {
        self.columns
            .iter()
            .enumerate()
            .filter(|(_, column)| predicate(column.role))
            .map(|(idx, _)| idx as u16)
            .collect()
    }
}

#[inline]
fn or_zero(value: Option<Money>) -> Money {
    value.unwrap_or(Decimal::ZERO)
}

fn code_and_name(group: &Group, _dates: &DateFormatter) -> Vec<String> {
    vec![group.id.clone(), group.name.clone()]
}

fn promotion_identity(group: &Group, dates: &DateFormatter) -> Vec<String> {
    vec![
        group.id.clone(),
        group.name.clone(),
        dates.display(group.from_date.as_ref()),
        dates.display(group.to_date.as_ref()),
    ]
}

fn refund_identity(group: &Group, dates: &DateFormatter) -> Vec<String> {
    vec![
        group.id.clone(),
        group.name.clone(),
        dates.display(group.date.as_ref()),
    ]
}

// Без явной выручки после скидки считаем её как до скидки минус скидка.
fn sales_values(item: &LineItem) -> Vec<Money> {
    let before = or_zero(item.sale_before);
    let discount = or_zero(item.discount);
    let after = item.sale_after.unwrap_or_else(|| {
        before.checked_sub(discount).unwrap_or_else(|| {
            log::warn!("Sale after discount out of range ({before} - {discount}), clamping");
            before.saturating_sub(discount)
        })
    });
    vec![before, discount, after]
}

fn promotion_values(item: &LineItem) -> Vec<Money> {
    vec![or_zero(item.total_apply), or_zero(item.total_amount)]
}

fn refund_values(item: &LineItem) -> Vec<Money> {
    vec![or_zero(item.sale_amount), or_zero(item.refund_amount)]
}
