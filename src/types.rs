//! Доменные типы: запрос отчёта, строки листа, диапазоны объединения.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::ReportError;

/// Денежное значение, используем `Decimal` для точных расчётов.
pub type Money = Decimal;

/// Вид отчёта о продажах.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportKind {
    /// Доход по клиентам.
    Customer,
    /// Доход по сотрудникам.
    Staff,
    /// Применение акций.
    Promotion,
    /// Возвраты по накладным продажи.
    Refund,
}

impl ReportKind {
    /// Все виды отчётов в порядке объявления.
    pub const ALL: [Self; 4] = [Self::Customer, Self::Staff, Self::Promotion, Self::Refund];

    /// Машинное имя вида отчёта.
    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Staff => "staff",
            Self::Promotion => "promotion",
            Self::Refund => "refund",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportKind {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == lower)
            .ok_or_else(|| ReportError::UnknownKind {
                value: s.to_string(),
            })
    }
}

/// Параметры выгрузки: период и вид отчёта.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportRequest {
    /// Начало периода.
    pub from_date: NaiveDate,
    /// Конец периода.
    pub to_date: NaiveDate,
    /// Вид отчёта.
    pub kind: ReportKind,
}

impl ReportRequest {
    /// Создаёт запрос на выгрузку.
    #[inline]
    pub const fn new(kind: ReportKind, from_date: NaiveDate, to_date: NaiveDate) -> Self {
        Self {
            from_date,
            to_date,
            kind,
        }
    }
}

/// Тип строки листа.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowKind {
    /// Строка одной позиции (услуги).
    Data,
    /// Промежуточный итог по группе.
    GroupTotal,
    /// Общий итог, всегда последняя строка.
    GrandTotal,
}

/// Строка таблицы отчёта до записи в XLSX.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRow {
    /// Тип строки.
    pub kind: RowKind,
    /// Порядковый номер группы (только для строк данных).
    pub serial: Option<usize>,
    /// Значения идентифицирующих столбцов группы (без номера).
    pub identity: Vec<String>,
    /// Наименование услуги.
    pub service_name: String,
    /// Числовые значения в порядке столбцов раскладки.
    pub values: Vec<Money>,
}

impl SheetRow {
    /// Строка данных для одной позиции.
    pub fn data(
        serial: usize,
        identity: Vec<String>,
        service_name: String,
        values: Vec<Money>,
    ) -> Self {
        Self {
            kind: RowKind::Data,
            serial: Some(serial),
            identity,
            service_name,
            values,
        }
    }

    /// Строка промежуточного итога группы.
    pub fn group_total(values: Vec<Money>) -> Self {
        Self {
            kind: RowKind::GroupTotal,
            serial: None,
            identity: Vec::new(),
            service_name: String::new(),
            values,
        }
    }

    /// Строка общего итога.
    pub fn grand_total(values: Vec<Money>) -> Self {
        Self {
            kind: RowKind::GrandTotal,
            serial: None,
            identity: Vec::new(),
            service_name: String::new(),
            values,
        }
    }
}

/// Вертикальное объединение ячеек одного столбца по строкам группы.
///
/// Индексы строк отсчитываются от первой строки тела таблицы.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MergeRange {
    /// Столбец.
    pub column: u16,
    /// Первая строка диапазона (включительно).
    pub first_row: usize,
    /// Последняя строка диапазона (включительно).
    pub last_row: usize,
}

impl MergeRange {
    /// Число строк в диапазоне.
    #[inline]
    pub const fn span(&self) -> usize {
        self.last_row - self.first_row + 1
    }

    /// Пересекается ли диапазон с другим в том же столбце.
    #[inline]
    pub const fn overlaps(&self, other: &Self) -> bool {
        self.column == other.column
            && self.first_row <= other.last_row
            && other.first_row <= self.last_row
    }
}

/// Роль столбца, от неё зависит оформление ячеек.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnRole {
    /// Порядковый номер группы.
    Serial,
    /// Идентифицирующий столбец группы (код, имя, дата).
    Identity,
    /// Наименование услуги.
    Service,
    /// Денежная сумма.
    Currency,
    /// Количество.
    Count,
}

impl ColumnRole {
    /// Числовой ли столбец (участвует в итогах).
    #[inline]
    pub const fn is_numeric(self) -> bool {
        matches!(self, Self::Currency | Self::Count)
    }
}

/// Описание столбца таблицы.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnDef {
    /// Заголовок.
    pub header: &'static str,
    /// Роль.
    pub role: ColumnRole,
    /// Ширина в символах.
    pub width: f64,
}

impl ColumnDef {
    pub(crate) const fn new(header: &'static str, role: ColumnRole, width: f64) -> Self {
        Self {
            header,
            role,
            width,
        }
    }
}
