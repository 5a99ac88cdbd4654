//! Правила оформления ячеек таблицы.

use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, FormatPattern};

use crate::layout::ReportLayout;
use crate::types::{ColumnRole, RowKind};

/// Денежный формат: разделители тысяч, отрицательные красным со знаком минус.
pub const CURRENCY_FORMAT: &str = "#,##0;[Red]\"-\"#,##0";
/// Формат количества.
pub const COUNT_FORMAT: &str = "#,##0";
/// Заливка строки заголовков таблицы.
pub const HEADER_FILL: u32 = 0x00D9_E1F2;

/// Горизонтальное выравнивание.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizontalAlign {
    /// По левому краю.
    Left,
    /// По центру.
    Center,
    /// По правому краю.
    Right,
}

/// Вертикальное выравнивание.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalAlign {
    /// По верху.
    Top,
    /// По центру.
    Center,
    /// По низу.
    Bottom,
}

/// Строка, для которой запрашивается оформление.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleRow {
    /// Строка заголовков таблицы.
    Header,
    /// Строка тела таблицы.
    Body(RowKind),
}

/// Описание оформления ячейки. Рамка всегда тонкая со всех сторон.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleDescriptor {
    /// Жирный шрифт.
    pub bold: bool,
    /// Горизонтальное выравнивание.
    pub horizontal: HorizontalAlign,
    /// Вертикальное выравнивание.
    pub vertical: VerticalAlign,
    /// Числовой формат.
    pub number_format: Option<&'static str>,
    /// Тонкая рамка со всех сторон.
    pub border: bool,
    /// Сплошная заливка (RGB).
    pub fill: Option<u32>,
}

/// Оформление ячейки по роли столбца и типу строки.
pub const fn style_for(role: ColumnRole, row: StyleRow) -> StyleDescriptor {
    match row {
        StyleRow::Header => StyleDescriptor {
            bold: true,
            horizontal: HorizontalAlign::Center,
            vertical: VerticalAlign::Center,
            number_format: None,
            border: true,
            fill: Some(HEADER_FILL),
        },
        StyleRow::Body(kind) => {
            let (horizontal, number_format) = match role {
                ColumnRole::Currency => (HorizontalAlign::Right, Some(CURRENCY_FORMAT)),
                ColumnRole::Count => (HorizontalAlign::Right, Some(COUNT_FORMAT)),
                ColumnRole::Serial | ColumnRole::Identity | ColumnRole::Service => {
                    (HorizontalAlign::Left, None)
                }
            };
            StyleDescriptor {
                bold: !matches!(kind, RowKind::Data),
                horizontal,
                vertical: VerticalAlign::Center,
                number_format,
                border: true,
                fill: None,
            }
        }
    }
}

impl ReportLayout {
    /// Оформление ячейки по индексу столбца раскладки.
    ///
    /// Столбцы вне раскладки оформляются как текстовые.
    pub fn style_for_cell(&self, column: u16, row: StyleRow) -> StyleDescriptor {
        let role = self
            .columns
            .get(usize::from(column))
            .map_or(ColumnRole::Service, |def| def.role);
        style_for(role, row)
    }
}

impl StyleDescriptor {
    /// Преобразует описание в формат `rust_xlsxwriter`.
    pub fn to_format(&self) -> Format {
        let horizontal = match self.horizontal {
            HorizontalAlign::Left => FormatAlign::Left,
            HorizontalAlign::Center => FormatAlign::Center,
            HorizontalAlign::Right => FormatAlign::Right,
        };
        let vertical = match self.vertical {
            VerticalAlign::Top => FormatAlign::Top,
            VerticalAlign::Center => FormatAlign::VerticalCenter,
            VerticalAlign::Bottom => FormatAlign::Bottom,
        };

        let mut format = Format::new().set_align(horizontal).set_align(vertical);
        if self.bold {
            format = format.set_bold();
        }
        if let Some(num_format) = self.number_format {
            format = format.set_num_format(num_format);
        }
        if self.border {
            format = format.set_border(FormatBorder::Thin);
        }
        if let Some(fill) = self.fill {
            format = format
                .set_background_color(Color::RGB(fill))
                .set_pattern(FormatPattern::Solid);
        }
        format
    }
}
