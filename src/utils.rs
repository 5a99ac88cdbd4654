//! Вспомогательные разборщики дат, чисел и строк из нестрогого JSON.

use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Offset, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::ReportError;
use crate::types::Money;

/// Формат даты в ячейках и имени файла.
pub const DISPLAY_DATE_FORMAT: &str = "%d/%m/%Y";
const TIMESTAMP_FORMAT: &str = "%H:%M %d/%m/%Y";
const ISO_DATE_FORMAT: &str = "%Y-%m-%d";
const NAIVE_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Приводит даты из API к виду `DD/MM/YYYY` в часовом поясе магазина.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateFormatter {
    offset: FixedOffset,
}

impl Default for DateFormatter {
    fn default() -> Self {
        Self::new(Utc.fix())
    }
}

impl DateFormatter {
    /// Создаёт форматировщик для заданного смещения.
    #[inline]
    pub const fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    /// Создаёт форматировщик по смещению в часах от UTC.
    pub fn from_hours(hours: i32) -> Result<Self, ReportError> {
        hours
            .checked_mul(3600)
            .and_then(FixedOffset::east_opt)
            .map(Self::new)
            .ok_or_else(|| ReportError::Date {
                value: format!("UTC offset {hours}h"),
            })
    }

    /// Смещение часового пояса.
    #[inline]
    pub const fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Текущий момент в часовом поясе магазина.
    pub fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.offset)
    }

    /// Разбирает дату из JSON: строка ISO/RFC 3339/`DD/MM/YYYY` или epoch в миллисекундах.
    pub fn parse_value(&self, value: &Value) -> Option<NaiveDate> {
        match value {
            Value::String(text) => self.parse_text(text),
            Value::Number(n) => n.as_i64().and_then(|ms| self.date_from_epoch_millis(ms)),
            _ => None,
        }
    }

    /// Разбирает строковую дату.
    pub fn parse_text(&self, text: &str) -> Option<NaiveDate> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        if text.len() >= 10 && text.chars().all(|ch| ch.is_ascii_digit()) {
            return text
                .parse::<i64>()
                .ok()
                .and_then(|ms| self.date_from_epoch_millis(ms));
        }
        if let Ok(date) = NaiveDate::parse_from_str(text, ISO_DATE_FORMAT) {
            return Some(date);
        }
        if let Ok(moment) = DateTime::parse_from_rfc3339(text) {
            return Some(moment.with_timezone(&self.offset).date_naive());
        }
        if let Ok(moment) = NaiveDateTime::parse_from_str(text, NAIVE_DATETIME_FORMAT) {
            return Some(moment.date());
        }
        NaiveDate::parse_from_str(text, DISPLAY_DATE_FORMAT).ok()
    }

    /// Дата для ячейки; пустая строка, если значение не распознано.
    pub fn display(&self, value: Option<&Value>) -> String {
        match value {
            None | Some(Value::Null) => String::new(),
            Some(value) => self.parse_value(value).map_or_else(
                || {
                    log::warn!("Unrecognised date value {value}, leaving cell blank");
                    String::new()
                },
                format_date,
            ),
        }
    }

    fn date_from_epoch_millis(&self, millis: i64) -> Option<NaiveDate> {
        DateTime::<Utc>::from_timestamp_millis(millis)
            .map(|moment| moment.with_timezone(&self.offset).date_naive())
    }
}

/// Форматирует дату как `DD/MM/YYYY`.
#[inline]
pub fn format_date(date: NaiveDate) -> String {
    date.format(DISPLAY_DATE_FORMAT).to_string()
}

/// Форматирует момент печати как `HH:MM DD/MM/YYYY`.
#[inline]
pub fn format_timestamp(moment: &DateTime<FixedOffset>) -> String {
    moment.format(TIMESTAMP_FORMAT).to_string()
}

/// Строго разбирает дату фильтра: `YYYY-MM-DD`, RFC 3339 или `DD/MM/YYYY`.
pub fn parse_date(value: &str) -> Result<NaiveDate, ReportError> {
    let text = value.trim();
    NaiveDate::parse_from_str(text, ISO_DATE_FORMAT)
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|moment| moment.date_naive())
        })
        .or_else(|| NaiveDate::parse_from_str(text, DISPLAY_DATE_FORMAT).ok())
        .ok_or_else(|| ReportError::Date {
            value: text.to_string(),
        })
}

/// Нормализует числовую строку, удаляя пробелы и знак плюса.
fn normalize_number(input: &str) -> String {
    input
        .chars()
        .filter(|ch| !matches!(*ch, ' ' | '\u{a0}' | '\u{202f}' | '+'))
        .collect()
}

/// Разбирает денежное значение из JSON; всё нераспознанное даёт `None`.
pub fn money_from_value(value: &Value) -> Option<Money> {
    let text = match value {
        Value::Null => return None,
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        other => {
            log::warn!("Non-numeric amount {other}, treating as zero");
            return None;
        }
    };
    let normalized = normalize_number(&text);
    if normalized.is_empty() {
        return None;
    }
    Decimal::from_str(&normalized)
        .or_else(|_| Decimal::from_scientific(&normalized))
        .inspect_err(|_| log::warn!("Invalid amount '{text}', treating as zero"))
        .ok()
}

/// Строковое значение идентификатора: строки и числа как есть, прочее пусто.
pub fn text_from_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}

pub(crate) fn lenient_money<'de, D>(deserializer: D) -> Result<Option<Money>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(money_from_value))
}

pub(crate) fn nullable_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
