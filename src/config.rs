//! Настройки выгрузки: реквизиты магазина, часовой пояс, каталог файлов.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ReportError;
use crate::utils::DateFormatter;

/// Смещение часового пояса магазина по умолчанию (UTC+7).
pub const DEFAULT_UTC_OFFSET_HOURS: i32 = 7;

/// Настройки выгрузки отчётов, читаются из TOML.
///
/// ```toml
/// store_name = "Gara Minh Phát"
/// store_address = "12 Lê Lợi, Quận 1, TP.HCM"
/// utc_offset_hours = 7
/// output_dir = "reports"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportConfig {
    /// Название магазина в шапке листа.
    pub store_name: String,
    /// Адрес магазина в шапке листа.
    pub store_address: String,
    /// Смещение часового пояса в часах от UTC.
    pub utc_offset_hours: i32,
    /// Имя листа вместо имени из раскладки.
    pub sheet_name: Option<String>,
    /// Каталог для готовых файлов.
    pub output_dir: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            store_name: String::new(),
            store_address: String::new(),
            utc_offset_hours: DEFAULT_UTC_OFFSET_HOURS,
            sheet_name: None,
            output_dir: PathBuf::from("."),
        }
    }
}

impl ExportConfig {
    /// Разбирает настройки из TOML-строки; отсутствующие ключи берутся по умолчанию.
    pub fn from_toml_str(s: &str) -> Result<Self, ReportError> {
        Ok(toml::from_str(s)?)
    }

    /// Читает настройки из файла.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ReportError> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Форматировщик дат в часовом поясе магазина.
    #[inline]
    pub fn date_formatter(&self) -> Result<DateFormatter, ReportError> {
        DateFormatter::from_hours(self.utc_offset_hours)
    }
}
