//! Ошибки загрузки данных, настройки и выгрузки отчётов.

/// Ошибка построения или выгрузки отчёта о продажах.
#[derive(thiserror::Error, Debug)]
pub enum ReportError {
    /// Ошибка ввода-вывода при чтении данных или записи файла.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Входной JSON не удалось разобрать.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// Файл настроек не удалось разобрать.
    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),
    /// Ошибка формирования XLSX-документа.
    #[error("XLSX error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
    /// Ошибка разбора даты.
    #[error("Invalid date '{value}'")]
    Date {
        /// Некорректная дата.
        value: String,
    },
    /// Неизвестный тип отчёта.
    #[error("Unknown report kind '{value}'")]
    UnknownKind {
        /// Исходное значение.
        value: String,
    },
    /// Фоновая задача сериализации завершилась аварийно.
    #[cfg(feature = "async")]
    #[error("Export task failed: {0}")]
    Task(String),
}
