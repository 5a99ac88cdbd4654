//! Уведомления пользователя о результате выгрузки.
//!
//! Получатель уведомлений передаётся явно тем, кто их отправляет.

/// Важность уведомления.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// Операция выполнена.
    Success,
    /// Информация.
    Info,
    /// Предупреждение.
    Warning,
    /// Ошибка.
    Error,
}

/// Получатель уведомлений.
pub trait Notifier {
    /// Показывает сообщение пользователю.
    fn notify(&self, severity: Severity, message: &str);
}

/// Пишет уведомления в журнал через `log`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Success | Severity::Info => log::info!("{message}"),
            Severity::Warning => log::warn!("{message}"),
            Severity::Error => log::error!("{message}"),
        }
    }
}
