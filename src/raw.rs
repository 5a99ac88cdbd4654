//! Исходный ответ API: пачки, группы и позиции.

use std::fs::{self, DirEntry};
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::error::ReportError;
use crate::types::Money;
use crate::utils::{lenient_money, nullable_list, text_from_value};

/// Ответ API с уже отфильтрованными данными отчёта.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawReport {
    /// Пачки (страницы ответа).
    #[serde(default, deserialize_with = "nullable_list")]
    pub data: Vec<Batch>,
}

/// Одна страница ответа API.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Batch {
    /// Группы отчёта.
    #[serde(default, deserialize_with = "nullable_list")]
    pub items: Vec<Group>,
}

/// Сущность отчёта: клиент, сотрудник, акция или пара накладных продажа/возврат.
///
/// Ключи-синонимы (`id`/`code`, `fromDate`/`from_date` и т.п.) могут приходить
/// одновременно; берётся первый непустой в порядке приоритета.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(from = "GroupRecord")]
pub struct Group {
    /// Код сущности; для возвратов код накладной продажи.
    pub id: String,
    /// Имя сущности; для возвратов код накладной возврата.
    pub name: String,
    /// Начало действия акции.
    pub from_date: Option<Value>,
    /// Окончание действия акции.
    pub to_date: Option<Value>,
    /// Дата документа (дата возврата).
    pub date: Option<Value>,
    /// Позиции группы.
    pub items: Vec<LineItem>,
}

/// Одна строка накладной или услуги. Отсутствующие суммы считаются нулём.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(from = "LineItemRecord")]
pub struct LineItem {
    /// Наименование услуги.
    pub service_name: String,
    /// Выручка до скидки.
    pub sale_before: Option<Money>,
    /// Скидка.
    pub discount: Option<Money>,
    /// Выручка после скидки.
    pub sale_after: Option<Money>,
    /// Количество применений акции.
    pub total_apply: Option<Money>,
    /// Сумма, к которой применена акция.
    pub total_amount: Option<Money>,
    /// Сумма продажи по позиции.
    pub sale_amount: Option<Money>,
    /// Сумма возврата по позиции.
    pub refund_amount: Option<Money>,
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct GroupRecord {
    id: Option<Value>,
    code: Option<Value>,
    name: Option<Value>,
    full_name: Option<Value>,
    from_date: Option<Value>,
    #[serde(rename = "fromDate")]
    from_date_camel: Option<Value>,
    to_date: Option<Value>,
    #[serde(rename = "toDate")]
    to_date_camel: Option<Value>,
    date: Option<Value>,
    #[serde(deserialize_with = "nullable_list")]
    items: Vec<LineItem>,
}

impl From<GroupRecord> for Group {
    fn from(record: GroupRecord) -> Self {
        Self {
            id: first_text([&record.id, &record.code]),
            name: first_text([&record.name, &record.full_name]),
            from_date: record.from_date.or(record.from_date_camel),
            to_date: record.to_date.or(record.to_date_camel),
            date: record.date,
            items: record.items,
        }
    }
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct LineItemRecord {
    service_name: Option<Value>,
    #[serde(rename = "serviceName")]
    service_name_camel: Option<Value>,
    service: Option<Value>,
    #[serde(deserialize_with = "lenient_money")]
    sale_before: Option<Money>,
    #[serde(deserialize_with = "lenient_money")]
    discount: Option<Money>,
    #[serde(deserialize_with = "lenient_money")]
    sale_after: Option<Money>,
    #[serde(deserialize_with = "lenient_money")]
    total_apply: Option<Money>,
    #[serde(deserialize_with = "lenient_money")]
    total_amount: Option<Money>,
    #[serde(deserialize_with = "lenient_money")]
    sale_amount: Option<Money>,
    #[serde(deserialize_with = "lenient_money")]
    refund_amount: Option<Money>,
}

impl From<LineItemRecord> for LineItem {
    fn from(record: LineItemRecord) -> Self {
        Self {
            service_name: first_text([
                &record.service_name,
                &record.service_name_camel,
                &record.service,
            ]),
            sale_before: record.sale_before,
            discount: record.discount,
            sale_after: record.sale_after,
            total_apply: record.total_apply,
            total_amount: record.total_amount,
            sale_amount: record.sale_amount,
            refund_amount: record.refund_amount,
        }
    }
}

/// Первое непустое текстовое значение среди ключей-синонимов.
fn first_text<const N: usize>(candidates: [&Option<Value>; N]) -> String {
    candidates
        .into_iter()
        .flatten()
        .map(text_from_value)
        .find(|text| !text.is_empty())
        .unwrap_or_default()
}

impl RawReport {
    /// Читает JSON-ответ из произвольного `Read`.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ReportError> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Разбирает готовую JSON-строку.
    #[inline]
    pub fn from_str(s: &str) -> Result<Self, ReportError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Загружает файл или каталог страниц, см. [`RawReport::from_dir`].
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ReportError> {
        let path = path.as_ref();
        if path.is_dir() {
            Self::from_dir(path)
        } else {
            Self::from_reader(fs::File::open(path)?)
        }
    }

    /// Загружает все `*.json` из каталога и склеивает их пачки по порядку имён.
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Result<Self, ReportError> {
        let mut entries: Vec<_> = fs::read_dir(dir)?
            .filter_map(std::result::Result::ok)
            .collect();
        // Делаем порядок страниц детерминированным.
        entries.sort_by_key(DirEntry::path);

        let mut merged = Self::default();
        for entry in entries {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let is_json = path
                .extension()
                .and_then(|s| s.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
            if !is_json {
                continue;
            }

            let page = Self::from_reader(fs::File::open(&path)?)?;
            log::debug!("Loaded {} batches from {}", page.data.len(), path.display());
            merged.data.extend(page.data);
        }

        Ok(merged)
    }

    /// Итератор по всем группам всех пачек.
    #[inline]
    pub fn groups(&self) -> impl Iterator<Item = &Group> {
        self.data.iter().flat_map(|batch| batch.items.iter())
    }
}
