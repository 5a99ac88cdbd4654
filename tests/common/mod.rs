//! Общие данные и помощники для интеграционных тестов.
#![allow(dead_code)]

use std::cell::RefCell;

use chrono::NaiveDate;
use serde_json::{Value, json};
use service_sales_report::{
    Money, Notifier, RawReport, Report, ReportKind, ReportRequest, Severity,
};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub fn request(kind: ReportKind) -> ReportRequest {
    ReportRequest::new(kind, date(2024, 2, 1), date(2024, 2, 29))
}

pub fn money(value: i64) -> Money {
    Money::from(value)
}

pub fn raw(value: Value) -> RawReport {
    serde_json::from_value(value).expect("valid report json")
}

pub fn build(kind: ReportKind, value: Value) -> Report {
    Report::build(&raw(value), request(kind))
}

/// Клиентский отчёт из примера: две группы, три позиции.
pub fn customer_scenario() -> Value {
    json!({
        "data": [{
            "items": [
                {
                    "id": "KH001",
                    "name": "Nguyễn Văn A",
                    "items": [
                        { "service_name": "Thay dầu", "sale_before": 100000, "discount": 10000 },
                        { "service_name": "Rửa xe", "sale_before": 50000, "discount": 0 }
                    ]
                },
                {
                    "id": "KH002",
                    "name": "Trần Thị B",
                    "items": [
                        { "service_name": "Bảo dưỡng", "sale_before": 200000, "discount": 20000 }
                    ]
                }
            ]
        }]
    })
}

/// Детерминированный генератор псевдослучайных наборов групп.
pub struct Lcg(u64);

impl Lcg {
    pub const fn new(seed: u64) -> Self {
        Self(seed)
    }

    pub fn next(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        self.0 >> 33
    }

    pub fn below(&mut self, bound: u64) -> u64 {
        self.next() % bound
    }
}

/// Случайный ответ API: несколько пачек, группы с 0..4 позициями,
/// часть сумм отсутствует или равна null.
pub fn random_report(seed: u64) -> (Value, Vec<usize>) {
    let mut rng = Lcg::new(seed);
    let mut sizes = Vec::new();
    let batches: Vec<Value> = (0..=rng.below(3))
        .map(|_| {
            let groups: Vec<Value> = (0..rng.below(4))
                .map(|g| {
                    let count = rng.below(5) as usize;
                    sizes.push(count);
                    let items: Vec<Value> = (0..count)
                        .map(|i| {
                            let mut item = serde_json::Map::new();
                            item.insert("service_name".into(), json!(format!("DV{i}")));
                            for field in [
                                "sale_before",
                                "discount",
                                "total_apply",
                                "total_amount",
                                "sale_amount",
                                "refund_amount",
                            ] {
                                match rng.below(4) {
                                    0 => {}
                                    1 => {
                                        item.insert(field.into(), Value::Null);
                                    }
                                    2 => {
                                        item.insert(field.into(), json!(rng.below(500_000)));
                                    }
                                    _ => {
                                        let cents = rng.below(1_000_000);
                                        item.insert(
                                            field.into(),
                                            json!(format!("{}.{:02}", cents / 100, cents % 100)),
                                        );
                                    }
                                }
                            }
                            Value::Object(item)
                        })
                        .collect();
                    json!({ "id": format!("G{g}"), "name": format!("Nhóm {g}"), "items": items })
                })
                .collect();
            json!({ "items": groups })
        })
        .collect();
    (json!({ "data": batches }), sizes)
}

/// Получатель уведомлений, запоминающий все сообщения.
#[derive(Default)]
pub struct RecordingNotifier {
    pub messages: RefCell<Vec<(Severity, String)>>,
}

impl Notifier for RecordingNotifier {
    fn notify(&self, severity: Severity, message: &str) {
        self.messages
            .borrow_mut()
            .push((severity, message.to_string()));
    }
}

impl RecordingNotifier {
    pub fn severities(&self) -> Vec<Severity> {
        self.messages.borrow().iter().map(|(s, _)| *s).collect()
    }
}
