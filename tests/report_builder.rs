mod common;

use common::{build, customer_scenario, money, random_report, raw, request};
use serde_json::json;
use service_sales_report::{
    DateFormatter, Money, ReportBuilder, ReportKind, RowKind, SheetRow,
};

fn group_totals(rows: &[SheetRow]) -> Vec<&SheetRow> {
    rows.iter().filter(|r| r.kind == RowKind::GroupTotal).collect()
}

#[test]
fn customer_scenario_totals() {
    let report = build(ReportKind::Customer, customer_scenario());

    assert_eq!(report.rows.len(), 6);
    assert_eq!(report.group_count, 2);

    let totals = group_totals(&report.rows);
    assert_eq!(totals.len(), 2);
    assert_eq!(totals[0].values, vec![money(150_000), money(10_000), money(140_000)]);
    assert_eq!(totals[1].values, vec![money(200_000), money(20_000), money(180_000)]);
    assert_eq!(
        report.grand_total(),
        &[money(350_000), money(30_000), money(320_000)]
    );

    let kinds: Vec<RowKind> = report.rows.iter().map(|r| r.kind).collect();
    assert_eq!(
        kinds,
        vec![
            RowKind::Data,
            RowKind::Data,
            RowKind::GroupTotal,
            RowKind::Data,
            RowKind::GroupTotal,
            RowKind::GrandTotal,
        ]
    );
}

#[test]
fn data_rows_carry_serial_and_identity() {
    let report = build(ReportKind::Customer, customer_scenario());
    let data: Vec<&SheetRow> = report.rows_of(RowKind::Data).collect();

    assert_eq!(data[0].serial, Some(1));
    assert_eq!(data[1].serial, Some(1));
    assert_eq!(data[2].serial, Some(2));
    assert_eq!(data[0].identity, vec!["KH001".to_string(), "Nguyễn Văn A".to_string()]);
    assert_eq!(data[1].service_name, "Rửa xe");
    assert_eq!(data[2].identity[0], "KH002");
}

#[test]
fn explicit_sale_after_is_kept() {
    let report = build(
        ReportKind::Staff,
        json!({ "data": [{ "items": [{
            "id": "NV01",
            "name": "Lê Văn C",
            "items": [{ "service_name": "Sơn", "sale_before": 300000, "discount": 30000, "sale_after": 250000 }]
        }]}]}),
    );
    assert_eq!(report.rows[0].values, vec![money(300_000), money(30_000), money(250_000)]);
}

#[test]
fn empty_dataset_yields_zero_grand_total() {
    for kind in ReportKind::ALL {
        let report = build(kind, json!({ "data": [] }));
        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.rows[0].kind, RowKind::GrandTotal);
        assert!(report.grand_total().iter().all(Money::is_zero));
        assert!(report.merges.is_empty());
        assert_eq!(report.group_count, 0);
    }
}

#[test]
fn missing_data_key_is_empty_dataset() {
    let report = build(ReportKind::Refund, json!({}));
    assert_eq!(report.rows.len(), 1);
    assert_eq!(report.grand_total(), &[Money::ZERO, Money::ZERO]);
}

#[test]
fn group_without_items_still_totals_and_counts() {
    let report = build(
        ReportKind::Customer,
        json!({ "data": [{ "items": [
            { "id": "KH001", "name": "A", "items": [] },
            { "id": "KH002", "name": "B", "items": [{ "service_name": "Rửa xe", "sale_before": 40000 }] }
        ]}]}),
    );

    assert_eq!(report.rows[0].kind, RowKind::GroupTotal);
    assert!(report.rows[0].values.iter().all(Money::is_zero));
    assert_eq!(report.rows[1].serial, Some(2));
    assert_eq!(report.group_count, 2);
    assert_eq!(report.grand_total(), &[money(40_000), Money::ZERO, money(40_000)]);
}

#[test]
fn missing_and_invalid_amounts_count_as_zero() {
    let report = build(
        ReportKind::Promotion,
        json!({ "data": [{ "items": [{
            "id": 7,
            "name": "Tết",
            "items": [
                { "service_name": "Thay lốp", "total_apply": null, "total_amount": "abc" },
                { "service_name": "Thay lốp", "total_apply": "3", "total_amount": "1 500 000" },
                { "service_name": "Rửa xe", "total_amount": true }
            ]
        }]}]}),
    );

    assert_eq!(report.rows[0].values, vec![Money::ZERO, Money::ZERO]);
    assert_eq!(report.rows[1].values, vec![money(3), money(1_500_000)]);
    assert_eq!(report.grand_total(), &[money(3), money(1_500_000)]);
    assert_eq!(report.rows[0].identity[0], "7");
}

#[test]
fn missing_identity_becomes_blank() {
    let report = build(
        ReportKind::Customer,
        json!({ "data": [{ "items": [{ "items": [{ "sale_before": 1000 }] }] }] }),
    );
    assert_eq!(report.rows[0].identity, vec![String::new(), String::new()]);
    assert_eq!(report.rows[0].service_name, "");
}

#[test]
fn promotion_identity_formats_dates() {
    let raw = raw(json!({ "data": [{ "items": [{
        "id": "KM01",
        "name": "Khai trương",
        "from_date": "2024-01-31T20:00:00Z",
        "to_date": 1_709_164_800_000_i64,
        "items": [{ "service_name": "Bảo dưỡng", "total_apply": 2, "total_amount": 400000 }]
    }]}]}));
    let dates = DateFormatter::from_hours(7).unwrap();
    let report = ReportBuilder::new(&raw, request(ReportKind::Promotion))
        .dates(dates)
        .build();

    assert_eq!(
        report.rows[0].identity,
        vec![
            "KM01".to_string(),
            "Khai trương".to_string(),
            "01/02/2024".to_string(),
            "29/02/2024".to_string(),
        ]
    );
}

#[test]
fn refund_rows_link_sale_and_refund_invoices() {
    let report = build(
        ReportKind::Refund,
        json!({ "data": [{ "items": [{
            "id": "HD0001",
            "name": "TH0001",
            "date": "2024-02-10",
            "items": [
                { "service_name": "Thay dầu", "sale_amount": 120000, "refund_amount": 120000 },
                { "service_name": "Lọc gió", "sale_amount": 80000, "refund_amount": 40000 }
            ]
        }]}]}),
    );

    assert_eq!(
        report.rows[0].identity,
        vec!["HD0001".to_string(), "TH0001".to_string(), "10/02/2024".to_string()]
    );
    assert_eq!(report.grand_total(), &[money(200_000), money(160_000)]);
}

#[test]
fn batches_are_flattened_in_order() {
    let report = build(
        ReportKind::Staff,
        json!({ "data": [
            { "items": [{ "id": "NV01", "name": "A", "items": [{ "sale_before": 1 }] }] },
            { "items": null },
            { "items": [{ "id": "NV02", "name": "B", "items": [{ "sale_before": 2 }] }] }
        ]}),
    );
    let serials: Vec<Option<usize>> = report.rows_of(RowKind::Data).map(|r| r.serial).collect();
    assert_eq!(serials, vec![Some(1), Some(2)]);
    assert_eq!(report.rows_of(RowKind::Data).nth(1).unwrap().identity[0], "NV02");
}

#[test]
fn group_totals_sum_to_grand_total_for_random_inputs() {
    for seed in 0..64 {
        let (value, _) = random_report(seed);
        for kind in ReportKind::ALL {
            let report = build(kind, value.clone());
            let width = report.grand_total().len();
            let mut summed = vec![Money::ZERO; width];
            for row in report.rows_of(RowKind::GroupTotal) {
                for (acc, v) in summed.iter_mut().zip(&row.values) {
                    *acc += *v;
                }
            }
            assert_eq!(summed, report.grand_total(), "seed {seed}, kind {kind}");
        }
    }
}

#[test]
fn each_group_yields_its_rows_and_one_total() {
    for seed in 0..64 {
        let (value, sizes) = random_report(seed);
        let report = build(ReportKind::Customer, value);

        assert_eq!(report.group_count, sizes.len());
        assert_eq!(report.rows_of(RowKind::GroupTotal).count(), sizes.len());
        assert_eq!(report.rows_of(RowKind::GrandTotal).count(), 1);
        assert_eq!(report.rows.last().unwrap().kind, RowKind::GrandTotal);

        let mut cursor = 0;
        for (idx, &size) in sizes.iter().enumerate() {
            for row in &report.rows[cursor..cursor + size] {
                assert_eq!(row.kind, RowKind::Data);
                assert_eq!(row.serial, Some(idx + 1));
            }
            assert_eq!(report.rows[cursor + size].kind, RowKind::GroupTotal);
            cursor += size + 1;
        }
        assert_eq!(cursor + 1, report.rows.len());
    }
}

#[test]
fn totals_beyond_decimal_range_are_clamped() {
    let huge = "60000000000000000000000000000";
    let report = build(
        ReportKind::Customer,
        json!({ "data": [{ "items": [
            { "id": "KH001", "name": "A", "items": [
                { "service_name": "Thay dầu", "sale_before": huge },
                { "service_name": "Rửa xe", "sale_before": huge }
            ]},
            { "id": "KH002", "name": "B", "items": [
                { "service_name": "Rửa xe", "sale_before": huge, "discount": 1 }
            ]}
        ]}]}),
    );

    assert_eq!(report.grand_total()[0], Money::MAX);
    assert_eq!(report.grand_total()[1], money(1));
    assert_eq!(report.grand_total()[2], Money::MAX);
    assert_eq!(
        report.rows_of(RowKind::GroupTotal).next().unwrap().values[0],
        Money::MAX
    );
    assert!(report.saturated >= 2);
}

#[test]
fn derived_sale_after_is_clamped() {
    let report = build(
        ReportKind::Staff,
        json!({ "data": [{ "items": [{ "id": "NV01", "name": "A", "items": [{
            "sale_before": "70000000000000000000000000000",
            "discount": "-70000000000000000000000000000"
        }]}]}]}),
    );
    assert_eq!(report.rows[0].values[2], Money::MAX);
}

#[test]
fn negative_overflow_clamps_to_minimum() {
    let low = "-60000000000000000000000000000";
    let report = build(
        ReportKind::Refund,
        json!({ "data": [{ "items": [{ "id": "HD1", "name": "TH1", "items": [
            { "sale_amount": low, "refund_amount": 5 },
            { "sale_amount": low, "refund_amount": 5 }
        ]}]}]}),
    );
    assert_eq!(report.grand_total(), &[Money::MIN, money(10)]);
    assert_eq!(report.saturated, 1);
}

#[test]
fn regular_reports_are_not_clamped() {
    let report = build(ReportKind::Customer, customer_scenario());
    assert_eq!(report.saturated, 0);
}
