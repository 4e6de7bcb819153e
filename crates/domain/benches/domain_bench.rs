use chrono::Utc;
use criterion::{Criterion, criterion_group, criterion_main};
use domain::{Discount, Money, Sale, SaleEvent, SaleItem};
use std::hint::black_box;

fn sale_with_items(count: u32) -> Sale {
    let mut sale = Sale::new("S-BENCH", "C1", "Jane", "B1", "Main", Utc::now());
    for n in 0..count {
        let item = SaleItem::new(
            format!("SKU-{n:03}"),
            format!("Product {n}"),
            n % 20 + 1,
            Money::from_cents(100 + i64::from(n)),
        );
        sale.add_item(item).unwrap();
    }
    sale
}

fn bench_discount_tiers(c: &mut Criterion) {
    c.bench_function("domain/discount_for_quantity", |b| {
        b.iter(|| {
            for q in 1..=20 {
                black_box(Discount::for_quantity(black_box(q)).unwrap());
            }
        });
    });
}

fn bench_add_item(c: &mut Criterion) {
    c.bench_function("domain/add_item", |b| {
        b.iter(|| {
            let mut sale = Sale::new("S-1", "C1", "Jane", "B1", "Main", Utc::now());
            let item = SaleItem::new("SKU-001", "Widget", 12, Money::from_cents(1000));
            sale.add_item(item).unwrap();
            black_box(sale);
        });
    });
}

fn bench_total_amount_100(c: &mut Criterion) {
    let sale = sale_with_items(100);

    c.bench_function("domain/total_amount_100_items", |b| {
        b.iter(|| black_box(sale.total_amount()));
    });
}

fn bench_validate_100(c: &mut Criterion) {
    let sale = sale_with_items(100);

    c.bench_function("domain/validate_100_items", |b| {
        b.iter(|| black_box(sale.validate()));
    });
}

fn bench_event_serialization(c: &mut Criterion) {
    let sale = sale_with_items(20);
    let event = SaleEvent::sale_created(&sale);

    c.bench_function("domain/serialize_sale_created", |b| {
        b.iter(|| black_box(serde_json::to_vec(&event).unwrap()));
    });

    c.bench_function("domain/serialize_sale_50_items", |b| {
        let sale = sale_with_items(50);
        b.iter(|| black_box(serde_json::to_vec(&sale).unwrap()));
    });
}

criterion_group!(
    benches,
    bench_discount_tiers,
    bench_add_item,
    bench_total_amount_100,
    bench_validate_100,
    bench_event_serialization,
);
criterion_main!(benches);
