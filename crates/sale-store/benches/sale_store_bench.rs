use chrono::{Duration, Utc};
use criterion::{Criterion, criterion_group, criterion_main};
use domain::{Money, Sale, SaleItem};
use sale_store::{InMemorySaleRepository, SaleQuery, SaleRepository};

fn make_sale(n: i64) -> Sale {
    let mut sale = Sale::new(
        format!("S-{n:05}"),
        format!("C{}", n % 10),
        "Customer",
        "B1",
        "Main",
        Utc::now() - Duration::minutes(n),
    );
    sale.add_item(SaleItem::new("P1", "Widget", 3, Money::from_cents(1000 + n)))
        .unwrap();
    sale
}

fn bench_create(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    c.bench_function("sale_store/create", |b| {
        b.iter(|| {
            rt.block_on(async {
                let repo = InMemorySaleRepository::new();
                repo.create(make_sale(1)).await.unwrap();
            });
        });
    });
}

fn bench_get_by_id(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let repo = InMemorySaleRepository::new();
    let id = rt.block_on(async {
        for n in 0..1_000 {
            repo.create(make_sale(n)).await.unwrap();
        }
        repo.create(make_sale(1_000)).await.unwrap().id()
    });

    c.bench_function("sale_store/get_by_id_1000", |b| {
        b.iter(|| {
            rt.block_on(async {
                repo.get_by_id(id).await.unwrap();
            });
        });
    });
}

fn bench_update(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let repo = InMemorySaleRepository::new();
    let mut sale = rt.block_on(async { repo.create(make_sale(1)).await.unwrap() });

    c.bench_function("sale_store/update", |b| {
        b.iter(|| {
            rt.block_on(async {
                let version = repo.update(&sale).await.unwrap();
                sale.set_version(version);
            });
        });
    });
}

fn bench_list_filtered(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let repo = InMemorySaleRepository::new();
    rt.block_on(async {
        for n in 0..1_000 {
            repo.create(make_sale(n)).await.unwrap();
        }
    });
    let query = SaleQuery::new().customer_id("C3").page(2, 20);

    c.bench_function("sale_store/list_filtered_1000", |b| {
        b.iter(|| {
            rt.block_on(async {
                repo.list(&query).await.unwrap();
            });
        });
    });
}

criterion_group!(
    benches,
    bench_create,
    bench_get_by_id,
    bench_update,
    bench_list_filtered,
);
criterion_main!(benches);
