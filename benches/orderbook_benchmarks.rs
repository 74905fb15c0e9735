use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use live_orderbook::{BookSide, Order, Side};
use rust_decimal::Decimal;
use std::sync::Arc;
use std::thread;

fn make_orders(count: usize, side: Side) -> Vec<Order> {
    (0..count)
        .map(|i| {
            Order::new(
                i.to_string(),
                "bench",
                Decimal::new(1 + (i % 50) as i64, 1),
                Decimal::new(250 + (i % 100) as i64, 2),
                side,
            )
            .unwrap()
        })
        .collect()
}

fn populated_side(count: usize) -> (BookSide, Vec<Order>) {
    let side = BookSide::new(Side::Sell);
    let orders = make_orders(count, Side::Sell);
    for order in &orders {
        side.add_order(order.clone()).unwrap();
    }
    (side, orders)
}

fn bench_add_order(c: &mut Criterion) {
    c.bench_function("add_1000_orders", |b| {
        b.iter_batched(
            || (BookSide::new(Side::Sell), make_orders(1000, Side::Sell)),
            |(side, orders)| {
                for order in orders {
                    side.add_order(order).unwrap();
                }
                black_box(side)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_cancel_order(c: &mut Criterion) {
    c.bench_function("cancel_1000_orders", |b| {
        b.iter_batched(
            || populated_side(1000),
            |(side, orders)| {
                for order in &orders {
                    side.cancel_order(order).unwrap();
                }
                black_box(side)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_get_summary(c: &mut Criterion) {
    let (side, _) = populated_side(1000);

    c.bench_function("get_summary_100_levels", |b| {
        b.iter(|| black_box(side.get_summary()))
    });
}

fn bench_summary_under_write_load(c: &mut Criterion) {
    let (side, _) = populated_side(1000);
    let side = Arc::new(side);

    c.bench_function("get_summary_with_concurrent_writer", |b| {
        let writer_side = Arc::clone(&side);
        let writer = thread::spawn(move || {
            for order in make_orders(2000, Side::Sell).iter().skip(1000) {
                writer_side.add_order(order.clone()).unwrap();
                writer_side.cancel_order(order).unwrap();
            }
        });

        b.iter(|| black_box(side.get_summary()));

        writer.join().unwrap();
    });
}

criterion_group!(
    benches,
    bench_add_order,
    bench_cancel_order,
    bench_get_summary,
    bench_summary_under_write_load
);
criterion_main!(benches);
