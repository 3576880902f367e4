use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use venue_seating::geometry::{self, DEFAULT_PADDING};
use venue_seating::models::{NamingScheme, Point, ShapeKind, Zone};

fn zone(shape: ShapeKind, rows: i32, cols: i32) -> Zone {
    Zone {
        id: "bench".into(),
        name: "Bench".into(),
        shape,
        x: 0.0,
        y: 0.0,
        width: 1200.0,
        height: 800.0,
        rotation: 0.0,
        rows,
        cols,
        curvature: 35.0,
        naming: NamingScheme::Alpha,
        category_id: None,
        capacity: 12,
        points: vec![
            Point::new(0.0, 0.0),
            Point::new(1200.0, 0.0),
            Point::new(900.0, 800.0),
            Point::new(300.0, 800.0),
        ],
    }
}

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");
    for size in [10, 40, 100] {
        for shape in [ShapeKind::Rect, ShapeKind::CurvedRows, ShapeKind::Polygon] {
            let z = zone(shape, size, size);
            group.bench_with_input(
                BenchmarkId::new(format!("{:?}", shape), size),
                &z,
                |b, z| b.iter(|| geometry::generate(black_box(z), DEFAULT_PADDING)),
            );
        }
    }
    group.bench_function("rect_table_12", |b| {
        let z = zone(ShapeKind::RectTable, 0, 0);
        b.iter(|| geometry::generate(black_box(&z), DEFAULT_PADDING))
    });
    group.finish();
}

criterion_group!(benches, bench_generate);
criterion_main!(benches);
