use criterion::{black_box, criterion_group, criterion_main, Criterion};
use lottie_core::{Bezier, EllipseArc, NVector};

fn create_path(points: usize) -> Bezier {
    let mut bez = Bezier::new();
    for i in 0..points {
        let angle = i as f64 / points as f64 * std::f64::consts::TAU;
        bez.add_smooth_point(
            NVector::xy(256.0 + 200.0 * angle.cos(), 256.0 + 200.0 * angle.sin()),
            NVector::xy(-20.0 * angle.sin(), 20.0 * angle.cos()),
        );
    }
    bez.close(true);
    bez
}

fn bench_point_at(c: &mut Criterion) {
    let bez = create_path(64);
    c.bench_function("bezier_point_at", |b| {
        b.iter(|| {
            let mut acc = 0.0;
            for i in 0..=100 {
                acc += bez.point_at(black_box(i as f64 / 100.0))[0];
            }
            acc
        })
    });
}

fn bench_segment(c: &mut Criterion) {
    let bez = create_path(64);
    c.bench_function("bezier_segment", |b| {
        b.iter(|| bez.segment(black_box(0.2), black_box(0.65)))
    });
}

fn bench_split_each_segment(c: &mut Criterion) {
    let bez = create_path(64);
    c.bench_function("bezier_split_each_segment", |b| {
        b.iter(|| {
            let mut copy = bez.clone();
            copy.split_each_segment();
            copy
        })
    });
}

fn bench_arc_to(c: &mut Criterion) {
    c.bench_function("svg_arc_to", |b| {
        b.iter(|| {
            let mut bez = Bezier::new();
            bez.add_point(NVector::xy(0.0, 0.0));
            bez.arc_to(black_box(40.0), 25.0, 30.0, true, false, NVector::xy(60.0, 10.0));
            bez
        })
    });
    c.bench_function("ellipse_to_bezier", |b| {
        let ellipse = EllipseArc::new(NVector::xy(0.0, 0.0), NVector::xy(50.0, 30.0), 0.3);
        b.iter(|| ellipse.to_bezier(black_box(0.0), std::f64::consts::TAU))
    });
}

criterion_group!(
    benches,
    bench_point_at,
    bench_segment,
    bench_split_each_segment,
    bench_arc_to
);
criterion_main!(benches);
