//! Benchmarks for line simplification and ring densification.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use centerline::simplify::{densify_ring, simplify_line_dp, simplify_line_vw};
use centerline::Point2;

/// A winding road in map units: long gentle curves with surveyor jitter.
fn winding_road(num_points: usize) -> Vec<Point2<f64>> {
    (0..num_points)
        .map(|i| {
            let x = i as f64 * 5.0;
            let jitter = ((i * 31) % 7) as f64 * 0.3;
            Point2::new(x, 200.0 * (x / 800.0).sin() + jitter)
        })
        .collect()
}

/// A blocky street grid walk with deterministic turns.
fn grid_walk(num_points: usize, seed: u64) -> Vec<Point2<f64>> {
    let mut points = Vec::with_capacity(num_points);
    let mut p = Point2::new(0.0, 0.0);
    let mut state = seed;

    for _ in 0..num_points {
        points.push(p);

        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;

        match state % 3 {
            0 => p.x += 40.0,
            1 => p.y += 40.0,
            _ => p.y -= 40.0,
        }
    }

    points
}

fn bench_dp(c: &mut Criterion) {
    let mut group = c.benchmark_group("simplify_dp");

    for size in [100, 1000, 10000] {
        let points = winding_road(size);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("winding_road", size), &points, |b, pts| {
            b.iter(|| simplify_line_dp(black_box(pts), black_box(20.0)))
        });
    }

    for size in [1000, 10000] {
        let points = grid_walk(size, 12345);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("grid_walk", size), &points, |b, pts| {
            b.iter(|| simplify_line_dp(black_box(pts), black_box(20.0)))
        });
    }

    group.finish();
}

fn bench_vw(c: &mut Criterion) {
    let mut group = c.benchmark_group("simplify_vw");

    for size in [100, 1000, 10000] {
        let points = winding_road(size);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("winding_road", size), &points, |b, pts| {
            b.iter(|| simplify_line_vw(black_box(pts), black_box(100.0)))
        });
    }

    group.finish();
}

fn bench_densify(c: &mut Criterion) {
    let mut group = c.benchmark_group("densify_ring");

    // Buffer-sized rings sampled at the default density
    for size in [50, 500, 5000] {
        let ring = winding_road(size);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("winding_road", size), &ring, |b, r| {
            b.iter(|| densify_ring(black_box(r), black_box(10.0)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_dp, bench_vw, bench_densify);
criterion_main!(benches);
