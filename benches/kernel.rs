use criterion::{criterion_group, criterion_main, Criterion, Throughput};

use csc_core::config::IntCoefficients;
use csc_core::kernel::int::multiply3x3;
use csc_core::matrix::{splat_matrix, Lanes8};

const WIDTH: usize = 1920;
const HEIGHT: usize = 1080;

fn identity_coeffs() -> IntCoefficients {
    IntCoefficients {
        yuv2rgb: splat_matrix([[16384, 0, 0], [0, 16384, 0], [0, 0, 16384]]),
        rgb2yuv: splat_matrix([[16384, 0, 0], [0, 16384, 0], [0, 0, 16384]]),
        yuv2yuv: splat_matrix([[16384, 0, 0], [0, 16384, 0], [0, 0, 16384]]),
        lrgb2lrgb: splat_matrix([[16384, 0, 0], [0, 16384, 0], [0, 0, 16384]]),
        in_off: (Lanes8::splat(0), Lanes8::splat(0)),
        out_off: (Lanes8::splat(0), Lanes8::splat(0)),
        y_rng: (255.0, 255.0),
        uv_rng: (255.0, 255.0),
    }
}

fn bench_multiply3x3(c: &mut Criterion) {
    let n = WIDTH * HEIGHT;
    let r = vec![100i32; n];
    let g = vec![200i32; n];
    let b = vec![300i32; n];
    let (mut dr, mut dg, mut db) = (vec![0i32; n], vec![0i32; n], vec![0i32; n]);
    let m = identity_coeffs().lrgb2lrgb;

    let mut group = c.benchmark_group("csc_core");
    group.throughput(Throughput::Elements(n as u64));
    group.bench_function("multiply3x3_1080p", |bencher| {
        bencher.iter(|| multiply3x3((&r, &g, &b), (&mut dr, &mut dg, &mut db), &m));
    });
    group.finish();
}

criterion_group!(benches, bench_multiply3x3);
criterion_main!(benches);
