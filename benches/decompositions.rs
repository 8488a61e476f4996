use criterion::{criterion_group, criterion_main, Criterion};
use num_complex::Complex;
use rand::rngs::StdRng;
use rand::SeedableRng;

use densela::fft::{dft_naive, fft_cooley_tukey};
use densela::{DynMatrix, LuDecomposition, QrDecomposition, SvdDecomposition};

fn well_conditioned(n: usize) -> DynMatrix<f64> {
    DynMatrix::from_fn(n, n, |i, j| ((i + 1) * (j + 1)) as f64 + if i == j { 10.0 } else { 0.0 })
}

// ---------------------------------------------------------------------------
// Decompositions
// ---------------------------------------------------------------------------

fn lu(c: &mut Criterion) {
    let mut g = c.benchmark_group("lu");
    for n in [6, 50] {
        let a = well_conditioned(n);
        g.bench_function(format!("decompose_{n}x{n}"), |b| {
            b.iter(|| LuDecomposition::new(std::hint::black_box(&a)))
        });
        let lu = LuDecomposition::new(&a).unwrap();
        g.bench_function(format!("inverse_{n}x{n}"), |b| b.iter(|| lu.inverse()));
    }
    g.finish();
}

fn qr(c: &mut Criterion) {
    let mut g = c.benchmark_group("qr");
    for n in [6, 50] {
        let a = well_conditioned(n);
        g.bench_function(format!("decompose_{n}x{n}"), |b| {
            b.iter(|| QrDecomposition::new(std::hint::black_box(&a)))
        });
    }
    g.finish();
}

fn svd(c: &mut Criterion) {
    let mut g = c.benchmark_group("svd");
    let a = DynMatrix::from_fn(20, 8, |i, j| ((i * 8 + j) % 11) as f64 + 0.5);
    g.bench_function("power_iteration_20x8", |b| {
        let mut rng = StdRng::seed_from_u64(7);
        b.iter(|| SvdDecomposition::new(std::hint::black_box(&a), &mut rng))
    });
    g.finish();
}

// ---------------------------------------------------------------------------
// Transforms
// ---------------------------------------------------------------------------

fn fft(c: &mut Criterion) {
    let mut g = c.benchmark_group("fft_256");
    let x: Vec<Complex<f64>> = (0..256)
        .map(|i| Complex::new((i as f64 * 0.1).sin(), 0.0))
        .collect();
    g.bench_function("naive", |b| b.iter(|| dft_naive(std::hint::black_box(&x))));
    g.bench_function("cooley_tukey_16x16", |b| {
        b.iter(|| fft_cooley_tukey(std::hint::black_box(&x), 16, 16))
    });
    g.finish();
}

criterion_group!(benches, lu, qr, svd, fft);
criterion_main!(benches);
