//! Benchmarks for chroma_convert conversions.

use chroma_convert::color::{Hsl, Rgb, parse_hex_strict, parse_hsl_strict};
use chroma_convert::convert::{
    hex_to_rgb, hsl_to_rgb, normalize_hex, parse_loose_hsl, parse_loose_rgb, rgb_to_hex,
    rgb_to_hsl,
};
use chroma_convert::css::{render_hsl, render_rgb};
use chroma_convert::form::{ConverterForm, Field};
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

fn benchmark_hex(c: &mut Criterion) {
    c.bench_function("normalize_hex_short", |b| {
        b.iter(|| black_box(normalize_hex(black_box("#f80"))));
    });

    c.bench_function("hex_to_rgb", |b| {
        b.iter(|| black_box(hex_to_rgb(black_box("#ff8800"))));
    });

    let rgb = Rgb::new(255.0, 136.0, 0.0);
    c.bench_function("rgb_to_hex", |b| {
        b.iter(|| black_box(rgb_to_hex(black_box(rgb))));
    });

    c.bench_function("parse_hex_strict", |b| {
        b.iter(|| black_box(parse_hex_strict(black_box("#ff8800"))));
    });
}

fn benchmark_hsl(c: &mut Criterion) {
    let rgb = Rgb::new(170.0, 187.0, 204.0);
    c.bench_function("rgb_to_hsl", |b| {
        b.iter(|| black_box(rgb_to_hsl(black_box(rgb))));
    });

    let hsl = Hsl::new(210.0, 25.0, 73.3);
    c.bench_function("hsl_to_rgb", |b| {
        b.iter(|| black_box(hsl_to_rgb(black_box(hsl))));
    });

    c.bench_function("hsl_round_trip_all_grays", |b| {
        b.iter(|| {
            for v in 0..=255u8 {
                black_box(hsl_to_rgb(rgb_to_hsl(Rgb::from((v, v, v)))));
            }
        });
    });
}

fn benchmark_text(c: &mut Criterion) {
    c.bench_function("parse_loose_rgb", |b| {
        b.iter(|| black_box(parse_loose_rgb(black_box("rgb(12, 34, 56)"))));
    });

    c.bench_function("parse_loose_hsl", |b| {
        b.iter(|| black_box(parse_loose_hsl(black_box("hsl(200deg, 50.5%, 10.2%)"))));
    });

    c.bench_function("parse_hsl_strict", |b| {
        b.iter(|| black_box(parse_hsl_strict(black_box("hsl(200deg, 50.5%, 10.2%)"))));
    });

    let hsl = Hsl::new(200.0, 50.5, 10.2);
    c.bench_function("render_hsl", |b| {
        b.iter(|| black_box(render_hsl(black_box(hsl))));
    });

    let rgb = Rgb::new(12.0, 34.0, 56.0);
    c.bench_function("render_rgb", |b| {
        b.iter(|| black_box(render_rgb(black_box(rgb))));
    });
}

fn benchmark_form(c: &mut Criterion) {
    c.bench_function("form_convert_hex", |b| {
        b.iter(|| {
            let mut form = ConverterForm::new();
            form.focus(Field::Hex);
            form.input(Field::Hex, "#f80", None);
            black_box(form.convert())
        });
    });
}

criterion_group!(
    benches,
    benchmark_hex,
    benchmark_hsl,
    benchmark_text,
    benchmark_form
);
criterion_main!(benches);
