use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use std::io::Cursor;

use boneage_rs::preprocessing::{NormalizerConfig, PreprocessPipeline};
use image::{DynamicImage, Rgb, RgbImage};

fn generate_png(width: u32, height: u32) -> Vec<u8> {
    let mut source = RgbImage::new(width, height);
    for (x, y, pixel) in source.enumerate_pixels_mut() {
        *pixel = Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8]);
    }

    let mut buffer = Vec::new();
    DynamicImage::ImageRgb8(source)
        .write_to(&mut Cursor::new(&mut buffer), image::ImageFormat::Png)
        .unwrap();
    buffer
}

fn benchmark_preprocess_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("preprocess_by_size");

    let sizes = vec![
        (512, 512, "512x512"),
        (1024, 768, "1024x768"),
        (2048, 2048, "2048x2048"),
    ];

    let pipeline = PreprocessPipeline::new(NormalizerConfig::default());

    for (width, height, label) in sizes {
        let png = generate_png(width, height);

        group.bench_with_input(BenchmarkId::from_parameter(label), &png, |b, data| {
            b.iter(|| pipeline.run(black_box(data)).unwrap());
        });
    }

    group.finish();
}

fn benchmark_target_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("preprocess_by_target");

    let png = generate_png(1024, 768);

    for target in [224u32, 384, 512] {
        let config = NormalizerConfig::builder().target_size(target, target).build();
        let pipeline = PreprocessPipeline::new(config);

        group.bench_with_input(BenchmarkId::from_parameter(target), &png, |b, data| {
            b.iter(|| pipeline.run(black_box(data)).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_preprocess_sizes, benchmark_target_sizes);
criterion_main!(benches);
