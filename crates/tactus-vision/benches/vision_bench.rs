// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for line reconstruction and image normalization.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use image::{DynamicImage, GrayImage, Luma};

use tactus_core::config::NormalizeConfig;
use tactus_core::types::{BoundingBox, Detection, SymbolId};
use tactus_vision::{ImageNormalizer, LineReconstructor};

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// A dense page: 30 rows of 40 cells, shuffled out of reading order.
fn page_detections() -> Vec<Detection> {
    let mut detections: Vec<Detection> = (0..30)
        .flat_map(|row| {
            (0..40).map(move |col| {
                let jitter = ((row * 7 + col * 13) % 9) as f32;
                Detection::new(
                    SymbolId((row * 40 + col) % 47),
                    BoundingBox::from_origin_size(
                        20.0 + col as f32 * 40.0,
                        20.0 + row as f32 * 140.0 + jitter,
                        30.0,
                        40.0,
                    ),
                    0.9,
                )
            })
        })
        .collect();
    detections.reverse();
    detections.swap(3, 900);
    detections
}

fn bench_reconstruct(c: &mut Criterion) {
    let detections = page_detections();
    let reconstructor = LineReconstructor::default();

    c.bench_function("reconstruct (1200 detections)", |b| {
        b.iter(|| black_box(reconstructor.reconstruct(black_box(&detections))));
    });
}

/// Normalization of a 640x480 page with a dot grid, default and binarized.
fn bench_normalize(c: &mut Criterion) {
    let mut img = GrayImage::from_pixel(640, 480, Luma([200u8]));
    for y in (10..470).step_by(12) {
        for x in (10..630).step_by(9) {
            img.put_pixel(x, y, Luma([40u8]));
            img.put_pixel(x + 1, y, Luma([40u8]));
        }
    }
    let page = DynamicImage::ImageLuma8(img);

    let default = ImageNormalizer::default();
    c.bench_function("normalize (640x480)", |b| {
        b.iter(|| black_box(default.normalize(black_box(&page), "bench")));
    });

    let binarized = ImageNormalizer::new(NormalizeConfig {
        binarize: true,
        ..NormalizeConfig::default()
    });
    c.bench_function("normalize binarized (640x480)", |b| {
        b.iter(|| black_box(binarized.normalize(black_box(&page), "bench")));
    });
}

criterion_group!(benches, bench_reconstruct, bench_normalize);
criterion_main!(benches);
