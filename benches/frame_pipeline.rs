use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ser_player_rs::frame_pipeline::{
    convert_for_display, demosaic, ChannelOrder, ColourLayout, FrameBuffer, HistogramTables, Samples,
};

fn generate_mosaic(width: usize, height: usize) -> FrameBuffer {
    let mut data = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            data.push((((x + y) % 256) as u16) << 8);
        }
    }
    FrameBuffer::new(width, height, 1, ChannelOrder::Rgb, Samples::Sixteen(data)).unwrap()
}

fn benchmark_demosaic_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("demosaic_by_size");

    let sizes = vec![
        (640, 480, "640x480"),
        (1280, 960, "1280x960"),
        (1920, 1080, "1920x1080"),
    ];

    for (width, height, label) in sizes {
        let frame = generate_mosaic(width, height);

        group.bench_with_input(BenchmarkId::from_parameter(label), &frame, |b, frame| {
            b.iter(|| {
                let copy = frame.try_clone().unwrap();
                demosaic(black_box(copy), ColourLayout::BayerRggb).unwrap()
            });
        });
    }

    group.finish();
}

fn benchmark_display_conversion(c: &mut Criterion) {
    let mut group = c.benchmark_group("display_conversion");
    let mosaic = generate_mosaic(1280, 960);
    let colour = demosaic(mosaic.try_clone().unwrap(), ColourLayout::BayerRggb)
        .unwrap()
        .into_frame();

    group.bench_function("mono", |b| {
        b.iter(|| convert_for_display(black_box(mosaic.try_clone().unwrap())).unwrap());
    });

    group.bench_function("bgr", |b| {
        b.iter(|| convert_for_display(black_box(colour.try_clone().unwrap())).unwrap());
    });

    group.finish();
}

fn benchmark_histogram_count(c: &mut Criterion) {
    let mut group = c.benchmark_group("histogram_count");
    let colour = demosaic(generate_mosaic(1280, 960), ColourLayout::BayerRggb)
        .unwrap()
        .into_frame();

    group.bench_function("colour_1280x960", |b| {
        b.iter(|| HistogramTables::count(black_box(&colour)));
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_demosaic_sizes,
    benchmark_display_conversion,
    benchmark_histogram_count
);
criterion_main!(benches);
