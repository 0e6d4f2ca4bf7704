use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use depth_view_rs::view_pipeline::{
    DepthImage, ViewConfig, ViewLoader, generate_prefixes, image::pfm, texture_rating,
};
use std::hint::black_box;

fn generate_mock_depth(width: usize, height: usize) -> DepthImage {
    let data = (0..width * height)
        .map(|i| if i % 7 == 0 { f32::INFINITY } else { (i % 256) as f32 })
        .collect();
    DepthImage::from_vec(width, height, 1, data).unwrap()
}

fn benchmark_prefixes(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_prefixes");

    let paths = vec![
        ("/data/mb/Adirondack/disp0.pfm", "benchmark"),
        ("/data/scene_left_disp_filtered_0001.tif", "tokens"),
        ("/data/scene_left_disp.tif:12", "tiled"),
    ];

    for (path, label) in paths {
        group.bench_with_input(BenchmarkId::from_parameter(label), path, |b, path| {
            b.iter(|| generate_prefixes(black_box(path), Some("/params:/calib/cam")));
        });
    }

    group.finish();
}

fn benchmark_rating(c: &mut Criterion) {
    let names = [
        "_0001.png",
        "_left_image.png",
        "_Right_RGB.tif",
        "_intensity_color.pgm",
    ];

    c.bench_function("texture_rating", |b| {
        b.iter(|| {
            names
                .iter()
                .map(|n| texture_rating(black_box(n)))
                .sum::<u32>()
        });
    });
}

fn benchmark_depth_downscale(c: &mut Criterion) {
    let mut group = c.benchmark_group("depth_downscale");
    let depth = generate_mock_depth(1000, 750);

    for ds in [2, 4] {
        group.bench_with_input(BenchmarkId::from_parameter(ds), &ds, |b, &ds| {
            b.iter(|| black_box(&depth).downscale_average(ds));
        });
    }

    group.finish();
}

fn benchmark_load_view(c: &mut Criterion) {
    let dir = tempfile::tempdir().unwrap();
    let disp = dir.path().join("scene_disp.pfm");
    pfm::write_pfm(&disp, &generate_mock_depth(500, 500)).unwrap();
    std::fs::write(
        dir.path().join("scene.txt"),
        "camera.A=[500 0 250; 0 500 250; 0 0 1]\ndisp.scale=0.5\n",
    )
    .unwrap();

    let spec = disp.to_string_lossy().into_owned();
    let loader = ViewLoader::new(ViewConfig::default());

    let mut group = c.benchmark_group("load_view");

    group.bench_function("full", |b| {
        b.iter(|| loader.load_view(black_box(&spec)).unwrap());
    });

    group.bench_function("downscaled", |b| {
        let spec = format!("{},ds=2", spec);
        b.iter(|| loader.load_view(black_box(&spec)).unwrap());
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_prefixes,
    benchmark_rating,
    benchmark_depth_downscale,
    benchmark_load_view
);
criterion_main!(benches);
