use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::{rngs::StdRng, Rng, SeedableRng};

use blurify_image::Image;
use blurify_imgproc::{
    blur::{blur_into, blur_u8},
    filter::{FilterKind, KernelAnchor},
    options::BlurOptions,
    parallel::ExecutionStrategy,
};

use image::RgbaImage;
use imageproc::filter::gaussian_blur_f32;

fn bench_blur(c: &mut Criterion) {
    let mut group = c.benchmark_group("Blur");
    let mut rng = StdRng::seed_from_u64(0);

    for (width, height) in [(256, 224), (512, 448), (1024, 896)].iter() {
        for kernel_size in [3, 5, 9, 17].iter() {
            group.throughput(criterion::Throughput::Elements(
                (*width * *height * *kernel_size) as u64,
            ));

            let parameter_string = format!("{}x{}x{}", width, height, kernel_size);

            // input image
            let image_size = [*width, *height].into();
            let image_data = (0..width * height * 4).map(|_| rng.random()).collect();
            let image_u16 = Image::<u16, 4>::new(image_size, image_data).unwrap();
            let image_data = (0..width * height * 4).map(|_| rng.random()).collect();
            let image_u8 = Image::<u8, 4>::new(image_size, image_data).unwrap();

            // output image
            let output_u16 = Image::<u16, 4>::from_size_val(image_size, 0).unwrap();

            let gaussian = BlurOptions::new(FilterKind::Gaussian)
                .with_kernel_size(*kernel_size)
                .with_sigma(1.5)
                .with_anchor(KernelAnchor::Center);
            let moving_average =
                BlurOptions::new(FilterKind::MovingAverage).with_kernel_size(*kernel_size);

            group.bench_with_input(
                BenchmarkId::new("gaussian_u16", &parameter_string),
                &(&image_u16, &output_u16),
                |b, i| {
                    let (src, mut dst) = (i.0, i.1.clone());
                    b.iter(|| black_box(blur_into(src, &mut dst, &gaussian)))
                },
            );

            group.bench_with_input(
                BenchmarkId::new("gaussian_u16_serial", &parameter_string),
                &(&image_u16, &output_u16),
                |b, i| {
                    let (src, mut dst) = (i.0, i.1.clone());
                    let opts = gaussian.with_strategy(ExecutionStrategy::Serial);
                    b.iter(|| black_box(blur_into(src, &mut dst, &opts)))
                },
            );

            group.bench_with_input(
                BenchmarkId::new("moving_average_u16", &parameter_string),
                &(&image_u16, &output_u16),
                |b, i| {
                    let (src, mut dst) = (i.0, i.1.clone());
                    b.iter(|| black_box(blur_into(src, &mut dst, &moving_average)))
                },
            );

            group.bench_with_input(
                BenchmarkId::new("gaussian_u8", &parameter_string),
                &image_u8,
                |b, i| b.iter(|| black_box(blur_u8(i, &gaussian))),
            );

            group.bench_with_input(
                BenchmarkId::new("gaussian_imageproc", &parameter_string),
                &image_u8,
                |b, i| {
                    let rgba_image = RgbaImage::from_raw(
                        i.width() as u32,
                        i.height() as u32,
                        i.as_slice().to_vec(),
                    )
                    .unwrap();
                    let sigma = (*kernel_size as f32) / 2.0;
                    b.iter(|| black_box(gaussian_blur_f32(&rgba_image, sigma)))
                },
            );
        }
    }

    group.finish();
}

criterion_group!(benches, bench_blur);
criterion_main!(benches);
