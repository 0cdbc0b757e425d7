//! Benchmarks for spectrum synthesis, the host FFT mirror and GPU frames.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ocean_fft::gpu::compute::RadixPlan;
use ocean_fft::gpu::GpuContext;
use ocean_fft::spectrum::build_initial_spectrum;
use ocean_fft::{OceanSimulator, SpectrumConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn bench_initial_spectrum(c: &mut Criterion) {
    let mut group = c.benchmark_group("Initial Spectrum");
    let config = SpectrumConfig::default();

    group.throughput(Throughput::Elements(
        (config.input_width() * config.input_height()) as u64,
    ));
    group.bench_function("build_512", |b| {
        b.iter(|| {
            let mut rng = StdRng::seed_from_u64(42);
            black_box(build_initial_spectrum(&config, &mut rng));
        });
    });

    group.finish();
}

fn bench_host_fft(c: &mut Criterion) {
    let mut group = c.benchmark_group("Host Radix FFT");
    group.sample_size(10);

    for slices in [1u32, 3] {
        let plan = RadixPlan::new(slices).unwrap();
        let input: Vec<[f32; 2]> = (0..plan.element_count())
            .map(|i| [(i % 7) as f32, (i % 3) as f32])
            .collect();

        group.throughput(Throughput::Elements(plan.element_count() as u64));
        group.bench_with_input(BenchmarkId::new("execute_on_host", slices), &plan, |b, plan| {
            b.iter(|| {
                let mut data = input.clone();
                plan.execute_on_host(&mut data);
                black_box(data);
            });
        });
    }

    group.finish();
}

fn bench_gpu_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("GPU Ocean Frame");

    let ctx = match GpuContext::new_blocking() {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("Skipping GPU benchmarks: {}", e);
            return;
        }
    };

    let mut ocean = match OceanSimulator::from_context(&ctx, SpectrumConfig::default(), 42) {
        Ok(ocean) => ocean,
        Err(e) => {
            eprintln!("Skipping GPU benchmarks: {}", e);
            return;
        }
    };
    ocean.create_output_targets();

    let mut time = 0.0f32;
    group.bench_function("tick_and_wait", |b| {
        b.iter(|| {
            time += 1.0 / 60.0;
            black_box(ocean.tick(time));
            let _ = ctx.device.poll(wgpu::PollType::wait_indefinitely());
        });
    });

    group.finish();
}

criterion_group!(benches, bench_initial_spectrum, bench_host_fft, bench_gpu_frame);
criterion_main!(benches);
