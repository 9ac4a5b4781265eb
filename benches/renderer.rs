use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use funnel_rs_renderer::config::LayoutConfig;
use funnel_rs_renderer::ir::{Entry, Funnel, Phase};
use funnel_rs_renderer::layout::{compute_layout, generate_slots};
use funnel_rs_renderer::parser::parse_funnel;
use funnel_rs_renderer::render::{RenderOptions, render_funnel_svg};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::hint::black_box;

fn wide_funnel(phases: usize, entries_per_phase: usize) -> Funnel {
    Funnel::new(
        (0..phases)
            .map(|p| {
                let entries = (0..entries_per_phase)
                    .map(|e| {
                        let entry = Entry::new(format!("Entry {p}.{e}"), format!("https://example.com/{p}/{e}"));
                        if e % 3 == 0 {
                            entry.with_font_size(12.0 + (e % 5) as f32 * 4.0)
                        } else {
                            entry
                        }
                    })
                    .collect();
                Phase::new(format!("Phase {p}")).with_entries(entries)
            })
            .collect(),
    )
}

fn bench_parse(c: &mut Criterion) {
    let source = include_str!(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/benches/fixtures/marketing.funnel"
    ));
    c.bench_function("parse_marketing", |b| {
        b.iter(|| {
            let funnel = parse_funnel(black_box(source)).expect("parse failed");
            black_box(funnel.len());
        });
    });
}

fn bench_slots(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_slots");
    for n in [7usize, 100, 1000] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, n| {
            b.iter(|| black_box(generate_slots(black_box(*n)).len()));
        });
    }
    group.finish();
}

fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout");
    let config = LayoutConfig::default();
    for (phases, entries) in [(3usize, 10usize), (10, 50), (40, 200)] {
        let funnel = wide_funnel(phases, entries);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{phases}x{entries}")),
            &funnel,
            |b, funnel| {
                let mut rng = ChaCha8Rng::seed_from_u64(7);
                b.iter(|| {
                    let layout = compute_layout(black_box(funnel), 1200.0, 800.0, &config, &mut rng);
                    black_box(layout.phases.len());
                });
            },
        );
    }
    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_svg");
    let options = RenderOptions::modern().with_seed(7);
    for (phases, entries) in [(3usize, 10usize), (10, 50)] {
        let funnel = wide_funnel(phases, entries);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{phases}x{entries}")),
            &funnel,
            |b, funnel| {
                b.iter(|| {
                    let rendered =
                        render_funnel_svg("funnel", 1200.0, 800.0, black_box(funnel), &options);
                    black_box(rendered.svg.len());
                });
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_parse, bench_slots, bench_layout, bench_render);
criterion_main!(benches);
