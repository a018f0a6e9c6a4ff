use chessbot::controller::GameController;
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

fn perft_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("perft_starting_position");
    group
        .significance_level(0.1)
        .sample_size(20)
        .measurement_time(std::time::Duration::from_secs(20));

    for depth in 1..=3 {
        for parallel in [false, true] {
            let name = if parallel { "parallel_depth" } else { "depth" };

            group.bench_with_input(BenchmarkId::new(name, depth), &depth, |b, &depth| {
                b.iter(|| {
                    let mut controller = GameController::new();
                    controller.parallel_perft = parallel;
                    black_box(controller.perft(depth))
                });
            });
        }
    }
    group.finish();
}

fn playout_benchmark(c: &mut Criterion) {
    c.bench_function("playout_100_plies", |b| {
        b.iter(|| {
            let mut controller = GameController::new();
            controller.seed = 1;
            black_box(controller.playout(100))
        });
    });
}

criterion_group!(benches, perft_benchmark, playout_benchmark);
criterion_main!(benches);
