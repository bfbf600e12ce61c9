use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pdf_alphas::{AnalyticSolver, OdeSolver, QcdParams};

fn bench_alpha_s(c: &mut Criterion) {
    let mut params = QcdParams::default();
    params.set_lambda(4, 0.326).expect("lambda4");
    params.set_lambda(5, 0.226).expect("lambda5");
    let analytic = AnalyticSolver::new(params.clone());
    let ode = OdeSolver::new(params);
    ode.warm().expect("anchor table");

    c.bench_function("alpha_s_analytic", |b| {
        b.iter(|| analytic.alpha_s_q2(black_box(1234.5)).expect("alpha_s"))
    });
    c.bench_function("alpha_s_ode_cached", |b| {
        b.iter(|| ode.alpha_s_q2(black_box(1234.5)).expect("alpha_s"))
    });
    c.bench_function("alpha_s_ode_solve", |b| {
        b.iter(|| {
            let mut fresh = ode.clone();
            fresh.invalidate();
            fresh.warm().expect("anchor table")
        })
    });
}

criterion_group!(benches, bench_alpha_s);
criterion_main!(benches);
