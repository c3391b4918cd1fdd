// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use std::time::Duration;
use tribune_model::model::{SeatingModel, SeatingModelBuilder};
use tribune_seating::{block::BlockEncoder, encoder::SeatingEncoder, naive::NaiveEncoder};
use tribune_solver::solver::{SeatingSolver, Strategy};

/// A hall with one row per organization and a staggered attendance pattern.
fn build_model(num_organizations: usize, members: usize, num_sessions: usize) -> SeatingModel {
    let sessions: Vec<String> = (0..num_sessions).map(|s| format!("s{s}")).collect();
    let mut builder = SeatingModelBuilder::new(sessions);
    for row in 0..num_organizations {
        builder.add_row(format!("R{row}"), members + 2);
    }
    for organization in 0..num_organizations {
        let name = format!("O{organization}");
        builder.add_organization(name.clone());
        for member in 0..members {
            let attendance: Vec<bool> = (0..num_sessions)
                .map(|session| session == 0 || (member + session) % 3 != 0)
                .collect();
            builder.add_delegate(name.clone(), format!("m{member}"), attendance);
        }
    }
    builder.build().expect("benchmark model is valid")
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");
    for &(organizations, members) in &[(5, 4), (10, 8), (20, 16)] {
        let model = build_model(organizations, members, 4);
        let label = format!("{}x{}", organizations, members);
        group.throughput(Throughput::Elements(model.num_attendances() as u64));
        for encoder in [&NaiveEncoder as &dyn SeatingEncoder, &BlockEncoder] {
            group.bench_with_input(BenchmarkId::new(encoder.name(), &label), &model, |b, model| {
                b.iter(|| {
                    encoder
                        .encode(black_box(model))
                        .expect("encoding succeeds")
                })
            });
        }
    }
    group.finish();
}

fn bench_solve(c: &mut Criterion) {
    let mut group = c.benchmark_group("solve");
    group.sample_size(10);
    for &(organizations, members) in &[(4, 3), (8, 5)] {
        let model = build_model(organizations, members, 3);
        let label = format!("{}x{}", organizations, members);
        for strategy in [Strategy::Naive, Strategy::Block] {
            let solver = SeatingSolver::builder()
                .with_strategy(strategy)
                .with_time_limit(Duration::from_secs(10))
                .build();
            group.bench_with_input(
                BenchmarkId::new(strategy.to_string(), &label),
                &model,
                |b, model| {
                    b.iter(|| {
                        let report = solver.solve(black_box(model)).expect("solve succeeds");
                        if !report.outcome().is_solved() {
                            panic!("benchmark model must be seatable, got {}", report.outcome());
                        }
                    })
                },
            );
        }
    }
    group.finish();
}

criterion_group!(benches, bench_encode, bench_solve);
criterion_main!(benches);
