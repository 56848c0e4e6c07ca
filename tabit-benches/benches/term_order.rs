use criterion::BenchmarkGroup;
use criterion::BenchmarkId;
use criterion::Criterion;
use criterion::criterion_group;
use criterion::criterion_main;
use std::hint::black_box;

use tabit::lang::Atom;
use tabit::lang::Term;

const SIZES: &[usize] = &[4, 16, 64];

fn bench_atom_interning(criterion: &mut Criterion) {
  let mut group: BenchmarkGroup<'_, _> = criterion.benchmark_group("atom_interning");

  group.bench_function("existing", |bench| {
    let _warm: Atom = Atom::new("bench_existing_atom");

    bench.iter(|| {
      black_box(Atom::new("bench_existing_atom"));
    })
  });

  group.finish();
}

fn bench_term_compare(criterion: &mut Criterion) {
  let mut group: BenchmarkGroup<'_, _> = criterion.benchmark_group("term_compare");

  group.bench_function("int-vs-float", |bench| {
    let lhs: Term = Term::Int(123_456);
    let rhs: Term = Term::Float(123_456.5);

    bench.iter(|| {
      black_box(lhs.cmp(black_box(&rhs)));
    })
  });

  for size in SIZES {
    let id: BenchmarkId = BenchmarkId::new("tuple", size);

    group.bench_with_input(id, size, |bench, &size| {
      let lhs: Term = Term::tuple((0..size as i64).map(Term::Int).collect());
      let rhs: Term = Term::tuple((0..size as i64).map(Term::Int).collect());

      bench.iter(|| {
        black_box(lhs.cmp(black_box(&rhs)));
      })
    });
  }

  group.finish();
}

criterion_group!(benches, bench_atom_interning, bench_term_compare);
criterion_main!(benches);
