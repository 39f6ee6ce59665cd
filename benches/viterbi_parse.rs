use criterion::{black_box, criterion_group, criterion_main, Criterion};

use bracken::Grammar;

const GRAMMAR_SRC: &str = include_str!("./groucho.pcfg");

fn parse(g: &Grammar, input: &[&str]) -> f64 {
  g.parse(input).map(|p| p.prob).unwrap_or(0.0)
}

fn criterion_benchmark(c: &mut Criterion) {
  let grammar = GRAMMAR_SRC.parse::<Grammar>().unwrap();
  let simple_input = "i shot an elephant".split(' ').collect::<Vec<_>>();
  let ambiguous_input = "i shot an elephant in my pajamas"
    .split(' ')
    .collect::<Vec<_>>();

  c.bench_function("parse simple", |b| {
    b.iter(|| parse(black_box(&grammar), black_box(&simple_input)))
  });

  c.bench_function("parse pp attachment", |b| {
    b.iter(|| parse(black_box(&grammar), black_box(&ambiguous_input)))
  });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
