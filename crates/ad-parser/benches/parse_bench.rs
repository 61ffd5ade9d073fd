use std::hint::black_box;

use ad_parser::parse;
use criterion::{Criterion, criterion_group, criterion_main};

const REPEATED: &str = r"o---o---o---o---o  master
    |            \
    |             o'--o'--o'  topic
     \
      o---o---o---o---o  next
";

/// A long first-parent chain with a side branch every ten commits.
fn wide_history(commits: usize) -> String {
    let mut main = String::from("o");
    let mut side = String::from(" ");
    let mut slashes = String::from(" ");
    for i in 1..commits {
        main.push_str("---o");
        if i % 10 == 0 {
            slashes.push_str("   \\");
            side.push_str("    o");
        } else {
            slashes.push_str("    ");
            side.push_str("    ");
        }
    }
    format!("{main} master\n{slashes}\n{side}\n")
}

fn bench_parse(c: &mut Criterion) {
    c.bench_function("parse_repeated_labels", |b| {
        b.iter(|| parse(black_box(REPEATED)));
    });

    let wide = wide_history(500);
    c.bench_function("parse_wide_history_500", |b| {
        b.iter(|| parse(black_box(&wide)));
    });
}

criterion_group!(benches, bench_parse);
criterion_main!(benches);
