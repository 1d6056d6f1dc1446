use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use declorder::{
    comment_helper::CodeLanguage, config::ReorganizeConfig, parser::TypeScriptSource, reorganize_source,
    retriever::DeclarationSource,
};

/// A class whose members appear in reverse rank order, repeated `classes` times.
fn generate_source(classes: usize) -> String {
    let mut source = String::new();
    for index in 0..classes {
        source.push_str(&format!(
            r#"export class Service{index} {{
  get size(): number {{
    return this.items.length;
  }}

  // Loads everything.
  load(id: string) {{
    return this.items.find((item) => item === id);
  }}

  private items: string[] = [];
  protected readonly cache = new Map<string, string>();
  static readonly LIMIT = {index};

  constructor(private readonly name: string) {{}}
}}

"#
        ));
    }
    source
}

fn bench_full_pass(c: &mut Criterion) {
    let mut group = c.benchmark_group("reorganize");
    let config = ReorganizeConfig::default();

    for classes in [1, 10, 100] {
        let input = generate_source(classes);
        group.throughput(Throughput::Bytes(input.len() as u64));
        group.bench_with_input(BenchmarkId::new("full_pass", classes), &input, |b, input| {
            b.iter(|| reorganize_source(black_box(input), "bench.ts", &config).unwrap())
        });
    }

    group.finish();
}

fn bench_retrieval_only(c: &mut Criterion) {
    let input = generate_source(10);
    let source = TypeScriptSource::new();

    c.bench_function("retrieve_only", |b| {
        b.iter(|| {
            source
                .retrieve("bench.ts", black_box(&input), CodeLanguage::TypeScript)
                .unwrap()
        })
    });
}

fn bench_already_organized(c: &mut Criterion) {
    let config = ReorganizeConfig::default();
    let organized = reorganize_source(&generate_source(10), "bench.ts", &config).unwrap();

    c.bench_function("already_organized", |b| {
        b.iter(|| reorganize_source(black_box(&organized), "bench.ts", &config).unwrap())
    });
}

criterion_group!(benches, bench_full_pass, bench_retrieval_only, bench_already_organized);
criterion_main!(benches);
