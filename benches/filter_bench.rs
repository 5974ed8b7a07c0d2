use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use fediscope::export::export_display_rows;
use fediscope::filter::{DenyList, filter_and_dedup};
use fediscope::model::PersonRecord;
use std::hint::black_box;

fn sample_records(count: usize) -> Vec<PersonRecord> {
    (0..count)
        .map(|idx| {
            let record = PersonRecord::new(format!("http://www.wikidata.org/entity/Q{idx}"))
                .with_label(format!("Person {idx}"))
                .with_handle(format!("user{}@host{}.social", idx / 3, idx % 7));
            if idx % 2 == 0 {
                record.with_picture(format!(
                    "http://commons.wikimedia.org/wiki/Special:FilePath/Person_{idx}.jpg"
                ))
            } else {
                record
            }
        })
        .collect()
}

fn filter_benchmark(c: &mut Criterion) {
    let deny: DenyList = (0..50)
        .map(|idx| format!("https://www.wikidata.org/entity/Q{}", idx * 11))
        .collect();

    let mut group = c.benchmark_group("filter_and_dedup");
    for size in [100_usize, 1_000, 10_000] {
        let records = sample_records(size);

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &records, |b, records| {
            b.iter(|| {
                let outcome = filter_and_dedup(records, &deny, 250);
                black_box(export_display_rows(&outcome.rows).len());
            });
        });
    }

    group.finish();
}

criterion_group!(benches, filter_benchmark);
criterion_main!(benches);
