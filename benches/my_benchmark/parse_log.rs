use criterion::{black_box, Criterion};
use depth_gas_scaling::analysis::{collect_samples, order_by_depth, DuplicatePolicy};
use depth_gas_scaling::config::FieldNames;
use depth_gas_scaling::parsing::{parse_record, SampleScanner};
use std::io::Cursor;

/// Builds a log shaped like the depth benchmark's output: a banner and a few
/// progress lines around every JSON record.
fn make_log(records: usize) -> String {
    let mut log = String::new();
    for index in 0..records {
        let depth = (index % 1000) + 1;
        log.push_str(&format!("\n========== DEPTH = {} orders ==========\n", depth));
        log.push_str(&format!("addPair (depth={}) gasUsed = 250000\n", depth));
        log.push_str(&format!(
            "placeLimit BUY (market-like) at depth={} gasUsed = {}\n",
            depth,
            200_000 + depth * 37
        ));
        log.push_str(&format!(
            "{{\"depth\":{},\"gas_placeLimitBuy_market_like\":\"{}\"}}\n",
            depth,
            200_000 + depth * 37
        ));
    }
    log
}

pub fn bench_parse_record(c: &mut Criterion) {
    let fields = FieldNames::default();
    let record = r#"{"depth":500,"gas_placeLimitBuy_market_like":"218500"}"#;
    let prose = "placeLimit BUY (market-like) at depth=500 gasUsed = 218500";

    c.bench_function("parse_record_json", |b| {
        b.iter(|| parse_record(black_box(record), &fields))
    });
    c.bench_function("parse_record_prose", |b| {
        b.iter(|| parse_record(black_box(prose), &fields))
    });
}

pub fn bench_scan_and_order(c: &mut Criterion) {
    let fields = FieldNames::default();
    let record_counts = [1000, 10000];

    for &count in &record_counts {
        let log = make_log(count);

        let id = &format!("scan_and_order_{}", count);
        c.bench_function(id, |b| {
            b.iter(|| {
                let scanner = SampleScanner::new(Cursor::new(black_box(log.as_bytes())), &fields);
                let samples = collect_samples(scanner, DuplicatePolicy::Keep).unwrap();
                order_by_depth(&samples)
            })
        });

        println!("[{}] Log size: {} bytes", id, log.len());
    }
}
