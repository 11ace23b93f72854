//! Buffered stream benchmarks: write policies and line reads.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use frankenio_bench::{CountingSink, line_corpus};
use frankenio_core::{BufMode, BufferedReader, BufferedWriter, ReadableStream, WritableStream};

const LINES: usize = 1000;

fn bench_write_modes(c: &mut Criterion) {
    let widths: &[usize] = &[16, 128, 1024];
    let mut group = c.benchmark_group("buffered_write");

    for &width in widths {
        let corpus = line_corpus(LINES, width);
        group.throughput(Throughput::Bytes(corpus.len() as u64));

        for mode in [BufMode::Full, BufMode::Line, BufMode::None] {
            group.bench_with_input(BenchmarkId::new(mode.as_str(), width), &width, |b, &w| {
                b.iter(|| {
                    let mut writer = BufferedWriter::new(CountingSink::default(), mode);
                    for line in corpus.chunks(w) {
                        writer.write(line).unwrap();
                    }
                    writer.flush().unwrap();
                    black_box(writer.get_ref().writes);
                });
            });
        }
    }
    group.finish();
}

fn bench_write_byte(c: &mut Criterion) {
    let corpus = line_corpus(LINES, 64);
    let mut group = c.benchmark_group("write_byte");
    group.throughput(Throughput::Bytes(corpus.len() as u64));

    for mode in [BufMode::Full, BufMode::Line] {
        group.bench_function(mode.as_str(), |b| {
            b.iter(|| {
                let mut writer = BufferedWriter::new(CountingSink::default(), mode);
                for &byte in &corpus {
                    writer.write_byte(byte).unwrap();
                }
                writer.flush().unwrap();
                black_box(writer.get_ref().bytes);
            });
        });
    }
    group.finish();
}

fn bench_read_line(c: &mut Criterion) {
    let capacities: &[usize] = &[16, 512, 8192];
    let corpus = line_corpus(LINES, 80);
    let mut group = c.benchmark_group("read_line");
    group.throughput(Throughput::Bytes(corpus.len() as u64));

    for &capacity in capacities {
        group.bench_with_input(BenchmarkId::new("buffered", capacity), &capacity, |b, &cap| {
            b.iter(|| {
                let mut reader = BufferedReader::with_capacity(cap, corpus.as_slice());
                let mut lines = 0usize;
                while !reader.read_line().unwrap().is_empty() {
                    lines += 1;
                }
                black_box(lines);
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_write_modes, bench_write_byte, bench_read_line);
criterion_main!(benches);
