use std::sync::Arc;

use bytes::Bytes;
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use serde_json::json;
use transcodec::{EncodingOptions, Transcoder, Value};

fn gen_data(size: usize, seed: u64) -> Vec<u8> {
    let mut s = seed;
    let mut out = Vec::with_capacity(size);
    for _ in 0..size {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        out.push((s >> 33) as u8);
    }
    out
}

fn bench_cached_resolution(c: &mut Criterion) {
    let mut g = c.benchmark_group("cached_resolution");
    let transcoder = Transcoder::new(["view"]).unwrap();
    let options = Arc::new(EncodingOptions::new().encode(Ok).decode(Ok).format("view"));

    for name in ["view", "json", "json+view", "binary"] {
        transcoder.encoding(name).unwrap();
        g.bench_with_input(BenchmarkId::new("name", name), &name, |b, name| {
            b.iter(|| black_box(transcoder.encoding(*black_box(name)).unwrap()));
        });
    }

    transcoder.encoding(&options).unwrap();
    g.bench_function("options", |b| {
        b.iter(|| black_box(transcoder.encoding(black_box(&options)).unwrap()));
    });
    g.finish();
}

fn bench_first_resolution(c: &mut Criterion) {
    let mut g = c.benchmark_group("first_resolution");
    for format in ["utf8", "buffer", "view"] {
        g.bench_with_input(BenchmarkId::from_parameter(format), &format, |b, format| {
            b.iter(|| {
                let transcoder = Transcoder::new([*format]).unwrap();
                black_box(transcoder.encoding("json").unwrap());
            });
        });
    }
    g.finish();
}

fn bench_byte_transcoding(c: &mut Criterion) {
    let mut g = c.benchmark_group("byte_transcoding");
    let as_buffer = Transcoder::new(["buffer"]).unwrap().encoding("view").unwrap();
    for size in [1024usize, 64 * 1024, 1024 * 1024] {
        let data = Bytes::from(gen_data(size, size as u64));
        g.throughput(Throughput::Bytes(size as u64));
        g.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| {
                let stored = as_buffer.encode(Value::View(data.clone())).unwrap();
                black_box(as_buffer.decode(stored).unwrap());
            });
        });
    }
    g.finish();
}

fn bench_hex_transcoding(c: &mut Criterion) {
    if !cfg!(feature = "hex") {
        return;
    }
    let mut g = c.benchmark_group("hex_transcoding");
    for format in ["buffer", "view"] {
        let encoding = Transcoder::new([format]).unwrap().encoding("hex").unwrap();
        let data = Bytes::from(gen_data(64 * 1024, 7));
        let text = encoding.decode(Value::Buffer(data)).unwrap();
        g.throughput(Throughput::Bytes(64 * 1024));
        g.bench_function(format, |b| {
            b.iter(|| {
                let stored = encoding.encode(black_box(text.clone())).unwrap();
                black_box(encoding.decode(stored).unwrap());
            });
        });
    }
    g.finish();
}

fn bench_json_transcoding(c: &mut Criterion) {
    let mut g = c.benchmark_group("json_transcoding");
    let doc = Value::Json(json!({
        "id": 42,
        "tags": ["a", "b", "c"],
        "nested": { "flag": true, "ratio": 0.5, "name": "6\u{1F404}" },
    }));
    for format in ["utf8", "buffer", "view"] {
        let encoding = Transcoder::new([format]).unwrap().encoding("json").unwrap();
        g.bench_function(format, |b| {
            b.iter(|| {
                let stored = encoding.encode(black_box(doc.clone())).unwrap();
                black_box(encoding.decode(stored).unwrap());
            });
        });
    }
    g.finish();
}

criterion_group!(
    benches,
    bench_cached_resolution,
    bench_first_resolution,
    bench_byte_transcoding,
    bench_hex_transcoding,
    bench_json_transcoding
);
criterion_main!(benches);
