//! Benchmarks for IRC message parsing and serialization.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use chatter::{LineBuffer, Message};

/// Simple PING message
const SIMPLE_MESSAGE: &str = "PING :irc.example.com";

/// Message with prefix
const PREFIX_MESSAGE: &str = ":nick!user@host PRIVMSG #channel :Hello, world!";

/// Numeric response
const NUMERIC_RESPONSE: &str =
    ":irc.server.net 001 nickname :Welcome to the IRC Network nickname!user@host";

/// Longer message with many middle parameters
const MANY_PARAMS: &str =
    ":irc.server.net 353 nickname = #long-channel-name :alice bob carol dave erin frank grace";

fn benchmark_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("Message Parsing");

    group.bench_function("simple_ping", |b| {
        b.iter(|| {
            let msg = Message::parse(black_box(SIMPLE_MESSAGE)).unwrap();
            black_box(msg)
        })
    });

    group.bench_function("with_prefix", |b| {
        b.iter(|| {
            let msg = Message::parse(black_box(PREFIX_MESSAGE)).unwrap();
            black_box(msg)
        })
    });

    group.bench_function("numeric_response", |b| {
        b.iter(|| {
            let msg = Message::parse(black_box(NUMERIC_RESPONSE)).unwrap();
            black_box(msg)
        })
    });

    group.bench_function("many_params", |b| {
        b.iter(|| {
            let msg = Message::parse(black_box(MANY_PARAMS)).unwrap();
            black_box(msg)
        })
    });

    group.finish();
}

fn benchmark_serialization(c: &mut Criterion) {
    let mut group = c.benchmark_group("Message Serialization");

    let simple = Message::parse(SIMPLE_MESSAGE).unwrap();
    let with_prefix = Message::parse(PREFIX_MESSAGE).unwrap();
    let numeric = Message::parse(NUMERIC_RESPONSE).unwrap();

    group.bench_function("simple_ping", |b| {
        b.iter(|| {
            let s = black_box(&simple).to_string();
            black_box(s)
        })
    });

    group.bench_function("with_prefix", |b| {
        b.iter(|| {
            let s = black_box(&with_prefix).to_string();
            black_box(s)
        })
    });

    group.bench_function("numeric_response", |b| {
        b.iter(|| {
            let s = black_box(&numeric).to_string();
            black_box(s)
        })
    });

    group.finish();
}

fn benchmark_framing(c: &mut Criterion) {
    let mut group = c.benchmark_group("Line Framing");

    let mut burst = Vec::new();
    for i in 0..50 {
        burst.extend_from_slice(
            format!(":nick{i}!user@host PRIVMSG #channel :message number {i}\r\n").as_bytes(),
        );
    }

    group.bench_function("fifty_line_burst", |b| {
        b.iter(|| {
            let mut buf = LineBuffer::new();
            buf.feed(black_box(&burst));
            let mut n = 0usize;
            while let Some(line) = buf.next_line() {
                n += line.len();
            }
            black_box(n)
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_parsing,
    benchmark_serialization,
    benchmark_framing
);
criterion_main!(benches);
