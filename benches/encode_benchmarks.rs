//! Codec benchmarks
//!
//! Measures the per-query work a session does without any I/O:
//! decoding a `Query`, resolving it against the command table and encoding
//! the result frame.
//!
//! Run with: cargo bench --bench encode_benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use pg_fortune::console::{Banner, CommandTable};
use pg_fortune::protocol::constants::DEFAULT_MAX_MESSAGE_SIZE;
use pg_fortune::protocol::decode::decode_message;
use pg_fortune::responder::{Responder, StaticResponder};
use pg_fortune::session::{
    encode_query_response, encode_startup_response, Session, SessionConfig,
};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

fn query_message(text: &str) -> Vec<u8> {
    let mut msg = vec![b'Q'];
    msg.extend_from_slice(&((text.len() + 5) as i32).to_be_bytes());
    msg.extend_from_slice(text.as_bytes());
    msg.push(0);
    msg
}

fn query_response_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("query_response");

    for size in [8usize, 256, 16 * 1024, 1024 * 1024] {
        let payload = vec![b'x'; size];
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &payload, |b, payload| {
            b.iter(|| black_box(encode_query_response(black_box(payload))))
        });
    }

    group.finish();
}

fn startup_response_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("startup_response");

    let quiet = Banner::empty();
    group.bench_function("empty_banner", |b| {
        b.iter(|| black_box(encode_startup_response(black_box(&quiet))))
    });

    let banner = Banner::default();
    group.bench_function("default_banner", |b| {
        b.iter(|| black_box(encode_startup_response(black_box(&banner))))
    });

    group.finish();
}

fn dispatch_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch");
    let commands = CommandTable::default();

    for text in ["welcome;", "SHOW DOCS;", "select * from fortunes"] {
        let msg = query_message(text);
        group.bench_with_input(BenchmarkId::from_parameter(text), &msg, |b, msg| {
            b.iter(|| {
                let decoded = decode_message(black_box(msg), DEFAULT_MAX_MESSAGE_SIZE);
                let hit = match decoded {
                    Ok(Some((pg_fortune::protocol::FrontendMessage::Query(q), _))) => {
                        commands.lookup(&q).cloned()
                    }
                    _ => None,
                };
                black_box(hit)
            })
        });
    }

    group.finish();
}

fn session_benchmarks(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().expect("tokio runtime");
    let responder: Arc<dyn Responder> = Arc::new(StaticResponder::new("a fortune"));
    let config = Arc::new(SessionConfig {
        banner: Banner::empty(),
        ..Default::default()
    });

    let mut startup = Vec::new();
    startup.extend_from_slice(&196608i32.to_be_bytes());
    startup.extend_from_slice(b"user\0bench\0\0");
    let mut conversation = ((startup.len() + 4) as i32).to_be_bytes().to_vec();
    conversation.extend_from_slice(&startup);
    conversation.extend_from_slice(&query_message("welcome;"));
    conversation.extend_from_slice(&query_message("select 1"));
    conversation.extend_from_slice(&[b'X', 0, 0, 0, 4]);

    c.bench_function("session/startup_two_queries_terminate", |b| {
        b.to_async(&rt).iter(|| {
            let responder = Arc::clone(&responder);
            let config = Arc::clone(&config);
            let conversation = conversation.clone();
            async move {
                let (mut client, server) = tokio::io::duplex(64 * 1024);
                let session = tokio::spawn(Session::new(server, responder, config).run());

                client.write_all(&conversation).await.expect("write");
                let mut reply = Vec::new();
                client.read_to_end(&mut reply).await.expect("read");
                session.await.expect("join").expect("session");
                black_box(reply)
            }
        })
    });
}

criterion_group!(
    benches,
    query_response_benchmarks,
    startup_response_benchmarks,
    dispatch_benchmarks,
    session_benchmarks
);
criterion_main!(benches);
