//! Criterion benchmarks measure time of move generation, perft and FEN
//! parsing.

use std::time::Duration;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rankfile::chess::movegen;
use rankfile::chess::position::Position;
use shakmaty::{CastlingMode, Chess, Position as ShakmatyPosition};

const POSITIONS: &[&str] = &[
    "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
    "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
    "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
    "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
    "r4rk1/1pp1qppp/p1np1n2/2b1p1B1/2B1P1b1/P1NP1N2/1PP1QPPP/R4RK1 w - - 0 10",
];

fn generate_moves(positions: &[Position]) {
    for position in positions {
        std::hint::black_box(position.generate_moves());
    }
}

fn movegen_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("Move generation");
    let positions: Vec<Position> = POSITIONS
        .iter()
        .map(|fen| Position::try_from(*fen).unwrap())
        .collect();
    group.throughput(Throughput::Elements(positions.len() as u64));
    group.bench_with_input(
        BenchmarkId::new("movegen_rankfile", format!("{} positions", positions.len())),
        &positions,
        |b, positions| b.iter(|| generate_moves(positions)),
    );
    // shakmaty is the reference point: it is bitboard-based and should be
    // considerably faster.
    let shakmaty_positions: Vec<Chess> = POSITIONS
        .iter()
        .map(|fen| {
            let fen: shakmaty::fen::Fen = fen.parse().unwrap();
            fen.into_position(CastlingMode::Standard).unwrap()
        })
        .collect();
    group.bench_with_input(
        BenchmarkId::new(
            "movegen_shakmaty",
            format!("{} positions", shakmaty_positions.len()),
        ),
        &shakmaty_positions,
        |b, positions| {
            b.iter(|| {
                for position in positions {
                    std::hint::black_box(position.legal_moves());
                }
            });
        },
    );
    group.finish();
}

fn perft_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("Perft");
    for (fen, depth, nodes) in [
        (POSITIONS[0], 3, 8902),
        (POSITIONS[1], 2, 2039),
        (POSITIONS[2], 3, 2812),
    ] {
        let position = Position::try_from(fen).unwrap();
        group.throughput(Throughput::Elements(nodes));
        group.bench_with_input(
            BenchmarkId::new(format!("depth {depth}"), fen),
            &(position, depth),
            |b, (position, depth)| {
                b.iter(|| assert_eq!(movegen::perft(position, *depth), nodes));
            },
        );
    }
    group.finish();
}

fn parsing_bench(c: &mut Criterion) {
    c.bench_function("position parsing", |b| {
        b.iter(|| {
            for fen in POSITIONS {
                std::hint::black_box(Position::try_from(*fen).unwrap());
            }
        });
    });
}

criterion_group! {
    name = movegen;
    config = Criterion::default()
        .sample_size(10)
        .warm_up_time(Duration::from_secs(3))
        .measurement_time(Duration::from_secs(10));
    targets = movegen_bench, perft_bench, parsing_bench
}

criterion_main!(movegen);
