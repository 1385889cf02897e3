#![no_main]
use itertools::Itertools;
use libfuzzer_sys::fuzz_target;
use pretty_assertions::assert_eq;
use rankfile::chess::position::Position;
use shakmaty::{CastlingMode, Chess};

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(position) = Position::from_fen(input) else {
        return;
    };
    let Ok(setup) = input.trim().parse::<shakmaty::fen::Fen>() else {
        return;
    };
    let Ok(reference) = setup.into_position::<Chess>(CastlingMode::Standard) else {
        return;
    };
    assert_eq!(
        position
            .generate_moves()
            .iter()
            .map(ToString::to_string)
            .sorted()
            .collect::<Vec<_>>(),
        shakmaty::Position::legal_moves(&reference)
            .iter()
            .map(|m| m.to_uci(CastlingMode::Standard).to_string())
            .sorted()
            .collect::<Vec<_>>()
    );
});
