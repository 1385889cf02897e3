#![no_main]
use libfuzzer_sys::fuzz_target;
use rankfile::notation::pgn;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(games) = pgn::parse_games(input) else {
        return;
    };
    for game in &games {
        if let Ok(positions) = game.replay() {
            assert_eq!(positions.len(), game.moves.len() + 1);
        }
    }
});
