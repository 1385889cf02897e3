#![no_main]
use libfuzzer_sys::fuzz_target;
use pretty_assertions::assert_eq;
use rankfile::chess::position::Position;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(position) = Position::try_from(input) else {
        return;
    };
    // Anything the parser accepts is printed back as a FEN it accepts again.
    let serialized = position.to_string();
    let reparsed = Position::from_fen(&serialized).expect("serialized FEN should parse");
    assert_eq!(reparsed, position);
    assert_eq!(reparsed.to_string(), serialized);
});
