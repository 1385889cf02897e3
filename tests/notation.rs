use pretty_assertions::assert_eq;
use rankfile::chess::core::{CastlingSide, PieceKind, Promotion, Square};
use rankfile::chess::position::Position;
use rankfile::notation::pgn::{self, GameResult};
use rankfile::notation::san::{San, SanKind};

const OPERA_GAME: &str = r#"[Event "A Night at the Opera"]
[Site "Paris FRA"]
[Date "1858.??.??"]
[White "Paul Morphy"]
[Black "Duke Karl / Count Isouard"]
[Result "1-0"]

1. e4 e5 2. Nf3 d6 3. d4 Bg4 {This is a weak move already.} 4. dxe5 Bxf3
5. Qxf3 dxe5 6. Bc4 Nf6 7. Qb3 Qe7 8. Nc3 c6 9. Bg5 b5 10. Nxb5 cxb5
11. Bxb5+ Nbd7 12. O-O-O Rd8 13. Rxd7 Rxd7 14. Rd1 Qe6 15. Bxd7+ Nxd7
16. Qb8+ Nxb8 17. Rd8# 1-0
"#;

#[test]
fn opera_game() {
    let games = pgn::parse_games(OPERA_GAME).unwrap();
    assert_eq!(games.len(), 1);
    let game = &games[0];
    assert_eq!(game.tag("White"), Some("Paul Morphy"));
    assert_eq!(game.tag("Result"), Some("1-0"));
    assert_eq!(game.tag("ECO"), None);
    assert_eq!(game.result, Some(GameResult::WhiteWins));
    assert_eq!(game.moves.len(), 33);

    let positions = game.replay().unwrap();
    assert_eq!(positions.len(), 34);
    let last = positions.last().unwrap();
    assert_eq!(
        last.to_string(),
        "1n1Rkb1r/p4ppp/4q3/4p1B1/4P3/8/PPP2PPP/2K5 b k - 1 17"
    );
    assert!(last.analyze().is_checkmate());
}

#[test]
fn generated_san_matches_transcript() {
    let game = pgn::parse_games(OPERA_GAME).unwrap().remove(0);
    let positions = game.replay().unwrap();
    for (position, san) in positions.iter().zip(&game.moves) {
        let action = san.resolve(&position.analyze()).unwrap();
        assert_eq!(San::from_move(position, &action), *san, "{position}");
    }
}

#[test]
fn san_fields() {
    assert_eq!(
        San::try_from("exd6 e.p.").unwrap().kind,
        SanKind::Piece {
            piece: PieceKind::Pawn,
            from_file: Some(rankfile::chess::core::File::E),
            from_rank: None,
            capture: true,
            to: Square::D6,
            promotion: None,
            en_passant: true,
        }
    );
    assert_eq!(
        San::try_from("O-O-O+").unwrap(),
        San {
            kind: SanKind::Castle(CastlingSide::Long),
            check: true,
            checkmate: false,
        }
    );
    let promotion = San::try_from("b8=N#").unwrap();
    assert!(promotion.checkmate);
    assert!(matches!(
        promotion.kind,
        SanKind::Piece {
            promotion: Some(Promotion::Knight),
            ..
        }
    ));
}

#[test]
fn san_round_trip() {
    for input in [
        "e4",
        "Nf3",
        "exd5",
        "Raxd1",
        "N5f3",
        "Qh4xe1",
        "e8=Q",
        "fxg1=N+",
        "O-O",
        "O-O-O#",
        "Ba1xh8=Q+# e.p.",
    ] {
        assert_eq!(San::try_from(input).unwrap().to_string(), input);
    }
}

#[test]
fn illegal_and_ambiguous_san() {
    let position = Position::try_from("4k3/8/8/8/8/8/8/R4RK1 w - - 0 1").unwrap();
    let analysis = position.analyze();
    assert_eq!(
        San::try_from("Rd1")
            .unwrap()
            .resolve(&analysis)
            .unwrap_err()
            .to_string(),
        "ambiguous move Rd1"
    );
    assert_eq!(
        San::try_from("Rad1").unwrap().resolve(&analysis).unwrap().to_string(),
        "a1d1"
    );
    assert_eq!(
        San::try_from("Nf3")
            .unwrap()
            .resolve(&analysis)
            .unwrap_err()
            .to_string(),
        "illegal move Nf3"
    );
    assert!(San::try_from("O-O").unwrap().resolve(&analysis).is_err());
}

#[test]
fn multiple_games_with_variations() {
    let input = r#"
[Event "First"]
[FEN "4k3/8/8/8/8/8/4P3/4K3 w - - 0 1"]

1. e4 (1. e3 Kd7 (1... Ke7) 2. Kd2) 1... Kd8 $1 2. Kd2 ; comment
1/2-1/2

[Event "Second"]

1. d4 d5 2. c4 !? *
"#;
    let games = pgn::parse_games(input).unwrap();
    assert_eq!(games.len(), 2);
    assert_eq!(games[0].tag("Event"), Some("First"));
    assert_eq!(games[0].moves.len(), 3);
    assert_eq!(games[0].result, Some(GameResult::Draw));
    assert_eq!(
        games[0].replay().unwrap().last().unwrap().to_string(),
        "3k4/8/8/8/4P3/8/3K4/8 b - - 2 2"
    );
    assert_eq!(games[1].moves.len(), 3);
    assert_eq!(games[1].result, Some(GameResult::Unknown));
}

#[test]
fn replay_reports_first_illegal_move() {
    let games = pgn::parse_games("1. e4 e5 2. Ke3 Nc6 *").unwrap();
    let error = games[0].replay().unwrap_err();
    assert_eq!(error.to_string(), "move 2. Ke3");
    assert_eq!(format!("{error:#}"), "move 2. Ke3: illegal move Ke3");
}

#[test]
fn malformed_pgn() {
    assert!(pgn::parse_games("[Event \"Unterminated]").is_err());
    assert!(pgn::parse_games("1. e4 e5 2. Zz9 *").is_err());
    assert!(pgn::parse_games("1. e4 { never closed").is_err());
}
