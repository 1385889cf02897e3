use assert_cmd::Command;
use predicates::boolean::PredicateBooleanExt;
use predicates::str::{contains, starts_with};

const BINARY_NAME: &str = "rankfile";

fn command() -> Command {
    Command::cargo_bin(BINARY_NAME).expect("Binary should be built")
}

#[test]
fn uci_setup() {
    drop(
        command()
            .write_stdin("uci\n")
            .assert()
            .success()
            .stdout(
                contains("id name rankfile")
                    .and(contains("id author"))
                    .and(contains("uciok")),
            ),
    );
}

#[test]
fn uci_is_the_default_mode() {
    drop(
        command()
            .arg("uci")
            .write_stdin("isready\nquit\n")
            .assert()
            .success()
            .stdout("readyok\n"),
    );
    drop(
        command()
            .write_stdin("isready\n")
            .assert()
            .success()
            .stdout("readyok\n"),
    );
}

#[test]
fn uci_game() {
    drop(
        command()
            .write_stdin(
                "ucinewgame\nposition startpos moves f2f3 e7e5 g2g4\ngo searchmoves d8h4 a7a6\n",
            )
            .assert()
            .success()
            .stdout(starts_with("bestmove ").and(contains("d8h4").or(contains("a7a6")))),
    );
    drop(
        command()
            .write_stdin("position startpos moves e2e5\ngo depth 1\nfoo\n")
            .assert()
            .success()
            .stdout(
                contains("info string illegal move e2e5")
                    .and(contains("bestmove "))
                    .and(contains("info string unknown command: foo")),
            ),
    );
}

#[test]
fn perft() {
    drop(
        command()
            .args(["perft", "--depth", "3"])
            .assert()
            .success()
            .stdout("Nodes searched: 8902\n"),
    );
    drop(
        command()
            .args([
                "perft",
                "--depth",
                "2",
                "--divide",
                "--fen",
                "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            ])
            .assert()
            .success()
            .stdout(
                contains("e1g1: ")
                    .and(contains("e1c1: "))
                    .and(contains("Nodes searched: 2039")),
            ),
    );
    drop(
        command()
            .args(["perft", "--depth", "1", "--fen", "not a position"])
            .assert()
            .failure(),
    );
}

#[test]
fn play() {
    drop(
        command()
            .arg("play")
            .write_stdin("f3\ne5\ng2g4\nNf3\nQh4#\n")
            .assert()
            .success()
            .stdout(
                contains("g4\n")
                    .and(contains("error: illegal move Nf3"))
                    .and(contains("Qh4#\n"))
                    .and(contains("game over: Checkmate { winner: Black }")),
            ),
    );
}

#[test]
fn pgn_replay() {
    let path = std::env::temp_dir().join(format!("rankfile-{}.pgn", std::process::id()));
    std::fs::write(
        &path,
        "[White \"A\"]\n[Black \"B\"]\n\n1. e4 e5 2. Qh5 Nc6 3. Bc4 Nf6 4. Qxf7# 1-0\n\n\
         [White \"C\"]\n[Black \"D\"]\n\n1. e4 e5 2. Ke3 *\n",
    )
    .unwrap();
    drop(
        command()
            .arg("pgn")
            .arg(&path)
            .assert()
            .failure()
            .stdout(
                contains(
                    "game 1 (A - B): \
                     r1bqkb1r/pppp1Qpp/2n2n2/4p3/2B1P3/8/PPPP1PPP/RNB1K1NR b KQkq - 0 4",
                )
                .and(contains("game 2 (C - D): error: move 2. Ke3: illegal move Ke3"))
                .and(contains("2 games, 1 failed")),
            ),
    );
    std::fs::remove_file(&path).unwrap();
    drop(
        command()
            .args(["pgn", "-"])
            .write_stdin("1. d4 d5 *")
            .assert()
            .success()
            .stdout(contains("1 games, 0 failed")),
    );
}
