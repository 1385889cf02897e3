//! Textual notations built on top of [`crate::chess`]: [`san`] for single
//! moves and [`pgn`] for whole games. FEN lives next to
//! [`crate::chess::position::Position`].

pub mod pgn;
pub mod san;
