//! Implementation of chess environment, its rules and specifics.

pub mod board;
pub mod core;
pub mod game;
pub mod movegen;
pub mod position;
