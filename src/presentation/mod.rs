//! Terminal presentation of the board: one-shot commands and sessions.

pub mod cli;
pub mod render;
pub mod session;
