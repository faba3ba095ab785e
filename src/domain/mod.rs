pub mod order;
pub mod snapshot;
pub mod tally;
pub mod menu_board;

pub use order::*;
pub use snapshot::*;
pub use tally::*;
pub use menu_board::*;
