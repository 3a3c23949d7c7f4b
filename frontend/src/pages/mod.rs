pub mod board;

pub use board::{BoardColumns, BoardPage};
