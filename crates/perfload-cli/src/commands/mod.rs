pub mod drive;
pub mod seed;
