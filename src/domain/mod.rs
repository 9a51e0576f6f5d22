pub mod item;
pub mod review;

pub use item::{ReviewState, SrsItem};
pub use review::{ReviewLog, ReviewQuality, ReviewRecord};
