pub mod careers;
pub mod notice;
pub mod sponsorship;

pub use notice::{Notice, NoticeLevel};
