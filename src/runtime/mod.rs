pub mod fetcher;
pub mod trace;
