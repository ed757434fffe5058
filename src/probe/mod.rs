pub mod battery;
pub mod quality;
pub mod recommend;
pub mod runner;
pub mod summary;

pub use runner::ProbeRunner;
