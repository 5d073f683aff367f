pub mod phase;

pub use phase::SendPhase;
