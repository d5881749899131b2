//! Rumen fermentation and microbial protein synthesis.

pub mod fermentation;
pub mod microbial;

pub use fermentation::RumenDigestion;
pub use microbial::MicrobialFlows;
