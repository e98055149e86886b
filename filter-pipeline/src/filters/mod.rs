//! Filter stages that can be composed into a FilterPipeline.

pub mod intro;
pub mod karma;
pub mod spam;

pub use intro::IntroPatternFilter;
pub use karma::KarmaFilter;
pub use spam::{SpamDetector, SpamFilter};
