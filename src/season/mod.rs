//! Season classification: averaged HSL of the face, hair and eye samples
//! is matched against an ordered rule table, then mapped to outfit colors.

pub mod classifier;
pub mod label;
pub mod outfit;
pub mod rules;

pub use classifier::{Classification, classify, classify_hsl, determine_season};
pub use label::Season;
pub use outfit::outfit_suggestions;
