use crate::color::Hsl;

use super::label::Season;
use HueBand::{Blue, Green, Violet, Warm};
use Saturation::{Any, High, Low};
use Tier::{Dark, Light, Mid};

/// Lightness band of the averaged sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    /// `l > 75`
    Light,
    /// `40 <= l <= 75`
    Mid,
    /// `l < 40`
    Dark,
}

impl Tier {
    pub fn contains(&self, lightness: f64) -> bool {
        match self {
            Tier::Light => lightness > 75.0,
            Tier::Mid => (40.0..=75.0).contains(&lightness),
            Tier::Dark => lightness < 40.0,
        }
    }
}

/// Hue band, closed on the upper edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HueBand {
    /// `[0, 50]`
    Warm,
    /// `(50, 150]`
    Green,
    /// `(150, 280]`
    Blue,
    /// `(280, 360]`
    Violet,
}

impl HueBand {
    pub fn contains(&self, hue: f64) -> bool {
        match self {
            HueBand::Warm => (0.0..=50.0).contains(&hue),
            HueBand::Green => hue > 50.0 && hue <= 150.0,
            HueBand::Blue => hue > 150.0 && hue <= 280.0,
            HueBand::Violet => hue > 280.0 && hue <= 360.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Saturation {
    Any,
    /// `s > 50`
    High,
    /// `s <= 50`
    Low,
}

impl Saturation {
    pub fn accepts(&self, saturation: f64) -> bool {
        match self {
            Saturation::Any => true,
            Saturation::High => saturation > 50.0,
            Saturation::Low => saturation <= 50.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeasonRule {
    pub tier: Tier,
    pub hue: HueBand,
    pub saturation: Saturation,
    pub season: Season,
}

impl SeasonRule {
    const fn new(tier: Tier, hue: HueBand, saturation: Saturation, season: Season) -> Self {
        Self {
            tier,
            hue,
            saturation,
            season,
        }
    }

    pub fn matches(&self, average: &Hsl) -> bool {
        self.tier.contains(average.l)
            && self.hue.contains(average.h)
            && self.saturation.accepts(average.s)
    }
}

/// Evaluated top to bottom, first match wins.
///
/// The light tier has no rule for hues above 150, so bright blue and violet
/// averages fall through to [`Season::Unknown`].
pub static SEASON_RULES: [SeasonRule; 14] = [
    SeasonRule::new(Light, Warm, Any, Season::LightSpring),
    SeasonRule::new(Light, Green, Any, Season::LightSummer),
    SeasonRule::new(Mid, Warm, High, Season::TrueSpring),
    SeasonRule::new(Mid, Warm, Low, Season::SoftSpring),
    SeasonRule::new(Mid, Green, High, Season::TrueSummer),
    SeasonRule::new(Mid, Green, Low, Season::SoftSummer),
    SeasonRule::new(Mid, Blue, High, Season::TrueAutumn),
    SeasonRule::new(Mid, Blue, Low, Season::SoftAutumn),
    SeasonRule::new(Mid, Violet, High, Season::TrueWinter),
    SeasonRule::new(Mid, Violet, Low, Season::CoolWinter),
    SeasonRule::new(Dark, Warm, Any, Season::WarmSpring),
    SeasonRule::new(Dark, Green, Any, Season::CoolSummer),
    SeasonRule::new(Dark, Blue, Any, Season::DeepAutumn),
    SeasonRule::new(Dark, Violet, Any, Season::DeepWinter),
];

pub fn first_match<'a>(rules: &'a [SeasonRule], average: &Hsl) -> Option<&'a SeasonRule> {
    rules.iter().find(|rule| rule.matches(average))
}
