use std::fmt;

use serde::Serialize;

/// Color season assigned to a subject.
///
/// Serializes as its display label, e.g. `"Light Spring"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Season {
    #[serde(rename = "Light Spring")]
    LightSpring,
    #[serde(rename = "True Spring")]
    TrueSpring,
    #[serde(rename = "Soft Spring")]
    SoftSpring,
    #[serde(rename = "Warm Spring")]
    WarmSpring,
    #[serde(rename = "Light Summer")]
    LightSummer,
    #[serde(rename = "True Summer")]
    TrueSummer,
    #[serde(rename = "Soft Summer")]
    SoftSummer,
    #[serde(rename = "Cool Summer")]
    CoolSummer,
    #[serde(rename = "True Autumn")]
    TrueAutumn,
    #[serde(rename = "Soft Autumn")]
    SoftAutumn,
    #[serde(rename = "Deep Autumn")]
    DeepAutumn,
    #[serde(rename = "True Winter")]
    TrueWinter,
    #[serde(rename = "Cool Winter")]
    CoolWinter,
    #[serde(rename = "Deep Winter")]
    DeepWinter,
    #[serde(rename = "Unknown Season")]
    Unknown,
}

impl Season {
    pub const fn label(&self) -> &'static str {
        match self {
            Season::LightSpring => "Light Spring",
            Season::TrueSpring => "True Spring",
            Season::SoftSpring => "Soft Spring",
            Season::WarmSpring => "Warm Spring",
            Season::LightSummer => "Light Summer",
            Season::TrueSummer => "True Summer",
            Season::SoftSummer => "Soft Summer",
            Season::CoolSummer => "Cool Summer",
            Season::TrueAutumn => "True Autumn",
            Season::SoftAutumn => "Soft Autumn",
            Season::DeepAutumn => "Deep Autumn",
            Season::TrueWinter => "True Winter",
            Season::CoolWinter => "Cool Winter",
            Season::DeepWinter => "Deep Winter",
            Season::Unknown => "Unknown Season",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
