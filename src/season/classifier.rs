use serde::Serialize;
use tracing::debug;

use crate::color::{Hsl, Rgb};

use super::label::Season;
use super::rules::{SEASON_RULES, first_match};

/// Result of classifying one subject from its face, hair and eye samples.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    pub detected_season: Season,
    pub outfit_suggestions: &'static [&'static str],
    pub face_hsl: Hsl,
    pub hair_hsl: Hsl,
    pub eye_hsl: Hsl,
    pub average_hsl: Hsl,
}

/// Picks the season for the mean of the three samples.
pub fn determine_season(face: Hsl, hair: Hsl, eye: Hsl) -> Season {
    season_for_average(&Hsl::mean_of(face, hair, eye))
}

pub fn season_for_average(average: &Hsl) -> Season {
    first_match(&SEASON_RULES, average)
        .map(|rule| rule.season)
        .unwrap_or(Season::Unknown)
}

pub fn classify_hsl(face: Hsl, hair: Hsl, eye: Hsl) -> Classification {
    let average = Hsl::mean_of(face, hair, eye);
    let season = season_for_average(&average);

    debug!(
        "Average HSL: h={:.2} s={:.2} l={:.2} -> {}",
        average.h, average.s, average.l, season
    );
    debug!("Face HSL: {:?}, Hair HSL: {:?}, Eye HSL: {:?}", face, hair, eye);

    Classification {
        detected_season: season,
        outfit_suggestions: season.outfit_suggestions(),
        face_hsl: face,
        hair_hsl: hair,
        eye_hsl: eye,
        average_hsl: average,
    }
}

pub fn classify(face: Rgb, hair: Rgb, eye: Rgb) -> Classification {
    classify_hsl(Hsl::from(face), Hsl::from(hair), Hsl::from(eye))
}
