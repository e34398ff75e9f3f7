use super::label::Season;

pub const NO_RECOMMENDATION: [&str; 1] = ["No specific outfit recommendations."];

static OUTFIT_COLORS: [(&str, [&str; 3]); 12] = [
    ("Light Spring", ["Soft peach", "Warm pink", "Pale gold"]),
    ("True Spring", ["Bright coral", "Leaf green", "Golden yellow"]),
    ("Warm Spring", ["Sunny orange", "Turquoise", "Rich cream"]),
    ("Light Summer", ["Lavender", "Powder blue", "Cool mint"]),
    ("True Summer", ["Soft navy", "Rose pink", "Cool taupe"]),
    ("Cool Summer", ["Dusky teal", "Ice blue", "Slate grey"]),
    ("Soft Autumn", ["Warm olive", "Dusty rose", "Burnt sienna"]),
    ("True Autumn", ["Rust", "Pumpkin", "Mustard yellow"]),
    ("Deep Autumn", ["Espresso", "Dark teal", "Burgundy"]),
    ("Cool Winter", ["Deep emerald", "Ruby red", "Icy silver"]),
    ("True Winter", ["Black", "Royal blue", "Pure white"]),
    ("Deep Winter", ["Dark charcoal", "Electric blue", "Jewel tones"]),
];

/// Exact, case-sensitive lookup by season label.
///
/// "Soft Spring" and "Soft Summer" can be classified but have no entry, so
/// they get the same fallback as an unknown label.
pub fn outfit_suggestions(label: &str) -> &'static [&'static str] {
    OUTFIT_COLORS
        .iter()
        .find(|(season, _)| *season == label)
        .map(|(_, colors)| colors.as_slice())
        .unwrap_or(&NO_RECOMMENDATION)
}

impl Season {
    pub fn outfit_suggestions(&self) -> &'static [&'static str] {
        outfit_suggestions(self.label())
    }
}
