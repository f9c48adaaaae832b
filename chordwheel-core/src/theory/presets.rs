use super::degree::ScaleDegree;

/// A named progression expressed as 1-based scale degrees
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressionPreset {
    pub name: &'static str,
    pub degrees: &'static [u8],
}

/// Built-in progressions, kept in lexicographic order of their names
pub const PRESETS: [ProgressionPreset; 8] = [
    ProgressionPreset { name: "I-IV-V-I", degrees: &[1, 4, 5, 1] },
    ProgressionPreset { name: "I-V-vi-IV", degrees: &[1, 5, 6, 4] },
    ProgressionPreset { name: "I-iii-vi-IV", degrees: &[1, 3, 6, 4] },
    ProgressionPreset { name: "I-vi-IV-V", degrees: &[1, 6, 4, 5] },
    ProgressionPreset { name: "IV-V-iii-vi", degrees: &[4, 5, 3, 6] },
    ProgressionPreset { name: "ii-V-I", degrees: &[2, 5, 1] },
    ProgressionPreset { name: "vi-IV-I-V", degrees: &[6, 4, 1, 5] },
    ProgressionPreset { name: "vi-ii-V-I", degrees: &[6, 2, 5, 1] },
];

/// Exact, case-sensitive lookup ("ii-V-I" and "II-V-I" are different names)
pub fn find_preset(name: &str) -> Option<&'static ProgressionPreset> {
    PRESETS.iter().find(|p| p.name == name)
}

/// Parse a dash or space separated degree list such as "1-5-6-4" or "ii V I"
///
/// Tokens may be digits or roman numerals. Returns `None` if any token is
/// unrecognised; digits outside 1..=7 are kept so callers can rest on them.
pub fn parse_degree_list(s: &str) -> Option<Vec<u8>> {
    let tokens: Vec<&str> = s
        .split(|c: char| c == '-' || c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .collect();

    if tokens.is_empty() {
        return None;
    }

    tokens
        .into_iter()
        .map(|t| {
            t.parse::<u8>()
                .ok()
                .or_else(|| ScaleDegree::parse_roman(t).map(|d| d.number()))
        })
        .collect()
}
