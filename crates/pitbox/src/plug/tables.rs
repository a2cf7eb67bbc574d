//! Static NGK designation code tables.
//!
//! Five independent tables drive the decoder: thread type, construction
//! features, heat ratings, thread-reach, and electrode type. Each is const
//! data, immutable for the process lifetime, and iterated in definition
//! order (the decoder's override and exclusion rules depend on that order).

/// A single code-table entry: short alphabetic key plus description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeEntry {
    /// The code key (1-2 uppercase letters).
    pub key: &'static str,

    /// Human-readable description of the code.
    pub description: &'static str,
}

/// A thread-type entry, keyed by the first character of a designation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreadSpec {
    /// The code key (a single uppercase letter).
    pub key: char,

    /// Thread diameter.
    pub diameter: &'static str,

    /// Wrench (hex) size.
    pub hex: &'static str,
}

/// A heat-rating entry, keyed by numeric value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeatRating {
    /// Numeric heat value as it appears in the designation.
    pub value: u32,

    /// Category label (hot through racing).
    pub category: &'static str,

    /// Operating temperature descriptor.
    pub temperature: &'static str,

    /// Typical usage note.
    pub usage: &'static str,
}

/// Thread-type codes (first character of the designation).
pub const THREAD_CODES: &[ThreadSpec] = &[
    ThreadSpec { key: 'A', diameter: "18 mm", hex: "25.4 mm" },
    ThreadSpec { key: 'B', diameter: "14 mm", hex: "20.8 mm" },
    ThreadSpec { key: 'C', diameter: "10 mm", hex: "16 mm" },
    ThreadSpec { key: 'D', diameter: "12 mm", hex: "18 mm" },
    ThreadSpec { key: 'J', diameter: "12 mm (19 mm reach)", hex: "18 mm" },
];

/// Construction-feature codes.
pub const CONSTRUCTION_CODES: &[CodeEntry] = &[
    CodeEntry { key: "C", description: "5/8\" plug hex" },
    CodeEntry { key: "K", description: "5/8\" plug hex, projected electrode" },
    CodeEntry { key: "M", description: "Compact type" },
    CodeEntry { key: "P", description: "Projected insulator tip" },
    CodeEntry { key: "R", description: "Resistor (5 kOhm)" },
    CodeEntry { key: "SD", description: "Surface discharge (rotary engines)" },
    CodeEntry { key: "U", description: "Ground electrode half-covers the center electrode" },
    CodeEntry { key: "Z", description: "Inductive suppressor" },
];

/// Thread-reach codes. Later entries override earlier ones when more than
/// one key matches a designation.
pub const REACH_CODES: &[CodeEntry] = &[
    CodeEntry { key: "E", description: "19 mm (3/4\")" },
    CodeEntry { key: "F", description: "Tapered seat" },
    CodeEntry { key: "H", description: "12.7 mm (1/2\")" },
    CodeEntry { key: "L", description: "11.2 mm (7/16\")" },
];

/// Electrode-type codes.
pub const ELECTRODE_CODES: &[CodeEntry] = &[
    CodeEntry { key: "A", description: "Special design" },
    CodeEntry { key: "B", description: "Special design (Honda CVCC)" },
    CodeEntry { key: "C", description: "Low-angle ground electrode" },
    CodeEntry { key: "G", description: "Nickel-alloy fine-wire center electrode" },
    CodeEntry { key: "GV", description: "Gold-palladium center electrode (racing)" },
    CodeEntry { key: "H", description: "Partial thread" },
    CodeEntry { key: "K", description: "Dual ground electrodes (Toyota, BMW)" },
    CodeEntry { key: "L", description: "Half heat range" },
    CodeEntry { key: "LM", description: "Compact type for lawn mowers" },
    CodeEntry { key: "M", description: "Dual ground electrodes (rotary engines)" },
    CodeEntry { key: "N", description: "Special side electrode" },
    CodeEntry { key: "P", description: "Premium platinum center electrode" },
    CodeEntry { key: "Q", description: "Quad ground electrodes" },
    CodeEntry { key: "R", description: "Delta-cut special center electrode (BMW)" },
    CodeEntry { key: "S", description: "Standard copper-core center electrode (2.6 mm)" },
    CodeEntry { key: "T", description: "Triple ground electrodes" },
    CodeEntry { key: "U", description: "Semi-surface discharge" },
    CodeEntry { key: "V", description: "Fine-wire gold-palladium center electrode (1.0 mm)" },
    CodeEntry { key: "VX", description: "High-performance platinum center electrode (0.8 mm)" },
    CodeEntry { key: "W", description: "Tungsten electrode" },
    CodeEntry { key: "X", description: "Booster gap" },
    CodeEntry { key: "Y", description: "V-grooved center electrode" },
    CodeEntry { key: "Z", description: "Thick center electrode (2.9 mm)" },
];

/// Heat-rating table, ordered by numeric value.
pub const HEAT_RATINGS: &[HeatRating] = &[
    HeatRating { value: 2, category: "Very hot", temperature: "Low engine temp", usage: "Low-output engines" },
    HeatRating { value: 3, category: "Hot", temperature: "Low to normal", usage: "Lightly loaded engines" },
    HeatRating { value: 4, category: "Hot", temperature: "Low to normal", usage: "City traffic, short trips" },
    HeatRating { value: 5, category: "Hot", temperature: "Normal", usage: "Standard applications" },
    HeatRating { value: 6, category: "Warm", temperature: "Normal", usage: "Standard applications" },
    HeatRating { value: 7, category: "Normal", temperature: "Standard", usage: "General use" },
    HeatRating { value: 8, category: "Normal/cold", temperature: "Higher", usage: "Winter weather (up to 15 C)" },
    HeatRating { value: 9, category: "Cold", temperature: "High", usage: "Normal or wet weather (up to 20 C)" },
    HeatRating { value: 10, category: "Cold", temperature: "High", usage: "Summer weather (from 20 C)" },
    HeatRating { value: 11, category: "Very cold", temperature: "Very high", usage: "Sport engines" },
    HeatRating { value: 12, category: "Very cold", temperature: "Very high", usage: "High-output engines" },
    HeatRating { value: 13, category: "Racing", temperature: "Extreme", usage: "Racing, high performance" },
    HeatRating { value: 14, category: "Racing", temperature: "Extreme", usage: "Racing use, maximum load" },
];

/// Look up the thread spec for a first-character key.
#[must_use]
pub fn thread_spec(key: char) -> Option<&'static ThreadSpec> {
    THREAD_CODES.iter().find(|t| t.key == key)
}

/// Look up a construction-feature description by key.
#[must_use]
pub fn construction_description(key: &str) -> Option<&'static str> {
    CONSTRUCTION_CODES
        .iter()
        .find(|e| e.key == key)
        .map(|e| e.description)
}

/// Look up a thread-reach description by key.
#[must_use]
pub fn reach_description(key: &str) -> Option<&'static str> {
    REACH_CODES.iter().find(|e| e.key == key).map(|e| e.description)
}

/// Look up an electrode description by key.
#[must_use]
pub fn electrode_description(key: &str) -> Option<&'static str> {
    ELECTRODE_CODES
        .iter()
        .find(|e| e.key == key)
        .map(|e| e.description)
}

/// Look up the heat-rating record for a numeric value.
#[must_use]
pub fn heat_rating(value: u32) -> Option<&'static HeatRating> {
    HEAT_RATINGS.iter().find(|h| h.value == value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thread_spec_known_keys() {
        let c = thread_spec('C').unwrap();
        assert_eq!(c.diameter, "10 mm");
        assert_eq!(c.hex, "16 mm");

        assert!(thread_spec('B').is_some());
        assert!(thread_spec('J').is_some());
    }

    #[test]
    fn test_thread_spec_unknown_key() {
        assert!(thread_spec('Z').is_none());
        assert!(thread_spec('9').is_none());
    }

    #[test]
    fn test_construction_lookup() {
        assert_eq!(construction_description("R"), Some("Resistor (5 kOhm)"));
        assert!(construction_description("SD").is_some());
        assert!(construction_description("Q").is_none());
    }

    #[test]
    fn test_reach_lookup() {
        assert_eq!(reach_description("E"), Some("19 mm (3/4\")"));
        assert!(reach_description("X").is_none());
    }

    #[test]
    fn test_electrode_lookup() {
        assert!(electrode_description("K").is_some());
        assert!(electrode_description("VX").is_some());
        assert!(electrode_description("SD").is_none());
    }

    #[test]
    fn test_heat_rating_range() {
        assert!(heat_rating(2).is_some());
        assert!(heat_rating(14).is_some());
        assert!(heat_rating(1).is_none());
        assert!(heat_rating(15).is_none());
    }

    #[test]
    fn test_heat_ratings_ordered_by_value() {
        for pair in HEAT_RATINGS.windows(2) {
            assert!(pair[0].value < pair[1].value);
        }
    }

    #[test]
    fn test_table_keys_are_uppercase() {
        for entry in CONSTRUCTION_CODES.iter().chain(REACH_CODES).chain(ELECTRODE_CODES) {
            assert!(!entry.key.is_empty());
            assert!(entry.key.len() <= 2);
            assert!(entry.key.chars().all(|c| c.is_ascii_uppercase()));
        }
    }

    #[test]
    fn test_construction_and_electrode_tables_overlap() {
        // Several keys intentionally appear in both tables; the decoder
        // resolves the overlap in favor of construction features.
        let overlap: Vec<_> = CONSTRUCTION_CODES
            .iter()
            .filter(|c| ELECTRODE_CODES.iter().any(|e| e.key == c.key))
            .map(|c| c.key)
            .collect();
        assert!(overlap.contains(&"K"));
        assert!(overlap.contains(&"P"));
    }
}
