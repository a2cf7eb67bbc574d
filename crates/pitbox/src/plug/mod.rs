//! NGK spark-plug designation decoder.
//!
//! Takes a free-form alphanumeric plug code (e.g. `CR9EK`) and classifies
//! its substrings against the five static code tables, producing a
//! [`Designation`]. Decoding is a pure function over const data: no I/O,
//! no shared state, deterministic for a given input.

pub mod tables;

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use tables::{HeatRating, ThreadSpec};

static HEAT_RE: OnceLock<Regex> = OnceLock::new();

/// A decoded spark-plug designation.
///
/// Ephemeral result of a single [`decode`] call. Every field other than
/// `original` is optional or may be empty; absence of a match is a normal
/// outcome, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Designation {
    /// The normalized input (uppercased, trimmed).
    pub original: String,

    /// Thread-type key, taken from the first character only.
    pub thread: Option<char>,

    /// Matched construction-feature keys, in table order.
    pub construction: Vec<&'static str>,

    /// Numeric heat value (first run of digits in the code).
    pub heat: Option<u32>,

    /// Thread-reach key. When several reach keys match, the last one in
    /// table order wins.
    pub reach: Option<&'static str>,

    /// Matched electrode keys, in table order. Keys already reported under
    /// construction features are excluded.
    pub electrodes: Vec<&'static str>,
}

impl Designation {
    /// The thread spec for the detected thread key, if any.
    #[must_use]
    pub fn thread_spec(&self) -> Option<&'static ThreadSpec> {
        self.thread.and_then(tables::thread_spec)
    }

    /// The heat-rating record for the detected heat value, if the value is
    /// present and within the table.
    #[must_use]
    pub fn heat_rating(&self) -> Option<&'static HeatRating> {
        self.heat.and_then(tables::heat_rating)
    }
}

/// Decode a spark-plug designation.
///
/// The input is uppercased and trimmed first; an input that is empty after
/// trimming yields `None` with no table lookups performed. Matching is
/// unanchored substring containment, so single-letter keys can match inside
/// unrelated character runs. That looseness is deliberate and kept as-is.
#[must_use]
pub fn decode(input: &str) -> Option<Designation> {
    let code = input.trim().to_uppercase();
    if code.is_empty() {
        return None;
    }

    // Thread type: first character only, no further search.
    let thread = code
        .chars()
        .next()
        .filter(|c| tables::thread_spec(*c).is_some());

    let heat = heat_value(&code);

    let construction: Vec<&'static str> = tables::CONSTRUCTION_CODES
        .iter()
        .filter(|entry| code.contains(entry.key))
        .map(|entry| entry.key)
        .collect();

    // Reach: last match in table order wins.
    let mut reach = None;
    for entry in tables::REACH_CODES {
        if code.contains(entry.key) {
            reach = Some(entry.key);
        }
    }

    let electrodes: Vec<&'static str> = tables::ELECTRODE_CODES
        .iter()
        .filter(|entry| code.contains(entry.key) && !construction.contains(&entry.key))
        .map(|entry| entry.key)
        .collect();

    Some(Designation {
        original: code,
        thread,
        construction,
        heat,
        reach,
        electrodes,
    })
}

/// Extract the heat value: the first maximal run of decimal digits.
fn heat_value(code: &str) -> Option<u32> {
    let re = HEAT_RE.get_or_init(|| Regex::new(r"\d+").expect("digit pattern is valid"));
    re.find(code).and_then(|m| m.as_str().parse().ok())
}
