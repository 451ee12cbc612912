//! Country label shown in "Browsing events in ...".

use std::sync::LazyLock;

use regex::Regex;

/// Label used when the visitor's country is unknown.
pub const FALLBACK_LABEL: &str = "the world";

static LOC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"loc=([A-Z]{2})").expect("loc pattern compiles"));

const COUNTRY_NAMES: &[(&str, &str)] = &[
    ("US", "United States"),
    ("GB", "United Kingdom"),
    ("CA", "Canada"),
    ("AU", "Australia"),
    ("DE", "Germany"),
    ("FR", "France"),
    ("IT", "Italy"),
    ("ES", "Spain"),
    ("NL", "Netherlands"),
    ("BE", "Belgium"),
    ("SE", "Sweden"),
    ("NO", "Norway"),
    ("DK", "Denmark"),
    ("FI", "Finland"),
    ("PL", "Poland"),
    ("CH", "Switzerland"),
    ("AT", "Austria"),
    ("IE", "Ireland"),
    ("PT", "Portugal"),
    ("IN", "India"),
    ("JP", "Japan"),
    ("CN", "China"),
    ("KR", "South Korea"),
    ("BR", "Brazil"),
    ("MX", "Mexico"),
    ("AR", "Argentina"),
    ("CL", "Chile"),
    ("CO", "Colombia"),
    ("SG", "Singapore"),
    ("NZ", "New Zealand"),
    ("ZA", "South Africa"),
    ("RU", "Russia"),
    ("TR", "Turkey"),
    ("GR", "Greece"),
    ("KE", "Kenya"),
];

/// Two letter country code from a CDN trace response body.
pub fn parse_trace_country(trace: &str) -> Option<&str> {
    LOC.captures(trace)
        .and_then(|captures| captures.get(1))
        .map(|code| code.as_str())
}

/// Display name for `code`, or the code itself when it is not in the table.
pub fn country_name(code: &str) -> &str {
    COUNTRY_NAMES
        .iter()
        .find(|(known, _)| *known == code)
        .map_or(code, |(_, name)| *name)
}

pub fn country_label(trace: Option<&str>) -> String {
    trace
        .and_then(parse_trace_country)
        .map_or_else(|| FALLBACK_LABEL.to_owned(), |code| country_name(code).to_owned())
}
