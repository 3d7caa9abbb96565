//! The fixed city dimension and raw-file categories.
//!
//! Every table in the pipeline is keyed by one of fifteen named Indian
//! cities. The list is fixed because the upstream exports are fetched
//! per-city by hand; there is no discovery step.

use serde::{Deserialize, Serialize};

/// The fifteen cities covered by the raw exports, in canonical order.
///
/// The model encodes a city as its index in the *sorted* distinct list
/// (see [`encode_city`]), not in this order; this order only drives file
/// discovery.
pub const CITIES: [&str; 15] = [
    "Delhi",
    "Mumbai",
    "Chennai",
    "Bengaluru",
    "Hyderabad",
    "Kolkata",
    "Jaipur",
    "Ahmedabad",
    "Pune",
    "Kochi",
    "Lucknow",
    "Gandhinagar",
    "Bhopal",
    "Raipur",
    "Guwahati",
];

/// Raw-file category, the second half of the `{city}_{category}.csv`
/// naming convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Solar,
    Wind,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Solar => "solar",
            Category::Wind => "wind",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "solar" => Some(Category::Solar),
            "wind" => Some(Category::Wind),
            _ => None,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Encode a city as its index within the sorted distinct city list.
///
/// Returns `None` when the city is not present, which callers treat as a
/// row to exclude rather than an error.
pub fn encode_city(cities: &[String], city: &str) -> Option<usize> {
    cities.iter().position(|c| c == city)
}

/// Sorted, deduplicated city labels drawn from arbitrary row data.
pub fn distinct_cities<'a, I>(labels: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut cities: Vec<String> = labels.into_iter().map(|c| c.to_string()).collect();
    cities.sort();
    cities.dedup();
    cities
}
