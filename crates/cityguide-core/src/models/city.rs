use serde::{Deserialize, Serialize};

/// The top-level payload served by the remote source and kept in the cache.
///
/// Cities keep the order in which they were received. Unknown fields are
/// ignored when parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Document {
    pub cities: Vec<City>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct City {
    /// Used as the identifier when rendering the city list.
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub places: Vec<Place>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Place {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl Document {
    /// Parse a document from JSON text.
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// Serialize to the compact JSON form stored in the cache.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Look up a city by name.
    pub fn city(&self, name: &str) -> Option<&City> {
        self.cities.iter().find(|c| c.name == name)
    }

    pub fn len(&self) -> usize {
        self.cities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }
}

impl City {
    pub fn display_place_count(&self) -> String {
        match self.places.len() {
            1 => "1 place".to_string(),
            n => format!("{} places", n),
        }
    }
}
