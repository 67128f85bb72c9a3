use std::fmt::Display;

use serde::{Deserialize, Serialize};

pub const UNKNOWN_REVIEWER: &str = "Unknown User";
pub const REVIEW_TEXT_NOT_FOUND: &str = "Review text not found.";
pub const REVIEW_TEXT_EMPTY: &str = "No review text found in structure.";

/// One scraped book page. Every field except `url` may be the "N/A" sentinel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookRecord {
    pub url: String,
    #[serde(with = "not_available")]
    pub title: Option<String>,
    #[serde(with = "not_available")]
    pub author: Option<String>,
    #[serde(with = "not_available")]
    pub rating: Option<f64>,
    #[serde(with = "not_available")]
    pub review_count: Option<u64>,
    #[serde(with = "not_available")]
    pub description: Option<String>,
    pub genres: Vec<String>,
    pub reviews: Vec<ReviewSample>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewSample {
    pub reviewer_name: String,
    pub review_text: String,
}

impl BookRecord {
    pub fn title_or_na(&self) -> String {
        or_na(&self.title)
    }
}

/// Display a value, or the sentinel when it was not extracted.
pub fn or_na<T: Display>(value: &Option<T>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => not_available::SENTINEL.to_string(),
    }
}

/// Serde adapter writing `None` as the literal `"N/A"` and reading it back.
pub mod not_available {
    use serde::de::{self, Deserializer};
    use serde::{Deserialize, Serialize, Serializer};

    pub const SENTINEL: &str = "N/A";

    pub fn serialize<T, S>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Serialize,
        S: Serializer,
    {
        match value {
            Some(v) => v.serialize(serializer),
            None => serializer.serialize_str(SENTINEL),
        }
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        T: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr<T> {
            Missing(Sentinel),
            Present(T),
        }

        Ok(match Repr::<T>::deserialize(deserializer)? {
            Repr::Missing(_) => None,
            Repr::Present(v) => Some(v),
        })
    }

    struct Sentinel;

    impl<'de> Deserialize<'de> for Sentinel {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let s = String::deserialize(deserializer)?;
            if s == SENTINEL {
                Ok(Sentinel)
            } else {
                Err(de::Error::custom("expected the N/A sentinel"))
            }
        }
    }
}
