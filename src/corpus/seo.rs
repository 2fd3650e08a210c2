//! Optional scoring boosts for a knowledge base
//!
//! `intents` is a JSON object keyed by intent name in the data files. Intent
//! detection is first-match-wins, so the object is read in document order
//! into a `Vec`. A JSON array of `{name, keywords, urls}` is accepted too.

use serde::de::{Deserializer, MapAccess, SeqAccess, Visitor};
use serde::Deserialize;
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeoConfig {
    #[serde(default)]
    pub priority_pages: Vec<PriorityPage>,

    #[serde(default)]
    pub pillars: Vec<Pillar>,

    #[serde(default, deserialize_with = "deserialize_intents")]
    pub intents: Vec<Intent>,
}

/// Url prefix whose chunks get `weight` added
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PriorityPage {
    pub url: String,
    pub weight: f32,
}

/// Topical pillar
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Pillar {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Intent {
    pub name: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default, rename = "urls", alias = "targetUrlPrefixes")]
    pub target_url_prefixes: Vec<String>,
}

#[derive(Deserialize)]
struct IntentBody {
    #[serde(default)]
    keywords: Vec<String>,
    #[serde(default, alias = "targetUrlPrefixes")]
    urls: Vec<String>,
}

fn deserialize_intents<'de, D>(deserializer: D) -> Result<Vec<Intent>, D::Error>
where
    D: Deserializer<'de>,
{
    struct IntentsVisitor;

    impl<'de> Visitor<'de> for IntentsVisitor {
        type Value = Vec<Intent>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a map of intent name to definition, or a list of intents")
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut intents = Vec::new();
            while let Some((name, body)) = map.next_entry::<String, IntentBody>()? {
                intents.push(Intent {
                    name,
                    keywords: body.keywords,
                    target_url_prefixes: body.urls,
                });
            }
            Ok(intents)
        }

        fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
        where
            A: SeqAccess<'de>,
        {
            let mut intents = Vec::new();
            while let Some(intent) = seq.next_element::<Intent>()? {
                intents.push(intent);
            }
            Ok(intents)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(Vec::new())
        }
    }

    deserializer.deserialize_any(IntentsVisitor)
}
