//! Read-only portfolio content: bio, projects, contact links.
//!
//! The document shape is
//! `{ "about": { "bio": ... }, "projects": { name: { "description", "github" } }, "contact": { platform: link } }`.
//! Object key order in the JSON file is the order everything is rendered in.

use std::fmt;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

const SAMPLE_CONTENT: &str = include_str!("../assets/content.json");

#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("Failed to read content file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid content document: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct About {
    pub bio: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectDetails {
    pub description: String,
    pub github: String,
}

/// A JSON object kept as an ordered list of `(key, value)` pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entries<T>(Vec<(String, T)>);

impl<T> Entries<T> {
    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&T> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }
}

impl<T> Default for Entries<T> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<T> FromIterator<(String, T)> for Entries<T> {
    fn from_iter<I: IntoIterator<Item = (String, T)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<T: Serialize> Serialize for Entries<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in &self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

struct EntriesVisitor<T>(PhantomData<T>);

impl<'de, T: Deserialize<'de>> Visitor<'de> for EntriesVisitor<T> {
    type Value = Entries<T>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a JSON object")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut entries: Vec<(String, T)> = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((key, value)) = access.next_entry::<String, T>()? {
            // Later duplicates replace earlier ones in place, like a JS object.
            match entries.iter().position(|entry| entry.0 == key) {
                Some(idx) => entries[idx].1 = value,
                None => entries.push((key, value)),
            }
        }
        Ok(Entries(entries))
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Entries<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(EntriesVisitor(PhantomData))
    }
}

/// The content collaborator. Loaded once and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Portfolio {
    pub about: About,
    #[serde(default)]
    pub projects: Entries<ProjectDetails>,
    #[serde(default)]
    pub contact: Entries<String>,
}

impl Portfolio {
    pub fn from_json(json: &str) -> Result<Self, ContentError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, ContentError> {
        let json = std::fs::read_to_string(path).map_err(|source| ContentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let portfolio = Self::from_json(&json)?;
        tracing::debug!(
            path = %path.display(),
            projects = portfolio.projects.len(),
            contacts = portfolio.contact.len(),
            "Loaded portfolio content"
        );
        Ok(portfolio)
    }

    /// Bundled demo content.
    pub fn sample() -> Result<Self, ContentError> {
        Self::from_json(SAMPLE_CONTENT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn keeps_document_order() {
        let json = r#"{
            "about": { "bio": "hi" },
            "projects": {
                "zeta": { "description": "last letter", "github": "https://g/z" },
                "alpha": { "description": "first letter", "github": "https://g/a" }
            },
            "contact": { "GitHub": "https://g", "Email": "me@x.dev", "Blog": "https://b" }
        }"#;
        let portfolio = Portfolio::from_json(json).unwrap();
        let names: Vec<&str> = portfolio.projects.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["zeta", "alpha"]);
        let platforms: Vec<&str> = portfolio.contact.iter().map(|(p, _)| p).collect();
        assert_eq!(platforms, vec!["GitHub", "Email", "Blog"]);
        assert_eq!(portfolio.contact.get("Email").map(String::as_str), Some("me@x.dev"));
    }

    #[test]
    fn duplicate_keys_keep_first_position() {
        let json = r#"{ "about": { "bio": "" }, "contact": { "a": "1", "b": "2", "a": "3" } }"#;
        let portfolio = Portfolio::from_json(json).unwrap();
        let pairs: Vec<(&str, &String)> = portfolio.contact.iter().collect();
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0], ("a", &"3".to_string()));
        assert!(portfolio.projects.is_empty());
    }

    #[test]
    fn serializes_in_order() {
        let portfolio = Portfolio {
            about: About { bio: "b".into() },
            projects: Entries::default(),
            contact: vec![("Z".to_string(), "z".to_string()), ("A".to_string(), "a".to_string())]
                .into_iter()
                .collect(),
        };
        let json = serde_json::to_string(&portfolio).unwrap();
        assert!(json.find("\"Z\"").unwrap() < json.find("\"A\"").unwrap());
    }

    #[test]
    fn sample_content_parses() {
        let portfolio = Portfolio::sample().unwrap();
        assert!(!portfolio.about.bio.is_empty());
        assert!(!portfolio.projects.is_empty());
        assert!(portfolio.contact.get("Email").is_some());
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Portfolio::load(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, ContentError::Io { .. }));
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("content.json");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(file, r#"{{ "about": {{ "bio": "from disk" }} }}"#).unwrap();
        let portfolio = Portfolio::load(&path).unwrap();
        assert_eq!(portfolio.about.bio, "from disk");
    }

    #[test]
    fn rejects_malformed_document() {
        let err = Portfolio::from_json(r#"{ "projects": [] }"#).unwrap_err();
        assert!(matches!(err, ContentError::Parse(_)));
    }
}
