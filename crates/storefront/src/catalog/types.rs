//! Open Library response shapes and their conversion into catalog records.
//!
//! Only the fields the storefront reads are modeled; everything else in the
//! responses is ignored.

use bookpedia_core::CatalogRecord;
use serde::Deserialize;

/// `/subjects/<slug>.json`
#[derive(Debug, Deserialize)]
pub struct SubjectResponse {
    #[serde(default)]
    pub works: Vec<SubjectWork>,
}

/// A work listed under a subject.
#[derive(Debug, Deserialize)]
pub struct SubjectWork {
    pub title: String,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default, alias = "cover_i")]
    pub cover_id: Option<i64>,
    #[serde(default)]
    pub authors: Vec<AuthorRef>,
    #[serde(default)]
    pub author_name: Vec<String>,
}

/// Author entry inside a subject work.
#[derive(Debug, Deserialize)]
pub struct AuthorRef {
    pub name: String,
}

/// `/search.json`
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub docs: Vec<SearchDoc>,
}

/// A single search hit.
#[derive(Debug, Deserialize)]
pub struct SearchDoc {
    pub title: String,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub cover_i: Option<i64>,
    #[serde(default)]
    pub author_name: Vec<String>,
}

/// `/works/<id>.json`
#[derive(Debug, Deserialize)]
pub struct WorkResponse {
    pub title: String,
    pub key: String,
    #[serde(default)]
    pub description: Option<Description>,
    #[serde(default)]
    pub subjects: Vec<String>,
    #[serde(default)]
    pub first_publish_date: Option<String>,
    #[serde(default)]
    pub covers: Vec<i64>,
}

/// Work descriptions come either as a bare string or as a typed text value.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Description {
    Text(String),
    Typed { value: String },
}

impl Description {
    fn into_text(self) -> String {
        match self {
            Self::Text(text) | Self::Typed { value: text } => text,
        }
    }
}

/// Book detail shown by `show`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkDetail {
    pub key: String,
    pub title: String,
    pub description: Option<String>,
    pub subjects: Vec<String>,
    pub first_publish_date: Option<String>,
    pub cover_image_id: Option<u64>,
}

impl WorkDetail {
    /// The detail as a catalog record, so it can be rendered and added.
    #[must_use]
    pub fn record(&self) -> CatalogRecord {
        CatalogRecord {
            title: self.title.clone(),
            author_names: Vec::new(),
            cover_image_id: self.cover_image_id,
            key: Some(self.key.clone()),
        }
    }
}

// Missing covers are reported as -1
fn cover_image_id(id: Option<i64>) -> Option<u64> {
    id.and_then(|id| u64::try_from(id).ok()).filter(|id| *id > 0)
}

impl From<SubjectWork> for CatalogRecord {
    fn from(work: SubjectWork) -> Self {
        let author_names = if work.authors.is_empty() {
            work.author_name
        } else {
            work.authors.into_iter().map(|author| author.name).collect()
        };

        Self {
            title: work.title,
            author_names,
            cover_image_id: cover_image_id(work.cover_id),
            key: work.key,
        }
    }
}

impl From<SearchDoc> for CatalogRecord {
    fn from(doc: SearchDoc) -> Self {
        Self {
            title: doc.title,
            author_names: doc.author_name,
            cover_image_id: cover_image_id(doc.cover_i),
            key: doc.key,
        }
    }
}

impl From<WorkResponse> for WorkDetail {
    fn from(work: WorkResponse) -> Self {
        Self {
            key: work.key,
            title: work.title,
            description: work
                .description
                .map(Description::into_text)
                .filter(|text| !text.trim().is_empty()),
            subjects: work.subjects,
            first_publish_date: work.first_publish_date,
            cover_image_id: cover_image_id(work.covers.first().copied()),
        }
    }
}
