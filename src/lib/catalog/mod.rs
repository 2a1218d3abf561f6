//! Module with the catalog of meme templates and their categories.
//!
//! The catalog is immutable once built. The built-in one is available
//! through `Catalog::default()`, and custom ones can be loaded from JSON.

mod seed;


use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;


/// Slug of the pseudo-category that contains every template.
pub const ALL_CATEGORY: &str = "all";


/// Category of meme templates.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Category {
    pub id: u32,
    pub name: String,
    pub slug: String,
}

/// A meme template as listed in the catalog.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateEntry {
    pub id: u32,
    pub name: String,
    /// Name of the template image resource used for rendering.
    pub slug: String,
    pub image_url: String,
    #[serde(default)]
    pub category_id: Option<u32>,
    #[serde(default)]
    pub popular: bool,
    #[serde(default)]
    pub trending: bool,
}


/// Immutable collection of templates & categories.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(try_from = "CatalogRepr")]
pub struct Catalog {
    categories: Vec<Category>,
    templates: Vec<TemplateEntry>,
}

#[derive(Deserialize)]
struct CatalogRepr {
    #[serde(default)]
    categories: Vec<Category>,
    #[serde(default)]
    templates: Vec<TemplateEntry>,
}

impl TryFrom<CatalogRepr> for Catalog {
    type Error = Error;

    fn try_from(repr: CatalogRepr) -> Result<Self, Error> {
        Catalog::new(repr.categories, repr.templates)
    }
}

impl Catalog {
    /// Create a catalog, checking that ids & slugs are unique
    /// and that every template's category exists.
    pub fn new(categories: Vec<Category>, templates: Vec<TemplateEntry>) -> Result<Self, Error> {
        let mut category_ids = HashSet::new();
        let mut category_slugs = HashSet::new();
        for c in &categories {
            if !category_ids.insert(c.id) {
                return Err(Error::DuplicateCategory(c.id.to_string()));
            }
            if !category_slugs.insert(c.slug.as_str()) {
                return Err(Error::DuplicateCategory(c.slug.clone()));
            }
        }

        let mut template_ids = HashSet::new();
        let mut template_slugs = HashSet::new();
        for t in &templates {
            if !template_ids.insert(t.id) {
                return Err(Error::DuplicateTemplate(t.id.to_string()));
            }
            if !template_slugs.insert(t.slug.as_str()) {
                return Err(Error::DuplicateTemplate(t.slug.clone()));
            }
            if let Some(cid) = t.category_id {
                if !category_ids.contains(&cid) {
                    return Err(Error::UnknownCategory(t.slug.clone(), cid));
                }
            }
        }

        Ok(Catalog{categories, templates})
    }

    /// Load the catalog from a JSON file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        debug!("Loading catalog from {}", path.display());
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Load the catalog from a reader of JSON.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, Error> {
        let catalog: Catalog = serde_json::from_reader(reader).map_err(|e| match e.classify() {
            serde_json::error::Category::Io => Error::Io(e.into()),
            _ => Error::Json(e),
        })?;
        debug!("Catalog loaded with {} categories and {} templates",
            catalog.categories.len(), catalog.templates.len());
        Ok(catalog)
    }
}

impl Default for Catalog {
    /// The built-in catalog.
    fn default() -> Self {
        seed::catalog()
    }
}

// Queries.
impl Catalog {
    #[inline]
    pub fn templates(&self) -> &[TemplateEntry] {
        &self.templates
    }

    #[inline]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn template(&self, id: u32) -> Option<&TemplateEntry> {
        self.templates.iter().find(|t| t.id == id)
    }

    pub fn template_by_slug(&self, slug: &str) -> Option<&TemplateEntry> {
        self.templates.iter().find(|t| t.slug == slug)
    }

    pub fn category_by_slug(&self, slug: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.slug == slug)
    }

    /// Templates in the category of given slug.
    ///
    /// The `all` category includes every template, even if the catalog
    /// doesn't list it. Unknown categories result in `None`.
    pub fn templates_in_category(&self, slug: &str) -> Option<Vec<&TemplateEntry>> {
        if slug == ALL_CATEGORY {
            return Some(self.templates.iter().collect());
        }
        let category = self.category_by_slug(slug)?;
        Some(self.templates.iter()
            .filter(|t| t.category_id == Some(category.id))
            .collect())
    }

    pub fn popular(&self) -> Vec<&TemplateEntry> {
        self.templates.iter().filter(|t| t.popular).collect()
    }

    pub fn trending(&self) -> Vec<&TemplateEntry> {
        self.templates.iter().filter(|t| t.trending).collect()
    }
}


/// Error while building or loading a `Catalog`.
#[derive(Debug, Error)]
pub enum Error {
    #[error("duplicate category: {0}")]
    DuplicateCategory(String),
    #[error("duplicate template: {0}")]
    DuplicateTemplate(String),
    #[error("template `{0}` refers to unknown category #{1}")]
    UnknownCategory(String, u32),
    #[error("cannot read catalog: {0}")]
    Io(#[from] io::Error),
    #[error("invalid catalog JSON: {0}")]
    Json(serde_json::Error),
}


#[cfg(test)]
mod tests;
