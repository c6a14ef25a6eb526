use std::collections::HashMap;

use spdlog::debug;
use url::Url;

use crate::error::{ConvertError, Result};
use crate::url_converter::BlogUrlConverter;

/// Slug -> permalink table used to rewrite links between posts.
pub struct LinkMapper {
    converter: Box<dyn BlogUrlConverter>,
    permalinks: HashMap<String, Url>,
}

impl LinkMapper {
    pub fn new(converter: Box<dyn BlogUrlConverter>) -> LinkMapper {
        LinkMapper {
            converter,
            permalinks: HashMap::new(),
        }
    }

    /// Registers the post at `url`. Adding the same permalink twice is a no-op;
    /// a different permalink for a known slug fails.
    pub fn add(&mut self, url: &str) -> Result<()> {
        let slug = self.converter.slug(url)?;
        let permalink = self.converter.permalink(url)?;

        match self.permalinks.get(&slug) {
            Some(existing) if *existing == permalink => Ok(()),
            Some(existing) => Err(ConvertError::ConflictingSlug {
                slug,
                existing: existing.to_string(),
                conflicting: permalink.to_string(),
            }),
            None => {
                debug!("Mapping {} to {}", slug, permalink);
                self.permalinks.insert(slug, permalink);
                Ok(())
            }
        }
    }

    /// The registered permalink for the slug of `url`, or the permalink
    /// computed from `url` itself when the slug is unknown.
    pub fn permalink(&self, url: &str) -> Result<Url> {
        let slug = self.converter.slug(url)?;
        match self.permalinks.get(&slug) {
            Some(permalink) => Ok(permalink.clone()),
            None => self.converter.permalink(url),
        }
    }

    pub fn is_blog_url(&self, url: &str) -> Result<bool> {
        self.converter.is_blog_url(url)
    }

    pub fn len(&self) -> usize {
        self.permalinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.permalinks.is_empty()
    }
}
