use std::collections::HashMap;

use url::Url;

use crate::config::Images;
use crate::error::{ConvertError, Result};

/// Maps legacy image URLs to their location on the asset host.
pub struct ImageUrlMapper {
    old_host: String,
    base: Url,
    mappings: HashMap<String, Url>,
}

impl ImageUrlMapper {
    pub fn new(images: &Images) -> Result<ImageUrlMapper> {
        let base_str = format!("https://{}/", images.old_host);
        let base = Url::parse(&base_str)
            .map_err(|source| ConvertError::InvalidUrl { url: base_str, source })?;

        let old_base = images.old_base_path.trim_end_matches('/');
        let new_base = images.new_base_path.trim_end_matches('/');

        let mut mappings = HashMap::new();
        for (old_path, new_path) in &images.mappings {
            let key = format!("{}/{}", old_base, old_path.trim_start_matches('/'));
            let new_url = format!("https://{}{}/{}", images.new_host, new_base, new_path.trim_start_matches('/'));
            let new_url = Url::parse(&new_url)
                .map_err(|source| ConvertError::InvalidUrl { url: new_url, source })?;
            mappings.insert(key, new_url);
        }

        Ok(ImageUrlMapper {
            old_host: images.old_host.to_ascii_lowercase(),
            base,
            mappings,
        })
    }

    fn relative_url(&self, url: &str) -> Result<String> {
        let resolved = self.base.join(url.trim())
            .map_err(|source| ConvertError::InvalidUrl { url: url.to_string(), source })?;

        if resolved.host_str() != Some(self.old_host.as_str()) {
            return Err(ConvertError::HostMismatch { url: url.to_string(), expected: self.old_host.clone() });
        }

        Ok(match resolved.query() {
            Some(query) => format!("{}?{}", resolved.path(), query),
            None => resolved.path().to_string(),
        })
    }

    /// URLs on other hosts or that cannot be parsed are never mapped.
    pub fn is_mapped(&self, url: &str) -> bool {
        match self.relative_url(url) {
            Ok(relative) => self.mappings.contains_key(&relative),
            Err(_) => false,
        }
    }

    pub fn mapped_url(&self, url: &str) -> Result<Url> {
        let relative = self.relative_url(url)?;
        self.mappings.get(&relative)
            .cloned()
            .ok_or_else(|| ConvertError::UnmappedUrl(url.to_string()))
    }
}
