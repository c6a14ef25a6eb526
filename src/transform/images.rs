use spdlog::debug;

use crate::error::Result;
use crate::html::{attr, set_attr, HtmlDocument};
use crate::image_mapper::ImageUrlMapper;

fn replace_attribute(doc: &HtmlDocument, selector: &'static str, name: &str, mapper: &ImageUrlMapper) -> Result<()> {
    for node in doc.select(selector)? {
        let Some(url) = attr(&node, name) else {
            continue;
        };
        if !mapper.is_mapped(&url) {
            continue;
        }

        let mapped = mapper.mapped_url(&url)?;
        debug!("Replacing image URL {} with {}", url, mapped);
        set_attr(&node, name, mapped.as_str());
    }
    Ok(())
}

/// Points images, and links to full size images, at the asset host.
pub fn replace_image_urls(doc: &HtmlDocument, mapper: &ImageUrlMapper) -> Result<()> {
    replace_attribute(doc, "img[src]", "src", mapper)?;
    replace_attribute(doc, "a[href]", "href", mapper)?;
    Ok(())
}
