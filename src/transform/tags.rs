use kuchiki::NodeRef;

use crate::error::Result;
use crate::html::{is_element, select_in, HtmlDocument};
use crate::text_utils::normalize_whitespace;

/// The "Tags" heading some posts end with, and the list of tag links below it.
pub struct TagsSection {
    heading: NodeRef,
    list: NodeRef,
}

impl TagsSection {
    pub fn find(doc: &HtmlDocument) -> Result<Option<TagsSection>> {
        let heading = doc.select("h3")?
            .into_iter()
            .find(|h3| normalize_whitespace(&h3.text_contents()).trim() == "Tags");
        let Some(heading) = heading else {
            return Ok(None);
        };

        let list = heading.following_siblings().find(|sibling| is_element(sibling, "ul"));
        Ok(list.map(|list| TagsSection { heading, list }))
    }

    pub fn tags(&self) -> Result<Vec<String>> {
        let links = select_in(&self.list, "li > a")?;
        Ok(links.iter()
            .map(|a| normalize_whitespace(&a.text_contents()).trim().to_string())
            .filter(|tag| !tag.is_empty())
            .collect())
    }

    pub fn remove(self) {
        self.list.detach();
        self.heading.detach();
    }
}

/// Removes the in-content tags block, returning the tags it listed.
pub fn remove_tags_section(doc: &HtmlDocument) -> Result<Vec<String>> {
    match TagsSection::find(doc)? {
        Some(section) => {
            let tags = section.tags()?;
            section.remove();
            Ok(tags)
        }
        None => Ok(vec![]),
    }
}
