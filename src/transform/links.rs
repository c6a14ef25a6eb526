use spdlog::{debug, warn};

use crate::error::Result;
use crate::html::{attr, set_attr, HtmlDocument};
use crate::link_mapper::LinkMapper;
use crate::url_converter::path_and_query;

/// Points links to other posts at their new permalinks. Links that cannot
/// be parsed are left alone.
pub fn rewrite_links(doc: &HtmlDocument, link_mapper: &LinkMapper) -> Result<()> {
    for link in doc.select("a[href]")? {
        let Some(href) = attr(&link, "href") else {
            continue;
        };

        match link_mapper.is_blog_url(&href) {
            Ok(true) => {}
            Ok(false) => continue,
            Err(e) => {
                warn!("Skipping link {}: {}", href, e);
                continue;
            }
        }

        match link_mapper.permalink(&href) {
            Ok(permalink) => {
                let new_href = path_and_query(&permalink);
                debug!("Rewriting link {} to {}", href, new_href);
                set_attr(&link, "href", &new_href);
            }
            Err(e) => warn!("Skipping link {}: {}", href, e),
        }
    }
    Ok(())
}
