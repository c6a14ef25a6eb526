use spdlog::warn;

use crate::error::Result;
use crate::html::{attr, remove_indentation, select_in, shortcode_element, HtmlDocument};
use crate::shortcode::Shortcode;

/// Reference blocks (a cited title followed by a link) become `reference`
/// shortcodes. The link text is kept only when it differs from the URL.
pub fn replace_references(doc: &HtmlDocument) -> Result<()> {
    for reference in doc.select(r#"div[class="reference"]"#)? {
        let Some(cite) = select_in(&reference, "cite")?.into_iter().next() else {
            continue;
        };

        let Some(link) = select_in(&reference, r#"div[class="referenceLink"] > a"#)?.into_iter().next() else {
            warn!("Reference without link: {}", reference.text_contents().trim());
            continue;
        };

        let href = attr(&link, "href").unwrap_or_default();
        let link_text = link.text_contents().trim().to_string();

        let mut shortcode = Shortcode::new("reference")
            .param("title", &cite.text_contents())
            .param("linkHref", &href);
        if link_text != href {
            shortcode = shortcode.param("linkText", &link_text);
        }

        remove_indentation(&reference);
        remove_indentation(&cite);
        remove_indentation(&link);

        cite.insert_before(shortcode_element("div", &shortcode));
        cite.detach();
        link.detach();
    }
    Ok(())
}
