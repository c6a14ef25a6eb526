use crate::error::Result;
use crate::html::{is_element, shortcode_element, HtmlDocument};
use crate::shortcode::Shortcode;

/// Tables are wrapped in a `table` shortcode carrying the table caption.
pub fn process_tables(doc: &HtmlDocument) -> Result<()> {
    for table in doc.select("table")? {
        let caption = table.children().find(|c| is_element(c, "caption"));
        let caption_text = caption.as_ref()
            .map(|c| c.text_contents().trim().to_string())
            .unwrap_or_default();
        if let Some(caption) = caption {
            caption.detach();
        }

        let start = Shortcode::new("table")
            .param("class", "small")
            .param("caption", &caption_text);
        table.insert_before(shortcode_element("div", &start));
        table.insert_after(shortcode_element("div", &Shortcode::closing("table")));
    }
    Ok(())
}
