use kuchiki::NodeRef;

use crate::error::Result;
use crate::html::{attr, is_element, new_element, new_text, normalize_child_text, rename, shortcode_element, HtmlDocument};
use crate::shortcode::Shortcode;

const BLOCK_ELEMENTS: [&str; 12] = ["blockquote", "div", "dl", "h1", "h2", "h3", "h4", "ol", "p", "pre", "table", "ul"];

/// `<blockquote class="directQuote">` becomes a `blockquote` shortcode pair
/// around a plain `<div>`. Error messages are rendered in red.
fn process_direct_quotes(doc: &HtmlDocument) -> Result<()> {
    for blockquote in doc.select("blockquote[class^=directQuote]")? {
        normalize_child_text(&blockquote);

        let mut css = String::from("font-italic");
        if attr(&blockquote, "class").is_some_and(|c| c.contains("errorMessage")) {
            css.push_str(" text-danger");
        }

        blockquote.insert_before(shortcode_element("div", &Shortcode::new("blockquote").positional(&css)));
        blockquote.insert_before(new_text("\n"));
        blockquote.insert_after(shortcode_element("div", &Shortcode::closing("blockquote")));
        blockquote.insert_after(new_text("\n"));

        rename(&blockquote, "div");
    }
    Ok(())
}

fn has_block_child(node: &NodeRef) -> bool {
    node.children().any(|child| BLOCK_ELEMENTS.iter().any(|name| is_element(&child, name)))
}

/// Note bodies holding only inline content get a paragraph, so the text
/// ends up inside the blockquote the converter produces.
fn process_notes(doc: &HtmlDocument) -> Result<()> {
    for body in doc.select("blockquote[class^=note] > div.noteBody")? {
        if has_block_child(&body) {
            continue;
        }

        normalize_child_text(&body);
        let paragraph = new_element("p", &[]);
        for child in body.children().collect::<Vec<_>>() {
            paragraph.append(child);
        }
        body.append(paragraph);
    }
    Ok(())
}

pub fn process_callouts(doc: &HtmlDocument) -> Result<()> {
    process_direct_quotes(doc)?;
    process_notes(doc)?;
    Ok(())
}
