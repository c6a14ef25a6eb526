use kuchiki::NodeRef;

use crate::config::Content;
use crate::error::Result;
use crate::html::{new_element, new_text, HtmlDocument};
use crate::link_mapper::LinkMapper;
use crate::shortcode::Shortcode;

pub mod callouts;
pub mod console;
pub mod figures;
pub mod formatting;
pub mod images;
pub mod keyboard;
pub mod links;
pub mod log_excerpt;
pub mod references;
pub mod samples;
pub mod strikethrough;
pub mod tables;
pub mod tags;
pub mod transport;

/// `<p>{{< shortcode >}}</p>`
pub fn shortcode_paragraph(shortcode: &Shortcode) -> NodeRef {
    let paragraph = new_element("p", &[]);
    paragraph.append(new_text(&shortcode.render()));
    paragraph
}

/// Surrounds `node` with paragraphs holding the `start` and `end` shortcodes.
pub fn wrap_with_paragraphs(node: &NodeRef, start: &Shortcode, end: &Shortcode) {
    node.insert_before(shortcode_paragraph(start));
    node.insert_after(shortcode_paragraph(end));
}

/// Surrounds `node` with `{{< name >}}` and `{{< /name >}}` paragraphs.
pub fn wrap_with_paired_shortcode(node: &NodeRef, name: &str) {
    wrap_with_paragraphs(node, &Shortcode::new(name), &Shortcode::closing(name));
}

pub fn replace_with(node: &NodeRef, replacement: NodeRef) {
    node.insert_before(replacement);
    node.detach();
}

/// Blog specific rewrites of a post body, in the order they must run.
pub fn preprocess(doc: &HtmlDocument, content: &Content, link_mapper: &LinkMapper) -> Result<()> {
    callouts::process_callouts(doc)?;
    console::fold_console_kbd(doc, content.kbd_wrap_threshold)?;
    console::mark_console_blocks(doc)?;
    strikethrough::process_line_through(doc)?;
    log_excerpt::process_log_excerpts(doc)?;
    keyboard::replace_kbd(doc, &content.allowed_kbd)?;
    links::rewrite_links(doc, link_mapper)?;
    tables::process_tables(doc)?;
    figures::replace_images(doc)?;
    references::replace_references(doc)?;
    samples::replace_samples(doc, &content.samp_as_kbd)?;
    Ok(())
}
