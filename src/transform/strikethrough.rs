use crate::error::Result;
use crate::html::{is_element, new_text, HtmlDocument};
use crate::shortcode::encode_for_transport;
use crate::transform::wrap_with_paired_shortcode;

/// Struck-through spans become `~~text~~`. Any other struck-through element
/// is wrapped in a `deleted-block` shortcode.
pub fn process_line_through(doc: &HtmlDocument) -> Result<()> {
    let marker = encode_for_transport("~~");

    for node in doc.select(r#"[style*="line-through"]"#)? {
        if is_element(&node, "span") {
            node.insert_before(new_text(&marker));
            node.insert_after(new_text(&marker));
        } else {
            wrap_with_paired_shortcode(&node, "deleted-block");
        }
    }
    Ok(())
}
