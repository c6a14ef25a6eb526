use kuchiki::NodeRef;

use crate::error::Result;
use crate::html::{has_descendant, is_element, new_element, set_text, text_of, HtmlDocument};
use crate::shortcode::encode_for_transport;
use crate::text_utils::normalize_whitespace;
use crate::transform::wrap_with_paired_shortcode;

/// Lines separated by `<br>` keep their breaks as Markdown hard breaks.
fn mark_line_breaks(paragraph: &NodeRef) {
    let hard_break = encode_for_transport("\\");
    let mut after_break = false;

    for child in paragraph.children() {
        match text_of(&child) {
            Some(text) => {
                let mut text = normalize_whitespace(&text);
                if after_break {
                    text = text.trim_start().to_string();
                }
                if child.next_sibling().is_some_and(|next| is_element(&next, "br")) {
                    text = format!("{}{}", text.trim_end(), hard_break);
                }
                set_text(&child, &text);
                after_break = false;
            }
            None => after_break = is_element(&child, "br"),
        }
    }
}

/// Log excerpts are wrapped in a `log-excerpt` shortcode. Loose lines are
/// gathered into a paragraph first.
pub fn process_log_excerpts(doc: &HtmlDocument) -> Result<()> {
    for excerpt in doc.select(r#"div[class*="logExcerpt"]"#)? {
        if !has_descendant(&excerpt, "p") && !has_descendant(&excerpt, "pre") {
            let paragraph = new_element("p", &[]);
            for child in excerpt.children().collect::<Vec<_>>() {
                paragraph.append(child);
            }
            excerpt.append(paragraph.clone());
            mark_line_breaks(&paragraph);
        }

        wrap_with_paired_shortcode(&excerpt, "log-excerpt");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::shortcode::decode_after_conversion;

    use super::*;

    fn processed(html: &str) -> String {
        let doc = HtmlDocument::parse(html);
        process_log_excerpts(&doc).unwrap();
        decode_after_conversion(&doc.to_html().unwrap())
    }

    #[test]
    fn test_loose_lines() {
        let html = "<div class=\"logExcerpt\">Event ID: 6398\n  <br>\n   The Execute method failed.</div>";
        assert_eq!(processed(html),
                   "<p>{{&lt; log-excerpt &gt;}}</p>\
                    <div class=\"logExcerpt\"><p>Event ID: 6398\\<br>The Execute method failed.</p></div>\
                    <p>{{&lt; /log-excerpt &gt;}}</p>");
    }

    #[test]
    fn test_paragraphs_are_kept() {
        let html = "<div class=\"logExcerpt\"><p>Line</p></div>";
        assert_eq!(processed(html),
                   "<p>{{&lt; log-excerpt &gt;}}</p><div class=\"logExcerpt\"><p>Line</p></div><p>{{&lt; /log-excerpt &gt;}}</p>");
    }
}
