use crate::html::{set_text, text_of, HtmlDocument};
use crate::shortcode::{encode_for_transport, SHORTCODE_START};

/// Encodes every text node holding a shortcode so the Markdown converter
/// passes it through verbatim.
pub fn encode_shortcodes(doc: &HtmlDocument) -> usize {
    let mut count = 0;
    for node in doc.body().descendants() {
        let Some(text) = text_of(&node) else {
            continue;
        };
        if text.contains(SHORTCODE_START) {
            set_text(&node, &encode_for_transport(&text));
            count += 1;
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_shortcodes() {
        let doc = HtmlDocument::parse("<p>{{&lt; kbd \"A_B\" &gt;}}</p><p>plain_text</p>");
        assert_eq!(encode_shortcodes(&doc), 1);
        assert_eq!(doc.to_html().unwrap(),
                   "<p>{{{{%3C}} kbd \"A{{%5F}}B\" {{%3E}}}}</p><p>plain_text</p>");
    }
}
