use kuchiki::NodeRef;

use crate::error::Result;
use crate::html::{attr, has_ancestor, has_descendant, is_element, new_text, rename, select_in, set_text, shortcode_element, text_of, HtmlDocument};
use crate::shortcode::{encode_for_transport, Shortcode};
use crate::text_utils::normalize_whitespace;
use crate::transform::{replace_with, wrap_with_paired_shortcode};

fn in_log_excerpt(node: &NodeRef) -> bool {
    node.ancestors()
        .find(|a| is_element(a, "div"))
        .is_some_and(|div| attr(&div, "class").as_deref() == Some("logExcerpt"))
}

/// Replaces each `<br>` with a Markdown hard break.
fn replace_line_breaks(node: &NodeRef) -> Result<()> {
    let hard_break = encode_for_transport("\\\n");

    for br in select_in(node, "br")? {
        if let Some(next) = br.next_sibling() {
            if let Some(text) = text_of(&next) {
                set_text(&next, text.trim_start());
            }
        }
        replace_with(&br, new_text(&hard_break));
    }
    Ok(())
}

/// `<samp>` elements: commands mistakenly authored as sample output become
/// `kbd` shortcodes, single lines become `sample-output` shortcodes and
/// multi-line output becomes a `sample-block`.
pub fn replace_samples(doc: &HtmlDocument, samp_as_kbd: &[String]) -> Result<()> {
    for samp in doc.select("samp")? {
        let text = samp.text_contents();
        let content = normalize_whitespace(&text).trim().to_string();

        if samp_as_kbd.iter().any(|kbd| *kbd == content) {
            let shortcode = Shortcode::new("kbd").positional(&content);
            replace_with(&samp, shortcode_element("span", &shortcode));
            continue;
        }

        if !text.contains('\n') && !has_descendant(&samp, "br") {
            let shortcode = Shortcode::new("sample-output").positional(&content);
            replace_with(&samp, shortcode_element("span", &shortcode));
            continue;
        }

        if has_ancestor(&samp, "pre") || in_log_excerpt(&samp) {
            continue;
        }

        wrap_with_paired_shortcode(&samp, "sample-block");
        let paragraph = rename(&samp, "p");
        replace_line_breaks(&paragraph)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::config::Content;
    use crate::shortcode::decode_after_conversion;

    use super::*;

    fn processed(html: &str) -> String {
        let doc = HtmlDocument::parse(html);
        replace_samples(&doc, &Content::default().samp_as_kbd).unwrap();
        decode_after_conversion(&doc.to_html().unwrap())
    }

    #[test]
    fn test_command_as_kbd() {
        assert_eq!(processed("<p>Run <samp>stsadm.exe -o   deleteweb</samp></p>"),
                   "<p>Run <span>{{&lt; kbd \"stsadm.exe -o deleteweb\" &gt;}}</span></p>");
    }

    #[test]
    fn test_sample_output() {
        assert_eq!(processed("<p>The output is <samp>Success</samp>.</p>"),
                   "<p>The output is <span>{{&lt; sample-output \"Success\" &gt;}}</span>.</p>");
    }

    #[test]
    fn test_sample_block() {
        assert_eq!(processed("<div><samp>Line one<br>\n  Line two</samp></div>"),
                   "<div><p>{{&lt; sample-block &gt;}}</p><p>Line one\\\nLine two</p><p>{{&lt; /sample-block &gt;}}</p></div>");
    }

    #[test]
    fn test_multi_line_in_pre_or_log_excerpt() {
        let html = "<pre><samp>a\nb</samp></pre>";
        assert_eq!(processed(html), html);

        let html = "<div class=\"logExcerpt\"><samp>a<br>b</samp></div>";
        assert_eq!(processed(html), html);
    }
}
