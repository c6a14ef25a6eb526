use crate::error::Result;
use crate::html::{rename, shortcode_element, HtmlDocument};
use crate::shortcode::Shortcode;
use crate::text_utils::normalize_whitespace;
use crate::transform::replace_with;

fn is_allowed(content: &str, allowed: &[String]) -> bool {
    allowed.is_empty() || allowed.iter().any(|a| a.trim().eq_ignore_ascii_case(content))
}

/// `<kbd>CTRL+C</kbd>` becomes `{{< kbd "CTRL+C" >}}`. With a non-empty
/// allow list, anything else is rendered as inline code.
pub fn replace_kbd(doc: &HtmlDocument, allowed: &[String]) -> Result<()> {
    for kbd in doc.select("kbd")? {
        let content = normalize_whitespace(&kbd.text_contents()).trim().to_string();

        if is_allowed(&content, allowed) {
            let shortcode = Shortcode::new("kbd").positional(&content);
            replace_with(&kbd, shortcode_element("span", &shortcode));
        } else {
            rename(&kbd, "code");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn processed(html: &str, allowed: &[String]) -> String {
        let doc = HtmlDocument::parse(html);
        replace_kbd(&doc, allowed).unwrap();
        doc.to_html().unwrap()
    }

    #[test]
    fn test_kbd() {
        assert_eq!(processed("<p>Press <kbd>CTRL+C</kbd> to copy</p>", &[]),
                   "<p>Press <span>{{&lt; kbd \"CTRL+C\" &gt;}}</span> to copy</p>");
        assert_eq!(processed("<p><kbd>net   stop</kbd></p>", &[]),
                   "<p><span>{{&lt; kbd \"net stop\" &gt;}}</span></p>");
    }

    #[test]
    fn test_allow_list() {
        let allowed = vec!["Ctrl+C".to_string()];
        assert_eq!(processed("<p><kbd>CTRL+C</kbd> or <kbd>iisreset</kbd></p>", &allowed),
                   "<p><span>{{&lt; kbd \"CTRL+C\" &gt;}}</span> or <code>iisreset</code></p>");
    }
}
