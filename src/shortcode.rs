use std::fmt::{Display, Formatter};

use crate::text_utils::{escape_quotes, normalize_whitespace};

/// Every Hugo shortcode starts with this.
pub const SHORTCODE_START: &str = "{{<";

/// Characters the HTML to Markdown converter would escape or interpret, with
/// the tokens they travel as. Tokens contain none of the characters, so
/// encoding twice is harmless.
const TRANSPORT_TOKENS: [(char, &str); 10] = [
    ('\\', "{{%5C}}"),
    ('_', "{{%5F}}"),
    ('*', "{{%2A}}"),
    ('[', "{{%5B}}"),
    (']', "{{%5D}}"),
    ('`', "{{%60}}"),
    ('<', "{{%3C}}"),
    ('>', "{{%3E}}"),
    ('~', "{{%7E}}"),
    ('\n', "{{%0A}}"),
];

/// Encodes text that must come out of the Markdown converter untouched.
pub fn encode_for_transport(text: &str) -> String {
    let mut res = String::with_capacity(text.len());
    for c in text.chars() {
        match TRANSPORT_TOKENS.iter().find(|(ch, _)| *ch == c) {
            Some((_, token)) => res.push_str(token),
            None => res.push(c),
        }
    }
    res
}

pub fn decode_after_conversion(markdown: &str) -> String {
    let mut res = markdown.to_string();
    for (c, token) in TRANSPORT_TOKENS.iter() {
        if res.contains(token) {
            res = res.replace(token, &c.to_string());
        }
    }
    res
}

fn encode_underscores(text: &str) -> String {
    text.replace('_', "{{%5F}}")
}

struct Param {
    name: Option<String>,
    value: String,
    forced: bool,
}

/// A Hugo shortcode such as `{{< figure src="..." alt="..." >}}`.
///
/// Named parameters are written before positional ones, each group in the
/// order it was added.
pub struct Shortcode {
    name: String,
    named: Vec<Param>,
    positional: Vec<Param>,
    separate_lines: bool,
}

impl Shortcode {
    pub fn new(name: &str) -> Shortcode {
        Shortcode {
            name: name.trim().to_string(),
            named: vec![],
            positional: vec![],
            separate_lines: false,
        }
    }

    /// Closing tag of a paired shortcode, e.g. `{{< /table >}}`.
    pub fn closing(name: &str) -> Shortcode {
        Shortcode::new(&format!("/{}", name.trim()))
    }

    /// Adds `name="value"`. Blank values are left out.
    pub fn param(mut self, name: &str, value: &str) -> Shortcode {
        self.named.push(Param { name: Some(name.to_string()), value: value.to_string(), forced: false });
        self
    }

    /// Adds `name="value"` even when the value is blank.
    pub fn forced_param(mut self, name: &str, value: &str) -> Shortcode {
        self.named.push(Param { name: Some(name.to_string()), value: value.to_string(), forced: true });
        self
    }

    pub fn opt_param(self, name: &str, value: Option<&str>) -> Shortcode {
        match value {
            Some(value) => self.param(name, value),
            None => self,
        }
    }

    /// Adds `"value"`. Blank values are left out.
    pub fn positional(mut self, value: &str) -> Shortcode {
        self.positional.push(Param { name: None, value: value.to_string(), forced: false });
        self
    }

    pub fn on_separate_lines(mut self) -> Shortcode {
        self.separate_lines = true;
        self
    }

    fn push_param(&self, buf: &mut String, param: &Param) {
        if !param.forced && param.value.trim().is_empty() {
            return;
        }

        let value = escape_quotes(&normalize_whitespace(&param.value));
        let value = encode_underscores(value.trim());

        match param.name {
            Some(ref name) => {
                buf.push_str(&format!(" {}=\"{}\"", name, value));
            }
            None => {
                buf.push_str(&format!(" \"{}\"", value));
            }
        }

        if self.separate_lines {
            buf.push('\n');
        }
    }

    pub fn render(&self) -> String {
        let mut buf = String::from(SHORTCODE_START);
        buf.push(' ');
        buf.push_str(&self.name);

        if self.separate_lines {
            buf.push('\n');
        }

        for param in self.named.iter().chain(self.positional.iter()) {
            self.push_param(&mut buf, param);
        }

        let trimmed_len = buf.trim_end().len();
        buf.truncate(trimmed_len);
        buf.push_str(" >}}");
        buf
    }
}

impl Display for Shortcode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_params() {
        assert_eq!(Shortcode::new("console-block-start").render(), "{{< console-block-start >}}");
        assert_eq!(Shortcode::closing("table").render(), "{{< /table >}}");
    }

    #[test]
    fn test_named_before_positional() {
        let shortcode = Shortcode::new("blockquote")
            .positional("font-italic")
            .param("class", "small");
        assert_eq!(shortcode.render(), r#"{{< blockquote class="small" "font-italic" >}}"#);
    }

    #[test]
    fn test_blank_values_are_omitted() {
        let shortcode = Shortcode::new("table")
            .param("class", "small")
            .param("caption", "  \r\n ")
            .opt_param("title", None)
            .positional("");
        assert_eq!(shortcode.render(), r#"{{< table class="small" >}}"#);

        let shortcode = Shortcode::new("figure").forced_param("alt", "");
        assert_eq!(shortcode.render(), r#"{{< figure alt="" >}}"#);
    }

    #[test]
    fn test_value_escaping() {
        let shortcode = Shortcode::new("reference")
            .param("title", " \"Access is denied\"\r\n   error   message ");
        assert_eq!(shortcode.render(), r#"{{< reference title="\"Access is denied\" error message" >}}"#);

        let shortcode = Shortcode::new("kbd").positional("WSS_WPG");
        assert_eq!(shortcode.render(), r#"{{< kbd "WSS{{%5F}}WPG" >}}"#);
    }

    #[test]
    fn test_separate_lines() {
        let shortcode = Shortcode::new("figure")
            .param("src", "https://assets.technologytoolbox.com/a.png")
            .param("alt", "Screenshot")
            .param("class", "")
            .on_separate_lines();
        assert_eq!(shortcode.render(),
                   "{{< figure\n src=\"https://assets.technologytoolbox.com/a.png\"\n alt=\"Screenshot\" >}}");
    }

    #[test]
    fn test_transport_encoding() {
        let text = "{{< kbd \"a_b*[c]`~\\\" >}}\nx";
        let encoded = encode_for_transport(text);
        for c in ['_', '*', '[', ']', '`', '~', '\\', '<', '>', '\n'] {
            assert!(!encoded.contains(c), "{} was not encoded", c);
        }
        assert_eq!(encode_for_transport(&encoded), encoded);
        assert_eq!(decode_after_conversion(&encoded), text);
    }

    /// Escapes the way Markdown converters usually do.
    fn lossy_convert(text: &str) -> String {
        text.replace('\\', "\\\\")
            .replace('_', "\\_")
            .replace('*', "\\*")
            .replace('<', "&lt;")
            .replace('\n', " ")
    }

    #[test]
    fn test_underscore_survives_conversion() {
        let shortcode = Shortcode::new("reference")
            .param("title", "...and the WSS_WPG Group")
            .param("linkHref", "http://example.com/some_page.aspx")
            .render();
        let encoded = encode_for_transport(&shortcode);
        let markdown = decode_after_conversion(&lossy_convert(&encoded));
        assert_eq!(markdown,
                   r#"{{< reference title="...and the WSS_WPG Group" linkHref="http://example.com/some_page.aspx" >}}"#);
    }
}
