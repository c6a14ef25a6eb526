use html5ever::{namespace_url, ns, LocalName, QualName};
use kuchiki::traits::*;
use kuchiki::{Attribute, ExpandedName, NodeRef};

use crate::error::{ConvertError, Result};
use crate::shortcode::Shortcode;
use crate::text_utils::normalize_whitespace;

/// Body of a post, parsed into a mutable tree.
pub struct HtmlDocument {
    document: NodeRef,
}

impl HtmlDocument {
    pub fn parse(html: &str) -> HtmlDocument {
        HtmlDocument {
            document: kuchiki::parse_html().one(html),
        }
    }

    /// The `<body>` element, or the document itself if the parser produced none.
    pub fn body(&self) -> NodeRef {
        match self.document.select_first("body") {
            Ok(body) => body.as_node().clone(),
            Err(_) => self.document.clone(),
        }
    }

    /// Matching elements in document order. The result is collected so the
    /// tree can be changed while walking it.
    pub fn select(&self, selector: &'static str) -> Result<Vec<NodeRef>> {
        select_in(&self.body(), selector)
    }

    pub fn select_first(&self, selector: &'static str) -> Result<Option<NodeRef>> {
        Ok(self.select(selector)?.into_iter().next())
    }

    /// Serializes the content of `<body>`.
    pub fn to_html(&self) -> Result<String> {
        inner_html(&self.body())
    }
}

/// Serializes the children of `node`.
pub fn inner_html(node: &NodeRef) -> Result<String> {
    let mut buf = Vec::new();
    for child in node.children() {
        child.serialize(&mut buf)?;
    }
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

pub fn select_in(node: &NodeRef, selector: &'static str) -> Result<Vec<NodeRef>> {
    let matches = node.select(selector)
        .map_err(|_| ConvertError::Selector(selector))?;
    Ok(matches.map(|element| element.as_node().clone()).collect())
}

fn qual_name(name: &str) -> QualName {
    QualName::new(None, ns!(html), LocalName::from(name))
}

pub fn new_element(name: &str, attributes: &[(&str, &str)]) -> NodeRef {
    let attributes = attributes.iter().map(|(name, value)| {
        (ExpandedName::new("", *name), Attribute { prefix: None, value: value.to_string() })
    });
    NodeRef::new_element(qual_name(name), attributes)
}

pub fn new_text(text: &str) -> NodeRef {
    NodeRef::new_text(text)
}

/// `<wrapper>{{< shortcode >}}</wrapper>`
pub fn shortcode_element(wrapper: &str, shortcode: &Shortcode) -> NodeRef {
    let element = new_element(wrapper, &[]);
    element.append(new_text(&shortcode.render()));
    element
}

pub fn tag_name(node: &NodeRef) -> Option<String> {
    node.as_element().map(|e| e.name.local.to_string())
}

pub fn is_element(node: &NodeRef, name: &str) -> bool {
    node.as_element().is_some_and(|e| e.name.local.as_ref() == name)
}

pub fn attr(node: &NodeRef, name: &str) -> Option<String> {
    let element = node.as_element()?;
    let attributes = element.attributes.borrow();
    attributes.get(name).map(|value| value.to_string())
}

pub fn set_attr(node: &NodeRef, name: &str, value: &str) {
    if let Some(element) = node.as_element() {
        element.attributes.borrow_mut().insert(name, value.to_string());
    }
}

/// Content of a text node.
pub fn text_of(node: &NodeRef) -> Option<String> {
    node.as_text().map(|text| text.borrow().clone())
}

pub fn set_text(node: &NodeRef, value: &str) {
    if let Some(text) = node.as_text() {
        *text.borrow_mut() = value.to_string();
    }
}

/// Replaces `node` by an element called `name` with the same attributes and children.
pub fn rename(node: &NodeRef, name: &str) -> NodeRef {
    let Some(element) = node.as_element() else {
        return node.clone();
    };

    let attributes: Vec<(ExpandedName, Attribute)> = element.attributes.borrow().map
        .iter()
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect();
    let renamed = NodeRef::new_element(qual_name(name), attributes);

    for child in node.children().collect::<Vec<_>>() {
        renamed.append(child);
    }
    node.insert_before(renamed.clone());
    node.detach();
    renamed
}

pub fn has_descendant(node: &NodeRef, name: &str) -> bool {
    node.descendants().any(|d| is_element(&d, name))
}

pub fn has_ancestor(node: &NodeRef, name: &str) -> bool {
    node.ancestors().any(|a| is_element(&a, name))
}

/// Collapses line breaks, tabs and space runs in the direct text children of `node`.
pub fn normalize_child_text(node: &NodeRef) {
    for child in node.children() {
        if let Some(text) = text_of(&child) {
            set_text(&child, &normalize_whitespace(&text));
        }
    }
}

/// Removes the whitespace-only text node right before `node`, if any.
pub fn remove_indentation(node: &NodeRef) {
    if let Some(previous) = node.previous_sibling() {
        if text_of(&previous).is_some_and(|t| t.trim().is_empty()) {
            previous.detach();
        }
    }
}

/// Makes sure a whitespace character separates `node` from what precedes it.
pub fn ensure_whitespace_before(node: &NodeRef) {
    let has_whitespace = node.previous_sibling()
        .and_then(|previous| text_of(&previous))
        .is_some_and(|t| t.ends_with(char::is_whitespace));

    if !has_whitespace {
        node.insert_before(new_text(" "));
    }
}

/// Makes sure a whitespace character separates `node` from what follows it.
pub fn ensure_whitespace_after(node: &NodeRef) {
    let has_whitespace = node.next_sibling()
        .and_then(|next| text_of(&next))
        .is_some_and(|t| t.starts_with(char::is_whitespace));

    if !has_whitespace {
        node.insert_after(new_text(" "));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_serialize() {
        let html = r#"<p class="intro">Hello <b>World</b></p><div>x</div>"#;
        let doc = HtmlDocument::parse(html);
        assert_eq!(doc.to_html().unwrap(), html);
    }

    #[test]
    fn test_select() {
        let doc = HtmlDocument::parse(r#"<div class="consoleBlock"><kbd>a</kbd></div><kbd>b</kbd>"#);
        let kbds = doc.select(r#"div[class="consoleBlock"] > kbd"#).unwrap();
        assert_eq!(kbds.len(), 1);
        assert_eq!(kbds[0].text_contents(), "a");
        assert!(doc.select("div[").is_err());
    }

    #[test]
    fn test_rename() {
        let doc = HtmlDocument::parse(r#"<blockquote class="directQuote">Some <i>text</i></blockquote>"#);
        let blockquote = doc.select_first("blockquote").unwrap().unwrap();
        let div = rename(&blockquote, "div");
        assert_eq!(tag_name(&div).as_deref(), Some("div"));
        assert_eq!(doc.to_html().unwrap(), r#"<div class="directQuote">Some <i>text</i></div>"#);
    }

    #[test]
    fn test_new_element() {
        let doc = HtmlDocument::parse("<p>x</p>");
        let p = doc.select_first("p").unwrap().unwrap();
        let code = new_element("code", &[("class", "small")]);
        code.append(new_text("a < b"));
        p.append(code);
        assert_eq!(doc.to_html().unwrap(), r#"<p>x<code class="small">a &lt; b</code></p>"#);
    }

    #[test]
    fn test_attributes() {
        let doc = HtmlDocument::parse(r#"<a class="one two" href="/x">x</a>"#);
        let a = doc.select_first("a").unwrap().unwrap();
        assert_eq!(attr(&a, "class").as_deref(), Some("one two"));
        set_attr(&a, "href", "/y");
        assert_eq!(attr(&a, "href").as_deref(), Some("/y"));
        assert!(attr(&a, "title").is_none());
    }

    #[test]
    fn test_ensure_whitespace() {
        let doc = HtmlDocument::parse("<p>click the<b>Advanced</b> button</p>");
        let b = doc.select_first("b").unwrap().unwrap();
        ensure_whitespace_before(&b);
        ensure_whitespace_after(&b);
        assert_eq!(doc.to_html().unwrap(), "<p>click the <b>Advanced</b> button</p>");
    }

    #[test]
    fn test_normalize_child_text() {
        let doc = HtmlDocument::parse("<p>Some     <i>cool  stuff</i>\n\t  here</p>");
        let p = doc.select_first("p").unwrap().unwrap();
        normalize_child_text(&p);
        assert_eq!(doc.to_html().unwrap(), "<p>Some <i>cool  stuff</i> here</p>");
    }
}
