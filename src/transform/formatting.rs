use kuchiki::NodeRef;

use crate::error::Result;
use crate::html::{ensure_whitespace_after, ensure_whitespace_before, has_descendant, normalize_child_text, set_text, text_of, HtmlDocument};

fn set_or_drop_text(node: &NodeRef, value: &str) {
    if value.is_empty() {
        node.detach();
    } else {
        set_text(node, value);
    }
}

/// Moves leading and trailing whitespace of `node`'s content next to it.
///
/// `...the<b> Advanced </b>button...` becomes `...the <b>Advanced</b> button...`.
/// An existing whitespace sibling is reused so no double space appears.
pub fn move_edge_whitespace_out(node: &NodeRef) {
    if let Some(first) = node.first_child() {
        if let Some(text) = text_of(&first) {
            let trimmed = text.trim_start();
            if trimmed.len() != text.len() {
                set_or_drop_text(&first, trimmed);
                ensure_whitespace_before(node);
            }
        }
    }

    if let Some(last) = node.last_child() {
        if let Some(text) = text_of(&last) {
            let trimmed = text.trim_end();
            if trimmed.len() != text.len() {
                set_or_drop_text(&last, trimmed);
                ensure_whitespace_after(node);
            }
        }
    }
}

fn fix_code_whitespace(doc: &HtmlDocument) -> Result<()> {
    for code in doc.select("p > code")? {
        move_edge_whitespace_out(&code);
    }

    for span in doc.select("p > code > span")? {
        move_edge_whitespace_out(&span);
        if let Some(code) = span.parent() {
            move_edge_whitespace_out(&code);
        }
    }
    Ok(())
}

/// Inner elements go first, so whitespace they push out is moved again by
/// the element around them.
fn fix_emphasis_whitespace(doc: &HtmlDocument) -> Result<()> {
    for node in doc.select("b, em, i, strong")?.iter().rev() {
        move_edge_whitespace_out(node);
    }
    Ok(())
}

/// Cells with only inline content get their whitespace collapsed, so line
/// breaks in the source do not break the Markdown table.
fn normalize_table_cells(doc: &HtmlDocument) -> Result<()> {
    for td in doc.select("td")? {
        if ["br", "ol", "ul"].iter().any(|name| has_descendant(&td, name)) {
            continue;
        }
        normalize_child_text(&td);
    }
    Ok(())
}

pub fn fix_formatting(doc: &HtmlDocument) -> Result<()> {
    fix_code_whitespace(doc)?;
    fix_emphasis_whitespace(doc)?;
    normalize_table_cells(doc)?;
    Ok(())
}
