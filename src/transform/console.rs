use kuchiki::NodeRef;

use crate::error::Result;
use crate::html::{has_descendant, is_element, new_element, new_text, normalize_child_text, rename, text_of, HtmlDocument};
use crate::shortcode::Shortcode;
use crate::transform::wrap_with_paragraphs;

const CONSOLE_BLOCK: &str = r#"div[class="consoleBlock"]"#;

fn last_element_child(node: &NodeRef) -> Option<NodeRef> {
    node.children().filter(|c| c.as_element().is_some()).last()
}

/// The `<br>` right after `node`, skipping whitespace.
fn following_break(node: &NodeRef) -> Option<NodeRef> {
    let mut next = node.next_sibling();
    while let Some(sibling) = next {
        if is_element(&sibling, "br") {
            return Some(sibling);
        }
        if !text_of(&sibling).is_some_and(|t| t.trim().is_empty()) {
            return None;
        }
        next = sibling.next_sibling();
    }
    None
}

/// Pre block at the end of `block` that commands are collected into.
fn command_block(block: &NodeRef) -> NodeRef {
    match last_element_child(block) {
        Some(pre) if is_element(&pre, "pre") => {
            pre.append(new_text("\n"));
            pre
        }
        _ => {
            let pre = new_element("pre", &[]);
            block.append(pre.clone());
            pre
        }
    }
}

/// Commands typed in a console block are moved into a single `<pre>` so the
/// block converts to a fenced code block. A lone command too long for one
/// line becomes a paragraph instead.
pub fn fold_console_kbd(doc: &HtmlDocument, wrap_threshold: usize) -> Result<()> {
    for block in doc.select(CONSOLE_BLOCK)? {
        let commands: Vec<NodeRef> = block.children().filter(|c| is_element(c, "kbd")).collect();

        if let [command] = commands.as_slice() {
            if command.text_contents().chars().count() > wrap_threshold {
                rename(command, "p");
                continue;
            }
        }

        for kbd in commands {
            if let Some(br) = following_break(&kbd) {
                br.detach();
            }

            let pre = command_block(&block);
            let code = rename(&kbd, "code");
            pre.append(code.clone());
            normalize_child_text(&code);
        }
    }
    Ok(())
}

/// Console blocks that did not fold into a code block are marked with
/// `console-block-start` and `console-block-end`.
pub fn mark_console_blocks(doc: &HtmlDocument) -> Result<()> {
    for block in doc.select(CONSOLE_BLOCK)? {
        if !has_descendant(&block, "p") && has_descendant(&block, "pre") {
            continue;
        }

        wrap_with_paragraphs(&block, &Shortcode::new("console-block-start"), &Shortcode::new("console-block-end"));
    }
    Ok(())
}
