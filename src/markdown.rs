use htmd::options::{CodeBlockFence, CodeBlockStyle, HeadingStyle, Options};
use htmd::HtmlToMarkdown;
use kuchiki::NodeRef;
use lazy_static::lazy_static;
use regex::Regex;

use crate::error::Result;
use crate::html::{has_ancestor, inner_html, is_element, new_element, new_text, select_in, text_of, HtmlDocument};
use crate::shortcode::decode_after_conversion;

const TABLE_MARKER: &str = "markdowntable";

/// Turns an HTML fragment into Markdown.
pub trait MarkdownConverter {
    fn convert(&self, html: &str) -> Result<String>;
}

pub struct HtmdConverter {
    converter: HtmlToMarkdown,
}

impl HtmdConverter {
    pub fn new() -> HtmdConverter {
        let converter = HtmlToMarkdown::builder()
            .skip_tags(vec!["script", "style"])
            .options(Options {
                heading_style: HeadingStyle::Atx,
                code_block_style: CodeBlockStyle::Fenced,
                code_block_fence: CodeBlockFence::Backticks,
                ..Default::default()
            })
            .build();
        HtmdConverter { converter }
    }
}

impl Default for HtmdConverter {
    fn default() -> Self {
        HtmdConverter::new()
    }
}

/// Text of a preformatted block, `<br>` read as a line break.
fn preformatted_text(pre: &NodeRef) -> String {
    let mut text = String::new();
    for node in pre.descendants() {
        if let Some(t) = text_of(&node) {
            text.push_str(&t);
        } else if is_element(&node, "br") {
            text.push('\n');
        }
    }
    text
}

/// A `<pre>` holding anything but a single `<code>` is rebuilt around one
/// `<code>` with its text, so it becomes one fenced block.
fn merge_preformatted(doc: &HtmlDocument) -> Result<()> {
    for pre in doc.select("pre")? {
        let elements: Vec<NodeRef> = pre.children().filter(|c| c.as_element().is_some()).collect();
        match elements.as_slice() {
            [] => continue,
            [code] if is_element(code, "code") => continue,
            _ => {}
        }

        let text = preformatted_text(&pre);
        for child in pre.children().collect::<Vec<_>>() {
            child.detach();
        }
        let code = new_element("code", &[]);
        code.append(new_text(&text));
        pre.append(code);
    }
    Ok(())
}

/// Escapes `|` unless the converter already did.
fn escape_pipes(text: &str) -> String {
    let mut res = String::with_capacity(text.len());
    let mut previous = None;
    for c in text.chars() {
        if c == '|' && previous != Some('\\') {
            res.push('\\');
        }
        res.push(c);
        previous = Some(c);
    }
    res
}

fn table_row(cells: &[String]) -> String {
    format!("| {} |", cells.join(" | "))
}

/// Rows of `table`, leaving out those of nested tables.
fn table_rows(table: &NodeRef) -> Result<Vec<NodeRef>> {
    Ok(select_in(table, "tr")?
        .into_iter()
        .filter(|row| row.ancestors().find(|a| is_element(a, "table")).is_some_and(|t| t == *table))
        .collect())
}

impl HtmdConverter {
    /// Cell content on a single line, line breaks kept as `<br>`.
    fn cell_markdown(&self, cell: &NodeRef) -> Result<String> {
        let markdown = self.converter.convert(&inner_html(cell)?)?;
        let lines: Vec<&str> = markdown.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        Ok(escape_pipes(&lines.join("<br>")))
    }

    /// GitHub flavored pipe table. The first row is the header.
    fn table_markdown(&self, table: &NodeRef) -> Result<String> {
        let mut rows = Vec::new();
        for row in table_rows(table)? {
            let cells = row.children()
                .filter(|c| is_element(c, "td") || is_element(c, "th"))
                .map(|cell| self.cell_markdown(&cell))
                .collect::<Result<Vec<_>>>()?;
            rows.push(cells);
        }

        let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
        if columns == 0 {
            return Ok(String::new());
        }
        for row in rows.iter_mut() {
            row.resize(columns, String::new());
        }

        let mut lines = vec![table_row(&rows[0]), table_row(&vec!["---".to_string(); columns])];
        lines.extend(rows[1..].iter().map(|row| table_row(row)));
        Ok(lines.join("\n"))
    }

    /// Swaps each outermost table for a marker paragraph. Returns the
    /// markers with the Markdown they stand for.
    fn extract_tables(&self, doc: &HtmlDocument) -> Result<Vec<(String, String)>> {
        let mut tables = Vec::new();
        for table in doc.select("table")? {
            if has_ancestor(&table, "table") {
                continue;
            }
            let marker = format!("{}{}", TABLE_MARKER, tables.len());
            let markdown = self.table_markdown(&table)?;

            let paragraph = new_element("p", &[]);
            paragraph.append(new_text(&marker));
            table.insert_before(paragraph);
            table.detach();
            tables.push((marker, markdown));
        }
        Ok(tables)
    }
}

fn restore_tables(markdown: &str, tables: &[(String, String)]) -> String {
    if tables.is_empty() {
        return markdown.to_string();
    }
    markdown.lines()
        .map(|line| {
            let marker = line.trim();
            tables.iter()
                .find(|(m, _)| m == marker)
                .map_or(line, |(_, table)| table.as_str())
        })
        .collect::<Vec<_>>()
        .join("\n")
}

impl MarkdownConverter for HtmdConverter {
    fn convert(&self, html: &str) -> Result<String> {
        let doc = HtmlDocument::parse(html);
        merge_preformatted(&doc)?;
        let tables = self.extract_tables(&doc)?;
        let markdown = self.converter.convert(&doc.to_html()?)?;
        Ok(restore_tables(&markdown, &tables))
    }
}

fn is_fence(line: &str) -> bool {
    let line = line.trim_start();
    line.starts_with("```") || line.starts_with("~~~")
}

/// Blank blockquote lines keep a trailing space after conversion (`> `).
fn fix_blank_quote_lines(markdown: &str) -> String {
    lazy_static! {
        static ref BLANK_QUOTE_LINE: Regex = Regex::new(r"(?m)^((?:> ?)*>)[ \t]+$").unwrap();
    }
    BLANK_QUOTE_LINE.replace_all(markdown, "$1").into_owned()
}

/// Cleans up converter output:
/// * decodes transport tokens
/// * uses `\n` line endings
/// * turns trailing double-space hard breaks into `\` and drops other trailing whitespace
/// * keeps at most one blank line in a row
/// * ends with exactly one newline
///
/// Fenced code blocks are left as they are.
pub fn normalize_markdown(markdown: &str) -> String {
    let markdown = decode_after_conversion(markdown).replace("\r\n", "\n");
    let markdown = fix_blank_quote_lines(&markdown);

    let lines: Vec<&str> = markdown.lines().collect();
    let mut res: Vec<String> = Vec::with_capacity(lines.len());
    let mut in_fence = false;

    for (i, line) in lines.iter().enumerate() {
        if is_fence(line) {
            in_fence = !in_fence;
            res.push(line.trim_end().to_string());
            continue;
        }
        if in_fence {
            res.push(line.to_string());
            continue;
        }

        let trimmed = line.trim_end();
        if trimmed.is_empty() {
            if res.last().is_some_and(|last| !last.is_empty()) {
                res.push(String::new());
            }
            continue;
        }

        let next_has_text = lines.get(i + 1).is_some_and(|next| !next.trim().is_empty());
        if line.ends_with("  ") && next_has_text && !trimmed.ends_with('\\') {
            res.push(format!("{}\\", trimmed));
        } else {
            res.push(trimmed.to_string());
        }
    }

    while res.last().is_some_and(|last| last.is_empty()) {
        res.pop();
    }

    let mut out = res.join("\n");
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        let md = "\n\nFirst line  \r\nsecond line   \r\n\r\n\r\n\r\nNext  \n\n";
        assert_eq!(normalize_markdown(md), "First line\\\nsecond line\n\nNext\n");
    }

    #[test]
    fn test_existing_hard_break_is_kept() {
        assert_eq!(normalize_markdown("Event ID: 6398\\  \nThe Execute method failed."),
                   "Event ID: 6398\\\nThe Execute method failed.\n");
    }

    #[test]
    fn test_fences_untouched() {
        let md = "```\ncode  \n\n\n  indented\n```\n\n\n\nafter";
        assert_eq!(normalize_markdown(md), "```\ncode  \n\n\n  indented\n```\n\nafter\n");
    }

    #[test]
    fn test_blank_quote_lines() {
        assert_eq!(normalize_markdown("> First\n> \n> > \n> Second"), "> First\n>\n> >\n> Second\n");
    }

    #[test]
    fn test_transport_tokens_decoded() {
        assert_eq!(normalize_markdown("{{{{%3C}} kbd \"A{{%5F}}B\" {{%3E}}}}"), "{{< kbd \"A_B\" >}}\n");
    }

    #[test]
    fn test_convert() {
        let converter = HtmdConverter::new();
        let md = converter.convert("<p>Hello <b>World</b> !</p>").unwrap();
        let md = normalize_markdown(&md);
        assert_eq!(md, "Hello **World** !\n");
        assert_eq!(markdown::to_html(md.trim_end()), "<p>Hello <strong>World</strong> !</p>");
    }

    #[test]
    fn test_convert_code_block() {
        let converter = HtmdConverter::new();
        let md = converter.convert("<pre><code>iisreset\nnet stop w3svc</code></pre>").unwrap();
        let md = normalize_markdown(&md);
        assert!(md.starts_with("```"));
        assert!(md.contains("iisreset\nnet stop w3svc"));
    }

    #[test]
    fn test_folded_commands_form_one_block() {
        let converter = HtmdConverter::new();
        let md = converter.convert("<div class=\"consoleBlock\"><pre><code>cls</code>\n<code>dir</code></pre></div>").unwrap();
        let md = normalize_markdown(&md);
        assert_eq!(md.matches("```").count(), 2);
        assert!(md.contains("cls\ndir"));
    }

    #[test]
    fn test_convert_table() {
        let converter = HtmdConverter::new();
        let html = "<p>Before</p><table><tr><th>Name</th><th>Value</th></tr><tr><td>a_b</td><td>1</td></tr></table><p>After</p>";
        let md = normalize_markdown(&converter.convert(html).unwrap());
        assert_eq!(md, "Before\n\n| Name | Value |\n| --- | --- |\n| a\\_b | 1 |\n\nAfter\n");

        let rendered = markdown::to_html_with_options(md.trim_end(), &markdown::Options::gfm()).unwrap();
        assert!(rendered.contains("<th>Name</th>"));
        assert!(rendered.contains("<td>a_b</td>"));
    }

    #[test]
    fn test_table_cells_stay_on_one_line() {
        let converter = HtmdConverter::new();
        let html = "<table><tr><td>x<br>y</td></tr><tr><td>1</td><td>a | b</td></tr></table>";
        let md = normalize_markdown(&converter.convert(html).unwrap());
        assert_eq!(md, "| x<br>y |  |\n| --- | --- |\n| 1 | a \\| b |\n");
    }
}
