use chrono::{DateTime, FixedOffset};
use ramhorns::Template;

use crate::error::{ConvertError, Result};
use crate::text_utils::{escape_quoted_string, format_date_time};

const POST_TEMPLATE: &str = r#"---
title: "{{{title}}}"
date: {{{date}}}
{{#has_lastmod}}lastmod: {{{lastmod}}}
{{/has_lastmod}}{{#has_excerpt}}excerpt: "{{{excerpt}}}"
{{/has_excerpt}}aliases: [{{{aliases}}}]
draft: {{{draft}}}
categories: [{{{categories}}}]
tags: [{{{tags}}}]
---
"#;

const ARCHIVE_TEMPLATE: &str = r#"---
title: "{{{title}}}"
date: {{{date}}}
---
"#;

#[derive(ramhorns::Content)]
struct PostView<'a> {
    title: &'a str,
    date: &'a str,
    has_lastmod: bool,
    lastmod: &'a str,
    has_excerpt: bool,
    excerpt: &'a str,
    aliases: &'a str,
    draft: &'a str,
    categories: &'a str,
    tags: &'a str,
}

#[derive(ramhorns::Content)]
struct ArchiveView<'a> {
    title: &'a str,
    date: &'a str,
}

/// Metadata written at the top of each post.
pub struct FrontMatter<'a> {
    pub title: &'a str,
    pub date: DateTime<FixedOffset>,
    pub lastmod: DateTime<FixedOffset>,
    pub excerpt: Option<&'a str>,
    pub aliases: &'a [String],
    pub draft: bool,
    pub categories: &'a [String],
    pub tags: &'a [String],
}

/// `"a", "b"`, an empty string for no values.
fn quoted_list(values: &[String]) -> String {
    values.iter()
        .map(|v| format!("\"{}\"", escape_quoted_string(v)))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Rendering drops the final newline of a template.
fn with_final_newline(mut rendered: String) -> String {
    if !rendered.ends_with('\n') {
        rendered.push('\n');
    }
    rendered
}

fn parse_template(src: &'static str, name: &str) -> Result<Template<'static>> {
    Template::new(src)
        .map_err(|e| ConvertError::Template(format!("Error parsing {} template: {}", name, e)))
}

pub struct FrontMatterRenderer {
    post_template: Template<'static>,
    archive_template: Template<'static>,
}

impl FrontMatterRenderer {
    pub fn new() -> Result<FrontMatterRenderer> {
        Ok(FrontMatterRenderer {
            post_template: parse_template(POST_TEMPLATE, "post")?,
            archive_template: parse_template(ARCHIVE_TEMPLATE, "archive")?,
        })
    }

    pub fn render_post(&self, front_matter: &FrontMatter) -> String {
        let title = escape_quoted_string(front_matter.title);
        let date = format_date_time(&front_matter.date);
        let lastmod = format_date_time(&front_matter.lastmod);
        let excerpt = front_matter.excerpt.map(escape_quoted_string).unwrap_or_default();
        let aliases = quoted_list(front_matter.aliases);
        let categories = quoted_list(front_matter.categories);
        let tags = quoted_list(front_matter.tags);

        with_final_newline(self.post_template.render(&PostView {
            title: &title,
            date: &date,
            has_lastmod: front_matter.lastmod != front_matter.date,
            lastmod: &lastmod,
            has_excerpt: front_matter.excerpt.is_some(),
            excerpt: &excerpt,
            aliases: &aliases,
            draft: if front_matter.draft { "true" } else { "false" },
            categories: &categories,
            tags: &tags,
        }))
    }

    /// Front matter of an `_index.md` archive listing page.
    pub fn render_archive(&self, title: &str, date: &DateTime<FixedOffset>) -> String {
        let title = escape_quoted_string(title);
        let date = format_date_time(date);
        with_final_newline(self.archive_template.render(&ArchiveView {
            title: &title,
            date: &date,
        }))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone};

    use super::*;

    fn date(h: u32) -> DateTime<FixedOffset> {
        let offset = FixedOffset::west_opt(7 * 3600).unwrap();
        offset.from_local_datetime(&NaiveDate::from_ymd_opt(2020, 1, 2).unwrap().and_hms_opt(h, 0, 0).unwrap())
            .unwrap()
    }

    #[test]
    fn test_render_post() {
        let renderer = FrontMatterRenderer::new().unwrap();
        let aliases = vec!["/blog/jjameson/archive/2020/01/02/hello-world.aspx".to_string()];
        let categories = vec!["My System".to_string(), "SharePoint".to_string()];
        let tags = vec!["Toolbox".to_string()];

        let rendered = renderer.render_post(&FrontMatter {
            title: "Hello \"World\"",
            date: date(10),
            lastmod: date(12),
            excerpt: Some("C:\\ & <b>"),
            aliases: &aliases,
            draft: true,
            categories: &categories,
            tags: &tags,
        });

        assert_eq!(rendered, r#"---
title: "Hello \"World\""
date: 2020-01-02T10:00:00-07:00
lastmod: 2020-01-02T12:00:00-07:00
excerpt: "C:\\ & <b>"
aliases: ["/blog/jjameson/archive/2020/01/02/hello-world.aspx"]
draft: true
categories: ["My System", "SharePoint"]
tags: ["Toolbox"]
---
"#);
    }

    #[test]
    fn test_optional_fields() {
        let renderer = FrontMatterRenderer::new().unwrap();
        let rendered = renderer.render_post(&FrontMatter {
            title: "Plain",
            date: date(10),
            lastmod: date(10),
            excerpt: None,
            aliases: &[],
            draft: false,
            categories: &[],
            tags: &[],
        });

        assert_eq!(rendered, r#"---
title: "Plain"
date: 2020-01-02T10:00:00-07:00
aliases: []
draft: false
categories: []
tags: []
---
"#);
    }

    #[test]
    fn test_title_backslash() {
        let renderer = FrontMatterRenderer::new().unwrap();
        let rendered = renderer.render_post(&FrontMatter {
            title: "Cleaning up C:\\Temp",
            date: date(10),
            lastmod: date(10),
            excerpt: None,
            aliases: &[],
            draft: true,
            categories: &[],
            tags: &[],
        });
        assert!(rendered.starts_with("---\ntitle: \"Cleaning up C:\\\\Temp\"\n"));
        assert!(rendered.ends_with("tags: []\n---\n"));
    }

    #[test]
    fn test_render_archive() {
        let renderer = FrontMatterRenderer::new().unwrap();
        assert_eq!(renderer.render_archive("January 2020 Blog Posts", &date(0)),
                   "---\ntitle: \"January 2020 Blog Posts\"\ndate: 2020-01-02T00:00:00-07:00\n---\n");
    }
}
