use std::path::Path;
use std::{fs, io};

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::{Duration, NaiveDateTime};
use quick_xml::events::attributes::AttrError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use spdlog::debug;
use thiserror::Error;

use crate::text_utils::parse_date_time;

#[derive(Debug, Error)]
pub enum BlogMlError {
    #[error("Malformed XML at position {position}: {source}")]
    Syntax {
        position: u64,
        #[source]
        source: quick_xml::Error,
    },

    #[error("Invalid XML value: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Invalid attribute: {0}")]
    Attribute(#[from] AttrError),

    #[error("Invalid UTF-8 content: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("Invalid base64 content in post {post_id}: {source}")]
    Base64 {
        post_id: String,
        #[source]
        source: base64::DecodeError,
    },

    #[error("Invalid date in post {post_id}: {message}")]
    Date { post_id: String, message: String },

    #[error("Post {post_id} has no {attribute} attribute")]
    MissingAttribute {
        post_id: String,
        attribute: &'static str,
    },

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// How a BlogML timestamp should be read.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum DateKind {
    /// No zone designator in the source document.
    Unspecified,
    Utc,
    /// Already corrected to the blog's local zone.
    Local,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PostDate {
    pub value: NaiveDateTime,
    pub kind: DateKind,
}

impl PostDate {
    pub fn new(value: NaiveDateTime, kind: DateKind) -> PostDate {
        PostDate { value, kind }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CategoryRef {
    pub id: String,
    pub title: String,
}

#[derive(Clone, Debug)]
pub struct Post {
    pub id: String,
    pub title: String,
    pub url: String,
    pub created: PostDate,
    pub modified: PostDate,
    /// HTML body. Replaced in place while the post is being converted.
    pub content: String,
    pub excerpt: Option<String>,
    /// Category ids, resolved against [`Blog::categories`]
    pub categories: Vec<String>,
    pub tags: Vec<String>,
}

#[derive(Clone, Debug, Default)]
pub struct Blog {
    pub title: String,
    pub categories: Vec<CategoryRef>,
    pub posts: Vec<Post>,
}

#[derive(Default)]
struct PostBuilder {
    id: String,
    url: String,
    created: Option<String>,
    modified: Option<String>,
    has_excerpt: bool,
    title: String,
    content: String,
    excerpt: String,
    categories: Vec<String>,
    tags: Vec<String>,
}

impl PostBuilder {
    fn from_element(e: &BytesStart) -> Result<PostBuilder, BlogMlError> {
        let mut post = PostBuilder::default();
        for attr in e.attributes() {
            let attr = attr?;
            let value = attr.unescape_value()?.to_string();
            match attr.key.local_name().as_ref() {
                b"id" => post.id = value,
                b"post-url" => post.url = value,
                b"date-created" => post.created = Some(value),
                b"date-modified" => post.modified = Some(value),
                b"hasexcerpt" => post.has_excerpt = value.eq_ignore_ascii_case("true"),
                _ => {}
            }
        }
        Ok(post)
    }

    fn build(self) -> Result<Post, BlogMlError> {
        let Some(ref created) = self.created else {
            return Err(BlogMlError::MissingAttribute { post_id: self.id, attribute: "date-created" });
        };
        let created = parse_post_date(&self.id, created)?;
        let modified = match self.modified {
            Some(ref modified) => parse_post_date(&self.id, modified)?,
            None => created,
        };

        let excerpt = if self.has_excerpt && !self.excerpt.trim().is_empty() {
            Some(self.excerpt)
        } else {
            None
        };

        Ok(Post {
            id: self.id,
            title: self.title,
            url: self.url,
            created,
            modified,
            content: self.content,
            excerpt,
            categories: self.categories,
            tags: self.tags,
        })
    }
}

/// Values with an explicit offset are normalized to UTC.
fn parse_post_date(post_id: &str, value: &str) -> Result<PostDate, BlogMlError> {
    let (date_time, offset) = parse_date_time(value)
        .map_err(|message| BlogMlError::Date { post_id: post_id.to_string(), message })?;

    let date = match offset {
        None => PostDate::new(date_time, DateKind::Unspecified),
        Some(offset) => {
            let utc = date_time - Duration::seconds(offset.local_minus_utc() as i64);
            PostDate::new(utc, DateKind::Utc)
        }
    };
    Ok(date)
}

/// Where the text currently being read ends up.
#[derive(Copy, Clone, PartialEq)]
enum Target {
    BlogTitle,
    CategoryTitle,
    PostTitle,
    PostContent,
    PostExcerpt,
}

fn target_for(path: &str) -> Option<Target> {
    match path {
        "blog/title" => Some(Target::BlogTitle),
        "blog/categories/category/title" => Some(Target::CategoryTitle),
        "blog/posts/post/title" => Some(Target::PostTitle),
        "blog/posts/post/content" => Some(Target::PostContent),
        "blog/posts/post/excerpt" => Some(Target::PostExcerpt),
        _ => None,
    }
}

fn attribute(e: &BytesStart, name: &[u8]) -> Result<Option<String>, BlogMlError> {
    for attr in e.attributes() {
        let attr = attr?;
        if attr.key.local_name().as_ref() == name {
            return Ok(Some(attr.unescape_value()?.to_string()));
        }
    }
    Ok(None)
}

fn category_from_element(e: &BytesStart) -> Result<CategoryRef, BlogMlError> {
    Ok(CategoryRef {
        id: attribute(e, b"id")?.unwrap_or_default(),
        title: String::new(),
    })
}

fn decode_base64(post_id: &str, text: &str) -> Result<String, BlogMlError> {
    let compact: String = text.split_whitespace().collect();
    let bytes = BASE64.decode(compact)
        .map_err(|source| BlogMlError::Base64 { post_id: post_id.to_string(), source })?;
    String::from_utf8(bytes).map_err(|e| BlogMlError::Utf8(e.utf8_error()))
}

/// Category and tag references of a post.
fn add_reference(post: Option<&mut PostBuilder>, path: &str, e: &BytesStart) -> Result<(), BlogMlError> {
    let Some(post) = post else {
        return Ok(());
    };

    match path {
        "blog/posts/post/categories/category" => post.categories.extend(attribute(e, b"ref")?),
        "blog/posts/post/tags/tag" => post.tags.extend(attribute(e, b"ref")?),
        _ => {}
    }
    Ok(())
}

fn local_name(e: &BytesStart) -> Result<String, BlogMlError> {
    Ok(std::str::from_utf8(e.local_name().as_ref())?.to_string())
}

/// Reads the categories and posts of a BlogML document.
/// Authors, comments, trackbacks and attachments are ignored.
pub fn read_blog(xml: &str) -> Result<Blog, BlogMlError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut blog = Blog::default();
    let mut path: Vec<String> = vec![];
    let mut category: Option<CategoryRef> = None;
    let mut post: Option<PostBuilder> = None;
    let mut text = String::new();
    let mut base64_text = false;

    loop {
        let event = reader.read_event()
            .map_err(|source| BlogMlError::Syntax { position: reader.buffer_position() as u64, source })?;

        match event {
            Event::Start(e) => {
                path.push(local_name(&e)?);
                text.clear();

                match path.join("/").as_str() {
                    "blog/categories/category" => category = Some(category_from_element(&e)?),
                    "blog/posts/post" => post = Some(PostBuilder::from_element(&e)?),
                    "blog/posts/post/content" | "blog/posts/post/excerpt" => {
                        base64_text = attribute(&e, b"type")?
                            .is_some_and(|t| t.eq_ignore_ascii_case("base64"));
                    }
                    current => add_reference(post.as_mut(), current, &e)?,
                }
            }
            Event::Empty(e) => {
                let current = format!("{}/{}", path.join("/"), local_name(&e)?);
                match current.as_str() {
                    "blog/categories/category" => blog.categories.push(category_from_element(&e)?),
                    current => add_reference(post.as_mut(), current, &e)?,
                }
            }
            Event::Text(e) => {
                if target_for(&path.join("/")).is_some() {
                    text.push_str(&e.unescape()?);
                }
            }
            Event::CData(e) => {
                if target_for(&path.join("/")).is_some() {
                    text.push_str(std::str::from_utf8(&e)?);
                }
            }
            Event::End(_) => {
                let current = path.join("/");

                if let Some(target) = target_for(&current) {
                    let mut value = std::mem::take(&mut text);
                    if base64_text {
                        let post_id = post.as_ref().map(|p| p.id.as_str()).unwrap_or_default();
                        value = decode_base64(post_id, &value)?;
                        base64_text = false;
                    }

                    match (target, post.as_mut(), category.as_mut()) {
                        (Target::BlogTitle, _, _) => blog.title = value,
                        (Target::CategoryTitle, _, Some(category)) => category.title = value,
                        (Target::PostTitle, Some(post), _) => post.title = value,
                        (Target::PostContent, Some(post), _) => post.content = value,
                        (Target::PostExcerpt, Some(post), _) => post.excerpt = value,
                        _ => {}
                    }
                }

                match current.as_str() {
                    "blog/categories/category" => {
                        if let Some(category) = category.take() {
                            blog.categories.push(category);
                        }
                    }
                    "blog/posts/post" => {
                        if let Some(builder) = post.take() {
                            let post = builder.build()?;
                            debug!("Read post {} ({})", post.id, post.title);
                            blog.posts.push(post);
                        }
                    }
                    _ => {}
                }

                path.pop();
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(blog)
}

pub fn read_blog_file(path: &Path) -> Result<Blog, BlogMlError> {
    let xml = fs::read_to_string(path)
        .map_err(|e| io::Error::new(e.kind(), format!("Error reading {}: {}", path.display(), e)))?;
    read_blog(&xml)
}
