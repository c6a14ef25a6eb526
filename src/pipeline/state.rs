use std::path::{Path, PathBuf};

use crate::blogml::Post;
use crate::error::{ConvertError, Result};

/// Body of the post being converted. HTML until the conversion step runs.
#[derive(Debug, Clone, PartialEq)]
pub enum PostContent {
    Html(String),
    Markdown(String),
}

/// Everything the steps of a pipeline learn about one post.
///
/// Fields other than the post and its content start unset and are filled
/// once by the step that produces them; reading one earlier is an error.
pub struct ConversionState {
    pub post: Post,
    output_dir: PathBuf,
    slug: Option<String>,
    subfolder: Option<String>,
    aliases: Option<Vec<String>>,
    categories: Option<Vec<String>>,
    tags: Option<Vec<String>>,
    content: PostContent,
}

fn not_ready(step: &'static str, field: &'static str) -> ConvertError {
    ConvertError::StateNotReady { step, field }
}

fn set_once<T>(slot: &mut Option<T>, field: &'static str, value: T) -> Result<()> {
    if slot.is_some() {
        return Err(ConvertError::StateAlreadySet { field });
    }
    *slot = Some(value);
    Ok(())
}

impl ConversionState {
    pub fn new(post: Post, output_dir: &Path) -> ConversionState {
        let content = PostContent::Html(post.content.clone());
        ConversionState {
            post,
            output_dir: output_dir.to_path_buf(),
            slug: None,
            subfolder: None,
            aliases: None,
            categories: None,
            tags: None,
            content,
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn slug(&self, step: &'static str) -> Result<&str> {
        self.slug.as_deref().ok_or_else(|| not_ready(step, "slug"))
    }

    pub fn set_slug(&mut self, slug: String) -> Result<()> {
        set_once(&mut self.slug, "slug", slug)
    }

    /// `yyyy/MM/dd` folder of the post, relative to the output directory.
    pub fn subfolder(&self, step: &'static str) -> Result<&str> {
        self.subfolder.as_deref().ok_or_else(|| not_ready(step, "subfolder"))
    }

    pub fn set_subfolder(&mut self, subfolder: String) -> Result<()> {
        set_once(&mut self.subfolder, "subfolder", subfolder)
    }

    pub fn aliases(&self, step: &'static str) -> Result<&[String]> {
        self.aliases.as_deref().ok_or_else(|| not_ready(step, "aliases"))
    }

    pub fn set_aliases(&mut self, aliases: Vec<String>) -> Result<()> {
        set_once(&mut self.aliases, "aliases", aliases)
    }

    pub fn categories(&self, step: &'static str) -> Result<&[String]> {
        self.categories.as_deref().ok_or_else(|| not_ready(step, "categories"))
    }

    pub fn set_categories(&mut self, categories: Vec<String>) -> Result<()> {
        set_once(&mut self.categories, "categories", categories)
    }

    pub fn tags(&self, step: &'static str) -> Result<&[String]> {
        self.tags.as_deref().ok_or_else(|| not_ready(step, "tags"))
    }

    pub fn set_tags(&mut self, tags: Vec<String>) -> Result<()> {
        set_once(&mut self.tags, "tags", tags)
    }

    pub fn content(&self) -> &PostContent {
        &self.content
    }

    pub fn html(&self, step: &'static str) -> Result<&str> {
        match self.content {
            PostContent::Html(ref html) => Ok(html),
            PostContent::Markdown(_) => Err(ConvertError::UnexpectedContent { step, expected: "HTML" }),
        }
    }

    pub fn set_html(&mut self, html: String) {
        self.content = PostContent::Html(html);
    }

    pub fn markdown(&self, step: &'static str) -> Result<&str> {
        match self.content {
            PostContent::Markdown(ref markdown) => Ok(markdown),
            PostContent::Html(_) => Err(ConvertError::UnexpectedContent { step, expected: "Markdown" }),
        }
    }

    pub fn set_markdown(&mut self, markdown: String) {
        self.content = PostContent::Markdown(markdown);
    }
}

#[cfg(test)]
mod tests {
    use crate::blogml::read_blog;
    use crate::test_data::BLOGML_SIMPLE;

    use super::*;

    fn state() -> ConversionState {
        let blog = read_blog(BLOGML_SIMPLE).unwrap();
        ConversionState::new(blog.posts[0].clone(), Path::new("/tmp/out"))
    }

    #[test]
    fn test_fields_start_unset() {
        let state = state();
        assert_eq!(state.output_dir(), Path::new("/tmp/out"));
        match state.slug("save") {
            Err(ConvertError::StateNotReady { step, field }) => {
                assert_eq!(step, "save");
                assert_eq!(field, "slug");
            }
            other => panic!("Unexpected result {:?}", other),
        }
        assert!(state.subfolder("save").is_err());
        assert!(state.aliases("save").is_err());
        assert!(state.categories("save").is_err());
        assert!(state.tags("save").is_err());
    }

    #[test]
    fn test_set_fields() {
        let mut state = state();
        state.set_slug("hello-world".to_string()).unwrap();
        state.set_tags(vec!["Toolbox".to_string()]).unwrap();
        assert_eq!(state.slug("save").unwrap(), "hello-world");
        assert_eq!(state.tags("save").unwrap(), ["Toolbox".to_string()]);
    }

    #[test]
    fn test_fields_are_set_once() {
        let mut state = state();
        state.set_slug("hello-world".to_string()).unwrap();
        assert!(matches!(state.set_slug("other".to_string()), Err(ConvertError::StateAlreadySet { field: "slug" })));
        assert_eq!(state.slug("save").unwrap(), "hello-world");

        state.set_aliases(vec![]).unwrap();
        assert!(matches!(state.set_aliases(vec![]), Err(ConvertError::StateAlreadySet { field: "aliases" })));
    }

    #[test]
    fn test_content_representation() {
        let mut state = state();
        assert_eq!(state.html("convert").unwrap(), "<p>Hello <b>World </b>!</p>");
        assert!(matches!(state.markdown("normalize"), Err(ConvertError::UnexpectedContent { .. })));

        state.set_markdown("Hello **World** !\n".to_string());
        assert_eq!(state.markdown("normalize").unwrap(), "Hello **World** !\n");
        assert!(state.html("convert").is_err());
    }
}
