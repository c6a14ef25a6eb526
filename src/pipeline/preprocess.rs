use spdlog::debug;

use crate::blogml::Post;
use crate::config::{Blog, Content};
use crate::error::Result;
use crate::html::HtmlDocument;
use crate::link_mapper::LinkMapper;
use crate::pipeline::dates::{corrected_url, site_path, subfolder, DateCorrection};
use crate::pipeline::state::ConversionState;
use crate::pipeline::{ConversionStep, Stage};
use crate::transform::preprocess;

/// Where a post ends up once its dates are fixed.
pub struct PostLocation {
    pub subfolder: String,
    pub url: String,
}

/// Corrects the dates of `post` and computes the URL matching them.
pub fn locate_post(post: &mut Post, slug: &str, blog: &Blog, dates: &DateCorrection) -> PostLocation {
    post.created = dates.correct(post.created);
    post.modified = dates.correct(post.modified);

    let created = dates.to_local(&post.created);
    PostLocation {
        subfolder: subfolder(&created),
        url: corrected_url(blog, &created, slug),
    }
}

/// Date correction, aliases, permalink registration and the blog specific
/// HTML rewrites.
pub struct PreprocessStep<'a> {
    link_mapper: &'a mut LinkMapper,
    blog: &'a Blog,
    content: &'a Content,
    dates: DateCorrection,
}

impl<'a> PreprocessStep<'a> {
    pub fn new(link_mapper: &'a mut LinkMapper, blog: &'a Blog, content: &'a Content, dates: DateCorrection)
               -> PreprocessStep<'a> {
        PreprocessStep { link_mapper, blog, content, dates }
    }
}

impl ConversionStep for PreprocessStep<'_> {
    fn name(&self) -> &'static str {
        "preprocess"
    }

    fn stage(&self) -> Stage {
        Stage::Preprocess
    }

    fn execute(&mut self, state: &mut ConversionState) -> Result<()> {
        let slug = state.slug(self.name())?.to_string();
        let location = locate_post(&mut state.post, &slug, self.blog, &self.dates);

        let original_path = site_path(self.blog, &state.post.url)?;
        let corrected_path = site_path(self.blog, &location.url)?;
        let mut aliases = vec![original_path.clone()];
        if corrected_path != original_path {
            debug!("Correcting URL of post {} from {} to {}", state.post.id, state.post.url, location.url);
            aliases.push(corrected_path);
            state.post.url = location.url;
        }

        self.link_mapper.add(&state.post.url)?;

        state.set_subfolder(location.subfolder)?;
        state.set_aliases(aliases)?;

        let doc = HtmlDocument::parse(state.html(self.name())?);
        preprocess(&doc, self.content, self.link_mapper)?;
        state.set_html(doc.to_html()?);
        Ok(())
    }
}
