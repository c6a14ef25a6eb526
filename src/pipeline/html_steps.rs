use spdlog::debug;

use crate::error::Result;
use crate::html::HtmlDocument;
use crate::image_mapper::ImageUrlMapper;
use crate::pipeline::state::ConversionState;
use crate::pipeline::{ConversionStep, Stage};
use crate::transform::formatting::fix_formatting;
use crate::transform::images::replace_image_urls;
use crate::transform::tags::remove_tags_section;
use crate::transform::transport::encode_shortcodes;

/// Tags come from the BlogML tag list. Posts without one fall back to the
/// "Tags" block at the end of the content, which is removed either way.
pub struct TagsStep;

impl ConversionStep for TagsStep {
    fn name(&self) -> &'static str {
        "tags"
    }

    fn stage(&self) -> Stage {
        Stage::Tags
    }

    fn execute(&mut self, state: &mut ConversionState) -> Result<()> {
        let doc = HtmlDocument::parse(state.html(self.name())?);
        let content_tags = remove_tags_section(&doc)?;

        let tags = if state.post.tags.is_empty() {
            content_tags
        } else {
            state.post.tags.clone()
        };
        debug!("Tags for post {}: {:?}", state.post.id, tags);

        state.set_html(doc.to_html()?);
        state.set_tags(tags)?;
        Ok(())
    }
}

pub struct ImageUrlsStep<'a> {
    mapper: &'a ImageUrlMapper,
}

impl<'a> ImageUrlsStep<'a> {
    pub fn new(mapper: &'a ImageUrlMapper) -> ImageUrlsStep<'a> {
        ImageUrlsStep { mapper }
    }
}

impl ConversionStep for ImageUrlsStep<'_> {
    fn name(&self) -> &'static str {
        "image-urls"
    }

    fn stage(&self) -> Stage {
        Stage::ImageUrls
    }

    fn execute(&mut self, state: &mut ConversionState) -> Result<()> {
        let doc = HtmlDocument::parse(state.html(self.name())?);
        replace_image_urls(&doc, self.mapper)?;
        state.set_html(doc.to_html()?);
        Ok(())
    }
}

pub struct HtmlFormattingStep;

impl ConversionStep for HtmlFormattingStep {
    fn name(&self) -> &'static str {
        "html-formatting"
    }

    fn stage(&self) -> Stage {
        Stage::HtmlFormatting
    }

    fn execute(&mut self, state: &mut ConversionState) -> Result<()> {
        let doc = HtmlDocument::parse(state.html(self.name())?);
        fix_formatting(&doc)?;
        state.set_html(doc.to_html()?);
        Ok(())
    }
}

/// Protects the shortcodes inserted so far from the Markdown converter.
pub struct EncodeShortcodesStep;

impl ConversionStep for EncodeShortcodesStep {
    fn name(&self) -> &'static str {
        "encode-shortcodes"
    }

    fn stage(&self) -> Stage {
        Stage::EncodeShortcodes
    }

    fn execute(&mut self, state: &mut ConversionState) -> Result<()> {
        let doc = HtmlDocument::parse(state.html(self.name())?);
        let count = encode_shortcodes(&doc);
        debug!("Encoded {} shortcodes in post {}", count, state.post.id);
        state.set_html(doc.to_html()?);
        Ok(())
    }
}
