use std::path::Path;

use spdlog::info;

use crate::blogml::Blog;
use crate::config::Config;
use crate::error::Result;
use crate::front_matter::FrontMatterRenderer;
use crate::image_mapper::ImageUrlMapper;
use crate::link_mapper::LinkMapper;
use crate::markdown::HtmdConverter;
use crate::pipeline::archive::ArchivePagesStep;
use crate::pipeline::categories::CategoriesStep;
use crate::pipeline::dates::DateCorrection;
use crate::pipeline::html_steps::{EncodeShortcodesStep, HtmlFormattingStep, ImageUrlsStep, TagsStep};
use crate::pipeline::markdown_steps::{ConvertStep, NormalizeStep};
use crate::pipeline::preprocess::{locate_post, PreprocessStep};
use crate::pipeline::save::SaveStep;
use crate::pipeline::slug::SlugStep;
use crate::pipeline::state::ConversionState;
use crate::pipeline::ConversionPipeline;
use crate::url_converter::{BlogUrlConverter, UrlConverter};

/// Registers the corrected URL of every post before any of them is
/// converted, so links to later posts resolve too.
fn register_posts(blog: &Blog, converter: &UrlConverter, link_mapper: &mut LinkMapper, cfg: &Config,
                  dates: &DateCorrection) -> Result<()> {
    for post in &blog.posts {
        let slug = converter.slug(&post.url)?;
        let mut post = post.clone();
        let location = locate_post(&mut post, &slug, &cfg.blog, dates);
        link_mapper.add(&location.url)?;
    }
    info!("Registered {} permalinks", link_mapper.len());
    Ok(())
}

/// Converts every post of `blog` into `out_dir`. Returns the number of posts written.
pub fn convert_blog(blog: &Blog, cfg: &Config, out_dir: &Path) -> Result<usize> {
    let dates = DateCorrection::new(cfg.local_zone()?, cfg.dates.shift_before.0);
    let url_converter = UrlConverter::new(&cfg.blog)?;
    let image_mapper = ImageUrlMapper::new(&cfg.images)?;
    let renderer = FrontMatterRenderer::new()?;
    let markdown_converter = HtmdConverter::new();
    let mut link_mapper = LinkMapper::new(Box::new(UrlConverter::new(&cfg.blog)?));

    register_posts(blog, &url_converter, &mut link_mapper, cfg, &dates)?;

    info!("Converting {} posts into {}", blog.posts.len(), out_dir.display());
    let mut count = 0;
    for post in &blog.posts {
        let mut pipeline = ConversionPipeline::new();
        pipeline.add_step(Box::new(SlugStep::new(&url_converter)))?;
        pipeline.add_step(Box::new(TagsStep))?;
        pipeline.add_step(Box::new(ImageUrlsStep::new(&image_mapper)))?;
        pipeline.add_step(Box::new(HtmlFormattingStep))?;
        pipeline.add_step(Box::new(PreprocessStep::new(&mut link_mapper, &cfg.blog, &cfg.content, dates)))?;
        pipeline.add_step(Box::new(EncodeShortcodesStep))?;
        pipeline.add_step(Box::new(ConvertStep::new(&markdown_converter)))?;
        pipeline.add_step(Box::new(NormalizeStep))?;
        pipeline.add_step(Box::new(CategoriesStep::new(&blog.categories)))?;
        pipeline.add_step(Box::new(SaveStep::new(&renderer, dates, cfg.output.draft)))?;
        if cfg.output.archive_pages {
            pipeline.add_step(Box::new(ArchivePagesStep::new(&renderer, dates)))?;
        }

        let mut state = ConversionState::new(post.clone(), out_dir);
        pipeline.execute(&mut state)?;
        count += 1;
    }

    Ok(count)
}
