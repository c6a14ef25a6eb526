use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use spdlog::debug;

use crate::error::Result;
use crate::front_matter::{FrontMatter, FrontMatterRenderer};
use crate::pipeline::dates::DateCorrection;
use crate::pipeline::state::ConversionState;
use crate::pipeline::{ConversionStep, Stage};

/// Writes `<output>/<yyyy>/<MM>/<dd>/<slug>.md`, replacing any earlier file.
pub struct SaveStep<'a> {
    renderer: &'a FrontMatterRenderer,
    dates: DateCorrection,
    draft: bool,
}

impl<'a> SaveStep<'a> {
    pub fn new(renderer: &'a FrontMatterRenderer, dates: DateCorrection, draft: bool) -> SaveStep<'a> {
        SaveStep { renderer, dates, draft }
    }
}

pub fn post_path(state: &ConversionState, step: &'static str) -> Result<PathBuf> {
    let mut path = state.output_dir().to_path_buf();
    for segment in state.subfolder(step)?.split('/') {
        path.push(segment);
    }
    path.push(format!("{}.md", state.slug(step)?));
    Ok(path)
}

impl ConversionStep for SaveStep<'_> {
    fn name(&self) -> &'static str {
        "save"
    }

    fn stage(&self) -> Stage {
        Stage::Save
    }

    fn execute(&mut self, state: &mut ConversionState) -> Result<()> {
        let step = self.name();
        let path = post_path(state, step)?;
        let post = &state.post;

        println!("Writing {} ({})", state.slug(step)?, post.title);

        let header = self.renderer.render_post(&FrontMatter {
            title: &post.title,
            date: self.dates.to_local(&post.created),
            lastmod: self.dates.to_local(&post.modified),
            excerpt: post.excerpt.as_deref(),
            aliases: state.aliases(step)?,
            draft: self.draft,
            categories: state.categories(step)?,
            tags: state.tags(step)?,
        });
        let body = state.markdown(step)?;

        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        match fs::remove_file(&path) {
            Err(e) if e.kind() != ErrorKind::NotFound => return Err(e.into()),
            _ => {}
        }

        debug!("Saving post {} to {}", post.id, path.display());
        fs::write(&path, format!("{}\n{}", header, body))?;
        Ok(())
    }
}
