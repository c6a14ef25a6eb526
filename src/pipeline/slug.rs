use crate::error::Result;
use crate::pipeline::state::ConversionState;
use crate::pipeline::{ConversionStep, Stage};
use crate::url_converter::BlogUrlConverter;

pub struct SlugStep<'a> {
    converter: &'a dyn BlogUrlConverter,
}

impl<'a> SlugStep<'a> {
    pub fn new(converter: &'a dyn BlogUrlConverter) -> SlugStep<'a> {
        SlugStep { converter }
    }
}

impl ConversionStep for SlugStep<'_> {
    fn name(&self) -> &'static str {
        "slug"
    }

    fn stage(&self) -> Stage {
        Stage::Slug
    }

    fn execute(&mut self, state: &mut ConversionState) -> Result<()> {
        let slug = self.converter.slug(&state.post.url)?;
        state.set_slug(slug)?;
        Ok(())
    }
}
