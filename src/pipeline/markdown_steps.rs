use crate::error::Result;
use crate::markdown::{normalize_markdown, MarkdownConverter};
use crate::pipeline::state::ConversionState;
use crate::pipeline::{ConversionStep, Stage};

pub struct ConvertStep<'a> {
    converter: &'a dyn MarkdownConverter,
}

impl<'a> ConvertStep<'a> {
    pub fn new(converter: &'a dyn MarkdownConverter) -> ConvertStep<'a> {
        ConvertStep { converter }
    }
}

impl ConversionStep for ConvertStep<'_> {
    fn name(&self) -> &'static str {
        "convert"
    }

    fn stage(&self) -> Stage {
        Stage::Convert
    }

    fn execute(&mut self, state: &mut ConversionState) -> Result<()> {
        let markdown = self.converter.convert(state.html(self.name())?)?;
        state.set_markdown(markdown);
        Ok(())
    }
}

pub struct NormalizeStep;

impl ConversionStep for NormalizeStep {
    fn name(&self) -> &'static str {
        "normalize"
    }

    fn stage(&self) -> Stage {
        Stage::Normalize
    }

    fn execute(&mut self, state: &mut ConversionState) -> Result<()> {
        let markdown = normalize_markdown(state.markdown(self.name())?);
        state.set_markdown(markdown);
        Ok(())
    }
}
