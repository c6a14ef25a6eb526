use spdlog::debug;

use crate::error::{ConvertError, Result};
use crate::pipeline::state::ConversionState;

pub mod archive;
pub mod categories;
pub mod dates;
pub mod html_steps;
pub mod markdown_steps;
pub mod preprocess;
pub mod save;
pub mod slug;
pub mod state;

/// Position of a step in the pipeline. Steps run in this order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Slug,
    Tags,
    ImageUrls,
    HtmlFormatting,
    Preprocess,
    EncodeShortcodes,
    Convert,
    Normalize,
    Categories,
    Save,
    ArchivePages,
}

/// One unit of work done on a post.
pub trait ConversionStep {
    fn name(&self) -> &'static str;

    fn stage(&self) -> Stage;

    fn execute(&mut self, state: &mut ConversionState) -> Result<()>;
}

/// Steps run one after the other against the state of a single post.
#[derive(Default)]
pub struct ConversionPipeline<'a> {
    steps: Vec<Box<dyn ConversionStep + 'a>>,
}

impl<'a> ConversionPipeline<'a> {
    pub fn new() -> ConversionPipeline<'a> {
        ConversionPipeline { steps: vec![] }
    }

    /// Appends a step. Its stage must come after the stage of the last step added.
    pub fn add_step(&mut self, step: Box<dyn ConversionStep + 'a>) -> Result<()> {
        if let Some(last) = self.steps.last() {
            if step.stage() <= last.stage() {
                return Err(ConvertError::StepOutOfOrder {
                    step: step.name(),
                    stage: step.stage(),
                    previous: last.stage(),
                });
            }
        }
        self.steps.push(step);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn execute(&mut self, state: &mut ConversionState) -> Result<()> {
        if self.steps.is_empty() {
            return Err(ConvertError::EmptyPipeline);
        }

        for step in self.steps.iter_mut() {
            debug!("Running {} for post {}", step.name(), state.post.id);
            step.execute(state)?;
        }
        Ok(())
    }
}
