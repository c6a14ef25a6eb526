use std::fs;
use std::path::Path;

use chrono::{Datelike, NaiveDate};
use spdlog::debug;

use crate::error::{ConvertError, Result};
use crate::front_matter::FrontMatterRenderer;
use crate::pipeline::dates::{subfolder, DateCorrection};
use crate::pipeline::state::ConversionState;
use crate::pipeline::{ConversionStep, Stage};

const INDEX_FILE: &str = "_index.md";

/// Writes the `_index.md` listing pages of the day, month and year folders
/// a post lives in.
pub struct ArchivePagesStep<'a> {
    renderer: &'a FrontMatterRenderer,
    dates: DateCorrection,
}

impl<'a> ArchivePagesStep<'a> {
    pub fn new(renderer: &'a FrontMatterRenderer, dates: DateCorrection) -> ArchivePagesStep<'a> {
        ArchivePagesStep { renderer, dates }
    }

    fn write_index(&self, dir: &Path, title: &str, start: NaiveDate) -> Result<()> {
        fs::create_dir_all(dir)?;
        let path = dir.join(INDEX_FILE);
        debug!("Writing archive page {}", path.display());
        fs::write(&path, self.renderer.render_archive(title, &self.dates.start_of_day(start)))?;
        Ok(())
    }
}

impl ConversionStep for ArchivePagesStep<'_> {
    fn name(&self) -> &'static str {
        "archive-pages"
    }

    fn stage(&self) -> Stage {
        Stage::ArchivePages
    }

    fn execute(&mut self, state: &mut ConversionState) -> Result<()> {
        let folder = state.subfolder(self.name())?;
        let created = self.dates.to_local(&state.post.created);
        if folder != subfolder(&created) {
            return Err(ConvertError::SubfolderMismatch {
                subfolder: folder.to_string(),
                date: created.to_rfc3339(),
            });
        }

        let day = created.date_naive();
        let year_dir = state.output_dir().join(format!("{:04}", day.year()));
        let month_dir = year_dir.join(format!("{:02}", day.month()));
        let day_dir = month_dir.join(format!("{:02}", day.day()));

        let month_start = day.with_day(1).unwrap_or(day);
        let year_start = month_start.with_month(1).unwrap_or(month_start);

        self.write_index(&day_dir, &day.format("%B %-d, %Y Blog Posts").to_string(), day)?;
        self.write_index(&month_dir, &day.format("%B %Y Blog Posts").to_string(), month_start)?;
        self.write_index(&year_dir, &day.format("%Y Blog Posts").to_string(), year_start)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::FixedOffset;

    use crate::blogml::read_blog;
    use crate::test_data::BLOGML_SIMPLE;
    use crate::util::local_zone::LocalZone;

    use super::*;

    fn dates() -> DateCorrection {
        DateCorrection::new(LocalZone::Fixed(FixedOffset::east_opt(0).unwrap()),
                            NaiveDate::from_ymd_opt(2011, 9, 3).unwrap())
    }

    fn state(out_dir: &Path, subfolder: &str) -> ConversionState {
        let post = read_blog(BLOGML_SIMPLE).unwrap().posts[0].clone();
        let mut state = ConversionState::new(post, out_dir);
        state.set_subfolder(subfolder.to_string()).unwrap();
        state
    }

    #[test]
    fn test_archive_pages() {
        let out_dir = tempfile::tempdir().unwrap();
        let mut state = state(out_dir.path(), "2020/01/02");
        let renderer = FrontMatterRenderer::new().unwrap();
        ArchivePagesStep::new(&renderer, dates()).execute(&mut state).unwrap();

        let read = |path: &str| fs::read_to_string(out_dir.path().join(path)).unwrap();
        assert_eq!(read("2020/01/02/_index.md"),
                   "---\ntitle: \"January 2, 2020 Blog Posts\"\ndate: 2020-01-02T00:00:00+00:00\n---\n");
        assert_eq!(read("2020/01/_index.md"),
                   "---\ntitle: \"January 2020 Blog Posts\"\ndate: 2020-01-01T00:00:00+00:00\n---\n");
        assert_eq!(read("2020/_index.md"),
                   "---\ntitle: \"2020 Blog Posts\"\ndate: 2020-01-01T00:00:00+00:00\n---\n");
    }

    #[test]
    fn test_subfolder_mismatch() {
        let out_dir = tempfile::tempdir().unwrap();
        let mut state = state(out_dir.path(), "2020/01/03");
        let renderer = FrontMatterRenderer::new().unwrap();
        let res = ArchivePagesStep::new(&renderer, dates()).execute(&mut state);
        assert!(matches!(res, Err(ConvertError::SubfolderMismatch { .. })));
        assert!(!out_dir.path().join("2020").exists());
    }
}
