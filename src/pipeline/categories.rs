use std::collections::HashMap;

use crate::blogml::CategoryRef;
use crate::error::{ConvertError, Result};
use crate::pipeline::state::ConversionState;
use crate::pipeline::{ConversionStep, Stage};

/// Resolves the category ids of a post to their titles.
pub struct CategoriesStep {
    titles: HashMap<String, String>,
}

impl CategoriesStep {
    pub fn new(categories: &[CategoryRef]) -> CategoriesStep {
        let titles = categories.iter()
            .map(|c| (c.id.clone(), c.title.clone()))
            .collect();
        CategoriesStep { titles }
    }
}

impl ConversionStep for CategoriesStep {
    fn name(&self) -> &'static str {
        "categories"
    }

    fn stage(&self) -> Stage {
        Stage::Categories
    }

    fn execute(&mut self, state: &mut ConversionState) -> Result<()> {
        let mut categories = Vec::with_capacity(state.post.categories.len());
        for id in &state.post.categories {
            match self.titles.get(id) {
                Some(title) => categories.push(title.clone()),
                None => return Err(ConvertError::UnknownCategory {
                    post_id: state.post.id.clone(),
                    category: id.clone(),
                }),
            }
        }
        state.set_categories(categories)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use crate::blogml::read_blog;
    use crate::test_data::BLOGML_SIMPLE;

    use super::*;

    #[test]
    fn test_categories() {
        let blog = read_blog(BLOGML_SIMPLE).unwrap();
        let mut step = CategoriesStep::new(&blog.categories);

        let mut state = ConversionState::new(blog.posts[0].clone(), Path::new("out"));
        step.execute(&mut state).unwrap();
        assert_eq!(state.categories("test").unwrap(), ["My System".to_string(), "SharePoint".to_string()]);

        let mut state = ConversionState::new(blog.posts[1].clone(), Path::new("out"));
        step.execute(&mut state).unwrap();
        assert_eq!(state.categories("test").unwrap(), ["SharePoint".to_string()]);
    }

    #[test]
    fn test_unknown_category() {
        let blog = read_blog(BLOGML_SIMPLE).unwrap();
        let mut post = blog.posts[0].clone();
        post.categories.push("42".to_string());

        let mut state = ConversionState::new(post, Path::new("out"));
        match CategoriesStep::new(&blog.categories).execute(&mut state) {
            Err(ConvertError::UnknownCategory { post_id, category }) => {
                assert_eq!(post_id, "100");
                assert_eq!(category, "42");
            }
            other => panic!("Unexpected result {:?}", other),
        }
    }
}
