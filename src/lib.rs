pub mod blogml;
pub mod config;
pub mod driver;
pub mod error;
pub mod front_matter;
pub mod html;
pub mod image_mapper;
pub mod link_mapper;
pub mod logger;
pub mod markdown;
pub mod pipeline;
pub mod shortcode;
pub mod text_utils;
pub mod transform;
pub mod url_converter;
pub mod util;
mod test_data;
