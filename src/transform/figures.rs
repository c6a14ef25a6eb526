use crate::error::Result;
use crate::html::{attr, select_in, shortcode_element, HtmlDocument};
use crate::shortcode::Shortcode;

/// Every `<img>` of an image block becomes a `figure` shortcode. The block
/// caption, when present, replaces the image title.
pub fn replace_images(doc: &HtmlDocument) -> Result<()> {
    for block in doc.select(r#"div[class="image"]"#)? {
        let caption = select_in(&block, r#"div[class="caption"]"#)?.into_iter().next();
        let caption_text = caption.as_ref().map(|c| c.text_contents());

        for img in select_in(&block, "img")? {
            let title = match caption_text {
                Some(ref caption) => Some(caption.clone()),
                None => attr(&img, "title"),
            };

            let figure = Shortcode::new("figure")
                .opt_param("src", attr(&img, "src").as_deref())
                .opt_param("alt", attr(&img, "alt").as_deref())
                .opt_param("class", attr(&img, "class").as_deref())
                .opt_param("height", attr(&img, "height").as_deref())
                .opt_param("width", attr(&img, "width").as_deref())
                .opt_param("title", title.as_deref())
                .on_separate_lines();

            img.insert_before(shortcode_element("div", &figure));
            img.detach();
        }

        if let Some(caption) = caption {
            caption.detach();
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn processed(html: &str) -> String {
        let doc = HtmlDocument::parse(html);
        replace_images(&doc).unwrap();
        doc.to_html().unwrap()
    }

    #[test]
    fn test_image_with_caption() {
        let html = "<div class=\"image\"><img alt=\"Taskbar\" src=\"https://assets.example.com/Taskbar.jpg\" \
                    width=\"301\" height=\"96\" title=\"Old title\"><div class=\"caption\">Figure 1: Taskbar</div></div>";
        assert_eq!(processed(html),
                   "<div class=\"image\"><div>{{&lt; figure\n\
                    \x20src=\"https://assets.example.com/Taskbar.jpg\"\n\
                    \x20alt=\"Taskbar\"\n\
                    \x20height=\"96\"\n\
                    \x20width=\"301\"\n\
                    \x20title=\"Figure 1: Taskbar\" &gt;}}</div></div>");
    }

    #[test]
    fn test_image_without_caption() {
        let html = "<div class=\"image\"><img src=\"/a.png\" title=\"Some title\"></div>";
        assert_eq!(processed(html),
                   "<div class=\"image\"><div>{{&lt; figure\n src=\"/a.png\"\n title=\"Some title\" &gt;}}</div></div>");
    }

    #[test]
    fn test_other_images_untouched() {
        let html = "<p><img src=\"/a.png\"></p>";
        assert_eq!(processed(html), html);
    }
}
