use url::Url;

use crate::config::Blog;
use crate::error::{ConvertError, Result};

/// URL scheme rules of the blog being migrated.
pub trait BlogUrlConverter {
    /// Canonical URL of a post under the new scheme.
    fn permalink(&self, url: &str) -> Result<Url>;

    /// File name of the post, without extension.
    fn slug(&self, url: &str) -> Result<String>;

    /// Whether `url` points inside the blog. URLs on other hosts are not blog URLs.
    fn is_blog_url(&self, url: &str) -> Result<bool>;
}

pub struct UrlConverter {
    host: String,
    blog_path: String,
    archive_prefix: String,
    page_extension: String,
    base: Url,
}

impl UrlConverter {
    pub fn new(blog: &Blog) -> Result<UrlConverter> {
        let base_str = format!("https://{}/", blog.host);
        let base = Url::parse(&base_str)
            .map_err(|source| ConvertError::InvalidUrl { url: base_str, source })?;
        let blog_path = blog.path.trim_end_matches('/').to_string();
        let archive_prefix = format!("{}/{}/", blog_path, blog.archive_segment.trim_matches('/'));

        Ok(UrlConverter {
            host: blog.host.to_ascii_lowercase(),
            blog_path,
            archive_prefix,
            page_extension: blog.page_extension.clone(),
            base,
        })
    }

    /// Resolves `url` against the blog root. Fails for absolute URLs on another host.
    pub fn resolve(&self, url: &str) -> Result<Url> {
        let resolved = self.base.join(url.trim())
            .map_err(|source| ConvertError::InvalidUrl { url: url.to_string(), source })?;

        if resolved.host_str() != Some(self.host.as_str()) {
            return Err(ConvertError::HostMismatch { url: url.to_string(), expected: self.host.clone() });
        }
        Ok(resolved)
    }

    fn is_on_other_host(&self, url: &str) -> bool {
        match Url::parse(url.trim()) {
            Ok(absolute) => absolute.host_str() != Some(self.host.as_str()),
            Err(_) => false,
        }
    }
}

/// `/a/b?x=1` for `https://host/a/b?x=1#top`
pub fn path_and_query(url: &Url) -> String {
    match url.query() {
        Some(query) => format!("{}?{}", url.path(), query),
        None => url.path().to_string(),
    }
}

fn starts_with_ignore_case(text: &str, prefix: &str) -> bool {
    text.len() >= prefix.len()
        && text.is_char_boundary(prefix.len())
        && text[..prefix.len()].eq_ignore_ascii_case(prefix)
}

fn ends_with_ignore_case(text: &str, suffix: &str) -> bool {
    text.len() >= suffix.len()
        && text.is_char_boundary(text.len() - suffix.len())
        && text[text.len() - suffix.len()..].eq_ignore_ascii_case(suffix)
}

/// Strips a short alphabetic extension (`.aspx`, `.html`) but keeps dotted
/// names such as `net-4.0-tips`.
fn strip_extension(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(pos) if pos > 0 => {
            let ext = &file_name[pos + 1..];
            if (1..=5).contains(&ext.len()) && ext.chars().all(|c| c.is_ascii_alphabetic()) {
                &file_name[..pos]
            } else {
                file_name
            }
        }
        _ => file_name,
    }
}

impl BlogUrlConverter for UrlConverter {
    fn permalink(&self, url: &str) -> Result<Url> {
        let resolved = self.resolve(url)?;
        let mut path = resolved.path().to_string();

        if starts_with_ignore_case(&path, &self.archive_prefix) {
            path = format!("{}/{}", self.blog_path, &path[self.archive_prefix.len()..]);
            if ends_with_ignore_case(&path, &self.page_extension) {
                path.truncate(path.len() - self.page_extension.len());
            }
        }

        let mut permalink = self.base.clone();
        permalink.set_path(&path);
        permalink.set_query(resolved.query());
        Ok(permalink)
    }

    fn slug(&self, url: &str) -> Result<String> {
        let resolved = self.resolve(url)?;
        let file_name = resolved.path_segments()
            .and_then(|mut segments| segments.next_back())
            .unwrap_or_default();
        Ok(strip_extension(file_name).to_string())
    }

    fn is_blog_url(&self, url: &str) -> Result<bool> {
        if self.is_on_other_host(url) {
            return Ok(false);
        }

        let resolved = self.resolve(url)?;
        Ok(starts_with_ignore_case(resolved.path(), &self.blog_path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn converter() -> UrlConverter {
        UrlConverter::new(&Blog::default()).unwrap()
    }

    #[test]
    fn test_slug() {
        let converter = converter();
        assert_eq!(converter.slug("/blog/jjameson/archive/2012/02/19/my-post.aspx").unwrap(), "my-post");
        assert_eq!(converter.slug("https://www.technologytoolbox.com/blog/jjameson/2012/02/19/my-post").unwrap(), "my-post");
        assert_eq!(converter.slug("/blog/jjameson/archive/2010/04/12/net-4.0-tips.aspx").unwrap(), "net-4.0-tips");
        assert_eq!(converter.slug("/blog/jjameson/archive/2010/04/12/my-post.aspx?x=1").unwrap(), "my-post");
    }

    #[test]
    fn test_permalink() {
        let converter = converter();
        let permalink = converter.permalink("https://www.technologytoolbox.com/blog/jjameson/archive/2012/02/19/my-post.aspx").unwrap();
        assert_eq!(permalink.as_str(), "https://www.technologytoolbox.com/blog/jjameson/2012/02/19/my-post");

        let permalink = converter.permalink("/Blog/JJameson/Archive/2012/02/19/my-post.ASPX?page=2").unwrap();
        assert_eq!(permalink.as_str(), "https://www.technologytoolbox.com/blog/jjameson/2012/02/19/my-post?page=2");

        // Only archive URLs are rewritten
        let permalink = converter.permalink("/blog/jjameson/default.aspx").unwrap();
        assert_eq!(permalink.as_str(), "https://www.technologytoolbox.com/blog/jjameson/default.aspx");
    }

    #[test]
    fn test_slug_is_stable() {
        let converter = converter();
        let urls = [
            "/blog/jjameson/archive/2012/02/19/my-post.aspx",
            "https://www.technologytoolbox.com/blog/jjameson/archive/2010/04/12/net-4.0-tips.aspx",
            "/blog/jjameson/archive/2009/11/02/analyzing-my-msdn-blog.aspx",
        ];

        for url in urls {
            assert!(converter.is_blog_url(url).unwrap());
            let slug = converter.slug(url).unwrap();
            let permalink = converter.permalink(url).unwrap();
            assert_eq!(converter.slug(permalink.as_str()).unwrap(), slug);
            let again = converter.permalink(permalink.as_str()).unwrap();
            assert_eq!(again, permalink);
        }
    }

    #[test]
    fn test_is_blog_url() {
        let converter = converter();
        assert!(converter.is_blog_url("/blog/jjameson/archive/2012/02/19/my-post.aspx").unwrap());
        assert!(converter.is_blog_url("HTTPS://WWW.TECHNOLOGYTOOLBOX.COM/blog/jjameson/").unwrap());
        assert!(!converter.is_blog_url("http://support.microsoft.com/kb/867466").unwrap());
        assert!(!converter.is_blog_url("/downloads/file.zip").unwrap());
        assert!(!converter.is_blog_url("mailto:jeremy@example.com").unwrap());
        assert!(!converter.is_blog_url("#comments").unwrap());
    }

    #[test]
    fn test_host_mismatch() {
        let converter = converter();
        match converter.slug("http://blogs.msdn.com/jjameson/archive/2009/01/01/x.aspx") {
            Err(ConvertError::HostMismatch { url, expected }) => {
                assert_eq!(url, "http://blogs.msdn.com/jjameson/archive/2009/01/01/x.aspx");
                assert_eq!(expected, "www.technologytoolbox.com");
            }
            other => panic!("Unexpected result {:?}", other),
        }
        assert!(converter.permalink("http://blogs.msdn.com/x.aspx").is_err());
    }

    #[test]
    fn test_path_and_query() {
        let url = Url::parse("https://www.technologytoolbox.com/a/b?x=1#top").unwrap();
        assert_eq!(path_and_query(&url), "/a/b?x=1");
    }
}
