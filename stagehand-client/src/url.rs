//! Web page sources added by URL

use crate::host::Host;
use crate::scene::SceneArg;
use crate::{Error, Result};
use tracing::info;

/// An http(s) address to add as a source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Url {
    url: String,
}

impl Url {
    /// Validate and normalize `url`
    ///
    /// A bare host such as `example.com/page` gets `http://`; schemes other
    /// than http and https are rejected.
    pub fn new(url: &str) -> Result<Self> {
        let url = url.trim();
        if url.is_empty() {
            return Err(Error::InvalidParameters("url is empty".to_string()));
        }

        let url = match url.split_once("://") {
            Some((scheme, rest)) => {
                let scheme = scheme.to_ascii_lowercase();
                if scheme != "http" && scheme != "https" {
                    return Err(Error::InvalidParameters(format!(
                        "unsupported url scheme {:?}",
                        scheme
                    )));
                }
                if rest.is_empty() {
                    return Err(Error::InvalidParameters(format!("url has no host: {}", url)));
                }
                url.to_string()
            }
            None => format!("http://{}", url),
        };

        Ok(Self { url })
    }

    pub fn as_str(&self) -> &str {
        &self.url
    }

    /// Add the page to `scene`, or to the current scene when `None`
    ///
    /// Accepts a [`Scene`](crate::scene::Scene) or a 1-based scene number.
    pub async fn add_to_scene(&self, host: &Host, scene: Option<SceneArg>) -> Result<()> {
        let name = match scene {
            Some(arg) => format!("s:{}|addurl", arg.to_scene()?.number()),
            None => "addurl".to_string(),
        };
        host.call_func(&name, &self.url).await?;
        info!("Added {} with {}", self.url, name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalization() {
        assert_eq!(Url::new("example.com").unwrap().as_str(), "http://example.com");
        assert_eq!(
            Url::new(" https://example.com/a?b=1 ").unwrap().as_str(),
            "https://example.com/a?b=1"
        );
        assert_eq!(Url::new("HTTP://x.org").unwrap().as_str(), "HTTP://x.org");
    }

    #[test]
    fn test_rejections() {
        assert!(matches!(Url::new(""), Err(Error::InvalidParameters(_))));
        assert!(matches!(Url::new("ftp://x.org"), Err(Error::InvalidParameters(_))));
        assert!(matches!(Url::new("file:///C:/a.html"), Err(Error::InvalidParameters(_))));
        assert!(matches!(Url::new("https://"), Err(Error::InvalidParameters(_))));
    }
}
