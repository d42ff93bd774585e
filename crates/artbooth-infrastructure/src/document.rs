//! Self-contained HTML download page.
//!
//! The page embeds the image as a `data:` URI and offers a download button,
//! so it can be hosted anywhere that serves plain HTML.

use crate::publish::data_uri;
use artbooth_core::publish::Artifact;
use minijinja::{Environment, context};

const TEMPLATE_NAME: &str = "download_page.html";
const TEMPLATE: &str = include_str!("../templates/download_page.html");

/// Renders download pages for published artifacts.
pub struct DownloadPage {
    env: Environment<'static>,
}

impl DownloadPage {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.add_template(TEMPLATE_NAME, TEMPLATE)?;
        Ok(Self { env })
    }

    /// Renders the page for `artifact`.
    ///
    /// The style name and file name are HTML-escaped; the data URI is
    /// inserted verbatim since it only contains base64 characters.
    pub fn render(&self, artifact: &Artifact) -> Result<String, minijinja::Error> {
        let template = self.env.get_template(TEMPLATE_NAME)?;
        template.render(context! {
            style_name => artifact.label(),
            file_name => artifact.file_name(),
            image_data_uri => data_uri(artifact),
        })
    }
}
