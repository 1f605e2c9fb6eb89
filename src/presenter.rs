//! HTML page rendering

use crate::config::TemplatesConfig;
use anyhow::{Context, Result};
use handlebars::{Handlebars, RenderError};
use serde_json::json;
use std::path::Path;
use tracing::info;

/// Landing page
pub const HOME: &str = "home";
/// Measurement input form
pub const FORM: &str = "form";
/// Predicted crop
pub const PREDICTION: &str = "prediction";

const BUILTIN_TEMPLATES: [(&str, &str); 3] = [
    (HOME, include_str!("../templates/home.hbs")),
    (FORM, include_str!("../templates/form.hbs")),
    (PREDICTION, include_str!("../templates/prediction.hbs")),
];

/// Renders the three service pages
pub struct Presenter {
    handlebars: Handlebars<'static>,
}

impl Presenter {
    /// Build a presenter from the compiled-in templates, replacing any that
    /// exist as `<name>.hbs` in the configured override directory
    pub fn new(config: &TemplatesConfig) -> Result<Self> {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(true);

        for (name, source) in BUILTIN_TEMPLATES {
            let override_path = config
                .dir
                .as_deref()
                .map(|dir| Path::new(dir).join(format!("{}.hbs", name)))
                .filter(|path| path.is_file());

            match override_path {
                Some(path) => {
                    info!(template = name, path = %path.display(), "Using template override");
                    handlebars
                        .register_template_file(name, &path)
                        .with_context(|| format!("Failed to load template {}", path.display()))?;
                }
                None => handlebars
                    .register_template_string(name, source)
                    .with_context(|| format!("Invalid built-in template '{}'", name))?,
            }
        }

        Ok(Self { handlebars })
    }

    /// Presenter with only the compiled-in templates
    pub fn builtin() -> Result<Self> {
        Self::new(&TemplatesConfig::default())
    }

    /// Landing page linking to the form
    pub fn render_home(&self) -> Result<String, RenderError> {
        self.handlebars.render(HOME, &json!({}))
    }

    /// Empty measurement form posting to `/form`
    pub fn render_form(&self) -> Result<String, RenderError> {
        self.handlebars.render(FORM, &json!({}))
    }

    /// Result page; the label is HTML-escaped
    pub fn render_prediction(&self, crop: &str) -> Result<String, RenderError> {
        self.handlebars
            .render(PREDICTION, &json!({ "prediction": crop }))
    }
}
