//! HTML rendering.
//!
//! Templates are compiled into the binary and parsed once at startup. Every
//! page sees a `dev` flag so the header and post cards can show authoring
//! links in development mode only.

pub mod pagination;
pub mod view;

use serde::Serialize;
use tera::{Context, Tera};
use tracing::debug;

use crate::config::RunMode;
use crate::error::Result;

pub use pagination::{PageLink, Pagination};
pub use view::{AdminForm, ErrorPage, HomePage, PostCard};

const TEMPLATES: &[(&str, &str)] = &[
    ("base.html", include_str!("templates/base.html")),
    ("home.html", include_str!("templates/home.html")),
    ("admin_form.html", include_str!("templates/admin_form.html")),
    ("admin_disabled.html", include_str!("templates/admin_disabled.html")),
    ("error.html", include_str!("templates/error.html")),
];

/// Compiled page templates.
#[derive(Debug)]
pub struct Views {
    tera: Tera,
    mode: RunMode,
}

impl Views {
    /// Parse the bundled templates.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Template`] if a template fails to parse.
    pub fn new(mode: RunMode) -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(TEMPLATES.iter().copied())?;
        debug!("Loaded {} templates", TEMPLATES.len());
        Ok(Self { tera, mode })
    }

    /// The post list with the activity sidebar.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    pub fn home(&self, page: &HomePage) -> Result<String> {
        self.render("home.html", page)
    }

    /// The create or edit form.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    pub fn admin_form(&self, form: &AdminForm) -> Result<String> {
        self.render("admin_form.html", form)
    }

    /// Notice shown on `/admin` when authoring is off.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    pub fn admin_disabled(&self) -> Result<String> {
        let mut context = self.context();
        context.insert("mode", &self.mode.to_string());
        Ok(self.tera.render("admin_disabled.html", &context)?)
    }

    /// An error page.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    pub fn error(&self, page: &ErrorPage) -> Result<String> {
        self.render("error.html", page)
    }

    fn render(&self, template: &str, data: &impl Serialize) -> Result<String> {
        let mut context = Context::from_serialize(data)?;
        context.extend(self.context());
        Ok(self.tera.render(template, &context)?)
    }

    fn context(&self) -> Context {
        let mut context = Context::new();
        context.insert("dev", &self.mode.allows_writes());
        context
    }
}
