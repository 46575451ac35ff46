//! Page rendering
//!
//! Handlers never build HTML themselves; they hand a `View` and its
//! `ViewData` to a `TemplateRenderer`.

mod common;
mod pages;
mod renderer;

pub use renderer::HtmlRenderer;

use derive_more::Display;
use serde::Serialize;

use crate::core::validation::ValidationResult;

/// Pages the application can render
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum View {
    #[display("homepage")]
    Homepage,
    #[display("login")]
    Login,
    #[display("signup")]
    Signup,
    #[display("userPage")]
    UserPage,
}

/// Data passed to a view
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ViewData {
    pub errors: Vec<String>,
    pub username: String,
    pub email: String,
}

impl ViewData {
    /// Data for a signed-in user's page
    pub fn for_user(username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            errors: Vec::new(),
            username: username.into(),
            email: email.into(),
        }
    }
}

impl From<ValidationResult> for ViewData {
    fn from(result: ValidationResult) -> Self {
        Self {
            errors: result.errors,
            username: result.values.username,
            email: result.values.email,
        }
    }
}

/// Template rendering errors
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Rendering view '{view}' failed")]
    Panicked { view: View },
}

/// Turns a view and its data into an HTML document
pub trait TemplateRenderer: Send + Sync {
    fn render(&self, view: View, data: &ViewData) -> Result<String, RenderError>;
}
