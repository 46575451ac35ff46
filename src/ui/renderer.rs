//! Server-side rendering of the pages into HTML strings

use std::panic::{AssertUnwindSafe, catch_unwind};

use leptos::prelude::*;

use super::common::Layout;
use super::pages::{HomePage, LoginPage, SignupPage, UserPage};
use super::{RenderError, TemplateRenderer, View, ViewData};

/// Renders the homepage, login, signup and user pages with leptos SSR
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlRenderer;

impl HtmlRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl TemplateRenderer for HtmlRenderer {
    fn render(&self, view: View, data: &ViewData) -> Result<String, RenderError> {
        let data = data.clone();
        let owner = Owner::new();

        catch_unwind(AssertUnwindSafe(|| owner.with(|| document(view, data))))
            .map_err(|_| RenderError::Panicked { view })
    }
}

fn document(page: View, data: ViewData) -> String {
    view! {
        <Layout page=page>
            {match page {
                View::Homepage => view! { <HomePage/> }.into_any(),
                View::Login => view! { <LoginPage data=data/> }.into_any(),
                View::Signup => view! { <SignupPage data=data/> }.into_any(),
                View::UserPage => view! { <UserPage data=data/> }.into_any(),
            }}
        </Layout>
    }
    .to_html()
}
