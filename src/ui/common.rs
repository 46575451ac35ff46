//! Reusable pieces shared by every page

use leptos::prelude::*;

use super::View;

pub const APP_TITLE: &str = "SimpleValidationApp";

/// Document shell around a page body
#[component]
pub fn Layout(page: View, children: Children) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <title>{format!("{APP_TITLE} | {page}")}</title>
                <link rel="stylesheet" href="/style.css"/>
            </head>
            <body class=format!("page-{page}")>
                <main>{children()}</main>
            </body>
        </html>
    }
}

/// Validation messages, in the order they were produced
///
/// Renders nothing when there are no errors.
#[component]
pub fn ErrorList(errors: Vec<String>) -> impl IntoView {
    (!errors.is_empty()).then(move || {
        view! {
            <ul class="errors">
                {errors.into_iter().map(|error| view! { <li>{error}</li> }).collect_view()}
            </ul>
        }
    })
}

/// Labelled form input
#[component]
pub fn FormField(
    name: &'static str,
    label: &'static str,
    input_type: &'static str,
    /// Previously submitted value; omitted for passwords
    #[prop(optional, into)]
    value: Option<String>,
) -> impl IntoView {
    view! {
        <label for=name>{label}</label>
        <input id=name name=name type=input_type value=value/>
    }
}
