//! Page bodies

use leptos::prelude::*;

use super::ViewData;
use super::common::{APP_TITLE, ErrorList, FormField};

#[component]
pub fn HomePage() -> impl IntoView {
    view! {
        <h1>{APP_TITLE}</h1>
        <nav>
            <a href="/login">"Log in"</a>
            <a href="/signup">"Sign up"</a>
        </nav>
    }
}

#[component]
pub fn LoginPage(data: ViewData) -> impl IntoView {
    let ViewData { errors, email, .. } = data;

    view! {
        <h1>"Log in"</h1>
        <ErrorList errors=errors/>
        <form method="post" action="/login">
            <FormField name="email" label="Email" input_type="email" value=email/>
            <FormField name="password" label="Password" input_type="password"/>
            <button type="submit">"Log in"</button>
        </form>
        <p>"No account yet? "<a href="/signup">"Sign up"</a></p>
    }
}

#[component]
pub fn SignupPage(data: ViewData) -> impl IntoView {
    let ViewData {
        errors,
        username,
        email,
    } = data;

    view! {
        <h1>"Sign up"</h1>
        <ErrorList errors=errors/>
        <form method="post" action="/signup">
            <FormField name="username" label="Username" input_type="text" value=username/>
            <FormField name="email" label="Email" input_type="email" value=email/>
            <FormField name="password" label="Password" input_type="password"/>
            <FormField name="repeat_password" label="Repeat password" input_type="password"/>
            <button type="submit">"Sign up"</button>
        </form>
        <p>"Already registered? "<a href="/login">"Log in"</a></p>
    }
}

/// Signed-in user's page
#[component]
pub fn UserPage(data: ViewData) -> impl IntoView {
    view! {
        <h1>{format!("Welcome, {}", data.username)}</h1>
        <p>"You are signed in as "<strong>{data.email}</strong>"."</p>
        <a href="/logout">"Log out"</a>
    }
}
