//! Browser dashboard for the tote fleet.
//!
//! The synchronization core (`sync`, `view`, `label_modal`) is plain Rust
//! with no DOM access; `components`, `hooks` and `pages` are the Yew layer
//! that applies its output to the page.

mod components;
mod hooks;
mod pages;

pub mod config;
pub mod label_modal;
pub mod sync;
pub mod utils;
pub mod view;

use pages::{dashboard::DashboardPage, not_found::NotFoundPage};
use yew::prelude::*;
use yew_router::prelude::*;

#[derive(Clone, Routable, PartialEq)]
pub enum Route {
    #[at("/")]
    Dashboard,
    #[not_found]
    #[at("/404")]
    NotFound,
}

fn switch(routes: Route) -> Html {
    match routes {
        Route::Dashboard => html! { <DashboardPage /> },
        Route::NotFound => html! { <NotFoundPage /> },
    }
}

#[function_component(App)]
fn app() -> Html {
    html! {
        <BrowserRouter>
            <Switch<Route> render={switch} />
        </BrowserRouter>
    }
}

#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn run_app() {
    wasm_logger::init(wasm_logger::Config::default());
    yew::Renderer::<App>::new().render();
}
