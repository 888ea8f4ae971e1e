use yew::prelude::*;
use yew_router::prelude::*;

use crate::Route;

#[function_component(NotFoundPage)]
pub fn not_found_page() -> Html {
    html! {
        <div class="not-found-container">
            <div class="not-found-content">
                <h1>{ "Page not found" }</h1>
                <p>{ "The tote dashboard lives at the root of this site." }</p>
                <Link<Route> to={Route::Dashboard} classes="not-found-link">
                    { "Back to dashboard" }
                </Link<Route>>
            </div>
        </div>
    }
}
