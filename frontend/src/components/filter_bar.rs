use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::view::StatusFilter;

#[derive(Properties, PartialEq)]
pub struct FilterBarProps {
    pub active: StatusFilter,
    pub query: String,
    /// A poll is in flight
    pub refreshing: bool,
    pub on_filter: Callback<StatusFilter>,
    pub on_query: Callback<String>,
    pub on_refresh: Callback<()>,
}

#[function_component(FilterBar)]
pub fn filter_bar(props: &FilterBarProps) -> Html {
    let on_input = {
        let on_query = props.on_query.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            on_query.emit(input.value());
        })
    };

    let on_refresh = {
        let on_refresh = props.on_refresh.clone();
        Callback::from(move |_: MouseEvent| on_refresh.emit(()))
    };

    html! {
        <section class="filter-bar">
            <input
                type="text"
                class="search-input"
                placeholder="Search..."
                value={props.query.clone()}
                oninput={on_input}
            />
            { for StatusFilter::CHOICES.iter().map(|choice| {
                let choice = *choice;
                let on_filter = props.on_filter.clone();
                let class = classes!("chip", (choice == props.active).then_some("active"));
                let onclick = Callback::from(move |_: MouseEvent| on_filter.emit(choice));
                html! {
                    <button {class} {onclick}>
                        { choice.label() }
                    </button>
                }
            }) }
            <button class="refresh-button" disabled={props.refreshing} onclick={on_refresh}>
                { if props.refreshing { "Refreshing..." } else { "Refresh" } }
            </button>
        </section>
    }
}
