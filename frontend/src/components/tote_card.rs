use yew::prelude::*;

use crate::utils;
use crate::view::ToteCard;

#[derive(Properties, PartialEq)]
pub struct ToteCardViewProps {
    pub card: ToteCard,
    pub on_open_label: Callback<String>,
}

/// One tote panel. Keyed by tote id in the grid so the label thumbnail
/// state survives re-renders.
#[function_component(ToteCardView)]
pub fn tote_card_view(props: &ToteCardViewProps) -> Html {
    let card = &props.card;
    let label_missing = use_state(|| false);

    // A fresh label URL (new tote in this slot, or a new upload) gets a
    // fresh attempt
    {
        let label_missing = label_missing.clone();
        use_effect_with(card.label_url.clone(), move |_| {
            label_missing.set(false);
            || ()
        });
    }

    let on_label_error = {
        let label_missing = label_missing.clone();
        Callback::from(move |_: Event| label_missing.set(true))
    };

    let on_open = {
        let on_open_label = props.on_open_label.clone();
        let id = card.id.clone();
        Callback::from(move |_: MouseEvent| on_open_label.emit(id.clone()))
    };

    html! {
        <article class="tote-card">
            <header class="tote-card-header">
                <h2>{ &card.title }</h2>
                <span class="tote-id">{ &card.id }</span>
                <span class={classes!("status-badge", utils::status_class(card.status))}>
                    { card.status.label() }
                </span>
            </header>

            <div class="reading reading-temperature">
                <span class="reading-label">{ "Temperature" }</span>
                <span class="reading-value">{ &card.temperature }</span>
            </div>
            <div class="reading reading-humidity">
                <span class="reading-label">{ "Humidity" }</span>
                <span class="reading-value">{ &card.humidity }</span>
            </div>
            <div class="reading reading-lux">
                <span class="reading-label">{ "Lux" }</span>
                <span class="reading-value">{ &card.lux }</span>
            </div>

            <div class="tote-location">
                <span class="reading-label">{ "Location" }</span>
                <span>{ &card.location }</span>
                if let Some(url) = &card.maps_url {
                    <a href={url.clone()} target="_blank" rel="noopener">{ "Open" }</a>
                }
            </div>

            <div class="tote-updated">{ format!("Updated: {}", card.last_updated) }</div>

            <div class="tote-label">
                <span class="reading-label">{ "Barcode Label" }</span>
                <div class="label-thumb">
                    if *label_missing {
                        <span class="label-missing">{ "No image" }</span>
                    } else {
                        <img
                            src={card.label_url.clone()}
                            alt={format!("Label for {}", card.id)}
                            onerror={on_label_error}
                        />
                    }
                </div>
                <button class="label-button" onclick={on_open}>{ "View / Upload" }</button>
            </div>
        </article>
    }
}
