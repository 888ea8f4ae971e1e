use yew::prelude::*;

use crate::utils;
use crate::view::projected_map::PinPosition;

#[derive(Properties, PartialEq)]
pub struct ToteMapProps {
    pub pins: Vec<PinPosition>,
    pub on_select: Callback<String>,
}

/// Map panel: one pin per geolocated tote, positioned inside the framed
/// viewport.
#[function_component(ToteMap)]
pub fn tote_map(props: &ToteMapProps) -> Html {
    html! {
        <section class="tote-map">
            if props.pins.is_empty() {
                <div class="map-empty">{ "No totes with a known position" }</div>
            }
            { for props.pins.iter().map(|pin| {
                let on_select = props.on_select.clone();
                let id = pin.tote_id.clone();
                let style = format!("left: {:.3}%; top: {:.3}%;", pin.left_pct, pin.top_pct);
                html! {
                    <button
                        key={pin.tote_id.clone()}
                        class={classes!("map-pin", utils::status_class(pin.status))}
                        {style}
                        title={pin.tote_id.clone()}
                        onclick={Callback::from(move |_: MouseEvent| on_select.emit(id.clone()))}
                    />
                }
            }) }
        </section>
    }
}
