//! Dashboard page - KPI strip, filters, card grid, map and label modal

use yew::prelude::*;

use crate::components::{FilterBar, KpiStrip, LabelModalDialog, ToteCardView, ToteMap};
use crate::hooks::use_live_dashboard;
use crate::label_modal::ModalState;

#[function_component(DashboardPage)]
pub fn dashboard_page() -> Html {
    let dashboard = use_live_dashboard();
    let engine = dashboard.engine.borrow();
    let view = engine.view();

    let stale_banner = engine.last_error().map(|err| {
        html! {
            <div class="stale-banner">
                { format!("Live data unavailable, showing last known state ({})", err) }
            </div>
        }
    });

    let withheld_hint = engine.view_withheld().then(|| {
        html! {
            <div class="withheld-hint">{ "New data arrives when the label dialog closes" }</div>
        }
    });

    let modal = match engine.modal().state() {
        ModalState::Open(open) => html! {
            <LabelModalDialog
                modal={open.clone()}
                on_close={dashboard.close_label.clone()}
                on_upload={dashboard.upload_label.clone()}
            />
        },
        ModalState::Closed => html! {},
    };

    // Clicking a pin narrows the grid to that tote
    let on_pin_select = {
        let set_query = dashboard.set_query.clone();
        Callback::from(move |tote_id: String| set_query.emit(tote_id))
    };

    html! {
        <div class="dashboard">
            <header class="dashboard-header">
                <h1>{ &dashboard.app_title }</h1>
            </header>

            { for stale_banner }
            { for withheld_hint }

            <KpiStrip kpis={view.kpis} />

            <FilterBar
                active={engine.status_filter()}
                query={engine.query().to_string()}
                refreshing={engine.poll_in_flight()}
                on_filter={dashboard.set_filter.clone()}
                on_query={dashboard.set_query.clone()}
                on_refresh={dashboard.refresh.clone()}
            />

            <div class="dashboard-body">
                <section class="tote-grid">
                    if view.cards.is_empty() {
                        <div class="tote-grid-empty">{ "No totes match the current filter" }</div>
                    }
                    { for view.cards.iter().map(|card| html! {
                        <ToteCardView
                            key={card.id.clone()}
                            card={card.clone()}
                            on_open_label={dashboard.open_label.clone()}
                        />
                    }) }
                </section>

                <ToteMap pins={engine.map().surface().pins()} on_select={on_pin_select} />
            </div>

            { modal }
        </div>
    }
}
