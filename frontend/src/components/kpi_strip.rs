use shared::ToteStatus;
use yew::prelude::*;

use crate::utils;
use crate::view::Kpis;

#[derive(Properties, PartialEq)]
pub struct KpiStripProps {
    pub kpis: Kpis,
}

#[function_component(KpiStrip)]
pub fn kpi_strip(props: &KpiStripProps) -> Html {
    let kpis = props.kpis;

    html! {
        <section class="kpi-strip">
            <div class="kpi-tile">
                <span class="kpi-label">{ "Total Totes" }</span>
                <span class="kpi-value">{ kpis.total }</span>
            </div>
            { for ToteStatus::ALL.iter().map(|status| html! {
                <div class="kpi-tile">
                    <span class="kpi-label">{ status.label() }</span>
                    <span class={classes!("kpi-value", utils::status_class(*status))}>
                        { kpis.count(*status) }
                    </span>
                </div>
            }) }
            <div class="kpi-tile">
                <span class="kpi-label">{ "Lux Active" }</span>
                <span class="kpi-value kpi-info">{ kpis.lux_active }</span>
            </div>
        </section>
    }
}
