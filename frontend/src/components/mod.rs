mod filter_bar;
mod kpi_strip;
mod label_modal_dialog;
mod tote_card;
mod tote_map;

pub use filter_bar::FilterBar;
pub use kpi_strip::KpiStrip;
pub use label_modal_dialog::LabelModalDialog;
pub use tote_card::ToteCardView;
pub use tote_map::ToteMap;
