//! Hook that drives the sync engine from the browser: interval polling,
//! manual refresh, label probes and uploads.
//!
//! The engine lives in an `Rc<RefCell<_>>` shared by every callback. A
//! borrow is never held across an `.await`, so completions always see a
//! consistent engine.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::config::DashboardConfig;
use crate::label_modal::{LabelSelection, ProbeRequest};
use crate::sync::{fetcher, PollOutcome, PollTicket, PollTrigger, SyncEngine};
use crate::utils;
use crate::view::{ProjectedMap, StatusFilter};

pub type DashboardEngine = SyncEngine<ProjectedMap>;
pub type SharedEngine = Rc<RefCell<DashboardEngine>>;

/// Return value from the use_live_dashboard hook.
pub struct UseLiveDashboard {
    pub engine: SharedEngine,
    pub app_title: String,
    pub refresh: Callback<()>,
    pub set_filter: Callback<StatusFilter>,
    pub set_query: Callback<String>,
    pub open_label: Callback<String>,
    pub close_label: Callback<()>,
    pub upload_label: Callback<Option<web_sys::File>>,
}

/// Run the request for an issued poll ticket and apply its response.
fn run_poll(engine: SharedEngine, ticket: PollTicket, redraw: Callback<()>) {
    spawn_local(async move {
        let result = fetcher::fetch_snapshot().await;
        let follow_up = {
            let mut engine = engine.borrow_mut();
            if let PollOutcome::Withheld { generation } = engine.complete_poll(ticket, result) {
                log::debug!("Snapshot {} waiting for label modal to close", generation);
            }
            engine.take_follow_up()
        };
        redraw.emit(());
        if let Some(ticket) = follow_up {
            run_poll(engine, ticket, redraw);
        }
    });
}

fn start_poll(engine: &SharedEngine, trigger: PollTrigger, redraw: &Callback<()>) {
    let ticket = engine.borrow_mut().begin_poll(trigger);
    if let Some(ticket) = ticket {
        redraw.emit(());
        run_poll(engine.clone(), ticket, redraw.clone());
    }
}

fn run_probe(engine: SharedEngine, probe: ProbeRequest, redraw: Callback<()>) {
    spawn_local(async move {
        let found = match fetcher::probe_label(&probe.url).await {
            Ok(found) => found,
            Err(err) => {
                log::warn!("Label probe for {} failed: {}", probe.tote_id, err);
                false
            }
        };
        let applied = engine
            .borrow_mut()
            .modal_mut()
            .probe_finished(&probe.tote_id, probe.token, found);
        if applied {
            redraw.emit(());
        }
    });
}

/// Hook for the live tote dashboard.
///
/// Fetches the app config and a first snapshot on mount, then polls on the
/// configured interval. Polls are serialized by the engine; while the label
/// modal is open their view effects are withheld.
#[hook]
pub fn use_live_dashboard() -> UseLiveDashboard {
    let engine = use_mut_ref(|| {
        SyncEngine::new(
            &DashboardConfig::default(),
            ProjectedMap::new(),
            utils::session_seed(),
            chrono::Local,
        )
    });
    let config = use_state(DashboardConfig::default);
    let app_title = use_state(|| shared::AppConfig::default().app_title);

    let redraw = {
        let force = use_force_update();
        Callback::from(move |_: ()| force.force_update())
    };

    // Fetch app configuration, then the first snapshot
    {
        let engine = engine.clone();
        let config = config.clone();
        let app_title = app_title.clone();
        let redraw = redraw.clone();
        use_effect_with((), move |_| {
            start_poll(&engine, PollTrigger::Manual, &redraw);
            spawn_local(async move {
                match fetcher::fetch_app_config().await {
                    Ok(app) => {
                        config.set(DashboardConfig::default().with_app_config(&app));
                        app_title.set(app.app_title);
                    }
                    Err(err) => log::warn!("Using default dashboard config: {}", err),
                }
            });
            || ()
        });
    }

    // Interval polling, restarted whenever the interval changes
    {
        let engine = engine.clone();
        let redraw = redraw.clone();
        use_effect_with(config.poll_interval_ms, move |interval_ms| {
            let interval = gloo::timers::callback::Interval::new(*interval_ms, move || {
                start_poll(&engine, PollTrigger::Timer, &redraw);
            });
            move || drop(interval)
        });
    }

    let refresh = {
        let engine = engine.clone();
        let redraw = redraw.clone();
        Callback::from(move |_| start_poll(&engine, PollTrigger::Manual, &redraw))
    };

    let set_filter = {
        let engine = engine.clone();
        let redraw = redraw.clone();
        Callback::from(move |status_filter: StatusFilter| {
            engine.borrow_mut().set_status_filter(status_filter);
            redraw.emit(());
        })
    };

    let set_query = {
        let engine = engine.clone();
        let redraw = redraw.clone();
        Callback::from(move |query: String| {
            engine.borrow_mut().set_query(query);
            redraw.emit(());
        })
    };

    let open_label = {
        let engine = engine.clone();
        let redraw = redraw.clone();
        Callback::from(move |tote_id: String| {
            let opened = engine.borrow_mut().open_label(&tote_id);
            match opened {
                Ok(probe) => {
                    redraw.emit(());
                    run_probe(engine.clone(), probe, redraw.clone());
                }
                Err(err) => log::warn!("Cannot open label for {}: {}", tote_id, err),
            }
        })
    };

    let close_label = {
        let engine = engine.clone();
        let redraw = redraw.clone();
        Callback::from(move |_| {
            let resume = engine.borrow_mut().close_label();
            redraw.emit(());
            if resume {
                start_poll(&engine, PollTrigger::Resume, &redraw);
            }
        })
    };

    let upload_label = {
        let engine = engine.clone();
        let redraw = redraw.clone();
        Callback::from(move |file: Option<web_sys::File>| {
            let selection = file.as_ref().map(|f| LabelSelection {
                name: f.name(),
                size: f.size().max(0.0) as u64,
            });
            let request = engine.borrow_mut().modal_mut().upload(selection.as_ref());
            redraw.emit(());

            let (Ok(request), Some(file)) = (request, file) else {
                return;
            };
            let engine = engine.clone();
            let redraw = redraw.clone();
            spawn_local(async move {
                let result = fetcher::upload_label(&request.url, &file).await;
                let reprobe = engine.borrow_mut().label_upload_finished(
                    &request.tote_id,
                    request.token,
                    result,
                );
                redraw.emit(());
                if let Some(probe) = reprobe {
                    run_probe(engine, probe, redraw);
                }
            });
        })
    };

    UseLiveDashboard {
        engine,
        app_title: (*app_title).clone(),
        refresh,
        set_filter,
        set_query,
        open_label,
        close_label,
        upload_label,
    }
}
