//! Live synchronization engine.
//!
//! Owns the state store, the poll bookkeeping, the filter selection, the map
//! reconciler and the label modal. The engine never performs I/O: a poll is
//! split into `begin_poll` (before the request) and `complete_poll` (with
//! the response), so the caller can suspend on the network in between
//! while the engine keeps at most one poll in flight.

use chrono::TimeZone;
use shared::{ApiError, Snapshot, UploadLabelResponse};
use std::collections::HashMap;
use std::fmt::Display;

use crate::config::{DashboardConfig, SuppressionPolicy};
use crate::label_modal::{LabelModal, ModalError, ProbeRequest};
use crate::view::{
    cards, filter, kpi, Kpis, MapReconciler, MarkerSurface, ReconcileReport, StatusFilter,
    ToteCard,
};

use super::store::StateStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollTrigger {
    /// Interval tick
    Timer,
    /// Refresh button
    Manual,
    /// Label modal closed
    Resume,
}

/// Proof that a poll was issued; handed back with its response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollTicket {
    id: u64,
    pub trigger: PollTrigger,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    /// Snapshot installed and every view recomputed from it
    Rendered {
        generation: u64,
        map: ReconcileReport,
    },
    /// Snapshot installed, views held back while the label modal is open
    Withheld { generation: u64 },
    /// Previous snapshot retained
    Failed(ApiError),
    /// Ticket was not the poll in flight
    Discarded,
}

/// Everything the card grid and KPI strip show, derived from one snapshot.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DashboardView {
    /// Store generation the view was computed from
    pub generation: u64,
    pub kpis: Kpis,
    pub cards: Vec<ToteCard>,
}

#[derive(Debug, Default)]
struct PollState {
    in_flight: Option<u64>,
    issued: u64,
    follow_up: bool,
    last_error: Option<ApiError>,
}

pub struct SyncEngine<S: MarkerSurface, Tz: TimeZone = chrono::Local> {
    store: StateStore,
    /// Snapshot the current view and markers were computed from
    rendered: Snapshot,
    rendered_generation: u64,
    poll: PollState,
    status_filter: StatusFilter,
    query: String,
    map: MapReconciler<S>,
    modal: LabelModal,
    /// Cache-bust value of each tote's latest successful label upload
    label_revisions: HashMap<String, String>,
    policy: SuppressionPolicy,
    view: DashboardView,
    tz: Tz,
}

impl<S, Tz> SyncEngine<S, Tz>
where
    S: MarkerSurface,
    Tz: TimeZone,
    Tz::Offset: Display,
{
    pub fn new(config: &DashboardConfig, surface: S, session_seed: u64, tz: Tz) -> Self {
        Self {
            store: StateStore::new(),
            rendered: Snapshot::empty(),
            rendered_generation: 0,
            poll: PollState::default(),
            status_filter: StatusFilter::All,
            query: String::new(),
            map: MapReconciler::new(surface, config.map_padding),
            modal: LabelModal::new(session_seed),
            label_revisions: HashMap::new(),
            policy: config.suppression,
            view: DashboardView::default(),
            tz,
        }
    }

    pub fn view(&self) -> &DashboardView {
        &self.view
    }

    pub fn map(&self) -> &MapReconciler<S> {
        &self.map
    }

    pub fn modal(&self) -> &LabelModal {
        &self.modal
    }

    pub fn modal_mut(&mut self) -> &mut LabelModal {
        &mut self.modal
    }

    pub fn store(&self) -> &StateStore {
        &self.store
    }

    pub fn status_filter(&self) -> StatusFilter {
        self.status_filter
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Error of the most recent poll, cleared by the next success
    pub fn last_error(&self) -> Option<&ApiError> {
        self.poll.last_error.as_ref()
    }

    pub fn poll_in_flight(&self) -> bool {
        self.poll.in_flight.is_some()
    }

    /// True when a newer snapshot than the rendered one is held back
    pub fn view_withheld(&self) -> bool {
        self.store.generation() != self.rendered_generation
    }

    /// Issue a poll, unless one is already in flight or the modal policy
    /// skips timer ticks. A manual or resume request arriving during an
    /// in-flight poll is remembered and served once by
    /// [`SyncEngine::take_follow_up`].
    pub fn begin_poll(&mut self, trigger: PollTrigger) -> Option<PollTicket> {
        if trigger == PollTrigger::Timer
            && self.modal.is_open()
            && self.policy == SuppressionPolicy::SkipPoll
        {
            log::debug!("Skipping timer poll while label modal is open");
            return None;
        }
        if self.poll.in_flight.is_some() {
            if trigger != PollTrigger::Timer {
                self.poll.follow_up = true;
            }
            return None;
        }
        self.poll.issued += 1;
        self.poll.in_flight = Some(self.poll.issued);
        Some(PollTicket {
            id: self.poll.issued,
            trigger,
        })
    }

    /// Issue the poll requested while the previous one was in flight. The
    /// request stays pending until a ticket is actually issued.
    pub fn take_follow_up(&mut self) -> Option<PollTicket> {
        if !self.poll.follow_up {
            return None;
        }
        let ticket = self.begin_poll(PollTrigger::Manual)?;
        self.poll.follow_up = false;
        Some(ticket)
    }

    /// Apply the response of the poll identified by `ticket`.
    pub fn complete_poll(
        &mut self,
        ticket: PollTicket,
        result: Result<Snapshot, ApiError>,
    ) -> PollOutcome {
        if self.poll.in_flight != Some(ticket.id) {
            log::debug!("Discarding response of superseded poll {}", ticket.id);
            return PollOutcome::Discarded;
        }
        self.poll.in_flight = None;

        let snapshot = match result {
            Ok(snapshot) => snapshot,
            Err(err) => {
                log::error!("Live poll failed, keeping previous snapshot: {}", err);
                self.poll.last_error = Some(err.clone());
                return PollOutcome::Failed(err);
            }
        };

        self.poll.last_error = None;
        let generation = self.store.replace(snapshot);

        if self.modal.is_open() {
            log::debug!(
                "Withholding view update for generation {} while label modal is open",
                generation
            );
            return PollOutcome::Withheld { generation };
        }

        let map = self.render_current();
        PollOutcome::Rendered { generation, map }
    }

    pub fn set_status_filter(&mut self, status_filter: StatusFilter) -> &DashboardView {
        self.status_filter = status_filter;
        self.project();
        &self.view
    }

    pub fn set_query(&mut self, query: impl Into<String>) -> &DashboardView {
        self.query = query.into();
        self.project();
        &self.view
    }

    /// Open the label modal for a tote; synchronization is suspended until
    /// [`SyncEngine::close_label`].
    pub fn open_label(&mut self, tote_id: &str) -> Result<ProbeRequest, ModalError> {
        self.modal.open(tote_id)
    }

    /// Apply a label upload result to the modal. A successful upload also
    /// bumps the tote's label revision, which the cards pick up when the
    /// modal closes. Returns the re-probe to run, if any.
    pub fn label_upload_finished(
        &mut self,
        tote_id: &str,
        token: u64,
        result: Result<UploadLabelResponse, ApiError>,
    ) -> Option<ProbeRequest> {
        let probe = self.modal.upload_finished(tote_id, token, result)?;
        self.label_revisions
            .insert(tote_id.to_string(), probe.cache_bust.clone());
        Some(probe)
    }

    /// Close the label modal, render any withheld snapshot, and report
    /// whether a resume poll should be issued right away.
    pub fn close_label(&mut self) -> bool {
        if !self.modal.close() {
            return false;
        }
        if self.view_withheld() {
            self.render_current();
        } else {
            self.project();
        }
        true
    }

    /// Make the store's snapshot the rendered one and recompute every view.
    fn render_current(&mut self) -> ReconcileReport {
        self.rendered = self.store.current().clone();
        self.rendered_generation = self.store.generation();
        self.project();
        let report = self.map.reconcile(&self.rendered);
        if !report.is_noop() {
            log::debug!("Map reconciled: {:?}", report);
        }
        report
    }

    /// Recompute cards and KPIs from the rendered snapshot.
    fn project(&mut self) {
        let ids = filter::select(&self.rendered, self.status_filter, &self.query);
        self.view = DashboardView {
            generation: self.rendered_generation,
            kpis: kpi::aggregate(&ids, &self.rendered),
            cards: cards::render(&ids, &self.rendered, &self.tz, &self.label_revisions),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label_modal::ModalState;
    use crate::view::map::tests::{located, Op, Recorder};
    use chrono::Utc;
    use shared::{GeoPoint, ToteRecord, ToteStatus};

    fn engine_with(policy: SuppressionPolicy) -> SyncEngine<Recorder, Utc> {
        let config = DashboardConfig {
            suppression: policy,
            ..DashboardConfig::default()
        };
        SyncEngine::new(&config, Recorder::default(), 1, Utc)
    }

    fn engine() -> SyncEngine<Recorder, Utc> {
        engine_with(SuppressionPolicy::WithholdView)
    }

    fn poll(engine: &mut SyncEngine<Recorder, Utc>, snapshot: Snapshot) -> PollOutcome {
        let ticket = engine.begin_poll(PollTrigger::Timer).unwrap();
        engine.complete_poll(ticket, Ok(snapshot))
    }

    fn scenario_snapshot() -> Snapshot {
        let mut a = located("A", ToteStatus::Critical, 40.1, -73.9);
        a.temperature = Some(75.0);
        let mut b = ToteRecord::new("B", ToteStatus::Normal);
        b.temperature = Some(20.0);
        Snapshot::from_records(vec![a, b])
    }

    fn card_ids(engine: &SyncEngine<Recorder, Utc>) -> Vec<&str> {
        engine.view().cards.iter().map(|c| c.id.as_str()).collect()
    }

    #[test]
    fn poll_renders_kpis_cards_and_markers() {
        let mut engine = engine();
        let outcome = poll(&mut engine, scenario_snapshot());

        assert!(matches!(outcome, PollOutcome::Rendered { generation: 1, .. }));
        assert_eq!(
            engine.view().kpis,
            Kpis {
                total: 2,
                normal: 1,
                warning: 0,
                critical: 1,
                lux_active: 0,
            }
        );
        assert_eq!(card_ids(&engine), vec!["A", "B"]);
        assert_eq!(engine.map().tracked_ids().collect::<Vec<_>>(), vec!["A"]);
    }

    #[test]
    fn search_narrows_view_without_touching_snapshot() {
        let mut engine = engine();
        let mut record = ToteRecord::new("TOTE001", ToteStatus::Normal);
        record.location = Some("Warehouse A".to_string());
        poll(&mut engine, Snapshot::from_records(vec![record]));

        assert_eq!(engine.set_query("warehouse").kpis.total, 1);
        assert_eq!(engine.set_query("zz").kpis.total, 0);
        assert!(engine.view().cards.is_empty());
        assert_eq!(engine.store().current().len(), 1);
        // Markers follow the full snapshot, not the filtered view
        assert_eq!(engine.map().tracked_ids().count(), 0);
    }

    #[test]
    fn status_filter_updates_kpis() {
        let mut engine = engine();
        poll(&mut engine, scenario_snapshot());
        let view = engine.set_status_filter(StatusFilter::Only(ToteStatus::Critical));
        assert_eq!(view.kpis.total, 1);
        assert_eq!(view.kpis.critical, 1);
        assert_eq!(card_ids(&engine), vec!["A"]);
    }

    #[test]
    fn failed_poll_keeps_previous_snapshot_and_loop_continues() {
        let mut engine = engine();
        poll(&mut engine, scenario_snapshot());

        let ticket = engine.begin_poll(PollTrigger::Timer).unwrap();
        let outcome =
            engine.complete_poll(ticket, Err(ApiError::Network("timeout".to_string())));

        assert!(matches!(outcome, PollOutcome::Failed(_)));
        assert_eq!(engine.store().generation(), 1);
        assert_eq!(engine.view().cards.len(), 2);
        assert!(engine.last_error().is_some());

        // Next tick proceeds and clears the error
        assert!(matches!(poll(&mut engine, scenario_snapshot()), PollOutcome::Rendered { .. }));
        assert!(engine.last_error().is_none());
    }

    #[test]
    fn only_one_poll_in_flight() {
        let mut engine = engine();
        let ticket = engine.begin_poll(PollTrigger::Timer).unwrap();
        assert!(engine.poll_in_flight());
        assert!(engine.begin_poll(PollTrigger::Timer).is_none());
        assert!(engine.begin_poll(PollTrigger::Manual).is_none());

        engine.complete_poll(ticket, Ok(scenario_snapshot()));
        // The manual refresh that arrived mid-flight is served exactly once
        let follow_up = engine.take_follow_up().unwrap();
        assert_eq!(follow_up.trigger, PollTrigger::Manual);
        engine.complete_poll(follow_up, Ok(scenario_snapshot()));
        assert!(engine.take_follow_up().is_none());
    }

    #[test]
    fn stale_ticket_is_discarded() {
        let mut engine = engine();
        let ticket = engine.begin_poll(PollTrigger::Timer).unwrap();
        engine.complete_poll(ticket, Ok(scenario_snapshot()));

        let replay = engine.complete_poll(ticket, Ok(Snapshot::empty()));
        assert_eq!(replay, PollOutcome::Discarded);
        assert_eq!(engine.store().current().len(), 2);
    }

    #[test]
    fn coordinate_change_moves_marker_once() {
        let mut engine = engine();
        poll(
            &mut engine,
            Snapshot::from_records(vec![located("A", ToteStatus::Normal, 10.0, 10.0)]),
        );
        let outcome = poll(
            &mut engine,
            Snapshot::from_records(vec![located("A", ToteStatus::Normal, 20.0, 20.0)]),
        );

        match outcome {
            PollOutcome::Rendered { map, .. } => {
                assert_eq!(map.moved, 1);
                assert_eq!(map.placed, 0);
                assert_eq!(map.removed, 0);
            }
            other => panic!("unexpected outcome {:?}", other),
        }
        let moves = engine
            .map()
            .surface()
            .ops
            .iter()
            .filter(|op| matches!(op, Op::Move(..)))
            .count();
        assert_eq!(moves, 1);
    }

    #[test]
    fn identical_polls_are_quiet_on_the_map() {
        let mut engine = engine();
        poll(&mut engine, scenario_snapshot());
        let ops = engine.map().surface().ops.len();

        match poll(&mut engine, scenario_snapshot()) {
            PollOutcome::Rendered { map, .. } => assert!(map.is_noop()),
            other => panic!("unexpected outcome {:?}", other),
        }
        assert_eq!(engine.map().surface().ops.len(), ops);
    }

    #[test]
    fn open_modal_withholds_view_until_close() {
        let mut engine = engine();
        poll(&mut engine, scenario_snapshot());
        engine.open_label("A").unwrap();

        let moved = Snapshot::from_records(vec![located("A", ToteStatus::Warning, 41.0, -74.0)]);
        let outcome = poll(&mut engine, moved);

        assert_eq!(outcome, PollOutcome::Withheld { generation: 2 });
        assert!(engine.view_withheld());
        assert_eq!(engine.view().generation, 1);
        assert_eq!(engine.view().cards.len(), 2);

        // Filtering while withheld still reads the rendered snapshot
        engine.set_status_filter(StatusFilter::All);
        assert_eq!(engine.view().generation, 1);

        assert!(engine.close_label());
        assert!(!engine.view_withheld());
        assert_eq!(engine.view().generation, 2);
        assert_eq!(card_ids(&engine), vec!["A"]);
        assert_eq!(engine.map().tracked_ids().collect::<Vec<_>>(), vec!["A"]);
        assert!(engine
            .map()
            .surface()
            .ops
            .contains(&Op::Move("A".to_string(), GeoPoint::new(41.0, -74.0).unwrap())));
    }

    #[test]
    fn close_requests_resume_poll() {
        let mut engine = engine();
        assert!(!engine.close_label());

        engine.open_label("A").unwrap();
        assert!(engine.close_label());
        let ticket = engine.begin_poll(PollTrigger::Resume).unwrap();
        assert_eq!(ticket.trigger, PollTrigger::Resume);
    }

    #[test]
    fn resume_during_in_flight_poll_becomes_follow_up() {
        let mut engine = engine();
        engine.open_label("A").unwrap();
        let ticket = engine.begin_poll(PollTrigger::Timer).unwrap();

        assert!(engine.close_label());
        assert!(engine.begin_poll(PollTrigger::Resume).is_none());

        let outcome = engine.complete_poll(ticket, Ok(scenario_snapshot()));
        assert!(matches!(outcome, PollOutcome::Rendered { .. }));
        assert!(engine.take_follow_up().is_some());
    }

    #[test]
    fn skip_policy_drops_timer_ticks_while_open() {
        let mut engine = engine_with(SuppressionPolicy::SkipPoll);
        engine.open_label("TOTE003").unwrap();
        assert!(engine.begin_poll(PollTrigger::Timer).is_none());

        // An explicit refresh still runs, and its view is withheld
        let ticket = engine.begin_poll(PollTrigger::Manual).unwrap();
        let outcome = engine.complete_poll(ticket, Ok(scenario_snapshot()));
        assert_eq!(outcome, PollOutcome::Withheld { generation: 1 });

        assert!(engine.close_label());
        assert_eq!(engine.view().generation, 1);
        assert!(engine.begin_poll(PollTrigger::Resume).is_some());
    }

    #[test]
    fn follow_up_survives_until_issued() {
        let mut engine = engine_with(SuppressionPolicy::SkipPoll);
        let first = engine.begin_poll(PollTrigger::Timer).unwrap();
        engine.open_label("TOTE003").unwrap();
        assert!(engine.begin_poll(PollTrigger::Manual).is_none());

        // Nothing to issue while the first poll is still out
        assert!(engine.take_follow_up().is_none());
        engine.complete_poll(first, Ok(scenario_snapshot()));

        let follow_up = engine.take_follow_up().unwrap();
        assert_eq!(follow_up.trigger, PollTrigger::Manual);
        engine.complete_poll(follow_up, Ok(scenario_snapshot()));
        assert!(engine.take_follow_up().is_none());
    }

    fn label_urls(engine: &SyncEngine<Recorder, Utc>) -> Vec<String> {
        engine
            .view()
            .cards
            .iter()
            .map(|c| c.label_url.clone())
            .collect()
    }

    #[test]
    fn successful_upload_refreshes_card_label() {
        let mut engine = engine();
        poll(&mut engine, scenario_snapshot());
        let before = label_urls(&engine);
        poll(&mut engine, scenario_snapshot());
        assert_eq!(label_urls(&engine), before);

        let probe = engine.open_label("A").unwrap();
        engine.modal_mut().probe_finished("A", probe.token, false);
        let upload = engine
            .modal_mut()
            .upload(Some(&crate::label_modal::LabelSelection {
                name: "label.png".to_string(),
                size: 512,
            }))
            .unwrap();
        let reprobe = engine
            .label_upload_finished(
                "A",
                upload.token,
                Ok(UploadLabelResponse {
                    ok: true,
                    error: None,
                }),
            )
            .unwrap();
        assert!(engine.close_label());

        let after = label_urls(&engine);
        assert_ne!(after[0], before[0]);
        assert_eq!(after[0], format!("/label/A.png?v={}", reprobe.cache_bust));
        // Other cards keep their URL
        assert_eq!(after[1], before[1]);

        // Ordinary polls keep the new revision
        poll(&mut engine, scenario_snapshot());
        assert_eq!(label_urls(&engine), after);
    }

    #[test]
    fn failed_upload_keeps_card_label() {
        let mut engine = engine();
        poll(&mut engine, scenario_snapshot());
        let before = label_urls(&engine);

        engine.open_label("A").unwrap();
        let upload = engine
            .modal_mut()
            .upload(Some(&crate::label_modal::LabelSelection {
                name: "label.png".to_string(),
                size: 512,
            }))
            .unwrap();
        let rejected = UploadLabelResponse {
            ok: false,
            error: Some("file missing".to_string()),
        };
        assert!(engine
            .label_upload_finished("A", upload.token, Ok(rejected))
            .is_none());
        engine.close_label();

        assert_eq!(label_urls(&engine), before);
    }

    #[test]
    fn upload_without_file_leaves_modal_open() {
        let mut engine = engine();
        let probe = engine.open_label("TOTE003").unwrap();
        engine.modal_mut().probe_finished("TOTE003", probe.token, false);

        assert_eq!(engine.modal_mut().upload(None), Err(ModalError::NoFile));
        match engine.modal().state() {
            ModalState::Open(open) => {
                assert_eq!(open.tote_id, "TOTE003");
                assert_eq!(open.preview, crate::label_modal::PreviewStatus::Absent);
            }
            ModalState::Closed => panic!("modal closed"),
        }
    }

    #[test]
    fn view_is_deterministic_for_same_input() {
        let mut engine = engine();
        poll(&mut engine, scenario_snapshot());
        let first = engine.set_query("a").clone();
        let second = engine.set_query("a").clone();
        assert_eq!(first, second);
    }
}
