//! Root application component for the report dashboard

use chrono::Utc;
use gpui::prelude::*;
use gpui::*;
use gpui_component::button::{Button, ButtonVariants};
use gpui_component::input::{Input, InputEvent, InputState};
use gpui_component::{ActiveTheme, Sizable};
use log::{debug, info};
use report::{
    DashboardConfig, RefreshApplied, RefreshTicket, RenderOptions, ReportBackend, SyncController,
    freshness_label, results_stale, run_submission,
};
use std::sync::Arc;

use crate::components::Banner;
use crate::views::{JsonTreeView, LocationView};

/// Root application state
pub struct DashboardApp {
    sync: SyncController,
    settings: DashboardConfig,
    query_input: Entity<InputState>,
    location_input: Entity<InputState>,
    json_tree: Entity<JsonTreeView>,
    location_view: Entity<LocationView>,
    /// Poll timer; dropping it stops polling
    poll_task: Option<Task<()>>,
    _subscriptions: Vec<Subscription>,
}

impl DashboardApp {
    pub fn new(
        backend: Arc<dyn ReportBackend>,
        settings: DashboardConfig,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) -> Self {
        let query_input = cx.new(|cx| InputState::new(window, cx).placeholder("Search Query..."));
        let location_input = cx.new(|cx| InputState::new(window, cx).placeholder("Location..."));
        let subscriptions = vec![
            cx.subscribe(&query_input, Self::on_input_event),
            cx.subscribe(&location_input, Self::on_input_event),
        ];

        let options = RenderOptions::with_max_depth(settings.max_tree_depth);
        let json_tree = cx.new(|_| JsonTreeView::new(options));
        let location_view = cx.new(|_| LocationView::new(backend.clone()));

        let mut app = Self {
            sync: SyncController::new(backend),
            settings,
            query_input,
            location_input,
            json_tree,
            location_view,
            poll_task: None,
            _subscriptions: subscriptions,
        };
        app.start_polling(cx);
        app
    }

    fn on_input_event(
        &mut self,
        _: Entity<InputState>,
        event: &InputEvent,
        cx: &mut Context<Self>,
    ) {
        if let InputEvent::PressEnter { .. } = event {
            self.submit(cx);
        }
    }

    /// Fetch immediately, then on every poll interval until unmounted
    ///
    /// Each tick starts its own fetch without waiting for the previous one,
    /// so slow responses can overlap. The controller's tickets decide which
    /// of them is allowed to land.
    fn start_polling(&mut self, cx: &mut Context<Self>) {
        let ticket = self.sync.mount();
        self.spawn_refresh(ticket, cx);

        let interval = self.settings.poll_interval();
        info!("Polling results every {}ms", interval.as_millis());

        self.poll_task = Some(cx.spawn(async move |this, cx| {
            loop {
                cx.background_executor().timer(interval).await;

                let still_polling = cx
                    .update(|cx| {
                        this.update(cx, |app, cx| {
                            if app.sync.state().polling_active {
                                let ticket = app.sync.begin_refresh();
                                app.spawn_refresh(ticket, cx);
                                true
                            } else {
                                false
                            }
                        })
                        .unwrap_or(false)
                    })
                    .unwrap_or(false);

                if !still_polling {
                    break;
                }
            }
        }));
    }

    /// Run one results fetch on the background executor
    fn spawn_refresh(&mut self, ticket: RefreshTicket, cx: &mut Context<Self>) {
        let backend = self.sync.backend();
        let background = cx.background_executor().clone();
        cx.spawn(async move |this, cx| {
            let result = background
                .spawn(async move { backend.fetch_results() })
                .await;

            cx.update(|cx| {
                this.update(cx, |app, cx| {
                    match app.sync.apply_refresh(ticket, result) {
                        RefreshApplied::Applied => {
                            app.publish_results(cx);
                            cx.notify();
                        }
                        outcome => {
                            debug!(
                                "Dropped results for generation {}: {:?}",
                                ticket.generation(),
                                outcome
                            );
                        }
                    }
                })
            })
            .ok();
        })
        .detach();
    }

    /// Push the current processed data into the tree view
    fn publish_results(&mut self, cx: &mut Context<Self>) {
        let json = self
            .sync
            .state()
            .processed_data
            .as_ref()
            .map(|data| data.to_string());
        self.json_tree
            .update(cx, |tree, cx| tree.set_json(json, cx));
    }

    /// Submit the form: search, then process, then refresh immediately
    ///
    /// Submissions are not serialized. Each one runs its own pipeline and
    /// the refresh tickets decide which results land.
    pub fn submit(&mut self, cx: &mut Context<Self>) {
        let query = self.query_input.read(cx).text().to_string();
        let location = self.location_input.read(cx).text().to_string();
        let request = self.sync.begin_submit(query, location);
        cx.notify();

        let backend = self.sync.backend();
        let background = cx.background_executor().clone();
        cx.spawn(async move |this, cx| {
            let address = request.location.clone();
            let result = background
                .spawn(async move { run_submission(backend.as_ref(), &request) })
                .await;

            cx.update(|cx| {
                this.update(cx, |app, cx| {
                    if app.sync.apply_submission(result) {
                        let ticket = app.sync.begin_refresh();
                        app.spawn_refresh(ticket, cx);
                        app.location_view
                            .update(cx, |view, cx| view.locate(address, cx));
                    }
                    cx.notify();
                })
            })
            .ok();
        })
        .detach();
    }

    fn render_form(&self, cx: &mut Context<Self>) -> impl IntoElement + use<> {
        let theme = cx.theme();
        let submitting = self.sync.state().submitting;

        div()
            .flex()
            .flex_col()
            .gap_3()
            .child(
                div()
                    .text_xl()
                    .font_weight(FontWeight::BOLD)
                    .text_color(theme.foreground)
                    .child("UDDHRTI Report Dashboard"),
            )
            .child(
                div()
                    .flex()
                    .items_center()
                    .gap_2()
                    .child(div().flex_1().child(Input::new(&self.query_input)))
                    .child(div().flex_1().child(Input::new(&self.location_input)))
                    .child(
                        Button::new("search-button")
                            .label(if submitting { "Searching..." } else { "Search" })
                            .primary()
                            .small()
                            .cursor_pointer()
                            .on_click(cx.listener(|app, _event, _window, cx| {
                                app.submit(cx);
                            })),
                    ),
            )
    }

    fn render_raw_json(&self, cx: &mut Context<Self>) -> impl IntoElement + use<> {
        let theme = cx.theme();
        let raw = self.sync.state().raw_json_text.clone();

        div()
            .flex()
            .flex_col()
            .gap_2()
            .p_4()
            .rounded_lg()
            .border_1()
            .border_color(theme.border)
            .bg(theme.secondary)
            .child(
                div()
                    .text_sm()
                    .font_weight(FontWeight::SEMIBOLD)
                    .text_color(theme.foreground)
                    .child("Raw JSON Content (results.json)"),
            )
            .child(
                div()
                    .id("raw-json")
                    .max_h(px(320.))
                    .overflow_y_scroll()
                    .flex()
                    .flex_col()
                    .text_xs()
                    .text_color(theme.foreground)
                    .when(raw.is_empty(), |el| {
                        el.text_color(theme.muted_foreground)
                            .child("Waiting for results...")
                    })
                    .children(raw.lines().map(|line| line.to_string()).collect::<Vec<_>>()),
            )
    }

    fn render_status(&self, cx: &mut Context<Self>) -> impl IntoElement + use<> {
        let theme = cx.theme();
        let state = self.sync.state();
        let now = Utc::now();
        let interval_ms = self.settings.poll_interval_ms;
        let stale = state.has_results() && results_stale(state.last_success_at, interval_ms, now);

        div()
            .w_full()
            .px_4()
            .py_2()
            .border_t_1()
            .border_color(theme.border)
            .flex()
            .items_center()
            .justify_between()
            .text_xs()
            .text_color(theme.muted_foreground)
            .child(
                div()
                    .when(stale, |el| el.text_color(rgb(0xffaaaa)))
                    .child(freshness_label(state.last_success_at, interval_ms, now)),
            )
            .child(format!(
                "Polling every {}s",
                self.settings.poll_interval().as_secs_f32()
            ))
    }
}

impl Drop for DashboardApp {
    fn drop(&mut self) {
        self.sync.unmount();
        self.poll_task = None;
    }
}

impl Render for DashboardApp {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let theme = cx.theme();
        let bg = theme.background;
        let fg = theme.foreground;

        let state = self.sync.state();
        let error = state.error.clone();
        let search_result = state.search_result_message.clone();

        let form = self.render_form(cx);
        let raw_json = self.render_raw_json(cx);
        let status = self.render_status(cx);

        div()
            .flex()
            .flex_col()
            .size_full()
            .bg(bg)
            .text_color(fg)
            .child(
                div()
                    .id("dashboard-content")
                    .flex()
                    .flex_col()
                    .flex_1()
                    .gap_4()
                    .pt_8()
                    .px_6()
                    .pb_4()
                    .overflow_y_scroll()
                    .child(form)
                    .when_some(error, |el, error| el.child(Banner::error(error)))
                    .when_some(search_result, |el, message| {
                        el.child(Banner::info("Search Result:", message))
                    })
                    .child(self.location_view.clone())
                    .child(raw_json)
                    .child(self.json_tree.clone()),
            )
            .child(status)
    }
}
