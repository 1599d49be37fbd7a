//! Location view - geocodes the submitted location and shows where it landed

use gpui::prelude::*;
use gpui::*;
use gpui_component::ActiveTheme;
use log::{info, warn};
use report::{GeoLocation, ReportBackend};
use std::sync::Arc;

use crate::components::Banner;

enum LocationStatus {
    Idle,
    Loading(String),
    Resolved(GeoLocation),
    Failed,
}

/// Card showing the geocoded location of the last submission
///
/// Lookups are one-shot. Only the most recently requested lookup may update
/// the card.
pub struct LocationView {
    backend: Arc<dyn ReportBackend>,
    status: LocationStatus,
    lookup_seq: u64,
}

impl LocationView {
    pub fn new(backend: Arc<dyn ReportBackend>) -> Self {
        Self {
            backend,
            status: LocationStatus::Idle,
            lookup_seq: 0,
        }
    }

    /// Geocode `address`; a blank address hides the card
    pub fn locate(&mut self, address: String, cx: &mut Context<Self>) {
        self.lookup_seq += 1;
        let seq = self.lookup_seq;

        if address.trim().is_empty() {
            self.status = LocationStatus::Idle;
            cx.notify();
            return;
        }

        self.status = LocationStatus::Loading(address.clone());
        cx.notify();

        let backend = self.backend.clone();
        let background = cx.background_executor().clone();
        cx.spawn(async move |this, cx| {
            let result = background
                .spawn(async move { backend.get_location(&address) })
                .await;

            cx.update(|cx| {
                this.update(cx, |view, cx| {
                    if view.lookup_seq != seq {
                        return;
                    }
                    view.status = match result {
                        Ok(location) => {
                            info!(
                                "Located {} at {:.4}, {:.4}",
                                location.address, location.lat, location.lng
                            );
                            LocationStatus::Resolved(location)
                        }
                        Err(e) => {
                            warn!("Location lookup failed: {}", e);
                            LocationStatus::Failed
                        }
                    };
                    cx.notify();
                })
            })
            .ok();
        })
        .detach();
    }
}

impl Render for LocationView {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let theme = cx.theme();

        match &self.status {
            LocationStatus::Idle => div().into_any_element(),
            LocationStatus::Loading(address) => div()
                .text_sm()
                .text_color(theme.muted_foreground)
                .child(format!("Loading map for {}...", address))
                .into_any_element(),
            LocationStatus::Failed => Banner::error("Failed to fetch location.").into_any_element(),
            LocationStatus::Resolved(location) => div()
                .flex()
                .flex_col()
                .gap_1()
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
                        .child(format!("Location: {}", location.address)),
                )
                .child(
                    div()
                        .text_xs()
                        .text_color(theme.muted_foreground)
                        .child(format!("{:.4}, {:.4}", location.lat, location.lng)),
                )
                .into_any_element(),
        }
    }
}
