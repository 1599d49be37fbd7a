//! Banner component - a titled message box for errors and notices

use gpui::prelude::*;
use gpui::*;

#[derive(Clone, Copy, PartialEq, Eq)]
enum BannerKind {
    Error,
    Info,
}

#[derive(IntoElement)]
pub struct Banner {
    kind: BannerKind,
    title: Option<SharedString>,
    message: SharedString,
}

impl Banner {
    pub fn error(message: impl Into<SharedString>) -> Self {
        Self {
            kind: BannerKind::Error,
            title: None,
            message: message.into(),
        }
    }

    pub fn info(title: impl Into<SharedString>, message: impl Into<SharedString>) -> Self {
        Self {
            kind: BannerKind::Info,
            title: Some(title.into()),
            message: message.into(),
        }
    }
}

impl RenderOnce for Banner {
    fn render(self, _window: &mut Window, _cx: &mut App) -> impl IntoElement {
        let (bg, border, fg) = match self.kind {
            BannerKind::Error => (rgb(0x4a2a2a), rgb(0x6a3a3a), rgb(0xffaaaa)),
            BannerKind::Info => (rgb(0x1f2f45), rgb(0x34507a), rgb(0xb8d4ff)),
        };

        div()
            .w_full()
            .p_4()
            .bg(bg)
            .rounded_lg()
            .border_1()
            .border_color(border)
            .flex()
            .flex_col()
            .gap_1()
            .when_some(self.title, |el, title| {
                el.child(
                    div()
                        .text_sm()
                        .font_weight(FontWeight::SEMIBOLD)
                        .text_color(fg)
                        .child(title),
                )
            })
            .child(div().text_sm().text_color(fg).child(self.message))
    }
}
