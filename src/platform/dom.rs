//! Page regions and body classes

use web_sys::{Document, Element};

use crate::Rect;
use crate::sim::host::ScrollGate;
use crate::sim::scroll::{RegionSource, TrackedRegion};

const FOOTER_SELECTOR: &str = ".site-footer";
const ALLOW_SCROLL_CLASS: &str = "allow-scroll";
const INTERACTIVE_CLASS: &str = "is-interactive";

fn selector(region: TrackedRegion) -> &'static str {
    match region {
        TrackedRegion::Orange => ".orange-section",
        TrackedRegion::Pink => ".pink-section",
    }
}

fn client_rect(element: &Element) -> Rect {
    let r = element.get_bounding_client_rect();
    Rect::new(r.left() as f32, r.top() as f32, r.width() as f32, r.height() as f32)
}

/// Footer and its two sections, queried live on every call
pub struct DomRegions {
    document: Document,
}

impl DomRegions {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    fn footer(&self) -> Option<Element> {
        self.document.query_selector(FOOTER_SELECTOR).ok().flatten()
    }
}

impl RegionSource for DomRegions {
    fn host_rect(&self) -> Option<Rect> {
        self.footer().map(|footer| client_rect(&footer))
    }

    fn region_rect(&self, region: TrackedRegion) -> Option<Rect> {
        let section = self.footer()?.query_selector(selector(region)).ok().flatten()?;
        Some(client_rect(&section))
    }
}

/// Adds `allow-scroll` to `<body>`
pub struct BodyScrollGate {
    document: Document,
}

impl BodyScrollGate {
    pub fn new(document: Document) -> Self {
        Self { document }
    }
}

impl ScrollGate for BodyScrollGate {
    fn allow_scroll(&mut self) {
        match self.document.body() {
            Some(body) => {
                if let Err(e) = body.class_list().add_1(ALLOW_SCROLL_CLASS) {
                    log::warn!("Failed to unlock scrolling: {e:?}");
                }
            }
            None => log::warn!("No <body> to unlock scrolling on"),
        }
    }
}

/// Toggle pointer interaction on the canvas (drag vs. page scroll)
pub fn set_interactive(element: &Element, interactive: bool) {
    let classes = element.class_list();
    let _ = if interactive {
        classes.add_1(INTERACTIVE_CLASS)
    } else {
        classes.remove_1(INTERACTIVE_CLASS)
    };
}
