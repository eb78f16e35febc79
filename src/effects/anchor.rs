//! Smooth scrolling for same-page anchors

pub const ANCHOR_SELECTOR: &str = r##"a[href^="#"]"##;

/// What a click on a link with `href` should do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorAction<'a> {
    /// Leave the browser's default navigation alone
    Default,
    /// Cancel navigation and smooth-scroll to the element matching `selector`,
    /// aligned to the top of the viewport
    ScrollTo { selector: &'a str },
}

/// Classify a link click. Bare `#` and non-fragment links are left alone.
pub fn anchor_action(href: Option<&str>) -> AnchorAction<'_> {
    match href {
        Some(href) if href.starts_with('#') && href != "#" => AnchorAction::ScrollTo { selector: href },
        _ => AnchorAction::Default,
    }
}
