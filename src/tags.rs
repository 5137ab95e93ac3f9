//! Tag shapes for stylesheets and module scripts, plus the ordered tag accumulator.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::Regex;

use crate::attributes::TagAttributes;
use crate::util::partition;

const LINE_ENDING: &str = "\n";

fn css_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\.(css|less|sass|scss|styl|stylus|pcss|postcss)(\?[^.]*)?$")
            .expect("invalid css extension regex")
    })
}

/// Determine whether a path refers to some flavour of stylesheet.
///
/// A trailing query string such as `?inline` or `?v=3` is allowed after the extension.
pub fn is_css_path(path: &str) -> bool {
    css_pattern().is_match(path)
}

/// The two kinds of tag the resolver emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    /// `<link rel="stylesheet" ... />`
    Stylesheet,
    /// `<script type="module" ...></script>`
    Script,
}

impl TagKind {
    /// Pick the tag kind from the URL's extension.
    pub fn for_url(url: &str) -> Self {
        if is_css_path(url) {
            Self::Stylesheet
        } else {
            Self::Script
        }
    }

    /// Render a tag for `url`, merging `attributes` over the base set.
    ///
    /// The base set is `rel`/`href` for stylesheets or `type`/`src` for scripts, followed by
    /// `nonce` (omitted when `None`).
    pub fn render(self, url: &str, nonce: Option<&str>, attributes: TagAttributes) -> String {
        let mut merged = match self {
            Self::Stylesheet => TagAttributes::new().with("rel", "stylesheet").with("href", url),
            Self::Script => TagAttributes::new().with("type", "module").with("src", url),
        };
        merged.insert("nonce", nonce);
        merged.merge(attributes);

        match self {
            Self::Stylesheet => format!("<link {} />{LINE_ENDING}", merged.render()),
            Self::Script => format!("<script {}></script>{LINE_ENDING}", merged.render()),
        }
    }
}

/// Returns `true` for tags produced by [`TagKind::Stylesheet`].
pub fn is_stylesheet_tag(tag: &str) -> bool {
    tag.starts_with("<link")
}

/// Ordered, de-duplicated collection of rendered tags.
#[derive(Debug, Default)]
pub struct TagList {
    seen: BTreeSet<String>,
    tags: Vec<String>,
}

impl TagList {
    /// Empty tag list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a tag unless an identical one was pushed earlier.
    pub fn push(&mut self, tag: String) {
        if self.seen.insert(tag.clone()) {
            self.tags.push(tag);
        }
    }

    /// Number of distinct tags collected so far.
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Returns `true` when nothing has been pushed.
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Stylesheets first, then scripts, each group keeping its original relative order.
    pub fn finish(self) -> String {
        let (stylesheets, scripts) = partition(self.tags, |tag| is_stylesheet_tag(tag));
        let mut output = stylesheets.concat();
        output.push_str(&scripts.concat());
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_css_family_extensions() {
        for path in [
            "app.css",
            "theme.less",
            "a.sass",
            "a.scss",
            "a.styl",
            "a.stylus",
            "a.pcss",
            "a.postcss",
            "build/assets/app.css?inline",
            "app.css?v=3",
        ] {
            assert!(is_css_path(path), "{path} should be css");
        }
    }

    #[test]
    fn rejects_non_css_paths() {
        for path in ["app.js", "app.css.js", "app.ts", "styles/", "app.css?v=1.2", "css"] {
            assert!(!is_css_path(path), "{path} should not be css");
        }
    }

    #[test]
    fn renders_minimal_tags() {
        assert_eq!(
            TagKind::Script.render("build/assets/app.abc.js", None, TagAttributes::new()),
            "<script type=\"module\" src=\"build/assets/app.abc.js\"></script>\n"
        );
        assert_eq!(
            TagKind::Stylesheet.render("build/app.css", None, TagAttributes::new()),
            "<link rel=\"stylesheet\" href=\"build/app.css\" />\n"
        );
    }

    #[test]
    fn nonce_follows_url_and_precedes_extra_attributes() {
        let tag = TagKind::Script.render(
            "build/app.js",
            Some("n0nce"),
            TagAttributes::new().with("defer", true),
        );
        assert_eq!(
            tag,
            "<script type=\"module\" src=\"build/app.js\" nonce=\"n0nce\" defer></script>\n"
        );
    }

    #[test]
    fn extra_attributes_can_override_base_ones() {
        let tag = TagKind::Stylesheet.render(
            "build/app.css",
            None,
            TagAttributes::new().with("rel", "preload"),
        );
        assert_eq!(tag, "<link rel=\"preload\" href=\"build/app.css\" />\n");
    }

    #[test]
    fn tag_list_dedups_then_partitions() {
        let mut tags = TagList::new();
        tags.push("<script src=\"a\"></script>\n".into());
        tags.push("<link href=\"x\" />\n".into());
        tags.push("<script src=\"b\"></script>\n".into());
        tags.push("<link href=\"x\" />\n".into());
        tags.push("<link href=\"y\" />\n".into());
        tags.push("<script src=\"a\"></script>\n".into());

        assert_eq!(tags.len(), 4);
        assert_eq!(
            tags.finish(),
            "<link href=\"x\" />\n<link href=\"y\" />\n<script src=\"a\"></script>\n<script src=\"b\"></script>\n"
        );
    }

    #[test]
    fn empty_tag_list_renders_nothing() {
        let tags = TagList::new();
        assert!(tags.is_empty());
        assert_eq!(tags.finish(), "");
    }
}
