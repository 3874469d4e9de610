use crate::cache::fingerprint;
use crate::container::{NodeId, Surface};

/// Render wrapper parameters.
#[derive(Debug, Clone)]
pub struct RenderSettings {
    /// Attach to matching server markup instead of replacing it.
    pub hydrate: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self { hydrate: true }
    }
}

/// How markup reached its destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    /// Server pass: markup to embed in the outgoing document.
    Markup(String),
    /// Existing server-rendered nodes were kept and behavior attached.
    Hydrated,
    /// Container contents were replaced wholesale.
    Replaced,
    /// Client pass without a container; nothing was written.
    NoContainer,
}

/// Writes resolved markup into a resolved container.
#[derive(Debug, Clone, Default)]
pub struct RenderWrapper {
    settings: RenderSettings,
}

impl RenderWrapper {
    pub fn new(settings: RenderSettings) -> Self {
        Self { settings }
    }

    pub fn with_default() -> Self {
        Self::new(RenderSettings::default())
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut RenderSettings {
        &mut self.settings
    }

    /// Apply `markup` for the current surface.
    ///
    /// Hydration is only considered when `hydration_allowed` is set (first
    /// client write for the slot) and the container already holds markup with
    /// the same fingerprint.
    pub fn apply_markup(
        &self,
        surface: &mut Surface<'_>,
        container: Option<NodeId>,
        markup: &str,
        hydration_allowed: bool,
    ) -> Applied {
        let document = match surface {
            Surface::Server => return Applied::Markup(markup.to_string()),
            Surface::Client(document) => document,
        };
        let Some(node) = container else {
            return Applied::NoContainer;
        };

        if hydration_allowed && self.settings.hydrate {
            let existing = document.inner_html(node).unwrap_or_default();
            if !is_blank(&existing) && fingerprint(&existing) == fingerprint(markup) {
                document.hydrate(node);
                return Applied::Hydrated;
            }
        }

        document.set_inner_html(node, markup);
        Applied::Replaced
    }

    /// Remove injected markup. Returns whether anything was cleared; a blank
    /// container is left alone.
    pub fn clear(&self, surface: &mut Surface<'_>, container: Option<NodeId>) -> bool {
        let (Surface::Client(document), Some(node)) = (surface, container) else {
            return false;
        };
        match document.inner_html(node) {
            Some(existing) if !is_blank(&existing) => {
                document.set_inner_html(node, "");
                true
            }
            _ => false,
        }
    }
}

/// Whitespace-only contents count as an empty container.
fn is_blank(html: &str) -> bool {
    html.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::{Document, MemoryDocument};

    #[test]
    fn server_returns_markup_string() {
        let wrapper = RenderWrapper::with_default();
        let applied = wrapper.apply_markup(&mut Surface::Server, None, "<nav/>", true);
        assert_eq!(applied, Applied::Markup("<nav/>".to_string()));
    }

    #[test]
    fn matching_server_markup_is_hydrated() {
        let mut document = MemoryDocument::new();
        let node = document.insert("#header", "<nav>a</nav>");
        let wrapper = RenderWrapper::with_default();

        let applied = wrapper.apply_markup(
            &mut Surface::client(&mut document),
            Some(node),
            "<nav>a</nav>",
            true,
        );

        assert_eq!(applied, Applied::Hydrated);
        assert_eq!(document.hydrations_of("#header"), 1);
        assert_eq!(document.write_count(), 0);
    }

    #[test]
    fn mismatched_or_late_markup_is_replaced() {
        let mut document = MemoryDocument::new();
        let node = document.insert("#header", "<nav>old</nav>");
        let wrapper = RenderWrapper::with_default();

        let applied = wrapper.apply_markup(
            &mut Surface::client(&mut document),
            Some(node),
            "<nav>new</nav>",
            true,
        );
        assert_eq!(applied, Applied::Replaced);

        let again = wrapper.apply_markup(
            &mut Surface::client(&mut document),
            Some(node),
            "<nav>new</nav>",
            false,
        );
        assert_eq!(again, Applied::Replaced);
        assert_eq!(document.hydrations_of("#header"), 0);
        assert_eq!(document.writes_to(node), 2);
    }

    #[test]
    fn hydration_can_be_disabled() {
        let mut document = MemoryDocument::new();
        let node = document.insert("#header", "<nav/>");
        let mut wrapper = RenderWrapper::with_default();
        wrapper.settings_mut().hydrate = false;

        let applied =
            wrapper.apply_markup(&mut Surface::client(&mut document), Some(node), "<nav/>", true);
        assert_eq!(applied, Applied::Replaced);
    }

    #[test]
    fn client_without_container_writes_nothing() {
        let mut document = MemoryDocument::new();
        let wrapper = RenderWrapper::with_default();
        let applied = wrapper.apply_markup(&mut Surface::client(&mut document), None, "x", true);
        assert_eq!(applied, Applied::NoContainer);
        assert_eq!(document.write_count(), 0);
    }

    #[test]
    fn clear_is_idempotent() {
        let mut document = MemoryDocument::new();
        let node = document.insert("#header", "<nav/>");
        document.insert("#footer", "<p/>");
        let wrapper = RenderWrapper::with_default();

        assert!(wrapper.clear(&mut Surface::client(&mut document), Some(node)));
        assert!(!wrapper.clear(&mut Surface::client(&mut document), Some(node)));
        assert_eq!(document.inner_html(node).as_deref(), Some(""));
        assert_eq!(document.html_of("#footer").as_deref(), Some("<p/>"));
        assert!(!wrapper.clear(&mut Surface::Server, None));
    }

    #[test]
    fn whitespace_only_container_is_empty_for_hydrate_and_clear() {
        let mut document = MemoryDocument::new();
        let node = document.insert("#header", "  \n ");
        let wrapper = RenderWrapper::with_default();

        assert!(!wrapper.clear(&mut Surface::client(&mut document), Some(node)));
        assert_eq!(document.write_count(), 0);

        let applied =
            wrapper.apply_markup(&mut Surface::client(&mut document), Some(node), "  \n ", true);
        assert_eq!(applied, Applied::Replaced);
        assert_eq!(document.hydrations_of("#header"), 0);
    }
}
