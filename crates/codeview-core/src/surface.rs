//! Render targets driven by the controller: the code surface, the tab
//! strip and the copy button.

use codeview_syntax::strip_markup;

/// Visibility of the code surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Visible,
    /// Faded out while content is about to change
    Hidden,
}

/// The single text display receiving annotated markup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplaySurface {
    markup: String,
    visibility: Visibility,
}

impl DisplaySurface {
    pub fn new(markup: String) -> Self {
        Self {
            markup,
            visibility: Visibility::Visible,
        }
    }

    /// Current annotated content.
    pub fn markup(&self) -> &str {
        &self.markup
    }

    /// Current content with annotations removed.
    pub fn text_content(&self) -> String {
        strip_markup(&self.markup)
    }

    pub fn set_markup(&mut self, markup: String) {
        self.markup = markup;
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// CSS-style opacity for the current visibility.
    pub fn opacity(&self) -> f32 {
        match self.visibility {
            Visibility::Visible => 1.0,
            Visibility::Hidden => 0.0,
        }
    }

    pub fn hide(&mut self) {
        self.visibility = Visibility::Hidden;
    }

    pub fn show(&mut self) {
        self.visibility = Visibility::Visible;
    }
}

/// The row of selectable tabs, one per snippet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabStrip {
    tabs: Vec<String>,
    selected: String,
}

impl TabStrip {
    pub fn new(tabs: Vec<String>, selected: impl Into<String>) -> Self {
        Self {
            tabs,
            selected: selected.into(),
        }
    }

    pub fn tabs(&self) -> &[String] {
        &self.tabs
    }

    pub fn selected(&self) -> &str {
        &self.selected
    }

    pub fn is_active(&self, tab: &str) -> bool {
        self.selected == tab
    }

    /// Marks `tab` active. Returns false if the strip has no such tab; the
    /// selection is updated either way.
    pub fn select(&mut self, tab: &str) -> bool {
        self.selected = tab.to_string();
        self.tabs.iter().any(|t| t == tab)
    }
}

/// Transient "copied" state of the copy button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyConfirmation {
    copied: bool,
    idle_label: String,
    copied_label: String,
}

impl CopyConfirmation {
    pub fn new(idle_label: impl Into<String>, copied_label: impl Into<String>) -> Self {
        Self {
            copied: false,
            idle_label: idle_label.into(),
            copied_label: copied_label.into(),
        }
    }

    pub fn is_copied(&self) -> bool {
        self.copied
    }

    /// Label the button should show right now.
    pub fn label(&self) -> &str {
        if self.copied {
            &self.copied_label
        } else {
            &self.idle_label
        }
    }

    pub fn confirm(&mut self) {
        self.copied = true;
    }

    pub fn reset(&mut self) {
        self.copied = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surface_visibility() {
        let mut surface = DisplaySurface::new(String::new());
        assert_eq!(surface.opacity(), 1.0);
        surface.hide();
        assert_eq!(surface.visibility(), Visibility::Hidden);
        assert_eq!(surface.opacity(), 0.0);
        surface.show();
        assert_eq!(surface.opacity(), 1.0);
    }

    #[test]
    fn test_text_content_strips_markup() {
        let surface = DisplaySurface::new(
            r#"<span class="keyword">if</span> a &lt; b"#.to_string(),
        );
        assert_eq!(surface.text_content(), "if a < b");
    }

    #[test]
    fn test_tab_strip_select() {
        let mut tabs = TabStrip::new(vec!["client".into(), "insert".into()], "client");
        assert!(tabs.is_active("client"));
        assert!(tabs.select("insert"));
        assert!(tabs.is_active("insert"));
        assert!(!tabs.is_active("client"));
        assert!(!tabs.select("other"));
    }

    #[test]
    fn test_confirmation_label() {
        let mut confirmation = CopyConfirmation::new("Copy", "Copied!");
        assert_eq!(confirmation.label(), "Copy");
        confirmation.confirm();
        assert!(confirmation.is_copied());
        assert_eq!(confirmation.label(), "Copied!");
        confirmation.reset();
        assert_eq!(confirmation.label(), "Copy");
    }
}
