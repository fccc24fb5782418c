//! Vertical page layout: sections stacked top to bottom, measured in rows.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Home,
    Skills,
    Projects,
    Experience,
    Philosophy,
    Contact,
}

impl Section {
    pub const ALL: [Section; 6] = [
        Section::Home,
        Section::Skills,
        Section::Projects,
        Section::Experience,
        Section::Philosophy,
        Section::Contact,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Section::Home => "home",
            Section::Skills => "skills",
            Section::Projects => "projects",
            Section::Experience => "experience",
            Section::Philosophy => "philosophy",
            Section::Contact => "contact",
        }
    }

    /// Rows the section occupies on the page.
    pub fn height(self) -> u16 {
        match self {
            Section::Home => 30,
            Section::Skills => 36,
            Section::Projects => 48,
            Section::Experience => 20,
            Section::Philosophy => 26,
            Section::Contact => 40,
        }
    }

    pub fn from_name(name: &str) -> Option<Section> {
        let name = name.trim().trim_start_matches('#').to_lowercase();
        Section::ALL
            .into_iter()
            .find(|s| s.title() == name || (name == "hero" && *s == Section::Home))
    }

    pub fn from_index(index: usize) -> Option<Section> {
        Section::ALL.get(index).copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionSpan {
    pub section: Section,
    pub top: u16,
    pub height: u16,
}

#[derive(Debug, Clone)]
pub struct PageLayout {
    spans: Vec<SectionSpan>,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl PageLayout {
    pub fn new() -> Self {
        let mut top = 0;
        let spans = Section::ALL
            .into_iter()
            .map(|section| {
                let span = SectionSpan {
                    section,
                    top,
                    height: section.height(),
                };
                top += section.height();
                span
            })
            .collect();
        Self { spans }
    }

    pub fn spans(&self) -> &[SectionSpan] {
        &self.spans
    }

    pub fn total_height(&self) -> u16 {
        self.spans.last().map_or(0, |s| s.top + s.height)
    }

    pub fn span(&self, section: Section) -> Option<SectionSpan> {
        self.spans.iter().copied().find(|s| s.section == section)
    }

    pub fn top_of(&self, section: Section) -> u16 {
        self.span(section).map_or(0, |s| s.top)
    }

    pub fn max_scroll(&self, viewport: u16) -> u16 {
        self.total_height().saturating_sub(viewport)
    }

    /// Section under the first visible row.
    pub fn section_at(&self, row: u16) -> Section {
        self.spans
            .iter()
            .rev()
            .find(|s| s.top <= row)
            .map_or(Section::Home, |s| s.section)
    }

    /// Fraction of `section` inside the viewport, with the viewport grown
    /// by `margin` rows on both ends. A section taller than that window
    /// counts as fully visible once it fills it.
    pub fn visible_ratio(&self, section: Section, scroll: u16, viewport: u16, margin: u16) -> f32 {
        let Some(span) = self.span(section) else {
            return 0.0;
        };
        if span.height == 0 {
            return 0.0;
        }
        let view_top = scroll.saturating_sub(margin) as u32;
        let view_bottom = scroll as u32 + viewport as u32 + margin as u32;
        let top = span.top as u32;
        let bottom = top + span.height as u32;

        let overlap = view_bottom.min(bottom).saturating_sub(view_top.max(top));
        let capacity = (span.height as u32).min(view_bottom - view_top);
        if capacity == 0 {
            return 0.0;
        }
        overlap as f32 / capacity as f32
    }
}
