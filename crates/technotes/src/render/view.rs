//! Template contexts.

use std::fmt::Display;

use chrono::TimeZone;
use serde::Serialize;

use crate::activity::ActivityCalendar;
use crate::format::Segment;
use crate::icons::{self, TechIcon};
use crate::post::{Post, MAX_CONTENT_CHARS};

use super::pagination::Pagination;

/// Timestamp format on post cards.
const CARD_TIME_FORMAT: &str = "%Y/%m/%d %H:%M";

/// Icon badge data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IconView {
    /// Display label.
    pub label: &'static str,
    /// CDN image URL.
    pub url: String,
    /// Badge background class.
    pub bg_color: &'static str,
}

impl From<&TechIcon> for IconView {
    fn from(icon: &TechIcon) -> Self {
        Self {
            label: icon.label,
            url: icon.url(),
            bg_color: icon.bg_color,
        }
    }
}

/// Code block as shown under a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeView {
    /// Language label, `text` when untagged.
    pub language: String,
    /// Block body.
    pub code: String,
}

/// One post card on the home page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostCard {
    /// Post id, for the edit link.
    pub id: String,
    /// Icon badge.
    pub icon: IconView,
    /// Creation time in the viewer's timezone.
    pub created: String,
    /// Prose segments.
    pub prose: Vec<Segment>,
    /// Extracted code block.
    pub code: Option<CodeView>,
}

impl PostCard {
    /// Build a card, formatting the timestamp in `tz`.
    #[must_use]
    pub fn new<Tz>(post: &Post, tz: &Tz) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let formatted = post.formatted();
        Self {
            id: post.id.clone(),
            icon: post.icon().into(),
            created: post
                .created_at
                .with_timezone(tz)
                .format(CARD_TIME_FORMAT)
                .to_string(),
            prose: formatted.prose,
            code: formatted.code.map(|block| CodeView {
                language: block.language_label().to_string(),
                code: block.code,
            }),
        }
    }
}

/// Context for the home page.
#[derive(Debug, Clone, Serialize)]
pub struct HomePage {
    /// Cards on this page.
    pub cards: Vec<PostCard>,
    /// Total posts in the store.
    pub total: usize,
    /// Heatmap and stats.
    pub calendar: ActivityCalendar,
    /// Page navigation, absent for a single page.
    pub pagination: Option<Pagination>,
}

/// An option in the icon select.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IconOption {
    /// Catalog key.
    pub key: &'static str,
    /// Display label.
    pub label: &'static str,
    /// Whether the option is preselected.
    pub selected: bool,
}

/// An `<optgroup>` in the icon select.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IconOptionGroup {
    /// Group heading.
    pub name: &'static str,
    /// Options in picker order.
    pub options: Vec<IconOption>,
}

/// Context for the create and edit forms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminForm {
    /// Post being edited; `None` on the create form.
    pub post_id: Option<String>,
    /// Textarea contents.
    pub content: String,
    /// Selected icon key.
    pub tech_icon: String,
    /// Validation message from the last submit.
    pub error: Option<String>,
    /// Textarea limit.
    pub max_chars: usize,
    /// Icon select groups.
    pub groups: Vec<IconOptionGroup>,
}

impl AdminForm {
    /// An empty create form.
    #[must_use]
    pub fn create() -> Self {
        Self::build(None, String::new(), icons::DEFAULT_KEY.to_string())
    }

    /// An edit form prefilled from `post`.
    #[must_use]
    pub fn edit(post: &Post) -> Self {
        Self::build(
            Some(post.id.clone()),
            post.content.clone(),
            post.tech_icon.clone(),
        )
    }

    /// Refill the form with rejected input and the reason.
    #[must_use]
    pub fn rejected(mut self, content: &str, tech_icon: &str, error: impl Display) -> Self {
        self.content = content.to_string();
        self.tech_icon = tech_icon.to_string();
        self.groups = option_groups(tech_icon);
        self.error = Some(error.to_string());
        self
    }

    fn build(post_id: Option<String>, content: String, tech_icon: String) -> Self {
        Self {
            groups: option_groups(&tech_icon),
            post_id,
            content,
            tech_icon,
            error: None,
            max_chars: MAX_CONTENT_CHARS,
        }
    }
}

/// Picker options with `selected` preselected. An unknown key selects the
/// fallback, so saving the form never swaps in the first option.
fn option_groups(selected: &str) -> Vec<IconOptionGroup> {
    let selected = if icons::is_known(selected) {
        selected
    } else {
        icons::FALLBACK_KEY
    };

    icons::groups()
        .iter()
        .map(|group| IconOptionGroup {
            name: group.name,
            options: group
                .keys
                .iter()
                .filter_map(|&key| {
                    icons::lookup(key).map(|icon| IconOption {
                        key,
                        label: icon.label,
                        selected: key == selected,
                    })
                })
                .collect(),
        })
        .collect()
}

/// Context for the error page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorPage {
    /// HTTP status code.
    pub status: u16,
    /// Short heading.
    pub title: String,
    /// Explanation.
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::post::PostDraft;
    use chrono::{FixedOffset, Utc};

    fn post(content: &str, icon: &str) -> Post {
        let mut post = Post::new(PostDraft::new(content, icon).unwrap());
        post.created_at = Utc.with_ymd_and_hms(2025, 1, 14, 23, 30, 0).unwrap();
        post
    }

    #[test]
    fn test_card_formats_local_time() {
        let tz = FixedOffset::east_opt(9 * 3600).unwrap();
        let card = PostCard::new(&post("hello", "rust"), &tz);
        assert_eq!(card.created, "2025/01/15 08:30");
    }

    #[test]
    fn test_card_icon_and_code() {
        let card = PostCard::new(&post("run\n```\nls\n```", "linux"), &Utc);
        assert_eq!(card.icon.label, "Linux");
        assert!(card.icon.url.starts_with("https://cdn.simpleicons.org/linux/"));

        let code = card.code.unwrap();
        assert_eq!(code.language, "text");
        assert_eq!(code.code, "ls");
    }

    #[test]
    fn test_card_unknown_icon_falls_back() {
        let mut p = post("x", "go");
        p.tech_icon = "nope".to_string();
        let card = PostCard::new(&p, &Utc);
        assert_eq!(card.icon.label, "Other");
    }

    #[test]
    fn test_create_form_defaults() {
        let form = AdminForm::create();
        assert!(form.post_id.is_none());
        assert_eq!(form.tech_icon, "docker");
        assert_eq!(form.max_chars, 200);

        let selected: Vec<_> = form
            .groups
            .iter()
            .flat_map(|g| &g.options)
            .filter(|o| o.selected)
            .collect();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].key, "docker");
    }

    #[test]
    fn test_edit_form_prefills() {
        let p = post("body", "python");
        let form = AdminForm::edit(&p);
        assert_eq!(form.post_id.as_deref(), Some(p.id.as_str()));
        assert_eq!(form.content, "body");
        assert_eq!(form.tech_icon, "python");
    }

    #[test]
    fn test_rejected_form_keeps_input() {
        let form = AdminForm::create().rejected("   ", "go", "Content is required");
        assert_eq!(form.content, "   ");
        assert_eq!(form.tech_icon, "go");
        assert_eq!(form.error.as_deref(), Some("Content is required"));
        assert!(form
            .groups
            .iter()
            .flat_map(|g| &g.options)
            .any(|o| o.key == "go" && o.selected));
    }

    #[test]
    fn test_edit_form_with_unknown_icon_selects_fallback() {
        let mut p = post("legacy", "go");
        p.tech_icon = "coffeescript".to_string();
        let form = AdminForm::edit(&p);

        let selected: Vec<_> = form
            .groups
            .iter()
            .flat_map(|g| &g.options)
            .filter(|o| o.selected)
            .map(|o| o.key)
            .collect();
        assert_eq!(selected, vec![icons::FALLBACK_KEY]);
    }
}
