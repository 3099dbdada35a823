//! HTML bodies for announcement and news notifications.
//!
//! Templates go through `handlebars`, so every `{{value}}` is HTML-escaped.
//! User-supplied titles and content can never inject markup into the email.

use handlebars::Handlebars;
use serde::Serialize;
use serde_json::json;

use crate::delivery::EmailError;

const LAYOUT_TEMPLATE: &str = "notification";

const NOTIFICATION_HTML: &str = r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>{{title}}</title></head>
<body style="font-family: Arial, sans-serif; background: #f4f6f8; padding: 24px;">
  <div style="max-width: 600px; margin: 0 auto; background: #ffffff; border-radius: 8px; overflow: hidden;">
    <div style="background: {{accent}}; color: #ffffff; padding: 16px 24px;">
      <strong>{{heading}}</strong>
    </div>
    <div style="padding: 24px;">
      <h2 style="margin-top: 0;">{{title}}</h2>
      {{#each paragraphs}}
      <p style="line-height: 1.5;">{{this}}</p>
      {{/each}}
      {{#if link}}
      <p><a href="{{link}}" style="color: {{accent}};">Read more on the portal</a></p>
      {{/if}}
    </div>
    <div style="padding: 12px 24px; font-size: 12px; color: #6b7280;">
      Sent {{sent_on}} by the Barangay Portal. Please do not reply to this email.
    </div>
  </div>
</body>
</html>
"#;

/// What kind of post a notification announces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    #[default]
    Announcement,
    News,
}

impl NotificationKind {
    /// Parse a lower-case kind name; anything unknown is `None`.
    pub fn parse(kind: &str) -> Option<Self> {
        match kind {
            "announcement" => Some(Self::Announcement),
            "news" => Some(Self::News),
            _ => None,
        }
    }

    fn heading(self) -> &'static str {
        match self {
            Self::Announcement => "Barangay Announcement",
            Self::News => "Barangay News",
        }
    }

    fn accent(self) -> &'static str {
        match self {
            Self::Announcement => "#1d4ed8",
            Self::News => "#047857",
        }
    }
}

/// Content of one notification, before rendering.
#[derive(Debug, Clone)]
pub struct NotificationEmail {
    pub kind: NotificationKind,
    pub title: String,
    pub content: String,
    pub link: Option<String>,
}

/// Compiled notification templates.
pub struct NotificationTemplates {
    registry: Handlebars<'static>,
}

impl NotificationTemplates {
    pub fn new() -> Result<Self, EmailError> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        registry
            .register_template_string(LAYOUT_TEMPLATE, NOTIFICATION_HTML)
            .map_err(|e| EmailError::Template(e.to_string()))?;
        Ok(Self { registry })
    }

    /// Render the HTML body for a notification.
    pub fn render(&self, notification: &NotificationEmail) -> Result<String, EmailError> {
        let paragraphs: Vec<&str> = notification
            .content
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();

        let data = json!({
            "heading": notification.kind.heading(),
            "accent": notification.kind.accent(),
            "title": notification.title,
            "paragraphs": paragraphs,
            "link": notification.link.as_deref().filter(|l| is_web_link(l)).unwrap_or(""),
            "sent_on": chrono::Local::now().format("%B %-d, %Y").to_string(),
        });

        self.registry
            .render(LAYOUT_TEMPLATE, &data)
            .map_err(|e| EmailError::Template(e.to_string()))
    }
}

/// Only absolute `http(s)` links become an `href`; escaping alone does not
/// stop `javascript:` or `data:` URLs.
fn is_web_link(link: &str) -> bool {
    let link = link.trim().to_ascii_lowercase();
    link.starts_with("http://") || link.starts_with("https://")
}
