//! Issue title, body and comment templates.

use minijinja::{context, Environment, UndefinedBehavior, Value};
use serde::{Deserialize, Serialize};

use super::error::TrackerError;

const DEFAULT_TITLE: &str = "[performance] {{ test_name }}";
const DEFAULT_BODY: &str = "
### Auto-generated issue tracking performance regression
* **Test name**: {{ test_name }}";
const DEFAULT_REOPEN_COMMENT: &str = "
New regression has been detected, reopening this issue:
{{ description }}";
const DEFAULT_NEW_REGRESSION_COMMENT: &str = "
A new regression for this test has been detected:
{{ description }}";

/// Templates for everything the tracker writes.
///
/// `title` and `body` see `test_name`; the comments see `description`.
/// The rendered title is the only key linking a test to its issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Templates {
    /// Issue title.
    pub title: String,
    /// Issue body.
    pub body: String,
    /// Comment posted when a new regression is detected.
    pub new_regression_comment: String,
    /// Comment posted when a closed issue is reopened.
    pub reopen_comment: String,
}

impl Default for Templates {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            body: DEFAULT_BODY.to_string(),
            new_regression_comment: DEFAULT_NEW_REGRESSION_COMMENT.to_string(),
            reopen_comment: DEFAULT_REOPEN_COMMENT.to_string(),
        }
    }
}

impl Templates {
    /// Renders the issue title for a test.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Template`] if rendering fails.
    pub fn render_title(&self, test_name: &str) -> Result<String, TrackerError> {
        render("title", &self.title, context! { test_name })
    }

    /// Renders the issue body for a test.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Template`] if rendering fails.
    pub fn render_body(&self, test_name: &str) -> Result<String, TrackerError> {
        render("body", &self.body, context! { test_name })
    }

    /// Renders the new-regression comment.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Template`] if rendering fails.
    pub fn render_new_regression(&self, description: &str) -> Result<String, TrackerError> {
        render(
            "new regression comment",
            &self.new_regression_comment,
            context! { description },
        )
    }

    /// Renders the reopen comment.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Template`] if rendering fails.
    pub fn render_reopen(&self, description: &str) -> Result<String, TrackerError> {
        render(
            "reopen comment",
            &self.reopen_comment,
            context! { description },
        )
    }

    /// Checks every template renders, and that titles differ per test.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Template`] naming the first broken template.
    pub fn validate(&self) -> Result<(), TrackerError> {
        let first = self.render_title("a")?;
        if first == self.render_title("b")? {
            return Err(TrackerError::Template {
                name: "title",
                reason: "must reference test_name so each test gets its own issue".to_string(),
            });
        }
        self.render_body("a")?;
        self.render_new_regression("d")?;
        self.render_reopen("d")?;
        Ok(())
    }
}

fn render(name: &'static str, template: &str, ctx: Value) -> Result<String, TrackerError> {
    let mut env = Environment::new();
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    env.render_str(template, ctx)
        .map_err(|e| TrackerError::Template {
            name,
            reason: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_title_and_body() {
        let templates = Templates::default();
        assert_eq!(
            templates.render_title("Load Test").unwrap(),
            "[performance] Load Test"
        );
        assert_eq!(
            templates.render_body("Load Test").unwrap(),
            "\n### Auto-generated issue tracking performance regression\n* **Test name**: Load Test"
        );
    }

    #[test]
    fn default_comments_embed_description() {
        let templates = Templates::default();
        assert_eq!(
            templates.render_reopen("p99 +40%").unwrap(),
            "\nNew regression has been detected, reopening this issue:\np99 +40%"
        );
        assert_eq!(
            templates.render_new_regression("p99 +40%").unwrap(),
            "\nA new regression for this test has been detected:\np99 +40%"
        );
    }

    #[test]
    fn descriptions_are_not_html_escaped() {
        let rendered = Templates::default()
            .render_new_regression("<b>a & b</b>")
            .unwrap();
        assert!(rendered.ends_with("<b>a & b</b>"));
    }

    #[test]
    fn unknown_variable_is_rejected() {
        let templates = Templates {
            body: "{{ tset_name }}".into(),
            ..Templates::default()
        };
        let err = templates.validate().unwrap_err();
        assert!(
            err.to_string().starts_with("invalid body template"),
            "{err}"
        );
    }

    #[test]
    fn constant_title_is_rejected() {
        let templates = Templates {
            title: "[performance]".into(),
            ..Templates::default()
        };
        let err = templates.validate().unwrap_err();
        assert!(matches!(err, TrackerError::Template { name: "title", .. }));
    }

    #[test]
    fn syntax_errors_are_rejected() {
        let templates = Templates {
            reopen_comment: "{{ description".into(),
            ..Templates::default()
        };
        assert!(templates.validate().is_err());
    }
}
