//! Validation request contract.
//!
//! The HTTP layer itself lives with the host; this module owns the pure part
//! of its contract — the action enum, editor URL shape validation, and typed
//! extraction of which page a request wants validated.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CoreError;
use crate::types::PageId;

/// URL shape of the editor's edit view.
static EDIT_URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/pages/(?P<page_id>\d+)/edit/$").expect("valid regex"));

/// URL shape of the editor's create view.
static CREATE_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/pages/add/(?P<app_name>\w+)/(?P<model_name>\w+)/(?P<parent_id>\d+)/$")
        .expect("valid regex")
});

// ---------------------------------------------------------------------------
// PageAction
// ---------------------------------------------------------------------------

/// Which editor view the validation request came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PageAction {
    Edit,
    Create,
}

impl PageAction {
    /// Return the wire-format string for this variant.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Edit => "EDIT",
            Self::Create => "CREATE",
        }
    }

    /// Parse from a wire-format string.
    pub fn from_str(s: &str) -> Result<Self, CoreError> {
        match s {
            "EDIT" => Ok(Self::Edit),
            "CREATE" => Ok(Self::Create),
            _ => Err(CoreError::Request(format!(
                "Invalid action: '{s}'. Must be one of: EDIT, CREATE"
            ))),
        }
    }
}

impl fmt::Display for PageAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Request payload
// ---------------------------------------------------------------------------

/// The validation request body posted by the editor client.
#[derive(Debug, Clone, Deserialize)]
pub struct ChecklistRequest {
    pub url: String,
    pub action: PageAction,
    pub page: Value,
}

impl ChecklistRequest {
    /// Extract the typed validation target from this request's URL.
    pub fn target(&self) -> Result<ValidationTarget, CoreError> {
        parse_target(self.action, &self.url)
    }
}

/// Which page a validation request is about, extracted from the editor URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationTarget {
    /// An existing page being edited.
    Edit { page_id: PageId },
    /// A new page being created under `parent_id`.
    Create {
        app_name: String,
        model_name: String,
        parent_id: PageId,
    },
}

/// Validate the URL shape for `action` and extract the target.
///
/// A URL that does not match the expected edit/create pattern for its action
/// is rejected — the host maps this to its 400-equivalent response.
pub fn parse_target(action: PageAction, url: &str) -> Result<ValidationTarget, CoreError> {
    match action {
        PageAction::Edit => {
            let captures = EDIT_URL_RE
                .captures(url)
                .ok_or_else(|| invalid_url(action))?;
            Ok(ValidationTarget::Edit {
                page_id: parse_id(&captures["page_id"])?,
            })
        }
        PageAction::Create => {
            let captures = CREATE_URL_RE
                .captures(url)
                .ok_or_else(|| invalid_url(action))?;
            Ok(ValidationTarget::Create {
                app_name: captures["app_name"].to_string(),
                model_name: captures["model_name"].to_string(),
                parent_id: parse_id(&captures["parent_id"])?,
            })
        }
    }
}

fn invalid_url(action: PageAction) -> CoreError {
    CoreError::Request(format!("Invalid URL for action {action}"))
}

fn parse_id(digits: &str) -> Result<PageId, CoreError> {
    digits
        .parse()
        .map_err(|_| CoreError::Request(format!("Page id '{digits}' is out of range")))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    // -- PageAction parsing -------------------------------------------------

    #[test]
    fn action_roundtrip() {
        assert_eq!(PageAction::from_str("EDIT").unwrap(), PageAction::Edit);
        assert_eq!(PageAction::from_str("CREATE").unwrap(), PageAction::Create);
        assert_eq!(PageAction::Edit.as_str(), "EDIT");
        assert_eq!(PageAction::Create.as_str(), "CREATE");
    }

    #[test]
    fn action_invalid_rejects() {
        assert!(PageAction::from_str("DELETE").is_err());
        assert!(PageAction::from_str("edit").is_err());
    }

    // -- parse_target: EDIT -------------------------------------------------

    #[test]
    fn edit_url_extracts_page_id() {
        let target =
            parse_target(PageAction::Edit, "http://example.com/admin/pages/42/edit/").unwrap();
        assert_eq!(target, ValidationTarget::Edit { page_id: 42 });
    }

    #[test]
    fn edit_action_rejects_create_url() {
        assert_matches!(
            parse_target(
                PageAction::Edit,
                "http://example.com/admin/pages/add/blog/blogpage/3/",
            ),
            Err(CoreError::Request(_))
        );
    }

    // -- parse_target: CREATE -----------------------------------------------

    #[test]
    fn create_url_extracts_model_and_parent() {
        let target = parse_target(
            PageAction::Create,
            "http://example.com/admin/pages/add/blog/blogpage/3/",
        )
        .unwrap();
        assert_eq!(
            target,
            ValidationTarget::Create {
                app_name: "blog".to_string(),
                model_name: "blogpage".to_string(),
                parent_id: 3,
            }
        );
    }

    #[test]
    fn create_action_rejects_edit_url() {
        assert_matches!(
            parse_target(
                PageAction::Create,
                "http://example.com/admin/pages/42/edit/",
            ),
            Err(CoreError::Request(_))
        );
    }

    #[test]
    fn trailing_slash_is_required() {
        assert!(parse_target(PageAction::Edit, "/pages/42/edit").is_err());
        assert!(parse_target(PageAction::Create, "/pages/add/blog/blogpage/3").is_err());
    }

    #[test]
    fn oversized_page_id_rejects() {
        assert_matches!(
            parse_target(PageAction::Edit, "/pages/99999999999999999999/edit/"),
            Err(CoreError::Request(_))
        );
    }

    // -- ChecklistRequest ---------------------------------------------------

    #[test]
    fn request_deserializes_and_targets() {
        let request: ChecklistRequest = serde_json::from_value(json!({
            "url": "http://example.com/admin/pages/7/edit/",
            "action": "EDIT",
            "page": { "title": "Hello" }
        }))
        .unwrap();
        assert_eq!(request.action, PageAction::Edit);
        assert_eq!(
            request.target().unwrap(),
            ValidationTarget::Edit { page_id: 7 }
        );
    }

    #[test]
    fn request_with_unknown_action_fails_to_deserialize() {
        let result = serde_json::from_value::<ChecklistRequest>(json!({
            "url": "http://example.com/admin/pages/7/edit/",
            "action": "PREVIEW",
            "page": {}
        }));
        assert!(result.is_err());
    }
}
