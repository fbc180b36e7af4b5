//! Inbound Events
//!
//! An inbound turn is what arrives from outside the engine: optional agent
//! text plus an optional colour directive. The wire form is JSON:
//!
//! ```json
//! { "message": "Hello.", "sceneUpdate": { "action": "color", "value": "#4A90E2" } }
//! ```
//!
//! `text`/`colorTarget` are accepted as alternative field names. A directive
//! whose action is not `"color"` is ignored; a `"color"` directive whose value
//! is not a hex colour is malformed. Neither prevents the text from being
//! shown.

use serde::{Deserialize, Serialize};

use crate::color::{ColorParseError, Rgb};

/// Colour directive attached to an inbound turn
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneUpdate {
    /// Directive kind; only `"color"` is acted on
    #[serde(default)]
    pub action: String,
    /// Hex colour for `"color"` directives
    #[serde(default)]
    pub value: Option<String>,
}

impl SceneUpdate {
    /// A `"color"` directive
    #[must_use]
    pub fn color(value: impl Into<String>) -> Self {
        Self {
            action: "color".to_string(),
            value: Some(value.into()),
        }
    }
}

/// How an inbound colour directive was interpreted
#[derive(Clone, Debug, PartialEq)]
pub enum ColorRequest {
    /// No directive
    None,
    /// A directive with an unsupported action
    Ignored {
        /// The action that was not understood
        action: String,
    },
    /// A `"color"` directive with an unusable value
    Malformed {
        /// The raw value
        value: String,
        /// Why it failed
        error: ColorParseError,
    },
    /// A usable base colour
    Valid(Rgb),
}

/// One turn arriving from the reply source
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundTurn {
    /// Agent text to reveal
    #[serde(default, alias = "message", skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Optional colour directive
    #[serde(
        default,
        rename = "colorTarget",
        alias = "sceneUpdate",
        skip_serializing_if = "Option::is_none"
    )]
    pub color_target: Option<SceneUpdate>,
}

impl InboundTurn {
    /// Text only
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            color_target: None,
        }
    }

    /// Attach a `"color"` directive
    #[must_use]
    pub fn with_color(mut self, value: impl Into<String>) -> Self {
        self.color_target = Some(SceneUpdate::color(value));
        self
    }

    /// Parse the JSON wire form
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error when the input is not an object of
    /// this shape.
    pub fn from_json(input: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(input)
    }

    /// Text to reveal, if any and non-empty
    #[must_use]
    pub fn visible_text(&self) -> Option<&str> {
        self.text.as_deref().filter(|t| !t.is_empty())
    }

    /// Interpret the colour directive
    #[must_use]
    pub fn color_request(&self) -> ColorRequest {
        let Some(update) = &self.color_target else {
            return ColorRequest::None;
        };
        if update.action != "color" {
            return ColorRequest::Ignored {
                action: update.action.clone(),
            };
        }

        let value = update.value.clone().unwrap_or_default();
        match Rgb::parse_hex(&value) {
            Ok(color) => ColorRequest::Valid(color),
            Err(error) => ColorRequest::Malformed { value, error },
        }
    }
}
