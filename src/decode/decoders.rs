//! Decoder implementations

use super::types::{PageDecoder, PageLayout};
use crate::error::{Error, Result};
use crate::pagination::Page;
use crate::types::{dot_path_pointer, JsonValue, OptionStringExt};
use serde::de::DeserializeOwned;
use std::fmt;
use std::marker::PhantomData;

// ============================================================================
// JSON Page Decoder
// ============================================================================

/// JSON envelope decoder
///
/// An absent or `null` items field decodes to an empty page. An absent,
/// `null` or empty next link marks the page as terminal.
pub struct JsonPageDecoder<T> {
    layout: PageLayout,
    _item: PhantomData<fn() -> T>,
}

impl<T> JsonPageDecoder<T> {
    /// Decoder for the default `value` / `nextLink` envelope
    pub fn new() -> Self {
        Self::with_layout(PageLayout::default())
    }

    /// Decoder for a custom envelope
    pub fn with_layout(layout: PageLayout) -> Self {
        Self {
            layout,
            _item: PhantomData,
        }
    }

    /// The envelope layout
    pub fn layout(&self) -> &PageLayout {
        &self.layout
    }
}

impl<T> Default for JsonPageDecoder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for JsonPageDecoder<T> {
    fn clone(&self) -> Self {
        Self::with_layout(self.layout.clone())
    }
}

impl<T> fmt::Debug for JsonPageDecoder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonPageDecoder")
            .field("layout", &self.layout)
            .finish()
    }
}

impl<T: DeserializeOwned> PageDecoder<T> for JsonPageDecoder<T> {
    fn decode(&self, body: &str) -> Result<Page<T>> {
        let mut root: JsonValue = serde_json::from_str(body)
            .map_err(|e| Error::decode(format!("Failed to parse JSON: {e}"), body))?;

        if !root.is_object() {
            return Err(Error::decode(
                format!("expected a JSON object, got {}", type_name(&root)),
                body,
            ));
        }

        let items_field = &self.layout.items_field;
        let items = match take_path(&mut root, items_field) {
            None | Some(JsonValue::Null) => Vec::new(),
            Some(JsonValue::Array(values)) => values
                .into_iter()
                .enumerate()
                .map(|(index, value)| {
                    serde_json::from_value(value).map_err(|e| {
                        Error::decode(format!("item {index} of '{items_field}': {e}"), body)
                    })
                })
                .collect::<Result<Vec<T>>>()?,
            Some(other) => {
                return Err(Error::decode(
                    format!(
                        "'{items_field}' must be an array, got {}",
                        type_name(&other)
                    ),
                    body,
                ))
            }
        };

        let next_link_field = &self.layout.next_link_field;
        let next_link = match take_path(&mut root, next_link_field) {
            None | Some(JsonValue::Null) => None,
            Some(JsonValue::String(link)) => Some(link).none_if_empty(),
            Some(other) => {
                return Err(Error::decode(
                    format!(
                        "'{next_link_field}' must be a string, got {}",
                        type_name(&other)
                    ),
                    body,
                ))
            }
        };

        Ok(Page::new(items, next_link))
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Move the value at a dot path out of `root`
fn take_path(root: &mut JsonValue, path: &str) -> Option<JsonValue> {
    let path = path.strip_prefix("$.").unwrap_or(path);
    root.pointer_mut(&dot_path_pointer(path)).map(JsonValue::take)
}

fn type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}
