//! Scope identifier parsing and formatting

use super::shape::{ScopeShape, KNOWN_SHAPES, RESOURCE_GROUP, SUBSCRIPTION};
use std::fmt;
use thiserror::Error;

const SUBSCRIPTIONS_KEY: &str = "subscriptions";
const RESOURCE_GROUPS_KEY: &str = "resourceGroups";
const PROVIDERS_KEY: &str = "providers";

/// Reasons a resource ID is rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdError {
    #[error("ID {input:?} is malformed: {reason}")]
    Malformed { input: String, reason: String },

    #[error("ID was missing the '{0}' element")]
    MissingSegment(String),

    #[error("ID contains unexpected segment '{0}'")]
    UnexpectedSegment(String),

    #[error("ID {0:?} does not match any known resource shape")]
    UnknownShape(String),
}

impl IdError {
    fn malformed(input: &str, reason: impl Into<String>) -> Self {
        Self::Malformed {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

/// A validated, immutable resource scope
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScopeId {
    shape: &'static ScopeShape,
    subscription_id: String,
    resource_group: Option<String>,
    names: Vec<String>,
}

impl ScopeId {
    /// Build an ID of `shape` from its values in path order
    ///
    /// `values` holds the subscription ID, then the resource group (when the
    /// shape has one), then one name per nested segment.
    pub fn new(shape: &'static ScopeShape, values: &[&str]) -> Result<Self, IdError> {
        if values.len() != shape.arity() {
            return Err(IdError::Malformed {
                input: values.join("/"),
                reason: format!(
                    "{} expects {} values, got {}",
                    shape.name,
                    shape.arity(),
                    values.len()
                ),
            });
        }

        let mut values = values.iter();
        let mut take = |key: &str| -> Result<String, IdError> {
            match values.next() {
                Some(v) if !v.is_empty() => Ok((*v).to_string()),
                _ => Err(IdError::MissingSegment(key.to_string())),
            }
        };

        let subscription_id = take(SUBSCRIPTIONS_KEY)?;
        let resource_group = if shape.resource_group {
            Some(take(RESOURCE_GROUPS_KEY)?)
        } else {
            None
        };
        let names = shape
            .segments
            .iter()
            .map(|segment| take(segment.key))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            shape,
            subscription_id,
            resource_group,
            names,
        })
    }

    /// `/subscriptions/{subscription_id}`
    pub fn subscription(subscription_id: &str) -> Result<Self, IdError> {
        Self::new(&SUBSCRIPTION, &[subscription_id])
    }

    /// `/subscriptions/{subscription_id}/resourceGroups/{resource_group}`
    pub fn resource_group(subscription_id: &str, resource_group: &str) -> Result<Self, IdError> {
        Self::new(&RESOURCE_GROUP, &[subscription_id, resource_group])
    }

    /// Parse `input` as an ID of `shape`
    ///
    /// Segment keys match case-insensitively; the canonical casing of the
    /// shape is used when the ID is rendered again.
    pub fn parse(input: &str, shape: &'static ScopeShape) -> Result<Self, IdError> {
        let trimmed = input.trim();
        let Some(rest) = trimmed.strip_prefix('/') else {
            return Err(IdError::malformed(input, "expected a leading '/'"));
        };
        let rest = rest.trim_end_matches('/');
        if rest.is_empty() {
            return Err(IdError::MissingSegment(SUBSCRIPTIONS_KEY.to_string()));
        }

        let parts: Vec<&str> = rest.split('/').collect();
        if parts.len() % 2 != 0 {
            return Err(IdError::malformed(
                input,
                "the number of path segments is not divisible by 2",
            ));
        }
        let mut pairs = parts.chunks(2).map(|pair| (pair[0], pair[1])).peekable();

        let mut pop = |key: &str| -> Result<String, IdError> {
            match pairs.peek() {
                Some((k, v)) if k.eq_ignore_ascii_case(key) => {
                    let value = (*v).to_string();
                    pairs.next();
                    if value.is_empty() {
                        Err(IdError::MissingSegment(key.to_string()))
                    } else {
                        Ok(value)
                    }
                }
                _ => Err(IdError::MissingSegment(key.to_string())),
            }
        };

        let subscription_id = pop(SUBSCRIPTIONS_KEY)?;
        let resource_group = if shape.resource_group {
            Some(pop(RESOURCE_GROUPS_KEY)?)
        } else {
            None
        };
        if let Some(namespace) = shape.provider {
            let found = pop(PROVIDERS_KEY)?;
            if !found.eq_ignore_ascii_case(namespace) {
                return Err(IdError::UnexpectedSegment(format!("{PROVIDERS_KEY}/{found}")));
            }
        }
        let names = shape
            .segments
            .iter()
            .map(|segment| pop(segment.key))
            .collect::<Result<Vec<_>, _>>()?;

        if let Some((key, _)) = pairs.next() {
            return Err(IdError::UnexpectedSegment(key.to_string()));
        }

        Ok(Self {
            shape,
            subscription_id,
            resource_group,
            names,
        })
    }

    /// Parse `input` against every known shape, most specific first
    pub fn parse_known(input: &str) -> Result<Self, IdError> {
        KNOWN_SHAPES
            .iter()
            .find_map(|shape| Self::parse(input, shape).ok())
            .ok_or_else(|| IdError::UnknownShape(input.to_string()))
    }

    /// The shape this ID was built against
    pub fn shape(&self) -> &'static ScopeShape {
        self.shape
    }

    /// Subscription component
    pub fn subscription_id(&self) -> &str {
        &self.subscription_id
    }

    /// Resource group component, when the shape has one
    pub fn resource_group_name(&self) -> Option<&str> {
        self.resource_group.as_deref()
    }

    /// Name stored under the nested segment `key`
    pub fn segment(&self, key: &str) -> Option<&str> {
        self.shape
            .segments
            .iter()
            .zip(&self.names)
            .find(|(spec, _)| spec.key.eq_ignore_ascii_case(key))
            .map(|(_, name)| name.as_str())
    }

    /// Canonical path form of the ID
    pub fn id(&self) -> String {
        let mut out = format!("/{SUBSCRIPTIONS_KEY}/{}", self.subscription_id);
        if let Some(group) = &self.resource_group {
            out.push_str(&format!("/{RESOURCE_GROUPS_KEY}/{group}"));
        }
        if let Some(namespace) = self.shape.provider {
            out.push_str(&format!("/{PROVIDERS_KEY}/{namespace}"));
        }
        for (spec, name) in self.shape.segments.iter().zip(&self.names) {
            out.push_str(&format!("/{}/{name}", spec.key));
        }
        out
    }

    /// Human-readable summary, innermost segment first
    pub fn describe(&self) -> String {
        let mut parts: Vec<String> = self
            .shape
            .segments
            .iter()
            .zip(&self.names)
            .rev()
            .map(|(spec, name)| format!("{} {name:?}", spec.label))
            .collect();
        if let Some(group) = &self.resource_group {
            parts.push(format!("Resource Group {group:?}"));
        } else {
            parts.push(format!("Subscription {:?}", self.subscription_id));
        }
        format!("{}: ({})", self.shape.name, parts.join(" / "))
    }
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id())
    }
}
