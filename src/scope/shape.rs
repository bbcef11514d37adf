//! Expected layouts of resource IDs

/// A nested `{key}/{name}` pair expected by a shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SegmentSpec {
    /// Collection key as it appears in the path (e.g. `workspaces`)
    pub key: &'static str,
    /// Human-readable label used by [`ScopeId::describe`](super::ScopeId::describe)
    pub label: &'static str,
}

impl SegmentSpec {
    /// Create a segment spec
    pub const fn new(key: &'static str, label: &'static str) -> Self {
        Self { key, label }
    }
}

/// Layout of a resource ID
///
/// Every shape starts with `/subscriptions/{id}`. Shapes that set
/// `resource_group` continue with `/resourceGroups/{name}`, then an optional
/// `/providers/{namespace}`, then the nested segments in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeShape {
    /// Display name (e.g. "Recoverable Database")
    pub name: &'static str,
    /// Short name used on the command line
    pub slug: &'static str,
    /// Whether `/resourceGroups/{name}` is required
    pub resource_group: bool,
    /// Provider namespace, when the ID points below one
    pub provider: Option<&'static str>,
    /// Nested segments after the provider
    pub segments: &'static [SegmentSpec],
}

impl ScopeShape {
    /// Number of values needed to build an ID of this shape
    pub fn arity(&self) -> usize {
        1 + usize::from(self.resource_group) + self.segments.len()
    }

    /// Look up a known shape by its slug
    pub fn by_slug(slug: &str) -> Option<&'static ScopeShape> {
        KNOWN_SHAPES
            .iter()
            .copied()
            .find(|shape| shape.slug.eq_ignore_ascii_case(slug))
    }
}

/// `/subscriptions/{subscriptionId}`
pub const SUBSCRIPTION: ScopeShape = ScopeShape {
    name: "Subscription",
    slug: "subscription",
    resource_group: false,
    provider: None,
    segments: &[],
};

/// `/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}`
pub const RESOURCE_GROUP: ScopeShape = ScopeShape {
    name: "Resource Group",
    slug: "resource-group",
    resource_group: true,
    provider: None,
    segments: &[],
};

/// Synapse workspace
pub const WORKSPACE: ScopeShape = ScopeShape {
    name: "Workspace",
    slug: "workspace",
    resource_group: true,
    provider: Some("Microsoft.Synapse"),
    segments: &[SegmentSpec::new("workspaces", "Name")],
};

/// Recoverable database below a Synapse workspace
pub const RECOVERABLE_DATABASE: ScopeShape = ScopeShape {
    name: "Recoverable Database",
    slug: "recoverable-database",
    resource_group: true,
    provider: Some("Microsoft.Synapse"),
    segments: &[
        SegmentSpec::new("workspaces", "Workspace Name"),
        SegmentSpec::new("recoverableDatabases", "Name"),
    ],
};

/// Shapes tried, most specific first, when the caller does not name one
pub const KNOWN_SHAPES: &[&ScopeShape] = &[
    &RECOVERABLE_DATABASE,
    &WORKSPACE,
    &RESOURCE_GROUP,
    &SUBSCRIPTION,
];
