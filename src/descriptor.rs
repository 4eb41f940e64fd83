//! The explicit component descriptor (`component.json`).
//!
//! The descriptor is the highest-trust identity and metadata source an
//! artifact can carry: its declared name wins over every other naming signal,
//! and it is the only place requirement edges, visibility declarations, and
//! capability providers can be declared.

use serde::Deserialize ;

/// Declarative metadata for one component, read from `component.json` at the
/// artifact root (or from a version-qualified `meta/<n>/component.json`).
#[derive( Debug, Clone, Deserialize )]
pub struct ComponentDescriptor {
    /// Canonical component name.
    pub name: String,
    /// Names of components this component requires at layer-build time.
    #[serde( default )]
    pub requires: Vec<String>,
    /// Namespaces declared explicitly, unioned with those found by scanning
    /// the artifact's content tree.
    #[serde( default )]
    pub namespaces: Vec<String>,
    /// Namespaces this component exposes to named peers.
    #[serde( default )]
    pub exposes: Vec<VisibilityDecl>,
    /// Namespaces this component opens to named peers.
    #[serde( default )]
    pub opens: Vec<VisibilityDecl>,
    /// Capability implementations this component provides.
    #[serde( default )]
    pub provides: Vec<ProvidesDecl>,
}

/// One namespace made visible to a list of named peer components.
///
/// Visibility is asymmetric and applies to resource lookup only; it never
/// grants code materialization.
#[derive( Debug, Clone, Deserialize )]
pub struct VisibilityDecl {
    pub namespace: String,
    #[serde( default )]
    pub to: Vec<String>,
}

/// One declared implementation of a capability contract.
#[derive( Debug, Clone, Deserialize )]
pub struct ProvidesDecl {
    /// Contract id, e.g. `launch-target`.
    pub contract: String,
    /// Provider id resolved through the process provider registry.
    pub provider: String,
}
