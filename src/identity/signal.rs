use crate::artifact::Artifact ;



/// Where an artifact's component name came from.
///
/// Variants are ordered from highest to lowest confidence; an origin that
/// compares `<` carries strictly more trust. A versioned descriptor ranks one
/// tier below an explicit one despite carrying the same information, because
/// nothing guarantees the alternate location matches the artifact's default
/// content.
#[derive( Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash )]
pub enum NameOrigin {
    /// Explicit `component.json` at the artifact root.
    Descriptor,
    /// Descriptor found only under a version-qualified `meta/<n>/` location.
    VersionedDescriptor,
    /// `Component-Name` manifest entry.
    Manifest,
    /// `Bundle-SymbolicName` manifest entry.
    BundleSymbolicName,
    /// Best-effort inference from the artifact's namespace tree.
    Inferred,
    /// Filename heuristic. The guaranteed fallback.
    Guessed,
}

impl NameOrigin {

    /// Whether this origin carries strictly more confidence than `other`.
    #[inline] pub fn outranks( self, other: NameOrigin ) -> bool { self < other }

    #[inline] pub fn is_guessed( self ) -> bool { matches!( self, NameOrigin::Guessed )}

}

impl std::fmt::Display for NameOrigin {
    fn fmt( &self, f: &mut std::fmt::Formatter ) -> std::fmt::Result {
        match self {
            Self::Descriptor => write!( f, "descriptor" ),
            Self::VersionedDescriptor => write!( f, "versioned descriptor" ),
            Self::Manifest => write!( f, "manifest" ),
            Self::BundleSymbolicName => write!( f, "bundle symbolic name" ),
            Self::Inferred => write!( f, "inferred" ),
            Self::Guessed => write!( f, "guessed" ),
        }
    }
}

/// One artifact's naming claim: the component name it resolves to, and how
/// much that claim can be trusted.
#[derive( Debug )]
pub struct IdentitySignal {
    name: String,
    origin: NameOrigin,
    artifact: Artifact,
}

impl IdentitySignal {

    pub(crate) fn new( name: String, origin: NameOrigin, artifact: Artifact ) -> Self {
        Self { name, origin, artifact }
    }

    /// The claimed component name.
    #[inline] pub fn name( &self ) -> &str { &self.name }

    /// Confidence tier of the claim.
    #[inline] pub fn origin( &self ) -> NameOrigin { self.origin }

    /// The artifact the claim was read from.
    #[inline] pub fn artifact( &self ) -> &Artifact { &self.artifact }

    pub(crate) fn into_parts( self ) -> ( String, NameOrigin, Artifact ) {
        ( self.name, self.origin, self.artifact )
    }

}
