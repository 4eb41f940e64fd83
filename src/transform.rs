//! Content rewriting applied to code units before first use.

mod pipeline ;
mod history ;

pub use pipeline::TransformPipeline ;
pub use history::{ TransformHistory, TransformRecord };

/// Error type rewriters may fail with. A failing rewriter is treated as
/// having declined; it never blocks the chain.
pub type RewriteError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A pluggable function that may replace a code unit's bytes before first
/// use.
///
/// Rewriters must be pure functions of `( unit_name, bytes )`: the pipeline
/// runs each unit through the chain exactly once and caches the result for
/// the lifetime of the owning layer.
pub trait ContentRewriter: Send + Sync {
    /// Identity used in logs and transform history records.
    fn name( &self ) -> &str ;
    /// Inspects `bytes` and either declines ([`TransformOutcome::none`]) or
    /// produces replacement bytes.
    fn rewrite( &self, unit_name: &str, bytes: &[u8] ) -> Result<TransformOutcome, RewriteError> ;
}

/// How a rewriter changed a code unit's bytes.
#[derive( Debug, Clone, Copy, PartialEq, Eq, Hash, Default )]
pub enum RewriteKind {
    /// The rewriter declined; the bytes are untouched.
    #[default] None,
    /// The bytes were changed in place, preserving overall shape.
    Partial,
    /// The bytes were replaced wholesale.
    Full,
}

impl std::fmt::Display for RewriteKind {
    fn fmt( &self, f: &mut std::fmt::Formatter ) -> std::fmt::Result {
        match self {
            Self::None => write!( f, "no rewrite" ),
            Self::Partial => write!( f, "partial rewrite" ),
            Self::Full => write!( f, "full rewrite" ),
        }
    }
}

/// The result of applying one rewriter (or a whole pipeline) to a unit.
#[derive( Debug, Clone )]
pub struct TransformOutcome {
    kind: RewriteKind,
    bytes: Option<Vec<u8>>,
}

impl TransformOutcome {

    /// The declining outcome: no replacement bytes.
    #[inline] pub fn none() -> Self {
        Self { kind: RewriteKind::None, bytes: None }
    }

    /// A partial rewrite producing `bytes`.
    #[inline] pub fn partial( bytes: Vec<u8> ) -> Self {
        Self { kind: RewriteKind::Partial, bytes: Some( bytes )}
    }

    /// A full rewrite producing `bytes`.
    #[inline] pub fn full( bytes: Vec<u8> ) -> Self {
        Self { kind: RewriteKind::Full, bytes: Some( bytes )}
    }

    #[inline] pub fn kind( &self ) -> RewriteKind { self.kind }

    /// The replacement bytes, absent for [`RewriteKind::None`].
    #[inline] pub fn bytes( &self ) -> Option<&[u8]> { self.bytes.as_deref() }

    pub(crate) fn into_parts( self ) -> ( RewriteKind, Option<Vec<u8>> ) {
        ( self.kind, self.bytes )
    }

}
