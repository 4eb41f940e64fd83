//! The ordered rewriter chain.

use std::sync::{ Arc, PoisonError, RwLock };

use tracing::{ info, warn };

use super::history::TransformHistory ;
use super::{ ContentRewriter, RewriteKind, TransformOutcome };



/// An ordered list of content rewriters applied to each code unit exactly
/// once, at first load.
///
/// Rewriters run in registration order and the chain stops at the first one
/// that does not decline. Registration is only expected at layer-load
/// checkpoints; ordinary loading takes the list read-only.
#[derive( Default )]
pub struct TransformPipeline {
    rewriters: RwLock<Vec<Arc<dyn ContentRewriter>>>,
    history: TransformHistory,
}

impl TransformPipeline {

    pub fn new() -> Self {
        Self { rewriters: RwLock::new( Vec::new() ), history: TransformHistory::new() }
    }

    /// Appends a rewriter to the chain.
    pub fn register( &self, rewriter: Arc<dyn ContentRewriter> ) {
        info!( "Registered content rewriter '{}'", rewriter.name() );
        self.rewriters.write()
            .unwrap_or_else( PoisonError::into_inner )
            .push( rewriter );
    }

    /// Number of registered rewriters.
    pub fn len( &self ) -> usize {
        self.rewriters.read().unwrap_or_else( PoisonError::into_inner ).len()
    }

    pub fn is_empty( &self ) -> bool { self.len() == 0 }

    /// Runs `original` through the chain, short-circuiting on the first
    /// rewriter that does not decline.
    ///
    /// A failing rewriter is logged and skipped; it cannot block the chain.
    /// Exactly one history record is appended per call, declined outcomes
    /// included.
    pub fn apply( &self, unit_name: &str, original: &[u8] ) -> TransformOutcome {

        let rewriters: Vec<Arc<dyn ContentRewriter>> = self.rewriters.read()
            .unwrap_or_else( PoisonError::into_inner )
            .clone();

        for rewriter in rewriters {
            match rewriter.rewrite( unit_name, original ) {
                Ok( outcome ) if outcome.kind() != RewriteKind::None => {
                    info!( "{} transformed {} ({})", rewriter.name(), unit_name, outcome.kind() );
                    self.history.record(
                        unit_name,
                        Some( rewriter.name() ),
                        outcome.kind(),
                        outcome.bytes().unwrap_or( original ),
                    );
                    return outcome
                }
                Ok( _ ) => {}
                Err( err ) => {
                    warn!( "Rewriter '{}' failed on {}: {}; continuing", rewriter.name(), unit_name, err );
                }
            }
        }

        self.history.record( unit_name, None, RewriteKind::None, original );
        TransformOutcome::none()

    }

    /// The per-unit record log this pipeline appends to.
    #[inline] pub fn history( &self ) -> &TransformHistory { &self.history }

}

impl std::fmt::Debug for TransformPipeline {
    fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
        f.debug_struct( "TransformPipeline" )
            .field( "rewriters", &self.len() )
            .finish_non_exhaustive()
    }
}
