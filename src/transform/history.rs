//! Append-only record of what the pipeline did to each unit.
//!
//! Every pipeline application leaves a record, including the ones where every
//! rewriter declined. Records are retained for the process lifetime and
//! answer "why is this unit shaped this way" after the fact.

use std::collections::HashMap ;
use std::sync::Mutex ;

use nonempty_collections::NEVec ;

use super::RewriteKind ;



/// One pipeline application: which rewriter decided the outcome (none when
/// every rewriter declined), the rewrite kind, and the resulting bytes.
#[derive( Debug, Clone )]
pub struct TransformRecord {
    rewriter: Option<String>,
    kind: RewriteKind,
    bytes: Vec<u8>,
}

impl TransformRecord {

    /// Identity of the rewriter that produced the outcome, if any rewrote.
    #[inline] pub fn rewriter( &self ) -> Option<&str> { self.rewriter.as_deref() }

    #[inline] pub fn kind( &self ) -> RewriteKind { self.kind }

    /// The unit bytes as they stood after this application.
    #[inline] pub fn bytes( &self ) -> &[u8] { &self.bytes }

}

/// Per-unit transform records, newest last.
#[derive( Debug, Default )]
pub struct TransformHistory {
    entries: Mutex<HashMap<String, NEVec<TransformRecord>>>,
}

impl TransformHistory {

    pub fn new() -> Self {
        Self { entries: Mutex::new( HashMap::new() )}
    }

    pub(crate) fn record(
        &self,
        unit_name: &str,
        rewriter: Option<&str>,
        kind: RewriteKind,
        bytes: &[u8],
    ) {
        let record = TransformRecord {
            rewriter: rewriter.map( str::to_string ),
            kind,
            bytes: bytes.to_vec(),
        };
        let mut entries = self.entries.lock().unwrap_or_else( std::sync::PoisonError::into_inner );
        match entries.get_mut( unit_name ) {
            Some( chain ) => chain.push( record ),
            None => { entries.insert( unit_name.to_string(), NEVec::new( record )); }
        }
    }

    /// The full record chain for `unit_name`, oldest first; empty if the
    /// pipeline was never asked about the unit.
    pub fn of( &self, unit_name: &str ) -> Vec<TransformRecord> {
        let entries = self.entries.lock().unwrap_or_else( std::sync::PoisonError::into_inner );
        entries.get( unit_name )
            .map(| chain | chain.clone().into_iter().collect() )
            .unwrap_or_default()
    }

}
