//! Duplicate-artifact arbitration.
//!
//! Many artifacts may claim the same component name; exactly one wins. The
//! arbitration is deterministic regardless of discovery order: confidence
//! tiers dominate, and only a strictly higher tier displaces the current
//! winner, so merged parallel scans converge on the same mapping.

use std::collections::{ HashMap, HashSet };
use std::path::PathBuf ;

use itertools::Itertools ;
use tracing::{ debug, info, warn };

use crate::artifact::Artifact ;
use crate::utils::PartialSuccess ;
use super::inspect::{ inspect, InspectError };
use super::signal::NameOrigin ;



/// Known-problematic component names dropped unconditionally, whatever the
/// confidence of the artifact claiming them.
pub const EXCLUDED_COMPONENTS: &[ &str ] = &[ "gson", "okio" ];

/// The unique winning artifact for one component name.
#[derive( Debug, Clone )]
pub struct ResolvedComponent {
    name: String,
    origin: NameOrigin,
    artifact: Artifact,
}

impl ResolvedComponent {

    /// Canonical component name.
    #[inline] pub fn name( &self ) -> &str { &self.name }

    /// Confidence tier the winning claim carried.
    #[inline] pub fn origin( &self ) -> NameOrigin { self.origin }

    /// The winning artifact.
    #[inline] pub fn artifact( &self ) -> &Artifact { &self.artifact }

    /// Names of components this component requires, per its descriptor.
    pub fn requires( &self ) -> &[String] {
        self.artifact.descriptor().map_or( &[], | descriptor | descriptor.requires.as_slice() )
    }

}

/// Resolves a pool of artifacts into at most one winning artifact per
/// component name.
///
/// Artifacts whose paths appear in `denied` are dropped after inspection, as
/// are [`EXCLUDED_COMPONENTS`]. An artifact that cannot be inspected is
/// collected as an error and excluded; it never aborts the resolution.
pub fn resolve_components(
    paths: impl IntoIterator<Item = PathBuf>,
    denied: &HashSet<PathBuf>,
) -> PartialSuccess<HashMap<String, ResolvedComponent>, InspectError> {

    let ( signals, errors ): ( Vec<_>, Vec<_> ) = paths.into_iter()
        .map(| path | inspect( &path ))
        .partition_result();

    let mut winners: HashMap<String, ResolvedComponent> = HashMap::new();

    for signal in signals {
        let ( name, origin, artifact ) = signal.into_parts();

        if denied.contains( artifact.path() ) {
            debug!( "Dropping denied artifact '{}'", artifact.path().display() );
            continue
        }
        if EXCLUDED_COMPONENTS.contains( &name.as_str() ) {
            warn!( "Dropping excluded component '{}' from '{}'", name, artifact.path().display() );
            continue
        }

        match winners.get( &name ) {
            None => {
                info!(
                    "Added component '{}' from '{}' ({})",
                    name, artifact.path().display(), origin,
                );
                winners.insert( name.clone(), ResolvedComponent { name, origin, artifact });
            }
            Some( current ) if origin.outranks( current.origin ) => {
                info!(
                    "Swapped component '{}' to '{}' ({}) over '{}' ({})",
                    name, artifact.path().display(), origin,
                    current.artifact.path().display(), current.origin,
                );
                winners.insert( name.clone(), ResolvedComponent { name, origin, artifact });
            }
            Some( current ) => {
                warn!(
                    "Duplicate component '{}' ignored: '{}' ({}) loses to '{}' ({})",
                    name, artifact.path().display(), origin,
                    current.artifact.path().display(), current.origin,
                );
            }
        }
    }

    ( winners, errors )

}
