//! Single-artifact identity inspection.
//!
//! The inspector checks naming signals strictly from the most to the least
//! trusted and returns the first match. The filename heuristic guarantees
//! that a readable artifact always yields an identity.

use std::collections::BTreeSet ;
use std::path::{ Path, PathBuf };

use thiserror::Error ;

use crate::artifact::{ Artifact, ArtifactError };
use crate::manifest::ArtifactManifest ;
use super::signal::{ IdentitySignal, NameOrigin };



#[derive( Error, Debug )]
pub enum InspectError {
    #[error( "Failed to inspect artifact at '{0}': {1}" )]
    UnreadableArtifact( PathBuf, ArtifactError ),
}

/// Determines the identity of the artifact at `path`.
///
/// # Errors
/// Returns an error when the artifact content cannot be read; callers decide
/// whether to skip the artifact or abort.
pub fn inspect( path: &Path ) -> Result<IdentitySignal, InspectError> {
    Artifact::open( path )
        .map( signal_for )
        .map_err(| err | InspectError::UnreadableArtifact( path.to_path_buf(), err ))
}

fn signal_for( artifact: Artifact ) -> IdentitySignal {

    if let Some( name ) = artifact.descriptor().map(| descriptor | descriptor.name.clone() ) {
        let origin = match artifact.descriptor_is_versioned() {
            false => NameOrigin::Descriptor,
            true => NameOrigin::VersionedDescriptor,
        };
        return IdentitySignal::new( name, origin, artifact );
    }

    if let Some( name ) = artifact.manifest().and_then( ArtifactManifest::component_name ) {
        let name = name.to_string();
        return IdentitySignal::new( name, NameOrigin::Manifest, artifact );
    }

    if let Some( name ) = artifact.manifest().and_then( ArtifactManifest::bundle_symbolic_name ) {
        let name = name.to_string();
        return IdentitySignal::new( name, NameOrigin::BundleSymbolicName, artifact );
    }

    if let Some( name ) = infer_from_namespaces( artifact.namespaces() ) {
        return IdentitySignal::new( name, NameOrigin::Inferred, artifact );
    }

    let name = guess_from_filename( artifact.path() );
    IdentitySignal::new( name, NameOrigin::Guessed, artifact )

}

/// The generic finder: the longest dotted prefix shared by every namespace in
/// the artifact, when the artifact has namespaces and they share one.
fn infer_from_namespaces( namespaces: &BTreeSet<String> ) -> Option<String> {

    let mut iter = namespaces.iter();
    let mut common: Vec<&str> = iter.next()?.split( '.' ).collect();

    for namespace in iter {
        let segments: Vec<&str> = namespace.split( '.' ).collect();
        let shared = common.iter()
            .zip( &segments )
            .take_while(|( left, right )| left == right )
            .count();
        common.truncate( shared );
        if common.is_empty() { return None }
    }

    Some( common.join( "." ))

}

/// Desperation mode: derive a name from the directory name by stripping the
/// `.pack` extension and any trailing `-<version>` token.
fn guess_from_filename( path: &Path ) -> String {

    let name = path.file_name()
        .and_then( std::ffi::OsStr::to_str )
        .unwrap_or( "unnamed" );
    let stem = name.strip_suffix( ".pack" ).unwrap_or( name );

    let bytes = stem.as_bytes();
    let version_start = ( 1..bytes.len() )
        .find(| &i | bytes[ i - 1 ] == b'-' && bytes[ i ].is_ascii_digit() )
        .map(| i | i - 1 );

    match version_start {
        Some( cut ) if cut > 0 => stem[ ..cut ].to_string(),
        _ => stem.to_string(),
    }

}
