//! Artifact directories and their content stores.
//!
//! An artifact is an immutable directory holding declarative metadata and
//! content entries:
//!
//! ```text
//! <artifact>/
//!     component.json            optional explicit descriptor
//!     meta/<n>/component.json   optional version-qualified descriptor
//!     manifest.properties       optional key=value manifest
//!     units/a/b/c.unit          code units, qualified name `a.b.c`
//!     resources/a/b/name        resources, qualified name `a.b.name`
//! ```
//!
//! Opening an artifact is a pure read: metadata is parsed eagerly, content
//! entries are read on demand through an [`ArtifactStore`].

use std::collections::BTreeSet ;
use std::fs ;
use std::path::{ Path, PathBuf };

use thiserror::Error ;
use tracing::debug ;

use crate::descriptor::ComponentDescriptor ;
use crate::manifest::ArtifactManifest ;



const DESCRIPTOR_ENTRY: &str = "component.json" ;
const MANIFEST_ENTRY: &str = "manifest.properties" ;
const META_DIR: &str = "meta" ;
const UNITS_DIR: &str = "units" ;
const RESOURCES_DIR: &str = "resources" ;
const UNIT_EXTENSION: &str = "unit" ;

#[derive( Error, Debug )]
pub enum ArtifactError {
    #[error( "Artifact path '{0}' is not a directory" )] NotAnArtifact( PathBuf ),
    #[error( "Failed to read artifact entry '{0}': {1}" )] UnreadableEntry( PathBuf, std::io::Error ),
    #[error( "Malformed component descriptor at '{0}': {1}" )] MalformedDescriptor( PathBuf, serde_json::Error ),
}

/// An opened artifact: immutable binary content plus its parsed metadata.
#[derive( Debug, Clone )]
pub struct Artifact {
    path: PathBuf,
    descriptor: Option<ComponentDescriptor>,
    /// Whether the descriptor came from a version-qualified `meta/<n>/`
    /// location rather than the artifact root.
    versioned_descriptor: bool,
    manifest: Option<ArtifactManifest>,
    namespaces: BTreeSet<String>,
}

impl Artifact {

    /// Opens the artifact at `path`, parsing its metadata.
    ///
    /// # Errors
    /// Returns an error if the path is not a directory, an entry cannot be
    /// read, or a present descriptor fails to parse. An unreadable artifact
    /// is never reported as an artifact without identity.
    pub fn open( path: &Path ) -> Result<Self, ArtifactError> {

        if !path.is_dir() {
            return Err( ArtifactError::NotAnArtifact( path.to_path_buf() ));
        }

        let ( descriptor, versioned_descriptor ) = read_descriptor( path )?;
        let manifest = read_manifest( path )?;

        let mut namespaces = BTreeSet::new();
        collect_namespaces( &path.join( UNITS_DIR ), "", &mut namespaces )?;
        collect_namespaces( &path.join( RESOURCES_DIR ), "", &mut namespaces )?;
        if let Some( descriptor ) = &descriptor {
            namespaces.extend( descriptor.namespaces.iter().cloned() );
        }

        Ok( Self {
            path: path.to_path_buf(),
            descriptor,
            versioned_descriptor,
            manifest,
            namespaces,
        })

    }

    /// Filesystem location of this artifact.
    #[inline] pub fn path( &self ) -> &Path { &self.path }

    /// The explicit component descriptor, if the artifact carries one.
    #[inline] pub fn descriptor( &self ) -> Option<&ComponentDescriptor> { self.descriptor.as_ref() }

    /// Whether the descriptor was found only in a version-qualified location.
    #[inline] pub fn descriptor_is_versioned( &self ) -> bool { self.versioned_descriptor }

    /// The artifact manifest, if present.
    #[inline] pub fn manifest( &self ) -> Option<&ArtifactManifest> { self.manifest.as_ref() }

    /// Every namespace this artifact's content tree or descriptor declares.
    #[inline] pub fn namespaces( &self ) -> &BTreeSet<String> { &self.namespaces }

    /// Opens a content store over this artifact.
    pub fn store( &self ) -> ArtifactStore {
        ArtifactStore { root: self.path.clone() }
    }

}

/// Read access to one artifact's content entries.
///
/// A store is owned by exactly one loader context and dropped with it,
/// releasing the artifact once the owning layer is discarded.
#[derive( Debug )]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {

    /// Reads the raw bytes of the code unit named `qualified`, or `None` if
    /// this artifact holds no such unit.
    pub fn unit_bytes( &self, qualified: &str ) -> Result<Option<Vec<u8>>, ArtifactError> {
        let mut path = self.root.join( UNITS_DIR ).join( entry_path( qualified ));
        path.set_extension( UNIT_EXTENSION );
        read_optional( &path )
    }

    /// Reads the raw bytes of the resource named `qualified`, or `None` if
    /// this artifact holds no such resource.
    pub fn resource_bytes( &self, qualified: &str ) -> Result<Option<Vec<u8>>, ArtifactError> {
        read_optional( &self.root.join( RESOURCES_DIR ).join( entry_path( qualified )))
    }

}

/// Lists candidate artifact directories under each of `directories`, sorted
/// by path so discovery order is stable across filesystems.
///
/// Missing or non-directory search roots are skipped.
pub fn collect_artifacts( directories: &[PathBuf] ) -> Vec<PathBuf> {

    let mut artifacts = Vec::new();

    for directory in directories {
        let Ok( entries ) = fs::read_dir( directory ) else {
            debug!( "Skipping missing artifact directory '{}'", directory.display() );
            continue
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                artifacts.push( path );
            }
        }
    }

    artifacts.sort();
    artifacts

}

/// Maps a dotted qualified name to its relative entry path.
fn entry_path( qualified: &str ) -> PathBuf {
    qualified.split( '.' ).collect()
}

fn read_optional( path: &Path ) -> Result<Option<Vec<u8>>, ArtifactError> {
    match fs::read( path ) {
        Ok( bytes ) => Ok( Some( bytes )),
        Err( err ) if err.kind() == std::io::ErrorKind::NotFound => Ok( None ),
        Err( err ) => Err( ArtifactError::UnreadableEntry( path.to_path_buf(), err )),
    }
}

/// Finds the descriptor at the artifact root, falling back to the lowest
/// version-qualified `meta/<n>/component.json`.
fn read_descriptor( root: &Path ) -> Result<( Option<ComponentDescriptor>, bool ), ArtifactError> {

    let root_descriptor = root.join( DESCRIPTOR_ENTRY );
    if root_descriptor.is_file() {
        return Ok(( Some( parse_descriptor( &root_descriptor )? ), false ));
    }

    let meta = root.join( META_DIR );
    if !meta.is_dir() {
        return Ok(( None, false ));
    }

    let mut versions: Vec<u32> = fs::read_dir( &meta )
        .map_err(| err | ArtifactError::UnreadableEntry( meta.clone(), err ))?
        .flatten()
        .filter_map(| entry | entry.file_name().to_str().and_then(| name | name.parse().ok() ))
        .collect();
    versions.sort_unstable();

    for version in versions {
        let candidate = meta.join( version.to_string() ).join( DESCRIPTOR_ENTRY );
        if candidate.is_file() {
            return Ok(( Some( parse_descriptor( &candidate )? ), true ));
        }
    }

    Ok(( None, false ))

}

fn parse_descriptor( path: &Path ) -> Result<ComponentDescriptor, ArtifactError> {
    let text = fs::read_to_string( path )
        .map_err(| err | ArtifactError::UnreadableEntry( path.to_path_buf(), err ))?;
    serde_json::from_str( &text )
        .map_err(| err | ArtifactError::MalformedDescriptor( path.to_path_buf(), err ))
}

fn read_manifest( root: &Path ) -> Result<Option<ArtifactManifest>, ArtifactError> {
    let path = root.join( MANIFEST_ENTRY );
    if !path.is_file() { return Ok( None ) }
    let text = fs::read_to_string( &path )
        .map_err(| err | ArtifactError::UnreadableEntry( path, err ))?;
    Ok( Some( ArtifactManifest::parse( &text )))
}

/// Records every directory chain that directly holds at least one file as a
/// dotted namespace.
fn collect_namespaces(
    directory: &Path,
    prefix: &str,
    namespaces: &mut BTreeSet<String>,
) -> Result<(), ArtifactError> {

    let entries = match fs::read_dir( directory ) {
        Ok( entries ) => entries,
        Err( err ) if err.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err( err ) => return Err( ArtifactError::UnreadableEntry( directory.to_path_buf(), err )),
    };

    for entry in entries.flatten() {
        let path = entry.path();
        let Some( name ) = path.file_name().and_then( std::ffi::OsStr::to_str ) else { continue };
        if path.is_dir() {
            let child = match prefix.is_empty() {
                true => name.to_string(),
                false => format!( "{prefix}.{name}" ),
            };
            collect_namespaces( &path, &child, namespaces )?;
        } else if !prefix.is_empty() {
            namespaces.insert( prefix.to_string() );
        }
    }

    Ok(())

}
