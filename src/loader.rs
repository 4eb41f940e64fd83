//! Materialization of code units for one composition layer.
//!
//! Each layer owns one [`LoaderContext`]. The context maps component names to
//! artifact content stores and caches materialized units by qualified name:
//! once a unit has been defined inside a context it is never re-read and
//! never re-transformed, and every caller observes the identical instance.

mod code_unit ;

pub use code_unit::CodeUnit ;

use std::collections::hash_map::Entry ;
use std::collections::HashMap ;
use std::sync::{ Arc, Mutex, OnceLock, PoisonError };

use itertools::Itertools ;
use thiserror::Error ;
use tracing::{ debug, warn };

use crate::artifact::ArtifactStore ;
use crate::identity::ResolvedComponent ;
use crate::layer::VisibilityEdge ;
use crate::transform::TransformPipeline ;



#[derive( Error, Debug, Clone )]
pub enum MaterializeError {
    #[error( "Failed to read unit '{unit}' of component '{component}': {message}" )]
    UnreadableUnit { unit: String, component: String, message: String },
    #[error( "Failed to read resource '{resource}' of component '{component}': {message}" )]
    UnreadableResource { resource: String, component: String, message: String },
}

/// The namespace prefix of a qualified unit name: everything before the final
/// dot. A name without a namespace belongs to no component.
pub fn namespace_of( qualified_name: &str ) -> Option<&str> {
    match qualified_name.rfind( '.' ) {
        Some( 0 ) | None => None,
        Some( position ) => Some( &qualified_name[ ..position ]),
    }
}

/// Cached result of one exactly-once definition attempt. Failures are cached
/// alongside successes: the pipeline ran once for the name, and every caller
/// observes that single outcome.
type UnitSlot = Arc<OnceLock<Result<Option<Arc<CodeUnit>>, MaterializeError>>>;

/// The active materializer of code units for one layer.
pub struct LoaderContext {
    /// Component name to its artifact content store.
    stores: HashMap<String, ArtifactStore>,
    /// Namespace to the component that owns it.
    namespace_index: HashMap<String, String>,
    pipeline: Arc<TransformPipeline>,
    units: Mutex<HashMap<String, UnitSlot>>,
}

impl LoaderContext {

    pub(crate) fn new(
        components: &HashMap<String, ResolvedComponent>,
        pipeline: Arc<TransformPipeline>,
    ) -> Self {

        let mut stores = HashMap::new();
        let mut namespace_index: HashMap<String, String> = HashMap::new();

        // Components are indexed in name order so namespace conflicts
        // resolve the same way on every build.
        for name in components.keys().sorted() {
            let component = &components[ name ];
            stores.insert( name.clone(), component.artifact().store() );
            for namespace in component.artifact().namespaces() {
                match namespace_index.entry( namespace.clone() ) {
                    Entry::Vacant( entry ) => { entry.insert( name.clone() ); }
                    Entry::Occupied( entry ) => warn!(
                        "Namespace '{}' claimed by both '{}' and '{}'; keeping '{}'",
                        namespace, entry.get(), name, entry.get(),
                    ),
                }
            }
        }

        Self { stores, namespace_index, pipeline, units: Mutex::new( HashMap::new() )}

    }

    /// The component owning `namespace` in this context, if any.
    pub fn owner_of( &self, namespace: &str ) -> Option<&str> {
        self.namespace_index.get( namespace ).map( String::as_str )
    }

    /// Defines or fetches the unit named `qualified`, assuming its namespace
    /// is owned locally.
    ///
    /// Concurrent first requests for the same name coordinate through a
    /// per-name slot: exactly one caller runs the transformation pipeline,
    /// the rest block until the slot is filled and then share the result.
    pub(crate) fn materialize_local( &self, qualified: &str ) -> Result<Option<Arc<CodeUnit>>, MaterializeError> {
        let slot: UnitSlot = {
            let mut units = self.units.lock().unwrap_or_else( PoisonError::into_inner );
            Arc::clone( units.entry( qualified.to_string() ).or_default() )
        };
        slot.get_or_init(|| self.define_unit( qualified )).clone()
    }

    fn define_unit( &self, qualified: &str ) -> Result<Option<Arc<CodeUnit>>, MaterializeError> {

        let Some( namespace ) = namespace_of( qualified ) else { return Ok( None ) };
        let Some( component ) = self.namespace_index.get( namespace ) else { return Ok( None ) };
        let Some( store ) = self.stores.get( component ) else { return Ok( None ) };

        let original = store.unit_bytes( qualified )
            .map_err(| err | MaterializeError::UnreadableUnit {
                unit: qualified.to_string(),
                component: component.clone(),
                message: err.to_string(),
            })?;
        let Some( original ) = original else { return Ok( None ) };

        let ( kind, bytes ) = match self.pipeline.apply( qualified, &original ).into_parts() {
            ( kind, Some( rewritten )) => ( kind, rewritten ),
            ( kind, None ) => ( kind, original ),
        };

        debug!( "Defined unit '{}' from component '{}' ({})", qualified, component, kind );
        Ok( Some( Arc::new( CodeUnit::new( qualified, component, kind, bytes ))))

    }

    /// Looks up the resource named `qualified` without transforming.
    ///
    /// When the owning component lacks the entry, visibility edges targeting
    /// the owner are consulted and the source component's store is tried.
    /// Visibility never applies to code materialization.
    pub(crate) fn resource_local(
        &self,
        qualified: &str,
        edges: &[VisibilityEdge],
    ) -> Result<Option<Vec<u8>>, MaterializeError> {

        let Some( namespace ) = namespace_of( qualified ) else { return Ok( None ) };
        let Some( owner ) = self.namespace_index.get( namespace ) else { return Ok( None ) };

        if let Some( bytes ) = self.read_resource( owner, qualified )? {
            return Ok( Some( bytes ));
        }

        for edge in edges {
            if edge.target() != owner || edge.namespace() != namespace { continue }
            if let Some( bytes ) = self.read_resource( edge.source(), qualified )? {
                debug!(
                    "Resource '{}' served to '{}' from '{}' via visibility edge",
                    qualified, owner, edge.source(),
                );
                return Ok( Some( bytes ));
            }
        }

        Ok( None )

    }

    fn read_resource( &self, component: &str, qualified: &str ) -> Result<Option<Vec<u8>>, MaterializeError> {
        let Some( store ) = self.stores.get( component ) else { return Ok( None ) };
        store.resource_bytes( qualified )
            .map_err(| err | MaterializeError::UnreadableResource {
                resource: qualified.to_string(),
                component: component.to_string(),
                message: err.to_string(),
            })
    }

}

impl std::fmt::Debug for LoaderContext {
    fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
        f.debug_struct( "LoaderContext" )
            .field( "components", &self.stores.len() )
            .field( "namespaces", &self.namespace_index.len() )
            .finish_non_exhaustive()
    }
}
