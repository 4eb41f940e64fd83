//! Immutable composition layers with read-only upward delegation.
//!
//! A layer is a named namespace of resolved components plus a pointer to at
//! most one parent layer. Parent components are visible to children, never
//! the reverse, and the parent chain is acyclic by construction: a layer can
//! only point at a layer that was fully built before it.

mod builder ;

pub use builder::{ build_layer, LayerError };

use std::collections::HashMap ;
use std::sync::Arc ;

use crate::identity::ResolvedComponent ;
use crate::loader::{ namespace_of, CodeUnit, LoaderContext, MaterializeError };



/// One namespace made visible by `source` to the named `target` component,
/// for resource lookup only.
#[derive( Debug, Clone )]
pub struct VisibilityEdge {
    source: String,
    namespace: String,
    target: String,
}

impl VisibilityEdge {

    pub(crate) fn new( source: String, namespace: String, target: String ) -> Self {
        Self { source, namespace, target }
    }

    /// Component whose content becomes visible.
    #[inline] pub fn source( &self ) -> &str { &self.source }

    /// Namespace the edge covers.
    #[inline] pub fn namespace( &self ) -> &str { &self.namespace }

    /// Component the content becomes visible to.
    #[inline] pub fn target( &self ) -> &str { &self.target }

}

/// An immutable, named namespace of resolved components.
///
/// Built once by [`build_layer`] and never mutated; a fresh resolution on top
/// of an existing layer creates a new object with this one as its parent.
#[derive( Debug )]
pub struct CompositionLayer {
    name: String,
    parent: Option<Arc<CompositionLayer>>,
    components: HashMap<String, ResolvedComponent>,
    visibility: Vec<VisibilityEdge>,
    loader: LoaderContext,
}

impl CompositionLayer {

    /// Layer name, e.g. `libraries` or `plugins`.
    #[inline] pub fn name( &self ) -> &str { &self.name }

    /// The parent layer, if this layer was built on top of one.
    #[inline] pub fn parent( &self ) -> Option<&Arc<CompositionLayer>> { self.parent.as_ref() }

    /// The components physically defined in this layer (ancestors excluded).
    #[inline] pub fn components( &self ) -> &HashMap<String, ResolvedComponent> { &self.components }

    /// Extra-visibility edges declared by this layer's components.
    #[inline] pub fn visibility_edges( &self ) -> &[VisibilityEdge] { &self.visibility }

    /// The loader context owned by this layer.
    #[inline] pub fn loader( &self ) -> &LoaderContext { &self.loader }

    /// Looks up a component defined in this layer itself.
    pub fn component( &self, name: &str ) -> Option<&ResolvedComponent> {
        self.components.get( name )
    }

    /// Whether `name` is defined in this layer or any ancestor.
    pub fn contains_transitively( &self, name: &str ) -> bool {
        self.components.contains_key( name )
            || self.parent.as_ref().is_some_and(| parent | parent.contains_transitively( name ))
    }

    /// Materializes the code unit named `qualified`.
    ///
    /// The owning component is found by the unit's namespace prefix. A
    /// namespace owned by no layer in the ancestry is an ordinary lookup
    /// miss, not an error. Repeated requests return the identical
    /// materialized instance.
    ///
    /// # Errors
    /// Returns an error when the owning artifact's content cannot be read.
    pub fn materialize( &self, qualified: &str ) -> Result<Option<Arc<CodeUnit>>, MaterializeError> {
        match namespace_of( qualified ).and_then(| namespace | self.loader.owner_of( namespace )) {
            Some( _owner ) => self.loader.materialize_local( qualified ),
            None => match &self.parent {
                Some( parent ) => parent.materialize( qualified ),
                None => Ok( None ),
            }
        }
    }

    /// Looks up the resource named `qualified` without transforming.
    ///
    /// Unlike [`materialize`]( Self::materialize ), the lookup may follow
    /// this layer's extra-visibility edges when the owning component lacks
    /// the entry.
    ///
    /// # Errors
    /// Returns an error when artifact content cannot be read.
    pub fn resource( &self, qualified: &str ) -> Result<Option<Vec<u8>>, MaterializeError> {
        match namespace_of( qualified ).and_then(| namespace | self.loader.owner_of( namespace )) {
            Some( _owner ) => self.loader.resource_local( qualified, &self.visibility ),
            None => match &self.parent {
                Some( parent ) => parent.resource( qualified ),
                None => Ok( None ),
            }
        }
    }

}
