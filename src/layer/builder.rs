//! Dependency-closure layer construction.
//!
//! Starting from the required roots (or the full candidate set), the builder
//! pulls in every component reachable over declared requirement edges,
//! checking each edge against the candidates and the parent chain. Any
//! unsatisfiable or circular requirement fails the whole build; no partial
//! layer is ever returned.

use std::collections::{ HashMap, VecDeque };
use std::sync::Arc ;

use itertools::Itertools ;
use pipe_trait::Pipe ;
use thiserror::Error ;
use tracing::{ debug, info };

use crate::identity::ResolvedComponent ;
use crate::loader::LoaderContext ;
use crate::transform::TransformPipeline ;
use super::{ CompositionLayer, VisibilityEdge };



#[derive( Error, Debug )]
pub enum LayerError {
    #[error( "Component '{requirer}' requires '{missing}', which is neither a candidate nor present in any parent layer" )]
    UnsatisfiedRequirement { requirer: String, missing: String },
    #[error( "Circular requirement chain: {0:?}" )]
    CircularRequirement( Vec<String> ),
    #[error( "Required root component '{0}' is not among the layer candidates" )]
    UnknownRoot( String ),
}

/// Builds an immutable layer over `candidates`.
///
/// With empty `required_roots` the whole candidate set is activated;
/// otherwise only the transitive closure of the roots. Requirements already
/// present in the parent chain are satisfied there and never duplicated into
/// this layer's own component set.
///
/// # Errors
/// Fails fast on a root that exists nowhere, a requirement satisfiable
/// nowhere, or a requirement cycle among the candidates.
pub fn build_layer(
    name: impl Into<String>,
    mut candidates: HashMap<String, ResolvedComponent>,
    required_roots: &[String],
    parent: Option<Arc<CompositionLayer>>,
    pipeline: Arc<TransformPipeline>,
) -> Result<Arc<CompositionLayer>, LayerError> {

    let name = name.into();

    let seeds: Vec<String> = match required_roots.is_empty() {
        true => candidates.keys().cloned().sorted().collect(),
        false => {
            for root in required_roots {
                if !candidates.contains_key( root ) && !satisfied_by_parent( &parent, root ) {
                    return Err( LayerError::UnknownRoot( root.clone() ));
                }
            }
            required_roots.iter()
                .filter(| root | candidates.contains_key( *root ))
                .cloned()
                .collect()
        }
    };

    let mut included: HashMap<String, ResolvedComponent> = HashMap::new();
    let mut queue: VecDeque<String> = seeds.into();

    while let Some( current ) = queue.pop_front() {
        if included.contains_key( &current ) { continue }
        let Some( component ) = candidates.remove( &current ) else { continue };
        let requirements = component.requires().to_vec();
        included.insert( current.clone(), component );

        for requirement in requirements {
            if included.contains_key( &requirement ) { continue }
            if candidates.contains_key( &requirement ) {
                queue.push_back( requirement );
                continue
            }
            if satisfied_by_parent( &parent, &requirement ) {
                debug!( "Requirement '{}' of '{}' satisfied by parent layer", requirement, current );
                continue
            }
            return Err( LayerError::UnsatisfiedRequirement { requirer: current, missing: requirement });
        }
    }

    if let Some( cycle ) = find_cycle( &included ) {
        return Err( LayerError::CircularRequirement( cycle ));
    }

    let visibility = collect_visibility( &included );

    let layer = LoaderContext::new( &included, pipeline )
        .pipe(| loader | CompositionLayer { name, parent, components: included, visibility, loader })
        .pipe( Arc::new );

    info!(
        "Layer '{}' built with {} components{}",
        layer.name(),
        layer.components().len(),
        layer.parent().map_or( String::new(), | parent | format!( " (parent '{}')", parent.name() )),
    );
    Ok( layer )

}

fn satisfied_by_parent( parent: &Option<Arc<CompositionLayer>>, name: &str ) -> bool {
    parent.as_ref().is_some_and(| layer | layer.contains_transitively( name ))
}

fn collect_visibility( included: &HashMap<String, ResolvedComponent> ) -> Vec<VisibilityEdge> {

    let mut edges = Vec::new();

    for name in included.keys().sorted() {
        let Some( descriptor ) = included[ name ].artifact().descriptor() else { continue };
        for decl in descriptor.exposes.iter().chain( &descriptor.opens ) {
            for target in &decl.to {
                edges.push( VisibilityEdge::new( name.clone(), decl.namespace.clone(), target.clone() ));
            }
        }
    }

    edges

}

#[derive( PartialEq, Clone, Copy )]
enum Mark { InProgress, Done }

/// Depth-first search for a requirement cycle among the included components.
/// Requirements satisfied outside the layer leave the graph and cannot
/// participate in a cycle.
fn find_cycle( included: &HashMap<String, ResolvedComponent> ) -> Option<Vec<String>> {

    let mut marks: HashMap<&str, Mark> = HashMap::new();
    let mut stack: Vec<&str> = Vec::new();

    for name in included.keys().sorted() {
        if let Some( cycle ) = visit( name, included, &mut marks, &mut stack ) {
            return Some( cycle );
        }
    }

    None

}

fn visit<'a>(
    name: &'a str,
    included: &'a HashMap<String, ResolvedComponent>,
    marks: &mut HashMap<&'a str, Mark>,
    stack: &mut Vec<&'a str>,
) -> Option<Vec<String>> {

    match marks.get( name ) {
        Some( Mark::Done ) => return None,
        Some( Mark::InProgress ) => {
            let start = stack.iter().position(| entry | *entry == name ).unwrap_or( 0 );
            return Some(
                stack[ start.. ].iter()
                    .map(| entry | ( *entry ).to_string() )
                    .chain( std::iter::once( name.to_string() ))
                    .collect()
            );
        }
        None => {}
    }

    marks.insert( name, Mark::InProgress );
    stack.push( name );

    if let Some( component ) = included.get( name ) {
        for requirement in component.requires() {
            if !included.contains_key( requirement.as_str() ) { continue }
            if let Some( cycle ) = visit( requirement, included, marks, stack ) {
                return Some( cycle );
            }
        }
    }

    stack.pop();
    marks.insert( name, Mark::Done );
    None

}
