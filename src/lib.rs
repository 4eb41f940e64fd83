//! A component loading and composition runtime for building layered modular
//! applications.
//!
//! Given a pool of binary artifacts, `layer_link` determines each artifact's
//! canonical component identity, resolves inter-component dependencies into a
//! directed acyclic layering, and loads the winning artifacts' code through
//! an interceptable transformation pipeline before handing control to a
//! discovered entry point.
//!
//! # Core Concepts
//!
//! - [`Artifact`]: An immutable directory of binary content with optional
//! 	declarative metadata (a `component.json` descriptor and/or a
//! 	`manifest.properties` manifest).
//!
//! - [`IdentitySignal`]: An artifact's claimed component name together with
//! 	the [`NameOrigin`] confidence tier the claim came from. Many artifacts
//! 	may claim one name; [`resolve_components`] arbitrates deterministically,
//! 	tiers first, first-seen on ties.
//!
//! - [`CompositionLayer`]: An immutable named namespace of resolved
//! 	components with at most one parent layer. Parent components are visible
//! 	to children, never the reverse.
//!
//! - [`LoaderContext`]: The active materializer owned by each layer. A code
//! 	unit is read, transformed, and defined exactly once per context;
//! 	repeated and concurrent requests share the identical [`CodeUnit`].
//!
//! - [`TransformPipeline`]: An ordered chain of [`ContentRewriter`]s applied
//! 	once per unit at first load, short-circuiting on the first rewrite and
//! 	recording every outcome in a [`TransformHistory`].
//!
//! - [`LaunchDispatcher`]: The linear state machine that builds the
//! 	configured layer stack, discovers [`LaunchTarget`]s and
//! 	[`LifecycleHook`]s, and dispatches to the requested target.
//!
//! # Example
//!
//! ```no_run
//! use std::collections::HashSet ;
//! use std::sync::Arc ;
//! use layer_link::{ collect_artifacts, resolve_components, build_layer, TransformPipeline };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let paths = collect_artifacts( &[ "libraries".into() ]);
//! let ( components, errors ) = resolve_components( paths, &HashSet::new() );
//! for err in &errors { eprintln!( "{}", err ); }
//!
//! let layer = build_layer( "boot", components, &[], None, Arc::new( TransformPipeline::new() ))?;
//! if let Some( unit ) = layer.materialize( "com.example.core.entry" )? {
//! 	println!( "loaded {} bytes", unit.bytes().len() );
//! }
//! # Ok(())
//! # }
//! ```

mod artifact ;
mod config ;
mod descriptor ;
mod discovery ;
mod identity ;
mod launch ;
mod layer ;
mod loader ;
mod manifest ;
mod transform ;
pub mod utils ;

pub use artifact::{ collect_artifacts, Artifact, ArtifactError, ArtifactStore };
pub use config::{ BootConfig, ConfigError };
pub use descriptor::{ ComponentDescriptor, ProvidesDecl, VisibilityDecl };
pub use discovery::{ discover, Contract, DiscoveryError, ProviderError, ProviderFactory, ProviderInstance, ProviderRegistry };
pub use identity::{ inspect, resolve_components, IdentitySignal, InspectError, NameOrigin, ResolvedComponent, EXCLUDED_COMPONENTS };
pub use launch::{ DispatchFailure, DispatchPhase, LaunchDispatcher, LaunchError, LaunchTarget, LifecycleHook };
pub use layer::{ build_layer, CompositionLayer, LayerError, VisibilityEdge };
pub use loader::{ namespace_of, CodeUnit, LoaderContext, MaterializeError };
pub use manifest::ArtifactManifest ;
pub use transform::{ ContentRewriter, RewriteError, RewriteKind, TransformHistory, TransformOutcome, TransformPipeline, TransformRecord };
