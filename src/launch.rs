//! Launch targets, lifecycle hooks, and the dispatch state machine.
//!
//! The dispatcher drives one process launch end to end: validate the
//! requested target, build the configured layer stack, discover providers,
//! and hand control to the selected target. Every fatal failure is reported
//! to the previously-discovered lifecycle hooks, in discovery order, before
//! it is re-raised.

use std::collections::BTreeMap ;
use std::sync::Arc ;

use thiserror::Error ;
use tracing::{ info, warn };

use crate::artifact::collect_artifacts ;
use crate::config::BootConfig ;
use crate::discovery::{ discover, Contract, ProviderInstance, ProviderRegistry };
use crate::identity::resolve_components ;
use crate::layer::{ build_layer, CompositionLayer, LayerError };
use crate::transform::TransformPipeline ;



/// Error type launch procedures may fail with.
pub type LaunchError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A dispatchable entry point discovered from a layer's components.
pub trait LaunchTarget: Send + Sync {
    /// Identifier matched against `--launchTarget`.
    fn id( &self ) -> &str ;
    /// Runs the target against the topmost layer.
    ///
    /// A target may build a further layer of its own; returning it makes it
    /// available to subsequent lifecycle and service lookups.
    ///
    /// # Errors
    /// Any error fails the dispatch; lifecycle hooks are notified before the
    /// failure reaches the caller.
    fn launch(
        &self,
        layer: &Arc<CompositionLayer>,
        parent: Option<&Arc<CompositionLayer>>,
        args: &[String],
    ) -> Result<Option<Arc<CompositionLayer>>, LaunchError> ;
}

/// A failure observer notified before a dispatch failure is re-raised.
pub trait LifecycleHook: Send + Sync {
    /// Called with the triggering failure and the layer at time of failure.
    fn on_error( &self, failure: &DispatchFailure, layer: Option<&Arc<CompositionLayer>> );
}

/// The linear dispatch progression. `Failed` and `Completed` are terminal.
#[derive( Debug, Clone, Copy, PartialEq, Eq )]
pub enum DispatchPhase {
    Created,
    ArgsValidated,
    LayerBuilt,
    TargetsDiscovered,
    Dispatched,
    Completed,
    Failed,
}

#[derive( Error, Debug )]
pub enum DispatchFailure {
    #[error( "No launch target id given; pass --launchTarget <id> or set Launch-Target in the boot configuration" )]
    MissingTargetId,
    #[error( "Layer resolution failed: {0}" )]
    LayerFailed( #[from] LayerError ),
    #[error( "Launch target '{requested}' not found; available targets: {available:?}" )]
    TargetNotFound { requested: String, available: Vec<String> },
    #[error( "Launch target '{id}' failed: {cause}" )]
    TargetFailed { id: String, cause: LaunchError },
}

/// Drives one launch from argument validation to target completion.
///
/// A dispatcher is single-use: [`dispatch`]( Self::dispatch ) runs the state
/// machine once and leaves the terminal phase observable.
pub struct LaunchDispatcher {
    registry: ProviderRegistry,
    pipeline: Arc<TransformPipeline>,
    phase: DispatchPhase,
    hooks: Vec<Arc<dyn LifecycleHook>>,
    targets: BTreeMap<String, Arc<dyn LaunchTarget>>,
    final_layer: Option<Arc<CompositionLayer>>,
}

impl LaunchDispatcher {

    pub fn new( registry: ProviderRegistry ) -> Self {
        Self {
            registry,
            pipeline: Arc::new( TransformPipeline::new() ),
            phase: DispatchPhase::Created,
            hooks: Vec::new(),
            targets: BTreeMap::new(),
            final_layer: None,
        }
    }

    /// The pipeline every layer built by this dispatcher loads through.
    #[inline] pub fn pipeline( &self ) -> &Arc<TransformPipeline> { &self.pipeline }

    /// Current state-machine phase.
    #[inline] pub fn phase( &self ) -> DispatchPhase { self.phase }

    /// The topmost layer after a completed dispatch, including any layer the
    /// target itself produced.
    #[inline] pub fn final_layer( &self ) -> Option<&Arc<CompositionLayer>> { self.final_layer.as_ref() }

    /// Runs the dispatch state machine.
    ///
    /// `requested` overrides the configuration's `Launch-Target`; trailing
    /// `args` are passed through to the target opaquely.
    ///
    /// # Errors
    /// Returns the triggering failure after notifying every discovered
    /// lifecycle hook, in discovery order.
    pub fn dispatch(
        &mut self,
        config: &BootConfig,
        requested: Option<&str>,
        args: &[String],
    ) -> Result<(), DispatchFailure> {

        let Some( target_id ) = requested.or( config.launch_target() ).map( str::to_string ) else {
            return Err( self.fail( DispatchFailure::MissingTargetId, None ));
        };
        self.phase = DispatchPhase::ArgsValidated;

        let library_layer = self.build_stage( "libraries", config, &config.library_paths(), None )?;
        let plugin_layer = self.build_stage( "plugins", config, &config.plugin_paths(), Some( Arc::clone( &library_layer )))?;
        let launch_layer = match config.launch_paths().is_empty() {
            true => None,
            false => Some( self.build_stage( "launch", config, &config.launch_paths(), Some( Arc::clone( &plugin_layer )))? ),
        };
        self.phase = DispatchPhase::LayerBuilt;

        self.discover_providers( &library_layer );
        self.discover_providers( &plugin_layer );
        if let Some( launch_layer ) = &launch_layer {
            self.discover_providers( launch_layer );
        }
        let top = launch_layer.unwrap_or( plugin_layer );
        self.phase = DispatchPhase::TargetsDiscovered;

        let Some( target ) = self.targets.get( &target_id ).map( Arc::clone ) else {
            let available = self.targets.keys().cloned().collect();
            return Err( self.fail(
                DispatchFailure::TargetNotFound { requested: target_id, available },
                Some( &top ),
            ));
        };
        self.phase = DispatchPhase::Dispatched;
        info!( "Dispatching to launch target '{}'", target_id );

        match target.launch( &top, top.parent(), args ) {
            Ok( created ) => {
                // Fold in any layer the target built itself.
                self.final_layer = Some( created.unwrap_or( top ));
                self.phase = DispatchPhase::Completed;
                info!( "Launch target '{}' completed", target_id );
                Ok(())
            }
            Err( cause ) => Err( self.fail(
                DispatchFailure::TargetFailed { id: target_id, cause },
                Some( &top ),
            )),
        }

    }

    /// Resolves one stage directory set and builds its layer, registering any
    /// rewriters the new layer provides - the pipeline's extension
    /// checkpoint.
    fn build_stage(
        &mut self,
        stage: &str,
        config: &BootConfig,
        directories: &[std::path::PathBuf],
        parent: Option<Arc<CompositionLayer>>,
    ) -> Result<Arc<CompositionLayer>, DispatchFailure> {

        let paths = collect_artifacts( directories );
        let ( components, errors ) = resolve_components( paths, &config.denied_paths() );
        errors.iter().for_each(| err | warn!( "{err}" ));

        match build_layer( stage, components, &[], parent.clone(), Arc::clone( &self.pipeline )) {
            Ok( layer ) => {
                let ( rewriters, errors ) = discover( &layer, Contract::ContentRewriter, &self.registry ).deconstruct();
                errors.iter().for_each(| err | warn!( "{err}" ));
                for instance in rewriters {
                    if let ProviderInstance::ContentRewriter( rewriter ) = instance {
                        self.pipeline.register( rewriter );
                    }
                }
                Ok( layer )
            }
            Err( err ) => Err( self.fail( err.into(), parent.as_ref() )),
        }

    }

    fn discover_providers( &mut self, layer: &Arc<CompositionLayer> ) {

        let ( hooks, errors ) = discover( layer, Contract::LifecycleHook, &self.registry ).deconstruct();
        errors.iter().for_each(| err | warn!( "{err}" ));
        for instance in hooks {
            if let ProviderInstance::LifecycleHook( hook ) = instance {
                self.hooks.push( hook );
            }
        }

        let ( targets, errors ) = discover( layer, Contract::LaunchTarget, &self.registry ).deconstruct();
        errors.iter().for_each(| err | warn!( "{err}" ));
        for instance in targets {
            if let ProviderInstance::LaunchTarget( target ) = instance {
                let id = target.id().to_string();
                if self.targets.contains_key( &id ) {
                    warn!( "Duplicate launch target id '{}' ignored", id );
                    continue
                }
                self.targets.insert( id, target );
            }
        }

    }

    /// Notifies every previously-discovered hook, in discovery order, then
    /// hands the failure back for re-raising.
    fn fail( &mut self, failure: DispatchFailure, layer: Option<&Arc<CompositionLayer>> ) -> DispatchFailure {
        self.phase = DispatchPhase::Failed;
        for hook in &self.hooks {
            hook.on_error( &failure, layer );
        }
        failure
    }

}

impl std::fmt::Debug for LaunchDispatcher {
    fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
        f.debug_struct( "LaunchDispatcher" )
            .field( "phase", &self.phase )
            .field( "hooks", &self.hooks.len() )
            .field( "targets", &self.targets.keys().collect::<Vec<_>>() )
            .finish_non_exhaustive()
    }
}
