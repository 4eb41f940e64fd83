//! Capability discovery over a layer's components.
//!
//! Components self-register implementations through the `provides`
//! declarations of their descriptors; no runtime reflection is involved. A
//! process-level [`ProviderRegistry`] maps declared provider ids to
//! factories. The registry starts from whatever the embedding application
//! registers up front and is only extended at layer-load checkpoints -
//! ordinary discovery takes it read-only.

use std::collections::HashMap ;
use std::sync::Arc ;

use itertools::Itertools ;
use thiserror::Error ;
use tracing::debug ;

use crate::launch::{ LaunchTarget, LifecycleHook };
use crate::layer::CompositionLayer ;
use crate::transform::ContentRewriter ;
use crate::utils::ResultList ;



/// The capability contracts a component can declare providers for.
#[derive( Debug, Clone, Copy, PartialEq, Eq, Hash )]
pub enum Contract {
    /// A dispatchable entry point; see [`LaunchTarget`].
    LaunchTarget,
    /// A failure observer; see [`LifecycleHook`].
    LifecycleHook,
    /// A code-unit rewriter; see [`ContentRewriter`].
    ContentRewriter,
}

impl Contract {

    /// The id used in descriptor `provides` declarations.
    pub fn id( self ) -> &'static str {
        match self {
            Self::LaunchTarget => "launch-target",
            Self::LifecycleHook => "lifecycle-hook",
            Self::ContentRewriter => "content-rewriter",
        }
    }

    pub fn from_id( id: &str ) -> Option<Contract> {
        match id {
            "launch-target" => Some( Self::LaunchTarget ),
            "lifecycle-hook" => Some( Self::LifecycleHook ),
            "content-rewriter" => Some( Self::ContentRewriter ),
            _ => None,
        }
    }

}

impl std::fmt::Display for Contract {
    fn fmt( &self, f: &mut std::fmt::Formatter ) -> std::fmt::Result {
        write!( f, "{}", self.id() )
    }
}

/// One instantiated capability provider.
pub enum ProviderInstance {
    LaunchTarget( Arc<dyn LaunchTarget> ),
    LifecycleHook( Arc<dyn LifecycleHook> ),
    ContentRewriter( Arc<dyn ContentRewriter> ),
}

impl ProviderInstance {
    /// The contract this instance implements.
    pub fn contract( &self ) -> Contract {
        match self {
            Self::LaunchTarget( _ ) => Contract::LaunchTarget,
            Self::LifecycleHook( _ ) => Contract::LifecycleHook,
            Self::ContentRewriter( _ ) => Contract::ContentRewriter,
        }
    }
}

impl std::fmt::Debug for ProviderInstance {
    fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
        write!( f, "ProviderInstance({})", self.contract() )
    }
}

/// Error type provider factories may fail with.
pub type ProviderError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Constructs a fresh provider instance for a declared provider id.
pub type ProviderFactory = Box<dyn Fn() -> Result<ProviderInstance, ProviderError> + Send + Sync>;

#[derive( Error, Debug )]
pub enum DiscoveryError {
    #[error( "Component '{component}' declares provider '{provider}' but no factory is registered for it" )]
    UnknownProvider { component: String, provider: String },
    #[error( "Provider '{provider}' from component '{component}' failed to instantiate: {cause}" )]
    InstantiationFailed { component: String, provider: String, cause: ProviderError },
    #[error( "Provider '{provider}' from component '{component}' implements '{actual}', expected '{expected}'" )]
    ContractMismatch { component: String, provider: String, actual: Contract, expected: Contract },
}

/// Process-level mapping from provider ids to factories.
///
/// Built once at startup with the embedder's defaults; extension afterwards
/// is confined to layer-load checkpoints by the mutable-borrow requirement of
/// [`register`]( Self::register ).
#[derive( Default )]
pub struct ProviderRegistry {
    factories: HashMap<String, ProviderFactory>,
}

impl ProviderRegistry {

    pub fn new() -> Self {
        Self { factories: HashMap::new() }
    }

    /// Registers (or replaces) the factory for `provider_id`.
    pub fn register( &mut self, provider_id: impl Into<String>, factory: ProviderFactory ) {
        self.factories.insert( provider_id.into(), factory );
    }

    pub fn contains( &self, provider_id: &str ) -> bool {
        self.factories.contains_key( provider_id )
    }

    fn instantiate( &self, component: &str, provider: &str ) -> Result<ProviderInstance, DiscoveryError> {
        let factory = self.factories.get( provider )
            .ok_or_else(|| DiscoveryError::UnknownProvider {
                component: component.to_string(),
                provider: provider.to_string(),
            })?;
        factory().map_err(| cause | DiscoveryError::InstantiationFailed {
            component: component.to_string(),
            provider: provider.to_string(),
            cause,
        })
    }

}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
        f.debug_struct( "ProviderRegistry" )
            .field( "factories", &self.factories.keys().sorted().collect::<Vec<_>>() )
            .finish()
    }
}

/// Instantiates every declared implementation of `contract` among the
/// components physically defined in `layer`.
///
/// Ancestor layers are never scanned; their providers were discovered when
/// they were built. A provider that cannot be instantiated is collected as a
/// failure and skipped - it never prevents discovery of the remaining
/// providers. Components are scanned in name order so results are stable.
pub fn discover(
    layer: &CompositionLayer,
    contract: Contract,
    registry: &ProviderRegistry,
) -> ResultList<ProviderInstance, DiscoveryError> {

    layer.components().keys().sorted()
        .filter_map(| name | layer.components()[ name ].artifact().descriptor().map(| descriptor | ( name, descriptor )))
        .flat_map(|( name, descriptor )| {
            descriptor.provides.iter()
                .filter(| decl | Contract::from_id( &decl.contract ) == Some( contract ))
                .map( move | decl | ( name.clone(), decl.provider.clone() ))
        })
        .map(|( component, provider )| {
            let instance = registry.instantiate( &component, &provider )?;
            if instance.contract() != contract {
                return Err( DiscoveryError::ContractMismatch {
                    component,
                    provider,
                    actual: instance.contract(),
                    expected: contract,
                });
            }
            debug!( "Discovered {} provider '{}' from component '{}'", contract, provider, component );
            Ok( instance )
        })
        .collect()

}
