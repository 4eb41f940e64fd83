//! Component identity: naming signals, inspection, and duplicate arbitration.

mod signal ;
mod inspect ;
mod resolver ;

pub use signal::{ NameOrigin, IdentitySignal };
pub use inspect::{ inspect, InspectError };
pub use resolver::{ resolve_components, ResolvedComponent, EXCLUDED_COMPONENTS };
