//! Line-oriented artifact manifest (`manifest.properties`).
//!
//! The manifest is the lower-trust naming channel for artifacts that carry no
//! component descriptor: `key=value` pairs, `#`-prefixed comments, blank lines
//! ignored. Malformed lines are skipped rather than rejected - a manifest is
//! advisory metadata, not a contract.

use std::collections::HashMap ;

/// Parsed contents of an artifact's `manifest.properties`.
#[derive( Debug, Clone, Default )]
pub struct ArtifactManifest {
    entries: HashMap<String, String>,
}

impl ArtifactManifest {

    /// Manifest key declaring an automatic component name.
    pub const COMPONENT_NAME: &'static str = "Component-Name" ;
    /// Manifest key carrying a bundle symbolic name, possibly with
    /// `;`-separated attributes after the name itself.
    pub const BUNDLE_SYMBOLIC_NAME: &'static str = "Bundle-SymbolicName" ;

    pub fn parse( text: &str ) -> Self {
        let entries = text.lines()
            .map( str::trim )
            .filter(| line | !line.is_empty() && !line.starts_with( '#' ))
            .filter_map(| line | {
                let separator = line.find( '=' )?;
                // A key-less or value-less line is malformed; skip it.
                if separator == 0 || separator == line.len() - 1 { return None }
                let ( key, value ) = line.split_at( separator );
                Some(( key.trim().to_string(), value[ 1.. ].trim().to_string() ))
            })
            .collect();
        Self { entries }
    }

    #[inline] pub fn get( &self, key: &str ) -> Option<&str> {
        self.entries.get( key ).map( String::as_str )
    }

    /// The declared automatic component name, if any.
    pub fn component_name( &self ) -> Option<&str> {
        self.get( Self::COMPONENT_NAME ).filter(| name | !name.is_empty() )
    }

    /// The bundle symbolic name with any trailing `;`-attributes stripped.
    pub fn bundle_symbolic_name( &self ) -> Option<&str> {
        self.get( Self::BUNDLE_SYMBOLIC_NAME )
            .map(| value | value.split( ';' ).next().unwrap_or( value ).trim() )
            .filter(| name | !name.is_empty() )
    }

}
