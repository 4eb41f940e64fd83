//! The boot configuration file (`boot.cfg`).
//!
//! Line-oriented `key=value` pairs, `#`-prefixed comments, blank lines
//! ignored. Path-list values are colon-separated. Parsed once before the
//! core runs; the core only ever sees the typed accessors.

use std::collections::{ HashMap, HashSet };
use std::fs ;
use std::path::{ Path, PathBuf };

use thiserror::Error ;



#[derive( Error, Debug )]
pub enum ConfigError {
    #[error( "Failed to read boot configuration at '{0}': {1}" )]
    Unreadable( PathBuf, std::io::Error ),
}

/// Parsed boot configuration.
#[derive( Debug, Clone, Default )]
pub struct BootConfig {
    entries: HashMap<String, String>,
}

impl BootConfig {

    /// Directories scanned for library artifacts (colon-separated).
    pub const LIBRARY_PATH: &'static str = "Library-Path" ;
    /// Directories scanned for plugin artifacts (colon-separated).
    pub const PLUGIN_PATH: &'static str = "Plugin-Path" ;
    /// Directories scanned for launch-level artifacts (colon-separated).
    pub const LAUNCH_PATH: &'static str = "Launch-Path" ;
    /// Artifact paths excluded after resolution (colon-separated).
    pub const DELETE_FILES: &'static str = "Delete-Files" ;
    /// Default launch target id when none is passed on the command line.
    pub const LAUNCH_TARGET: &'static str = "Launch-Target" ;

    pub fn parse( text: &str ) -> Self {
        let entries = text.lines()
            .map( str::trim )
            .filter(| line | !line.is_empty() && !line.starts_with( '#' ))
            .filter_map(| line | {
                let separator = line.find( '=' )?;
                if separator == 0 || separator == line.len() - 1 { return None }
                let ( key, value ) = line.split_at( separator );
                Some(( key.trim().to_string(), value[ 1.. ].trim().to_string() ))
            })
            .collect();
        Self { entries }
    }

    /// Reads and parses the configuration file at `path`.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read.
    pub fn read_from( path: &Path ) -> Result<Self, ConfigError> {
        fs::read_to_string( path )
            .map(| text | Self::parse( &text ))
            .map_err(| err | ConfigError::Unreadable( path.to_path_buf(), err ))
    }

    #[inline] pub fn get( &self, key: &str ) -> Option<&str> {
        self.entries.get( key ).map( String::as_str )
    }

    pub fn library_paths( &self ) -> Vec<PathBuf> { self.path_list( Self::LIBRARY_PATH )}

    pub fn plugin_paths( &self ) -> Vec<PathBuf> { self.path_list( Self::PLUGIN_PATH )}

    pub fn launch_paths( &self ) -> Vec<PathBuf> { self.path_list( Self::LAUNCH_PATH )}

    /// Artifact paths dropped from every resolution pass.
    pub fn denied_paths( &self ) -> HashSet<PathBuf> {
        self.path_list( Self::DELETE_FILES ).into_iter().collect()
    }

    /// The configured default launch target id, if any.
    pub fn launch_target( &self ) -> Option<&str> {
        self.get( Self::LAUNCH_TARGET ).filter(| id | !id.is_empty() )
    }

    fn path_list( &self, key: &str ) -> Vec<PathBuf> {
        self.get( key )
            .unwrap_or( "" )
            .split( ':' )
            .map( str::trim )
            .filter(| entry | !entry.is_empty() )
            .map( PathBuf::from )
            .collect()
    }

}
