use std::path::PathBuf ;

use layer_link::{ ArtifactManifest, BootConfig };

#[test]
fn comments_blanks_and_malformed_lines_are_ignored() {

    let config = BootConfig::parse( "\
# a comment
Library-Path=libraries

no-separator-line
=value-without-key
key-without-value=
Launch-Target = mango
" );

    assert_eq!( config.library_paths(), vec![ PathBuf::from( "libraries" )]);
    assert_eq!( config.launch_target(), Some( "mango" ));
    assert!( config.get( "no-separator-line" ).is_none() );
    assert!( config.get( "key-without-value" ).is_none() );

}

#[test]
fn path_lists_split_on_colons() {

    let config = BootConfig::parse( "Plugin-Path=plugins:extra-plugins: more\nDelete-Files=a:b\n" );

    assert_eq!(
        config.plugin_paths(),
        vec![ PathBuf::from( "plugins" ), PathBuf::from( "extra-plugins" ), PathBuf::from( "more" )],
    );
    let denied = config.denied_paths();
    assert!( denied.contains( &PathBuf::from( "a" )));
    assert!( denied.contains( &PathBuf::from( "b" )));

}

#[test]
fn absent_keys_yield_empty_lists_and_no_target() {

    let config = BootConfig::parse( "" );

    assert!( config.library_paths().is_empty() );
    assert!( config.launch_paths().is_empty() );
    assert!( config.denied_paths().is_empty() );
    assert!( config.launch_target().is_none() );

}

#[test]
fn unreadable_config_file_is_an_error() {
    assert!( BootConfig::read_from( std::path::Path::new( "/no/such/boot.cfg" )).is_err() );
}

#[test]
fn manifest_recognises_naming_keys() {

    let manifest = ArtifactManifest::parse( "\
# manifest
Component-Name = alpha
Bundle-SymbolicName = beta;singleton:=true
Other = kept
" );

    assert_eq!( manifest.component_name(), Some( "alpha" ));
    assert_eq!( manifest.bundle_symbolic_name(), Some( "beta" ));
    assert_eq!( manifest.get( "Other" ), Some( "kept" ));

}

#[test]
fn manifest_blank_names_do_not_count() {

    let manifest = ArtifactManifest::parse( "Bundle-SymbolicName = ;singleton:=true\n" );

    assert!( manifest.bundle_symbolic_name().is_none() );

}
