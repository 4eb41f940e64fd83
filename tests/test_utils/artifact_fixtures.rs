// Shared helpers that build artifact directories for tests.

#[allow( dead_code )]
fn write_entry( path: &std::path::Path, bytes: &[u8] ) {
    if let Some( parent ) = path.parent() {
        std::fs::create_dir_all( parent ).unwrap();
    }
    std::fs::write( path, bytes ).unwrap();
}

#[allow( dead_code )]
fn artifact_dir( root: &std::path::Path, name: &str ) -> std::path::PathBuf {
    let artifact = root.join( name );
    std::fs::create_dir_all( &artifact ).unwrap();
    artifact
}

#[allow( dead_code )]
fn descriptor_artifact( root: &std::path::Path, dir_name: &str, descriptor_json: &str ) -> std::path::PathBuf {
    let artifact = artifact_dir( root, dir_name );
    write_entry( &artifact.join( "component.json" ), descriptor_json.as_bytes() );
    artifact
}

#[allow( dead_code )]
fn manifest_artifact( root: &std::path::Path, dir_name: &str, manifest: &str ) -> std::path::PathBuf {
    let artifact = artifact_dir( root, dir_name );
    write_entry( &artifact.join( "manifest.properties" ), manifest.as_bytes() );
    artifact
}

#[allow( dead_code )]
fn add_unit( artifact: &std::path::Path, qualified: &str, bytes: &[u8] ) {
    let mut path = artifact.join( "units" );
    for segment in qualified.split( '.' ) {
        path.push( segment );
    }
    path.set_extension( "unit" );
    write_entry( &path, bytes );
}

#[allow( dead_code )]
fn add_resource( artifact: &std::path::Path, qualified: &str, bytes: &[u8] ) {
    let mut path = artifact.join( "resources" );
    for segment in qualified.split( '.' ) {
        path.push( segment );
    }
    write_entry( &path, bytes );
}

#[allow( dead_code )]
fn simple_descriptor( name: &str, requires: &[&str] ) -> String {
    let requires = requires.iter()
        .map(| required | format!( "\"{}\"", required ))
        .collect::<Vec<_>>()
        .join( ", " );
    format!( r#"{{ "name": "{}", "requires": [ {} ] }}"#, name, requires )
}

#[allow( dead_code )]
fn resolve_dir( root: &std::path::Path ) -> std::collections::HashMap<String, layer_link::ResolvedComponent> {
    let paths = layer_link::collect_artifacts( &[ root.to_path_buf() ]);
    let ( components, errors ) = layer_link::resolve_components( paths, &std::collections::HashSet::new() );
    assert!( errors.is_empty(), "unexpected inspect errors: {:?}", errors );
    components
}
