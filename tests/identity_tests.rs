use std::collections::HashSet ;

use layer_link::{ inspect, resolve_components, NameOrigin };

#[test]
fn explicit_descriptor_beats_filename_guess() {

    let root = tempfile::tempdir().unwrap();
    let explicit = descriptor_artifact( root.path(), "lib-a", &simple_descriptor( "a", &[] ));
    let guessed = artifact_dir( root.path(), "a-1.2.0" );

    // The guessed artifact is discovered first; the tier still dominates.
    let ( components, errors ) = resolve_components( vec![ guessed, explicit.clone() ], &HashSet::new() );

    assert!( errors.is_empty() );
    let winner = &components[ "a" ];
    assert_eq!( winner.artifact().path(), explicit.as_path() );
    assert_eq!( winner.origin(), NameOrigin::Descriptor );

}

#[test]
fn tier_dominates_regardless_of_discovery_order() {

    let root = tempfile::tempdir().unwrap();
    let explicit = descriptor_artifact( root.path(), "lib-a", &simple_descriptor( "a", &[] ));
    let guessed = artifact_dir( root.path(), "a-1.2.0" );

    let ( forward, _ ) = resolve_components( vec![ explicit.clone(), guessed.clone() ], &HashSet::new() );
    let ( backward, _ ) = resolve_components( vec![ guessed, explicit.clone() ], &HashSet::new() );

    assert_eq!( forward[ "a" ].artifact().path(), explicit.as_path() );
    assert_eq!( backward[ "a" ].artifact().path(), explicit.as_path() );

}

#[test]
fn first_seen_wins_at_equal_tier() {

    let root = tempfile::tempdir().unwrap();
    let first = artifact_dir( root.path(), "util-1.0" );
    let second = artifact_dir( root.path(), "util-2.0" );

    let ( components, errors ) = resolve_components( vec![ first.clone(), second ], &HashSet::new() );

    assert!( errors.is_empty() );
    assert_eq!( components.len(), 1 );
    assert_eq!( components[ "util" ].artifact().path(), first.as_path() );

}

#[test]
fn at_most_one_component_per_name() {

    let root = tempfile::tempdir().unwrap();
    let paths = vec![
        descriptor_artifact( root.path(), "one", &simple_descriptor( "shared", &[] )),
        artifact_dir( root.path(), "shared-2.0" ),
        manifest_artifact( root.path(), "three", "Component-Name = shared\n" ),
    ];

    let ( components, _ ) = resolve_components( paths, &HashSet::new() );

    assert_eq!( components.len(), 1 );
    assert_eq!( components[ "shared" ].origin(), NameOrigin::Descriptor );

}

#[test]
fn versioned_descriptor_ranks_below_explicit() {

    let root = tempfile::tempdir().unwrap();

    let versioned = artifact_dir( root.path(), "versioned" );
    write_entry(
        &versioned.join( "meta" ).join( "9" ).join( "component.json" ),
        simple_descriptor( "thing", &[] ).as_bytes(),
    );
    let signal = inspect( &versioned ).unwrap();
    assert_eq!( signal.name(), "thing" );
    assert_eq!( signal.origin(), NameOrigin::VersionedDescriptor );

    let explicit = descriptor_artifact( root.path(), "explicit", &simple_descriptor( "thing", &[] ));
    let ( components, _ ) = resolve_components( vec![ versioned, explicit.clone() ], &HashSet::new() );
    assert_eq!( components[ "thing" ].artifact().path(), explicit.as_path() );

}

#[test]
fn manifest_name_outranks_bundle_symbolic_name() {

    let root = tempfile::tempdir().unwrap();

    let named = manifest_artifact( root.path(), "named", "Component-Name = alpha\n" );
    let signal = inspect( &named ).unwrap();
    assert_eq!(( signal.name(), signal.origin() ), ( "alpha", NameOrigin::Manifest ));

    let bundled = manifest_artifact( root.path(), "bundled", "Bundle-SymbolicName = beta;singleton:=true\n" );
    let signal = inspect( &bundled ).unwrap();
    assert_eq!(( signal.name(), signal.origin() ), ( "beta", NameOrigin::BundleSymbolicName ));

    let both = manifest_artifact(
        root.path(), "both",
        "Bundle-SymbolicName = gamma\nComponent-Name = delta\n",
    );
    assert_eq!( inspect( &both ).unwrap().name(), "delta" );

}

#[test]
fn finder_infers_common_namespace_prefix() {

    let root = tempfile::tempdir().unwrap();
    let artifact = artifact_dir( root.path(), "inferred-lib" );
    add_unit( &artifact, "com.example.core.entry", b"a" );
    add_unit( &artifact, "com.example.api.surface", b"b" );

    let signal = inspect( &artifact ).unwrap();
    assert_eq!( signal.name(), "com.example" );
    assert_eq!( signal.origin(), NameOrigin::Inferred );

}

#[test]
fn filename_guess_strips_version_and_extension() {

    let root = tempfile::tempdir().unwrap();
    let artifact = artifact_dir( root.path(), "mylib-3.0.1.pack" );

    let signal = inspect( &artifact ).unwrap();
    assert_eq!( signal.name(), "mylib" );
    assert_eq!( signal.origin(), NameOrigin::Guessed );

}

#[test]
fn malformed_descriptor_is_collected_not_fatal() {

    let root = tempfile::tempdir().unwrap();
    let broken = descriptor_artifact( root.path(), "broken", "{ not json" );
    let healthy = descriptor_artifact( root.path(), "healthy", &simple_descriptor( "ok", &[] ));

    let ( components, errors ) = resolve_components( vec![ broken, healthy ], &HashSet::new() );

    assert_eq!( errors.len(), 1 );
    assert!( components.contains_key( "ok" ));

}

#[test]
fn excluded_component_names_are_dropped() {

    let root = tempfile::tempdir().unwrap();
    let gson = descriptor_artifact( root.path(), "vendored", &simple_descriptor( "gson", &[] ));

    let ( components, errors ) = resolve_components( vec![ gson ], &HashSet::new() );

    assert!( errors.is_empty() );
    assert!( components.is_empty() );

}

#[test]
fn denied_artifact_paths_are_dropped() {

    let root = tempfile::tempdir().unwrap();
    let kept = descriptor_artifact( root.path(), "kept", &simple_descriptor( "kept", &[] ));
    let dropped = descriptor_artifact( root.path(), "dropped", &simple_descriptor( "dropped", &[] ));

    let denied: HashSet<_> = [ dropped.clone() ].into();
    let ( components, _ ) = resolve_components( vec![ kept, dropped ], &denied );

    assert!( components.contains_key( "kept" ));
    assert!( !components.contains_key( "dropped" ));

}

#[test]
fn unreadable_artifact_is_an_error_not_an_empty_identity() {

    let root = tempfile::tempdir().unwrap();
    let missing = root.path().join( "does-not-exist" );

    assert!( inspect( &missing ).is_err() );

}

include!( "test_utils/artifact_fixtures.rs" );
