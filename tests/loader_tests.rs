use std::sync::atomic::{ AtomicUsize, Ordering };
use std::sync::Arc ;

use layer_link::{
    build_layer, ContentRewriter, RewriteError, RewriteKind,
    TransformOutcome, TransformPipeline,
};

struct CountingRewriter {
    calls: AtomicUsize,
}

impl ContentRewriter for CountingRewriter {
    fn name( &self ) -> &str { "counting" }
    fn rewrite( &self, _unit_name: &str, _bytes: &[u8] ) -> Result<TransformOutcome, RewriteError> {
        self.calls.fetch_add( 1, Ordering::SeqCst );
        Ok( TransformOutcome::none() )
    }
}

struct FullRewriter ;

impl ContentRewriter for FullRewriter {
    fn name( &self ) -> &str { "full" }
    fn rewrite( &self, _unit_name: &str, _bytes: &[u8] ) -> Result<TransformOutcome, RewriteError> {
        Ok( TransformOutcome::full( b"rewritten".to_vec() ))
    }
}

#[test]
fn materialize_is_idempotent() {

    let root = tempfile::tempdir().unwrap();
    let artifact = descriptor_artifact( root.path(), "app", &simple_descriptor( "app", &[] ));
    add_unit( &artifact, "app.core.entry", b"original" );

    let layer = build_layer(
        "boot", resolve_dir( root.path() ), &[], None,
        Arc::new( TransformPipeline::new() ),
    ).unwrap();

    let first = layer.materialize( "app.core.entry" ).unwrap().unwrap();
    let second = layer.materialize( "app.core.entry" ).unwrap().unwrap();

    assert!( Arc::ptr_eq( &first, &second ));
    assert_eq!( first.bytes(), b"original" );
    assert_eq!( first.component(), "app" );

}

#[test]
fn concurrent_first_requests_define_exactly_once() {

    let root = tempfile::tempdir().unwrap();
    let artifact = descriptor_artifact( root.path(), "app", &simple_descriptor( "app", &[] ));
    add_unit( &artifact, "app.core.entry", b"original" );

    let pipeline = Arc::new( TransformPipeline::new() );
    let counter = Arc::new( CountingRewriter { calls: AtomicUsize::new( 0 )});
    pipeline.register( Arc::clone( &counter ) as Arc<dyn ContentRewriter> );

    let layer = build_layer( "boot", resolve_dir( root.path() ), &[], None, pipeline ).unwrap();

    let units: Vec<_> = std::thread::scope(| scope | {
        ( 0..8 )
            .map(| _ | scope.spawn(|| layer.materialize( "app.core.entry" ).unwrap().unwrap() ))
            .collect::<Vec<_>>()
            .into_iter()
            .map(| handle | handle.join().unwrap() )
            .collect()
    });

    for unit in &units {
        assert!( Arc::ptr_eq( unit, &units[ 0 ]));
    }
    // One pipeline execution in total, no matter how many first requests raced.
    assert_eq!( counter.calls.load( Ordering::SeqCst ), 1 );

}

#[test]
fn child_layer_delegates_to_parent_readonly() {

    let parent_root = tempfile::tempdir().unwrap();
    let library = descriptor_artifact( parent_root.path(), "library", &simple_descriptor( "library", &[] ));
    add_unit( &library, "lib.core.entry", b"from-parent" );
    let parent = build_layer(
        "libraries", resolve_dir( parent_root.path() ), &[], None,
        Arc::new( TransformPipeline::new() ),
    ).unwrap();

    let child = build_layer(
        "plugins", std::collections::HashMap::new(), &[], Some( Arc::clone( &parent )),
        Arc::new( TransformPipeline::new() ),
    ).unwrap();

    let via_child = child.materialize( "lib.core.entry" ).unwrap().unwrap();
    let via_parent = parent.materialize( "lib.core.entry" ).unwrap().unwrap();

    // The unit is defined once, in the parent's context.
    assert!( Arc::ptr_eq( &via_child, &via_parent ));

}

#[test]
fn unowned_namespace_is_a_lookup_miss() {

    let root = tempfile::tempdir().unwrap();
    descriptor_artifact( root.path(), "app", &simple_descriptor( "app", &[] ));

    let layer = build_layer(
        "boot", resolve_dir( root.path() ), &[], None,
        Arc::new( TransformPipeline::new() ),
    ).unwrap();

    assert!( layer.materialize( "no.such.unit" ).unwrap().is_none() );
    assert!( layer.materialize( "dotless" ).unwrap().is_none() );
    assert!( layer.resource( "no.such.resource" ).unwrap().is_none() );

}

#[test]
fn resources_are_never_transformed() {

    let root = tempfile::tempdir().unwrap();
    let artifact = descriptor_artifact( root.path(), "app", &simple_descriptor( "app", &[] ));
    add_unit( &artifact, "app.core.entry", b"original" );
    add_resource( &artifact, "app.core.settings", b"plain" );

    let pipeline = Arc::new( TransformPipeline::new() );
    pipeline.register( Arc::new( FullRewriter ));

    let layer = build_layer( "boot", resolve_dir( root.path() ), &[], None, pipeline ).unwrap();

    let unit = layer.materialize( "app.core.entry" ).unwrap().unwrap();
    assert_eq!( unit.bytes(), b"rewritten" );
    assert_eq!( unit.rewrite(), RewriteKind::Full );

    let resource = layer.resource( "app.core.settings" ).unwrap().unwrap();
    assert_eq!( resource, b"plain" );

}

#[test]
fn visibility_edges_serve_resources_but_never_code() {

    let root = tempfile::tempdir().unwrap();

    // `app` owns the shared.data namespace but lacks the entry itself.
    let app = descriptor_artifact( root.path(), "app", &simple_descriptor( "app", &[] ));
    add_unit( &app, "shared.data.placeholder", b"x" );

    // `donor` opens shared.data to `app` and carries the actual entries.
    let donor = descriptor_artifact(
        root.path(), "donor",
        r#"{
            "name": "donor",
            "opens": [{ "namespace": "shared.data", "to": [ "app" ] }]
        }"#,
    );
    add_resource( &donor, "shared.data.settings", b"from-donor" );
    add_unit( &donor, "shared.data.settings", b"donor-unit" );

    let layer = build_layer(
        "boot", resolve_dir( root.path() ), &[], None,
        Arc::new( TransformPipeline::new() ),
    ).unwrap();

    let resource = layer.resource( "shared.data.settings" ).unwrap();
    assert_eq!( resource.as_deref(), Some( b"from-donor".as_slice() ));

    // Code materialization never follows visibility edges.
    assert!( layer.materialize( "shared.data.settings" ).unwrap().is_none() );

}

include!( "test_utils/artifact_fixtures.rs" );
