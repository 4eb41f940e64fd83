use crate::transform::RewriteKind ;

/// One materialized piece of loadable content: the unit's bytes as they
/// stand after the transformation pipeline ran, frozen for the lifetime of
/// the owning layer.
#[derive( Debug )]
pub struct CodeUnit {
    qualified_name: String,
    component: String,
    rewrite: RewriteKind,
    bytes: Vec<u8>,
}

impl CodeUnit {

    pub(crate) fn new(
        qualified_name: &str,
        component: &str,
        rewrite: RewriteKind,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            qualified_name: qualified_name.to_string(),
            component: component.to_string(),
            rewrite,
            bytes,
        }
    }

    /// Fully qualified unit name, e.g. `com.example.core.entry`.
    #[inline] pub fn qualified_name( &self ) -> &str { &self.qualified_name }

    /// Name of the component the unit was defined from.
    #[inline] pub fn component( &self ) -> &str { &self.component }

    /// How the pipeline shaped these bytes.
    #[inline] pub fn rewrite( &self ) -> RewriteKind { self.rewrite }

    /// The loadable content.
    #[inline] pub fn bytes( &self ) -> &[u8] { &self.bytes }

}
