/// Collects an iterator of `Result`s into separate success and failure lists,
/// preserving encounter order within each list.
#[derive( Debug )]
pub struct ResultList<S, E> {
    successful: Vec<S>,
    failed: Vec<E>,
}

impl<S, E> ResultList<S, E> {

    pub fn new() -> Self {
        Self { successful: Vec::new(), failed: Vec::new() }
    }

    /// The values that succeeded, in encounter order.
    #[inline] pub fn successful( &self ) -> &[S] { &self.successful }

    /// The failures that were collected, in encounter order.
    #[inline] pub fn failed( &self ) -> &[E] { &self.failed }

    /// Takes both lists out by value.
    #[inline] pub fn deconstruct( self ) -> ( Vec<S>, Vec<E> ) {( self.successful, self.failed )}

}

impl<S, E> Default for ResultList<S, E> {
    fn default() -> Self { Self::new() }
}

impl<S, E> FromIterator<Result<S, E>> for ResultList<S, E> {
    fn from_iter<T: IntoIterator<Item = Result<S, E>>>( iter: T ) -> Self {
        iter.into_iter().fold( ResultList::new(), | mut acc, item | {
            match item {
                Ok( success ) => acc.successful.push( success ),
                Err( failure ) => acc.failed.push( failure ),
            }
            acc
        })
    }
}
