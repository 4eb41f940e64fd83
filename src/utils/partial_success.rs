/// The outcome of an operation that completed overall while some of its parts
/// failed. The `Vec<E>` holds the per-part failures that were recovered from;
/// callers decide whether to log them or escalate.
pub type PartialSuccess<T, E> = ( T, Vec<E> );
