//! `tracing` spans for object map construction.
//!
//! Only compiled with the `tracing` feature. Spans are created at `debug`
//! level so they cost nothing unless a subscriber enables them.

use crate::relation::introspect::MetadataApi;
use tracing::Span;

/// Span covering one top-level object map build
pub fn build_object_map_span(serializer: &str, api: MetadataApi) -> Span {
    tracing::debug_span!(
        "objectmap.build",
        serializer = serializer,
        metadata_api = %api,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_can_be_entered_without_subscriber() {
        let span = build_object_map_span("UserSerializer", MetadataApi::Modern);
        let _guard = span.entered();
    }
}
