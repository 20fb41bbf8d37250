//! Depth safety: nesting beyond the configured bound terminates and the
//! excess subtree reaches the store without access checks or hooks.

use bastion_tests::prelude::*;
use pretty_assertions::assert_eq;

fn labels(range: std::ops::RangeInclusive<usize>) -> Vec<String> {
    range.map(|level| level.to_string()).collect()
}

/// A chain of `levels` nested creates whose innermost node carries `tail`.
fn chain_with_tail(levels: usize, tail: NestedOp) -> Data {
    let mut node = data! {
        "label" => levels.to_string(),
        "child" => RelationInput::new(vec![tail]),
    };
    for level in (0..levels).rev() {
        node = data! {
            "label" => level.to_string(),
            "child" => RelationInput::create(node),
        };
    }
    node
}

/// Number of nested creates below the root of a persisted payload.
fn nesting_of(data: &Data) -> usize {
    match data.get("child").and_then(Input::as_relation).map(|r| r.ops.as_slice()) {
        Some([NestedOp::Create(child)]) => 1 + nesting_of(child),
        _ => 0,
    }
}

mod bound {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_sixth_level_passes_through_unchecked() {
        // GIVEN
        init_tracing();
        let chain = chain().unwrap();
        let store = MemoryStore::new();
        let pipeline = MutationPipeline::new(&chain.registry, &store, PipelineConfig::default());

        // WHEN
        let result = pipeline.mutate("Node", MutationRequest::create(nested_chain(6)), None);

        // THEN
        assert!(result.unwrap().is_some());
        assert_eq!(chain.access_calls.events(), labels(0..=5));
        assert_eq!(chain.hook_calls.events(), labels(0..=5));

        let persisted = store.last_persisted().unwrap();
        assert_eq!(nesting_of(persisted.data().unwrap()), 6);
    }

    #[test]
    fn test_adversarially_deep_payload_terminates() {
        init_tracing();
        let chain = chain().unwrap();
        let store = MemoryStore::new();
        let pipeline = MutationPipeline::new(&chain.registry, &store, PipelineConfig::default());

        pipeline
            .mutate("Node", MutationRequest::create(nested_chain(200)), None)
            .unwrap();

        assert_eq!(chain.access_calls.events().len(), 6);
        assert_eq!(store.persist_count(), 1);
    }

    #[test]
    fn test_configured_bound() {
        init_tracing();
        let chain = chain().unwrap();
        let store = MemoryStore::new();
        let config = PipelineConfig::from_toml_str("max_depth = 2").unwrap();
        let pipeline = MutationPipeline::new(&chain.registry, &store, config);

        pipeline
            .mutate("Node", MutationRequest::create(nested_chain(4)), None)
            .unwrap();

        assert_eq!(chain.access_calls.events(), labels(0..=2));
    }
}

mod fetches {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_connect_beyond_bound_is_not_fetched() {
        init_tracing();
        let chain = chain().unwrap();
        let store = MemoryStore::new();
        let pipeline = MutationPipeline::new(&chain.registry, &store, PipelineConfig::default());

        let request = MutationRequest::create(chain_with_tail(5, NestedOp::Connect(Key::id("ghost"))));
        let result = pipeline.mutate("Node", request, None);

        assert!(result.unwrap().is_some());
        assert_eq!(store.fetch_count(), 0);
    }

    #[test]
    fn test_connect_at_bound_is_fetched() {
        init_tracing();
        let chain = chain().unwrap();
        let store = MemoryStore::new();
        let pipeline = MutationPipeline::new(&chain.registry, &store, PipelineConfig::default());

        let request = MutationRequest::create(chain_with_tail(4, NestedOp::Connect(Key::id("ghost"))));
        let result = pipeline.mutate("Node", request, None);

        assert!(matches!(
            result,
            Err(MutationError::NotFound { ref entity, .. }) if entity == "Node"
        ));
        assert_eq!(store.fetch_count(), 1);
        assert_eq!(store.persist_count(), 0);
    }
}
