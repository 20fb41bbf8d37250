//! Root-level access: denials and missing records are indistinguishable and
//! silent.

use bastion_registry::{FieldSchema, RegistryBuilder, ScalarKind};
use bastion_tests::prelude::*;
use pretty_assertions::assert_eq;

fn store() -> MemoryStore {
    MemoryStore::new()
        .seed("User", record! { "id" => "alice", "name" => "Alice" })
        .seed("Post", record! { "id" => "p1", "title" => "A", "authorId" => "alice" })
}

mod silent_denial {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_anonymous_create_returns_nothing() {
        init_tracing();
        let blog = blog().unwrap();
        let store = store();
        let pipeline = MutationPipeline::new(&blog.registry, &store, PipelineConfig::default());

        let result = pipeline
            .mutate("Post", MutationRequest::create(data! { "title" => "A" }), None)
            .unwrap();

        assert_eq!(result, None);
        assert_eq!(store.persist_count(), 0);
        assert!(blog.audit.events().is_empty());
    }

    #[test]
    fn test_denied_and_missing_look_the_same() {
        init_tracing();
        let blog = blog().unwrap();
        let store = store();
        let pipeline = MutationPipeline::new(&blog.registry, &store, PipelineConfig::default());
        let bob = Identity::new("bob");

        let denied = pipeline
            .mutate(
                "User",
                MutationRequest::update(Key::id("alice"), data! { "name" => "Mallory" }),
                Some(&bob),
            )
            .unwrap();
        let missing = pipeline
            .mutate(
                "User",
                MutationRequest::update(Key::id("ghost"), data! { "name" => "Mallory" }),
                Some(&bob),
            )
            .unwrap();

        assert_eq!(denied, missing);
        assert_eq!(denied, None);
        assert_eq!(
            store.find("User", &Key::id("alice")).and_then(|r| r.get("name").cloned()),
            Some(Value::from("Alice"))
        );
    }

    #[test]
    fn test_delete_by_filter() {
        init_tracing();
        let blog = blog().unwrap();
        let store = store();
        let pipeline = MutationPipeline::new(&blog.registry, &store, PipelineConfig::default());

        let by_other = pipeline
            .mutate("Post", MutationRequest::delete(Key::id("p1")), Some(&Identity::new("bob")))
            .unwrap();
        assert_eq!(by_other, None);
        assert_eq!(store.records("Post").len(), 1);

        let by_author = pipeline
            .mutate("Post", MutationRequest::delete(Key::id("p1")), Some(&Identity::new("alice")))
            .unwrap();
        assert_eq!(
            by_author.and_then(|r| r.get("id").cloned()),
            Some(Value::from("p1"))
        );
        assert!(store.records("Post").is_empty());
        assert_eq!(
            blog.audit.events(),
            vec!["before Post delete", "after Post delete item=true"]
        );
    }
}

mod unset_rules {
    use super::*;
    use pretty_assertions::assert_eq;

    fn notes() -> bastion_registry::Registry {
        let mut builder = RegistryBuilder::new();
        builder
            .add_entity("Note")
            .field(FieldSchema::new("text", ScalarKind::String))
            .done()
            .unwrap();
        builder.build().unwrap()
    }

    #[test]
    fn test_unset_rule_allows_by_default() {
        init_tracing();
        let registry = notes();
        let store = MemoryStore::new();
        let pipeline = MutationPipeline::new(&registry, &store, PipelineConfig::default());

        let result = pipeline
            .mutate("Note", MutationRequest::create(data! { "text" => "hi" }), None)
            .unwrap();

        assert!(result.is_some());
    }

    #[test]
    fn test_explicit_access_denies_unset_rules() {
        init_tracing();
        let registry = notes();
        let store = MemoryStore::new();
        let config = PipelineConfig::from_toml_str("require_explicit_access = true").unwrap();
        let pipeline = MutationPipeline::new(&registry, &store, config);

        let result = pipeline
            .mutate("Note", MutationRequest::create(data! { "text" => "hi" }), None)
            .unwrap();

        assert_eq!(result, None);
        assert_eq!(store.persist_count(), 0);
    }
}
