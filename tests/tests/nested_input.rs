//! Nested input shape checks and pass-through operations.

use bastion_tests::prelude::*;
use pretty_assertions::assert_eq;

fn alice() -> Identity {
    Identity::new("alice")
}

mod shape {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_to_one_rejects_several_ops() {
        init_tracing();
        let blog = blog().unwrap();
        let store = MemoryStore::new().seed("User", record! { "id" => "alice", "name" => "Alice" });
        let pipeline = MutationPipeline::new(&blog.registry, &store, PipelineConfig::default());
        let author = RelationInput::connect(Key::id("alice"))
            .and(NestedOp::Create(data! { "name" => "Ann" }));

        let result = pipeline.mutate(
            "Post",
            MutationRequest::create(data! { "title" => "A", "author" => author }),
            Some(&alice()),
        );

        assert!(matches!(
            result,
            Err(MutationError::InvalidNestedInput { ref path, .. }) if path == "author"
        ));
        assert_eq!(store.fetch_count(), 0);
    }

    #[test]
    fn test_set_requires_to_many() {
        init_tracing();
        let blog = blog().unwrap();
        let store = MemoryStore::new();
        let pipeline = MutationPipeline::new(&blog.registry, &store, PipelineConfig::default());

        let result = pipeline.mutate(
            "Post",
            MutationRequest::create(data! {
                "title" => "A",
                "author" => RelationInput::set(vec![Key::id("alice")]),
            }),
            Some(&alice()),
        );

        assert!(matches!(
            result,
            Err(MutationError::InvalidNestedInput { ref path, .. }) if path == "author.set"
        ));
    }
}

mod pass_through {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_unprocessed_ops_reach_the_store_as_given() {
        // GIVEN
        init_tracing();
        let blog = blog().unwrap();
        let store = MemoryStore::new().seed(
            "Post",
            record! { "id" => "p1", "title" => "A", "authorId" => "alice" },
        );
        let pipeline = MutationPipeline::new(&blog.registry, &store, PipelineConfig::default());
        let tags = RelationInput::new(vec![
            NestedOp::Disconnect(Key::id("t1")),
            NestedOp::Delete(Key::id("t2")),
            NestedOp::DeleteMany(Filter::eq("name", "old")),
            NestedOp::Set(vec![Key::id("t3")]),
            NestedOp::UpdateMany {
                filter: Filter::eq("name", "new"),
                data: data! { "name" => "Not A Slug" },
            },
        ]);
        let request = MutationRequest::update(Key::id("p1"), data! { "tags" => tags.clone() });

        // WHEN
        let result = pipeline.mutate("Post", request, Some(&alice()));

        // THEN
        assert!(result.unwrap().is_some());
        // Only the root record was fetched.
        assert_eq!(store.fetch_count(), 1);
        let persisted = store.last_persisted().unwrap();
        assert_eq!(
            persisted.data().and_then(|d| d.get("tags")),
            Some(&Input::Relation(tags))
        );
    }

    #[test]
    fn test_relation_input_on_scalar_field_passes_through() {
        init_tracing();
        let blog = blog().unwrap();
        let store = MemoryStore::new();
        let pipeline = MutationPipeline::new(&blog.registry, &store, PipelineConfig::default());
        let body = RelationInput::connect(Key::id("x"));

        pipeline
            .mutate(
                "Post",
                MutationRequest::create(data! { "title" => "A", "body" => body.clone() }),
                Some(&alice()),
            )
            .unwrap();

        let persisted = store.last_persisted().unwrap();
        assert_eq!(
            persisted.data().and_then(|d| d.get("body")),
            Some(&Input::Relation(body))
        );
        assert_eq!(store.fetch_count(), 0);
    }
}

mod nested_update {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_update_in_place_is_hooked_and_filtered() {
        // GIVEN
        init_tracing();
        let blog = blog().unwrap();
        let store = MemoryStore::new()
            .seed("User", record! { "id" => "alice", "name" => "Alice" })
            .seed("Post", record! { "id" => "p1", "title" => "A", "authorId" => "alice" });
        let pipeline = MutationPipeline::new(&blog.registry, &store, PipelineConfig::default());
        let request = MutationRequest::update(
            Key::id("alice"),
            data! {
                "posts" => RelationInput::update(
                    Key::id("p1"),
                    data! { "title" => "  Renamed  ", "pinned" => true },
                ),
            },
        );

        // WHEN
        pipeline
            .mutate("User", request, Some(&alice()))
            .unwrap()
            .unwrap();

        // THEN
        let persisted = store.last_persisted().unwrap();
        let ops = &persisted
            .data()
            .and_then(|d| d.get("posts"))
            .and_then(Input::as_relation)
            .unwrap()
            .ops;
        assert_eq!(
            ops,
            &vec![NestedOp::Update {
                key: Key::id("p1"),
                data: data! { "title" => "Renamed" },
            }]
        );
        assert_eq!(
            blog.audit.events(),
            vec![
                "before Post update",
                "before User update",
                "after Post update item=false",
                "after User update item=true",
            ]
        );
    }
}
