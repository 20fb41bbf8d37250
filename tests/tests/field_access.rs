//! Field-level access: write filtering, output redaction and the query-side
//! filter.

use bastion_tests::prelude::*;
use pretty_assertions::assert_eq;

fn seeded_post() -> MemoryStore {
    MemoryStore::new().seed(
        "Post",
        record! {
            "id" => "p1",
            "title" => "Draft",
            "status" => "draft",
            "authorId" => "alice",
            "secretNote" => "alice only",
        },
    )
}

mod write_filtering {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_create_denied_field_is_never_stored() {
        // GIVEN
        init_tracing();
        let blog = blog().unwrap();
        let store = MemoryStore::new();
        let pipeline = MutationPipeline::new(&blog.registry, &store, PipelineConfig::default());
        let request = MutationRequest::create(data! {
            "title" => "  Hello  ",
            "body" => "text",
            "pinned" => true,
        });

        // WHEN
        let record = pipeline
            .mutate("Post", request, Some(&Identity::new("alice")))
            .unwrap()
            .unwrap();

        // THEN
        let stored = store.find("Post", &Key::id(record["id"].clone())).unwrap();
        assert!(!stored.contains_key("pinned"));
        assert_eq!(stored.get("title"), Some(&Value::from("Hello")));
        assert_eq!(stored.get("body"), Some(&Value::from("text")));
        assert_eq!(stored.get("status"), Some(&Value::from("draft")));
        assert_eq!(stored.get("authorId"), Some(&Value::from("alice")));
    }

    #[test]
    fn test_non_author_cannot_change_secret_note() {
        // GIVEN
        init_tracing();
        let blog = blog().unwrap();
        let store = seeded_post();
        let pipeline = MutationPipeline::new(&blog.registry, &store, PipelineConfig::default());
        let request = MutationRequest::update(
            Key::id("p1"),
            data! { "title" => "Edited", "secretNote" => "bob was here" },
        );

        // WHEN
        let record = pipeline
            .mutate("Post", request, Some(&Identity::new("bob")))
            .unwrap()
            .unwrap();

        // THEN
        let stored = store.find("Post", &Key::id("p1")).unwrap();
        assert_eq!(stored.get("secretNote"), Some(&Value::from("alice only")));
        assert_eq!(stored.get("title"), Some(&Value::from("Edited")));
        assert!(!record.contains_key("secretNote"));
    }

    #[test]
    fn test_author_can_change_secret_note() {
        init_tracing();
        let blog = blog().unwrap();
        let store = seeded_post();
        let pipeline = MutationPipeline::new(&blog.registry, &store, PipelineConfig::default());
        let request = MutationRequest::update(Key::id("p1"), data! { "secretNote" => "updated" });

        let record = pipeline
            .mutate("Post", request, Some(&Identity::new("alice")))
            .unwrap()
            .unwrap();

        assert_eq!(record.get("secretNote"), Some(&Value::from("updated")));
    }
}

mod redaction {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_redaction_can_be_disabled() {
        init_tracing();
        let blog = blog().unwrap();
        let store = seeded_post();
        let config = PipelineConfig::default().with_redaction(false);
        let pipeline = MutationPipeline::new(&blog.registry, &store, config);

        let record = pipeline
            .mutate(
                "Post",
                MutationRequest::update(Key::id("p1"), data! { "title" => "Edited" }),
                Some(&Identity::new("bob")),
            )
            .unwrap()
            .unwrap();

        assert_eq!(record.get("secretNote"), Some(&Value::from("alice only")));
    }
}

mod query_side {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_query_filter_for_read_side_callers() {
        let blog = blog().unwrap();
        let store = MemoryStore::new();
        let pipeline = MutationPipeline::new(&blog.registry, &store, PipelineConfig::default());

        let post = blog.registry.lookup_entity("Post").unwrap();
        let user = blog.registry.lookup_entity("User").unwrap();

        assert_eq!(
            pipeline.access().query_filter(post, None).unwrap(),
            QueryAccess::Filtered(Filter::eq("status", "published"))
        );
        assert_eq!(
            pipeline.access().query_filter(user, None).unwrap(),
            QueryAccess::Unrestricted
        );
    }
}
