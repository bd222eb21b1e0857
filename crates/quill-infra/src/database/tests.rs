#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Value};
    use uuid::Uuid;

    use quill_core::error::RepoError;
    use quill_core::ports::{CommentRepository, PostRepository};

    use crate::database::entity::{post, post_category};
    use crate::database::postgres::{PostgresCommentRepository, PostgresPostRepository};
    use crate::database::DatabaseConnections;

    fn post_model(title: &str, slug: &str, published: bool) -> post::Model {
        let now = Utc::now();
        post::Model {
            id: Uuid::new_v4(),
            title: title.to_owned(),
            slug: slug.to_owned(),
            content: "Content".to_owned(),
            excerpt: None,
            cover_image: None,
            published,
            author_name: "Anonymous".to_owned(),
            author_username: "anonymous".to_owned(),
            author_avatar: None,
            read_time: "1 min read".to_owned(),
            views: 0,
            likes: 0,
            comments_count: 0,
            created_at: now.into(),
            updated_at: now.into(),
            published_at: published.then(|| now.into()),
        }
    }

    #[tokio::test]
    async fn find_by_slug_shapes_post_with_categories() {
        let model = post_model("Test Post", "test-post", true);
        let post_id = model.id;

        // First query fetches the post row, second the category join.
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![model]])
            .append_query_results([Vec::<post_category::Model>::new()])
            .into_connection();

        let repo = PostgresPostRepository::new(db);

        let result = repo.find_by_slug("test-post").await.unwrap().unwrap();
        assert_eq!(result.post.id, post_id);
        assert_eq!(result.post.title, "Test Post");
        assert!(result.categories.is_empty());
    }

    #[tokio::test]
    async fn slug_exists_counts_colliding_rows() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![BTreeMap::from([(
                "num_items",
                Value::BigInt(Some(1)),
            )])]])
            .append_query_results([vec![BTreeMap::from([(
                "num_items",
                Value::BigInt(Some(0)),
            )])]])
            .into_connection();

        let repo = PostgresPostRepository::new(db);

        assert!(repo.slug_exists("taken", None).await.unwrap());
        assert!(!repo.slug_exists("free", None).await.unwrap());
    }

    #[tokio::test]
    async fn delete_missing_post_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let repo = PostgresPostRepository::new(db);

        let err = repo.delete(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, RepoError::NotFound));
    }

    #[tokio::test]
    async fn increment_views_touches_one_row() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        let repo = PostgresPostRepository::new(db);

        repo.increment_views(Uuid::new_v4()).await.unwrap();
    }

    #[tokio::test]
    async fn search_maps_rows_into_domain_posts() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![post_model("React Basics", "react-basics", true)]])
            .into_connection();

        let repo = PostgresPostRepository::new(db);

        let hits = repo.search("react", 10).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].slug, "react-basics");
    }

    #[test]
    fn like_wildcards_are_escaped() {
        use crate::database::postgres::escape_like;

        assert_eq!(escape_like("50% off"), "50\\% off");
        assert_eq!(escape_like("snake_case"), "snake\\_case");
        assert_eq!(escape_like("back\\slash"), "back\\\\slash");
        assert_eq!(escape_like("plain"), "plain");
    }

    #[tokio::test]
    async fn connections_close_shuts_down_the_pool() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let connections = DatabaseConnections { main: db };
        connections.close().await.unwrap();
    }

    #[tokio::test]
    async fn comment_like_on_missing_comment_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let repo = PostgresCommentRepository::new(db);

        let err = repo.increment_likes(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, RepoError::NotFound));
    }
}
