//! Integration tests across catalog, engagement, comments and context

#[cfg(test)]
mod tests {
    use crate::prelude::*;
    use crate::{CommentClient, CommentOrigin, DurableStore, TmdbClient};
    use std::sync::Arc;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn popular_body(page: u32) -> serde_json::Value {
        serde_json::json!({
            "page": page,
            "results": [
                {"id": 603, "title": "The Matrix", "vote_average": 8.2, "release_date": "1999-03-30",
                 "poster_path": "/matrix.jpg", "adult": false},
                {"id": 604, "title": "The Matrix Reloaded", "vote_average": 7.0, "release_date": "2003-05-15"}
            ],
            "total_pages": 47000,
            "total_results": 940000
        })
    }

    async fn catalog_server() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/3/movie/popular"))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(popular_body(1)))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/3/movie/0"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn test_popular_over_http_is_cached_and_normalized() {
        let server = catalog_server().await;
        let config = CatalogConfig::with_api_key("key").base_url(format!("{}/3", server.uri()));
        let catalog = Catalog::new(TmdbClient::new(&config).unwrap(), &config);

        let first = catalog.popular(1, Language::En).await;
        let second = catalog.popular(1, Language::En).await;

        let page = first.value().unwrap();
        assert_eq!(second.value().unwrap(), page);
        assert_eq!(page.total_pages, 500);
        assert_eq!(page.results[0].match_score, 82);
        assert_eq!(page.results[0].year, 1999);
        assert_eq!(page.results[0].poster_url, "https://image.tmdb.org/t/p/w500/matrix.jpg");
        assert_eq!(
            page.results[1].poster_url,
            "https://via.placeholder.com/500x750?text=No+Poster"
        );

        // The pager never offers more than ten pages
        let window = PaginationWindow::new(1, page.total_pages);
        assert_eq!(window.total(), 10);
    }

    #[tokio::test]
    async fn test_missing_detail_over_http() {
        let server = catalog_server().await;
        let config = CatalogConfig::with_api_key("key").base_url(format!("{}/3", server.uri()));
        let catalog = Catalog::new(TmdbClient::new(&config).unwrap(), &config);

        let state = catalog.detail("0", Language::En).await;
        assert_eq!(state.status, FetchStatus::Error);
        assert!(state.is_not_found());

        // Keep the popular expectation satisfied
        catalog.popular(1, Language::En).await;
    }

    #[tokio::test]
    async fn test_comment_feed_over_http() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/comments"))
            .and(query_param("limit", "5"))
            .and(query_param("skip", "15"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "comments": [
                    {"id": 16, "body": "Loved it", "postId": 3, "likes": 1,
                     "user": {"id": 1, "username": "emilys", "fullName": "Emily Johnson"}},
                    {"id": 17, "body": "Meh", "postId": 3, "likes": 0,
                     "user": {"id": 2, "username": "michaelw", "fullName": "Michael Williams"}},
                    {"id": 18, "body": "Classic", "postId": 3, "likes": 5,
                     "user": {"id": 3, "username": "sophiab", "fullName": "Sophia Brown"}}
                ],
                "total": 340,
                "skip": 15,
                "limit": 5
            })))
            .expect(1)
            .mount(&server)
            .await;

        let store = TypedStore::new(MemoryStore::new());
        let context = Arc::new(AppContext::hydrate(store));
        context.login("morpheus", "morpheus@zion.io").unwrap();

        let config = CommentConfig {
            base_url: format!("{}/comments", server.uri()),
            ..Default::default()
        };
        let comments =
            CommentAggregator::new(context.clone(), CommentClient::new(&config).unwrap(), &config);

        comments.post("603", "What is real?").unwrap();
        comments.post("603", "Free your mind").unwrap();

        let feed = comments.feed("603").await.unwrap();
        assert_eq!(feed.len(), 5);
        assert_eq!(feed[0].origin, CommentOrigin::Local);
        assert!(feed[0].created_at >= feed[1].created_at);
        assert_eq!(feed[2].id, "api-16");
        assert_eq!(feed[2].username, "emilys");

        // Cached for the hour
        assert_eq!(comments.feed("603").await.unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_state_survives_reload_with_file_store() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("marquee.json");

        let liked = {
            let store = TypedStore::new(FileStore::open(&file).unwrap());
            let context = AppContext::hydrate(store.clone());
            context.login("trinity", "trinity@zion.io").unwrap();
            context.set_language(Language::Es).unwrap();

            let engagement = EngagementStore::with_seed(store, 3);
            engagement.mount("603").record_view().unwrap();
            engagement.toggle_like("603").unwrap()
        };

        let store = TypedStore::new(FileStore::open(&file).unwrap());
        let context = AppContext::hydrate(store.clone());
        assert_eq!(context.session().unwrap().username, "trinity");
        assert_eq!(context.language(), Language::Es);

        let engagement = EngagementStore::new(store.clone());
        assert_eq!(engagement.get("603").unwrap(), Some(liked));
        assert_eq!(liked.reaction, Reaction::Liked);

        // A fresh visit counts one more view
        let visit = engagement.mount("603").record_view().unwrap();
        assert_eq!(visit.views, liked.views + 1);

        assert!(store.raw().keys().unwrap().iter().all(|k| k.starts_with("marquee_")));
    }

    #[test]
    fn test_browse_flow() {
        let mut browse = BrowseState::new();
        browse.change_page(3, 500);
        browse.change_query("matrix");
        assert_eq!(browse.page(), 1);

        browse.change_page(12, 500);
        let window = browse.window(500);
        assert_eq!(window.current(), 10);
        assert!(!window.has_next());
    }
}
