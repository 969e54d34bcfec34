use super::*;
use crate::session::UserId;
use crate::test_support::{FakeBackend, Harness};

// =============================================================================
// auth
// =============================================================================

#[tokio::test]
async fn auth_login_returns_token_without_touching_session() {
    let backend = FakeBackend::spawn().await;
    let h = Harness::new(&backend.base_url);

    let resp = AuthApi::new(&h.gateway).login("a@b.com", "x").await.unwrap();

    assert_eq!(resp.token, "t1");
    assert_eq!(resp.user.email.as_deref(), Some("a@b.com"));
    assert!(!h.session.is_authenticated());
}

#[tokio::test]
async fn auth_register_returns_confirmation_text() {
    let backend = FakeBackend::spawn().await;
    let h = Harness::new(&backend.base_url);

    let text = AuthApi::new(&h.gateway).register("new@b.com", "pw").await.unwrap();

    assert_eq!(text, "User registered successfully");
    let sent: serde_json::Value = serde_json::from_str(&backend.last().body).unwrap();
    assert_eq!(sent["email"], "new@b.com");
}

#[tokio::test]
async fn auth_current_user_needs_token() {
    let backend = FakeBackend::spawn().await;
    let h = Harness::logged_in(&backend.base_url, "t1");

    let user = AuthApi::new(&h.gateway).current_user().await.unwrap();
    assert_eq!(user.id, UserId::Number(1));
}

#[tokio::test]
async fn auth_forgot_password_sends_plain_text_email() {
    let backend = FakeBackend::spawn().await;
    let h = Harness::new(&backend.base_url);

    let msg = AuthApi::new(&h.gateway).forgot_password("a@b.com").await.unwrap();

    assert!(msg.contains("reset link"));
    let req = backend.last();
    assert_eq!(req.body, "a@b.com");
    assert_eq!(req.content_type.as_deref(), Some("text/plain"));
}

#[tokio::test]
async fn auth_reset_password_uses_camel_case_body() {
    let backend = FakeBackend::spawn().await;
    let h = Harness::new(&backend.base_url);

    AuthApi::new(&h.gateway).reset_password("rt", "s3cret").await.unwrap();

    let sent: serde_json::Value = serde_json::from_str(&backend.last().body).unwrap();
    assert_eq!(sent, serde_json::json!({"token": "rt", "newPassword": "s3cret"}));
}

// =============================================================================
// movies
// =============================================================================

#[tokio::test]
async fn movies_list_decodes_camel_case_fields() {
    let backend = FakeBackend::spawn().await;
    let h = Harness::new(&backend.base_url);

    let movies = MoviesApi::new(&h.gateway).list().await.unwrap();

    assert_eq!(movies.len(), 2);
    assert_eq!(movies[0].poster_url.as_deref(), Some("https://img.example.test/poster.jpg"));
    assert_eq!(movies[0].average_rating, Some(4.5));
}

#[tokio::test]
async fn movies_search_encodes_query() {
    let backend = FakeBackend::spawn().await;
    let h = Harness::new(&backend.base_url);

    MoviesApi::new(&h.gateway).search("the thing").await.unwrap();

    let req = backend.last();
    assert_eq!(req.path, "/api/movies/search");
    assert_eq!(req.query.as_deref(), Some("query=the+thing"));
}

#[tokio::test]
async fn movies_recommendations_optional_user_id() {
    let backend = FakeBackend::spawn().await;
    let h = Harness::logged_in(&backend.base_url, "t1");
    let movies = MoviesApi::new(&h.gateway);

    movies.recommendations(None).await.unwrap();
    assert_eq!(backend.last().query, None);

    movies.recommendations(Some(7)).await.unwrap();
    assert_eq!(backend.last().query.as_deref(), Some("userId=7"));
}

#[tokio::test]
async fn movies_by_genre_and_rankings_hit_expected_paths() {
    let backend = FakeBackend::spawn().await;
    let h = Harness::new(&backend.base_url);
    let movies = MoviesApi::new(&h.gateway);

    movies.by_genre("Drama").await.unwrap();
    movies.top_rated().await.unwrap();
    movies.trending().await.unwrap();

    let paths: Vec<String> = backend.requests().into_iter().map(|r| r.path).collect();
    assert_eq!(paths, ["/api/movies/category/Drama", "/api/movies/top-rated", "/api/movies/trending"]);
}

#[tokio::test]
async fn movies_by_genre_keeps_reserved_characters_in_one_segment() {
    let backend = FakeBackend::spawn().await;
    let h = Harness::new(&backend.base_url);

    let movies = MoviesApi::new(&h.gateway).by_genre("Sci/Fi?x#y").await.unwrap();

    assert!(!movies.is_empty());
    let recorded = backend.last();
    assert_eq!(recorded.path, "/api/movies/category/Sci%2FFi%3Fx%23y");
    assert_eq!(recorded.query, None);
}

#[tokio::test]
async fn movies_create_and_update_send_input() {
    let backend = FakeBackend::spawn().await;
    let h = Harness::logged_in(&backend.base_url, "admin-token");
    let input = MovieInput {
        title: "Heat".into(),
        genre: "Crime".into(),
        release_date: Some("1995-12-15".into()),
        ..MovieInput::default()
    };

    let created = MoviesApi::new(&h.gateway).create(&input).await.unwrap();
    assert_eq!(created.id, 42);
    assert_eq!(created.title, "Heat");

    let sent: serde_json::Value = serde_json::from_str(&backend.last().body).unwrap();
    assert_eq!(sent, serde_json::json!({"title": "Heat", "genre": "Crime", "releaseDate": "1995-12-15"}));

    MoviesApi::new(&h.gateway).update(42, &input).await.unwrap();
    let req = backend.last();
    assert_eq!((req.method.as_str(), req.path.as_str()), ("PUT", "/api/movies/42"));
}

#[tokio::test]
async fn movies_get_missing_is_404_without_logout() {
    let backend = FakeBackend::spawn().await;
    let h = Harness::logged_in(&backend.base_url, "t1");

    let err = MoviesApi::new(&h.gateway).get(404).await.unwrap_err();

    assert_eq!(err.status(), Some(404));
    assert!(h.session.is_authenticated());
}

#[tokio::test]
async fn movies_delete_forbidden_tears_down_session() {
    let backend = FakeBackend::spawn().await;
    let h = Harness::new(&backend.base_url);

    let err = MoviesApi::new(&h.gateway).delete(3).await.unwrap_err();

    assert!(err.is_auth_failure());
    assert_eq!(h.navigator.generation(), 1);
}

// =============================================================================
// reviews / comments / likes
// =============================================================================

#[tokio::test]
async fn reviews_for_movie_decodes_nested_comments() {
    let backend = FakeBackend::spawn().await;
    let h = Harness::new(&backend.base_url);

    let reviews = ReviewsApi::new(&h.gateway).for_movie(7).await.unwrap();

    assert_eq!(reviews.len(), 1);
    assert_eq!(reviews[0].rating, 4);
    assert_eq!(reviews[0].user_email.as_deref(), Some("a@b.com"));
    assert_eq!(reviews[0].comments[0].content, "Agreed");
    assert_eq!(backend.last().path, "/api/reviews/movie/7");
}

#[tokio::test]
async fn reviews_add_posts_to_movie() {
    let backend = FakeBackend::spawn().await;
    let h = Harness::logged_in(&backend.base_url, "t1");

    let review = ReviewsApi::new(&h.gateway)
        .add(7, &ReviewInput { rating: 5, content: "Loved it".into() })
        .await
        .unwrap();

    assert_eq!(review.rating, 5);
    let req = backend.last();
    assert_eq!(req.path, "/api/reviews/movie/7");
    assert_eq!(req.authorization.as_deref(), Some("Bearer t1"));
}

#[tokio::test]
async fn reviews_counts_and_like_state() {
    let backend = FakeBackend::spawn().await;
    let h = Harness::logged_in(&backend.base_url, "t1");
    let reviews = ReviewsApi::new(&h.gateway);

    assert_eq!(reviews.count_for_user(1).await.unwrap(), 3);
    assert_eq!(reviews.like_count(10).await.unwrap(), 3);
    assert!(reviews.has_liked(10, 1).await.unwrap());
    assert_eq!(backend.last().path, "/api/likes/review/10/user/1/hasLiked");
}

#[tokio::test]
async fn reviews_like_unlike_and_deletes() {
    let backend = FakeBackend::spawn().await;
    let h = Harness::logged_in(&backend.base_url, "t1");
    let reviews = ReviewsApi::new(&h.gateway);

    reviews.like(10).await.unwrap();
    reviews.unlike(10).await.unwrap();
    reviews.delete_comment(100).await.unwrap();
    reviews.delete(10).await.unwrap();

    let calls: Vec<(String, String)> = backend.requests().into_iter().map(|r| (r.method, r.path)).collect();
    assert_eq!(
        calls,
        vec![
            ("POST".to_owned(), "/api/likes/review/10".to_owned()),
            ("DELETE".to_owned(), "/api/likes/review/10".to_owned()),
            ("DELETE".to_owned(), "/api/comments/100".to_owned()),
            ("DELETE".to_owned(), "/api/reviews/10".to_owned()),
        ]
    );
}

#[tokio::test]
async fn comments_add_and_list() {
    let backend = FakeBackend::spawn().await;
    let h = Harness::logged_in(&backend.base_url, "t1");
    let reviews = ReviewsApi::new(&h.gateway);

    let comment = reviews.add_comment(10, &CommentInput { content: "Nice".into() }).await.unwrap();
    assert_eq!(comment.content, "Nice");
    assert_eq!(comment.id, 42);

    let comments = reviews.comments(10).await.unwrap();
    assert_eq!(comments[0].id, 100);
}
