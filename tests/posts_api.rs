mod common;

use actix_web::test;
use serde_json::{json, Value};

use common::{bearer, create_user, init_app, setup};

async fn create_post<S, B>(app: &S, token: &str, body: Value) -> Value
where
    S: actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse<B>,
        Error = actix_web::Error,
    >,
    B: actix_web::body::MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/api/posts")
        .insert_header(bearer(token))
        .set_json(body)
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), 201);
    test::read_body_json(resp).await
}

async fn vote<S, B>(app: &S, token: &str, post_id: &str, value: i32) -> Value
where
    S: actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse<B>,
        Error = actix_web::Error,
    >,
    B: actix_web::body::MessageBody,
{
    let req = test::TestRequest::post()
        .uri(&format!("/api/posts/{post_id}/vote?value={value}"))
        .insert_header(bearer(token))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), 200);
    test::read_body_json(resp).await
}

#[actix_web::test]
async fn posting_to_a_community_requires_membership() {
    let ctx = setup();
    let app = init_app(&ctx).await;
    let (_, leader_token) = create_user(&ctx, "leader");
    let (_, outsider_token) = create_user(&ctx, "outsider");

    let req = test::TestRequest::post()
        .uri("/api/communities")
        .insert_header(bearer(&leader_token))
        .set_json(json!({ "name": "vaporwave" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let community: Value = test::read_body_json(resp).await;
    let community_id = community["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .insert_header(bearer(&outsider_token))
        .set_json(json!({ "content": "hi", "community_id": community_id }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 403);

    let req = test::TestRequest::post()
        .uri(&format!("/api/communities/{community_id}/join"))
        .insert_header(bearer(&outsider_token))
        .to_request();
    test::call_service(&app, req).await;

    let post = create_post(
        &app,
        &outsider_token,
        json!({ "content": "hi", "community_id": community_id }),
    )
    .await;
    assert_eq!(post["community_id"], community_id.as_str());
    assert_eq!(post["vote_count"], 0);
}

#[actix_web::test]
async fn posting_to_a_missing_community_is_not_found() {
    let ctx = setup();
    let app = init_app(&ctx).await;
    let (_, token) = create_user(&ctx, "poster");

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .insert_header(bearer(&token))
        .set_json(json!({ "content": "hi", "community_id": "nope" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
}

#[actix_web::test]
async fn vote_total_tracks_the_ledger() {
    let ctx = setup();
    let app = init_app(&ctx).await;
    let (_, author_token) = create_user(&ctx, "author");
    let (_, voter_a) = create_user(&ctx, "voter_a");
    let (_, voter_b) = create_user(&ctx, "voter_b");

    let post = create_post(&app, &author_token, json!({ "content": "rate me" })).await;
    let post_id = post["id"].as_str().unwrap().to_string();

    let body = vote(&app, &voter_a, &post_id, 1).await;
    assert_eq!(body["vote_count"], 1);
    assert_eq!(body["user_vote"], 1);

    let body = vote(&app, &voter_b, &post_id, 1).await;
    assert_eq!(body["vote_count"], 2);

    // Repeating the same vote changes nothing.
    let body = vote(&app, &voter_a, &post_id, 1).await;
    assert_eq!(body["vote_count"], 2);

    // Flipping swings the total by two.
    let body = vote(&app, &voter_a, &post_id, -1).await;
    assert_eq!(body["vote_count"], 0);

    // Clearing restores the other voter's contribution alone.
    let body = vote(&app, &voter_a, &post_id, 0).await;
    assert_eq!(body["vote_count"], 1);
    assert_eq!(body["user_vote"], 0);
}

#[actix_web::test]
async fn out_of_range_votes_are_rejected() {
    let ctx = setup();
    let app = init_app(&ctx).await;
    let (_, token) = create_user(&ctx, "author");

    let post = create_post(&app, &token, json!({ "content": "rate me" })).await;
    let post_id = post["id"].as_str().unwrap();

    let req = test::TestRequest::post()
        .uri(&format!("/api/posts/{post_id}/vote?value=5"))
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_web::test]
async fn feed_falls_back_to_popularity_for_new_users() {
    let ctx = setup();
    let app = init_app(&ctx).await;
    let (_, author_token) = create_user(&ctx, "author");
    let (_, voter_token) = create_user(&ctx, "voter");
    let (_, reader_token) = create_user(&ctx, "reader");

    let quiet = create_post(&app, &author_token, json!({ "content": "quiet" })).await;
    let hot = create_post(&app, &author_token, json!({ "content": "hot" })).await;
    vote(&app, &voter_token, hot["id"].as_str().unwrap(), 1).await;

    let req = test::TestRequest::get()
        .uri("/api/posts/feed")
        .insert_header(bearer(&reader_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    let feed = body.as_array().expect("array");
    assert_eq!(feed.len(), 2);
    assert_eq!(feed[0]["id"], hot["id"]);
    assert_eq!(feed[1]["id"], quiet["id"]);
}

#[actix_web::test]
async fn feed_shows_only_followed_authors_once_following() {
    let ctx = setup();
    let app = init_app(&ctx).await;
    let (followed_id, followed_token) = create_user(&ctx, "followed");
    let (_, other_token) = create_user(&ctx, "other");
    let (_, reader_token) = create_user(&ctx, "reader");

    create_post(&app, &followed_token, json!({ "content": "from followed" })).await;
    create_post(&app, &other_token, json!({ "content": "from other" })).await;

    let req = test::TestRequest::post()
        .uri(&format!("/api/users/{followed_id}/follow"))
        .insert_header(bearer(&reader_token))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::get()
        .uri("/api/posts/feed")
        .insert_header(bearer(&reader_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let body: Value = test::read_body_json(resp).await;
    let feed = body.as_array().expect("array");
    assert_eq!(feed.len(), 1);
    assert_eq!(feed[0]["user_nickname"], "followed");
}

#[actix_web::test]
async fn only_the_author_or_an_admin_may_edit_or_delete() {
    let ctx = setup();
    let app = init_app(&ctx).await;
    let (_, author_token) = create_user(&ctx, "author");
    let (_, other_token) = create_user(&ctx, "other");
    let (_, admin_token) = common::create_admin(&ctx, "root");

    let post = create_post(&app, &author_token, json!({ "content": "original" })).await;
    let post_id = post["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::put()
        .uri(&format!("/api/posts/{post_id}"))
        .insert_header(bearer(&other_token))
        .set_json(json!({ "content": "vandalized" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 403);

    let req = test::TestRequest::put()
        .uri(&format!("/api/posts/{post_id}"))
        .insert_header(bearer(&author_token))
        .set_json(json!({ "content": "edited" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["content"], "edited");

    let req = test::TestRequest::delete()
        .uri(&format!("/api/posts/{post_id}"))
        .insert_header(bearer(&admin_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 204);

    let req = test::TestRequest::get()
        .uri(&format!("/api/posts/{post_id}"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
}

#[actix_web::test]
async fn updating_with_an_unknown_song_is_not_found() {
    let ctx = setup();
    let app = init_app(&ctx).await;
    let (_, token) = create_user(&ctx, "author");

    let post = create_post(&app, &token, json!({ "content": "original" })).await;
    let post_id = post["id"].as_str().unwrap();

    let req = test::TestRequest::put()
        .uri(&format!("/api/posts/{post_id}"))
        .insert_header(bearer(&token))
        .set_json(json!({ "song_id": "no-such-song" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);

    // The post is untouched.
    let req = test::TestRequest::get()
        .uri(&format!("/api/posts/{post_id}"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["content"], "original");
    assert!(body["song_id"].is_null());
}

#[actix_web::test]
async fn empty_update_is_a_no_op() {
    let ctx = setup();
    let app = init_app(&ctx).await;
    let (_, token) = create_user(&ctx, "author");

    let post = create_post(&app, &token, json!({ "content": "original" })).await;
    let post_id = post["id"].as_str().unwrap();

    let req = test::TestRequest::put()
        .uri(&format!("/api/posts/{post_id}"))
        .insert_header(bearer(&token))
        .set_json(json!({}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["content"], "original");
}

#[actix_web::test]
async fn failed_vote_write_leaves_the_total_untouched() {
    use diesel::prelude::*;
    use resona::handlers::post_handlers::apply_vote;
    use resona::schema::posts;

    let ctx = setup();
    let app = init_app(&ctx).await;
    let (_, token) = create_user(&ctx, "author");

    let post = create_post(&app, &token, json!({ "content": "rate me" })).await;
    let post_id = post["id"].as_str().unwrap();

    // The ledger insert trips the user foreign key after the count update,
    // so the whole write must roll back.
    let mut conn = ctx.pool.get().unwrap();
    assert!(apply_vote(&mut conn, post_id, "ghost-user", 1).is_err());

    let total: i32 = posts::table
        .filter(posts::id.eq(post_id))
        .select(posts::vote_count)
        .first(&mut conn)
        .unwrap();
    assert_eq!(total, 0);
}

#[actix_web::test]
async fn pagination_bounds_are_enforced() {
    let ctx = setup();
    let app = init_app(&ctx).await;
    let (user_id, token) = create_user(&ctx, "author");

    let req = test::TestRequest::get()
        .uri(&format!("/api/posts/user/{user_id}?limit=500"))
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let req = test::TestRequest::get()
        .uri(&format!("/api/posts/user/{user_id}?limit=5&offset=0"))
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
}
