mod common;

use actix_web::test;
use serde_json::{json, Value};

use common::{bearer, create_user, init_app, setup};

async fn create_community<S, B>(app: &S, token: &str, name: &str) -> String
where
    S: actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse<B>,
        Error = actix_web::Error,
    >,
    B: actix_web::body::MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/api/communities")
        .insert_header(bearer(token))
        .set_json(json!({ "name": name, "description": "a place" }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), 201);
    let body: Value = test::read_body_json(resp).await;
    body["id"].as_str().expect("community id").to_string()
}

#[actix_web::test]
async fn creator_becomes_leader_and_first_member() {
    let ctx = setup();
    let app = init_app(&ctx).await;
    let (leader_id, token) = create_user(&ctx, "leader");

    let community_id = create_community(&app, &token, "synthwave").await;

    let req = test::TestRequest::get()
        .uri(&format!("/api/communities/{community_id}"))
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["leader_id"], leader_id.as_str());
    assert_eq!(body["member_count"], 1);
    assert_eq!(body["is_member"], true);
    assert_eq!(body["user_role"], "LEADER");
}

#[actix_web::test]
async fn community_names_are_unique() {
    let ctx = setup();
    let app = init_app(&ctx).await;
    let (_, token) = create_user(&ctx, "leader");

    create_community(&app, &token, "synthwave").await;

    let req = test::TestRequest::post()
        .uri("/api/communities")
        .insert_header(bearer(&token))
        .set_json(json!({ "name": "synthwave" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 409);
}

#[actix_web::test]
async fn join_and_leave_flow() {
    let ctx = setup();
    let app = init_app(&ctx).await;
    let (_, leader_token) = create_user(&ctx, "leader");
    let (_, member_token) = create_user(&ctx, "member");

    let community_id = create_community(&app, &leader_token, "lofi").await;

    let req = test::TestRequest::post()
        .uri(&format!("/api/communities/{community_id}/join"))
        .insert_header(bearer(&member_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    // Joining twice conflicts.
    let req = test::TestRequest::post()
        .uri(&format!("/api/communities/{community_id}/join"))
        .insert_header(bearer(&member_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 409);

    // The leader is stuck with the community.
    let req = test::TestRequest::post()
        .uri(&format!("/api/communities/{community_id}/leave"))
        .insert_header(bearer(&leader_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 403);

    let req = test::TestRequest::post()
        .uri(&format!("/api/communities/{community_id}/leave"))
        .insert_header(bearer(&member_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    // Leaving when not a member conflicts.
    let req = test::TestRequest::post()
        .uri(&format!("/api/communities/{community_id}/leave"))
        .insert_header(bearer(&member_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 409);
}

#[actix_web::test]
async fn member_listing_carries_roles() {
    let ctx = setup();
    let app = init_app(&ctx).await;
    let (leader_id, leader_token) = create_user(&ctx, "leader");
    let (member_id, member_token) = create_user(&ctx, "member");

    let community_id = create_community(&app, &leader_token, "jazz").await;

    let req = test::TestRequest::post()
        .uri(&format!("/api/communities/{community_id}/join"))
        .insert_header(bearer(&member_token))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::get()
        .uri(&format!("/api/communities/{community_id}/members"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    let members = body.as_array().expect("array");
    assert_eq!(members.len(), 2);

    let role_of = |id: &str| {
        members
            .iter()
            .find(|m| m["id"] == id)
            .map(|m| m["community_role"].as_str().unwrap().to_string())
            .expect("member present")
    };
    assert_eq!(role_of(&leader_id), "LEADER");
    assert_eq!(role_of(&member_id), "MEMBER");
}

#[actix_web::test]
async fn only_the_leader_may_update_or_delete() {
    let ctx = setup();
    let app = init_app(&ctx).await;
    let (_, leader_token) = create_user(&ctx, "leader");
    let (_, other_token) = create_user(&ctx, "other");

    let community_id = create_community(&app, &leader_token, "metal").await;

    let req = test::TestRequest::put()
        .uri(&format!("/api/communities/{community_id}"))
        .insert_header(bearer(&other_token))
        .set_json(json!({ "description": "mine now" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 403);

    let req = test::TestRequest::put()
        .uri(&format!("/api/communities/{community_id}"))
        .insert_header(bearer(&leader_token))
        .set_json(json!({ "description": "heavier" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["description"], "heavier");

    let req = test::TestRequest::delete()
        .uri(&format!("/api/communities/{community_id}"))
        .insert_header(bearer(&other_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 403);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/communities/{community_id}"))
        .insert_header(bearer(&leader_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 204);
}

#[actix_web::test]
async fn search_and_my_communities() {
    let ctx = setup();
    let app = init_app(&ctx).await;
    let (_, leader_token) = create_user(&ctx, "leader");
    let (_, other_token) = create_user(&ctx, "other");

    create_community(&app, &leader_token, "ambient drone").await;
    create_community(&app, &leader_token, "breakcore").await;

    let req = test::TestRequest::get()
        .uri("/api/communities/search?query=drone")
        .to_request();
    let resp = test::call_service(&app, req).await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body.as_array().expect("array").len(), 1);

    let req = test::TestRequest::get()
        .uri("/api/communities/user")
        .insert_header(bearer(&other_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let body: Value = test::read_body_json(resp).await;
    assert!(body.as_array().expect("array").is_empty());

    let req = test::TestRequest::get()
        .uri("/api/communities/user")
        .insert_header(bearer(&leader_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body.as_array().expect("array").len(), 2);
}
