use chrono::{Duration, Utc};
use serde_json::json;

use crate::common::{TestApp, routes};

fn event_body(title: &str) -> serde_json::Value {
    let start = Utc::now() + Duration::days(7);
    json!({
        "title": title,
        "description": "Two days of building.",
        "start_date": start,
        "end_date": start + Duration::days(2),
        "submission_deadline": start + Duration::days(2),
    })
}

mod create {
    use super::*;

    #[tokio::test]
    async fn organizer_creates_a_draft_event() {
        let app = TestApp::spawn().await;
        let token = app.organizer("o@example.com").await;

        let res = app
            .post_with_token(routes::EVENTS, &event_body("Spring Hack"), &token)
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["status"], "draft");
        assert_eq!(res.body["title"], "Spring Hack");
        assert_eq!(res.body["max_team_size"], 4);
        assert_eq!(res.body["tracks"], json!([]));
    }

    #[tokio::test]
    async fn participant_cannot_create_an_event() {
        let app = TestApp::spawn().await;
        let token = app.participant("p@example.com").await;

        let res = app
            .post_with_token(routes::EVENTS, &event_body("Nope"), &token)
            .await;

        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "FORBIDDEN");
    }

    #[tokio::test]
    async fn judge_cannot_create_an_event() {
        let app = TestApp::spawn().await;
        let token = app.judge("j@example.com").await;

        let res = app
            .post_with_token(routes::EVENTS, &event_body("Nope"), &token)
            .await;

        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "FORBIDDEN");
    }

    #[tokio::test]
    async fn end_before_start_is_rejected() {
        let app = TestApp::spawn().await;
        let token = app.organizer("o@example.com").await;
        let start = Utc::now() + Duration::days(7);

        let res = app
            .post_with_token(
                routes::EVENTS,
                &json!({
                    "title": "Backwards",
                    "description": "x",
                    "start_date": start,
                    "end_date": start - Duration::days(1),
                    "submission_deadline": start,
                }),
                &token,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn deadline_outside_the_event_window_is_rejected() {
        let app = TestApp::spawn().await;
        let token = app.organizer("o@example.com").await;
        let start = Utc::now() + Duration::days(7);

        let res = app
            .post_with_token(
                routes::EVENTS,
                &json!({
                    "title": "Late deadline",
                    "description": "x",
                    "start_date": start,
                    "end_date": start + Duration::days(1),
                    "submission_deadline": start + Duration::days(3),
                }),
                &token,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn zero_team_size_is_rejected() {
        let app = TestApp::spawn().await;
        let token = app.organizer("o@example.com").await;
        let mut body = event_body("Solo-less");
        body["max_team_size"] = json!(0);

        let res = app.post_with_token(routes::EVENTS, &body, &token).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}

mod transitions {
    use super::*;

    #[tokio::test]
    async fn owner_walks_the_event_through_every_status() {
        let app = TestApp::spawn().await;
        let token = app.organizer("o@example.com").await;
        let id = app.create_event(&token, "Walk", 4).await;

        for status in [
            "active",
            "submissions_open",
            "submissions_closed",
            "judging",
            "completed",
        ] {
            let res = app.set_event_status(id, status, &token).await;
            assert_eq!(res.status, 200, "{status}: {}", res.text);
            assert_eq!(res.body["status"], status);
        }
    }

    #[tokio::test]
    async fn skipping_forward_is_allowed() {
        let app = TestApp::spawn().await;
        let token = app.organizer("o@example.com").await;
        let id = app.create_event(&token, "Skip", 4).await;

        let res = app.set_event_status(id, "judging", &token).await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["status"], "judging");
    }

    #[tokio::test]
    async fn moving_backward_is_an_invalid_transition() {
        let app = TestApp::spawn().await;
        let token = app.organizer("o@example.com").await;
        let id = app.create_event_in(&token, "submissions_open", 4).await;

        let res = app.set_event_status(id, "active", &token).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "INVALID_TRANSITION");

        let event = app.get_with_token(&routes::event(id), &token).await;
        assert_eq!(event.body["status"], "submissions_open");
    }

    #[tokio::test]
    async fn repeating_the_current_status_is_an_invalid_transition() {
        let app = TestApp::spawn().await;
        let token = app.organizer("o@example.com").await;
        let id = app.create_event_in(&token, "active", 4).await;

        let res = app.set_event_status(id, "active", &token).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "INVALID_TRANSITION");
    }

    #[tokio::test]
    async fn completed_event_cannot_move() {
        let app = TestApp::spawn().await;
        let token = app.organizer("o@example.com").await;
        let id = app.create_event_in(&token, "completed", 4).await;

        let res = app.set_event_status(id, "judging", &token).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "INVALID_TRANSITION");
    }

    #[tokio::test]
    async fn another_organizer_sees_not_found_or_unauthorized() {
        let app = TestApp::spawn().await;
        let owner = app.organizer("owner@example.com").await;
        let other = app.organizer("other@example.com").await;
        let id = app.create_event(&owner, "Mine", 4).await;

        let foreign = app.set_event_status(id, "active", &other).await;
        let missing = app.set_event_status(id + 1000, "active", &other).await;

        assert_eq!(foreign.status, 404);
        assert_eq!(foreign.body["code"], "NOT_FOUND_OR_UNAUTHORIZED");
        assert_eq!(foreign.body, missing.body);
    }

    #[tokio::test]
    async fn participant_cannot_change_status() {
        let app = TestApp::spawn().await;
        let owner = app.organizer("o@example.com").await;
        let participant = app.participant("p@example.com").await;
        let id = app.create_event(&owner, "Mine", 4).await;

        let res = app.set_event_status(id, "active", &participant).await;

        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "FORBIDDEN");
    }

    #[tokio::test]
    async fn unknown_status_value_is_a_validation_error() {
        let app = TestApp::spawn().await;
        let token = app.organizer("o@example.com").await;
        let id = app.create_event(&token, "Typo", 4).await;

        let res = app.set_event_status(id, "archived", &token).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}

mod visibility {
    use super::*;

    #[tokio::test]
    async fn drafts_are_hidden_from_the_public_list() {
        let app = TestApp::spawn().await;
        let token = app.organizer("o@example.com").await;
        app.create_event(&token, "Hidden", 4).await;
        let public = app.create_event_in(&token, "active", 4).await;

        let res = app.get_without_token(routes::EVENTS).await;

        assert_eq!(res.status, 200, "{}", res.text);
        let data = res.body["data"].as_array().expect("data array");
        assert_eq!(data.len(), 1);
        assert_eq!(data[0]["id"], public);
        assert_eq!(res.body["pagination"]["total"], 1);
    }

    #[tokio::test]
    async fn public_list_filters_by_status() {
        let app = TestApp::spawn().await;
        let token = app.organizer("o@example.com").await;
        app.create_event_in(&token, "active", 4).await;
        let open = app.create_event_in(&token, "submissions_open", 4).await;

        let res = app
            .get_without_token(&format!("{}?status=submissions_open", routes::EVENTS))
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        let data = res.body["data"].as_array().expect("data array");
        assert_eq!(data.len(), 1);
        assert_eq!(data[0]["id"], open);
    }

    #[tokio::test]
    async fn public_list_paginates() {
        let app = TestApp::spawn().await;
        let token = app.organizer("o@example.com").await;
        for _ in 0..3 {
            app.create_event_in(&token, "active", 4).await;
        }

        let res = app
            .get_without_token(&format!("{}?page=2&per_page=2", routes::EVENTS))
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["data"].as_array().map(Vec::len), Some(1));
        assert_eq!(res.body["pagination"]["total"], 3);
        assert_eq!(res.body["pagination"]["total_pages"], 2);
    }

    #[tokio::test]
    async fn page_beyond_any_offset_is_a_validation_error() {
        let app = TestApp::spawn().await;
        let token = app.organizer("o@example.com").await;
        app.create_event_in(&token, "active", 4).await;

        for query in [
            "page=18446744073709551615&per_page=100",
            "page=18446744073709551615&per_page=1",
        ] {
            let res = app
                .get_without_token(&format!("{}?{query}", routes::EVENTS))
                .await;
            assert_eq!(res.status, 400, "{query}: {}", res.text);
            assert_eq!(res.body["code"], "VALIDATION_ERROR");
        }

        // The server is still serving afterwards.
        let res = app.get_without_token(routes::EVENTS).await;
        assert_eq!(res.status, 200);
    }

    #[tokio::test]
    async fn page_past_the_end_is_empty() {
        let app = TestApp::spawn().await;
        let token = app.organizer("o@example.com").await;
        app.create_event_in(&token, "active", 4).await;

        let res = app
            .get_without_token(&format!("{}?page=1000&per_page=100", routes::EVENTS))
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["data"], json!([]));
        assert_eq!(res.body["pagination"]["total"], 1);
    }

    #[tokio::test]
    async fn draft_is_visible_only_to_its_organizer() {
        let app = TestApp::spawn().await;
        let owner = app.organizer("o@example.com").await;
        let other = app.participant("p@example.com").await;
        let id = app.create_event(&owner, "Draft", 4).await;

        let as_owner = app.get_with_token(&routes::event(id), &owner).await;
        let as_other = app.get_with_token(&routes::event(id), &other).await;
        let anonymous = app.get_without_token(&routes::event(id)).await;

        assert_eq!(as_owner.status, 200, "{}", as_owner.text);
        assert_eq!(as_other.status, 404);
        assert_eq!(anonymous.status, 404);
        assert_eq!(anonymous.body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn organized_list_includes_drafts() {
        let app = TestApp::spawn().await;
        let token = app.organizer("o@example.com").await;
        let other = app.organizer("x@example.com").await;
        app.create_event(&token, "Draft", 4).await;
        app.create_event_in(&token, "active", 4).await;
        app.create_event(&other, "Not mine", 4).await;

        let res = app.get_with_token(routes::ORGANIZED_EVENTS, &token).await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body.as_array().map(Vec::len), Some(2));
    }
}
