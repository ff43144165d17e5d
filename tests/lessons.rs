mod common;

use axum::http::StatusCode;
use serde_json::{Value, json};

use crate::common::{Action, Flow, setup_server, setup_test_db, signin_admin_action, total};

fn lesson_form(module_id: Option<&str>) -> Value {
    json!({
        "module_id": module_id,
        "title": "At the café",
        "type": "vocabulary",
        "difficulty": "elementary",
        "estimated_minutes": 500,
        "character_id": "  ",
        "objectives": ["", "Order a drink"],
        "key_phrases": [
            { "phrase": "", "meaning": "ignored", "examples": ["x"] },
            { "phrase": "Hi there", "meaning": "greeting", "examples": ["", "Hi there, Sam!"] },
        ],
        "dialogues": [{ "speaker": "ai", "text": "  " }],
        "vocabulary_questions": [{ "word": "", "meaning": "", "options": ["", "", "", ""], "correct_answer": "" }],
        "listening_exercises": [{
            "type": "dictation",
            "audio_text": "Two coffees please",
            "questions": [
                { "question": "How many?", "options": ["one", "two", "", ""], "correct_answer": "two" },
                { "question": "", "options": ["", "", "", ""], "correct_answer": "" },
            ],
            "hints": [""],
        }],
        "application_exercises": [
            { "scenario": "Ordering", "task": "", "hints": [], "sample_responses": [], "evaluation_criteria": [] },
        ],
        "scenario": { "situation": "Morning rush", "suggestedTopics": ["", "menu"] },
        "is_active": true,
    })
}

#[tokio::test]
async fn lesson_submit_pipeline() {
    let Some(db) = setup_test_db().await else {
        return;
    };
    db.seed_admin().await;
    let mut server = setup_server(&db).await;

    Flow::new()
        .step(signin_admin_action())
        .step(
            Action::new("create", "POST", "/api/v1/lessons")
                .with_body(lesson_form(None))
                .with_expect(StatusCode::CREATED)
                .with_save_as("lesson")
                .assert_body(|body| {
                    assert_eq!(body["type"], "vocabulary");
                    assert_eq!(body["estimated_minutes"], 120);
                    assert_eq!(body["character_id"], "sarah");
                    assert_eq!(body["objectives"], json!(["Order a drink"]));
                    assert_eq!(
                        body["key_phrases"],
                        json!([{ "phrase": "Hi there", "meaning": "greeting", "examples": ["Hi there, Sam!"] }])
                    );
                    assert!(body["dialogues"].is_null());
                    assert!(body["vocabulary_questions"].is_null());
                    assert!(body["application_exercises"].is_null());
                    // scenario is conversation-only
                    assert!(body["scenario"].is_null());

                    let listening = &body["listening_exercises"][0];
                    assert_eq!(listening["type"], "dictation");
                    assert_eq!(listening["questions"].as_array().unwrap().len(), 1);
                    assert_eq!(listening["questions"][0]["options"], json!(["one", "two"]));
                    assert_eq!(listening["hints"], json!([]));
                }),
        )
        .step(
            Action::new("as form", "GET", "")
                .with_dyn_path(|ctx| format!("/api/v1/lessons/{}/form", ctx.id_of("lesson")))
                .assert_body(|body| {
                    assert_eq!(body["dialogues"].as_array().unwrap().len(), 1);
                    assert_eq!(body["dialogues"][0]["text"], "");
                    assert_eq!(body["vocabulary_questions"][0]["options"], json!(["", "", "", ""]));
                    assert_eq!(body["listening_exercises"][0]["hints"], json!([""]));
                    assert_eq!(body["key_phrases"][0]["phrase"], "Hi there");
                }),
        )
        .step(
            Action::new("switch to conversation", "PUT", "")
                .with_dyn_path(|ctx| format!("/api/v1/lessons/{}", ctx.id_of("lesson")))
                .with_body({
                    let mut form = lesson_form(None);
                    form["type"] = json!("conversation");
                    form["estimated_minutes"] = json!(1);
                    form
                })
                .assert_body(|body| {
                    assert_eq!(body["estimated_minutes"], 5);
                    assert_eq!(body["scenario"]["situation"], "Morning rush");
                    assert_eq!(body["scenario"]["suggestedTopics"], json!(["menu"]));
                }),
        )
        .run(&mut server)
        .await;
}

#[tokio::test]
async fn lesson_form_nested_edits() {
    let Some(db) = setup_test_db().await else {
        return;
    };
    db.seed_admin().await;
    let mut server = setup_server(&db).await;

    Flow::new()
        .step(signin_admin_action())
        .step(
            Action::new("blank", "GET", "/api/v1/lessons/form")
                .with_save_as("blank")
                .assert_body(|body| {
                    assert_eq!(body["type"], "conversation");
                    assert_eq!(body["difficulty"], "beginner");
                    assert_eq!(body["estimated_minutes"], 30);
                    assert_eq!(body["character_id"], "sarah");
                    assert_eq!(body["key_phrases"].as_array().unwrap().len(), 1);
                }),
        )
        .step(
            Action::new("add example", "POST", "/api/v1/lessons/form/edit")
                .with_dyn_body(|ctx| {
                    json!({
                        "form": ctx.get("blank"),
                        "edit": { "op": "add", "path": ["key_phrases", 0, "examples"] },
                    })
                })
                .with_save_as("edited")
                .assert_body(|body| {
                    assert_eq!(body["key_phrases"][0]["examples"], json!(["", ""]));
                    assert_eq!(body["dialogues"].as_array().unwrap().len(), 1);
                }),
        )
        .step(
            Action::new("update question option", "POST", "/api/v1/lessons/form/edit")
                .with_dyn_body(|ctx| {
                    json!({
                        "form": ctx.get("edited"),
                        "edit": {
                            "op": "update",
                            "path": "listening_exercises.0.questions.0.options",
                            "index": 2,
                            "patch": "three",
                        },
                    })
                })
                .assert_body(|body| {
                    assert_eq!(
                        body["listening_exercises"][0]["questions"][0]["options"],
                        json!(["", "", "three", ""])
                    );
                }),
        )
        .step(
            Action::new("update record row", "POST", "/api/v1/lessons/form/edit")
                .with_dyn_body(|ctx| {
                    json!({
                        "form": ctx.get("edited"),
                        "edit": {
                            "op": "update",
                            "path": ["vocabulary_questions"],
                            "index": 0,
                            "patch": { "word": "latte", "hint": "coffee" },
                        },
                    })
                })
                .assert_body(|body| {
                    assert_eq!(body["vocabulary_questions"][0]["word"], "latte");
                    assert_eq!(body["vocabulary_questions"][0]["hint"], "coffee");
                    assert_eq!(body["vocabulary_questions"][0]["options"], json!(["", "", "", ""]));
                }),
        )
        .step(
            Action::new("unknown field", "POST", "/api/v1/lessons/form/edit")
                .with_dyn_body(|ctx| {
                    json!({
                        "form": ctx.get("edited"),
                        "edit": { "op": "update", "path": ["dialogues"], "index": 0, "patch": { "colour": "red" } },
                    })
                })
                .with_expect(StatusCode::BAD_REQUEST),
        )
        .step(
            Action::new("unknown path", "POST", "/api/v1/lessons/form/edit")
                .with_dyn_body(|ctx| {
                    json!({
                        "form": ctx.get("edited"),
                        "edit": { "op": "add", "path": ["dialogues", 0, "nothing"] },
                    })
                })
                .with_expect(StatusCode::BAD_REQUEST),
        )
        .run(&mut server)
        .await;
}

#[tokio::test]
async fn lesson_listing_and_delete() {
    let Some(db) = setup_test_db().await else {
        return;
    };
    db.seed_admin().await;
    let mut server = setup_server(&db).await;

    Flow::new()
        .step(signin_admin_action())
        .step(
            Action::new("course", "POST", "/api/v1/courses")
                .with_body(json!({ "title": "Café English" }))
                .with_expect(StatusCode::CREATED)
                .with_save_as("course"),
        )
        .step(
            Action::new("module", "POST", "/api/v1/modules")
                .with_dyn_body(|ctx| json!({ "course_id": ctx.id_of("course"), "title": "Ordering" }))
                .with_expect(StatusCode::CREATED)
                .with_save_as("module"),
        )
        .step(
            Action::new("lesson in module", "POST", "/api/v1/lessons")
                .with_dyn_body(|ctx| lesson_form(Some(&ctx.id_of("module"))))
                .with_expect(StatusCode::CREATED)
                .with_save_as("lesson"),
        )
        .step(
            Action::new("loose lesson", "POST", "/api/v1/lessons")
                .with_body(json!({ "title": "Free talk" }))
                .with_expect(StatusCode::CREATED),
        )
        .step(Action::new("listing", "GET", "/api/v1/lessons").assert_body(|body| {
            assert_eq!(total(body), 2);
            assert_eq!(body["active"], 2);
            assert_eq!(body["conversation"], 1);
            let items = body["items"].as_array().unwrap();
            assert_eq!(items[0]["title"], "Free talk");
            assert!(items[0]["module_title"].is_null());
            assert_eq!(items[0]["exercise_kinds"], 0);
            assert_eq!(items[1]["module_title"], "Ordering");
            // key phrases + listening exercises survived the filter
            assert_eq!(items[1]["exercise_kinds"], 2);
        }))
        .step(
            Action::new("module lesson count", "GET", "/api/v1/modules").assert_body(|body| {
                assert_eq!(body["items"][0]["lesson_count"], 1);
            }),
        )
        .step(
            Action::new("delete unconfirmed", "DELETE", "")
                .with_dyn_path(|ctx| format!("/api/v1/lessons/{}", ctx.id_of("lesson")))
                .with_param("confirm", "false")
                .with_expect(StatusCode::PRECONDITION_REQUIRED),
        )
        .step(
            Action::new("delete", "DELETE", "")
                .with_dyn_path(|ctx| format!("/api/v1/lessons/{}", ctx.id_of("lesson")))
                .with_param("confirm", "true")
                .assert_body(|body| {
                    assert_eq!(total(body), 1);
                    assert_eq!(body["conversation"], 1);
                }),
        )
        .step(
            Action::new("gone", "GET", "")
                .with_dyn_path(|ctx| format!("/api/v1/lessons/{}", ctx.id_of("lesson")))
                .with_expect(StatusCode::NOT_FOUND),
        )
        .run(&mut server)
        .await;
}

#[tokio::test]
async fn rejected_update_reports_backend_message() {
    let Some(db) = setup_test_db().await else {
        return;
    };
    db.seed_admin().await;
    let mut server = setup_server(&db).await;

    Flow::new()
        .step(signin_admin_action())
        .step(
            Action::new("create", "POST", "/api/v1/lessons")
                .with_body(lesson_form(None))
                .with_expect(StatusCode::CREATED)
                .with_save_as("lesson"),
        )
        .step(
            Action::new("update with unknown module", "PUT", "")
                .with_dyn_path(|ctx| format!("/api/v1/lessons/{}", ctx.id_of("lesson")))
                .with_body({
                    let mut form = lesson_form(Some("00000000-0000-0000-0000-000000000001"));
                    form["title"] = json!("Renamed");
                    form
                })
                .with_expect(StatusCode::INTERNAL_SERVER_ERROR)
                .assert_body(|body| {
                    assert_eq!(
                        body["message"],
                        r#"insert or update on table "lessons" violates foreign key constraint "lessons_module_id_fkey""#
                    );
                }),
        )
        .step(
            Action::new("row unchanged", "GET", "")
                .with_dyn_path(|ctx| format!("/api/v1/lessons/{}", ctx.id_of("lesson")))
                .assert_body(|body| {
                    assert_eq!(body["title"], "At the café");
                    assert!(body["module_id"].is_null());
                }),
        )
        .run(&mut server)
        .await;
}

#[tokio::test]
async fn failed_lookup_before_update_reports_backend_message() {
    let Some(db) = setup_test_db().await else {
        return;
    };
    db.seed_admin().await;
    let mut server = setup_server(&db).await;

    Flow::new()
        .step(signin_admin_action())
        .run(&mut server)
        .await;

    db.execute("ALTER TABLE lessons RENAME TO lessons_archived").await;

    Flow::new()
        .step(
            Action::new("update", "PUT", "/api/v1/lessons/3b241101-e2bb-4255-8caf-4136c566a962")
                .with_body(lesson_form(None))
                .with_expect(StatusCode::INTERNAL_SERVER_ERROR)
                .assert_body(|body| {
                    assert_eq!(body["message"], r#"relation "lessons" does not exist"#);
                }),
        )
        .run(&mut server)
        .await;
}
