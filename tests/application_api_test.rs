mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;
use talent_backend::models::notification::{NotificationKind, Recipient};

use common::{recruiter, student, test_app, user, vacancy_body, TestApp, User};

async fn apply(app: &TestApp, vacancy_id: &str, who: &User) -> (StatusCode, serde_json::Value) {
    app.send(
        Method::POST,
        &format!("/api/vacancies/{}/applications", vacancy_id),
        Some(&who.token),
        Some(json!({})),
    )
    .await
}

async fn decide(
    app: &TestApp,
    vacancy_id: &str,
    application_id: &str,
    who: &User,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    app.send(
        Method::PATCH,
        &format!("/api/vacancies/{}/applications/{}", vacancy_id, application_id),
        Some(&who.token),
        Some(body),
    )
    .await
}

#[tokio::test]
async fn student_applies_and_recruiter_accepts() {
    let app = test_app();
    let r = recruiter();
    let vacancy_id = app.create_vacancy(&r, vacancy_body("Estágio em Dados")).await;

    let s = student(Some("Ciência da Computação"));
    let (status, list) = app.get("/api/vacancies", Some(&s.token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["items"][0]["id"], vacancy_id.as_str());
    assert_eq!(list["items"][0]["viewerState"]["canApply"], true);
    assert!(list["items"][0]["viewerState"]["application"].is_null());

    let (status, applied) = app
        .send(
            Method::POST,
            &format!("/api/vacancies/{}/applications", vacancy_id),
            Some(&s.token),
            Some(json!({
                "coverLetter": "Tenho interesse na vaga",
                "portfolioUrl": "https://example.com/portfolio"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", applied);
    assert_eq!(applied["status"], "PENDING");
    let application_id = applied["id"].as_str().expect("application id").to_string();

    let (_, list) = app.get("/api/vacancies", Some(&s.token)).await;
    assert_eq!(
        list["items"][0]["viewerState"]["application"]["status"],
        "PENDING"
    );

    let (status, decided) = decide(
        &app,
        &vacancy_id,
        &application_id,
        &r,
        json!({ "status": "ACCEPTED", "note": "Bem-vindo" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", decided);
    assert_eq!(decided["status"], "ACCEPTED");
    assert_eq!(decided["decisionNote"], "Bem-vindo");
    assert_eq!(decided["decidedBy"], r.id.to_string());

    let sent = app.sink.sent();
    assert!(sent.iter().any(|n| n.kind == NotificationKind::VacancyApplication
        && n.recipient == Recipient::User(r.id)));
    let decision = sent
        .iter()
        .find(|n| n.kind == NotificationKind::VacancyApplicationDecision)
        .expect("decision notification");
    assert_eq!(decision.recipient, Recipient::User(s.id));
    assert!(decision.message.contains("Bem-vindo"));
}

#[tokio::test]
async fn applicants_see_only_their_own_application() {
    let app = test_app();
    let r = recruiter();
    let vacancy_id = app.create_vacancy(&r, vacancy_body("Dev")).await;
    let first = student(None);
    let second = user("gestor", None);
    assert_eq!(apply(&app, &vacancy_id, &first).await.0, StatusCode::CREATED);
    assert_eq!(apply(&app, &vacancy_id, &second).await.0, StatusCode::CREATED);

    let uri = format!("/api/vacancies/{}", vacancy_id);
    let (_, owner_view) = app.get(&uri, Some(&r.token)).await;
    assert_eq!(owner_view["applications"].as_array().map(Vec::len), Some(2));

    let (_, own_view) = app.get(&uri, Some(&first.token)).await;
    let visible = own_view["applications"].as_array().expect("applications");
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0]["applicantId"], first.id.to_string());
    assert_eq!(own_view["permissions"]["canManageApplications"], false);

    let bystander = student(None);
    let (_, bystander_view) = app.get(&uri, Some(&bystander.token)).await;
    assert_eq!(bystander_view["applications"], json!([]));

    let (_, anonymous_view) = app.get(&uri, None).await;
    assert_eq!(anonymous_view["applications"], json!([]));
}

#[tokio::test]
async fn applying_twice_conflicts() {
    let app = test_app();
    let r = recruiter();
    let vacancy_id = app.create_vacancy(&r, vacancy_body("Dev")).await;
    let s = student(None);

    assert_eq!(apply(&app, &vacancy_id, &s).await.0, StatusCode::CREATED);
    let (status, body) = apply(&app, &vacancy_id, &s).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Conflict");
}

#[tokio::test]
async fn ineligible_applications_are_refused() {
    let app = test_app();
    let r = recruiter();
    let open_id = app.create_vacancy(&r, vacancy_body("Aberta")).await;
    let mut closed = vacancy_body("Fechada");
    closed["status"] = json!("CLOSED");
    let closed_id = app.create_vacancy(&r, closed).await;
    let mut draft = vacancy_body("Rascunho");
    draft["isDraft"] = json!(true);
    let draft_id = app.create_vacancy(&r, draft).await;
    let s = student(None);

    assert_eq!(apply(&app, &open_id, &r).await.0, StatusCode::FORBIDDEN);
    assert_eq!(apply(&app, &closed_id, &s).await.0, StatusCode::FORBIDDEN);
    assert_eq!(apply(&app, &draft_id, &s).await.0, StatusCode::NOT_FOUND);
    assert_eq!(
        apply(&app, &uuid::Uuid::new_v4().to_string(), &s).await.0,
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        apply(&app, &open_id, &recruiter()).await.0,
        StatusCode::FORBIDDEN
    );

    let (status, _) = app
        .send(
            Method::POST,
            &format!("/api/vacancies/{}/applications", open_id),
            None,
            Some(json!({})),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .send(
            Method::POST,
            &format!("/api/vacancies/{}/applications", open_id),
            Some(&s.token),
            Some(json!({ "resumeUrl": "not a url" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "ValidationError");
}

#[tokio::test]
async fn only_the_owner_decides_on_its_own_vacancy() {
    let app = test_app();
    let r = recruiter();
    let vacancy_id = app.create_vacancy(&r, vacancy_body("Dev")).await;
    let other_vacancy = app.create_vacancy(&r, vacancy_body("Outra")).await;
    let s = student(None);
    let (_, applied) = apply(&app, &vacancy_id, &s).await;
    let application_id = applied["id"].as_str().expect("application id").to_string();
    let accept = json!({ "status": "ACCEPTED" });

    let intruder = recruiter();
    let (status, _) = decide(&app, &vacancy_id, &application_id, &intruder, accept.clone()).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = decide(&app, &vacancy_id, &application_id, &s, accept.clone()).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = decide(&app, &other_vacancy, &application_id, &r, accept.clone()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let missing = uuid::Uuid::new_v4().to_string();
    let (status, _) = decide(&app, &vacancy_id, &missing, &r, accept).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = decide(
        &app,
        &vacancy_id,
        &application_id,
        &r,
        json!({ "status": "PENDING" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn decisions_can_be_revised() {
    let app = test_app();
    let r = recruiter();
    let vacancy_id = app.create_vacancy(&r, vacancy_body("Dev")).await;
    let s = student(None);
    let (_, applied) = apply(&app, &vacancy_id, &s).await;
    let application_id = applied["id"].as_str().expect("application id").to_string();

    let (status, rejected) = decide(
        &app,
        &vacancy_id,
        &application_id,
        &r,
        json!({ "status": "REJECTED", "note": "Perfil diferente" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(rejected["status"], "REJECTED");

    let (status, accepted) = decide(
        &app,
        &vacancy_id,
        &application_id,
        &r,
        json!({ "status": "ACCEPTED" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(accepted["status"], "ACCEPTED");
    assert!(accepted["decisionNote"].is_null());

    let decisions = app
        .sink
        .sent()
        .into_iter()
        .filter(|n| n.kind == NotificationKind::VacancyApplicationDecision)
        .count();
    assert_eq!(decisions, 2);
}

#[tokio::test]
async fn accepted_vacancies_follow_the_student_after_closing() {
    let app = test_app();
    let r = recruiter();
    let accepted_id = app.create_vacancy(&r, vacancy_body("Aceita")).await;
    let other_id = app.create_vacancy(&r, vacancy_body("Outra")).await;
    let s = student(None);
    let (_, applied) = apply(&app, &accepted_id, &s).await;
    let application_id = applied["id"].as_str().expect("application id").to_string();
    decide(
        &app,
        &accepted_id,
        &application_id,
        &r,
        json!({ "status": "ACCEPTED" }),
    )
    .await;
    let (status, _) = app
        .send(
            Method::PATCH,
            &format!("/api/vacancies/{}", accepted_id),
            Some(&r.token),
            Some(json!({ "status": "CLOSED" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, list) = app.get("/api/vacancies", Some(&s.token)).await;
    assert_eq!(list["total"], 2);
    assert_eq!(list["items"][0]["id"], accepted_id.as_str());
    assert_eq!(list["items"][0]["viewerState"]["canApply"], false);

    let (_, only) = app.get("/api/vacancies?accepted=only", Some(&s.token)).await;
    assert_eq!(only["total"], 1);
    assert_eq!(only["items"][0]["id"], accepted_id.as_str());

    let (_, excluded) = app
        .get("/api/vacancies?accepted=exclude", Some(&s.token))
        .await;
    assert_eq!(excluded["total"], 1);
    assert_eq!(excluded["items"][0]["id"], other_id.as_str());

    let (_, anonymous) = app.get("/api/vacancies", None).await;
    assert_eq!(anonymous["total"], 1);

    let (status, _) = app.get("/api/vacancies?accepted=sometimes", Some(&s.token)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
