mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::{json, Value};

use common::{hierarchy, TestApp};

async fn negotiation_body(app: &TestApp, extra: Value) -> Result<Value> {
    let (_, contractor, union) = hierarchy(app).await?;
    let mut body = json!({"contractor_id": contractor, "union_id": union, "contract_label": "CC-2024"});
    if let (Some(target), Value::Object(extra)) = (body.as_object_mut(), extra) {
        target.extend(extra);
    }
    Ok(body)
}

#[tokio::test]
async fn headcount_is_derived_from_percentage() -> Result<()> {
    let app = TestApp::new();
    let body = negotiation_body(&app, json!({"total_headcount": 100, "unionized_percentage": 33})).await?;
    let (status, response) = app.post("/api/negotiations", body).await?;
    assert_eq!(status, StatusCode::CREATED, "{}", response);
    assert_eq!(response["data"]["unionized_headcount"], 33);
    assert_eq!(response["data"]["unionized_percentage"], "33.00");
    Ok(())
}

#[tokio::test]
async fn derived_headcount_rounds_half_away_from_zero() -> Result<()> {
    let app = TestApp::new();
    let body = negotiation_body(&app, json!({"total_headcount": 100, "unionized_percentage": "33.5"})).await?;
    let (_, response) = app.post("/api/negotiations", body).await?;
    assert_eq!(response["data"]["unionized_headcount"], 34);
    Ok(())
}

#[tokio::test]
async fn percentage_is_derived_from_headcounts() -> Result<()> {
    let app = TestApp::new();
    let body = negotiation_body(&app, json!({"total_headcount": 100, "unionized_headcount": 34})).await?;
    let (_, response) = app.post("/api/negotiations", body).await?;
    assert_eq!(response["data"]["unionized_percentage"], "34.00");
    Ok(())
}

#[tokio::test]
async fn inconsistent_triple_is_rejected() -> Result<()> {
    let app = TestApp::new();
    let body = negotiation_body(
        &app,
        json!({"total_headcount": 100, "unionized_headcount": 40, "unionized_percentage": 30}),
    )
    .await?;
    let (status, response) = app.post("/api/negotiations", body).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["message"], "inconsistent headcount/percentage");

    let (_, list) = app.get("/api/negotiations").await?;
    assert!(list["data"].as_array().is_some_and(|a| a.is_empty()));
    Ok(())
}

#[tokio::test]
async fn term_is_capped_at_thirty_six_months() -> Result<()> {
    let app = TestApp::new();
    let body = negotiation_body(&app, json!({"start_date": "2024-01-15", "end_date": "2027-01-14"})).await?;
    let (status, _) = app.post("/api/negotiations", body.clone()).await?;
    assert_eq!(status, StatusCode::CREATED);

    let mut too_long = body;
    too_long["contract_label"] = json!("CC-2025");
    too_long["end_date"] = json!("2027-01-16");
    let (status, response) = app.post("/api/negotiations", too_long).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["message"], "term exceeds 36 months");
    Ok(())
}

#[tokio::test]
async fn end_date_must_follow_start_and_respect_commercial_expiry() -> Result<()> {
    let app = TestApp::new();
    let body = negotiation_body(&app, json!({"start_date": "2024-06-10", "end_date": "2024-06-01"})).await?;
    let (_, response) = app.post("/api/negotiations", body).await?;
    assert_eq!(response["message"], "endDate before startDate");

    let app = TestApp::new();
    let body = negotiation_body(
        &app,
        json!({"end_date": "2025-06-01", "commercial_contract_expiry": "2025-05-31"}),
    )
    .await?;
    let (_, response) = app.post("/api/negotiations", body).await?;
    assert_eq!(response["message"], "endDate exceeds commercial expiry");
    Ok(())
}

#[tokio::test]
async fn closing_fills_the_end_date() -> Result<()> {
    let app = TestApp::new();
    let body = negotiation_body(&app, json!({"start_date": "2024-06-10"})).await?;
    let id = app.create("negotiations", body).await?;

    let (status, response) = app.put(&format!("/api/negotiations/{}", id), json!({"status": "Closed"})).await?;
    assert_eq!(status, StatusCode::OK, "{}", response);
    assert_eq!(response["data"]["end_date"], "2027-06-10");
    Ok(())
}

#[tokio::test]
async fn blank_dates_are_treated_as_absent() -> Result<()> {
    let app = TestApp::new();
    let body = negotiation_body(&app, json!({"start_date": "2024-06-10", "end_date": ""})).await?;
    let (status, response) = app.post("/api/negotiations", body).await?;
    assert_eq!(status, StatusCode::CREATED, "{}", response);
    assert_eq!(response["data"]["end_date"], Value::Null);
    Ok(())
}

#[tokio::test]
async fn label_is_unique_per_contractor_and_union_after_trimming() -> Result<()> {
    let app = TestApp::new();
    let body = negotiation_body(&app, json!({})).await?;
    let first = app.create("negotiations", body.clone()).await?;

    let mut duplicate = body.clone();
    duplicate["contract_label"] = json!("  CC-2024  ");
    let (status, response) = app.post("/api/negotiations", duplicate).await?;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(response["details"]["existing_id"], first);

    let other_union = app.create("unions", json!({"name": "Sindicato 2"})).await?;
    let mut elsewhere = body;
    elsewhere["union_id"] = json!(other_union);
    let (status, _) = app.post("/api/negotiations", elsewhere).await?;
    assert_eq!(status, StatusCode::CREATED);
    Ok(())
}

#[tokio::test]
async fn unknown_union_is_a_missing_reference() -> Result<()> {
    let app = TestApp::new();
    let mut body = negotiation_body(&app, json!({})).await?;
    body["union_id"] = json!(321);
    let (status, response) = app.post("/api/negotiations", body).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["field_errors"]["union_id"], "union 321 does not exist");
    Ok(())
}

#[tokio::test]
async fn contractor_and_union_with_negotiations_cannot_be_deleted() -> Result<()> {
    let app = TestApp::new();
    let body = negotiation_body(&app, json!({})).await?;
    app.create("negotiations", body.clone()).await?;

    let (status, _) = app.delete(&format!("/api/contractors/{}", body["contractor_id"])).await?;
    assert_eq!(status, StatusCode::CONFLICT);
    let (status, response) = app.delete(&format!("/api/unions/{}", body["union_id"])).await?;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(response["details"]["dependents"][0]["entity"], "negotiation");
    Ok(())
}
