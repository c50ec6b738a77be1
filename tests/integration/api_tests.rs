//! API integration tests
//!
//! These tests expect a running server with a fresh database:
//! `cargo run` in one terminal, then `cargo test -- --ignored`.

use chrono::{Duration, Utc};
use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

/// Identity header value for a caller holding the renew/return permission
const LIBRARIAN: &str = "501";
/// Identity header value for an ordinary member
const MEMBER: &str = "502";

/// Generate a 13-digit ISBN unique enough for repeated test runs
fn unique_isbn() -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("clock before epoch")
        .as_nanos();
    format!("{:013}", nanos % 10_000_000_000_000)
}

/// ISO date string `days` from today
fn date_from_today(days: i64) -> String {
    (Utc::now().date_naive() + Duration::days(days)).to_string()
}

async fn create_author(client: &Client) -> i64 {
    let response = client
        .post(format!("{}/authors", BASE_URL))
        .json(&json!({
            "first_name": "Ursula",
            "last_name": "Le Guin",
            "date_of_birth": "1929-10-21"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    body["id"].as_i64().expect("No author ID")
}

async fn create_book(client: &Client, author_id: i64) -> i64 {
    let response = client
        .post(format!("{}/books", BASE_URL))
        .json(&json!({
            "title": "The Dispossessed",
            "summary": "An ambiguous utopia.",
            "isbn": unique_isbn(),
            "author_id": author_id
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    body["id"].as_i64().expect("No book ID")
}

/// Create a copy on loan to `borrower`, due back `due_in_days` from today
async fn create_loaned_copy(client: &Client, book_id: i64, borrower: i64, due_in_days: i64) -> String {
    let response = client
        .post(format!("{}/copies", BASE_URL))
        .json(&json!({
            "book_id": book_id,
            "imprint": "First edition, 1974",
            "status": "o",
            "due_back": date_from_today(due_in_days),
            "borrower_id": borrower
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    body["id"].as_str().expect("No copy ID").to_string()
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_readiness_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/ready", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
#[ignore]
async fn test_summary_counts_and_visits() {
    let client = Client::new();

    let response = client
        .get(format!("{}/summary?visits=4", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["num_books"].is_number());
    assert!(body["num_copies"].is_number());
    assert!(body["num_copies_available"].is_number());
    assert!(body["num_authors"].is_number());
    assert!(body["num_languages"].is_number());
    assert_eq!(body["num_visits"], 5);
}

#[tokio::test]
#[ignore]
async fn test_summary_first_visit() {
    let client = Client::new();

    let response = client
        .get(format!("{}/summary", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["num_visits"], 1);
}

#[tokio::test]
#[ignore]
async fn test_genre_crud() {
    let client = Client::new();

    // Create
    let response = client
        .post(format!("{}/genres", BASE_URL))
        .json(&json!({ "name": "Science Fiction" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    let genre_id = body["id"].as_i64().expect("No genre ID");
    assert_eq!(body["name"], "Science Fiction");

    // Update
    let response = client
        .put(format!("{}/genres/{}", BASE_URL, genre_id))
        .json(&json!({ "name": "Speculative Fiction" }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["name"], "Speculative Fiction");

    // Delete
    let response = client
        .delete(format!("{}/genres/{}", BASE_URL, genre_id))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 204);

    // Gone
    let response = client
        .get(format!("{}/genres/{}", BASE_URL, genre_id))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_create_book_with_genres() {
    let client = Client::new();
    let author_id = create_author(&client).await;

    let response = client
        .post(format!("{}/genres", BASE_URL))
        .json(&json!({ "name": "Fantasy" }))
        .send()
        .await
        .expect("Failed to send request");
    let genre_id = response.json::<Value>().await.expect("Failed to parse response")["id"]
        .as_i64()
        .expect("No genre ID");

    let response = client
        .post(format!("{}/books", BASE_URL))
        .json(&json!({
            "title": "A Wizard of Earthsea",
            "summary": "A young mage learns the cost of power.",
            "isbn": unique_isbn(),
            "author_id": author_id,
            "genre_ids": [genre_id]
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["author"]["id"], author_id);
    assert_eq!(body["genres"][0]["name"], "Fantasy");
    assert_eq!(body["genre_display"], "Fantasy");
}

#[tokio::test]
#[ignore]
async fn test_duplicate_isbn_rejected() {
    let client = Client::new();
    let author_id = create_author(&client).await;
    let isbn = unique_isbn();

    let payload = json!({
        "title": "The Left Hand of Darkness",
        "summary": "An envoy on a winter planet.",
        "isbn": isbn,
        "author_id": author_id
    });

    let response = client
        .post(format!("{}/books", BASE_URL))
        .json(&payload)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);

    let response = client
        .post(format!("{}/books", BASE_URL))
        .json(&payload)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 409);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["code"], 6);
}

#[tokio::test]
#[ignore]
async fn test_book_rejects_unknown_author() {
    let client = Client::new();

    let response = client
        .post(format!("{}/books", BASE_URL))
        .json(&json!({
            "title": "Orphaned Book",
            "summary": "References an author that does not exist.",
            "isbn": unique_isbn(),
            "author_id": 99999999
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["code"], 5);
}

#[tokio::test]
#[ignore]
async fn test_copy_status_filter() {
    let client = Client::new();
    let author_id = create_author(&client).await;
    let book_id = create_book(&client, author_id).await;

    let response = client
        .post(format!("{}/copies", BASE_URL))
        .json(&json!({
            "book_id": book_id,
            "imprint": "Paperback reprint",
            "status": "a"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);

    let response = client
        .get(format!("{}/copies?status=a", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    let copies = body.as_array().expect("Expected array");
    assert!(!copies.is_empty());
    for copy in copies {
        assert_eq!(copy["status"], "a");
        assert_eq!(copy["status_label"], "Available");
    }
}

#[tokio::test]
#[ignore]
async fn test_loan_lists_require_identity() {
    let client = Client::new();

    let response = client
        .get(format!("{}/loans/mine", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 401);

    let response = client
        .get(format!("{}/loans/borrowed", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_renew_requires_permission() {
    let client = Client::new();
    let author_id = create_author(&client).await;
    let book_id = create_book(&client, author_id).await;
    let copy_id = create_loaned_copy(&client, book_id, 777, 7).await;

    // No identity at all
    let response = client
        .post(format!("{}/copies/{}/renew", BASE_URL, copy_id))
        .json(&json!({ "renewal_date": date_from_today(14) }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 401);

    // Identified caller without the permission
    let response = client
        .post(format!("{}/copies/{}/renew", BASE_URL, copy_id))
        .header("x-library-user", MEMBER)
        .json(&json!({ "renewal_date": date_from_today(14) }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 403);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["code"], 2);
}

#[tokio::test]
#[ignore]
async fn test_my_loans_filters_by_borrower_and_orders_by_due_date() {
    let client = Client::new();
    let author_id = create_author(&client).await;
    let book_id = create_book(&client, author_id).await;

    // Borrower 601: due in 14 days, then 3 days; someone else holds a third copy
    let later = create_loaned_copy(&client, book_id, 601, 14).await;
    let sooner = create_loaned_copy(&client, book_id, 601, 3).await;
    let _other = create_loaned_copy(&client, book_id, 602, 1).await;

    let response = client
        .get(format!("{}/loans/mine", BASE_URL))
        .header("x-library-user", "601")
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    let loans = body.as_array().expect("Expected array");

    let ids: Vec<&str> = loans.iter().map(|l| l["id"].as_str().unwrap()).collect();
    assert!(ids.contains(&sooner.as_str()));
    assert!(ids.contains(&later.as_str()));
    for loan in loans {
        assert_eq!(loan["borrower_id"], 601);
        assert_eq!(loan["status"], "o");
    }
    // Soonest due first
    let sooner_pos = ids.iter().position(|id| *id == sooner).unwrap();
    let later_pos = ids.iter().position(|id| *id == later).unwrap();
    assert!(sooner_pos < later_pos);
}

#[tokio::test]
#[ignore]
async fn test_renew_missing_copy() {
    let client = Client::new();

    let response = client
        .post(format!(
            "{}/copies/00000000-0000-0000-0000-000000000000/renew",
            BASE_URL
        ))
        .header("x-library-user", LIBRARIAN)
        .header("x-library-permissions", "can_mark_returned")
        .json(&json!({ "renewal_date": date_from_today(7) }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 404);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["code"], 4);
}

#[tokio::test]
#[ignore]
async fn test_renewal_proposal_is_three_weeks_out() {
    let client = Client::new();
    let author_id = create_author(&client).await;
    let book_id = create_book(&client, author_id).await;
    let copy_id = create_loaned_copy(&client, book_id, 603, 2).await;

    let response = client
        .get(format!("{}/copies/{}/renew", BASE_URL, copy_id))
        .header("x-library-user", LIBRARIAN)
        .header("x-library-permissions", "can_mark_returned")
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["renewal_date"], date_from_today(21));
    assert_eq!(body["copy"]["id"], copy_id.as_str());
}

#[tokio::test]
#[ignore]
async fn test_renew_validates_date_window() {
    let client = Client::new();
    let author_id = create_author(&client).await;
    let book_id = create_book(&client, author_id).await;
    let copy_id = create_loaned_copy(&client, book_id, 604, 2).await;

    // Yesterday is rejected
    let response = client
        .post(format!("{}/copies/{}/renew", BASE_URL, copy_id))
        .header("x-library-user", LIBRARIAN)
        .header("x-library-permissions", "can_mark_returned")
        .json(&json!({ "renewal_date": date_from_today(-1) }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["code"], 7);

    // More than four weeks out is rejected
    let response = client
        .post(format!("{}/copies/{}/renew", BASE_URL, copy_id))
        .header("x-library-user", LIBRARIAN)
        .header("x-library-permissions", "can_mark_returned")
        .json(&json!({ "renewal_date": date_from_today(29) }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["code"], 8);

    // Exactly four weeks out is accepted and the loan stays on loan
    let response = client
        .post(format!("{}/copies/{}/renew", BASE_URL, copy_id))
        .header("x-library-user", LIBRARIAN)
        .header("x-library-permissions", "can_mark_returned")
        .json(&json!({ "renewal_date": date_from_today(28) }))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["due_back"], date_from_today(28));
    assert_eq!(body["status"], "o");
    assert_eq!(body["borrower_id"], 604);
}

#[tokio::test]
#[ignore]
async fn test_return_copy() {
    let client = Client::new();
    let author_id = create_author(&client).await;
    let book_id = create_book(&client, author_id).await;
    let copy_id = create_loaned_copy(&client, book_id, 605, 7).await;

    let response = client
        .post(format!("{}/copies/{}/return", BASE_URL, copy_id))
        .header("x-library-user", LIBRARIAN)
        .header("x-library-permissions", "can_mark_returned")
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "a");
    assert!(body["due_back"].is_null());
    assert!(body["borrower_id"].is_null());

    // A second return is rejected: the copy is no longer on loan
    let response = client
        .post(format!("{}/copies/{}/return", BASE_URL, copy_id))
        .header("x-library-user", LIBRARIAN)
        .header("x-library-permissions", "can_mark_returned")
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_delete_author_keeps_books() {
    let client = Client::new();
    let author_id = create_author(&client).await;
    let book_id = create_book(&client, author_id).await;

    let response = client
        .delete(format!("{}/authors/{}", BASE_URL, author_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 204);

    let response = client
        .get(format!("{}/books/{}", BASE_URL, book_id))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["author"].is_null());
}
