use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::Result;
use chrono::NaiveDate;
use flexitrackr::clock::FixedClock;
use flexitrackr::models::CategoryBuckets;
use flexitrackr::sync::{TransactionFeed, TransactionFetcher};
use flexitrackr::{classify, Error};
use rust_decimal::Decimal;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 6, 21).unwrap()
}

fn fetcher(server: &MockServer) -> TransactionFetcher {
    TransactionFetcher::new(server.uri()).with_clock(Arc::new(FixedClock::at_noon(today())))
}

#[tokio::test]
async fn fetch_posts_token_and_parses_latest_transactions() -> Result<()> {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/transactions"))
        .and(header("content-type", "application/json"))
        .and(body_json(serde_json::json!({ "access_token": "access-sandbox-1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "latest_transactions": [
                {
                    "transaction_id": "tx_taxi",
                    "name": "Uber 072515 SF**POOL**",
                    "amount": 6.33,
                    "pending": false,
                    "category": ["Travel", "Taxi"],
                    "date": "2023-06-14"
                },
                {
                    "transaction_id": "tx_lunch",
                    "name": "McDonald's",
                    "amount": 12,
                    "pending": true,
                    "category": ["Food and Drink", "Restaurants", "Fast Food"],
                    "date": "not-a-date"
                }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let transactions = fetcher(&server)
        .fetch_recent_transactions("access-sandbox-1")
        .await?;

    assert_eq!(transactions.len(), 2);
    let taxi = &transactions[0];
    assert_eq!(taxi.id, "tx_taxi");
    assert_eq!(taxi.amount, Decimal::from_str("6.33")?);
    assert_eq!(taxi.category, "Travel - Taxi");
    assert_eq!(taxi.emoji, "🚕");
    assert_eq!(taxi.date, NaiveDate::from_ymd_opt(2023, 6, 14).unwrap());

    let lunch = &transactions[1];
    assert!(lunch.pending);
    assert_eq!(lunch.category, "Food and Drink - Restaurants");
    assert_eq!(lunch.emoji, "🍽️");
    assert_eq!(lunch.date, today());

    let buckets = CategoryBuckets::from_prefixes([("transportation", "Travel")]);
    let classified = classify(&transactions, &buckets);
    assert_eq!(classified["transportation"].len(), 1);
    assert_eq!(classified["transportation"][0].id, "tx_taxi");

    Ok(())
}

#[tokio::test]
async fn base_url_trailing_slash_is_ignored() -> Result<()> {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/plaid/transactions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "latest_transactions": [] })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let transactions = TransactionFetcher::new(format!("{}/plaid/", server.uri()))
        .fetch_recent_transactions("token")
        .await?;
    assert!(transactions.is_empty());
    Ok(())
}

#[tokio::test]
async fn non_success_status_is_fetch_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/transactions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    let err = fetcher(&server)
        .fetch_recent_transactions("token")
        .await
        .expect_err("500 should fail the fetch");
    assert!(matches!(err, Error::Fetch(_)));
    let message = err.to_string();
    assert!(message.contains("500"), "unexpected message: {message}");
    assert!(message.contains("upstream exploded"), "unexpected message: {message}");
}

#[tokio::test]
async fn malformed_body_is_fetch_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/transactions"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<html>", "text/html"))
        .mount(&server)
        .await;

    let err = fetcher(&server)
        .fetch_recent_transactions("token")
        .await
        .expect_err("non-JSON body should fail the fetch");
    assert!(matches!(err, Error::Fetch(_)));
}

#[tokio::test]
async fn missing_latest_transactions_is_fetch_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/transactions"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "transactions": [] })),
        )
        .mount(&server)
        .await;

    let err = fetcher(&server)
        .fetch_recent_transactions("token")
        .await
        .expect_err("missing key should fail the fetch");
    assert!(matches!(err, Error::Fetch(_)));
}

#[tokio::test]
async fn unreachable_server_is_fetch_error() {
    let err = TransactionFetcher::new("http://127.0.0.1:1")
        .fetch_recent_transactions("token")
        .await
        .expect_err("closed port should fail the fetch");
    assert!(matches!(err, Error::Fetch(_)));
}

#[tokio::test]
async fn short_category_fails_whole_fetch() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/transactions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "latest_transactions": [
                { "transaction_id": "ok", "category": ["Travel", "Taxi"], "date": "2023-06-14" },
                { "transaction_id": "bad", "category": ["Travel"], "date": "2023-06-14" }
            ]
        })))
        .mount(&server)
        .await;

    let err = fetcher(&server)
        .fetch_recent_transactions("token")
        .await
        .expect_err("short category should fail the fetch");
    match err {
        Error::CategoryFormat {
            transaction_id,
            found,
        } => {
            assert_eq!(transaction_id, "bad");
            assert_eq!(found, 1);
        }
        other => panic!("expected CategoryFormat, got {other:?}"),
    }
}

#[tokio::test]
async fn feed_signals_completion_once_on_failure() -> Result<()> {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/transactions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "latest_transactions": [
                { "transaction_id": "a", "amount": 1.5, "category": ["Shops", "Bookstores"], "date": "2023-06-14" }
            ]
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/transactions"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let mut feed = TransactionFeed::new(fetcher(&server));
    let completions = AtomicUsize::new(0);

    feed.refresh("token", || {
        completions.fetch_add(1, Ordering::SeqCst);
    })
    .await?;
    assert_eq!(completions.load(Ordering::SeqCst), 1);
    assert_eq!(feed.transactions().len(), 1);

    let result = feed
        .refresh("token", || {
            completions.fetch_add(1, Ordering::SeqCst);
        })
        .await;
    assert!(result.is_err());
    assert_eq!(completions.load(Ordering::SeqCst), 2);
    assert_eq!(feed.transactions().len(), 1);
    assert_eq!(feed.transactions()[0].id, "a");

    Ok(())
}
