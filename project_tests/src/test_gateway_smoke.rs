//! # Gateway Live Smoke Test
//!
//! Hits every route of a running gateway (GATEWAY_URL, default
//! http://127.0.0.1:8080) and checks the documented status codes.

use std::env;

use lib_common::auctions::tuple::{encode_tuples, RegionRealmTimestampTuple};
use lib_common::utils::ids::unix_now;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let base_url =
        env::var("GATEWAY_URL").unwrap_or_else(|_| "http://127.0.0.1:8080".to_string());
    let client = reqwest::Client::new();
    let mut failures = 0usize;

    println!("[*] Smoke testing gateway at {base_url}");

    // // Statement: Liveness probe must answer 200 "Hello, world!"
    let response = client.get(format!("{base_url}/")).send().await?;
    let status = response.status().as_u16();
    let body = response.text().await?;
    if status != 200 || body != "Hello, world!" {
        eprintln!("[ERROR] GET / answered {status} with body {body:?}");
        failures += 1;
    } else {
        println!("[SUCCESS] GET / -> 200 Hello, world!");
    }

    // // Statement: Commands with their documented success codes
    let tuples = vec![RegionRealmTimestampTuple {
        region: "us".to_string(),
        realm: "earthen-ring".to_string(),
        timestamp: unix_now(),
    }];
    let compute_body = encode_tuples(&tuples)?;

    let commands: [(&str, String, u16); 4] = [
        ("/download-all-auctions", String::new(), 201),
        ("/cleanup-all-manifests", String::new(), 200),
        ("/cleanup-all-auctions", String::new(), 200),
        ("/compute-all-live-auctions", compute_body, 201),
    ];

    for (path, body, expected) in commands {
        let response = client
            .post(format!("{base_url}{path}"))
            .body(body)
            .send()
            .await?;
        let status = response.status().as_u16();

        if status == expected {
            println!("[SUCCESS] POST {path} -> {status}");
        } else {
            let body = response.text().await.unwrap_or_default();
            eprintln!("[ERROR] POST {path} answered {status} (expected {expected}): {body}");
            failures += 1;
        }
    }

    // // Statement: A malformed compute body must answer 400 with the error envelope
    let response = client
        .post(format!("{base_url}/compute-all-live-auctions"))
        .body(r#"[{"region":"us","realm":"earthen-ring","timestamp":"soon"}]"#)
        .send()
        .await?;
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    let envelope: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();

    let envelope_ok = envelope
        .as_object()
        .is_some_and(|object| object.contains_key("message") && object.contains_key("error"));
    if status != 400 || !envelope_ok {
        eprintln!(
            "[ERROR] malformed compute body answered {status} (expected 400) with body {body}"
        );
        failures += 1;
    } else {
        println!("[SUCCESS] POST /compute-all-live-auctions (malformed body) -> 400 envelope");
    }

    if failures > 0 {
        eprintln!("[ERROR] {failures} route(s) misbehaved");
        std::process::exit(1);
    }

    println!("[SUCCESS] All routes answered their documented status codes");
    Ok(())
}
