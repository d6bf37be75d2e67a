//! Basic example demonstrating GET and POST calls built from one base client.
//!
//! This example shows how to:
//! - Configure a base client once and branch it into several calls
//! - Decode responses into typed targets
//! - Check status and errors on the response
//! - Replay a call through the response
//!
//! Run with: `cargo run --example basic_call`

use rip::{Client, Error};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

#[derive(Debug, Default, Deserialize)]
#[allow(dead_code)]
struct Post {
    #[serde(rename = "userId")]
    user_id: u32,
    id: u32,
    title: String,
    body: String,
}

#[derive(Debug, Serialize)]
struct NewPost {
    title: String,
    body: String,
    #[serde(rename = "userId")]
    user_id: u32,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter("rip=debug,basic_call=info")
        .init();

    let api = Client::with_base_url("https://jsonplaceholder.typicode.com")
        .with_header("Accept", "application/json");
    if let Some(e) = api.config_error() {
        return Err(e);
    }

    let cancel = CancellationToken::new();

    println!("=== GET Request Example ===");
    let mut post = Post::default();
    let mut status = 0u16;
    let response = api.get(["posts", "1"]).call(&cancel, &mut [&mut post]).await;
    if let Some(e) = response.status_into(&mut status).error() {
        eprintln!("GET failed: {}", e);
    }

    println!("Status code: {}", status);
    println!("Post ID: {}", post.id);
    println!("Title: {}", post.title);
    println!();

    println!("=== POST Request Example ===");
    let new_post = NewPost {
        title: "My New Post".to_string(),
        body: "This is the content of my new post!".to_string(),
        user_id: 1,
    };

    let mut created = Post::default();
    let response = api
        .post(["posts"])
        .with_json(&new_post)
        .call(&cancel, &mut [&mut created])
        .await
        .into_result()?;

    println!("Created post ID: {}", created.id);
    println!("Content-Type: {:?}", response.header("content-type"));
    println!();

    println!("=== Replay Example ===");
    let replayed = response.replay(&cancel, &mut []).await;
    println!("Replay status: {:?}", replayed.status());
    println!("Raw response length: {} bytes", replayed.body().len());

    Ok(())
}
