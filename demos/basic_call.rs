//! Basic example demonstrating simple GET and POST requests.
//!
//! This example shows how to:
//! - Configure a client with default headers
//! - Make GET requests with query parameters and decode JSON
//! - Make POST requests with a JSON body
//! - Inspect status codes, headers, and protocol errors
//!
//! Run with: `cargo run --example basic_call`

use restclient::{Error, RestClient};
use serde::{Deserialize, Serialize};

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
    // Initialize tracing for logging
    tracing_subscriber::fmt()
        .with_env_filter("restclient=debug,basic_call=info")
        .init();

    let client = RestClient::builder()
        .default_header("User-Agent", "restclient-demo/0.1")?
        .build()?;

    println!("=== GET Request Example ===");
    let mut item = client
        .get("https://jsonplaceholder.typicode.com/posts/1")
        .send()
        .await;

    let mut post = Post::default();
    item.json(&mut post);
    item.result.clone().into_result()?;

    println!("Post ID: {}", post.id);
    println!("Title: {}", post.title);
    println!("Content-Type: {:?}", item.header("content-type"));
    println!();

    println!("=== Query Parameter Example ===");
    let item = client
        .get("https://jsonplaceholder.typicode.com/comments")
        .query_param("postId", 1)
        .query_param("id", vec![1, 2])
        .send()
        .await;
    println!("Status: {}", item.status_code());
    println!("Body length: {} bytes", item.bytes().len());
    println!();

    println!("=== POST Request Example ===");
    let new_post = NewPost {
        title: "My New Post".to_string(),
        body: "This is the content of my new post!".to_string(),
        user_id: 1,
    };

    let item = client
        .post("https://jsonplaceholder.typicode.com/posts")
        .json_body(&new_post)
        .send()
        .await;

    // 201 bodies are not decoded by json(), read the raw text instead
    println!("Status: {}", item.status_code());
    println!("Created: {}", item.text());
    println!();

    println!("=== Protocol Error Example ===");
    let item = client
        .get("https://jsonplaceholder.typicode.com/does-not-exist")
        .send()
        .await;
    match item.error() {
        Some(Error::HttpError { status, .. }) => println!("Server answered {}", status),
        Some(e) => println!("Transport error: {}", e),
        None => println!("Unexpected success"),
    }

    Ok(())
}
