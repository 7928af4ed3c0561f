use sojourn_backend::api;
use sojourn_backend::community::CommunityService;
use sojourn_backend::config::SojournConfig;
use tokio::time::{sleep, Duration};

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn shutdown(self) {
        self.handle.abort();
        let _ = self.handle.await;
    }
}

fn next_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .expect("bind ephemeral port")
        .local_addr()
        .unwrap()
        .port()
}

async fn wait_for_health(base_url: &str) {
    let client = reqwest::Client::new();
    for _ in 0..50 {
        if let Ok(resp) = client.get(format!("{base_url}/health")).send().await {
            if resp.status().is_success() {
                return;
            }
        }
        sleep(Duration::from_millis(100)).await;
    }
    panic!("server did not become healthy in time");
}

async fn spawn_server() -> TestServer {
    let port = next_port();
    let config = SojournConfig::new(port);
    let community = CommunityService::with_fixtures();
    let handle = tokio::spawn(async move {
        let _ = api::serve_http(config, community).await;
    });
    let base_url = format!("http://127.0.0.1:{port}");
    wait_for_health(&base_url).await;
    TestServer { base_url, handle }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn community_rest_roundtrip() {
    let server = spawn_server().await;
    let client = reqwest::Client::new();

    // Fixture set: two posts, visa first.
    let posts: serde_json::Value = client
        .get(format!("{}/community/posts", server.base_url))
        .send()
        .await
        .expect("list response")
        .json()
        .await
        .expect("list json");
    let fixture_posts = posts.as_array().expect("posts array");
    assert_eq!(fixture_posts.len(), 2);
    assert_eq!(fixture_posts[0]["topic"], "visa");

    // Topic filter narrows to the single visa post.
    let visa_posts: serde_json::Value = client
        .get(format!("{}/community/posts?topic=visa", server.base_url))
        .send()
        .await
        .expect("filter response")
        .json()
        .await
        .expect("filter json");
    let visa_posts = visa_posts.as_array().expect("posts array");
    assert_eq!(visa_posts.len(), 1);
    assert_eq!(
        visa_posts[0]["title"],
        "Visa application timeline for UK universities"
    );

    // Case-varied search hits the accommodation post through its body text.
    let search_hits: serde_json::Value = client
        .get(format!("{}/community/posts?search=uCl", server.base_url))
        .send()
        .await
        .expect("search response")
        .json()
        .await
        .expect("search json");
    let search_hits = search_hits.as_array().expect("posts array");
    assert_eq!(search_hits.len(), 1);
    assert_eq!(search_hits[0]["topic"], "accommodation");

    // Create a post and observe it at the head of a later listing.
    let create_resp = client
        .post(format!("{}/community/posts", server.base_url))
        .json(&serde_json::json!({
            "title": "Opening a bank account before arrival",
            "body": "Which banks let international students open an account remotely?",
            "topic": "finances",
        }))
        .send()
        .await
        .expect("create response");
    assert_eq!(create_resp.status(), reqwest::StatusCode::CREATED);
    let created: serde_json::Value = create_resp.json().await.expect("create json");
    let post_id = created["id"].as_str().expect("post id").to_string();
    assert_eq!(created["likes"], 0);
    assert_eq!(created["author_name"], "Anonymous User");

    let posts: serde_json::Value = client
        .get(format!("{}/community/posts", server.base_url))
        .send()
        .await
        .expect("list response")
        .json()
        .await
        .expect("list json");
    let posts = posts.as_array().expect("posts array");
    assert_eq!(posts.len(), 3);
    assert_eq!(posts[0]["id"].as_str(), Some(post_id.as_str()));

    // Like it, then confirm the count moved.
    let like: serde_json::Value = client
        .post(format!(
            "{}/community/posts/{}/like",
            server.base_url, post_id
        ))
        .json(&serde_json::json!({ "is_liked": true }))
        .send()
        .await
        .expect("like response")
        .json()
        .await
        .expect("like json");
    assert_eq!(like["post_id"].as_str(), Some(post_id.as_str()));
    assert_eq!(like["is_liked"], true);

    let fetched: serde_json::Value = client
        .get(format!("{}/community/posts/{}", server.base_url, post_id))
        .send()
        .await
        .expect("get response")
        .json()
        .await
        .expect("get json");
    assert_eq!(fetched["likes"], 1);
    assert_eq!(fetched["is_liked"], true);

    // Comment on it and see the comment appended.
    let comment_resp = client
        .post(format!(
            "{}/community/posts/{}/comments",
            server.base_url, post_id
        ))
        .json(&serde_json::json!({ "body": "Monzo worked for me with just a visa letter." }))
        .send()
        .await
        .expect("comment response");
    assert_eq!(comment_resp.status(), reqwest::StatusCode::CREATED);
    let comment: serde_json::Value = comment_resp.json().await.expect("comment json");
    let comment_id = comment["id"].as_str().expect("comment id").to_string();

    let fetched: serde_json::Value = client
        .get(format!("{}/community/posts/{}", server.base_url, post_id))
        .send()
        .await
        .expect("get response")
        .json()
        .await
        .expect("get json");
    let comments = fetched["comments"].as_array().expect("comments array");
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0]["id"].as_str(), Some(comment_id.as_str()));

    // Like the comment through the nested route.
    let comment_like: serde_json::Value = client
        .post(format!(
            "{}/community/posts/{}/comments/{}/like",
            server.base_url, post_id, comment_id
        ))
        .json(&serde_json::json!({ "is_liked": true }))
        .send()
        .await
        .expect("comment like response")
        .json()
        .await
        .expect("comment like json");
    assert_eq!(comment_like["comment_id"].as_str(), Some(comment_id.as_str()));

    server.shutdown().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn validation_and_not_found_error_shapes() {
    let server = spawn_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{}/community/posts", server.base_url))
        .json(&serde_json::json!({
            "title": "   ",
            "body": "body text",
            "topic": "general",
        }))
        .send()
        .await
        .expect("create response");
    assert_eq!(resp.status(), reqwest::StatusCode::BAD_REQUEST);
    let body: serde_json::Value = resp.json().await.expect("error json");
    assert_eq!(body["message"], "post title may not be empty");

    let resp = client
        .get(format!("{}/community/posts/does-not-exist", server.base_url))
        .send()
        .await
        .expect("get response");
    assert_eq!(resp.status(), reqwest::StatusCode::NOT_FOUND);
    let body: serde_json::Value = resp.json().await.expect("error json");
    assert_eq!(body["message"], "post does-not-exist not found");

    let resp = client
        .post(format!(
            "{}/community/posts/does-not-exist/like",
            server.base_url
        ))
        .json(&serde_json::json!({ "is_liked": true }))
        .send()
        .await
        .expect("like response");
    assert_eq!(resp.status(), reqwest::StatusCode::NOT_FOUND);

    server.shutdown().await;
}
