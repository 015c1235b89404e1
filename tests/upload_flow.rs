use std::sync::Arc;

use cloudtune::{
    config::Config,
    event::events::Event,
    http::ApiService,
    upload::{UploadQueue, UploadStatus, metadata::FilenameExtractor},
};
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_string_contains, method, path},
};

fn uploaded(id: &str) -> serde_json::Value {
    json!({
        "id": id,
        "title": "t",
        "artist": "a",
        "genre": "g",
        "album": null,
        "cloudinary_url": format!("https://cdn.example.com/{id}.mp3"),
        "duration": 0,
        "created_at": null
    })
}

#[tokio::test]
async fn staged_folder_uploads_through_the_api() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/upload/music"))
        .and(body_string_contains("\"originalFilename\":\"2 - broken.mp3\""))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"detail": "Storage quota exceeded"})))
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/upload/music"))
        .respond_with(ResponseTemplate::new(200).set_body_json(uploaded("srv")))
        .expect(2)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    for name in ["1 - first.mp3", "2 - broken.mp3", "3 - third.mp3", "cover.jpg"] {
        std::fs::write(dir.path().join(name), b"not really audio").unwrap();
    }

    let config = Config::new(&server.uri(), &server.uri()).unwrap();
    let api = Arc::new(ApiService::new(&config).unwrap());
    let (tx, rx) = flume::unbounded();
    let queue = UploadQueue::new(
        Arc::new(FilenameExtractor::default()),
        api,
        config.upload.clone(),
        tx,
    );

    let staged = queue.stage_files(vec![dir.path().to_path_buf()]);
    assert_eq!(staged.len(), 3);
    queue.wait_for_metadata().await;

    let items = queue.items();
    assert!(items.iter().all(|i| i.metadata.as_ref().is_some_and(|m| m.duration == 0)));
    assert_eq!(items[0].metadata.as_ref().unwrap().artist, "1");

    let summary = queue.upload_all().await;
    assert_eq!((summary.completed, summary.failed), (2, 1));

    let items = queue.items();
    assert_eq!(items[0].status, UploadStatus::Completed);
    assert_eq!(items[1].status, UploadStatus::Error);
    assert_eq!(items[1].error.as_deref(), Some("Storage quota exceeded"));
    assert_eq!(items[2].status, UploadStatus::Completed);

    let events: Vec<Event> = rx.drain().collect();
    assert!(matches!(events.first(), Some(Event::FilesStaged(3))));
    assert!(matches!(events.last(), Some(Event::UploadFinished(s)) if s.failed == 1));
}
