use crate::helpers;

#[tokio::test]
async fn health_check_works() {
    let app = helpers::spawn_app().await;

    let response = app.send_get("health_check").await;

    assert!(response.status().is_success());
    assert_eq!(Some(0), response.content_length());
}
