use super::ClipboardService;

#[tokio::test]
async fn it_fails_to_copy_without_a_running_service() {
    let res = ClipboardService::set("https://judge.example/problem/12/?cs=abc".to_string()).await;

    assert!(res.is_err());
}
