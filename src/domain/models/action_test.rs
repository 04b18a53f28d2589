use anyhow::Result;

use super::ActionKind;
use super::ActionRequest;

#[test]
fn it_parses_action_kinds() {
    assert_eq!(ActionKind::parse("run"), Some(ActionKind::Run));
    assert_eq!(ActionKind::parse("submit"), Some(ActionKind::Submit));
    assert_eq!(ActionKind::parse("testcase"), Some(ActionKind::Testcase));
    assert_eq!(ActionKind::parse("compile"), None);
}

#[test]
fn it_serializes_the_request_body() -> Result<()> {
    let req = ActionRequest {
        action: ActionKind::Run,
        code: "print(1)".to_string(),
        language: "python".to_string(),
        cinput: "".to_string(),
    };

    insta::assert_snapshot!(serde_json::to_string(&req)?, @r###"{"action":"run","code":"print(1)","language":"python","cinput":""}"###);
    return Ok(());
}
