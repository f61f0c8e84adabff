use serde_json::json;

use super::*;

#[test]
fn success_flag_true_is_success() {
    let outcome = SubmissionOutcome::from_body(&json!({ "success": true }));
    assert_eq!(outcome, SubmissionOutcome::Success { message: None });
}

#[test]
fn success_flag_false_uses_message_as_reason() {
    let outcome = SubmissionOutcome::from_body(&json!({
        "success": false,
        "message": "advertisement number already monitored"
    }));
    assert_eq!(
        outcome,
        SubmissionOutcome::Failure {
            reason: "advertisement number already monitored".to_string()
        }
    );
}

#[test]
fn success_flag_false_without_text_gets_generic_reason() {
    let outcome = SubmissionOutcome::from_body(&json!({ "success": false }));
    assert!(matches!(outcome, SubmissionOutcome::Failure { .. }));
}

#[test]
fn message_only_body_is_success() {
    let outcome = SubmissionOutcome::from_body(&json!({ "message": "ok" }));
    assert_eq!(
        outcome,
        SubmissionOutcome::Success {
            message: Some("ok".to_string())
        }
    );
}

#[test]
fn error_field_wins_over_success_flag() {
    let outcome = SubmissionOutcome::from_body(&json!({
        "success": true,
        "error": "duplicate"
    }));
    assert_eq!(
        outcome,
        SubmissionOutcome::Failure {
            reason: "duplicate".to_string()
        }
    );
}

#[test]
fn empty_or_null_error_is_ignored() {
    assert!(SubmissionOutcome::from_body(&json!({ "error": null, "message": "ok" })).is_success());
    assert!(SubmissionOutcome::from_body(&json!({ "error": "", "success": true })).is_success());
}

#[test]
fn non_string_error_is_rendered_as_json() {
    let outcome = SubmissionOutcome::from_body(&json!({ "error": { "field": "adv_num" } }));
    assert_eq!(
        outcome,
        SubmissionOutcome::Failure {
            reason: r#"{"field":"adv_num"}"#.to_string()
        }
    );
}

#[test]
fn bodies_without_indicator_are_failures() {
    assert!(!SubmissionOutcome::from_body(&json!({})).is_success());
    assert!(!SubmissionOutcome::from_body(&json!([1, 2])).is_success());
    assert!(!SubmissionOutcome::from_body(&json!("ok")).is_success());
}

#[test]
fn update_request_uses_camel_case_keys() {
    let edit = AdvertisementEdit {
        id: RecordId::from("42"),
        title: "Clerk".to_string(),
        advertisement_number: "07/2024".to_string(),
        website_url: "https://example.org/jobs".to_string(),
        description: "desc".to_string(),
    };
    let body = serde_json::to_value(UpdateAdvertisementRequest::from(&edit)).expect("json");
    assert_eq!(
        body,
        json!({
            "adId": "42",
            "advNum": "07/2024",
            "advUrl": "https://example.org/jobs",
            "advTitle": "Clerk",
            "advDesc": "desc"
        })
    );
}
