use analyzer_client::StatusEventWire;
use analyzer_core::{Phase, SectionKey};
use pretty_assertions::assert_eq;

#[test]
fn decodes_a_bare_progress_tick() {
    let event = StatusEventWire::decode(r#"{"progress": 10, "status": "validating"}"#)
        .expect("decode ok");

    assert_eq!(event.progress, 10);
    assert_eq!(event.phase, Phase::Validating);
    assert_eq!(event.partial, None);
    assert_eq!(event.result, None);
    assert_eq!(event.error, None);
}

#[test]
fn decodes_partial_results_with_the_exact_service_keys() {
    let event = StatusEventWire::decode(
        r#"{"progress": 40, "status": "analyzing_quyền_lợi", "partial_result": {"quyền_lợi": "draft"}}"#,
    )
    .expect("decode ok");

    assert_eq!(event.phase, Phase::Analyzing(SectionKey::Benefits));
    let partial = event.partial.expect("partial present");
    assert_eq!(partial.get(SectionKey::Benefits), Some("draft"));
    assert_eq!(partial.get(SectionKey::Costs), None);
}

#[test]
fn decodes_a_full_terminal_result() {
    let event = StatusEventWire::decode(
        r#"{
            "progress": 100,
            "status": "completed",
            "result": {
                "quyền_lợi": "a",
                "chi_phí_tổng_thể_hàng_năm": "b",
                "giá_trị_hoàn_lại": "c",
                "các_điều_khoản_loại_trừ": "d",
                "quy_trình_claim": "e"
            }
        }"#,
    )
    .expect("decode ok");

    assert_eq!(event.phase, Phase::Completed);
    let result = event.result.expect("result present");
    let texts: Vec<_> = result.filled().map(|(_, text)| text).collect();
    assert_eq!(texts, vec!["a", "b", "c", "d", "e"]);
}

#[test]
fn decodes_an_application_failure() {
    let event =
        StatusEventWire::decode(r#"{"progress": 55, "status": "error", "error": "hỏng rồi"}"#)
            .expect("decode ok");

    assert_eq!(event.phase, Phase::Failed);
    assert_eq!(event.error.as_deref(), Some("hỏng rồi"));
}

#[test]
fn tolerates_fractional_and_out_of_range_progress() {
    let event = StatusEventWire::decode(r#"{"progress": 99.6, "status": "processing_pdf"}"#)
        .expect("decode ok");
    assert_eq!(event.progress, 100);

    let event = StatusEventWire::decode(r#"{"progress": 250, "status": "processing_pdf"}"#)
        .expect("decode ok");
    assert_eq!(event.progress, 100);

    let event = StatusEventWire::decode(r#"{"progress": -3, "status": "processing_pdf"}"#)
        .expect("decode ok");
    assert_eq!(event.progress, 0);
}

#[test]
fn missing_progress_defaults_to_zero() {
    let event = StatusEventWire::decode(r#"{"status": "validating"}"#).expect("decode ok");
    assert_eq!(event.progress, 0);
}

#[test]
fn rejects_bodies_without_a_status_tag() {
    assert!(StatusEventWire::decode(r#"{"progress": 10}"#).is_err());
    assert!(StatusEventWire::decode("not json").is_err());
}
