use analyzer_core::{
    Phase, SectionKey, SectionMap, SessionEvent, SessionModel, SessionState, StatusEvent,
    GENERIC_FAILURE_MESSAGE,
};

fn tracking_session() -> SessionModel {
    client_logging::initialize_for_tests();
    let mut session = SessionModel::new();
    assert!(session.begin_submit());
    assert!(session.begin_tracking("j1"));
    session
}

#[test]
fn happy_path_ends_completed_with_final_result() {
    let mut session = tracking_session();

    let events = session.apply_status(StatusEvent::progress(10, Phase::Validating));
    assert_eq!(
        events,
        vec![SessionEvent::Progress {
            percent: 10,
            phase: Phase::Validating
        }]
    );

    let done = StatusEvent {
        progress: 100,
        phase: Phase::Completed,
        partial: None,
        result: Some(SectionMap::new().with(SectionKey::Benefits, "A")),
        error: None,
    };
    let events = session.apply_status(done);

    assert_eq!(session.state(), SessionState::Completed);
    let completed = events
        .iter()
        .find_map(|event| match event {
            SessionEvent::Completed { result } => Some(result),
            _ => None,
        })
        .expect("completed event");
    assert_eq!(completed.get(SectionKey::Benefits), Some("A"));
}

#[test]
fn partial_updates_fire_only_when_content_changes() {
    let mut session = tracking_session();

    let tick = StatusEvent {
        progress: 40,
        phase: Phase::Analyzing(SectionKey::Benefits),
        partial: Some(SectionMap::new().with(SectionKey::Benefits, "draft")),
        result: None,
        error: None,
    };
    let events = session.apply_status(tick.clone());
    assert!(events.iter().any(|event| matches!(
        event,
        SessionEvent::PartialUpdate {
            first_content: true,
            ..
        }
    )));

    // The identical tick redelivered after a reconnect changes nothing.
    let events = session.apply_status(tick);
    assert!(!events
        .iter()
        .any(|event| matches!(event, SessionEvent::PartialUpdate { .. })));
}

#[test]
fn empty_redelivery_does_not_regress_accumulated_sections() {
    let mut session = tracking_session();
    session.apply_status(StatusEvent {
        progress: 40,
        phase: Phase::Analyzing(SectionKey::Benefits),
        partial: Some(SectionMap::new().with(SectionKey::Benefits, "draft")),
        result: None,
        error: None,
    });

    // After a drop and poll resume the next tick carries an empty value.
    session.apply_status(StatusEvent {
        progress: 45,
        phase: Phase::Processing,
        partial: Some(SectionMap::new().with(SectionKey::Benefits, "")),
        result: None,
        error: None,
    });

    assert_eq!(
        session.results().sections().get(SectionKey::Benefits),
        Some("draft")
    );
}

#[test]
fn completion_falls_back_to_accumulated_sections() {
    let mut session = tracking_session();
    session.apply_status(StatusEvent {
        progress: 80,
        phase: Phase::Analyzing(SectionKey::ClaimProcess),
        partial: Some(SectionMap::new().with(SectionKey::ClaimProcess, "các bước claim")),
        result: None,
        error: None,
    });

    // Server closed the job without re-sending the full result.
    let events = session.apply_status(StatusEvent::progress(100, Phase::Completed));
    let completed = events
        .iter()
        .find_map(|event| match event {
            SessionEvent::Completed { result } => Some(result),
            _ => None,
        })
        .expect("completed event");
    assert_eq!(
        completed.get(SectionKey::ClaimProcess),
        Some("các bước claim")
    );
}

#[test]
fn server_failure_uses_its_message_or_the_generic_fallback() {
    let mut session = tracking_session();
    let events = session.apply_status(StatusEvent {
        progress: 50,
        phase: Phase::Failed,
        partial: None,
        result: None,
        error: Some("tài liệu không hợp lệ".to_string()),
    });
    assert_eq!(session.state(), SessionState::Failed);
    assert!(events.contains(&SessionEvent::Failed {
        message: "tài liệu không hợp lệ".to_string()
    }));

    let mut session = tracking_session();
    let events = session.apply_status(StatusEvent {
        progress: 50,
        phase: Phase::Failed,
        partial: None,
        result: None,
        error: None,
    });
    assert!(events.contains(&SessionEvent::Failed {
        message: GENERIC_FAILURE_MESSAGE.to_string()
    }));
}

#[test]
fn duplicate_terminal_events_are_ignored() {
    let mut session = tracking_session();
    let done = StatusEvent {
        progress: 100,
        phase: Phase::Completed,
        partial: None,
        result: Some(SectionMap::new().with(SectionKey::Benefits, "A")),
        error: None,
    };

    assert!(!session.apply_status(done.clone()).is_empty());
    assert!(session.apply_status(done).is_empty());
    assert_eq!(session.state(), SessionState::Completed);
}

#[test]
fn events_after_cancel_neither_mutate_nor_notify() {
    let mut session = tracking_session();
    assert!(session.cancel());
    assert_eq!(session.state(), SessionState::Cancelled);

    // A tick from a transport opened before the cancel.
    let events = session.apply_status(StatusEvent {
        progress: 60,
        phase: Phase::Analyzing(SectionKey::Benefits),
        partial: Some(SectionMap::new().with(SectionKey::Benefits, "late")),
        result: None,
        error: None,
    });

    assert!(events.is_empty());
    assert!(session.results().sections().is_empty());
    assert!(session.fail("too late").is_empty());
    assert_eq!(session.state(), SessionState::Cancelled);
}

#[test]
fn cancel_is_only_valid_while_submitting_or_tracking() {
    let mut idle = SessionModel::new();
    assert!(!idle.cancel());

    let mut submitting = SessionModel::new();
    submitting.begin_submit();
    assert!(submitting.cancel());
}

#[test]
fn out_of_order_progress_is_tolerated() {
    let mut session = tracking_session();
    session.apply_status(StatusEvent::progress(70, Phase::Processing));
    let events = session.apply_status(StatusEvent::progress(30, Phase::Processing));

    // The stale value is displayed as-is; nothing panics, nothing is clamped
    // beyond the 0..=100 range.
    assert_eq!(
        events,
        vec![SessionEvent::Progress {
            percent: 30,
            phase: Phase::Processing
        }]
    );

    let events = session.apply_status(StatusEvent::progress(250, Phase::Processing));
    assert_eq!(
        events,
        vec![SessionEvent::Progress {
            percent: 100,
            phase: Phase::Processing
        }]
    );
}

#[test]
fn submit_rejection_fails_without_tracking() {
    let mut session = SessionModel::new();
    session.begin_submit();
    let events = session.fail("file too large");

    assert_eq!(session.state(), SessionState::Failed);
    assert_eq!(
        events,
        vec![SessionEvent::Failed {
            message: "file too large".to_string()
        }]
    );
    // The terminal transition fired; a late fail is swallowed.
    assert!(session.fail("again").is_empty());
}
