use dbgenie_core::{
    Action, DownloadOutcome, Error, GenerationResponse, RemoteError, Session, SuggestionOutcome,
    SuggestionPayload,
};
use serde_json::json;

fn payload(value: serde_json::Value) -> SuggestionPayload {
    SuggestionPayload::from_value(value)
}

#[test]
fn suggestion_then_generation_round() {
    let mut session = Session::new();
    session.state_mut().set_database_context("library system");

    let request = session.begin_suggestion().expect("begin suggestion");
    assert_eq!(request.context, "library system");
    assert!(session.is_pending(Action::Suggest));

    let outcome = session
        .finish_suggestion(Ok(payload(json!({
            "tables": [
                {"name": "books", "columns": [
                    {"name": "isbn", "type": "string", "unique": true},
                    {"name": "title", "type": "ai_text", "options": "classic novels"}
                ]},
                {"name": "members", "columns": [
                    {"name": "joined", "type": "date", "nullable": true, "nullable_chance": 25}
                ]}
            ]
        }))))
        .expect("finish suggestion");
    assert_eq!(outcome, SuggestionOutcome::Applied { tables: 2 });

    session.state_mut().set_num_rows_input("3");
    let request = session.begin_generation().expect("begin generation");
    assert_eq!(request.tables.len(), 2);
    assert_eq!(request.num_rows, 3);
    assert_eq!(request.database_context, "library system");
    assert_eq!(request.tables[1].columns[0].nullable_chance, 25);

    let response: GenerationResponse = serde_json::from_value(json!({
        "download_info": {"is_zip": false, "files": [
            {"url": "/download/books.csv", "table_name": "books", "format": "csv", "filename": "books.csv"}
        ]}
    }))
    .expect("response");
    let outcome = session.finish_generation(Ok(response)).expect("finish generation");
    assert!(matches!(outcome, DownloadOutcome::Files(files) if files.len() == 1));
}

#[test]
fn suggestion_replaces_everything_regardless_of_prior_state() {
    let mut session = Session::new();
    {
        let state = session.state_mut();
        state.add_table(Some("a".into()), Vec::new());
        state.add_table(Some("b".into()), Vec::new());
        state.set_database_context("anything");
    }
    session.begin_suggestion().expect("begin");
    session
        .finish_suggestion(Ok(payload(json!({
            "tables": [{"name": "users", "columns": [{"name": "id", "type": "integer"}]}]
        }))))
        .expect("finish");

    let tables = session.state().tables();
    assert_eq!(tables.len(), 1);
    assert_eq!(tables[0].name, "users");
    assert_eq!(tables[0].columns.len(), 1);
    assert_eq!(tables[0].columns[0].name, "id");
}

#[test]
fn every_failure_reenables_the_control() {
    let failures = [
        RemoteError::rejected(400, Some("Empty context.".into())),
        RemoteError::Malformed("invalid json".into()),
        RemoteError::Transport("dns".into()),
        RemoteError::TimedOut(300),
    ];
    let mut session = Session::new();
    session.state_mut().set_database_context("crm");
    for failure in failures {
        session.begin_suggestion().expect("begin suggestion");
        session.begin_generation().expect("begin generation");
        assert!(session.finish_suggestion(Err(failure.clone())).is_err());
        assert!(session.finish_generation(Err(failure)).is_err());
        assert!(!session.is_pending(Action::Suggest));
        assert!(!session.is_pending(Action::Generate));
        assert!(!session.state().tables().is_empty());
    }
}

#[test]
fn busy_generation_is_reported_before_validation() {
    let mut session = Session::new();
    session.begin_generation().expect("begin");
    assert!(matches!(
        session.begin_generation(),
        Err(Error::Busy(Action::Generate))
    ));
}
