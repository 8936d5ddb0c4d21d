use fieldcalc::op::{FieldOp, FieldOps, FieldProperty};
use pretty_assertions::assert_eq;
use serde_json::json;
use tests::{assert_err, fixture, tests, DbTest};

async fn update_fields_checks_old_value(test: &mut DbTest) {
    let db = test.setup_db().await;
    let (table, _) = fixture::table(&db, "Projects").await;
    let code = db
        .create_field(fixture::text(&table, "Code"))
        .await
        .unwrap();

    db.update_fields(
        &table.id,
        vec![FieldOps::new(
            code.id.clone(),
            vec![FieldOp::set_property(
                FieldProperty::Name,
                Some(json!("Code")),
                json!("Project code"),
            )],
        )],
    )
    .await
    .unwrap();

    let code = fixture::reload(&db, &code).await;
    assert_eq!(code.name, "Project code");
    assert_eq!(code.version, 2);

    let log = db.field_ops(&table.id).await.unwrap();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].field_id, code.id);
    assert_eq!(
        log[0].op,
        FieldOp::set_property(
            FieldProperty::Name,
            Some(json!("Code")),
            json!("Project code")
        )
    );
}

async fn update_fields_is_all_or_nothing(test: &mut DbTest) {
    let db = test.setup_db().await;
    let (table, _) = fixture::table(&db, "Projects").await;
    let code = db
        .create_field(fixture::text(&table, "Code"))
        .await
        .unwrap();
    let notes = db
        .create_field(fixture::text(&table, "Notes"))
        .await
        .unwrap();

    let err = assert_err!(
        db.update_fields(
            &table.id,
            vec![
                FieldOps::new(
                    code.id.clone(),
                    vec![FieldOp::set_property(
                        FieldProperty::Description,
                        None,
                        json!("Internal code"),
                    )],
                ),
                // Stale: the field is called "Notes"
                FieldOps::new(
                    notes.id.clone(),
                    vec![FieldOp::set_property(
                        FieldProperty::Name,
                        Some(json!("Comments")),
                        json!("Remarks"),
                    )],
                ),
            ],
        )
        .await
    );
    assert!(err.is_condition_failed(), "{err}");

    assert_eq!(fixture::reload(&db, &code).await, code);
    assert_eq!(fixture::reload(&db, &notes).await, notes);
    assert!(db.field_ops(&table.id).await.unwrap().is_empty());
}

async fn update_of_missing_field_is_not_found(test: &mut DbTest) {
    let db = test.setup_db().await;
    let (table, _) = fixture::table(&db, "Projects").await;

    let err = assert_err!(
        db.update_fields(
            &table.id,
            vec![FieldOps::new("fldMissing".into(), vec![FieldOp::set_has_error()])],
        )
        .await
    );
    assert!(err.is_field_not_found());
}

async fn logged_ops_invert(test: &mut DbTest) {
    let db = test.setup_db().await;
    let (table, primary) = fixture::table(&db, "Projects").await;
    let code = db
        .create_field(fixture::text(&table, "Code"))
        .await
        .unwrap();
    let label = db
        .create_field(fixture::formula(&table, "Label", &format!("{{{}}}", code.id)))
        .await
        .unwrap();

    db.delete_field(&table.id, &code.id).await.unwrap();
    assert!(fixture::reload(&db, &label).await.has_error);

    let undo: Vec<_> = db
        .field_ops(&table.id)
        .await
        .unwrap()
        .into_iter()
        .rev()
        .map(|record| FieldOps::new(record.field_id, vec![record.op.invert()]))
        .collect();

    db.update_fields(&table.id, undo).await.unwrap();

    let label = fixture::reload(&db, &label).await;
    assert!(!label.has_error);
    assert_eq!(label.version, 3);
    assert!(!fixture::reload(&db, &primary).await.has_error);
}

tests!(
    update_fields_checks_old_value,
    update_fields_is_all_or_nothing,
    update_of_missing_field_is_not_found,
    logged_ops_invert,
);
