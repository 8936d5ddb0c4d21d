use fieldcalc::{
    driver::Operation,
    schema::{RecordId, ReferenceKind},
};
use pretty_assertions::assert_eq;
use serde_json::json;
use tests::{assert_err, assert_ok, fixture, tests, DbTest};

async fn delete_plain_field(test: &mut DbTest) {
    let db = test.setup_db().await;
    let (table, primary) = fixture::table(&db, "Projects").await;

    let code = db
        .create_field(fixture::text(&table, "Code"))
        .await
        .unwrap();
    let views = db.views(&table.id).await.unwrap();
    assert_eq!(views[0].column_order, [primary.id.clone(), code.id.clone()]);

    assert_ok!(db.delete_field(&table.id, &code.id).await);

    assert_eq!(db.field(&code.id).await.unwrap(), None);

    let fields = db.fields(&table.id).await.unwrap();
    assert_eq!(fields, [primary.clone()]);

    for view in db.views(&table.id).await.unwrap() {
        assert_eq!(view.column_order, [primary.id.clone()]);
    }
}

async fn delete_field_with_lookup_and_formula_dependents(test: &mut DbTest) {
    let db = test.setup_db().await;
    let (projects, project_name) = fixture::table(&db, "Projects").await;
    let (tasks, task_name) = fixture::table(&db, "Tasks").await;

    let f1 = db
        .create_field(fixture::text(&projects, "Code"))
        .await
        .unwrap();
    let link = db
        .create_field(fixture::link(&tasks, "Project", &projects, &project_name))
        .await
        .unwrap();
    let f2 = db
        .create_field(fixture::lookup(&tasks, "Project code", &link, &f1))
        .await
        .unwrap();
    let f3 = db
        .create_field(fixture::formula(
            &projects,
            "Label",
            &format!("{{{}}} & '!'", f1.id),
        ))
        .await
        .unwrap();

    let (project, task) = (RecordId::generate(), RecordId::generate());
    db.write_cells(&projects.id, vec![fixture::cell(&project, &f3, json!("P-1!"))])
        .await
        .unwrap();
    db.write_cells(&tasks.id, vec![fixture::cell(&task, &f2, json!(["P-1"]))])
        .await
        .unwrap();

    db.delete_field(&projects.id, &f1.id).await.unwrap();

    // f1 is gone from the field store and every view
    assert_eq!(db.field(&f1.id).await.unwrap(), None);
    for view in db.views(&projects.id).await.unwrap() {
        assert!(!view.column_order.contains(&f1.id));
    }

    // f2 and f3 survive, flagged and without stale values
    let f2 = fixture::reload(&db, &f2).await;
    let f3 = fixture::reload(&db, &f3).await;
    assert!(f2.has_error);
    assert!(f3.has_error);
    assert!(db
        .cells(&[f2.id.clone(), f3.id.clone()])
        .await
        .unwrap()
        .is_empty());

    // Both are queued for recalculation under their own table
    assert_eq!(db.pending_calculations(&projects.id).await.unwrap(), [f3.id.clone()]);
    assert_eq!(db.pending_calculations(&tasks.id).await.unwrap(), [f2.id.clone()]);

    // No edge mentions f1 any more; f2 still fetches through the link
    assert!(db.references(&[f1.id.clone()]).await.unwrap().is_empty());
    let graph = db.references(&[f2.id.clone()]).await.unwrap();
    assert_eq!(graph.precedents(&f2.id), [link.id.clone()]);
    assert_eq!(
        graph.dependents(&link.id, Some(ReferenceKind::Lookup)),
        [f2.id.clone()]
    );

    // Fields of the other table besides f2 are untouched
    assert!(!fixture::reload(&db, &task_name).await.has_error);
    assert!(!fixture::reload(&db, &link).await.has_error);
}

async fn delete_primary_field_is_forbidden(test: &mut DbTest) {
    let db = test.setup_db().await;
    let (table, primary) = fixture::table(&db, "Projects").await;
    let formula = db
        .create_field(fixture::formula(
            &table,
            "Upper",
            &format!("upper({{{}}})", primary.id),
        ))
        .await
        .unwrap();

    let fields = db.fields(&table.id).await.unwrap();
    let views = db.views(&table.id).await.unwrap();

    test.log().clear();

    let err = assert_err!(db.delete_field(&table.id, &primary.id).await);
    assert!(err.is_forbidden(), "{err}");

    // Validation runs before any write
    assert_eq!(test.log().writes(), 0);
    assert!(test.log().has_rollback());
    assert!(!test.log().has_commit());

    assert_eq!(db.fields(&table.id).await.unwrap(), fields);
    assert_eq!(db.views(&table.id).await.unwrap(), views);
    assert!(!fixture::reload(&db, &formula).await.has_error);
}

async fn delete_missing_field_is_not_found(test: &mut DbTest) {
    let db = test.setup_db().await;
    let (table, _) = fixture::table(&db, "Projects").await;
    let code = db
        .create_field(fixture::text(&table, "Code"))
        .await
        .unwrap();

    db.delete_field(&table.id, &code.id).await.unwrap();

    test.log().clear();

    let err = assert_err!(db.delete_field(&table.id, &code.id).await);
    assert!(err.is_field_not_found(), "{err}");
    assert_eq!(err.to_string(), format!("field {} not found", code.id));
    assert_eq!(test.log().writes(), 0);
}

async fn delete_field_of_other_table_is_not_found(test: &mut DbTest) {
    let db = test.setup_db().await;
    let (projects, _) = fixture::table(&db, "Projects").await;
    let (tasks, _) = fixture::table(&db, "Tasks").await;
    let code = db
        .create_field(fixture::text(&projects, "Code"))
        .await
        .unwrap();

    let err = assert_err!(db.delete_field(&tasks.id, &code.id).await);
    assert!(err.is_field_not_found());
    assert!(db.field(&code.id).await.unwrap().is_some());
}

async fn delete_field_round_trips_do_not_grow_with_dependents(test: &mut DbTest) {
    let db = test.setup_db().await;

    let mut round_trips = vec![];

    for dependents in [1, 8] {
        let (table, _) = fixture::table(&db, "Projects").await;
        let code = db
            .create_field(fixture::text(&table, "Code"))
            .await
            .unwrap();

        for i in 0..dependents {
            let expression = format!("{{{}}} & '{i}'", code.id);
            db.create_field(fixture::formula(&table, &format!("F{i}"), &expression))
                .await
                .unwrap();
        }

        test.log().clear();
        db.delete_field(&table.id, &code.id).await.unwrap();

        // One batched write per step, whatever the number of dependents
        assert_eq!(
            test.log()
                .count(|op| matches!(op, Operation::UpdateFields(_))),
            1
        );
        assert_eq!(
            test.log()
                .count(|op| matches!(op, Operation::ResetFields(_))),
            1
        );

        round_trips.push(test.log().round_trips());

        let flagged = db
            .fields(&table.id)
            .await
            .unwrap()
            .into_iter()
            .filter(|field| field.has_error)
            .count();
        assert_eq!(flagged, dependents);
    }

    assert_eq!(round_trips[0], round_trips[1]);
}

async fn delete_field_records_error_flags_in_op_log(test: &mut DbTest) {
    let db = test.setup_db().await;
    let (table, _) = fixture::table(&db, "Projects").await;
    let code = db
        .create_field(fixture::text(&table, "Code"))
        .await
        .unwrap();
    let label = db
        .create_field(fixture::formula(&table, "Label", &format!("{{{}}}", code.id)))
        .await
        .unwrap();

    db.delete_field(&table.id, &code.id).await.unwrap();

    let log = db.field_ops(&table.id).await.unwrap();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].field_id, label.id);
    assert_eq!(
        log[0].op,
        fieldcalc::op::FieldOp::set_property(
            fieldcalc::op::FieldProperty::HasError,
            Some(json!(false)),
            json!(true),
        )
    );
}

tests!(
    delete_plain_field,
    delete_field_with_lookup_and_formula_dependents,
    delete_primary_field_is_forbidden,
    delete_missing_field_is_not_found,
    delete_field_of_other_table_is_not_found,
    delete_field_round_trips_do_not_grow_with_dependents,
    delete_field_records_error_flags_in_op_log,
);
