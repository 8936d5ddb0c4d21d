use fieldcalc::{
    driver::{operation::Transaction, Operation},
    schema::{FieldId, Reference},
};
use pretty_assertions::assert_eq;
use tests::{assert_err, fixture, tests, DbTest};

async fn create_field_appends_to_every_view(test: &mut DbTest) {
    let db = test.setup_db().await;
    let (table, primary) = fixture::table(&db, "Projects").await;
    db.create_view(&table.id, "Kanban").await.unwrap();

    let code = db
        .create_field(fixture::text(&table, "Code"))
        .await
        .unwrap();

    let views = db.views(&table.id).await.unwrap();
    assert_eq!(views.len(), 2);
    for view in views {
        assert_eq!(view.column_order, [primary.id.clone(), code.id.clone()]);
    }
}

async fn create_view_reads_fields_in_its_transaction(test: &mut DbTest) {
    let db = test.setup_db().await;
    let (table, primary) = fixture::table(&db, "Projects").await;

    test.log().clear();
    let view = db.create_view(&table.id, "Kanban").await.unwrap();
    assert_eq!(view.column_order, [primary.id.clone()]);

    let ops = test.log().operations();
    assert_eq!(ops.len(), 4, "{ops:#?}");
    assert!(matches!(ops[0], Operation::Transaction(Transaction::Start { .. })));
    assert!(matches!(ops[1], Operation::FindFields(_)));
    assert!(matches!(ops[2], Operation::InsertView(_)));
    assert!(matches!(ops[3], Operation::Transaction(Transaction::Commit)));
}

async fn create_field_derives_references(test: &mut DbTest) {
    let db = test.setup_db().await;
    let (table, primary) = fixture::table(&db, "Projects").await;
    let code = db
        .create_field(fixture::text(&table, "Code"))
        .await
        .unwrap();

    let label = db
        .create_field(fixture::formula(
            &table,
            "Label",
            &format!("{{{}}} & ' ' & {{{}}} & {{{}}}", primary.id, code.id, primary.id),
        ))
        .await
        .unwrap();

    let graph = db.references(&[label.id.clone()]).await.unwrap();
    let mut edges: Vec<_> = graph.edges().cloned().collect();
    edges.sort_by(|a, b| a.from.cmp(&b.from));

    let mut expected = vec![
        Reference::value(primary.id.clone(), label.id.clone()),
        Reference::value(code.id.clone(), label.id.clone()),
    ];
    expected.sort_by(|a, b| a.from.cmp(&b.from));

    assert_eq!(edges, expected);
}

async fn create_self_referencing_formula_is_rejected(test: &mut DbTest) {
    let db = test.setup_db().await;
    let (table, _) = fixture::table(&db, "Projects").await;

    let id = FieldId::generate();
    let field = fixture::formula(&table, "Loop", &format!("{{{id}}} + 1")).with_id(id.clone());

    test.log().clear();

    let err = assert_err!(db.create_field(field).await);
    assert!(err.is_circular_reference(), "{err}");
    assert_eq!(err.to_string(), format!("circular reference: {id} -> {id}"));

    assert!(!test.log().any(|op| matches!(op, Operation::InsertField(_))));
    assert_eq!(db.field(&id).await.unwrap(), None);
}

async fn create_field_closing_a_longer_cycle_is_rejected(test: &mut DbTest) {
    let db = test.setup_db().await;
    let (table, _) = fixture::table(&db, "Projects").await;

    let (a, b, c) = (FieldId::generate(), FieldId::generate(), FieldId::generate());

    // `a` references `c` before `c` exists
    db.create_field(fixture::formula(&table, "A", &format!("{{{c}}} + 1")).with_id(a.clone()))
        .await
        .unwrap();
    db.create_field(fixture::formula(&table, "B", &format!("{{{a}}} + 1")).with_id(b.clone()))
        .await
        .unwrap();

    test.log().clear();

    let field = fixture::formula(&table, "C", &format!("{{{b}}} + 1")).with_id(c.clone());
    let err = assert_err!(db.create_field(field).await);
    assert!(err.is_circular_reference(), "{err}");
    assert_eq!(
        err.to_string(),
        format!("circular reference: {c} -> {a} -> {b} -> {c}")
    );

    assert!(!test.log().any(|op| matches!(op, Operation::InsertField(_))));
    assert_eq!(db.field(&c).await.unwrap(), None);
    assert!(db.references(&[b.clone()]).await.unwrap().edges().all(|edge| edge.to != c));
}

async fn create_lookup_through_plain_field_is_rejected(test: &mut DbTest) {
    let db = test.setup_db().await;
    let (table, primary) = fixture::table(&db, "Projects").await;
    let code = db
        .create_field(fixture::text(&table, "Code"))
        .await
        .unwrap();

    test.log().clear();

    let lookup = fixture::lookup(&table, "Code name", &code, &primary);
    let lookup_id = lookup.id.clone();
    let err = assert_err!(db.create_field(lookup).await);
    assert!(err.is_forbidden(), "{err}");

    assert_eq!(test.log().writes(), 0);
    assert_eq!(db.field(&lookup_id).await.unwrap(), None);

    // Deleting the would-be link leaves nothing behind to flag
    db.delete_field(&table.id, &code.id).await.unwrap();
    assert!(db
        .fields(&table.id)
        .await
        .unwrap()
        .iter()
        .all(|field| !field.has_error));
}

async fn create_lookup_of_missing_field_is_rejected(test: &mut DbTest) {
    let db = test.setup_db().await;
    let (projects, _) = fixture::table(&db, "Projects").await;
    let (people, person_name) = fixture::table(&db, "People").await;

    let owner = db
        .create_field(fixture::link(&projects, "Owner", &people, &person_name))
        .await
        .unwrap();

    let missing = fixture::text(&people, "Email");
    let err = assert_err!(
        db.create_field(fixture::lookup(&projects, "Owner email", &owner, &missing))
            .await
    );
    assert!(err.is_field_not_found(), "{err}");

    // The looked up field must live in the linked table
    let err = assert_err!(
        db.create_field(fixture::lookup(&projects, "Owner owner", &owner, &owner))
            .await
    );
    assert!(err.is_forbidden(), "{err}");

    let lookups = db
        .fields(&projects.id)
        .await
        .unwrap()
        .into_iter()
        .filter(|field| field.is_lookup)
        .count();
    assert_eq!(lookups, 0);
}

async fn create_link_creates_junction(test: &mut DbTest) {
    let db = test.setup_db().await;
    let (projects, _) = fixture::table(&db, "Projects").await;
    let (people, person_name) = fixture::table(&db, "People").await;

    let owner = db
        .create_field(fixture::link(&projects, "Owner", &people, &person_name))
        .await
        .unwrap();

    assert!(db.links(&owner.id).await.unwrap().is_empty());

    // Only relation owners have junction storage
    let err = assert_err!(db.links(&person_name.id).await);
    assert!(err.is_forbidden());
}

tests!(
    create_field_appends_to_every_view,
    create_view_reads_fields_in_its_transaction,
    create_field_derives_references,
    create_self_referencing_formula_is_rejected,
    create_field_closing_a_longer_cycle_is_rejected,
    create_lookup_through_plain_field_is_rejected,
    create_lookup_of_missing_field_is_rejected,
    create_link_creates_junction,
);
