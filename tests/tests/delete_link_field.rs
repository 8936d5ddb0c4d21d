use fieldcalc::{
    driver::Operation,
    schema::{Link, RecordId},
};
use pretty_assertions::assert_eq;
use tests::{fixture, tests, DbTest};

async fn delete_one_way_link(test: &mut DbTest) {
    let db = test.setup_db().await;
    let (projects, _) = fixture::table(&db, "Projects").await;
    let (people, person_name) = fixture::table(&db, "People").await;

    let owner = db
        .create_field(fixture::link(&projects, "Owner", &people, &person_name))
        .await
        .unwrap();
    let owner_name = db
        .create_field(fixture::lookup(&projects, "Owner name", &owner, &person_name))
        .await
        .unwrap();

    db.link_records(
        &owner.id,
        vec![Link {
            self_key: RecordId::generate(),
            foreign_key: RecordId::generate(),
        }],
    )
    .await
    .unwrap();
    assert_eq!(db.links(&owner.id).await.unwrap().len(), 1);

    let people_fields = db.fields(&people.id).await.unwrap();
    let people_views = db.views(&people.id).await.unwrap();

    test.log().clear();
    db.delete_field(&projects.id, &owner.id).await.unwrap();

    let cleaned = test.log().operations().into_iter().find_map(|op| match op {
        Operation::CleanForeignKey(op) => Some(op),
        _ => None,
    });
    assert_eq!(
        cleaned.map(|op| op.options),
        owner.owned_link_options().cloned()
    );

    assert_eq!(db.field(&owner.id).await.unwrap(), None);
    assert!(fixture::reload(&db, &owner_name).await.has_error);
    assert!(db.references(&[owner.id.clone()]).await.unwrap().is_empty());

    for view in db.views(&projects.id).await.unwrap() {
        assert!(!view.column_order.contains(&owner.id));
        assert!(view.column_order.contains(&owner_name.id));
    }

    // The linked table is not touched
    assert_eq!(db.fields(&people.id).await.unwrap(), people_fields);
    assert_eq!(db.views(&people.id).await.unwrap(), people_views);
}

async fn delete_link_with_symmetric_field(test: &mut DbTest) {
    let db = test.setup_db().await;
    let (t1, t1_name) = fixture::table(&db, "Projects").await;
    let (t2, t2_name) = fixture::table(&db, "Tasks").await;

    let (link1, link2) = fixture::link_pair(&t1, &t1_name, &t2, &t2_name);
    let link1 = db.create_field(link1).await.unwrap();
    let link2 = db.create_field(link2).await.unwrap();

    let project_names = db
        .create_field(fixture::lookup(&t2, "Project names", &link2, &t1_name))
        .await
        .unwrap();
    let task_count = db
        .create_field(fixture::rollup(&t1, "Task count", &link1, &t2_name))
        .await
        .unwrap();

    db.link_records(
        &link1.id,
        vec![Link {
            self_key: RecordId::generate(),
            foreign_key: RecordId::generate(),
        }],
    )
    .await
    .unwrap();
    // Both sides read the same junction storage
    assert_eq!(db.links(&link2.id).await.unwrap().len(), 1);

    let t2_views = db.views(&t2.id).await.unwrap();

    db.delete_field(&t1.id, &link1.id).await.unwrap();

    // link1 is gone from its table and its views
    assert_eq!(db.field(&link1.id).await.unwrap(), None);
    for view in db.views(&t1.id).await.unwrap() {
        assert!(!view.column_order.contains(&link1.id));
    }

    // link2 survives, detached and flagged
    let link2 = fixture::reload(&db, &link2).await;
    assert!(link2.has_error);
    assert_eq!(link2.options.as_link().unwrap().symmetric_field_id, None);
    assert!(db
        .fields(&t2.id)
        .await
        .unwrap()
        .iter()
        .any(|field| field.id == link2.id));

    // Dependents on both sides are flagged
    assert!(fixture::reload(&db, &project_names).await.has_error);
    assert!(fixture::reload(&db, &task_count).await.has_error);

    // Neither link keeps an edge, and the relation's records are gone
    assert!(db
        .references(&[link1.id.clone(), link2.id.clone()])
        .await
        .unwrap()
        .is_empty());
    assert!(db.links(&link2.id).await.unwrap().is_empty());

    // t2's views still list link2
    assert_eq!(db.views(&t2.id).await.unwrap(), t2_views);

    // The detachment is undoable from the op log
    let ops: Vec<_> = db
        .field_ops(&t2.id)
        .await
        .unwrap()
        .into_iter()
        .filter(|record| record.field_id == link2.id)
        .map(|record| record.op.key().as_str())
        .collect();
    assert_eq!(ops, ["options", "hasError"]);
}

async fn delete_lookup_of_link_keeps_relation(test: &mut DbTest) {
    let db = test.setup_db().await;
    let (t1, t1_name) = fixture::table(&db, "Projects").await;
    let (t2, t2_name) = fixture::table(&db, "Tasks").await;

    let (link1, link2) = fixture::link_pair(&t1, &t1_name, &t2, &t2_name);
    let link1 = db.create_field(link1).await.unwrap();
    let link2 = db.create_field(link2).await.unwrap();

    // A lookup of a link field is a link field itself, but owns no relation
    let linked_back = db
        .create_field(fixture::lookup(&t1, "Linked back", &link1, &link2))
        .await
        .unwrap();
    assert!(linked_back.is_link());
    assert!(linked_back.owned_link_options().is_none());

    let count = db
        .create_field(fixture::formula(
            &t1,
            "Count",
            &format!("count({{{}}})", linked_back.id),
        ))
        .await
        .unwrap();

    db.link_records(
        &link1.id,
        vec![Link {
            self_key: RecordId::generate(),
            foreign_key: RecordId::generate(),
        }],
    )
    .await
    .unwrap();

    test.log().clear();
    db.delete_field(&t1.id, &linked_back.id).await.unwrap();

    assert!(!test
        .log()
        .any(|op| matches!(op, Operation::CleanForeignKey(_))));

    // Lookup references are only loaded for relation owners
    assert_eq!(
        test.log()
            .count(|op| matches!(op, Operation::QueryReferences(_))),
        1
    );

    assert_eq!(db.field(&linked_back.id).await.unwrap(), None);
    assert!(fixture::reload(&db, &count).await.has_error);

    let link1 = fixture::reload(&db, &link1).await;
    let link2 = fixture::reload(&db, &link2).await;
    assert!(!link1.has_error);
    assert!(!link2.has_error);
    assert_eq!(
        link2.options.as_link().unwrap().symmetric_field_id,
        Some(link1.id.clone())
    );
    assert_eq!(db.links(&link1.id).await.unwrap().len(), 1);
}

tests!(
    delete_one_way_link,
    delete_link_with_symmetric_field,
    delete_lookup_of_link_keeps_relation,
);
