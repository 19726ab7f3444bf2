//! Integration tests for the repository layer against a real database.

use assert_matches::assert_matches;
use chrono::{Duration, Utc};
use cytomine_core::command::CommandKind;
use cytomine_core::search::{
    domain_associated_filters, parse_search_parameters, to_sql_constraints, SqlConstraints,
};
use cytomine_core::undo::StackKind;
use cytomine_db::models::command::NewCommand;
use cytomine_db::models::command_history::NewCommandHistory;
use cytomine_db::models::ontology::OntologyInput;
use cytomine_db::models::project::{ProjectInput, PROJECT_SCHEMA};
use cytomine_db::models::property::PropertyInput;
use cytomine_db::models::user::NewUser;
use cytomine_db::repositories::{
    CommandHistoryRepo, CommandRepo, OntologyRepo, ProjectRepo, PropertyRepo, StackRepo,
    TransactionRepo, UserRepo,
};
use serde_json::json;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn create_user(pool: &PgPool, username: &str) -> i64 {
    UserRepo::create(
        pool,
        &NewUser {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password_hash: "hash".to_string(),
            role: "user".to_string(),
        },
    )
    .await
    .unwrap()
    .id
}

fn project(name: &str, ontology: Option<i64>) -> ProjectInput {
    ProjectInput {
        name: name.to_string(),
        description: None,
        ontology,
        blind_mode: false,
        number_of_annotations: 0,
        created: None,
    }
}

fn constraints(params: &[(&str, &str)]) -> SqlConstraints {
    let entries = parse_search_parameters(params.iter().copied());
    let associated = domain_associated_filters(&PROJECT_SCHEMA, entries).unwrap();
    to_sql_constraints(&associated.filters)
}

fn new_command(user_id: i64, kind: CommandKind, service: &str) -> NewCommand {
    NewCommand {
        kind,
        user_id,
        transaction_id: None,
        project_id: None,
        service_name: service.to_string(),
        data: json!({"id": 1}),
        action_message: "Project 1 deleted".to_string(),
        print_message: true,
        save_on_undo_redo_stack: true,
        refuse_undo: false,
    }
}

// ---------------------------------------------------------------------------
// Bootstrap
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_health_check(pool: PgPool) {
    cytomine_db::health_check(&pool).await.unwrap();
}

// ---------------------------------------------------------------------------
// Domains
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_insert_generates_id_and_restore_keeps_it(pool: PgPool) {
    let created = ProjectRepo::insert(&pool, None, &project("demo", None))
        .await
        .unwrap();
    assert!(created.id > 0);

    assert!(ProjectRepo::delete(&pool, created.id).await.unwrap());
    assert!(ProjectRepo::find_by_id(&pool, created.id).await.unwrap().is_none());

    let mut restore = project("demo", None);
    restore.created = Some(created.created_at);
    let restored = ProjectRepo::insert(&pool, Some(created.id), &restore)
        .await
        .unwrap();
    assert_eq!(restored.id, created.id);
    assert_eq!(restored.created_at, created.created_at);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_domain_ids_share_one_sequence(pool: PgPool) {
    let user_id = create_user(&pool, "alice").await;
    let ontology = OntologyRepo::insert(
        &pool,
        None,
        &OntologyInput {
            name: "onto".into(),
            user: user_id,
            created: None,
        },
    )
    .await
    .unwrap();
    let project = ProjectRepo::insert(&pool, None, &project("p", Some(ontology.id)))
        .await
        .unwrap();
    assert!(project.id > ontology.id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unique_project_name(pool: PgPool) {
    ProjectRepo::insert(&pool, None, &project("dup", None))
        .await
        .unwrap();
    let err = ProjectRepo::insert(&pool, None, &project("dup", None))
        .await
        .unwrap_err();
    assert_matches!(
        err,
        sqlx::Error::Database(ref db) if db.constraint() == Some("uq_projects_name")
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_project_filters(pool: PgPool) {
    let user_id = create_user(&pool, "alice").await;
    let onto = OntologyRepo::insert(
        &pool,
        None,
        &OntologyInput {
            name: "onto".into(),
            user: user_id,
            created: None,
        },
    )
    .await
    .unwrap();
    ProjectRepo::insert(&pool, None, &project("xabcx", Some(onto.id)))
        .await
        .unwrap();
    ProjectRepo::insert(&pool, None, &project("other", None))
        .await
        .unwrap();

    let like = constraints(&[("name[like]", "*abc*")]);
    let found = ProjectRepo::list(&pool, &like, 0, 0).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "xabcx");

    let upper = constraints(&[("name[like]", "*ABC*")]);
    assert!(ProjectRepo::list(&pool, &upper, 0, 0).await.unwrap().is_empty());
    let ilike = constraints(&[("name[ilike]", "*ABC*")]);
    assert_eq!(ProjectRepo::count(&pool, &ilike).await.unwrap(), 1);

    let onto_id = onto.id.to_string();
    let equals = constraints(&[("ontology[equals]", onto_id.as_str())]);
    let within = constraints(&[("ontology[in]", onto_id.as_str())]);
    let a = ProjectRepo::list(&pool, &equals, 0, 0).await.unwrap();
    let b = ProjectRepo::list(&pool, &within, 0, 0).await.unwrap();
    assert_eq!(
        a.iter().map(|p| p.id).collect::<Vec<_>>(),
        b.iter().map(|p| p.id).collect::<Vec<_>>()
    );

    let with_null = format!("{onto_id},null");
    let both = constraints(&[("ontology[in]", with_null.as_str())]);
    assert_eq!(ProjectRepo::count(&pool, &both).await.unwrap(), 2);

    let none = constraints(&[("ontology[equals]", "null")]);
    let orphans = ProjectRepo::list(&pool, &none, 0, 0).await.unwrap();
    assert_eq!(orphans.len(), 1);
    assert_eq!(orphans[0].name, "other");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_project_pagination(pool: PgPool) {
    for name in ["a", "b", "c"] {
        ProjectRepo::insert(&pool, None, &project(name, None))
            .await
            .unwrap();
    }
    let all = SqlConstraints::default();
    let page = ProjectRepo::list(&pool, &all, 1, 1).await.unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].name, "b");
    assert_eq!(ProjectRepo::list(&pool, &all, 0, 0).await.unwrap().len(), 3);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_properties_cascade_with_project(pool: PgPool) {
    let p = ProjectRepo::insert(&pool, None, &project("p", None))
        .await
        .unwrap();
    PropertyRepo::insert(
        &pool,
        None,
        &PropertyInput {
            project: p.id,
            key: "stain".into(),
            value: "HE".into(),
            created: None,
        },
    )
    .await
    .unwrap();
    let listed = PropertyRepo::list_for_project(&pool, p.id, &SqlConstraints::default())
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);

    ProjectRepo::delete(&pool, p.id).await.unwrap();
    let listed = PropertyRepo::list_for_project(&pool, p.id, &SqlConstraints::default())
        .await
        .unwrap();
    assert!(listed.is_empty());
}

// ---------------------------------------------------------------------------
// Command log
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_command_insert_and_json(pool: PgPool) {
    let user_id = create_user(&pool, "alice").await;
    let command = CommandRepo::insert(&pool, &new_command(user_id, CommandKind::Add, "ProjectService"))
        .await
        .unwrap();
    assert_eq!(command.username, "alice");
    assert_eq!(command.kind().unwrap(), CommandKind::Add);

    let json = CommandRepo::find_by_id(&pool, command.id)
        .await
        .unwrap()
        .unwrap()
        .to_json();
    assert_eq!(json["action"], "Project 1 deleted by alice");
    assert_eq!(json["serviceName"], "ProjectService");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_delete_commands(pool: PgPool) {
    let user_id = create_user(&pool, "alice").await;
    CommandRepo::insert(&pool, &new_command(user_id, CommandKind::Delete, "ProjectService"))
        .await
        .unwrap();
    CommandRepo::insert(&pool, &new_command(user_id, CommandKind::Delete, "OntologyService"))
        .await
        .unwrap();
    CommandRepo::insert(&pool, &new_command(user_id, CommandKind::Add, "ProjectService"))
        .await
        .unwrap();

    let all = CommandRepo::list_delete_commands(&pool, None, None).await.unwrap();
    assert_eq!(all.len(), 2);

    let projects = CommandRepo::list_delete_commands(&pool, Some("ProjectService"), None)
        .await
        .unwrap();
    assert_eq!(projects.len(), 1);

    let future = Utc::now() + Duration::hours(1);
    let later = CommandRepo::list_delete_commands(&pool, None, Some(future))
        .await
        .unwrap();
    assert!(later.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_stacks_share_sequence(pool: PgPool) {
    let user_id = create_user(&pool, "alice").await;
    let tx = TransactionRepo::create(&pool).await.unwrap();
    let mut cmd = new_command(user_id, CommandKind::Add, "ProjectService");
    cmd.transaction_id = Some(tx.id);
    cmd.refuse_undo = true;
    let command = CommandRepo::insert(&pool, &cmd).await.unwrap();

    let undo = StackRepo::push(&pool, StackKind::Undo, user_id, command.id, Some(tx.id))
        .await
        .unwrap();
    assert!(undo.refuse_undo);
    assert_eq!(undo.transaction_id, Some(tx.id));

    let redo = StackRepo::push(&pool, StackKind::Redo, user_id, command.id, None)
        .await
        .unwrap();
    assert!(redo.id > undo.id);

    assert!(StackRepo::remove(&pool, StackKind::Undo, undo.id).await.unwrap());
    assert!(StackRepo::list_for_user(&pool, StackKind::Undo, user_id)
        .await
        .unwrap()
        .is_empty());
    assert_eq!(
        StackRepo::list_for_user(&pool, StackKind::Redo, user_id)
            .await
            .unwrap()
            .len(),
        1
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_history_feeds(pool: PgPool) {
    let user_id = create_user(&pool, "alice").await;
    let command = CommandRepo::insert(&pool, &new_command(user_id, CommandKind::Add, "ProjectService"))
        .await
        .unwrap();
    for prefix in ["", "UNDO"] {
        CommandHistoryRepo::insert(
            &pool,
            &NewCommandHistory {
                command_id: command.id,
                user_id,
                project_id: Some(42),
                message: "Project 1 added".into(),
                prefix_action: prefix,
            },
        )
        .await
        .unwrap();
    }

    assert_eq!(CommandHistoryRepo::count_for_user(&pool, user_id).await.unwrap(), 2);
    assert_eq!(CommandHistoryRepo::count_for_project(&pool, 42).await.unwrap(), 2);

    let page = CommandHistoryRepo::list_for_user(&pool, user_id, 0, 1).await.unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].prefix_action, "UNDO");
    assert_eq!(page[0].username, "alice");

    let by_command = CommandHistoryRepo::list_for_command(&pool, command.id)
        .await
        .unwrap();
    assert_eq!(by_command[0].prefix_action, "");
}
