//! Integration tests for the parameter schema and run archive.
//!
//! Need a PostgreSQL server via `DATABASE_URL`; run with
//! `cargo test -p jobsub-db -- --ignored`.

use jobsub_core::parameters::{
    Cardinality, LinePrompter, ParameterResolver, ParameterSource, ParameterValue,
};
use jobsub_core::session::{JobCatalog, ParameterStore};
use jobsub_db::repositories::{ParameterDefinitionRepo, RunParameterRepo};
use jobsub_db::PgSession;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn seed_job(pool: &PgPool, job: &str, indicators: &[&str]) {
    sqlx::query("INSERT INTO gjbjobs (gjbjobs_name, gjbjobs_title) VALUES ($1, $2)")
        .bind(job)
        .bind(format!("{job} Report"))
        .execute(pool)
        .await
        .unwrap();
    for (number, indicator) in (1..).zip(indicators) {
        sqlx::query(
            "INSERT INTO gjbpdef (gjbpdef_job, gjbpdef_number, gjbpdef_single_ind) VALUES ($1, $2, $3)",
        )
        .bind(job)
        .bind(number as i32)
        .bind(*indicator)
        .execute(pool)
        .await
        .unwrap();
    }
}

async fn archive(pool: &PgPool, job: &str, one_up: i64, rows: &[(i32, &str)]) {
    for (number, value) in rows {
        sqlx::query(
            "INSERT INTO gjbprun (gjbprun_job, gjbprun_one_up_no, gjbprun_number, gjbprun_value) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(job)
        .bind(one_up)
        .bind(*number)
        .bind(*value)
        .execute(pool)
        .await
        .unwrap();
    }
}

async fn session(pool: &PgPool) -> PgSession {
    PgSession::new(pool.acquire().await.unwrap().detach())
}

fn no_input() -> LinePrompter<std::io::Cursor<&'static str>, Vec<u8>> {
    LinePrompter::new(std::io::Cursor::new(""), Vec::new())
}

// ---------------------------------------------------------------------------
// Repositories
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn definitions_are_ordered_by_number(pool: PgPool) {
    seed_job(&pool, "GLBDATA", &["S", "M", "S"]).await;
    let mut conn = pool.acquire().await.unwrap();

    let rows = ParameterDefinitionRepo::list_for_job(&mut conn, "GLBDATA")
        .await
        .unwrap();

    let numbers: Vec<i32> = rows.iter().map(|row| row.gjbpdef_number).collect();
    assert_eq!(numbers, vec![1, 2, 3]);
    assert_eq!(rows[1].gjbpdef_single_ind, "M");
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn unknown_job_has_no_title(pool: PgPool) {
    let mut session = session(&pool).await;
    let err = session.job_title("NOPE").await.unwrap_err();
    assert!(err.to_string().contains("NOPE"));
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn catalog_lookups_for_report_header(pool: PgPool) {
    seed_job(&pool, "GLBDATA", &[]).await;
    sqlx::query("INSERT INTO gubinst (gubinst_key, gubinst_name) VALUES ('INST', 'Example University')")
        .execute(&pool)
        .await
        .unwrap();
    let mut session = session(&pool).await;

    assert_eq!(session.job_title("GLBDATA").await.unwrap(), "GLBDATA Report");
    assert_eq!(session.institution_name().await.unwrap(), "Example University");
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn session_maps_definition_indicators(pool: PgPool) {
    seed_job(&pool, "GLBDATA", &["S", "M"]).await;
    let mut session = session(&pool).await;

    let definitions = session.parameter_definitions("GLBDATA").await.unwrap();

    assert_eq!(definitions.len(), 2);
    assert_eq!(definitions[0].cardinality, Cardinality::Single);
    assert_eq!(definitions[1].cardinality, Cardinality::Multiple);
}

// ---------------------------------------------------------------------------
// Archive replay
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn archive_replay_is_consumed_once(pool: PgPool) {
    seed_job(&pool, "GLBDATA", &["S", "S"]).await;
    archive(&pool, "GLBDATA", 4711, &[(1, "A"), (2, "B"), (99, "40")]).await;
    // Another run of the same job must survive the replay.
    archive(&pool, "GLBDATA", 4712, &[(1, "Z")]).await;

    let resolver = ParameterResolver::new("GLBDATA", vec!["p1".into(), "p2".into()]);
    let source = ParameterSource::Archive { one_up: 4711 };
    let mut session = session(&pool).await;

    let resolved = resolver
        .resolve(&mut session, &source, &mut no_input())
        .await
        .unwrap();

    assert_eq!(resolved.page_length, Some(40));
    assert_eq!(
        resolved.parameters.get("p1"),
        Some(&ParameterValue::Single(Some("A".into())))
    );
    assert_eq!(
        resolved.parameters.get("p2"),
        Some(&ParameterValue::Single(Some("B".into())))
    );

    let mut conn = pool.acquire().await.unwrap();
    let left = RunParameterRepo::list_for_run(&mut conn, "GLBDATA", 4711)
        .await
        .unwrap();
    assert!(left.is_empty());
    let other = RunParameterRepo::list_for_run(&mut conn, "GLBDATA", 4712)
        .await
        .unwrap();
    assert_eq!(other.len(), 1);

    let replay = resolver.resolve(&mut session, &source, &mut no_input()).await;
    assert!(replay.is_err(), "a consumed run must not replay");
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn invalid_archive_is_left_in_place(pool: PgPool) {
    seed_job(&pool, "GLBDATA", &["S"]).await;
    archive(&pool, "GLBDATA", 10, &[(1, "A"), (2, "B")]).await;

    let resolver = ParameterResolver::new("GLBDATA", vec!["p1".into()]);
    let mut session = session(&pool).await;

    let result = resolver
        .resolve(&mut session, &ParameterSource::Archive { one_up: 10 }, &mut no_input())
        .await;
    assert!(result.is_err());

    let mut conn = pool.acquire().await.unwrap();
    let left = RunParameterRepo::list_for_run(&mut conn, "GLBDATA", 10)
        .await
        .unwrap();
    assert_eq!(left.len(), 2);
}
