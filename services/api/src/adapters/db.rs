//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `DatabaseService` port from the `core` crate. It handles all interactions
//! with the SQLite database using `sqlx`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use project_workspace_core::domain::{
    Document, NewProject, NewQuestion, Project, Question, StoredFile, DOCUMENT_STATUS_READY,
    PLACEHOLDER_ANSWER,
};
use project_workspace_core::ports::{DatabaseService, PortError, PortResult};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use sqlx::FromRow;
use std::str::FromStr;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `DatabaseService` port.
///
/// Each call checks a connection out of the pool for the duration of one
/// query (or one transaction) and hands it back on every exit path.
#[derive(Clone)]
pub struct DbAdapter {
    pool: SqlitePool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Opens a pool for `database_url`, creating the file if needed.
    ///
    /// An in-memory database only exists inside its one connection, so the
    /// pool is pinned to a single long-lived connection in that case.
    pub async fn connect(database_url: &str) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal);

        let pool = if database_url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await?
        } else {
            SqlitePoolOptions::new()
                .max_connections(5)
                .connect_with(options)
                .await?
        };

        Ok(Self::new(pool))
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::Error> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    async fn ensure_project(&self, project_id: i64) -> PortResult<()> {
        sqlx::query_scalar::<_, i64>("SELECT id FROM projects WHERE id = ?")
            .bind(project_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(unexpected)?
            .map(|_| ())
            .ok_or_else(|| project_not_found(project_id))
    }
}

fn unexpected(e: sqlx::Error) -> PortError {
    PortError::Unexpected(e.to_string())
}

fn project_not_found(project_id: i64) -> PortError {
    PortError::NotFound(format!("Project {} not found", project_id))
}

/// Inserts that race a concurrent project delete trip the foreign key.
fn insert_error(project_id: i64) -> impl Fn(sqlx::Error) -> PortError {
    move |e| match &e {
        sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
            project_not_found(project_id)
        }
        _ => unexpected(e),
    }
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct ProjectRecord {
    id: i64,
    name: String,
    description: Option<String>,
    created_at: DateTime<Utc>,
}
impl ProjectRecord {
    fn to_domain(self) -> Project {
        Project {
            id: self.id,
            name: self.name,
            description: self.description,
            created_at: self.created_at,
        }
    }
}

#[derive(FromRow)]
struct DocumentRecord {
    id: i64,
    project_id: i64,
    filename: String,
    path: String,
    status: String,
    uploaded_at: DateTime<Utc>,
}
impl DocumentRecord {
    fn to_domain(self) -> Document {
        Document {
            id: self.id,
            project_id: self.project_id,
            filename: self.filename,
            path: self.path,
            status: self.status,
            uploaded_at: self.uploaded_at,
        }
    }
}

#[derive(FromRow)]
struct QuestionRecord {
    id: i64,
    project_id: i64,
    question: String,
    answer: String,
    created_at: DateTime<Utc>,
}
impl QuestionRecord {
    fn to_domain(self) -> Question {
        Question {
            id: self.id,
            project_id: self.project_id,
            question: self.question,
            answer: self.answer,
            created_at: self.created_at,
        }
    }
}

//=========================================================================================
// `DatabaseService` Trait Implementation
//=========================================================================================

#[async_trait]
impl DatabaseService for DbAdapter {
    async fn create_project(&self, new_project: &NewProject) -> PortResult<Project> {
        let record = sqlx::query_as::<_, ProjectRecord>(
            "INSERT INTO projects (name, description, created_at) VALUES (?, ?, ?) \
             RETURNING id, name, description, created_at",
        )
        .bind(new_project.name())
        .bind(new_project.description())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(record.to_domain())
    }

    async fn list_projects(&self) -> PortResult<Vec<Project>> {
        let records = sqlx::query_as::<_, ProjectRecord>(
            "SELECT id, name, description, created_at FROM projects ORDER BY id DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }

    async fn get_project(&self, project_id: i64) -> PortResult<Project> {
        let record = sqlx::query_as::<_, ProjectRecord>(
            "SELECT id, name, description, created_at FROM projects WHERE id = ?",
        )
        .bind(project_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => project_not_found(project_id),
            _ => unexpected(e),
        })?;
        Ok(record.to_domain())
    }

    async fn delete_project(&self, project_id: i64) -> PortResult<()> {
        let mut tx = self.pool.begin().await.map_err(unexpected)?;

        sqlx::query("DELETE FROM questions WHERE project_id = ?")
            .bind(project_id)
            .execute(&mut *tx)
            .await
            .map_err(unexpected)?;
        sqlx::query("DELETE FROM documents WHERE project_id = ?")
            .bind(project_id)
            .execute(&mut *tx)
            .await
            .map_err(unexpected)?;
        let deleted = sqlx::query("DELETE FROM projects WHERE id = ?")
            .bind(project_id)
            .execute(&mut *tx)
            .await
            .map_err(unexpected)?
            .rows_affected();

        if deleted == 0 {
            // Dropping `tx` rolls back.
            return Err(project_not_found(project_id));
        }
        tx.commit().await.map_err(unexpected)?;
        Ok(())
    }

    async fn create_document(&self, project_id: i64, stored: &StoredFile) -> PortResult<Document> {
        self.ensure_project(project_id).await?;

        let record = sqlx::query_as::<_, DocumentRecord>(
            "INSERT INTO documents (project_id, filename, path, status, uploaded_at) \
             VALUES (?, ?, ?, ?, ?) \
             RETURNING id, project_id, filename, path, status, uploaded_at",
        )
        .bind(project_id)
        .bind(&stored.filename)
        .bind(&stored.path)
        .bind(DOCUMENT_STATUS_READY)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(insert_error(project_id))?;
        Ok(record.to_domain())
    }

    async fn list_documents(&self, project_id: i64) -> PortResult<Vec<Document>> {
        self.ensure_project(project_id).await?;

        let records = sqlx::query_as::<_, DocumentRecord>(
            "SELECT id, project_id, filename, path, status, uploaded_at FROM documents \
             WHERE project_id = ? ORDER BY id DESC",
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }

    async fn get_document(&self, project_id: i64, document_id: i64) -> PortResult<Document> {
        self.ensure_project(project_id).await?;

        let record = sqlx::query_as::<_, DocumentRecord>(
            "SELECT id, project_id, filename, path, status, uploaded_at FROM documents \
             WHERE id = ? AND project_id = ?",
        )
        .bind(document_id)
        .bind(project_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => {
                PortError::NotFound(format!("Document {} not found", document_id))
            }
            _ => unexpected(e),
        })?;
        Ok(record.to_domain())
    }

    async fn delete_document(&self, project_id: i64, document_id: i64) -> PortResult<()> {
        let deleted = sqlx::query("DELETE FROM documents WHERE id = ? AND project_id = ?")
            .bind(document_id)
            .bind(project_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?
            .rows_affected();

        if deleted == 0 {
            return Err(PortError::NotFound(format!(
                "Document {} not found",
                document_id
            )));
        }
        Ok(())
    }

    async fn create_question(
        &self,
        project_id: i64,
        question: &NewQuestion,
    ) -> PortResult<Question> {
        self.ensure_project(project_id).await?;

        let record = sqlx::query_as::<_, QuestionRecord>(
            "INSERT INTO questions (project_id, question, answer, created_at) VALUES (?, ?, ?, ?) \
             RETURNING id, project_id, question, answer, created_at",
        )
        .bind(project_id)
        .bind(question.text())
        .bind(PLACEHOLDER_ANSWER)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(insert_error(project_id))?;
        Ok(record.to_domain())
    }

    async fn list_questions(&self, project_id: i64) -> PortResult<Vec<Question>> {
        self.ensure_project(project_id).await?;

        let records = sqlx::query_as::<_, QuestionRecord>(
            "SELECT id, project_id, question, answer, created_at FROM questions \
             WHERE project_id = ? ORDER BY id ASC",
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    async fn adapter() -> DbAdapter {
        let db = DbAdapter::connect("sqlite::memory:").await.unwrap();
        db.run_migrations().await.unwrap();
        db
    }

    async fn project(db: &DbAdapter, name: &str) -> Project {
        db.create_project(&NewProject::parse(name, None).unwrap())
            .await
            .unwrap()
    }

    fn stored(name: &str) -> StoredFile {
        StoredFile {
            filename: name.to_string(),
            path: format!("uploads/x/{}", name),
        }
    }

    #[tokio::test]
    async fn project_ids_are_unique_and_listing_is_newest_first() {
        let db = adapter().await;
        let mut ids = HashSet::new();
        for i in 0..5 {
            let p = project(&db, &format!("p{}", i)).await;
            assert!(ids.insert(p.id), "duplicate id {}", p.id);
        }

        let listed = db.list_projects().await.unwrap();
        assert_eq!(listed.len(), 5);
        assert_eq!(listed[0].name, "p4");
        assert_eq!(listed[4].name, "p0");
    }

    #[tokio::test]
    async fn first_project_matches_expected_shape() {
        let db = adapter().await;
        let p = project(&db, "Capstone").await;
        assert_eq!(p.id, 1);
        assert_eq!(p.name, "Capstone");
        assert_eq!(p.description, None);
        assert_eq!(db.get_project(1).await.unwrap(), p);
    }

    #[tokio::test]
    async fn documents_are_isolated_per_project() {
        let db = adapter().await;
        let a = project(&db, "a").await;
        let b = project(&db, "b").await;

        db.create_document(a.id, &stored("one.pdf")).await.unwrap();
        db.create_document(a.id, &stored("two.pdf")).await.unwrap();
        db.create_document(b.id, &stored("three.pdf")).await.unwrap();

        let docs_a = db.list_documents(a.id).await.unwrap();
        let names: Vec<_> = docs_a.iter().map(|d| d.filename.as_str()).collect();
        assert_eq!(names, vec!["two.pdf", "one.pdf"]);
        assert!(docs_a.iter().all(|d| d.project_id == a.id));
        assert!(docs_a.iter().all(|d| d.status == DOCUMENT_STATUS_READY));

        let docs_b = db.list_documents(b.id).await.unwrap();
        assert_eq!(docs_b.len(), 1);
        assert_eq!(docs_b[0].filename, "three.pdf");
    }

    #[tokio::test]
    async fn writes_against_missing_project_fail_and_leave_no_rows() {
        let db = adapter().await;
        let real = project(&db, "real").await;

        let err = db.create_document(42, &stored("x.pdf")).await.unwrap_err();
        assert!(matches!(err, PortError::NotFound(_)));

        let q = NewQuestion::parse("anyone?").unwrap();
        let err = db.create_question(42, &q).await.unwrap_err();
        assert!(matches!(err, PortError::NotFound(_)));

        assert!(matches!(
            db.list_documents(42).await,
            Err(PortError::NotFound(_))
        ));
        assert!(matches!(
            db.list_questions(42).await,
            Err(PortError::NotFound(_))
        ));

        let docs: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM documents")
            .fetch_one(&db.pool)
            .await
            .unwrap();
        let questions: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM questions")
            .fetch_one(&db.pool)
            .await
            .unwrap();
        assert_eq!((docs, questions), (0, 0));
        assert!(db.list_documents(real.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn foreign_key_rejects_orphan_insert() {
        let db = adapter().await;
        let err = sqlx::query("INSERT INTO documents (project_id, filename, path) VALUES (9, 'a', 'b')")
            .execute(&db.pool)
            .await
            .unwrap_err();
        let mapped = insert_error(9)(err);
        assert!(matches!(mapped, PortError::NotFound(msg) if msg.contains('9')));
    }

    #[tokio::test]
    async fn every_question_gets_the_placeholder_answer() {
        let db = adapter().await;
        let p = project(&db, "qa").await;

        for text in ["What is this?", "How big is the array?", "¿Qué?"] {
            let q = db
                .create_question(p.id, &NewQuestion::parse(text).unwrap())
                .await
                .unwrap();
            assert_eq!(q.question, text);
            assert_eq!(q.answer, PLACEHOLDER_ANSWER);
        }

        let listed = db.list_questions(p.id).await.unwrap();
        let texts: Vec<_> = listed.iter().map(|q| q.question.as_str()).collect();
        assert_eq!(texts, vec!["What is this?", "How big is the array?", "¿Qué?"]);
    }

    #[tokio::test]
    async fn document_lookup_is_scoped_to_its_project() {
        let db = adapter().await;
        let a = project(&db, "a").await;
        let b = project(&db, "b").await;
        let doc = db.create_document(a.id, &stored("spec.pdf")).await.unwrap();

        assert_eq!(db.get_document(a.id, doc.id).await.unwrap(), doc);
        assert!(matches!(
            db.get_document(b.id, doc.id).await,
            Err(PortError::NotFound(_))
        ));
        assert!(matches!(
            db.delete_document(b.id, doc.id).await,
            Err(PortError::NotFound(_))
        ));

        db.delete_document(a.id, doc.id).await.unwrap();
        assert!(db.list_documents(a.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn deleting_a_project_removes_its_children_and_ids_are_not_reused() {
        let db = adapter().await;
        let doomed = project(&db, "doomed").await;
        let kept = project(&db, "kept").await;
        db.create_document(doomed.id, &stored("a.pdf")).await.unwrap();
        db.create_question(doomed.id, &NewQuestion::parse("q").unwrap())
            .await
            .unwrap();
        db.create_document(kept.id, &stored("b.pdf")).await.unwrap();

        db.delete_project(doomed.id).await.unwrap();

        assert!(matches!(
            db.get_project(doomed.id).await,
            Err(PortError::NotFound(_))
        ));
        assert!(matches!(
            db.delete_project(doomed.id).await,
            Err(PortError::NotFound(_))
        ));
        let orphans: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM documents WHERE project_id = ?")
                .bind(doomed.id)
                .fetch_one(&db.pool)
                .await
                .unwrap();
        assert_eq!(orphans, 0);
        assert_eq!(db.list_documents(kept.id).await.unwrap().len(), 1);

        let next = project(&db, "next").await;
        assert!(next.id > kept.id);
    }
}
