//! Student queries
//!
//! Everything the handlers ask of the `students` table.

use super::{Params, Store, StoreError};
use rusqlite::types::Value;
use rusqlite::Row;
use serde::Serialize;
use std::fmt::Write;

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS students (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    house TEXT NOT NULL
)";

const SEED: &[(&str, &str)] = &[
    ("Harry Potter", "Gryffindor"),
    ("Hermione Granger", "Gryffindor"),
    ("Luna Lovegood", "Ravenclaw"),
    ("Cedric Diggory", "Hufflepuff"),
    ("Draco Malfoy", "Slytherin"),
];

/// A stored student record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Student {
    pub id: i64,
    pub name: String,
    pub house: String,
}

/// Public projection used by the JSON API
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StudentSummary {
    pub name: String,
    pub house: String,
}

impl From<Student> for StudentSummary {
    fn from(student: Student) -> Self {
        Self {
            name: student.name,
            house: student.house,
        }
    }
}

/// Validated fields for an insert or update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStudent {
    pub name: String,
    pub house: String,
}

/// Listing order selected by `?order=`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Order {
    #[default]
    Id,
    NameAsc,
    NameDesc,
}

impl Order {
    pub fn from_query(value: Option<&str>) -> Self {
        match value {
            Some("abc") => Self::NameAsc,
            Some("zyx") => Self::NameDesc,
            _ => Self::Id,
        }
    }

    const fn sql(self) -> &'static str {
        match self {
            Self::Id => "SELECT id, name, house FROM students ORDER BY id",
            Self::NameAsc => {
                "SELECT id, name, house FROM students \
                 ORDER BY name COLLATE NOCASE ASC, id"
            }
            Self::NameDesc => {
                "SELECT id, name, house FROM students \
                 ORDER BY name COLLATE NOCASE DESC, id"
            }
        }
    }

    pub const fn as_query(self) -> &'static str {
        match self {
            Self::Id => "",
            Self::NameAsc => "abc",
            Self::NameDesc => "zyx",
        }
    }
}

fn student_from_row(row: &Row<'_>) -> rusqlite::Result<Student> {
    Ok(Student {
        id: row.get(0)?,
        name: row.get(1)?,
        house: row.get(2)?,
    })
}

fn fields(student: &NewStudent) -> Params {
    vec![
        Value::Text(student.name.clone()),
        Value::Text(student.house.clone()),
    ]
}

pub async fn init_schema(store: &Store) -> Result<(), StoreError> {
    store.execute_batch(SCHEMA).await
}

/// Insert the sample students if the table is empty; returns rows added
pub async fn seed_if_empty(store: &Store) -> Result<usize, StoreError> {
    let count = store
        .get("SELECT COUNT(*) FROM students", Vec::new(), |row| {
            row.get::<_, i64>(0)
        })
        .await?
        .unwrap_or(0);
    if count > 0 {
        return Ok(0);
    }

    for (name, house) in SEED {
        store
            .run(
                "INSERT INTO students (name, house) VALUES (?1, ?2)",
                vec![Value::from((*name).to_string()), Value::from((*house).to_string())],
            )
            .await?;
    }
    Ok(SEED.len())
}

pub async fn list(store: &Store, order: Order) -> Result<Vec<Student>, StoreError> {
    store.all(order.sql(), Vec::new(), student_from_row).await
}

pub async fn find(store: &Store, id: i64) -> Result<Option<Student>, StoreError> {
    store
        .get(
            "SELECT id, name, house FROM students WHERE id = ?1",
            vec![Value::Integer(id)],
            student_from_row,
        )
        .await
}

/// Insert a student, returning its id
pub async fn insert(store: &Store, student: &NewStudent) -> Result<i64, StoreError> {
    let execution = store
        .run(
            "INSERT INTO students (name, house) VALUES (?1, ?2)",
            fields(student),
        )
        .await?;
    Ok(execution.last_insert_id)
}

/// Update a student; `false` when no row has that id
pub async fn update(store: &Store, id: i64, student: &NewStudent) -> Result<bool, StoreError> {
    let mut params = fields(student);
    params.push(Value::Integer(id));
    let execution = store
        .run("UPDATE students SET name = ?1, house = ?2 WHERE id = ?3", params)
        .await?;
    Ok(execution.changes > 0)
}

/// Delete a student; `false` when no row has that id
pub async fn delete(store: &Store, id: i64) -> Result<bool, StoreError> {
    let execution = store
        .run("DELETE FROM students WHERE id = ?1", vec![Value::Integer(id)])
        .await?;
    Ok(execution.changes > 0)
}

/// Students whose name contains `term`; ASCII case-insensitive
pub async fn search(store: &Store, term: &str) -> Result<Vec<Student>, StoreError> {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    store
        .all(
            "SELECT id, name, house FROM students WHERE name LIKE ?1 ESCAPE '\\' \
             ORDER BY name COLLATE NOCASE, id",
            vec![Value::Text(format!("%{escaped}%"))],
            student_from_row,
        )
        .await
}

/// Render students as CSV with an `id,name,house` header
pub fn to_csv(students: &[Student]) -> String {
    let mut out = String::from("id,name,house\n");
    for student in students {
        let _ = writeln!(
            out,
            "{},{},{}",
            student.id,
            csv_field(&student.name),
            csv_field(&student.house)
        );
    }
    out
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
