//! Member collection repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist the full reconciled collection atomically.
//! - Load the collection back in stored order with derived links rebuilt.
//!
//! # Invariants
//! - `replace_all` is all-or-nothing: one transaction replaces the whole
//!   stored collection.
//! - Load order is deterministic: `position ASC, member_id ASC`.
//! - Loaded `children` always satisfy parent/child symmetry, whatever was
//!   stored.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::member::{
    rebuild_children, FamilyMember, MemberId, MemberValidationError, TextOverrides,
};
use chrono::NaiveDate;
use log::info;
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};

const DATE_FORMAT: &str = "%Y-%m-%d";

const MEMBER_SELECT_SQL: &str = "SELECT
    member_id,
    name,
    birth_date,
    death_date,
    birthplace,
    bio,
    photo_url,
    photo_hint,
    parent1_id,
    parent2_id,
    spouse_id,
    name_overridden,
    birthplace_overridden,
    bio_overridden
 FROM members
 ORDER BY position ASC, member_id ASC;";

/// Result type for member repository operations.
pub type MemberRepoResult<T> = Result<T, MemberRepoError>;

/// Errors from member persistence operations.
#[derive(Debug)]
pub enum MemberRepoError {
    /// A record failed validation before write.
    Validation(MemberValidationError),
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Required column is missing from expected table.
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    /// Persisted data cannot be converted into a valid record.
    InvalidData(String),
}

impl Display for MemberRepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "member repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "member repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "member repository requires column `{column}` in table `{table}`"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted member data: {message}"),
        }
    }
}

impl Error for MemberRepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<MemberValidationError> for MemberRepoError {
    fn from(value: MemberValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for MemberRepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for MemberRepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Storage contract for the member collection.
///
/// The in-memory collection is the source of truth; stored data is a
/// downstream mirror replaced wholesale on every save.
pub trait MemberRepository {
    /// Atomically replaces the stored collection.
    fn replace_all(&self, members: &[FamilyMember]) -> MemberRepoResult<()>;
    /// Loads the stored collection in stored order.
    fn load_all(&self) -> MemberRepoResult<Vec<FamilyMember>>;
    /// Returns the number of stored members.
    fn count(&self) -> MemberRepoResult<u64>;
}

/// SQLite-backed member repository.
pub struct SqliteMemberRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteMemberRepository<'conn> {
    /// Creates a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> MemberRepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl MemberRepository for SqliteMemberRepository<'_> {
    fn replace_all(&self, members: &[FamilyMember]) -> MemberRepoResult<()> {
        for member in members {
            member.validate()?;
        }

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        tx.execute("DELETE FROM members;", [])?;
        for (position, member) in members.iter().enumerate() {
            tx.execute(
                "INSERT INTO members (
                    member_id,
                    position,
                    name,
                    birth_date,
                    death_date,
                    birthplace,
                    bio,
                    photo_url,
                    photo_hint,
                    parent1_id,
                    parent2_id,
                    spouse_id,
                    name_overridden,
                    birthplace_overridden,
                    bio_overridden
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15);",
                params![
                    member.id,
                    position as i64,
                    member.name,
                    member.birth_date.format(DATE_FORMAT).to_string(),
                    member
                        .death_date
                        .map(|date| date.format(DATE_FORMAT).to_string()),
                    member.birthplace,
                    member.bio,
                    member.photo_url,
                    member.photo_hint,
                    member.parents.first(),
                    member.parents.get(1),
                    member.spouse,
                    member.overrides.name as i64,
                    member.overrides.birthplace as i64,
                    member.overrides.bio as i64,
                ],
            )?;
        }
        tx.commit()?;

        info!(
            "event=collection_store module=repo status=ok members={}",
            members.len()
        );
        Ok(())
    }

    fn load_all(&self) -> MemberRepoResult<Vec<FamilyMember>> {
        let mut stmt = self.conn.prepare(MEMBER_SELECT_SQL)?;
        let mut rows = stmt.query([])?;

        let mut members = Vec::new();
        while let Some(row) = rows.next()? {
            members.push(parse_member_row(row)?);
        }
        // Children are not stored; rebuild them so symmetry holds even for
        // data written by older or foreign tools.
        rebuild_children(&mut members);
        Ok(members)
    }

    fn count(&self) -> MemberRepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM members;", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}

fn parse_member_row(row: &Row<'_>) -> MemberRepoResult<FamilyMember> {
    let birth_date_text: String = row.get("birth_date")?;
    let birth_date = parse_date(&birth_date_text, "members.birth_date")?;
    let death_date = row
        .get::<_, Option<String>>("death_date")?
        .map(|value| parse_date(&value, "members.death_date"))
        .transpose()?;

    let mut parents: Vec<MemberId> = Vec::new();
    for column in ["parent1_id", "parent2_id"] {
        if let Some(parent_id) = row.get::<_, Option<String>>(column)? {
            parents.push(parent_id);
        }
    }

    Ok(FamilyMember {
        id: row.get("member_id")?,
        name: row.get("name")?,
        birth_date,
        death_date,
        birthplace: row.get("birthplace")?,
        bio: row.get("bio")?,
        photo_url: row.get("photo_url")?,
        photo_hint: row.get("photo_hint")?,
        parents,
        spouse: row.get("spouse_id")?,
        children: Vec::new(),
        overrides: TextOverrides {
            name: parse_flag(row, "name_overridden")?,
            birthplace: parse_flag(row, "birthplace_overridden")?,
            bio: parse_flag(row, "bio_overridden")?,
        },
    })
}

fn parse_date(value: &str, column: &'static str) -> MemberRepoResult<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|_| MemberRepoError::InvalidData(format!("invalid date `{value}` in {column}")))
}

fn parse_flag(row: &Row<'_>, column: &'static str) -> MemberRepoResult<bool> {
    match row.get::<_, i64>(column)? {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(MemberRepoError::InvalidData(format!(
            "invalid flag value `{other}` in members.{column}"
        ))),
    }
}

fn ensure_connection_ready(conn: &Connection) -> MemberRepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(MemberRepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, "members")? {
        return Err(MemberRepoError::MissingRequiredTable("members"));
    }
    for column in [
        "member_id",
        "position",
        "name",
        "birth_date",
        "death_date",
        "birthplace",
        "bio",
        "photo_url",
        "photo_hint",
        "parent1_id",
        "parent2_id",
        "spouse_id",
        "name_overridden",
        "birthplace_overridden",
        "bio_overridden",
    ] {
        if !table_has_column(conn, "members", column)? {
            return Err(MemberRepoError::MissingRequiredColumn {
                table: "members",
                column,
            });
        }
    }
    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> MemberRepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> MemberRepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
