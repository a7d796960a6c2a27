//! SQLite implementation of the backend client.

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::Utc;
use rusqlite::types::Type;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Mutex, MutexGuard, RwLock};
use std::time::Duration;
use uuid::Uuid;

use super::error::{BackendError, BackendResult};
use super::records::{
    AuthUser, NewPrompt, NewRepository, Profile, Prompt, PromptChanges, RepositoryRecord, Rpc,
};
use super::{schema, Backend};

const REPOSITORY_COLUMNS: &str = "id, name, description, owner_id, is_private, tags, license, \
     category, stars_count, forks_count, forked_from, created_at, updated_at";

const PROMPT_COLUMNS: &str = "p.id, p.repository_id, p.name, p.content, p.description, \
     p.file_path, p.size, p.created_at, p.updated_at";

const MIN_PASSWORD_LEN: usize = 6;

/// Relational backend stored in a single SQLite database.
///
/// The backend carries its own session: [`SqliteBackend::sign_in`] attaches a
/// user, and every row-level rule is evaluated against that user.
pub struct SqliteBackend {
    conn: Mutex<Connection>,
    session: RwLock<Option<AuthUser>>,
}

impl SqliteBackend {
    /// Opens (or creates) the database file at `path`.
    pub fn open(path: &Path) -> BackendResult<Self> {
        Self::from_connection(Connection::open(path)?)
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> BackendResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> BackendResult<Self> {
        conn.busy_timeout(Duration::from_secs(5))?;
        schema::initialize(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            session: RwLock::new(None),
        })
    }

    /// Registers a new account, creates its profile and signs it in.
    ///
    /// The profile username is the `username` metadata when given, otherwise
    /// the local part of the email.
    pub fn sign_up(
        &self,
        email: &str,
        password: &str,
        username: Option<&str>,
    ) -> BackendResult<AuthUser> {
        let email = email.trim().to_lowercase();
        if email.is_empty() || !email.contains('@') {
            return Err(BackendError::Auth("A valid email is required".to_string()));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(BackendError::Auth(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }

        let user = AuthUser {
            id: Uuid::new_v4().to_string(),
            email,
            username: username
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        };
        let profile_username = user
            .preferred_username()
            .ok_or_else(|| BackendError::Auth("Could not derive a username".to_string()))?;
        let password_hash = hash_password(password)?;

        {
            let mut conn = self.conn()?;
            let tx = conn.transaction()?;
            tx.execute(
                "INSERT INTO auth_users (id, email, password_hash, username, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![user.id, user.email, password_hash, user.username, Utc::now()],
            )?;
            tx.execute(
                "INSERT INTO profiles (id, username, email) VALUES (?1, ?2, ?3)",
                params![user.id, profile_username, user.email],
            )?;
            tx.commit()?;
        }

        tracing::info!(user_id = %user.id, username = %profile_username, "user signed up");
        self.set_session(Some(user.clone()))?;
        Ok(user)
    }

    /// Verifies credentials and attaches the user to the session.
    pub fn sign_in(&self, email: &str, password: &str) -> BackendResult<AuthUser> {
        let email = email.trim().to_lowercase();
        let row = self
            .conn()?
            .query_row(
                "SELECT id, email, password_hash, username FROM auth_users WHERE email = ?1",
                params![email],
                |row| {
                    Ok((
                        AuthUser {
                            id: row.get(0)?,
                            email: row.get(1)?,
                            username: row.get(3)?,
                        },
                        row.get::<_, String>(2)?,
                    ))
                },
            )
            .optional()?;

        let invalid = || BackendError::Auth("Invalid login credentials".to_string());
        let (user, stored_hash) = row.ok_or_else(invalid)?;
        if !verify_password(password, &stored_hash)? {
            tracing::warn!(email = %email, "rejected sign-in attempt");
            return Err(invalid());
        }

        tracing::info!(user_id = %user.id, "user signed in");
        self.set_session(Some(user.clone()))?;
        Ok(user)
    }

    /// Re-attaches a previously signed-in user. Returns `None` when the
    /// account no longer exists.
    pub fn resume_session(&self, user_id: &str) -> BackendResult<Option<AuthUser>> {
        let user = self
            .conn()?
            .query_row(
                "SELECT id, email, username FROM auth_users WHERE id = ?1",
                params![user_id],
                |row| {
                    Ok(AuthUser {
                        id: row.get(0)?,
                        email: row.get(1)?,
                        username: row.get(2)?,
                    })
                },
            )
            .optional()?;
        self.set_session(user.clone())?;
        Ok(user)
    }

    pub fn sign_out(&self) -> BackendResult<()> {
        self.set_session(None)
    }

    #[cfg(test)]
    pub(crate) fn execute_raw(&self, sql: &str) -> BackendResult<()> {
        self.conn()?.execute_batch(sql)?;
        Ok(())
    }

    fn conn(&self) -> BackendResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| BackendError::Poisoned)
    }

    fn set_session(&self, user: Option<AuthUser>) -> BackendResult<()> {
        *self.session.write().map_err(|_| BackendError::Poisoned)? = user;
        Ok(())
    }

    fn uid(&self) -> BackendResult<Option<String>> {
        Ok(self
            .session
            .read()
            .map_err(|_| BackendError::Poisoned)?
            .as_ref()
            .map(|u| u.id.clone()))
    }

    fn require_uid(&self) -> BackendResult<String> {
        self.uid()?.ok_or(BackendError::NotAuthenticated)
    }

    /// Owner of the repository a prompt belongs to.
    fn prompt_owner(conn: &Connection, prompt_id: &str) -> BackendResult<(String, String)> {
        conn.query_row(
            "SELECT r.id, r.owner_id FROM prompts p
             JOIN repositories r ON r.id = p.repository_id
             WHERE p.id = ?1",
            params![prompt_id],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()?
        .ok_or_else(|| BackendError::NotFound(format!("prompt {}", prompt_id)))
    }

    fn touch_repository(conn: &Connection, repository_id: &str) -> BackendResult<()> {
        conn.execute(
            "UPDATE repositories SET updated_at = ?2 WHERE id = ?1",
            params![repository_id, Utc::now()],
        )?;
        Ok(())
    }

    fn read_prompt(conn: &Connection, id: &str, uid: &str) -> BackendResult<Option<Prompt>> {
        let sql = format!(
            "SELECT {} FROM prompts p
             JOIN repositories r ON r.id = p.repository_id
             WHERE p.id = ?1 AND (r.is_private = 0 OR r.owner_id = ?2)",
            PROMPT_COLUMNS
        );
        Ok(conn
            .query_row(&sql, params![id, uid], row_to_prompt)
            .optional()?)
    }
}

fn rls_violation(table: &str) -> BackendError {
    BackendError::PermissionDenied(format!(
        "new row violates row-level security policy for table \"{}\"",
        table
    ))
}

fn hash_password(password: &str) -> BackendResult<String> {
    let salt = SaltString::generate(&mut rand::rngs::OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| BackendError::Auth(format!("Password hashing failed: {}", e)))
}

fn verify_password(password: &str, stored: &str) -> BackendResult<bool> {
    let parsed = PasswordHash::new(stored)
        .map_err(|e| BackendError::Corrupted(format!("password hash: {}", e)))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

fn row_to_repository(row: &Row) -> rusqlite::Result<RepositoryRecord> {
    let tags_json: String = row.get(5)?;
    let tags: Vec<String> = serde_json::from_str(&tags_json)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(5, Type::Text, Box::new(e)))?;
    Ok(RepositoryRecord {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        owner_id: row.get(3)?,
        is_private: row.get(4)?,
        tags,
        license: row.get(6)?,
        category: row.get(7)?,
        stars_count: row.get(8)?,
        forks_count: row.get(9)?,
        forked_from: row.get(10)?,
        created_at: row.get(11)?,
        updated_at: row.get(12)?,
    })
}

fn row_to_prompt(row: &Row) -> rusqlite::Result<Prompt> {
    Ok(Prompt {
        id: row.get(0)?,
        repository_id: row.get(1)?,
        name: row.get(2)?,
        content: row.get(3)?,
        description: row.get(4)?,
        file_path: row.get(5)?,
        size: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

fn row_to_profile(row: &Row) -> rusqlite::Result<Profile> {
    Ok(Profile {
        id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
    })
}

impl Backend for SqliteBackend {
    fn current_user(&self) -> BackendResult<Option<AuthUser>> {
        Ok(self
            .session
            .read()
            .map_err(|_| BackendError::Poisoned)?
            .clone())
    }

    fn select_profile(&self, id: &str) -> BackendResult<Option<Profile>> {
        Ok(self
            .conn()?
            .query_row(
                "SELECT id, username, email FROM profiles WHERE id = ?1",
                params![id],
                row_to_profile,
            )
            .optional()?)
    }

    fn select_profiles(&self, ids: &[String]) -> BackendResult<Vec<Profile>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let placeholders = vec!["?"; ids.len()].join(", ");
        let sql = format!(
            "SELECT id, username, email FROM profiles WHERE id IN ({})",
            placeholders
        );
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(ids.iter()), row_to_profile)?;
        let mut profiles = Vec::new();
        for profile in rows {
            profiles.push(profile?);
        }
        Ok(profiles)
    }

    fn select_profiles_by_username(&self, username: &str) -> BackendResult<Vec<Profile>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT id, username, email FROM profiles WHERE username = ?1")?;
        let rows = stmt.query_map(params![username], row_to_profile)?;
        let mut profiles = Vec::new();
        for profile in rows {
            profiles.push(profile?);
        }
        Ok(profiles)
    }

    fn upsert_profile(&self, profile: &Profile) -> BackendResult<()> {
        if self.require_uid()? != profile.id {
            return Err(rls_violation("profiles"));
        }
        self.conn()?.execute(
            "INSERT INTO profiles (id, username, email) VALUES (?1, ?2, ?3)
             ON CONFLICT(id) DO UPDATE SET username = excluded.username, email = excluded.email",
            params![profile.id, profile.username, profile.email],
        )?;
        tracing::debug!(profile_id = %profile.id, "profile upserted");
        Ok(())
    }

    fn select_public_repositories(&self) -> BackendResult<Vec<RepositoryRecord>> {
        let sql = format!(
            "SELECT {} FROM repositories WHERE is_private = 0
             ORDER BY created_at DESC, rowid DESC",
            REPOSITORY_COLUMNS
        );
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map([], row_to_repository)?;
        let mut repos = Vec::new();
        for repo in rows {
            repos.push(repo?);
        }
        Ok(repos)
    }

    fn select_repository(&self, id: &str) -> BackendResult<Option<RepositoryRecord>> {
        let uid = self.uid()?.unwrap_or_default();
        let sql = format!(
            "SELECT {} FROM repositories WHERE id = ?1 AND (is_private = 0 OR owner_id = ?2)",
            REPOSITORY_COLUMNS
        );
        Ok(self
            .conn()?
            .query_row(&sql, params![id, uid], row_to_repository)
            .optional()?)
    }

    fn select_repositories_by_owner(
        &self,
        owner_id: &str,
        name: &str,
    ) -> BackendResult<Vec<RepositoryRecord>> {
        let uid = self.uid()?.unwrap_or_default();
        let sql = format!(
            "SELECT {} FROM repositories
             WHERE owner_id = ?1 AND name = ?2 AND (is_private = 0 OR owner_id = ?3)",
            REPOSITORY_COLUMNS
        );
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params![owner_id, name, uid], row_to_repository)?;
        let mut repos = Vec::new();
        for repo in rows {
            repos.push(repo?);
        }
        Ok(repos)
    }

    fn insert_repository(&self, repo: &NewRepository) -> BackendResult<RepositoryRecord> {
        if self.require_uid()? != repo.owner_id {
            return Err(rls_violation("repositories"));
        }
        let now = Utc::now();
        let record = RepositoryRecord {
            id: Uuid::new_v4().to_string(),
            name: repo.name.clone(),
            description: repo.description.clone(),
            owner_id: repo.owner_id.clone(),
            is_private: repo.is_private,
            tags: repo.tags.clone(),
            license: repo.license.clone(),
            category: repo.category.clone(),
            stars_count: 0,
            forks_count: 0,
            forked_from: repo.forked_from.clone(),
            created_at: now,
            updated_at: now,
        };
        let tags_json = serde_json::to_string(&record.tags)
            .map_err(|e| BackendError::Corrupted(format!("tags: {}", e)))?;

        self.conn()?.execute(
            "INSERT INTO repositories (id, name, description, owner_id, is_private, tags, license,
                 category, stars_count, forks_count, forked_from, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 0, 0, ?9, ?10, ?10)",
            params![
                record.id,
                record.name,
                record.description,
                record.owner_id,
                record.is_private,
                tags_json,
                record.license,
                record.category,
                record.forked_from,
                now
            ],
        )?;
        tracing::debug!(repository_id = %record.id, name = %record.name, "repository inserted");
        Ok(record)
    }

    fn star_exists(&self, user_id: &str, repository_id: &str) -> BackendResult<bool> {
        let count: i64 = self.conn()?.query_row(
            "SELECT COUNT(*) FROM stars WHERE user_id = ?1 AND repository_id = ?2",
            params![user_id, repository_id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    fn select_starred_ids(&self, user_id: &str) -> BackendResult<Vec<String>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT repository_id FROM stars WHERE user_id = ?1")?;
        let rows = stmt.query_map(params![user_id], |row| row.get(0))?;
        let mut ids = Vec::new();
        for id in rows {
            ids.push(id?);
        }
        Ok(ids)
    }

    fn insert_star(&self, user_id: &str, repository_id: &str) -> BackendResult<()> {
        let uid = self.require_uid()?;
        if uid != user_id {
            return Err(rls_violation("stars"));
        }
        let conn = self.conn()?;
        let visible: i64 = conn.query_row(
            "SELECT COUNT(*) FROM repositories WHERE id = ?1 AND (is_private = 0 OR owner_id = ?2)",
            params![repository_id, uid],
            |row| row.get(0),
        )?;
        if visible == 0 {
            return Err(BackendError::NotFound(format!("repository {}", repository_id)));
        }
        conn.execute(
            "INSERT INTO stars (user_id, repository_id, created_at) VALUES (?1, ?2, ?3)",
            params![user_id, repository_id, Utc::now()],
        )?;
        Ok(())
    }

    fn delete_star(&self, user_id: &str, repository_id: &str) -> BackendResult<usize> {
        if self.require_uid()? != user_id {
            return Err(rls_violation("stars"));
        }
        Ok(self.conn()?.execute(
            "DELETE FROM stars WHERE user_id = ?1 AND repository_id = ?2",
            params![user_id, repository_id],
        )?)
    }

    fn rpc(&self, call: &Rpc) -> BackendResult<()> {
        let sql = match call {
            Rpc::IncrementStarsCount(_) => {
                "UPDATE repositories SET stars_count = stars_count + 1 WHERE id = ?1"
            }
            Rpc::DecrementStarsCount(_) => {
                "UPDATE repositories SET stars_count = MAX(stars_count - 1, 0) WHERE id = ?1"
            }
            Rpc::IncrementForksCount(_) => {
                "UPDATE repositories SET forks_count = forks_count + 1 WHERE id = ?1"
            }
            Rpc::RecountStars(_) => {
                "UPDATE repositories
                 SET stars_count = (SELECT COUNT(*) FROM stars WHERE repository_id = ?1)
                 WHERE id = ?1"
            }
        };
        let changed = self.conn()?.execute(sql, params![call.repository_id()])?;
        if changed == 0 {
            return Err(BackendError::NotFound(format!(
                "repository {}",
                call.repository_id()
            )));
        }
        tracing::debug!(rpc = call.name(), repository_id = call.repository_id(), "rpc executed");
        Ok(())
    }

    fn select_prompts(&self, repository_id: &str) -> BackendResult<Vec<Prompt>> {
        let uid = self.uid()?.unwrap_or_default();
        let sql = format!(
            "SELECT {} FROM prompts p
             JOIN repositories r ON r.id = p.repository_id
             WHERE p.repository_id = ?1 AND (r.is_private = 0 OR r.owner_id = ?2)
             ORDER BY p.created_at DESC, p.rowid DESC",
            PROMPT_COLUMNS
        );
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params![repository_id, uid], row_to_prompt)?;
        let mut prompts = Vec::new();
        for prompt in rows {
            prompts.push(prompt?);
        }
        Ok(prompts)
    }

    fn select_prompt(&self, id: &str) -> BackendResult<Option<Prompt>> {
        let uid = self.uid()?.unwrap_or_default();
        let conn = self.conn()?;
        Self::read_prompt(&conn, id, &uid)
    }

    fn insert_prompt(&self, prompt: &NewPrompt) -> BackendResult<Prompt> {
        let uid = self.require_uid()?;
        let conn = self.conn()?;
        let owner: Option<String> = conn
            .query_row(
                "SELECT owner_id FROM repositories WHERE id = ?1",
                params![prompt.repository_id],
                |row| row.get(0),
            )
            .optional()?;
        match owner {
            None => {
                return Err(BackendError::NotFound(format!(
                    "repository {}",
                    prompt.repository_id
                )))
            }
            Some(owner) if owner != uid => return Err(rls_violation("prompts")),
            Some(_) => {}
        }

        let now = Utc::now();
        let record = Prompt {
            id: Uuid::new_v4().to_string(),
            repository_id: prompt.repository_id.clone(),
            name: prompt.name.clone(),
            content: prompt.content.clone(),
            description: prompt.description.clone(),
            file_path: prompt.file_path.clone(),
            size: prompt.size,
            created_at: now,
            updated_at: now,
        };
        conn.execute(
            "INSERT INTO prompts (id, repository_id, name, content, description, file_path, size,
                 created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)",
            params![
                record.id,
                record.repository_id,
                record.name,
                record.content,
                record.description,
                record.file_path,
                record.size,
                now
            ],
        )?;
        Self::touch_repository(&conn, &record.repository_id)?;
        tracing::debug!(prompt_id = %record.id, repository_id = %record.repository_id, "prompt inserted");
        Ok(record)
    }

    fn update_prompt(&self, id: &str, changes: &PromptChanges) -> BackendResult<Prompt> {
        let uid = self.require_uid()?;
        let conn = self.conn()?;
        let (repository_id, owner_id) = Self::prompt_owner(&conn, id)?;
        if owner_id != uid {
            return Err(rls_violation("prompts"));
        }

        conn.execute(
            "UPDATE prompts SET
                 name = COALESCE(?2, name),
                 content = COALESCE(?3, content),
                 description = COALESCE(?4, description),
                 file_path = COALESCE(?5, file_path),
                 size = COALESCE(?6, size),
                 updated_at = ?7
             WHERE id = ?1",
            params![
                id,
                changes.name,
                changes.content,
                changes.description,
                changes.file_path,
                changes.size,
                Utc::now()
            ],
        )?;
        Self::touch_repository(&conn, &repository_id)?;

        Self::read_prompt(&conn, id, &uid)?
            .ok_or_else(|| BackendError::NotFound(format!("prompt {}", id)))
    }

    fn delete_prompt(&self, id: &str) -> BackendResult<()> {
        let uid = self.require_uid()?;
        let conn = self.conn()?;
        let (repository_id, owner_id) = Self::prompt_owner(&conn, id)?;
        if owner_id != uid {
            return Err(rls_violation("prompts"));
        }
        conn.execute("DELETE FROM prompts WHERE id = ?1", params![id])?;
        Self::touch_repository(&conn, &repository_id)?;
        Ok(())
    }
}
