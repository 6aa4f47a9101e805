// ============================
// crates/backend-lib/src/member/store.rs
// ============================
//! Member storage abstraction with flat-file implementation.
use crate::error::AppError;
use crate::member::model::{Member, NewMember};
use crate::validation::validate_login_id;
use async_trait::async_trait;
use std::io::{self, ErrorKind};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::{fs, path::{Path, PathBuf}};
use tokio::fs as tokio_fs;
use tracing::warn;

const EMAIL_INDEX_DIR: &str = "by-email";

/// Trait for member storage backends
#[async_trait]
pub trait MemberStore: Send + Sync {
    /// Insert a new member, failing with `DuplicateMember` if the login id or
    /// email is taken
    async fn insert(&self, member: NewMember) -> Result<Member, AppError>;

    /// Look up a member by login id
    async fn find_by_login_id(&self, login_id: &str) -> Result<Option<Member>, AppError>;

    /// Replace a member's password hash
    async fn update_password(&self, login_id: &str, password_hash: &str) -> Result<(), AppError>;
}

/// Flat-file implementation of the `MemberStore` trait.
///
/// One JSON document per member under `<root>/members/<login_id>.json`, plus
/// an email reservation under `<root>/members/by-email/<email>` holding the
/// owning login id.
#[derive(Clone)]
pub struct FlatFileMemberStore {
    root: PathBuf,
    next_id: Arc<AtomicI64>,
}

impl FlatFileMemberStore {
    pub fn new<P: AsRef<Path>>(root: P) -> anyhow::Result<Self> {
        let root = root.as_ref().join("members");
        fs::create_dir_all(root.join(EMAIL_INDEX_DIR))?;

        // Resume id assignment after the highest stored id
        let mut max_id = 0;
        for entry in fs::read_dir(&root)? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                let member: Member = serde_json::from_slice(&fs::read(&path)?)?;
                max_id = max_id.max(member.id);
            }
        }

        Ok(Self {
            root,
            next_id: Arc::new(AtomicI64::new(max_id + 1)),
        })
    }

    fn member_path(&self, login_id: &str) -> PathBuf {
        self.root.join(format!("{login_id}.json"))
    }

    /// Emails are unique regardless of case
    fn email_path(&self, email: &str) -> PathBuf {
        self.root.join(EMAIL_INDEX_DIR).join(email.to_ascii_lowercase())
    }

    fn temp_path(&self) -> PathBuf {
        self.root.join(format!(".{}.tmp", uuid::Uuid::new_v4()))
    }

    async fn write_temp(&self, contents: Vec<u8>) -> Result<PathBuf, AppError> {
        let temp = self.temp_path();
        if let Err(e) = tokio_fs::write(&temp, contents).await {
            remove_quietly(&temp).await;
            return Err(e.into());
        }
        Ok(temp)
    }

    /// Write `contents` to `target` only if `target` does not exist yet.
    ///
    /// The complete file is written aside and hard-linked into place, so
    /// readers never see a partial document.
    async fn create_exclusive(&self, target: &Path, contents: Vec<u8>) -> Result<io::Result<()>, AppError> {
        let temp = self.write_temp(contents).await?;
        let linked = tokio_fs::hard_link(&temp, target).await;
        remove_quietly(&temp).await;
        Ok(linked)
    }

    async fn publish_member(&self, member: &Member) -> Result<(), AppError> {
        let document = serde_json::to_vec_pretty(member)?;
        match self
            .create_exclusive(&self.member_path(&member.login_id), document)
            .await?
        {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                Err(AppError::DuplicateMember(member.login_id.clone()))
            },
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl MemberStore for FlatFileMemberStore {
    async fn insert(&self, member: NewMember) -> Result<Member, AppError> {
        let member = Member {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            login_id: member.login_id.as_str().to_string(),
            password_hash: member.password_hash,
            name: member.name.as_str().to_string(),
            birth_date: member.birth_date,
            email: member.email.as_str().to_string(),
        };

        let email_path = self.email_path(&member.email);
        match self
            .create_exclusive(&email_path, member.login_id.clone().into_bytes())
            .await?
        {
            Ok(()) => {},
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(AppError::DuplicateMember(member.email));
            },
            Err(e) => return Err(e.into()),
        }

        match self.publish_member(&member).await {
            Ok(()) => Ok(member),
            Err(e) => {
                // Release the email for the next attempt
                remove_quietly(&email_path).await;
                Err(e)
            },
        }
    }

    async fn find_by_login_id(&self, login_id: &str) -> Result<Option<Member>, AppError> {
        // Anything else cannot name a stored member and must not reach the filesystem
        if validate_login_id(login_id).is_err() {
            return Ok(None);
        }

        match tokio_fs::read(self.member_path(login_id)).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn update_password(&self, login_id: &str, password_hash: &str) -> Result<(), AppError> {
        let mut member = self
            .find_by_login_id(login_id)
            .await?
            .ok_or(AppError::MemberNotFound)?;
        member.password_hash = password_hash.to_string();

        let temp = self.write_temp(serde_json::to_vec_pretty(&member)?).await?;
        if let Err(e) = tokio_fs::rename(&temp, self.member_path(login_id)).await {
            remove_quietly(&temp).await;
            return Err(e.into());
        }
        Ok(())
    }
}

/// Best-effort cleanup; a leftover file is logged, never an error
async fn remove_quietly(path: &Path) {
    match tokio_fs::remove_file(path).await {
        Ok(()) => {},
        Err(e) if e.kind() == ErrorKind::NotFound => {},
        Err(e) => warn!(path = %path.display(), error = %e, "failed to remove file"),
    }
}
