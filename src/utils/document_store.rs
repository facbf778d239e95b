// holiflow-service/src/utils/document_store.rs
//
// One directory per collection, one pretty-printed JSON file per document.
use crate::models::{
    AccessLog, Invitation, Notification, ServiceError, Team, TeamMember, User, VacationPeriod,
};
use lazy_static::lazy_static;
use log::{debug, error, info, warn};
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

lazy_static! {
    static ref DOCUMENT_ID: Regex = Regex::new(r"^[A-Za-z0-9_-]{1,64}$").unwrap();
}

pub const COLLECTIONS: [&str; 7] = [
    User::COLLECTION,
    Team::COLLECTION,
    TeamMember::COLLECTION,
    Invitation::COLLECTION,
    VacationPeriod::COLLECTION,
    Notification::COLLECTION,
    AccessLog::COLLECTION,
];

// A record that lives in a named collection under its own id
pub trait Document: Serialize + DeserializeOwned {
    const COLLECTION: &'static str;

    fn id(&self) -> &str;
}

impl Document for User {
    const COLLECTION: &'static str = "users";
    fn id(&self) -> &str { &self.id }
}

impl Document for Team {
    const COLLECTION: &'static str = "teams";
    fn id(&self) -> &str { &self.id }
}

impl Document for TeamMember {
    const COLLECTION: &'static str = "team_members";
    fn id(&self) -> &str { &self.id }
}

impl Document for Invitation {
    const COLLECTION: &'static str = "invitation_list";
    fn id(&self) -> &str { &self.id }
}

impl Document for VacationPeriod {
    const COLLECTION: &'static str = "vacations";
    fn id(&self) -> &str { &self.id }
}

impl Document for Notification {
    const COLLECTION: &'static str = "notifications";
    fn id(&self) -> &str { &self.id }
}

impl Document for AccessLog {
    const COLLECTION: &'static str = "access_logs";
    fn id(&self) -> &str { &self.id }
}

#[derive(Clone)]
pub struct DocumentStore {
    root: PathBuf,
    // Serialises writers within this process
    write_lock: Arc<Mutex<()>>,
    // Held across read-check-write sequences; never taken by save or delete
    transaction_lock: Arc<Mutex<()>>,
}

impl DocumentStore {
    // Open (and create if needed) a store rooted at `root`
    pub fn open(root: impl AsRef<Path>) -> io::Result<Self> {
        let root = root.as_ref().to_path_buf();

        for collection in COLLECTIONS {
            let dir = root.join(collection);
            if !dir.exists() {
                info!("Creating collection directory: {}", dir.display());
                fs::create_dir_all(&dir)?;
            }
        }

        Ok(Self {
            root,
            write_lock: Arc::new(Mutex::new(())),
            transaction_lock: Arc::new(Mutex::new(())),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn document_path<T: Document>(&self, id: &str) -> Result<PathBuf, ServiceError> {
        if !DOCUMENT_ID.is_match(id) {
            return Err(ServiceError::NotFound);
        }
        Ok(self.root.join(T::COLLECTION).join(format!("{}.json", id)))
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, ()>, ServiceError> {
        self.write_lock.lock().map_err(|e| {
            error!("Store lock poisoned: {:?}", e);
            ServiceError::InternalServerError
        })
    }

    /// Run `work` while no other transaction on this store is running.
    ///
    /// Checks made inside `work` stay valid for the writes that follow them.
    /// Transactions do not nest: `work` must not open another one.
    pub fn transaction<R, F>(&self, work: F) -> Result<R, ServiceError>
    where
        F: FnOnce(&DocumentStore) -> Result<R, ServiceError>,
    {
        let _guard = self.transaction_lock.lock().map_err(|e| {
            error!("Store transaction lock poisoned: {:?}", e);
            ServiceError::InternalServerError
        })?;
        work(self)
    }

    // Insert or replace a document
    pub fn save<T: Document>(&self, document: &T) -> Result<(), ServiceError> {
        let path = self.document_path::<T>(document.id())?;
        let json = serde_json::to_string_pretty(document).map_err(|e| {
            error!("Failed to serialize {} document: {:?}", T::COLLECTION, e);
            ServiceError::InternalServerError
        })?;

        let _guard = self.lock()?;
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, json)
            .and_then(|_| fs::rename(&tmp_path, &path))
            .map_err(|e| {
                error!("Failed to save {} document {}: {:?}", T::COLLECTION, document.id(), e);
                ServiceError::InternalServerError
            })?;

        debug!("Saved {}/{}", T::COLLECTION, document.id());
        Ok(())
    }

    // Find a document by ID
    pub fn find<T: Document>(&self, id: &str) -> Result<Option<T>, ServiceError> {
        let path = match self.document_path::<T>(id) {
            Ok(path) => path,
            Err(_) => return Ok(None),
        };

        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path).map_err(|e| {
            error!("Failed to read {} document {}: {:?}", T::COLLECTION, id, e);
            ServiceError::InternalServerError
        })?;

        serde_json::from_str(&content).map(Some).map_err(|e| {
            error!("Failed to parse {} document {}: {:?}", T::COLLECTION, id, e);
            ServiceError::InternalServerError
        })
    }

    // Delete a document, reporting whether it existed
    pub fn delete<T: Document>(&self, id: &str) -> Result<bool, ServiceError> {
        let path = match self.document_path::<T>(id) {
            Ok(path) => path,
            Err(_) => return Ok(false),
        };

        let _guard = self.lock()?;
        if !path.exists() {
            return Ok(false);
        }

        fs::remove_file(&path).map_err(|e| {
            error!("Failed to delete {} document {}: {:?}", T::COLLECTION, id, e);
            ServiceError::InternalServerError
        })?;

        debug!("Deleted {}/{}", T::COLLECTION, id);
        Ok(true)
    }

    // Every readable document of a collection
    pub fn list<T: Document>(&self) -> Result<Vec<T>, ServiceError> {
        let dir = self.root.join(T::COLLECTION);
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&dir).map_err(|e| {
            error!("Failed to read {} directory: {:?}", T::COLLECTION, e);
            ServiceError::InternalServerError
        })?;

        let mut documents = Vec::new();
        for entry_result in entries {
            let entry = entry_result.map_err(|e| {
                error!("Failed to read directory entry: {:?}", e);
                ServiceError::InternalServerError
            })?;

            let path = entry.path();
            if !path.is_file() || path.extension().map_or(true, |ext| ext != "json") {
                continue;
            }

            let content = match fs::read_to_string(&path) {
                Ok(content) => content,
                Err(e) => {
                    warn!("Failed to read {}: {:?}", path.display(), e);
                    continue;
                }
            };

            match serde_json::from_str(&content) {
                Ok(document) => documents.push(document),
                Err(e) => warn!("Failed to parse {}: {:?}", path.display(), e),
            }
        }

        Ok(documents)
    }

    pub fn find_where<T, F>(&self, predicate: F) -> Result<Vec<T>, ServiceError>
    where
        T: Document,
        F: Fn(&T) -> bool,
    {
        Ok(self.list::<T>()?.into_iter().filter(|doc| predicate(doc)).collect())
    }

    pub fn find_one<T, F>(&self, predicate: F) -> Result<Option<T>, ServiceError>
    where
        T: Document,
        F: Fn(&T) -> bool,
    {
        Ok(self.list::<T>()?.into_iter().find(|doc| predicate(doc)))
    }

    // Delete every matching document, returning how many went
    pub fn delete_where<T, F>(&self, predicate: F) -> Result<usize, ServiceError>
    where
        T: Document,
        F: Fn(&T) -> bool,
    {
        let mut deleted = 0;
        for document in self.find_where::<T, _>(predicate)? {
            if self.delete::<T>(document.id())? {
                deleted += 1;
            }
        }
        Ok(deleted)
    }
}
