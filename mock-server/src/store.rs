//! In-memory registry: artifacts keyed by group and ID, deduplicated content
//! with sequential content IDs, sequential global IDs per version.

use std::collections::BTreeMap;

use chrono::{SecondsFormat, Utc};
use serde_json::{json, Value};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::error::Problem;
use crate::model::{
    contains_ignore_case, labels_match, CreateArtifact, CreateContent, CreateVersion, EditMetadata, Labels,
    Reference, SearchQuery, ARTIFACT_TYPES, RULES, RULE_LEVELS, STATES,
};

/// Version expression that resolves to the newest version.
pub const LATEST: &str = "latest";

type Key = (String, String);

#[derive(Debug, Clone)]
pub struct Content {
    pub content: String,
    pub content_type: String,
    pub artifact_type: String,
    pub hash: String,
    pub references: Vec<Reference>,
}

#[derive(Debug, Clone)]
struct Comment {
    comment_id: String,
    value: String,
    created_on: String,
}

#[derive(Debug, Clone)]
struct Version {
    version: String,
    global_id: i64,
    content_id: i64,
    state: String,
    name: String,
    description: String,
    labels: Labels,
    created_on: String,
    modified_on: String,
    comments: Vec<Comment>,
}

#[derive(Debug, Clone)]
struct Artifact {
    group_id: String,
    artifact_id: String,
    artifact_type: String,
    name: String,
    description: String,
    labels: Labels,
    owner: String,
    created_on: String,
    modified_on: String,
    versions: Vec<Version>,
    rules: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default)]
pub struct Registry {
    artifacts: BTreeMap<Key, Artifact>,
    contents: Vec<Content>,
    last_global_id: i64,
    last_comment_id: u64,
    global_rules: BTreeMap<String, String>,
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn content_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

fn content_matches(stored: &str, probe: &str, canonical: bool) -> bool {
    if stored == probe {
        return true;
    }
    if !canonical {
        return false;
    }
    match (
        serde_json::from_str::<Value>(stored),
        serde_json::from_str::<Value>(probe),
    ) {
        (Ok(a), Ok(b)) => a == b,
        _ => stored.trim() == probe.trim(),
    }
}

fn check_one_of(kind: &str, value: &str, allowed: &[&str]) -> Result<(), Problem> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(Problem::bad_request(format!("Invalid {kind}: '{value}'")))
    }
}

fn artifact_not_found(group_id: &str, artifact_id: &str) -> Problem {
    Problem::not_found(
        "ArtifactNotFoundException",
        format!("No artifact with ID '{artifact_id}' in group '{group_id}' was found."),
    )
}

impl Artifact {
    fn searched(&self) -> Value {
        json!({
            "groupId": self.group_id,
            "artifactId": self.artifact_id,
            "name": self.name,
            "description": self.description,
            "artifactType": self.artifact_type,
            "owner": self.owner,
            "createdOn": self.created_on,
            "modifiedBy": self.owner,
            "modifiedOn": self.modified_on,
        })
    }

    fn detail(&self) -> Value {
        let mut value = self.searched();
        value["labels"] = json!(self.labels);
        value
    }

    fn version_json(&self, version: &Version) -> Value {
        json!({
            "groupId": self.group_id,
            "artifactId": self.artifact_id,
            "artifactType": self.artifact_type,
            "owner": self.owner,
            "version": version.version,
            "globalId": version.global_id,
            "contentId": version.content_id,
            "state": version.state,
            "name": version.name,
            "description": version.description,
            "labels": version.labels,
            "createdOn": version.created_on,
            "modifiedBy": self.owner,
            "modifiedOn": version.modified_on,
        })
    }

    fn version_index(&self, expression: &str) -> Result<usize, Problem> {
        let found = if expression == LATEST {
            self.versions.len().checked_sub(1)
        } else {
            self.versions.iter().position(|v| v.version == expression)
        };
        found.ok_or_else(|| {
            Problem::not_found(
                "VersionNotFoundException",
                format!(
                    "No version '{expression}' found for artifact with ID '{}' in group '{}'.",
                    self.artifact_id, self.group_id
                ),
            )
        })
    }

    fn version(&self, expression: &str) -> Result<&Version, Problem> {
        let index = self.version_index(expression)?;
        Ok(&self.versions[index])
    }

    fn version_mut(&mut self, expression: &str) -> Result<&mut Version, Problem> {
        let index = self.version_index(expression)?;
        Ok(&mut self.versions[index])
    }

    fn sort_key(&self, order_by: &str) -> String {
        match order_by {
            "createdOn" => self.created_on.clone(),
            "modifiedOn" => self.modified_on.clone(),
            "groupId" => self.group_id.clone(),
            "artifactId" => self.artifact_id.clone(),
            _ => self.name.clone(),
        }
    }
}

impl Version {
    fn sort_key(&self, artifact: &Artifact, order_by: &str) -> String {
        match order_by {
            "version" => self.version.clone(),
            "name" => self.name.clone(),
            "createdOn" => self.created_on.clone(),
            "modifiedOn" => self.modified_on.clone(),
            "groupId" => artifact.group_id.clone(),
            "artifactId" => artifact.artifact_id.clone(),
            _ => format!("{:020}", self.global_id),
        }
    }
}

fn page<T>(mut items: Vec<(String, T)>, query: &SearchQuery) -> (usize, Vec<T>) {
    items.sort_by(|a, b| a.0.cmp(&b.0));
    if query.descending() {
        items.reverse();
    }
    let count = items.len();
    let (offset, limit) = query.window();
    (count, items.into_iter().skip(offset).take(limit).map(|(_, item)| item).collect())
}

impl Registry {
    fn artifact(&self, group_id: &str, artifact_id: &str) -> Result<&Artifact, Problem> {
        self.artifacts
            .get(&(group_id.to_string(), artifact_id.to_string()))
            .ok_or_else(|| artifact_not_found(group_id, artifact_id))
    }

    fn artifact_mut(&mut self, group_id: &str, artifact_id: &str) -> Result<&mut Artifact, Problem> {
        self.artifacts
            .get_mut(&(group_id.to_string(), artifact_id.to_string()))
            .ok_or_else(|| artifact_not_found(group_id, artifact_id))
    }

    fn content(&self, content_id: i64) -> Option<&Content> {
        let index = usize::try_from(content_id).ok()?.checked_sub(1)?;
        self.contents.get(index)
    }

    /// Store content once per distinct text and reference list.
    fn intern(&mut self, content: CreateContent, artifact_type: &str) -> i64 {
        let hash = content_hash(&content.content);
        if let Some(index) = self
            .contents
            .iter()
            .position(|c| c.hash == hash && c.references == content.references)
        {
            return index as i64 + 1;
        }
        self.contents.push(Content {
            content: content.content,
            content_type: content.content_type,
            artifact_type: artifact_type.to_string(),
            hash,
            references: content.references,
        });
        self.contents.len() as i64
    }

    // --- artifacts ---

    pub fn create_artifact(
        &mut self,
        group_id: &str,
        request: CreateArtifact,
        if_exists: &str,
        canonical: bool,
        dry_run: bool,
    ) -> Result<Value, Problem> {
        if dry_run {
            let mut scratch = self.clone();
            return scratch.create_artifact(group_id, request, if_exists, canonical, false);
        }
        check_one_of("artifact type", &request.artifact_type, ARTIFACT_TYPES)?;
        let artifact_id = if request.artifact_id.is_empty() {
            Uuid::new_v4().to_string()
        } else {
            request.artifact_id.clone()
        };
        let key = (group_id.to_string(), artifact_id.clone());

        let index = if self.artifacts.contains_key(&key) {
            let first = request.first_version;
            match if_exists {
                "FAIL" => {
                    return Err(Problem::conflict(
                        "ArtifactAlreadyExistsException",
                        format!("An artifact with ID '{artifact_id}' in group '{group_id}' already exists."),
                    ))
                }
                "CREATE_VERSION" => {
                    let first = first.ok_or_else(|| Problem::bad_request("firstVersion is required"))?;
                    Some(self.add_version(&key, first)?)
                }
                "FIND_OR_CREATE_VERSION" => {
                    let first = first.ok_or_else(|| Problem::bad_request("firstVersion is required"))?;
                    match self.find_version(&key, &first.content.content, canonical) {
                        Some(index) => Some(index),
                        None => Some(self.add_version(&key, first)?),
                    }
                }
                other => return Err(Problem::bad_request(format!("Invalid ifExists: '{other}'"))),
            }
        } else {
            let created_on = now();
            self.artifacts.insert(
                key.clone(),
                Artifact {
                    group_id: group_id.to_string(),
                    artifact_id,
                    artifact_type: request.artifact_type,
                    name: request.name,
                    description: request.description,
                    labels: request.labels,
                    owner: String::new(),
                    modified_on: created_on.clone(),
                    created_on,
                    versions: Vec::new(),
                    rules: BTreeMap::new(),
                },
            );
            match request.first_version {
                Some(first) => match self.add_version(&key, first) {
                    Ok(index) => Some(index),
                    Err(problem) => {
                        self.artifacts.remove(&key);
                        return Err(problem);
                    }
                },
                None => None,
            }
        };

        let artifact = &self.artifacts[&key];
        let mut body = json!({ "artifact": artifact.detail() });
        if let Some(index) = index {
            body["version"] = artifact.version_json(&artifact.versions[index]);
        }
        Ok(body)
    }

    fn find_version(&self, key: &Key, content: &str, canonical: bool) -> Option<usize> {
        let artifact = self.artifacts.get(key)?;
        artifact.versions.iter().position(|v| {
            self.content(v.content_id)
                .is_some_and(|c| content_matches(&c.content, content, canonical))
        })
    }

    fn add_version(&mut self, key: &Key, request: CreateVersion) -> Result<usize, Problem> {
        let artifact = self
            .artifacts
            .get(key)
            .ok_or_else(|| artifact_not_found(&key.0, &key.1))?;
        let version = if request.version.is_empty() {
            let next = artifact
                .versions
                .iter()
                .filter_map(|v| v.version.parse::<u64>().ok())
                .max()
                .map_or(1, |n| n + 1);
            next.to_string()
        } else {
            request.version
        };
        if artifact.versions.iter().any(|v| v.version == version) {
            return Err(Problem::conflict(
                "VersionAlreadyExistsException",
                format!("Version '{version}' already exists for artifact '{}'.", key.1),
            ));
        }
        let artifact_type = artifact.artifact_type.clone();

        let content_id = self.intern(request.content, &artifact_type);
        self.last_global_id += 1;
        let global_id = self.last_global_id;
        let created_on = now();
        let state = if request.is_draft { "DRAFT" } else { "ENABLED" };

        let artifact = self
            .artifacts
            .get_mut(key)
            .ok_or_else(|| artifact_not_found(&key.0, &key.1))?;
        artifact.modified_on = created_on.clone();
        artifact.versions.push(Version {
            version,
            global_id,
            content_id,
            state: state.to_string(),
            name: request.name,
            description: request.description,
            labels: request.labels,
            modified_on: created_on.clone(),
            created_on,
            comments: Vec::new(),
        });
        Ok(artifact.versions.len() - 1)
    }

    pub fn delete_artifact(&mut self, group_id: &str, artifact_id: &str) -> Result<(), Problem> {
        self.artifacts
            .remove(&(group_id.to_string(), artifact_id.to_string()))
            .map(|_| ())
            .ok_or_else(|| artifact_not_found(group_id, artifact_id))
    }

    pub fn delete_group_artifacts(&mut self, group_id: &str) {
        self.artifacts.retain(|(group, _), _| group != group_id);
    }

    pub fn artifact_metadata(&self, group_id: &str, artifact_id: &str) -> Result<Value, Problem> {
        Ok(self.artifact(group_id, artifact_id)?.detail())
    }

    pub fn update_artifact_metadata(
        &mut self,
        group_id: &str,
        artifact_id: &str,
        edit: EditMetadata,
    ) -> Result<(), Problem> {
        let artifact = self.artifact_mut(group_id, artifact_id)?;
        if let Some(name) = edit.name {
            artifact.name = name;
        }
        if let Some(description) = edit.description {
            artifact.description = description;
        }
        if let Some(labels) = edit.labels {
            artifact.labels = labels;
        }
        if let Some(owner) = edit.owner {
            artifact.owner = owner;
        }
        artifact.modified_on = now();
        Ok(())
    }

    // --- search ---

    fn artifact_matches(&self, artifact: &Artifact, query: &SearchQuery, content: Option<&str>) -> bool {
        let canonical = query.canonical.unwrap_or(false);
        query.name.as_deref().is_none_or(|n| contains_ignore_case(&artifact.name, n))
            && query
                .description
                .as_deref()
                .is_none_or(|d| contains_ignore_case(&artifact.description, d))
            && query.group_id.as_deref().is_none_or(|g| artifact.group_id == g)
            && query.artifact_id.as_deref().is_none_or(|a| artifact.artifact_id == a)
            && query.artifact_type.as_deref().is_none_or(|t| artifact.artifact_type == t)
            && labels_match(&artifact.labels, &query.label_filters())
            && query
                .global_id
                .is_none_or(|id| artifact.versions.iter().any(|v| v.global_id == id))
            && query
                .content_id
                .is_none_or(|id| artifact.versions.iter().any(|v| v.content_id == id))
            && content.is_none_or(|probe| {
                artifact.versions.iter().any(|v| {
                    self.content(v.content_id)
                        .is_some_and(|c| content_matches(&c.content, probe, canonical))
                })
            })
    }

    /// Artifacts matching every filter present in `query`; with `content`,
    /// only those with a version whose content matches.
    pub fn search_artifacts(&self, query: &SearchQuery, content: Option<&str>) -> Value {
        let order_by = query.order_by.as_deref().unwrap_or("name");
        let hits = self
            .artifacts
            .values()
            .filter(|a| self.artifact_matches(a, query, content))
            .map(|a| (a.sort_key(order_by), a.searched()))
            .collect();
        let (count, artifacts) = page(hits, query);
        json!({ "artifacts": artifacts, "count": count })
    }

    pub fn search_versions(&self, query: &SearchQuery, content: Option<&str>) -> Value {
        let canonical = query.canonical.unwrap_or(false);
        let order_by = query.order_by.as_deref().unwrap_or("globalId");
        let labels = query.label_filters();
        let hits = self
            .artifacts
            .values()
            .filter(|a| query.group_id.as_deref().is_none_or(|g| a.group_id == g))
            .filter(|a| query.artifact_id.as_deref().is_none_or(|id| a.artifact_id == id))
            .filter(|a| query.artifact_type.as_deref().is_none_or(|t| a.artifact_type == t))
            .flat_map(|a| a.versions.iter().map(move |v| (a, v)))
            .filter(|(_, v)| {
                query.version.as_deref().is_none_or(|x| v.version == x)
                    && query.name.as_deref().is_none_or(|n| contains_ignore_case(&v.name, n))
                    && query
                        .description
                        .as_deref()
                        .is_none_or(|d| contains_ignore_case(&v.description, d))
                    && query.state.as_deref().is_none_or(|s| v.state == s)
                    && query.global_id.is_none_or(|id| v.global_id == id)
                    && query.content_id.is_none_or(|id| v.content_id == id)
                    && labels_match(&v.labels, &labels)
                    && content.is_none_or(|probe| {
                        self.content(v.content_id)
                            .is_some_and(|c| content_matches(&c.content, probe, canonical))
                    })
            })
            .map(|(a, v)| (v.sort_key(a, order_by), a.version_json(v)))
            .collect();
        let (count, versions) = page(hits, query);
        json!({ "versions": versions, "count": count })
    }

    pub fn list_versions(&self, group_id: &str, artifact_id: &str, query: &SearchQuery) -> Result<Value, Problem> {
        let artifact = self.artifact(group_id, artifact_id)?;
        let order_by = query.order_by.as_deref().unwrap_or("globalId");
        let hits = artifact
            .versions
            .iter()
            .map(|v| (v.sort_key(artifact, order_by), artifact.version_json(v)))
            .collect();
        let (count, versions) = page(hits, query);
        Ok(json!({ "versions": versions, "count": count }))
    }

    // --- versions ---

    pub fn create_version(
        &mut self,
        group_id: &str,
        artifact_id: &str,
        request: CreateVersion,
        dry_run: bool,
    ) -> Result<Value, Problem> {
        if dry_run {
            let mut scratch = self.clone();
            return scratch.create_version(group_id, artifact_id, request, false);
        }
        let key = (group_id.to_string(), artifact_id.to_string());
        let index = self.add_version(&key, request)?;
        let artifact = &self.artifacts[&key];
        Ok(artifact.version_json(&artifact.versions[index]))
    }

    pub fn version_metadata(&self, group_id: &str, artifact_id: &str, version: &str) -> Result<Value, Problem> {
        let artifact = self.artifact(group_id, artifact_id)?;
        Ok(artifact.version_json(artifact.version(version)?))
    }

    pub fn update_version_metadata(
        &mut self,
        group_id: &str,
        artifact_id: &str,
        version: &str,
        edit: EditMetadata,
    ) -> Result<(), Problem> {
        let version = self.artifact_mut(group_id, artifact_id)?.version_mut(version)?;
        if let Some(name) = edit.name {
            version.name = name;
        }
        if let Some(description) = edit.description {
            version.description = description;
        }
        if let Some(labels) = edit.labels {
            version.labels = labels;
        }
        version.modified_on = now();
        Ok(())
    }

    pub fn delete_version(&mut self, group_id: &str, artifact_id: &str, version: &str) -> Result<(), Problem> {
        let artifact = self.artifact_mut(group_id, artifact_id)?;
        let index = artifact.version_index(version)?;
        artifact.versions.remove(index);
        Ok(())
    }

    pub fn version_content(&self, group_id: &str, artifact_id: &str, version: &str) -> Result<&Content, Problem> {
        let version = self.artifact(group_id, artifact_id)?.version(version)?;
        self.content(version.content_id)
            .ok_or_else(|| Problem::not_found("ContentNotFoundException", "Content is gone."))
    }

    /// Only draft versions may have their content replaced.
    pub fn update_version_content(
        &mut self,
        group_id: &str,
        artifact_id: &str,
        version: &str,
        content: CreateContent,
    ) -> Result<(), Problem> {
        let artifact = self.artifact(group_id, artifact_id)?;
        let artifact_type = artifact.artifact_type.clone();
        if artifact.version(version)?.state != "DRAFT" {
            return Err(Problem::conflict(
                "ConflictException",
                format!("Version '{version}' is not in DRAFT state."),
            ));
        }
        let content_id = self.intern(content, &artifact_type);
        let version = self.artifact_mut(group_id, artifact_id)?.version_mut(version)?;
        version.content_id = content_id;
        version.modified_on = now();
        Ok(())
    }

    pub fn version_references(
        &self,
        group_id: &str,
        artifact_id: &str,
        version: &str,
        inbound: bool,
    ) -> Result<Vec<Reference>, Problem> {
        let artifact = self.artifact(group_id, artifact_id)?;
        let version = artifact.version(version)?;
        if inbound {
            Ok(self.inbound_references(&artifact.group_id, &artifact.artifact_id, &version.version))
        } else {
            Ok(self
                .content(version.content_id)
                .map(|c| c.references.clone())
                .unwrap_or_default())
        }
    }

    /// Versions whose content references the given coordinates.
    fn inbound_references(&self, group_id: &str, artifact_id: &str, version: &str) -> Vec<Reference> {
        let mut found = Vec::new();
        for artifact in self.artifacts.values() {
            for v in &artifact.versions {
                let Some(content) = self.content(v.content_id) else {
                    continue;
                };
                for reference in &content.references {
                    if reference.group_id == group_id
                        && reference.artifact_id == artifact_id
                        && reference.version == version
                    {
                        found.push(Reference {
                            group_id: artifact.group_id.clone(),
                            artifact_id: artifact.artifact_id.clone(),
                            version: v.version.clone(),
                            name: reference.name.clone(),
                        });
                    }
                }
            }
        }
        found
    }

    pub fn version_state(&self, group_id: &str, artifact_id: &str, version: &str) -> Result<Value, Problem> {
        let version = self.artifact(group_id, artifact_id)?.version(version)?;
        Ok(json!({ "state": version.state }))
    }

    pub fn update_version_state(
        &mut self,
        group_id: &str,
        artifact_id: &str,
        version: &str,
        state: &str,
        dry_run: bool,
    ) -> Result<(), Problem> {
        check_one_of("state", state, STATES)?;
        let version = self.artifact_mut(group_id, artifact_id)?.version_mut(version)?;
        if !dry_run {
            version.state = state.to_string();
            version.modified_on = now();
        }
        Ok(())
    }

    // --- comments ---

    pub fn comments(&self, group_id: &str, artifact_id: &str, version: &str) -> Result<Value, Problem> {
        let version = self.artifact(group_id, artifact_id)?.version(version)?;
        Ok(Value::Array(version.comments.iter().map(comment_json).collect()))
    }

    pub fn add_comment(&mut self, group_id: &str, artifact_id: &str, version: &str, value: String) -> Result<Value, Problem> {
        let comment_id = (self.last_comment_id + 1).to_string();
        let version = self.artifact_mut(group_id, artifact_id)?.version_mut(version)?;
        let comment = Comment {
            comment_id,
            value,
            created_on: now(),
        };
        let body = comment_json(&comment);
        version.comments.push(comment);
        self.last_comment_id += 1;
        Ok(body)
    }

    pub fn update_comment(
        &mut self,
        group_id: &str,
        artifact_id: &str,
        version: &str,
        comment_id: &str,
        value: String,
    ) -> Result<(), Problem> {
        let version = self.artifact_mut(group_id, artifact_id)?.version_mut(version)?;
        let comment = version
            .comments
            .iter_mut()
            .find(|c| c.comment_id == comment_id)
            .ok_or_else(|| comment_not_found(comment_id))?;
        comment.value = value;
        Ok(())
    }

    pub fn delete_comment(&mut self, group_id: &str, artifact_id: &str, version: &str, comment_id: &str) -> Result<(), Problem> {
        let version = self.artifact_mut(group_id, artifact_id)?.version_mut(version)?;
        let index = version
            .comments
            .iter()
            .position(|c| c.comment_id == comment_id)
            .ok_or_else(|| comment_not_found(comment_id))?;
        version.comments.remove(index);
        Ok(())
    }

    // --- ids ---

    pub fn content_by_id(&self, content_id: i64) -> Result<&Content, Problem> {
        self.content(content_id).ok_or_else(|| {
            Problem::not_found(
                "ContentNotFoundException",
                format!("No content with ID '{content_id}' was found."),
            )
        })
    }

    pub fn content_by_hash(&self, hash: &str) -> Result<&Content, Problem> {
        self.contents.iter().find(|c| c.hash == hash).ok_or_else(|| {
            Problem::not_found(
                "ContentNotFoundException",
                format!("No content with hash '{hash}' was found."),
            )
        })
    }

    pub fn content_by_global_id(&self, global_id: i64) -> Result<&Content, Problem> {
        let (_, version) = self.version_by_global_id(global_id)?;
        self.content_by_id(version.content_id)
    }

    pub fn references_by_global_id(&self, global_id: i64, inbound: bool) -> Result<Vec<Reference>, Problem> {
        let (artifact, version) = self.version_by_global_id(global_id)?;
        if inbound {
            Ok(self.inbound_references(&artifact.group_id, &artifact.artifact_id, &version.version))
        } else {
            Ok(self.content_by_id(version.content_id)?.references.clone())
        }
    }

    fn version_by_global_id(&self, global_id: i64) -> Result<(&Artifact, &Version), Problem> {
        self.artifacts
            .values()
            .flat_map(|a| a.versions.iter().map(move |v| (a, v)))
            .find(|(_, v)| v.global_id == global_id)
            .ok_or_else(|| {
                Problem::not_found(
                    "ArtifactNotFoundException",
                    format!("No artifact with global ID '{global_id}' was found."),
                )
            })
    }

    // --- rules ---

    pub fn artifact_rules(&mut self, group_id: &str, artifact_id: &str) -> Result<&mut BTreeMap<String, String>, Problem> {
        Ok(&mut self.artifact_mut(group_id, artifact_id)?.rules)
    }

    pub fn global_rules(&mut self) -> &mut BTreeMap<String, String> {
        &mut self.global_rules
    }
}

fn comment_json(comment: &Comment) -> Value {
    json!({
        "commentId": comment.comment_id,
        "value": comment.value,
        "owner": "",
        "createdOn": comment.created_on,
    })
}

fn comment_not_found(comment_id: &str) -> Problem {
    Problem::not_found(
        "CommentNotFoundException",
        format!("No comment with ID '{comment_id}' was found."),
    )
}

fn rule_not_found(rule: &str) -> Problem {
    Problem::not_found("RuleNotFoundException", format!("No rule named '{rule}' was found."))
}

fn rule_json(rule: &str, level: &str) -> Value {
    json!({ "ruleType": rule, "config": level })
}

/// Rule operations shared by artifact-level and global rule sets.
pub mod rules {
    use super::*;

    pub fn list(rules: &BTreeMap<String, String>) -> Value {
        json!(rules.keys().collect::<Vec<_>>())
    }

    pub fn create(rules: &mut BTreeMap<String, String>, rule: &str, level: &str) -> Result<(), Problem> {
        check_one_of("rule type", rule, RULES)?;
        check_one_of("rule config", level, RULE_LEVELS)?;
        if rules.contains_key(rule) {
            return Err(Problem::conflict(
                "RuleAlreadyExistsException",
                format!("A rule named '{rule}' already exists."),
            ));
        }
        rules.insert(rule.to_string(), level.to_string());
        Ok(())
    }

    pub fn get(rules: &BTreeMap<String, String>, rule: &str) -> Result<Value, Problem> {
        rules
            .get(rule)
            .map(|level| rule_json(rule, level))
            .ok_or_else(|| rule_not_found(rule))
    }

    pub fn update(rules: &mut BTreeMap<String, String>, rule: &str, level: &str) -> Result<Value, Problem> {
        check_one_of("rule config", level, RULE_LEVELS)?;
        let current = rules.get_mut(rule).ok_or_else(|| rule_not_found(rule))?;
        *current = level.to_string();
        Ok(rule_json(rule, level))
    }

    pub fn delete(rules: &mut BTreeMap<String, String>, rule: &str) -> Result<(), Problem> {
        rules.remove(rule).map(|_| ()).ok_or_else(|| rule_not_found(rule))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema(content: &str) -> CreateVersion {
        CreateVersion {
            version: String::new(),
            content: CreateContent {
                content: content.to_string(),
                references: Vec::new(),
                content_type: "application/json".to_string(),
            },
            name: String::new(),
            description: String::new(),
            labels: Labels::new(),
            branches: Vec::new(),
            is_draft: false,
        }
    }

    fn artifact(id: &str, first: Option<CreateVersion>) -> CreateArtifact {
        CreateArtifact {
            artifact_id: id.to_string(),
            artifact_type: "JSON".to_string(),
            name: String::new(),
            description: String::new(),
            labels: Labels::new(),
            first_version: first,
        }
    }

    #[test]
    fn ids_are_sequential_and_content_is_shared() {
        let mut registry = Registry::default();
        let a = registry
            .create_artifact("g", artifact("a", Some(schema("{}"))), "FAIL", false, false)
            .unwrap();
        let b = registry
            .create_artifact("g", artifact("b", Some(schema("{}"))), "FAIL", false, false)
            .unwrap();
        assert_eq!(a["version"]["globalId"], 1);
        assert_eq!(b["version"]["globalId"], 2);
        assert_eq!(a["version"]["contentId"], b["version"]["contentId"]);
        assert_eq!(b["version"]["version"], "1");
    }

    #[test]
    fn existing_artifact_conflicts_by_default() {
        let mut registry = Registry::default();
        registry.create_artifact("g", artifact("a", None), "FAIL", false, false).unwrap();
        let problem = registry
            .create_artifact("g", artifact("a", None), "FAIL", false, false)
            .unwrap_err();
        assert_eq!(problem.status, 409);
    }

    #[test]
    fn find_or_create_reuses_matching_version() {
        let mut registry = Registry::default();
        registry
            .create_artifact("g", artifact("a", Some(schema(r#"{"a":1}"#))), "FAIL", false, false)
            .unwrap();
        let found = registry
            .create_artifact(
                "g",
                artifact("a", Some(schema(r#"{ "a" : 1 }"#))),
                "FIND_OR_CREATE_VERSION",
                true,
                false,
            )
            .unwrap();
        assert_eq!(found["version"]["version"], "1");
    }

    #[test]
    fn dry_run_leaves_registry_untouched() {
        let mut registry = Registry::default();
        registry
            .create_artifact("g", artifact("a", Some(schema("{}"))), "FAIL", false, true)
            .unwrap();
        assert!(registry.artifact("g", "a").is_err());
    }

    #[test]
    fn latest_resolves_to_newest_version() {
        let mut registry = Registry::default();
        registry
            .create_artifact("g", artifact("a", Some(schema("{}"))), "FAIL", false, false)
            .unwrap();
        registry.create_version("g", "a", schema(r#"{"v":2}"#), false).unwrap();
        let meta = registry.version_metadata("g", "a", LATEST).unwrap();
        assert_eq!(meta["version"], "2");
    }

    #[test]
    fn content_hash_is_hex_sha256() {
        assert_eq!(
            content_hash(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn rule_set_lifecycle() {
        let mut set = BTreeMap::new();
        rules::create(&mut set, "VALIDITY", "FULL").unwrap();
        assert_eq!(rules::create(&mut set, "VALIDITY", "FULL").unwrap_err().status, 409);
        assert_eq!(rules::get(&set, "VALIDITY").unwrap()["config"], "FULL");
        rules::update(&mut set, "VALIDITY", "SYNTAX_ONLY").unwrap();
        rules::delete(&mut set, "VALIDITY").unwrap();
        assert_eq!(rules::get(&set, "VALIDITY").unwrap_err().status, 404);
    }
}
