//! Request bodies for creating and updating records, with their validation rules.
//!
//! Create payloads leave out the fields they were not given, so the database fills
//! in its defaults. Update payloads use [`Patch`] so that a field set to `null`
//! clears the column while an omitted field leaves it alone.

use serde::{Deserialize, Serialize};

use query_engine_execution::mutation::{Patch, Payload};

/// The positions a user may hold, as named by the `position_enum` type.
pub const POSITIONS: [&str; 7] = [
    "SELECT",
    "FACULTY",
    "STAFF",
    "POSTDOC",
    "GRAD_STUDENT",
    "UNDERGRADUATE",
    "OTHER",
];

/// The roles a project member may have, as named by the `role_enum` type.
pub const ROLES: [&str; 2] = ["MEMBER", "PI"];

const GROUP_NAME_MAX_LENGTH: usize = 32;
const TICKET_MAX_LENGTH: usize = 9;

fn check_group_name(name: &str) -> Result<(), String> {
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(
            "Group name may only contain letters, digits, underscores and hyphens.".to_string(),
        );
    }
    if name.chars().count() > GROUP_NAME_MAX_LENGTH {
        return Err(format!(
            "Group name must be at most {GROUP_NAME_MAX_LENGTH} characters long."
        ));
    }
    Ok(())
}

fn check_user_name(name: &str) -> Result<(), String> {
    if name.contains([':', ',']) {
        return Err("Name cannot contain the characters ':' or ','.".to_string());
    }
    Ok(())
}

/// `local@domain`, with no whitespace. An empty string is treated as absent.
fn check_email(field: &str, email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Ok(());
    }
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(format!("{field} is not a valid email address."))
    }
}

fn check_position(position: &str) -> Result<(), String> {
    if position.is_empty() || POSITIONS.contains(&position) {
        Ok(())
    } else {
        Err(format!(
            "position must be one of {}, got '{position}'.",
            POSITIONS.join(", ")
        ))
    }
}

fn check_role(role: &str) -> Result<(), String> {
    if role.is_empty() || ROLES.contains(&role) {
        Ok(())
    } else {
        Err(format!("role must be one of {}, got '{role}'.", ROLES.join(", ")))
    }
}

fn check_ticket(ticket: &str) -> Result<(), String> {
    if ticket.is_empty() {
        return Ok(());
    }
    if !ticket.chars().all(|c| c.is_ascii_alphanumeric()) || ticket.len() > TICKET_MAX_LENGTH {
        return Err(format!(
            "Ticket numbers must be alphanumeric with {TICKET_MAX_LENGTH} characters or less."
        ));
    }
    Ok(())
}

fn check_required(field: &str, value: &str) -> Result<(), String> {
    if value.is_empty() {
        Err(format!("{field} is required."))
    } else {
        Ok(())
    }
}

/// A required column may be left out of an update, but not cleared. Empty strings
/// count as cleared, since they are stored as null.
fn check_required_patch(field: &str, patch: &Patch<String>) -> Result<(), String> {
    match patch {
        Patch::Value(value) => check_required(field, value),
        Patch::Null => Err(format!("{field} is required.")),
        Patch::Missing => Ok(()),
    }
}

/// Run a check on a field when it holds a value.
fn check_patch<T>(
    patch: &Patch<T>,
    check: impl FnOnce(&T) -> Result<(), String>,
) -> Result<(), String> {
    patch.as_value().map_or(Ok(()), check)
}

fn check_option<T>(
    option: Option<&T>,
    check: impl FnOnce(&T) -> Result<(), String>,
) -> Result<(), String> {
    option.map_or(Ok(()), check)
}

// groups

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupCreate {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub point_of_contact: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unix_gid: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_groupdir: Option<bool>,
}

impl Payload for GroupCreate {
    fn validate(&self) -> Result<(), String> {
        check_required("name", &self.name)?;
        check_group_name(&self.name)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GroupUpdate {
    #[serde(default, skip_serializing_if = "Patch::is_missing")]
    pub name: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_missing")]
    pub point_of_contact: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_missing")]
    pub unix_gid: Patch<i64>,
    #[serde(default, skip_serializing_if = "Patch::is_missing")]
    pub has_groupdir: Patch<bool>,
}

impl Payload for GroupUpdate {
    fn validate(&self) -> Result<(), String> {
        check_required_patch("name", &self.name)?;
        check_patch(&self.name, |name| check_group_name(name))
    }
}

// users

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCreate {
    pub email1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub netid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub netid_exp_datetime: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_admin: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unix_uid: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
}

impl Payload for UserCreate {
    fn validate(&self) -> Result<(), String> {
        check_required("email1", &self.email1)?;
        check_email("email1", &self.email1)?;
        check_option(self.email2.as_ref(), |email| check_email("email2", email))?;
        check_option(self.name.as_ref(), |name| check_user_name(name))?;
        check_option(self.position.as_ref(), |position| check_position(position))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserUpdate {
    #[serde(default, skip_serializing_if = "Patch::is_missing")]
    pub username: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_missing")]
    pub name: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_missing")]
    pub email1: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_missing")]
    pub email2: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_missing")]
    pub netid: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_missing")]
    pub netid_exp_datetime: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_missing")]
    pub phone1: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_missing")]
    pub phone2: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_missing")]
    pub is_admin: Patch<bool>,
    #[serde(default, skip_serializing_if = "Patch::is_missing")]
    pub active: Patch<bool>,
    #[serde(default, skip_serializing_if = "Patch::is_missing")]
    pub date: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_missing")]
    pub unix_uid: Patch<i64>,
    #[serde(default, skip_serializing_if = "Patch::is_missing")]
    pub position: Patch<String>,
}

impl Payload for UserUpdate {
    fn validate(&self) -> Result<(), String> {
        check_required_patch("email1", &self.email1)?;
        check_patch(&self.email1, |email| check_email("email1", email))?;
        check_patch(&self.email2, |email| check_email("email2", email))?;
        check_patch(&self.name, |name| check_user_name(name))?;
        check_patch(&self.position, |position| check_position(position))
    }
}

// projects

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectCreate {
    pub name: String,
    pub accounting_group: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pi: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staff1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staff2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_contact: Option<String>,
}

impl Payload for ProjectCreate {
    fn validate(&self) -> Result<(), String> {
        check_required("name", &self.name)?;
        check_required("accounting_group", &self.accounting_group)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectUpdate {
    #[serde(default, skip_serializing_if = "Patch::is_missing")]
    pub name: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_missing")]
    pub accounting_group: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_missing")]
    pub pi: Patch<i64>,
    #[serde(default, skip_serializing_if = "Patch::is_missing")]
    pub staff1: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_missing")]
    pub staff2: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_missing")]
    pub status: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_missing")]
    pub access: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_missing")]
    pub url: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_missing")]
    pub date: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_missing")]
    pub ticket: Patch<i64>,
    #[serde(default, skip_serializing_if = "Patch::is_missing")]
    pub last_contact: Patch<String>,
}

impl Payload for ProjectUpdate {
    fn validate(&self) -> Result<(), String> {
        check_required_patch("name", &self.name)?;
        check_required_patch("accounting_group", &self.accounting_group)
    }
}

// notes

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteCreate {
    pub note: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl Payload for NoteCreate {
    fn validate(&self) -> Result<(), String> {
        check_required("note", &self.note)?;
        check_option(self.ticket.as_ref(), |ticket| check_ticket(ticket))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NoteUpdate {
    #[serde(default, skip_serializing_if = "Patch::is_missing")]
    pub note: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_missing")]
    pub ticket: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_missing")]
    pub author: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_missing")]
    pub date: Patch<String>,
}

impl Payload for NoteUpdate {
    fn validate(&self) -> Result<(), String> {
        check_required_patch("note", &self.note)?;
        check_patch(&self.ticket, |ticket| check_ticket(ticket))
    }
}

// submit nodes

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitNodeCreate {
    pub name: String,
}

impl Payload for SubmitNodeCreate {
    fn validate(&self) -> Result<(), String> {
        check_required("name", &self.name)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubmitNodeUpdate {
    #[serde(default, skip_serializing_if = "Patch::is_missing")]
    pub name: Patch<String>,
}

impl Payload for SubmitNodeUpdate {
    fn validate(&self) -> Result<(), String> {
        check_required_patch("name", &self.name)
    }
}

// memberships

/// The body of a membership write: the id of the record to link.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Relationship {
    pub id: i64,
}

/// A row of `user_groups`.
#[derive(Debug, Clone, Serialize)]
pub struct UserGroupLink {
    pub group_id: i64,
    pub user_id: i64,
}

impl Payload for UserGroupLink {}

/// The body of a project membership write.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectMember {
    pub user_id: i64,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub is_primary: bool,
}

/// A row of `user_projects`.
#[derive(Debug, Clone, Serialize)]
pub struct UserProjectLink {
    pub project_id: i64,
    pub user_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub is_primary: bool,
}

impl Payload for UserProjectLink {
    fn validate(&self) -> Result<(), String> {
        check_option(self.role.as_ref(), |role| check_role(role))
    }
}

/// A note written on a project, with the members it is about.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectNote {
    #[serde(flatten)]
    pub note: NoteCreate,
    #[serde(default)]
    pub users: Vec<i64>,
}

/// A row of `user_notes`. A row without a user ties the note to the project itself.
#[derive(Debug, Clone, Serialize)]
pub struct UserNoteLink {
    pub project_id: i64,
    pub note_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
}

impl Payload for UserNoteLink {}
