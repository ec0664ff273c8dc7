use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type UserId = i64;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: i64,
    pub sender_id: UserId,
    pub receiver_id: UserId,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Clone)]
pub struct NewMessage {
    pub receiver_id: UserId,
    pub content: String,
}

/// Account kind as the backend encodes it: `0` for students, `1` for companies.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(from = "u8", into = "u8")]
pub enum UserType {
    Student,
    Company,
    Other(u8),
}

impl From<u8> for UserType {
    fn from(value: u8) -> Self {
        match value {
            0 => UserType::Student,
            1 => UserType::Company,
            n => UserType::Other(n),
        }
    }
}

impl From<UserType> for u8 {
    fn from(value: UserType) -> Self {
        match value {
            UserType::Student => 0,
            UserType::Company => 1,
            UserType::Other(n) => n,
        }
    }
}

impl UserType {
    pub fn label(self) -> &'static str {
        match self {
            UserType::Student => "Student",
            UserType::Company => "Company",
            UserType::Other(_) => "Unknown",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct User {
    pub id: UserId,
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub user_type: UserType,
    #[serde(default)]
    pub profile: Option<Profile>,
}

impl User {
    pub fn icon_url(&self) -> Option<&str> {
        self.profile.as_ref().and_then(|p| p.user_icon_url.as_deref())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Profile {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub user_id: Option<UserId>,
    #[serde(default)]
    pub introduction: String,
    #[serde(default)]
    pub skills: String,
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub industry: String,
    #[serde(default)]
    pub user_icon_url: Option<String>,
    #[serde(default)]
    pub bg_image_url: Option<String>,
}

/// Editable part of a profile, sent on create and update.
#[derive(Debug, Serialize, Clone, Default)]
pub struct ProfileDraft {
    pub introduction: String,
    pub skills: String,
    pub company_name: String,
    pub industry: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Job {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub salary: Option<i64>,
    #[serde(default)]
    pub requirements: String,
    #[serde(default)]
    pub benefits: String,
    #[serde(default)]
    pub employment_type: String,
    #[serde(default)]
    pub company_id: Option<UserId>,
}

#[derive(Debug, Serialize, Clone, Default)]
pub struct JobDraft {
    pub title: String,
    pub description: String,
    pub location: String,
    pub salary: Option<i64>,
    pub requirements: String,
    pub benefits: String,
    pub employment_type: String,
}

impl From<&Job> for JobDraft {
    fn from(job: &Job) -> Self {
        Self {
            title: job.title.clone(),
            description: job.description.clone(),
            location: job.location.clone(),
            salary: job.salary,
            requirements: job.requirements.clone(),
            benefits: job.benefits.clone(),
            employment_type: job.employment_type.clone(),
        }
    }
}

#[derive(Debug, Serialize, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub user: Option<LoginUser>,
}

#[derive(Debug, Deserialize, Clone, Copy)]
pub struct LoginUser {
    pub id: UserId,
}

#[derive(Debug, Serialize, Clone)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
    pub user_type: UserType,
}

#[derive(Debug, Serialize, Clone)]
pub struct UserUpdate {
    pub name: String,
    pub email: String,
    pub user_type: UserType,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_parses_backend_timestamps() {
        let json = r#"{"id":7,"sender_id":2,"receiver_id":1,"content":"hi",
            "created_at":"2024-01-01T19:00:00.000+09:00",
            "updated_at":"2024-01-01T19:00:00.000+09:00"}"#;
        let msg: Message = serde_json::from_str(json).unwrap();
        assert_eq!(msg.created_at.to_rfc3339(), "2024-01-01T10:00:00+00:00");
        assert_eq!(msg.sender_id, 2);
    }

    #[test]
    fn user_type_keeps_unknown_codes() {
        let user: User =
            serde_json::from_str(r#"{"id":1,"name":"a","email":"a@x","user_type":1}"#).unwrap();
        assert_eq!(user.user_type, UserType::Company);
        assert!(user.icon_url().is_none());

        let odd: User = serde_json::from_str(r#"{"id":2,"name":"b","user_type":5}"#).unwrap();
        assert_eq!(odd.user_type, UserType::Other(5));
        assert_eq!(serde_json::to_value(odd.user_type).unwrap(), serde_json::json!(5));
    }

    #[test]
    fn job_tolerates_missing_optional_fields() {
        let job: Job = serde_json::from_str(r#"{"id":3,"title":"Backend","salary":null}"#).unwrap();
        assert_eq!(job.salary, None);
        assert!(job.location.is_empty());
    }
}
