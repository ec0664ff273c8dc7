//! Command handlers. Each one loads what it needs from the backend, runs it
//! through the local logic and prints the rendered result.

use std::collections::HashMap;

use clap::{Args, Subcommand, ValueEnum};
use log::{info, warn};
use thiserror::Error;

use crate::api::models::{
    JobDraft, Message, NewMessage, ProfileDraft, Registration, UserId, UserType, UserUpdate,
};
use crate::api::{ApiClient, ApiError};
use crate::app::{AppState, ConfigError};
use crate::conversation::{self, ConversationKey, DisplayMessage};
use crate::filter::JobFilter;
use crate::storage::{self, CachedUser};
use crate::ui::{chat_view, listings, sidebar};
use crate::utils::block_on;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Usage(String),
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum AccountKind {
    Student,
    Company,
}

impl From<AccountKind> for UserType {
    fn from(kind: AccountKind) -> Self {
        match kind {
            AccountKind::Student => UserType::Student,
            AccountKind::Company => UserType::Company,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum JobsCommand {
    /// List jobs, optionally narrowed down
    List {
        /// Case-insensitive text searched in title, description, requirements and benefits
        #[arg(long, short)]
        keyword: Option<String>,
        /// Accept jobs in this location (repeatable)
        #[arg(long = "location", short)]
        locations: Vec<String>,
        #[arg(long)]
        employment_type: Option<String>,
        #[arg(long)]
        company: Option<UserId>,
    },
    Show { id: i64 },
    /// Jobs posted by the logged-in company
    Mine,
    Create(JobFields),
    Edit {
        id: i64,
        #[command(flatten)]
        fields: JobChanges,
    },
}

#[derive(Debug, Args)]
pub struct JobFields {
    #[arg(long)]
    title: String,
    #[arg(long, default_value = "")]
    description: String,
    #[arg(long, default_value = "")]
    location: String,
    #[arg(long)]
    salary: Option<i64>,
    #[arg(long, default_value = "")]
    requirements: String,
    #[arg(long, default_value = "")]
    benefits: String,
    #[arg(long, default_value = "")]
    employment_type: String,
}

#[derive(Debug, Args)]
pub struct JobChanges {
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    location: Option<String>,
    #[arg(long)]
    salary: Option<i64>,
    #[arg(long)]
    requirements: Option<String>,
    #[arg(long)]
    benefits: Option<String>,
    #[arg(long)]
    employment_type: Option<String>,
}

impl JobChanges {
    fn apply(self, draft: &mut JobDraft) {
        if let Some(v) = self.title {
            draft.title = v;
        }
        if let Some(v) = self.description {
            draft.description = v;
        }
        if let Some(v) = self.location {
            draft.location = v;
        }
        if let Some(v) = self.salary {
            draft.salary = Some(v);
        }
        if let Some(v) = self.requirements {
            draft.requirements = v;
        }
        if let Some(v) = self.benefits {
            draft.benefits = v;
        }
        if let Some(v) = self.employment_type {
            draft.employment_type = v;
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum UsersCommand {
    List {
        #[arg(long, value_enum)]
        kind: Option<AccountKind>,
    },
    Show { id: UserId },
    /// Update name, email or account type (defaults to the logged-in user)
    Edit {
        #[arg(long)]
        id: Option<UserId>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long, value_enum)]
        kind: Option<AccountKind>,
    },
}

#[derive(Debug, Subcommand)]
pub enum ProfileCommand {
    /// Show a profile (defaults to the logged-in user)
    Show { user: Option<UserId> },
    Create(ProfileFields),
    Edit(ProfileFields),
}

#[derive(Debug, Args)]
pub struct ProfileFields {
    #[arg(long)]
    introduction: Option<String>,
    #[arg(long)]
    skills: Option<String>,
    #[arg(long)]
    company_name: Option<String>,
    #[arg(long)]
    industry: Option<String>,
}

impl ProfileFields {
    fn apply(self, draft: &mut ProfileDraft) {
        if let Some(v) = self.introduction {
            draft.introduction = v;
        }
        if let Some(v) = self.skills {
            draft.skills = v;
        }
        if let Some(v) = self.company_name {
            draft.company_name = v;
        }
        if let Some(v) = self.industry {
            draft.industry = v;
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum MessagesCommand {
    /// List conversations, most recent first
    List,
    /// Show one conversation, e.g. `messages show 3-8`
    Show { conversation: ConversationKey },
    Send {
        /// Recipient user id
        #[arg(long, conflicts_with = "conversation")]
        to: Option<UserId>,
        /// Reply inside a conversation
        #[arg(long, short)]
        conversation: Option<ConversationKey>,
        content: String,
    },
}

pub struct Context {
    pub state: AppState,
    pub api_url: Option<String>,
}

impl Context {
    fn client(&self) -> Result<ApiClient, CliError> {
        let base = self.state.base_url(self.api_url.as_deref());
        Ok(ApiClient::new(base, self.state.token.clone())?)
    }

    fn current_user(&self) -> Result<UserId, CliError> {
        self.state
            .user_id
            .ok_or_else(|| CliError::Usage("no user id in session; log in again".into()))
    }
}

pub fn login(ctx: &mut Context, email: &str, password: &str) -> Result<(), CliError> {
    let resp = block_on(ctx.client()?.login(email, password))?;
    let token = resp.token.ok_or_else(|| {
        CliError::Usage(resp.message.unwrap_or_else(|| "login failed".to_string()))
    })?;
    let user_id = resp.user.map(|u| u.id);
    if let Some(url) = ctx.api_url.take() {
        ctx.state.base_url = url;
    }
    ctx.state.sign_in(token, user_id);
    ctx.state.save()?;
    info!("logged in, user id {:?}", user_id);
    println!("Logged in as {}", email);
    Ok(())
}

pub fn logout(ctx: &mut Context) -> Result<(), CliError> {
    if !ctx.state.is_logged_in() {
        println!("Not logged in");
        return Ok(());
    }
    ctx.state.sign_out();
    ctx.state.save()?;
    println!("Logged out");
    Ok(())
}

pub fn whoami(ctx: &Context) -> Result<(), CliError> {
    let id = ctx.current_user()?;
    let user = block_on(ctx.client()?.user(id))?;
    print!("{}", listings::render_user(&user));
    Ok(())
}

pub fn register(
    ctx: &Context,
    name: String,
    email: String,
    password: String,
    kind: AccountKind,
) -> Result<(), CliError> {
    let registration = Registration {
        name,
        email,
        password_confirmation: password.clone(),
        password,
        user_type: kind.into(),
    };
    block_on(ctx.client()?.register(&registration))?;
    println!("Registered {}; log in to continue", registration.email);
    Ok(())
}

pub fn jobs(ctx: &Context, command: JobsCommand) -> Result<(), CliError> {
    let client = ctx.client()?;
    match command {
        JobsCommand::List {
            keyword,
            locations,
            employment_type,
            company,
        } => {
            let jobs = block_on(client.jobs())?;
            let filter = JobFilter {
                keyword,
                locations,
                employment_type,
                company_id: company,
            };
            print!("{}", listings::render_jobs(&filter.apply(&jobs)));
        }
        JobsCommand::Show { id } => {
            print!("{}", listings::render_job(&block_on(client.job(id))?));
        }
        JobsCommand::Mine => {
            let jobs = block_on(client.company_jobs(ctx.current_user()?))?;
            let refs: Vec<_> = jobs.iter().collect();
            print!("{}", listings::render_jobs(&refs));
        }
        JobsCommand::Create(fields) => {
            let draft = JobDraft {
                title: fields.title,
                description: fields.description,
                location: fields.location,
                salary: fields.salary,
                requirements: fields.requirements,
                benefits: fields.benefits,
                employment_type: fields.employment_type,
            };
            let job = block_on(client.create_job(&draft))?;
            println!("Created job #{}", job.id);
        }
        JobsCommand::Edit { id, fields } => {
            let current = block_on(client.job(id))?;
            let mut draft = JobDraft::from(&current);
            fields.apply(&mut draft);
            let job = block_on(client.update_job(id, &draft))?;
            print!("{}", listings::render_job(&job));
        }
    }
    Ok(())
}

pub fn users(ctx: &Context, command: UsersCommand) -> Result<(), CliError> {
    let client = ctx.client()?;
    match command {
        UsersCommand::List { kind } => {
            let users = block_on(client.users())?;
            refresh_directory(&users);
            let wanted = kind.map(UserType::from);
            let shown: Vec<_> = users
                .into_iter()
                .filter(|u| wanted.is_none_or(|k| u.user_type == k))
                .collect();
            print!("{}", listings::render_users(&shown));
        }
        UsersCommand::Show { id } => {
            print!("{}", listings::render_user(&block_on(client.user(id))?));
        }
        UsersCommand::Edit {
            id,
            name,
            email,
            kind,
        } => {
            let id = match id {
                Some(id) => id,
                None => ctx.current_user()?,
            };
            let current = block_on(client.user(id))?;
            let update = UserUpdate {
                name: name.unwrap_or(current.name),
                email: email.unwrap_or(current.email),
                user_type: kind.map(UserType::from).unwrap_or(current.user_type),
            };
            let user = block_on(client.update_user(id, &update))?;
            print!("{}", listings::render_user(&user));
        }
    }
    Ok(())
}

pub fn profile(ctx: &Context, command: ProfileCommand) -> Result<(), CliError> {
    let client = ctx.client()?;
    match command {
        ProfileCommand::Show { user } => {
            let id = match user {
                Some(id) => id,
                None => ctx.current_user()?,
            };
            print!("{}", listings::render_profile(&block_on(client.profile(id))?));
        }
        ProfileCommand::Create(fields) => {
            let mut draft = ProfileDraft::default();
            fields.apply(&mut draft);
            let created = block_on(client.create_profile(ctx.current_user()?, &draft))?;
            print!("{}", listings::render_profile(&created));
        }
        ProfileCommand::Edit(fields) => {
            let id = ctx.current_user()?;
            let current = block_on(client.profile(id))?;
            let mut draft = ProfileDraft {
                introduction: current.introduction,
                skills: current.skills,
                company_name: current.company_name,
                industry: current.industry,
            };
            fields.apply(&mut draft);
            let updated = block_on(client.update_profile(id, &draft))?;
            print!("{}", listings::render_profile(&updated));
        }
    }
    Ok(())
}

/// Caches the fetched user list for the messaging screens. Cache failures are
/// logged and otherwise ignored.
fn refresh_directory(users: &[crate::api::models::User]) {
    let result = storage::open().and_then(|mut conn| storage::upsert_users(&mut conn, users));
    if let Err(e) = result {
        warn!("could not update user cache: {}", e);
    }
}

fn load_directory(client: &ApiClient) -> HashMap<UserId, CachedUser> {
    match block_on(client.users()) {
        Ok(users) => {
            refresh_directory(&users);
            users.iter().map(|u| (u.id, CachedUser::from(u))).collect()
        }
        Err(e) => {
            warn!("could not fetch users, using cached names: {}", e);
            storage::open()
                .and_then(|conn| storage::user_directory(&conn))
                .unwrap_or_else(|e| {
                    warn!("user cache unavailable: {}", e);
                    HashMap::new()
                })
        }
    }
}

/// The requested conversation out of whatever the backend returned, ordered
/// and annotated for display.
fn conversation_view(
    fetched: &[Message],
    key: ConversationKey,
    me: Option<UserId>,
) -> Vec<DisplayMessage> {
    let bucket = conversation::group_by_conversation(fetched)
        .remove(&key)
        .unwrap_or_default();
    conversation::order_conversation(&bucket, me)
}

/// An explicit recipient wins; otherwise a reply goes to the other participant
/// of the conversation.
fn resolve_receiver(
    to: Option<UserId>,
    key: Option<ConversationKey>,
    me: Option<UserId>,
) -> Result<UserId, CliError> {
    match (to, key) {
        (Some(id), _) => Ok(id),
        (None, Some(key)) => {
            let me = me.ok_or_else(|| {
                CliError::Usage("no user id in session; log in again".into())
            })?;
            conversation::reply_target(key, me).ok_or_else(|| {
                CliError::Usage(format!("you are not part of conversation {}", key))
            })
        }
        (None, None) => Err(CliError::Usage(
            "choose a recipient with --to or --conversation".into(),
        )),
    }
}

pub fn messages(ctx: &Context, command: MessagesCommand) -> Result<(), CliError> {
    let client = ctx.client()?;
    let me = ctx.state.user_id;
    match command {
        MessagesCommand::List => {
            let all = block_on(client.messages())?;
            let grouped = conversation::group_by_conversation(&all);
            let rows = conversation::summarize(&grouped, me);
            let users = load_directory(&client);
            print!("{}", sidebar::render_conversations(&rows, &users));
        }
        MessagesCommand::Show { conversation: key } => {
            let fetched = block_on(client.conversation(key))?;
            let ordered = conversation_view(&fetched, key, me);
            let users = load_directory(&client);
            print!("{}", chat_view::render_conversation(key, &ordered, &users));
        }
        MessagesCommand::Send {
            to,
            conversation: key,
            content,
        } => {
            if content.trim().is_empty() {
                return Err(CliError::Usage("message content is empty".into()));
            }
            let receiver_id = resolve_receiver(to, key, me)?;
            block_on(client.send_message(&NewMessage {
                receiver_id,
                content,
            }))?;
            println!("Sent to user {}", receiver_id);
        }
    }
    Ok(())
}
