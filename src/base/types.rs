use serde::{Deserialize, Serialize};

pub type Err = anyhow::Error;
pub type Res<T> = Result<T, Err>;
pub type Void = Res<()>;

/// A user record in the database.
///
/// `nickname` stays absent until the user answers the greeting; it is stored
/// verbatim, including casing and surrounding whitespace.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserRecord {
    pub id: Option<surrealdb::sql::Thing>,
    pub nickname: Option<String>,
}

/// Where a user stands in the conversation, derived from the stored record.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatState {
    /// No record exists for the user yet.
    NewUser,
    /// A record exists, but the nickname has not been captured.
    AwaitingNickname,
    /// A record exists with a captured nickname.
    ActiveChat { nickname: String },
}

impl ChatState {
    /// Derive the conversational state from a store lookup result.
    pub fn from_record(record: Option<UserRecord>) -> Self {
        match record {
            None => Self::NewUser,
            Some(UserRecord { nickname: None, .. }) => Self::AwaitingNickname,
            Some(UserRecord { nickname: Some(nickname), .. }) => Self::ActiveChat { nickname },
        }
    }
}

/// A single webhook event after platform decoding.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundEvent {
    Message(MessageEvent),
    Follow(FollowEvent),
}

/// An inbound text message from a user.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageEvent {
    pub user_id: String,
    pub reply_token: String,
    pub text: String,
}

/// A user added the bot as a friend.
#[derive(Debug, Clone, PartialEq)]
pub struct FollowEvent {
    pub reply_token: String,
}

// Tests.
