use std::borrow::Cow;

use crate::modules::relationship::schema::RelationshipEntity;

#[derive(thiserror::Error, Debug)]
pub enum SystemError {
    // identifier errors
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(Cow<'static, str>),
    // domain errors
    #[error("{message}")]
    Conflict { message: Cow<'static, str>, existing: Box<RelationshipEntity> },
    #[error("{0}")]
    NotFound(Cow<'static, str>),
    #[error("Bad Request: {0}")]
    BadRequest(Cow<'static, str>),
    // store errors
    #[error("Database Conflict: {0:?}")]
    Duplicate(Option<DbErrorMeta>),
    #[error("Database Error : {0}")]
    DatabaseError(Cow<'static, str>),
    #[error(transparent)]
    Migrate(#[from] sqlx::migrate::MigrateError),
    // configuration errors
    #[error("Configuration Error: {0}")]
    Config(Cow<'static, str>),
    #[error("Internal System Error: {0}")]
    InternalError(Box<dyn std::error::Error + Send + Sync>),
}

#[derive(Debug, Clone)]
pub struct DbErrorMeta {
    pub code: Option<String>,
    pub constraint: Option<String>,
    pub message: String,
}

impl From<sqlx::Error> for SystemError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            match db_err.code().as_deref() {
                // unique_violation
                Some("23505") => {
                    return SystemError::Duplicate(Some(DbErrorMeta {
                        code: db_err.code().map(|s| s.to_string()),
                        constraint: db_err.constraint().map(|s| s.to_string()),
                        message: db_err.message().to_string(),
                    }));
                }
                // check_violation
                Some("23514") => {
                    return SystemError::BadRequest(db_err.message().to_string().into());
                }
                // invalid_text_representation
                Some("22P02") => {
                    return SystemError::InvalidIdentifier(db_err.message().to_string().into());
                }
                _ => {
                    tracing::error!("Unhandled DB error: {:?}", db_err);
                    return SystemError::DatabaseError(db_err.message().to_string().into());
                }
            }
        }
        tracing::error!("{:?}", err);
        SystemError::InternalError(Box::new(err))
    }
}

impl SystemError {
    pub fn invalid_identifier(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::InvalidIdentifier(msg.into())
    }

    pub fn conflict(msg: impl Into<Cow<'static, str>>, existing: RelationshipEntity) -> Self {
        Self::Conflict { message: msg.into(), existing: Box::new(existing) }
    }

    pub fn not_found(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn bad_request(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn config(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::Config(msg.into())
    }

    /// The record that caused a [`SystemError::Conflict`], if this is one.
    pub fn existing_relationship(&self) -> Option<&RelationshipEntity> {
        match self {
            SystemError::Conflict { existing, .. } => Some(existing),
            _ => None,
        }
    }
}
