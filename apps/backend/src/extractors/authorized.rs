//! Role guards as extractors.
//!
//! `Authorized<AdminOrOrganizer>` in a handler signature authenticates the
//! caller and rejects anyone outside the policy with 403 INSUFFICIENT_ROLE.

use std::future::Future;
use std::marker::PhantomData;
use std::ops::Deref;
use std::pin::Pin;

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};

use super::current_user::CurrentUser;
use crate::domain::Role;
use crate::error::AppError;
use crate::errors::ErrorCode;

pub trait Policy: 'static {
    /// Holding any one of these roles satisfies the policy.
    const ROLES: &'static [Role];

    fn permits(user: &CurrentUser) -> bool {
        user.has_any_role(Self::ROLES)
    }

    fn describe() -> String {
        Self::ROLES
            .iter()
            .map(|r| r.as_str())
            .collect::<Vec<_>>()
            .join(" or ")
    }
}

pub struct AdminOnly;
impl Policy for AdminOnly {
    const ROLES: &'static [Role] = &[Role::Admin];
}

pub struct AdminOrOrganizer;
impl Policy for AdminOrOrganizer {
    const ROLES: &'static [Role] = &[Role::Admin, Role::Organizer];
}

pub struct ParticipantOnly;
impl Policy for ParticipantOnly {
    const ROLES: &'static [Role] = &[Role::Participant];
}

pub struct Authorized<P: Policy> {
    pub user: CurrentUser,
    _policy: PhantomData<P>,
}

impl<P: Policy> Authorized<P> {
    pub fn check(user: CurrentUser) -> Result<Self, AppError> {
        if P::permits(&user) {
            Ok(Self {
                user,
                _policy: PhantomData,
            })
        } else {
            Err(AppError::forbidden(
                ErrorCode::InsufficientRole,
                format!("This action requires the {} role", P::describe()),
            ))
        }
    }

    pub fn into_inner(self) -> CurrentUser {
        self.user
    }
}

impl<P: Policy> Deref for Authorized<P> {
    type Target = CurrentUser;

    fn deref(&self) -> &Self::Target {
        &self.user
    }
}

impl<P: Policy> FromRequest for Authorized<P> {
    type Error = AppError;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let current = CurrentUser::from_request(req, payload);
        Box::pin(async move { Self::check(current.await?) })
    }
}
