pub mod error;

use crate::http::error::AppError;
use axum::response::Redirect;
use maud::Markup;

pub type HtmlResult = Result<Markup, AppError>;
pub type RedirectResult = Result<Redirect, AppError>;
