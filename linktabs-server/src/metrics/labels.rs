use crate::auth::AuthError;

pub trait AsMetricLabel {
    fn as_metric_label(&self) -> &'static str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginOutcome {
    Success,
    Failure(AuthError),
}

impl AsMetricLabel for AuthError {
    fn as_metric_label(&self) -> &'static str {
        match self {
            AuthError::NotConfigured => "not_configured",
            AuthError::InvalidPassword => "invalid_password",
        }
    }
}

impl AsMetricLabel for LoginOutcome {
    fn as_metric_label(&self) -> &'static str {
        match self {
            LoginOutcome::Success => "success",
            LoginOutcome::Failure(err) => err.as_metric_label(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Success,
    Rejected,
    Error,
}

impl AsMetricLabel for SaveOutcome {
    fn as_metric_label(&self) -> &'static str {
        match self {
            SaveOutcome::Success => "success",
            SaveOutcome::Rejected => "rejected",
            SaveOutcome::Error => "error",
        }
    }
}
