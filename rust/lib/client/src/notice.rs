use crate::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Success,
    Failure,
}

/// A status line for the user: the outcome of one action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub tone: Tone,
    pub text: String,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            tone: Tone::Success,
            text: text.into(),
        }
    }

    pub fn failure(text: impl Into<String>) -> Self {
        Self {
            tone: Tone::Failure,
            text: text.into(),
        }
    }

    /// Success notice with `ok`, or a failure notice built from the error.
    ///
    /// For UI surfaces that render the outcome inline and keep going. The
    /// CLI propagates the error instead and reports it once on exit.
    pub fn from_result<T>(result: &Result<T, ApiError>, ok: &str) -> Self {
        match result {
            Ok(_) => Notice::success(ok),
            Err(e) => Notice::from(e),
        }
    }

    pub fn is_failure(&self) -> bool {
        self.tone == Tone::Failure
    }
}

impl From<&ApiError> for Notice {
    fn from(err: &ApiError) -> Self {
        Notice::failure(err.user_message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorBody;

    #[test]
    fn outcome_to_notice() {
        let ok: Result<(), ApiError> = Ok(());
        assert_eq!(Notice::from_result(&ok, "Saved."), Notice::success("Saved."));

        let err: Result<(), ApiError> = Err(ApiError::Rejected {
            status: 400,
            body: ErrorBody::Detail("Prazo para cancelamento expirado.".into()),
        });
        let notice = Notice::from_result(&err, "Saved.");
        assert!(notice.is_failure());
        assert!(notice.text.contains("Prazo para cancelamento expirado."));
    }
}
