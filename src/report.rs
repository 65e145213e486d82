use std::fmt::Display;

use crate::check_in::CheckInOutcome;

/// Human-readable lines for one account, as printed to stdout.
pub struct Report<'a>(pub &'a CheckInOutcome);

impl Display for Report<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let outcome = self.0;
        if let Some(mirror) = &outcome.mirror {
            writeln!(f, "Mirror: {mirror}")?;
        }
        if let Some(login_message) = &outcome.login_message {
            writeln!(f, "Login: {login_message}")?;
        }
        if let Some(error) = &outcome.error {
            writeln!(f, "Error: {error}")?;
        }
        writeln!(f, "Check-in result: {}", outcome.message)?;
        match &outcome.quota {
            Some(quota) => writeln!(f, "Remaining quota: {}{}", quota.value(), quota.unit()),
            None => writeln!(f, "Could not retrieve quota"),
        }
    }
}

/// Closing line for the whole run.
pub struct Summary {
    pub total: usize,
    pub succeeded: usize,
}

impl Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Checked in {} of {} account(s)",
            self.succeeded, self.total
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{Report, Summary};
    use crate::{check_in::CheckInOutcome, mirror::Mirror, quota::Quota};

    fn outcome() -> CheckInOutcome {
        CheckInOutcome {
            email: "a@x.com".to_owned().into(),
            mirror: Some(Mirror::from("ikuuu.de".to_owned())),
            login_message: Some("登录成功".to_owned()),
            message: "你获得了 512 MB 流量".to_owned(),
            quota: Some(Quota::new("5".to_owned(), "GB".to_owned())),
            error: None,
        }
    }

    #[test]
    fn successful_report() {
        assert_eq!(
            Report(&outcome()).to_string(),
            "Mirror: ikuuu.de\nLogin: 登录成功\nCheck-in result: 你获得了 512 MB 流量\nRemaining quota: 5GB\n"
        );
    }

    #[test]
    fn missing_quota_is_not_an_error() {
        let outcome = CheckInOutcome {
            quota: None,
            ..outcome()
        };
        let report = Report(&outcome).to_string();
        assert!(report.ends_with("Could not retrieve quota\n"));
        assert!(!report.contains("Error"));
    }

    #[test]
    fn failure_report() {
        let outcome = CheckInOutcome {
            email: "a@x.com".to_owned().into(),
            mirror: None,
            login_message: None,
            message: "check-in failed".to_owned(),
            quota: None,
            error: Some("None of the 4 mirror(s) is available".to_owned()),
        };
        assert_eq!(
            Report(&outcome).to_string(),
            "Error: None of the 4 mirror(s) is available\nCheck-in result: check-in failed\nCould not retrieve quota\n"
        );
    }

    #[test]
    fn summary() {
        let summary = Summary {
            total: 3,
            succeeded: 2,
        };
        assert_eq!(summary.to_string(), "Checked in 2 of 3 account(s)");
    }
}
