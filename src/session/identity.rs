//! Player identity entered on the start screen.

use anyhow::{bail, Result};

/// Company, employee id and display name of the player.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerIdentity {
    pub company: String,
    pub employee_id: String,
    pub name: String,
}

impl PlayerIdentity {
    /// Builds an identity from raw input, trimming every field.
    pub fn new(company: &str, employee_id: &str, name: &str) -> Self {
        Self {
            company: company.trim().to_string(),
            employee_id: employee_id.trim().to_string(),
            name: name.trim().to_string(),
        }
    }

    /// Labels of the fields that are blank, in form order.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.company.trim().is_empty() {
            missing.push("회사");
        }
        if self.employee_id.trim().is_empty() {
            missing.push("사번");
        }
        if self.name.trim().is_empty() {
            missing.push("이름");
        }
        missing
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }

    /// Fails with a message naming every missing field.
    pub fn validate(&self) -> Result<()> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            bail!(
                "{} 정보가 비어 있습니다.\n모두 입력해 주세요.",
                missing.join(", ")
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_trims() {
        let id = PlayerIdentity::new("  회사 ", "\t123", "홍길동\n");
        assert_eq!(id, PlayerIdentity {
            company: "회사".into(),
            employee_id: "123".into(),
            name: "홍길동".into(),
        });
        assert!(id.validate().is_ok());
    }

    #[test]
    fn test_missing_fields_message() {
        let id = PlayerIdentity::new("회사", "  ", "");
        assert_eq!(id.missing_fields(), vec!["사번", "이름"]);
        let err = id.validate().unwrap_err().to_string();
        assert_eq!(err, "사번, 이름 정보가 비어 있습니다.\n모두 입력해 주세요.");
    }

    #[test]
    fn test_default_is_incomplete() {
        assert!(!PlayerIdentity::default().is_complete());
        assert_eq!(PlayerIdentity::default().missing_fields().len(), 3);
    }
}
