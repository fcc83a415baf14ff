use crate::commands::{uploaded, Out};
use crate::model::LedgerEntry;
use crate::{Result, Session};

/// Records income of `amount` under the income category with menu key `menu_key`.
pub async fn income(
    session: &mut Session,
    amount: &str,
    menu_key: &str,
) -> Result<Out<LedgerEntry>> {
    let (amount, category) = session.add_income(amount, menu_key).await?;
    Ok(Out::new(
        uploaded(amount, category),
        LedgerEntry::new(amount, category),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorType;
    use crate::test::TestEnv;

    #[tokio::test]
    async fn test_income() {
        let mut env = TestEnv::new().await;
        let out = income(env.session(), "2500", "1").await.unwrap();
        assert_eq!(out.message(), "€2500.00 was successfully uploaded to Salary.");
        let summary = env.session().summary().await.unwrap();
        assert_eq!(summary.total_income.to_string(), "€2500.00");
    }

    #[tokio::test]
    async fn test_income_invalid() {
        let mut env = TestEnv::new().await;
        let err = income(env.session(), "lots", "1").await.unwrap_err();
        assert_eq!(err.error_type(), ErrorType::InvalidAmount);
        let err = income(env.session(), "5", "0").await.unwrap_err();
        assert_eq!(err.error_type(), ErrorType::InvalidCategory);
    }
}
