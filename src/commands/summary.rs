use crate::commands::Out;
use crate::model::Summary;
use crate::{Result, Session};

/// Computes the totals and, when `publish` is set, writes them to the summary worksheet.
pub async fn summary(session: &mut Session, publish: bool) -> Result<Out<Summary>> {
    let summary = session.summary().await?;
    if publish {
        session.publish_summary(&summary).await?;
    }
    Ok(Out::new(render(&summary), summary))
}

pub(crate) fn render(summary: &Summary) -> String {
    format!(
        "Total Income: {}\nTotal Expenses: {}\nNet Savings: {}",
        summary.total_income, summary.total_expenses, summary.net_savings
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::TestEnv;

    #[tokio::test]
    async fn test_summary_published() {
        let mut env = TestEnv::new().await;
        env.session().add_income("1,000.00", "1").await.unwrap_err();
        env.session().add_income("1000.00", "1").await.unwrap();
        crate::commands::expense(env.session(), "250.50", "2")
            .await
            .unwrap();

        let out = summary(env.session(), true).await.unwrap();
        assert_eq!(
            out.message(),
            "Total Income: €1000.00\nTotal Expenses: €250.50\nNet Savings: €749.50"
        );
        assert_eq!(
            env.summary_row().await,
            vec!["1000.00", "250.50", "749.50"]
        );
    }

    #[tokio::test]
    async fn test_summary_not_published() {
        let mut env = TestEnv::new().await;
        crate::commands::expense(env.session(), "80", "6")
            .await
            .unwrap();
        let out = summary(env.session(), false).await.unwrap();
        assert!(out.message().ends_with("Net Savings: -€80.00"));
        assert!(env.summary_row().await.is_empty());
    }
}
