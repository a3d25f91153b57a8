//! Example: Signing in against the built-in demo backend
//!
//! Runs the whole client stack without a server: the fake transport answers
//! login, refresh and the dashboard endpoints with sample data.
//!
//! Run this example: ```bash VISADESK_TRANSPORT=fake cargo run --example
//! demo_session ```

use visadesk_core::LoginForm;
use visadesk_domain::{CaseQuery, CredentialBackend, TransportMode};
use visadesk_infra::http::{DEMO_EMAIL, DEMO_PASSWORD};
use visadesk_infra::{config, init_tracing, AppContext, LogFormat};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing(LogFormat::Pretty)?;

    let mut config = config::load()?;
    config.transport = TransportMode::Fake;
    config.storage.backend = CredentialBackend::Memory;

    let ctx = AppContext::new(config).await?;
    println!("Session: {:?}", ctx.session_state());

    let user = ctx.auth.login(&LoginForm::new(DEMO_EMAIL, DEMO_PASSWORD)).await?;
    if let Some(user) = user {
        println!("Signed in as {}", user.display_name());
    }

    let page = ctx.cases.list(&CaseQuery::default()).await?;
    for case in &page.items {
        println!(
            "  {} {} {} ({})",
            case.id, case.applicant.first_name, case.applicant.last_name, case.status
        );
    }

    let overview = ctx.statistics.overview().await?;
    println!("Completion rate: {:.0}%", overview.completion_rate() * 100.0);

    ctx.sign_out().await?;
    println!("Session: {:?}", ctx.session_state());
    Ok(())
}
