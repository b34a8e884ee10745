use crate::cli::commands::{Cli, Commands};
use crate::config::Config;
use crate::content::{Generated, ResetRequest, SafetyVerdict, TriggerType};
use crate::fallback::{CRISIS_RESOURCES_DE, SAFETY_INTERVENTION_MESSAGE_RU};
use crate::generation::Orchestrator;
use crate::safety::SafetyGate;
use crate::transport::gateway::hash_token;
use crate::ui::style;
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

use super::reset::play_reset;

pub async fn dispatch(cli: Cli, config: Config) -> Result<()> {
    match cli.command {
        Commands::Serve { port, host } => {
            let host = host.unwrap_or_else(|| config.gateway.host.clone());
            let port = port.unwrap_or(config.gateway.port);
            info!(%host, port, "Starting Ruach Compass API");
            crate::transport::gateway::run_gateway(&host, port, Arc::new(config)).await
        }

        Commands::SafetyCheck { text } => {
            let orchestrator = Arc::new(Orchestrator::from_config(&config)?);
            let generated = SafetyGate::new(orchestrator).assess(&text).await;
            print_safety(&generated)
        }

        Commands::Reset {
            trigger,
            context,
            offline,
        } => {
            let orchestrator = Arc::new(Orchestrator::from_config(&config)?);
            let mut request = reset_request(trigger, context, offline);
            if let Some(context) = &request.context_summary {
                let verdict = SafetyGate::new(Arc::clone(&orchestrator)).check(context).await;
                if verdict.requires_intervention {
                    eprintln!("{}", style::header(SAFETY_INTERVENTION_MESSAGE_RU));
                    print_crisis_resources();
                    // Catalogue steps only; nothing generated from this context.
                    request.use_fallback = true;
                }
            }
            play_reset(&orchestrator, &request).await
        }

        Commands::HashToken { token } => {
            if token.trim().is_empty() {
                anyhow::bail!("token must not be empty");
            }
            println!("{}", hash_token(&token));
            Ok(())
        }
    }
}

fn reset_request(trigger: TriggerType, context: Option<String>, offline: bool) -> ResetRequest {
    ResetRequest {
        trigger,
        context_summary: context
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty()),
        use_fallback: offline,
    }
}

fn print_safety(generated: &Generated<SafetyVerdict>) -> Result<()> {
    let rendered =
        serde_json::to_string_pretty(generated).context("serialize safety verdict")?;
    println!("{rendered}");

    let verdict = &generated.body;
    if verdict.crisis_resources_needed {
        eprintln!();
        if let Some(message) = &verdict.message_ru {
            eprintln!("{}", style::header(message));
        }
        print_crisis_resources();
    }
    Ok(())
}

fn print_crisis_resources() {
    for resource in CRISIS_RESOURCES_DE {
        eprintln!(
            "{} {} {}",
            style::alert(resource.name),
            resource.phone,
            style::dim(resource.available)
        );
    }
}
